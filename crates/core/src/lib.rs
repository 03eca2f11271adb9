pub mod easing;
pub mod error;
pub mod normalizer;
pub mod sample;
pub mod tracker;
pub mod window;

pub use error::{GraphError, Result};
pub use normalizer::WindowedNormalizer;
pub use sample::{Point, Sample};
pub use tracker::Ceiling;
