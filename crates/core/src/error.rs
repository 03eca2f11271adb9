use thiserror::Error;

/// Top-level error type used across the entire workspace.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("config error: {0}")]
    Config(String),

    /// A time span, easing duration or rate that is zero, negative or not finite.
    #[error("invalid {name}: {value} (must be positive and finite)")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Accept `value` only if it is a usable positive, finite duration.
pub fn positive_duration(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GraphError::InvalidDuration { name, value })
    }
}
