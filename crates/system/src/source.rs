use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::System;

/// Upper bound (exclusive) of the synthetic random source.
pub const RANDOM_CEILING: u32 = 100;

/// Where measurements come from.
pub enum Source {
    /// Uniform integers in `0..RANDOM_CEILING`.
    Random(StdRng),
    /// Global CPU usage, in whole percent.
    Cpu(Box<System>),
    /// Used RAM, in whole percent.
    Memory(Box<System>),
}

impl Source {
    pub fn random() -> Self {
        Self::Random(StdRng::from_entropy())
    }

    /// Deterministic random source, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::Random(StdRng::seed_from_u64(seed))
    }

    pub fn cpu() -> Self {
        let mut sys = System::new();
        // Usage is a delta between two refreshes; prime the first one.
        sys.refresh_cpu_usage();
        Self::Cpu(Box::new(sys))
    }

    pub fn memory() -> Self {
        Self::Memory(Box::new(System::new()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Random(_) => "random",
            Self::Cpu(_) => "cpu",
            Self::Memory(_) => "memory",
        }
    }

    /// Take one measurement.
    pub fn sample(&mut self) -> u32 {
        match self {
            Self::Random(rng) => rng.gen_range(0..RANDOM_CEILING),
            Self::Cpu(sys) => {
                sys.refresh_cpu_usage();
                whole_percent(sys.global_cpu_usage())
            }
            Self::Memory(sys) => {
                sys.refresh_memory();
                percent_of(sys.used_memory(), sys.total_memory())
            }
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Source").field(&self.name()).finish()
    }
}

/// Round a `0.0 – 100.0` reading to a whole percent.
pub fn whole_percent(usage: f32) -> u32 {
    if usage.is_nan() {
        return 0;
    }
    usage.clamp(0.0, 100.0).round() as u32
}

/// `used / total` as a whole percent; 0 when `total` is unknown.
pub fn percent_of(used: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    whole_percent((used as f64 / total as f64 * 100.0) as f32)
}
