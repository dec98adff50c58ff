use armtrack_core::{Configurable, GlobalConfig};

#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Joint lengths of the simulated chain.
    pub lengths: Vec<f64>,
    /// Seed for target regeneration.
    pub seed: Option<u64>,
    /// Tick interval in milliseconds.
    pub interval: u64,
    /// Number of ticks to simulate, 0 for unbounded.
    pub ticks: u64,
    /// Emit JSON state snapshots.
    pub snapshot: bool,
    /// Global configuration.
    pub global: GlobalConfig,
}

impl Configurable for SimConfig {
    fn global(&self) -> &GlobalConfig {
        &self.global
    }
}
