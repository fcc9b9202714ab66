use wicketspin_core::DEFAULT_SEED;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub seed: u64,
    pub matches: u32,
    /// Keep a per-spin trace for every match.
    pub record_traces: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            matches: 1000,
            record_traces: false,
        }
    }
}
