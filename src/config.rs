use log::{info, warn};
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::graph::MAX_HASH;

pub const DEFAULT_SEE: usize = 7;
pub const SEE_RANGE: RangeInclusive<usize> = 2..=11;

/// Output and scoring modes selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modes {
    pub boolean: bool,
    pub decision: bool,
    pub stdout: bool,
    pub two_line: bool,
    pub weighted: bool,
}

impl Modes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boolean && self.decision { return Err(ConfigError::Conflict('b', 'd')); }
        if self.boolean && self.weighted { return Err(ConfigError::Conflict('b', 'w')); }
        if self.decision && self.two_line { return Err(ConfigError::Conflict('d', 't')); }
        Ok(())
    }

    pub fn log_banner(&self) {
        if self.boolean { info!("Running boolean mode"); }
        if self.decision { info!("Running decision mode"); }
        if self.stdout { info!("Running stdout mode"); }
        if self.two_line { info!("Running 2L mode"); }
        if self.weighted { info!("Running weighted mode"); }
    }
}

/// Mutable per-session state; the line protocol can change `field`,
/// `threads` and `see` between queries.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Index of the starting field in the graph.
    pub field: usize,
    pub see: usize,
    pub threads: usize,
    pub modes: Modes,
    /// Where decision mode writes its tree; `None` skips the file.
    pub tree_out: Option<PathBuf>,
}

impl Settings {
    pub fn new(field: usize, modes: Modes) -> Self {
        Self { field, see: DEFAULT_SEE, threads: 1, modes, tree_out: None }
    }
}

pub fn check_see(see: usize) -> Result<usize, ConfigError> {
    if SEE_RANGE.contains(&see) { Ok(see) } else { Err(ConfigError::See(see)) }
}

pub fn check_fingerprint(hash: u64) -> Result<u64, ConfigError> {
    if hash < MAX_HASH { Ok(hash) } else { Err(ConfigError::FingerprintRange(hash)) }
}

pub fn hardware_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Zero is rejected; anything above the machine's parallelism is clamped.
pub fn clamp_threads(requested: usize) -> Result<usize, ConfigError> {
    if requested == 0 { return Err(ConfigError::Threads); }
    let max = hardware_threads();
    if requested > max {
        warn!("{} threads requested, clamping to {}", requested, max);
        return Ok(max);
    }
    Ok(requested)
}
