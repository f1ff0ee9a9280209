//! Solver configuration types.

/// Algorithm requested for the continuous relaxations of a solve.
///
/// The set is closed: callers pick one of these three and the driver decides
/// how to express it in engine options. There is no implicit fallback value;
/// a config without a strategy leaves the engine on its own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStrategy {
    /// Primal simplex.
    PrimalSimplex,
    /// Dual simplex.
    DualSimplex,
    /// Interior point (barrier).
    Barrier,
}

impl SolveStrategy {
    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStrategy::PrimalSimplex => "primal_simplex",
            SolveStrategy::DualSimplex => "dual_simplex",
            SolveStrategy::Barrier => "barrier",
        }
    }
}

impl std::fmt::Display for SolveStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration options for solver behavior.
///
/// This struct provides a unified way to configure solver parameters
/// across different solver backends.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Relaxation algorithm. `None` uses solver default.
    pub strategy: Option<SolveStrategy>,
    /// Time limit in seconds. `None` means no limit.
    pub time_limit: Option<f64>,
    /// Relative MIP gap tolerance. `None` uses solver default.
    pub mip_gap: Option<f64>,
    /// Enable/disable presolve. `None` uses solver default.
    pub presolve: Option<bool>,
    /// Number of threads to use. `None` uses solver default.
    pub threads: Option<u32>,
    /// Log solver output to console. `None` uses solver default.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    /// Create a new configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relaxation algorithm.
    pub fn with_strategy(mut self, strategy: SolveStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set the relative MIP gap tolerance.
    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    /// Enable or disable presolve.
    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    /// Set the number of threads.
    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    /// Enable or disable console logging.
    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Check if this configuration is completely empty (all defaults).
    pub fn is_empty(&self) -> bool {
        self.strategy.is_none()
            && self.time_limit.is_none()
            && self.mip_gap.is_none()
            && self.presolve.is_none()
            && self.threads.is_none()
            && self.log_to_console.is_none()
    }
}
