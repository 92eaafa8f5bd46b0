//! Analysis configuration and status

use serde::{Deserialize, Serialize};

/// Outcome of the most recent [`crate::model::Structure::solve`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    /// No solve has run yet, or the structure was mutated since the last one.
    NotRun,
    Successful,
    Failure,
}

impl Default for AnalysisStatus {
    fn default() -> Self {
        Self::NotRun
    }
}

/// Options controlling a [`crate::model::Structure::solve`] call. Mirrors
/// the teacher crate's `AnalysisOptions` builder shape, trimmed to the
/// knobs this 2D linear-static pipeline actually has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Which load cases to run; `None` means every load case registered on
    /// the structure.
    pub load_cases: Option<Vec<String>>,
    /// Absolute pivot magnitude below which the Cholesky factorization
    /// treats a diagonal as a zero pivot rather than accepting it.
    pub pivot_tolerance: f64,
    /// Emit `log::info!`/`log::debug!` progress lines around the solve.
    pub log: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            load_cases: None,
            pivot_tolerance: 1e-12,
            log: true,
        }
    }
}

impl SolveOptions {
    pub fn with_load_cases(mut self, cases: Vec<String>) -> Self {
        self.load_cases = Some(cases);
        self
    }

    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    pub fn with_logging(mut self, log: bool) -> Self {
        self.log = log;
        self
    }
}
