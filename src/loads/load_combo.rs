//! Load combinations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A mapping from load case name to a scalar factor, linearly superposing
/// the per-load-case results it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCombination {
    pub name: String,
    pub factors: HashMap<String, f64>,
}

impl LoadCombination {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            factors: HashMap::new(),
        }
    }

    pub fn single(name: &str, case: &str) -> Self {
        Self::new(name).with_case(case, 1.0)
    }

    pub fn with_case(mut self, case: &str, factor: f64) -> Self {
        self.factors.insert(case.to_string(), factor);
        self
    }

    pub fn factor(&self, case: &str) -> f64 {
        *self.factors.get(case).unwrap_or(&0.0)
    }

    pub fn includes(&self, case: &str) -> bool {
        self.factor(case).abs() > 1e-12
    }
}

impl Default for LoadCombination {
    fn default() -> Self {
        Self::single("Combo 1", "Case 1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_defaults_to_zero_for_unlisted_case() {
        let combo = LoadCombination::single("1.2D + 1.6L", "Dead").with_case("Live", 1.6);
        assert_eq!(combo.factor("Dead"), 1.0);
        assert_eq!(combo.factor("Wind"), 0.0);
        assert!(!combo.includes("Wind"));
    }
}
