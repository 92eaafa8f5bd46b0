//! Loads applied directly to a node

use super::Direction;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Tolerance used to quantize load magnitudes for equality and hashing, so
/// two loads that differ only by float dust compare equal.
const LOAD_EPSILON: f64 = 1e-10;

fn quantize(value: f64) -> i64 {
    (value / LOAD_EPSILON).round() as i64
}

/// A force/moment applied directly at a node under a given load case.
///
/// Equality and hashing are tolerant of differences below [`LOAD_EPSILON`]
/// rather than comparing raw bit patterns, so loads built from slightly
/// different floating-point paths still compare equal; the quantization is
/// a pure function of the stored value, so the relation stays reflexive,
/// symmetric, and transitive and agrees with the derived-style `Hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodalLoad {
    pub fx: f64,
    pub fy: f64,
    pub mz: f64,
    pub direction: Direction,
    pub load_case: String,
}

impl NodalLoad {
    pub fn new(fx: f64, fy: f64, mz: f64, direction: Direction, load_case: &str) -> Self {
        Self {
            fx,
            fy,
            mz,
            direction,
            load_case: load_case.to_string(),
        }
    }

    pub fn fx(value: f64, load_case: &str) -> Self {
        Self::new(value, 0.0, 0.0, Direction::Global, load_case)
    }

    pub fn fy(value: f64, load_case: &str) -> Self {
        Self::new(0.0, value, 0.0, Direction::Global, load_case)
    }

    pub fn mz(value: f64, load_case: &str) -> Self {
        Self::new(0.0, 0.0, value, Direction::Global, load_case)
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.mz]
    }
}

impl PartialEq for NodalLoad {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.load_case == other.load_case
            && quantize(self.fx) == quantize(other.fx)
            && quantize(self.fy) == quantize(other.fy)
            && quantize(self.mz) == quantize(other.mz)
    }
}

impl Eq for NodalLoad {}

impl Hash for NodalLoad {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.direction.hash(state);
        self.load_case.hash(state);
        quantize(self.fx).hash(state);
        quantize(self.fy).hash(state);
        quantize(self.mz).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(load: &NodalLoad) -> u64 {
        let mut hasher = DefaultHasher::new();
        load.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality_is_tolerant_of_float_dust() {
        let a = NodalLoad::fy(-10_000.0, "Case 1");
        let b = NodalLoad::fy(-10_000.0 + 1e-13, "Case 1");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn equality_is_reflexive_symmetric_and_transitive() {
        let a = NodalLoad::fy(-10_000.0, "Case 1");
        let b = NodalLoad::fy(-10_000.0, "Case 1");
        let c = NodalLoad::fy(-10_000.0, "Case 1");
        assert_eq!(a, a);
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(b, c);
        assert_eq!(a, c);
    }

    #[test]
    fn distinguishes_real_differences() {
        let a = NodalLoad::fy(-10_000.0, "Case 1");
        let b = NodalLoad::fy(-9_999.0, "Case 1");
        assert_ne!(a, b);
    }
}
