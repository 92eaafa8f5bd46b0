//! Support conditions

use serde::{Deserialize, Serialize};

/// Restraint condition at a node: which of its three planar DOFs
/// (Ux, Uy, Rz) are held by a support rather than free to displace.
///
/// Prescribed support *settlement* is not carried here - it is expressed as
/// a [`SupportDisplacementLoad`](crate::loads::SupportDisplacementLoad)
/// against a specific load case, since the same restrained node can settle
/// differently under different load cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    pub ux: bool,
    pub uy: bool,
    pub rz: bool,
}

impl Support {
    pub fn new(ux: bool, uy: bool, rz: bool) -> Self {
        Self { ux, uy, rz }
    }

    /// Fully fixed: all three DOFs restrained.
    pub fn fixed() -> Self {
        Self::new(true, true, true)
    }

    /// Pinned: translations restrained, rotation free.
    pub fn pinned() -> Self {
        Self::new(true, true, false)
    }

    /// Roller restraining only vertical translation.
    pub fn roller_y() -> Self {
        Self::new(false, true, false)
    }

    /// Roller restraining only horizontal translation.
    pub fn roller_x() -> Self {
        Self::new(true, false, false)
    }

    pub fn restrained(&self) -> [bool; 3] {
        [self.ux, self.uy, self.rz]
    }

    pub fn num_restrained(&self) -> usize {
        self.restrained().iter().filter(|&&r| r).count()
    }

    pub fn is_supported(&self) -> bool {
        self.ux || self.uy || self.rz
    }
}

impl Default for Support {
    fn default() -> Self {
        Self::new(false, false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_restrains_all_three_dofs() {
        let support = Support::fixed();
        assert_eq!(support.num_restrained(), 3);
    }

    #[test]
    fn pinned_frees_rotation() {
        let support = Support::pinned();
        assert!(support.ux && support.uy && !support.rz);
        assert_eq!(support.num_restrained(), 2);
    }
}
