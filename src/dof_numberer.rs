//! Deterministic degree-of-freedom numbering
//!
//! Places every free DOF before every restrained one, so the assembled
//! stiffness matrix's leading `NDof x NDof` block is exactly the free-free
//! partition the solver factorizes.

use crate::elements::Node;
use std::collections::{HashMap, VecDeque};

/// Result of numbering: a node-name -> [Ux, Uy, Rz] DOF index map, plus the
/// count of free DOFs.
pub struct Numbering {
    pub dof: HashMap<String, [usize; 3]>,
    pub ndof: usize,
    pub total: usize,
}

/// Order nodes by ascending restrained-DOF count (a stable sort over
/// `order`, the structure's insertion order), so the most-restrained nodes
/// are visited last; assign free numbers `[0, NDof)` and restrained numbers
/// `[NDof, 3*|nodes|)` in that order.
pub fn number_dofs(order: &[String], nodes: &HashMap<String, Node>) -> Numbering {
    let mut order: Vec<&String> = order.iter().collect();
    order.sort_by_key(|name| match &nodes[*name].support {
        Some(s) => s.num_restrained(),
        None => 0,
    });

    let total_free: usize = order
        .iter()
        .map(|name| {
            3 - match &nodes[*name].support {
                Some(s) => s.num_restrained(),
                None => 0,
            }
        })
        .sum();
    let total = nodes.len() * 3;

    let mut free_numbers: VecDeque<usize> = (0..total_free).collect();
    let mut restrained_numbers: VecDeque<usize> = (total_free..total).collect();

    let mut dof = HashMap::with_capacity(nodes.len());
    for name in order {
        let node = &nodes[name];
        let restrained = match &node.support {
            Some(s) => s.restrained(),
            None => [false, false, false],
        };
        let mut indices = [0usize; 3];
        for (local, &is_restrained) in restrained.iter().enumerate() {
            indices[local] = if is_restrained {
                restrained_numbers.pop_front().expect("restrained DOF pool exhausted")
            } else {
                free_numbers.pop_front().expect("free DOF pool exhausted")
            };
        }
        dof.insert(name.clone(), indices);
    }

    Numbering {
        dof,
        ndof: total_free,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Support;
    use std::collections::HashMap;

    #[test]
    fn free_dofs_come_before_restrained() {
        let mut nodes = HashMap::new();
        let mut fixed = Node::new(0.0, 0.0);
        fixed.support = Some(Support::fixed());
        nodes.insert("N1".to_string(), fixed);
        nodes.insert("N2".to_string(), Node::new(5.0, 0.0));
        let order = vec!["N1".to_string(), "N2".to_string()];

        let numbering = number_dofs(&order, &nodes);
        assert_eq!(numbering.ndof, 3);
        assert_eq!(numbering.total, 6);

        for &idx in &numbering.dof["N2"] {
            assert!(idx < numbering.ndof, "free node DOF {idx} should be < NDof");
        }
        for &idx in &numbering.dof["N1"] {
            assert!(idx >= numbering.ndof, "restrained node DOF {idx} should be >= NDof");
        }
    }

    #[test]
    fn indices_are_unique() {
        let mut nodes = HashMap::new();
        let mut fixed = Node::new(0.0, 0.0);
        fixed.support = Some(Support::pinned());
        nodes.insert("A".to_string(), fixed);
        nodes.insert("B".to_string(), Node::new(1.0, 0.0));
        nodes.insert("C".to_string(), Node::new(2.0, 0.0));
        let order = vec!["A".to_string(), "B".to_string(), "C".to_string()];

        let numbering = number_dofs(&order, &nodes);
        let mut all: Vec<usize> = numbering.dof.values().flat_map(|d| d.to_vec()).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), numbering.total);
    }
}
