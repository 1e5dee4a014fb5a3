//! Support restraints: stability pre-check, penalty enforcement and partitioning.

use log::warn;
use nalgebra::{DMatrix, DVector};
use petgraph::unionfind::UnionFind;

use crate::assembly::AssembledSystem;
use crate::errors::{AnalysisError, Instability};
use crate::model::{Model, NodeId};

/// Relative tolerance used when comparing restraint line positions.
const COINCIDENCE_TOLERANCE: f64 = 1.0e-9;

/// Global indices of every restrained degree of freedom, ascending.
#[must_use]
pub fn restrained_dofs(model: &Model) -> Vec<usize> {
    dofs_where(model, true)
}

/// Global indices of every unrestrained degree of freedom, ascending.
#[must_use]
pub fn free_dofs(model: &Model) -> Vec<usize> {
    dofs_where(model, false)
}

/// Collect DOFs whose restraint flag equals `restrained`.
fn dofs_where(model: &Model, restrained: bool) -> Vec<usize> {
    let mut dofs = Vec::new();
    for (idx, node) in model.nodes().iter().enumerate() {
        for (axis, fixed) in node.support.restraints().iter().enumerate() {
            if *fixed == restrained {
                dofs.push(idx * 2 + axis);
            }
        }
    }
    dofs
}

/// Reject models whose supports cannot prevent rigid-body motion.
///
/// Every connected part of the truss is checked on its own. A lone node must
/// be pinned; a larger part needs at least three restraint components, one of
/// them horizontal, whose lines of action do not all meet in a single point.
///
/// # Errors
///
/// Returns [`AnalysisError::SingularSystem`] describing the first unstable part.
pub fn check_restraints(model: &Model) -> Result<(), AnalysisError> {
    let nodes = model.nodes();
    let index_map = model.node_index_map();
    let mut components = UnionFind::<usize>::new(nodes.len());
    for member in model.members() {
        if let (Some(&start), Some(&end)) =
            (index_map.get(&member.start), index_map.get(&member.end))
        {
            components.union(start, end);
        }
    }

    let extent = nodes
        .iter()
        .map(|node| node.position.x.abs().max(node.position.y.abs()))
        .fold(1.0_f64, f64::max);
    let tolerance = COINCIDENCE_TOLERANCE * extent;

    let labels = components.into_labeling();
    let mut roots: Vec<usize> = labels.clone();
    roots.sort_unstable();
    roots.dedup();

    for root in roots {
        let part: Vec<usize> = (0..nodes.len()).filter(|idx| labels[*idx] == root).collect();
        let component = part
            .iter()
            .map(|idx| nodes[*idx].id)
            .min()
            .unwrap_or(NodeId(0));

        // Vertical restraints act along x = const, horizontal ones along y = const.
        let mut vertical_lines = Vec::new();
        let mut horizontal_lines = Vec::new();
        for idx in &part {
            let node = &nodes[*idx];
            let [fix_x, fix_y] = node.support.restraints();
            if fix_x {
                horizontal_lines.push(node.position.y);
            }
            if fix_y {
                vertical_lines.push(node.position.x);
            }
        }
        let restraints = vertical_lines.len() + horizontal_lines.len();

        let instability = if part.len() == 1 {
            (restraints < 2).then_some(Instability::InsufficientRestraints {
                component,
                restraints,
            })
        } else if restraints < 3 {
            Some(Instability::InsufficientRestraints {
                component,
                restraints,
            })
        } else if horizontal_lines.is_empty() {
            Some(Instability::ParallelRestraints { component })
        } else if all_coincide(&vertical_lines, tolerance)
            && all_coincide(&horizontal_lines, tolerance)
        {
            Some(Instability::ConcurrentRestraints { component })
        } else {
            None
        };

        if let Some(instability) = instability {
            warn!("rejecting model: {instability}");
            return Err(AnalysisError::SingularSystem(instability));
        }
    }
    Ok(())
}

/// Whether every value lies within `tolerance` of the first.
fn all_coincide(values: &[f64], tolerance: f64) -> bool {
    values
        .first()
        .map_or(true, |first| values.iter().all(|value| (value - first).abs() <= tolerance))
}

/// Enforce supports by the penalty method, in place.
///
/// Each restrained diagonal term becomes `scale` times the largest physical
/// diagonal term and the matching load entry becomes zero. Returns the penalty
/// stiffness that was applied.
pub fn apply_penalty(system: &mut AssembledSystem, model: &Model, scale: f64) -> f64 {
    let reference = system.max_diagonal();
    let penalty = if reference > 0.0 { reference * scale } else { scale };
    for dof in restrained_dofs(model) {
        system.stiffness[(dof, dof)] = penalty;
        system.load[dof] = 0.0;
    }
    penalty
}

/// Extract the free-free block of the stiffness matrix and the free loads.
#[must_use]
pub fn partition(system: &AssembledSystem, free: &[usize]) -> (DMatrix<f64>, DVector<f64>) {
    let size = free.len();
    let mut k_ff = DMatrix::zeros(size, size);
    let mut f_f = DVector::zeros(size);
    for (row_idx, &row) in free.iter().enumerate() {
        f_f[row_idx] = system.load[row];
        for (col_idx, &col) in free.iter().enumerate() {
            k_ff[(row_idx, col_idx)] = system.stiffness[(row, col)];
        }
    }
    (k_ff, f_f)
}

/// Scatter a free-DOF solution back into a full-length displacement vector.
#[must_use]
pub fn expand(solution: &DVector<f64>, free: &[usize], dof_count: usize) -> DVector<f64> {
    let mut displacements = DVector::zeros(dof_count);
    for (idx, &dof) in free.iter().enumerate() {
        displacements[dof] = solution[idx];
    }
    displacements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::assemble;
    use crate::geometry::point;
    use crate::model::{Member, MemberId, Node, SupportType};

    fn bar(start: SupportType, end: SupportType, end_position: (f64, f64)) -> Model {
        Model::new(
            vec![
                Node::new(NodeId(1), point(0.0, 0.0)).with_support(start),
                Node::new(NodeId(2), point(end_position.0, end_position.1)).with_support(end),
            ],
            vec![Member::new(MemberId(1), NodeId(1), NodeId(2), 1.0, 1.0)],
        )
    }

    #[test]
    fn dof_lists_follow_support_types() {
        let model = bar(SupportType::Pin, SupportType::Roller, (1.0, 0.0));
        assert_eq!(restrained_dofs(&model), vec![0, 1, 3]);
        assert_eq!(free_dofs(&model), vec![2]);
    }

    #[test]
    fn pin_and_roller_bar_is_stable() {
        let model = bar(SupportType::Pin, SupportType::Roller, (1.0, 0.0));
        assert!(check_restraints(&model).is_ok());
    }

    #[test]
    fn two_restraints_are_insufficient() {
        let model = bar(SupportType::Pin, SupportType::Free, (1.0, 0.0));
        assert_eq!(
            check_restraints(&model),
            Err(AnalysisError::SingularSystem(
                Instability::InsufficientRestraints {
                    component: NodeId(1),
                    restraints: 2
                }
            ))
        );
    }

    #[test]
    fn rollers_alone_cannot_resist_sliding() {
        let model = Model::new(
            vec![
                Node::new(NodeId(1), point(0.0, 0.0)).with_support(SupportType::Roller),
                Node::new(NodeId(2), point(1.0, 0.0)).with_support(SupportType::Roller),
                Node::new(NodeId(3), point(0.5, 1.0)).with_support(SupportType::Roller),
            ],
            vec![
                Member::new(MemberId(1), NodeId(1), NodeId(2), 1.0, 1.0),
                Member::new(MemberId(2), NodeId(2), NodeId(3), 1.0, 1.0),
                Member::new(MemberId(3), NodeId(3), NodeId(1), 1.0, 1.0),
            ],
        );
        assert_eq!(
            check_restraints(&model),
            Err(AnalysisError::SingularSystem(
                Instability::ParallelRestraints {
                    component: NodeId(1)
                }
            ))
        );
    }

    #[test]
    fn roller_in_line_with_pin_is_concurrent() {
        let model = bar(SupportType::Pin, SupportType::Roller, (0.0, 1.0));
        assert_eq!(
            check_restraints(&model),
            Err(AnalysisError::SingularSystem(
                Instability::ConcurrentRestraints {
                    component: NodeId(1)
                }
            ))
        );
    }

    #[test]
    fn detached_free_node_is_unstable() {
        let mut nodes = bar(SupportType::Pin, SupportType::Pin, (1.0, 0.0))
            .nodes()
            .to_vec();
        nodes.push(Node::new(NodeId(5), point(3.0, 3.0)));
        let model = Model::new(
            nodes,
            vec![Member::new(MemberId(1), NodeId(1), NodeId(2), 1.0, 1.0)],
        );
        assert_eq!(
            check_restraints(&model),
            Err(AnalysisError::SingularSystem(
                Instability::InsufficientRestraints {
                    component: NodeId(5),
                    restraints: 0
                }
            ))
        );
    }

    #[test]
    fn penalty_overwrites_restrained_diagonal() {
        let model = bar(SupportType::Pin, SupportType::Roller, (2.0, 0.0));
        let mut system = assemble(&model).expect("assembly succeeds");
        let physical = system.max_diagonal();
        let penalty = apply_penalty(&mut system, &model, 1.0e8);

        assert_eq!(penalty, physical * 1.0e8);
        for dof in [0, 1, 3] {
            assert_eq!(system.stiffness[(dof, dof)], penalty);
            assert_eq!(system.load[dof], 0.0);
        }
        assert_eq!(system.stiffness[(2, 2)], physical);
    }

    #[test]
    fn partition_and_expand_select_free_dofs() {
        let model = bar(SupportType::Pin, SupportType::Roller, (2.0, 0.0));
        let system = assemble(&model).expect("assembly succeeds");
        let free = free_dofs(&model);
        let (k_ff, f_f) = partition(&system, &free);
        assert_eq!(k_ff.shape(), (1, 1));
        assert_eq!(k_ff[(0, 0)], 0.5);
        assert_eq!(f_f.len(), 1);

        let full = expand(&DVector::from_element(1, 3.0), &free, 4);
        assert_eq!(full.as_slice(), &[0.0, 0.0, 3.0, 0.0]);
    }
}
