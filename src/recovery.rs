//! Member forces, nodal displacements and support reactions from a solved system.

use nalgebra::{DMatrix, DVector};

use crate::assembly::MemberGeometry;
use crate::geometry::Displacement;
use crate::model::Model;
use crate::results::{Classification, MemberResult, NodeResult, Reaction};

/// Displacement of the node at `index` in the global vector.
fn nodal(displacements: &DVector<f64>, index: usize) -> Displacement {
    Displacement::new(displacements[index * 2], displacements[index * 2 + 1])
}

/// Per-node displacement records, in model order.
#[must_use]
pub fn recover_nodes(model: &Model, displacements: &DVector<f64>) -> Vec<NodeResult> {
    model
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| {
            let displacement = nodal(displacements, idx);
            NodeResult {
                id: node.id,
                dx: displacement.x,
                dy: displacement.y,
            }
        })
        .collect()
}

/// Axial force, stress and classification for every member, in model order.
///
/// The elongation is the relative end displacement projected on the member
/// axis; stretching gives a positive (tensile) force.
#[must_use]
pub fn recover_members(
    model: &Model,
    geometry: &[MemberGeometry],
    displacements: &DVector<f64>,
) -> Vec<MemberResult> {
    model
        .members()
        .iter()
        .zip(geometry)
        .map(|(member, geometry)| {
            let relative = nodal(displacements, geometry.end).to_vector()
                - nodal(displacements, geometry.start).to_vector();
            let elongation = geometry.cos * relative.x + geometry.sin * relative.y;
            let force = geometry.stiffness * elongation;
            let stress = force / member.area;
            MemberResult {
                id: member.id,
                force,
                stress,
                classification: Classification::from_force(force),
                factor_of_safety: member.yield_strength.map(|yield_strength| {
                    if stress == 0.0 {
                        f64::INFINITY
                    } else {
                        yield_strength.abs() / stress.abs()
                    }
                }),
            }
        })
        .collect()
}

/// Support reactions `K·U − F` at every restrained degree of freedom.
///
/// `stiffness` and `load` must be the unconstrained system so the reactions
/// do not depend on how the supports were enforced.
#[must_use]
pub fn recover_reactions(
    model: &Model,
    stiffness: &DMatrix<f64>,
    load: &DVector<f64>,
    displacements: &DVector<f64>,
) -> Vec<Reaction> {
    let mut reactions = Vec::new();
    for (idx, node) in model.nodes().iter().enumerate() {
        let [fix_x, fix_y] = node.support.restraints();
        if !(fix_x || fix_y) {
            continue;
        }
        let component = |dof: usize, fixed: bool| {
            if fixed {
                stiffness.row(dof).transpose().dot(displacements) - load[dof]
            } else {
                0.0
            }
        };
        reactions.push(Reaction {
            id: node.id,
            rx: component(idx * 2, fix_x),
            ry: component(idx * 2 + 1, fix_y),
        });
    }
    reactions
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::assembly::assemble;
    use crate::geometry::{force, point};
    use crate::model::{Member, MemberId, Node, NodeId, SupportType};

    fn inclined_bar() -> Model {
        Model::new(
            vec![
                Node::new(NodeId(1), point(0.0, 0.0)).with_support(SupportType::Pin),
                Node::new(NodeId(2), point(3.0, 4.0))
                    .with_support(SupportType::Pin)
                    .with_load(force(1.0, 1.0)),
            ],
            vec![
                Member::new(MemberId(1), NodeId(1), NodeId(2), 2.0, 10.0)
                    .with_yield_strength(-8.0),
            ],
        )
    }

    #[test]
    fn stretching_along_axis_is_tension() {
        let model = inclined_bar();
        let system = assemble(&model).expect("assembly succeeds");
        // Move the end node 0.5 along the member axis (0.6, 0.8).
        let displacements = DVector::from_row_slice(&[0.0, 0.0, 0.3, 0.4]);
        let members = recover_members(&model, &system.members, &displacements);

        let expected_force = 10.0 * 2.0 / 5.0 * 0.5;
        assert_relative_eq!(members[0].force, expected_force, epsilon = 1.0e-12);
        assert_relative_eq!(members[0].stress, expected_force / 2.0, epsilon = 1.0e-12);
        assert_eq!(members[0].classification, Classification::Tension);
        assert_relative_eq!(
            members[0].factor_of_safety.expect("yield strength present"),
            8.0 / 1.0,
            epsilon = 1.0e-12
        );
    }

    #[test]
    fn transverse_motion_produces_no_force() {
        let model = inclined_bar();
        let system = assemble(&model).expect("assembly succeeds");
        let displacements = DVector::from_row_slice(&[0.0, 0.0, -0.8, 0.6]);
        let members = recover_members(&model, &system.members, &displacements);
        assert_relative_eq!(members[0].force, 0.0, epsilon = 1.0e-12);
        let fos = members[0].factor_of_safety.expect("yield strength present");
        assert!(fos > 1.0e9);
    }

    #[test]
    fn nodes_report_their_own_components() {
        let model = inclined_bar();
        let nodes = recover_nodes(&model, &DVector::from_row_slice(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(nodes[1].id, NodeId(2));
        assert_eq!((nodes[1].dx, nodes[1].dy), (3.0, 4.0));
    }

    #[test]
    fn reactions_balance_member_forces() {
        let model = inclined_bar();
        let system = assemble(&model).expect("assembly succeeds");
        let displacements = DVector::from_row_slice(&[0.0, 0.0, 0.3, 0.4]);
        let reactions =
            recover_reactions(&model, &system.stiffness, &system.load, &displacements);

        // Tension of 2.0 pulls the start node towards the end node.
        assert_eq!(reactions.len(), 2);
        assert_relative_eq!(reactions[0].rx, -1.2, epsilon = 1.0e-12);
        assert_relative_eq!(reactions[0].ry, -1.6, epsilon = 1.0e-12);
        assert_relative_eq!(reactions[1].rx, 1.2 - 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(reactions[1].ry, 1.6 - 1.0, epsilon = 1.0e-12);
    }
}
