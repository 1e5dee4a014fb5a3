//! Linear static analysis pipeline: assemble, constrain, solve, recover.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::assembly::assemble;
use crate::constraints::{apply_penalty, check_restraints, expand, free_dofs, partition};
use crate::errors::{AnalysisError, Instability};
use crate::model::Model;
use crate::recovery::{recover_members, recover_nodes, recover_reactions};
use crate::results::AnalysisResult;
use crate::solver::solve;

/// How support restraints are imposed on the stiffness system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintMethod {
    /// Replace each restrained diagonal term by a very large stiffness.
    ///
    /// Restrained displacements come out numerically small rather than zero.
    #[default]
    Penalty,
    /// Solve only the free-free block; restrained displacements are exactly zero.
    Partition,
}

/// Options controlling an analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Constraint enforcement technique.
    pub constraint_method: ConstraintMethod,
    /// Penalty stiffness as a multiple of the largest physical diagonal term.
    pub penalty_scale: f64,
    /// Smallest acceptable pivot, relative to the largest physical diagonal term.
    pub pivot_tolerance: f64,
    /// Reject insufficiently supported models before solving.
    pub check_restraints: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            constraint_method: ConstraintMethod::Penalty,
            penalty_scale: 1.0e8,
            pivot_tolerance: 1.0e-10,
            check_restraints: true,
        }
    }
}

impl AnalysisOptions {
    /// Options using the given constraint method and default tolerances.
    #[must_use]
    pub fn with_method(constraint_method: ConstraintMethod) -> Self {
        Self {
            constraint_method,
            ..Self::default()
        }
    }
}

/// Analyse a truss with default options.
///
/// # Errors
///
/// See [`analyze_with`].
///
/// # Examples
/// ```
/// use planar_truss::{
///     analyze, force, point, Classification, MemberId, ModelBuilder, NodeId, SupportType,
/// };
///
/// let mut builder = ModelBuilder::new();
/// let a = builder.add_node(NodeId(1), point(0.0, 0.0))?;
/// let b = builder.add_node(NodeId(2), point(1000.0, 0.0))?;
/// builder.set_support(a, SupportType::Pin)?;
/// builder.set_support(b, SupportType::Roller)?;
/// builder.set_load(b, force(5.0, 0.0))?;
/// let ab = builder.add_member(MemberId(1), a, b, 100.0, 200_000.0)?;
///
/// let result = analyze(&builder.build())?;
/// let member = result.member(ab).expect("member result present");
/// assert!((member.force - 5.0).abs() < 1.0e-6);
/// assert_eq!(member.classification, Classification::Tension);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn analyze(model: &Model) -> Result<AnalysisResult, AnalysisError> {
    analyze_with(model, &AnalysisOptions::default())
}

/// Analyse a truss under its nodal loads.
///
/// Every call builds its matrices from `model` afresh and discards them before
/// returning; nothing is cached between calls.
///
/// # Errors
///
/// Returns [`AnalysisError::Configuration`] for structurally invalid models,
/// [`AnalysisError::SingularSystem`] for unstable or under-constrained trusses
/// and [`AnalysisError::NumericOverflow`] when values leave the finite range.
pub fn analyze_with(
    model: &Model,
    options: &AnalysisOptions,
) -> Result<AnalysisResult, AnalysisError> {
    model.validate()?;
    if options.check_restraints {
        check_restraints(model)?;
    }

    let system = assemble(model)?;
    let pivot_tolerance = options.pivot_tolerance * system.max_diagonal();
    let dof_count = system.dof_count();

    let displacements = match options.constraint_method {
        ConstraintMethod::Penalty => {
            let mut constrained = system.clone();
            let penalty = apply_penalty(&mut constrained, model, options.penalty_scale);
            debug!("penalty stiffness {penalty:e}");
            solve(constrained.stiffness, constrained.load, pivot_tolerance)?
        }
        ConstraintMethod::Partition => {
            let free = free_dofs(model);
            let (k_ff, f_f) = partition(&system, &free);
            let solution = solve(k_ff, f_f, pivot_tolerance).map_err(|error| match error {
                AnalysisError::SingularSystem(Instability::ZeroPivot { dof }) => {
                    AnalysisError::SingularSystem(Instability::ZeroPivot { dof: free[dof] })
                }
                other => other,
            })?;
            expand(&solution, &free, dof_count)
        }
    };

    let members = recover_members(model, &system.members, &displacements);
    let nodes = recover_nodes(model, &displacements);
    let reactions = recover_reactions(model, &system.stiffness, &system.load, &displacements);

    let finite = members
        .iter()
        .all(|member| member.force.is_finite() && member.stress.is_finite())
        && reactions
            .iter()
            .all(|reaction| reaction.rx.is_finite() && reaction.ry.is_finite());
    if !finite {
        return Err(AnalysisError::NumericOverflow { stage: "recovery" });
    }

    info!(
        "analysed {} nodes and {} members ({:?} constraints)",
        nodes.len(),
        members.len(),
        options.constraint_method
    );
    Ok(AnalysisResult::new(members, nodes, reactions))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::ConfigurationError;
    use crate::geometry::{force, point};
    use crate::model::{Member, MemberId, Node, NodeId, SupportType};

    fn axial_bar(load: f64) -> Model {
        Model::new(
            vec![
                Node::new(NodeId(1), point(0.0, 0.0)).with_support(SupportType::Pin),
                Node::new(NodeId(2), point(1.0, 0.0))
                    .with_support(SupportType::Roller)
                    .with_load(force(load, 0.0)),
            ],
            vec![Member::new(MemberId(1), NodeId(1), NodeId(2), 0.01, 200.0e9)],
        )
    }

    #[test]
    fn bar_response_matches_closed_form_solution() {
        for method in [ConstraintMethod::Penalty, ConstraintMethod::Partition] {
            let result = analyze_with(&axial_bar(-1_000.0), &AnalysisOptions::with_method(method))
                .expect("analysis succeeds");

            let displacement = result.node(NodeId(2)).expect("node result");
            let expected_displacement = -1_000.0 * 1.0 / (0.01 * 200.0e9);
            assert_relative_eq!(displacement.dx, expected_displacement, max_relative = 1.0e-6);
            assert_relative_eq!(displacement.dy, 0.0, epsilon = 1.0e-12);

            let member = result.member(MemberId(1)).expect("member result");
            assert_relative_eq!(member.force, -1_000.0, max_relative = 1.0e-6);
            assert_relative_eq!(member.stress, -100_000.0, max_relative = 1.0e-6);
            assert_eq!(
                member.classification,
                crate::results::Classification::Compression
            );
            assert_eq!(member.factor_of_safety, None);

            let support = result.reaction(NodeId(1)).expect("reaction present");
            assert_relative_eq!(support.rx, 1_000.0, max_relative = 1.0e-6);
        }
    }

    #[test]
    fn partition_zero_pivot_reports_global_dof() {
        // Two collinear members meeting at a free middle node: its vertical DOF has no stiffness.
        let model = Model::new(
            vec![
                Node::new(NodeId(1), point(0.0, 0.0)).with_support(SupportType::Pin),
                Node::new(NodeId(2), point(1.0, 0.0)),
                Node::new(NodeId(3), point(2.0, 0.0)).with_support(SupportType::Pin),
            ],
            vec![
                Member::new(MemberId(1), NodeId(1), NodeId(2), 1.0, 1.0),
                Member::new(MemberId(2), NodeId(2), NodeId(3), 1.0, 1.0),
            ],
        );
        let error = analyze_with(&model, &AnalysisOptions::with_method(ConstraintMethod::Partition))
            .expect_err("mechanism detected");
        assert_eq!(
            error,
            AnalysisError::SingularSystem(Instability::ZeroPivot { dof: 3 })
        );
    }

    #[test]
    fn configuration_errors_precede_restraint_checks() {
        let model = Model::new(
            vec![Node::new(NodeId(1), point(0.0, 0.0))],
            vec![Member::new(MemberId(1), NodeId(1), NodeId(2), 1.0, 1.0)],
        );
        assert_eq!(
            analyze(&model),
            Err(AnalysisError::Configuration(ConfigurationError::UnknownNode {
                member: MemberId(1),
                node: NodeId(2)
            }))
        );
    }

    #[test]
    fn overflow_is_reported_by_stage() {
        let bar = |area: f64, elastic_modulus: f64, load: f64| {
            Model::new(
                vec![
                    Node::new(NodeId(1), point(0.0, 0.0)).with_support(SupportType::Pin),
                    Node::new(NodeId(2), point(1.0, 0.0))
                        .with_support(SupportType::Roller)
                        .with_load(force(load, 0.0)),
                ],
                vec![Member::new(MemberId(1), NodeId(1), NodeId(2), area, elastic_modulus)],
            )
        };
        for method in [ConstraintMethod::Penalty, ConstraintMethod::Partition] {
            let options = AnalysisOptions::with_method(method);
            assert_eq!(
                analyze_with(&bar(1.0e200, 1.0e200, 1.0), &options),
                Err(AnalysisError::NumericOverflow { stage: "assembly" })
            );
            // Displacements and forces stay finite; only the stress overflows.
            assert_eq!(
                analyze_with(&bar(1.0e-300, 1.0e300, 1.0e10), &options),
                Err(AnalysisError::NumericOverflow { stage: "recovery" })
            );
        }
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"constraint_method": "partition"}"#).expect("valid json");
        assert_eq!(options.constraint_method, ConstraintMethod::Partition);
        assert_eq!(options.penalty_scale, 1.0e8);
        assert!(options.check_restraints);
    }
}
