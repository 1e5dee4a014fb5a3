//! Global stiffness matrix and load vector assembly.

use std::collections::HashMap;

use log::debug;
use nalgebra::{DMatrix, DVector, SMatrix};

use crate::errors::{AnalysisError, ConfigurationError};
use crate::model::{Member, Model, NodeId};

/// Geometry of a member resolved against the node list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MemberGeometry {
    /// Index of the start node in the model's node list.
    pub start: usize,
    /// Index of the end node in the model's node list.
    pub end: usize,
    /// Distance between the two nodes.
    pub length: f64,
    /// Direction cosine along X.
    pub cos: f64,
    /// Direction cosine along Y.
    pub sin: f64,
    /// Axial stiffness `E·A/L`.
    pub stiffness: f64,
}

impl MemberGeometry {
    /// Resolve a member's ends, length and direction cosines.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownNode`] when an end is missing and
    /// [`ConfigurationError::ZeroLengthMember`] when both ends coincide.
    pub fn resolve(
        model: &Model,
        index_map: &HashMap<NodeId, usize>,
        member: &Member,
    ) -> Result<Self, ConfigurationError> {
        let lookup = |node: NodeId| {
            index_map
                .get(&node)
                .copied()
                .ok_or(ConfigurationError::UnknownNode {
                    member: member.id,
                    node,
                })
        };
        let start = lookup(member.start)?;
        let end = lookup(member.end)?;
        let nodes = model.nodes();
        let delta = nodes[end].position.to_vector() - nodes[start].position.to_vector();
        let length = delta.norm();
        if length == 0.0 {
            return Err(ConfigurationError::ZeroLengthMember(member.id));
        }
        Ok(Self {
            start,
            end,
            length,
            cos: delta.x / length,
            sin: delta.y / length,
            stiffness: member.axial_stiffness(length),
        })
    }

    /// Global DOF indices in the order `[ux_start, uy_start, ux_end, uy_end]`.
    #[must_use]
    pub fn dofs(&self) -> [usize; 4] {
        [
            self.start * 2,
            self.start * 2 + 1,
            self.end * 2,
            self.end * 2 + 1,
        ]
    }

    /// Element stiffness matrix in global coordinates.
    #[must_use]
    pub fn element_matrix(&self) -> SMatrix<f64, 4, 4> {
        let c = self.cos;
        let s = self.sin;
        let cc = c * c;
        let cs = c * s;
        let ss = s * s;
        self.stiffness
            * SMatrix::<f64, 4, 4>::from_row_slice(&[
                cc, cs, -cc, -cs, //
                cs, ss, -cs, -ss, //
                -cc, -cs, cc, cs, //
                -cs, -ss, cs, ss,
            ])
    }
}

/// Unconstrained linear system `K·U = F` for a model.
#[derive(Clone, Debug)]
pub struct AssembledSystem {
    /// Global stiffness matrix, `2N × 2N`.
    pub stiffness: DMatrix<f64>,
    /// Global nodal load vector, length `2N`.
    pub load: DVector<f64>,
    /// Resolved geometry for every member, in model order.
    pub members: Vec<MemberGeometry>,
}

impl AssembledSystem {
    /// Number of degrees of freedom.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.load.len()
    }

    /// Largest diagonal stiffness term, the scale reference for penalties and pivots.
    #[must_use]
    pub fn max_diagonal(&self) -> f64 {
        self.stiffness
            .diagonal()
            .iter()
            .fold(0.0_f64, |max, value| max.max(value.abs()))
    }
}

/// Assemble the global stiffness matrix and load vector.
///
/// DOF `2k` and `2k + 1` are the x and y displacement of the `k`-th node.
///
/// # Errors
///
/// Returns [`AnalysisError::Configuration`] when a member references a missing
/// node or has zero length, before any matrix is allocated, and
/// [`AnalysisError::NumericOverflow`] when a stiffness term is not finite.
pub fn assemble(model: &Model) -> Result<AssembledSystem, AnalysisError> {
    let index_map = model.node_index_map();
    let members = model
        .members()
        .iter()
        .map(|member| MemberGeometry::resolve(model, &index_map, member))
        .collect::<Result<Vec<_>, _>>()?;

    let dof = model.dof_count();
    debug!(
        "assembling {dof}x{dof} stiffness matrix for {} members",
        members.len()
    );

    let mut stiffness = DMatrix::<f64>::zeros(dof, dof);
    for geometry in &members {
        let local = geometry.element_matrix();
        let dof_map = geometry.dofs();
        for (row_local, global_row) in dof_map.iter().enumerate() {
            for (col_local, global_col) in dof_map.iter().enumerate() {
                stiffness[(*global_row, *global_col)] += local[(row_local, col_local)];
            }
        }
    }

    let mut load = DVector::zeros(dof);
    for (idx, node) in model.nodes().iter().enumerate() {
        load[idx * 2] = node.load.x;
        load[idx * 2 + 1] = node.load.y;
    }

    if stiffness.iter().any(|value| !value.is_finite()) {
        return Err(AnalysisError::NumericOverflow { stage: "assembly" });
    }

    Ok(AssembledSystem {
        stiffness,
        load,
        members,
    })
}
