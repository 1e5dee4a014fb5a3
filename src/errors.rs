//! Error types produced while editing or analysing trusses.

use thiserror::Error;

use crate::model::{MemberId, NodeId};

/// Error returned when a truss analysis fails.
///
/// No partial results accompany any of these variants.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// The model is structurally or referentially invalid.
    #[error("invalid model: {0}")]
    Configuration(#[from] ConfigurationError),
    /// The truss is kinematically unstable or under-constrained.
    #[error("stiffness matrix is singular: {0}")]
    SingularSystem(#[from] Instability),
    /// An intermediate value left the finite floating-point range.
    #[error("numeric overflow during {stage}")]
    NumericOverflow {
        /// Pipeline stage that produced the non-finite value.
        stage: &'static str,
    },
}

/// Structural or referential defect found before any matrix work.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// Returned when the model has no nodes or no members.
    #[error(
        "model needs at least one node and one member (found {nodes} nodes, {members} members)"
    )]
    EmptyModel {
        /// Number of nodes supplied.
        nodes: usize,
        /// Number of members supplied.
        members: usize,
    },
    /// Returned when two nodes share an id.
    #[error("node id {0} is used more than once")]
    DuplicateNode(NodeId),
    /// Returned when two members share an id.
    #[error("member id {0} is used more than once")]
    DuplicateMember(MemberId),
    /// Returned when a member references a node that does not exist.
    #[error("member {member} references unknown node {node}")]
    UnknownNode {
        /// Offending member.
        member: MemberId,
        /// Missing node id.
        node: NodeId,
    },
    /// Returned when both ends of a member are the same node.
    #[error("member {0} connects a node to itself")]
    SelfConnectedMember(MemberId),
    /// Returned when a member spans zero distance.
    #[error("member {0} has zero length")]
    ZeroLengthMember(MemberId),
    /// Returned when the supplied properties for a member are not physically meaningful.
    #[error("member {member} has invalid properties: {source}")]
    InvalidMemberProperties {
        /// Identifier of the offending member.
        member: MemberId,
        /// Description of the invalid property.
        #[source]
        source: MemberPropertyError,
    },
    /// Returned when a coordinate or load is NaN or infinite.
    #[error("{field} of node {node} is not finite")]
    NonFiniteValue {
        /// Node carrying the value.
        node: NodeId,
        /// Name of the field.
        field: &'static str,
    },
}

/// Reason a member's section or material values are rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MemberPropertyError {
    /// Returned when the cross-sectional area is zero, negative or not finite.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area.
        area: f64,
    },
    /// Returned when the elastic modulus is zero, negative or not finite.
    #[error("elastic modulus must be positive (received {elastic_modulus})")]
    NonPositiveElasticModulus {
        /// Rejected elastic modulus.
        elastic_modulus: f64,
    },
    /// Returned when the yield strength is NaN or infinite.
    #[error("yield strength must be finite (received {yield_strength})")]
    NonFiniteYieldStrength {
        /// Rejected yield strength.
        yield_strength: f64,
    },
}

/// Why the constrained stiffness system cannot be solved.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum Instability {
    /// A connected part of the truss has fewer than three restraint components.
    #[error(
        "node {component} and its connected members have only {restraints} restraint components"
    )]
    InsufficientRestraints {
        /// Lowest node id of the affected connected part.
        component: NodeId,
        /// Number of restrained degrees of freedom found.
        restraints: usize,
    },
    /// Every restraint acts vertically, so the part can slide horizontally.
    #[error("node {component} and its connected members have no horizontal restraint")]
    ParallelRestraints {
        /// Lowest node id of the affected connected part.
        component: NodeId,
    },
    /// Every restraint line passes through one point, so the part can rotate.
    #[error("restraints of node {component} and its connected members are concurrent")]
    ConcurrentRestraints {
        /// Lowest node id of the affected connected part.
        component: NodeId,
    },
    /// Elimination hit a pivot at or below the tolerance.
    #[error("zero pivot at degree of freedom {dof}; check supports and connectivity")]
    ZeroPivot {
        /// Global degree-of-freedom index of the pivot.
        dof: usize,
    },
}

/// Error returned when editing a [`ModelBuilder`](crate::ModelBuilder) with invalid input.
///
/// # Examples
///
/// ```
/// use planar_truss::{ModelBuilder, ModelEditError, NodeId};
///
/// let mut builder = ModelBuilder::new();
/// let error = builder
///     .set_load(NodeId(42), planar_truss::force(1.0, 0.0))
///     .expect_err("unknown node is rejected");
/// assert_eq!(error, ModelEditError::UnknownNode(NodeId(42)));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelEditError {
    /// Returned when a node cannot be found in the model.
    #[error("node {0} does not exist in this model")]
    UnknownNode(NodeId),
    /// Returned when a member cannot be found in the model.
    #[error("member {0} does not exist in this model")]
    UnknownMember(MemberId),
    /// Returned when a node id is already taken.
    #[error("node {0} already exists in this model")]
    DuplicateNode(NodeId),
    /// Returned when a member id is already taken.
    #[error("member {0} already exists in this model")]
    DuplicateMember(MemberId),
    /// Returned when a member would connect a node to itself.
    #[error("member {0} connects a node to itself")]
    SelfConnectedMember(MemberId),
    /// Returned when the supplied member properties are invalid.
    #[error("{0}")]
    InvalidMemberProperties(MemberPropertyError),
}
