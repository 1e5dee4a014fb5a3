//! Immutable description of a planar truss and a builder for authoring one.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, MemberPropertyError, ModelEditError};
use crate::geometry::{Force, Point};

/// Identifier of a node, unique within a [`Model`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Identifier of a member, unique within a [`Model`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Support condition at a node.
///
/// Rollers always restrain the vertical direction; inclined rollers are not modelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportType {
    /// No restraint.
    #[default]
    Free,
    /// Both translations restrained.
    Pin,
    /// Vertical translation restrained.
    Roller,
}

impl SupportType {
    /// Restraint flags for the X and Y directions respectively.
    #[must_use]
    pub const fn restraints(self) -> [bool; 2] {
        match self {
            SupportType::Free => [false, false],
            SupportType::Pin => [true, true],
            SupportType::Roller => [false, true],
        }
    }
}

impl fmt::Display for SupportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SupportType::Free => "free",
            SupportType::Pin => "pin",
            SupportType::Roller => "roller",
        };
        f.write_str(name)
    }
}

/// A pin joint of the truss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Position of the node.
    #[serde(flatten)]
    pub position: Point,
    /// Support condition.
    #[serde(default)]
    pub support: SupportType,
    /// External point load applied to the node.
    #[serde(default)]
    pub load: Force,
}

impl Node {
    /// Create an unloaded, unsupported node.
    #[must_use]
    pub fn new(id: NodeId, position: Point) -> Self {
        Self {
            id,
            position,
            support: SupportType::Free,
            load: Force::default(),
        }
    }

    /// Return the node with the given support condition.
    #[must_use]
    pub fn with_support(mut self, support: SupportType) -> Self {
        self.support = support;
        self
    }

    /// Return the node with the given applied load.
    #[must_use]
    pub fn with_load(mut self, load: Force) -> Self {
        self.load = load;
        self
    }
}

/// A two-node axial member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier.
    pub id: MemberId,
    /// Node at the start of the member.
    pub start: NodeId,
    /// Node at the end of the member.
    pub end: NodeId,
    /// Cross-sectional area.
    pub area: f64,
    /// Elastic modulus.
    pub elastic_modulus: f64,
    /// Optional yield strength, in the same unit as the modulus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_strength: Option<f64>,
}

impl Member {
    /// Create a member without a yield strength.
    #[must_use]
    pub fn new(id: MemberId, start: NodeId, end: NodeId, area: f64, elastic_modulus: f64) -> Self {
        Self {
            id,
            start,
            end,
            area,
            elastic_modulus,
            yield_strength: None,
        }
    }

    /// Return the member with the given yield strength.
    #[must_use]
    pub fn with_yield_strength(mut self, yield_strength: f64) -> Self {
        self.yield_strength = Some(yield_strength);
        self
    }

    /// Axial stiffness `E·A/L` for a member of the given length.
    #[must_use]
    pub fn axial_stiffness(&self, length: f64) -> f64 {
        self.elastic_modulus * self.area / length
    }
}

/// Snapshot of a truss submitted for analysis.
///
/// Node order defines degree-of-freedom numbering: node `k` owns DOFs `2k`
/// (x) and `2k + 1` (y).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Nodes in DOF order.
    nodes: Vec<Node>,
    /// Members in result order.
    members: Vec<Member>,
}

impl Model {
    /// Create a model from node and member lists.
    ///
    /// No validation happens here; analysis validates the model it receives.
    #[must_use]
    pub fn new(nodes: Vec<Node>, members: Vec<Member>) -> Self {
        Self { nodes, members }
    }

    /// Nodes in DOF order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Members in input order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of degrees of freedom, two per node.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.nodes.len() * 2
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Look up a member by id.
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Copy of the model with every nodal load multiplied by `factor`.
    #[must_use]
    pub fn with_scaled_loads(&self, factor: f64) -> Self {
        let nodes = self
            .nodes
            .iter()
            .cloned()
            .map(|node| {
                let load = node.load.scaled(factor);
                node.with_load(load)
            })
            .collect();
        Self {
            nodes,
            members: self.members.clone(),
        }
    }

    /// Map from node id to its position in the node list.
    pub(crate) fn node_index_map(&self) -> HashMap<NodeId, usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect()
    }

    /// Check the structural and referential invariants of the model.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.nodes.is_empty() || self.members.is_empty() {
            return Err(ConfigurationError::EmptyModel {
                nodes: self.nodes.len(),
                members: self.members.len(),
            });
        }

        let mut positions = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let values = [
                ("x", node.position.x),
                ("y", node.position.y),
                ("load x", node.load.x),
                ("load y", node.load.y),
            ];
            if let Some(&(field, _)) = values.iter().find(|(_, value)| !value.is_finite()) {
                return Err(ConfigurationError::NonFiniteValue {
                    node: node.id,
                    field,
                });
            }
            if positions.insert(node.id, node.position).is_some() {
                return Err(ConfigurationError::DuplicateNode(node.id));
            }
        }

        let mut member_ids = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            if !member_ids.insert(member.id) {
                return Err(ConfigurationError::DuplicateMember(member.id));
            }
            let start = endpoint(&positions, member, member.start)?;
            let end = endpoint(&positions, member, member.end)?;
            if member.start == member.end {
                return Err(ConfigurationError::SelfConnectedMember(member.id));
            }
            check_properties(member.area, member.elastic_modulus)
                .and_then(|()| check_yield_strength(member.yield_strength))
                .map_err(|source| ConfigurationError::InvalidMemberProperties {
                    member: member.id,
                    source,
                })?;
            if start.distance_to(end) == 0.0 {
                return Err(ConfigurationError::ZeroLengthMember(member.id));
            }
        }
        Ok(())
    }
}

/// Resolve one end of a member to its position.
fn endpoint(
    positions: &HashMap<NodeId, Point>,
    member: &Member,
    node: NodeId,
) -> Result<Point, ConfigurationError> {
    positions
        .get(&node)
        .copied()
        .ok_or(ConfigurationError::UnknownNode {
            member: member.id,
            node,
        })
}

/// Reject non-positive or non-finite section and material values.
fn check_properties(area: f64, elastic_modulus: f64) -> Result<(), MemberPropertyError> {
    if !(area.is_finite() && area > 0.0) {
        return Err(MemberPropertyError::NonPositiveArea { area });
    }
    if !(elastic_modulus.is_finite() && elastic_modulus > 0.0) {
        return Err(MemberPropertyError::NonPositiveElasticModulus { elastic_modulus });
    }
    Ok(())
}

/// Reject a yield strength that would turn every factor of safety into NaN.
fn check_yield_strength(yield_strength: Option<f64>) -> Result<(), MemberPropertyError> {
    match yield_strength {
        Some(value) if !value.is_finite() => Err(MemberPropertyError::NonFiniteYieldStrength {
            yield_strength: value,
        }),
        _ => Ok(()),
    }
}

/// Incremental editor producing a [`Model`].
///
/// # Examples
/// ```
/// use planar_truss::{force, point, MemberId, ModelBuilder, NodeId, SupportType};
///
/// let mut builder = ModelBuilder::new();
/// let a = builder.add_node(NodeId(1), point(0.0, 0.0))?;
/// let b = builder.add_node(NodeId(2), point(1000.0, 0.0))?;
/// builder.set_support(a, SupportType::Pin)?;
/// builder.set_support(b, SupportType::Roller)?;
/// builder.set_load(b, force(5.0, 0.0))?;
/// builder.add_member(MemberId(1), a, b, 100.0, 200_000.0)?;
///
/// let model = builder.build();
/// assert_eq!(model.nodes().len(), 2);
/// # Ok::<(), planar_truss::ModelEditError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModelBuilder {
    /// Nodes added so far.
    nodes: Vec<Node>,
    /// Members added so far.
    members: Vec<Member>,
}

impl ModelBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing model, e.g. to edit and resubmit it.
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        Self {
            nodes: model.nodes.clone(),
            members: model.members.clone(),
        }
    }

    /// Return the number of nodes added so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of members added so far.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Add a free, unloaded node.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::DuplicateNode`] when `id` is already used.
    pub fn add_node(&mut self, id: NodeId, position: Point) -> Result<NodeId, ModelEditError> {
        if self.nodes.iter().any(|node| node.id == id) {
            return Err(ModelEditError::DuplicateNode(id));
        }
        self.nodes.push(Node::new(id, position));
        Ok(id)
    }

    /// Update the position of an existing node.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when `id` is not part of this model.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> Result<(), ModelEditError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Remove a node and every member connected to it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when `id` is not part of this model.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), ModelEditError> {
        let index = self
            .nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or(ModelEditError::UnknownNode(id))?;
        self.nodes.remove(index);
        self.members.retain(|member| member.start != id && member.end != id);
        Ok(())
    }

    /// Set the support condition of a node.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when `id` is not part of this model.
    pub fn set_support(&mut self, id: NodeId, support: SupportType) -> Result<(), ModelEditError> {
        self.node_mut(id)?.support = support;
        Ok(())
    }

    /// Apply a point load to a node, replacing any previous load.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownNode`] when `id` is not part of this model.
    pub fn set_load(&mut self, id: NodeId, load: Force) -> Result<(), ModelEditError> {
        self.node_mut(id)?.load = load;
        Ok(())
    }

    /// Connect two existing nodes with a new member.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::DuplicateMember`] for a reused id,
    /// [`ModelEditError::UnknownNode`] for a missing endpoint,
    /// [`ModelEditError::SelfConnectedMember`] when `start == end` and
    /// [`ModelEditError::InvalidMemberProperties`] for non-positive properties.
    pub fn add_member(
        &mut self,
        id: MemberId,
        start: NodeId,
        end: NodeId,
        area: f64,
        elastic_modulus: f64,
    ) -> Result<MemberId, ModelEditError> {
        if self.members.iter().any(|member| member.id == id) {
            return Err(ModelEditError::DuplicateMember(id));
        }
        for node in [start, end] {
            if !self.nodes.iter().any(|candidate| candidate.id == node) {
                return Err(ModelEditError::UnknownNode(node));
            }
        }
        if start == end {
            return Err(ModelEditError::SelfConnectedMember(id));
        }
        check_properties(area, elastic_modulus).map_err(ModelEditError::InvalidMemberProperties)?;
        self.members.push(Member::new(id, start, end, area, elastic_modulus));
        Ok(id)
    }

    /// Remove a member.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownMember`] when `id` is not part of this model.
    pub fn remove_member(&mut self, id: MemberId) -> Result<(), ModelEditError> {
        let index = self
            .members
            .iter()
            .position(|member| member.id == id)
            .ok_or(ModelEditError::UnknownMember(id))?;
        self.members.remove(index);
        Ok(())
    }

    /// Set the section area and elastic modulus of a member.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownMember`] when `id` is not part of this model and
    /// [`ModelEditError::InvalidMemberProperties`] when either value is not strictly positive.
    pub fn set_member_properties(
        &mut self,
        id: MemberId,
        area: f64,
        elastic_modulus: f64,
    ) -> Result<(), ModelEditError> {
        let member = self.member_mut(id)?;
        check_properties(area, elastic_modulus).map_err(ModelEditError::InvalidMemberProperties)?;
        member.area = area;
        member.elastic_modulus = elastic_modulus;
        Ok(())
    }

    /// Assign a yield strength to a member.
    ///
    /// # Errors
    ///
    /// Returns [`ModelEditError::UnknownMember`] when `id` is not part of this model and
    /// [`ModelEditError::InvalidMemberProperties`] when the value is NaN or infinite.
    pub fn set_member_yield_strength(
        &mut self,
        id: MemberId,
        yield_strength: f64,
    ) -> Result<(), ModelEditError> {
        let member = self.member_mut(id)?;
        check_yield_strength(Some(yield_strength))
            .map_err(ModelEditError::InvalidMemberProperties)?;
        member.yield_strength = Some(yield_strength);
        Ok(())
    }

    /// Freeze the current state into a [`Model`].
    #[must_use]
    pub fn build(&self) -> Model {
        Model::new(self.nodes.clone(), self.members.clone())
    }

    /// Mutable access to a node by id.
    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, ModelEditError> {
        self.nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or(ModelEditError::UnknownNode(id))
    }

    /// Mutable access to a member by id.
    fn member_mut(&mut self, id: MemberId) -> Result<&mut Member, ModelEditError> {
        self.members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or(ModelEditError::UnknownMember(id))
    }
}
