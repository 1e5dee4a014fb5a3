//! Result records handed back to callers once an analysis completes.

use std::fmt;

use serde::Serialize;

use crate::geometry::Displacement;
use crate::model::{MemberId, NodeId};

/// Whether a member is stretched or shortened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    /// Positive axial force.
    Tension,
    /// Zero or negative axial force.
    Compression,
}

impl Classification {
    /// Classify an axial force by its sign.
    #[must_use]
    pub fn from_force(force: f64) -> Self {
        if force > 0.0 {
            Classification::Tension
        } else {
            Classification::Compression
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Tension => f.write_str("Tension"),
            Classification::Compression => f.write_str("Compression"),
        }
    }
}

/// Axial response of one member.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemberResult {
    /// Member identifier.
    pub id: MemberId,
    /// Axial force, positive in tension.
    pub force: f64,
    /// Axial stress, `force / area`.
    pub stress: f64,
    /// Tension or compression.
    pub classification: Classification,
    /// `|yield strength| / |stress|` when a yield strength was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_of_safety: Option<f64>,
}

/// Displacement of one node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeResult {
    /// Node identifier.
    pub id: NodeId,
    /// Displacement along X.
    pub dx: f64,
    /// Displacement along Y.
    pub dy: f64,
}

impl NodeResult {
    /// Displacement as a vector type.
    #[must_use]
    pub fn displacement(&self) -> Displacement {
        Displacement::new(self.dx, self.dy)
    }
}

/// Support force at a restrained node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reaction {
    /// Node identifier.
    pub id: NodeId,
    /// Reaction along X, zero when X is unrestrained.
    pub rx: f64,
    /// Reaction along Y.
    pub ry: f64,
}

/// Complete outcome of a successful analysis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// One record per member, in model order.
    pub members: Vec<MemberResult>,
    /// One record per node, in model order.
    pub nodes: Vec<NodeResult>,
    /// One record per supported node, in model order.
    pub reactions: Vec<Reaction>,
}

impl AnalysisResult {
    /// Combine per-member, per-node and per-support records.
    #[must_use]
    pub fn new(
        members: Vec<MemberResult>,
        nodes: Vec<NodeResult>,
        reactions: Vec<Reaction>,
    ) -> Self {
        Self {
            members,
            nodes,
            reactions,
        }
    }

    /// Result for a member, if it exists.
    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&MemberResult> {
        self.members.iter().find(|member| member.id == id)
    }

    /// Result for a node, if it exists.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeResult> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Reaction at a supported node.
    #[must_use]
    pub fn reaction(&self, id: NodeId) -> Option<&Reaction> {
        self.reactions.iter().find(|reaction| reaction.id == id)
    }

    /// Member with the largest absolute stress.
    #[must_use]
    pub fn max_stress_member(&self) -> Option<&MemberResult> {
        self.members
            .iter()
            .max_by(|a, b| a.stress.abs().total_cmp(&b.stress.abs()))
    }

    /// Member with the smallest factor of safety among those that have one.
    #[must_use]
    pub fn min_factor_of_safety_member(&self) -> Option<&MemberResult> {
        self.members
            .iter()
            .filter_map(|member| member.factor_of_safety.map(|fos| (fos, member)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, member)| member)
    }

    /// Node with the largest displacement magnitude.
    #[must_use]
    pub fn max_displacement(&self) -> Option<&NodeResult> {
        self.nodes.iter().max_by(|a, b| {
            a.displacement()
                .magnitude()
                .total_cmp(&b.displacement().magnitude())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: u32, force: f64, factor_of_safety: Option<f64>) -> MemberResult {
        MemberResult {
            id: MemberId(id),
            force,
            stress: force / 10.0,
            classification: Classification::from_force(force),
            factor_of_safety,
        }
    }

    #[test]
    fn classification_follows_force_sign() {
        assert_eq!(Classification::from_force(3.0), Classification::Tension);
        assert_eq!(Classification::from_force(-3.0), Classification::Compression);
        assert_eq!(Classification::from_force(0.0), Classification::Compression);
        assert_eq!(Classification::Tension.to_string(), "Tension");
    }

    #[test]
    fn extreme_members_are_found() {
        let result = AnalysisResult::new(
            vec![
                member(1, 5.0, Some(8.0)),
                member(2, -40.0, None),
                member(3, 20.0, Some(2.0)),
            ],
            vec![
                NodeResult {
                    id: NodeId(1),
                    dx: 0.0,
                    dy: 0.0,
                },
                NodeResult {
                    id: NodeId(2),
                    dx: 0.3,
                    dy: -0.4,
                },
            ],
            Vec::new(),
        );

        assert_eq!(result.max_stress_member().map(|m| m.id), Some(MemberId(2)));
        assert_eq!(
            result.min_factor_of_safety_member().map(|m| m.id),
            Some(MemberId(3))
        );
        assert_eq!(result.max_displacement().map(|n| n.id), Some(NodeId(2)));
        assert!(result.member(MemberId(4)).is_none());
        assert!(result.reaction(NodeId(1)).is_none());
    }

    #[test]
    fn serializes_classification_by_name() {
        let json = serde_json::to_value(member(7, -1.0, None)).expect("serializable");
        assert_eq!(json["classification"], "Compression");
        assert_eq!(json["id"], 7);
        assert!(json.get("factor_of_safety").is_none());
    }
}
