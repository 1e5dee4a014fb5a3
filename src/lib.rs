#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod assembly;
pub mod constraints;
mod errors;
mod geometry;
mod model;
pub mod recovery;
mod results;
pub mod solver;

pub use analysis::{analyze, analyze_with, AnalysisOptions, ConstraintMethod};
pub use errors::{
    AnalysisError, ConfigurationError, Instability, MemberPropertyError, ModelEditError,
};
pub use geometry::{force, point, Displacement, Force, Point};
pub use model::{Member, MemberId, Model, ModelBuilder, Node, NodeId, SupportType};
pub use results::{AnalysisResult, Classification, MemberResult, NodeResult, Reaction};
