//! Contract violations reported by graph mutations.

use super::ids::{CircleId, LineId, NoteId, PointId, PolygonId};
use super::types::ElementKind;

/// Errors surfaced by `ElementGraph` mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown point {0}")]
    UnknownPoint(PointId),
    #[error("unknown line segment {0}")]
    UnknownLine(LineId),
    #[error("unknown polygon {0}")]
    UnknownPolygon(PolygonId),
    #[error("unknown note {0}")]
    UnknownNote(NoteId),
    #[error("unknown circle {0}")]
    UnknownCircle(CircleId),
    /// A polygon would have fewer than 3 distinct vertices.
    #[error("polygon needs at least 3 distinct vertices, got {distinct}")]
    TooFewVertices { distinct: usize },
    #[error("{kind} id {id} is already in use")]
    DuplicateId { kind: ElementKind, id: String },
    #[error("note link target {kind} {id} does not exist")]
    UnknownLinkTarget { kind: ElementKind, id: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
