//! Errors reported by mesh operations.

use crate::element::{EH, ElementKind, FH, HH, VH};
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of an [`Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed arguments: out of range or deleted handles, degenerate faces.
    InvalidInput,
    /// The requested mutation would break the consistency of the mesh.
    TopologyViolation,
    /// The mesh cannot hold any more elements of a kind.
    AllocationLimit,
    /// A property key does not refer to a live property of the expected type.
    Property,
    /// Reading or writing a mesh file failed.
    Io,
}

/// Errors that can occur when building, editing or validating a mesh.
#[derive(Debug, Error)]
pub enum Error {
    // Invalid input.
    #[error("{0} is not a vertex of this mesh")]
    InvalidVertex(VH),
    #[error("{0} is not a halfedge of this mesh")]
    InvalidHalfedge(HH),
    #[error("{0} is not an edge of this mesh")]
    InvalidEdge(EH),
    #[error("{0} is not a face of this mesh")]
    InvalidFace(FH),
    #[error("{0} has been deleted")]
    DeletedVertex(VH),
    #[error("{0} has been deleted")]
    DeletedHalfedge(HH),
    #[error("{0} has been deleted")]
    DeletedEdge(EH),
    #[error("{0} has been deleted")]
    DeletedFace(FH),
    #[error("A face needs at least 3 vertices, {0} were given")]
    TooFewVertices(usize),
    #[error("{0} appears more than once in the face")]
    RepeatedVertex(VH),
    #[error("{0} must be isolated to be inserted")]
    VertexNotIsolated(VH),

    // Topology violations.
    #[error("{0} is not a boundary vertex, adding a face on it would make it complex")]
    ComplexVertex(VH),
    #[error("{0} already has a face, adding another would make it complex")]
    ComplexHalfedge(HH),
    #[error("Unable to relink the patches around the new face")]
    PatchRelinkingFailed,
    #[error("Collapsing {0} would break the topology")]
    CollapseNotAllowed(HH),
    #[error("Flipping {0} would break the topology")]
    FlipNotAllowed(EH),
    #[error("Removing {0} would break the topology")]
    RemovalNotAllowed(EH),
    #[error("Cannot insert an edge between {0} and {1}")]
    EdgeInsertionNotAllowed(HH, HH),

    // Validation failures reported by `check_topology`.
    #[error("The outgoing halfedges of {0} do not form a single fan")]
    InvalidOutgoingHalfedges(VH),
    #[error("{0} is a boundary vertex, but its outgoing halfedge is interior")]
    OutgoingHalfedgeNotBoundary(VH),
    #[error("{0} starts and ends at the same vertex")]
    DegenerateHalfedge(HH),
    #[error("The next and previous links of {0} do not agree")]
    InvalidHalfedgeLink(HH),
    #[error("{0} cannot be found around its head and tail vertices")]
    InvalidHalfedgeVertexLink(HH),
    #[error("The loop through {0} is broken")]
    InvalidLoopTopology(HH),
    #[error("The halfedges in the loop of {0} do not share the same face")]
    InconsistentFaceInLoop(HH),
    #[error("{0} and its halfedge {1} do not point at each other")]
    InvalidFaceHalfedgeLink(FH, HH),
    #[error("{0} refers to the deleted element {1}")]
    DanglingReference(String, String),

    // Allocation.
    #[error("Cannot allocate any more elements of kind {0}")]
    AllocationLimit(ElementKind),

    // Properties.
    #[error("The property '{0}' does not exist")]
    PropertyDoesNotExist(String),

    // IO.
    #[error("The mesh must be garbage collected before it can be written")]
    GarbageCollectionRequired,
    #[error("Unable to load OBJ file {path:?}: {reason}")]
    ObjLoadFailed { path: PathBuf, reason: String },
    #[error("Expected vertex coordinates in triplets, found {0} values")]
    IncorrectNumberOfCoordinates(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            InvalidVertex(_) | InvalidHalfedge(_) | InvalidEdge(_) | InvalidFace(_)
            | DeletedVertex(_) | DeletedHalfedge(_) | DeletedEdge(_) | DeletedFace(_)
            | TooFewVertices(_) | RepeatedVertex(_) | VertexNotIsolated(_) => {
                ErrorKind::InvalidInput
            }
            ComplexVertex(_)
            | ComplexHalfedge(_)
            | PatchRelinkingFailed
            | CollapseNotAllowed(_)
            | FlipNotAllowed(_)
            | RemovalNotAllowed(_)
            | EdgeInsertionNotAllowed(_, _)
            | InvalidOutgoingHalfedges(_)
            | OutgoingHalfedgeNotBoundary(_)
            | DegenerateHalfedge(_)
            | InvalidHalfedgeLink(_)
            | InvalidHalfedgeVertexLink(_)
            | InvalidLoopTopology(_)
            | InconsistentFaceInLoop(_)
            | InvalidFaceHalfedgeLink(_, _)
            | DanglingReference(_, _) => ErrorKind::TopologyViolation,
            AllocationLimit(_) => ErrorKind::AllocationLimit,
            PropertyDoesNotExist(_) => ErrorKind::Property,
            GarbageCollectionRequired
            | ObjLoadFailed { .. }
            | IncorrectNumberOfCoordinates(_)
            | Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};
    use crate::element::{ElementKind, VH};

    #[test]
    fn t_error_display() {
        let err = Error::TooFewVertices(2);
        assert_eq!(format!("{err}"), "A face needs at least 3 vertices, 2 were given");
        let err = Error::RepeatedVertex(VH::from(4));
        assert!(format!("{err}").contains("VH(4)"));
    }

    #[test]
    fn t_error_kind() {
        assert_eq!(Error::DeletedVertex(1.into()).kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::ComplexVertex(1.into()).kind(), ErrorKind::TopologyViolation);
        assert_eq!(
            Error::AllocationLimit(ElementKind::Face).kind(),
            ErrorKind::AllocationLimit
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(Error::from(io).kind(), ErrorKind::Io);
    }
}
