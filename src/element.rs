use crate::{
    iterator,
    mesh::{Adaptor, PolyMeshT},
    topol::Topology,
};
use std::fmt::{Debug, Display};

/// Sentinel index. No element of any table ever has this index, which also
/// makes it the upper bound on the number of elements of one kind.
pub const INVALID_INDEX: u32 = u32::MAX;

/// The four kinds of mesh elements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Halfedge,
    Edge,
    Face,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementKind::Vertex => "vertex",
            ElementKind::Halfedge => "halfedge",
            ElementKind::Edge => "edge",
            ElementKind::Face => "face",
        };
        write!(f, "{}", name)
    }
}

/**
 * All elements of the mesh implement this trait. They are identified by their
 * index. The default value of every handle is the invalid sentinel.
 */
pub trait Handle: Copy + Eq + Default + From<u32> + Display + 'static {
    /// The kind of element this handle refers to.
    const KIND: ElementKind;

    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

macro_rules! impl_handle {
    ($type:ident, $kind:ident, $label:literal) => {
        impl Handle for $type {
            const KIND: ElementKind = ElementKind::$kind;

            fn index(&self) -> u32 {
                self.idx
            }
        }

        impl From<u32> for $type {
            fn from(idx: u32) -> Self {
                $type { idx }
            }
        }

        impl From<&u32> for $type {
            fn from(idx: &u32) -> Self {
                $type { idx: *idx }
            }
        }

        impl Default for $type {
            fn default() -> Self {
                $type { idx: INVALID_INDEX }
            }
        }

        impl Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.idx == INVALID_INDEX {
                    write!(f, concat!($label, "(invalid)"))
                } else {
                    write!(f, concat!($label, "({})"), self.idx)
                }
            }
        }

        impl Debug for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                Display::fmt(self, f)
            }
        }
    };
}

/**
 * Vertex handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VH {
    idx: u32,
}

/**
 * Halfedge handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HH {
    idx: u32,
}

/**
 * Edge handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EH {
    idx: u32,
}

/**
 * Face handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FH {
    idx: u32,
}

impl_handle!(VH, Vertex, "VH");
impl_handle!(HH, Halfedge, "HH");
impl_handle!(EH, Edge, "EH");
impl_handle!(FH, Face, "FH");

/// Anything that can expose the connectivity of a mesh.
pub trait HasTopology {
    fn topology(&self) -> &Topology;
}

impl HasTopology for Topology {
    fn topology(&self) -> &Topology {
        self
    }
}

impl<const DIM: usize, A> HasTopology for PolyMeshT<DIM, A>
where
    A: Adaptor<DIM>,
{
    fn topology(&self) -> &Topology {
        &self.topol
    }
}

impl VH {
    pub fn halfedge(self, mesh: &impl HasTopology) -> Option<HH> {
        mesh.topology().vertex_halfedge(self)
    }

    /// Check if this vertex is valid for the `mesh`.
    ///
    /// The index has to be less than the number of vertices in the mesh.
    pub fn is_valid(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_valid_vertex(self)
    }

    pub fn is_deleted(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_deleted_vertex(self)
    }

    /// Check if this vertex is manifold.
    ///
    /// A vertex is manifold if it has at most 1 outgoing boundary halfedge.
    /// ```text
    ///    .......|     .......|.......     ....\     /...
    ///    .......|     .......|.......     .....\   /....
    ///    .......|     .......|.......     ......\ /.....
    ///    -------v     -------v-------     -------v------
    ///    .......|     .......|.......     ....../ \.....
    ///    .......|     .......|.......     ...../   \....
    ///    .......|     .......|.......     ..../     \...
    ///    Manifold     Manifold            Not manifold
    /// ```
    pub fn is_manifold(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_manifold_vertex(self)
    }

    /// Check if this vertex is on the boundary of the `mesh`. Isolated
    /// vertices count as boundary vertices.
    pub fn is_boundary(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_boundary_vertex(self)
    }

    pub fn is_isolated(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_isolated_vertex(self)
    }

    /// The number of edges incident on this vertex.
    pub fn valence(self, mesh: &impl HasTopology) -> usize {
        iterator::voh_ccw_iter(mesh.topology(), self).count()
    }
}

impl HH {
    /// The vertex this halfedge points to.
    pub fn head(self, mesh: &impl HasTopology) -> VH {
        mesh.topology().to_vertex(self)
    }

    /// The vertex this halfedge starts from.
    pub fn tail(self, mesh: &impl HasTopology) -> VH {
        mesh.topology().from_vertex(self)
    }

    pub fn opposite(self) -> HH {
        (self.idx ^ 1).into()
    }

    pub fn prev(self, mesh: &impl HasTopology) -> HH {
        mesh.topology().prev_halfedge(self)
    }

    pub fn next(self, mesh: &impl HasTopology) -> HH {
        mesh.topology().next_halfedge(self)
    }

    pub fn face(self, mesh: &impl HasTopology) -> Option<FH> {
        mesh.topology().halfedge_face(self)
    }

    pub fn edge(self) -> EH {
        (self.idx >> 1).into()
    }

    /// Check if this halfedge is valid for the `mesh`.
    ///
    /// The index has to be less than the number of halfedges in the mesh.
    pub fn is_valid(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_valid_halfedge(self)
    }

    pub fn is_deleted(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_deleted_halfedge(self)
    }

    /// Check if this halfedge is on the boundary of `mesh`.
    ///
    /// A halfedge is considered interior if it has a face incident on it.
    pub fn is_boundary(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_boundary_halfedge(self)
    }

    /// The next outgoing halfedge of the tail vertex, in counter-clockwise order.
    pub fn rotate_ccw(self, mesh: &impl HasTopology) -> HH {
        mesh.topology().ccw_rotated_halfedge(self)
    }

    /// The next outgoing halfedge of the tail vertex, in clockwise order.
    pub fn rotate_cw(self, mesh: &impl HasTopology) -> HH {
        mesh.topology().cw_rotated_halfedge(self)
    }
}

impl EH {
    pub fn halfedges(self) -> (HH, HH) {
        let hi = self.idx << 1;
        (hi.into(), (hi | 1).into())
    }

    pub fn halfedge(self, flag: bool) -> HH {
        ((self.idx << 1) | if flag { 1 } else { 0 }).into()
    }

    /// The two vertices of this edge.
    pub fn vertices(self, mesh: &impl HasTopology) -> (VH, VH) {
        let (h, oh) = self.halfedges();
        (h.head(mesh), oh.head(mesh))
    }

    /// Check if this edge is valid for the `mesh`.
    ///
    /// The index has to be less than the number of edges in the mesh.
    pub fn is_valid(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_valid_edge(self)
    }

    pub fn is_deleted(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_deleted_edge(self)
    }

    /// Check if the edge is a boundary edge.
    ///
    /// An edge is considered interior if it has two faces incident on both of it's halfedges.
    pub fn is_boundary(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_boundary_edge(self)
    }
}

impl FH {
    pub fn halfedge(self, mesh: &impl HasTopology) -> HH {
        mesh.topology().face_halfedge(self)
    }

    /// Check if this face is valid for the `mesh`.
    ///
    /// The index has to be less than the number of faces in the mesh.
    pub fn is_valid(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_valid_face(self)
    }

    pub fn is_deleted(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_deleted_face(self)
    }

    /// A face is on the boundary if any of its edges is on the boundary.
    pub fn is_boundary(self, mesh: &impl HasTopology) -> bool {
        mesh.topology().is_boundary_face(self)
    }

    /// Number of sides of this face.
    pub fn valence(self, mesh: &impl HasTopology) -> usize {
        mesh.topology().face_valence(self)
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Vertex {
    pub(crate) halfedge: Option<HH>,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Halfedge {
    pub(crate) face: Option<FH>,
    pub(crate) vertex: VH,
    pub(crate) next: HH,
    pub(crate) prev: HH,
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Edge {
    pub(crate) halfedges: [Halfedge; 2],
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Face {
    pub(crate) halfedge: HH,
}
