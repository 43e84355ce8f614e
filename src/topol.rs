use std::ops::Range;

use crate::{
    element::{EH, Edge, ElementKind, FH, Face, HH, Halfedge, Handle, INVALID_INDEX, VH, Vertex},
    error::Error,
    iterator,
    property::{PropBuf, Property, PropertyContainer, TPropData},
};

/// Largest number of vertices or faces a mesh can hold.
const MAX_ELEMENTS: usize = INVALID_INDEX as usize;
/// Largest number of edges a mesh can hold. Both halfedges of the last edge
/// must have indices below the sentinel.
const MAX_EDGES: usize = (INVALID_INDEX >> 1) as usize;

/// Scratch space reused across topological edits, to avoid allocating on every
/// call.
#[derive(Default)]
pub struct TopolCache {
    pub(crate) loop_halfedges: Vec<Option<HH>>,
    pub(crate) is_new: Vec<bool>,
    pub(crate) needs_adjust: Vec<bool>,
    pub(crate) next_cache: Vec<(HH, HH)>,
    pub(crate) halfedges: Vec<HH>,
    pub(crate) vertices: Vec<VH>,
    pub(crate) edges: Vec<EH>,
    pub(crate) faces: Vec<FH>,
    pub(crate) vmap: Vec<u32>,
    pub(crate) emap: Vec<u32>,
    pub(crate) fmap: Vec<u32>,
}

impl TopolCache {
    fn clear(&mut self) {
        self.loop_halfedges.clear();
        self.is_new.clear();
        self.needs_adjust.clear();
        self.next_cache.clear();
        self.halfedges.clear();
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
    }
}

/// Element kinds that carry a property container.
pub trait ElementProperties: Handle {
    fn properties(topol: &Topology) -> &PropertyContainer<Self>;

    fn properties_mut(topol: &mut Topology) -> &mut PropertyContainer<Self>;
}

impl ElementProperties for VH {
    fn properties(topol: &Topology) -> &PropertyContainer<Self> {
        &topol.vprops
    }

    fn properties_mut(topol: &mut Topology) -> &mut PropertyContainer<Self> {
        &mut topol.vprops
    }
}

impl ElementProperties for HH {
    fn properties(topol: &Topology) -> &PropertyContainer<Self> {
        &topol.hprops
    }

    fn properties_mut(topol: &mut Topology) -> &mut PropertyContainer<Self> {
        &mut topol.hprops
    }
}

impl ElementProperties for EH {
    fn properties(topol: &Topology) -> &PropertyContainer<Self> {
        &topol.eprops
    }

    fn properties_mut(topol: &mut Topology) -> &mut PropertyContainer<Self> {
        &mut topol.eprops
    }
}

impl ElementProperties for FH {
    fn properties(topol: &Topology) -> &PropertyContainer<Self> {
        &topol.fprops
    }

    fn properties_mut(topol: &mut Topology) -> &mut PropertyContainer<Self> {
        &mut topol.fprops
    }
}

/// The connectivity of a polygon mesh, represented as a halfedge graph.
///
/// Elements are never physically removed by editing operations. They are
/// flagged as deleted instead, and skipped by the element iterators, until
/// [`Topology::garbage_collection`] compacts the tables. Garbage collection
/// renumbers the surviving elements, so any handle obtained before it must
/// not be used after it.
#[derive(Clone)]
pub struct Topology {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) faces: Vec<Face>,
    pub(crate) vdeleted: PropBuf<VH, bool>,
    pub(crate) edeleted: PropBuf<EH, bool>,
    pub(crate) fdeleted: PropBuf<FH, bool>,
    pub(crate) num_deleted_vertices: usize,
    pub(crate) num_deleted_edges: usize,
    pub(crate) num_deleted_faces: usize,
    pub(crate) vprops: PropertyContainer<VH>,
    pub(crate) hprops: PropertyContainer<HH>,
    pub(crate) eprops: PropertyContainer<EH>,
    pub(crate) fprops: PropertyContainer<FH>,
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

impl Topology {
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        Topology {
            vertices: Vec::with_capacity(nverts),
            edges: Vec::with_capacity(nedges),
            faces: Vec::with_capacity(nfaces),
            vdeleted: PropBuf::with_capacity(nverts),
            edeleted: PropBuf::with_capacity(nedges),
            fdeleted: PropBuf::with_capacity(nfaces),
            num_deleted_vertices: 0,
            num_deleted_edges: 0,
            num_deleted_faces: 0,
            vprops: PropertyContainer::new(),
            hprops: PropertyContainer::new(),
            eprops: PropertyContainer::new(),
            fprops: PropertyContainer::new(),
        }
    }

    /// Add a property called `name` on the elements of kind `H`. Returns an
    /// invalid key if the name is already taken.
    pub fn add_property<H, T>(&mut self, name: &str, default: T) -> Property<H, T>
    where
        H: ElementProperties,
        T: TPropData,
    {
        H::properties_mut(self).add(name, default)
    }

    /// Find the property called `name` on elements of kind `H`. Returns an
    /// invalid key if it doesn't exist or if its values are not of type `T`.
    pub fn property<H, T>(&self, name: &str) -> Property<H, T>
    where
        H: ElementProperties,
        T: TPropData,
    {
        H::properties(self).get(name)
    }

    pub fn get_or_add_property<H, T>(&mut self, name: &str, default: T) -> Property<H, T>
    where
        H: ElementProperties,
        T: TPropData,
    {
        H::properties_mut(self).get_or_add(name, default)
    }

    pub fn remove_property<H, T>(&mut self, prop: &mut Property<H, T>) -> bool
    where
        H: ElementProperties,
        T: TPropData,
    {
        H::properties_mut(self).remove(prop)
    }

    /// Read-only view of all properties of the elements of kind `H`.
    pub fn properties<H: ElementProperties>(&self) -> &PropertyContainer<H> {
        H::properties(self)
    }

    /// The values of a property.
    pub fn prop<H, T>(&self, prop: Property<H, T>) -> Result<&PropBuf<H, T>, Error>
    where
        H: ElementProperties,
        T: TPropData,
    {
        H::properties(self)
            .buf(prop)
            .ok_or_else(|| Error::PropertyDoesNotExist(format!("{:?}", prop)))
    }

    /// Mutable access to the values of a property.
    pub fn prop_mut<H, T>(&mut self, prop: Property<H, T>) -> Result<&mut PropBuf<H, T>, Error>
    where
        H: ElementProperties,
        T: TPropData,
    {
        H::properties_mut(self)
            .buf_mut(prop)
            .ok_or_else(|| Error::PropertyDoesNotExist(format!("{:?}", prop)))
    }

    pub(crate) fn vertex(&self, v: VH) -> &Vertex {
        &self.vertices[v.index() as usize]
    }

    pub(crate) fn vertex_mut(&mut self, v: VH) -> &mut Vertex {
        &mut self.vertices[v.index() as usize]
    }

    pub(crate) fn halfedge(&self, h: HH) -> &Halfedge {
        &self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn halfedge_mut(&mut self, h: HH) -> &mut Halfedge {
        &mut self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn face(&self, f: FH) -> &Face {
        &self.faces[f.index() as usize]
    }

    pub(crate) fn face_mut(&mut self, f: FH) -> &mut Face {
        &mut self.faces[f.index() as usize]
    }

    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.vertex(v).halfedge
    }

    pub fn to_vertex(&self, h: HH) -> VH {
        self.halfedge(h).vertex
    }

    pub fn from_vertex(&self, h: HH) -> VH {
        self.halfedge(self.opposite_halfedge(h)).vertex
    }

    pub fn prev_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).prev
    }

    pub fn next_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).next
    }

    pub fn halfedge_face(&self, h: HH) -> Option<FH> {
        self.halfedge(h).face
    }

    pub fn halfedge_edge(&self, h: HH) -> EH {
        h.edge()
    }

    pub fn edge_halfedge(&self, e: EH, flag: bool) -> HH {
        e.halfedge(flag)
    }

    pub fn face_halfedge(&self, f: FH) -> HH {
        self.face(f).halfedge
    }

    pub fn opposite_halfedge(&self, h: HH) -> HH {
        h.opposite()
    }

    /// Rotate the outgoing halfedge `h` clockwise around its tail vertex.
    pub fn cw_rotated_halfedge(&self, h: HH) -> HH {
        self.next_halfedge(self.opposite_halfedge(h))
    }

    /// Rotate the outgoing halfedge `h` counter-clockwise around its tail vertex.
    pub fn ccw_rotated_halfedge(&self, h: HH) -> HH {
        self.opposite_halfedge(self.prev_halfedge(h))
    }

    pub fn is_boundary_halfedge(&self, h: HH) -> bool {
        self.halfedge(h).face.is_none()
    }

    pub fn is_boundary_edge(&self, e: EH) -> bool {
        let (h, oh) = e.halfedges();
        self.is_boundary_halfedge(h) || self.is_boundary_halfedge(oh)
    }

    /// A vertex is on the boundary if its outgoing halfedge is on the
    /// boundary. Isolated vertices are boundary vertices.
    pub fn is_boundary_vertex(&self, v: VH) -> bool {
        match self.vertex(v).halfedge {
            Some(h) => self.is_boundary_halfedge(h),
            None => true,
        }
    }

    pub fn is_boundary_face(&self, f: FH) -> bool {
        iterator::fh_ccw_iter(self, f)
            .any(|h| self.is_boundary_halfedge(self.opposite_halfedge(h)))
    }

    pub fn is_isolated_vertex(&self, v: VH) -> bool {
        self.vertex(v).halfedge.is_none()
    }

    /// Each gap in the fan of faces around a vertex shows up as an outgoing
    /// boundary halfedge. More than one gap makes the vertex non-manifold.
    pub fn is_manifold_vertex(&self, v: VH) -> bool {
        iterator::voh_ccw_iter(self, v)
            .filter(|h| self.is_boundary_halfedge(*h))
            .nth(1)
            .is_none()
    }

    pub fn is_valid_vertex(&self, v: VH) -> bool {
        (v.index() as usize) < self.vertices.len()
    }

    pub fn is_valid_halfedge(&self, h: HH) -> bool {
        (h.index() as usize) < self.edges.len() * 2
    }

    pub fn is_valid_edge(&self, e: EH) -> bool {
        (e.index() as usize) < self.edges.len()
    }

    pub fn is_valid_face(&self, f: FH) -> bool {
        (f.index() as usize) < self.faces.len()
    }

    pub fn is_deleted_vertex(&self, v: VH) -> bool {
        self.vdeleted[v]
    }

    pub fn is_deleted_halfedge(&self, h: HH) -> bool {
        self.edeleted[h.edge()]
    }

    pub fn is_deleted_edge(&self, e: EH) -> bool {
        self.edeleted[e]
    }

    pub fn is_deleted_face(&self, f: FH) -> bool {
        self.fdeleted[f]
    }

    /// Whether any element is flagged as deleted and waiting for garbage
    /// collection.
    pub fn has_garbage(&self) -> bool {
        self.num_deleted_vertices + self.num_deleted_edges + self.num_deleted_faces > 0
    }

    /// Number of vertices that are not deleted.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() - self.num_deleted_vertices
    }

    pub fn num_halfedges(&self) -> usize {
        self.num_edges() * 2
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len() - self.num_deleted_edges
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len() - self.num_deleted_faces
    }

    /// Number of vertices including the deleted ones.
    pub fn num_allocated_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_allocated_halfedges(&self) -> usize {
        self.edges.len() * 2
    }

    pub fn num_allocated_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_allocated_faces(&self) -> usize {
        self.faces.len()
    }

    /// Vertices that are not deleted.
    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<'_> {
        (0..(self.vertices.len() as u32))
            .map(VH::from)
            .filter(move |v| !self.vdeleted[*v])
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> + use<'_> {
        (0..((self.edges.len() * 2) as u32))
            .map(HH::from)
            .filter(move |h| !self.edeleted[h.edge()])
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<'_> {
        (0..(self.edges.len() as u32))
            .map(EH::from)
            .filter(move |e| !self.edeleted[*e])
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<'_> {
        (0..(self.faces.len() as u32))
            .map(FH::from)
            .filter(move |f| !self.fdeleted[*f])
    }

    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        iterator::voh_ccw_iter(self, from).find(|h| self.to_vertex(*h) == to)
    }

    pub fn find_edge(&self, a: VH, b: VH) -> Option<EH> {
        self.find_halfedge(a, b).map(|h| h.edge())
    }

    pub fn vertex_valence(&self, v: VH) -> usize {
        iterator::voh_ccw_iter(self, v).count()
    }

    pub fn face_valence(&self, f: FH) -> usize {
        iterator::fh_ccw_iter(self, f).count()
    }

    pub fn is_triangle_mesh(&self) -> bool {
        self.faces().all(|f| self.face_valence(f) == 3)
    }

    pub fn is_quad_mesh(&self) -> bool {
        self.faces().all(|f| self.face_valence(f) == 4)
    }

    pub(crate) fn check_vertex(&self, v: VH) -> Result<(), Error> {
        if !self.is_valid_vertex(v) {
            Err(Error::InvalidVertex(v))
        } else if self.is_deleted_vertex(v) {
            Err(Error::DeletedVertex(v))
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_halfedge(&self, h: HH) -> Result<(), Error> {
        if !self.is_valid_halfedge(h) {
            Err(Error::InvalidHalfedge(h))
        } else if self.is_deleted_halfedge(h) {
            Err(Error::DeletedHalfedge(h))
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_edge(&self, e: EH) -> Result<(), Error> {
        if !self.is_valid_edge(e) {
            Err(Error::InvalidEdge(e))
        } else if self.is_deleted_edge(e) {
            Err(Error::DeletedEdge(e))
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_face(&self, f: FH) -> Result<(), Error> {
        if !self.is_valid_face(f) {
            Err(Error::InvalidFace(f))
        } else if self.is_deleted_face(f) {
            Err(Error::DeletedFace(f))
        } else {
            Ok(())
        }
    }

    /// Make sure the given number of new elements can be added.
    pub(crate) fn check_capacity(
        &self,
        nverts: usize,
        nedges: usize,
        nfaces: usize,
    ) -> Result<(), Error> {
        if nverts > MAX_ELEMENTS - self.vertices.len() {
            Err(Error::AllocationLimit(ElementKind::Vertex))
        } else if nedges > MAX_EDGES - self.edges.len() {
            Err(Error::AllocationLimit(ElementKind::Edge))
        } else if nfaces > MAX_ELEMENTS - self.faces.len() {
            Err(Error::AllocationLimit(ElementKind::Face))
        } else {
            Ok(())
        }
    }

    /// Make the outgoing halfedge of `v` a boundary halfedge, if it has one.
    pub(crate) fn adjust_outgoing_halfedge(&mut self, v: VH) {
        let h = iterator::voh_ccw_iter(self, v).find(|h| self.is_boundary_halfedge(*h));
        if let Some(h) = h {
            self.set_vertex_halfedge(v, h)
        }
    }

    pub(crate) fn set_vertex_halfedge(&mut self, v: VH, h: HH) {
        self.vertex_mut(v).halfedge = Some(h);
    }

    /// Make `next` the halfedge that follows `prev`.
    pub(crate) fn link_halfedges(&mut self, prev: HH, next: HH) {
        self.halfedge_mut(prev).next = next;
        self.halfedge_mut(next).prev = prev;
    }

    pub(crate) fn new_vertex(&mut self) -> VH {
        let vi = self.vertices.len() as u32;
        self.vprops.push_value();
        self.vertices.push(Vertex { halfedge: None });
        self.vdeleted.push(false);
        vi.into()
    }

    /// Push a new edge from `from` to `to` and return its first halfedge,
    /// which points at `to`. Both halfedges are linked to themselves until
    /// the caller links them into their loops.
    pub(crate) fn new_edge(&mut self, from: VH, to: VH) -> HH {
        let ei = self.edges.len() as u32;
        let h: HH = (ei << 1).into();
        let oh: HH = ((ei << 1) | 1).into();
        self.eprops.push_value();
        self.hprops.push_values(2);
        self.edges.push(Edge {
            halfedges: [
                Halfedge {
                    face: None,
                    vertex: to,
                    next: h,
                    prev: h,
                },
                Halfedge {
                    face: None,
                    vertex: from,
                    next: oh,
                    prev: oh,
                },
            ],
        });
        self.edeleted.push(false);
        h
    }

    pub(crate) fn new_face(&mut self, halfedge: HH) -> FH {
        let fi = self.faces.len() as u32;
        self.fprops.push_value();
        self.faces.push(Face { halfedge });
        self.fdeleted.push(false);
        fi.into()
    }

    pub fn add_vertex(&mut self) -> Result<VH, Error> {
        self.check_capacity(1, 0, 0)?;
        Ok(self.new_vertex())
    }

    /// Add `n` isolated vertices and return the range of their indices.
    pub fn add_vertices(&mut self, n: usize) -> Result<Range<u32>, Error> {
        self.check_capacity(n, 0, 0)?;
        let start = self.vertices.len() as u32;
        self.vprops.push_values(n);
        self.vertices.resize(self.vertices.len() + n, Vertex { halfedge: None });
        self.vdeleted.resize(self.vertices.len(), false);
        Ok(start..(start + n as u32))
    }

    /// Add a face bounded by the loop of vertices `verts`.
    ///
    /// The face is rejected, and the mesh left exactly as it was, if it has
    /// fewer than 3 vertices, repeats a vertex, refers to an invalid or
    /// deleted vertex, or would make the mesh non-manifold.
    pub fn add_face(&mut self, verts: &[VH], cache: &mut TopolCache) -> Result<FH, Error> {
        let n = verts.len();
        if n < 3 {
            return Err(Error::TooFewVertices(n));
        }
        for &v in verts {
            self.check_vertex(v)?;
        }
        cache.clear();
        cache.vertices.extend_from_slice(verts);
        cache.vertices.sort_unstable();
        if let Some(pair) = cache.vertices.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::RepeatedVertex(pair[0]));
        }
        cache.loop_halfedges.reserve(n);
        cache.needs_adjust.reserve(n);
        cache.next_cache.reserve(n * 6);
        // Check for topological errors.
        for i in 0..n {
            if !self.is_boundary_vertex(verts[i]) {
                // Ensure vertex is manifold.
                return Err(Error::ComplexVertex(verts[i]));
            }
            // Ensure edge is manifold.
            let h = self.find_halfedge(verts[i], verts[(i + 1) % n]);
            if let Some(h) = h {
                if !self.is_boundary_halfedge(h) {
                    return Err(Error::ComplexHalfedge(h));
                }
            }
            cache.loop_halfedges.push(h);
            cache.needs_adjust.push(false);
        }
        // When two consecutive halfedges already exist but are not linked,
        // the patch between them has to be moved to another gap around the
        // shared vertex.
        for i in 0..n {
            let ii = (i + 1) % n;
            let (Some(inner_prev), Some(inner_next)) =
                (cache.loop_halfedges[i], cache.loop_halfedges[ii])
            else {
                continue;
            };
            if self.next_halfedge(inner_prev) == inner_next {
                continue;
            }
            let outer_prev = self.opposite_halfedge(inner_next);
            let mut boundary_prev = outer_prev;
            let mut found = false;
            for _ in 0..self.vertex_valence(verts[ii]) {
                boundary_prev = self.opposite_halfedge(self.next_halfedge(boundary_prev));
                if self.is_boundary_halfedge(boundary_prev) && boundary_prev != inner_prev {
                    found = true;
                    break;
                }
            }
            if !found {
                return Err(Error::PatchRelinkingFailed);
            }
            let boundary_next = self.next_halfedge(boundary_prev);
            if boundary_next == inner_next {
                return Err(Error::PatchRelinkingFailed);
            }
            debug_assert!(
                self.is_boundary_halfedge(boundary_prev) && self.is_boundary_halfedge(boundary_next)
            );
            let patch_start = self.next_halfedge(inner_prev);
            let patch_end = self.prev_halfedge(inner_next);
            cache.next_cache.push((boundary_prev, patch_start));
            cache.next_cache.push((patch_end, boundary_next));
            cache.next_cache.push((inner_prev, inner_next));
        }
        let num_new_edges = cache.loop_halfedges.iter().filter(|h| h.is_none()).count();
        self.check_capacity(0, num_new_edges, 1)?;
        // Nothing can fail from here on.
        for i in 0..n {
            match cache.loop_halfedges[i] {
                Some(h) => {
                    cache.halfedges.push(h);
                    cache.is_new.push(false);
                }
                None => {
                    let h = self.new_edge(verts[i], verts[(i + 1) % n]);
                    cache.halfedges.push(h);
                    cache.is_new.push(true);
                }
            }
        }
        let f = self.new_face(cache.halfedges[n - 1]);
        for i in 0..n {
            let ii = (i + 1) % n;
            let v = verts[ii];
            let inner_prev = cache.halfedges[i];
            let inner_next = cache.halfedges[ii];
            match (cache.is_new[i], cache.is_new[ii]) {
                (false, false) => {
                    cache.needs_adjust[ii] = self.vertex_halfedge(v) == Some(inner_next);
                }
                (prev_new, next_new) => {
                    let outer_prev = self.opposite_halfedge(inner_next);
                    let outer_next = self.opposite_halfedge(inner_prev);
                    if prev_new && !next_new {
                        let boundary_prev = self.prev_halfedge(inner_next);
                        cache.next_cache.push((boundary_prev, outer_next));
                        self.set_vertex_halfedge(v, outer_next);
                    } else if !prev_new && next_new {
                        let boundary_next = self.next_halfedge(inner_prev);
                        cache.next_cache.push((outer_prev, boundary_next));
                        self.set_vertex_halfedge(v, boundary_next);
                    } else {
                        match self.vertex_halfedge(v) {
                            None => {
                                self.set_vertex_halfedge(v, outer_next);
                                cache.next_cache.push((outer_prev, outer_next));
                            }
                            Some(boundary_next) => {
                                let boundary_prev = self.prev_halfedge(boundary_next);
                                cache.next_cache.push((boundary_prev, outer_next));
                                cache.next_cache.push((outer_prev, boundary_next));
                            }
                        }
                    }
                    cache.next_cache.push((inner_prev, inner_next));
                }
            }
            self.halfedge_mut(inner_prev).face = Some(f);
        }
        for &(prev, next) in cache.next_cache.iter() {
            self.link_halfedges(prev, next);
        }
        for (i, v) in verts.iter().enumerate() {
            if cache.needs_adjust[i] {
                self.adjust_outgoing_halfedge(*v);
            }
        }
        Ok(f)
    }

    pub fn add_tri_face(
        &mut self,
        v0: VH,
        v1: VH,
        v2: VH,
        cache: &mut TopolCache,
    ) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2], cache)
    }

    pub fn add_quad_face(
        &mut self,
        v0: VH,
        v1: VH,
        v2: VH,
        v3: VH,
        cache: &mut TopolCache,
    ) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2, v3], cache)
    }

    /// Reserve memory for an additional number of elements.
    pub fn reserve(&mut self, nverts: usize, nedges: usize, nfaces: usize) {
        self.vertices.reserve(nverts);
        self.vdeleted.reserve(nverts);
        self.vprops.reserve(nverts);
        self.edges.reserve(nedges);
        self.edeleted.reserve(nedges);
        self.eprops.reserve(nedges);
        self.hprops.reserve(nedges * 2);
        self.faces.reserve(nfaces);
        self.fdeleted.reserve(nfaces);
        self.fprops.reserve(nfaces);
    }

    /// Remove all elements and all properties.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
        self.vdeleted.clear();
        self.edeleted.clear();
        self.fdeleted.clear();
        self.num_deleted_vertices = 0;
        self.num_deleted_edges = 0;
        self.num_deleted_faces = 0;
        self.vprops.clear();
        self.hprops.clear();
        self.eprops.clear();
        self.fprops.clear();
    }

    /// Release unused capacity of all tables and properties.
    pub fn free_memory(&mut self) {
        self.vertices.shrink_to_fit();
        self.edges.shrink_to_fit();
        self.faces.shrink_to_fit();
        self.vdeleted.free_memory();
        self.edeleted.free_memory();
        self.fdeleted.free_memory();
        self.vprops.free_memory();
        self.hprops.free_memory();
        self.eprops.free_memory();
        self.fprops.free_memory();
    }
}
