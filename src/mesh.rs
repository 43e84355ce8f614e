use std::ops::Range;

use crate::{
    element::{EH, FH, HH, VH},
    error::Error,
    property::{PropBuf, Property, TPropData, VPropBuf, VProperty},
    topol::{ElementProperties, TopolCache, Topology},
};

/// Name of the vertex property holding the positions.
pub const POINTS_PROPERTY: &str = "v:point";

/// Tells the mesh how to construct and read the vectors used as positions of
/// vertices.
pub trait Adaptor<const DIM: usize> {
    type Vector: Copy + 'static;
    type Scalar: Copy + 'static;

    fn vector(coords: [Self::Scalar; DIM]) -> Self::Vector;

    fn zero_vector() -> Self::Vector;

    fn vector_coord(v: &Self::Vector, i: usize) -> Self::Scalar;
}

/// Conversions between the scalar type of the adaptor and primitive floating
/// point types.
pub trait FloatScalarAdaptor<const DIM: usize>: Adaptor<DIM> {
    fn scalarf32(val: f32) -> Self::Scalar;

    fn scalarf64(val: f64) -> Self::Scalar;

    fn to_f64(val: Self::Scalar) -> f64;
}

/// A polygon mesh with positions of type `A::Vector` in `DIM` dimensions.
///
/// This is a [`Topology`] with a vertex property called `"v:point"`. The
/// operators that create vertices take their positions as arguments.
pub struct PolyMeshT<const DIM: usize, A>
where
    A: Adaptor<DIM>,
{
    pub(crate) topol: Topology,
    pub(crate) cache: TopolCache,
    points: VProperty<A::Vector>,
}

impl<const DIM: usize, A> Clone for PolyMeshT<DIM, A>
where
    A: Adaptor<DIM>,
{
    fn clone(&self) -> Self {
        PolyMeshT {
            topol: self.topol.clone(),
            cache: TopolCache::default(),
            points: self.points,
        }
    }
}

impl<const DIM: usize, A> Default for PolyMeshT<DIM, A>
where
    A: Adaptor<DIM>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const DIM: usize, A> PolyMeshT<DIM, A>
where
    A: Adaptor<DIM>,
{
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        let mut topol = Topology::with_capacity(nverts, nedges, nfaces);
        let points = topol.add_property(POINTS_PROPERTY, A::zero_vector());
        PolyMeshT {
            topol,
            cache: TopolCache::default(),
            points,
        }
    }

    /// The key of the positions property.
    pub fn points_property(&self) -> VProperty<A::Vector> {
        self.points
    }

    pub fn points(&self) -> Result<&VPropBuf<A::Vector>, Error> {
        self.topol.prop(self.points)
    }

    pub fn points_mut(&mut self) -> Result<&mut VPropBuf<A::Vector>, Error> {
        self.topol.prop_mut(self.points)
    }

    /// Position of the vertex `v`.
    pub fn point(&self, v: VH) -> Result<A::Vector, Error> {
        if !self.topol.is_valid_vertex(v) {
            return Err(Error::InvalidVertex(v));
        }
        Ok(self.points()?[v])
    }

    pub fn set_point(&mut self, v: VH, pos: A::Vector) -> Result<(), Error> {
        if !self.topol.is_valid_vertex(v) {
            return Err(Error::InvalidVertex(v));
        }
        self.points_mut()?[v] = pos;
        Ok(())
    }

    pub fn topology(&self) -> &Topology {
        &self.topol
    }

    pub fn num_vertices(&self) -> usize {
        self.topol.num_vertices()
    }

    pub fn num_halfedges(&self) -> usize {
        self.topol.num_halfedges()
    }

    pub fn num_edges(&self) -> usize {
        self.topol.num_edges()
    }

    pub fn num_faces(&self) -> usize {
        self.topol.num_faces()
    }

    pub fn has_garbage(&self) -> bool {
        self.topol.has_garbage()
    }

    /// Iterator over the live vertices of the mesh.
    pub fn vertices(&self) -> impl Iterator<Item = VH> {
        self.topol.vertices()
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> {
        self.topol.halfedges()
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> {
        self.topol.edges()
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> {
        self.topol.faces()
    }

    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        self.topol.find_halfedge(from, to)
    }

    pub fn find_edge(&self, a: VH, b: VH) -> Option<EH> {
        self.topol.find_edge(a, b)
    }

    pub fn vertex_valence(&self, v: VH) -> usize {
        self.topol.vertex_valence(v)
    }

    pub fn face_valence(&self, f: FH) -> usize {
        self.topol.face_valence(f)
    }

    pub fn is_boundary_vertex(&self, v: VH) -> bool {
        self.topol.is_boundary_vertex(v)
    }

    pub fn is_boundary_edge(&self, e: EH) -> bool {
        self.topol.is_boundary_edge(e)
    }

    pub fn is_triangle_mesh(&self) -> bool {
        self.topol.is_triangle_mesh()
    }

    pub fn is_quad_mesh(&self) -> bool {
        self.topol.is_quad_mesh()
    }

    pub fn add_property<H, T>(&mut self, name: &str, default: T) -> Property<H, T>
    where
        H: ElementProperties,
        T: TPropData,
    {
        self.topol.add_property(name, default)
    }

    pub fn property<H, T>(&self, name: &str) -> Property<H, T>
    where
        H: ElementProperties,
        T: TPropData,
    {
        self.topol.property(name)
    }

    pub fn get_or_add_property<H, T>(&mut self, name: &str, default: T) -> Property<H, T>
    where
        H: ElementProperties,
        T: TPropData,
    {
        self.topol.get_or_add_property(name, default)
    }

    /// Remove a property and invalidate its key. The positions cannot be
    /// removed; trying to leaves the key untouched and returns `false`.
    pub fn remove_property<H, T>(&mut self, prop: &mut Property<H, T>) -> bool
    where
        H: ElementProperties,
        T: TPropData,
    {
        if prop.same_as(&self.points) {
            return false;
        }
        self.topol.remove_property(prop)
    }

    pub fn prop<H, T>(&self, prop: Property<H, T>) -> Result<&PropBuf<H, T>, Error>
    where
        H: ElementProperties,
        T: TPropData,
    {
        self.topol.prop(prop)
    }

    pub fn prop_mut<H, T>(&mut self, prop: Property<H, T>) -> Result<&mut PropBuf<H, T>, Error>
    where
        H: ElementProperties,
        T: TPropData,
    {
        self.topol.prop_mut(prop)
    }

    pub fn reserve(&mut self, nverts: usize, nedges: usize, nfaces: usize) {
        self.topol.reserve(nverts, nedges, nfaces);
    }

    /// Remove all elements and all properties other than the positions.
    pub fn clear(&mut self) {
        self.topol.clear();
        self.points = self.topol.add_property(POINTS_PROPERTY, A::zero_vector());
    }

    pub fn free_memory(&mut self) {
        self.topol.free_memory();
    }

    pub fn add_vertex(&mut self, pos: A::Vector) -> Result<VH, Error> {
        let v = self.topol.add_vertex()?;
        self.points_mut()?[v] = pos;
        Ok(v)
    }

    /// Add a vertex for each position, and return the range of their
    /// indices.
    pub fn add_vertices(&mut self, pos: &[A::Vector]) -> Result<Range<u32>, Error> {
        let range = self.topol.add_vertices(pos.len())?;
        let points: &mut [A::Vector] = self.points_mut()?;
        points[(range.start as usize)..(range.end as usize)].copy_from_slice(pos);
        Ok(range)
    }

    pub fn add_face(&mut self, verts: &[VH]) -> Result<FH, Error> {
        self.topol.add_face(verts, &mut self.cache)
    }

    pub fn add_tri_face(&mut self, v0: VH, v1: VH, v2: VH) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2])
    }

    pub fn add_quad_face(&mut self, v0: VH, v1: VH, v2: VH, v3: VH) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2, v3])
    }

    /// Split the edge `e` with a new vertex at `pos`, and connect it to the
    /// opposite vertices of the incident triangles. Returns the new vertex.
    pub fn split_edge(&mut self, e: EH, pos: A::Vector) -> Result<VH, Error> {
        self.topol.check_edge(e)?;
        let (h0, h1) = e.halfedges();
        let ntri =
            self.topol.is_triangle_loop(h0) as usize + self.topol.is_triangle_loop(h1) as usize;
        self.topol.check_capacity(1, 1 + ntri, ntri)?;
        let v = self.add_vertex(pos)?;
        self.topol.split_edge(e, v)?;
        Ok(v)
    }

    /// Insert a new vertex at `pos` in the middle of the edge of `h`, without
    /// triangulating the incident faces. Returns the new vertex.
    pub fn insert_vertex(&mut self, h: HH, pos: A::Vector) -> Result<VH, Error> {
        self.topol.check_halfedge(h)?;
        self.topol.check_capacity(1, 1, 0)?;
        let v = self.add_vertex(pos)?;
        self.topol.insert_vertex(h, v)?;
        Ok(v)
    }

    /// Replace the face `f` with a fan of triangles around a new vertex at
    /// `pos`. Returns the new vertex.
    pub fn split_face(&mut self, f: FH, pos: A::Vector) -> Result<VH, Error> {
        self.topol.check_face(f)?;
        let n = self.topol.face_valence(f);
        self.topol.check_capacity(1, n, n - 1)?;
        let v = self.add_vertex(pos)?;
        self.topol.split_face(f, v)?;
        Ok(v)
    }

    pub fn insert_edge(&mut self, h0: HH, h1: HH) -> Result<HH, Error> {
        self.topol.insert_edge(h0, h1)
    }

    pub fn is_flip_ok(&self, e: EH) -> bool {
        self.topol.is_flip_ok(e)
    }

    pub fn flip(&mut self, e: EH) -> Result<(), Error> {
        self.topol.flip(e)
    }

    pub fn is_collapse_ok(&self, h: HH) -> bool {
        self.topol.is_collapse_ok(h)
    }

    /// Collapse the halfedge `h`. The vertex at its head survives, and keeps
    /// its position.
    pub fn collapse(&mut self, h: HH) -> Result<(), Error> {
        self.topol.collapse(h, &mut self.cache)
    }

    pub fn is_removal_ok(&self, e: EH) -> bool {
        self.topol.is_removal_ok(e)
    }

    pub fn remove_edge(&mut self, e: EH) -> Result<FH, Error> {
        self.topol.remove_edge(e, &mut self.cache)
    }

    pub fn triangulate_face(&mut self, f: FH) -> Result<(), Error> {
        self.topol.triangulate_face(f)
    }

    pub fn triangulate(&mut self) -> Result<(), Error> {
        self.topol.triangulate()
    }

    pub fn delete_vertex(&mut self, v: VH) -> Result<(), Error> {
        self.topol.delete_vertex(v, &mut self.cache)
    }

    pub fn delete_edge(&mut self, e: EH) -> Result<(), Error> {
        self.topol.delete_edge(e, &mut self.cache)
    }

    pub fn delete_face(&mut self, f: FH) -> Result<(), Error> {
        self.topol.delete_face(f, &mut self.cache)
    }

    /// See [`Topology::garbage_collection`]. The positions are compacted along
    /// with all other properties.
    pub fn garbage_collection(&mut self) {
        self.topol.garbage_collection(&mut self.cache);
    }

    pub fn check_topology(&self) -> Result<(), Error> {
        self.topol.check_topology()
    }
}
