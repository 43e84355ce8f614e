use tracing::debug;

use crate::{
    element::{EH, FH, HH, VH},
    error::Error,
    topol::{TopolCache, Topology},
};

impl Topology {
    /// Check if the edge `e` can be flipped.
    ///
    /// Both sides of the edge must be triangles, and the vertices opposite to
    /// the edge must be distinct and not already connected.
    pub fn is_flip_ok(&self, e: EH) -> bool {
        if self.check_edge(e).is_err() || self.is_boundary_edge(e) {
            return false;
        }
        let (h0, h1) = e.halfedges();
        if self.num_loop_halfedges(h0) != 3 || self.num_loop_halfedges(h1) != 3 {
            return false;
        }
        let v0 = self.to_vertex(self.next_halfedge(h0));
        let v1 = self.to_vertex(self.next_halfedge(h1));
        v0 != v1 && self.find_halfedge(v0, v1).is_none()
    }

    /// Replace the edge `e` shared by two triangles with the other diagonal
    /// of the quad formed by the two triangles. No elements are added or
    /// removed.
    pub fn flip(&mut self, e: EH) -> Result<(), Error> {
        if !self.is_flip_ok(e) {
            debug!("Rejected flip of {}", e);
            return Err(Error::FlipNotAllowed(e));
        }
        let (a0, b0) = e.halfedges();
        let a1 = self.next_halfedge(a0);
        let a2 = self.next_halfedge(a1);
        let b1 = self.next_halfedge(b0);
        let b2 = self.next_halfedge(b1);
        let va0 = self.to_vertex(a0);
        let va1 = self.to_vertex(a1);
        let vb0 = self.to_vertex(b0);
        let vb1 = self.to_vertex(b1);
        let fa = self.halfedge_face(a0);
        let fb = self.halfedge_face(b0);
        // Rewire halfedge -> vertex.
        self.halfedge_mut(a0).vertex = va1;
        self.halfedge_mut(b0).vertex = vb1;
        // Rewire halfedge -> halfedge.
        self.link_halfedges(a0, a2);
        self.link_halfedges(a2, b1);
        self.link_halfedges(b1, a0);
        self.link_halfedges(b0, b2);
        self.link_halfedges(b2, a1);
        self.link_halfedges(a1, b0);
        // Rewire halfedge -> face.
        self.halfedge_mut(a1).face = fb;
        self.halfedge_mut(b1).face = fa;
        // Rewire face -> halfedge.
        if let Some(fa) = fa {
            self.face_mut(fa).halfedge = a0;
        }
        if let Some(fb) = fb {
            self.face_mut(fb).halfedge = b0;
        }
        // Rewire vertex -> halfedge.
        if self.vertex_halfedge(va0) == Some(b0) {
            self.set_vertex_halfedge(va0, a1);
        }
        if self.vertex_halfedge(vb0) == Some(a0) {
            self.set_vertex_halfedge(vb0, b1);
        }
        Ok(())
    }

    /// Split the edge of `h` by inserting the isolated vertex `v` in the
    /// middle. The faces on either side gain one vertex, and are not
    /// triangulated. Returns the new halfedge going from `v` to the head of
    /// `h`.
    pub fn insert_vertex(&mut self, h: HH, v: VH) -> Result<HH, Error> {
        self.check_halfedge(h)?;
        self.check_vertex(v)?;
        if !self.is_isolated_vertex(v) {
            return Err(Error::VertexNotIsolated(v));
        }
        self.check_capacity(0, 1, 0)?;
        Ok(self.insert_vertex_unchecked(h, v))
    }

    /// ```text
    /// before:
    ///     v0      h0       v2
    ///      o--------------->o
    ///       <---------------
    ///            o0
    /// after:
    ///     v0  h0   v   h1   v2
    ///      o------>o------->o
    ///       <------ <-------
    ///         o0      o1
    /// ```
    fn insert_vertex_unchecked(&mut self, h0: HH, v: VH) -> HH {
        let h2 = self.next_halfedge(h0);
        let o0 = h0.opposite();
        let o2 = self.prev_halfedge(o0);
        let v2 = self.to_vertex(h0);
        let fh = self.halfedge_face(h0);
        let fo = self.halfedge_face(o0);
        let h1 = self.new_edge(v, v2);
        let o1 = h1.opposite();
        // Rewire halfedge -> halfedge.
        self.link_halfedges(h1, h2);
        self.link_halfedges(h0, h1);
        self.link_halfedges(o1, o0);
        self.link_halfedges(o2, o1);
        // Rewire halfedge -> vertex and face.
        self.halfedge_mut(h0).vertex = v;
        self.halfedge_mut(h1).face = fh;
        self.halfedge_mut(o1).face = fo;
        // Rewire vertex -> halfedge.
        self.set_vertex_halfedge(v2, o1);
        self.adjust_outgoing_halfedge(v2);
        self.set_vertex_halfedge(v, h1);
        self.adjust_outgoing_halfedge(v);
        // Rewire face -> halfedge.
        if let Some(fh) = fh {
            self.face_mut(fh).halfedge = h0;
        }
        if let Some(fo) = fo {
            self.face_mut(fo).halfedge = o1;
        }
        h1
    }

    /// Split the face shared by `h0` and `h1` with a new edge from the head
    /// of `h0` to the head of `h1`. The face of `h0` keeps its handle, the
    /// part containing `h1` becomes a new face. Returns the new halfedge
    /// pointing at the head of `h1`.
    pub fn insert_edge(&mut self, h0: HH, h1: HH) -> Result<HH, Error> {
        self.check_halfedge(h0)?;
        self.check_halfedge(h1)?;
        let face = self.halfedge_face(h0);
        if face.is_none()
            || face != self.halfedge_face(h1)
            || h0 == h1
            || self.next_halfedge(h0) == h1
            || self.next_halfedge(h1) == h0
            || self
                .find_halfedge(self.to_vertex(h0), self.to_vertex(h1))
                .is_some()
        {
            return Err(Error::EdgeInsertionNotAllowed(h0, h1));
        }
        self.check_capacity(0, 1, 1)?;
        Ok(self.insert_edge_unchecked(h0, h1))
    }

    fn insert_edge_unchecked(&mut self, h0: HH, h1: HH) -> HH {
        let v0 = self.to_vertex(h0);
        let v1 = self.to_vertex(h1);
        let h2 = self.next_halfedge(h0);
        let h3 = self.next_halfedge(h1);
        let h4 = self.new_edge(v0, v1);
        let h5 = h4.opposite();
        let f0 = self.halfedge_face(h0);
        let f1 = self.new_face(h1);
        if let Some(f0) = f0 {
            self.face_mut(f0).halfedge = h0;
        }
        self.link_halfedges(h0, h4);
        self.link_halfedges(h4, h3);
        self.halfedge_mut(h4).face = f0;
        self.link_halfedges(h1, h5);
        self.link_halfedges(h5, h2);
        let mut h = h2;
        loop {
            self.halfedge_mut(h).face = Some(f1);
            h = self.next_halfedge(h);
            if h == h2 {
                break;
            }
        }
        h4
    }

    /// Split the edge `e` by the isolated vertex `v`, and connect `v` to the
    /// opposite vertex of every incident triangle. Incident faces that are not
    /// triangles only gain the new vertex.
    ///
    /// Returns the halfedge going from `v` to the head of the first halfedge
    /// of `e`.
    pub fn split_edge(&mut self, e: EH, v: VH) -> Result<HH, Error> {
        self.check_edge(e)?;
        self.check_vertex(v)?;
        if !self.is_isolated_vertex(v) {
            return Err(Error::VertexNotIsolated(v));
        }
        let (h0, o0) = e.halfedges();
        let htri = self.is_triangle_loop(h0);
        let otri = self.is_triangle_loop(o0);
        let ntri = htri as usize + otri as usize;
        self.check_capacity(0, 1 + ntri, ntri)?;
        let h1 = self.insert_vertex_unchecked(h0, v);
        if htri {
            let target = self.next_halfedge(h1);
            self.insert_edge_unchecked(h0, target);
        }
        if otri {
            let o1 = h1.opposite();
            let target = self.next_halfedge(o0);
            self.insert_edge_unchecked(o1, target);
        }
        Ok(h1)
    }

    /// Connect the isolated vertex `v` to every vertex of the face `f`,
    /// replacing it with a fan of triangles. The first triangle keeps the
    /// handle `f`.
    pub fn split_face(&mut self, f: FH, v: VH) -> Result<(), Error> {
        self.check_face(f)?;
        self.check_vertex(v)?;
        if !self.is_isolated_vertex(v) {
            return Err(Error::VertexNotIsolated(v));
        }
        let n = self.face_valence(f);
        self.check_capacity(0, n, n - 1)?;
        let hend = self.face_halfedge(f);
        let mut h = self.next_halfedge(hend);
        let mut hold = self.new_edge(self.to_vertex(hend), v);
        self.link_halfedges(hend, hold);
        self.halfedge_mut(hold).face = Some(f);
        hold = hold.opposite();
        while h != hend {
            let hnext = self.next_halfedge(h);
            let fnew = self.new_face(h);
            self.fprops.copy(f, fnew);
            let hnew = self.new_edge(self.to_vertex(h), v);
            self.link_halfedges(hnew, hold);
            self.link_halfedges(hold, h);
            self.link_halfedges(h, hnew);
            self.halfedge_mut(hnew).face = Some(fnew);
            self.halfedge_mut(hold).face = Some(fnew);
            self.halfedge_mut(h).face = Some(fnew);
            hold = hnew.opposite();
            h = hnext;
        }
        let first = self.next_halfedge(hend);
        self.link_halfedges(hold, hend);
        self.link_halfedges(first, hold);
        self.halfedge_mut(hold).face = Some(f);
        self.set_vertex_halfedge(v, hold);
        Ok(())
    }

    /// Check if the edge `e` can be removed by merging the two faces on
    /// either side of it.
    pub fn is_removal_ok(&self, e: EH) -> bool {
        if self.check_edge(e).is_err() {
            return false;
        }
        let (h0, h1) = e.halfedges();
        let v0 = self.to_vertex(h0);
        let v1 = self.to_vertex(h1);
        let (Some(f0), Some(f1)) = (self.halfedge_face(h0), self.halfedge_face(h1)) else {
            return false;
        };
        if f0 == f1 {
            return false;
        }
        // The two faces must not touch anywhere other than this edge.
        !crate::iterator::fv_ccw_iter(self, f0)
            .filter(|v| *v != v0 && *v != v1)
            .any(|v| crate::iterator::vf_ccw_iter(self, v).any(|f| f == f1))
    }

    /// Remove the edge `e`, merging the faces on either side into one. The
    /// face of the second halfedge of `e` survives.
    pub fn remove_edge(&mut self, e: EH, cache: &mut TopolCache) -> Result<FH, Error> {
        if !self.is_removal_ok(e) {
            debug!("Rejected removal of {}", e);
            return Err(Error::RemovalNotAllowed(e));
        }
        let (h0, h1) = e.halfedges();
        let v0 = self.to_vertex(h0);
        let v1 = self.to_vertex(h1);
        let (Some(f0), Some(f1)) = (self.halfedge_face(h0), self.halfedge_face(h1)) else {
            return Err(Error::RemovalNotAllowed(e));
        };
        let h0_prev = self.prev_halfedge(h0);
        let h0_next = self.next_halfedge(h0);
        let h1_prev = self.prev_halfedge(h1);
        let h1_next = self.next_halfedge(h1);
        // Rewire vertex -> halfedge.
        if self.vertex_halfedge(v0) == Some(h1) {
            self.set_vertex_halfedge(v0, h0_next);
        }
        if self.vertex_halfedge(v1) == Some(h0) {
            self.set_vertex_halfedge(v1, h1_next);
        }
        // Rewire halfedge -> face.
        cache.halfedges.clear();
        cache
            .halfedges
            .extend(crate::iterator::fh_ccw_iter(self, f0));
        for &h in cache.halfedges.iter() {
            self.halfedge_mut(h).face = Some(f1);
        }
        // Rewire halfedge -> halfedge.
        self.link_halfedges(h1_prev, h0_next);
        self.link_halfedges(h0_prev, h1_next);
        // Rewire face -> halfedge.
        if self.face_halfedge(f1) == h1 {
            self.face_mut(f1).halfedge = h1_next;
        }
        // Delete stuff.
        self.fdeleted[f0] = true;
        self.num_deleted_faces += 1;
        self.edeleted[e] = true;
        self.num_deleted_edges += 1;
        Ok(f1)
    }

    /// Triangulate the face `f` with a fan of edges from the tail of its
    /// halfedge. The new faces copy the properties of `f`.
    pub fn triangulate_face(&mut self, f: FH) -> Result<(), Error> {
        self.check_face(f)?;
        let n = self.face_valence(f);
        if n <= 3 {
            return Ok(());
        }
        self.check_capacity(0, n - 3, n - 3)?;
        self.triangulate_face_unchecked(f, n);
        Ok(())
    }

    fn triangulate_face_unchecked(&mut self, f: FH, mut n: usize) {
        // All new edges start at the head of this halfedge.
        let base = self.prev_halfedge(self.face_halfedge(f));
        while n > 3 {
            let target = self.next_halfedge(self.next_halfedge(base));
            let hnew = self.insert_edge_unchecked(base, target);
            if let Some(fnew) = self.halfedge_face(hnew.opposite()) {
                self.fprops.copy(f, fnew);
            }
            n -= 1;
        }
    }

    /// Triangulate every face of the mesh.
    pub fn triangulate(&mut self) -> Result<(), Error> {
        let mut total = 0usize;
        for f in self.faces() {
            total += self.face_valence(f).saturating_sub(3);
        }
        self.check_capacity(0, total, total)?;
        for fi in 0..(self.num_allocated_faces() as u32) {
            let f = FH::from(fi);
            if self.is_deleted_face(f) {
                continue;
            }
            let n = self.face_valence(f);
            self.triangulate_face_unchecked(f, n);
        }
        Ok(())
    }

    /// Number of halfedges in the loop of `h`.
    pub(crate) fn num_loop_halfedges(&self, h: HH) -> usize {
        crate::iterator::loop_ccw_iter(self, h).count()
    }

    /// Whether `h` has a face, and that face is a triangle.
    pub(crate) fn is_triangle_loop(&self, h: HH) -> bool {
        self.halfedge_face(h).is_some() && self.num_loop_halfedges(h) == 3
    }
}
