use tracing::debug;

use crate::{
    element::{HH, VH},
    error::Error,
    iterator,
    topol::{TopolCache, Topology},
};

impl Topology {
    /// Check if it is safe to collapse the halfedge `h`, i.e. to merge its
    /// tail vertex into its head vertex.
    ///
    /// This only checks for topological errors, and doesn't account for the
    /// shape of the mesh.
    pub fn is_collapse_ok(&self, h: HH) -> bool {
        if self.check_halfedge(h).is_err() {
            return false;
        }
        let oh = h.opposite();
        let v0 = self.to_vertex(oh);
        let v1 = self.to_vertex(h);
        if self.is_deleted_vertex(v0) || self.is_deleted_vertex(v1) {
            return false;
        }
        if self.is_boundary_halfedge(h) && self.is_boundary_halfedge(oh) {
            return false;
        }
        // The vertices opposite to the edge, on the sides that are triangles.
        // The other two edges of such a triangle must not both be boundary
        // edges, or the collapse would leave a dangling edge.
        let apex = |h: HH| -> Result<Option<VH>, ()> {
            if !self.is_triangle_loop(h) {
                return Ok(None);
            }
            let h1 = self.next_halfedge(h);
            let h2 = self.next_halfedge(h1);
            if self.is_boundary_halfedge(h1.opposite()) && self.is_boundary_halfedge(h2.opposite())
            {
                return Err(());
            }
            Ok(Some(self.to_vertex(h1)))
        };
        let (Ok(vl), Ok(vr)) = (apex(h), apex(oh)) else {
            return false;
        };
        if vl.is_some() && vl == vr {
            return false;
        }
        // An interior edge between two boundary vertices would pinch two
        // boundary loops together.
        if self.is_boundary_vertex(v0)
            && self.is_boundary_vertex(v1)
            && !self.is_boundary_halfedge(h)
            && !self.is_boundary_halfedge(oh)
        {
            return false;
        }
        // Link condition. The only vertices adjacent to both ends can be the
        // apices of the triangles on either side.
        if iterator::vv_ccw_iter(self, v0).any(|v| {
            v != v1
                && Some(v) != vl
                && Some(v) != vr
                && self.find_halfedge(v, v1).is_some()
        }) {
            return false;
        }
        // The edge between the two apices must not be in the links of both
        // ends, otherwise two faces would collapse onto each other.
        if let (Some(vl), Some(vr)) = (vl, vr) {
            if let Some(hlr) = self.find_halfedge(vl, vr) {
                let third = |h: HH| {
                    self.is_triangle_loop(h)
                        .then(|| self.to_vertex(self.next_halfedge(h)))
                };
                let (a, b) = (third(hlr), third(hlr.opposite()));
                if (a == Some(v0) && b == Some(v1)) || (a == Some(v1) && b == Some(v0)) {
                    return false;
                }
            }
        }
        // A triangle whose other two edges border the same polygon would fold
        // that polygon onto itself.
        for (side, is_tri) in [(h, vl.is_some()), (oh, vr.is_some())] {
            if !is_tri {
                continue;
            }
            let h1 = self.next_halfedge(side).opposite();
            let h2 = self.prev_halfedge(side).opposite();
            if let (Some(fa), Some(fb)) = (self.halfedge_face(h1), self.halfedge_face(h2)) {
                if fa == fb && self.face_valence(fa) != 3 {
                    return false;
                }
            }
        }
        true
    }

    /// Remove a loop of two halfedges left behind by a collapse. `h` is kept
    /// track of by its edge, which gets deleted. The other halfedge of the
    /// loop takes its place next to the opposite of `h`.
    fn collapse_degenerate_loop(&mut self, h: HH) {
        let h1 = self.next_halfedge(h);
        let o = h.opposite();
        let o1 = h1.opposite();
        let v0 = self.to_vertex(h);
        let v1 = self.to_vertex(h1);
        let fh = self.halfedge_face(h);
        let fo = self.halfedge_face(o);
        debug_assert_eq!(self.next_halfedge(h1), h);
        debug_assert_ne!(h1, o);
        // Rewire halfedge -> halfedge.
        self.link_halfedges(h1, self.next_halfedge(o));
        self.link_halfedges(self.prev_halfedge(o), h1);
        // Rewire halfedge -> face.
        self.halfedge_mut(h1).face = fo;
        // Rewire vertex -> halfedge.
        self.set_vertex_halfedge(v0, h1);
        self.adjust_outgoing_halfedge(v0);
        self.set_vertex_halfedge(v1, o1);
        self.adjust_outgoing_halfedge(v1);
        // Rewire face -> halfedge.
        if let Some(fo) = fo {
            if self.face_halfedge(fo) == o {
                self.face_mut(fo).halfedge = h1;
            }
        }
        // Delete stuff.
        if let Some(fh) = fh {
            self.fdeleted[fh] = true;
            self.num_deleted_faces += 1;
        }
        self.edeleted[h.edge()] = true;
        self.num_deleted_edges += 1;
    }

    /// Collapse the halfedge `h`.
    ///
    /// The vertex at the start of the halfedge is deleted, and all the
    /// topology associated with it is rewired to the vertex that the halfedge
    /// points to. Triangles incident on the edge degenerate and are deleted.
    /// If [`Topology::is_collapse_ok`] is false, an error is returned and the
    /// mesh is not modified.
    pub fn collapse(&mut self, h: HH, cache: &mut TopolCache) -> Result<(), Error> {
        if !self.is_collapse_ok(h) {
            debug!("Rejected collapse of {}", h);
            return Err(Error::CollapseNotAllowed(h));
        }
        // Collect neighboring topology.
        let hn = self.next_halfedge(h);
        let hp = self.prev_halfedge(h);
        let o = h.opposite();
        let on = self.next_halfedge(o);
        let op = self.prev_halfedge(o);
        let fh = self.halfedge_face(h);
        let fo = self.halfedge_face(o);
        let vh = self.to_vertex(h);
        let vo = self.to_vertex(o);
        // Rewire halfedge -> vertex.
        cache.halfedges.clear();
        cache.halfedges.extend(iterator::vih_ccw_iter(self, vo));
        for &ih in cache.halfedges.iter() {
            self.halfedge_mut(ih).vertex = vh;
        }
        // Rewire halfedge -> halfedge.
        self.link_halfedges(hp, hn);
        self.link_halfedges(op, on);
        // Rewire face -> halfedge.
        if let Some(fh) = fh {
            self.face_mut(fh).halfedge = hn;
        }
        if let Some(fo) = fo {
            self.face_mut(fo).halfedge = on;
        }
        // Rewire vertex -> halfedge.
        if self.vertex_halfedge(vh) == Some(o) {
            self.set_vertex_halfedge(vh, hn);
        }
        self.adjust_outgoing_halfedge(vh);
        self.vertex_mut(vo).halfedge = None;
        // Delete stuff.
        self.edeleted[h.edge()] = true;
        self.num_deleted_edges += 1;
        self.vdeleted[vo] = true;
        self.num_deleted_vertices += 1;
        // Loops that used to be triangles are now degenerate.
        if self.next_halfedge(hn) == hp {
            self.collapse_degenerate_loop(hn);
        }
        if self.next_halfedge(on) == op {
            self.collapse_degenerate_loop(on);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        element::{HH, Handle},
        error::Error,
        iterator,
        topol::{
            TopolCache, Topology,
            test::{loop_mesh, quad_box, tetrahedron, two_triangles},
        },
    };

    fn face_kinds(topol: &Topology) -> (usize, usize) {
        topol
            .faces()
            .fold((0usize, 0usize), |(t, q), f| match topol.face_valence(f) {
                3 => (t + 1, q),
                4 => (t, q + 1),
                _ => (t, q),
            })
    }

    #[test]
    fn t_box_is_collapse_ok() {
        let qbox = quad_box();
        assert!(qbox.halfedges().all(|h| qbox.is_collapse_ok(h)));
    }

    #[test]
    fn t_loop_mesh_is_collapse_ok() {
        let mesh = loop_mesh();
        assert_eq!(48, mesh.num_halfedges());
        // The edges spanning different boundary loops cannot be
        // collapsed. There are 8 of them, i.e. 16 halfedges. The remaining 32
        // can be collapsed.
        assert_eq!(
            (32, 16),
            mesh.halfedges().fold((0usize, 0usize), |(can, cannot), h| {
                if mesh.is_collapse_ok(h) {
                    (can + 1, cannot)
                } else {
                    (can, 1 + cannot)
                }
            })
        );
    }

    #[test]
    fn t_tetrahedron_collapse_not_allowed() {
        let mut tet = tetrahedron();
        let mut cache = TopolCache::default();
        // Collapsing any edge of a tetrahedron leaves two triangles glued
        // back to back.
        for h in tet.halfedges().collect::<Vec<HH>>() {
            assert!(!tet.is_collapse_ok(h));
            assert!(matches!(
                tet.collapse(h, &mut cache),
                Err(Error::CollapseNotAllowed(_))
            ));
        }
        assert_eq!(tet.num_vertices(), 4);
        assert_eq!(tet.num_edges(), 6);
        assert_eq!(tet.num_faces(), 4);
        assert!(!tet.has_garbage());
        tet.check_topology().expect("Topological errors found");
    }

    #[test]
    fn t_lone_triangle_collapse_not_allowed() {
        let mut topol = Topology::default();
        let mut cache = TopolCache::default();
        topol.add_vertices(3).expect("Cannot add vertices");
        topol
            .add_tri_face(0.into(), 1.into(), 2.into(), &mut cache)
            .expect("Cannot add face");
        for h in topol.halfedges().collect::<Vec<_>>() {
            assert!(topol.collapse(h, &mut cache).is_err());
        }
        assert_eq!(topol.num_vertices(), 3);
        assert_eq!(topol.num_faces(), 1);
    }

    #[test]
    fn t_collapse_triangle_pair() {
        let mut topol = two_triangles();
        let mut cache = TopolCache::default();
        // Collapse the boundary edge 0 -> 1. Face (0, 1, 2) degenerates.
        let h = topol
            .find_halfedge(0.into(), 1.into())
            .expect("Cannot find halfedge");
        topol.collapse(h, &mut cache).expect("Cannot collapse");
        assert_eq!(topol.num_vertices(), 3);
        assert_eq!(topol.num_edges(), 3);
        assert_eq!(topol.num_faces(), 1);
        assert!(topol.is_deleted_vertex(0.into()));
        assert!(topol.has_garbage());
        // Deleted faces are never visited.
        assert!(topol.faces().all(|f| !topol.is_deleted_face(f)));
        assert_eq!(topol.faces().map(|f| f.index()).collect::<Vec<_>>(), [1]);
        let mut verts: Vec<_> = iterator::fv_ccw_iter(&topol, 1.into())
            .map(|v| v.index())
            .collect();
        verts.sort();
        assert_eq!(verts, [1, 2, 3]);
        topol.check_topology().expect("Topological errors found");
    }

    #[test]
    fn t_box_edge_collapse() {
        let mut qbox = quad_box();
        let mut cache = TopolCache::default();
        let h = qbox
            .find_halfedge(5.into(), 6.into())
            .expect("Cannot find halfedge");
        qbox.collapse(h, &mut cache).expect("Cannot collapse edge");
        assert_eq!(qbox.num_faces(), 6);
        assert_eq!((2, 4), face_kinds(&qbox));
        assert_eq!(qbox.num_edges(), 11);
        assert_eq!(qbox.num_halfedges(), 22);
        assert_eq!(qbox.num_vertices(), 7);
        assert!(qbox.is_deleted_vertex(5.into()));
        assert_eq!(qbox.vertex_valence(6.into()), 4);
        qbox.check_topology().expect("Topological errors found");
    }

    #[test]
    fn t_box_double_edge_collapse() {
        let mut qbox = quad_box();
        let mut cache = TopolCache::default();
        // Collapse two opposite edges of a face, to produce a triangular prism.
        let h = qbox
            .find_halfedge(5.into(), 6.into())
            .expect("Cannot find halfedge");
        qbox.collapse(h, &mut cache).expect("Cannot collapse edge");
        let h = qbox
            .find_halfedge(4.into(), 7.into())
            .expect("Cannot find halfedge");
        qbox.collapse(h, &mut cache).expect("Cannot collapse edge");
        assert_eq!(qbox.num_edges(), 9);
        assert_eq!(qbox.num_halfedges(), 18);
        assert_eq!(qbox.num_faces(), 5);
        assert_eq!(qbox.num_vertices(), 6);
        assert_eq!((2, 3), face_kinds(&qbox));
        qbox.check_topology().expect("Topological errors found");
    }

    #[test]
    fn t_collapse_interior_vertex() {
        // Fan of 4 triangles around vertex 4, in the middle of a square.
        let mut topol = Topology::default();
        let mut cache = TopolCache::default();
        topol.add_vertices(5).expect("Cannot add vertices");
        for [a, b, c] in [[0u32, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]] {
            topol
                .add_tri_face(a.into(), b.into(), c.into(), &mut cache)
                .expect("Cannot add face");
        }
        let h = topol
            .find_halfedge(4.into(), 0.into())
            .expect("Cannot find halfedge");
        topol.collapse(h, &mut cache).expect("Cannot collapse");
        assert_eq!(topol.num_vertices(), 4);
        assert_eq!(topol.num_faces(), 2);
        assert_eq!(topol.num_edges(), 5);
        assert_eq!(topol.vertex_valence(0.into()), 3);
        assert!(topol.is_triangle_mesh());
        topol.check_topology().expect("Topological errors found");
    }
}
