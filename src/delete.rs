use tracing::debug;

use crate::{
    element::{EH, Edge, FH, HH, Handle, INVALID_INDEX, VH},
    error::Error,
    iterator,
    topol::{TopolCache, Topology},
};

impl Topology {
    /// Delete the vertex `v` and all faces incident on it. Edges and vertices
    /// left without faces are deleted as well.
    pub fn delete_vertex(&mut self, v: VH, cache: &mut TopolCache) -> Result<(), Error> {
        if !self.is_valid_vertex(v) {
            return Err(Error::InvalidVertex(v));
        }
        if self.is_deleted_vertex(v) {
            return Ok(());
        }
        cache.faces.clear();
        cache.faces.extend(iterator::vf_ccw_iter(self, v));
        let mut faces = std::mem::take(&mut cache.faces);
        for &f in faces.iter() {
            self.delete_face_unchecked(f, cache);
        }
        faces.clear();
        cache.faces = faces;
        // Deleting the faces may already have deleted the vertex.
        if !self.is_deleted_vertex(v) {
            self.mark_vertex_deleted(v);
        }
        Ok(())
    }

    /// Delete the faces on either side of the edge `e`, which deletes the edge
    /// itself.
    pub fn delete_edge(&mut self, e: EH, cache: &mut TopolCache) -> Result<(), Error> {
        if !self.is_valid_edge(e) {
            return Err(Error::InvalidEdge(e));
        }
        if self.is_deleted_edge(e) {
            return Ok(());
        }
        let (h0, h1) = e.halfedges();
        let f0 = self.halfedge_face(h0);
        let f1 = self.halfedge_face(h1);
        if let Some(f) = f0 {
            self.delete_face_unchecked(f, cache);
        }
        if let Some(f) = f1 {
            self.delete_face_unchecked(f, cache);
        }
        Ok(())
    }

    /// Delete the face `f`. Its edges that are left without faces are deleted,
    /// and so are vertices that become isolated.
    pub fn delete_face(&mut self, f: FH, cache: &mut TopolCache) -> Result<(), Error> {
        if !self.is_valid_face(f) {
            return Err(Error::InvalidFace(f));
        }
        self.delete_face_unchecked(f, cache);
        Ok(())
    }

    fn mark_vertex_deleted(&mut self, v: VH) {
        self.vdeleted[v] = true;
        self.num_deleted_vertices += 1;
        self.vertex_mut(v).halfedge = None;
    }

    fn delete_face_unchecked(&mut self, f: FH, cache: &mut TopolCache) {
        if self.is_deleted_face(f) {
            return;
        }
        self.fdeleted[f] = true;
        self.num_deleted_faces += 1;
        // Detach the halfedges from the face, and collect the edges that are
        // left without faces.
        cache.halfedges.clear();
        cache.halfedges.extend(iterator::fh_ccw_iter(self, f));
        cache.edges.clear();
        cache.vertices.clear();
        for &h in cache.halfedges.iter() {
            self.halfedge_mut(h).face = None;
            if self.is_boundary_halfedge(h.opposite()) {
                cache.edges.push(h.edge());
            }
            cache.vertices.push(self.to_vertex(h));
        }
        for &e in cache.edges.iter() {
            let (h0, h1) = e.halfedges();
            let v0 = self.to_vertex(h0);
            let next0 = self.next_halfedge(h0);
            let prev0 = self.prev_halfedge(h0);
            let v1 = self.to_vertex(h1);
            let next1 = self.next_halfedge(h1);
            let prev1 = self.prev_halfedge(h1);
            // Splice the edge out of its boundary loops.
            self.link_halfedges(prev0, next1);
            self.link_halfedges(prev1, next0);
            if !self.edeleted[e] {
                self.edeleted[e] = true;
                self.num_deleted_edges += 1;
            }
            if self.vertex_halfedge(v0) == Some(h1) {
                if next0 == h1 {
                    if !self.vdeleted[v0] {
                        self.mark_vertex_deleted(v0);
                    }
                } else {
                    self.set_vertex_halfedge(v0, next0);
                }
            }
            if self.vertex_halfedge(v1) == Some(h0) {
                if next1 == h0 {
                    if !self.vdeleted[v1] {
                        self.mark_vertex_deleted(v1);
                    }
                } else {
                    self.set_vertex_halfedge(v1, next1);
                }
            }
        }
        for &v in cache.vertices.iter() {
            if !self.vdeleted[v] {
                self.adjust_outgoing_halfedge(v);
            }
        }
    }

    /// Remove all deleted elements from the tables, and compact them. The
    /// surviving elements keep their relative order, and all properties are
    /// compacted along with the connectivity.
    ///
    /// Every handle obtained before this call must be considered stale
    /// afterwards. This does nothing if the mesh has no garbage.
    pub fn garbage_collection(&mut self, cache: &mut TopolCache) {
        if !self.has_garbage() {
            return;
        }
        let nv = self.vertices.len();
        let ne = self.edges.len();
        let nf = self.faces.len();
        // Old to new index maps.
        fn build_map(deleted: &[bool], map: &mut Vec<u32>) -> usize {
            map.clear();
            let mut count = 0u32;
            map.extend(deleted.iter().map(|d| {
                if *d {
                    INVALID_INDEX
                } else {
                    count += 1;
                    count - 1
                }
            }));
            count as usize
        }
        let nv_new = build_map(&self.vdeleted, &mut cache.vmap);
        let ne_new = build_map(&self.edeleted, &mut cache.emap);
        let nf_new = build_map(&self.fdeleted, &mut cache.fmap);
        // Move the survivors into place. Every survivor moves to a lower or
        // equal index, so the slot it moves to is either its own or already
        // vacated.
        for (old, &new) in cache.vmap.iter().enumerate() {
            let new = new as usize;
            if new != INVALID_INDEX as usize && new != old {
                self.vertices.swap(old, new);
                self.vprops.swap(old, new);
            }
        }
        for (old, &new) in cache.emap.iter().enumerate() {
            let new = new as usize;
            if new != INVALID_INDEX as usize && new != old {
                self.edges.swap(old, new);
                self.eprops.swap(old, new);
                self.hprops.swap(2 * old, 2 * new);
                self.hprops.swap(2 * old + 1, 2 * new + 1);
            }
        }
        for (old, &new) in cache.fmap.iter().enumerate() {
            let new = new as usize;
            if new != INVALID_INDEX as usize && new != old {
                self.faces.swap(old, new);
                self.fprops.swap(old, new);
            }
        }
        self.vertices.truncate(nv_new);
        self.vprops.resize(nv_new);
        self.edges.truncate(ne_new);
        self.eprops.resize(ne_new);
        self.hprops.resize(ne_new * 2);
        self.faces.truncate(nf_new);
        self.fprops.resize(nf_new);
        self.vdeleted.clear();
        self.vdeleted.resize(nv_new, false);
        self.edeleted.clear();
        self.edeleted.resize(ne_new, false);
        self.fdeleted.clear();
        self.fdeleted.resize(nf_new, false);
        // Remap the connectivity.
        let vmap = &cache.vmap;
        let emap = &cache.emap;
        let fmap = &cache.fmap;
        let hmap = |h: HH| -> HH {
            let e = emap[(h.index() >> 1) as usize];
            debug_assert_ne!(e, INVALID_INDEX);
            ((e << 1) | (h.index() & 1)).into()
        };
        for vertex in self.vertices.iter_mut() {
            if let Some(h) = vertex.halfedge {
                let e = emap[(h.index() >> 1) as usize];
                vertex.halfedge = if e == INVALID_INDEX {
                    None
                } else {
                    Some(hmap(h))
                };
            }
        }
        for Edge { halfedges } in self.edges.iter_mut() {
            for hedge in halfedges.iter_mut() {
                hedge.vertex = vmap[hedge.vertex.index() as usize].into();
                hedge.next = hmap(hedge.next);
                hedge.prev = hmap(hedge.prev);
                hedge.face = hedge.face.map(|f| fmap[f.index() as usize].into());
            }
        }
        for face in self.faces.iter_mut() {
            face.halfedge = hmap(face.halfedge);
        }
        self.num_deleted_vertices = 0;
        self.num_deleted_edges = 0;
        self.num_deleted_faces = 0;
        self.free_memory();
        debug!(
            "Garbage collection removed {} vertices, {} edges and {} faces",
            nv - nv_new,
            ne - ne_new,
            nf - nf_new
        );
    }
}
