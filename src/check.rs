use crate::{
    element::{Handle, HH},
    error::Error,
    iterator::HasIterators,
    topol::Topology,
};

fn dangling(from: impl Handle, to: impl Handle) -> Error {
    Error::DanglingReference(from.to_string(), to.to_string())
}

/// Every stored handle must be in range, and no live element may refer to a
/// deleted one. Nothing after this can index out of bounds.
fn check_references(mesh: &Topology) -> Result<(), Error> {
    for v in mesh.vertices() {
        if let Some(h) = mesh.vertex_halfedge(v) {
            if !mesh.is_valid_halfedge(h) {
                return Err(Error::InvalidHalfedge(h));
            }
            if mesh.is_deleted_halfedge(h) {
                return Err(dangling(v, h));
            }
        }
    }
    for h in mesh.halfedges() {
        let hedge = mesh.halfedge(h);
        for link in [hedge.next, hedge.prev] {
            if !mesh.is_valid_halfedge(link) {
                return Err(Error::InvalidHalfedge(link));
            }
            if mesh.is_deleted_halfedge(link) {
                return Err(dangling(h, link));
            }
        }
        if !mesh.is_valid_vertex(hedge.vertex) {
            return Err(Error::InvalidVertex(hedge.vertex));
        }
        if mesh.is_deleted_vertex(hedge.vertex) {
            return Err(dangling(h, hedge.vertex));
        }
        if let Some(f) = hedge.face {
            if !mesh.is_valid_face(f) {
                return Err(Error::InvalidFace(f));
            }
            if mesh.is_deleted_face(f) {
                return Err(dangling(h, f));
            }
        }
    }
    for f in mesh.faces() {
        let h = mesh.face_halfedge(f);
        if !mesh.is_valid_halfedge(h) {
            return Err(Error::InvalidHalfedge(h));
        }
        if mesh.is_deleted_halfedge(h) {
            return Err(dangling(f, h));
        }
    }
    Ok(())
}

fn check_vertices(mesh: &Topology, hvisited: &mut [bool]) -> Result<(), Error> {
    hvisited.fill(false);
    let limit = hvisited.len() + 1;
    for v in mesh.vertices() {
        let Some(h) = mesh.vertex_halfedge(v) else {
            continue;
        };
        // Outgoing halfedge must point back to this vertex.
        if mesh.from_vertex(h) != v {
            return Err(Error::InvalidOutgoingHalfedges(v));
        }
        // Walk the fan both ways. Each outgoing halfedge must be visited
        // exactly once in each direction.
        let mut count = 0usize;
        for h in mesh.voh_ccw_iter(v).take(limit) {
            count += 1;
            if mesh.from_vertex(h) != v || std::mem::replace(&mut hvisited[h.index() as usize], true)
            {
                return Err(Error::InvalidOutgoingHalfedges(v));
            }
        }
        if count == limit {
            return Err(Error::InvalidOutgoingHalfedges(v));
        }
        for h in mesh.voh_cw_iter(v).take(limit) {
            count -= 1;
            if !std::mem::replace(&mut hvisited[h.index() as usize], false) {
                return Err(Error::InvalidOutgoingHalfedges(v));
            }
        }
        if count != 0 {
            return Err(Error::InvalidOutgoingHalfedges(v));
        }
        // The outgoing halfedge must be a boundary halfedge, or none of the
        // halfedges are boundary.
        if !mesh.is_boundary_halfedge(h)
            && mesh.voh_ccw_iter(v).any(|h| mesh.is_boundary_halfedge(h))
        {
            return Err(Error::OutgoingHalfedgeNotBoundary(v));
        }
    }
    Ok(())
}

fn check_halfedges(mesh: &Topology, hflags: &mut [bool]) -> Result<(), Error> {
    for h in mesh.halfedges() {
        let head = mesh.to_vertex(h);
        let tail = mesh.from_vertex(h);
        if tail == head {
            return Err(Error::DegenerateHalfedge(h));
        }
        let hedge = mesh.halfedge(h);
        if mesh.next_halfedge(hedge.prev) != h
            || mesh.prev_halfedge(hedge.next) != h
            || head != mesh.from_vertex(hedge.next)
            || tail != mesh.to_vertex(hedge.prev)
        {
            return Err(Error::InvalidHalfedgeLink(h));
        }
        // Halfedge must be found in the circulators around head and tail.
        if !mesh.voh_ccw_iter(tail).any(|hh| hh == h) || !mesh.vih_ccw_iter(head).any(|hh| hh == h)
        {
            return Err(Error::InvalidHalfedgeVertexLink(h));
        }
    }
    // Every halfedge belongs to exactly one loop, and all halfedges of a loop
    // share the same face.
    hflags.fill(false);
    let limit = hflags.len() + 1;
    for h in mesh.halfedges() {
        if hflags[h.index() as usize] {
            continue;
        }
        let f = mesh.halfedge_face(h);
        let mut count = 0usize;
        for hh in mesh.loop_ccw_iter(h).take(limit) {
            count += 1;
            if std::mem::replace(&mut hflags[hh.index() as usize], true) {
                return Err(Error::InvalidLoopTopology(hh));
            }
            if mesh.halfedge_face(hh) != f {
                return Err(Error::InconsistentFaceInLoop(hh));
            }
        }
        if count == limit {
            return Err(Error::InvalidLoopTopology(h));
        }
    }
    Ok(())
}

fn check_faces(mesh: &Topology) -> Result<(), Error> {
    for f in mesh.faces() {
        let h: HH = mesh.face_halfedge(f);
        if mesh.halfedge_face(h) != Some(f) {
            return Err(Error::InvalidFaceHalfedgeLink(f, h));
        }
    }
    Ok(())
}

impl Topology {
    /// Check the consistency of the connectivity. Deleted elements are
    /// skipped, but live elements referring to them are reported.
    ///
    /// This walks every element and is meant for tests and debugging.
    pub fn check_topology(&self) -> Result<(), Error> {
        check_references(self)?;
        // To keep track of visited halfedges.
        let mut hvisited = vec![false; self.num_allocated_halfedges()].into_boxed_slice();
        check_vertices(self, &mut hvisited)?;
        check_halfedges(self, &mut hvisited)?;
        check_faces(self)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        element::{FH, HH, VH},
        error::Error,
        topol::test::{loop_mesh, quad_box, two_triangles},
    };

    #[test]
    fn t_valid_meshes() {
        quad_box().check_topology().expect("Topological errors found");
        loop_mesh().check_topology().expect("Topological errors found");
        two_triangles()
            .check_topology()
            .expect("Topological errors found");
    }

    #[test]
    fn t_broken_face_link() {
        let mut mesh = two_triangles();
        let h = mesh
            .find_halfedge(1.into(), 0.into())
            .expect("Cannot find halfedge");
        // Point a face at a boundary halfedge.
        mesh.face_mut(0.into()).halfedge = h;
        assert!(matches!(
            mesh.check_topology(),
            Err(Error::InvalidFaceHalfedgeLink(_, _)) | Err(Error::InconsistentFaceInLoop(_))
        ));
    }

    #[test]
    fn t_interior_outgoing_halfedge() {
        let mut mesh = two_triangles();
        let h: HH = mesh
            .find_halfedge(0.into(), 2.into())
            .expect("Cannot find halfedge");
        assert!(!mesh.is_boundary_halfedge(h));
        mesh.set_vertex_halfedge(VH::from(0), h);
        assert!(matches!(
            mesh.check_topology(),
            Err(Error::OutgoingHalfedgeNotBoundary(v)) if v == 0.into()
        ));
    }

    #[test]
    fn t_dangling_reference() {
        let mut mesh = two_triangles();
        mesh.fdeleted[FH::from(1)] = true;
        mesh.num_deleted_faces += 1;
        assert!(matches!(
            mesh.check_topology(),
            Err(Error::DanglingReference(_, _))
        ));
    }
}
