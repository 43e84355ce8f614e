/*!
Circulators around vertices, faces and edges, and iterators along halfedge
loops.

All of them are lazy, and derive every step from the current connectivity of
the mesh. Circulating around a region of the mesh while changing the topology
of that same region is undefined: the sequence may skip elements, repeat them,
or never terminate. Collect the elements first if you intend to edit them.
 */

use crate::{
    element::{EH, FH, HH, HasTopology, VH},
    topol::Topology,
};

struct OutgoingHalfedgeIter<'a, const CCW: bool> {
    topol: &'a Topology,
    hstart: Option<HH>,
    hcurrent: Option<HH>,
}

impl Iterator for OutgoingHalfedgeIter<'_, true> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.topol.ccw_rotated_halfedge(current);
        self.hcurrent = match self.hstart {
            Some(start) if start != next => Some(next),
            _ => None,
        };
        Some(current)
    }
}

impl Iterator for OutgoingHalfedgeIter<'_, false> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.topol.cw_rotated_halfedge(current);
        self.hcurrent = match self.hstart {
            Some(start) if start != next => Some(next),
            _ => None,
        };
        Some(current)
    }
}

/// Walks the `next` (or `prev`) links starting at a halfedge, until it
/// returns to the start. This covers faces as well as boundary loops.
struct LoopHalfedgeIter<'a, const CCW: bool> {
    topol: &'a Topology,
    hstart: HH,
    hcurrent: Option<HH>,
}

impl Iterator for LoopHalfedgeIter<'_, true> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.topol.next_halfedge(current);
        self.hcurrent = if next == self.hstart {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

impl Iterator for LoopHalfedgeIter<'_, false> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.hcurrent?;
        let next = self.topol.prev_halfedge(current);
        self.hcurrent = if next == self.hstart {
            None
        } else {
            Some(next)
        };
        Some(current)
    }
}

pub(crate) fn vv_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| topol.to_vertex(h))
}

pub(crate) fn vv_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_cw_iter(topol, v).map(|h| topol.to_vertex(h))
}

pub(crate) fn vih_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| h.opposite())
}

pub(crate) fn vih_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    voh_cw_iter(topol, v).map(|h| h.opposite())
}

pub(crate) fn voh_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    let h = topol.vertex_halfedge(v);
    OutgoingHalfedgeIter::<true> {
        topol,
        hstart: h,
        hcurrent: h,
    }
}

pub(crate) fn voh_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    let h = topol.vertex_halfedge(v);
    OutgoingHalfedgeIter::<false> {
        topol,
        hstart: h,
        hcurrent: h,
    }
}

pub(crate) fn ve_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = EH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| h.edge())
}

pub(crate) fn ve_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = EH> + use<'_> {
    voh_cw_iter(topol, v).map(|h| h.edge())
}

pub(crate) fn vf_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = FH> + use<'_> {
    voh_ccw_iter(topol, v).filter_map(|h| topol.halfedge_face(h))
}

pub(crate) fn vf_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = FH> + use<'_> {
    voh_cw_iter(topol, v).filter_map(|h| topol.halfedge_face(h))
}

pub(crate) fn ev_iter(topol: &Topology, e: EH) -> impl Iterator<Item = VH> + use<'_> {
    eh_iter(e).map(|h| topol.to_vertex(h))
}

pub(crate) fn eh_iter(e: EH) -> impl Iterator<Item = HH> {
    [false, true].into_iter().map(move |flag| e.halfedge(flag))
}

pub(crate) fn ef_iter(topol: &Topology, e: EH) -> impl Iterator<Item = FH> + use<'_> {
    eh_iter(e).filter_map(|h| topol.halfedge_face(h))
}

pub(crate) fn loop_ccw_iter(topol: &Topology, h: HH) -> impl Iterator<Item = HH> + use<'_> {
    LoopHalfedgeIter::<true> {
        topol,
        hstart: h,
        hcurrent: Some(h),
    }
}

pub(crate) fn loop_cw_iter(topol: &Topology, h: HH) -> impl Iterator<Item = HH> + use<'_> {
    LoopHalfedgeIter::<false> {
        topol,
        hstart: h,
        hcurrent: Some(h),
    }
}

pub(crate) fn fv_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_ccw_iter(topol, f).map(|h| topol.to_vertex(h))
}

pub(crate) fn fv_cw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_cw_iter(topol, f).map(|h| topol.to_vertex(h))
}

pub(crate) fn fh_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    loop_ccw_iter(topol, topol.face_halfedge(f))
}

pub(crate) fn fh_cw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    loop_cw_iter(topol, topol.face_halfedge(f))
}

pub(crate) fn fe_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = EH> + use<'_> {
    fh_ccw_iter(topol, f).map(|h| h.edge())
}

pub(crate) fn fe_cw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = EH> + use<'_> {
    fh_cw_iter(topol, f).map(|h| h.edge())
}

pub(crate) fn ff_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = FH> + use<'_> {
    fh_ccw_iter(topol, f).filter_map(|h| topol.halfedge_face(h.opposite()))
}

pub(crate) fn ff_cw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = FH> + use<'_> {
    fh_cw_iter(topol, f).filter_map(|h| topol.halfedge_face(h.opposite()))
}

/// Circulators available on anything that has a topology.
///
/// `ccw` and `cw` refer to the orientation of the faces: faces are assumed to
/// have their vertices in counter-clockwise order when viewed from the front.
pub trait HasIterators: HasTopology {
    /// Vertices adjacent to `v`, counter-clockwise.
    fn vv_ccw_iter(&self, v: VH) -> impl Iterator<Item = VH> {
        vv_ccw_iter(self.topology(), v)
    }

    fn vv_cw_iter(&self, v: VH) -> impl Iterator<Item = VH> {
        vv_cw_iter(self.topology(), v)
    }

    /// Halfedges pointing at `v`, counter-clockwise.
    fn vih_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> {
        vih_ccw_iter(self.topology(), v)
    }

    fn vih_cw_iter(&self, v: VH) -> impl Iterator<Item = HH> {
        vih_cw_iter(self.topology(), v)
    }

    /// Halfedges starting at `v`, counter-clockwise. On a boundary vertex the
    /// first one is a boundary halfedge.
    fn voh_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> {
        voh_ccw_iter(self.topology(), v)
    }

    fn voh_cw_iter(&self, v: VH) -> impl Iterator<Item = HH> {
        voh_cw_iter(self.topology(), v)
    }

    fn ve_ccw_iter(&self, v: VH) -> impl Iterator<Item = EH> {
        ve_ccw_iter(self.topology(), v)
    }

    fn ve_cw_iter(&self, v: VH) -> impl Iterator<Item = EH> {
        ve_cw_iter(self.topology(), v)
    }

    /// Faces incident on `v`, counter-clockwise.
    fn vf_ccw_iter(&self, v: VH) -> impl Iterator<Item = FH> {
        vf_ccw_iter(self.topology(), v)
    }

    fn vf_cw_iter(&self, v: VH) -> impl Iterator<Item = FH> {
        vf_cw_iter(self.topology(), v)
    }

    /// The two vertices of `e`.
    fn ev_iter(&self, e: EH) -> impl Iterator<Item = VH> {
        ev_iter(self.topology(), e)
    }

    fn eh_iter(&self, e: EH) -> impl Iterator<Item = HH> {
        eh_iter(e)
    }

    /// Faces on either side of `e`, at most two.
    fn ef_iter(&self, e: EH) -> impl Iterator<Item = FH> {
        ef_iter(self.topology(), e)
    }

    /// Halfedges of the loop through `h`, following the next links. Works for
    /// boundary loops as well as faces.
    fn loop_ccw_iter(&self, h: HH) -> impl Iterator<Item = HH> {
        loop_ccw_iter(self.topology(), h)
    }

    fn loop_cw_iter(&self, h: HH) -> impl Iterator<Item = HH> {
        loop_cw_iter(self.topology(), h)
    }

    fn fv_ccw_iter(&self, f: FH) -> impl Iterator<Item = VH> {
        fv_ccw_iter(self.topology(), f)
    }

    fn fv_cw_iter(&self, f: FH) -> impl Iterator<Item = VH> {
        fv_cw_iter(self.topology(), f)
    }

    fn fh_ccw_iter(&self, f: FH) -> impl Iterator<Item = HH> {
        fh_ccw_iter(self.topology(), f)
    }

    fn fh_cw_iter(&self, f: FH) -> impl Iterator<Item = HH> {
        fh_cw_iter(self.topology(), f)
    }

    fn fe_ccw_iter(&self, f: FH) -> impl Iterator<Item = EH> {
        fe_ccw_iter(self.topology(), f)
    }

    fn fe_cw_iter(&self, f: FH) -> impl Iterator<Item = EH> {
        fe_cw_iter(self.topology(), f)
    }

    /// Faces sharing an edge with `f`.
    fn ff_ccw_iter(&self, f: FH) -> impl Iterator<Item = FH> {
        ff_ccw_iter(self.topology(), f)
    }

    fn ff_cw_iter(&self, f: FH) -> impl Iterator<Item = FH> {
        ff_cw_iter(self.topology(), f)
    }
}

impl<T> HasIterators for T where T: HasTopology {}

#[cfg(test)]
mod test {
    use super::{
        ff_ccw_iter, fv_ccw_iter, fv_cw_iter, vf_ccw_iter, vf_cw_iter, vih_ccw_iter, vih_cw_iter,
        voh_ccw_iter, voh_cw_iter, vv_ccw_iter, vv_cw_iter,
    };
    use crate::{
        element::Handle,
        iterator::HasIterators,
        topol::test::{assert_cyclic_eq, loop_mesh, quad_box},
    };

    #[test]
    fn t_box_vv_ccw_iter() {
        let qbox = quad_box();
        for (vi, vis) in [
            (0u32, [4u32, 3, 1]),
            (1u32, [2u32, 5, 0]),
            (2u32, [3u32, 6, 1]),
            (3u32, [0u32, 7, 2]),
            (4u32, [5u32, 7, 0]),
            (5u32, [6u32, 4, 1]),
            (6u32, [7u32, 5, 2]),
            (7u32, [4u32, 6, 3]),
        ] {
            let actual: Vec<_> = vv_ccw_iter(&qbox, vi.into()).map(|v| v.index()).collect();
            assert_cyclic_eq(&actual, &vis);
        }
    }

    #[test]
    fn t_box_vv_cw_iter() {
        let qbox = quad_box();
        for (vi, vis) in [
            (0u32, [4, 1, 3]),
            (1u32, [2, 0, 5]),
            (2u32, [3, 1, 6]),
            (3u32, [0, 2, 7]),
            (4u32, [5, 0, 7]),
            (5u32, [6, 1, 4]),
            (6u32, [7, 2, 5]),
            (7u32, [4, 3, 6]),
        ] {
            let actual: Vec<_> = vv_cw_iter(&qbox, vi.into()).map(|v| v.index()).collect();
            assert_cyclic_eq(&actual, &vis);
        }
    }

    #[test]
    fn t_box_vih_iter() {
        let qbox = quad_box();
        for v in qbox.vertices() {
            assert!(
                vih_ccw_iter(&qbox, v).all(|h| qbox.to_vertex(h) == v && qbox.from_vertex(h) != v)
            );
            assert!(
                vih_cw_iter(&qbox, v).all(|h| qbox.to_vertex(h) == v && qbox.from_vertex(h) != v)
            );
        }
    }

    #[test]
    fn t_box_voh_iter() {
        let qbox = quad_box();
        for v in qbox.vertices() {
            assert!(
                voh_ccw_iter(&qbox, v).all(|h| qbox.from_vertex(h) == v && qbox.to_vertex(h) != v)
            );
            assert!(
                voh_cw_iter(&qbox, v).all(|h| qbox.from_vertex(h) == v && qbox.to_vertex(h) != v)
            );
            // Both directions visit the same halfedges.
            let mut ccw: Vec<_> = voh_ccw_iter(&qbox, v).collect();
            let mut cw: Vec<_> = voh_cw_iter(&qbox, v).collect();
            ccw.sort();
            cw.sort();
            assert_eq!(ccw, cw);
        }
    }

    #[test]
    fn t_box_vf_ccw_iter() {
        let qbox = quad_box();
        for (vi, fis) in [
            (0u32, [4u32, 0, 1]),
            (1u32, [2u32, 1, 0]),
            (2u32, [3u32, 2, 0]),
            (3u32, [4u32, 3, 0]),
            (4u32, [5u32, 4, 1]),
            (5u32, [5u32, 1, 2]),
            (6u32, [5u32, 2, 3]),
            (7u32, [5u32, 3, 4]),
        ] {
            let actual: Vec<_> = vf_ccw_iter(&qbox, vi.into()).map(|f| f.index()).collect();
            assert_cyclic_eq(&actual, &fis);
        }
    }

    #[test]
    fn t_box_fv_iter() {
        let qbox = quad_box();
        for (fi, vis) in [
            (0u32, [0, 3, 2, 1]),
            (1u32, [0, 1, 5, 4]),
            (2u32, [1, 2, 6, 5]),
            (3u32, [2, 3, 7, 6]),
            (4u32, [3, 0, 4, 7]),
            (5u32, [4, 5, 6, 7]),
        ] {
            let ccw: Vec<_> = fv_ccw_iter(&qbox, fi.into()).map(|v| v.index()).collect();
            assert_cyclic_eq(&ccw, &vis);
            let mut cw: Vec<_> = fv_cw_iter(&qbox, fi.into()).map(|v| v.index()).collect();
            cw.reverse();
            assert_cyclic_eq(&cw, &vis);
        }
    }

    #[test]
    fn t_box_ff_ccw_iter() {
        let qbox = quad_box();
        for (fi, fis) in [
            (0u32, [1, 4, 3, 2]),
            (1u32, [4, 0, 2, 5]),
            (2u32, [1, 0, 3, 5]),
            (3u32, [2, 0, 4, 5]),
            (4u32, [3, 0, 1, 5]),
            (5u32, [4, 1, 2, 3]),
        ] {
            let actual: Vec<_> = ff_ccw_iter(&qbox, fi.into()).map(|f| f.index()).collect();
            assert_cyclic_eq(&actual, &fis);
        }
    }

    #[test]
    fn t_loop_mesh_vf_ccw_iter() {
        let topol = loop_mesh();
        for (v, fis) in [
            (0u32, vec![0u32]),
            (1, vec![1, 0]),
            (2, vec![2, 1]),
            (3, vec![2]),
            (4, vec![0, 3]),
            (5, vec![3, 0, 1]),
            (6, vec![1, 2, 4]),
            (7, vec![4, 2]),
            (8, vec![3, 5]),
            (9, vec![6, 5, 3]),
            (10, vec![4, 7, 6]),
            (11, vec![7, 4]),
            (12, vec![5]),
            (13, vec![5, 6]),
            (14, vec![6, 7]),
            (15, vec![7]),
        ] {
            assert_eq!(
                vf_ccw_iter(&topol, v.into())
                    .map(|i| i.index())
                    .collect::<Vec<_>>(),
                fis
            );
        }
    }

    #[test]
    fn t_loop_mesh_vf_cw_iter() {
        let topol = loop_mesh();
        for (v, fis) in [
            (0u32, vec![0u32]),
            (1, vec![0, 1]),
            (2, vec![1, 2]),
            (3, vec![2]),
            (4, vec![3, 0]),
            (5, vec![1, 0, 3]),
            (6, vec![4, 2, 1]),
            (7, vec![2, 4]),
            (8, vec![5, 3]),
            (9, vec![3, 5, 6]),
            (10, vec![6, 7, 4]),
            (11, vec![4, 7]),
            (12, vec![5]),
            (13, vec![6, 5]),
            (14, vec![7, 6]),
            (15, vec![7]),
        ] {
            assert_eq!(
                vf_cw_iter(&topol, v.into())
                    .map(|i| i.index())
                    .collect::<Vec<_>>(),
                fis
            );
        }
    }

    #[test]
    fn t_loop_mesh_boundary_loops() {
        let topol = loop_mesh();
        // The hole in the middle is bounded by 4 halfedges.
        let h = topol
            .find_halfedge(5.into(), 6.into())
            .expect("Cannot find halfedge");
        assert!(topol.is_boundary_halfedge(h));
        let hole: Vec<_> = topol
            .loop_ccw_iter(h)
            .map(|h| topol.from_vertex(h).index())
            .collect();
        assert_eq!(hole, [5, 6, 10, 9]);
        let reverse: Vec<_> = topol
            .loop_cw_iter(h)
            .map(|h| topol.from_vertex(h).index())
            .collect();
        assert_eq!(reverse, [5, 9, 10, 6]);
        // The outer boundary.
        let h = topol
            .find_halfedge(1.into(), 0.into())
            .expect("Cannot find halfedge");
        assert_eq!(topol.loop_ccw_iter(h).count(), 12);
        assert!(topol.loop_ccw_iter(h).all(|h| topol.is_boundary_halfedge(h)));
    }

    #[test]
    fn t_edge_iters() {
        let topol = loop_mesh();
        let e = topol
            .find_edge(5.into(), 6.into())
            .expect("Cannot find edge");
        let mut verts: Vec<_> = topol.ev_iter(e).map(|v| v.index()).collect();
        verts.sort();
        assert_eq!(verts, [5, 6]);
        assert_eq!(topol.eh_iter(e).count(), 2);
        assert_eq!(topol.ef_iter(e).map(|f| f.index()).collect::<Vec<_>>(), [1]);
    }
}
