use std::ops::{Mul, Neg, Range};

use crate::{
    element::VH,
    error::Error,
    mesh::{Adaptor, FloatScalarAdaptor, PolyMeshT},
};

/// Handle of the `i`-th vertex of a contiguous range.
fn nth(verts: &Range<u32>, i: u32) -> VH {
    VH::from(verts.start + i)
}

impl<A> PolyMeshT<3, A>
where
    A: Adaptor<3>,
{
    /// Makes a box with the following topology, spanning from the min point to
    /// the max point.
    ///
    ///  ```text
    ///       7-----------6
    ///      /|          /|
    ///     / |         / |
    ///    4-----------5  |
    ///    |  |        |  |
    ///    |  3--------|--2
    ///    | /         | /
    ///    |/          |/
    ///    0-----------1
    ///  ```
    pub fn quad_box(min: A::Vector, max: A::Vector) -> Result<Self, Error> {
        const CORNERS: [[bool; 3]; 8] = [
            [false, false, false],
            [true, false, false],
            [true, true, false],
            [false, true, false],
            [false, false, true],
            [true, false, true],
            [true, true, true],
            [false, true, true],
        ];
        const FACES: [[u32; 4]; 6] = [
            [0, 3, 2, 1],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
            [4, 5, 6, 7],
        ];
        let mut qbox = Self::with_capacity(8, 12, 6);
        let pos = CORNERS.map(|corner| {
            let mut coords = [A::vector_coord(&min, 0); 3];
            for (i, coord) in coords.iter_mut().enumerate() {
                *coord = A::vector_coord(if corner[i] { &max } else { &min }, i);
            }
            A::vector(coords)
        });
        let verts = qbox.add_vertices(&pos)?;
        for [a, b, c, d] in FACES {
            qbox.add_quad_face(
                nth(&verts, a),
                nth(&verts, b),
                nth(&verts, c),
                nth(&verts, d),
            )?;
        }
        Ok(qbox)
    }

    /// Box of size 1, spanning from the origin to (1, 1, 1).
    pub fn unit_box() -> Result<Self, Error>
    where
        A: FloatScalarAdaptor<3>,
    {
        Self::quad_box(
            A::vector([A::scalarf64(0.0); 3]),
            A::vector([A::scalarf64(1.0); 3]),
        )
    }
}

/// Platonic solids centered at the origin, with their vertices on the sphere
/// of the given radius.
impl<A> PolyMeshT<3, A>
where
    A: Adaptor<3> + FloatScalarAdaptor<3>,
    A::Scalar: Mul<Output = A::Scalar> + Neg<Output = A::Scalar>,
{
    pub fn tetrahedron(radius: A::Scalar) -> Result<Self, Error> {
        let mut mesh = Self::with_capacity(4, 6, 4);
        let zero = A::scalarf64(0.0);
        let a = radius * A::scalarf64(1.0 / 3.0);
        let b = radius * A::scalarf64((8.0f64 / 9.0).sqrt());
        let c = radius * A::scalarf64((2.0f64 / 9.0).sqrt());
        let d = radius * A::scalarf64((2.0f64 / 3.0).sqrt());
        let verts = mesh.add_vertices(&[
            A::vector([zero, zero, radius]),
            A::vector([-c, d, -a]),
            A::vector([-c, -d, -a]),
            A::vector([b, zero, -a]),
        ])?;
        for [i, j, k] in [[0, 1, 2], [0, 2, 3], [0, 3, 1], [3, 2, 1]] {
            mesh.add_tri_face(nth(&verts, i), nth(&verts, j), nth(&verts, k))?;
        }
        Ok(mesh)
    }

    /// Cube with quadrilateral faces.
    pub fn hexahedron(radius: A::Scalar) -> Result<Self, Error> {
        let mut mesh = Self::with_capacity(8, 12, 6);
        let a = radius * A::scalarf64(1.0 / 3.0f64.sqrt());
        let verts = mesh.add_vertices(&[
            A::vector([-a, -a, -a]),
            A::vector([a, -a, -a]),
            A::vector([a, a, -a]),
            A::vector([-a, a, -a]),
            A::vector([-a, -a, a]),
            A::vector([a, -a, a]),
            A::vector([a, a, a]),
            A::vector([-a, a, a]),
        ])?;
        for [i, j, k, l] in [
            [3, 2, 1, 0],
            [2, 6, 5, 1],
            [5, 6, 7, 4],
            [0, 4, 7, 3],
            [3, 7, 6, 2],
            [1, 5, 4, 0],
        ] {
            mesh.add_quad_face(
                nth(&verts, i),
                nth(&verts, j),
                nth(&verts, k),
                nth(&verts, l),
            )?;
        }
        Ok(mesh)
    }

    pub fn octahedron(radius: A::Scalar) -> Result<Self, Error> {
        let mut mesh = Self::with_capacity(6, 12, 8);
        let zero = A::scalarf64(0.0);
        let verts = mesh.add_vertices(&[
            A::vector([radius, zero, zero]),
            A::vector([zero, radius, zero]),
            A::vector([-radius, zero, zero]),
            A::vector([zero, -radius, zero]),
            A::vector([zero, zero, radius]),
            A::vector([zero, zero, -radius]),
        ])?;
        for [i, j, k] in [
            [0, 4, 3],
            [1, 4, 0],
            [2, 4, 1],
            [3, 4, 2],
            [3, 5, 0],
            [0, 5, 1],
            [1, 5, 2],
            [2, 5, 3],
        ] {
            mesh.add_tri_face(nth(&verts, i), nth(&verts, j), nth(&verts, k))?;
        }
        Ok(mesh)
    }
}
