use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    element::{Handle, VH},
    error::Error,
    iterator::HasIterators,
    mesh::{Adaptor, FloatScalarAdaptor, PolyMeshT},
};

impl<A> PolyMeshT<3, A>
where
    A: Adaptor<3> + FloatScalarAdaptor<3>,
{
    /// Load a mesh from a Wavefront OBJ file. The models in the file are
    /// concatenated into a single mesh. Faces that cannot be added make the
    /// whole load fail.
    ///
    /// Vertices not referenced by any face are dropped, and the others are
    /// numbered in the order they are first referenced.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let options = tobj::LoadOptions::default();
        let (models, _) = tobj::load_obj(path, &options).map_err(|e| Error::ObjLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let (nverts, nfaces) = models.iter().fold((0usize, 0usize), |(nv, nf), model| {
            let mesh = &model.mesh;
            let nf_model = if mesh.face_arities.is_empty() {
                mesh.indices.len() / 3
            } else {
                mesh.face_arities.len()
            };
            (nv + mesh.positions.len() / 3, nf + nf_model)
        });
        let mut outmesh = Self::with_capacity(nverts, nfaces * 3 / 2, nfaces);
        let mut positions = Vec::new();
        let mut fverts: Vec<VH> = Vec::new();
        for model in models {
            let mesh = model.mesh;
            if mesh.positions.len() % 3 != 0 {
                return Err(Error::IncorrectNumberOfCoordinates(mesh.positions.len()));
            }
            positions.clear();
            positions.extend(mesh.positions.chunks_exact(3).map(|triplet| {
                A::vector([
                    A::scalarf64(triplet[0]),
                    A::scalarf64(triplet[1]),
                    A::scalarf64(triplet[2]),
                ])
            }));
            let voffset = outmesh.add_vertices(&positions)?.start;
            let mut add_face = |indices: &[u32]| -> Result<(), Error> {
                fverts.clear();
                fverts.extend(indices.iter().map(|i| VH::from(i + voffset)));
                outmesh.add_face(&fverts)?;
                Ok(())
            };
            if mesh.face_arities.is_empty() {
                for tri in mesh.indices.chunks_exact(3) {
                    add_face(tri)?;
                }
            } else {
                let mut start = 0usize;
                for size in mesh.face_arities {
                    let end = start + size as usize;
                    add_face(&mesh.indices[start..end])?;
                    start = end;
                }
            }
        }
        Ok(outmesh)
    }

    /// Write the mesh to a Wavefront OBJ file. Vertices and faces are written
    /// in the order of their indices, so the mesh must not contain deleted
    /// elements.
    pub fn write_obj(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        if self.has_garbage() {
            return Err(Error::GarbageCollectionRequired);
        }
        let points = self.points()?;
        let mut writer = BufWriter::new(File::create(path)?);
        for v in self.vertices() {
            let p = &points[v];
            writeln!(
                writer,
                "v {} {} {}",
                A::to_f64(A::vector_coord(p, 0)),
                A::to_f64(A::vector_coord(p, 1)),
                A::to_f64(A::vector_coord(p, 2))
            )?;
        }
        for f in self.faces() {
            write!(writer, "f")?;
            for v in self.fv_ccw_iter(f) {
                write!(writer, " {}", v.index() + 1)?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use crate::{
        element::{FH, Handle, VH},
        error::Error,
        iterator::HasIterators,
        mesh::test::ArrayMesh,
        topol::test::assert_cyclic_eq,
    };

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("halfmesh-{}-{}.obj", name, std::process::id()))
    }

    fn face_vertices(mesh: &ArrayMesh, f: FH) -> Vec<u32> {
        mesh.fv_ccw_iter(f).map(|v| v.index()).collect()
    }

    fn face_points(mesh: &ArrayMesh, f: FH) -> Vec<[f64; 3]> {
        let points = mesh.points().expect("Cannot read points");
        mesh.fv_ccw_iter(f).map(|v| points[v]).collect()
    }

    fn assert_same_corners(actual: &[[f64; 3]], expected: &[[f64; 3]]) {
        assert_eq!(actual.len(), expected.len());
        let shift = expected
            .iter()
            .position(|p| *p == actual[0])
            .expect("Cannot find a matching corner");
        for (i, p) in actual.iter().enumerate() {
            assert_eq!(*p, expected[(i + shift) % expected.len()]);
        }
    }

    #[test]
    fn t_load_mixed_faces() {
        let path = temp_path("mixed");
        std::fs::write(
            &path,
            "o first\n\
             v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 2 0.5 0\n\
             f 1 2 3 4\nf 2 5 3\n\
             o second\n\
             v 0 0 1\nv 1 0 1\nv 0 1 1\n\
             f 6 7 8\n",
        )
        .expect("Cannot write test file");
        let mesh = ArrayMesh::load_obj(&path).expect("Cannot load OBJ file");
        std::fs::remove_file(&path).expect("Cannot remove test file");
        mesh.check_topology().expect("Topological errors found");
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.num_edges(), 9);
        assert_eq!(mesh.face_valence(0.into()), 4);
        assert_cyclic_eq(&face_vertices(&mesh, 0.into()), &[0, 1, 2, 3]);
        assert_cyclic_eq(&face_vertices(&mesh, 1.into()), &[1, 4, 2]);
        assert_cyclic_eq(&face_vertices(&mesh, 2.into()), &[5, 6, 7]);
        assert_eq!(
            mesh.point(VH::from(4)).expect("Cannot read point"),
            [2.0, 0.5, 0.0]
        );
    }

    #[test]
    fn t_load_missing_file() {
        let path = temp_path("missing");
        assert!(matches!(
            ArrayMesh::load_obj(&path),
            Err(Error::ObjLoadFailed { .. })
        ));
    }

    #[test]
    fn t_write_and_load() {
        let path = temp_path("write");
        let mesh = ArrayMesh::quad_box([0.0, 0.0, 0.0], [1.0, 2.0, 0.25])
            .expect("Cannot create box");
        mesh.write_obj(&path).expect("Cannot write OBJ file");
        let loaded = ArrayMesh::load_obj(&path).expect("Cannot load OBJ file");
        std::fs::remove_file(&path).expect("Cannot remove test file");
        loaded.check_topology().expect("Topological errors found");
        assert_eq!(loaded.num_vertices(), mesh.num_vertices());
        assert_eq!(loaded.num_edges(), mesh.num_edges());
        assert_eq!(loaded.num_faces(), mesh.num_faces());
        // Faces keep their order. Vertices are renumbered in the order the
        // faces refer to them.
        for f in mesh.faces() {
            assert_same_corners(&face_points(&loaded, f), &face_points(&mesh, f));
        }
    }

    #[test]
    fn t_write_requires_garbage_collection() {
        let path = temp_path("garbage");
        let mut mesh = ArrayMesh::unit_box().expect("Cannot create box");
        mesh.delete_face(0.into()).expect("Cannot delete face");
        assert!(matches!(
            mesh.write_obj(&path),
            Err(Error::GarbageCollectionRequired)
        ));
        assert!(!path.exists());
    }
}
