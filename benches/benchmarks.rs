use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use halfmesh::{EH, HH, Handle, HasIterators, VH, use_glam::PolyMeshF32};

type PolygonMesh = PolyMeshF32;

const GRID_SIZE: u32 = 100;

/// Flat grid of `n` x `n` quads in the xy plane.
fn quad_grid(n: u32) -> PolygonMesh {
    let nv = ((n + 1) * (n + 1)) as usize;
    let mut mesh = PolygonMesh::with_capacity(nv, 2 * (n * (n + 1)) as usize, (n * n) as usize);
    let points: Vec<glam::Vec3> = (0..=n)
        .flat_map(|j| (0..=n).map(move |i| glam::vec3(i as f32, j as f32, 0.0)))
        .collect();
    mesh.add_vertices(&points).unwrap();
    let vert = |i: u32, j: u32| -> VH { (j * (n + 1) + i).into() };
    for j in 0..n {
        for i in 0..n {
            mesh.add_quad_face(vert(i, j), vert(i + 1, j), vert(i + 1, j + 1), vert(i, j + 1))
                .unwrap();
        }
    }
    mesh
}

fn tri_grid(n: u32) -> PolygonMesh {
    let mut mesh = quad_grid(n);
    mesh.triangulate().unwrap();
    mesh
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    group.bench_function("quad_grid", |b| {
        b.iter(|| black_box(quad_grid(black_box(GRID_SIZE))));
    });
    group.bench_function("triangulate", |b| {
        let grid = quad_grid(GRID_SIZE);
        b.iter_batched(
            || grid.clone(),
            |mut mesh| {
                mesh.triangulate().unwrap();
                black_box(mesh)
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("platonic_solids", |b| {
        b.iter(|| {
            for i in 0..100 {
                let scale = black_box(1.0 + i as f32 * 0.01);
                black_box(PolygonMesh::tetrahedron(scale).unwrap());
                black_box(PolygonMesh::hexahedron(scale).unwrap());
                black_box(PolygonMesh::octahedron(scale).unwrap());
            }
        });
    });
    group.finish();
}

fn bench_circulators(c: &mut Criterion) {
    let mut group = c.benchmark_group("circulators");
    let mesh = tri_grid(GRID_SIZE);
    group.bench_function("vv_ccw", |b| {
        b.iter(|| {
            let total: usize = mesh.vertices().map(|v| mesh.vv_ccw_iter(v).count()).sum();
            black_box(total)
        });
    });
    group.bench_function("vf_cw", |b| {
        b.iter(|| {
            let total: usize = mesh.vertices().map(|v| mesh.vf_cw_iter(v).count()).sum();
            black_box(total)
        });
    });
    group.bench_function("fv_ccw", |b| {
        b.iter(|| {
            let total: u32 = mesh
                .faces()
                .flat_map(|f| mesh.fv_ccw_iter(f))
                .map(|v| v.index())
                .sum();
            black_box(total)
        });
    });
    group.finish();
}

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");
    let base = tri_grid(GRID_SIZE);
    group.bench_function("split_all_edges", |b| {
        b.iter_batched(
            || base.clone(),
            |mut mesh| {
                let edges: Vec<EH> = mesh.edges().collect();
                for e in edges {
                    let (v0, v1) = e.vertices(&mesh);
                    let mid = (mesh.point(v0).unwrap() + mesh.point(v1).unwrap()) * 0.5;
                    mesh.split_edge(e, mid).unwrap();
                }
                black_box(mesh)
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("flip_all_edges", |b| {
        b.iter_batched(
            || base.clone(),
            |mut mesh| {
                let edges: Vec<EH> = mesh.edges().collect();
                for e in edges {
                    if mesh.is_flip_ok(e) {
                        mesh.flip(e).unwrap();
                    }
                }
                black_box(mesh)
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("collapse_and_garbage_collect", |b| {
        b.iter_batched(
            || base.clone(),
            |mut mesh| {
                let halfedges: Vec<HH> = mesh.halfedges().step_by(7).collect();
                for h in halfedges {
                    if !h.is_deleted(&mesh) && mesh.is_collapse_ok(h) {
                        mesh.collapse(h).unwrap();
                    }
                }
                mesh.garbage_collection();
                black_box(mesh)
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("delete_and_garbage_collect", |b| {
        b.iter_batched(
            || base.clone(),
            |mut mesh| {
                let faces: Vec<_> = mesh.faces().step_by(3).collect();
                for f in faces {
                    mesh.delete_face(f).unwrap();
                }
                mesh.garbage_collection();
                black_box(mesh)
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_circulators,
    bench_operators
);
criterion_main!(benches);
