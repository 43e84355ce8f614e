/*!
A halfedge based polygon mesh library.

# Overview

+ The connectivity of vertices, edges and faces is stored in a [`Topology`],
  a halfedge graph in which every edge is a pair of opposite halfedges. Each
  halfedge knows the vertex it points to, the face on its left, and the next
  and previous halfedges around that face.

+ Elements are referred to by handles ([`VH`], [`HH`], [`EH`], [`FH`]), which
  are indices into the element tables. Editing operations only flag elements
  as deleted. [`Topology::garbage_collection`] removes them and renumbers the
  survivors, which invalidates every handle obtained before.

+ Arbitrary data can be attached to elements with properties. A property is a
  named array that stays parallel to its element table as elements are added,
  and is reordered with it during garbage collection. See [`Property`].

+ The generic polygon mesh type [`PolyMeshT<DIM, A>`] adds vertex positions to
  the topology. You tell it how to work with your vector type by implementing
  [`Adaptor`] and [`FloatScalarAdaptor`].

+ With the `use_glam` feature, which is enabled by default, the [`use_glam`]
  module provides ready to use mesh types backed by
  [`glam`](https://crates.io/crates/glam) vectors:
  [`PolyMeshF32`](use_glam::PolyMeshF32) and
  [`PolyMeshF64`](use_glam::PolyMeshF64).

```rust
use halfmesh::{HasIterators, use_glam::PolyMeshF32};

let mut mesh = PolyMeshF32::unit_box().expect("Cannot create box");
mesh.triangulate().expect("Cannot triangulate");
assert_eq!(mesh.num_faces(), 12);
let v = 0.into();
assert_eq!(mesh.vf_ccw_iter(v).count(), mesh.vertex_valence(v));
```
*/

mod check;
mod collapse;
mod delete;
mod edit;
mod element;
mod error;
mod iterator;
mod mesh;
mod obj;
mod primitive;
mod property;
mod topol;

#[cfg(feature = "use_glam")]
pub mod use_glam;

pub use element::{EH, ElementKind, FH, HH, Handle, HasTopology, INVALID_INDEX, VH};
pub use error::{Error, ErrorKind};
pub use iterator::HasIterators;
pub use mesh::{Adaptor, FloatScalarAdaptor, POINTS_PROPERTY, PolyMeshT};
pub use property::{
    EPropBuf, EProperty, FPropBuf, FProperty, HPropBuf, HProperty, PropBuf, Property,
    PropertyContainer, TPropData, VPropBuf, VProperty,
};
pub use topol::{ElementProperties, TopolCache, Topology};
