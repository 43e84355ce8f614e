/*!
Ready to use mesh types, enabled by the `use_glam` feature. Positions are
stored as [`glam`](https://docs.rs/glam/latest/glam/) vectors.
*/

use crate::mesh::{Adaptor, FloatScalarAdaptor, PolyMeshT};

macro_rules! impl_glam_adaptor {
    ($adaptor:ident, $vector:ty, $scalar:ty) => {
        impl Adaptor<3> for $adaptor {
            type Vector = $vector;
            type Scalar = $scalar;

            fn vector(coords: [Self::Scalar; 3]) -> Self::Vector {
                <$vector>::from_array(coords)
            }

            fn zero_vector() -> Self::Vector {
                <$vector>::ZERO
            }

            fn vector_coord(v: &Self::Vector, i: usize) -> Self::Scalar {
                v[i]
            }
        }

        impl FloatScalarAdaptor<3> for $adaptor {
            fn scalarf32(val: f32) -> Self::Scalar {
                val as $scalar
            }

            fn scalarf64(val: f64) -> Self::Scalar {
                val as $scalar
            }

            fn to_f64(val: Self::Scalar) -> f64 {
                val as f64
            }
        }
    };
}

/// Adaptor for positions of type [`glam::Vec3`].
pub struct BuiltInAdaptorF32 {}

/// Adaptor for positions of type [`glam::DVec3`].
pub struct BuiltInAdaptorF64 {}

impl_glam_adaptor!(BuiltInAdaptorF32, glam::Vec3, f32);
impl_glam_adaptor!(BuiltInAdaptorF64, glam::DVec3, f64);

/// Mesh with 32 bit floating point positions.
pub type PolyMeshF32 = PolyMeshT<3, BuiltInAdaptorF32>;

/// Mesh with 64 bit floating point positions.
pub type PolyMeshF64 = PolyMeshT<3, BuiltInAdaptorF64>;
