pub mod bounds;
pub mod quad;
pub mod ray;
pub mod rotate;

use cgmath::{Point3, Vector3};

pub use bounds::Bounds;
pub use quad::{Quad, UvRect};
pub use ray::{Ray, RayHit};

pub trait DivDown {
    /// Divides and rounds the result towards negative infinity.
    fn div_down(self, divisor: Self) -> Self;
}

pub trait DivUp {
    /// Divides and rounds the result towards positive infinity.
    fn div_up(self, divisor: Self) -> Self;
}

#[macro_export]
macro_rules! convert_point {
    ($val:expr, $type:ty) => {
        cgmath::Point3 {
            x: $val.x as $type,
            y: $val.y as $type,
            z: $val.z as $type,
        }
    };
}

macro_rules! impl_div_traits_signed {
    ($($type:ty),*) => {$(
        impl DivDown for $type {
            #[inline]
            fn div_down(self, divisor: $type) -> $type {
                let quotient = self / divisor;
                if self % divisor != 0 && (self < 0) != (divisor < 0) {
                    quotient - 1
                } else {
                    quotient
                }
            }
        }

        impl DivUp for $type {
            #[inline]
            fn div_up(self, divisor: $type) -> $type {
                let quotient = self / divisor;
                if self % divisor != 0 && (self < 0) == (divisor < 0) {
                    quotient + 1
                } else {
                    quotient
                }
            }
        }
    )*};
}

macro_rules! impl_div_trait_pv {
    ($pv:tt, $trait:path, $method:tt) => {
        impl<T> $trait for $pv<T>
        where
            T: $trait,
        {
            #[inline]
            fn $method(self, divisor: $pv<T>) -> Self {
                $pv {
                    x: self.x.$method(divisor.x),
                    y: self.y.$method(divisor.y),
                    z: self.z.$method(divisor.z),
                }
            }
        }
    };
}

impl_div_traits_signed!(i32, i64, isize);

impl_div_trait_pv!(Vector3, DivDown, div_down);
impl_div_trait_pv!(Vector3, DivUp, div_up);
impl_div_trait_pv!(Point3, DivDown, div_down);
impl_div_trait_pv!(Point3, DivUp, div_up);
