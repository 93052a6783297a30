// Copyright 2025 the Proksima Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

/// Defines a trait that chooses between libstd or libm implementations of float methods.
#[cfg(not(feature = "std"))]
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lfname:ident;
    )+) => {
        pub(crate) trait FloatFuncs: Sized {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        impl FloatFuncs for f64 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lfname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("proksima requires either the `std` or `libm` feature")
            })+
        }
    }
}

#[cfg(not(feature = "std"))]
define_float_funcs! {
    fn hypot(self, other: Self) -> Self => hypot;
    fn powi(self, n: i32) -> Self => pow;
}

/// Binomial coefficient, returning zero for values outside the domain.
pub fn choose(n: usize, k: usize) -> u32 {
    let mut n = n;
    if k > n {
        return 0;
    }
    let mut p = 1;
    for i in 1..=(n - k) {
        p *= n;
        p /= i;
        n -= 1;
    }
    p as u32
}
