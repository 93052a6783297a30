// Copyright 2025 the Proksima Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nearest-point and arc-length queries for Bézier curves.
//!
//! Proksima answers two questions about a Bézier curve given as a slice
//! of control points: which point on the curve lies closest to an
//! arbitrary query point, and how long the curve is.
//!
//! The nearest-point query converts distance minimization into
//! polynomial root finding: the derivative of the squared distance is
//! projected into Bézier form, and its roots are isolated by recursive
//! subdivision of the control polygon. This is numerically robust in
//! the degenerate configurations where closed-form solvers fall over.
//! Arc length is a fixed-step chord sum over an independent
//! Bernstein-basis evaluator.
//!
//! The code is written for a curve of any degree, but only cubics are
//! validated.
//!
//! # Examples
//!
//! ```
//! use proksima::{curve_length, distance_from_curve, nearest_point_on_curve, Point};
//!
//! let curve = [
//!     Point::new(0.0, 0.0),
//!     Point::new(1.0, 2.0),
//!     Point::new(2.0, 3.0),
//!     Point::new(4.0, 4.0),
//! ];
//!
//! let nearest = distance_from_curve(Point::new(1.0, 3.0), &curve);
//! assert!((nearest.location - 0.5).abs() < 1e-6);
//! assert!((nearest.distance - 0.884).abs() < 1e-3);
//!
//! let (pt, location) = nearest_point_on_curve(Point::new(1.0, 3.0), &curve);
//! assert!(pt.distance(Point::new(1.625, 2.375)) < 1e-9);
//! assert!((location - 0.5).abs() < 1e-6);
//!
//! let length = curve_length(&curve);
//! assert!((length - 5.781).abs() < 1e-3);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate
//! for math functionality. The `std` feature is enabled by default, but
//! can be disabled, as long as the `libm` feature is enabled. This is
//! useful for `no_std` environments. However, note that the `libm`
//! crate is not as efficient as the standard library.
//!
//! The `serde` feature implements `serde::Serialize` and
//! `serde::Deserialize` on [`Point`] and [`Vec2`].
//!
//! [`libm`]: https://docs.rs/libm

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("proksima requires either the `std` or `libm` feature");

mod bezier;
pub mod common;
mod nearest;
mod point;
mod vec2;

pub use crate::bezier::{curve_length, eval, point_on_path};
pub use crate::nearest::{distance_from_curve, nearest_point_on_curve, Nearest};
pub use crate::point::Point;
pub use crate::vec2::Vec2;
