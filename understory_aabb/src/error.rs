// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction errors for geometry values.

use crate::relation::Axis;

/// A box or split ratio was built from values outside its domain.
///
/// Raised only by constructors; every value that exists has already passed these checks.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A coordinate or extent was NaN or infinite.
    #[error("invalid geometry: `{field}` must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Width or height was below zero.
    #[error("invalid geometry: `{field}` must not be negative, got {value}")]
    NegativeExtent {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A split ratio component was NaN or outside `[0, 100]`.
    #[error("invalid split ratio: {axis} = {value} is outside [0, 100]")]
    RatioOutOfRange {
        /// Axis of the offending component.
        axis: Axis,
        /// The rejected value.
        value: f64,
    },
}
