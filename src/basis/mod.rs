//! Atomic-orbital basis sets and their basis-function conventions.

use std::error::Error;
use std::fmt;

use crate::basis::ao::ShellKind;

pub mod ao;
pub mod convention;
pub mod conversion;
pub mod shell;

/// Enumerated type for errors raised while interpreting basis sets and their conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasisError {
    /// Variant for an alphabetical angular momentum label that is not recognised. The associated
    /// value is the offending label.
    UnknownAngularMomentumLabel(String),

    /// Variant for an angular momentum value outside the labelled range.
    InvalidAngularMomentum(i32),

    /// Variant for an unrecognised shell kind tag, or a pure shell requested for $`l < 2`$.
    InvalidKind(String),

    /// Variant for two conventions that cannot be mapped onto each other: mismatched lengths,
    /// duplicate labels, or different label sets.
    InvalidConventionPair(String),

    /// Variant for exponents, coefficients, or conventions whose sizes are inconsistent with the
    /// declared shell structure.
    ShapeMismatch(String),

    /// Variant for a `(l, kind)` pair that has no entry in a convention dictionary.
    MissingConvention(u32, ShellKind),

    /// Variant for a `(l, kind)` pair that is given more than once in a serialised convention
    /// dictionary.
    DuplicateConvention(u32, ShellKind),
}

impl fmt::Display for BasisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAngularMomentumLabel(label) => {
                write!(f, "Unknown angular momentum label: `{label}`.")
            }
            Self::InvalidAngularMomentum(l) => {
                write!(f, "Invalid angular momentum: {l}.")
            }
            Self::InvalidKind(msg) => write!(f, "Invalid shell kind: {msg}."),
            Self::InvalidConventionPair(msg) => write!(f, "Invalid convention pair: {msg}."),
            Self::ShapeMismatch(msg) => write!(f, "Shape mismatch: {msg}."),
            Self::MissingConvention(l, kind) => {
                write!(f, "No convention found for (l = {l}, kind = {kind}).")
            }
            Self::DuplicateConvention(l, kind) => {
                write!(f, "Duplicate conventions found for (l = {l}, kind = {kind}).")
            }
        }
    }
}

impl Error for BasisError {}
