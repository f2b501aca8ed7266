//! # aoconv: Gaussian atomic-orbital basis sets and their ordering conventions
//!
//! `aoconv` models Gaussian atomic-orbital basis sets as ordered sequences of contracted shells
//! and converts coefficient vectors between the basis-function ordering and sign conventions used
//! by different quantum-chemistry programs.
//!
//! The crate provides:
//! - a codec between angular momenta and their spectroscopic letters ([`angmom`]),
//! - Cartesian monomial enumeration and standard shell orderings ([`basis::ao`]),
//! - convention dictionaries, including the HORTON2, PSI4 and GBASIS schemes
//!   ([`basis::convention`]),
//! - shells and molecular basis sets with their sizes, offsets and segmentation
//!   ([`basis::shell`]),
//! - signed permutations between conventions for single shells and whole basis sets
//!   ([`basis::conversion`]), and
//! - a driver, a YAML input format and a command-line binary built on top of these
//!   ([`drivers`], [`interfaces`]).
//!
//! ## Examples and usage
//!
//! Usages of most items are illustrated in the test functions attached to each module.
//!
//! ## License
//!
//! GNU Lesser General Public License v3.0.

pub mod angmom;
pub mod basis;
pub mod drivers;
pub mod interfaces;
pub mod io;
