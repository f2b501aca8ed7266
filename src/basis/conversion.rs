//! Conversion of basis-function coefficients between conventions.
//!
//! A conversion is described by a [`SignedPermutation`]: given a vector `v` ordered in the source
//! convention, the vector in the target convention is `w[i] = v[permutation[i]] * signs[i]`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use serde::{Deserialize, Serialize};

use crate::basis::convention::{Convention, Conventions, Sign};
use crate::basis::shell::MolecularBasis;
use crate::basis::BasisError;

#[cfg(test)]
#[path = "conversion_tests.rs"]
mod conversion_tests;

// =================
// SignedPermutation
// =================

/// Structure containing a permutation of basis functions together with the sign change of each
/// function.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedPermutation {
    /// `permutation[i]` is the source index of the function that lands at target index `i`.
    permutation: Vec<usize>,

    /// `signs[i]` is the sign applied to the function that lands at target index `i`.
    signs: Vec<Sign>,
}

impl SignedPermutation {
    /// The source indices, in target order.
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// The signs, in target order.
    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }

    /// The signs as `+1`/`-1` integers, in target order.
    pub fn sign_values(&self) -> Vec<i8> {
        self.signs.iter().map(Sign::value).collect()
    }

    /// The number of basis functions acted on.
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    /// Returns `true` if this acts on no basis functions.
    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// Appends a local signed permutation whose indices are relative to `offset`.
    fn extend_with_offset(&mut self, local: SignedPermutation, offset: usize) {
        self.permutation
            .extend(local.permutation.into_iter().map(|j| j + offset));
        self.signs.extend(local.signs);
    }

    /// Reorders and re-signs a coefficient vector in the source convention, giving the vector in
    /// the target convention.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::ShapeMismatch`] if the vector length differs from
    /// [`Self::len`].
    pub fn apply<S>(&self, vector: &ArrayBase<S, Ix1>) -> Result<Array1<f64>, BasisError>
    where
        S: Data<Elem = f64>,
    {
        if vector.len() != self.len() {
            return Err(BasisError::ShapeMismatch(format!(
                "vector of length {} for a permutation of length {}",
                vector.len(),
                self.len()
            )));
        }
        Ok(self
            .permutation
            .iter()
            .zip(self.signs.iter())
            .map(|(&j, &sign)| vector[j] * f64::from(sign))
            .collect())
    }

    /// Reorders and re-signs the rows of a coefficient matrix whose rows are indexed by basis
    /// functions in the source convention (*e.g.* a matrix of molecular-orbital coefficients
    /// with one orbital per column).
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::ShapeMismatch`] if the number of rows differs from
    /// [`Self::len`].
    pub fn apply_to_rows<S>(&self, matrix: &ArrayBase<S, Ix2>) -> Result<Array2<f64>, BasisError>
    where
        S: Data<Elem = f64>,
    {
        if matrix.nrows() != self.len() {
            return Err(BasisError::ShapeMismatch(format!(
                "matrix with {} rows for a permutation of length {}",
                matrix.nrows(),
                self.len()
            )));
        }
        let mut converted = matrix.select(Axis(0), &self.permutation);
        converted
            .axis_iter_mut(Axis(0))
            .zip(self.signs.iter())
            .filter(|(_, sign)| **sign == Sign::Minus)
            .for_each(|(mut row, _)| row.mapv_inplace(|x| -x));
        Ok(converted)
    }
}

impl fmt::Display for SignedPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_length = self.len().to_string().chars().count().max(6);
        writeln!(f, "{}", "┈".repeat(2 * index_length + 10))?;
        writeln!(f, " {:>index_length$}  {:>index_length$}  Sign", "Target", "Source")?;
        writeln!(f, "{}", "┈".repeat(2 * index_length + 10))?;
        for (i, (j, sign)) in self.permutation.iter().zip(self.signs.iter()).enumerate() {
            writeln!(f, " {i:>index_length$}  {j:>index_length$}     {sign}")?;
        }
        writeln!(f, "{}", "┈".repeat(2 * index_length + 10))?;
        Ok(())
    }
}

// =========
// Functions
// =========

/// Determines how to map the basis functions of one shell type from one convention onto another.
///
/// # Arguments
///
/// * `convention_a` - The source convention.
/// * `convention_b` - The target convention.
/// * `reverse` - If `true`, the roles of the two conventions are exchanged, giving the mapping
///   from `convention_b` back to `convention_a`.
///
/// # Returns
///
/// The signed permutation such that a vector `v` in the source convention becomes
/// `w[i] = v[permutation[i]] * signs[i]` in the target convention.
///
/// # Errors
///
/// Errors with [`BasisError::InvalidConventionPair`] if the conventions differ in length, if
/// either contains a duplicated label, or if their label sets differ.
pub fn convert_convention_shell(
    convention_a: &Convention,
    convention_b: &Convention,
    reverse: bool,
) -> Result<SignedPermutation, BasisError> {
    let (source, target) = if reverse {
        (convention_b, convention_a)
    } else {
        (convention_a, convention_b)
    };
    if source.len() != target.len() {
        return Err(BasisError::InvalidConventionPair(format!(
            "conventions of different lengths ({source}) and ({target})"
        )));
    }
    source.check_unique()?;
    target.check_unique()?;

    let source_positions = source
        .iter()
        .enumerate()
        .map(|(j, entry)| (entry.label(), (j, entry.sign())))
        .collect::<HashMap<_, _>>();
    let (permutation, signs): (Vec<usize>, Vec<Sign>) = target
        .iter()
        .map(|entry| {
            source_positions
                .get(entry.label())
                .map(|&(j, source_sign)| (j, source_sign * entry.sign()))
                .ok_or_else(|| {
                    BasisError::InvalidConventionPair(format!(
                        "label `{}` of ({target}) not found in ({source})",
                        entry.label()
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .unzip();
    debug_assert_eq!(
        permutation.iter().collect::<HashSet<_>>().len(),
        permutation.len()
    );
    Ok(SignedPermutation { permutation, signs })
}

/// Determines how to map the flattened basis-function vector of a molecular basis from its own
/// conventions onto new ones.
///
/// Every `(l, kind)` block of every shell is converted independently with
/// [`convert_convention_shell`], and the local result is placed at the offset of the block.
///
/// # Arguments
///
/// * `basis` - The molecular basis, whose functions are in [`MolecularBasis::conventions`].
/// * `new_conventions` - The target conventions.
/// * `reverse` - If `true`, gives the mapping from `new_conventions` back to the conventions of
///   `basis`. This is forwarded to every block.
///
/// # Errors
///
/// Errors on the first block that cannot be converted: a missing convention, an invalid
/// convention pair, or a valid pair whose length does not match the block size. No partial
/// result is returned.
pub fn convert_conventions(
    basis: &MolecularBasis,
    new_conventions: &Conventions,
    reverse: bool,
) -> Result<SignedPermutation, BasisError> {
    let blocks = basis.block_boundary_indices()?;
    let nbasis = blocks.last().map_or(0, |block| block.end);
    let mut signed_permutation = SignedPermutation {
        permutation: Vec::with_capacity(nbasis),
        signs: Vec::with_capacity(nbasis),
    };
    for block in blocks.iter() {
        let old_convention = basis.conventions.try_get(block.l, block.kind)?;
        let new_convention = new_conventions.try_get(block.l, block.kind)?;
        let local = convert_convention_shell(old_convention, new_convention, reverse)?;
        if local.len() != block.size() {
            return Err(BasisError::ShapeMismatch(format!(
                "conventions ({old_convention}) and ({new_convention}) have {} labels for a block of {} functions (l = {}, kind = {})",
                local.len(),
                block.size(),
                block.l,
                block.kind
            )));
        }
        signed_permutation.extend_with_offset(local, block.start);
    }
    log::debug!(
        "Converted {} blocks of {} basis functions{}.",
        blocks.len(),
        nbasis,
        if reverse { " (reverse)" } else { "" }
    );
    Ok(signed_permutation)
}
