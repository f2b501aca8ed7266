//! Contracted shells and molecular basis sets.

use std::fmt;

use derive_builder::Builder;
use itertools::Itertools;
use log;
use ndarray::{s, Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::angmom::ANGMOM_LABELS;
use crate::basis::ao::ShellKind;
use crate::basis::convention::Conventions;
use crate::basis::conversion::{convert_conventions, SignedPermutation};
use crate::basis::BasisError;

#[cfg(test)]
#[path = "shell_tests.rs"]
mod shell_tests;

// =====
// Shell
// =====

/// Structure representing a contracted shell of Gaussian basis functions on one centre.
///
/// A shell lists one or more `(l, kind)` blocks which share the same primitive exponents but have
/// their own contraction coefficients. A shell with more than one block is *generalised*.
///
/// No consistency checks are made at construction: the exponents and coefficients may be absent
/// for shells that only carry structural information. Inconsistencies are reported by the derived
/// queries ([`Self::ncon`], [`Self::nprim`], [`Self::nbasis`]).
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    /// The index of the centre on which this shell is located.
    pub center: usize,

    /// The angular momenta of the blocks, in order.
    #[builder(setter(into))]
    pub angmoms: Vec<u32>,

    /// The kinds of the blocks, parallel to [`Self::angmoms`].
    #[builder(setter(into))]
    pub kinds: Vec<ShellKind>,

    /// The primitive exponents.
    #[builder(default = "None")]
    #[serde(default)]
    pub exponents: Option<Array1<f64>>,

    /// The contraction coefficients, one row per primitive and one column per block.
    #[builder(default = "None")]
    #[serde(default)]
    pub coeffs: Option<Array2<f64>>,
}

impl Shell {
    /// Returns a builder to construct a new [`Shell`].
    pub fn builder() -> ShellBuilder {
        ShellBuilder::default()
    }

    /// Constructs a new [`Shell`].
    ///
    /// # Arguments
    ///
    /// * `center` - The index of the centre of the shell.
    /// * `angmoms` - The angular momenta of the blocks.
    /// * `kinds` - The kinds of the blocks.
    /// * `exponents` - The primitive exponents, if any.
    /// * `coeffs` - The $`n_{\mathrm{prim}} \times n_{\mathrm{con}}`$ contraction coefficients,
    ///   if any.
    pub fn new(
        center: usize,
        angmoms: &[u32],
        kinds: &[ShellKind],
        exponents: Option<Array1<f64>>,
        coeffs: Option<Array2<f64>>,
    ) -> Self {
        Self {
            center,
            angmoms: angmoms.to_vec(),
            kinds: kinds.to_vec(),
            exponents,
            coeffs,
        }
    }

    /// The number of contractions, *i.e.* the number of `(l, kind)` blocks.
    ///
    /// # Errors
    ///
    /// Errors if the angular momenta and the kinds have different lengths, or if the coefficient
    /// matrix does not have one column per block.
    pub fn ncon(&self) -> Result<usize, BasisError> {
        let ncon = self.angmoms.len();
        if self.kinds.len() != ncon {
            return Err(BasisError::ShapeMismatch(format!(
                "{} angular momenta but {} kinds",
                ncon,
                self.kinds.len()
            )));
        }
        if let Some(coeffs) = self.coeffs.as_ref() {
            if coeffs.ncols() != ncon {
                return Err(BasisError::ShapeMismatch(format!(
                    "{} coefficient columns for {ncon} contractions",
                    coeffs.ncols()
                )));
            }
        }
        Ok(ncon)
    }

    /// The number of primitives.
    ///
    /// # Errors
    ///
    /// Errors if there are no exponents, or if the coefficient matrix does not have one row per
    /// exponent.
    pub fn nprim(&self) -> Result<usize, BasisError> {
        let nprim = self
            .exponents
            .as_ref()
            .map(Array1::len)
            .ok_or_else(|| BasisError::ShapeMismatch("no primitive exponents".to_string()))?;
        if let Some(coeffs) = self.coeffs.as_ref() {
            if coeffs.nrows() != nprim {
                return Err(BasisError::ShapeMismatch(format!(
                    "{} coefficient rows for {nprim} primitives",
                    coeffs.nrows()
                )));
            }
        }
        Ok(nprim)
    }

    /// The number of basis functions generated by this shell.
    ///
    /// # Errors
    ///
    /// Errors if the angular momenta and the kinds have different lengths, or if any block is a
    /// pure block with $`l < 2`$.
    pub fn nbasis(&self) -> Result<usize, BasisError> {
        self.block_sizes()?.into_iter().try_fold(0, add_sizes)
    }

    /// Iterates over the `(l, kind)` blocks of this shell in order.
    pub fn blocks(&self) -> impl Iterator<Item = (u32, ShellKind)> + '_ {
        self.angmoms.iter().copied().zip(self.kinds.iter().copied())
    }

    /// The numbers of basis functions in the blocks of this shell, in order.
    fn block_sizes(&self) -> Result<Vec<usize>, BasisError> {
        if self.kinds.len() != self.angmoms.len() {
            return Err(BasisError::ShapeMismatch(format!(
                "{} angular momenta but {} kinds",
                self.angmoms.len(),
                self.kinds.len()
            )));
        }
        self.blocks().map(|(l, kind)| kind.ncomps(l)).collect()
    }

    /// Returns `true` if this shell has more than one block.
    pub fn is_generalized(&self) -> bool {
        self.angmoms.len() > 1
    }

    /// Splits this shell into one shell per block, each keeping the centre and exponents of this
    /// shell and the matching column of the coefficients.
    fn split(&self) -> Result<Vec<Shell>, BasisError> {
        let ncon = self.ncon()?;
        if ncon == 1 {
            return Ok(vec![self.clone()]);
        }
        if self.coeffs.is_some() {
            self.nprim()?;
        }
        Ok((0..ncon)
            .map(|i| Shell {
                center: self.center,
                angmoms: vec![self.angmoms[i]],
                kinds: vec![self.kinds[i]],
                exponents: self.exponents.clone(),
                coeffs: self
                    .coeffs
                    .as_ref()
                    .map(|coeffs| coeffs.slice(s![.., i..i + 1]).to_owned()),
            })
            .collect())
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.blocks()
                .map(|(l, kind)| {
                    let lchar = ANGMOM_LABELS
                        .get(l as usize)
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| l.to_string());
                    format!("{lchar}{kind}")
                })
                .join(" ")
        )
    }
}

/// Adds a number of basis functions to a running total.
fn add_sizes(total: usize, size: usize) -> Result<usize, BasisError> {
    total.checked_add(size).ok_or_else(|| {
        BasisError::ShapeMismatch(format!(
            "the number of basis functions overflows: {total} + {size}"
        ))
    })
}

// ==========
// BasisBlock
// ==========

/// Structure locating one `(l, kind)` block of a shell in the flattened basis-function vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BasisBlock {
    /// The index of the shell containing this block.
    pub shell_index: usize,

    /// The angular momentum of the block.
    pub l: u32,

    /// The kind of the block.
    pub kind: ShellKind,

    /// The index of the first basis function of the block (inclusive).
    pub start: usize,

    /// The index one past the last basis function of the block (exclusive).
    pub end: usize,
}

impl BasisBlock {
    /// The number of basis functions in this block.
    pub fn size(&self) -> usize {
        self.end - self.start
    }
}

// ==============
// MolecularBasis
// ==============

/// Structure representing a molecular basis set: an ordered sequence of shells together with the
/// conventions in which their basis functions are ordered.
#[derive(Clone, Builder, Debug, PartialEq, Serialize, Deserialize)]
pub struct MolecularBasis {
    /// The shells, in the order in which their basis functions appear in coefficient vectors.
    pub shells: Vec<Shell>,

    /// The convention of every `(l, kind)` shell type present in [`Self::shells`].
    pub conventions: Conventions,

    /// The normalisation of the primitives. This is carried along without interpretation.
    #[builder(setter(into), default = "\"L2\".to_string()")]
    pub primitive_normalization: String,
}

impl MolecularBasis {
    /// Returns a builder to construct a new [`MolecularBasis`].
    pub fn builder() -> MolecularBasisBuilder {
        MolecularBasisBuilder::default()
    }

    /// Constructs a new [`MolecularBasis`].
    pub fn new(shells: Vec<Shell>, conventions: Conventions, primitive_normalization: &str) -> Self {
        Self {
            shells,
            conventions,
            primitive_normalization: primitive_normalization.to_string(),
        }
    }

    /// The number of shells.
    pub fn nshells(&self) -> usize {
        self.shells.len()
    }

    /// The total number of basis functions.
    ///
    /// # Errors
    ///
    /// Errors on the first shell whose size cannot be determined.
    pub fn nbasis(&self) -> Result<usize, BasisError> {
        self.shells
            .iter()
            .try_fold(0, |total, shell| add_sizes(total, shell.nbasis()?))
    }

    /// The ordered tuples of 0-based indices indicating the starting (inclusive) and ending
    /// (exclusive) positions of the shells in the flattened basis-function vector.
    ///
    /// # Errors
    ///
    /// Errors on the first shell whose size cannot be determined.
    pub fn shell_boundary_indices(&self) -> Result<Vec<(usize, usize)>, BasisError> {
        let mut start = 0;
        self.shells
            .iter()
            .map(|shell| {
                let shell_start = start;
                start = add_sizes(start, shell.nbasis()?)?;
                Ok((shell_start, start))
            })
            .collect()
    }

    /// Locates every `(l, kind)` block of every shell in the flattened basis-function vector, in
    /// shell order and then in block order within each shell.
    ///
    /// # Errors
    ///
    /// Errors on the first shell whose size cannot be determined.
    pub fn block_boundary_indices(&self) -> Result<Vec<BasisBlock>, BasisError> {
        let mut start = 0;
        let mut blocks = Vec::with_capacity(self.shells.iter().map(|shell| shell.angmoms.len()).sum());
        for (shell_index, shell) in self.shells.iter().enumerate() {
            let sizes = shell.block_sizes()?;
            for ((l, kind), size) in shell.blocks().zip(sizes) {
                let end = add_sizes(start, size)?;
                blocks.push(BasisBlock {
                    shell_index,
                    l,
                    kind,
                    start,
                    end,
                });
                start = end;
            }
        }
        Ok(blocks)
    }

    /// Returns an equivalent basis in which every generalised shell has been replaced by one
    /// shell per `(l, kind)` block. The basis functions keep their positions in the flattened
    /// vector.
    ///
    /// # Errors
    ///
    /// Errors if a generalised shell has inconsistent angular momenta, kinds, or coefficients.
    pub fn get_segmented(&self) -> Result<MolecularBasis, BasisError> {
        let shells = self
            .shells
            .iter()
            .map(Shell::split)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect_vec();
        log::debug!(
            "Segmented {} shells into {} shells.",
            self.nshells(),
            shells.len()
        );
        Ok(MolecularBasis {
            shells,
            conventions: self.conventions.clone(),
            primitive_normalization: self.primitive_normalization.clone(),
        })
    }

    /// Computes the signed permutation that reorders a coefficient vector of this basis into
    /// `new_conventions`. See [`convert_conventions`].
    pub fn convert_conventions(
        &self,
        new_conventions: &Conventions,
        reverse: bool,
    ) -> Result<SignedPermutation, BasisError> {
        convert_conventions(self, new_conventions, reverse)
    }
}

impl fmt::Display for MolecularBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shell_index_length = self.nshells().to_string().chars().count().max(1);
        let blocks_length = self
            .shells
            .iter()
            .map(|shell| shell.to_string().chars().count())
            .max()
            .unwrap_or(6)
            .max(6);
        let width = 33 + shell_index_length + blocks_length;
        writeln!(f, "{}", "┈".repeat(width))?;
        writeln!(
            f,
            " {:>shell_index_length$}  Centre  {:<blocks_length$}  NPrim  Functions",
            "#", "Blocks"
        )?;
        writeln!(f, "{}", "┈".repeat(width))?;
        for (shell_i, shell) in self.shells.iter().enumerate() {
            writeln!(
                f,
                " {:>shell_index_length$}  {:>6}  {:<blocks_length$}  {:>5}  {:>9}",
                shell_i,
                shell.center,
                shell.to_string(),
                shell
                    .nprim()
                    .map(|nprim| nprim.to_string())
                    .unwrap_or_else(|_| "--".to_string()),
                shell
                    .nbasis()
                    .map(|nbasis| nbasis.to_string())
                    .unwrap_or_else(|_| "??".to_string()),
            )?;
        }
        writeln!(f, "{}", "┈".repeat(width))?;
        writeln!(
            f,
            "Total number of basis functions: {}",
            self.nbasis()
                .map(|nbasis| nbasis.to_string())
                .unwrap_or_else(|err| err.to_string())
        )?;
        writeln!(
            f,
            "Primitive normalisation: {}",
            self.primitive_normalization
        )?;
        Ok(())
    }
}
