//! Human-readable specification of molecular basis sets in `aoconv` input configuration.

use std::fmt;

use anyhow::{self, ensure, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::angmom::label_to_l;
use crate::basis::ao::ShellKind;
use crate::basis::convention::{ConventionScheme, Conventions};
use crate::basis::shell::{MolecularBasis, Shell};
use crate::basis::BasisError;

// ------------
// InputAngmom
// ------------

/// Serialisable/deserialisable enumerated type for an angular momentum given either as a number
/// or as a letter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputAngmom {
    /// Variant for an angular momentum given as a non-negative integer.
    Number(u32),

    /// Variant for an angular momentum given as its letter (*e.g.* `d`).
    Label(String),
}

impl InputAngmom {
    /// Returns the numerical angular momentum.
    pub fn to_l(&self) -> Result<u32, BasisError> {
        match self {
            InputAngmom::Number(l) => Ok(*l),
            InputAngmom::Label(label) => label_to_l(label),
        }
    }
}

// ----------------
// InputConventions
// ----------------

/// Serialisable/deserialisable enumerated type for a convention dictionary given either as the
/// name of a standard scheme or as an explicit list of conventions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputConventions {
    /// Variant for one of the standard schemes, *e.g.* `PSI4`.
    Standard(ConventionScheme),

    /// Variant for an explicit list of `{l, kind, labels}` records.
    Custom(Conventions),
}

impl InputConventions {
    /// Returns the convention dictionary.
    pub fn conventions(&self) -> &Conventions {
        match self {
            InputConventions::Standard(scheme) => scheme.conventions(),
            InputConventions::Custom(conventions) => conventions,
        }
    }
}

impl Default for InputConventions {
    fn default() -> Self {
        InputConventions::Standard(ConventionScheme::Psi4)
    }
}

impl fmt::Display for InputConventions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputConventions::Standard(scheme) => write!(f, "{scheme}"),
            InputConventions::Custom(conventions) => {
                write!(f, "custom ({} shell types)", conventions.len())
            }
        }
    }
}

// ----------
// InputShell
// ----------

/// Serialisable/deserialisable structure representing a contracted shell.
#[derive(Clone, Debug, Builder, Serialize, Deserialize)]
pub struct InputShell {
    /// The index of the centre of the shell.
    pub center: usize,

    /// The angular momenta of the blocks of the shell.
    pub angmoms: Vec<InputAngmom>,

    /// The kinds of the blocks of the shell.
    pub kinds: Vec<ShellKind>,

    /// The primitive exponents.
    #[builder(default = "None")]
    #[serde(default)]
    pub exponents: Option<Vec<f64>>,

    /// The contraction coefficients, one row per primitive and one entry per block in each row.
    #[builder(default = "None")]
    #[serde(default)]
    pub coeffs: Option<Vec<Vec<f64>>>,
}

impl InputShell {
    /// Returns a builder to construct [`InputShell`].
    pub fn builder() -> InputShellBuilder {
        InputShellBuilder::default()
    }

    /// Converts the [`InputShell`] to a corresponding [`Shell`].
    ///
    /// # Errors
    ///
    /// Errors if an angular momentum label is not recognised, if the coefficient rows have
    /// different lengths, or if the resulting shell has inconsistent dimensions.
    pub fn to_shell(&self) -> Result<Shell, anyhow::Error> {
        let angmoms = self
            .angmoms
            .iter()
            .map(InputAngmom::to_l)
            .collect::<Result<Vec<_>, _>>()?;
        let exponents = self.exponents.as_ref().map(|exps| Array1::from_vec(exps.clone()));
        let coeffs = self
            .coeffs
            .as_ref()
            .map(|rows| {
                let ncols = rows.first().map_or(angmoms.len(), Vec::len);
                ensure!(
                    rows.iter().all(|row| row.len() == ncols),
                    "Coefficient rows of shell on centre {} have different lengths.",
                    self.center
                );
                Array2::from_shape_vec(
                    (rows.len(), ncols),
                    rows.iter().flatten().copied().collect_vec(),
                )
                .map_err(|err| format_err!(err))
            })
            .transpose()?;
        let shell = Shell::new(self.center, &angmoms, &self.kinds, exponents, coeffs);
        shell.ncon()?;
        shell.nbasis()?;
        if shell.exponents.is_some() {
            shell.nprim()?;
        }
        Ok(shell)
    }
}

// -------------------
// InputMolecularBasis
// -------------------

fn default_primitive_normalization() -> String {
    "L2".to_string()
}

/// Serialisable/deserialisable structure containing a molecular basis set together with its
/// conventions.
#[derive(Clone, Debug, Builder, Serialize, Deserialize)]
pub struct InputMolecularBasis {
    /// The ordered shells.
    pub shells: Vec<InputShell>,

    /// The conventions in which the basis functions of the shells are ordered.
    #[builder(default = "InputConventions::default()")]
    #[serde(default)]
    pub conventions: InputConventions,

    /// The normalisation of the primitives.
    #[builder(default = "default_primitive_normalization()")]
    #[serde(default = "default_primitive_normalization")]
    pub primitive_normalization: String,
}

impl InputMolecularBasis {
    /// Returns a builder to construct [`InputMolecularBasis`].
    pub fn builder() -> InputMolecularBasisBuilder {
        InputMolecularBasisBuilder::default()
    }

    /// Converts to a [`MolecularBasis`] structure.
    ///
    /// # Errors
    ///
    /// Errors if any shell cannot be converted.
    pub fn to_molecular_basis(&self) -> Result<MolecularBasis, anyhow::Error> {
        let shells = self
            .shells
            .iter()
            .enumerate()
            .map(|(i, shell)| {
                shell
                    .to_shell()
                    .map_err(|err| format_err!("Invalid shell {i}: {err}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MolecularBasis::new(
            shells,
            self.conventions.conventions().clone(),
            &self.primitive_normalization,
        ))
    }
}

impl Default for InputMolecularBasis {
    fn default() -> Self {
        let shells = vec![
            InputShell::builder()
                .center(0)
                .angmoms(vec![InputAngmom::Label("s".to_string())])
                .kinds(vec![ShellKind::Cartesian])
                .exponents(Some(vec![13.01, 1.962, 0.4446]))
                .coeffs(Some(vec![vec![0.0196850], vec![0.1379770], vec![0.4781480]]))
                .build()
                .expect("Unable to construct a default input shell."),
            InputShell::builder()
                .center(1)
                .angmoms(vec![InputAngmom::Number(0), InputAngmom::Number(1)])
                .kinds(vec![ShellKind::Cartesian, ShellKind::Cartesian])
                .exponents(Some(vec![5.033151, 1.169596]))
                .coeffs(Some(vec![vec![-0.0999672, 0.1559163], vec![0.3995128, 0.6076837]]))
                .build()
                .expect("Unable to construct a default input shell."),
            InputShell::builder()
                .center(1)
                .angmoms(vec![InputAngmom::Label("d".to_string())])
                .kinds(vec![ShellKind::Pure])
                .exponents(Some(vec![0.8]))
                .coeffs(Some(vec![vec![1.0]]))
                .build()
                .expect("Unable to construct a default input shell."),
        ];
        InputMolecularBasis::builder()
            .shells(shells)
            .conventions(InputConventions::Standard(ConventionScheme::Horton2))
            .build()
            .expect("Unable to construct a default input molecular basis.")
    }
}
