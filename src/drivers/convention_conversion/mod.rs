//! Driver for converting the basis-function conventions of a molecular basis.

use std::fmt;
use std::path::PathBuf;

use anyhow::{self, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::basis::conversion::SignedPermutation;
use crate::basis::shell::MolecularBasis;
use crate::drivers::AOConvDriver;
use crate::interfaces::input::ao_basis::InputConventions;
use crate::io::format::{
    aoconv_output, aoconv_warn, log_subtitle, log_title, nice_bool, AOConvOutput,
};
use crate::io::{write_aoconv_binary, AOConvFileType};

#[cfg(test)]
#[path = "convention_conversion_tests.rs"]
mod convention_conversion_tests;

// ==================
// Struct definitions
// ==================

// ----------
// Parameters
// ----------

fn default_true() -> bool {
    true
}

/// Structure containing control parameters for convention conversion.
#[derive(Clone, Builder, Debug, Serialize, Deserialize)]
pub struct ConventionConversionParams {
    /// The conventions into which the basis functions are to be converted.
    #[builder(default = "InputConventions::default()")]
    #[serde(default)]
    pub target_conventions: InputConventions,

    /// Boolean indicating if the mapping from the target conventions back to the conventions of
    /// the basis is required instead.
    #[builder(default = "false")]
    #[serde(default)]
    pub reverse: bool,

    /// Boolean indicating if generalised shells are split into one shell per block before the
    /// conversion.
    #[builder(default = "false")]
    #[serde(default)]
    pub segment_basis: bool,

    /// Boolean indicating if the full target/source/sign table is written to the output.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub write_permutation_table: bool,

    /// Optional name for saving the signed permutation as a binary file of type
    /// [`AOConvFileType::Cnv`], together with the converted basis as a binary file of type
    /// [`AOConvFileType::Bas`]. If `None`, the result will not be saved.
    #[builder(default = "None")]
    #[serde(default)]
    pub result_save_name: Option<PathBuf>,
}

impl ConventionConversionParams {
    /// Returns a builder to construct a [`ConventionConversionParams`] structure.
    pub fn builder() -> ConventionConversionParamsBuilder {
        ConventionConversionParamsBuilder::default()
    }
}

impl Default for ConventionConversionParams {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("Unable to construct a default `ConventionConversionParams`.")
    }
}

impl fmt::Display for ConventionConversionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Target conventions: {}", self.target_conventions)?;
        writeln!(
            f,
            "Direction: {}",
            if self.reverse {
                "target -> basis"
            } else {
                "basis -> target"
            }
        )?;
        writeln!(f, "Segment basis: {}", nice_bool(self.segment_basis))?;
        writeln!(f)?;
        writeln!(
            f,
            "Write permutation table: {}",
            nice_bool(self.write_permutation_table)
        )?;
        writeln!(
            f,
            "Save results to files: {}",
            if let Some(name) = self.result_save_name.as_ref() {
                [AOConvFileType::Cnv, AOConvFileType::Bas]
                    .iter()
                    .map(|file_type| {
                        let mut path = name.clone();
                        path.set_extension(file_type.ext());
                        path.display().to_string()
                    })
                    .join(", ")
            } else {
                nice_bool(false)
            }
        )?;
        Ok(())
    }
}

// ------
// Result
// ------

/// Structure to contain convention conversion results.
#[derive(Clone, Builder, Debug)]
pub struct ConventionConversionResult<'a> {
    /// The control parameters used to obtain this set of results.
    parameters: &'a ConventionConversionParams,

    /// The basis whose functions were converted. This is the segmented basis if segmentation has
    /// been requested.
    pub basis: MolecularBasis,

    /// The signed permutation taking a vector in the source conventions to one in the target
    /// conventions.
    pub signed_permutation: SignedPermutation,

    /// The supplied coefficients after conversion, if any were supplied.
    #[builder(default = "None")]
    pub converted_coefficients: Option<Array1<f64>>,
}

impl<'a> ConventionConversionResult<'a> {
    fn builder() -> ConventionConversionResultBuilder<'a> {
        ConventionConversionResultBuilder::default()
    }

    /// Returns the control parameters used to obtain this set of results.
    pub fn parameters(&self) -> &ConventionConversionParams {
        self.parameters
    }
}

// ------
// Driver
// ------

/// Driver for the conversion of basis-function conventions.
///
/// The driver optionally segments the basis, computes the signed permutation into the target
/// conventions, applies it to any supplied coefficients, and optionally saves it.
#[derive(Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ConventionConversionDriver<'a> {
    /// The control parameters for convention conversion.
    parameters: &'a ConventionConversionParams,

    /// The basis whose functions are to be converted.
    basis: &'a MolecularBasis,

    /// Optional coefficients to be converted. They are ordered as the basis functions of
    /// [`Self::basis`] in its own conventions, or in the target conventions if
    /// [`ConventionConversionParams::reverse`] is set.
    #[builder(default = "None")]
    coefficients: Option<&'a Array1<f64>>,

    /// The result of the conversion.
    #[builder(setter(skip), default = "None")]
    result: Option<ConventionConversionResult<'a>>,
}

impl<'a> ConventionConversionDriverBuilder<'a> {
    fn validate(&self) -> Result<(), String> {
        let basis = self.basis.ok_or("No molecular basis found.".to_string())?;
        let nbasis = basis.nbasis().map_err(|err| err.to_string())?;
        if let Some(Some(coefficients)) = self.coefficients {
            if coefficients.len() != nbasis {
                return Err(format!(
                    "Mismatched numbers of coefficients and basis functions: {} != {nbasis}.",
                    coefficients.len()
                ));
            }
        }
        Ok(())
    }
}

impl<'a> ConventionConversionDriver<'a> {
    /// Returns a builder to construct a [`ConventionConversionDriver`] structure.
    pub fn builder() -> ConventionConversionDriverBuilder<'a> {
        ConventionConversionDriverBuilder::default()
    }

    /// Executes the convention conversion.
    fn convert_conventions(&mut self) -> Result<(), anyhow::Error> {
        log_title("Basis Function Convention Conversion");
        aoconv_output!("");
        let params = self.parameters;
        params.log_output_display();
        aoconv_output!("");

        log_subtitle("Source basis");
        aoconv_output!("");
        self.basis.log_output_display();
        aoconv_output!("");

        if self.basis.nshells() == 0 {
            aoconv_warn!("The basis contains no shells.");
        }
        let basis = if params.segment_basis {
            if !self.basis.shells.iter().any(|shell| shell.is_generalized()) {
                aoconv_warn!("No generalised shells found. Segmentation leaves the basis unchanged.");
            }
            let segmented = self.basis.get_segmented()?;
            log_subtitle("Segmented basis");
            aoconv_output!("");
            segmented.log_output_display();
            aoconv_output!("");
            segmented
        } else {
            self.basis.clone()
        };

        let signed_permutation = basis.convert_conventions(
            params.target_conventions.conventions(),
            params.reverse,
        )?;
        let nnegative = signed_permutation
            .signs()
            .iter()
            .filter(|sign| sign.value() < 0)
            .count();
        let nmoved = signed_permutation
            .permutation()
            .iter()
            .enumerate()
            .filter(|(i, j)| i != *j)
            .count();

        log_subtitle("Signed permutation");
        aoconv_output!("");
        aoconv_output!("Number of basis functions: {}", signed_permutation.len());
        aoconv_output!("Number of relocated functions: {nmoved}");
        aoconv_output!("Number of sign changes: {nnegative}");
        aoconv_output!("");
        if params.write_permutation_table {
            signed_permutation.log_output_display();
            aoconv_output!("");
        }

        let converted_coefficients = self
            .coefficients
            .map(|coefficients| signed_permutation.apply(coefficients))
            .transpose()?;
        if let Some(converted) = converted_coefficients.as_ref() {
            log_subtitle("Converted coefficients");
            aoconv_output!("");
            converted
                .iter()
                .enumerate()
                .for_each(|(i, c)| {
                    aoconv_output!(" {i:>6}  {c:>+16.10e}");
                });
            aoconv_output!("");
        }

        if let Some(name) = params.result_save_name.as_ref() {
            write_aoconv_binary(name, AOConvFileType::Cnv, &signed_permutation)?;
            write_aoconv_binary(name, AOConvFileType::Bas, &basis)?;
            for file_type in [AOConvFileType::Cnv, AOConvFileType::Bas] {
                let mut path = name.clone();
                path.set_extension(file_type.ext());
                aoconv_output!("Result saved as {}.", path.display());
            }
            aoconv_output!("");
        }

        self.result = Some(
            ConventionConversionResult::builder()
                .parameters(params)
                .basis(basis)
                .signed_permutation(signed_permutation)
                .converted_coefficients(converted_coefficients)
                .build()?,
        );
        Ok(())
    }
}

impl<'a> AOConvDriver for ConventionConversionDriver<'a> {
    type Params = ConventionConversionParams;

    type Outcome = ConventionConversionResult<'a>;

    fn result(&self) -> Result<&Self::Outcome, anyhow::Error> {
        self.result
            .as_ref()
            .ok_or_else(|| format_err!("No convention conversion results found."))
    }

    fn run(&mut self) -> Result<(), anyhow::Error> {
        self.convert_conventions()
    }
}
