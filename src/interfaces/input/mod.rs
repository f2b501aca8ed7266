//! `aoconv` input configuration.

use anyhow::{self, format_err};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::drivers::convention_conversion::{
    ConventionConversionDriver, ConventionConversionParams,
};
use crate::drivers::AOConvDriver;
use crate::interfaces::input::ao_basis::InputMolecularBasis;
use crate::interfaces::InputHandle;
use crate::io::format::{aoconv_error, aoconv_output, log_subtitle};

pub mod ao_basis;


/// A structure containing `aoconv` input parameters which can be serialised into and deserialised
/// from a YAML input file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Input {
    /// The molecular basis whose basis-function conventions are to be converted.
    pub basis: InputMolecularBasis,

    /// The parameters for convention conversion.
    ///
    /// # Default
    ///
    /// If not specified, conversion into the PSI4 conventions is performed.
    #[serde(default)]
    pub conversion: ConventionConversionParams,

    /// Optional coefficients to be converted. They are ordered as the basis functions of
    /// [`Self::basis`] in its own conventions, or in the target conventions if
    /// `conversion.reverse` is set.
    ///
    /// # Default
    ///
    /// If not specified, this will be taken to be `None`.
    #[serde(default)]
    pub coefficients: Option<Vec<f64>>,
}

impl Default for Input {
    fn default() -> Self {
        Input {
            basis: InputMolecularBasis::default(),
            conversion: ConventionConversionParams::default(),
            coefficients: None,
        }
    }
}

impl InputHandle for Input {
    /// Handles the main input structure.
    fn handle(&self) -> Result<(), anyhow::Error> {
        let basis = self.basis.to_molecular_basis()?;
        let coefficients = self.coefficients.clone().map(Array1::from_vec);
        let mut driver = ConventionConversionDriver::builder()
            .parameters(&self.conversion)
            .basis(&basis)
            .coefficients(coefficients.as_ref())
            .build()
            .map_err(|err| format_err!(err))?;
        driver.run().map_err(|err| {
            aoconv_error!("Convention conversion failed: {err}");
            err
        })?;
        let result = driver.result()?;
        log_subtitle("Summary");
        aoconv_output!("");
        aoconv_output!(
            "Converted {} basis functions in {} shells.",
            result.signed_permutation.len(),
            result.basis.nshells()
        );
        aoconv_output!("");
        Ok(())
    }
}
