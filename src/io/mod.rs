//! Reading and writing of `aoconv` input configurations and result files.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{self, format_err};
use bincode;
use serde::{de::DeserializeOwned, Serialize};
use serde_yaml;

pub(crate) mod format;


/// An enumerated type for `aoconv` file types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AOConvFileType {
    /// Variant for binary files containing convention-conversion results.
    Cnv,

    /// Variant for binary files containing molecular basis sets.
    Bas,
}

impl AOConvFileType {
    /// Returns the extension of the file type.
    pub fn ext(&self) -> String {
        match self {
            AOConvFileType::Cnv => "aoconv.cnv".to_string(),
            AOConvFileType::Bas => "aoconv.bas".to_string(),
        }
    }
}

/// Reads an `aoconv` binary file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (without `aoconv`-specific extensions).
/// * `file_type` - The type of the `aoconv` file to be read in.
///
/// # Returns
///
/// A `Result` containing the structure deserialised from the read-in file.
pub fn read_aoconv_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: AOConvFileType,
) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut reader = BufReader::new(
        File::open(&path).map_err(|err| format_err!("Unable to open {}: {err}", path.display()))?,
    );
    bincode::deserialize_from(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes into an `aoconv` binary file.
///
/// # Arguments
///
/// * `name` - The name of the file to be written (without `aoconv`-specific extensions).
/// * `file_type` - The type of the `aoconv` file to be written.
/// * `value` - The structure to be written.
pub fn write_aoconv_binary<T, P: AsRef<Path>>(
    name: P,
    file_type: AOConvFileType,
    value: &T,
) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension(file_type.ext());
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, value).map_err(|err| format_err!(err))
}

/// Reads an `aoconv` configuration YAML file and deserialises it into an appropriate structure.
///
/// # Arguments
///
/// * `name` - The name of the file to be read in (with its `.yml` or `.yaml` extension).
pub fn read_aoconv_yaml<T, P: AsRef<Path>>(name: P) -> Result<T, anyhow::Error>
where
    T: DeserializeOwned,
{
    let mut reader = BufReader::new(File::open(name).map_err(|err| format_err!(err))?);
    serde_yaml::from_reader(&mut reader).map_err(|err| format_err!(err))
}

/// Serialises a structure and writes into an `aoconv` configuration YAML file.
///
/// # Arguments
///
/// * `name` - The name of the YAML file to be written (without extensions). The resulting file
/// will have the `.yml` extension.
/// * `value` - The structure to be written.
pub fn write_aoconv_yaml<T, P: AsRef<Path>>(name: P, value: &T) -> Result<(), anyhow::Error>
where
    T: Serialize,
{
    let mut path = name.as_ref().to_path_buf();
    path.set_extension("yml");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_yaml::to_writer(&mut writer, value).map_err(|err| format_err!(err))
}
