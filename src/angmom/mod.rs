//! Angular momentum labels.

use phf::phf_map;

use crate::basis::BasisError;


/// The largest angular momentum that has an alphabetical label.
pub const MAX_ANGMOM: u32 = 24;

/// Alphabetical labels of angular momenta, indexed by $`l`$.
///
/// The letter `j` is never used. After `z`, the labels restart from the beginning of the alphabet
/// and skip letters that have already been assigned.
pub static ANGMOM_LABELS: [&str; 25] = [
    "s", "p", "d", "f", "g", "h", "i", "k", "l", "m", "n", "o", "q", "r", "t", "u", "v", "w", "x",
    "y", "z", "a", "b", "c", "e",
];

/// Indices of alphabetical labels of angular momenta.
pub static ANGMOM_INDICES: phf::Map<&'static str, u32> = phf_map! {
    "s" => 0,
    "p" => 1,
    "d" => 2,
    "f" => 3,
    "g" => 4,
    "h" => 5,
    "i" => 6,
    "k" => 7,
    "l" => 8,
    "m" => 9,
    "n" => 10,
    "o" => 11,
    "q" => 12,
    "r" => 13,
    "t" => 14,
    "u" => 15,
    "v" => 16,
    "w" => 17,
    "x" => 18,
    "y" => 19,
    "z" => 20,
    "a" => 21,
    "b" => 22,
    "c" => 23,
    "e" => 24,
};

/// Converts an alphabetical angular momentum label into its $`l`$ value. The lookup is
/// case-insensitive.
///
/// # Errors
///
/// Errors with [`BasisError::UnknownAngularMomentumLabel`] if `label` is not in
/// [`ANGMOM_LABELS`].
pub fn label_to_l(label: &str) -> Result<u32, BasisError> {
    ANGMOM_INDICES
        .get(label.to_lowercase().as_str())
        .copied()
        .ok_or_else(|| BasisError::UnknownAngularMomentumLabel(label.to_string()))
}

/// Converts a sequence of alphabetical angular momentum labels into their $`l`$ values, keeping
/// the order.
///
/// # Errors
///
/// Errors on the first label that is not in [`ANGMOM_LABELS`].
pub fn labels_to_ls<S: AsRef<str>>(labels: &[S]) -> Result<Vec<u32>, BasisError> {
    labels
        .iter()
        .map(|label| label_to_l(label.as_ref()))
        .collect()
}

/// Converts an $`l`$ value into its lowercase alphabetical label.
///
/// # Errors
///
/// Errors with [`BasisError::InvalidAngularMomentum`] if `l` is negative or greater than
/// [`MAX_ANGMOM`].
pub fn l_to_label(l: i32) -> Result<&'static str, BasisError> {
    usize::try_from(l)
        .ok()
        .and_then(|i| ANGMOM_LABELS.get(i))
        .copied()
        .ok_or(BasisError::InvalidAngularMomentum(l))
}

/// Converts a sequence of $`l`$ values into their alphabetical labels, keeping the order.
///
/// # Errors
///
/// Errors if any of the values is out of range.
pub fn ls_to_labels(ls: &[i32]) -> Result<Vec<&'static str>, BasisError> {
    ls.iter().map(|&l| l_to_label(l)).collect()
}
