//! Conventions for the ordering and signs of basis functions within a shell.
//!
//! A convention names every function of one `(l, kind)` shell type with a label and an optional
//! sign. Two conventions for the same shell type can be mapped onto each other by matching their
//! unsigned labels (see [`crate::basis::conversion`]).

use std::collections::HashSet;
use std::fmt;
use std::ops::Mul;
use std::slice::Iter;
use std::str::FromStr;

use indexmap::IndexMap;
use itertools::Itertools;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::angmom::{ANGMOM_LABELS, MAX_ANGMOM};
use crate::basis::ao::{cart_tuple_to_str, CartOrder, PureOrder, ShellKind};
use crate::basis::BasisError;

#[cfg(test)]
#[path = "convention_tests.rs"]
mod convention_tests;

// ====
// Sign
// ====

/// Enumerated type for the sign attached to a basis function in a convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Variant for `+1`.
    Plus,

    /// Variant for `-1`.
    Minus,
}

impl Sign {
    /// Returns the sign as `+1` or `-1`.
    pub fn value(&self) -> i8 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }
}

impl Mul for Sign {
    type Output = Sign;

    fn mul(self, rhs: Self) -> Self::Output {
        if self == rhs {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

impl From<Sign> for f64 {
    fn from(sign: Sign) -> Self {
        f64::from(sign.value())
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Plus => write!(f, "+"),
            Sign::Minus => write!(f, "-"),
        }
    }
}

// ===============
// ConventionEntry
// ===============

/// Structure for one labelled basis function in a convention.
///
/// The textual form is the label, prefixed with `-` if the function enters the convention with a
/// negative sign (*e.g.* `-ds1`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConventionEntry {
    /// The unsigned label of the basis function.
    label: String,

    /// The sign with which the basis function enters the convention.
    sign: Sign,
}

impl ConventionEntry {
    /// Constructs a new [`ConventionEntry`] from an unsigned label and a sign.
    ///
    /// # Errors
    ///
    /// Errors if the label is empty or itself starts with `-`.
    pub fn new(label: &str, sign: Sign) -> Result<Self, BasisError> {
        if label.is_empty() || label.starts_with('-') {
            Err(BasisError::InvalidConventionPair(format!(
                "`{label}` is not a valid unsigned basis-function label"
            )))
        } else {
            Ok(Self {
                label: label.to_string(),
                sign,
            })
        }
    }

    /// The unsigned label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The sign.
    pub fn sign(&self) -> Sign {
        self.sign
    }
}

impl FromStr for ConventionEntry {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('-') {
            Some(label) => ConventionEntry::new(label, Sign::Minus),
            None => ConventionEntry::new(s, Sign::Plus),
        }
    }
}

impl TryFrom<String> for ConventionEntry {
    type Error = BasisError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ConventionEntry> for String {
    fn from(entry: ConventionEntry) -> Self {
        entry.to_string()
    }
}

impl fmt::Display for ConventionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sign {
            Sign::Plus => write!(f, "{}", self.label),
            Sign::Minus => write!(f, "-{}", self.label),
        }
    }
}

// ==========
// Convention
// ==========

/// Structure for the ordered, signed labels of the basis functions of one `(l, kind)` shell type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Convention(Vec<ConventionEntry>);

impl Convention {
    /// Constructs a new [`Convention`] from its entries.
    pub fn new(entries: Vec<ConventionEntry>) -> Self {
        Self(entries)
    }

    /// Parses a [`Convention`] from signed textual labels such as `["x", "z", "-y"]`.
    ///
    /// # Errors
    ///
    /// Errors if any of the labels is empty.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, BasisError> {
        labels
            .iter()
            .map(|label| label.as_ref().parse::<ConventionEntry>())
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Constructs the all-positive [`Convention`] of a Cartesian ordering, with labels such as
    /// `xxy`. The $`s`$ function is labelled `1`.
    pub fn from_cart_order(cart_order: &CartOrder) -> Self {
        Self(
            cart_order
                .iter()
                .map(|cart_tuple| ConventionEntry {
                    label: cart_tuple_to_str(cart_tuple, true),
                    sign: Sign::Plus,
                })
                .collect(),
        )
    }

    /// Constructs the all-positive [`Convention`] of a pure ordering. The function with
    /// $`m \ge 0`$ is labelled `{l}c{m}` and the one with $`m < 0`$ is labelled `{l}s{|m|}`, where
    /// `{l}` is the alphabetical angular momentum label (*e.g.* `dc0`, `ds1`).
    ///
    /// # Errors
    ///
    /// Errors if the rank of `pure_order` has no alphabetical label.
    pub fn from_pure_order(pure_order: &PureOrder) -> Result<Self, BasisError> {
        let lchar = ANGMOM_LABELS
            .get(pure_order.lpure as usize)
            .ok_or(BasisError::InvalidAngularMomentum(
                i32::try_from(pure_order.lpure).unwrap_or(i32::MAX),
            ))?;
        Ok(Self(
            pure_order
                .iter()
                .map(|m| ConventionEntry {
                    label: if *m >= 0 {
                        format!("{lchar}c{m}")
                    } else {
                        format!("{lchar}s{}", m.unsigned_abs())
                    },
                    sign: Sign::Plus,
                })
                .collect(),
        ))
    }

    /// The number of basis functions in this convention.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if this convention has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries.
    pub fn iter(&'_ self) -> Iter<'_, ConventionEntry> {
        self.0.iter()
    }

    /// Returns the entry with a specified index.
    pub fn get(&self, i: usize) -> Option<&ConventionEntry> {
        self.0.get(i)
    }

    /// Checks that the unsigned labels are pairwise distinct.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::InvalidConventionPair`] naming the first duplicated label.
    pub fn check_unique(&self) -> Result<(), BasisError> {
        let mut seen = HashSet::with_capacity(self.len());
        match self.iter().find(|entry| !seen.insert(entry.label())) {
            Some(entry) => Err(BasisError::InvalidConventionPair(format!(
                "duplicate label `{}` in convention ({self})",
                entry.label()
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().join(", "))
    }
}

// ===========
// Conventions
// ===========

/// A `(l, kind)` key into a convention dictionary.
pub type ConventionKey = (u32, ShellKind);

/// Serialisable record of one dictionary entry in [`Conventions`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConventionRecord {
    /// The angular momentum of the shell type.
    pub l: u32,

    /// The kind of the shell type.
    pub kind: ShellKind,

    /// The convention of the shell type.
    pub labels: Convention,
}

/// Structure for a dictionary of conventions, one for every `(l, kind)` shell type that a
/// program uses.
///
/// This serialises as a list of `{l, kind, labels}` records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ConventionRecord>", into = "Vec<ConventionRecord>")]
pub struct Conventions(IndexMap<ConventionKey, Convention>);

impl Conventions {
    /// Constructs an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the convention for `(l, kind)`, returning the convention it replaces, if any.
    pub fn insert(&mut self, l: u32, kind: ShellKind, convention: Convention) -> Option<Convention> {
        self.0.insert((l, kind), convention)
    }

    /// Returns the convention for `(l, kind)`, if any.
    pub fn get(&self, l: u32, kind: ShellKind) -> Option<&Convention> {
        self.0.get(&(l, kind))
    }

    /// Returns the convention for `(l, kind)`.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::MissingConvention`] if there is no such entry.
    pub fn try_get(&self, l: u32, kind: ShellKind) -> Result<&Convention, BasisError> {
        self.get(l, kind)
            .ok_or(BasisError::MissingConvention(l, kind))
    }

    /// Returns `true` if there is a convention for `(l, kind)`.
    pub fn contains(&self, l: u32, kind: ShellKind) -> bool {
        self.0.contains_key(&(l, kind))
    }

    /// The number of shell types in this dictionary.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if this dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the `(l, kind)` keys and their conventions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConventionKey, &Convention)> + '_ {
        self.0.iter()
    }
}

impl FromIterator<(ConventionKey, Convention)> for Conventions {
    fn from_iter<I: IntoIterator<Item = (ConventionKey, Convention)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<Vec<ConventionRecord>> for Conventions {
    type Error = BasisError;

    fn try_from(records: Vec<ConventionRecord>) -> Result<Self, Self::Error> {
        let mut conventions = Conventions::new();
        for record in records {
            if conventions.contains(record.l, record.kind) {
                return Err(BasisError::DuplicateConvention(record.l, record.kind));
            }
            conventions.insert(record.l, record.kind, record.labels);
        }
        Ok(conventions)
    }
}

impl From<Conventions> for Vec<ConventionRecord> {
    fn from(conventions: Conventions) -> Self {
        conventions
            .0
            .into_iter()
            .map(|((l, kind), labels)| ConventionRecord { l, kind, labels })
            .collect()
    }
}

impl fmt::Display for Conventions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ((l, kind), convention) in self.iter() {
            let lchar = ANGMOM_LABELS.get(*l as usize).copied().unwrap_or("?");
            writeln!(f, "  {l:>2} ({lchar}) {kind}: {convention}")?;
        }
        Ok(())
    }
}

// ================================
// Standard convention dictionaries
// ================================

/// Enumerated type for the convention dictionaries shipped with this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConventionScheme {
    /// Cartesian functions in alphabetical order, pure functions in `c0, c1, s1, c2, s2, ...`
    /// order.
    #[serde(rename = "HORTON2", alias = "horton2")]
    Horton2,

    /// Cartesian functions in alphabetical order, pure functions in
    /// `s_l, ..., s1, c0, c1, ..., c_l` order.
    #[serde(rename = "PSI4", alias = "psi4")]
    Psi4,

    /// Cartesian functions in reverse alphabetical order, pure functions as in
    /// [`ConventionScheme::Psi4`].
    #[serde(rename = "GBASIS", alias = "gbasis")]
    Gbasis,
}

impl ConventionScheme {
    /// Returns the convention dictionary of this scheme.
    pub fn conventions(&self) -> &'static Conventions {
        match self {
            ConventionScheme::Horton2 => &HORTON2_CONVENTIONS,
            ConventionScheme::Psi4 => &PSI4_CONVENTIONS,
            ConventionScheme::Gbasis => &GBASIS_CONVENTIONS,
        }
    }
}

impl fmt::Display for ConventionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConventionScheme::Horton2 => write!(f, "HORTON2"),
            ConventionScheme::Psi4 => write!(f, "PSI4"),
            ConventionScheme::Gbasis => write!(f, "GBASIS"),
        }
    }
}

/// Builds a dictionary for all labelled angular momenta from a Cartesian and a pure ordering.
fn build_conventions(cart_order: fn(u32) -> CartOrder, pure_order: fn(u32) -> PureOrder) -> Conventions {
    (0..=MAX_ANGMOM)
        .flat_map(|l| {
            let cart = ((l, ShellKind::Cartesian), Convention::from_cart_order(&cart_order(l)));
            let pure = (l >= 2).then(|| {
                (
                    (l, ShellKind::Pure),
                    Convention::from_pure_order(&pure_order(l))
                        .expect("Every l up to `MAX_ANGMOM` has a label."),
                )
            });
            std::iter::once(cart).chain(pure)
        })
        .collect()
}

lazy_static! {
    /// Conventions used by HORTON 2.
    pub static ref HORTON2_CONVENTIONS: Conventions =
        build_conventions(CartOrder::lex, PureOrder::molden);

    /// Conventions used by PSI4.
    pub static ref PSI4_CONVENTIONS: Conventions =
        build_conventions(CartOrder::lex, PureOrder::increasingm);

    /// Conventions used by GBasis.
    pub static ref GBASIS_CONVENTIONS: Conventions =
        build_conventions(CartOrder::reverse_lex, PureOrder::increasingm);
}
