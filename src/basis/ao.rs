//! Angular parts of atomic-orbital shells: shell kinds, Cartesian monomials, and the orderings of
//! Cartesian and pure functions within a shell.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::iter::FusedIterator;
use std::slice::Iter;
use std::str::FromStr;

use anyhow::{self, format_err};
use derive_builder::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::basis::BasisError;

#[cfg(test)]
#[path = "ao_tests.rs"]
mod ao_tests;

// =========
// ShellKind
// =========

/// Enumerated type for the two representations of the angular functions in a shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShellKind {
    /// Variant for Cartesian functions $`x^{l_x} y^{l_y} z^{l_z}`$.
    #[serde(rename = "c", alias = "Cartesian")]
    Cartesian,

    /// Variant for real solid harmonics. Only defined for $`l \ge 2`$.
    #[serde(rename = "p", alias = "Pure")]
    Pure,
}

impl ShellKind {
    /// Returns the single-character tag of this kind (`c` or `p`).
    pub fn tag(&self) -> char {
        match self {
            ShellKind::Cartesian => 'c',
            ShellKind::Pure => 'p',
        }
    }

    /// Returns the number of functions of this kind in a shell of angular momentum `l`.
    ///
    /// # Errors
    ///
    /// Errors with [`BasisError::InvalidKind`] if a pure shell is requested for $`l < 2`$, and
    /// with [`BasisError::InvalidAngularMomentum`] if the number of functions overflows `usize`.
    pub fn ncomps(&self, l: u32) -> Result<usize, BasisError> {
        let lsize = l as usize;
        let ncomps = match self {
            ShellKind::Cartesian => lsize
                .checked_add(1)
                .zip(lsize.checked_add(2))
                .and_then(|(a, b)| a.checked_mul(b))
                .map(|n| n.div_euclid(2)),
            ShellKind::Pure if l >= 2 => lsize.checked_mul(2).and_then(|n| n.checked_add(1)),
            ShellKind::Pure => {
                return Err(BasisError::InvalidKind(format!(
                    "pure functions are not defined for l = {l}"
                )))
            }
        };
        ncomps.ok_or_else(|| {
            BasisError::InvalidAngularMomentum(i32::try_from(l).unwrap_or(i32::MAX))
        })
    }
}

impl TryFrom<char> for ShellKind {
    type Error = BasisError;

    fn try_from(tag: char) -> Result<Self, Self::Error> {
        match tag {
            'c' => Ok(ShellKind::Cartesian),
            'p' => Ok(ShellKind::Pure),
            _ => Err(BasisError::InvalidKind(format!("unknown kind tag `{tag}`"))),
        }
    }
}

impl FromStr for ShellKind {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(tag), None) => ShellKind::try_from(tag),
            _ => Err(BasisError::InvalidKind(format!("unknown kind tag `{s}`"))),
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ==================
// CartesianMonomials
// ==================

/// Lazy iterator over the exponent tuples $`(l_x, l_y, l_z)`$ of all Cartesian monomials of a
/// given total degree, in alphabetical order: $`l_x`$ runs from $`l`$ down to $`0`$ and, for each
/// $`l_x`$, $`l_y`$ runs from $`l - l_x`$ down to $`0`$.
///
/// The iterator can be restarted by cloning it before consumption or by calling
/// [`cart_monomials`] again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartesianMonomials {
    lcart: u32,

    /// The next $`(l_x, l_y)`$ pair to be yielded.
    next: Option<(u32, u32)>,
}

impl Iterator for CartesianMonomials {
    type Item = (u32, u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let (lx, ly) = self.next?;
        self.next = if ly > 0 {
            Some((lx, ly - 1))
        } else if lx > 0 {
            Some((lx - 1, self.lcart - lx + 1))
        } else {
            None
        };
        Some((lx, ly, self.lcart - lx - ly))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.next.map_or(0, |(lx, ly)| {
            let (lx, ly, lcart) = (lx as usize, ly as usize, self.lcart as usize);
            // The rest of the current lx row, then every complete row with a smaller lx.
            (ly + 1) + lx * (lcart + 1) - (lx * (lx.saturating_sub(1))).div_euclid(2)
        });
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CartesianMonomials {}

impl FusedIterator for CartesianMonomials {}

/// Enumerates the Cartesian monomials of total degree `lcart` in alphabetical order. For
/// `lcart = 2`, this gives `xx, xy, xz, yy, yz, zz`.
pub fn cart_monomials(lcart: u32) -> CartesianMonomials {
    CartesianMonomials {
        lcart,
        next: Some((lcart, 0)),
    }
}

// ~~~~~~~~~
// CartOrder
// ~~~~~~~~~

/// Ordering of the Cartesian functions in a shell of rank `lcart`.
#[derive(Clone, Builder, Debug, PartialEq, Eq, Hash)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct CartOrder {
    /// The $`(l_x, l_y, l_z)`$ exponents of the Cartesian functions, in order.
    pub cart_tuples: Vec<(u32, u32, u32)>,

    /// The rank of the Cartesian functions.
    pub lcart: u32,
}

impl CartOrderBuilder {
    fn validate(&self) -> Result<(), String> {
        let lcart = self.lcart.ok_or("`lcart` has not been set.".to_string())?;
        let cart_tuples = self
            .cart_tuples
            .as_ref()
            .ok_or("No Cartesian tuples found.".to_string())?;
        if cart_tuples.iter().any(|(lx, ly, lz)| lx + ly + lz != lcart) {
            return Err(format!(
                "Not every Cartesian tuple has a total exponent of {lcart}."
            ));
        }
        let ncomps = ShellKind::Cartesian
            .ncomps(lcart)
            .map_err(|err| err.to_string())?;
        let distinct = cart_tuples.iter().collect::<HashSet<_>>().len();
        if cart_tuples.len() != ncomps || distinct != ncomps {
            return Err(format!(
                "Expected {ncomps} distinct Cartesian tuples for `lcart` = {lcart}, found {distinct} \
                distinct tuples out of {}.",
                cart_tuples.len()
            ));
        }
        Ok(())
    }
}

impl CartOrder {
    fn builder() -> CartOrderBuilder {
        CartOrderBuilder::default()
    }

    /// Constructs a Cartesian ordering from exponent tuples. The rank is read off the first
    /// tuple.
    ///
    /// # Errors
    ///
    /// Errors if no tuples are given, or if they are not exactly the monomials of one rank.
    pub fn new(cart_tuples: &[(u32, u32, u32)]) -> Result<Self, anyhow::Error> {
        let (lx, ly, lz) = cart_tuples
            .first()
            .ok_or_else(|| format_err!("No Cartesian tuples found."))?;
        CartOrder::builder()
            .lcart(lx + ly + lz)
            .cart_tuples(cart_tuples.to_vec())
            .build()
            .map_err(|err| format_err!(err))
    }

    /// The alphabetical ordering of [`cart_monomials`].
    #[must_use]
    pub fn lex(lcart: u32) -> Self {
        Self::builder()
            .lcart(lcart)
            .cart_tuples(cart_monomials(lcart).collect_vec())
            .build()
            .expect("The Cartesian monomials of one rank always form a valid `CartOrder`.")
    }

    /// The reverse of [`Self::lex`], starting from $`z^{l}`$.
    #[must_use]
    pub fn reverse_lex(lcart: u32) -> Self {
        let mut cart_order = Self::lex(lcart);
        cart_order.cart_tuples.reverse();
        cart_order
    }

    /// Iterates over the exponent tuples.
    pub fn iter(&'_ self) -> Iter<'_, (u32, u32, u32)> {
        self.cart_tuples.iter()
    }

    /// The number of Cartesian functions in this ordering.
    pub fn ncomps(&self) -> usize {
        self.cart_tuples.len()
    }
}

/// Writes the monomial of an exponent tuple, either flat (`xxyz`) or compact (`x^2yz`). The
/// constant monomial is written as `1`.
pub fn cart_tuple_to_str(cart_tuple: &(u32, u32, u32), flat: bool) -> String {
    let (lx, ly, lz) = *cart_tuple;
    if lx + ly + lz == 0 {
        return "1".to_string();
    }
    [("x", lx), ("y", ly), ("z", lz)]
        .into_iter()
        .map(|(axis, power)| match (flat, power.cmp(&1)) {
            (true, _) => axis.repeat(power as usize),
            (false, Ordering::Greater) => format!("{axis}^{power}"),
            (false, Ordering::Equal) => axis.to_string(),
            (false, Ordering::Less) => String::new(),
        })
        .collect()
}

// ~~~~~~~~~
// PureOrder
// ~~~~~~~~~

/// Ordering of the real solid harmonics in a shell of rank `lpure`, given by their $`m`$ values.
#[derive(Clone, Builder, Debug, PartialEq, Eq, Hash)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct PureOrder {
    /// The $`m`$ values of the functions, in order.
    mls: Vec<i32>,

    /// The rank of the pure functions.
    pub lpure: u32,
}

impl PureOrderBuilder {
    fn validate(&self) -> Result<(), String> {
        let lpure = self.lpure.ok_or("`lpure` has not been set.".to_string())?;
        let mls = self.mls.as_ref().ok_or("No m values found.".to_string())?;
        let ncomps = 2 * lpure as usize + 1;
        let distinct = mls.iter().collect::<HashSet<_>>().len();
        if mls.len() != ncomps
            || distinct != ncomps
            || mls.iter().any(|m| m.unsigned_abs() > lpure)
        {
            return Err(format!(
                "{mls:?} is not a complete set of m values for `lpure` = {lpure}."
            ));
        }
        Ok(())
    }
}

impl PureOrder {
    fn builder() -> PureOrderBuilder {
        PureOrderBuilder::default()
    }

    /// Constructs a pure ordering from $`m`$ values. The rank is the largest $`|m|`$.
    ///
    /// # Errors
    ///
    /// Errors if no values are given, or if they are not exactly $`-l, \ldots, l`$ in some
    /// order.
    pub fn new(mls: &[i32]) -> Result<Self, anyhow::Error> {
        let lpure = mls
            .iter()
            .map(|m| m.unsigned_abs())
            .max()
            .ok_or_else(|| format_err!("No m values found."))?;
        PureOrder::builder()
            .lpure(lpure)
            .mls(mls.to_vec())
            .build()
            .map_err(|err| format_err!(err))
    }

    fn from_signed_ranks(lpure: u32, mls: impl Iterator<Item = i32>) -> Self {
        Self::builder()
            .lpure(lpure)
            .mls(mls.collect_vec())
            .build()
            .expect("A standard pure ordering is always complete.")
    }

    /// The ordering $`-l, \ldots, 0, \ldots, l`$.
    #[must_use]
    pub fn increasingm(lpure: u32) -> Self {
        let l = lpure as i32;
        Self::from_signed_ranks(lpure, -l..=l)
    }

    /// The ordering $`0, 1, -1, 2, -2, \ldots, l, -l`$.
    #[must_use]
    pub fn molden(lpure: u32) -> Self {
        let l = lpure as i32;
        Self::from_signed_ranks(
            lpure,
            std::iter::once(0).chain((1..=l).flat_map(|absm| [absm, -absm])),
        )
    }

    /// Iterates over the $`m`$ values.
    pub fn iter(&'_ self) -> Iter<'_, i32> {
        self.mls.iter()
    }

    /// The number of pure functions in this ordering.
    pub fn ncomps(&self) -> usize {
        self.mls.len()
    }
}
