use itertools::Itertools;
use ndarray::{array, Array1, Array2};
use proptest::prelude::*;
use rand::Rng;

use crate::basis::ao::{CartOrder, PureOrder, ShellKind};
use crate::basis::convention::{
    Convention, ConventionScheme, Conventions, Sign, GBASIS_CONVENTIONS, HORTON2_CONVENTIONS,
    PSI4_CONVENTIONS,
};
use crate::basis::conversion::{convert_convention_shell, convert_conventions};
use crate::basis::shell::{MolecularBasis, Shell};
use crate::basis::BasisError;

fn conv(labels: &[&str]) -> Convention {
    Convention::from_labels(labels).unwrap()
}

fn random_vector(n: usize) -> Array1<f64> {
    let mut rng = rand::thread_rng();
    Array1::from_shape_fn(n, |_| rng.gen_range(-1.0..1.0))
}

fn metadata_basis() -> MolecularBasis {
    use ShellKind::{Cartesian as C, Pure as P};
    let conventions: Conventions = [
        ((0, C), conv(&["s"])),
        ((1, C), conv(&["x", "z", "-y"])),
        ((2, P), conv(&["dc0", "dc1", "-ds1", "dc2", "-ds2"])),
    ]
    .into_iter()
    .collect();
    MolecularBasis::new(
        vec![
            Shell::new(0, &[0], &[C], None, None),
            Shell::new(0, &[0, 1], &[C, C], None, None),
            Shell::new(0, &[0, 1], &[C, C], None, None),
            Shell::new(0, &[2], &[P], None, None),
        ],
        conventions,
        "L2",
    )
}

#[test]
fn test_conversion_shell_plain() {
    let sp = convert_convention_shell(&conv(&["a", "b", "c"]), &conv(&["c", "b", "a"]), false)
        .unwrap();
    assert_eq!(sp.permutation(), &[2, 1, 0]);
    assert_eq!(sp.signs(), &[Sign::Plus, Sign::Plus, Sign::Plus]);
    assert_eq!(sp.sign_values(), vec![1, 1, 1]);
}

#[test]
fn test_conversion_shell_signed() {
    let a = conv(&["-a", "b", "c"]);
    let b = conv(&["c", "b", "a"]);
    let sp = convert_convention_shell(&a, &b, false).unwrap();
    assert_eq!(sp.permutation(), &[2, 1, 0]);
    assert_eq!(sp.sign_values(), vec![1, 1, -1]);
    let vec1 = array![1.0, 2.0, 3.0];
    let vec2 = array![3.0, 2.0, -1.0];
    assert_eq!(sp.apply(&vec1).unwrap(), vec2);
    let sp_rev = convert_convention_shell(&a, &b, true).unwrap();
    assert_eq!(sp_rev.apply(&vec2).unwrap(), vec1);

    let sp = convert_convention_shell(&conv(&["a", "b", "c"]), &conv(&["-c", "b", "a"]), false)
        .unwrap();
    assert_eq!(sp.permutation(), &[2, 1, 0]);
    assert_eq!(sp.sign_values(), vec![-1, 1, 1]);
    assert_eq!(
        sp.apply(&array![1.0, 2.0, 3.0]).unwrap(),
        array![-3.0, 2.0, 1.0]
    );

    let a = conv(&["a", "-b", "-c"]);
    let b = conv(&["-c", "b", "a"]);
    let sp = convert_convention_shell(&a, &b, false).unwrap();
    assert_eq!(sp.permutation(), &[2, 1, 0]);
    assert_eq!(sp.sign_values(), vec![1, -1, 1]);
    let vec1 = array![1.0, 2.0, 3.0];
    let vec2 = array![3.0, -2.0, 1.0];
    assert_eq!(sp.apply(&vec1).unwrap(), vec2);
    let sp_rev = convert_convention_shell(&a, &b, true).unwrap();
    assert_eq!(sp_rev.apply(&vec2).unwrap(), vec1);

    let a = conv(&["fo", "ba", "sp"]);
    let b = conv(&["fo", "-sp", "ba"]);
    let sp = convert_convention_shell(&a, &b, false).unwrap();
    assert_eq!(sp.permutation(), &[0, 2, 1]);
    assert_eq!(sp.sign_values(), vec![1, -1, 1]);
    let vec1 = array![1.0, 2.0, 3.0];
    let vec2 = array![1.0, -3.0, 2.0];
    assert_eq!(sp.apply(&vec1).unwrap(), vec2);
    let sp_rev = convert_convention_shell(&a, &b, true).unwrap();
    assert_eq!(sp_rev.apply(&vec2).unwrap(), vec1);
}

#[test]
fn test_conversion_shell_reverse_is_swapped_forward() {
    let a = conv(&["p", "-q", "r", "s"]);
    let b = conv(&["q", "s", "-p", "r"]);
    assert_eq!(
        convert_convention_shell(&a, &b, true).unwrap(),
        convert_convention_shell(&b, &a, false).unwrap()
    );
}

#[test]
fn test_conversion_shell_exceptions() {
    let cases: [(&[&str], &[&str]); 5] = [
        (&["a", "b", "c"], &["c", "b"]),
        (&["a", "b", "c"], &["c", "b", "b"]),
        (&["a", "b", "a"], &["c", "b", "a"]),
        (&["a", "b", "c"], &["a", "b", "d"]),
        (&["a", "b", "c"], &["a", "b", "-d"]),
    ];
    for (a, b) in cases {
        assert!(matches!(
            convert_convention_shell(&conv(a), &conv(b), false),
            Err(BasisError::InvalidConventionPair(_))
        ));
        assert!(matches!(
            convert_convention_shell(&conv(a), &conv(b), true),
            Err(BasisError::InvalidConventionPair(_))
        ));
    }
}

#[test]
fn test_conversion_shell_orders() {
    // Each permutation maps the second ordering onto the first one.
    for lcart in 2..=4 {
        let lex = Convention::from_cart_order(&CartOrder::lex(lcart));
        let reverse_lex = Convention::from_cart_order(&CartOrder::reverse_lex(lcart));
        let sp = convert_convention_shell(&reverse_lex, &lex, false).unwrap();
        let n = lex.len();
        assert_eq!(sp.permutation(), (0..n).rev().collect::<Vec<_>>().as_slice());
        assert!(sp.signs().iter().all(|sign| *sign == Sign::Plus));
    }

    let expected_pure = [
        (2, vec![4, 2, 0, 1, 3]),
        (3, vec![6, 4, 2, 0, 1, 3, 5]),
        (4, vec![8, 6, 4, 2, 0, 1, 3, 5, 7]),
    ];
    for (lpure, perm) in expected_pure {
        let increasingm = Convention::from_pure_order(&PureOrder::increasingm(lpure)).unwrap();
        let molden = Convention::from_pure_order(&PureOrder::molden(lpure)).unwrap();
        let sp = convert_convention_shell(&molden, &increasingm, false).unwrap();
        assert_eq!(sp.permutation(), perm.as_slice());
    }
}

#[test]
fn test_conversion_basis() {
    use ShellKind::{Cartesian as C, Pure as P};
    let basis = metadata_basis();
    let new_conventions: Conventions = [
        ((0, C), conv(&["-s"])),
        ((1, C), conv(&["x", "y", "z"])),
        ((2, P), conv(&["dc2", "dc1", "dc0", "ds1", "ds2"])),
    ]
    .into_iter()
    .collect();
    let sp = convert_conventions(&basis, &new_conventions, false).unwrap();
    assert_eq!(
        sp.permutation(),
        &[0, 1, 2, 4, 3, 5, 6, 8, 7, 12, 10, 9, 11, 13]
    );
    assert_eq!(
        sp.sign_values(),
        vec![-1, -1, 1, -1, 1, -1, 1, -1, 1, 1, 1, 1, -1, -1]
    );
    assert_eq!(basis.convert_conventions(&new_conventions, false), Ok(sp.clone()));

    let vec1 = random_vector(basis.nbasis().unwrap());
    let vec2 = sp.apply(&vec1).unwrap();
    let sp_rev = convert_conventions(&basis, &new_conventions, true).unwrap();
    let vec3 = sp_rev.apply(&vec2).unwrap();
    assert_eq!(vec1, vec3);
}

#[test]
fn test_conversion_basis_exceptions() {
    use ShellKind::{Cartesian as C, Pure as P};
    let basis = metadata_basis();

    // Missing (2, p) in the target conventions.
    let incomplete: Conventions = [((0, C), conv(&["s"])), ((1, C), conv(&["x", "y", "z"]))]
        .into_iter()
        .collect();
    assert_eq!(
        convert_conventions(&basis, &incomplete, false),
        Err(BasisError::MissingConvention(2, P))
    );

    // A label-set mismatch in the last block aborts the whole conversion.
    let mismatched: Conventions = [
        ((0, C), conv(&["s"])),
        ((1, C), conv(&["x", "y", "z"])),
        ((2, P), conv(&["dc2", "dc1", "dc0", "ds1", "ds3"])),
    ]
    .into_iter()
    .collect();
    assert!(matches!(
        convert_conventions(&basis, &mismatched, false),
        Err(BasisError::InvalidConventionPair(_))
    ));

    // Conventions of different lengths for the same block form an invalid pair.
    let short: Conventions = [
        ((0, C), conv(&["s"])),
        ((1, C), conv(&["x", "y"])),
        ((2, P), conv(&["dc2", "dc1", "dc0", "ds1", "ds2"])),
    ]
    .into_iter()
    .collect();
    assert!(matches!(
        convert_conventions(&basis, &short, false),
        Err(BasisError::InvalidConventionPair(_))
    ));

    // Two matching conventions that do not cover the block.
    let mut short_conventions = basis.conventions.clone();
    short_conventions.insert(1, C, conv(&["x", "y"]));
    let short_basis = MolecularBasis::new(basis.shells.clone(), short_conventions, "L2");
    assert!(matches!(
        convert_conventions(&short_basis, &short, false),
        Err(BasisError::ShapeMismatch(_))
    ));

    // An invalid pure block is reported before any conversion.
    let invalid = MolecularBasis::new(
        vec![Shell::new(0, &[1], &[P], None, None)],
        HORTON2_CONVENTIONS.clone(),
        "L2",
    );
    assert!(matches!(
        convert_conventions(&invalid, &PSI4_CONVENTIONS, false),
        Err(BasisError::InvalidKind(_))
    ));
}

#[test]
fn test_conversion_basis_standard_schemes() {
    use ShellKind::{Cartesian as C, Pure as P};
    let basis = MolecularBasis::new(
        vec![
            Shell::new(0, &[0, 1], &[C, C], None, None),
            Shell::new(1, &[2], &[C], None, None),
            Shell::new(1, &[2, 3], &[P, P], None, None),
        ],
        HORTON2_CONVENTIONS.clone(),
        "L2",
    );
    assert_eq!(basis.nbasis(), Ok(1 + 3 + 6 + 5 + 7));
    let sp = convert_conventions(&basis, ConventionScheme::Gbasis.conventions(), false).unwrap();
    assert_eq!(
        sp.permutation()[..10],
        [0, 3, 2, 1, 9, 8, 7, 6, 5, 4]
    );
    // HORTON2 dc0, dc1, ds1, dc2, ds2 -> GBASIS ds2, ds1, dc0, dc1, dc2
    assert_eq!(sp.permutation()[10..15], [14, 12, 10, 11, 13]);
    assert!(sp.signs().iter().all(|sign| *sign == Sign::Plus));
}

#[test]
fn test_conversion_apply_shape() {
    let sp = convert_convention_shell(&conv(&["a", "-b"]), &conv(&["b", "a"]), false).unwrap();
    assert!(matches!(
        sp.apply(&array![1.0, 2.0, 3.0]),
        Err(BasisError::ShapeMismatch(_))
    ));
    assert!(matches!(
        sp.apply_to_rows(&Array2::<f64>::zeros((3, 2))),
        Err(BasisError::ShapeMismatch(_))
    ));

    let mo_coeffs = array![[1.0, 10.0, 100.0], [2.0, 20.0, 200.0]];
    let converted = sp.apply_to_rows(&mo_coeffs).unwrap();
    assert_eq!(converted, array![[-2.0, -20.0, -200.0], [1.0, 10.0, 100.0]]);
    for (column, converted_column) in mo_coeffs.columns().into_iter().zip(converted.columns()) {
        assert_eq!(sp.apply(&column).unwrap(), converted_column);
    }
}

// ----------
// Properties
// ----------

/// Generates a pair of conventions over the same labels, with random orders and signs.
fn convention_pair() -> impl Strategy<Value = (Convention, Convention)> {
    (1usize..16)
        .prop_flat_map(|n| {
            (
                Just((0..n).collect_vec()).prop_shuffle(),
                proptest::collection::vec(any::<bool>(), n),
                proptest::collection::vec(any::<bool>(), n),
            )
        })
        .prop_map(|(perm, signs_a, signs_b)| {
            let label = |i: usize, negative: bool| {
                if negative {
                    format!("-f{i}")
                } else {
                    format!("f{i}")
                }
            };
            let a = (0..perm.len())
                .map(|i| label(i, signs_a[i]))
                .collect_vec();
            let b = perm
                .iter()
                .zip(signs_b.iter())
                .map(|(&i, &negative)| label(i, negative))
                .collect_vec();
            (
                Convention::from_labels(&a).unwrap(),
                Convention::from_labels(&b).unwrap(),
            )
        })
}

/// Generates the `(l, kind)` blocks of a random multi-shell basis.
fn basis_blocks() -> impl Strategy<Value = Vec<Vec<(u32, ShellKind)>>> {
    let block = (0u32..6, any::<bool>()).prop_map(|(l, pure)| {
        if pure && l >= 2 {
            (l, ShellKind::Pure)
        } else {
            (l, ShellKind::Cartesian)
        }
    });
    proptest::collection::vec(proptest::collection::vec(block, 1..4), 1..6)
}

proptest! {
    #[test]
    fn test_conversion_shell_roundtrip((a, b) in convention_pair()) {
        let forward = convert_convention_shell(&a, &b, false).unwrap();
        let backward = convert_convention_shell(&a, &b, true).unwrap();
        let v = Array1::from_iter((0..a.len()).map(|i| i as f64 + 1.0));
        let w = forward.apply(&v).unwrap();
        prop_assert_eq!(backward.apply(&w).unwrap(), v);

        // The target-order labels are recovered with the expected signs.
        for (i, (&j, &sign)) in forward.permutation().iter().zip(forward.signs()).enumerate() {
            let source = a.get(j).unwrap();
            let target = b.get(i).unwrap();
            prop_assert_eq!(source.label(), target.label());
            prop_assert_eq!(sign, source.sign() * target.sign());
        }
    }

    #[test]
    fn test_conversion_basis_composition(shell_blocks in basis_blocks()) {
        let shells = shell_blocks
            .iter()
            .enumerate()
            .map(|(center, blocks)| {
                let (angmoms, kinds): (Vec<u32>, Vec<ShellKind>) = blocks.iter().copied().unzip();
                Shell::new(center, &angmoms, &kinds, None, None)
            })
            .collect_vec();
        let basis = MolecularBasis::new(shells, HORTON2_CONVENTIONS.clone(), "L2");
        let nbasis = basis.nbasis().unwrap();
        let sp = convert_conventions(&basis, &GBASIS_CONVENTIONS, false).unwrap();
        prop_assert_eq!(sp.len(), nbasis);

        let mut expected_permutation = Vec::with_capacity(nbasis);
        let mut expected_signs = Vec::with_capacity(nbasis);
        for (l, kind) in shell_blocks.iter().flatten().copied() {
            let local = convert_convention_shell(
                HORTON2_CONVENTIONS.get(l, kind).unwrap(),
                GBASIS_CONVENTIONS.get(l, kind).unwrap(),
                false,
            )
            .unwrap();
            let offset = expected_permutation.len();
            expected_permutation.extend(local.permutation().iter().map(|j| j + offset));
            expected_signs.extend_from_slice(local.signs());
        }
        prop_assert_eq!(sp.permutation(), expected_permutation.as_slice());
        prop_assert_eq!(sp.signs(), expected_signs.as_slice());

        let v = Array1::from_iter((0..nbasis).map(|i| i as f64));
        let w = sp.apply(&v).unwrap();
        let sp_rev = convert_conventions(&basis, &GBASIS_CONVENTIONS, true).unwrap();
        prop_assert_eq!(sp_rev.apply(&w).unwrap(), v);
    }
}
