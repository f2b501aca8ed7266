use std::env;
use std::fs;

use env_logger;

use ndarray::array;

use crate::basis::ao::ShellKind;
use crate::basis::convention::{ConventionScheme, PSI4_CONVENTIONS};
use crate::basis::conversion::SignedPermutation;
use crate::basis::shell::{MolecularBasis, Shell};
use crate::drivers::convention_conversion::{
    ConventionConversionDriver, ConventionConversionParams,
};
use crate::drivers::AOConvDriver;
use crate::interfaces::input::ao_basis::InputConventions;
use crate::io::{read_aoconv_binary, AOConvFileType};

fn psi4_basis() -> MolecularBasis {
    MolecularBasis::new(
        vec![
            Shell::new(0, &[1], &[ShellKind::Cartesian], None, None),
            Shell::new(0, &[2, 3], &[ShellKind::Pure, ShellKind::Pure], None, None),
        ],
        PSI4_CONVENTIONS.clone(),
        "L2",
    )
}

#[test]
fn test_drivers_convention_conversion_params() {
    let params = ConventionConversionParams::default();
    assert_eq!(
        params.target_conventions,
        InputConventions::Standard(ConventionScheme::Psi4)
    );
    assert!(!params.reverse);
    assert!(!params.segment_basis);
    assert!(params.write_permutation_table);
    assert!(params.result_save_name.is_none());

    let params = ConventionConversionParams::builder()
        .target_conventions(InputConventions::Standard(ConventionScheme::Horton2))
        .reverse(true)
        .build()
        .unwrap();
    let display = params.to_string();
    assert!(display.contains("Target conventions: HORTON2"));
    assert!(display.contains("target -> basis"));
    assert!(display.contains("Save results to files: no"));

    let params = serde_yaml::from_str::<ConventionConversionParams>("reverse: true\n").unwrap();
    assert!(params.reverse);
    assert!(params.write_permutation_table);
}

#[test]
fn test_drivers_convention_conversion_validation() {
    let params = ConventionConversionParams::default();
    let basis = psi4_basis();
    assert!(ConventionConversionDriver::builder()
        .parameters(&params)
        .build()
        .is_err());

    let short = array![1.0, 2.0];
    assert!(ConventionConversionDriver::builder()
        .parameters(&params)
        .basis(&basis)
        .coefficients(Some(&short))
        .build()
        .is_err());

    let invalid = MolecularBasis::new(
        vec![Shell::new(0, &[0], &[ShellKind::Pure], None, None)],
        PSI4_CONVENTIONS.clone(),
        "L2",
    );
    assert!(ConventionConversionDriver::builder()
        .parameters(&params)
        .basis(&invalid)
        .build()
        .is_err());
}

#[test]
fn test_drivers_convention_conversion_roundtrip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let basis = psi4_basis();
    let nbasis = basis.nbasis().unwrap();
    assert_eq!(nbasis, 3 + 5 + 7);
    let coefficients = ndarray::Array1::from_iter((0..nbasis).map(|i| i as f64 - 4.5));

    let forward_params = ConventionConversionParams::builder()
        .target_conventions(InputConventions::Standard(ConventionScheme::Gbasis))
        .segment_basis(true)
        .build()
        .unwrap();
    let mut forward_driver = ConventionConversionDriver::builder()
        .parameters(&forward_params)
        .basis(&basis)
        .coefficients(Some(&coefficients))
        .build()
        .unwrap();
    forward_driver.run().unwrap();
    let forward = forward_driver.result().unwrap();
    assert_eq!(forward.basis.nshells(), 3);
    assert_eq!(
        forward.signed_permutation.permutation()[..3],
        [2, 1, 0]
    );
    assert_eq!(
        forward.signed_permutation.permutation()[3..],
        (3..nbasis).collect::<Vec<_>>()[..]
    );
    let converted = forward.converted_coefficients.clone().unwrap();

    let reverse_params = ConventionConversionParams::builder()
        .target_conventions(InputConventions::Standard(ConventionScheme::Gbasis))
        .reverse(true)
        .build()
        .unwrap();
    let mut reverse_driver = ConventionConversionDriver::builder()
        .parameters(&reverse_params)
        .basis(&basis)
        .coefficients(Some(&converted))
        .build()
        .unwrap();
    reverse_driver.run().unwrap();
    let reverse = reverse_driver.result().unwrap();
    assert_eq!(reverse.basis, basis);
    assert_eq!(reverse.converted_coefficients.as_ref(), Some(&coefficients));
}

#[test]
fn test_drivers_convention_conversion_save() {
    let name = env::temp_dir().join(format!("aoconv_driver_test_{}", std::process::id()));
    let params = ConventionConversionParams::builder()
        .target_conventions(InputConventions::Standard(ConventionScheme::Horton2))
        .write_permutation_table(false)
        .result_save_name(Some(name.clone()))
        .build()
        .unwrap();
    let basis = psi4_basis();
    let mut driver = ConventionConversionDriver::builder()
        .parameters(&params)
        .basis(&basis)
        .build()
        .unwrap();
    driver.run().unwrap();

    let saved: SignedPermutation = read_aoconv_binary(&name, AOConvFileType::Cnv).unwrap();
    assert_eq!(&saved, &driver.result().unwrap().signed_permutation);
    // PSI4 ds2, ds1, dc0, dc1, dc2 -> HORTON2 dc0, dc1, ds1, dc2, ds2
    assert_eq!(saved.permutation()[3..8], [5, 6, 4, 7, 3]);

    let saved_basis: MolecularBasis = read_aoconv_binary(&name, AOConvFileType::Bas).unwrap();
    assert_eq!(saved_basis, basis);

    for file_type in [AOConvFileType::Cnv, AOConvFileType::Bas] {
        let mut path = name.clone();
        path.set_extension(file_type.ext());
        fs::remove_file(path).unwrap();
    }
}
