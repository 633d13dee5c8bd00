mod common;

use abl_core::Vec3;
use abl_fields::store::P_RGH;
use abl_solver::{
    SerialComm, SolverError, build_partition, run_partitioned, setup_with_fields,
};
use common::{Pressure, case, store};
use proptest::prelude::*;

const NO_GRAVITY: &str = "abl:\n  gravity: [0.0, 0.0, 0.0]";

#[test]
fn uniform_pressure_is_shifted_to_reference_value() {
    let def = case(NO_GRAVITY);
    let mesh = build_partition(&def, &SerialComm).unwrap();
    let fields = store(&mesh, Pressure::Floating, 5.0);
    let s = setup_with_fields(&def, mesh, fields, &SerialComm).unwrap();

    assert!(s.reference.needed);
    assert_eq!(s.reference.cell.map(|c| c.as_usize()), Some(0));
    assert_eq!(s.pressure_shift, -5.0);
    assert_eq!(s.fields.p.internal()[0], 0.0);
    assert!(s.fields.p.internal().iter().all(|&v| v == 0.0));
    assert!(s.fields.p_rgh.internal().iter().all(|&v| v == 0.0));
}

#[test]
fn fixed_boundary_leaves_pressure_level_alone() {
    let def = case("");
    let mesh = build_partition(&def, &SerialComm).unwrap();
    let fields = store(&mesh, Pressure::FixedTop, 5.0);
    let s = setup_with_fields(&def, mesh, fields, &SerialComm).unwrap();

    assert!(!s.reference.needed);
    assert_eq!(s.reference.cell, None);
    assert_eq!(s.pressure_shift, 0.0);
    assert_eq!(s.buoyancy.h_ref(), Vec3::zeros());
    assert!(s.fields.p_rgh.internal().iter().all(|&v| v == 5.0));
}

#[test]
fn p_includes_hydrostatic_part() {
    let def = case("");
    let mesh = build_partition(&def, &SerialComm).unwrap();
    let fields = store(&mesh, Pressure::FixedTop, 0.0);
    let s = setup_with_fields(&def, mesh, fields, &SerialComm).unwrap();

    let gh = s.buoyancy.gh(&s.mesh);
    for (i, &p) in s.fields.p.internal().iter().enumerate() {
        let rhok = s.buoyancy.rhok_value(s.fields.t.internal()[i]);
        assert!((p - rhok * gh[i]).abs() < 1e-12);
    }
}

#[test]
fn p_rgh_is_flux_required() {
    let def = case("");
    let mesh = build_partition(&def, &SerialComm).unwrap();
    let fields = store(&mesh, Pressure::Floating, 0.0);
    let s = setup_with_fields(&def, mesh, fields, &SerialComm).unwrap();
    assert_eq!(s.fields.flux_required().collect::<Vec<_>>(), vec![P_RGH]);
}

#[test]
fn out_of_range_reference_cell_is_a_configuration_error() {
    let def = case("pimple:\n  pRefCell: 48");
    let mesh = build_partition(&def, &SerialComm).unwrap();
    let fields = store(&mesh, Pressure::Floating, 0.0);
    let err = setup_with_fields(&def, mesh, fields, &SerialComm).unwrap_err();
    assert!(matches!(
        err,
        SolverError::ReferenceCellOutOfRange { cell: 48, n_cells: 48 }
    ));
    assert!(err.is_configuration());
}

#[test]
fn out_of_range_reference_cell_is_ignored_when_level_is_fixed() {
    let def = case("pimple:\n  pRefCell: 48");
    let mesh = build_partition(&def, &SerialComm).unwrap();
    let fields = store(&mesh, Pressure::FixedTop, 0.0);
    assert!(setup_with_fields(&def, mesh, fields, &SerialComm).is_ok());
}

#[test]
fn reference_height_is_identical_for_any_decomposition() {
    let def = case("pimple:\n  pRefCell: 17\n  pRefValue: 2.5");
    let serial = {
        let mesh = build_partition(&def, &SerialComm).unwrap();
        let fields = store(&mesh, Pressure::Floating, 1.0);
        setup_with_fields(&def, mesh, fields, &SerialComm).unwrap()
    };
    let expected_centre = serial.mesh.cell_centres()[17];
    assert_eq!(serial.buoyancy.h_ref(), expected_centre);

    for n in [2, 3, 6] {
        let results = run_partitioned(n, |comm| {
            let mesh = build_partition(&def, comm).unwrap();
            let fields = store(&mesh, Pressure::Floating, 1.0);
            let s = setup_with_fields(&def, mesh, fields, comm).unwrap();
            (s.buoyancy.h_ref(), s.reference.cell.is_some(), s.pressure_shift)
        });
        assert_eq!(results.iter().filter(|(_, owner, _)| *owner).count(), 1);
        for (h_ref, _, shift) in results {
            assert_eq!(h_ref, serial.buoyancy.h_ref());
            assert_eq!(shift.to_bits(), serial.pressure_shift.to_bits());
        }
    }
}

#[test]
fn reference_cell_lives_on_its_owner_only() {
    let def = case("pimple:\n  pRefCell: 17");
    let owners = run_partitioned(3, |comm| {
        let mesh = build_partition(&def, comm).unwrap();
        let fields = store(&mesh, Pressure::Floating, 0.0);
        let s = setup_with_fields(&def, mesh, fields, comm).unwrap();
        s.reference
            .cell
            .and_then(|c| s.mesh.global_cell(c))
    });
    // Global cell 17 has x index 5, which belongs to the last slab.
    assert_eq!(owners, vec![None, None, Some(17)]);
}

#[test]
fn inlet_outlet_fixes_level_only_when_enabled_and_inflowing() {
    let disabled = case("");
    let enabled = case("abl:\n  updateFixesValue: true");

    let needed = |def: &abl_case::CaseDef| {
        run_partitioned(3, |comm| {
            let mesh = build_partition(def, comm).unwrap();
            let fields = store(&mesh, Pressure::InletOutlet, 0.0);
            setup_with_fields(def, mesh, fields, comm)
                .unwrap()
                .reference
                .needed
        })
    };

    // Inflow is only seen by the partition holding the west side.
    assert_eq!(needed(&disabled), vec![true, true, true]);
    assert_eq!(needed(&enabled), vec![false, false, false]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn reference_cell_takes_reference_value(cell in 0usize..48, value in -1.0e3..1.0e3_f64, p0 in -1.0e3..1.0e3_f64) {
        let def = case(&format!("pimple:\n  pRefCell: {cell}\n  pRefValue: {value}"));
        let mesh = build_partition(&def, &SerialComm).unwrap();
        let fields = store(&mesh, Pressure::Floating, p0);
        let s = setup_with_fields(&def, mesh, fields, &SerialComm).unwrap();
        let p_ref = s.fields.p.internal()[cell];
        prop_assert!((p_ref - value).abs() <= 1e-9 * (1.0 + value.abs() + p0.abs()));
        // p and p_rgh move together.
        prop_assert_eq!(s.fields.p_rgh.internal()[cell], p0 + s.pressure_shift);
    }

    #[test]
    fn fixed_level_never_picks_a_cell(cell in 0usize..200, p0 in -1.0e3..1.0e3_f64) {
        let def = case(&format!("pimple:\n  pRefCell: {cell}"));
        let mesh = build_partition(&def, &SerialComm).unwrap();
        let fields = store(&mesh, Pressure::FixedTop, p0);
        let s = setup_with_fields(&def, mesh, fields, &SerialComm).unwrap();
        prop_assert!(!s.reference.needed);
        prop_assert!(s.reference.cell.is_none());
        prop_assert_eq!(s.pressure_shift, 0.0);
    }
}
