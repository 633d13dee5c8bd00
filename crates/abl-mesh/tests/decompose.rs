//! Integration test: slab decomposition covers the box exactly once.

use abl_core::Vec3;
use abl_mesh::{BoxMeshBuilder, PatchKind};
use std::collections::HashSet;

#[test]
fn partitions_cover_every_global_cell_once() {
    let builder = BoxMeshBuilder::new([6, 2, 3], [600.0, 200.0, 300.0]);
    let serial = builder.build().unwrap();
    let parts = builder.decompose(3).unwrap();

    let mut seen = HashSet::new();
    let mut n_cells = 0;
    for mesh in &parts {
        for c in 0..mesh.n_cells() {
            let id = abl_core::CellId::from_index(c as u32);
            assert!(seen.insert(mesh.global_cell(id).unwrap()));
        }
        n_cells += mesh.n_cells();
        assert_eq!(mesh.n_global_cells(), serial.n_cells());
    }
    assert_eq!(n_cells, serial.n_cells());
}

#[test]
fn cell_centres_agree_with_serial_mesh() {
    let builder = BoxMeshBuilder::new([4, 2, 2], [4.0, 2.0, 2.0]).origin(Vec3::new(10.0, 0.0, 0.0));
    let serial = builder.build().unwrap();
    for mesh in builder.decompose(2).unwrap() {
        for (c, centre) in mesh.cell_centres().iter().enumerate() {
            let global = mesh.global_cell(abl_core::CellId::from_index(c as u32)).unwrap();
            let serial_id = serial.local_cell(global).unwrap();
            assert_eq!(serial.cell_centre(serial_id).unwrap(), *centre);
        }
    }
}

#[test]
fn cut_planes_become_processor_patches() {
    let parts = BoxMeshBuilder::new([4, 1, 1], [4.0, 1.0, 1.0])
        .decompose(2)
        .unwrap();

    let left = &parts[0];
    assert_eq!(left.patch_by_name("east").unwrap().size, 0);
    let proc = left.patch_by_name("procBoundary0to1").unwrap();
    assert_eq!(proc.kind, PatchKind::Processor { neighbour_rank: 1 });
    assert_eq!(proc.size, 1);

    let right = &parts[1];
    assert_eq!(right.patch_by_name("west").unwrap().size, 0);
    assert!(right.patch_by_name("procBoundary1to0").is_some());
}

#[test]
fn too_many_partitions_is_rejected() {
    assert!(BoxMeshBuilder::new([2, 1, 1], [1.0, 1.0, 1.0])
        .decompose(3)
        .is_err());
}
