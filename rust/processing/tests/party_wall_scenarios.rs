// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end party wall detection on small synthetic districts.

mod common;

use approx::assert_relative_eq;
use citymodel_core::{BuildingLike, Point3, Surface, SurfaceConfig, SurfaceKind, WallCounts};
use citymodel_processing::{
    detect_party_walls, Error, PartyWallConfig, PartyWallDetector, PartyWallRecord, PartyWallReport,
};
use common::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn run(buildings: Vec<citymodel_core::Building>) -> PartyWallReport {
    init_tracing();
    detect_party_walls(&dataset(buildings), &serial_config()).unwrap()
}

fn contact_matches(a: &PartyWallRecord, b: &PartyWallRecord) -> bool {
    let open = |r: &PartyWallRecord| r.contact[..r.contact.len() - 1].to_vec();
    let (pa, pb) = (open(a), open(b));
    let near = |p: &[f64; 3], q: &[f64; 3]| (0..3).all(|k| (p[k] - q[k]).abs() < 1e-6);
    pa.len() == pb.len()
        && pa.iter().all(|p| pb.iter().any(|q| near(p, q)))
        && pb.iter().all(|q| pa.iter().any(|p| near(p, q)))
}

#[test]
fn test_shared_face_gives_one_record() {
    let report = run(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0]),
    ]);

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.building_a, "A");
    assert_eq!(record.surface_a, "east");
    assert_eq!(record.building_b, "B");
    assert_eq!(record.surface_b, "west");
    assert_relative_eq!(record.area, 50.0, epsilon = 1e-6);

    // The contact lies in the x = 10 plane and spans the full face.
    assert_eq!(record.contact.first(), record.contact.last());
    for p in &record.contact {
        assert_relative_eq!(p[0], 10.0, epsilon = 1e-6);
    }
    let (ys, zs): (Vec<f64>, Vec<f64>) = record.contact.iter().map(|p| (p[1], p[2])).unzip();
    assert_relative_eq!(ys.iter().cloned().fold(f64::MAX, f64::min), 0.0, epsilon = 1e-6);
    assert_relative_eq!(ys.iter().cloned().fold(f64::MIN, f64::max), 10.0, epsilon = 1e-6);
    assert_relative_eq!(zs.iter().cloned().fold(f64::MAX, f64::min), 0.0, epsilon = 1e-6);
    assert_relative_eq!(zs.iter().cloned().fold(f64::MIN, f64::max), 5.0, epsilon = 1e-6);

    assert_eq!(report.wall_counts["A"], WallCounts { all_walls: 4, free_walls: 3 });
    assert_eq!(report.wall_counts["B"], WallCounts { all_walls: 4, free_walls: 3 });
}

#[test]
fn test_gap_beyond_tolerance_gives_no_records() {
    let report = run(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.3, 0.0, 0.0], [20.3, 10.0, 5.0]),
    ]);
    assert!(report.records.is_empty());
    assert_eq!(report.wall_counts["A"], WallCounts::new(4));
}

#[test]
fn test_distant_building_never_reaches_resolver() {
    let report = run(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("far", [500.0, 500.0, 0.0], [510.0, 510.0, 5.0]),
    ]);
    assert_eq!(report.stats.candidate_pairs, 1);
    assert_eq!(report.stats.prefilter_rejections, 1);
    assert_eq!(report.stats.resolver_invocations, 0);
    assert_eq!(report.stats.wall_pairs_compared, 0);
    assert!(report.records.is_empty());
}

#[test]
fn test_degenerate_wall_is_ignored() {
    let mut surfaces = cuboid_surfaces([0.0, 0.0, 0.0], [10.0, 10.0, 5.0]);
    surfaces.push(Surface::new(
        "degenerate",
        vec![
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ],
        Some(SurfaceKind::Wall),
        &SurfaceConfig::default(),
    ));
    let report = run(vec![
        building("A", surfaces),
        cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0]),
    ]);

    assert_eq!(report.records.len(), 1);
    assert!(report
        .records
        .iter()
        .all(|r| r.surface_a != "degenerate" && r.surface_b != "degenerate"));
    // Four valid walls of A against four of B.
    assert_eq!(report.stats.wall_pairs_compared, 16);
    assert_eq!(report.wall_counts["A"], WallCounts { all_walls: 5, free_walls: 4 });
}

#[test]
fn test_closure_surface_shares_a_wall() {
    // A's x = 10 face is a closure towards a planned neighbour.
    let mut surfaces: Vec<Surface> = cuboid_surfaces([0.0, 0.0, 0.0], [10.0, 10.0, 5.0])
        .into_iter()
        .filter(|s| s.id() != "east")
        .collect();
    surfaces.push(Surface::new(
        "cl",
        vec![
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(10.0, 10.0, 5.0),
            Point3::new(10.0, 0.0, 5.0),
        ],
        Some(SurfaceKind::Closure),
        &SurfaceConfig::default(),
    ));
    let report = run(vec![
        building("A", surfaces),
        cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0]),
    ]);

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.surface_a, "cl");
    assert_eq!(record.surface_b, "west");
    assert_relative_eq!(record.area, 50.0, epsilon = 1e-6);

    // Closures are not walls, so A keeps all its walls free.
    assert_eq!(report.wall_counts["A"], WallCounts { all_walls: 3, free_walls: 3 });
    assert_eq!(report.wall_counts["B"], WallCounts { all_walls: 4, free_walls: 3 });
}

#[test]
fn test_split_ground_resolves_pair_once() {
    let mut surfaces = vec![surface(
        "ground_far",
        &[[-100.0, 0.0, 0.0], [-100.0, 10.0, 0.0], [-90.0, 10.0, 0.0], [-90.0, 0.0, 0.0]],
    )];
    surfaces.extend(
        cuboid_surfaces([0.0, 0.0, 0.0], [10.0, 10.0, 5.0])
            .into_iter()
            .filter(|s| s.id() != "ground"),
    );
    surfaces.push(surface(
        "ground_south",
        &[[0.0, 0.0, 0.0], [0.0, 5.0, 0.0], [10.0, 5.0, 0.0], [10.0, 0.0, 0.0]],
    ));
    surfaces.push(surface(
        "ground_north",
        &[[0.0, 5.0, 0.0], [0.0, 10.0, 0.0], [10.0, 10.0, 0.0], [10.0, 5.0, 0.0]],
    ));
    let a = building("A", surfaces);
    assert_eq!(a.surfaces().grounds().len(), 3);

    let report = run(vec![a, cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0])]);

    assert_eq!(report.stats.candidate_pairs, 1);
    assert_eq!(report.stats.resolver_invocations, 1);
    assert_eq!(report.records.len(), 1);
    assert_relative_eq!(report.records[0].area, 50.0, epsilon = 1e-6);
}

#[test]
fn test_swapping_buildings_reverses_records() {
    let a = cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]);
    let b = cuboid("B", [10.0, 2.0, 0.0], [20.0, 12.0, 6.0]);
    let forward = run(vec![a.clone(), b.clone()]);
    let backward = run(vec![b, a]);

    assert_eq!(forward.records.len(), 1);
    assert_eq!(backward.records.len(), 1);
    let (f, r) = (&forward.records[0], &backward.records[0]);
    let expected = f.reversed();
    assert_eq!(r.building_a, expected.building_a);
    assert_eq!(r.surface_a, expected.surface_a);
    assert_eq!(r.building_b, expected.building_b);
    assert_eq!(r.surface_b, expected.surface_b);
    assert_relative_eq!(r.area, f.area, epsilon = 1e-6);
    assert_relative_eq!(f.area, 40.0, epsilon = 1e-6);
    assert!(contact_matches(f, r));
}

#[test]
fn test_repeated_runs_are_identical() {
    let ds = dataset(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0]),
        cuboid("C", [20.0, 0.0, 0.0], [30.0, 10.0, 8.0]),
    ]);
    let first = detect_party_walls(&ds, &serial_config()).unwrap();
    let second = detect_party_walls(&ds, &serial_config()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.records.len(), 2);
}

#[test]
fn test_parallel_matches_serial() {
    let buildings: Vec<_> = (0..6)
        .map(|i| {
            let x = i as f64 * 10.0;
            cuboid(&format!("row_{i}"), [x, 0.0, 0.0], [x + 10.0, 10.0, 4.0 + i as f64])
        })
        .collect();
    let ds = dataset(buildings);
    let serial = detect_party_walls(&ds, &serial_config()).unwrap();
    let parallel = detect_party_walls(&ds, &PartyWallConfig::default()).unwrap();
    assert_eq!(serial, parallel);
    assert_eq!(serial.records.len(), 5);
}

#[test]
fn test_wall_offset_threshold() {
    let near = run(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.1, 0.0, 0.0], [20.1, 10.0, 5.0]),
    ]);
    assert_eq!(near.records.len(), 1);

    // Widen the ground buffer so only the wall offset decides.
    let config = PartyWallConfig {
        ground_buffer: 0.5,
        ..serial_config()
    };
    let ds = dataset(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.2, 0.0, 0.0], [20.2, 10.0, 5.0]),
    ]);
    let far = detect_party_walls(&ds, &config).unwrap();
    assert_eq!(far.stats.resolver_invocations, 1);
    assert!(far.records.is_empty());
}

#[test]
fn test_contact_area_threshold() {
    // Overlap of 2 x 2 along the shared face.
    let small = run(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 2.0]),
        cuboid("B", [10.0, 8.0, 0.0], [20.0, 18.0, 2.0]),
    ]);
    assert!(small.records.is_empty());

    // Overlap of 3 x 2.
    let large = run(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 2.0]),
        cuboid("B", [10.0, 7.0, 0.0], [20.0, 17.0, 2.0]),
    ]);
    assert_eq!(large.records.len(), 1);
    assert_relative_eq!(large.records[0].area, 6.0, epsilon = 1e-6);
}

#[test]
fn test_skewed_wall_is_not_matched() {
    let s = 30f64.to_radians();
    let (dx, dy) = (10.0 * s.sin(), 10.0 * s.cos());
    let skewed = building(
        "skewed",
        vec![
            surface(
                "ground",
                &[[10.0, 0.0, 0.0], [10.0 + dx, dy, 0.0], [20.0 + dx, dy, 0.0], [20.0, 0.0, 0.0]],
            ),
            surface(
                "roof",
                &[[10.0, 0.0, 5.0], [20.0, 0.0, 5.0], [20.0 + dx, dy, 5.0], [10.0 + dx, dy, 5.0]],
            ),
            surface(
                "slanted",
                &[[10.0 + dx, dy, 0.0], [10.0, 0.0, 0.0], [10.0, 0.0, 5.0], [10.0 + dx, dy, 5.0]],
            ),
        ],
    );
    let report = run(vec![cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]), skewed]);

    assert_eq!(report.stats.resolver_invocations, 1);
    assert!(report.stats.wall_pairs_compared > 0);
    assert!(report.records.iter().all(|r| r.surface_b != "slanted"));
}

#[test]
fn test_split_contact_gives_one_record_per_piece() {
    // East wall of A with a notch cut from the top: a U in the y/z plane.
    let mut surfaces: Vec<Surface> = cuboid_surfaces([0.0, 0.0, 0.0], [10.0, 10.0, 6.0])
        .into_iter()
        .filter(|s| s.id() != "east")
        .collect();
    surfaces.push(surface(
        "east",
        &[
            [10.0, 0.0, 0.0],
            [10.0, 10.0, 0.0],
            [10.0, 10.0, 6.0],
            [10.0, 7.0, 6.0],
            [10.0, 7.0, 2.0],
            [10.0, 3.0, 2.0],
            [10.0, 3.0, 6.0],
            [10.0, 0.0, 6.0],
        ],
    ));

    // West wall of B only covers heights 3 to 6.
    let mut neighbour: Vec<Surface> = cuboid_surfaces([10.0, 0.0, 0.0], [20.0, 10.0, 6.0])
        .into_iter()
        .filter(|s| s.id() != "west")
        .collect();
    neighbour.push(surface(
        "west",
        &[[10.0, 10.0, 3.0], [10.0, 0.0, 3.0], [10.0, 0.0, 6.0], [10.0, 10.0, 6.0]],
    ));

    let report = run(vec![building("A", surfaces), building("B", neighbour)]);

    assert_eq!(report.records.len(), 2);
    for record in &report.records {
        assert_eq!(record.surface_a, "east");
        assert_eq!(record.surface_b, "west");
        assert_relative_eq!(record.area, 9.0, epsilon = 1e-6);
    }
    assert_relative_eq!(report.total_contact_area("A"), 18.0, epsilon = 1e-6);
    // Two pieces on the same wall still count it once.
    assert_eq!(report.wall_counts["A"], WallCounts { all_walls: 4, free_walls: 3 });
}

#[test]
fn test_cancelled_run() {
    let ds = dataset(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0]),
    ]);
    let flag = Arc::new(AtomicBool::new(true));
    let result = PartyWallDetector::new(serial_config())
        .with_cancel_flag(flag)
        .run(&ds);
    assert_eq!(result, Err(Error::Cancelled));

    let idle = Arc::new(AtomicBool::new(false));
    let report = PartyWallDetector::new(PartyWallConfig::default())
        .with_cancel_flag(idle)
        .run(&ds)
        .unwrap();
    assert_eq!(report.records.len(), 1);
}

#[test]
fn test_apply_writes_wall_counts() {
    let mut ds = dataset(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0]),
        cuboid("C", [20.0, 0.0, 0.0], [30.0, 10.0, 5.0]),
    ]);
    assert_eq!(ds.building("B").unwrap().wall_counts(), None);

    let report = detect_party_walls(&ds, &serial_config()).unwrap();
    report.apply(&mut ds).unwrap();

    assert_eq!(
        ds.building("A").unwrap().wall_counts(),
        Some(WallCounts { all_walls: 4, free_walls: 3 })
    );
    assert_eq!(
        ds.building("B").unwrap().wall_counts(),
        Some(WallCounts { all_walls: 4, free_walls: 2 })
    );
}

#[test]
fn test_report_serializes() {
    let report = run(vec![
        cuboid("A", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]),
        cuboid("B", [10.0, 0.0, 0.0], [20.0, 10.0, 5.0]),
    ]);
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"surface_a\":\"east\""));
    let back: PartyWallReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
