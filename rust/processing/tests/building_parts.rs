// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Party walls between building parts and their neighbours.

mod common;

use approx::assert_relative_eq;
use citymodel_core::{Building, BuildingLike, WallCounts};
use citymodel_processing::detect_party_walls;
use common::*;

/// Building `b` made of two parts side by side, with `c` next to the
/// second part.
fn terrace() -> Vec<Building> {
    let mut b = Building::new("b");
    b.add_part(cuboid_part("p1", "b", [0.0, 0.0, 0.0], [10.0, 10.0, 5.0]))
        .unwrap();
    b.add_part(cuboid_part("p2", "b", [10.0, 0.0, 0.0], [20.0, 10.0, 7.0]))
        .unwrap();
    let c = cuboid("c", [20.0, 0.0, 0.0], [30.0, 10.0, 5.0]);
    vec![b, c]
}

#[test]
fn test_parts_are_compared_with_each_other() {
    init_tracing();
    let ds = dataset(terrace());
    let report = detect_party_walls(&ds, &serial_config()).unwrap();

    // b, b/p1, b/p2, c; b itself has no geometry.
    assert_eq!(report.stats.entities, 4);
    assert_eq!(report.stats.candidate_pairs, 3);

    let inner: Vec<_> = report.records_between("b/p1", "b/p2").collect();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].building_a, "b/p1");
    assert_relative_eq!(inner[0].area, 50.0, epsilon = 1e-6);

    let outer: Vec<_> = report.records_between("b/p2", "c").collect();
    assert_eq!(outer.len(), 1);
    assert_relative_eq!(outer[0].area, 50.0, epsilon = 1e-6);

    assert_eq!(report.records_between("b/p1", "c").count(), 0);
    assert!(report.records.iter().all(|r| !r.involves("b")));
}

#[test]
fn test_part_wall_counts_are_applied() {
    let mut ds = dataset(terrace());
    let report = detect_party_walls(&ds, &serial_config()).unwrap();

    assert_eq!(report.wall_counts["b"], WallCounts::new(0));
    assert_eq!(report.wall_counts["b/p1"], WallCounts { all_walls: 4, free_walls: 3 });
    assert_eq!(report.wall_counts["b/p2"], WallCounts { all_walls: 4, free_walls: 2 });
    assert_eq!(report.wall_counts["c"], WallCounts { all_walls: 4, free_walls: 3 });

    report.apply(&mut ds).unwrap();
    let p2 = ds.entity("b/p2").unwrap();
    assert!(p2.is_building_part());
    assert_eq!(p2.wall_counts(), Some(WallCounts { all_walls: 4, free_walls: 2 }));
    assert_eq!(ds.building("b").unwrap().wall_counts(), Some(WallCounts::new(0)));
}

#[test]
fn test_building_body_meets_its_parts() {
    // A main body with an annex part attached to its east side.
    let mut b = cuboid("main", [0.0, 0.0, 0.0], [10.0, 10.0, 9.0]);
    b.add_part(cuboid_part("annex", "main", [10.0, 2.0, 0.0], [16.0, 8.0, 3.0]))
        .unwrap();
    let ds = dataset(vec![b]);
    let report = detect_party_walls(&ds, &serial_config()).unwrap();

    assert_eq!(report.stats.candidate_pairs, 1);
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert!(record.connects("main", "main/annex"));
    assert_relative_eq!(record.area, 18.0, epsilon = 1e-6);
}
