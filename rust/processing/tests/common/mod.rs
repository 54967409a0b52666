// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures for the party wall integration tests.

#![allow(dead_code)]

use citymodel_core::{Building, BuildingPart, Dataset, Point3, Surface, SurfaceConfig};
use citymodel_processing::PartyWallConfig;

/// Log to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default tolerances, evaluated on the calling thread.
pub fn serial_config() -> PartyWallConfig {
    PartyWallConfig {
        parallel: false,
        ..Default::default()
    }
}

pub fn surface(id: &str, corners: &[[f64; 3]]) -> Surface {
    let points = corners
        .iter()
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();
    Surface::new(id, points, None, &SurfaceConfig::default())
}

/// Boundary of an axis-aligned box with outward normals.
///
/// Ids: `ground`, `roof`, `south` (min y), `east` (max x), `north` (max y),
/// `west` (min x).
pub fn cuboid_surfaces(min: [f64; 3], max: [f64; 3]) -> Vec<Surface> {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    vec![
        surface("ground", &[[x0, y0, z0], [x0, y1, z0], [x1, y1, z0], [x1, y0, z0]]),
        surface("roof", &[[x0, y0, z1], [x1, y0, z1], [x1, y1, z1], [x0, y1, z1]]),
        surface("south", &[[x0, y0, z0], [x1, y0, z0], [x1, y0, z1], [x0, y0, z1]]),
        surface("east", &[[x1, y0, z0], [x1, y1, z0], [x1, y1, z1], [x1, y0, z1]]),
        surface("north", &[[x1, y1, z0], [x0, y1, z0], [x0, y1, z1], [x1, y1, z1]]),
        surface("west", &[[x0, y1, z0], [x0, y0, z0], [x0, y0, z1], [x0, y1, z1]]),
    ]
}

pub fn building(id: &str, surfaces: Vec<Surface>) -> Building {
    let mut b = Building::new(id);
    for s in surfaces {
        b.add_surface(s).unwrap();
    }
    b
}

pub fn cuboid(id: &str, min: [f64; 3], max: [f64; 3]) -> Building {
    building(id, cuboid_surfaces(min, max))
}

pub fn cuboid_part(id: &str, parent: &str, min: [f64; 3], max: [f64; 3]) -> BuildingPart {
    let mut part = BuildingPart::new(id, parent);
    for s in cuboid_surfaces(min, max) {
        part.add_surface(s).unwrap();
    }
    part
}

pub fn dataset(buildings: Vec<Building>) -> Dataset {
    let mut ds = Dataset::new(Some("test".to_string()));
    for b in buildings {
        ds.add_building(b, false).unwrap();
    }
    ds
}
