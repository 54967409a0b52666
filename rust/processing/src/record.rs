// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detected party walls.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// One shared wall piece between two buildings or building parts.
///
/// Building ids are qualified: parts appear as `building/part`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyWallRecord {
    pub building_a: String,
    pub surface_a: String,
    pub building_b: String,
    pub surface_b: String,
    /// Contact area in square units.
    pub area: f64,
    /// Closed contact ring in the original coordinate frame.
    pub contact: Vec<[f64; 3]>,
}

impl PartyWallRecord {
    pub fn contact_points(&self) -> Vec<Point3<f64>> {
        self.contact
            .iter()
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect()
    }

    /// The same contact seen from the other side.
    pub fn reversed(&self) -> Self {
        Self {
            building_a: self.building_b.clone(),
            surface_a: self.surface_b.clone(),
            building_b: self.building_a.clone(),
            surface_b: self.surface_a.clone(),
            area: self.area,
            contact: self.contact.iter().rev().copied().collect(),
        }
    }

    /// Whether the record links the two entities, in either order.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.building_a == a && self.building_b == b) || (self.building_a == b && self.building_b == a)
    }

    pub fn involves(&self, building: &str) -> bool {
        self.building_a == building || self.building_b == building
    }
}
