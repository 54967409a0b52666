// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground-proximity prefilter.
//!
//! Two buildings can only share a wall if their ground footprints touch.
//! Checking buffered footprints in plan view is cheap compared with the
//! wall-by-wall comparison, so it gates every call into the resolver.

use citymodel_core::BuildingLike;
use citymodel_geometry::{BufferedFootprint, Footprint};

/// Ground footprints of one building or building part.
#[derive(Debug, Clone, Default)]
pub struct GroundFootprints {
    footprints: Vec<Footprint>,
    buffered: Vec<BufferedFootprint>,
}

impl GroundFootprints {
    /// Collects the valid ground surfaces of `entity`, buffered by `buffer`.
    ///
    /// Entities without 3D geometry get no footprints and therefore never
    /// pass the prefilter.
    pub fn of(entity: &dyn BuildingLike, buffer: f64) -> Self {
        if !entity.has_3d_geometry() {
            return Self::default();
        }
        let footprints: Vec<Footprint> = entity
            .surfaces()
            .grounds()
            .iter()
            .filter_map(Footprint::from_surface)
            .collect();
        let buffered = footprints.iter().map(|f| f.buffered(buffer)).collect();
        Self {
            footprints,
            buffered,
        }
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// Whether any buffered ground of `self` reaches any ground of `other`.
    ///
    /// Buildings split over several disjoint grounds are near as soon as
    /// one pair of grounds is.
    pub fn near(&self, other: &GroundFootprints) -> bool {
        self.buffered
            .iter()
            .any(|mine| other.footprints.iter().any(|theirs| mine.intersects(theirs)))
    }
}
