// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ground footprints in plan view.
//!
//! A footprint is the (x, y) projection of a ground surface ring. Buffering
//! a footprint grows it outward by a fixed distance so that buildings whose
//! footprints almost touch are still recognised as neighbours.

use citymodel_core::Surface;
use geo::{Area, Buffer, Intersects, LineString, MultiPolygon, Polygon};
use nalgebra::Point3;

use crate::error::{Error, Result};

/// Plan-view polygon of a ground surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    polygon: Polygon<f64>,
}

impl Footprint {
    /// Projects a ring onto the x/y plane, dropping z.
    pub fn from_points(points: &[Point3<f64>]) -> Result<Self> {
        Self::from_xy(points.iter().map(|p| (p.x, p.y)).collect())
    }

    /// Footprint of a valid surface, `None` for invalid or degenerate rings.
    pub fn from_surface(surface: &Surface) -> Option<Self> {
        if !surface.is_valid() {
            return None;
        }
        Self::from_xy(surface.footprint().iter().map(|c| (c[0], c[1])).collect()).ok()
    }

    fn from_xy(mut coords: Vec<(f64, f64)>) -> Result<Self> {
        coords.dedup();
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        if coords.len() < 3 {
            return Err(Error::DegenerateRing(coords.len()));
        }
        Ok(Self {
            polygon: Polygon::new(LineString::from(coords), vec![]),
        })
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// Grows the footprint outward by `distance`.
    pub fn buffered(&self, distance: f64) -> BufferedFootprint {
        BufferedFootprint {
            shape: self.polygon.buffer(distance),
        }
    }

    /// Whether the two footprints share any point, edges included.
    pub fn intersects(&self, other: &Footprint) -> bool {
        self.polygon.intersects(&other.polygon)
    }
}

/// A footprint grown by a buffer distance.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedFootprint {
    shape: MultiPolygon<f64>,
}

impl BufferedFootprint {
    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    /// Whether the buffered shape reaches the (unbuffered) `other` footprint.
    pub fn intersects(&self, other: &Footprint) -> bool {
        self.shape.intersects(other.polygon())
    }
}
