// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rotation of wall rings into a common working plane.
//!
//! A vertical wall is turned about the z axis until its horizontal direction
//! runs along x. Afterwards every point of the wall shares (approximately) the
//! same y value, and the wall can be handled as a 2D polygon in the x/z plane.
//! Heights are never touched.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Point3, Rotation2, Vector2, Vector3};

/// Rotates `points` about the vertical axis through `pivot` by `angle`
/// radians (counter-clockwise seen from above).
pub fn rotate_about_z(points: &[Point3<f64>], pivot: &Point3<f64>, angle: f64) -> Vec<Point3<f64>> {
    let rotation = Rotation2::new(angle);
    points
        .iter()
        .map(|p| {
            let v = rotation * Vector2::new(p.x - pivot.x, p.y - pivot.y);
            Point3::new(pivot.x + v.x, pivot.y + v.y, p.z)
        })
        .collect()
}

/// Angle that turns the horizontal direction of `ring` onto the x axis.
///
/// The direction is taken from the first towards the second point, or the
/// third point when the first two share x and y (a vertical edge). A zero
/// x delta maps to a quarter turn.
pub fn working_plane_angle(ring: &[Point3<f64>]) -> Option<f64> {
    if ring.len() < 3 {
        return None;
    }
    let (p0, p1, p2) = (&ring[0], &ring[1], &ring[2]);

    let (dx, dy) = if p0.x == p1.x && p0.y == p1.y {
        (p0.x - p2.x, p0.y - p2.y)
    } else {
        (p0.x - p1.x, p0.y - p1.y)
    };

    if dx != 0.0 {
        Some(-dy.atan2(dx))
    } else {
        Some(FRAC_PI_2)
    }
}

/// Pivot and angle of the rotation into the working plane of a surface.
///
/// Surfaces facing exactly along ±y already have a constant y and are used
/// without rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingPlane {
    pivot: Point3<f64>,
    angle: Option<f64>,
}

impl WorkingPlane {
    /// Working plane of a ring with the given unit normal.
    pub fn for_ring(ring: &[Point3<f64>], normal: &Vector3<f64>) -> Option<Self> {
        let pivot = *ring.first()?;
        let y = Vector3::y();
        if *normal == y || *normal == -y {
            return Some(Self { pivot, angle: None });
        }
        Some(Self {
            pivot,
            angle: Some(working_plane_angle(ring)?),
        })
    }

    pub fn pivot(&self) -> &Point3<f64> {
        &self.pivot
    }

    /// Rotation angle in radians, `None` when no rotation is needed.
    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    /// Rotates points into the working plane.
    pub fn to_plane(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        match self.angle {
            Some(angle) => rotate_about_z(points, &self.pivot, angle),
            None => points.to_vec(),
        }
    }

    /// Rotates points from the working plane back to the original frame.
    pub fn from_plane(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        match self.angle {
            Some(angle) => rotate_about_z(points, &self.pivot, -angle),
            None => points.to_vec(),
        }
    }
}
