// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall-pair adjacency resolver.
//!
//! Compares every wall or closure of one building-like entity with every
//! wall or closure of another. Two surfaces share a wall when
//!
//! 1. their normals are parallel within the configured tolerance,
//! 2. after rotating both into the working plane of the first surface,
//!    their perpendicular offsets are close enough,
//! 3. their overlap in (x, height) has more than the minimum area.
//!
//! Each overlapping piece is rotated back into the original frame and
//! reported as its own [`PartyWallRecord`].

use citymodel_core::{BuildingLike, Surface};
use citymodel_geometry::{bool2d::close_contour, intersect_2d, Point2, Point3, Vector3, WorkingPlane};

use crate::config::PartyWallConfig;
use crate::record::PartyWallRecord;

/// Records found between two entities.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub records: Vec<PartyWallRecord>,
    /// Valid surface pairs looked at, parallel or not.
    pub wall_pairs_compared: usize,
}

/// Whether two unit normals describe parallel planes.
///
/// Equal and opposite normals always pass; otherwise `|n0 · n1|` must
/// exceed `min_cos`.
pub fn normals_aligned(n0: &Vector3<f64>, n1: &Vector3<f64>, min_cos: f64) -> bool {
    n0 == n1 || *n0 == -*n1 || n0.dot(n1).abs() > min_cos
}

/// Finds all shared wall pieces between `a` and `b`.
///
/// Invalid surfaces are never compared. Records name `a` first.
pub fn resolve_party_walls(
    a: &dyn BuildingLike,
    b: &dyn BuildingLike,
    config: &PartyWallConfig,
) -> Resolution {
    let id_a = a.qualified_id();
    let id_b = b.qualified_id();
    let mut resolution = Resolution::default();

    for s0 in a.surfaces().party_wall_candidates() {
        let Some(n0) = s0.normal() else { continue };
        for s1 in b.surfaces().party_wall_candidates() {
            let Some(n1) = s1.normal() else { continue };
            resolution.wall_pairs_compared += 1;

            if !normals_aligned(&n0, &n1, config.normal_alignment_cos) {
                continue;
            }
            for contact in contact_pieces(s0, &n0, s1, config) {
                tracing::debug!(
                    building_a = %id_a,
                    surface_a = s0.id(),
                    building_b = %id_b,
                    surface_b = s1.id(),
                    area = contact.area,
                    "Found party wall"
                );
                resolution.records.push(PartyWallRecord {
                    building_a: id_a.clone(),
                    surface_a: s0.id().to_string(),
                    building_b: id_b.clone(),
                    surface_b: s1.id().to_string(),
                    area: contact.area,
                    contact: contact.ring,
                });
            }
        }
    }

    resolution
}

struct Contact {
    area: f64,
    ring: Vec<[f64; 3]>,
}

/// Overlap pieces of two parallel surfaces, in the original frame.
fn contact_pieces(
    s0: &Surface,
    n0: &Vector3<f64>,
    s1: &Surface,
    config: &PartyWallConfig,
) -> Vec<Contact> {
    let Some(plane) = WorkingPlane::for_ring(s0.points(), n0) else {
        return Vec::new();
    };
    let r0 = plane.to_plane(s0.points_open());
    let r1 = plane.to_plane(s1.points_open());

    let offset = mean_y(&r0);
    if (offset - mean_y(&r1)).abs() > config.wall_offset_tolerance {
        return Vec::new();
    }

    let pieces = match intersect_2d(&drop_y(&r0), &drop_y(&r1)) {
        Ok(pieces) => pieces,
        Err(e) => {
            tracing::debug!(surface_a = s0.id(), surface_b = s1.id(), error = %e, "Skipping surface pair");
            return Vec::new();
        }
    };

    pieces
        .into_iter()
        .filter(|piece| piece.area > config.min_contact_area)
        .map(|piece| {
            let lifted: Vec<Point3<f64>> = close_contour(&piece.outer)
                .iter()
                .map(|q| Point3::new(q.x, offset, q.y))
                .collect();
            Contact {
                area: piece.area,
                ring: plane
                    .from_plane(&lifted)
                    .iter()
                    .map(|p| [p.x, p.y, p.z])
                    .collect(),
            }
        })
        .collect()
}

fn mean_y(points: &[Point3<f64>]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64
}

/// (x, z) projection of points in the working plane.
fn drop_y(points: &[Point3<f64>]) -> Vec<Point2<f64>> {
    points.iter().map(|p| Point2::new(p.x, p.z)).collect()
}
