// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar boundary surfaces.
//!
//! A [`Surface`] is one closed polygon ring in 3D space. On construction it
//! collapses redundant collinear points and derives its unit normal, area,
//! tilt and orientation. Rings that end up with fewer than four points
//! (three distinct corners plus the closing point), or whose first three
//! points do not span a plane, are kept but flagged invalid: they expose no
//! normal and no area.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::SurfaceConfig;
use crate::error::{Error, Result};

/// Closed ring minimum: three corners plus the repeated first point.
const MIN_RING_POINTS: usize = 4;

/// Cross products shorter than this are treated as collinear.
const NORMAL_EPSILON: f64 = 1e-8;

/// Angular slack (degrees) for the tilt based kind inference.
const TILT_EPSILON_DEG: f64 = 1e-6;

/// Two triangle normals are considered the same plane above this |cos|.
const PLANARITY_COS: f64 = 1.0 - 1e-6;

/// Semantic category of a boundary surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SurfaceKind {
    Wall,
    Roof,
    Ground,
    Closure,
    /// Not supplied and not derivable (invalid geometry).
    Unknown,
}

impl SurfaceKind {
    /// CityGML boundary surface element name.
    pub const fn as_citygml_name(self) -> &'static str {
        match self {
            SurfaceKind::Wall => "WallSurface",
            SurfaceKind::Roof => "RoofSurface",
            SurfaceKind::Ground => "GroundSurface",
            SurfaceKind::Closure => "ClosureSurface",
            SurfaceKind::Unknown => "Unknown",
        }
    }

    /// Walls and closures are compared against each other for party walls.
    pub const fn is_party_wall_candidate(self) -> bool {
        matches!(self, SurfaceKind::Wall | SurfaceKind::Closure)
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_citygml_name())
    }
}

impl FromStr for SurfaceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "WallSurface" | "wall" => Ok(SurfaceKind::Wall),
            "RoofSurface" | "roof" => Ok(SurfaceKind::Roof),
            "GroundSurface" | "ground" => Ok(SurfaceKind::Ground),
            "ClosureSurface" | "closure" => Ok(SurfaceKind::Closure),
            other => Err(Error::UnknownSurfaceKind(other.to_string())),
        }
    }
}

/// Compass orientation of a surface normal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Horizontal, normal pointing up.
    Up,
    /// Horizontal, normal pointing down.
    Down,
    /// Clockwise angle from north in degrees, `[0, 360)`.
    Azimuth(f64),
}

/// A planar polygon ring with derived plane attributes.
#[derive(Debug, Clone)]
pub struct Surface {
    id: String,
    kind: SurfaceKind,
    points: Vec<Point3<f64>>,
    normal: Option<Vector3<f64>>,
    area: Option<f64>,
    tilt: Option<f64>,
    orientation: Option<Orientation>,
    planar: bool,
    config: SurfaceConfig,
}

impl Surface {
    /// Builds a surface from a ring of points.
    ///
    /// The ring is closed if its last point does not repeat the first one.
    /// When `kind` is `None` (or [`SurfaceKind::Unknown`]) it is inferred from
    /// the tilt and orientation of the ring.
    pub fn new(
        id: impl Into<String>,
        points: Vec<Point3<f64>>,
        kind: Option<SurfaceKind>,
        config: &SurfaceConfig,
    ) -> Self {
        let mut surface = Self {
            id: id.into(),
            kind: kind.unwrap_or(SurfaceKind::Unknown),
            points: close_ring(points),
            normal: None,
            area: None,
            tilt: None,
            orientation: None,
            planar: true,
            config: *config,
        };
        surface.derive_attributes();
        surface
    }

    /// Builds a surface from a flat `[x0, y0, z0, x1, y1, z1, ...]` list, as
    /// found in `gml:posList` elements.
    pub fn from_flat(
        id: impl Into<String>,
        coordinates: &[f64],
        kind: Option<SurfaceKind>,
        config: &SurfaceConfig,
    ) -> Result<Self> {
        if coordinates.len() % 3 != 0 {
            return Err(Error::MalformedCoordinates(coordinates.len()));
        }
        let points = coordinates
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self::new(id, points, kind, config))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// Closed ring after collinearity collapse (first point repeated last).
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Ring without the closing duplicate.
    pub fn points_open(&self) -> &[Point3<f64>] {
        match self.points.split_last() {
            Some((last, rest)) if !rest.is_empty() && rest[0] == *last => rest,
            _ => &self.points,
        }
    }

    /// Unit normal, `None` for invalid surfaces.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.normal
    }

    /// Planar area, `None` for invalid surfaces.
    pub fn area(&self) -> Option<f64> {
        self.area
    }

    /// Tilt in degrees, 0 for horizontal and 90 for vertical surfaces.
    pub fn tilt(&self) -> Option<f64> {
        self.tilt
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Whether the surface has a usable normal and area.
    pub fn is_valid(&self) -> bool {
        self.normal.is_some()
    }

    /// Result of the advisory planarity check; `true` when the check is disabled.
    pub fn is_planar(&self) -> bool {
        self.planar
    }

    /// Vertex average of the open ring.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        let open = self.points_open();
        if open.is_empty() {
            return None;
        }
        let sum = open
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Some(Point3::from(sum / open.len() as f64))
    }

    /// Plan-view projection of the open ring as `[x, y]` pairs.
    pub fn footprint(&self) -> Vec<[f64; 2]> {
        self.points_open().iter().map(|p| [p.x, p.y]).collect()
    }

    /// Moves every point by `offset` and re-derives the plane attributes.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        self.transform_points(|p| p + offset);
    }

    /// Applies `f` to every point and re-derives the plane attributes.
    ///
    /// The surface kind is kept as it is.
    pub fn transform_points<F>(&mut self, mut f: F)
    where
        F: FnMut(&Point3<f64>) -> Point3<f64>,
    {
        let points = self.points.iter().map(&mut f).collect();
        self.points = close_ring(points);
        self.derive_attributes();
    }

    fn derive_attributes(&mut self) {
        self.normal = None;
        self.area = None;
        self.tilt = None;
        self.orientation = None;
        self.planar = true;

        let points = std::mem::take(&mut self.points);
        self.points = collapse_collinear(points, self.config.collinear_tolerance);

        if self.points.len() < MIN_RING_POINTS {
            tracing::warn!(
                surface = %self.id,
                points = self.points.len(),
                "Surface has too few individual coordinates"
            );
            return;
        }

        let Some(normal) = unit_normal(&self.points[0], &self.points[1], &self.points[2]) else {
            tracing::warn!(surface = %self.id, "Surface has a degenerate normal vector");
            return;
        };
        self.normal = Some(normal);

        if self.config.check_planarity && !ring_is_planar(&self.points, &normal) {
            self.planar = false;
            tracing::warn!(
                surface = %self.id,
                "Surface is not planar, area and orientation might be incorrect"
            );
        }

        self.area = Some(ring_area(&self.points, &normal));
        self.tilt = tilt_of(&normal);
        let orientation = orientation_of(&normal);
        self.orientation = Some(orientation);

        if self.kind == SurfaceKind::Unknown {
            self.kind = infer_kind(self.tilt, orientation);
        }
    }
}

fn close_ring(mut points: Vec<Point3<f64>>) -> Vec<Point3<f64>> {
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last {
            let first = *first;
            points.push(first);
        }
    }
    points
}

/// Removes intermediate points lying within `tolerance` of the segment
/// joining their neighbours in the input ring.
fn collapse_collinear(points: Vec<Point3<f64>>, tolerance: f64) -> Vec<Point3<f64>> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let redundant: Vec<bool> = (0..n)
        .map(|i| {
            i > 0
                && i < n - 1
                && point_segment_distance(&points[i], &points[i - 1], &points[i + 1]) <= tolerance
        })
        .collect();

    points
        .into_iter()
        .zip(redundant)
        .filter_map(|(p, skip)| (!skip).then_some(p))
        .collect()
}

/// Distance from `p` to the segment `a`-`b`, projection clamped to `[0, 1]`.
fn point_segment_distance(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-20 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Unit normal of the plane through three points (right-hand rule).
fn unit_normal(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
) -> Option<Vector3<f64>> {
    let cross = (p1 - p0).cross(&(p2 - p0));
    let norm = cross.norm();
    if norm < NORMAL_EPSILON || !norm.is_finite() {
        return None;
    }
    Some(cross / norm)
}

fn ring_is_planar(points: &[Point3<f64>], normal: &Vector3<f64>) -> bool {
    points
        .windows(3)
        .skip(1)
        .filter_map(|w| unit_normal(&w[0], &w[1], &w[2]))
        .all(|n| n.dot(normal).abs() >= PLANARITY_COS)
}

/// Generalised shoelace formula, taken relative to the first point.
fn ring_area(points: &[Point3<f64>], normal: &Vector3<f64>) -> f64 {
    let origin = points[0];
    let mut total = Vector3::zeros();
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        total += (a - origin).cross(&(b - origin));
    }
    (total.dot(normal) / 2.0).abs()
}

fn tilt_of(normal: &Vector3<f64>) -> Option<f64> {
    let tilt = normal.z.abs().clamp(0.0, 1.0).acos().to_degrees();
    if tilt.is_nan() {
        None
    } else if tilt == 180.0 {
        Some(0.0)
    } else {
        Some(tilt)
    }
}

fn orientation_of(normal: &Vector3<f64>) -> Orientation {
    if is_close(normal.z, 1.0) {
        Orientation::Up
    } else if is_close(normal.z, -1.0) {
        Orientation::Down
    } else {
        let azimuth = normal.y.atan2(normal.x).to_degrees();
        Orientation::Azimuth((450.0 - azimuth).rem_euclid(360.0))
    }
}

fn infer_kind(tilt: Option<f64>, orientation: Orientation) -> SurfaceKind {
    match tilt {
        Some(t) if t.abs() < TILT_EPSILON_DEG && orientation == Orientation::Down => {
            SurfaceKind::Ground
        }
        Some(t) if (t - 90.0).abs() < TILT_EPSILON_DEG => SurfaceKind::Wall,
        _ => SurfaceKind::Roof,
    }
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}
