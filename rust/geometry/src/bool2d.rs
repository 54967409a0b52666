// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Wall Contact Areas
//!
//! Once two walls are rotated into a common working plane they are plain 2D
//! polygons in (x, height) coordinates. Their overlap is computed here with
//! the i_overlay crate. The overlap may fall apart into several disjoint
//! pieces, each reported with its own area.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// One connected piece of a 2D intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece2D {
    /// Outer boundary, counter-clockwise, not closed.
    pub outer: Vec<Point2<f64>>,
    /// Holes, clockwise, not closed.
    pub holes: Vec<Vec<Point2<f64>>>,
    /// Outer area minus hole areas.
    pub area: f64,
}

/// Pieces of an intersection; usually zero, one or two.
pub type Pieces = SmallVec<[Piece2D; 2]>;

/// Intersects two simple polygons.
///
/// Rings may be open or closed and of either winding. Pieces without area
/// (touching edges or corners) are dropped.
///
/// # Returns
/// * `Ok(Pieces)` - Zero or more disjoint pieces
/// * `Err` - If either ring has fewer than 3 distinct points
pub fn intersect_2d(a: &[Point2<f64>], b: &[Point2<f64>]) -> Result<Pieces> {
    let a = open_ring(a);
    let b = open_ring(b);
    if a.len() < 3 {
        return Err(Error::DegenerateRing(a.len()));
    }
    if b.len() < 3 {
        return Err(Error::DegenerateRing(b.len()));
    }

    let subject = vec![contour_to_path(&ensure_ccw(a))];
    let clip = vec![contour_to_path(&ensure_ccw(b))];

    // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
    let result = subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd);

    Ok(shapes_to_pieces(&result))
}

/// Check if a contour is valid (has area, not degenerate)
pub(crate) fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let area = compute_signed_area(contour).abs();
    area > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub(crate) fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub(crate) fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub(crate) fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Returns `contour` with a copy of its first point appended.
pub fn close_contour(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut closed = contour.to_vec();
    if let Some(first) = contour.first() {
        if contour.last() != Some(first) {
            closed.push(*first);
        }
    }
    closed
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Strips the closing duplicate of a ring, if present.
fn open_ring(contour: &[Point2<f64>]) -> &[Point2<f64>] {
    match contour.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest,
        _ => contour,
    }
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Convert i_overlay result shapes to pieces
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn shapes_to_pieces(shapes: &[Vec<Vec<[f64; 2]>>]) -> Pieces {
    let mut pieces = Pieces::new();

    for shape in shapes {
        let Some((outer, holes)) = shape.split_first() else {
            continue;
        };
        let outer = path_to_contour(outer);
        if !is_valid_contour(&outer) {
            continue;
        }

        let holes: Vec<Vec<Point2<f64>>> = holes
            .iter()
            .map(|h| path_to_contour(h))
            .filter(|h| is_valid_contour(h))
            .map(|h| ensure_cw(&h))
            .collect();

        let hole_area: f64 = holes.iter().map(|h| compute_signed_area(h).abs()).sum();
        let area = compute_signed_area(&outer).abs() - hole_area;

        pieces.push(Piece2D {
            outer: ensure_ccw(&outer),
            holes,
            area,
        });
    }

    pieces
}
