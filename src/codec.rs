//! Box framing for index entries and queries.
//!
//! Pure functions mapping geometries, points, and time values onto the
//! axis-aligned boxes the index stores and matches against. The framing is
//! deterministic and performs no validation; query-side callers validate
//! boxes before use.

use crate::types::{BoundingBox2D, BoundingBox3D};
use geo::{BoundingRect, Geometry};

/// The geometry's own planar bounding box, or `None` for an empty geometry
/// (e.g. a collection with no members).
pub fn planar_box(geometry: &Geometry<f64>) -> Option<BoundingBox2D> {
    geometry
        .bounding_rect()
        .map(|rect| BoundingBox2D::from_rect(&rect))
}

/// Frame a planar box and a time attribute value into a space-time box.
///
/// The time window of width `dt` is centered on `t`: `[t - dt/2, t + dt/2]`.
pub fn spacetime_box(bbox: &BoundingBox2D, t: f64, dt: f64) -> BoundingBox3D {
    BoundingBox3D::new(
        bbox.min_x,
        bbox.min_y,
        t - dt / 2.0,
        bbox.max_x,
        bbox.max_y,
        t + dt / 2.0,
    )
}

/// Expand a point into an epsilon box.
///
/// The index answers box-overlap queries, so a point query is framed as a
/// degenerate box of half-width `eps` around the point.
pub fn point_box(x: f64, y: f64, eps: f64) -> BoundingBox2D {
    BoundingBox2D::new(x - eps, y - eps, x + eps, y + eps)
}

/// Expand a point and a time instant into an epsilon space-time box.
pub fn point_time_box(x: f64, y: f64, t: f64, eps: f64) -> BoundingBox3D {
    BoundingBox3D::new(x - eps, y - eps, t - eps, x + eps, y + eps, t + eps)
}

/// Widen a planar box into a space-time box spanning
/// `[-large_time, +large_time]`, so a spacetime index can answer a purely
/// spatial query.
///
/// This is an approximation of "no time filter", not a sentinel: any record
/// whose time window lies outside `±large_time` is silently excluded.
pub fn widen_to_alltime(bbox: &BoundingBox2D, large_time: f64) -> BoundingBox3D {
    BoundingBox3D::new(
        bbox.min_x,
        bbox.min_y,
        -large_time,
        bbox.max_x,
        bbox.max_y,
        large_time,
    )
}
