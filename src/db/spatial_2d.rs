//! Planar (2D) query engine.

use super::candidate_geometry;
use crate::codec;
use crate::error::{GeomDbError, Result};
use crate::source::GeometrySource;
use crate::spatial_index::{Tree2D, envelope_2d};
use crate::types::{BoundingBox2D, Config};
use geo::{Geometry, Intersects};

/// Exact-match spatial queries over a planar index.
///
/// Immutable after construction: the source and the tree are read-only, so
/// a shared reference can be queried from multiple threads without
/// synchronization.
#[derive(Debug)]
pub struct GeometryIndex2D<S> {
    source: S,
    tree: Tree2D,
    config: Config,
}

impl<S: GeometrySource> GeometryIndex2D<S> {
    pub(crate) fn from_parts(source: S, tree: Tree2D, config: Config) -> Self {
        Self {
            source,
            tree,
            config,
        }
    }

    /// Number of indexed geometries.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ids of geometries whose exact shape intersects the query box.
    ///
    /// Candidates come from bounding-box overlap in the index; each is then
    /// tested against the exact rectangular footprint of `bbox`, so a
    /// geometry whose extent overlaps the query without the shape itself
    /// touching it (an elongated reach cutting diagonally past a corner) is
    /// dropped. Result order is index-scan order.
    pub fn intersecting_ids(&self, bbox: &BoundingBox2D) -> Result<Vec<usize>> {
        bbox.validate().map_err(GeomDbError::InvalidQuery)?;
        let footprint = bbox.footprint();

        let mut ids = Vec::new();
        for entry in self.tree.locate_in_envelope_intersecting(&envelope_2d(bbox)) {
            let geometry = candidate_geometry(&self.source, entry.payload())?;
            if footprint.intersects(geometry.as_ref()) {
                ids.push(entry.payload().id());
            }
        }
        Ok(ids)
    }

    /// Like [`intersecting_ids`](Self::intersecting_ids), returning the full
    /// geometries for callers that cannot re-look-up by id cheaply.
    pub fn intersecting_geometries(&self, bbox: &BoundingBox2D) -> Result<Vec<Geometry<f64>>> {
        bbox.validate().map_err(GeomDbError::InvalidQuery)?;
        let footprint = bbox.footprint();

        let mut geometries = Vec::new();
        for entry in self.tree.locate_in_envelope_intersecting(&envelope_2d(bbox)) {
            let geometry = candidate_geometry(&self.source, entry.payload())?;
            if footprint.intersects(geometry.as_ref()) {
                geometries.push(geometry.into_owned());
            }
        }
        Ok(geometries)
    }

    /// Ids of geometries intersecting the point, via an epsilon box with
    /// the configured tolerance.
    pub fn contains_point(&self, x: f64, y: f64) -> Result<Vec<usize>> {
        self.contains_point_with_eps(x, y, self.config.point_eps)
    }

    /// Point query with an explicit epsilon half-width.
    pub fn contains_point_with_eps(&self, x: f64, y: f64, eps: f64) -> Result<Vec<usize>> {
        self.intersecting_ids(&codec::point_box(x, y, eps))
    }
}
