//! Space-time (3D) query engine.
//!
//! The third index axis is a time window derived from each record's time
//! attribute. Exact refinement is inherently planar: the time axis is
//! filtered at the approximate index stage only, with index resolution
//! (the `dt` window chosen at build time) as the documented precision
//! limit.

use super::candidate_geometry;
use crate::codec;
use crate::error::{GeomDbError, Result};
use crate::source::GeometrySource;
use crate::spatial_index::{Tree3D, envelope_3d};
use crate::types::{BoundingBox2D, BoundingBox3D, Config};
use geo::{Geometry, Intersects};

/// Exact-match spatiotemporal queries over a space-time index.
///
/// Immutable after construction; safe for concurrent read-only use through
/// shared references.
#[derive(Debug)]
pub struct GeometryIndex3D<S> {
    source: S,
    tree: Tree3D,
    config: Config,
}

impl<S: GeometrySource> GeometryIndex3D<S> {
    pub(crate) fn from_parts(source: S, tree: Tree3D, config: Config) -> Self {
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

    /// Ids of geometries whose stored space-time box overlaps the query box
    /// and whose exact shape intersects its spatial footprint.
    ///
    /// Only the spatial projection is refined exactly; candidates that pass
    /// the index's time-axis overlap are not re-filtered in time.
    pub fn intersecting_ids_with_time(&self, bbox: &BoundingBox3D) -> Result<Vec<usize>> {
        bbox.validate().map_err(GeomDbError::InvalidQuery)?;
        let footprint = bbox.spatial().footprint();

        let mut ids = Vec::new();
        for entry in self.tree.locate_in_envelope_intersecting(&envelope_3d(bbox)) {
            let geometry = candidate_geometry(&self.source, entry.payload())?;
            if footprint.intersects(geometry.as_ref()) {
                ids.push(entry.payload().id());
            }
        }
        Ok(ids)
    }

    /// Purely spatial query against the space-time index: the time bounds
    /// are widened to the configured `large_time` span.
    pub fn intersecting_ids(&self, bbox: &BoundingBox2D) -> Result<Vec<usize>> {
        bbox.validate().map_err(GeomDbError::InvalidQuery)?;
        self.intersecting_ids_with_time(&codec::widen_to_alltime(bbox, self.config.large_time))
    }

    /// Spatial query returning full geometries instead of ids.
    pub fn intersecting_geometries(&self, bbox: &BoundingBox2D) -> Result<Vec<Geometry<f64>>> {
        bbox.validate().map_err(GeomDbError::InvalidQuery)?;
        let widened = codec::widen_to_alltime(bbox, self.config.large_time);
        let footprint = bbox.footprint();

        let mut geometries = Vec::new();
        for entry in self
            .tree
            .locate_in_envelope_intersecting(&envelope_3d(&widened))
        {
            let geometry = candidate_geometry(&self.source, entry.payload())?;
            if footprint.intersects(geometry.as_ref()) {
                geometries.push(geometry.into_owned());
            }
        }
        Ok(geometries)
    }

    /// Ids of geometries intersecting the point at the given time, via an
    /// epsilon space-time box with the configured tolerance.
    pub fn contains_point_time(&self, x: f64, y: f64, t: f64) -> Result<Vec<usize>> {
        self.contains_point_time_with_eps(x, y, t, self.config.point_eps)
    }

    /// Point-in-time query with an explicit epsilon half-width.
    pub fn contains_point_time_with_eps(
        &self,
        x: f64,
        y: f64,
        t: f64,
        eps: f64,
    ) -> Result<Vec<usize>> {
        self.intersecting_ids_with_time(&codec::point_time_box(x, y, t, eps))
    }

    /// Purely spatial point query, ignoring the time axis.
    pub fn contains_point(&self, x: f64, y: f64) -> Result<Vec<usize>> {
        self.contains_point_with_eps(x, y, self.config.point_eps)
    }

    /// Spatial point query with an explicit epsilon half-width.
    pub fn contains_point_with_eps(&self, x: f64, y: f64, eps: f64) -> Result<Vec<usize>> {
        self.intersecting_ids(&codec::point_box(x, y, eps))
    }
}
