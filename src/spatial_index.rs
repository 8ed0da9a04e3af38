//! R-tree entries for the bounding-box index.
//!
//! The index stores axis-aligned boxes with an id (and optionally the full
//! geometry) attached. Retrieval is envelope intersection only; exact
//! geometric filtering happens in the query engines. Trees are bulk-loaded
//! once and never mutated afterwards, so query access needs no
//! synchronization.

use crate::types::{BoundingBox2D, BoundingBox3D};
use geo::Geometry;
use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

/// Value attached to every indexed box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPayload {
    id: usize,
    geometry: Option<Geometry<f64>>,
}

impl EntryPayload {
    /// Lightweight payload: the record id only.
    pub fn id_only(id: usize) -> Self {
        Self { id, geometry: None }
    }

    /// Payload carrying the full geometry, avoiding a source lookup at
    /// query time.
    pub fn with_geometry(id: usize, geometry: Geometry<f64>) -> Self {
        Self {
            id,
            geometry: Some(geometry),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }
}

/// A planar box entry in a 2D tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedBox2D {
    min: [f64; 2],
    max: [f64; 2],
    payload: EntryPayload,
}

impl IndexedBox2D {
    pub fn new(bbox: &BoundingBox2D, payload: EntryPayload) -> Self {
        Self {
            min: [bbox.min_x, bbox.min_y],
            max: [bbox.max_x, bbox.max_y],
            payload,
        }
    }

    pub fn payload(&self) -> &EntryPayload {
        &self.payload
    }
}

impl RTreeObject for IndexedBox2D {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// A space-time box entry in a 3D tree. The third axis is the record's
/// time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedBox3D {
    min: [f64; 3],
    max: [f64; 3],
    payload: EntryPayload,
}

impl IndexedBox3D {
    pub fn new(bbox: &BoundingBox3D, payload: EntryPayload) -> Self {
        Self {
            min: [bbox.min_x, bbox.min_y, bbox.min_t],
            max: [bbox.max_x, bbox.max_y, bbox.max_t],
            payload,
        }
    }

    pub fn payload(&self) -> &EntryPayload {
        &self.payload
    }
}

impl RTreeObject for IndexedBox3D {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

/// Bulk-loaded planar tree.
pub type Tree2D = RTree<IndexedBox2D>;

/// Bulk-loaded space-time tree.
pub type Tree3D = RTree<IndexedBox3D>;

/// Query envelope for a planar box.
pub fn envelope_2d(bbox: &BoundingBox2D) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y])
}

/// Query envelope for a space-time box.
pub fn envelope_3d(bbox: &BoundingBox3D) -> AABB<[f64; 3]> {
    AABB::from_corners(
        [bbox.min_x, bbox.min_y, bbox.min_t],
        [bbox.max_x, bbox.max_y, bbox.max_t],
    )
}
