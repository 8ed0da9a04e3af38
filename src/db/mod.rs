//! Read-only query engines over a built index.
//!
//! Every query follows the same two-phase protocol: the approximate stage
//! collects candidates whose stored box overlaps the framed query box, then
//! the exact stage keeps only candidates whose true geometry intersects the
//! query's spatial footprint. The approximate stage is a safe
//! over-approximation, so refinement can only remove false positives.

mod spatial_2d;
mod spatial_3d;

pub use spatial_2d::GeometryIndex2D;
pub use spatial_3d::GeometryIndex3D;

use crate::error::Result;
use crate::source::GeometrySource;
use crate::spatial_index::EntryPayload;
use geo::Geometry;
use std::borrow::Cow;

/// The geometry to refine a candidate against: stored in the entry payload,
/// or fetched from the source for id-only indexes.
///
/// A fetch failure for an id the index returned means the persisted index
/// and the source have drifted apart; the error propagates to the caller.
pub(crate) fn candidate_geometry<'a, S: GeometrySource>(
    source: &S,
    payload: &'a EntryPayload,
) -> Result<Cow<'a, Geometry<f64>>> {
    match payload.geometry() {
        Some(geometry) => Ok(Cow::Borrowed(geometry)),
        None => source.geometry(payload.id()).map(Cow::Owned),
    }
}
