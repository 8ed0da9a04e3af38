//! Embedded read-only spatial/spatiotemporal index over a fixed geometry
//! collection, with persisted R-tree artifacts and two-phase exact queries.
//!
//! Queries run in two phases: bounding-box overlap against the index
//! retrieves candidates, then each candidate's true geometry is tested
//! against the exact query footprint. A time attribute can be encoded as a
//! third index axis for point-in-time lookups.
//!
//! ```rust
//! use geomdb::{BoundingBox2D, GeometryIndexBuilder, MemorySource};
//! use geo::{polygon, Geometry};
//!
//! let reach: Geometry<f64> = polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 4.0, y: 0.0),
//!     (x: 4.0, y: 4.0),
//!     (x: 0.0, y: 4.0),
//! ].into();
//!
//! let index = GeometryIndexBuilder::new(MemorySource::new(vec![reach])).build_planar()?;
//! let hits = index.intersecting_ids(&BoundingBox2D::new(1.0, 1.0, 3.0, 3.0))?;
//! assert_eq!(hits, vec![0]);
//! # Ok::<(), geomdb::GeomDbError>(())
//! ```

pub mod builder;
pub mod codec;
pub mod db;
pub mod error;
pub mod persistence;
pub mod source;
pub mod spatial_index;
pub mod types;

pub use builder::GeometryIndexBuilder;
pub use db::{GeometryIndex2D, GeometryIndex3D};
pub use error::{GeomDbError, Result};
pub use persistence::{IndexArtifacts, IndexManifest};
pub use source::{GeometrySource, MemorySource};
pub use types::{BoundingBox2D, BoundingBox3D, Config, PayloadMode};

pub use geo::{Geometry, Point, Polygon, Rect};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{BoundingBox2D, BoundingBox3D, Config, PayloadMode};

    pub use crate::{GeomDbError, Result};

    pub use crate::{GeometryIndex2D, GeometryIndex3D, GeometryIndexBuilder};

    pub use crate::{GeometrySource, MemorySource};

    pub use geo::{Geometry, Point, Polygon, Rect};
}
