//! Index builder with the build-or-load lifecycle.
//!
//! A builder owns the geometry source and produces a read-only query engine.
//! With a storage root configured, construction first checks for the
//! artifact pair under that key: if both files exist the persisted index is
//! loaded as-is, otherwise the index is built in a single pass over the
//! source and persisted before use.

use crate::codec;
use crate::db::{GeometryIndex2D, GeometryIndex3D};
use crate::error::{GeomDbError, Result};
use crate::persistence::{IndexArtifacts, IndexManifest};
use crate::source::GeometrySource;
use crate::spatial_index::{EntryPayload, IndexedBox2D, IndexedBox3D, Tree2D, Tree3D};
use crate::types::{Config, PayloadMode};
use std::path::PathBuf;

/// Builder for [`GeometryIndex2D`] and [`GeometryIndex3D`].
///
/// # Example
///
/// ```rust
/// use geomdb::{GeometryIndexBuilder, MemorySource, PayloadMode};
/// use geo::{polygon, Geometry};
///
/// # fn main() -> Result<(), geomdb::GeomDbError> {
/// let reach: Geometry<f64> = polygon![
///     (x: 0.0, y: 0.0),
///     (x: 2.0, y: 0.0),
///     (x: 2.0, y: 2.0),
///     (x: 0.0, y: 2.0),
/// ].into();
///
/// let index = GeometryIndexBuilder::new(MemorySource::new(vec![reach]))
///     .payload_mode(PayloadMode::Geometry)
///     .build_planar()?;
/// assert_eq!(index.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GeometryIndexBuilder<S> {
    source: S,
    storage_root: Option<PathBuf>,
    payload_mode: PayloadMode,
    config: Config,
}

impl<S: GeometrySource> GeometryIndexBuilder<S> {
    /// Create a builder with in-memory operation and default configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            storage_root: None,
            payload_mode: PayloadMode::Id,
            config: Config::default(),
        }
    }

    /// Set the durable storage key. The artifact pair lives at
    /// `<root>.idx` / `<root>.dat`; their joint presence selects the load
    /// path on the next build.
    pub fn storage_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.storage_root = Some(root.into());
        self
    }

    /// Choose what the index stores alongside each box.
    pub fn payload_mode(mut self, mode: PayloadMode) -> Self {
        self.payload_mode = mode;
        self
    }

    /// Set the full index configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the attribute field used as the time axis (spacetime builds).
    pub fn time_field(mut self, field: impl Into<String>) -> Self {
        self.config = self.config.with_time_field(field);
        self
    }

    /// Set the time window width `dt` (spacetime builds).
    pub fn time_window(mut self, dt: f64) -> Self {
        self.config = self.config.with_time_window(dt);
        self
    }

    /// Build or load a planar (2D) index.
    pub fn build_planar(self) -> Result<GeometryIndex2D<S>> {
        let Self {
            source,
            storage_root,
            payload_mode,
            config,
        } = self;
        config.validate().map_err(GeomDbError::InvalidConfig)?;

        let artifacts = storage_root.map(IndexArtifacts::new);

        if let Some(artifacts) = &artifacts
            && artifacts.exists()
        {
            let tree: Tree2D = load_persisted(artifacts, 2, payload_mode)?;
            return Ok(GeometryIndex2D::from_parts(source, tree, config));
        }

        let mut entries = Vec::with_capacity(source.len());
        for id in 0..source.len() {
            let bbox = source.bbox(id)?;
            entries.push(IndexedBox2D::new(
                &bbox,
                entry_payload(&source, id, payload_mode)?,
            ));
        }
        let tree = Tree2D::bulk_load(entries);
        log::info!("built planar index over {} geometries", tree.size());

        if let Some(artifacts) = &artifacts {
            let manifest = IndexManifest {
                dimensions: 2,
                payload_mode,
                entries: tree.size() as u64,
            };
            artifacts.save(&manifest, &tree)?;
        }
        Ok(GeometryIndex2D::from_parts(source, tree, config))
    }

    /// Build or load a space-time (3D) index.
    ///
    /// The configured time field must exist in the source attribute schema;
    /// a missing field is a fatal configuration error, never a partial or
    /// empty index.
    pub fn build_spacetime(self) -> Result<GeometryIndex3D<S>> {
        let Self {
            source,
            storage_root,
            payload_mode,
            config,
        } = self;
        config.validate().map_err(GeomDbError::InvalidConfig)?;
        if !source.has_field(&config.time_field) {
            return Err(GeomDbError::MissingTimeField(config.time_field));
        }

        let artifacts = storage_root.map(IndexArtifacts::new);

        if let Some(artifacts) = &artifacts
            && artifacts.exists()
        {
            let tree: Tree3D = load_persisted(artifacts, 3, payload_mode)?;
            return Ok(GeometryIndex3D::from_parts(source, tree, config));
        }

        let mut entries = Vec::with_capacity(source.len());
        for id in 0..source.len() {
            let bbox = source.bbox(id)?;
            let t = source.attribute(id, &config.time_field)?;
            let st_box = codec::spacetime_box(&bbox, t, config.time_window);
            entries.push(IndexedBox3D::new(
                &st_box,
                entry_payload(&source, id, payload_mode)?,
            ));
        }
        let tree = Tree3D::bulk_load(entries);
        log::info!("built spacetime index over {} geometries", tree.size());

        if let Some(artifacts) = &artifacts {
            let manifest = IndexManifest {
                dimensions: 3,
                payload_mode,
                entries: tree.size() as u64,
            };
            artifacts.save(&manifest, &tree)?;
        }
        Ok(GeometryIndex3D::from_parts(source, tree, config))
    }
}

fn load_persisted<T: serde::de::DeserializeOwned>(
    artifacts: &IndexArtifacts,
    expected_dims: u8,
    expected_mode: PayloadMode,
) -> Result<T> {
    let manifest = artifacts.load_manifest()?;
    if manifest.dimensions != expected_dims {
        return Err(GeomDbError::DimensionMismatch {
            expected: expected_dims,
            found: manifest.dimensions,
        });
    }
    if manifest.payload_mode != expected_mode {
        return Err(GeomDbError::PayloadModeMismatch {
            expected: expected_mode,
            found: manifest.payload_mode,
        });
    }
    log::warn!(
        "reusing persisted index at {}; contents are not verified against the current source",
        artifacts.manifest_path().display()
    );
    artifacts.load_tree()
}

fn entry_payload<S: GeometrySource>(
    source: &S,
    id: usize,
    mode: PayloadMode,
) -> Result<EntryPayload> {
    Ok(match mode {
        PayloadMode::Id => EntryPayload::id_only(id),
        PayloadMode::Geometry => EntryPayload::with_geometry(id, source.geometry(id)?),
    })
}
