//! Durable storage for built indexes.
//!
//! Each storage key (a filesystem root path) owns two artifacts: the tree
//! structure (`<root>.idx`) and the manifest (`<root>.dat`). Their joint
//! presence is what signals "index already built"; if either is missing the
//! builder rebuilds from the source. Writes go through a temp file and an
//! atomic rename so a crash never leaves a half-written artifact under the
//! final name.
//!
//! Artifact contents are not validated against the current source on load.
//! A source that changed since the index was persisted yields silently
//! stale results; the builder logs this risk on every load.

use crate::error::{GeomDbError, Result};
use crate::types::PayloadMode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const ARTIFACT_MAGIC: &[u8] = b"GEOMDB";
const FORMAT_VERSION: u8 = 1;

const INDEX_EXT: &str = "idx";
const MANIFEST_EXT: &str = "dat";

/// Identity of a persisted index, stored in the `.dat` artifact.
///
/// Dimensionality and payload mode are fixed at build time; the builder
/// refuses to load an index whose manifest disagrees with the requested
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexManifest {
    /// 2 for planar, 3 for space-time.
    pub dimensions: u8,
    pub payload_mode: PayloadMode,
    /// Number of entries bulk-loaded into the tree.
    pub entries: u64,
}

/// The artifact pair for one storage key.
#[derive(Debug, Clone)]
pub struct IndexArtifacts {
    root: PathBuf,
}

impl IndexArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn index_path(&self) -> PathBuf {
        self.with_ext(INDEX_EXT)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.with_ext(MANIFEST_EXT)
    }

    /// Both-or-neither existence check deciding build vs load.
    pub fn exists(&self) -> bool {
        self.index_path().exists() && self.manifest_path().exists()
    }

    /// Persist a built tree and its manifest. The tree is written first so
    /// the manifest's presence implies a complete pair.
    pub fn save<T: Serialize>(&self, manifest: &IndexManifest, tree: &T) -> Result<()> {
        write_artifact(&self.index_path(), tree)?;
        write_artifact(&self.manifest_path(), manifest)?;
        log::info!(
            "persisted {}-dimensional index ({} entries) at {}",
            manifest.dimensions,
            manifest.entries,
            self.root.display()
        );
        Ok(())
    }

    pub fn load_manifest(&self) -> Result<IndexManifest> {
        read_artifact(&self.manifest_path())
    }

    pub fn load_tree<T: DeserializeOwned>(&self) -> Result<T> {
        read_artifact(&self.index_path())
    }

    // The extension is appended to the key rather than replacing one, so a
    // root like "data/reaches.na" maps to "data/reaches.na.idx".
    fn with_ext(&self, ext: &str) -> PathBuf {
        let mut name = OsString::from(self.root.as_os_str());
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let temp_path = temp_path(path);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(ARTIFACT_MAGIC)?;
    writer.write_all(&[FORMAT_VERSION])?;
    bincode::serialize_into(&mut writer, value)
        .map_err(|e| GeomDbError::Serialization(e.to_string()))?;

    writer.flush()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&temp_path, path)?;
    sync_parent_dir(path)?;
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; ARTIFACT_MAGIC.len()];
    reader.read_exact(&mut magic)?;
    if magic != ARTIFACT_MAGIC {
        return Err(GeomDbError::InvalidFormat);
    }

    let mut version = [0u8; 1];
    reader.read_exact(&mut version)?;
    if version[0] != FORMAT_VERSION {
        return Err(GeomDbError::InvalidFormat);
    }

    bincode::deserialize_from(reader).map_err(|e| GeomDbError::Serialization(e.to_string()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn sync_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let dir = File::open(parent)?;
        dir.sync_all()?;
    }
    Ok(())
}
