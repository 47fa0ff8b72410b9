use crate::error::{Error, Result};
use crate::index::Index;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Human-readable sidecar describing a snapshot directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub num_docs: u32,
    pub created_at: String,
}

pub struct SnapshotPaths {
    pub root: PathBuf,
}

impl SnapshotPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    fn videos(&self) -> PathBuf {
        self.root.join("videos.bin")
    }
    fn rankings(&self) -> PathBuf {
        self.root.join("rankings.bin")
    }
    fn facets(&self) -> PathBuf {
        self.root.join("facets.bin")
    }
    fn text(&self) -> PathBuf {
        self.root.join("text.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    index: &'a Index,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    index: Index,
}

/// Single-blob form: a version-tagged bincode record carrying everything the
/// index needs to answer queries without the original documents.
pub fn to_bytes(index: &Index) -> Result<Vec<u8>> {
    Ok(bincode::serialize(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        index,
    })?)
}

pub fn from_bytes(bytes: &[u8]) -> Result<Index> {
    let snapshot: Snapshot = bincode::deserialize(bytes)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(Error::MalformedSnapshot(format!(
            "unsupported snapshot version {}",
            snapshot.version
        )));
    }
    Ok(snapshot.index)
}

/// Directory form: one file per concern plus `meta.json`. The root is
/// created if absent; existing files are overwritten, never merged.
pub fn save_dir(paths: &SnapshotPaths, index: &Index) -> Result<()> {
    create_dir_all(&paths.root)?;
    write_bin(&paths.videos(), &index.videos)?;
    write_bin(&paths.rankings(), &index.rankings)?;
    write_bin(&paths.facets(), &index.facets)?;
    write_bin(&paths.text(), &index.text)?;

    let meta = MetaFile {
        version: SNAPSHOT_VERSION,
        num_docs: index.len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
    };
    let json = serde_json::to_string_pretty(&meta)
        .map_err(|e| Error::MalformedSnapshot(e.to_string()))?;
    File::create(paths.meta())?.write_all(json.as_bytes())?;
    tracing::info!(num_docs = meta.num_docs, root = %paths.root.display(), "snapshot written");
    Ok(())
}

pub fn load_dir(paths: &SnapshotPaths) -> Result<Index> {
    let meta = load_meta(paths)?;
    if meta.version != SNAPSHOT_VERSION {
        return Err(Error::MalformedSnapshot(format!(
            "unsupported snapshot version {}",
            meta.version
        )));
    }
    let index = Index {
        videos: read_bin(&paths.videos())?,
        rankings: read_bin(&paths.rankings())?,
        facets: read_bin(&paths.facets())?,
        text: read_bin(&paths.text())?,
    };
    tracing::info!(num_docs = index.len(), root = %paths.root.display(), "snapshot loaded");
    Ok(index)
}

pub fn load_meta(paths: &SnapshotPaths) -> Result<MetaFile> {
    let mut buf = String::new();
    File::open(paths.meta())
        .and_then(|mut f| f.read_to_string(&mut buf).map(|_| ()))
        .map_err(|e| Error::MalformedSnapshot(format!("{}: {e}", paths.meta().display())))?;
    serde_json::from_str(&buf)
        .map_err(|e| Error::MalformedSnapshot(format!("{}: {e}", paths.meta().display())))
}

fn write_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    f.write_all(&bincode::serialize(value)?)?;
    Ok(())
}

// A missing or unreadable file means the directory does not hold a usable
// snapshot, so everything maps to MalformedSnapshot rather than plain Io.
fn read_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut buf = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut buf).map(|_| ()))
        .map_err(|e| Error::MalformedSnapshot(format!("{}: {e}", path.display())))?;
    bincode::deserialize(&buf)
        .map_err(|e| Error::MalformedSnapshot(format!("{}: {e}", path.display())))
}
