use crate::error::{Error, Result};
use crate::model::Video;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use walkdir::WalkDir;

/// Collect every `*.json` file under `root` (recursively) and parse each as
/// one video record. Discovery order is filesystem-dependent and carries no
/// meaning for the resulting index.
pub fn load_dir<P: AsRef<Path>>(root: P) -> Result<Vec<Video>> {
    let root = root.as_ref();
    let mut docs = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            Error::Configuration(format!("cannot walk {}: {e}", root.display()))
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let file = File::open(path)?;
        let video: Video =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::MalformedDocument {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        docs.push(video);
    }
    tracing::info!(num_docs = docs.len(), dir = %root.display(), "documents loaded");
    Ok(docs)
}
