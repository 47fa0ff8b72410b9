use crate::error::{Error, Result};
use crate::index::Index;
use crate::loader;
use crate::model::Video;
use crate::persist::{self, SnapshotPaths};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;

/// Where an index comes from: exactly one of `documents` or `data_dir`.
/// With `serialized` set, `data_dir` holds a snapshot instead of raw
/// `*.json` documents.
#[derive(Debug, Default)]
pub struct LoadOptions {
    pub documents: Option<Vec<Video>>,
    pub data_dir: Option<PathBuf>,
    pub serialized: bool,
    /// Reference instant (Unix seconds) for the facet recency window;
    /// defaults to the wall clock at build time.
    pub today: Option<i64>,
}

impl LoadOptions {
    pub fn from_documents(documents: Vec<Video>) -> Self {
        Self {
            documents: Some(documents),
            ..Self::default()
        }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    pub fn from_snapshot(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
            serialized: true,
            ..Self::default()
        }
    }

    pub fn today(mut self, today: i64) -> Self {
        self.today = Some(today);
        self
    }

    fn build(self) -> Result<Index> {
        let today = self.today.unwrap_or_else(now_unix);
        match (self.documents, self.data_dir) {
            (None, None) => Err(Error::Configuration(
                "either documents or a data dir must be supplied".into(),
            )),
            (Some(_), Some(_)) => Err(Error::Configuration(
                "documents and a data dir are mutually exclusive".into(),
            )),
            (Some(_), None) if self.serialized => Err(Error::Configuration(
                "serialized input requires a data dir".into(),
            )),
            (Some(docs), None) => Ok(Index::build(&docs, today)),
            (None, Some(dir)) if self.serialized => persist::load_dir(&SnapshotPaths::new(dir)),
            (None, Some(dir)) => Ok(Index::build(&loader::load_dir(dir)?, today)),
        }
    }
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Swappable handle over the current index. Readers clone the `Arc` and keep
/// querying the value they grabbed; `reload` publishes a fully built
/// replacement in one pointer swap, so no caller ever observes a partially
/// rebuilt index. A failed reload leaves the previous index serving.
pub struct Engine {
    current: RwLock<Arc<Index>>,
}

impl Engine {
    pub fn new(options: LoadOptions) -> Result<Self> {
        Ok(Self {
            current: RwLock::new(Arc::new(options.build()?)),
        })
    }

    pub fn index(&self) -> Arc<Index> {
        Arc::clone(&self.current.read())
    }

    pub fn reload(&self, options: LoadOptions) -> Result<()> {
        let next = Arc::new(options.build()?);
        *self.current.write() = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, satisfaction: i64) -> Video {
        serde_json::from_value(serde_json::json!({
            "objectID": id,
            "title": format!("talk {id}"),
            "satisfaction": satisfaction,
            "creationDate": 0,
            "recordingDate": 0,
        }))
        .unwrap()
    }

    #[test]
    fn rejects_missing_and_ambiguous_sources() {
        assert!(matches!(
            Engine::new(LoadOptions::default()),
            Err(Error::Configuration(_))
        ));
        let both = LoadOptions {
            documents: Some(vec![]),
            data_dir: Some("/tmp/nowhere".into()),
            ..LoadOptions::default()
        };
        assert!(matches!(Engine::new(both), Err(Error::Configuration(_))));
    }

    #[test]
    fn failed_reload_keeps_previous_index() {
        let engine =
            Engine::new(LoadOptions::from_documents(vec![doc("a", 1), doc("b", 2)])).unwrap();
        assert_eq!(engine.index().len(), 2);

        assert!(engine.reload(LoadOptions::default()).is_err());
        assert_eq!(engine.index().len(), 2);
    }

    #[test]
    fn reload_swaps_wholesale() {
        let engine = Engine::new(LoadOptions::from_documents(vec![doc("a", 1)])).unwrap();
        let before = engine.index();
        engine
            .reload(LoadOptions::from_documents(vec![doc("b", 2), doc("c", 3)]))
            .unwrap();
        // The old value stays valid for holders while the new one serves.
        assert_eq!(before.len(), 1);
        assert_eq!(engine.index().len(), 2);
    }
}
