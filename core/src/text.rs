use crate::model::Video;
use crate::normalize::fold;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Searchable text per video, folded once at build time: title, speaker
/// names, channel title and tags joined into one haystack. Keeping the
/// haystack here instead of on the projection lets free-text-over-names keep
/// working after a snapshot reload without persisting names twice.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextIndex {
    entries: HashMap<String, String>,
}

impl TextIndex {
    pub fn insert(&mut self, video: &Video) {
        let mut fields = vec![video.title.clone(), video.channel_title.clone()];
        fields.extend(video.speakers().iter().map(|s| s.name.clone()));
        fields.extend(video.tags.iter().cloned());
        self.entries
            .insert(video.object_id.clone(), fold(&fields.join(" ")));
    }

    /// Containment check against one video's haystack. `query` must already
    /// be folded; an empty query matches everything.
    pub fn matches(&self, object_id: &str, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.entries
            .get(object_id)
            .map_or(false, |haystack| haystack.contains(query))
    }
}
