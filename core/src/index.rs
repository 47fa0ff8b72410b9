use crate::criteria::Criteria;
use crate::error::Error;
use crate::facets::{ChannelFacet, Facets, SpeakerFacet, TagFacet};
use crate::model::{IndexedVideo, Video};
use crate::normalize::fold;
use crate::text::TextIndex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::str::FromStr;

/// Which precomputed ordering a query reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Satisfaction,
    RecordingDate,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "satisfaction" => Ok(SortKey::Satisfaction),
            "recordingDate" | "recording_date" => Ok(SortKey::RecordingDate),
            other => Err(Error::UnsupportedOrder(other.to_string())),
        }
    }
}

/// Both total orderings over the indexed ids, each a stable descending sort
/// computed once at build time. Queries filter these sequences; they never
/// re-sort.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Rankings {
    by_satisfaction: Vec<String>,
    by_recording_date: Vec<String>,
}

impl Rankings {
    fn compute(videos: &[IndexedVideo]) -> Self {
        let mut order: Vec<usize> = (0..videos.len()).collect();
        order.sort_by_key(|&i| Reverse(videos[i].satisfaction));
        let by_satisfaction = order.iter().map(|&i| videos[i].object_id.clone()).collect();

        let mut order: Vec<usize> = (0..videos.len()).collect();
        order.sort_by_key(|&i| Reverse(videos[i].recording_date));
        let by_recording_date = order.iter().map(|&i| videos[i].object_id.clone()).collect();

        Self {
            by_satisfaction,
            by_recording_date,
        }
    }

    pub(crate) fn by(&self, sort: SortKey) -> &[String] {
        match sort {
            SortKey::Satisfaction => &self.by_satisfaction,
            SortKey::RecordingDate => &self.by_recording_date,
        }
    }
}

/// The queryable state: one projection per video, two precomputed orderings,
/// the folded text table and the facet aggregates. Immutable once built; a
/// rebuild or reload produces a brand-new value.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub(crate) videos: HashMap<String, IndexedVideo>,
    pub(crate) rankings: Rankings,
    pub(crate) text: TextIndex,
    pub(crate) facets: Facets,
}

impl Index {
    /// Build from a document set. `today` (Unix seconds) is the reference
    /// instant for the facet recency window.
    pub fn build(documents: &[Video], today: i64) -> Index {
        let mut facets = Facets::default();
        let mut text = TextIndex::default();
        let mut videos: HashMap<String, IndexedVideo> = HashMap::with_capacity(documents.len());
        let mut projected = Vec::with_capacity(documents.len());
        for video in documents {
            // objectID is the identity key; a repeated one would land twice
            // in the orderings, so only the first occurrence counts.
            if videos.contains_key(&video.object_id) {
                tracing::warn!(object_id = %video.object_id, "duplicate objectID skipped");
                continue;
            }
            facets.add(video, today);
            text.insert(video);
            let entry = IndexedVideo::project(video);
            videos.insert(entry.object_id.clone(), entry.clone());
            projected.push(entry);
        }
        let rankings = Rankings::compute(&projected);
        tracing::info!(num_docs = videos.len(), "index built");
        Index {
            videos,
            rankings,
            text,
            facets,
        }
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Free-text query: the selected precomputed ordering filtered to the
    /// videos whose searchable text contains the folded query. An empty or
    /// whitespace-only query matches every document.
    pub fn search_text(&self, query: &str, sort: SortKey) -> Vec<IndexedVideo> {
        let folded = fold(query);
        self.rankings
            .by(sort)
            .iter()
            .filter(|id| self.text.matches(id, &folded))
            .filter_map(|id| self.videos.get(id).cloned())
            .collect()
    }

    /// Structured query: the selected precomputed ordering filtered through
    /// the criteria's priority chain.
    pub fn search(&self, criteria: &Criteria, sort: SortKey) -> Vec<IndexedVideo> {
        self.rankings
            .by(sort)
            .iter()
            .filter_map(|id| self.videos.get(id))
            .filter(|video| criteria.accepts(video, |q| self.text.matches(&video.object_id, q)))
            .cloned()
            .collect()
    }

    pub fn list_tags(&self) -> Vec<TagFacet> {
        self.facets.tags()
    }

    pub fn list_speakers(&self) -> Vec<SpeakerFacet> {
        self.facets.speakers()
    }

    pub fn list_channels(&self) -> Vec<ChannelFacet> {
        self.facets.channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_known_names_only() {
        assert_eq!(
            "satisfaction".parse::<SortKey>().unwrap(),
            SortKey::Satisfaction
        );
        assert_eq!(
            "recordingDate".parse::<SortKey>().unwrap(),
            SortKey::RecordingDate
        );
        assert!(matches!(
            "views".parse::<SortKey>(),
            Err(Error::UnsupportedOrder(key)) if key == "views"
        ));
    }

    #[test]
    fn rankings_are_stable_descending() {
        let videos: Vec<IndexedVideo> = [("a", 40, 10), ("b", 85, 5), ("c", 40, 20)]
            .iter()
            .map(|&(id, satisfaction, recorded)| IndexedVideo {
                object_id: id.into(),
                title: String::new(),
                channel_title: String::new(),
                recording_date: recorded,
                satisfaction,
                speaker_handles: vec![],
                tags: vec![],
            })
            .collect();
        let rankings = Rankings::compute(&videos);
        let sat: Vec<&str> = rankings
            .by(SortKey::Satisfaction)
            .iter()
            .map(String::as_str)
            .collect();
        let rec: Vec<&str> = rankings
            .by(SortKey::RecordingDate)
            .iter()
            .map(String::as_str)
            .collect();
        // Equal satisfaction keeps insertion order: a before c.
        assert_eq!(sat, ["b", "a", "c"]);
        assert_eq!(rec, ["c", "a", "b"]);
    }
}
