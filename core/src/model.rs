use serde::{Deserialize, Serialize};

/// A field that source documents write either as a single object or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    /// Identity key within the speaker facet; empty means the speaker
    /// contributes no facet entry.
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub name: String,
}

/// One talk record as it appears in the source `*.json` documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: String,
    #[serde(default)]
    pub featured: bool,
    pub satisfaction: i64,
    pub creation_date: i64,
    pub recording_date: i64,
    #[serde(default)]
    pub speaker: Option<OneOrMany<Speaker>>,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub language: String,
}

impl Video {
    /// Speakers normalized to a list, however the source document wrote them.
    pub fn speakers(&self) -> Vec<&Speaker> {
        match &self.speaker {
            None => Vec::new(),
            Some(OneOrMany::One(speaker)) => vec![speaker],
            Some(OneOrMany::Many(list)) => list.iter().collect(),
        }
    }
}

/// The per-video projection kept in the index: only what querying and
/// display need. Speaker names are not stored here; their text lives in the
/// index's text table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedVideo {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: String,
    pub channel_title: String,
    pub recording_date: i64,
    pub satisfaction: i64,
    pub speaker_handles: Vec<String>,
    pub tags: Vec<String>,
}

impl IndexedVideo {
    pub fn project(video: &Video) -> Self {
        Self {
            object_id: video.object_id.clone(),
            title: video.title.clone(),
            channel_title: video.channel_title.clone(),
            recording_date: video.recording_date,
            satisfaction: video.satisfaction,
            speaker_handles: video
                .speakers()
                .iter()
                .filter(|s| !s.twitter.is_empty())
                .map(|s| s.twitter.clone())
                .collect(),
            tags: video.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_parses_as_object_or_list() {
        let one: Video = serde_json::from_str(
            r#"{"objectID":"a","title":"t","satisfaction":1,"creationDate":0,
                "recordingDate":0,"speaker":{"twitter":"x","name":"X"}}"#,
        )
        .unwrap();
        assert_eq!(one.speakers().len(), 1);

        let many: Video = serde_json::from_str(
            r#"{"objectID":"b","title":"t","satisfaction":1,"creationDate":0,
                "recordingDate":0,
                "speaker":[{"twitter":"x","name":"X"},{"twitter":"y","name":"Y"}]}"#,
        )
        .unwrap();
        assert_eq!(many.speakers().len(), 2);

        let none: Video = serde_json::from_str(
            r#"{"objectID":"c","title":"t","satisfaction":1,"creationDate":0,
                "recordingDate":0}"#,
        )
        .unwrap();
        assert!(none.speakers().is_empty());
    }

    #[test]
    fn projection_drops_handleless_speakers() {
        let video: Video = serde_json::from_str(
            r#"{"objectID":"a","title":"t","satisfaction":1,"creationDate":0,
                "recordingDate":0,
                "speaker":[{"twitter":"","name":"Anon"},{"twitter":"y","name":"Y"}]}"#,
        )
        .unwrap();
        let projected = IndexedVideo::project(&video);
        assert_eq!(projected.speaker_handles, vec!["y".to_string()]);
    }
}
