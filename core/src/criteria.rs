use crate::model::IndexedVideo;
use crate::normalize::fold;
use std::collections::HashSet;

/// Structured query: independent optional predicates over the index.
///
/// Acceptance is a priority chain, not a conjunction: exclusion always wins,
/// then the highest-priority positive predicate that is set decides on its
/// own (free text, then channel, then speaker, then id). Setting two
/// positive predicates silently ignores the lower-priority one; with none
/// set, every document is accepted.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    ids: Option<HashSet<String>>,
    speakers: Option<HashSet<String>>,
    channels: Option<HashSet<String>>,
    fts: Option<String>,
    excluded: HashSet<String>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Limit by speaker handle.
    pub fn limit_speakers<I, S>(mut self, handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.speakers = Some(handles.into_iter().map(Into::into).collect());
        self
    }

    /// Limit by channel title.
    pub fn limit_channels<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channels = Some(titles.into_iter().map(Into::into).collect());
        self
    }

    /// Limit by free text; the query is folded once here.
    pub fn limit_fts(mut self, query: impl AsRef<str>) -> Self {
        self.fts = Some(fold(query.as_ref()));
        self
    }

    pub fn exclude_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(ids.into_iter().map(Into::into));
        self
    }

    pub(crate) fn accepts(
        &self,
        video: &IndexedVideo,
        text_match: impl Fn(&str) -> bool,
    ) -> bool {
        if self.excluded.contains(&video.object_id) {
            return false;
        }
        if let Some(query) = &self.fts {
            return text_match(query);
        }
        if let Some(channels) = &self.channels {
            return channels.contains(&video.channel_title);
        }
        if let Some(speakers) = &self.speakers {
            return video.speaker_handles.iter().any(|h| speakers.contains(h));
        }
        if let Some(ids) = &self.ids {
            return ids.contains(&video.object_id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, channel: &str, handle: &str) -> IndexedVideo {
        IndexedVideo {
            object_id: id.into(),
            title: "t".into(),
            channel_title: channel.into(),
            recording_date: 0,
            satisfaction: 0,
            speaker_handles: vec![handle.into()],
            tags: vec![],
        }
    }

    fn no_text(_: &str) -> bool {
        false
    }

    #[test]
    fn empty_criteria_accepts_everything() {
        assert!(Criteria::new().accepts(&video("a", "c", "s"), no_text));
    }

    #[test]
    fn exclusion_beats_every_positive_predicate() {
        let criteria = Criteria::new()
            .limit_ids(["a"])
            .limit_channels(["c"])
            .exclude_ids(["a"]);
        assert!(!criteria.accepts(&video("a", "c", "s"), |_| true));
    }

    #[test]
    fn channel_predicate_shadows_speaker_predicate() {
        // Priority chain: once the channel predicate is set, the speaker
        // predicate no longer participates.
        let criteria = Criteria::new()
            .limit_channels(["right channel"])
            .limit_speakers(["nobody"]);
        assert!(criteria.accepts(&video("a", "right channel", "someone"), no_text));
        assert!(!criteria.accepts(&video("b", "other channel", "nobody"), no_text));
    }

    #[test]
    fn fts_predicate_shadows_all_others() {
        let criteria = Criteria::new()
            .limit_fts("Query")
            .limit_channels(["nope"]);
        assert!(criteria.accepts(&video("a", "c", "s"), |q| q == "query"));
        assert!(!criteria.accepts(&video("a", "c", "s"), no_text));
    }

    #[test]
    fn speaker_and_id_predicates() {
        let by_speaker = Criteria::new().limit_speakers(["jdoe"]);
        assert!(by_speaker.accepts(&video("a", "c", "jdoe"), no_text));
        assert!(!by_speaker.accepts(&video("b", "c", "other"), no_text));

        let by_id = Criteria::new().limit_ids(["a"]);
        assert!(by_id.accepts(&video("a", "c", "s"), no_text));
        assert!(!by_id.accepts(&video("b", "c", "s"), no_text));
    }
}
