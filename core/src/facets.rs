use crate::model::Video;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Age threshold below which a document still counts as "new".
pub const RECENCY_WINDOW_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStats {
    pub total: u32,
    pub new: u32,
}

impl VideoStats {
    fn bump(&mut self, fresh: bool) {
        self.total += 1;
        if fresh {
            self.new += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFacet {
    pub tag: String,
    pub videos: VideoStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerFacet {
    pub twitter: String,
    pub name: String,
    pub videos: VideoStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFacet {
    pub id: String,
    pub title: String,
    pub videos: VideoStats,
}

/// Per-axis aggregates, folded one document at a time while the index is
/// built. Insert-or-increment only; counters never decrease because the
/// index is always rebuilt wholesale.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    tags: HashMap<String, TagFacet>,
    speakers: HashMap<String, SpeakerFacet>,
    channels: HashMap<String, ChannelFacet>,
}

impl Facets {
    /// Register one document under every facet key it references. Recency is
    /// judged on `creationDate`: the age `today - creationDate` must stay
    /// within the window.
    pub fn add(&mut self, video: &Video, today: i64) {
        let fresh = today - video.creation_date <= RECENCY_WINDOW_SECS;
        for tag in &video.tags {
            self.tags
                .entry(tag.clone())
                .or_insert_with(|| TagFacet {
                    tag: tag.clone(),
                    videos: VideoStats::default(),
                })
                .videos
                .bump(fresh);
        }
        for speaker in video.speakers() {
            if speaker.twitter.is_empty() {
                continue;
            }
            self.speakers
                .entry(speaker.twitter.clone())
                .or_insert_with(|| SpeakerFacet {
                    twitter: speaker.twitter.clone(),
                    name: speaker.name.clone(),
                    videos: VideoStats::default(),
                })
                .videos
                .bump(fresh);
        }
        if !video.channel_id.is_empty() {
            self.channels
                .entry(video.channel_id.clone())
                .or_insert_with(|| ChannelFacet {
                    id: video.channel_id.clone(),
                    title: video.channel_title.clone(),
                    videos: VideoStats::default(),
                })
                .videos
                .bump(fresh);
        }
    }

    // Listings sort by new desc, total desc, then the facet key ascending so
    // the order is stable across rebuilds of the same document set.

    pub fn tags(&self) -> Vec<TagFacet> {
        let mut out: Vec<_> = self.tags.values().cloned().collect();
        out.sort_by_key(|f| (Reverse(f.videos.new), Reverse(f.videos.total), f.tag.clone()));
        out
    }

    pub fn speakers(&self) -> Vec<SpeakerFacet> {
        let mut out: Vec<_> = self.speakers.values().cloned().collect();
        out.sort_by_key(|f| (Reverse(f.videos.new), Reverse(f.videos.total), f.twitter.clone()));
        out
    }

    pub fn channels(&self) -> Vec<ChannelFacet> {
        let mut out: Vec<_> = self.channels.values().cloned().collect();
        out.sort_by_key(|f| (Reverse(f.videos.new), Reverse(f.videos.total), f.id.clone()));
        out
    }
}
