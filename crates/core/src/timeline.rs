//! Timeline — tracks of time-spanned asset placements.

use crate::error::StateError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a track holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

/// A single placement of an asset on a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    pub asset_id: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds; always greater than `start`
    pub end: f64,
}

/// An ordered lane of timeline items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub kind: TrackKind,
    /// Items sorted by `start`
    pub items: Vec<TimelineItem>,
}

/// The project timeline: a set of tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub tracks: Vec<Track>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track, returning its ID.
    pub fn add_track(&mut self, name: impl Into<String>, kind: TrackKind) -> String {
        let track = Track {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            items: Vec::new(),
        };
        let id = track.id.clone();
        self.tracks.push(track);
        id
    }

    /// Place an asset on a track. The span must satisfy `start < end`.
    /// Items within the track stay sorted by start time.
    pub fn place_item(
        &mut self,
        track_id: &str,
        asset_id: impl Into<String>,
        start: f64,
        end: f64,
    ) -> Result<String, StateError> {
        if start >= end {
            return Err(StateError::InvalidSpan { start, end });
        }
        let track = self.track_mut(track_id)?;
        let item = TimelineItem {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.into(),
            start,
            end,
        };
        let id = item.id.clone();
        let at = track
            .items
            .partition_point(|existing| existing.start <= start);
        track.items.insert(at, item);
        Ok(id)
    }

    /// Remove an item from whichever track holds it.
    pub fn remove_item(&mut self, item_id: &str) -> Result<(), StateError> {
        for track in &mut self.tracks {
            let len_before = track.items.len();
            track.items.retain(|i| i.id != item_id);
            if track.items.len() < len_before {
                return Ok(());
            }
        }
        Err(StateError::UnknownItem(item_id.into()))
    }

    pub fn track(&self, track_id: &str) -> Result<&Track, StateError> {
        self.tracks
            .iter()
            .find(|t| t.id == track_id)
            .ok_or_else(|| StateError::UnknownTrack(track_id.into()))
    }

    fn track_mut(&mut self, track_id: &str) -> Result<&mut Track, StateError> {
        self.tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .ok_or_else(|| StateError::UnknownTrack(track_id.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_keeps_items_sorted() {
        let mut timeline = Timeline::new();
        let track = timeline.add_track("Picture", TrackKind::Video);
        timeline.place_item(&track, "b", 10.0, 12.0).unwrap();
        timeline.place_item(&track, "a", 2.0, 4.0).unwrap();
        timeline.place_item(&track, "c", 6.0, 8.0).unwrap();

        let starts: Vec<f64> = timeline
            .track(&track)
            .unwrap()
            .items
            .iter()
            .map(|i| i.start)
            .collect();
        assert_eq!(starts, vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn inverted_span_rejected() {
        let mut timeline = Timeline::new();
        let track = timeline.add_track("Picture", TrackKind::Video);
        let err = timeline.place_item(&track, "a", 5.0, 5.0).unwrap_err();
        assert!(matches!(err, StateError::InvalidSpan { .. }));
    }

    #[test]
    fn unknown_track_rejected() {
        let mut timeline = Timeline::new();
        let err = timeline.place_item("nope", "a", 0.0, 1.0).unwrap_err();
        assert_eq!(err, StateError::UnknownTrack("nope".into()));
    }

    #[test]
    fn remove_item_searches_all_tracks() {
        let mut timeline = Timeline::new();
        timeline.add_track("Picture", TrackKind::Video);
        let audio = timeline.add_track("Sound", TrackKind::Audio);
        let item = timeline.place_item(&audio, "a", 0.0, 3.0).unwrap();

        timeline.remove_item(&item).unwrap();
        assert!(timeline.track(&audio).unwrap().items.is_empty());
        assert!(matches!(
            timeline.remove_item(&item),
            Err(StateError::UnknownItem(_))
        ));
    }
}
