//! Message Records
//!
//! One recorded session from the message log. Fields are set once by the
//! loader through the `*_from_str` setters, which never fail: bad input
//! leaves the field unset and records a problem for validation to report.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use url::Url;

use crate::access::AccessLevel;
use crate::links::parse_link;
use crate::record::{field, format_medium_date, parse_date, split_list, FieldErrors, RawRecord};

/// Known message types. Anything else is only a warning.
pub const MESSAGE_TYPES: &[&str] = &[
    "C.O.R.E.",
    "Message",
    "Prayer",
    "Q&A",
    "Song",
    "Special Event",
    "Testimony",
    "Training",
    "Word",
];

/// Fields whose string form can fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MessageField {
    Date,
    TrackNumbers,
    AudioLink,
    VideoLink,
    Visibility,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Message {
    title: Option<String>,
    date: Option<NaiveDate>,
    series: Vec<String>,
    track_numbers: Vec<u32>,
    description: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    visibility: Option<AccessLevel>,
    speakers: Vec<String>,
    audio_link: Option<Url>,
    video_link: Option<Url>,
    #[serde(skip)]
    errors: FieldErrors<MessageField>,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a message from a loaded row.
    ///
    /// Recognised fields: `title`, `date`, `series`, `track`, `description`,
    /// `type`, `visibility`, `speakers`, `audio`, `video`.
    pub fn from_record(record: &RawRecord) -> Self {
        let mut message = Self::new();
        message.set_title(field(record, "title").map(str::to_string));
        message.set_date_from_str(field(record, "date"));
        message.set_series_from_str(field(record, "series"));
        message.set_track_numbers_from_str(field(record, "track"));
        message.set_description(field(record, "description").map(str::to_string));
        message.set_kind(field(record, "type").map(str::to_string));
        message.set_visibility_from_str(field(record, "visibility"));
        message.set_speakers_from_str(field(record, "speakers"));
        message.set_audio_link_from_str(field(record, "audio"));
        message.set_video_link_from_str(field(record, "video"));
        message
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<Option<String>>) {
        self.title = title.into();
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
        self.errors.clear(MessageField::Date);
    }

    pub fn set_date_from_str(&mut self, raw: Option<&str>) {
        match raw.map(parse_date) {
            None => self.set_date(None),
            Some(Ok(date)) => self.set_date(Some(date)),
            Some(Err(problem)) => {
                self.date = None;
                self.errors.record(MessageField::Date, problem);
            }
        }
    }

    /// Names of the series this message belongs to, parallel to [`Self::track_numbers`].
    pub fn series(&self) -> &[String] {
        &self.series
    }

    pub fn set_series(&mut self, series: Vec<String>) {
        self.series = series;
    }

    pub fn set_series_from_str(&mut self, raw: Option<&str>) {
        self.set_series(raw.map(split_list).unwrap_or_default());
    }

    pub fn track_numbers(&self) -> &[u32] {
        &self.track_numbers
    }

    pub fn set_track_numbers(&mut self, track_numbers: Vec<u32>) {
        self.track_numbers = track_numbers;
        self.errors.clear(MessageField::TrackNumbers);
    }

    pub fn set_track_numbers_from_str(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else {
            self.set_track_numbers(vec![]);
            return;
        };
        let parsed: Result<Vec<u32>, _> = split_list(raw).iter().map(|t| t.parse::<u32>()).collect();
        match parsed {
            Ok(tracks) => self.set_track_numbers(tracks),
            Err(e) => {
                self.track_numbers = vec![];
                self.errors.record(
                    MessageField::TrackNumbers,
                    format!("unable to parse track numbers '{}': {}", raw, e),
                );
            }
        }
    }

    /// Track number of this message within `series_name`, matched case-insensitively.
    ///
    /// `None` when the message is not in that series. Only aligned
    /// series/track pairs are considered.
    pub fn track_number_in(&self, series_name: &str) -> Option<u32> {
        let wanted = series_name.to_lowercase();
        self.series
            .iter()
            .zip(&self.track_numbers)
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, track)| *track)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<Option<String>>) {
        self.description = description.into();
    }

    /// Message type (`Message`, `Song`, ...).
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, kind: impl Into<Option<String>>) {
        self.kind = kind.into();
    }

    pub fn has_known_kind(&self) -> bool {
        self.kind.as_deref().map_or(true, |k| MESSAGE_TYPES.contains(&k))
    }

    pub fn visibility(&self) -> Option<AccessLevel> {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Option<AccessLevel>) {
        self.visibility = visibility;
        self.errors.clear(MessageField::Visibility);
    }

    pub fn set_visibility_from_str(&mut self, raw: Option<&str>) {
        match raw.map(|label| AccessLevel::parse_label(label, true)) {
            None => self.set_visibility(None),
            Some(Ok(level)) => self.set_visibility(Some(level)),
            Some(Err(e)) => {
                self.visibility = None;
                self.errors.record(MessageField::Visibility, e.to_string());
            }
        }
    }

    pub fn speakers(&self) -> &[String] {
        &self.speakers
    }

    pub fn set_speakers(&mut self, speakers: Vec<String>) {
        self.speakers = speakers;
    }

    pub fn set_speakers_from_str(&mut self, raw: Option<&str>) {
        self.set_speakers(raw.map(split_list).unwrap_or_default());
    }

    pub fn audio_link(&self) -> Option<&Url> {
        self.audio_link.as_ref()
    }

    pub fn set_audio_link(&mut self, link: Option<Url>) {
        self.audio_link = link;
        self.errors.clear(MessageField::AudioLink);
    }

    pub fn set_audio_link_from_str(&mut self, raw: Option<&str>) {
        self.set_link_from_str(MessageField::AudioLink, raw);
    }

    pub fn video_link(&self) -> Option<&Url> {
        self.video_link.as_ref()
    }

    pub fn set_video_link(&mut self, link: Option<Url>) {
        self.video_link = link;
        self.errors.clear(MessageField::VideoLink);
    }

    pub fn set_video_link_from_str(&mut self, raw: Option<&str>) {
        self.set_link_from_str(MessageField::VideoLink, raw);
    }

    fn set_link_from_str(&mut self, which: MessageField, raw: Option<&str>) {
        let (slot, what) = match which {
            MessageField::AudioLink => (&mut self.audio_link, "audio"),
            _ => (&mut self.video_link, "video"),
        };
        match raw.map(|link| parse_link(link, what)) {
            None => {
                *slot = None;
                self.errors.clear(which);
            }
            Some(Ok(url)) => {
                *slot = url;
                self.errors.clear(which);
            }
            Some(Err(problem)) => {
                *slot = None;
                self.errors.record(which, problem);
            }
        }
    }

    /// Deferred problem recorded for `field`, if any.
    pub fn parse_error(&self, field: MessageField) -> Option<&str> {
        self.errors.get(field)
    }

    /// Every deferred problem, in field order.
    pub fn parse_errors(&self) -> Vec<&str> {
        self.errors.iter().map(|(_, problem)| problem).collect()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.date.map(format_medium_date).unwrap_or_default();
        write!(f, "{} ({})", self.title().unwrap_or("(untitled)"), date)
    }
}
