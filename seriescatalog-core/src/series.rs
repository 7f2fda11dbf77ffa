//! Series Records
//!
//! A named, ordered grouping of messages. The series owns the list of
//! messages resolved for it during reconciliation; the messages themselves
//! are shared with the master catalog.

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::access::{AccessLevel, VisibilityPredicate};
use crate::links::{parse_link, parse_link_list};
use crate::message::Message;
use crate::record::{field, format_medium_date, parse_date, split_list, FieldErrors, RawRecord};

/// Fields whose string form can fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriesField {
    StartDate,
    EndDate,
    MessageCount,
    Visibility,
    CoverArtLink,
    CoverImageLink,
    StudyGuideLinks,
}

#[derive(Debug, Clone, Default)]
pub struct Series {
    id: Option<String>,
    title: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    message_count: Option<u64>,
    speakers: Option<Vec<String>>,
    description: Option<String>,
    visibility: Option<AccessLevel>,
    cover_art_link: Option<Url>,
    cover_image_link: Option<Url>,
    study_guide_links: Option<Vec<Url>>,
    /// `None` until reconciled.
    messages: Option<Vec<Arc<Message>>>,
    errors: FieldErrors<SeriesField>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from a loaded row.
    ///
    /// Recognised fields: `id`, `title`, `start_date`, `end_date`, `messages`,
    /// `speakers`, `description`, `visibility`, `cover_art`, `cover_image`,
    /// `study_guide`.
    pub fn from_record(record: &RawRecord) -> Self {
        let mut series = Self::new();
        series.set_id(field(record, "id").map(str::to_string));
        series.set_title(field(record, "title").map(str::to_string));
        series.set_date_from_str(SeriesField::StartDate, field(record, "start_date"));
        series.set_date_from_str(SeriesField::EndDate, field(record, "end_date"));
        series.set_message_count_from_str(field(record, "messages"));
        if let Some(speakers) = field(record, "speakers") {
            series.set_speakers(Some(split_list(speakers)));
        }
        series.set_description(field(record, "description").map(str::to_string));
        series.set_visibility_from_str(field(record, "visibility"));
        series.set_cover_art_link_from_str(field(record, "cover_art"));
        series.set_cover_image_link_from_str(field(record, "cover_image"));
        series.set_study_guide_links_from_str(field(record, "study_guide"));
        series
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<Option<String>>) {
        self.id = id.into();
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<Option<String>>) {
        self.title = title.into();
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
        self.errors.clear(SeriesField::StartDate);
    }

    /// `None` means the series is ongoing or its end is unknown.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) {
        self.end_date = date;
        self.errors.clear(SeriesField::EndDate);
    }

    pub fn set_start_date_from_str(&mut self, raw: Option<&str>) {
        self.set_date_from_str(SeriesField::StartDate, raw);
    }

    pub fn set_end_date_from_str(&mut self, raw: Option<&str>) {
        self.set_date_from_str(SeriesField::EndDate, raw);
    }

    fn set_date_from_str(&mut self, which: SeriesField, raw: Option<&str>) {
        let slot = match which {
            SeriesField::StartDate => &mut self.start_date,
            _ => &mut self.end_date,
        };
        match raw.map(parse_date) {
            None => {
                *slot = None;
                self.errors.clear(which);
            }
            Some(Ok(date)) => {
                *slot = Some(date);
                self.errors.clear(which);
            }
            Some(Err(problem)) => {
                *slot = None;
                self.errors.record(which, problem);
            }
        }
    }

    /// Declared count if present, else the resolved count once reconciled.
    pub fn message_count(&self) -> Option<u64> {
        self.message_count
            .or_else(|| self.messages.as_ref().map(|m| m.len() as u64))
    }

    pub fn declared_message_count(&self) -> Option<u64> {
        self.message_count
    }

    pub fn set_message_count(&mut self, count: Option<u64>) {
        self.message_count = count;
        self.errors.clear(SeriesField::MessageCount);
    }

    pub fn set_message_count_from_str(&mut self, raw: Option<&str>) {
        match raw.map(|r| r.parse::<u64>().map_err(|e| (r, e))) {
            None => self.set_message_count(None),
            Some(Ok(count)) => self.set_message_count(Some(count)),
            Some(Err((raw, e))) => {
                self.message_count = None;
                self.errors.record(
                    SeriesField::MessageCount,
                    format!("unable to parse message count '{}': {}", raw, e),
                );
            }
        }
    }

    pub fn speakers(&self) -> &[String] {
        self.speakers.as_deref().unwrap_or(&[])
    }

    pub fn set_speakers(&mut self, speakers: Option<Vec<String>>) {
        self.speakers = speakers;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<Option<String>>) {
        self.description = description.into();
    }

    pub fn visibility(&self) -> Option<AccessLevel> {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Option<AccessLevel>) {
        self.visibility = visibility;
        self.errors.clear(SeriesField::Visibility);
    }

    /// Series accept `Public`, `Protected` and `Private` only.
    pub fn set_visibility_from_str(&mut self, raw: Option<&str>) {
        match raw.map(|label| AccessLevel::parse_label(label, false)) {
            None => self.set_visibility(None),
            Some(Ok(level)) => self.set_visibility(Some(level)),
            Some(Err(e)) => {
                self.visibility = None;
                self.errors.record(SeriesField::Visibility, e.to_string());
            }
        }
    }

    pub fn cover_art_link(&self) -> Option<&Url> {
        self.cover_art_link.as_ref()
    }

    pub fn set_cover_art_link(&mut self, link: Option<Url>) {
        self.cover_art_link = link;
        self.errors.clear(SeriesField::CoverArtLink);
    }

    pub fn set_cover_art_link_from_str(&mut self, raw: Option<&str>) {
        self.set_link_from_str(SeriesField::CoverArtLink, raw);
    }

    pub fn cover_image_link(&self) -> Option<&Url> {
        self.cover_image_link.as_ref()
    }

    pub fn set_cover_image_link(&mut self, link: Option<Url>) {
        self.cover_image_link = link;
        self.errors.clear(SeriesField::CoverImageLink);
    }

    pub fn set_cover_image_link_from_str(&mut self, raw: Option<&str>) {
        self.set_link_from_str(SeriesField::CoverImageLink, raw);
    }

    fn set_link_from_str(&mut self, which: SeriesField, raw: Option<&str>) {
        let (slot, what) = match which {
            SeriesField::CoverArtLink => (&mut self.cover_art_link, "cover art"),
            _ => (&mut self.cover_image_link, "cover image"),
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

    pub fn study_guide_links(&self) -> Option<&[Url]> {
        self.study_guide_links.as_deref()
    }

    pub fn set_study_guide_links(&mut self, links: Option<Vec<Url>>) {
        self.study_guide_links = links;
        self.errors.clear(SeriesField::StudyGuideLinks);
    }

    /// Parse a `;`-delimited list of study guide URLs.
    pub fn set_study_guide_links_from_str(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else {
            self.set_study_guide_links(None);
            return;
        };
        let parsed = parse_link_list(raw);
        self.study_guide_links = Some(parsed.links);
        match parsed.error {
            Some(problem) => self.errors.record(SeriesField::StudyGuideLinks, problem),
            None => self.errors.clear(SeriesField::StudyGuideLinks),
        }
    }

    /// Every message matched during reconciliation, regardless of visibility.
    pub fn resolved_messages(&self) -> Option<&[Arc<Message>]> {
        self.messages.as_deref()
    }

    pub fn set_messages(&mut self, messages: Option<Vec<Arc<Message>>>) {
        self.messages = messages;
    }

    pub fn add_message(&mut self, message: Arc<Message>) {
        self.messages.get_or_insert_with(Vec::new).push(message);
    }

    /// The resolved messages the predicate lets through, in track order.
    ///
    /// `None` if the series has not been reconciled.
    pub fn messages(&self, visibility: &dyn VisibilityPredicate) -> Option<Vec<&Message>> {
        self.messages.as_ref().map(|messages| {
            messages
                .iter()
                .map(Arc::as_ref)
                .filter(|m| visibility.is_visible(m.visibility()))
                .collect()
        })
    }

    pub fn parse_error(&self, field: SeriesField) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn parse_errors(&self) -> Vec<&str> {
        self.errors.iter().map(|(_, problem)| problem).collect()
    }
}

impl Serialize for Series {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Series", 11)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("start_date", &self.start_date)?;
        s.serialize_field("end_date", &self.end_date)?;
        s.serialize_field("message_count", &self.message_count())?;
        s.serialize_field("speakers", self.speakers())?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field("visibility", &self.visibility)?;
        s.serialize_field("cover_art_link", &self.cover_art_link)?;
        s.serialize_field("cover_image_link", &self.cover_image_link)?;
        s.serialize_field("study_guide_links", &self.study_guide_links)?;
        s.end()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start_date.map(format_medium_date).unwrap_or_default();
        let end = self.end_date.map(format_medium_date).unwrap_or_default();
        let count = self
            .message_count()
            .map_or_else(|| "unknown".to_string(), |c| c.to_string());
        write!(
            f,
            "{} ({}-{}) {} messages.",
            self.title().unwrap_or("(untitled)"),
            start,
            end,
            count
        )
    }
}
