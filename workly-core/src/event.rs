//! Scheduled events.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WorklyResult;
use crate::validation::{validate_dates, validate_not_empty};

/// A scheduled item belonging to a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who an event is assigned to: a single calendar member or a whole team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignee {
    Member { user_id: String },
    Team { team_id: String },
}

/// User-supplied event fields, validated before they become an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    pub assignee: Option<Assignee>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        EventDraft {
            title: title.into(),
            description: None,
            start,
            end,
            location: None,
            assignee: None,
        }
    }

    pub fn validate(&self) -> WorklyResult<()> {
        validate_not_empty("Title", &self.title)
            .and(|| validate_dates(&self.start, &self.end))
            .into_result()
    }
}

/// Blank optional text is stored as `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Event {
    pub(crate) fn from_draft(calendar_id: &str, created_by: &str, draft: EventDraft) -> Self {
        let now = Utc::now();
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            calendar_id: calendar_id.to_string(),
            title: draft.title.trim().to_string(),
            description: non_blank(draft.description),
            start: draft.start,
            end: draft.end,
            location: non_blank(draft.location),
            assignee: draft.assignee,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn apply(&mut self, draft: EventDraft) {
        self.title = draft.title.trim().to_string();
        self.description = non_blank(draft.description);
        self.start = draft.start;
        self.end = draft.end;
        self.location = non_blank(draft.location);
        self.assignee = draft.assignee;
        self.updated_at = Utc::now();
    }

    /// The draft that would recreate this event's editable fields.
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            start: self.start,
            end: self.end,
            location: self.location.clone(),
            assignee: self.assignee.clone(),
        }
    }

    /// First and last calendar dates the event occupies in `tz`.
    /// An event ending exactly at midnight does not occupy the following day.
    pub fn date_span<Tz: TimeZone>(&self, tz: &Tz) -> (NaiveDate, NaiveDate) {
        let start = self.start.with_timezone(tz).naive_local();
        let end = self.end.with_timezone(tz).naive_local();

        let first = start.date();
        let mut last = end.date();
        if end > start && end.time() == chrono::NaiveTime::MIN {
            last = last - Days::new(1);
        }
        (first, last.max(first))
    }

    pub fn occurs_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> bool {
        let (first, last) = self.date_span(tz);
        first <= date && date <= last
    }

    /// True if the event intersects `[from, to)`. Zero-length events at
    /// `from` count as overlapping.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start < to && (self.end > from || self.start == from)
    }

    pub fn is_assigned_to_member(&self, user_id: &str) -> bool {
        matches!(&self.assignee, Some(Assignee::Member { user_id: id }) if id == user_id)
    }

    pub fn is_assigned_to_team(&self, team_id: &str) -> bool {
        matches!(&self.assignee, Some(Assignee::Team { team_id: id }) if id == team_id)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
