use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{Duration, NaiveDate, NaiveTime};

use crate::roster::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Internal,
    Match,
    Training,
}

impl FromStr for SessionKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "internal" | "internal game" => Ok(SessionKind::Internal),
            "match" | "a-match" | "friendly" => Ok(SessionKind::Match),
            "training" => Ok(SessionKind::Training),
            _ => bail!("unknown session kind {raw:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Upcoming,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpStatus {
    Attending,
    Attended,
    Pending,
    NotAttending,
}

impl RsvpStatus {
    /// Counts toward the attendance figure of a session.
    pub fn is_present(self) -> bool {
        matches!(self, RsvpStatus::Attending | RsvpStatus::Attended)
    }

    pub fn cycle(self) -> Self {
        match self {
            RsvpStatus::Pending => RsvpStatus::Attending,
            RsvpStatus::Attending => RsvpStatus::NotAttending,
            RsvpStatus::NotAttending => RsvpStatus::Pending,
            RsvpStatus::Attended => RsvpStatus::Attended,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attendee {
    pub name: String,
    pub status: RsvpStatus,
    pub position: Position,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: u32,
    pub title: String,
    pub kind: SessionKind,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub gather: NaiveTime,
    pub location: String,
    pub quarter_minutes: u16,
    pub rest_minutes: u16,
    pub status: SessionStatus,
    pub attendees: Vec<Attendee>,
    pub description: String,
}

impl Session {
    pub fn attendance(&self) -> AttendanceSummary {
        attendance_stats(&self.attendees)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub attending: usize,
    pub total: usize,
    pub percentage: u32,
}

pub fn attendance_stats(attendees: &[Attendee]) -> AttendanceSummary {
    let attending = attendees.iter().filter(|a| a.status.is_present()).count();
    let total = attendees.len();
    let percentage = if total == 0 {
        0
    } else {
        ((attending as f64 / total as f64) * 100.0).round() as u32
    };
    AttendanceSummary {
        attending,
        total,
        percentage,
    }
}

/// Raw form input for a new session; dates and times are still text.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: String,
    pub kind: SessionKind,
    pub date: String,
    pub start: String,
    pub gather: String,
    pub location: String,
    pub quarter_minutes: u16,
    pub rest_minutes: u16,
    pub description: String,
}

impl Default for NewSession {
    fn default() -> Self {
        Self {
            title: String::new(),
            kind: SessionKind::Internal,
            date: String::new(),
            start: String::new(),
            gather: String::new(),
            location: String::new(),
            quarter_minutes: 20,
            rest_minutes: 10,
            description: String::new(),
        }
    }
}

const DEFAULT_GATHER_LEAD_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct Schedule {
    sessions: Vec<Session>,
    next_id: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Schedule {
    pub fn new(sessions: Vec<Session>) -> Self {
        let next_id = sessions.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self { sessions, next_id }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn get(&self, id: u32) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn add_session(&mut self, draft: NewSession) -> Result<u32> {
        let title = draft.title.trim();
        if title.is_empty() {
            bail!("session title is required");
        }
        if draft.date.trim().is_empty() {
            bail!("session date is required");
        }
        if draft.start.trim().is_empty() {
            bail!("session start time is required");
        }
        let date = NaiveDate::parse_from_str(draft.date.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date {:?}", draft.date))?;
        let start = parse_clock(&draft.start)?;
        let gather = if draft.gather.trim().is_empty() {
            // Kickoffs just after midnight gather at midnight, not the day before.
            let (lead, wrapped) =
                start.overflowing_sub_signed(Duration::minutes(DEFAULT_GATHER_LEAD_MINUTES));
            if wrapped != 0 { NaiveTime::MIN } else { lead }
        } else {
            let gather = parse_clock(&draft.gather)?;
            if gather > start {
                bail!("gather time {gather} is after start time {start}");
            }
            gather
        };

        let id = self.next_id;
        self.next_id += 1;
        self.sessions.push(Session {
            id,
            title: title.to_string(),
            kind: draft.kind,
            date,
            start,
            gather,
            location: draft.location.trim().to_string(),
            quarter_minutes: draft.quarter_minutes,
            rest_minutes: draft.rest_minutes,
            status: SessionStatus::Upcoming,
            attendees: Vec::new(),
            description: draft.description.trim().to_string(),
        });
        Ok(id)
    }

    /// Updates an existing attendee's reply. Returns false when the session
    /// or the attendee is unknown.
    pub fn set_rsvp(&mut self, session_id: u32, name: &str, status: RsvpStatus) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            return false;
        };
        match session.attendees.iter_mut().find(|a| a.name == name) {
            Some(attendee) => {
                attendee.status = status;
                true
            }
            None => false,
        }
    }

    pub fn mark_completed(&mut self, session_id: u32) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            return false;
        };
        session.status = SessionStatus::Completed;
        for attendee in &mut session.attendees {
            if attendee.status == RsvpStatus::Attending {
                attendee.status = RsvpStatus::Attended;
            }
        }
        true
    }

    /// Upcoming sessions ordered by date, then start time.
    pub fn upcoming(&self) -> Vec<&Session> {
        let mut out: Vec<&Session> = self
            .sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Upcoming)
            .collect();
        out.sort_by(|a, b| a.date.cmp(&b.date).then(a.start.cmp(&b.start)));
        out
    }

    pub fn next_session(&self, today: NaiveDate) -> Option<&Session> {
        self.upcoming().into_iter().find(|s| s.date >= today)
    }
}

fn parse_clock(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("invalid time {raw:?}, expected HH:MM"))
}

pub fn kind_label(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Internal => "Internal",
        SessionKind::Match => "A-Match",
        SessionKind::Training => "Training",
    }
}

pub fn rsvp_label(status: RsvpStatus) -> &'static str {
    match status {
        RsvpStatus::Attending => "Attending",
        RsvpStatus::Attended => "Attended",
        RsvpStatus::Pending => "Pending",
        RsvpStatus::NotAttending => "Absent",
    }
}
