use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The kind of an atomic edit.
///
/// The declaration order doubles as the tie-break when events share a start
/// position, so canonical event lists never depend on discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Deletion,
    Insertion,
    Substitution,
    Wildtype,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Deletion,
        EventKind::Insertion,
        EventKind::Substitution,
        EventKind::Wildtype,
    ];

    pub const INDELS: [EventKind; 2] = [EventKind::Deletion, EventKind::Insertion];

    /// Short code used in motif strings and on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            EventKind::Deletion => "D",
            EventKind::Insertion => "I",
            EventKind::Substitution => "M",
            EventKind::Wildtype => "WT",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for EventKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "D" | "DEL" | "DELETION" => Ok(EventKind::Deletion),
            "I" | "INS" | "INSERTION" => Ok(EventKind::Insertion),
            "M" | "SNV" | "SUBSTITUTION" => Ok(EventKind::Substitution),
            "WT" | "WILDTYPE" => Ok(EventKind::Wildtype),
            _ => Err(ConfigError::InvalidEventKind(s.to_string())),
        }
    }
}

///
/// One atomic change observed in a read, or the wildtype marker.
///
/// Indels span the half-open interval `[start, stop)`; substitutions have
/// `start == stop` and carry the reference and alternate base.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditEvent {
    pub kind: EventKind,
    pub start: u64,
    pub stop: u64,
    pub length: u64,
    pub ref_base: Option<u8>,
    pub alt_base: Option<u8>,
}

impl EditEvent {
    pub fn insertion(position: u64, length: u64) -> Self {
        EditEvent {
            kind: EventKind::Insertion,
            start: position,
            stop: position + length,
            length,
            ref_base: None,
            alt_base: None,
        }
    }

    pub fn deletion(position: u64, length: u64) -> Self {
        EditEvent {
            kind: EventKind::Deletion,
            start: position,
            stop: position + length,
            length,
            ref_base: None,
            alt_base: None,
        }
    }

    pub fn substitution(position: u64, ref_base: u8, alt_base: u8) -> Self {
        EditEvent {
            kind: EventKind::Substitution,
            start: position,
            stop: position,
            length: 1,
            ref_base: Some(ref_base.to_ascii_uppercase()),
            alt_base: Some(alt_base.to_ascii_uppercase()),
        }
    }

    pub fn wildtype(from: u64, to: u64) -> Self {
        EditEvent {
            kind: EventKind::Wildtype,
            start: from,
            stop: to,
            length: to.saturating_sub(from),
            ref_base: None,
            alt_base: None,
        }
    }

    pub fn is_wildtype(&self) -> bool {
        self.kind == EventKind::Wildtype
    }

    pub fn is_indel(&self) -> bool {
        matches!(self.kind, EventKind::Deletion | EventKind::Insertion)
    }

    /// `ref>alt` for substitutions, e.g. `C>T`.
    pub fn nucleotide_change(&self) -> String {
        format!(
            "{}>{}",
            self.ref_base.map(char::from).unwrap_or('N'),
            self.alt_base.map(char::from).unwrap_or('N')
        )
    }

    /// Ordering key used to canonicalize event lists: position first.
    pub fn sort_key(&self) -> (u64, u64, EventKind, Option<u8>) {
        (self.start, self.stop, self.kind, self.alt_base)
    }
}

impl Display for EditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}bp:{}-{}",
            self.kind,
            self.stop.abs_diff(self.start),
            self.start,
            self.stop
        )
    }
}
