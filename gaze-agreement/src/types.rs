//! Core types for the gaze agreement library
//!
//! This module defines the labels found in annotation files, the gaze states the
//! engine compares, the raw and normalized mark types, and the error taxonomy.

use std::fmt;

/// Result type for agreement operations
pub type Result<T> = std::result::Result<T, AgreementError>;

/// Millisecond offset from the start of the recording
pub type Millis = u64;

/// Errors that can occur while reading or comparing annotation streams
#[derive(Debug, thiserror::Error)]
pub enum AgreementError {
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("No codingactive mark found")]
    MissingActiveWindow,

    #[error("Active window [{start}, {end}) is empty")]
    EmptyActiveWindow { start: Millis, end: Millis },

    #[error("Stream contains no away/left/right marks")]
    EmptyStream,

    #[error("No known gaze state for window [{start}, {end})")]
    OutOfRange { start: Millis, end: Millis },

    #[error("Base stream never looks left or right inside the active window")]
    NoLeftRightTime,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Label of a single annotation record, taken verbatim from the `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkLabel {
    Away,
    Left,
    Right,
    OutOfFrame,
    CodingActive,
    /// Any other record type; kept so later stages can decide relevance
    Other(String),
}

impl MarkLabel {
    /// The gaze state this label codes for, if it is a real gaze mark
    pub fn gaze_state(&self) -> Option<GazeState> {
        match self {
            MarkLabel::Away => Some(GazeState::Away),
            MarkLabel::Left => Some(GazeState::Left),
            MarkLabel::Right => Some(GazeState::Right),
            _ => None,
        }
    }

    /// True for `away`, `left` and `right`
    pub fn is_real(&self) -> bool {
        self.gaze_state().is_some()
    }
}

impl From<&str> for MarkLabel {
    fn from(s: &str) -> Self {
        match s {
            "away" => MarkLabel::Away,
            "left" => MarkLabel::Left,
            "right" => MarkLabel::Right,
            "outofframe" => MarkLabel::OutOfFrame,
            "codingactive" => MarkLabel::CodingActive,
            other => MarkLabel::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MarkLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkLabel::Away => write!(f, "away"),
            MarkLabel::Left => write!(f, "left"),
            MarkLabel::Right => write!(f, "right"),
            MarkLabel::OutOfFrame => write!(f, "outofframe"),
            MarkLabel::CodingActive => write!(f, "codingactive"),
            MarkLabel::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<GazeState> for MarkLabel {
    fn from(state: GazeState) -> Self {
        match state {
            GazeState::Away => MarkLabel::Away,
            GazeState::Left => MarkLabel::Left,
            GazeState::Right => MarkLabel::Right,
        }
    }
}

/// Per-millisecond gaze state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GazeState {
    Away = 1,
    Left = 2,
    Right = 3,
}

impl GazeState {
    /// Integer code used in looking-state arrays (away=1, left=2, right=3)
    pub fn code(self) -> u8 {
        self as u8
    }

    /// True for left or right
    pub fn is_looking(self) -> bool {
        !matches!(self, GazeState::Away)
    }
}

impl fmt::Display for GazeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        MarkLabel::from(*self).fmt(f)
    }
}

/// One record of an annotation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationMark {
    /// Start of the event in milliseconds
    pub start: Millis,
    /// Duration in milliseconds (only meaningful for `outofframe` and `codingactive`)
    pub duration: Millis,
    /// Record type
    pub label: MarkLabel,
    /// Optional free-text fourth field
    pub note: Option<String>,
}

impl AnnotationMark {
    pub fn new(start: Millis, duration: Millis, label: MarkLabel) -> Self {
        Self {
            start,
            duration,
            label,
            note: None,
        }
    }

    /// End of the interval covered by this mark, saturating at `Millis::MAX`
    pub fn end(&self) -> Millis {
        self.start.saturating_add(self.duration)
    }
}

/// A state change in a normalized stream: from `start` on, the subject looks `state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMark {
    pub start: Millis,
    pub state: GazeState,
}

impl StateMark {
    pub fn new(start: Millis, state: GazeState) -> Self {
        Self { start, state }
    }
}

/// Analysis window `[start, end)` taken from the `codingactive` mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    pub start: Millis,
    pub end: Millis,
}

impl ActiveWindow {
    pub fn duration_ms(&self) -> Millis {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.duration_ms() == 0
    }

    /// Split the window into consecutive blocks of at most `block_size` ms;
    /// the last block ends exactly at `end`
    pub fn blocks(&self, block_size: Millis) -> impl Iterator<Item = (Millis, Millis)> + '_ {
        let step = block_size.max(1);
        (self.start..self.end)
            .step_by(usize::try_from(step).unwrap_or(usize::MAX))
            .map(move |s| (s, s.saturating_add(step).min(self.end)))
    }
}
