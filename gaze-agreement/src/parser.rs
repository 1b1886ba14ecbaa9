//! Annotation file parser
//!
//! Annotation files start with a fixed number of header lines, followed by one
//! record per line:
//!
//! ```text
//! start,duration,type[,mark]
//! ```
//!
//! `start` and `duration` are non-negative integer milliseconds. `type` is kept
//! verbatim; unknown types survive parsing and are ignored by later stages.

use crate::types::{ActiveWindow, AgreementError, AnnotationMark, MarkLabel, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// All records of one annotation file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationStream {
    marks: Vec<AnnotationMark>,
}

impl AnnotationStream {
    /// Build a stream from marks already in memory
    pub fn from_marks(marks: Vec<AnnotationMark>) -> Self {
        Self { marks }
    }

    /// Parse an annotation file from disk
    pub fn from_file(path: &Path, header_lines: usize) -> Result<Self> {
        log::info!("Parsing annotation file: {:?}", path);

        let file = File::open(path)?;
        let stream = Self::from_reader(BufReader::new(file), header_lines)?;

        log::debug!("Read {} marks from {:?}", stream.len(), path);
        Ok(stream)
    }

    /// Parse annotation text from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R, header_lines: usize) -> Result<Self> {
        let mut marks = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;

            if index < header_lines {
                continue;
            }
            if line.trim().is_empty() {
                log::trace!("Skipping blank line {}", line_no);
                continue;
            }

            marks.push(parse_record(&line, line_no)?);
        }

        Ok(Self { marks })
    }

    /// Parse annotation text held in a string
    pub fn parse_str(text: &str, header_lines: usize) -> Result<Self> {
        Self::from_reader(text.as_bytes(), header_lines)
    }

    pub fn marks(&self) -> &[AnnotationMark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Locate the analysis window from the first `codingactive` mark
    pub fn active_window(&self) -> Result<ActiveWindow> {
        let mut active = self
            .marks
            .iter()
            .filter(|m| m.label == MarkLabel::CodingActive);

        let first = active.next().ok_or(AgreementError::MissingActiveWindow)?;

        let extra = active.count();
        if extra > 0 {
            log::warn!(
                "Found {} additional codingactive marks; using the one at {} ms",
                extra,
                first.start
            );
        }

        Ok(ActiveWindow {
            start: first.start,
            end: first.end(),
        })
    }
}

impl From<Vec<AnnotationMark>> for AnnotationStream {
    fn from(marks: Vec<AnnotationMark>) -> Self {
        Self::from_marks(marks)
    }
}

/// Parse one `start,duration,type[,mark]` record
fn parse_record(line: &str, line_no: usize) -> Result<AnnotationMark> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();

    if fields.len() < 3 {
        return Err(AgreementError::MalformedRecord {
            line: line_no,
            reason: format!("expected at least 3 fields, found {}", fields.len()),
        });
    }

    let start = parse_millis(fields[0], "start", line_no)?;
    let duration = parse_millis(fields[1], "duration", line_no)?;
    if start.checked_add(duration).is_none() {
        return Err(AgreementError::MalformedRecord {
            line: line_no,
            reason: format!("start {} plus duration {} overflows", start, duration),
        });
    }
    let label = MarkLabel::from(fields[2]);
    let note = fields
        .get(3)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok(AnnotationMark {
        start,
        duration,
        label,
        note,
    })
}

fn parse_millis(field: &str, name: &str, line_no: usize) -> Result<u64> {
    field
        .parse::<u64>()
        .map_err(|e| AgreementError::MalformedRecord {
            line: line_no,
            reason: format!("{} '{}' is not a non-negative integer: {}", name, field, e),
        })
}
