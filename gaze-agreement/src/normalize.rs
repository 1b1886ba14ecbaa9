//! Stream normalization
//!
//! Turns the raw records of an annotation file into a sorted list of gaze state
//! changes that starts at 0 ms and only contains `away`, `left` and `right`.
//!
//! Out-of-frame intervals are folded in as follows:
//! - the state is `away` from the start of the interval,
//! - every gaze mark starting inside the interval is dropped,
//! - at the end of the interval the state returns to the last gaze mark coded
//!   before that end. The restore mark is placed after any mark coded at the same
//!   time, so it wins ties; a zero-length interval therefore resets the state to
//!   the last mark coded strictly before it.
//!
//! All intervals are evaluated against the same sorted snapshot and collected into
//! a [`ChangeSet`] before anything is applied, so the result does not depend on the
//! order in which intervals appear. Where intervals overlap or touch, the covered
//! time is the union of the intervals: a restore point that falls inside another
//! out-of-frame interval is discarded.

use crate::parser::AnnotationStream;
use crate::types::{
    AgreementError, AnnotationMark, GazeState, MarkLabel, Millis, Result, StateMark,
};

/// Sorted gaze state changes, guaranteed to start at 0 ms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMarkList {
    marks: Vec<StateMark>,
}

impl NormalizedMarkList {
    pub fn marks(&self) -> &[StateMark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Always false for a list produced by [`normalize`]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Express the list as annotation records again (zero-duration gaze marks)
    pub fn to_stream(&self) -> AnnotationStream {
        self.marks
            .iter()
            .map(|m| AnnotationMark::new(m.start, 0, MarkLabel::from(m.state)))
            .collect::<Vec<_>>()
            .into()
    }
}

/// Out-of-frame interval `[start, end)`
#[derive(Debug, Clone, Copy)]
struct OutOfFrame {
    start: Millis,
    end: Millis,
}

impl OutOfFrame {
    fn contains(&self, ms: Millis) -> bool {
        self.start <= ms && ms < self.end
    }
}

/// Structural edits derived from the out-of-frame intervals
#[derive(Debug, Default)]
struct ChangeSet {
    /// One flag per baseline mark; set when the mark must be dropped
    removed: Vec<bool>,
    /// `away` marks at the start of each interval
    away_marks: Vec<StateMark>,
    /// Restored states at the end of each interval, unless another interval
    /// covers that point
    restore_marks: Vec<StateMark>,
}

impl ChangeSet {
    fn collect(baseline: &[StateMark], intervals: &[OutOfFrame]) -> Self {
        let mut changes = ChangeSet {
            removed: vec![false; baseline.len()],
            ..Default::default()
        };

        for interval in intervals {
            for (index, mark) in baseline.iter().enumerate() {
                if interval.contains(mark.start) {
                    changes.removed[index] = true;
                }
            }

            changes
                .away_marks
                .push(StateMark::new(interval.start, GazeState::Away));

            let restored = baseline
                .iter()
                .rev()
                .find(|m| m.start < interval.end)
                .map(|m| m.state)
                .unwrap_or(GazeState::Away);

            let covered = intervals.iter().any(|other| other.contains(interval.end));

            if covered {
                log::debug!(
                    "Restore point at {} ms lies inside another out-of-frame interval",
                    interval.end
                );
            } else {
                changes
                    .restore_marks
                    .push(StateMark::new(interval.end, restored));
            }
        }

        changes
    }

    fn apply(self, baseline: Vec<StateMark>) -> Vec<StateMark> {
        let mut marks: Vec<StateMark> = baseline
            .into_iter()
            .zip(self.removed)
            .filter_map(|(mark, removed)| (!removed).then_some(mark))
            .collect();

        // Stable sort: restore marks stay last among marks sharing a start
        marks.extend(self.away_marks);
        marks.extend(self.restore_marks);
        marks.sort_by_key(|m| m.start);
        marks
    }
}

/// Normalize an annotation stream into a [`NormalizedMarkList`]
pub fn normalize(stream: &AnnotationStream) -> Result<NormalizedMarkList> {
    let mut sorted: Vec<&AnnotationMark> = stream.marks().iter().collect();
    sorted.sort_by_key(|m| m.start);

    let mut baseline: Vec<StateMark> = sorted
        .iter()
        .filter_map(|m| m.label.gaze_state().map(|state| StateMark::new(m.start, state)))
        .collect();

    let first = baseline.first().ok_or(AgreementError::EmptyStream)?;
    if first.start != 0 {
        log::debug!(
            "First gaze mark at {} ms; assuming away from 0 ms",
            first.start
        );
        baseline.insert(0, StateMark::new(0, GazeState::Away));
    }

    let intervals: Vec<OutOfFrame> = sorted
        .iter()
        .filter(|m| m.label == MarkLabel::OutOfFrame)
        .map(|m| OutOfFrame {
            start: m.start,
            end: m.end(),
        })
        .collect();

    let marks = if intervals.is_empty() {
        baseline
    } else {
        log::debug!("Folding {} out-of-frame intervals into away", intervals.len());
        ChangeSet::collect(&baseline, &intervals).apply(baseline)
    };

    Ok(NormalizedMarkList { marks })
}
