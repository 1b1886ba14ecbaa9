//! Agreement calculation between two annotation streams
//!
//! The base stream defines the active window. Both streams are normalized once and
//! then densified block by block, so memory stays proportional to the block size
//! rather than the length of the recording.

use crate::config::AgreementConfig;
use crate::normalize::{normalize, NormalizedMarkList};
use crate::parser::AnnotationStream;
use crate::types::{ActiveWindow, AgreementError, Millis, Result};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Agreement between a base and a comparison stream over the base's active window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgreementStats {
    /// Fraction of milliseconds where both streams report the same state
    pub raw_agreement: f64,
    /// Length of the active window in milliseconds
    pub total_time_ms: Millis,
    /// Fraction of left/right milliseconds (per the base stream) that agree
    pub lr_agreement: f64,
    /// Milliseconds where the base stream reports left or right
    pub lr_total_time_ms: Millis,
    /// Milliseconds where both streams agree
    pub agree_ms: Millis,
    /// Left/right milliseconds where both streams agree
    pub lr_agree_ms: Millis,
}

impl fmt::Display for AgreementStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total time coded: {} ms", self.total_time_ms)?;
        writeln!(f, "Agreement: {:.2}%", self.raw_agreement * 100.0)?;
        writeln!(f, "Left/right time coded: {} ms", self.lr_total_time_ms)?;
        write!(f, "Left/right agreement: {:.2}%", self.lr_agreement * 100.0)
    }
}

/// Running agreement counts
#[derive(Debug, Default)]
struct Tally {
    agree: Millis,
    lr_agree: Millis,
    lr_total: Millis,
}

impl Tally {
    fn add_block(
        &mut self,
        base: &NormalizedMarkList,
        other: &NormalizedMarkList,
        start: Millis,
        end: Millis,
    ) -> Result<()> {
        let base_states = base.densify(start, end)?;
        let other_states = other.densify(start, end)?;

        for (b, o) in base_states.iter().zip(&other_states) {
            let agree = b == o;
            if agree {
                self.agree += 1;
            }
            if b.is_looking() {
                self.lr_total += 1;
                if agree {
                    self.lr_agree += 1;
                }
            }
        }

        Ok(())
    }
}

/// Compare two normalized streams over `window`
pub fn compare_normalized(
    base: &NormalizedMarkList,
    comparison: &NormalizedMarkList,
    window: ActiveWindow,
    config: &AgreementConfig,
) -> Result<AgreementStats> {
    config.validate()?;

    if window.is_empty() {
        return Err(AgreementError::EmptyActiveWindow {
            start: window.start,
            end: window.end,
        });
    }

    let mut tally = Tally::default();
    for (start, end) in window.blocks(config.block_size_ms) {
        tally.add_block(base, comparison, start, end)?;
    }

    let total_time_ms = window.duration_ms();
    log::debug!(
        "Agreeing on {} of {} ms ({} of {} ms left/right)",
        tally.agree,
        total_time_ms,
        tally.lr_agree,
        tally.lr_total
    );

    if tally.lr_total == 0 {
        return Err(AgreementError::NoLeftRightTime);
    }

    Ok(AgreementStats {
        raw_agreement: tally.agree as f64 / total_time_ms as f64,
        total_time_ms,
        lr_agreement: tally.lr_agree as f64 / tally.lr_total as f64,
        lr_total_time_ms: tally.lr_total,
        agree_ms: tally.agree,
        lr_agree_ms: tally.lr_agree,
    })
}

/// Compare two parsed annotation streams
///
/// The active window comes from the base stream's `codingactive` mark; the
/// comparison stream's own window, if any, is ignored.
pub fn compare_streams(
    base: &AnnotationStream,
    comparison: &AnnotationStream,
    config: &AgreementConfig,
) -> Result<AgreementStats> {
    let window = base.active_window()?;
    let base_marks = normalize(base)?;
    let comparison_marks = normalize(comparison)?;

    compare_normalized(&base_marks, &comparison_marks, window, config)
}

/// Parse two annotation files and compare them
///
/// # Example
/// ```no_run
/// use gaze_agreement::{compare_files, AgreementConfig};
/// use std::path::Path;
///
/// let stats = compare_files(
///     Path::new("coding/human/session1.txt"),
///     Path::new("coding/auto/session1.txt"),
///     &AgreementConfig::new(),
/// )
/// .unwrap();
/// println!("{}", stats);
/// ```
pub fn compare_files(
    base: &Path,
    comparison: &Path,
    config: &AgreementConfig,
) -> Result<AgreementStats> {
    let base_stream = AnnotationStream::from_file(base, config.header_lines)?;
    let comparison_stream = AnnotationStream::from_file(comparison, config.header_lines)?;

    let stats = compare_streams(&base_stream, &comparison_stream, config)?;
    log::info!(
        "{:?} vs {:?}: {:.2}% agreement over {} ms",
        base,
        comparison,
        stats.raw_agreement * 100.0,
        stats.total_time_ms
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnnotationMark, MarkLabel};

    fn stream(marks: &[(Millis, Millis, &str)]) -> AnnotationStream {
        marks
            .iter()
            .map(|&(start, duration, label)| {
                AnnotationMark::new(start, duration, MarkLabel::from(label))
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn base() -> AnnotationStream {
        stream(&[
            (0, 5000, "codingactive"),
            (0, 0, "away"),
            (1000, 0, "left"),
            (3000, 0, "right"),
        ])
    }

    #[test]
    fn test_self_agreement() {
        let stats = compare_streams(&base(), &base(), &AgreementConfig::new()).unwrap();

        assert_eq!(stats.raw_agreement, 1.0);
        assert_eq!(stats.total_time_ms, 5000);
        assert_eq!(stats.lr_agreement, 1.0);
        assert_eq!(stats.lr_total_time_ms, 4000);
    }

    #[test]
    fn test_out_of_frame_in_base() {
        let mut marks = base().marks().to_vec();
        marks.push(AnnotationMark::new(2000, 500, MarkLabel::OutOfFrame));
        let with_gap = AnnotationStream::from_marks(marks);

        let list = normalize(&with_gap).unwrap();
        let states = list.densify(1900, 2600).unwrap();
        assert!(states[100..600].iter().all(|s| *s == crate::GazeState::Away));
        assert!(states[600..].iter().all(|s| *s == crate::GazeState::Left));

        let stats = compare_streams(&with_gap, &base(), &AgreementConfig::new()).unwrap();
        assert_eq!(stats.agree_ms, 4500);
        assert_eq!(stats.raw_agreement, 0.9);
        assert_eq!(stats.lr_total_time_ms, 3500);
        assert_eq!(stats.lr_agreement, 1.0);
    }

    #[test]
    fn test_partial_agreement() {
        let other = stream(&[(0, 0, "away"), (1500, 0, "left"), (3000, 0, "left")]);
        let stats = compare_streams(&base(), &other, &AgreementConfig::new()).unwrap();

        // Disagree on 1000..1500 (left vs away) and 3000..5000 (right vs left)
        assert_eq!(stats.agree_ms, 2500);
        assert_eq!(stats.raw_agreement, 0.5);
        assert_eq!(stats.lr_agree_ms, 1500);
        assert_eq!(stats.lr_agreement, 1500.0 / 4000.0);
    }

    #[test]
    fn test_block_size_does_not_change_result() {
        let other = stream(&[(0, 0, "left"), (2222, 0, "right"), (4100, 0, "away")]);
        let reference = compare_streams(&base(), &other, &AgreementConfig::new()).unwrap();

        for block in [1, 7, 333, 5000, 10_000] {
            let config = AgreementConfig::new().with_block_size(block);
            assert_eq!(compare_streams(&base(), &other, &config).unwrap(), reference);
        }
    }

    #[test]
    fn test_window_not_at_zero() {
        let base = stream(&[(1500, 2000, "codingactive"), (0, 0, "left")]);
        let other = stream(&[(2500, 0, "left")]);
        let stats = compare_streams(&base, &other, &AgreementConfig::new()).unwrap();

        assert_eq!(stats.total_time_ms, 2000);
        assert_eq!(stats.agree_ms, 1000);
        assert_eq!(stats.lr_total_time_ms, 2000);
        assert_eq!(stats.lr_agreement, 0.5);
    }

    #[test]
    fn test_no_left_right_time() {
        let base = stream(&[(0, 1000, "codingactive"), (0, 0, "away")]);
        assert!(matches!(
            compare_streams(&base, &base, &AgreementConfig::new()),
            Err(AgreementError::NoLeftRightTime)
        ));
    }

    #[test]
    fn test_empty_window() {
        let base = stream(&[(500, 0, "codingactive"), (0, 0, "left")]);
        assert!(matches!(
            compare_streams(&base, &base, &AgreementConfig::new()),
            Err(AgreementError::EmptyActiveWindow { start: 500, end: 500 })
        ));
    }

    #[test]
    fn test_comparison_without_gaze_marks() {
        let other = stream(&[(0, 5000, "codingactive")]);
        assert!(matches!(
            compare_streams(&base(), &other, &AgreementConfig::new()),
            Err(AgreementError::EmptyStream)
        ));
    }

    #[test]
    fn test_missing_window_in_base() {
        let base = stream(&[(0, 0, "left")]);
        assert!(matches!(
            compare_streams(&base, &base, &AgreementConfig::new()),
            Err(AgreementError::MissingActiveWindow)
        ));
    }

    #[test]
    fn test_display() {
        let stats = compare_streams(&base(), &base(), &AgreementConfig::new()).unwrap();
        let text = stats.to_string();
        assert!(text.contains("Total time coded: 5000 ms"));
        assert!(text.contains("Agreement: 100.00%"));
    }
}
