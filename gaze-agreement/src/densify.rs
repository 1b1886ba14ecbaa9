//! Densification of normalized marks into per-millisecond gaze states
//!
//! The state at any millisecond is the state of the last mark starting at or before
//! it. Marks that share a start time are applied in list order, so the later one
//! wins.

use crate::normalize::NormalizedMarkList;
use crate::types::{AgreementError, GazeState, Millis, Result, StateMark};

/// One gaze state per millisecond of a requested window
pub type LookingStateArray = Vec<GazeState>;

impl NormalizedMarkList {
    /// Expand the list over `[start, end)`
    pub fn densify(&self, start: Millis, end: Millis) -> Result<LookingStateArray> {
        looking_array(self.marks(), start, end)
    }
}

/// Expand sorted state marks into one state per millisecond of `[start, end)`
///
/// # Errors
/// * `OutOfRange` if no mark starts at or before `start`, or if `end < start`
pub fn looking_array(marks: &[StateMark], start: Millis, end: Millis) -> Result<LookingStateArray> {
    if end < start {
        return Err(AgreementError::OutOfRange { start, end });
    }

    // Marks are sorted, so everything at or before `start` forms a prefix
    let split = marks.partition_point(|m| m.start <= start);
    let mut current = match split.checked_sub(1) {
        Some(index) => marks[index].state,
        None => return Err(AgreementError::OutOfRange { start, end }),
    };

    let mut states = Vec::with_capacity((end - start) as usize);
    let mut filled_to = start;

    for mark in marks[split..].iter().take_while(|m| m.start < end) {
        states.extend(std::iter::repeat(current).take((mark.start - filled_to) as usize));
        current = mark.state;
        filled_to = mark.start;
    }

    states.extend(std::iter::repeat(current).take((end - filled_to) as usize));
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use GazeState::{Away, Left, Right};

    fn marks() -> Vec<StateMark> {
        vec![
            StateMark::new(0, Away),
            StateMark::new(10, Left),
            StateMark::new(15, Right),
            StateMark::new(30, Away),
        ]
    }

    #[test]
    fn test_carry_forward() {
        let states = looking_array(&marks(), 8, 18).unwrap();
        assert_eq!(
            states,
            vec![Away, Away, Left, Left, Left, Left, Left, Right, Right, Right]
        );
    }

    #[test]
    fn test_window_starting_on_mark() {
        let states = looking_array(&marks(), 10, 12).unwrap();
        assert_eq!(states, vec![Left, Left]);
    }

    #[test]
    fn test_window_ending_on_mark() {
        let states = looking_array(&marks(), 12, 15).unwrap();
        assert_eq!(states, vec![Left, Left, Left]);
    }

    #[test]
    fn test_window_past_last_mark() {
        let states = looking_array(&marks(), 100, 105).unwrap();
        assert_eq!(states, vec![Away; 5]);
    }

    #[test]
    fn test_same_start_later_mark_wins() {
        let marks = vec![
            StateMark::new(0, Away),
            StateMark::new(5, Left),
            StateMark::new(5, Right),
        ];
        assert_eq!(looking_array(&marks, 4, 7).unwrap(), vec![Away, Right, Right]);
        assert_eq!(looking_array(&marks, 5, 6).unwrap(), vec![Right]);
    }

    #[test]
    fn test_length_matches_window() {
        let marks = marks();
        for (start, end) in [(0, 0), (0, 1), (3, 31), (14, 16), (29, 1000)] {
            let states = looking_array(&marks, start, end).unwrap();
            assert_eq!(states.len() as u64, end - start);
        }
    }

    #[test]
    fn test_codes() {
        let codes: Vec<u8> = looking_array(&marks(), 9, 16)
            .unwrap()
            .into_iter()
            .map(GazeState::code)
            .collect();
        assert_eq!(codes, vec![1, 2, 2, 2, 2, 2, 3]);
    }

    #[test]
    fn test_out_of_range() {
        let marks = vec![StateMark::new(100, Left)];
        assert!(matches!(
            looking_array(&marks, 50, 150),
            Err(AgreementError::OutOfRange { start: 50, end: 150 })
        ));
        assert!(matches!(
            looking_array(&[], 0, 10),
            Err(AgreementError::OutOfRange { .. })
        ));
        assert!(matches!(
            looking_array(&marks, 200, 150),
            Err(AgreementError::OutOfRange { .. })
        ));
    }
}
