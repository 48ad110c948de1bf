//! Quiz scoring.

/// Count answers equal to the expected ones, ignoring case.
///
/// Answers are compared position by position; callers check the lengths.
pub fn count_correct_answers(submitted: &[String], expected: &[String]) -> u32 {
    submitted
        .iter()
        .zip(expected)
        .filter(|(given, wanted)| given.to_lowercase() == wanted.to_lowercase())
        .count() as u32
}
