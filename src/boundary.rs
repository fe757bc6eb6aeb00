//! Partition boundary detection.
//!
//! A partition (run) is a maximal contiguous sequence of records sharing the
//! same group value. Boundary detection compares a record's group with the
//! group of its immediate order-predecessor: a differing group, or the
//! absence of a predecessor, starts a new partition.
//!
//! The "no predecessor" case is an explicit [`Option`] rather than a
//! sentinel group value, so the detector stays sound even if the group
//! domain is ever widened.

/// Returns true iff a record with `group` starts a new partition after a
/// predecessor with `previous_group` (`None` for the first record).
///
/// Pure function of its two inputs.
pub fn is_boundary(previous_group: Option<u64>, group: u64) -> bool {
  match previous_group {
    None => true,
    Some(prev) => prev != group,
  }
}

/// Tracks the one-record lookback as a runner advances over the stream.
#[derive(Debug, Clone, Default)]
pub struct BoundaryDetector {
  previous_group: Option<u64>,
}

impl BoundaryDetector {
  /// Creates a detector that has seen no records yet.
  pub fn new() -> Self {
    Self::default()
  }

  /// Consumes the next record's group in stream order and reports whether a
  /// new partition starts at it.
  pub fn advance(&mut self, group: u64) -> bool {
    let restart = is_boundary(self.previous_group, group);
    self.previous_group = Some(group);
    restart
  }

  /// The group of the most recently advanced record, if any.
  pub fn previous_group(&self) -> Option<u64> {
    self.previous_group
  }

  /// Forgets all lookback state, as if no records had been seen.
  pub fn reset(&mut self) {
    self.previous_group = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_first_record_is_boundary() {
    assert!(is_boundary(None, 0));
    assert!(is_boundary(None, 42));
  }

  #[test]
  fn test_same_group_is_not_boundary() {
    assert!(!is_boundary(Some(7), 7));
    assert!(!is_boundary(Some(0), 0));
  }

  #[test]
  fn test_group_change_is_boundary() {
    assert!(is_boundary(Some(0), 1));
    assert!(is_boundary(Some(5), 3));
  }

  #[test]
  fn test_detector_tracks_lookback() {
    let mut detector = BoundaryDetector::new();
    assert_eq!(detector.previous_group(), None);

    assert!(detector.advance(0));
    assert!(!detector.advance(0));
    assert!(detector.advance(1));
    assert!(!detector.advance(1));
    assert!(detector.advance(0));
    assert_eq!(detector.previous_group(), Some(0));
  }

  #[test]
  fn test_detector_reset() {
    let mut detector = BoundaryDetector::new();
    detector.advance(3);
    assert!(!detector.advance(3));

    detector.reset();
    assert_eq!(detector.previous_group(), None);
    // The same group restarts after a reset, exactly like a first record.
    assert!(detector.advance(3));
  }
}
