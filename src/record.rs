//! Record and result types for the running-aggregation pipeline.
//!
//! A [`Record`] is the unit of input: immutable once ingested, consumed
//! exactly once, ordered by its `id`. An [`Aggregated`] row is the unit of
//! output: exactly one per input record, in the same order, carrying the
//! running aggregate of the record's partition up to and including the
//! record itself.
//!
//! Non-negativity of `id` and `group` is carried by the unsigned field
//! types; external sources with signed values go through
//! [`Record::try_from_raw`], which is where [`AggregateError::InvalidRecord`]
//! originates.

use crate::error::AggregateError;
use serde::{Deserialize, Serialize};

/// One input record of the ordered stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Record {
  /// Unique, non-negative identifier; defines the stream order.
  pub id: u64,
  /// Non-negative group identifier; a change between consecutive records
  /// starts a new partition.
  pub group: u64,
  /// The measure to aggregate. `None` models the source's nullable measure
  /// column.
  pub measure: Option<f64>,
}

impl Record {
  /// Creates a record with a present measure.
  pub fn new(id: u64, group: u64, measure: f64) -> Self {
    Self {
      id,
      group,
      measure: Some(measure),
    }
  }

  /// Creates a record whose measure is absent.
  pub fn without_measure(id: u64, group: u64) -> Self {
    Self {
      id,
      group,
      measure: None,
    }
  }

  /// Validating constructor for records arriving from a signed external
  /// source. Fails with [`AggregateError::InvalidRecord`] when `id` or
  /// `group` is negative or the measure is not finite.
  pub fn try_from_raw(id: i64, group: i64, measure: Option<f64>) -> Result<Self, AggregateError> {
    if id < 0 {
      return Err(AggregateError::InvalidRecord {
        reason: format!("id {} is negative", id),
      });
    }
    if group < 0 {
      return Err(AggregateError::InvalidRecord {
        reason: format!("group {} is negative for record {}", group, id),
      });
    }
    if let Some(value) = measure {
      if !value.is_finite() {
        return Err(AggregateError::InvalidRecord {
          reason: format!("measure {} is not finite for record {}", value, id),
        });
      }
    }
    Ok(Self {
      id: id as u64,
      group: group as u64,
      measure,
    })
  }
}

/// One output row: the input record joined with its running aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregated {
  /// The input record's id.
  pub id: u64,
  /// The input record's group.
  pub group: u64,
  /// The input record's measure. Always present: records without measures
  /// never reach emission (they error out upstream).
  pub measure: f64,
  /// Running sum or mean of `measure` over the record's partition prefix.
  pub running_aggregate: f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_constructors() {
    let record = Record::new(3, 1, 2.5);
    assert_eq!(record.id, 3);
    assert_eq!(record.group, 1);
    assert_eq!(record.measure, Some(2.5));

    let record = Record::without_measure(4, 1);
    assert_eq!(record.measure, None);
  }

  #[test]
  fn test_try_from_raw_accepts_valid() {
    let record = Record::try_from_raw(0, 0, Some(13.0)).unwrap();
    assert_eq!(record, Record::new(0, 0, 13.0));

    let record = Record::try_from_raw(9, 2, None).unwrap();
    assert_eq!(record, Record::without_measure(9, 2));
  }

  #[test]
  fn test_try_from_raw_rejects_negative_id() {
    let err = Record::try_from_raw(-1, 0, Some(1.0)).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidRecord { .. }));
  }

  #[test]
  fn test_try_from_raw_rejects_negative_group() {
    let err = Record::try_from_raw(5, -3, Some(1.0)).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidRecord { .. }));
  }

  #[test]
  fn test_try_from_raw_rejects_non_finite_measure() {
    let err = Record::try_from_raw(5, 3, Some(f64::NAN)).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidRecord { .. }));
    let err = Record::try_from_raw(5, 3, Some(f64::INFINITY)).unwrap_err();
    assert!(matches!(err, AggregateError::InvalidRecord { .. }));
  }

  #[test]
  fn test_aggregated_serializes_with_field_names() {
    let row = Aggregated {
      id: 1,
      group: 0,
      measure: 3.0,
      running_aggregate: 5.0,
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["group"], 0);
    assert_eq!(json["measure"], 3.0);
    assert_eq!(json["running_aggregate"], 5.0);
  }
}
