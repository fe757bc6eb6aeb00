//! Accumulator state machine for running aggregates.
//!
//! An accumulator holds the minimal state sufficient to compute the next
//! aggregate value from the previous one and a single new observation. It is
//! driven by [`FoldInput`]s: one value plus a restart flag, produced by
//! boundary detection. The fold is a strict left-fold with reset; there is
//! no lookahead.
//!
//! [`AggregateKind`] is the built-in accumulator covering the two supported
//! aggregates (running sum, running arithmetic mean). The [`Accumulator`]
//! trait is the seam for further variants (min, max, variance).

use serde::{Deserialize, Serialize};

/// The unit passed into an accumulator at each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldInput {
  /// The observation to fold in; `None` models a record without a measure.
  pub value: Option<f64>,
  /// True when the observation begins a new partition: prior accumulator
  /// state is discarded before this value is folded in.
  pub restart: bool,
}

impl FoldInput {
  /// A fold input with a present observation.
  pub fn new(value: f64, restart: bool) -> Self {
    Self {
      value: Some(value),
      restart,
    }
  }

  /// A fold input without an observation.
  pub fn missing(restart: bool) -> Self {
    Self {
      value: None,
      restart,
    }
  }
}

/// A running-aggregate state machine.
///
/// `fold` consumes the previous state (`None` before the first observation)
/// and one [`FoldInput`], returning the next state; `value` projects the
/// aggregate out of a state. Implementations are pure: no side effects, no
/// lookahead.
pub trait Accumulator: Clone + Send + 'static {
  /// Minimal state carried between observations.
  type State: std::fmt::Debug + Clone + Send + 'static;

  /// Folds one observation into the state.
  ///
  /// Returns `None` only when the state is (or becomes) undefined, which
  /// happens on a restart whose observation is absent.
  fn fold(&self, state: Option<Self::State>, input: &FoldInput) -> Option<Self::State>;

  /// The aggregate value represented by `state`.
  fn value(&self, state: &Self::State) -> f64;
}

/// Which aggregate a pipeline computes. The single runtime configuration
/// option of the runner; doubles as the built-in [`Accumulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateKind {
  /// Running sum of the partition's measures.
  Sum,
  /// Running arithmetic mean of the partition's measures.
  Mean,
}

/// State of the mean accumulator: the running mean plus how many
/// observations it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanState {
  /// Mean of the observations folded so far in the current partition.
  pub mean: f64,
  /// Number of observations folded so far, at least 1.
  pub count: u64,
}

/// State of the built-in accumulator, one variant per [`AggregateKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateState {
  /// Running-sum state.
  Sum(f64),
  /// Running-mean state.
  Mean(MeanState),
}

impl AggregateState {
  fn as_sum(self) -> Option<f64> {
    match self {
      AggregateState::Sum(sum) => Some(sum),
      AggregateState::Mean(_) => None,
    }
  }

  fn as_mean(self) -> Option<MeanState> {
    match self {
      AggregateState::Mean(mean) => Some(mean),
      AggregateState::Sum(_) => None,
    }
  }
}

fn fold_sum(state: Option<f64>, input: &FoldInput) -> Option<f64> {
  match state {
    Some(prev) if !input.restart => match input.value {
      Some(value) => Some(prev + value),
      // A missing observation carries the state forward unchanged.
      None => Some(prev),
    },
    _ => input.value,
  }
}

fn fold_mean(state: Option<MeanState>, input: &FoldInput) -> Option<MeanState> {
  match state {
    Some(prev) if !input.restart => match input.value {
      Some(value) => {
        let count = prev.count + 1;
        // Incremental (Welford-style) update; numerically stabler than
        // carrying a separate sum over long partitions.
        let mean = prev.mean + (value - prev.mean) / count as f64;
        Some(MeanState { mean, count })
      }
      // A missing observation is skipped outright: mean and count both
      // carry forward, so it neither restarts the partition nor skews the
      // average.
      None => Some(prev),
    },
    _ => input.value.map(|value| MeanState {
      mean: value,
      count: 1,
    }),
  }
}

impl Accumulator for AggregateKind {
  type State = AggregateState;

  fn fold(&self, state: Option<Self::State>, input: &FoldInput) -> Option<Self::State> {
    match self {
      AggregateKind::Sum => {
        let prev = state.and_then(AggregateState::as_sum);
        fold_sum(prev, input).map(AggregateState::Sum)
      }
      AggregateKind::Mean => {
        let prev = state.and_then(AggregateState::as_mean);
        fold_mean(prev, input).map(AggregateState::Mean)
      }
    }
  }

  fn value(&self, state: &Self::State) -> f64 {
    match state {
      AggregateState::Sum(sum) => *sum,
      AggregateState::Mean(mean) => mean.mean,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fold_all(kind: AggregateKind, inputs: &[FoldInput]) -> Vec<f64> {
    let mut state = None;
    let mut out = Vec::new();
    for input in inputs {
      state = kind.fold(state, input);
      out.push(kind.value(state.as_ref().unwrap()));
    }
    out
  }

  #[test]
  fn test_sum_restart_takes_the_value() {
    let state = AggregateKind::Sum.fold(
      Some(AggregateState::Sum(10.0)),
      &FoldInput::new(3.0, true),
    );
    assert_eq!(state, Some(AggregateState::Sum(3.0)));
  }

  #[test]
  fn test_sum_undefined_state_takes_the_value() {
    let state = AggregateKind::Sum.fold(None, &FoldInput::new(3.0, false));
    assert_eq!(state, Some(AggregateState::Sum(3.0)));
  }

  #[test]
  fn test_sum_accumulates_within_a_partition() {
    let out = fold_all(
      AggregateKind::Sum,
      &[
        FoldInput::new(2.0, true),
        FoldInput::new(3.0, false),
        FoldInput::new(5.0, false),
      ],
    );
    assert_eq!(out, vec![2.0, 5.0, 10.0]);
  }

  #[test]
  fn test_sum_missing_value_carries_state() {
    let state = AggregateKind::Sum.fold(
      Some(AggregateState::Sum(10.0)),
      &FoldInput::missing(false),
    );
    assert_eq!(state, Some(AggregateState::Sum(10.0)));
  }

  #[test]
  fn test_sum_missing_value_on_restart_leaves_state_undefined() {
    let state = AggregateKind::Sum.fold(
      Some(AggregateState::Sum(10.0)),
      &FoldInput::missing(true),
    );
    assert_eq!(state, None);
  }

  #[test]
  fn test_mean_first_observation_is_the_mean() {
    let state = AggregateKind::Mean.fold(None, &FoldInput::new(7.0, true));
    assert_eq!(
      state,
      Some(AggregateState::Mean(MeanState {
        mean: 7.0,
        count: 1
      }))
    );
  }

  #[test]
  fn test_mean_incremental_update() {
    let out = fold_all(
      AggregateKind::Mean,
      &[
        FoldInput::new(2.0, true),
        FoldInput::new(3.0, false),
        FoldInput::new(10.0, false),
      ],
    );
    assert!((out[0] - 2.0).abs() < 1e-12);
    assert!((out[1] - 2.5).abs() < 1e-12);
    assert!((out[2] - 5.0).abs() < 1e-12);
  }

  #[test]
  fn test_mean_restart_resets_count() {
    let state = AggregateKind::Mean.fold(
      Some(AggregateState::Mean(MeanState {
        mean: 50.0,
        count: 9,
      })),
      &FoldInput::new(4.0, true),
    );
    assert_eq!(
      state,
      Some(AggregateState::Mean(MeanState {
        mean: 4.0,
        count: 1
      }))
    );
  }

  #[test]
  fn test_mean_missing_value_carries_mean_and_count() {
    // The observation is skipped entirely; in particular the count is NOT
    // reset, so a later observation is weighted correctly.
    let prev = MeanState {
      mean: 6.0,
      count: 3,
    };
    let state = AggregateKind::Mean.fold(
      Some(AggregateState::Mean(prev)),
      &FoldInput::missing(false),
    );
    assert_eq!(state, Some(AggregateState::Mean(prev)));

    let state = AggregateKind::Mean.fold(state, &FoldInput::new(10.0, false));
    assert_eq!(
      state,
      Some(AggregateState::Mean(MeanState {
        mean: 7.0,
        count: 4
      }))
    );
  }

  #[test]
  fn test_mean_missing_value_on_restart_leaves_state_undefined() {
    let state = AggregateKind::Mean.fold(
      Some(AggregateState::Mean(MeanState {
        mean: 6.0,
        count: 3,
      })),
      &FoldInput::missing(true),
    );
    assert_eq!(state, None);
  }

  #[test]
  fn test_mean_stability_over_long_partition() {
    // Folding a long constant series must not drift off the constant.
    let mut state = AggregateKind::Mean.fold(None, &FoldInput::new(0.1, true));
    for _ in 0..100_000 {
      state = AggregateKind::Mean.fold(state, &FoldInput::new(0.1, false));
    }
    let mean = AggregateKind::Mean.value(state.as_ref().unwrap());
    assert!((mean - 0.1).abs() < 1e-12);
  }
}
