use crate::accumulator::{Accumulator, AggregateKind, FoldInput};
use crate::boundary::BoundaryDetector;
use crate::error::{AggregateError, ErrorContext, StreamError};
use crate::input::Input;
use crate::output::Output;
use crate::record::{Aggregated, Record};
use crate::transformer::{Transformer, TransformerConfig};
use futures::{Stream, StreamExt, stream};
use std::pin::Pin;
use tracing::debug;

/// The core running-aggregate transform.
///
/// For each record it folds the measure into the accumulator, restarting
/// whenever the group differs from the previous record's group, and emits
/// the record annotated with the running aggregate of its partition so far.
/// One record in, one result out, immediately: memory held between records
/// is a single accumulator state and the previous group, independent of
/// stream length and partition size.
///
/// Input is assumed validated. A record that still has no measure here is
/// turned into an in-band [`AggregateError::MissingMeasure`]; it cannot
/// contribute to an aggregate.
#[derive(Clone)]
pub struct RunningAggregateTransformer<A: Accumulator> {
  accumulator: A,
  config: TransformerConfig,
}

impl RunningAggregateTransformer<AggregateKind> {
  /// A transformer computing the built-in aggregate `kind`.
  pub fn new(kind: AggregateKind) -> Self {
    Self::with_accumulator(kind)
  }
}

impl<A: Accumulator> RunningAggregateTransformer<A> {
  /// A transformer driven by a caller-supplied accumulator.
  pub fn with_accumulator(accumulator: A) -> Self {
    Self {
      accumulator,
      config: TransformerConfig::default(),
    }
  }
}

impl<A: Accumulator> Input for RunningAggregateTransformer<A> {
  type Input = Record;
  type InputStream = Pin<Box<dyn Stream<Item = Result<Record, StreamError>> + Send>>;
}

impl<A: Accumulator> Output for RunningAggregateTransformer<A> {
  type Output = Aggregated;
  type OutputStream = Pin<Box<dyn Stream<Item = Result<Aggregated, StreamError>> + Send>>;
}

struct FoldState<A: Accumulator> {
  input: Pin<Box<dyn Stream<Item = Result<Record, StreamError>> + Send>>,
  detector: BoundaryDetector,
  state: Option<A::State>,
  accumulator: A,
  component: crate::error::ComponentInfo,
  stage: crate::error::PipelineStage,
}

impl<A: Accumulator> Transformer for RunningAggregateTransformer<A> {
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    let fold_state = FoldState {
      input,
      detector: BoundaryDetector::new(),
      state: None,
      accumulator: self.accumulator.clone(),
      component: self.component_info(),
      stage: self.create_error_context(None).stage,
    };

    Box::pin(stream::unfold(fold_state, |mut fs| async move {
      let item = fs.input.next().await?;
      let out = match item {
        Ok(record) => {
          let restart = fs.detector.advance(record.group);
          if restart {
            debug!(id = record.id, group = record.group, "partition boundary");
          }
          let fold_input = FoldInput {
            value: record.measure,
            restart,
          };
          fs.state = fs.accumulator.fold(fs.state.take(), &fold_input);

          match (record.measure, fs.state.as_ref()) {
            (Some(measure), Some(state)) => Ok(Aggregated {
              id: record.id,
              group: record.group,
              measure,
              running_aggregate: fs.accumulator.value(state),
            }),
            _ => Err(StreamError::new(
              Box::new(AggregateError::MissingMeasure { id: record.id }),
              ErrorContext {
                timestamp: chrono::Utc::now(),
                item: Some(Box::new(record)),
                stage: fs.stage.clone(),
              },
              fs.component.clone(),
            )),
          }
        }
        Err(e) => Err(e),
      };
      Some((out, fs))
    }))
  }

  fn set_config_impl(&mut self, config: TransformerConfig) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &TransformerConfig {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig {
    &mut self.config
  }
}
