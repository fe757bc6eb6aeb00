use crate::error::{AggregateError, StreamError};
use crate::input::Input;
use crate::output::Output;
use crate::record::Record;
use crate::transformer::{Transformer, TransformerConfig};
use futures::{Stream, StreamExt, stream};
use std::pin::Pin;
use tracing::warn;

/// Validates the ingestion contract of a record stream.
///
/// Two checks run per record, in order:
///
/// 1. Identifiers must be strictly increasing. A record whose id is not
///    greater than the largest id seen so far is rejected with
///    [`AggregateError::OrderingViolation`]; the high-water mark is kept so
///    a single stray record does not fail everything after it.
/// 2. The measure must be present. Records without one are rejected with
///    [`AggregateError::MissingMeasure`].
///
/// Rejected records become in-band `Err` items; the stream itself keeps
/// going, leaving the stop/skip decision to the consumer's error strategy.
#[derive(Clone)]
pub struct ValidateTransformer {
  config: TransformerConfig,
}

impl ValidateTransformer {
  pub fn new() -> Self {
    Self {
      config: TransformerConfig::default(),
    }
  }
}

impl Default for ValidateTransformer {
  fn default() -> Self {
    Self::new()
  }
}

impl Input for ValidateTransformer {
  type Input = Record;
  type InputStream = Pin<Box<dyn Stream<Item = Result<Record, StreamError>> + Send>>;
}

impl Output for ValidateTransformer {
  type Output = Record;
  type OutputStream = Pin<Box<dyn Stream<Item = Result<Record, StreamError>> + Send>>;
}

impl Transformer for ValidateTransformer {
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    let component = self.component_info();
    let stage = self.create_error_context(None).stage;

    Box::pin(stream::unfold(
      (input, None::<u64>, component, stage),
      |(mut input, mut last_id, component, stage)| async move {
        let item = input.next().await?;
        let out = match item {
          Ok(record) => {
            if let Some(prev) = last_id
              && record.id <= prev
            {
              warn!(prev, id = record.id, "rejecting out-of-order record");
              let error = AggregateError::OrderingViolation {
                prev,
                id: record.id,
              };
              Err(StreamError::new(
                Box::new(error),
                crate::error::ErrorContext {
                  timestamp: chrono::Utc::now(),
                  item: Some(Box::new(record)),
                  stage: stage.clone(),
                },
                component.clone(),
              ))
            } else if record.measure.is_none() {
              last_id = Some(record.id);
              warn!(id = record.id, "rejecting record without a measure");
              let error = AggregateError::MissingMeasure { id: record.id };
              Err(StreamError::new(
                Box::new(error),
                crate::error::ErrorContext {
                  timestamp: chrono::Utc::now(),
                  item: Some(Box::new(record)),
                  stage: stage.clone(),
                },
                component.clone(),
              ))
            } else {
              last_id = Some(record.id);
              Ok(record)
            }
          }
          Err(e) => Err(e),
        };
        Some((out, (input, last_id, component, stage)))
      },
    ))
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
