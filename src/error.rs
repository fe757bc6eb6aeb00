//! # Error Handling System
//!
//! Error handling for streamfold pipelines: configurable per-component error
//! strategies, rich error context, and in-band error propagation through the
//! streams themselves.
//!
//! ## Overview
//!
//! Errors travel through a pipeline as `Err` items inside the component
//! streams and are resolved by the configured [`ErrorStrategy`] at the
//! consuming end of the pipeline.
//!
//! ## Core Types
//!
//! - **[`AggregateError`]**: the domain errors of running aggregation
//!   (ordering violations, invalid records, missing measures)
//! - **[`ErrorAction`]**: the action to take when an error occurs (Stop, Skip, Retry)
//! - **[`ErrorStrategy`]**: the strategy for handling errors, including custom handlers
//! - **[`StreamError`]**: rich error context with source, component info, and retry count
//! - **[`PipelineError`]**: pipeline-level error wrapper returned by a failed run
//! - **[`ErrorContext`]**: contextual information about when and where an error occurred
//! - **[`ComponentInfo`]**: component name and type information for error reporting
//!
//! ## Error Strategies
//!
//! - **Stop**: immediately stop processing (default, ensures data integrity)
//! - **Skip**: skip the problematic item and continue
//! - **Retry(n)**: retry up to n times before stopping
//! - **Custom**: user-defined handler function for fine-grained control

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Errors raised by the running-aggregation core.
///
/// These are produced at the validation boundary (before folding) and, for
/// [`AggregateError::MissingMeasure`], by the aggregation transformer itself
/// when a record without a measure reaches it. The fold arithmetic never
/// fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
  /// The input stream delivered a record whose id is not strictly greater
  /// than its predecessor's, violating the ordered-input contract.
  #[error("ordering violation: record id {id} follows id {prev}")]
  OrderingViolation {
    /// The id of the preceding record.
    prev: u64,
    /// The offending record's id.
    id: u64,
  },
  /// A record violates the domain invariants (non-negative id and group).
  #[error("invalid record: {reason}")]
  InvalidRecord {
    /// Why the record was rejected.
    reason: String,
  },
  /// A record carries no measure value.
  #[error("record {id} has no measure")]
  MissingMeasure {
    /// The id of the record without a measure.
    id: u64,
  },
}

/// Action to take when an error occurs in a pipeline component.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorAction {
  /// Stop processing immediately when an error occurs.
  ///
  /// This is the default behavior and ensures data integrity by preventing
  /// partial results after an error.
  Stop,
  /// Skip the item that caused the error and continue processing.
  ///
  /// Useful for non-critical errors where partial results are acceptable.
  Skip,
  /// Retry the operation that caused the error.
  ///
  /// Useful for transient failures that may succeed on retry.
  Retry,
}

// Type alias for the complex custom error handler function
type CustomErrorHandler = Arc<dyn Fn(&StreamError) -> ErrorAction + Send + Sync>;

/// Strategy for handling errors in pipeline components.
///
/// Error strategies determine how components respond to errors during
/// stream processing. Strategies can be set at the pipeline level or
/// overridden at the component level.
///
/// # Example
///
/// ```rust
/// use streamfold::error::{ErrorAction, ErrorStrategy};
///
/// // Stop on first error (default)
/// let strategy = ErrorStrategy::Stop;
///
/// // Skip errors and continue
/// let strategy = ErrorStrategy::Skip;
///
/// // Custom error handling
/// let strategy = ErrorStrategy::new_custom(|error| {
///   if error.retries < 2 {
///     ErrorAction::Retry
///   } else {
///     ErrorAction::Stop
///   }
/// });
/// ```
pub enum ErrorStrategy {
  /// Stop processing immediately when an error occurs.
  ///
  /// This is the default strategy and ensures data integrity.
  Stop,
  /// Skip items that cause errors and continue processing.
  ///
  /// Useful for data cleaning scenarios where invalid records can be
  /// safely ignored.
  Skip,
  /// Retry failed operations up to the specified number of times.
  ///
  /// Useful for transient failures; the aggregation core itself is a pure
  /// transform, so retries only ever apply to external sources.
  Retry(usize),
  /// Custom error handling logic.
  ///
  /// Allows fine-grained control over error handling based on error
  /// context, type, or retry count.
  Custom(CustomErrorHandler),
}

impl Clone for ErrorStrategy {
  fn clone(&self) -> Self {
    match self {
      ErrorStrategy::Stop => ErrorStrategy::Stop,
      ErrorStrategy::Skip => ErrorStrategy::Skip,
      ErrorStrategy::Retry(n) => ErrorStrategy::Retry(*n),
      ErrorStrategy::Custom(handler) => ErrorStrategy::Custom(handler.clone()),
    }
  }
}

impl fmt::Debug for ErrorStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorStrategy::Stop => write!(f, "ErrorStrategy::Stop"),
      ErrorStrategy::Skip => write!(f, "ErrorStrategy::Skip"),
      ErrorStrategy::Retry(n) => write!(f, "ErrorStrategy::Retry({})", n),
      ErrorStrategy::Custom(_) => write!(f, "ErrorStrategy::Custom"),
    }
  }
}

impl PartialEq for ErrorStrategy {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (ErrorStrategy::Stop, ErrorStrategy::Stop) => true,
      (ErrorStrategy::Skip, ErrorStrategy::Skip) => true,
      (ErrorStrategy::Retry(n1), ErrorStrategy::Retry(n2)) => n1 == n2,
      (ErrorStrategy::Custom(_), ErrorStrategy::Custom(_)) => true,
      _ => false,
    }
  }
}

impl ErrorStrategy {
  /// Creates a custom error handling strategy with a user-defined handler function.
  pub fn new_custom<F>(f: F) -> Self
  where
    F: Fn(&StreamError) -> ErrorAction + Send + Sync + 'static,
  {
    Self::Custom(Arc::new(f))
  }
}

/// A simple error type that wraps a string message.
///
/// This is useful for creating errors from string messages without
/// needing to implement a full error type.
#[derive(Debug)]
pub struct StringError(pub String);

impl fmt::Display for StringError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Error for StringError {}

/// Error that occurred during stream processing.
///
/// This error type provides rich context about where and when an error
/// occurred, making it easier to debug and handle errors appropriately.
#[derive(Debug)]
pub struct StreamError {
  /// The original error that occurred.
  pub source: Box<dyn Error + Send + Sync>,
  /// Context about when and where the error occurred.
  pub context: ErrorContext,
  /// Information about the component that encountered the error.
  pub component: ComponentInfo,
  /// Number of times this error has been retried.
  pub retries: usize,
}

impl StreamError {
  /// Creates a new `StreamError` with the given source error, context, and
  /// component information. `retries` starts at 0.
  pub fn new(
    source: Box<dyn Error + Send + Sync>,
    context: ErrorContext,
    component: ComponentInfo,
  ) -> Self {
    Self {
      source,
      context,
      component,
      retries: 0,
    }
  }

  /// Returns the domain error carried by this stream error, if it is one.
  pub fn as_aggregate_error(&self) -> Option<&AggregateError> {
    self.source.downcast_ref::<AggregateError>()
  }
}

impl fmt::Display for StreamError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Error in {} ({}): {}",
      self.component.name, self.component.type_name, self.source
    )
  }
}

impl Error for StreamError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.source.as_ref())
  }
}

/// Context information about when and where an error occurred.
pub struct ErrorContext {
  /// The timestamp when the error occurred.
  pub timestamp: chrono::DateTime<chrono::Utc>,
  /// The item being processed when the error occurred, if available.
  pub item: Option<Box<dyn Any + Send>>,
  /// The pipeline stage where the error occurred.
  pub stage: PipelineStage,
}

impl fmt::Debug for ErrorContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ErrorContext")
      .field("timestamp", &self.timestamp)
      .field("item", &self.item.as_ref().map(|_| "<item>"))
      .field("stage", &self.stage)
      .finish()
  }
}

impl Default for ErrorContext {
  fn default() -> Self {
    Self {
      timestamp: chrono::Utc::now(),
      item: None,
      stage: PipelineStage::Transformer(String::new()),
    }
  }
}

/// Represents the stage in a pipeline where an error occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineStage {
  /// Error occurred in a producer.
  Producer,
  /// Error occurred in a transformer, with the transformer name.
  Transformer(String),
  /// Error occurred in a consumer.
  Consumer,
}

/// Information about a pipeline component.
///
/// This struct provides identifying information about a component,
/// including its name and type, which is useful for logging and error reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInfo {
  /// The name of the component.
  pub name: String,
  /// The type name of the component.
  pub type_name: String,
}

impl Default for ComponentInfo {
  fn default() -> Self {
    Self {
      name: "default".to_string(),
      type_name: "default".to_string(),
    }
  }
}

impl ComponentInfo {
  /// Creates a new `ComponentInfo` with the given name and type name.
  pub fn new(name: String, type_name: String) -> Self {
    Self { name, type_name }
  }
}

/// An error that occurred during pipeline execution.
///
/// This struct wraps the `StreamError` that terminated the run and provides
/// pipeline-specific accessors.
#[derive(Debug)]
pub struct PipelineError {
  inner: StreamError,
}

impl PipelineError {
  /// Creates a new `PipelineError` from an error, context, and component information.
  pub fn new<E>(error: E, context: ErrorContext, component: ComponentInfo) -> Self
  where
    E: Error + Send + Sync + 'static,
  {
    Self {
      inner: StreamError::new(Box::new(error), context, component),
    }
  }

  /// Creates a new `PipelineError` from an existing `StreamError`.
  pub fn from_stream_error(error: StreamError) -> Self {
    Self { inner: error }
  }

  /// Returns a reference to the error context.
  pub fn context(&self) -> &ErrorContext {
    &self.inner.context
  }

  /// Returns a reference to the component information.
  pub fn component(&self) -> &ComponentInfo {
    &self.inner.component
  }

  /// Returns the domain error that terminated the run, if it was one.
  pub fn as_aggregate_error(&self) -> Option<&AggregateError> {
    self.inner.as_aggregate_error()
  }
}

impl fmt::Display for PipelineError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Pipeline error in {}: {}",
      self.inner.component.name, self.inner.source
    )
  }
}

impl Error for PipelineError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&*self.inner.source)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_strategy_clone() {
    assert_eq!(ErrorStrategy::Stop.clone(), ErrorStrategy::Stop);
    assert_eq!(ErrorStrategy::Skip.clone(), ErrorStrategy::Skip);
    assert_eq!(ErrorStrategy::Retry(3).clone(), ErrorStrategy::Retry(3));

    let strategy = ErrorStrategy::new_custom(|_| ErrorAction::Skip);
    assert_eq!(strategy.clone(), strategy);
  }

  #[test]
  fn test_error_strategy_debug() {
    assert_eq!(format!("{:?}", ErrorStrategy::Stop), "ErrorStrategy::Stop");
    assert_eq!(format!("{:?}", ErrorStrategy::Skip), "ErrorStrategy::Skip");
    assert_eq!(
      format!("{:?}", ErrorStrategy::Retry(3)),
      "ErrorStrategy::Retry(3)"
    );
    assert_eq!(
      format!("{:?}", ErrorStrategy::new_custom(|_| ErrorAction::Skip)),
      "ErrorStrategy::Custom"
    );
  }

  #[test]
  fn test_error_strategy_new_custom() {
    let strategy = ErrorStrategy::new_custom(|error| {
      if error.retries < 2 {
        ErrorAction::Retry
      } else {
        ErrorAction::Stop
      }
    });
    let mut error = StreamError::new(
      Box::new(StringError("test".to_string())),
      ErrorContext::default(),
      ComponentInfo::default(),
    );
    if let ErrorStrategy::Custom(handler) = strategy {
      assert_eq!(handler(&error), ErrorAction::Retry);
      error.retries = 2;
      assert_eq!(handler(&error), ErrorAction::Stop);
    } else {
      panic!("Expected Custom variant");
    }
  }

  #[test]
  fn test_stream_error_display() {
    let error = StreamError::new(
      Box::new(StringError("test error".to_string())),
      ErrorContext::default(),
      ComponentInfo::new("test".to_string(), "TestComponent".to_string()),
    );
    assert_eq!(
      error.to_string(),
      "Error in test (TestComponent): test error"
    );
  }

  #[test]
  fn test_stream_error_as_aggregate_error() {
    let error = StreamError::new(
      Box::new(AggregateError::OrderingViolation { prev: 4, id: 2 }),
      ErrorContext::default(),
      ComponentInfo::default(),
    );
    assert_eq!(
      error.as_aggregate_error(),
      Some(&AggregateError::OrderingViolation { prev: 4, id: 2 })
    );

    let other = StreamError::new(
      Box::new(StringError("not a domain error".to_string())),
      ErrorContext::default(),
      ComponentInfo::default(),
    );
    assert_eq!(other.as_aggregate_error(), None);
  }

  #[test]
  fn test_aggregate_error_display() {
    assert_eq!(
      AggregateError::OrderingViolation { prev: 7, id: 7 }.to_string(),
      "ordering violation: record id 7 follows id 7"
    );
    assert_eq!(
      AggregateError::MissingMeasure { id: 3 }.to_string(),
      "record 3 has no measure"
    );
    assert_eq!(
      AggregateError::InvalidRecord {
        reason: "id -1 is negative".to_string()
      }
      .to_string(),
      "invalid record: id -1 is negative"
    );
  }

  #[test]
  fn test_pipeline_error_display() {
    let error = PipelineError::new(
      StringError("test error".to_string()),
      ErrorContext::default(),
      ComponentInfo::new("test".to_string(), "TestComponent".to_string()),
    );
    assert_eq!(error.to_string(), "Pipeline error in test: test error");
  }

  #[test]
  fn test_pipeline_stage() {
    let stage1 = PipelineStage::Transformer("validate".to_string());
    let stage2 = PipelineStage::Transformer("validate".to_string());
    assert_eq!(stage1, stage2);
    assert_ne!(stage1, PipelineStage::Producer);
    assert_ne!(PipelineStage::Producer, PipelineStage::Consumer);
  }

  #[test]
  fn test_error_context_debug_hides_item() {
    let context = ErrorContext {
      timestamp: chrono::DateTime::from_timestamp(0, 0).unwrap(),
      item: Some(Box::new(42u64)),
      stage: PipelineStage::Producer,
    };
    let debug = format!("{:?}", context);
    assert!(debug.contains("<item>"));
    assert!(!debug.contains("42"));
  }
}
