//! # Producer Trait
//!
//! Producers generate the items that flow through a pipeline. They are the
//! starting point of every streamfold pipeline: an ordered provider of
//! records (or of any other item type) that downstream transformers and
//! consumers pull from.

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, PipelineStage, StreamError};
use crate::output::Output;

/// Configuration for a producer component.
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerConfig {
  /// The error handling strategy to use when producing items.
  pub error_strategy: ErrorStrategy,
  /// Optional name for identifying this producer in logs and errors.
  pub name: Option<String>,
}

impl Default for ProducerConfig {
  fn default() -> Self {
    Self {
      error_strategy: ErrorStrategy::Stop,
      name: None,
    }
  }
}

impl ProducerConfig {
  /// Sets the error handling strategy for this producer configuration.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
    self.error_strategy = strategy;
    self
  }

  /// Sets the name for this producer configuration.
  pub fn with_name(mut self, name: String) -> Self {
    self.name = Some(name);
    self
  }

  /// Returns the current error handling strategy.
  pub fn error_strategy(&self) -> ErrorStrategy {
    self.error_strategy.clone()
  }

  /// Returns the current name, if set.
  pub fn name(&self) -> Option<String> {
    self.name.clone()
  }
}

/// Trait for components that produce data streams.
///
/// `produce` is called once by the pipeline to obtain the stream that
/// transformers and eventually a consumer will pull from.
pub trait Producer: Output {
  /// Produces the stream of items.
  fn produce(&mut self) -> Self::OutputStream;

  /// Creates a new producer instance with the given configuration.
  #[must_use]
  fn with_config(&self, config: ProducerConfig) -> Self
  where
    Self: Sized + Clone,
  {
    let mut this = self.clone();
    this.set_config(config);
    this
  }

  /// Sets the configuration for this producer.
  fn set_config(&mut self, config: ProducerConfig) {
    self.set_config_impl(config);
  }

  /// Returns a reference to the producer's configuration.
  fn config(&self) -> &ProducerConfig {
    self.get_config_impl()
  }

  /// Returns a mutable reference to the producer's configuration.
  fn config_mut(&mut self) -> &mut ProducerConfig {
    self.get_config_mut_impl()
  }

  /// Determines the [`ErrorAction`] for `error` from the configured strategy.
  fn handle_error(&self, error: &StreamError) -> ErrorAction {
    match self.config().error_strategy() {
      ErrorStrategy::Stop => ErrorAction::Stop,
      ErrorStrategy::Skip => ErrorAction::Skip,
      ErrorStrategy::Retry(n) if error.retries < n => ErrorAction::Retry,
      ErrorStrategy::Custom(ref handler) => handler(error),
      _ => ErrorAction::Stop,
    }
  }

  /// Creates an error context for error reporting.
  fn create_error_context(&self, item: Option<Box<dyn std::any::Any + Send>>) -> ErrorContext {
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item,
      stage: PipelineStage::Producer,
    }
  }

  /// Returns information about the component for error reporting.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self.config().name().unwrap_or_else(|| "producer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Stores the configuration. Implemented by each producer.
  fn set_config_impl(&mut self, config: ProducerConfig);

  /// Returns the stored configuration. Implemented by each producer.
  fn get_config_impl(&self) -> &ProducerConfig;

  /// Returns the stored configuration mutably. Implemented by each producer.
  fn get_config_mut_impl(&mut self) -> &mut ProducerConfig;
}
