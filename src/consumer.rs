//! # Consumer Trait
//!
//! Consumers sit at the end of a pipeline and drive it: pulling items from
//! the final stream, applying the configured error strategy to in-band
//! errors, and terminating the run with `Ok` or the error that stopped it.

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, PipelineStage, StreamError};
use crate::input::Input;
use async_trait::async_trait;

/// Configuration for a consumer component.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerConfig {
  /// The error handling strategy to use when consuming items.
  pub error_strategy: ErrorStrategy,
  /// Optional name for identifying this consumer in logs and errors.
  pub name: Option<String>,
}

impl Default for ConsumerConfig {
  fn default() -> Self {
    Self {
      error_strategy: ErrorStrategy::Stop,
      name: None,
    }
  }
}

impl ConsumerConfig {
  /// Sets the error handling strategy for this consumer configuration.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
    self.error_strategy = strategy;
    self
  }

  /// Sets the name for this consumer configuration.
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

/// Trait for components that consume data streams.
#[async_trait]
pub trait Consumer: Input {
  /// Consumes the stream to completion, or until the error strategy says to
  /// stop. Returns the `StreamError` that terminated the run, if any.
  async fn consume(&mut self, input: Self::InputStream) -> Result<(), StreamError>;

  /// Creates a new consumer instance with the given configuration.
  #[must_use]
  fn with_config(&self, config: ConsumerConfig) -> Self
  where
    Self: Sized + Clone,
  {
    let mut this = self.clone();
    this.set_config(config);
    this
  }

  /// Sets the configuration for this consumer.
  fn set_config(&mut self, config: ConsumerConfig) {
    self.set_config_impl(config);
  }

  /// Returns a reference to the consumer's configuration.
  fn config(&self) -> &ConsumerConfig {
    self.get_config_impl()
  }

  /// Returns a mutable reference to the consumer's configuration.
  fn config_mut(&mut self) -> &mut ConsumerConfig {
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
      stage: PipelineStage::Consumer,
    }
  }

  /// Returns information about the component for error reporting.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self.config().name().unwrap_or_else(|| "consumer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Stores the configuration. Implemented by each consumer.
  fn set_config_impl(&mut self, config: ConsumerConfig);

  /// Returns the stored configuration. Implemented by each consumer.
  fn get_config_impl(&self) -> &ConsumerConfig;

  /// Returns the stored configuration mutably. Implemented by each consumer.
  fn get_config_mut_impl(&mut self) -> &mut ConsumerConfig;
}
