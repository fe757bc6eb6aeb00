//! # Transformer Trait
//!
//! Transformers process items as they flow through a pipeline. They consume
//! one stream and produce another, item by item: validation, boundary-aware
//! aggregation, or any other streaming transform. A transformer must emit
//! incrementally — its output stream yields a result as soon as the
//! corresponding input item has been processed, never after collecting the
//! whole input.

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, PipelineStage, StreamError};
use crate::{input::Input, output::Output};

/// Configuration for transformers, including error handling strategy and naming.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformerConfig {
  /// The error handling strategy to use when errors occur.
  pub error_strategy: ErrorStrategy,
  /// Optional name for identifying this transformer in logs and errors.
  pub name: Option<String>,
}

impl Default for TransformerConfig {
  fn default() -> Self {
    Self {
      error_strategy: ErrorStrategy::Stop,
      name: None,
    }
  }
}

impl TransformerConfig {
  /// Sets the error handling strategy for this transformer configuration.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
    self.error_strategy = strategy;
    self
  }

  /// Sets the name for this transformer configuration.
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

/// Trait for components that transform data streams.
pub trait Transformer: Input + Output {
  /// Transforms a stream of input items into a stream of output items.
  ///
  /// The returned stream must yield exactly as the input is consumed; the
  /// consumer may begin observing output before the producer has finished
  /// supplying input.
  fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream;

  /// Creates a new transformer instance with the given configuration.
  #[must_use]
  fn with_config(&self, config: TransformerConfig) -> Self
  where
    Self: Sized + Clone,
  {
    let mut this = self.clone();
    this.set_config(config);
    this
  }

  /// Sets the configuration for this transformer.
  fn set_config(&mut self, config: TransformerConfig) {
    self.set_config_impl(config);
  }

  /// Returns a reference to the transformer's configuration.
  fn config(&self) -> &TransformerConfig {
    self.get_config_impl()
  }

  /// Returns a mutable reference to the transformer's configuration.
  fn config_mut(&mut self) -> &mut TransformerConfig {
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
      stage: PipelineStage::Transformer(
        self.config().name().unwrap_or_else(|| "transformer".to_string()),
      ),
    }
  }

  /// Returns information about the component for error reporting.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config()
        .name()
        .unwrap_or_else(|| "transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Stores the configuration. Implemented by each transformer.
  fn set_config_impl(&mut self, config: TransformerConfig);

  /// Returns the stored configuration. Implemented by each transformer.
  fn get_config_impl(&self) -> &TransformerConfig;

  /// Returns the stored configuration mutably. Implemented by each transformer.
  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig;
}
