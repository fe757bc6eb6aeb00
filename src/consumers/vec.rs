use crate::consumer::{Consumer, ConsumerConfig};
use crate::error::{ErrorAction, StreamError};
use crate::input::Input;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tracing::warn;

/// A consumer that collects every item into a `Vec`.
///
/// In-band errors are resolved through the configured error strategy: `Stop`
/// (the default) terminates the run with the error, `Skip` drops the bad
/// item and keeps collecting. Item-level `Retry` is meaningless for a
/// one-shot stream and terminates like `Stop`.
#[derive(Clone)]
pub struct VecConsumer<T> {
  items: Vec<T>,
  config: ConsumerConfig,
}

impl<T> VecConsumer<T>
where
  T: Send + 'static,
{
  pub fn new() -> Self {
    Self {
      items: Vec::new(),
      config: ConsumerConfig::default(),
    }
  }

  /// Consumes self and returns the collected items.
  pub fn into_vec(self) -> Vec<T> {
    self.items
  }

  /// Returns a view of the items collected so far.
  pub fn items(&self) -> &[T] {
    &self.items
  }
}

impl<T> Default for VecConsumer<T>
where
  T: Send + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Input for VecConsumer<T>
where
  T: Send + 'static,
{
  type Input = T;
  type InputStream = Pin<Box<dyn Stream<Item = Result<T, StreamError>> + Send>>;
}

#[async_trait]
impl<T> Consumer for VecConsumer<T>
where
  T: Send + 'static,
{
  async fn consume(&mut self, mut input: Self::InputStream) -> Result<(), StreamError> {
    while let Some(item) = input.next().await {
      match item {
        Ok(value) => self.items.push(value),
        Err(e) => match self.handle_error(&e) {
          ErrorAction::Skip => {
            warn!(component = %e.component.name, error = %e, "skipping errored item");
          }
          ErrorAction::Stop | ErrorAction::Retry => return Err(e),
        },
      }
    }
    Ok(())
  }

  fn set_config_impl(&mut self, config: ConsumerConfig) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &ConsumerConfig {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut ConsumerConfig {
    &mut self.config
  }
}
