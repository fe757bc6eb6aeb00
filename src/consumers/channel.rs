use crate::consumer::{Consumer, ConsumerConfig};
use crate::error::{ErrorAction, StreamError, StringError};
use crate::input::Input;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tokio::sync::mpsc::Sender;
use tracing::warn;

/// A consumer that forwards each item into a `tokio::sync::mpsc` channel as
/// soon as it arrives.
///
/// This is the delivery end for incremental pipelines: a receiver on the
/// other side observes each result while the producer is still supplying
/// input. A closed receiver terminates the run with an error.
#[derive(Clone)]
pub struct ChannelConsumer<T> {
  sender: Sender<T>,
  config: ConsumerConfig,
}

impl<T> ChannelConsumer<T>
where
  T: Send + 'static,
{
  pub fn new(sender: Sender<T>) -> Self {
    Self {
      sender,
      config: ConsumerConfig::default(),
    }
  }
}

impl<T> Input for ChannelConsumer<T>
where
  T: Send + 'static,
{
  type Input = T;
  type InputStream = Pin<Box<dyn Stream<Item = Result<T, StreamError>> + Send>>;
}

#[async_trait]
impl<T> Consumer for ChannelConsumer<T>
where
  T: Send + 'static,
{
  async fn consume(&mut self, mut input: Self::InputStream) -> Result<(), StreamError> {
    while let Some(item) = input.next().await {
      match item {
        Ok(value) => {
          if self.sender.send(value).await.is_err() {
            return Err(StreamError::new(
              Box::new(StringError("output channel closed".to_string())),
              self.create_error_context(None),
              self.component_info(),
            ));
          }
        }
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

#[cfg(test)]
mod tests {
  use super::*;
  use futures::stream;
  use tokio::sync::mpsc;

  fn boxed<T: Send + 'static>(
    items: Vec<Result<T, StreamError>>,
  ) -> Pin<Box<dyn Stream<Item = Result<T, StreamError>> + Send>> {
    Box::pin(stream::iter(items))
  }

  #[tokio::test]
  async fn test_channel_consumer_forwards_items() {
    let (tx, mut rx) = mpsc::channel(4);
    let mut consumer = ChannelConsumer::new(tx);
    consumer
      .consume(boxed(vec![Ok(1u64), Ok(2)]))
      .await
      .unwrap();
    drop(consumer);

    assert_eq!(rx.recv().await, Some(1));
    assert_eq!(rx.recv().await, Some(2));
    assert_eq!(rx.recv().await, None);
  }

  #[tokio::test]
  async fn test_channel_consumer_errors_when_receiver_dropped() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let mut consumer = ChannelConsumer::new(tx);
    let result = consumer.consume(boxed(vec![Ok(1u64)])).await;
    assert!(result.is_err());
  }
}
