use crate::error::StreamError;
use crate::output::Output;
use crate::producer::{Producer, ProducerConfig};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use tokio::sync::mpsc::Receiver;
use tokio_stream::wrappers::ReceiverStream;

/// A producer fed by a `tokio::sync::mpsc` channel.
///
/// Items arrive one at a time from another task, which makes this the
/// natural source for pipelines that must emit results before the input is
/// complete. The stream ends when every sender has been dropped.
///
/// A receiver can only be drained once; a second `produce` call yields an
/// empty stream.
pub struct ChannelProducer<T> {
  receiver: Option<Receiver<T>>,
  config: ProducerConfig,
}

impl<T> ChannelProducer<T>
where
  T: Send + 'static,
{
  pub fn new(receiver: Receiver<T>) -> Self {
    Self {
      receiver: Some(receiver),
      config: ProducerConfig::default(),
    }
  }
}

impl<T> Output for ChannelProducer<T>
where
  T: Send + 'static,
{
  type Output = T;
  type OutputStream = Pin<Box<dyn Stream<Item = Result<T, StreamError>> + Send>>;
}

impl<T> Producer for ChannelProducer<T>
where
  T: Send + 'static,
{
  fn produce(&mut self) -> Self::OutputStream {
    match self.receiver.take() {
      Some(receiver) => Box::pin(ReceiverStream::new(receiver).map(Ok)),
      None => Box::pin(futures::stream::empty()),
    }
  }

  fn set_config_impl(&mut self, config: ProducerConfig) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &ProducerConfig {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut ProducerConfig {
    &mut self.config
  }
}
