use crate::error::StreamError;
use crate::output::Output;
use crate::producer::{Producer, ProducerConfig};
use futures::{Stream, StreamExt, stream};
use std::pin::Pin;

/// A producer that yields the items of a `Vec` in order.
///
/// The vector is cloned on every `produce` call, so the same producer can
/// drive more than one pipeline run.
#[derive(Clone)]
pub struct VecProducer<T> {
  data: Vec<T>,
  config: ProducerConfig,
}

impl<T> VecProducer<T>
where
  T: Send + Sync + Clone + 'static,
{
  pub fn new(data: Vec<T>) -> Self {
    Self {
      data,
      config: ProducerConfig::default(),
    }
  }
}

impl<T> Output for VecProducer<T>
where
  T: Send + Sync + Clone + 'static,
{
  type Output = T;
  type OutputStream = Pin<Box<dyn Stream<Item = Result<T, StreamError>> + Send>>;
}

impl<T> Producer for VecProducer<T>
where
  T: Send + Sync + Clone + 'static,
{
  fn produce(&mut self) -> Self::OutputStream {
    Box::pin(stream::iter(self.data.clone()).map(Ok))
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

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorStrategy;
  use crate::record::Record;
  use futures::StreamExt;

  #[tokio::test]
  async fn test_vec_producer_yields_in_order() {
    let mut producer = VecProducer::new(vec![1u64, 2, 3]);
    let result: Vec<u64> = producer
      .produce()
      .map(|item| item.unwrap())
      .collect()
      .await;
    assert_eq!(result, vec![1, 2, 3]);
  }

  #[tokio::test]
  async fn test_vec_producer_empty() {
    let mut producer = VecProducer::new(Vec::<Record>::new());
    let result: Vec<_> = producer.produce().collect().await;
    assert!(result.is_empty());
  }

  #[tokio::test]
  async fn test_vec_producer_reusable() {
    let mut producer = VecProducer::new(vec![7u64]);
    let first: Vec<_> = producer.produce().collect().await;
    let second: Vec<_> = producer.produce().collect().await;
    assert_eq!(first.len(), second.len());
  }

  #[test]
  fn test_vec_producer_config() {
    let mut producer = VecProducer::new(vec![1u64]);
    producer.set_config(
      ProducerConfig::default()
        .with_error_strategy(ErrorStrategy::Skip)
        .with_name("ids".to_string()),
    );
    assert_eq!(producer.config().error_strategy(), ErrorStrategy::Skip);
    assert_eq!(producer.component_info().name, "ids");
  }
}
