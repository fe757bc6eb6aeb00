use crate::consumer::Consumer;
use crate::error::{ErrorStrategy, PipelineError};
use crate::producer::Producer;
use crate::transformer::Transformer;
use std::marker::PhantomData;
use tracing::debug;

// State types for the builder
pub struct Empty;
pub struct HasProducer<P>(PhantomData<P>);
pub struct HasTransformer<P, T>(PhantomData<(P, T)>);

// Pipeline builder with state and error handling
pub struct PipelineBuilder<State> {
  producer_stream: Option<Box<dyn std::any::Any + Send + 'static>>,
  transformer_stream: Option<Box<dyn std::any::Any + Send + 'static>>,
  error_strategy: Option<ErrorStrategy>,
  _state: State,
}

// Pipeline struct that holds the final state
pub struct Pipeline<P, T, C>
where
  P: Producer,
  T: Transformer,
  C: Consumer,
{
  transformer_stream: Option<T::OutputStream>,
  consumer: Option<C>,
  error_strategy: Option<ErrorStrategy>,
  _producer: PhantomData<P>,
}

// Initial builder creation
impl PipelineBuilder<Empty> {
  pub fn new() -> Self {
    PipelineBuilder {
      producer_stream: None,
      transformer_stream: None,
      error_strategy: None,
      _state: Empty,
    }
  }

  /// Sets a pipeline-level error strategy, applied to the consumer at run
  /// time unless the consumer was configured explicitly.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
    self.error_strategy = Some(strategy);
    self
  }

  pub fn producer<P>(mut self, mut producer: P) -> PipelineBuilder<HasProducer<P>>
  where
    P: Producer + 'static,
    P::OutputStream: 'static,
  {
    let stream = producer.produce();
    self.producer_stream = Some(Box::new(stream));

    PipelineBuilder {
      producer_stream: self.producer_stream,
      transformer_stream: None,
      error_strategy: self.error_strategy,
      _state: HasProducer(PhantomData),
    }
  }
}

impl Default for PipelineBuilder<Empty> {
  fn default() -> Self {
    Self::new()
  }
}

// After producer is added
impl<P> PipelineBuilder<HasProducer<P>>
where
  P: Producer + 'static,
  P::OutputStream: 'static,
{
  pub fn transformer<T>(mut self, mut transformer: T) -> PipelineBuilder<HasTransformer<P, T>>
  where
    T: Transformer + 'static,
    T::InputStream: From<P::OutputStream>,
    T::OutputStream: 'static,
  {
    let producer_stream = self
      .producer_stream
      .take()
      .unwrap()
      .downcast::<P::OutputStream>()
      .unwrap();

    let transformer_stream = transformer.transform((*producer_stream).into());
    self.transformer_stream = Some(Box::new(transformer_stream));

    PipelineBuilder {
      producer_stream: None,
      transformer_stream: self.transformer_stream,
      error_strategy: self.error_strategy,
      _state: HasTransformer(PhantomData),
    }
  }
}

// After transformer is added
impl<P, T> PipelineBuilder<HasTransformer<P, T>>
where
  P: Producer + 'static,
  T: Transformer + 'static,
  T::OutputStream: 'static,
{
  pub fn transformer<U>(mut self, mut transformer: U) -> PipelineBuilder<HasTransformer<P, U>>
  where
    U: Transformer + 'static,
    U::InputStream: From<T::OutputStream>,
    U::OutputStream: 'static,
  {
    let transformer_stream = self
      .transformer_stream
      .take()
      .unwrap()
      .downcast::<T::OutputStream>()
      .unwrap();

    let new_stream = transformer.transform((*transformer_stream).into());
    self.transformer_stream = Some(Box::new(new_stream));

    PipelineBuilder {
      producer_stream: None,
      transformer_stream: self.transformer_stream,
      error_strategy: self.error_strategy,
      _state: HasTransformer(PhantomData),
    }
  }

  pub fn consumer<C>(mut self, consumer: C) -> Pipeline<P, T, C>
  where
    C: Consumer + 'static,
    C::InputStream: From<T::OutputStream>,
  {
    let transformer_stream = self
      .transformer_stream
      .take()
      .unwrap()
      .downcast::<T::OutputStream>()
      .unwrap();

    Pipeline {
      transformer_stream: Some(*transformer_stream),
      consumer: Some(consumer),
      error_strategy: self.error_strategy,
      _producer: PhantomData,
    }
  }
}

impl<P, T, C> Pipeline<P, T, C>
where
  P: Producer,
  T: Transformer,
  C: Consumer,
{
  /// Sets a pipeline-level error strategy, overriding the consumer's.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy) -> Self {
    self.error_strategy = Some(strategy);
    self
  }

  /// Drives the pipeline to completion and returns the consumer, or the
  /// error that stopped the run.
  pub async fn run(mut self) -> Result<C, PipelineError>
  where
    C::InputStream: From<T::OutputStream>,
  {
    let transformer_stream = self.transformer_stream.take().unwrap();
    let mut consumer = self.consumer.take().unwrap();

    if let Some(strategy) = self.error_strategy.take() {
      let config = consumer.config().clone().with_error_strategy(strategy);
      consumer.set_config(config);
    }

    debug!(consumer = %consumer.component_info().name, "pipeline run starting");
    match consumer.consume(transformer_stream.into()).await {
      Ok(()) => {
        debug!("pipeline run finished");
        Ok(consumer)
      }
      Err(e) => {
        debug!(error = %e, "pipeline run stopped by error");
        Err(PipelineError::from_stream_error(e))
      }
    }
  }
}
