//! # Streamfold
//!
//! Pipelined, partition-aware running aggregation over ordered record streams.
//!
//! Streamfold consumes a totally ordered stream of [`record::Record`]s, each
//! tagged with a group identifier, and emits exactly one running aggregate
//! (sum or arithmetic mean) per input record, in input order, without ever
//! materializing the stream. The aggregate resets whenever the group
//! identifier changes between consecutive records, so memory use is O(1) in
//! stream length regardless of partition sizes.
//!
//! ## Key Features
//!
//! - **Pipelined**: one result per record, emitted before the input is exhausted
//! - **Partition-aware**: aggregates reset at every group boundary
//! - **Async-First**: built on Tokio and `futures` streams
//! - **Composable**: producer → transformer → consumer pipelines with a
//!   typestate builder
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use streamfold::accumulator::AggregateKind;
//! use streamfold::consumers::vec::VecConsumer;
//! use streamfold::pipeline::PipelineBuilder;
//! use streamfold::producers::vec::VecProducer;
//! use streamfold::record::Record;
//! use streamfold::transformers::running_aggregate::RunningAggregateTransformer;
//! use streamfold::transformers::validate::ValidateTransformer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![Record::new(0, 0, 2.0), Record::new(1, 0, 3.0)];
//! let consumer = PipelineBuilder::new()
//!   .producer(VecProducer::new(records))
//!   .transformer(ValidateTransformer::new())
//!   .transformer(RunningAggregateTransformer::new(AggregateKind::Sum))
//!   .consumer(VecConsumer::new())
//!   .run()
//!   .await?;
//! assert_eq!(consumer.into_vec().len(), 2);
//! # Ok(())
//! # }
//! ```

/// Accumulator state machine: fold inputs, sum and mean variants.
pub mod accumulator;
/// Partition boundary detection via one-record lookback.
pub mod boundary;
/// Consumer trait and configuration.
pub mod consumer;
/// Built-in consumers.
pub mod consumers;
/// Error handling system: strategies, stream and pipeline errors.
pub mod error;
/// Input trait for components that consume streams.
pub mod input;
/// Output trait for components that produce streams.
pub mod output;
/// Pipeline builder and runner.
pub mod pipeline;
/// Producer trait and configuration.
pub mod producer;
/// Built-in producers.
pub mod producers;
/// Record and aggregated result types.
pub mod record;
/// Transformer trait and configuration.
pub mod transformer;
/// Built-in transformers.
pub mod transformers;
