//! Input trait for components that consume input streams.
//!
//! The [`Input`] trait is implemented by transformers and consumers, the
//! components that receive data from upstream. Streams carry
//! `Result<T, StreamError>` items: errors travel in-band alongside data and
//! are resolved by the error strategy of the consuming component.
//!
//! # Design Decisions
//!
//! - **Result items**: errors flow through the same stream as data, so a
//!   transform can pass an upstream failure along without flattening the
//!   pipeline
//! - **Pinned boxed streams**: `Pin<Box<dyn Stream + Send>>` keeps component
//!   stream types uniform and connectable
//! - **Send bound**: required for cross-task usage under Tokio

use crate::error::StreamError;
use futures::Stream;

/// Trait for components that can consume input streams.
pub trait Input {
  /// The type of items consumed by this component.
  type Input: Send + 'static;
  /// The input stream type, yielding `Result<Self::Input, StreamError>`.
  type InputStream: Stream<Item = Result<Self::Input, StreamError>> + Send + 'static;
}
