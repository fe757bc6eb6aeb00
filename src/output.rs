//! Output trait for components that produce output streams.
//!
//! The [`Output`] trait is implemented by producers and transformers, the
//! components that generate data for downstream consumption. It mirrors
//! [`crate::input::Input`]: streams carry `Result<T, StreamError>` items so
//! errors propagate in-band.

use crate::error::StreamError;
use futures::Stream;

/// Trait for components that can produce output streams.
pub trait Output {
  /// The type of items produced by this component.
  type Output: Send + 'static;
  /// The output stream type, yielding `Result<Self::Output, StreamError>`.
  type OutputStream: Stream<Item = Result<Self::Output, StreamError>> + Send + 'static;
}
