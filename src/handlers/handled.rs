//! # Handled error: the value every handler and fallback logger receives.
//!
//! [`HandledError`] wraps a dequeued error and, when configured, the base error
//! of the instance. The inspection chain, outermost first:
//!
//! ```text
//! HandledError ("handle error: <base>: <original>")
//!     └─► original error (as added)
//!             └─► original's own sources
//!                     └─► base error (if configured)
//!                             └─► base's own sources
//! ```
//!
//! ## Rules
//! - `std::error::Error::source` yields the original error itself, then its own
//!   sources, so `downcast_ref` on the std walk finds the original and its causes.
//! - The base error cannot be grafted below an opaque error's `source()`; it is
//!   reached through [`HandledError::chain`], [`HandledError::find`],
//!   [`HandledError::is`] or [`HandledError::base`], and always appears in `Display`.

use std::error::Error;
use std::fmt;
use std::iter;

use crate::error::{BaseError, BoxError};

/// A queued error after the handling step.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use aerrors::HandledError;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("storage")]
/// struct Storage;
///
/// let handled = HandledError::new("disk full".into(), Some(Arc::new(Storage)));
/// assert!(handled.is::<Storage>());
/// assert_eq!(handled.original().to_string(), "disk full");
/// ```
#[derive(Debug)]
pub struct HandledError {
    original: BoxError,
    base: Option<BaseError>,
}

impl HandledError {
    /// Chains `original` beneath the handling annotation and above `base`.
    ///
    /// With `base = None` no chaining happens.
    pub fn new(original: BoxError, base: Option<BaseError>) -> Self {
        Self { original, base }
    }

    /// The error as it was added to the queue.
    pub fn original(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.original
    }

    /// The configured base error, if any.
    pub fn base(&self) -> Option<&BaseError> {
        self.base.as_ref()
    }

    /// Consumes the wrapper and returns the original error.
    pub fn into_original(self) -> BoxError {
        self.original
    }

    /// Iterates the chain below the annotation: the original error and its
    /// sources, then the base error and its sources.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        let original: &(dyn Error + 'static) = &*self.original;
        let base = self.base.as_deref().map(|b| b as &(dyn Error + 'static));

        iter::successors(Some(original), |&e| e.source()).chain(
            base.into_iter()
                .flat_map(|b| iter::successors(Some(b), |&e| e.source())),
        )
    }

    /// Returns the first error of type `E` found in the chain.
    pub fn find<E: Error + 'static>(&self) -> Option<&E> {
        self.chain().find_map(|e| e.downcast_ref::<E>())
    }

    /// Returns `true` if an error of type `E` is found in the chain.
    pub fn is<E: Error + 'static>(&self) -> bool {
        self.find::<E>().is_some()
    }
}

impl fmt::Display for HandledError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            Some(base) => write!(f, "handle error: {base}: {}", self.original),
            None => write!(f, "handle error: {}", self.original),
        }
    }
}

impl Error for HandledError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    #[error("[base]")]
    struct Base;

    #[derive(Debug, thiserror::Error)]
    #[error("root cause")]
    struct Root;

    #[derive(Debug, thiserror::Error)]
    #[error("original: {0}")]
    struct Original(&'static str);

    #[derive(Debug, thiserror::Error)]
    #[error("wrapped")]
    struct Wrapped(#[source] Root);

    #[test]
    fn test_chain_contains_original_and_base() {
        let handled = HandledError::new(Box::new(Original("x")), Some(Arc::new(Base)));

        assert!(handled.is::<Original>());
        assert!(handled.is::<Base>());
        assert_eq!(handled.find::<Original>().map(|o| o.0), Some("x"));
        assert_eq!(handled.to_string(), "handle error: [base]: original: x");
    }

    #[test]
    fn test_chain_order_original_sources_then_base() {
        let handled = HandledError::new(Box::new(Wrapped(Root)), Some(Arc::new(Base)));

        let links: Vec<String> = handled.chain().map(|e| e.to_string()).collect();
        assert_eq!(links, vec!["wrapped", "root cause", "[base]"]);
        assert!(handled.chain().next().and_then(|e| e.downcast_ref::<Wrapped>()).is_some());
        assert!(handled.chain().last().and_then(|e| e.downcast_ref::<Base>()).is_some());
    }

    #[test]
    fn test_std_source_walk_exposes_original() {
        let handled = HandledError::new(Box::new(Wrapped(Root)), Some(Arc::new(Base)));

        let original = handled.source().expect("original link");
        assert!(original.downcast_ref::<Wrapped>().is_some());
        let root = original.source().expect("root link");
        assert!(root.downcast_ref::<Root>().is_some());
        assert!(root.source().is_none());
    }

    #[test]
    fn test_without_base_no_chaining() {
        let handled = HandledError::new(Box::new(Original("y")), None);

        assert!(handled.base().is_none());
        assert!(!handled.is::<Base>());
        assert_eq!(handled.chain().count(), 1);
        assert_eq!(handled.to_string(), "handle error: original: y");
    }

    #[test]
    fn test_into_original_returns_added_error() {
        let handled = HandledError::new(Box::new(Original("z")), Some(Arc::new(Base)));
        let original = handled.into_original();
        assert!(original.downcast_ref::<Original>().is_some());
    }
}
