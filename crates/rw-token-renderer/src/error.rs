//! Error types for token rendering.

use std::error::Error as StdError;

/// Boxed error raised by a rule, handler or hook.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for rendering operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error from rendering.
///
/// The renderer never fails on its own: every error originates in a registered
/// rule, handler or hook and is returned to the caller of
/// [`Renderer::render`](crate::Renderer::render) unchanged, with the original
/// error available through [`source`](std::error::Error::source).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A rule, handler or hook failed.
    #[error("render extension failed")]
    Extension(#[from] BoxError),
}

impl Error {
    /// Wrap an arbitrary error raised by extension code.
    pub fn extension<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Extension(Box::new(err))
    }

    /// Create an extension error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Extension(message.into().into())
    }

    /// Borrow the original error if it is of type `E`.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Extension(inner) => inner.downcast_ref::<E>(),
        }
    }
}

/// Unrecognized lifecycle point name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown lifecycle point: {0}")]
pub struct UnknownLifecycle(pub String);

/// Unrecognized render mode name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown render mode: {0}")]
pub struct UnknownMode(pub String);

/// Nesting value outside `-1..=1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid nesting value: {0}")]
pub struct InvalidNesting(pub i8);
