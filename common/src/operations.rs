//! Abstract operations a [`Handler`] may be parametrized with.

use std::marker::PhantomData;

#[cfg(doc)]
use crate::Handler;

/// Operation to write a value, overwriting the previous one, if any.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation to read a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation to start a long-running process.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation to perform a single action, like an authentication attempt.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Selector of a `W` value by its `B` key.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] with the given value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns a reference to the inner value.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.by
    }
}
