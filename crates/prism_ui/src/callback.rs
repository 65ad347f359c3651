//! Value-change callbacks handed to components by their owner.
//!
//! Components never mutate picker state beyond the active color. Everything
//! else is reported outward through a [`Callback`] that turns an
//! [`InputChange`] into the owner's message type.
//!
//! ```ignore
//! use prism_ui::{Callback, InputChange, Phase};
//!
//! enum Message {
//!     ColorInput(InputChange),
//! }
//!
//! let on_input: Callback<InputChange, Message> = Callback::new(Message::ColorInput);
//! ```

use std::fmt;
use std::rc::Rc;

use crate::lifecycle::{ComponentId, Phase};

/// An optional handler producing a message from a value.
///
/// Cloning shares the handler.
pub struct Callback<T, M> {
    f: Option<Rc<dyn Fn(T) -> M>>,
}

impl<T, M> Callback<T, M> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(T) -> M + 'static,
    {
        Self { f: Some(Rc::new(f)) }
    }

    /// A callback with no handler.
    pub fn none() -> Self {
        Self { f: None }
    }

    /// Call the handler, if any.
    pub fn call(&self, value: T) -> Option<M> {
        self.f.as_ref().map(|f| f(value))
    }

    pub fn is_some(&self) -> bool {
        self.f.is_some()
    }

    pub fn is_none(&self) -> bool {
        self.f.is_none()
    }
}

impl<T, M> Default for Callback<T, M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T, M> Clone for Callback<T, M> {
    fn clone(&self) -> Self {
        Self { f: self.f.clone() }
    }
}

impl<T, M> fmt::Debug for Callback<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("set", &self.is_some())
            .finish()
    }
}

/// Reported to the owner on every lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputChange {
    pub phase: Phase,
    /// Index of the color that was edited
    pub color_index: usize,
    pub component: ComponentId,
}
