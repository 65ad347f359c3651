//! prism - Pointer-driven color picker
//!
//! Stacks `prism_ui` components over a shared color collection, configured
//! from JSON. Runs as a winit input harness natively and binds to real DOM
//! elements on the web.

mod config;
mod error;
mod picker;

pub use config::{CONFIG_VERSION, ColorEntry, LogLevel, PickerConfig};
pub use error::{PickerError, Result};
pub use picker::{Message, Picker};

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
