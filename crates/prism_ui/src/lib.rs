//! prism_ui - Pointer-driven color picker components
//!
//! Sliders, wheels and boxes that turn mouse, pointer and touch input into
//! color channel updates, with a three-phase `Start`/`Move`/`End` lifecycle
//! and one active component per picker.

mod callback;
mod color;
mod component;
mod dom;
mod error;
mod event;
mod geometry;
mod layout;
mod lifecycle;
mod options;
mod pointer;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod tests;

pub use callback::{Callback, InputChange};
pub use color::{
    hsv_to_rgb, kelvin_to_rgb, rgb_to_hsv, rgb_to_kelvin, Channel, ChannelRange, Color, ColorSet,
    Rounding, Scale, KELVIN_MAX, KELVIN_MIN,
};
pub use component::{ColorComponent, EventResult};
pub use dom::{EventHost, ListenTarget, ListenerGuard, ListenerId, ListenerRegistry};
pub use error::{ColorParseError, ConfigError};
pub use event::{
    Contact, ContactPhase, EventKind, IgnoreReason, InputEvent, InputSource, MouseButton,
    PointerId, PointerType,
};
pub use geometry::{
    display_value, handle_position, position_to_value, value_to_position, BoxGeometry, Geometry,
    ShapeValue, SliderGeometry, WheelGeometry,
};
pub use layout::{Bounds, Point, Size};
pub use lifecycle::{ActiveLock, ComponentId, LifecycleController, LifecycleState, LockGuard, Phase};
pub use options::{ComponentConfig, ComponentKind, ComponentOptions, LayoutDirection, WheelDirection};
pub use pointer::{
    Disposition, PendingStart, PointerSession, PointerTracker, Tracked, EMULATED_MOUSE_WINDOW_MS,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::callback::InputChange;
    pub use crate::color::{Channel, Color, ColorSet};
    pub use crate::component::{ColorComponent, EventResult};
    pub use crate::dom::ListenerRegistry;
    pub use crate::event::{EventKind, InputEvent};
    pub use crate::layout::{Bounds, Point, Size};
    pub use crate::lifecycle::{ActiveLock, Phase};
    pub use crate::options::{ComponentKind, ComponentOptions};
}
