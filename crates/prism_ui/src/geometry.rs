//! Geometry resolver: local position <-> channel value for each shape.
//!
//! All functions here are pure. Geometry values are only constructed by
//! [`ComponentOptions::resolve`](crate::ComponentOptions::resolve), which
//! rejects degenerate dimensions, so divisions below never see a zero track.

use std::f32::consts::TAU;

use crate::color::{Channel, ChannelRange, Color};
use crate::layout::{Point, Size};
use crate::options::{ComponentConfig, LayoutDirection, WheelDirection};

/// Resolved geometry of a linear slider.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderGeometry {
    pub direction: LayoutDirection,
    pub channel: Channel,
    pub range: ChannelRange,
    /// Outer extent along the track
    pub length: f32,
    /// Outer extent across the track
    pub thickness: f32,
    /// Distance from the near edge to the start of the handle's travel
    pub handle_start: f32,
    /// Length of the handle's travel, always > 0
    pub track_length: f32,
}

/// Resolved geometry of a hue/saturation wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelGeometry {
    pub diameter: f32,
    pub center: Point,
    /// Largest radial distance the handle can reach, always > 0
    pub handle_range: f32,
    /// Angle (degrees) at which hue 0 sits, measured anticlockwise from +x
    pub angle_offset: f32,
    pub direction: WheelDirection,
}

/// Resolved geometry of a saturation/value box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    /// Inset of the handle's travel from every edge
    pub inset: f32,
    /// Horizontal travel, always > 0
    pub range_x: f32,
    /// Vertical travel, always > 0
    pub range_y: f32,
}

/// Shape of a component, dispatched to the matching resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Slider(SliderGeometry),
    Wheel(WheelGeometry),
    Box(BoxGeometry),
}

/// Channel value(s) a shape maps a position to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeValue {
    /// One channel, as chosen by the slider
    Linear(f32),
    HueSaturation { hue: f32, saturation: f32 },
    SaturationValue { saturation: f32, value: f32 },
}

impl Geometry {
    /// Intrinsic size of the component.
    pub fn size(&self) -> Size {
        match self {
            Geometry::Slider(slider) => match slider.direction {
                LayoutDirection::Horizontal => Size::new(slider.length, slider.thickness),
                LayoutDirection::Vertical => Size::new(slider.thickness, slider.length),
            },
            Geometry::Wheel(wheel) => Size::new(wheel.diameter, wheel.diameter),
            Geometry::Box(bx) => Size::new(bx.width, bx.height),
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            Geometry::Slider(_) => "slider",
            Geometry::Wheel(_) => "wheel",
            Geometry::Box(_) => "box",
        }
    }

    /// Read the value(s) this shape controls from a color.
    pub fn read(&self, color: &Color) -> ShapeValue {
        match self {
            Geometry::Slider(slider) => ShapeValue::Linear(color.get(slider.channel)),
            Geometry::Wheel(_) => ShapeValue::HueSaturation {
                hue: color.get(Channel::Hue),
                saturation: color.get(Channel::Saturation),
            },
            Geometry::Box(_) => ShapeValue::SaturationValue {
                saturation: color.get(Channel::Saturation),
                value: color.get(Channel::Value),
            },
        }
    }

    /// Write resolved value(s) into a color. Returns whether anything changed.
    pub fn write(&self, value: ShapeValue, color: &mut Color) -> bool {
        let before = color.clone();
        match (self, value) {
            (Geometry::Slider(slider), ShapeValue::Linear(v)) => {
                color.set(slider.channel, v);
            }
            (Geometry::Wheel(_), ShapeValue::HueSaturation { hue, saturation }) => {
                color.set(Channel::Hue, hue);
                color.set(Channel::Saturation, saturation);
            }
            (Geometry::Box(_), ShapeValue::SaturationValue { saturation, value }) => {
                color.set(Channel::Saturation, saturation);
                color.set(Channel::Value, value);
            }
            (geometry, value) => {
                log::warn!(
                    "Geometry: {:?} does not fit a {}",
                    value,
                    geometry.shape_name()
                );
                return false;
            }
        }
        *color != before
    }
}

/// Map a local position to the value(s) the shape controls.
///
/// Positions outside the shape are clamped onto its travel, so the result is
/// always inside the channel ranges and finite.
pub fn position_to_value(geometry: &Geometry, local: Point) -> ShapeValue {
    let local = Point::new(nan_to_zero(local.x), nan_to_zero(local.y));
    match geometry {
        Geometry::Slider(slider) => ShapeValue::Linear(slider_value(slider, local)),
        Geometry::Wheel(wheel) => {
            let (hue, saturation) = wheel_value(wheel, local);
            ShapeValue::HueSaturation { hue, saturation }
        }
        Geometry::Box(bx) => {
            let (saturation, value) = box_value(bx, local);
            ShapeValue::SaturationValue { saturation, value }
        }
    }
}

/// Map value(s) to the handle position. Inverse of [`position_to_value`].
///
/// A value that does not fit the shape falls back to the shape's origin
/// handle position.
pub fn value_to_position(geometry: &Geometry, value: ShapeValue) -> Point {
    match (geometry, value) {
        (Geometry::Slider(slider), ShapeValue::Linear(v)) => slider_position(slider, v),
        (Geometry::Wheel(wheel), ShapeValue::HueSaturation { hue, saturation }) => {
            wheel_position(wheel, hue, saturation)
        }
        (Geometry::Box(bx), ShapeValue::SaturationValue { saturation, value }) => {
            box_position(bx, saturation, value)
        }
        (Geometry::Slider(slider), _) => slider_position(slider, slider.range.min),
        (Geometry::Wheel(wheel), _) => wheel.center,
        (Geometry::Box(bx), _) => box_position(bx, 0.0, 100.0),
    }
}

/// Center of the handle for `color`, in the component's intrinsic space.
pub fn handle_position(config: &ComponentConfig, color: &Color) -> Point {
    let geometry = config.geometry();
    value_to_position(geometry, geometry.read(color))
}

/// The value(s) shown next to the component, rounded by its policy.
pub fn display_value(config: &ComponentConfig, color: &Color) -> ShapeValue {
    let round = |v: f32| config.rounding().apply(v);
    match config.geometry().read(color) {
        ShapeValue::Linear(v) => ShapeValue::Linear(round(v)),
        ShapeValue::HueSaturation { hue, saturation } => ShapeValue::HueSaturation {
            hue: round(hue),
            saturation: round(saturation),
        },
        ShapeValue::SaturationValue { saturation, value } => ShapeValue::SaturationValue {
            saturation: round(saturation),
            value: round(value),
        },
    }
}

/// Infinities are kept: the per-shape clamps pin them to the far edge.
fn nan_to_zero(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

// =============================================================================
// Slider
// =============================================================================

/// Distance travelled along the track, clamped to `[0, track_length]`.
fn slider_travel(slider: &SliderGeometry, local: Point) -> f32 {
    let travel = match slider.direction {
        LayoutDirection::Horizontal => local.x - slider.handle_start,
        // Vertical sliders grow upwards.
        LayoutDirection::Vertical => slider.length - slider.handle_start - local.y,
    };
    travel.clamp(0.0, slider.track_length)
}

fn slider_value(slider: &SliderGeometry, local: Point) -> f32 {
    let ratio = slider_travel(slider, local) / slider.track_length;
    slider.range.from_ratio(ratio)
}

fn slider_position(slider: &SliderGeometry, value: f32) -> Point {
    let travel = slider.range.to_ratio(value) * slider.track_length;
    let across = slider.thickness / 2.0;
    match slider.direction {
        LayoutDirection::Horizontal => Point::new(slider.handle_start + travel, across),
        LayoutDirection::Vertical => {
            Point::new(across, slider.length - slider.handle_start - travel)
        }
    }
}

// =============================================================================
// Wheel
// =============================================================================

/// Normalize an angle in radians into `[0, TAU)`.
fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

fn wheel_value(wheel: &WheelGeometry, local: Point) -> (f32, f32) {
    let dx = local.x - wheel.center.x;
    // Screen y grows downwards; flip it so positive angles turn anticlockwise.
    let dy = wheel.center.y - local.y;

    let screen_angle = dy.atan2(dx);
    let directed = match wheel.direction {
        WheelDirection::Anticlockwise => screen_angle,
        WheelDirection::Clockwise => -screen_angle,
    };
    let hue_angle = normalize_angle(directed - wheel.angle_offset.to_radians());
    let mut hue = hue_angle.to_degrees();
    if hue >= 360.0 {
        hue = 0.0;
    }

    let distance = dx.hypot(dy).min(wheel.handle_range);
    let saturation = Channel::Saturation
        .range()
        .from_ratio(distance / wheel.handle_range);

    (hue, saturation)
}

fn wheel_position(wheel: &WheelGeometry, hue: f32, saturation: f32) -> Point {
    let hue_angle = Channel::Hue.range().clamp(hue).to_radians();
    let directed = hue_angle + wheel.angle_offset.to_radians();
    let screen_angle = match wheel.direction {
        WheelDirection::Anticlockwise => directed,
        WheelDirection::Clockwise => -directed,
    };
    let distance = Channel::Saturation.range().to_ratio(saturation) * wheel.handle_range;

    Point::new(
        wheel.center.x + distance * screen_angle.cos(),
        wheel.center.y - distance * screen_angle.sin(),
    )
}

// =============================================================================
// Box
// =============================================================================

fn box_value(bx: &BoxGeometry, local: Point) -> (f32, f32) {
    let ratio_x = ((local.x - bx.inset) / bx.range_x).clamp(0.0, 1.0);
    let ratio_y = ((local.y - bx.inset) / bx.range_y).clamp(0.0, 1.0);
    (
        Channel::Saturation.range().from_ratio(ratio_x),
        // Value is highest at the top edge.
        Channel::Value.range().from_ratio(1.0 - ratio_y),
    )
}

fn box_position(bx: &BoxGeometry, saturation: f32, value: f32) -> Point {
    let ratio_x = Channel::Saturation.range().to_ratio(saturation);
    let ratio_y = 1.0 - Channel::Value.range().to_ratio(value);
    Point::new(
        bx.inset + ratio_x * bx.range_x,
        bx.inset + ratio_y * bx.range_y,
    )
}
