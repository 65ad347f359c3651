//! Component options and their resolution into validated geometry.
//!
//! [`ComponentOptions`] is the raw, serde-loadable form a picker hands to each
//! component. [`ComponentOptions::resolve`] checks every dimension once and
//! produces a [`ComponentConfig`]; nothing downstream re-validates.

use serde::{Deserialize, Serialize};

use crate::color::{Channel, ChannelRange, Rounding, KELVIN_MAX, KELVIN_MIN};
use crate::error::{ConfigError, Result};
use crate::geometry::{BoxGeometry, Geometry, SliderGeometry, WheelGeometry};
use crate::layout::{Point, Size};

/// Shape of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Linear track controlling one channel
    #[default]
    Slider,
    /// Hue around the center, saturation along the radius
    Wheel,
    /// Saturation along x, value along y
    Box,
}

/// Direction a slider track runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Horizontal,
    Vertical,
}

/// Direction hue increases around a wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelDirection {
    #[default]
    Anticlockwise,
    Clockwise,
}

/// Raw component options, as written in a picker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOptions {
    #[serde(default)]
    pub component: ComponentKind,

    #[serde(default)]
    pub layout_direction: LayoutDirection,

    /// Channel a slider controls
    #[serde(default, alias = "channel")]
    pub slider_type: Channel,

    #[serde(default = "default_min_temperature")]
    pub min_temperature: f32,

    #[serde(default = "default_max_temperature")]
    pub max_temperature: f32,

    #[serde(default = "default_handle_radius")]
    pub handle_radius: f32,

    #[serde(default = "default_padding")]
    pub padding: f32,

    /// Outer width; also the length of a vertical slider without `height`
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    /// Slider thickness across the track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slider_size: Option<f32>,

    #[serde(default)]
    pub border_width: f32,

    #[serde(default = "default_border_color")]
    pub border_color: String,

    /// Degrees at which hue 0 sits on a wheel
    #[serde(default)]
    pub wheel_angle: f32,

    #[serde(default)]
    pub wheel_direction: WheelDirection,

    /// Color this component edits instead of the picker's active color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<Rounding>,
}

fn default_min_temperature() -> f32 {
    2200.0
}

fn default_max_temperature() -> f32 {
    11000.0
}

fn default_handle_radius() -> f32 {
    8.0
}

fn default_padding() -> f32 {
    6.0
}

fn default_width() -> f32 {
    300.0
}

fn default_border_color() -> String {
    "#ffffff".to_string()
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            component: ComponentKind::default(),
            layout_direction: LayoutDirection::default(),
            slider_type: Channel::default(),
            min_temperature: default_min_temperature(),
            max_temperature: default_max_temperature(),
            handle_radius: default_handle_radius(),
            padding: default_padding(),
            width: default_width(),
            height: None,
            slider_size: None,
            border_width: 0.0,
            border_color: default_border_color(),
            wheel_angle: 0.0,
            wheel_direction: WheelDirection::default(),
            active_index: None,
            label: None,
            rounding: None,
        }
    }
}

impl ComponentOptions {
    /// Slider options for one channel.
    pub fn slider(channel: Channel) -> Self {
        Self::default().slider_type(channel)
    }

    /// Hue/saturation wheel options.
    pub fn wheel() -> Self {
        Self::default().component(ComponentKind::Wheel)
    }

    /// Saturation/value box options.
    pub fn saturation_box() -> Self {
        Self::default().component(ComponentKind::Box)
    }

    pub fn component(mut self, kind: ComponentKind) -> Self {
        self.component = kind;
        self
    }

    pub fn layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    pub fn slider_type(mut self, channel: Channel) -> Self {
        self.slider_type = channel;
        self
    }

    pub fn min_temperature(mut self, kelvin: f32) -> Self {
        self.min_temperature = kelvin;
        self
    }

    pub fn max_temperature(mut self, kelvin: f32) -> Self {
        self.max_temperature = kelvin;
        self
    }

    pub fn handle_radius(mut self, radius: f32) -> Self {
        self.handle_radius = radius;
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn slider_size(mut self, size: f32) -> Self {
        self.slider_size = Some(size);
        self
    }

    pub fn border_width(mut self, width: f32) -> Self {
        self.border_width = width;
        self
    }

    pub fn border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = color.into();
        self
    }

    pub fn wheel_angle(mut self, degrees: f32) -> Self {
        self.wheel_angle = degrees;
        self
    }

    pub fn wheel_direction(mut self, direction: WheelDirection) -> Self {
        self.wheel_direction = direction;
        self
    }

    pub fn active_index(mut self, index: usize) -> Self {
        self.active_index = Some(index);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = Some(rounding);
        self
    }

    /// Validate these options and compute the component's geometry.
    pub fn resolve(&self) -> Result<ComponentConfig> {
        check_dimension("width", self.width)?;
        if let Some(height) = self.height {
            check_dimension("height", height)?;
        }
        if let Some(size) = self.slider_size {
            check_dimension("sliderSize", size)?;
        }
        check_inset("handleRadius", self.handle_radius)?;
        check_inset("padding", self.padding)?;
        check_inset("borderWidth", self.border_width)?;

        let geometry = match self.component {
            ComponentKind::Slider => Geometry::Slider(self.resolve_slider()?),
            ComponentKind::Wheel => Geometry::Wheel(self.resolve_wheel()?),
            ComponentKind::Box => Geometry::Box(self.resolve_box()?),
        };

        Ok(ComponentConfig {
            label: self.label.clone().unwrap_or_else(|| self.default_label()),
            rounding: self.rounding.unwrap_or_else(|| self.default_rounding()),
            geometry,
            options: self.clone(),
        })
    }

    fn resolve_slider(&self) -> Result<SliderGeometry> {
        let range = if self.slider_type == Channel::Kelvin {
            self.temperature_range()?
        } else {
            self.slider_type.range()
        };

        let length = match self.layout_direction {
            LayoutDirection::Horizontal => self.width,
            LayoutDirection::Vertical => self.height.unwrap_or(self.width),
        };
        let handle_start = self.padding + self.handle_radius;
        let track_length = length - 2.0 * handle_start;
        if track_length <= 0.0 {
            return Err(ConfigError::TrackTooShort {
                shape: "slider",
                length,
                inset: 2.0 * handle_start,
            });
        }

        let thickness = self.slider_size.unwrap_or(2.0 * handle_start);
        check_dimension("sliderSize", thickness)?;

        Ok(SliderGeometry {
            direction: self.layout_direction,
            channel: self.slider_type,
            range,
            length,
            thickness,
            handle_start,
            track_length,
        })
    }

    fn temperature_range(&self) -> Result<ChannelRange> {
        let (min, max) = (self.min_temperature, self.max_temperature);
        let in_bounds = |t: f32| t.is_finite() && (KELVIN_MIN..=KELVIN_MAX).contains(&t);
        if !in_bounds(min) || !in_bounds(max) {
            return Err(ConfigError::TemperatureOutOfRange { min, max });
        }
        if min >= max {
            return Err(ConfigError::InvertedRange {
                channel: Channel::Kelvin.name(),
                min,
                max,
            });
        }
        Ok(ChannelRange::logarithmic(min, max))
    }

    fn resolve_wheel(&self) -> Result<WheelGeometry> {
        if !self.wheel_angle.is_finite() {
            return Err(ConfigError::InvalidAngle(self.wheel_angle));
        }
        let radius = self.width / 2.0;
        let inset = self.padding + self.handle_radius + self.border_width;
        let handle_range = radius - inset;
        if handle_range <= 0.0 {
            return Err(ConfigError::TrackTooShort {
                shape: "wheel",
                length: radius,
                inset,
            });
        }
        Ok(WheelGeometry {
            diameter: self.width,
            center: Point::new(radius, radius),
            handle_range,
            angle_offset: self.wheel_angle,
            direction: self.wheel_direction,
        })
    }

    fn resolve_box(&self) -> Result<BoxGeometry> {
        let width = self.width;
        let height = self.height.unwrap_or(width);
        let inset = self.padding + self.handle_radius;
        let range_x = width - 2.0 * inset;
        let range_y = height - 2.0 * inset;
        for (length, range) in [(width, range_x), (height, range_y)] {
            if range <= 0.0 {
                return Err(ConfigError::TrackTooShort {
                    shape: "box",
                    length,
                    inset: 2.0 * inset,
                });
            }
        }
        Ok(BoxGeometry {
            width,
            height,
            inset,
            range_x,
            range_y,
        })
    }

    fn default_label(&self) -> String {
        let label = match self.component {
            ComponentKind::Wheel => "HS",
            ComponentKind::Box => "SV",
            ComponentKind::Slider => match self.slider_type {
                Channel::Hue => "H",
                Channel::Saturation => "S",
                Channel::Value => "V",
                Channel::Red => "R",
                Channel::Green => "G",
                Channel::Blue => "B",
                Channel::Alpha => "A",
                Channel::Kelvin => "K",
            },
        };
        label.to_string()
    }

    fn default_rounding(&self) -> Rounding {
        match self.component {
            ComponentKind::Slider => self.slider_type.default_rounding(),
            ComponentKind::Wheel | ComponentKind::Box => Rounding::Round,
        }
    }
}

fn check_dimension(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::dimension(name, value))
    }
}

fn check_inset(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::inset(name, value))
    }
}

/// Validated component configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConfig {
    geometry: Geometry,
    label: String,
    rounding: Rounding,
    options: ComponentOptions,
}

impl ComponentConfig {
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Rounding applied to displayed values
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn active_index(&self) -> Option<usize> {
        self.options.active_index
    }

    pub fn border_color(&self) -> &str {
        &self.options.border_color
    }

    /// Options this configuration was resolved from
    pub fn options(&self) -> &ComponentOptions {
        &self.options
    }

    /// Intrinsic size of the component
    pub fn size(&self) -> Size {
        self.geometry.size()
    }
}

impl TryFrom<ComponentOptions> for ComponentConfig {
    type Error = ConfigError;

    fn try_from(options: ComponentOptions) -> Result<Self> {
        options.resolve()
    }
}
