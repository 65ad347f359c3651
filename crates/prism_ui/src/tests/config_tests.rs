//! Component options loaded from JSON.

use crate::{Channel, ComponentKind, ComponentOptions, ConfigError, LayoutDirection, Rounding};
use crate::{Geometry, WheelDirection};

fn parse(json: &str) -> ComponentOptions {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_empty_object_uses_defaults() {
    let options = parse("{}");
    assert_eq!(options, ComponentOptions::default());
    assert!(options.resolve().is_ok());
}

#[test]
fn test_camel_case_keys() {
    let options = parse(
        r##"{
            "component": "slider",
            "layoutDirection": "vertical",
            "sliderType": "kelvin",
            "minTemperature": 2500,
            "maxTemperature": 9000,
            "handleRadius": 10,
            "padding": 4,
            "width": 250,
            "height": 180,
            "sliderSize": 24,
            "borderWidth": 1,
            "borderColor": "#000000",
            "activeIndex": 1,
            "label": "Temperature",
            "rounding": "floor"
        }"##,
    );
    assert_eq!(options.layout_direction, LayoutDirection::Vertical);
    assert_eq!(options.slider_type, Channel::Kelvin);
    assert_eq!(options.height, Some(180.0));
    assert_eq!(options.active_index, Some(1));

    let config = options.resolve().unwrap();
    assert_eq!(config.label(), "Temperature");
    assert_eq!(config.rounding(), Rounding::Floor);
    assert_eq!(config.border_color(), "#000000");
    match config.geometry() {
        Geometry::Slider(slider) => {
            assert_eq!(slider.length, 180.0);
            assert_eq!(slider.thickness, 24.0);
            assert_eq!(slider.handle_start, 14.0);
            assert_eq!(slider.range.min, 2500.0);
            assert_eq!(slider.range.max, 9000.0);
        }
        other => panic!("unexpected geometry {:?}", other),
    }
}

#[test]
fn test_channel_alias() {
    let options = parse(r#"{ "channel": "alpha" }"#);
    assert_eq!(options.slider_type, Channel::Alpha);
    assert_eq!(options.resolve().unwrap().label(), "A");
}

#[test]
fn test_wheel_options() {
    let options = parse(
        r#"{ "component": "wheel", "wheelAngle": 90, "wheelDirection": "clockwise" }"#,
    );
    assert_eq!(options.component, ComponentKind::Wheel);
    assert_eq!(options.wheel_direction, WheelDirection::Clockwise);
    match options.resolve().unwrap().geometry() {
        Geometry::Wheel(wheel) => assert_eq!(wheel.angle_offset, 90.0),
        other => panic!("unexpected geometry {:?}", other),
    }
}

#[test]
fn test_unknown_variants_are_rejected() {
    assert!(serde_json::from_str::<ComponentOptions>(r#"{ "component": "ring" }"#).is_err());
    assert!(serde_json::from_str::<ComponentOptions>(r#"{ "sliderType": "cyan" }"#).is_err());
}

#[test]
fn test_invalid_values_fail_on_resolve() {
    let negative = parse(r#"{ "width": -10 }"#);
    assert_eq!(
        negative.resolve(),
        Err(ConfigError::InvalidDimension {
            name: "width",
            value: -10.0
        })
    );

    let crowded = parse(r#"{ "component": "box", "width": 40, "padding": 10, "handleRadius": 12 }"#);
    assert!(matches!(
        crowded.resolve(),
        Err(ConfigError::TrackTooShort { shape: "box", .. })
    ));

    let inverted = parse(r#"{ "sliderType": "kelvin", "minTemperature": 8000, "maxTemperature": 8000 }"#);
    assert!(matches!(
        inverted.resolve(),
        Err(ConfigError::InvertedRange { channel: "kelvin", .. })
    ));
}

#[test]
fn test_serialize_skips_unset_options() {
    let json = serde_json::to_value(ComponentOptions::slider(Channel::Hue)).unwrap();
    assert_eq!(json["sliderType"], "hue");
    assert!(json.get("height").is_none());
    assert!(json.get("activeIndex").is_none());

    let back: ComponentOptions = serde_json::from_value(json).unwrap();
    assert_eq!(back, ComponentOptions::slider(Channel::Hue));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::dimension("width", 0.0).to_string(),
        "invalid width: 0 (must be finite and greater than zero)"
    );
    assert_eq!(
        ConfigError::TemperatureOutOfRange {
            min: 100.0,
            max: 9000.0
        }
        .to_string(),
        "temperature bounds 100..9000 must lie within 2000..40000 K"
    );
}
