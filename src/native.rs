//! Native input harness: a winit window whose mouse and touch input drives a
//! [`Picker`]. Nothing is drawn; value changes are logged.

use prism_ui::{EventKind, InputEvent, MouseButton, Point};
use web_time::Instant;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, Event, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::PickerConfig;
use crate::error::{PickerError, Result};
use crate::picker::Picker;

/// Open a window for `config` and run until it is closed.
pub fn run(config: &PickerConfig) -> Result<()> {
    let mut picker = Picker::from_config(config)?;
    let size = picker.layout_size();

    let event_loop = EventLoop::new()
        .map_err(|e| PickerError::Platform(format!("Failed to create event loop: {:?}", e)))?;
    let window = WindowBuilder::new()
        .with_title("prism")
        .with_inner_size(winit::dpi::LogicalSize::new(size.width, size.height))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|e| PickerError::Platform(format!("Failed to create window: {:?}", e)))?;

    // Event timestamps are milliseconds since the window opened.
    let clock = Instant::now();
    let mut scale_factor = window.scale_factor();
    let mut cursor = Point::zero();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);

            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            let time_stamp = clock.elapsed().as_secs_f64() * 1000.0;
            let input = match event {
                WindowEvent::CloseRequested => {
                    log::info!("Final colors: {}", picker.summary().join(", "));
                    elwt.exit();
                    return;
                }
                WindowEvent::ScaleFactorChanged {
                    scale_factor: factor,
                    ..
                } => {
                    scale_factor = factor;
                    return;
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = to_logical(position, scale_factor);
                    InputEvent::mouse(EventKind::MouseMove, cursor, time_stamp)
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let button = match button {
                        winit::event::MouseButton::Left => MouseButton::Left,
                        winit::event::MouseButton::Right => MouseButton::Right,
                        winit::event::MouseButton::Middle => MouseButton::Middle,
                        winit::event::MouseButton::Other(n) => MouseButton::Other(n),
                        _ => return,
                    };
                    let kind = match state {
                        ElementState::Pressed => EventKind::MouseDown,
                        ElementState::Released => EventKind::MouseUp,
                    };
                    InputEvent::mouse(kind, cursor, time_stamp).with_button(button)
                }
                WindowEvent::Touch(touch) => {
                    let kind = match touch.phase {
                        TouchPhase::Started => EventKind::TouchStart,
                        TouchPhase::Moved => EventKind::TouchMove,
                        TouchPhase::Ended => EventKind::TouchEnd,
                        TouchPhase::Cancelled => EventKind::TouchCancel,
                    };
                    let id = i64::try_from(touch.id).unwrap_or(i64::MAX);
                    InputEvent::touch(
                        kind,
                        [(id, to_logical(touch.location, scale_factor))],
                        time_stamp,
                    )
                }
                _ => return,
            };

            for message in picker.dispatch(&input) {
                picker.update(message);
            }
            if !picker.is_input_active() && input.kind != EventKind::MouseMove {
                log::debug!("{}", picker.summary().join(", "));
            }
        })
        .map_err(|e| PickerError::Platform(format!("Event loop error: {:?}", e)))
}

fn to_logical(position: PhysicalPosition<f64>, scale_factor: f64) -> Point {
    let logical = position.to_logical::<f32>(scale_factor);
    Point::new(logical.x, logical.y)
}
