//! Color component shell: one slider, wheel or box wired to the pointer
//! tracker, the lifecycle controller and the geometry resolver.

use std::rc::Rc;

use crate::callback::{Callback, InputChange};
use crate::color::ColorSet;
use crate::dom::EventHost;
use crate::error::Result;
use crate::event::{IgnoreReason, InputEvent};
use crate::geometry::{self, ShapeValue};
use crate::layout::{Bounds, Point, Size};
use crate::lifecycle::{ActiveLock, ComponentId, LifecycleController, Phase};
use crate::options::{ComponentConfig, ComponentOptions};
use crate::pointer::{Disposition, PointerTracker, Tracked};

/// Outcome of feeding one event to a component.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult<M> {
    /// The event did not take part in an interaction
    Ignored(IgnoreReason),
    /// A lifecycle transition happened
    Handled {
        change: InputChange,
        /// Whether the color's value actually moved
        changed: bool,
        /// What the owner's callback produced
        message: Option<M>,
    },
}

impl<M> EventResult<M> {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled { .. })
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            EventResult::Handled { change, .. } => Some(change.phase),
            EventResult::Ignored(_) => None,
        }
    }

    pub fn ignore_reason(&self) -> Option<IgnoreReason> {
        match self {
            EventResult::Ignored(reason) => Some(*reason),
            EventResult::Handled { .. } => None,
        }
    }

    /// Take the callback's message, if one was produced.
    pub fn into_message(self) -> Option<M> {
        match self {
            EventResult::Handled { message, .. } => message,
            EventResult::Ignored(_) => None,
        }
    }

    pub fn disposition(&self) -> Disposition {
        match self {
            EventResult::Handled { .. } => Disposition::PreventDefault,
            EventResult::Ignored(IgnoreReason::Busy) => Disposition::PreventDefault,
            EventResult::Ignored(_) => Disposition::Default,
        }
    }
}

/// An interactive color component.
///
/// Created against the picker's [`ActiveLock`]; all components sharing one
/// lock are mutually exclusive while dragging.
pub struct ColorComponent<M> {
    id: ComponentId,
    config: ComponentConfig,
    tracker: PointerTracker,
    lifecycle: LifecycleController,
    /// Color edited by the current drag
    drag_target: Option<usize>,
    on_input: Callback<InputChange, M>,
}

impl<M> ColorComponent<M> {
    pub fn new(options: &ComponentOptions, lock: &ActiveLock) -> Result<Self> {
        let config = options.resolve()?;
        let id = lock.register();
        log::debug!(
            "Component: created {} as {}",
            id,
            config.geometry().shape_name()
        );
        Ok(Self {
            id,
            config,
            tracker: PointerTracker::new(id),
            lifecycle: LifecycleController::new(id, lock.clone()),
            drag_target: None,
            on_input: Callback::none(),
        })
    }

    /// Set the value-change handler.
    pub fn on_input<F>(mut self, f: F) -> Self
    where
        F: Fn(InputChange) -> M + 'static,
    {
        self.on_input = Callback::new(f);
        self
    }

    pub fn set_on_input(&mut self, callback: Callback<InputChange, M>) {
        self.on_input = callback;
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    /// Replace the configuration. A drag in progress carries on with the new
    /// geometry.
    pub fn set_config(&mut self, options: &ComponentOptions) -> Result<()> {
        self.config = options.resolve()?;
        Ok(())
    }

    pub fn label(&self) -> &str {
        self.config.label()
    }

    /// Intrinsic size
    pub fn size(&self) -> Size {
        self.config.size()
    }

    pub fn is_dragging(&self) -> bool {
        self.lifecycle.is_dragging()
    }

    pub fn is_bound(&self) -> bool {
        self.tracker.is_bound()
    }

    pub fn bind(&mut self, host: Rc<dyn EventHost>) {
        self.tracker.bind(host);
    }

    /// Detach all listeners. A drag in progress is dropped without an `End`
    /// and its lock released.
    pub fn unbind(&mut self) {
        if self.tracker.unbind() {
            log::debug!("Component: {} unbound mid-drag", self.id);
        }
        self.lifecycle.abort();
        self.drag_target = None;
    }

    /// Index of the color this component shows and edits.
    pub fn target_index(&self, colors: &ColorSet) -> Option<usize> {
        colors.resolve_active(self.config.active_index())
    }

    pub fn handle_position(&self, colors: &ColorSet) -> Option<Point> {
        let color = colors.get(self.target_index(colors)?)?;
        Some(geometry::handle_position(&self.config, color))
    }

    pub fn display_value(&self, colors: &ColorSet) -> Option<ShapeValue> {
        let color = colors.get(self.target_index(colors)?)?;
        Some(geometry::display_value(&self.config, color))
    }

    /// Feed one platform event.
    ///
    /// `bounds` is where the component is currently rendered, in the same
    /// client coordinates as the event.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        bounds: Bounds,
        colors: &mut ColorSet,
    ) -> EventResult<M> {
        match self.tracker.track(event, bounds, self.config.size()) {
            Tracked::Ignored(reason) => EventResult::Ignored(reason),
            Tracked::Start(pending) => {
                let Some(index) = self.target_index(colors) else {
                    return EventResult::Ignored(IgnoreReason::NoTarget);
                };
                match self.lifecycle.start() {
                    Ok(phase) => {
                        self.tracker.open_session(pending);
                        self.drag_target = Some(index);
                        self.emit(phase, Some(pending.local), index, colors)
                    }
                    Err(reason) => EventResult::Ignored(reason),
                }
            }
            Tracked::Move(local) => match self.lifecycle.advance() {
                Ok(phase) => match self.drag_index(colors) {
                    Some(index) => self.emit(phase, Some(local), index, colors),
                    None => EventResult::Ignored(IgnoreReason::NoTarget),
                },
                Err(reason) => EventResult::Ignored(reason),
            },
            Tracked::End(local) => self.finish(Some(local), colors),
            Tracked::Cancel => self.finish(None, colors),
        }
    }

    fn drag_index(&self, colors: &ColorSet) -> Option<usize> {
        self.drag_target
            .filter(|index| *index < colors.len())
            .or_else(|| self.target_index(colors))
    }

    /// Close the drag, releasing the lock before the owner is called back.
    fn finish(&mut self, local: Option<Point>, colors: &mut ColorSet) -> EventResult<M> {
        let index = self.drag_index(colors);
        self.drag_target = None;
        match self.lifecycle.end() {
            Ok(phase) => match index {
                Some(index) => self.emit(phase, local, index, colors),
                None => EventResult::Ignored(IgnoreReason::NoTarget),
            },
            Err(reason) => EventResult::Ignored(reason),
        }
    }

    fn emit(
        &self,
        phase: Phase,
        local: Option<Point>,
        index: usize,
        colors: &mut ColorSet,
    ) -> EventResult<M> {
        let changed = match (local, colors.get_mut(index)) {
            (Some(local), Some(color)) => {
                let geometry = self.config.geometry();
                let value = geometry::position_to_value(geometry, local);
                geometry.write(value, color)
            }
            _ => false,
        };
        let change = InputChange {
            phase,
            color_index: index,
            component: self.id,
        };
        log::trace!("Component: {} {:?} on color {}", self.id, phase, index);
        EventResult::Handled {
            change,
            changed,
            message: self.on_input.call(change),
        }
    }
}

impl<M> std::fmt::Debug for ColorComponent<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorComponent")
            .field("id", &self.id)
            .field("shape", &self.config.geometry().shape_name())
            .field("dragging", &self.is_dragging())
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Channel, Color};
    use crate::event::EventKind;

    fn red_slider(lock: &ActiveLock) -> ColorComponent<Phase> {
        ColorComponent::new(&ComponentOptions::slider(Channel::Red), lock)
            .unwrap()
            .on_input(|change| change.phase)
    }

    fn bounds() -> Bounds {
        Bounds::new(0.0, 0.0, 300.0, 28.0)
    }

    #[test]
    fn test_cancel_ends_without_writing() {
        let lock = ActiveLock::new();
        let mut slider = red_slider(&lock);
        let mut colors = ColorSet::new(vec![Color::from_rgb(0.0, 0.0, 0.0)]);

        let down = InputEvent::touch(EventKind::TouchStart, [(1, Point::new(150.0, 14.0))], 0.0);
        slider.handle_event(&down, bounds(), &mut colors);
        let red = colors.get(0).unwrap().get(Channel::Red);

        let cancel = InputEvent::touch(EventKind::TouchCancel, [(1, Point::new(300.0, 14.0))], 1.0);
        let result = slider.handle_event(&cancel, bounds(), &mut colors);
        assert_eq!(result.phase(), Some(Phase::End));
        assert!(matches!(result, EventResult::Handled { changed: false, .. }));
        assert_eq!(colors.get(0).unwrap().get(Channel::Red), red);
        assert!(lock.is_free());
    }

    #[test]
    fn test_empty_color_set_is_ignored() {
        let lock = ActiveLock::new();
        let mut slider = red_slider(&lock);
        let mut colors = ColorSet::default();
        let down = InputEvent::mouse(EventKind::MouseDown, Point::new(10.0, 10.0), 0.0);
        assert_eq!(
            slider.handle_event(&down, bounds(), &mut colors),
            EventResult::Ignored(IgnoreReason::NoTarget)
        );
        assert!(lock.is_free());
        assert!(!slider.is_dragging());
    }

    #[test]
    fn test_active_index_targets_other_color() {
        let lock = ActiveLock::new();
        let mut slider: ColorComponent<()> = ColorComponent::new(
            &ComponentOptions::slider(Channel::Red).active_index(1),
            &lock,
        )
        .unwrap();
        let mut colors = ColorSet::new(vec![
            Color::from_rgb(0.0, 0.0, 0.0),
            Color::from_rgb(0.0, 0.0, 0.0),
        ]);
        let down = InputEvent::mouse(EventKind::MouseDown, Point::new(300.0, 10.0), 0.0);
        let result = slider.handle_event(&down, bounds(), &mut colors);
        match result {
            EventResult::Handled { change, changed, .. } => {
                assert_eq!(change.color_index, 1);
                assert!(changed);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(colors.get(0).unwrap().get(Channel::Red), 0.0);
        assert!((colors.get(1).unwrap().get(Channel::Red) - 255.0).abs() < 0.01);
    }

    #[test]
    fn test_set_config_keeps_drag() {
        let lock = ActiveLock::new();
        let mut slider = red_slider(&lock);
        let mut colors = ColorSet::new(vec![Color::default()]);
        let down = InputEvent::mouse(EventKind::MouseDown, Point::new(10.0, 10.0), 0.0);
        slider.handle_event(&down, bounds(), &mut colors);

        slider
            .set_config(&ComponentOptions::slider(Channel::Green))
            .unwrap();
        assert!(slider.is_dragging());
        assert!(slider
            .set_config(&ComponentOptions::slider(Channel::Green).width(-1.0))
            .is_err());
        assert_eq!(slider.label(), "G");

        let up = InputEvent::mouse(EventKind::MouseUp, Point::new(10.0, 10.0), 1.0);
        assert_eq!(
            slider.handle_event(&up, bounds(), &mut colors).into_message(),
            Some(Phase::End)
        );
    }

    #[test]
    fn test_display_and_handle_follow_target() {
        let lock = ActiveLock::new();
        let slider = red_slider(&lock);
        let colors = ColorSet::new(vec![Color::from_rgb(255.0, 0.0, 0.0)]);
        assert_eq!(
            slider.display_value(&colors),
            Some(ShapeValue::Linear(255.0))
        );
        let handle = slider.handle_position(&colors).unwrap();
        assert!((handle.x - 286.0).abs() < 0.01);
        assert_eq!(slider.handle_position(&ColorSet::default()), None);
    }
}
