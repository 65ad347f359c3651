//! Platform input events, normalized across mouse, pointer and touch sources.

use crate::layout::Point;

/// The raw event types a component listens for.
///
/// Names follow the DOM event names so a browser binding can register them
/// directly, while native hosts construct them from their own input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    MouseMove,
    MouseUp,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
}

/// Where an event sits in its contact's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Event family an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Pointer,
    Touch,
}

impl EventKind {
    /// Events that open a drag, listened for on the root element.
    pub const START: [EventKind; 3] = [
        EventKind::MouseDown,
        EventKind::PointerDown,
        EventKind::TouchStart,
    ];

    /// Events that continue or finish a drag, listened for on the document
    /// while a session is live.
    pub const DRAG: [EventKind; 8] = [
        EventKind::MouseMove,
        EventKind::MouseUp,
        EventKind::PointerMove,
        EventKind::PointerUp,
        EventKind::PointerCancel,
        EventKind::TouchMove,
        EventKind::TouchEnd,
        EventKind::TouchCancel,
    ];

    /// DOM event name
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::MouseDown => "mousedown",
            EventKind::MouseMove => "mousemove",
            EventKind::MouseUp => "mouseup",
            EventKind::PointerDown => "pointerdown",
            EventKind::PointerMove => "pointermove",
            EventKind::PointerUp => "pointerup",
            EventKind::PointerCancel => "pointercancel",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::TouchCancel => "touchcancel",
        }
    }

    /// Parse a DOM event name.
    pub fn from_dom_name(name: &str) -> Option<Self> {
        Self::START
            .iter()
            .chain(Self::DRAG.iter())
            .copied()
            .find(|kind| kind.dom_name() == name)
    }

    pub fn phase(&self) -> ContactPhase {
        match self {
            EventKind::MouseDown | EventKind::PointerDown | EventKind::TouchStart => {
                ContactPhase::Start
            }
            EventKind::MouseMove | EventKind::PointerMove | EventKind::TouchMove => {
                ContactPhase::Move
            }
            EventKind::MouseUp | EventKind::PointerUp | EventKind::TouchEnd => ContactPhase::End,
            EventKind::PointerCancel | EventKind::TouchCancel => ContactPhase::Cancel,
        }
    }

    pub fn source(&self) -> InputSource {
        match self {
            EventKind::MouseDown | EventKind::MouseMove | EventKind::MouseUp => InputSource::Mouse,
            EventKind::PointerDown
            | EventKind::PointerMove
            | EventKind::PointerUp
            | EventKind::PointerCancel => InputSource::Pointer,
            EventKind::TouchStart
            | EventKind::TouchMove
            | EventKind::TouchEnd
            | EventKind::TouchCancel => InputSource::Touch,
        }
    }
}

/// Why an event produced no interaction.
///
/// None of these are errors: they are the normal outcome for input that does
/// not belong to a live drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Move or end for a pointer with no live session, or older than it
    StaleInput,
    /// Another component of the picker is being dragged
    LockContention,
    /// A second contact started while a session was live
    Busy,
    /// A press with a button other than the primary one
    SecondaryButton,
    /// Mouse event synthesized by the browser after a touch
    EmulatedMouse,
    /// The event carries no contact point
    NoContact,
    /// The picker has no color to edit
    NoTarget,
}

/// Identity of the contact that produced an event.
///
/// Mouse input and mouse-type pointer events share `Mouse`, so a browser that
/// fires both `pointerdown` and `mousedown` for one press is seen as one
/// contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    Touch(i64),
    Pointer(i32),
}

/// `pointerType` of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

impl PointerType {
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "mouse" => PointerType::Mouse,
            "pen" => PointerType::Pen,
            _ => PointerType::Touch,
        }
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code.
    pub fn from_dom_code(code: i16) -> Self {
        match code {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            other => MouseButton::Other(other.max(0) as u16),
        }
    }
}

/// One contact point carried by an event, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: PointerId,
    pub position: Point,
}

/// A raw input event delivered by the platform.
///
/// Touch events carry their changed touches; mouse and pointer events carry
/// exactly one contact. `time_stamp` is in milliseconds on a clock that is
/// monotonic for the event source (`Event.timeStamp` in a browser).
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    pub time_stamp: f64,
    pub button: Option<MouseButton>,
    /// `pointerType`, for pointer events only
    pub pointer_type: Option<PointerType>,
    pub contacts: Vec<Contact>,
}

impl InputEvent {
    /// A primary-button mouse event.
    pub fn mouse(kind: EventKind, position: Point, time_stamp: f64) -> Self {
        Self {
            kind,
            time_stamp,
            button: Some(MouseButton::Left),
            pointer_type: None,
            contacts: vec![Contact {
                id: PointerId::Mouse,
                position,
            }],
        }
    }

    /// A pointer event. Mouse-type pointers collapse onto [`PointerId::Mouse`].
    pub fn pointer(
        kind: EventKind,
        pointer_id: i32,
        pointer_type: PointerType,
        position: Point,
        time_stamp: f64,
    ) -> Self {
        let (id, button) = match pointer_type {
            PointerType::Mouse => (PointerId::Mouse, Some(MouseButton::Left)),
            PointerType::Pen | PointerType::Touch => (PointerId::Pointer(pointer_id), None),
        };
        Self {
            kind,
            time_stamp,
            button,
            pointer_type: Some(pointer_type),
            contacts: vec![Contact { id, position }],
        }
    }

    /// A touch event with its changed touches as `(identifier, position)`.
    pub fn touch<I>(kind: EventKind, changed: I, time_stamp: f64) -> Self
    where
        I: IntoIterator<Item = (i64, Point)>,
    {
        Self {
            kind,
            time_stamp,
            button: None,
            pointer_type: None,
            contacts: changed
                .into_iter()
                .map(|(id, position)| Contact {
                    id: PointerId::Touch(id),
                    position,
                })
                .collect(),
        }
    }

    /// Override the mouse button.
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    pub fn phase(&self) -> ContactPhase {
        self.kind.phase()
    }

    pub fn source(&self) -> InputSource {
        self.kind.source()
    }

    /// Whether a finger produced this event, through touch or pointer events.
    ///
    /// Browsers follow a finger tap with compatibility mouse events.
    pub fn is_touch(&self) -> bool {
        match self.source() {
            InputSource::Touch => true,
            InputSource::Pointer => self.pointer_type == Some(PointerType::Touch),
            InputSource::Mouse => false,
        }
    }

    /// The contact with the given identity, if this event carries it.
    pub fn contact(&self, id: PointerId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// The first contact, used to open a session.
    pub fn primary(&self) -> Option<&Contact> {
        self.contacts.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_names_round_trip() {
        for kind in EventKind::START.iter().chain(EventKind::DRAG.iter()) {
            assert_eq!(EventKind::from_dom_name(kind.dom_name()), Some(*kind));
        }
        assert_eq!(EventKind::from_dom_name("click"), None);
    }

    #[test]
    fn test_start_and_drag_sets_are_disjoint() {
        for kind in EventKind::START {
            assert_eq!(kind.phase(), ContactPhase::Start);
            assert!(!EventKind::DRAG.contains(&kind));
        }
    }

    #[test]
    fn test_mouse_pointer_shares_identity() {
        let pointer = InputEvent::pointer(
            EventKind::PointerDown,
            1,
            PointerType::Mouse,
            Point::zero(),
            0.0,
        );
        let mouse = InputEvent::mouse(EventKind::MouseDown, Point::zero(), 0.0);
        assert_eq!(pointer.contacts[0].id, mouse.contacts[0].id);
    }

    #[test]
    fn test_touch_contact_lookup() {
        let event = InputEvent::touch(
            EventKind::TouchMove,
            [(3, Point::new(1.0, 2.0)), (7, Point::new(5.0, 6.0))],
            10.0,
        );
        assert_eq!(
            event.contact(PointerId::Touch(7)).map(|c| c.position),
            Some(Point::new(5.0, 6.0))
        );
        assert!(event.contact(PointerId::Mouse).is_none());
    }
}
