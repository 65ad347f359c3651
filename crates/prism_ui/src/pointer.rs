//! Pointer tracking for one component root.
//!
//! Browsers report one physical press through several event families at once
//! (pointer events, touch events, and compatibility mouse events). The tracker
//! folds them into a single stream: the family that opens a session owns it,
//! everything else about that press is ignored.

use std::fmt;
use std::rc::Rc;

use crate::dom::{EventHost, ListenTarget, ListenerGuard};
use crate::event::{
    ContactPhase, EventKind, IgnoreReason, InputEvent, InputSource, MouseButton, PointerId,
};
use crate::layout::{Bounds, Point, Size};
use crate::lifecycle::ComponentId;

/// Compatibility mouse events within this many milliseconds of a touch
/// ending are treated as emulated and ignored.
pub const EMULATED_MOUSE_WINDOW_MS: f64 = 800.0;

/// Whether the platform binding should suppress the browser default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Default,
    /// Stops scrolling and emulated mouse events while dragging
    PreventDefault,
}

/// A start the tracker accepted but has not turned into a session yet.
///
/// The session only opens once the lifecycle has the lock, see
/// [`PointerTracker::open_session`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingStart {
    pub pointer: PointerId,
    pub source: InputSource,
    pub time_stamp: f64,
    pub local: Point,
}

/// What an event means for this component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tracked {
    Start(PendingStart),
    Move(Point),
    /// Session closed by a release at a known position
    End(Point),
    /// Session closed without a usable position
    Cancel,
    Ignored(IgnoreReason),
}

impl Tracked {
    /// A contact refused while a session is live is still suppressed, so the
    /// browser emits no compatibility mouse events for it.
    pub fn disposition(&self) -> Disposition {
        match self {
            Tracked::Ignored(IgnoreReason::Busy) => Disposition::PreventDefault,
            Tracked::Ignored(_) => Disposition::Default,
            _ => Disposition::PreventDefault,
        }
    }
}

/// One live drag.
#[derive(Debug)]
pub struct PointerSession {
    pointer: PointerId,
    source: InputSource,
    started_at: f64,
    last_local: Point,
    /// Document move/end listeners, attached for the session's lifetime
    _document: Option<ListenerGuard>,
}

impl PointerSession {
    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn last_local(&self) -> Point {
        self.last_local
    }
}

/// Normalizes raw input for one component root and tracks its session.
pub struct PointerTracker {
    owner: ComponentId,
    host: Option<Rc<dyn EventHost>>,
    root: Option<ListenerGuard>,
    session: Option<PointerSession>,
    last_touch_end: Option<f64>,
}

impl fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerTracker")
            .field("owner", &self.owner)
            .field("bound", &self.is_bound())
            .field("session", &self.session)
            .field("last_touch_end", &self.last_touch_end)
            .finish()
    }
}

impl PointerTracker {
    pub fn new(owner: ComponentId) -> Self {
        Self {
            owner,
            host: None,
            root: None,
            session: None,
            last_touch_end: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.root.is_some()
    }

    pub fn session(&self) -> Option<&PointerSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Attach start listeners to the root element. Binding twice is a no-op.
    pub fn bind(&mut self, host: Rc<dyn EventHost>) {
        if self.is_bound() {
            return;
        }
        self.root = Some(ListenerGuard::attach(
            &host,
            self.owner,
            ListenTarget::Root(self.owner),
            &EventKind::START,
        ));
        self.host = Some(host);
    }

    /// Detach every listener and drop any live session.
    ///
    /// Returns whether a session was live. Safe to call repeatedly.
    pub fn unbind(&mut self) -> bool {
        let had_session = self.session.take().is_some();
        self.root = None;
        self.host = None;
        had_session
    }

    /// Classify an event against the current session.
    ///
    /// `bounds` is the root element's rendered box and `intrinsic` the
    /// component's own size; local coordinates are in intrinsic units.
    pub fn track(&mut self, event: &InputEvent, bounds: Bounds, intrinsic: Size) -> Tracked {
        let source = event.source();
        let phase = event.phase();

        if event.is_touch() && matches!(phase, ContactPhase::End | ContactPhase::Cancel) {
            self.last_touch_end = Some(event.time_stamp);
        }
        if source == InputSource::Mouse && self.is_emulated_mouse(event.time_stamp) {
            log::trace!("Pointer: {} dropped emulated {:?}", self.owner, event.kind);
            return Tracked::Ignored(IgnoreReason::EmulatedMouse);
        }

        let tracked = match phase {
            ContactPhase::Start => self.track_start(event, bounds, intrinsic),
            ContactPhase::Move => self.track_move(event, bounds, intrinsic),
            ContactPhase::End => self.track_end(event, bounds, intrinsic),
            ContactPhase::Cancel => self.track_cancel(event),
        };
        if let Tracked::Ignored(reason) = tracked {
            log::trace!("Pointer: {} ignored {:?} ({:?})", self.owner, event.kind, reason);
        }
        tracked
    }

    fn is_emulated_mouse(&self, time_stamp: f64) -> bool {
        match self.last_touch_end {
            Some(end) => {
                let elapsed = time_stamp - end;
                (0.0..EMULATED_MOUSE_WINDOW_MS).contains(&elapsed)
            }
            None => false,
        }
    }

    fn track_start(&self, event: &InputEvent, bounds: Bounds, intrinsic: Size) -> Tracked {
        if self.session.is_some() {
            return Tracked::Ignored(IgnoreReason::Busy);
        }
        if matches!(event.button, Some(button) if button != MouseButton::Left) {
            return Tracked::Ignored(IgnoreReason::SecondaryButton);
        }
        match event.primary() {
            Some(contact) => Tracked::Start(PendingStart {
                pointer: contact.id,
                source: event.source(),
                time_stamp: event.time_stamp,
                local: bounds.to_local(contact.position, intrinsic),
            }),
            None => Tracked::Ignored(IgnoreReason::NoContact),
        }
    }

    /// Position of the session's own contact in `event`, if the event
    /// belongs to the session at all.
    fn session_contact(&self, event: &InputEvent) -> Option<Point> {
        let session = self.session.as_ref()?;
        if event.source() != session.source {
            return None;
        }
        event.contact(session.pointer).map(|c| c.position)
    }

    fn track_move(&mut self, event: &InputEvent, bounds: Bounds, intrinsic: Size) -> Tracked {
        let Some(position) = self.session_contact(event) else {
            return Tracked::Ignored(IgnoreReason::StaleInput);
        };
        let Some(session) = self.session.as_mut() else {
            return Tracked::Ignored(IgnoreReason::StaleInput);
        };
        if event.time_stamp < session.started_at {
            return Tracked::Ignored(IgnoreReason::StaleInput);
        }
        let local = bounds.to_local(position, intrinsic);
        session.last_local = local;
        Tracked::Move(local)
    }

    fn track_end(&mut self, event: &InputEvent, bounds: Bounds, intrinsic: Size) -> Tracked {
        let Some(position) = self.session_contact(event) else {
            return Tracked::Ignored(IgnoreReason::StaleInput);
        };
        self.close_session();
        Tracked::End(bounds.to_local(position, intrinsic))
    }

    fn track_cancel(&mut self, event: &InputEvent) -> Tracked {
        if self.session_contact(event).is_none() {
            return Tracked::Ignored(IgnoreReason::StaleInput);
        }
        self.close_session();
        Tracked::Cancel
    }

    /// Turn an accepted start into a live session, attaching document
    /// listeners when bound.
    pub fn open_session(&mut self, start: PendingStart) {
        let document = self.host.as_ref().map(|host| {
            ListenerGuard::attach(
                host,
                self.owner,
                ListenTarget::Document,
                &EventKind::DRAG,
            )
        });
        log::trace!("Pointer: {} session opened for {:?}", self.owner, start.pointer);
        self.session = Some(PointerSession {
            pointer: start.pointer,
            source: start.source,
            started_at: start.time_stamp,
            last_local: start.local,
            _document: document,
        });
    }

    /// Drop the live session and its document listeners.
    pub fn close_session(&mut self) -> Option<PointerSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            log::trace!("Pointer: {} session closed for {:?}", self.owner, session.pointer);
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ListenerRegistry;
    use crate::event::PointerType;

    const SIZE: Size = Size {
        width: 300.0,
        height: 28.0,
    };

    fn bounds() -> Bounds {
        Bounds::new(0.0, 0.0, 300.0, 28.0)
    }

    fn start(tracker: &mut PointerTracker, event: &InputEvent) {
        match tracker.track(event, bounds(), SIZE) {
            Tracked::Start(pending) => tracker.open_session(pending),
            other => panic!("expected start, got {:?}", other),
        }
    }

    #[test]
    fn test_document_listeners_follow_session() {
        let registry = ListenerRegistry::new();
        let owner = ComponentId::new(0);
        let mut tracker = PointerTracker::new(owner);
        tracker.bind(registry.as_host());
        tracker.bind(registry.as_host());
        assert_eq!(registry.count(ListenTarget::Root(owner)), 1);
        assert_eq!(registry.count(ListenTarget::Document), 0);

        start(
            &mut tracker,
            &InputEvent::mouse(EventKind::MouseDown, Point::new(10.0, 5.0), 1.0),
        );
        assert_eq!(registry.count(ListenTarget::Document), 1);

        let end = tracker.track(
            &InputEvent::mouse(EventKind::MouseUp, Point::new(20.0, 5.0), 2.0),
            bounds(),
            SIZE,
        );
        assert_eq!(end, Tracked::End(Point::new(20.0, 5.0)));
        assert_eq!(registry.count(ListenTarget::Document), 0);

        assert!(!tracker.unbind());
        assert!(!tracker.unbind());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_second_touch_is_ignored() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        start(
            &mut tracker,
            &InputEvent::touch(EventKind::TouchStart, [(1, Point::new(10.0, 0.0))], 1.0),
        );
        let second = InputEvent::touch(EventKind::TouchStart, [(2, Point::new(50.0, 0.0))], 2.0);
        assert_eq!(
            tracker.track(&second, bounds(), SIZE),
            Tracked::Ignored(IgnoreReason::Busy)
        );
        let other_move = InputEvent::touch(EventKind::TouchMove, [(2, Point::new(60.0, 0.0))], 3.0);
        assert_eq!(
            tracker.track(&other_move, bounds(), SIZE),
            Tracked::Ignored(IgnoreReason::StaleInput)
        );
        let own_move = InputEvent::touch(
            EventKind::TouchMove,
            [(2, Point::new(60.0, 0.0)), (1, Point::new(70.0, 0.0))],
            4.0,
        );
        assert_eq!(
            tracker.track(&own_move, bounds(), SIZE),
            Tracked::Move(Point::new(70.0, 0.0))
        );
    }

    #[test]
    fn test_moves_before_session_start_are_stale() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        start(
            &mut tracker,
            &InputEvent::mouse(EventKind::MouseDown, Point::zero(), 100.0),
        );
        let late = InputEvent::mouse(EventKind::MouseMove, Point::new(5.0, 0.0), 99.0);
        assert_eq!(
            tracker.track(&late, bounds(), SIZE),
            Tracked::Ignored(IgnoreReason::StaleInput)
        );
    }

    #[test]
    fn test_compat_mouse_after_touch_is_ignored() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        start(
            &mut tracker,
            &InputEvent::touch(EventKind::TouchStart, [(1, Point::zero())], 1.0),
        );
        let end = InputEvent::touch(EventKind::TouchEnd, [(1, Point::zero())], 10.0);
        assert_eq!(tracker.track(&end, bounds(), SIZE), Tracked::End(Point::zero()));

        let compat = InputEvent::mouse(EventKind::MouseDown, Point::zero(), 20.0);
        assert_eq!(
            tracker.track(&compat, bounds(), SIZE),
            Tracked::Ignored(IgnoreReason::EmulatedMouse)
        );
        let real = InputEvent::mouse(EventKind::MouseDown, Point::zero(), 1000.0);
        assert!(matches!(tracker.track(&real, bounds(), SIZE), Tracked::Start(_)));
    }

    #[test]
    fn test_compat_mouse_after_touch_pointer_is_ignored() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        let touch_pointer = |kind, t| {
            InputEvent::pointer(kind, 5, PointerType::Touch, Point::new(40.0, 4.0), t)
        };
        start(&mut tracker, &touch_pointer(EventKind::PointerDown, 0.0));

        let finger = InputEvent::touch(EventKind::TouchStart, [(5, Point::new(40.0, 4.0))], 0.0);
        let busy = tracker.track(&finger, bounds(), SIZE);
        assert_eq!(busy, Tracked::Ignored(IgnoreReason::Busy));
        assert_eq!(busy.disposition(), Disposition::PreventDefault);

        assert_eq!(
            tracker.track(&touch_pointer(EventKind::PointerUp, 50.0), bounds(), SIZE),
            Tracked::End(Point::new(40.0, 4.0))
        );
        let compat = InputEvent::mouse(EventKind::MouseDown, Point::new(40.0, 4.0), 60.0);
        assert_eq!(
            tracker.track(&compat, bounds(), SIZE),
            Tracked::Ignored(IgnoreReason::EmulatedMouse)
        );
    }

    #[test]
    fn test_pen_release_does_not_block_mouse() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        let pen = |kind, t| InputEvent::pointer(kind, 2, PointerType::Pen, Point::zero(), t);
        start(&mut tracker, &pen(EventKind::PointerDown, 0.0));
        tracker.track(&pen(EventKind::PointerUp, 5.0), bounds(), SIZE);

        let click = InputEvent::mouse(EventKind::MouseDown, Point::zero(), 10.0);
        assert!(matches!(tracker.track(&click, bounds(), SIZE), Tracked::Start(_)));
    }

    #[test]
    fn test_pointer_session_ignores_mouse_duplicates() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        start(
            &mut tracker,
            &InputEvent::pointer(
                EventKind::PointerDown,
                1,
                PointerType::Mouse,
                Point::zero(),
                1.0,
            ),
        );
        let duplicate = InputEvent::mouse(EventKind::MouseDown, Point::zero(), 1.0);
        assert_eq!(
            tracker.track(&duplicate, bounds(), SIZE),
            Tracked::Ignored(IgnoreReason::Busy)
        );
        let compat_move = InputEvent::mouse(EventKind::MouseMove, Point::new(9.0, 0.0), 2.0);
        assert_eq!(
            tracker.track(&compat_move, bounds(), SIZE),
            Tracked::Ignored(IgnoreReason::StaleInput)
        );
    }

    #[test]
    fn test_secondary_button_does_not_start() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        let right = InputEvent::mouse(EventKind::MouseDown, Point::zero(), 0.0)
            .with_button(MouseButton::Right);
        let tracked = tracker.track(&right, bounds(), SIZE);
        assert_eq!(tracked, Tracked::Ignored(IgnoreReason::SecondaryButton));
        assert_eq!(tracked.disposition(), Disposition::Default);
    }

    #[test]
    fn test_cancel_closes_session() {
        let mut tracker = PointerTracker::new(ComponentId::new(0));
        start(
            &mut tracker,
            &InputEvent::pointer(
                EventKind::PointerDown,
                4,
                PointerType::Pen,
                Point::zero(),
                0.0,
            ),
        );
        let cancel = InputEvent::pointer(
            EventKind::PointerCancel,
            4,
            PointerType::Pen,
            Point::zero(),
            1.0,
        );
        assert_eq!(tracker.track(&cancel, bounds(), SIZE), Tracked::Cancel);
        assert!(!tracker.is_active());
    }
}
