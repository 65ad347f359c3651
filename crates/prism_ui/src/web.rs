//! Browser binding: routes DOM events from a real element into a component.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, MouseEvent, PointerEvent,
    TouchEvent,
};

use crate::color::ColorSet;
use crate::component::ColorComponent;
use crate::dom::{EventHost, ListenTarget, ListenerId};
use crate::event::{EventKind, InputEvent, InputSource, MouseButton, PointerType};
use crate::layout::{Bounds, Point};
use crate::lifecycle::ComponentId;
use crate::pointer::Disposition;

/// [`EventHost`] backed by `addEventListener` on a root element and the
/// document.
///
/// All registrations share one JS closure, which lives as long as the host,
/// so removing listeners from inside a running handler is safe.
pub struct DomHost {
    root: Element,
    document: Document,
    handler: RefCell<Option<Closure<dyn FnMut(Event)>>>,
    next_id: Cell<u64>,
    registrations: RefCell<HashMap<ListenerId, (EventTarget, Vec<EventKind>)>>,
}

impl DomHost {
    fn new(root: Element, document: Document) -> Self {
        Self {
            root,
            document,
            handler: RefCell::new(None),
            next_id: Cell::new(0),
            registrations: RefCell::new(HashMap::new()),
        }
    }

    fn target(&self, target: ListenTarget) -> EventTarget {
        match target {
            ListenTarget::Root(_) => self.root.clone().into(),
            ListenTarget::Document => self.document.clone().into(),
        }
    }
}

impl EventHost for DomHost {
    fn listen(&self, _owner: ComponentId, target: ListenTarget, kinds: &[EventKind]) -> ListenerId {
        let id = ListenerId::new(self.next_id.get());
        self.next_id.set(id.raw() + 1);
        let event_target = self.target(target);

        if let Some(handler) = self.handler.borrow().as_ref() {
            // Touch listeners must not be passive or preventDefault is ignored.
            let options = AddEventListenerOptions::new();
            options.set_passive(false);
            for kind in kinds {
                if let Err(err) = event_target
                    .add_event_listener_with_callback_and_add_event_listener_options(
                        kind.dom_name(),
                        handler.as_ref().unchecked_ref(),
                        &options,
                    )
                {
                    log::warn!("Web: failed to listen for {}: {:?}", kind.dom_name(), err);
                }
            }
        }
        self.registrations
            .borrow_mut()
            .insert(id, (event_target, kinds.to_vec()));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let Some((event_target, kinds)) = self.registrations.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(handler) = self.handler.borrow().as_ref() {
            for kind in kinds {
                if let Err(err) = event_target.remove_event_listener_with_callback(
                    kind.dom_name(),
                    handler.as_ref().unchecked_ref(),
                ) {
                    log::warn!("Web: failed to unlisten {}: {:?}", kind.dom_name(), err);
                }
            }
        }
    }
}

/// A component bound to a DOM element. Unbinds when dropped.
pub struct WebComponent<M> {
    component: Rc<RefCell<ColorComponent<M>>>,
    host: Rc<DomHost>,
}

impl<M: 'static> WebComponent<M> {
    /// Bind `component` to `root`, editing `colors` and passing every
    /// callback message to `on_message`.
    pub fn attach<F>(
        component: ColorComponent<M>,
        root: Element,
        colors: Rc<RefCell<ColorSet>>,
        on_message: F,
    ) -> Result<Self, JsValue>
    where
        F: Fn(M) + 'static,
    {
        let document = root
            .owner_document()
            .ok_or_else(|| JsValue::from_str("element is not attached to a document"))?;
        let host = Rc::new(DomHost::new(root.clone(), document));
        let component = Rc::new(RefCell::new(component));

        let weak_component: Weak<RefCell<ColorComponent<M>>> = Rc::downgrade(&component);
        let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(component) = weak_component.upgrade() else {
                return;
            };
            let Some(input) = to_input_event(&event) else {
                return;
            };
            let rect = root.get_bounding_client_rect();
            let bounds = Bounds::new(
                rect.x() as f32,
                rect.y() as f32,
                rect.width() as f32,
                rect.height() as f32,
            );
            let result = {
                let Ok(mut component) = component.try_borrow_mut() else {
                    log::warn!("Web: re-entrant {} ignored", event.type_());
                    return;
                };
                let Ok(mut colors) = colors.try_borrow_mut() else {
                    log::warn!("Web: colors busy, {} ignored", event.type_());
                    return;
                };
                component.handle_event(&input, bounds, &mut colors)
            };
            if result.disposition() == Disposition::PreventDefault && event.cancelable() {
                event.prevent_default();
            }
            if let Some(message) = result.into_message() {
                on_message(message);
            }
        });
        *host.handler.borrow_mut() = Some(handler);

        let shared: Rc<dyn EventHost> = host.clone();
        component.borrow_mut().bind(shared);
        Ok(Self { component, host })
    }

    pub fn component(&self) -> &Rc<RefCell<ColorComponent<M>>> {
        &self.component
    }

    pub fn root(&self) -> &Element {
        &self.host.root
    }
}

impl<M> Drop for WebComponent<M> {
    fn drop(&mut self) {
        if let Ok(mut component) = self.component.try_borrow_mut() {
            component.unbind();
        }
    }
}

/// Translate a DOM event into an [`InputEvent`].
fn to_input_event(event: &Event) -> Option<InputEvent> {
    let kind = EventKind::from_dom_name(&event.type_())?;
    let time_stamp = event.time_stamp();
    match kind.source() {
        InputSource::Touch => {
            let touch_event = event.dyn_ref::<TouchEvent>()?;
            let touches = touch_event.changed_touches();
            let changed = (0..touches.length()).filter_map(|i| {
                let touch = touches.get(i)?;
                Some((
                    i64::from(touch.identifier()),
                    Point::new(touch.client_x() as f32, touch.client_y() as f32),
                ))
            });
            Some(InputEvent::touch(kind, changed, time_stamp))
        }
        InputSource::Pointer => {
            let pointer = event.dyn_ref::<PointerEvent>()?;
            let pointer_type = PointerType::from_dom_name(&pointer.pointer_type());
            let position = Point::new(pointer.client_x() as f32, pointer.client_y() as f32);
            let input = InputEvent::pointer(kind, pointer.pointer_id(), pointer_type, position, time_stamp);
            Some(match pointer_type {
                PointerType::Mouse => input.with_button(MouseButton::from_dom_code(pointer.button())),
                PointerType::Pen | PointerType::Touch => input,
            })
        }
        InputSource::Mouse => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            let position = Point::new(mouse.client_x() as f32, mouse.client_y() as f32);
            Some(
                InputEvent::mouse(kind, position, time_stamp)
                    .with_button(MouseButton::from_dom_code(mouse.button())),
            )
        }
    }
}
