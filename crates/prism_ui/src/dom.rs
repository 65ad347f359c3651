//! Listener registration seam between components and their host.
//!
//! A component never talks to a DOM directly. It asks an [`EventHost`] to
//! route some [`EventKind`]s from a [`ListenTarget`] to it, and keeps the
//! returned [`ListenerGuard`]. Dropping or releasing the guard detaches the
//! listeners, once.
//!
//! [`ListenerRegistry`] is the headless host used by native pickers and tests;
//! the browser binding lives in `web`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::event::EventKind;
use crate::lifecycle::ComponentId;

/// Where a set of listeners is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    /// The root element of one component
    Root(ComponentId),
    /// The whole document, for drags that leave the root element
    Document,
}

/// Handle for one registration made through an [`EventHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Something that can deliver platform events to a component.
pub trait EventHost {
    /// Start delivering `kinds` from `target` to `owner`.
    fn listen(&self, owner: ComponentId, target: ListenTarget, kinds: &[EventKind]) -> ListenerId;

    /// Stop a registration. Unknown ids are ignored.
    fn unlisten(&self, id: ListenerId);
}

/// Scoped registration: detaches its listeners when released or dropped.
pub struct ListenerGuard {
    host: Rc<dyn EventHost>,
    id: Option<ListenerId>,
    target: ListenTarget,
}

impl ListenerGuard {
    pub fn attach(
        host: &Rc<dyn EventHost>,
        owner: ComponentId,
        target: ListenTarget,
        kinds: &[EventKind],
    ) -> Self {
        let id = host.listen(owner, target, kinds);
        log::trace!("Listeners: {:?} attached {} kinds on {:?}", owner, kinds.len(), target);
        Self {
            host: Rc::clone(host),
            id: Some(id),
            target,
        }
    }

    pub fn target(&self) -> ListenTarget {
        self.target
    }

    pub fn is_attached(&self) -> bool {
        self.id.is_some()
    }

    /// Detach now. Later calls and the eventual drop do nothing.
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.host.unlisten(id);
            log::trace!("Listeners: detached {:?} from {:?}", id, self.target);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish()
    }
}

#[derive(Debug, Clone)]
struct Registration {
    owner: ComponentId,
    target: ListenTarget,
    kinds: Vec<EventKind>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: Cell<u64>,
    registrations: RefCell<HashMap<ListenerId, Registration>>,
}

/// In-memory [`EventHost`] that records registrations for later routing.
///
/// Clones share the same registrations.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RegistryInner>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// This registry as a shareable host handle.
    pub fn as_host(&self) -> Rc<dyn EventHost> {
        Rc::new(self.clone())
    }

    /// Components with a listener for `kind` on `target`, in registration
    /// order.
    pub fn owners(&self, target: ListenTarget, kind: EventKind) -> Vec<ComponentId> {
        let registrations = self.inner.registrations.borrow();
        let mut matches: Vec<(ListenerId, ComponentId)> = registrations
            .iter()
            .filter(|(_, r)| r.target == target && r.kinds.contains(&kind))
            .map(|(id, r)| (*id, r.owner))
            .collect();
        matches.sort_by_key(|(id, _)| id.raw());
        let mut owners: Vec<ComponentId> = Vec::with_capacity(matches.len());
        for (_, owner) in matches {
            if !owners.contains(&owner) {
                owners.push(owner);
            }
        }
        owners
    }

    /// Number of live registrations on `target`.
    pub fn count(&self, target: ListenTarget) -> usize {
        self.inner
            .registrations
            .borrow()
            .values()
            .filter(|r| r.target == target)
            .count()
    }

    /// Number of live registrations made by `owner`.
    pub fn count_for(&self, owner: ComponentId) -> usize {
        self.inner
            .registrations
            .borrow()
            .values()
            .filter(|r| r.owner == owner)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registrations.borrow().is_empty()
    }
}

impl EventHost for ListenerRegistry {
    fn listen(&self, owner: ComponentId, target: ListenTarget, kinds: &[EventKind]) -> ListenerId {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.registrations.borrow_mut().insert(
            id,
            Registration {
                owner,
                target,
                kinds: kinds.to_vec(),
            },
        );
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.inner.registrations.borrow_mut().remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_detaches_on_drop() {
        let registry = ListenerRegistry::new();
        let host = registry.as_host();
        let owner = ComponentId::new(1);
        {
            let _guard = ListenerGuard::attach(&host, owner, ListenTarget::Document, &EventKind::DRAG);
            assert_eq!(registry.count(ListenTarget::Document), 1);
            assert_eq!(
                registry.owners(ListenTarget::Document, EventKind::TouchMove),
                vec![owner]
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_release_is_idempotent() {
        let registry = ListenerRegistry::new();
        let host = registry.as_host();
        let mut guard = ListenerGuard::attach(
            &host,
            ComponentId::new(1),
            ListenTarget::Root(ComponentId::new(1)),
            &EventKind::START,
        );
        // A second registration must survive the first guard's double release.
        let _other = ListenerGuard::attach(
            &host,
            ComponentId::new(2),
            ListenTarget::Root(ComponentId::new(2)),
            &EventKind::START,
        );
        guard.release();
        guard.release();
        drop(guard);
        assert_eq!(registry.count_for(ComponentId::new(1)), 0);
        assert_eq!(registry.count_for(ComponentId::new(2)), 1);
    }

    #[test]
    fn test_owners_filters_by_kind_and_target() {
        let registry = ListenerRegistry::new();
        let a = ComponentId::new(1);
        let b = ComponentId::new(2);
        registry.listen(a, ListenTarget::Root(a), &EventKind::START);
        registry.listen(b, ListenTarget::Root(b), &EventKind::START);
        assert_eq!(
            registry.owners(ListenTarget::Root(b), EventKind::MouseDown),
            vec![b]
        );
        assert!(registry
            .owners(ListenTarget::Root(a), EventKind::MouseMove)
            .is_empty());
    }
}
