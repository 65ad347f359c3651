//! Interaction lifecycle and the picker-wide active component lock.
//!
//! Every component runs an `Idle -> Dragging -> Idle` state machine. Entering
//! `Dragging` requires the [`ActiveLock`] shared by all components of one
//! picker; the lock is held through a [`LockGuard`] so it is released exactly
//! once per drag, whether the drag ends normally, is cancelled, or the
//! component goes away mid-drag.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::event::IgnoreReason;

/// Identity of a component within its picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Interaction phase attached to every value callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Start,
    Move,
    End,
}

impl Phase {
    /// Numeric code: `Start = 0`, `Move = 1`, `End = 2`.
    pub fn code(&self) -> u8 {
        match self {
            Phase::Start => 0,
            Phase::Move => 1,
            Phase::End => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Phase::Start),
            1 => Some(Phase::Move),
            2 => Some(Phase::End),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct LockState {
    holder: Cell<Option<ComponentId>>,
    next_id: Cell<u32>,
    /// Acquisitions refused because another component held the lock
    contentions: Cell<u64>,
}

/// Which component of a picker currently owns pointer input.
///
/// One lock per picker; every component holds a clone. The lock also hands
/// out component ids so ids are unique within the picker.
#[derive(Debug, Clone, Default)]
pub struct ActiveLock {
    state: Rc<LockState>,
}

impl ActiveLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new component sharing this lock.
    pub fn register(&self) -> ComponentId {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        ComponentId(id)
    }

    pub fn holder(&self) -> Option<ComponentId> {
        self.state.holder.get()
    }

    pub fn is_free(&self) -> bool {
        self.holder().is_none()
    }

    pub fn is_held_by(&self, id: ComponentId) -> bool {
        self.holder() == Some(id)
    }

    pub fn contentions(&self) -> u64 {
        self.state.contentions.get()
    }

    /// Take the lock for `id` if it is free.
    ///
    /// There is at most one guard per lock: a holder asking again gets
    /// `None`, and only a different component counts as contention.
    pub fn try_acquire(&self, id: ComponentId) -> Option<LockGuard> {
        match self.holder() {
            Some(holder) if holder == id => {
                log::trace!("ActiveLock: {} already holds the lock", id);
                None
            }
            Some(holder) => {
                self.state.contentions.set(self.state.contentions.get() + 1);
                log::debug!("ActiveLock: {} refused, held by {}", id, holder);
                None
            }
            None => {
                self.state.holder.set(Some(id));
                Some(LockGuard {
                    lock: self.clone(),
                    id,
                    released: false,
                })
            }
        }
    }

    fn release(&self, id: ComponentId) {
        if self.is_held_by(id) {
            self.state.holder.set(None);
            log::debug!("ActiveLock: released by {}", id);
        }
    }

    /// Whether two handles refer to the same lock.
    pub fn ptr_eq(&self, other: &ActiveLock) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Proof of holding the [`ActiveLock`]. Releases it when dropped.
#[derive(Debug)]
pub struct LockGuard {
    lock: ActiveLock,
    id: ComponentId,
    released: bool,
}

impl LockGuard {
    pub fn holder(&self) -> ComponentId {
        self.id
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            self.lock.release(self.id);
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.release_once();
    }
}

/// Lifecycle state of one component.
#[derive(Debug, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Dragging { guard: LockGuard },
}

impl LifecycleState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, LifecycleState::Dragging { .. })
    }
}

/// Drives one component's `Idle -> Dragging -> Idle` transitions.
#[derive(Debug)]
pub struct LifecycleController {
    id: ComponentId,
    lock: ActiveLock,
    state: LifecycleState,
}

impl LifecycleController {
    pub fn new(id: ComponentId, lock: ActiveLock) -> Self {
        Self {
            id,
            lock,
            state: LifecycleState::Idle,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn lock(&self) -> &ActiveLock {
        &self.lock
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Whether a start would be accepted right now.
    pub fn can_start(&self) -> bool {
        !self.is_dragging() && self.lock.is_free()
    }

    /// `Idle -> Dragging`. Refused while another component holds the lock.
    pub fn start(&mut self) -> Result<Phase, IgnoreReason> {
        if self.state.is_dragging() {
            return Err(IgnoreReason::Busy);
        }
        let guard = self
            .lock
            .try_acquire(self.id)
            .ok_or(IgnoreReason::LockContention)?;
        self.state = LifecycleState::Dragging { guard };
        log::debug!("Lifecycle: {} Idle -> Dragging", self.id);
        Ok(Phase::Start)
    }

    /// `Dragging -> Dragging`.
    pub fn advance(&self) -> Result<Phase, IgnoreReason> {
        if self.state.is_dragging() {
            Ok(Phase::Move)
        } else {
            Err(IgnoreReason::StaleInput)
        }
    }

    /// `Dragging -> Idle`, releasing the lock.
    pub fn end(&mut self) -> Result<Phase, IgnoreReason> {
        match std::mem::take(&mut self.state) {
            LifecycleState::Dragging { guard } => {
                guard.release();
                log::debug!("Lifecycle: {} Dragging -> Idle", self.id);
                Ok(Phase::End)
            }
            LifecycleState::Idle => Err(IgnoreReason::StaleInput),
        }
    }

    /// Return to `Idle` without emitting anything.
    pub fn abort(&mut self) {
        if let LifecycleState::Dragging { guard } = std::mem::take(&mut self.state) {
            log::debug!("Lifecycle: {} aborted mid-drag", self.id);
            guard.release();
        }
    }
}
