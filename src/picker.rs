//! A picker: colors plus a vertical stack of components sharing one lock.
//!
//! Frontends without a DOM feed raw [`InputEvent`]s to [`Picker::dispatch`],
//! which routes them the way a browser would: start events to the component
//! under the contact, drag events to whoever holds a document listener.

use prism_ui::{
    ActiveLock, Bounds, ColorComponent, ColorSet, ComponentId, ComponentOptions, ContactPhase,
    EventResult, InputChange, InputEvent, ListenTarget, ListenerRegistry, Phase, ShapeValue, Size,
};

use crate::config::PickerConfig;
use crate::error::{PickerError, Result};

/// Messages produced by picker components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    ColorInput(InputChange),
}

struct Slot {
    component: ColorComponent<Message>,
    bounds: Bounds,
}

pub struct Picker {
    colors: ColorSet,
    lock: ActiveLock,
    registry: ListenerRegistry,
    slots: Vec<Slot>,
    gap: f32,
    /// Whether an interaction is between its Start and End
    input_active: bool,
}

impl Picker {
    pub fn from_config(config: &PickerConfig) -> Result<Self> {
        let mut picker = Self {
            colors: config.color_set()?,
            lock: ActiveLock::new(),
            registry: ListenerRegistry::new(),
            slots: Vec::with_capacity(config.components.len()),
            gap: config.gap.max(0.0),
            input_active: false,
        };
        for (index, options) in config.components.iter().enumerate() {
            if let Err(e) = picker.push_component(options) {
                log::warn!("Picker: rejected component {}: {}", index, e);
                return Err(e);
            }
        }
        log::info!(
            "Picker: {} components over {} colors",
            picker.slots.len(),
            picker.colors.len()
        );
        Ok(picker)
    }

    /// Append a component below the existing ones.
    pub fn push_component(&mut self, options: &ComponentOptions) -> Result<ComponentId> {
        let index = self.slots.len();
        let mut component = ColorComponent::new(options, &self.lock)
            .map_err(|source| PickerError::Component { index, source })?
            .on_input(Message::ColorInput);
        component.bind(self.registry.as_host());
        let id = component.id();
        self.slots.push(Slot {
            component,
            bounds: Bounds::from_size(Size::zero()),
        });
        self.relayout();
        Ok(id)
    }

    /// Reconfigure a component in place. Rejected options leave it unchanged.
    pub fn set_component_options(&mut self, index: usize, options: &ComponentOptions) -> Result<()> {
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(PickerError::NoComponent(index));
        };
        if let Err(source) = slot.component.set_config(options) {
            log::warn!("Picker: rejected options for component {}: {}", index, source);
            return Err(PickerError::Component { index, source });
        }
        self.relayout();
        Ok(())
    }

    /// Remove a component. A drag it owns ends silently and frees the lock.
    pub fn remove_component(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        let slot = self.slots.remove(index);
        if slot.component.is_dragging() {
            self.input_active = false;
        }
        drop(slot);
        self.relayout();
        true
    }

    fn relayout(&mut self) {
        let mut y = 0.0;
        for slot in &mut self.slots {
            let size = slot.component.size();
            slot.bounds = Bounds::new(0.0, y, size.width, size.height);
            y += size.height + self.gap;
        }
    }

    /// Route one platform event, returning the messages it produced.
    pub fn dispatch(&mut self, event: &InputEvent) -> Vec<Message> {
        let targets: Vec<ComponentId> = match event.phase() {
            ContactPhase::Start => {
                let Some(contact) = event.primary() else {
                    return Vec::new();
                };
                self.slots
                    .iter()
                    .filter(|slot| slot.bounds.contains(contact.position))
                    .map(|slot| slot.component.id())
                    .filter(|id| {
                        self.registry
                            .owners(ListenTarget::Root(*id), event.kind)
                            .contains(id)
                    })
                    .take(1)
                    .collect()
            }
            ContactPhase::Move | ContactPhase::End | ContactPhase::Cancel => {
                self.registry.owners(ListenTarget::Document, event.kind)
            }
        };

        let mut messages = Vec::new();
        for id in targets {
            let Some(slot) = self.slots.iter_mut().find(|s| s.component.id() == id) else {
                continue;
            };
            match slot
                .component
                .handle_event(event, slot.bounds, &mut self.colors)
            {
                EventResult::Ignored(reason) => {
                    log::trace!("Picker: {} ignored {:?} ({:?})", id, event.kind, reason);
                }
                EventResult::Handled { message, .. } => messages.extend(message),
            }
        }
        messages
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::ColorInput(change) => {
                match change.phase {
                    Phase::Start => self.input_active = true,
                    Phase::Move => {}
                    Phase::End => self.input_active = false,
                }
                if let Some(color) = self.colors.get(change.color_index) {
                    let (h, s, v, a) = color.hsva();
                    log::debug!(
                        "Picker: {:?} from {} -> color {} {} (h {:.1} s {:.1} v {:.1} a {:.2})",
                        change.phase,
                        change.component,
                        change.color_index,
                        color.to_hex(),
                        h,
                        s,
                        v,
                        a
                    );
                }
            }
        }
    }

    pub fn is_input_active(&self) -> bool {
        self.input_active
    }

    pub fn colors(&self) -> &ColorSet {
        &self.colors
    }

    /// Switch the active color. Refused while an interaction is running.
    pub fn set_active_color(&mut self, index: usize) -> bool {
        if !self.lock.is_free() {
            return false;
        }
        self.colors.set_active(index)
    }

    pub fn lock(&self) -> &ActiveLock {
        &self.lock
    }

    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn component(&self, index: usize) -> Option<&ColorComponent<Message>> {
        self.slots.get(index).map(|slot| &slot.component)
    }

    /// Where a component sits in picker coordinates.
    pub fn bounds(&self, index: usize) -> Option<Bounds> {
        self.slots.get(index).map(|slot| slot.bounds)
    }

    /// Size of the whole stack.
    pub fn layout_size(&self) -> Size {
        let width = self
            .slots
            .iter()
            .map(|slot| slot.bounds.width)
            .fold(0.0, f32::max);
        let height = self
            .slots
            .last()
            .map_or(0.0, |slot| slot.bounds.y + slot.bounds.height);
        Size::new(width, height)
    }

    /// One `label: value` line per component.
    pub fn summary(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|slot| {
                let value = match slot.component.display_value(&self.colors) {
                    Some(ShapeValue::Linear(v)) => format!("{}", v),
                    Some(ShapeValue::HueSaturation { hue, saturation }) => {
                        format!("{} {}", hue, saturation)
                    }
                    Some(ShapeValue::SaturationValue { saturation, value }) => {
                        format!("{} {}", saturation, value)
                    }
                    None => "-".to_string(),
                };
                format!("{}: {}", slot.component.label(), value)
            })
            .collect()
    }
}

impl std::fmt::Debug for Picker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Picker")
            .field("colors", &self.colors)
            .field("components", &self.slots.len())
            .field("lock_holder", &self.lock.holder())
            .field("input_active", &self.input_active)
            .finish()
    }
}
