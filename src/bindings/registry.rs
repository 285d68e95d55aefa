//! The fixed set of controls and the bindings each one owns

use crate::controls::{ControlChannel, ControlKind, CONTROLS_PER_KIND};

use super::{Binding, BindingId};

/// One control and its bindings, in creation order
#[derive(Debug, Clone)]
pub struct ControlSlot {
    channel: ControlChannel,
    bindings: Vec<Binding>,
}

impl ControlSlot {
    pub fn channel(&self) -> ControlChannel {
        self.channel
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut [Binding] {
        &mut self.bindings
    }
}

/// Registry of all 16 controls (8 knobs, then 8 sliders)
#[derive(Debug, Clone)]
pub struct InputRegistry {
    slots: Vec<ControlSlot>,
    next_id: u64,
}

impl Default for InputRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InputRegistry {
    pub fn new() -> Self {
        Self {
            slots: ControlChannel::all()
                .map(|channel| ControlSlot {
                    channel,
                    bindings: Vec::new(),
                })
                .collect(),
            next_id: 1,
        }
    }

    pub fn slots(&self) -> &[ControlSlot] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [ControlSlot] {
        &mut self.slots
    }

    fn slot_index(channel: ControlChannel) -> usize {
        let base = match channel.kind() {
            ControlKind::Knob => 0,
            ControlKind::Slider => CONTROLS_PER_KIND as usize,
        };
        base + channel.index() as usize
    }

    pub fn slot(&self, channel: ControlChannel) -> &ControlSlot {
        &self.slots[Self::slot_index(channel)]
    }

    pub fn slot_mut(&mut self, channel: ControlChannel) -> &mut ControlSlot {
        &mut self.slots[Self::slot_index(channel)]
    }

    pub fn bindings(&self, channel: ControlChannel) -> &[Binding] {
        &self.slot(channel).bindings
    }

    /// Add an empty binding to a control.
    ///
    /// If the control already holds an untouched empty binding, that one is
    /// returned instead, so a repeated command does not stack duplicates.
    pub fn create_binding(&mut self, channel: ControlChannel) -> BindingId {
        let id = BindingId(self.next_id);
        let fresh = Binding::new(id);

        let slot = self.slot_mut(channel);
        if let Some(existing) = slot.bindings.iter().find(|b| **b == fresh) {
            log::debug!("{} already has empty binding {}", channel, existing.id());
            return existing.id();
        }

        slot.bindings.push(fresh);
        self.next_id += 1;
        log::debug!("Created binding {} on {}", id, channel);
        id
    }

    /// Append an empty binding without the duplicate check.
    /// Used when rebuilding bindings from saved configuration.
    pub(crate) fn push_binding(&mut self, channel: ControlChannel) -> BindingId {
        let id = BindingId(self.next_id);
        self.next_id += 1;
        self.slot_mut(channel).bindings.push(Binding::new(id));
        log::debug!("Loaded binding {} on {}", id, channel);
        id
    }

    /// Remove a binding by identity. Returns false if the control does not own it.
    pub fn remove_binding(&mut self, channel: ControlChannel, id: BindingId) -> bool {
        let slot = self.slot_mut(channel);
        let before = slot.bindings.len();
        slot.bindings.retain(|b| b.id() != id);
        let removed = slot.bindings.len() != before;
        if removed {
            log::debug!("Removed binding {} from {}", id, channel);
        }
        removed
    }

    /// Drop every binding of every control
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.bindings.clear();
        }
        log::debug!("Cleared all bindings");
    }

    /// Total number of bindings across all controls
    pub fn binding_count(&self) -> usize {
        self.slots.iter().map(|s| s.bindings.len()).sum()
    }

    /// Control owning a binding
    pub fn channel_of(&self, id: BindingId) -> Option<ControlChannel> {
        self.slots
            .iter()
            .find(|s| s.bindings.iter().any(|b| b.id() == id))
            .map(|s| s.channel)
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.iter().map(|(_, b)| b).find(|b| b.id() == id)
    }

    pub fn binding_mut(&mut self, id: BindingId) -> Option<&mut Binding> {
        self.slots
            .iter_mut()
            .flat_map(|s| s.bindings.iter_mut())
            .find(|b| b.id() == id)
    }

    /// Every binding with its control, knobs first
    pub fn iter(&self) -> impl Iterator<Item = (ControlChannel, &Binding)> {
        self.slots
            .iter()
            .flat_map(|s| s.bindings.iter().map(move |b| (s.channel, b)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Binding> {
        self.slots.iter_mut().flat_map(|s| s.bindings.iter_mut())
    }
}
