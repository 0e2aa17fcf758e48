//! Channel presence records.
//!
//! Emission fills host channels optimistically; once a node's overall
//! animation status is known, channels that are merely present (static and
//! carrying an identity-equivalent value) are pruned so the host is not
//! left with placeholder channels.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::slots::Slot;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    Unused,
    Present,
    Necessary,
}

/// Per-node presence of each logical channel. Owned by one reconciliation
/// call, like the slot table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PresenceTable {
    records: HashMap<Slot, Presence>,
}

impl PresenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Presence {
        self.records.get(&slot).copied().unwrap_or_default()
    }

    pub fn mark_present(&mut self, slot: Slot) {
        self.records.entry(slot).or_insert(Presence::Present);
    }

    /// Upgrade only; Necessary never decays back to Present.
    pub fn mark_necessary(&mut self, slot: Slot) {
        self.records.insert(slot, Presence::Necessary);
    }

    /// True when the channel may be dropped in the cleanup pass.
    pub fn is_prunable(&self, slot: Slot, animated: bool) -> bool {
        !animated && self.get(slot) != Presence::Necessary
    }
}
