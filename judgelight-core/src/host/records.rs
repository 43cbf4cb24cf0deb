//! Per-module records kept by the host

use judgelight_protocol::{ButtonColor, ModuleId, NUM_MODULES};

/// Whether a module has completed the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    Connected,
    NoConnect,
}

/// Last thing the host learned about a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteState {
    /// Nothing heard since the last reset
    Unknown,
    /// Handshake completed
    Ready,
    /// Last press received
    Pressed(ButtonColor),
    /// Lights cleared by the operator
    Cleared,
}

/// What the host knows about one module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleRecord {
    pub module: ModuleId,
    pub link_status: LinkStatus,
    pub last_known_state: RemoteState,
    /// A press arrived but its ack never made it onto the link
    pub pending_ack: bool,
}

impl ModuleRecord {
    pub fn new(module: ModuleId) -> Self {
        Self {
            module,
            link_status: LinkStatus::NoConnect,
            last_known_state: RemoteState::Unknown,
            pending_ack: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link_status == LinkStatus::Connected
    }

    /// Back to power-up values
    pub fn reset(&mut self) {
        *self = Self::new(self.module);
    }

    /// Forget indicator-related fields, keep the link
    pub fn clear_indicator(&mut self) {
        self.pending_ack = false;
        if self.is_connected() {
            self.last_known_state = RemoteState::Cleared;
        }
    }
}

/// One record per module, indexed by `ModuleId`
#[derive(Debug, Clone)]
pub struct ModuleTable {
    records: [ModuleRecord; NUM_MODULES],
}

impl Default for ModuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleTable {
    pub fn new() -> Self {
        Self {
            records: ModuleId::ALL.map(ModuleRecord::new),
        }
    }

    pub fn get(&self, module: ModuleId) -> &ModuleRecord {
        &self.records[module.index()]
    }

    pub fn get_mut(&mut self, module: ModuleId) -> &mut ModuleRecord {
        &mut self.records[module.index()]
    }

    pub fn all_connected(&self) -> bool {
        self.records.iter().all(ModuleRecord::is_connected)
    }

    /// Modules that have not completed the handshake
    pub fn missing(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.records
            .iter()
            .filter(|r| !r.is_connected())
            .map(|r| r.module)
    }

    pub fn connected_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_connected()).count()
    }

    pub fn reset_all(&mut self) {
        self.records.iter_mut().for_each(ModuleRecord::reset);
    }

    pub fn clear_indicators(&mut self) {
        self.records.iter_mut().for_each(ModuleRecord::clear_indicator);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_disconnected() {
        let table = ModuleTable::new();
        assert!(!table.all_connected());
        assert_eq!(table.connected_count(), 0);
        assert_eq!(table.missing().count(), NUM_MODULES);
        for module in ModuleId::ALL {
            assert_eq!(table.get(module).module, module);
        }
    }

    #[test]
    fn test_clear_keeps_link() {
        let mut table = ModuleTable::new();
        let left = table.get_mut(ModuleId::Left);
        left.link_status = LinkStatus::Connected;
        left.last_known_state = RemoteState::Pressed(ButtonColor::Red);
        left.pending_ack = true;

        table.clear_indicators();
        let left = table.get(ModuleId::Left);
        assert!(left.is_connected());
        assert_eq!(left.last_known_state, RemoteState::Cleared);
        assert!(!left.pending_ack);
        assert_eq!(table.get(ModuleId::Right).last_known_state, RemoteState::Unknown);
    }

    #[test]
    fn test_reset_drops_link() {
        let mut table = ModuleTable::new();
        for module in ModuleId::ALL {
            table.get_mut(module).link_status = LinkStatus::Connected;
        }
        assert!(table.all_connected());

        table.reset_all();
        assert_eq!(table.connected_count(), 0);
        assert_eq!(*table.get(ModuleId::Center), ModuleRecord::new(ModuleId::Center));
    }

    #[test]
    fn test_missing_lists_unconnected() {
        let mut table = ModuleTable::new();
        table.get_mut(ModuleId::Left).link_status = LinkStatus::Connected;
        table.get_mut(ModuleId::Center).link_status = LinkStatus::Connected;

        let missing: heapless::Vec<ModuleId, NUM_MODULES> = table.missing().collect();
        assert_eq!(missing.as_slice(), [ModuleId::Right]);
    }
}
