//! Node addressing
//!
//! Addresses are fixed per deployment. The host and each judge module own
//! exactly one address; `BROADCAST` reaches every module at once.

/// Number of judge modules in a deployment
pub const NUM_MODULES: usize = 3;

/// 16-bit radio address of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeAddress(u16);

impl NodeAddress {
    /// The coordinating host
    pub const HOST: Self = Self(0x0001);
    /// Left judge module
    pub const LEFT: Self = Self(0x0002);
    /// Right judge module
    pub const RIGHT: Self = Self(0x0003);
    /// Center judge module
    pub const CENTER: Self = Self(0x0004);
    /// Delivered to every module
    pub const BROADCAST: Self = Self(0xFFFF);

    /// Wrap a raw address read off the wire
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw 16-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    pub fn is_broadcast(self) -> bool {
        self == Self::BROADCAST
    }

    pub fn is_host(self) -> bool {
        self == Self::HOST
    }

    /// The module owning this address, if any
    pub fn module(self) -> Option<ModuleId> {
        ModuleId::from_address(self)
    }
}

/// Identity of a judge module
///
/// The discriminant doubles as the index into per-module tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ModuleId {
    Left = 0,
    Right = 1,
    Center = 2,
}

impl ModuleId {
    /// All modules in index order
    pub const ALL: [ModuleId; NUM_MODULES] = [ModuleId::Left, ModuleId::Right, ModuleId::Center];

    /// Radio address of this module
    pub const fn address(self) -> NodeAddress {
        match self {
            ModuleId::Left => NodeAddress::LEFT,
            ModuleId::Right => NodeAddress::RIGHT,
            ModuleId::Center => NodeAddress::CENTER,
        }
    }

    /// Look up the module owning `address`
    pub fn from_address(address: NodeAddress) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.address() == address)
    }

    /// Index into per-module tables (0..NUM_MODULES)
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_are_distinct() {
        let mut all = [
            NodeAddress::HOST,
            NodeAddress::LEFT,
            NodeAddress::RIGHT,
            NodeAddress::CENTER,
            NodeAddress::BROADCAST,
        ];
        all.sort();
        for pair in all.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_module_lookup() {
        for module in ModuleId::ALL {
            assert_eq!(module.address().module(), Some(module));
            assert_eq!(ModuleId::from_index(module.index()), Some(module));
        }
        assert_eq!(NodeAddress::HOST.module(), None);
        assert_eq!(NodeAddress::BROADCAST.module(), None);
        assert_eq!(NodeAddress::from_raw(0x0042).module(), None);
    }

    #[test]
    fn test_module_indices_cover_table() {
        assert_eq!(ModuleId::ALL.len(), NUM_MODULES);
        assert_eq!(ModuleId::Center.index(), NUM_MODULES - 1);
        assert_eq!(ModuleId::from_index(NUM_MODULES), None);
    }
}
