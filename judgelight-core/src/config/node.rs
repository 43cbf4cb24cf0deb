//! Per-node configuration handed to each controller's constructor

use judgelight_protocol::{ModuleId, NodeAddress};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::timings::ProtocolTimings;

/// Configuration of one judge module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleConfig {
    /// Which seat this module occupies
    #[cfg_attr(feature = "serde", serde(with = "module_id_serde"))]
    pub module: ModuleId,
    pub timings: ProtocolTimings,
}

impl ModuleConfig {
    pub fn new(module: ModuleId) -> Self {
        Self {
            module,
            timings: ProtocolTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: ProtocolTimings) -> Self {
        self.timings = timings;
        self
    }

    /// This module's radio address
    pub fn address(&self) -> NodeAddress {
        self.module.address()
    }
}

/// Configuration of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HostConfig {
    pub timings: ProtocolTimings,
}

impl HostConfig {
    pub fn new(timings: ProtocolTimings) -> Self {
        Self { timings }
    }
}

#[cfg(feature = "serde")]
mod module_id_serde {
    use judgelight_protocol::ModuleId;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(module: &ModuleId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(module.index() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ModuleId, D::Error> {
        let index = u8::deserialize(deserializer)?;
        ModuleId::from_index(index as usize).ok_or_else(|| D::Error::custom("unknown module index"))
    }
}
