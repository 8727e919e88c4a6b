use serde::{Deserialize, Serialize};

/// Версия SNMP из списка устройств
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnmpVersion {
    V2c,
    V3,
}

impl SnmpVersion {
    /// Всё, что не "v3", опрашивается как v2c
    pub fn from_config_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "v3" => SnmpVersion::V3,
            "v2c" => SnmpVersion::V2c,
            other => {
                tracing::warn!(version = other, "Неизвестная версия SNMP, используется v2c");
                SnmpVersion::V2c
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SnmpVersion::V2c => "v2c",
            SnmpVersion::V3 => "v3",
        }
    }
}

/// Устройство из списка опроса. Для v3 `community` используется как имя пользователя.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredDevice {
    pub device_id: String,
    pub ip_address: String,
    pub community: String,
    pub version: SnmpVersion,
    pub password: String,
}
