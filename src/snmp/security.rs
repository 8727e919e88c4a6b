use snmp2::v3::{AuthProtocol, Cipher};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::config::Settings;
use crate::models::{MonitoredDevice, SnmpVersion};

/// Пользователь USM
#[derive(Debug, Clone)]
pub struct UsmUser {
    pub username: String,
    pub auth_protocol: AuthProtocol,
    pub auth_password: Vec<u8>,
    pub privacy_protocol: Cipher,
    pub privacy_password: Vec<u8>,
}

/// Общее на процесс хранилище пользователей SNMPv3.
///
/// Создаётся один раз при старте и передаётся во все резолверы.
#[derive(Debug, Default)]
pub struct UsmRegistry {
    users: RwLock<HashMap<String, UsmUser>>,
}

impl UsmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет или заменяет пользователя, возвращает сохранённую запись
    pub fn add_user(&self, user: UsmUser) -> UsmUser {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.insert(user.username.clone(), user.clone());
        user
    }

    pub fn user(&self, username: &str) -> Option<UsmUser> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.get(username).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub enum Credentials {
    Community(Vec<u8>),
    /// SNMPv3 authPriv
    Usm(UsmUser),
}

/// Куда и как ходить за данными одного устройства
#[derive(Debug, Clone)]
pub struct Target {
    pub address: String,
    pub version: SnmpVersion,
    pub retries: u32,
    pub timeout: Duration,
    pub credentials: Credentials,
}

/// Строит [`Target`] по устройству из списка
#[derive(Debug, Clone)]
pub struct TargetResolver {
    usm: Arc<UsmRegistry>,
    settings: Settings,
    timeout: Duration,
}

impl TargetResolver {
    pub fn new(usm: Arc<UsmRegistry>, settings: Settings, timeout: Duration) -> Self {
        Self {
            usm,
            settings,
            timeout,
        }
    }

    pub fn resolve(&self, device: &MonitoredDevice) -> Target {
        let credentials = match device.version {
            SnmpVersion::V3 => {
                let user = self.usm.add_user(UsmUser {
                    username: device.community.clone(),
                    auth_protocol: self.settings.get_auth_protocol(),
                    auth_password: device.password.clone().into_bytes(),
                    privacy_protocol: self.settings.get_privacy_protocol(),
                    privacy_password: device.password.clone().into_bytes(),
                });
                Credentials::Usm(user)
            }
            SnmpVersion::V2c => Credentials::Community(device.community.clone().into_bytes()),
        };

        Target {
            address: format!("{}:{}", device.ip_address, self.settings.connection.port),
            version: device.version,
            retries: self.settings.connection.retries,
            timeout: self.timeout,
            credentials,
        }
    }
}
