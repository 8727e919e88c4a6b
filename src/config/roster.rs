use std::path::PathBuf;

use crate::models::{MonitoredDevice, SnmpVersion};

/// Источник списка устройств на один цикл опроса
pub trait DeviceRoster: Send + Sync {
    fn load(&self) -> Vec<MonitoredDevice>;
}

impl DeviceRoster for Vec<MonitoredDevice> {
    fn load(&self) -> Vec<MonitoredDevice> {
        self.clone()
    }
}

/// Плоский файл: `deviceid,ip,community,version,password` на строку
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeviceRoster for RosterFile {
    /// Перечитывает файл на каждом цикле. Нет файла -> пустой список.
    fn load(&self) -> Vec<MonitoredDevice> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_roster(&content),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Не удалось прочитать список устройств");
                Vec::new()
            }
        }
    }
}

pub fn parse_roster(content: &str) -> Vec<MonitoredDevice> {
    content
        .lines()
        .enumerate()
        .filter_map(|(n, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 5 {
                tracing::warn!(line = n + 1, fields = fields.len(), "Строка списка устройств пропущена");
                return None;
            }
            Some(MonitoredDevice {
                device_id: fields[0].to_string(),
                ip_address: fields[1].to_string(),
                community: fields[2].to_string(),
                version: SnmpVersion::from_config_str(fields[3]),
                password: fields[4].to_string(),
            })
        })
        .collect()
}
