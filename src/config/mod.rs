use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub mod roster;
pub mod settings;

pub use roster::{DeviceRoster, RosterFile, parse_roster};
pub use settings::Settings;

/// Главная конфигурация приложения
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Базовые настройки
    pub settings: Settings,
}

impl AppConfig {
    /// Загружает настройки из YAML файла, без файла берёт значения по умолчанию
    pub fn load(path: Option<impl AsRef<Path>>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let path = path.as_ref();
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Не удалось прочитать файл: {}", path.display()))?;
                serde_yml::from_str(&content).context("Не удалось распарсить YAML")?
            }
            None => Settings::default(),
        };

        Ok(Self { settings })
    }

    /// Таймаут одного SNMP запроса из SNMP_TIMEOUT_MS или из настроек
    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_millis(env_u64("SNMP_TIMEOUT_MS").unwrap_or(self.settings.connection.timeout_ms))
    }

    /// Таймаут обхода поддерева из SNMP_WALK_TIMEOUT_MS или из настроек
    pub fn get_walk_timeout(&self) -> Duration {
        Duration::from_millis(env_u64("SNMP_WALK_TIMEOUT_MS").unwrap_or(self.settings.walk.timeout_ms))
    }

    /// Период опроса из POLL_INTERVAL_SECS или из настроек
    pub fn get_interval(&self) -> Duration {
        Duration::from_secs(env_u64("POLL_INTERVAL_SECS").unwrap_or(self.settings.poll.interval_secs))
    }

    /// Путь к списку устройств из POLL_ROSTER или из настроек
    pub fn get_roster_path(&self) -> String {
        env::var("POLL_ROSTER").unwrap_or_else(|_| self.settings.poll.roster_path.clone())
    }

    pub fn get_worker_threads(&self) -> usize {
        self.settings.poll.worker_threads.max(1)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
