use serde::{Deserialize, Serialize};
use snmp2::v3::{AuthProtocol, Cipher};

/// Базовые настройки приложения
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Настройки подключения
    pub connection: ConnectionSettings,
    /// Настройки обхода поддеревьев
    pub walk: WalkSettings,
    /// Настройки цикла опроса
    pub poll: PollSettings,
    /// Уровень логирования, если не задан RUST_LOG
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// UDP порт агента
    pub port: u16,
    /// Таймаут одного SNMP запроса (миллисекунды)
    pub timeout_ms: u64,
    /// Количество повторов запроса
    pub retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkSettings {
    /// max-repetitions для GETBULK
    pub max_repetitions: u32,
    /// Сколько ждём весь обход одного поддерева (миллисекунды)
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Период опроса (секунды)
    pub interval_secs: u64,
    /// Размер пула рабочих потоков
    pub worker_threads: usize,
    /// Файл со списком устройств
    pub roster_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub String);

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: 161,
            timeout_ms: 7000,
            retries: 1,
        }
    }
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            max_repetitions: 100,
            timeout_ms: 8000,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            worker_threads: 10,
            roster_path: "config/servers.txt".to_string(),
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl Settings {
    /// Получает протокол аутентификации (всегда MD5)
    pub fn get_auth_protocol(&self) -> AuthProtocol {
        AuthProtocol::Md5
    }

    /// Получает протокол шифрования (всегда AES128)
    pub fn get_privacy_protocol(&self) -> Cipher {
        Cipher::Aes128
    }
}
