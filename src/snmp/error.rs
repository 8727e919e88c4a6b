use thiserror::Error;

/// Ошибки SNMP уровня: сессия, запросы, разбор OID
#[derive(Debug, Error)]
pub enum SnmpError {
    #[error("Не удалось открыть SNMP сессию к {target}: {reason}")]
    SessionOpen { target: String, reason: String },
    #[error("Нет ответа от {target} за {timeout_ms}мс (попыток: {attempts})")]
    RequestTimeout {
        target: String,
        timeout_ms: u128,
        attempts: u32,
    },
    #[error("SNMP ошибка: {0}")]
    Protocol(String),
    #[error("Невалидный OID: {0}")]
    InvalidOid(String),
    #[error("Агент вернул неупорядоченный OID {0}")]
    NotIncreasing(String),
    #[error("SNMP сессия уже закрыта")]
    Closed,
}
