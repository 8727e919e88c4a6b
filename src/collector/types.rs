use std::collections::BTreeMap;
use std::fmt;

use crate::snmp::OidFamily;

/// Строки одного обхода: OID с ведущей точкой -> значение
pub type WalkResult = BTreeMap<String, String>;

/// Чем закончился обход поддерева
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStatus {
    Finished,
    Error(String),
    Timeout,
}

impl WalkStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, WalkStatus::Finished)
    }
}

impl fmt::Display for WalkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkStatus::Finished => write!(f, "success"),
            WalkStatus::Error(e) => write!(f, "error: {}", e),
            WalkStatus::Timeout => write!(f, "timeout"),
        }
    }
}

/// Результат обхода. Строки есть всегда, даже при ошибке или таймауте.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub family: OidFamily,
    pub rows: WalkResult,
    pub status: WalkStatus,
}

impl WalkOutcome {
    pub fn empty(family: OidFamily, status: WalkStatus) -> Self {
        Self {
            family,
            rows: WalkResult::new(),
            status,
        }
    }
}

/// Все четыре обхода одного устройства после join
#[derive(Debug, Clone)]
pub struct DeviceWalks {
    pub storage: WalkOutcome,
    pub process_names: WalkOutcome,
    pub process_memory: WalkOutcome,
    pub cpu_load: WalkOutcome,
}

impl DeviceWalks {
    pub fn iter(&self) -> impl Iterator<Item = &WalkOutcome> {
        [
            &self.storage,
            &self.process_names,
            &self.process_memory,
            &self.cpu_load,
        ]
        .into_iter()
    }
}
