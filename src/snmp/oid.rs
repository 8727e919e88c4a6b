use snmp2::Oid;

use super::SnmpError;

/// hrStorageEntry: описание, размер и занятость хранилищ
pub const HR_STORAGE_ENTRY: &str = ".1.3.6.1.2.1.25.2.3.1";
pub const HR_STORAGE_DESCR: &str = ".1.3.6.1.2.1.25.2.3.1.3";
pub const HR_STORAGE_SIZE: &str = ".1.3.6.1.2.1.25.2.3.1.5";
pub const HR_STORAGE_USED: &str = ".1.3.6.1.2.1.25.2.3.1.6";
/// hrSWRunName
pub const HR_SW_RUN_NAME: &str = ".1.3.6.1.2.1.25.4.2.1.2";
/// hrSWRunPerfMem (KB)
pub const HR_SW_RUN_PERF_MEM: &str = ".1.3.6.1.2.1.25.5.1.1.2";
/// hrProcessorLoad, одна строка на ядро
pub const HR_PROCESSOR_LOAD: &str = ".1.3.6.1.2.1.25.3.3.1.2";

/// Четыре поддерева, которые обходятся для каждого устройства
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OidFamily {
    Storage,
    ProcessName,
    ProcessMemory,
    CpuLoad,
}

impl OidFamily {
    pub const ALL: [OidFamily; 4] = [
        OidFamily::Storage,
        OidFamily::ProcessName,
        OidFamily::ProcessMemory,
        OidFamily::CpuLoad,
    ];

    pub fn root_oid(self) -> &'static str {
        match self {
            OidFamily::Storage => HR_STORAGE_ENTRY,
            OidFamily::ProcessName => HR_SW_RUN_NAME,
            OidFamily::ProcessMemory => HR_SW_RUN_PERF_MEM,
            OidFamily::CpuLoad => HR_PROCESSOR_LOAD,
        }
    }

    /// Поддерево, которому принадлежит `oid`, включая сам корень
    pub fn containing(oid: &str) -> Option<OidFamily> {
        let bare = oid.trim_start_matches('.');
        OidFamily::ALL.into_iter().find(|family| {
            let root = family.root_oid();
            bare == root.trim_start_matches('.') || in_subtree(root, bare)
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            OidFamily::Storage => "hrStorageEntry",
            OidFamily::ProcessName => "hrSWRunName",
            OidFamily::ProcessMemory => "hrSWRunPerfMem",
            OidFamily::CpuLoad => "hrProcessorLoad",
        }
    }
}

pub fn parse_oid(s: &str) -> Result<Oid<'static>, SnmpError> {
    let parts: Result<Vec<u64>, _> = s
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect();

    let parts = parts.map_err(|e| SnmpError::InvalidOid(format!("{}: {}", s, e)))?;
    Oid::from(&parts).map_err(|e| SnmpError::InvalidOid(format!("{}: {:?}", s, e)))
}

/// Приводит OID к виду с ведущей точкой: `1.3.6` -> `.1.3.6`
pub fn normalize_oid(oid: &str) -> String {
    if oid.starts_with('.') {
        oid.to_string()
    } else {
        format!(".{}", oid)
    }
}

/// Последний компонент OID, индекс строки таблицы
pub fn index_suffix(oid: &str) -> &str {
    oid.rsplit('.').next().unwrap_or(oid)
}

/// Проверяет, что `oid` лежит строго внутри поддерева `root`
pub fn in_subtree(root: &str, oid: &str) -> bool {
    let root = root.trim_start_matches('.');
    oid.trim_start_matches('.')
        .strip_prefix(root)
        .is_some_and(|rest| rest.starts_with('.'))
}
