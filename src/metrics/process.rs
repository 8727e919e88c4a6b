use std::collections::HashMap;

use crate::collector::WalkResult;
use crate::models::ProcessEntry;
use crate::snmp::oid::index_suffix;

/// Склеивает hrSWRunName и hrSWRunPerfMem по индексу процесса.
///
/// Имена без парной строки памяти (и наоборот) пропускаются.
pub fn join_processes(name_rows: &WalkResult, memory_rows: &WalkResult) -> Vec<ProcessEntry> {
    let memory_by_index: HashMap<&str, &String> = memory_rows
        .iter()
        .map(|(oid, value)| (index_suffix(oid), value))
        .collect();

    name_rows
        .iter()
        .filter_map(|(oid, name)| {
            memory_by_index
                .get(index_suffix(oid))
                .map(|memory_kb| ProcessEntry {
                    name: name.clone(),
                    memory_kb: (*memory_kb).clone(),
                })
        })
        .collect()
}
