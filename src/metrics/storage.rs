use std::collections::BTreeMap;

use super::label::decode_label;
use super::{MetricError, mean};
use crate::collector::WalkResult;
use crate::models::MetricCategory;
use crate::snmp::oid::{HR_STORAGE_DESCR, HR_STORAGE_SIZE, HR_STORAGE_USED, in_subtree, index_suffix};

/// Метки, которые не являются дисками
const DISK_EXCLUDED: [&str; 6] = [
    "PHYSICAL MEMORY",
    "VIRTUAL MEMORY",
    "MEMORY BUFFERS",
    "CACHED MEMORY",
    "SWAP SPACE",
    "REAL MEMORY",
];
const MEMORY_LABELS: [&str; 3] = ["PHYSICAL MEMORY", "MEMORY BUFFERS", "REAL MEMORY"];
const SWAP_LABELS: [&str; 2] = ["VIRTUAL MEMORY", "SWAP SPACE"];

fn label_in(set: &[&str], label: &str) -> bool {
    let upper = label.to_uppercase();
    set.contains(&upper.as_str())
}

/// Процент занятости по метке hrStorageDescr.
///
/// Записи без размера, с нулевым или нечисловым размером пропускаются.
/// При повторе метки остаётся последнее значение.
pub fn usage_by_label(storage_rows: &WalkResult) -> BTreeMap<String, f64> {
    let mut usage = BTreeMap::new();

    for (oid, label) in storage_rows
        .iter()
        .filter(|(oid, _)| in_subtree(HR_STORAGE_DESCR, oid))
    {
        let index = index_suffix(oid);
        let column = |prefix: &str| {
            storage_rows
                .get(&format!("{}.{}", prefix, index))
                .and_then(|v| v.trim().parse::<f64>().ok())
        };

        match (column(HR_STORAGE_SIZE), column(HR_STORAGE_USED)) {
            (Some(size), Some(used)) if size > 0.0 => {
                usage.insert(label.clone(), used / size * 100.0);
            }
            (size, used) => {
                tracing::debug!(label = %label, index, ?size, ?used, "Хранилище без размера пропущено");
            }
        }
    }

    usage
}

/// Диски: всё, что не память и не swap, с раскодированной меткой
pub fn disk_usage(usage: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    usage
        .iter()
        .filter(|(label, _)| !label_in(&DISK_EXCLUDED, label))
        .map(|(label, percent)| (decode_label(label), *percent))
        .collect()
}

/// Невзвешенное среднее по меткам памяти
pub fn memory_percent(usage: &BTreeMap<String, f64>) -> Result<f64, MetricError> {
    category_mean(usage, &MEMORY_LABELS, MetricCategory::Memory)
}

/// Невзвешенное среднее по меткам swap
pub fn swap_percent(usage: &BTreeMap<String, f64>) -> Result<f64, MetricError> {
    category_mean(usage, &SWAP_LABELS, MetricCategory::Swap)
}

fn category_mean(
    usage: &BTreeMap<String, f64>,
    labels: &[&str],
    category: MetricCategory,
) -> Result<f64, MetricError> {
    let values: Vec<f64> = usage
        .iter()
        .filter(|(label, _)| label_in(labels, label))
        .map(|(_, percent)| *percent)
        .collect();
    mean(&values, category)
}
