//! Превращает сырые строки четырёх обходов в метрики устройства.
//!
//! Чистые функции без I/O: одинаковый вход всегда даёт одинаковый результат.

pub mod cpu;
pub mod label;
pub mod process;
pub mod storage;

use thiserror::Error;
use tracing::warn;

use crate::collector::WalkResult;
use crate::models::{CorrelatedMetrics, MetricCategory, MonitoredDevice};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("Нет строк для категории {0}")]
    NoMatchingCategory(MetricCategory),
    #[error("Нечисловое значение {value:?} в {oid} ({category})")]
    NonNumeric {
        category: MetricCategory,
        oid: String,
        value: String,
    },
}

impl MetricError {
    pub fn category(&self) -> MetricCategory {
        match self {
            MetricError::NoMatchingCategory(category) => *category,
            MetricError::NonNumeric { category, .. } => *category,
        }
    }
}

/// Среднее арифметическое; пустой вход это отсутствие метрики, а не ноль
pub(crate) fn mean(values: &[f64], category: MetricCategory) -> Result<f64, MetricError> {
    if values.is_empty() {
        return Err(MetricError::NoMatchingCategory(category));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn correlate(
    device: &MonitoredDevice,
    storage_rows: &WalkResult,
    process_name_rows: &WalkResult,
    process_memory_rows: &WalkResult,
    cpu_rows: &WalkResult,
) -> CorrelatedMetrics {
    let mut unavailable = Vec::new();
    let mut take = |result: Result<f64, MetricError>| match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(device_id = %device.device_id, category = %e.category(), error = %e, "Метрика не посчитана");
            unavailable.push(e.category());
            None
        }
    };

    let usage = storage::usage_by_label(storage_rows);
    let memory_percent = take(storage::memory_percent(&usage));
    let swap_percent = take(storage::swap_percent(&usage));
    let cpu_load_percent = take(cpu::average_load(cpu_rows));
    let disk_usage_by_label = storage::disk_usage(&usage);
    let processes = process::join_processes(process_name_rows, process_memory_rows);

    CorrelatedMetrics {
        device_id: device.device_id.clone(),
        ip_address: device.ip_address.clone(),
        cpu_load_percent,
        memory_percent,
        swap_percent,
        disk_usage_by_label,
        processes,
        unavailable,
    }
}
