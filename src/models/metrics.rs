use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Процесс и занятая им память (hrSWRunPerfMem, KB) как её отдал агент
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessEntry {
    pub name: String,
    pub memory_kb: String,
}

/// Категории, для которых среднее может не посчитаться
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Memory,
    Swap,
    CpuLoad,
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricCategory::Memory => write!(f, "memory"),
            MetricCategory::Swap => write!(f, "swap"),
            MetricCategory::CpuLoad => write!(f, "cpu_load"),
        }
    }
}

/// Итог одного цикла опроса устройства.
///
/// `None` в процентах означает "нечего было измерить", а не ноль.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedMetrics {
    pub device_id: String,
    pub ip_address: String,
    pub cpu_load_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub swap_percent: Option<f64>,
    pub disk_usage_by_label: BTreeMap<String, f64>,
    pub processes: Vec<ProcessEntry>,
    pub unavailable: Vec<MetricCategory>,
}
