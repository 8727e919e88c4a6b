use serde::Serialize;

use crate::models::{CorrelatedMetrics, MetricCategory, ProcessEntry};

/// JSON структура для отдачи наружу
#[derive(Debug, Clone, Serialize)]
pub struct MetricsJson<'a> {
    pub device_id: &'a str,
    pub ip: &'a str,
    pub timestamp: String,
    pub summary: MetricsSummary,
    pub cpu_load: Option<f64>,
    pub memory: Option<f64>,
    pub swap: Option<f64>,
    pub disks: Vec<DiskJson<'a>>,
    pub processes: &'a [ProcessEntry],
    pub unavailable: &'a [MetricCategory],
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub disk_count: usize,
    pub process_count: usize,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskJson<'a> {
    pub label: &'a str,
    pub usage_percent: f64,
}

/// JSON форматтер для метрик устройства
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format_metrics(metrics: &CorrelatedMetrics) -> MetricsJson<'_> {
        let disks: Vec<DiskJson<'_>> = metrics
            .disk_usage_by_label
            .iter()
            .map(|(label, percent)| DiskJson {
                label: label.as_str(),
                usage_percent: round2(*percent),
            })
            .collect();

        MetricsJson {
            device_id: &metrics.device_id,
            ip: &metrics.ip_address,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: MetricsSummary {
                disk_count: disks.len(),
                process_count: metrics.processes.len(),
                complete: metrics.unavailable.is_empty(),
            },
            cpu_load: metrics.cpu_load_percent.map(round2),
            memory: metrics.memory_percent.map(round2),
            swap: metrics.swap_percent.map(round2),
            disks,
            processes: &metrics.processes,
            unavailable: &metrics.unavailable,
        }
    }

    /// Сериализует метрики в компактный JSON, одна строка на устройство
    pub fn to_json_compact(metrics: &CorrelatedMetrics) -> anyhow::Result<String> {
        serde_json::to_string(&Self::format_metrics(metrics))
            .map_err(|e| anyhow::anyhow!("Ошибка сериализации в JSON: {}", e))
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
