use tokio::sync::mpsc;

use crate::formatter::JsonFormatter;
use crate::models::CorrelatedMetrics;

/// Потребитель итоговых метрик, по одному вызову на устройство за цикл
pub trait MetricsSink: Send + Sync {
    fn accept(&self, metrics: CorrelatedMetrics);
}

/// Печатает каждое устройство одной JSON строкой в stdout
#[derive(Debug, Default)]
pub struct JsonLinesSink;

impl MetricsSink for JsonLinesSink {
    fn accept(&self, metrics: CorrelatedMetrics) {
        match JsonFormatter::to_json_compact(&metrics) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!(device_id = %metrics.device_id, error = %e, "Ошибка JSON сериализации"),
        }
    }
}

/// Отдаёт метрики в канал, для встраивания и тестов
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<CorrelatedMetrics>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<CorrelatedMetrics>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MetricsSink for ChannelSink {
    fn accept(&self, metrics: CorrelatedMetrics) {
        if self.tx.send(metrics).is_err() {
            tracing::debug!("Получатель метрик закрыт");
        }
    }
}
