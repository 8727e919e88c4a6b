use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub mod fleet;
pub mod types;
pub mod walker;

pub use fleet::{FleetPoller, PollCycle};
pub use types::{DeviceWalks, WalkOutcome, WalkResult, WalkStatus};
pub use walker::SubtreeWalker;

use crate::metrics::correlate;
use crate::models::{CorrelatedMetrics, MonitoredDevice};
use crate::sink::MetricsSink;
use crate::snmp::{OidFamily, SnmpSession, SnmpTransport, TargetResolver};

/// Шаг корреляции после join всех обходов
pub type Correlator = fn(&MonitoredDevice, &DeviceWalks) -> CorrelatedMetrics;

fn correlate_walks(device: &MonitoredDevice, walks: &DeviceWalks) -> CorrelatedMetrics {
    correlate(
        device,
        &walks.storage.rows,
        &walks.process_names.rows,
        &walks.process_memory.rows,
        &walks.cpu_load.rows,
    )
}

/// Опрос одного устройства: сессия, четыре параллельных обхода, корреляция
pub struct DevicePoller {
    transport: Arc<dyn SnmpTransport>,
    resolver: TargetResolver,
    walker: SubtreeWalker,
    sink: Arc<dyn MetricsSink>,
    correlator: Correlator,
}

impl DevicePoller {
    pub fn new(
        transport: Arc<dyn SnmpTransport>,
        resolver: TargetResolver,
        walker: SubtreeWalker,
        sink: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            transport,
            resolver,
            walker,
            sink,
            correlator: correlate_walks,
        }
    }

    /// Подменяет шаг корреляции
    pub fn with_correlator(mut self, correlator: Correlator) -> Self {
        self.correlator = correlator;
        self
    }

    /// Опрашивает устройство и отдаёт метрики в sink.
    ///
    /// Сессия закрывается ровно один раз на любом пути после открытия.
    /// Если сессию открыть не удалось, устройство пропускается целиком.
    pub async fn poll_device(&self, device: MonitoredDevice) {
        let target = self.resolver.resolve(&device);
        let session = match self.transport.open_session(&target).await {
            Ok(session) => session,
            Err(e) => {
                error!(
                    device_id = %device.device_id,
                    ip = %device.ip_address,
                    error = %e,
                    "Не удалось открыть SNMP сессию, устройство пропущено"
                );
                return;
            }
        };

        let walks = self.collect_walks(&device, &session).await;
        let correlated =
            std::panic::catch_unwind(AssertUnwindSafe(|| (self.correlator)(&device, &walks)));

        if let Err(e) = session.close().await {
            warn!(device_id = %device.device_id, error = %e, "Ошибка закрытия SNMP сессии");
        }

        match correlated {
            Ok(metrics) => self.emit(metrics, &walks),
            Err(_) => error!(device_id = %device.device_id, "Корреляция метрик упала, результат отброшен"),
        }
    }

    /// Запускает четыре обхода отдельными задачами и ждёт все.
    /// Упавшая задача превращается в пустой результат с ошибкой.
    pub async fn collect_walks(
        &self,
        device: &MonitoredDevice,
        session: &Arc<dyn SnmpSession>,
    ) -> DeviceWalks {
        let [storage, process_names, process_memory, cpu_load] = OidFamily::ALL.map(|family| {
            let walker = self.walker.clone();
            let session = Arc::clone(session);
            let device_id = device.device_id.clone();
            let handle = tokio::spawn(async move { walker.walk(family, session, &device_id).await });
            (family, handle)
        });

        DeviceWalks {
            storage: settle(device, storage).await,
            process_names: settle(device, process_names).await,
            process_memory: settle(device, process_memory).await,
            cpu_load: settle(device, cpu_load).await,
        }
    }

    fn emit(&self, metrics: CorrelatedMetrics, walks: &DeviceWalks) {
        let failed: Vec<String> = walks
            .iter()
            .filter(|w| !w.status.is_success())
            .map(|w| format!("{}={}", w.family.name(), w.status))
            .collect();

        info!(
            device_id = %metrics.device_id,
            ip = %metrics.ip_address,
            disks = metrics.disk_usage_by_label.len(),
            processes = metrics.processes.len(),
            failed_walks = ?failed,
            "Опрос устройства завершён"
        );
        self.sink.accept(metrics);
    }
}

async fn settle(
    device: &MonitoredDevice,
    (family, handle): (OidFamily, JoinHandle<WalkOutcome>),
) -> WalkOutcome {
    handle.await.unwrap_or_else(|e| {
        error!(device_id = %device.device_id, oid = family.root_oid(), error = %e, "Задача обхода упала");
        WalkOutcome::empty(family, WalkStatus::Error(e.to_string()))
    })
}
