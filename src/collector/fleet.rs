use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::info;

use super::DevicePoller;
use crate::config::DeviceRoster;

/// Запускает опрос всех устройств из списка, не дожидаясь ни одного
pub struct FleetPoller {
    poller: Arc<DevicePoller>,
    roster: Arc<dyn DeviceRoster>,
    cycles: AtomicU64,
}

/// Задачи одного цикла. Если отпустить, опросы продолжатся в фоне.
#[must_use = "без join() или abort() задачи цикла просто работают в фоне"]
pub struct PollCycle {
    pub cycle: u64,
    handles: Vec<JoinHandle<()>>,
}

impl PollCycle {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Ждёт все устройства цикла
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    tracing::error!(cycle = self.cycle, error = %e, "Опрос устройства упал");
                }
            }
        }
    }

    /// Снимает опросы цикла, уже отданные в sink метрики остаются
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

impl FleetPoller {
    pub fn new(poller: Arc<DevicePoller>, roster: Arc<dyn DeviceRoster>) -> Self {
        Self {
            poller,
            roster,
            cycles: AtomicU64::new(0),
        }
    }

    /// Один цикл опроса: по задаче на устройство на общем пуле
    pub fn run_poll_cycle(&self) -> PollCycle {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let devices = self.roster.load();
        info!(cycle, devices = devices.len(), "Цикл опроса запущен");

        let handles = devices
            .into_iter()
            .map(|device| {
                let poller = Arc::clone(&self.poller);
                tokio::spawn(async move { poller.poll_device(device).await })
            })
            .collect();

        PollCycle { cycle, handles }
    }
}
