use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::collector::FleetPoller;

/// Первый цикл сразу, дальше каждые `period`, пока не сработает `shutdown`.
///
/// Циклы не ждут друг друга: медленное устройство не сдвигает расписание.
pub async fn run_interval(fleet: Arc<FleetPoller>, period: Duration, shutdown: impl Future<Output = ()>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // fire-and-forget, задачи цикла живут сами
                drop(fleet.run_poll_cycle());
            }
            _ = &mut shutdown => {
                tracing::info!("Планировщик остановлен");
                break;
            }
        }
    }
}
