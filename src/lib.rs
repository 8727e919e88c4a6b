pub mod collector;
pub mod config;
pub mod formatter;
pub mod metrics;
pub mod models;
pub mod scheduler;
pub mod sink;
pub mod snmp;

use std::sync::Arc;

use collector::{DevicePoller, FleetPoller, SubtreeWalker};
use config::{AppConfig, DeviceRoster};
use sink::MetricsSink;
use snmp::{SnmpTransport, TargetResolver, UsmRegistry};

/// Собирает конвейер опроса из конфигурации и внешних зависимостей
pub fn build_fleet(
    config: &AppConfig,
    transport: Arc<dyn SnmpTransport>,
    roster: Arc<dyn DeviceRoster>,
    sink: Arc<dyn MetricsSink>,
) -> FleetPoller {
    let usm = Arc::new(UsmRegistry::new());
    let resolver = TargetResolver::new(usm, config.settings.clone(), config.get_request_timeout());
    let walker = SubtreeWalker::new(config.settings.walk.max_repetitions, config.get_walk_timeout());
    let poller = DevicePoller::new(transport, resolver, walker, sink);

    FleetPoller::new(Arc::new(poller), roster)
}
