pub mod device;
pub mod metrics;

pub use device::{MonitoredDevice, SnmpVersion};
pub use metrics::{CorrelatedMetrics, MetricCategory, ProcessEntry};
