use super::{MetricError, mean};
use crate::collector::WalkResult;
use crate::models::MetricCategory;
use crate::snmp::oid::{HR_PROCESSOR_LOAD, in_subtree};

/// Средняя загрузка по всем ядрам: одна строка hrProcessorLoad на ядро.
/// Число ядер это число строк поддерева, нечисловая строка делает метрику недоступной.
pub fn average_load(cpu_rows: &WalkResult) -> Result<f64, MetricError> {
    let loads = cpu_rows
        .iter()
        .filter(|(oid, _)| in_subtree(HR_PROCESSOR_LOAD, oid))
        .map(|(oid, value)| {
            value.trim().parse::<f64>().map_err(|_| MetricError::NonNumeric {
                category: MetricCategory::CpuLoad,
                oid: oid.clone(),
                value: value.clone(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    mean(&loads, MetricCategory::CpuLoad)
}
