use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, timeout_at};
use tracing::{debug, error, warn};

use super::types::{WalkOutcome, WalkResult, WalkStatus};
use crate::snmp::oid::{in_subtree, normalize_oid};
use crate::snmp::{OidFamily, SnmpError, SnmpSession, VarRow};

/// События фонового обхода, у каждого обхода один отправитель и один получатель
enum WalkEvent {
    Page(Vec<VarRow>),
    Finished,
    Failed(SnmpError),
}

/// Обход одного поддерева GETBULK'ами с общим дедлайном
#[derive(Debug, Clone)]
pub struct SubtreeWalker {
    max_repetitions: u32,
    timeout: Duration,
}

impl SubtreeWalker {
    pub fn new(max_repetitions: u32, timeout: Duration) -> Self {
        Self {
            max_repetitions,
            timeout,
        }
    }

    /// Обходит поддерево `family`. Всегда возвращает накопленные строки:
    /// при ошибке и по таймауту это то, что успело прийти.
    pub async fn walk(
        &self,
        family: OidFamily,
        session: Arc<dyn SnmpSession>,
        device_id: &str,
    ) -> WalkOutcome {
        let root = family.root_oid();
        let started = Instant::now();
        let deadline = started + self.timeout;

        let (tx, mut rx) = mpsc::channel(4);
        let traversal = tokio::spawn(traverse(session, root, self.max_repetitions, tx));

        let mut rows = WalkResult::new();
        let status = loop {
            match timeout_at(deadline, rx.recv()).await {
                Ok(Some(WalkEvent::Page(page))) => {
                    for (oid, value) in page {
                        rows.insert(normalize_oid(&oid), value);
                    }
                }
                Ok(Some(WalkEvent::Finished)) => break WalkStatus::Finished,
                Ok(Some(WalkEvent::Failed(e))) => break WalkStatus::Error(e.to_string()),
                Ok(None) => break WalkStatus::Error("обход прерван без завершения".to_string()),
                Err(_) => {
                    // брошенный обход не должен работать дальше дедлайна
                    traversal.abort();
                    break WalkStatus::Timeout;
                }
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &status {
            WalkStatus::Finished => debug!(
                device_id,
                oid = root,
                rows = rows.len(),
                elapsed_ms,
                "Обход завершён"
            ),
            WalkStatus::Error(e) => error!(
                device_id,
                oid = root,
                rows = rows.len(),
                error = %e,
                "Обход прерван ошибкой"
            ),
            WalkStatus::Timeout => warn!(
                device_id,
                oid = root,
                rows = rows.len(),
                timeout_ms = self.timeout.as_millis() as u64,
                "Таймаут обхода"
            ),
        }

        WalkOutcome {
            family,
            rows,
            status,
        }
    }
}

/// Листает поддерево, пока ответ не выйдет за его пределы или не станет пустым
async fn traverse(
    session: Arc<dyn SnmpSession>,
    root: &'static str,
    max_repetitions: u32,
    tx: mpsc::Sender<WalkEvent>,
) {
    let mut cursor = root.trim_start_matches('.').to_string();

    loop {
        let page = match session.get_bulk(&cursor, max_repetitions).await {
            Ok(page) => page,
            Err(e) => {
                let _ = tx.send(WalkEvent::Failed(e)).await;
                return;
            }
        };

        let received = page.len();
        let in_tree: Vec<VarRow> = page
            .into_iter()
            .take_while(|(oid, _)| in_subtree(root, oid))
            .collect();
        let exhausted = in_tree.is_empty() || in_tree.len() < received;
        let next = in_tree.last().map(|(oid, _)| oid.trim_start_matches('.').to_string());

        if !in_tree.is_empty() && tx.send(WalkEvent::Page(in_tree)).await.is_err() {
            // получатель ушёл по таймауту
            return;
        }
        if exhausted {
            let _ = tx.send(WalkEvent::Finished).await;
            return;
        }

        match next {
            Some(next) if next != cursor => cursor = next,
            _ => {
                let _ = tx.send(WalkEvent::Failed(SnmpError::NotIncreasing(cursor))).await;
                return;
            }
        }
    }
}
