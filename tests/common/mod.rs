#![allow(dead_code)]

use async_trait::async_trait;
use hostpoll::config::AppConfig;
use hostpoll::models::{MonitoredDevice, SnmpVersion};
use hostpoll::snmp::{SnmpError, SnmpSession, SnmpTransport, Target, VarRow};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub mod udp_agent;

pub const STORAGE: &str = "1.3.6.1.2.1.25.2.3.1";
pub const PROC_NAME: &str = "1.3.6.1.2.1.25.4.2.1.2";
pub const PROC_MEM: &str = "1.3.6.1.2.1.25.5.1.1.2";
pub const CPU: &str = "1.3.6.1.2.1.25.3.3.1.2";

fn oid_key(oid: &str) -> Vec<u64> {
    oid.trim_start_matches('.')
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect()
}

fn oid_string(key: &[u64]) -> String {
    key.iter().map(u64::to_string).collect::<Vec<_>>().join(".")
}

/// Поведение поддерева в фейковом агенте
#[derive(Debug, Clone)]
pub enum Behavior {
    Stall,
    Fail(&'static str),
    Delay(Duration),
}

/// In-memory SNMP агент: MIB как упорядоченный словарь, сценарии на корни
#[derive(Debug, Clone, Default)]
pub struct FakeAgent {
    mib: BTreeMap<Vec<u64>, String>,
    behaviors: Vec<(&'static str, Behavior)>,
}

impl FakeAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Типичный linux хост: память, swap, один диск, два процесса, три ядра
    pub fn linux_host() -> Self {
        Self::new()
            .storage(1, "Physical memory", 1000, 250)
            .storage(3, "Virtual memory", 400, 100)
            .storage(31, "/", 200, 150)
            .process(7, "httpd", 20480)
            .process(12, "sshd", 4096)
            .cpu(196608, 12)
            .cpu(196609, 30)
            .cpu(196610, 18)
            // соседняя таблица, в обход попадать не должна
            .row("1.3.6.1.2.1.25.3.4.1.1.1", "1")
    }

    pub fn row(mut self, oid: &str, value: &str) -> Self {
        self.mib.insert(oid_key(oid), value.to_string());
        self
    }

    pub fn storage(self, index: u32, label: &str, size: u64, used: u64) -> Self {
        self.row(&format!("{}.3.{}", STORAGE, index), label)
            .row(&format!("{}.4.{}", STORAGE, index), "4096")
            .row(&format!("{}.5.{}", STORAGE, index), &size.to_string())
            .row(&format!("{}.6.{}", STORAGE, index), &used.to_string())
    }

    pub fn process(self, index: u32, name: &str, memory_kb: u64) -> Self {
        self.row(&format!("{}.{}", PROC_NAME, index), name)
            .row(&format!("{}.{}", PROC_MEM, index), &memory_kb.to_string())
    }

    pub fn cpu(self, index: u32, load: u32) -> Self {
        self.row(&format!("{}.{}", CPU, index), &load.to_string())
    }

    pub fn with(mut self, root: &'static str, behavior: Behavior) -> Self {
        self.behaviors.push((root, behavior));
        self
    }

    fn behavior_for(&self, from: &str) -> Option<&Behavior> {
        let from = from.trim_start_matches('.');
        self.behaviors
            .iter()
            .find(|(root, _)| from == *root || from.starts_with(&format!("{}.", root)))
            .map(|(_, b)| b)
    }

    fn page_after(&self, from: &str, max_repetitions: u32) -> Vec<VarRow> {
        self.mib
            .range((Bound::Excluded(oid_key(from)), Bound::Unbounded))
            .take(max_repetitions as usize)
            .map(|(k, v)| (oid_string(k), v.clone()))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub opened: HashMap<String, usize>,
    pub closed: HashMap<String, usize>,
    pub targets: Vec<Target>,
}

/// Транспорт с агентами по IP и счётчиками открытий/закрытий
#[derive(Default)]
pub struct FakeTransport {
    agents: HashMap<String, Arc<FakeAgent>>,
    unreachable: HashSet<String>,
    pub counters: Arc<Mutex<Counters>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, ip: &str, agent: FakeAgent) -> Self {
        self.agents.insert(ip.to_string(), Arc::new(agent));
        self
    }

    pub fn unreachable(mut self, ip: &str) -> Self {
        self.unreachable.insert(ip.to_string());
        self
    }

    pub fn opened(&self, ip: &str) -> usize {
        self.counters.lock().unwrap().opened.get(ip).copied().unwrap_or(0)
    }

    pub fn closed(&self, ip: &str) -> usize {
        self.counters.lock().unwrap().closed.get(ip).copied().unwrap_or(0)
    }
}

fn ip_of(target: &Target) -> String {
    target
        .address
        .rsplit_once(':')
        .map(|(ip, _)| ip.to_string())
        .unwrap_or_else(|| target.address.clone())
}

#[async_trait]
impl SnmpTransport for FakeTransport {
    async fn open_session(&self, target: &Target) -> Result<Arc<dyn SnmpSession>, SnmpError> {
        let ip = ip_of(target);
        let mut counters = self.counters.lock().unwrap();
        counters.targets.push(target.clone());

        if self.unreachable.contains(&ip) {
            return Err(SnmpError::SessionOpen {
                target: target.address.clone(),
                reason: "bind failed".to_string(),
            });
        }
        let agent = self
            .agents
            .get(&ip)
            .cloned()
            .unwrap_or_else(|| Arc::new(FakeAgent::new()));
        *counters.opened.entry(ip.clone()).or_default() += 1;

        Ok(Arc::new(FakeSession {
            ip,
            agent,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct FakeSession {
    ip: String,
    agent: Arc<FakeAgent>,
    counters: Arc<Mutex<Counters>>,
}

#[async_trait]
impl SnmpSession for FakeSession {
    async fn get_bulk(&self, from: &str, max_repetitions: u32) -> Result<Vec<VarRow>, SnmpError> {
        match self.agent.behavior_for(from) {
            Some(Behavior::Stall) => std::future::pending().await,
            Some(Behavior::Fail(reason)) => Err(SnmpError::Protocol(reason.to_string())),
            Some(Behavior::Delay(delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(self.agent.page_after(from, max_repetitions))
            }
            None => Ok(self.agent.page_after(from, max_repetitions)),
        }
    }

    async fn close(&self) -> Result<(), SnmpError> {
        let mut counters = self.counters.lock().unwrap();
        *counters.closed.entry(self.ip.clone()).or_default() += 1;
        Ok(())
    }
}

pub fn device(id: &str, ip: &str) -> MonitoredDevice {
    MonitoredDevice {
        device_id: id.to_string(),
        ip_address: ip.to_string(),
        community: "public".to_string(),
        version: SnmpVersion::V2c,
        password: String::new(),
    }
}

pub fn config() -> AppConfig {
    AppConfig::default()
}
