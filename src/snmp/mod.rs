use async_trait::async_trait;
use snmp2::{Oid, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

pub mod clients_enum;
pub mod error;
pub mod oid;
pub mod security;
pub mod v2c;
pub mod v3;

pub use clients_enum::SnmpClient;
pub use error::SnmpError;
pub use oid::{OidFamily, parse_oid};
pub use security::{Credentials, Target, TargetResolver, UsmRegistry, UsmUser};
pub use v2c::SnmpClientV2c;
pub use v3::SnmpClientV3;

/// (OID без ведущей точки, значение строкой)
pub type VarRow = (String, String);

/// Открытая сессия к одному устройству. Принадлежит одному опросу и закрывается им.
#[async_trait]
pub trait SnmpSession: Send + Sync {
    /// Одна страница GETBULK после `from`, в порядке ответа агента
    async fn get_bulk(&self, from: &str, max_repetitions: u32) -> Result<Vec<VarRow>, SnmpError>;

    async fn close(&self) -> Result<(), SnmpError>;
}

#[async_trait]
pub trait SnmpTransport: Send + Sync {
    async fn open_session(&self, target: &Target) -> Result<Arc<dyn SnmpSession>, SnmpError>;
}

/// Транспорт поверх `snmp2::AsyncSession`
#[derive(Debug, Clone, Copy, Default)]
pub struct Snmp2Transport;

impl Snmp2Transport {
    async fn open_client(target: &Target) -> Result<Mutex<Option<SnmpClient>>, SnmpError> {
        let client = match &target.credentials {
            Credentials::Community(community) => {
                SnmpClient::V2c(SnmpClientV2c::new(&target.address, community).await?)
            }
            Credentials::Usm(user) => {
                let opening = SnmpClientV3::new(&target.address, user);
                let client = timeout(target.timeout, opening)
                    .await
                    .map_err(|_| open_error(&target.address, "engine discovery timeout"))??;
                SnmpClient::V3(client)
            }
        };
        Ok(Mutex::new(Some(client)))
    }
}

#[async_trait]
impl SnmpTransport for Snmp2Transport {
    async fn open_session(&self, target: &Target) -> Result<Arc<dyn SnmpSession>, SnmpError> {
        let (storage, process_names, process_memory, cpu_load) = tokio::try_join!(
            Self::open_client(target),
            Self::open_client(target),
            Self::open_client(target),
            Self::open_client(target),
        )?;

        Ok(Arc::new(Snmp2Session {
            lanes: [storage, process_names, process_memory, cpu_load],
            address: target.address.clone(),
            timeout: target.timeout,
            retries: target.retries,
        }))
    }
}

/// Сессия устройства: по сокету на каждое поддерево из [`OidFamily::ALL`].
///
/// Обход, чей запрос потерялся, ждёт только на своём сокете. Страницы одного
/// поддерева идут по очереди.
pub struct Snmp2Session {
    lanes: [Mutex<Option<SnmpClient>>; 4],
    address: String,
    timeout: Duration,
    retries: u32,
}

impl Snmp2Session {
    fn lane(&self, from: &str) -> &Mutex<Option<SnmpClient>> {
        let family = OidFamily::containing(from).unwrap_or(OidFamily::Storage);
        &self.lanes[family as usize]
    }
}

#[async_trait]
impl SnmpSession for Snmp2Session {
    async fn get_bulk(&self, from: &str, max_repetitions: u32) -> Result<Vec<VarRow>, SnmpError> {
        let start = parse_oid(from)?;
        let mut guard = self.lane(from).lock().await;
        let client = guard.as_mut().ok_or(SnmpError::Closed)?;
        client
            .get_bulk(&start, max_repetitions, self.timeout, self.retries, &self.address)
            .await
    }

    async fn close(&self) -> Result<(), SnmpError> {
        // сокеты закрываются вместе с AsyncSession
        let mut closed = 0;
        for lane in &self.lanes {
            if lane.lock().await.take().is_some() {
                closed += 1;
            }
        }
        if closed == 0 {
            return Err(SnmpError::Closed);
        }
        Ok(())
    }
}

pub(crate) fn open_error(target: &str, reason: impl std::fmt::Display) -> SnmpError {
    SnmpError::SessionOpen {
        target: target.to_string(),
        reason: reason.to_string(),
    }
}

/// Переводит varbind'ы ответа в строки; исключения (endOfMibView и т.п.) отбрасываются
pub(crate) fn varbinds_to_rows<'a>(
    varbinds: impl IntoIterator<Item = (Oid<'a>, Value<'a>)>,
) -> Vec<VarRow> {
    varbinds
        .into_iter()
        .filter_map(|(oid, value)| value_to_string(&value).map(|v| (oid.to_string(), v)))
        .collect()
}

pub fn value_to_string(value: &Value<'_>) -> Option<String> {
    let s = match value {
        Value::EndOfMibView | Value::NoSuchObject | Value::NoSuchInstance => return None,
        Value::Null => String::new(),
        Value::Integer(n) => n.to_string(),
        Value::OctetString(bytes) => octet_string_to_string(bytes),
        Value::ObjectIdentifier(oid) => oid.to_string(),
        Value::IpAddress(ip) => format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]),
        Value::Counter32(n) => n.to_string(),
        Value::Unsigned32(n) => n.to_string(),
        Value::Timeticks(n) => n.to_string(),
        Value::Counter64(n) => n.to_string(),
        other => format!("{:?}", other),
    };
    Some(s)
}

/// Печатаемая строка как есть, иначе байты в hex через двоеточие (`c7:d1:b1:db`)
pub fn octet_string_to_string(bytes: &[u8]) -> String {
    let printable = bytes
        .iter()
        .all(|b| b.is_ascii_graphic() || b.is_ascii_whitespace());
    if printable {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}
