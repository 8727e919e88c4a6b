use snmp2::Oid;
use std::time::Duration;
use tokio::time::timeout;

use super::v2c::SnmpClientV2c;
use super::v3::SnmpClientV3;
use super::{SnmpError, VarRow};

pub enum SnmpClient {
    V2c(SnmpClientV2c),
    V3(SnmpClientV3),
}

impl SnmpClient {
    /// GETBULK с таймаутом и повторами из [`super::Target`]
    pub async fn get_bulk(
        &mut self,
        start_oid: &Oid<'_>,
        max_repetitions: u32,
        request_timeout: Duration,
        retries: u32,
        address: &str,
    ) -> Result<Vec<VarRow>, SnmpError> {
        let attempts = retries + 1;
        for _ in 0..attempts {
            let request = async {
                match &mut *self {
                    SnmpClient::V2c(client) => client.getbulk_rows(start_oid, max_repetitions).await,
                    SnmpClient::V3(client) => client.getbulk_rows(start_oid, max_repetitions).await,
                }
            };
            if let Ok(result) = timeout(request_timeout, request).await {
                return result;
            }
        }

        Err(SnmpError::RequestTimeout {
            target: address.to_string(),
            timeout_ms: request_timeout.as_millis(),
            attempts,
        })
    }
}
