use snmp2::v3::{Auth, Security};
use snmp2::{AsyncSession, Oid};

use super::security::UsmUser;
use super::{SnmpError, VarRow, open_error, varbinds_to_rows};

/// SNMPv3 клиент authPriv; scoped PDU и ключи локализуются внутри сессии snmp2
pub struct SnmpClientV3 {
    pub(crate) session: AsyncSession,
}

impl SnmpClientV3 {
    pub async fn new(target: &str, user: &UsmUser) -> Result<Self, SnmpError> {
        let security = Security::new(user.username.as_bytes(), &user.auth_password)
            .with_auth_protocol(user.auth_protocol)
            .with_auth(Auth::AuthPriv {
                cipher: user.privacy_protocol,
                privacy_password: user.privacy_password.clone(),
            });

        let mut session = AsyncSession::new_v3(target, 2, security)
            .await
            .map_err(|e| open_error(target, e))?;
        // engine discovery
        session.init().await.map_err(|e| open_error(target, e))?;

        Ok(Self { session })
    }

    pub async fn getbulk_rows(
        &mut self,
        start_oid: &Oid<'_>,
        max_repetitions: u32,
    ) -> Result<Vec<VarRow>, SnmpError> {
        let resp = self
            .session
            .getbulk(&[start_oid], 0, max_repetitions)
            .await
            .map_err(|e| SnmpError::Protocol(format!("GETBULK запрос не удался: {}", e)))?;

        Ok(varbinds_to_rows(resp.varbinds))
    }
}
