use snmp2::{AsyncSession, Oid};

use super::{SnmpError, VarRow, open_error, varbinds_to_rows};

pub struct SnmpClientV2c {
    pub(crate) session: AsyncSession,
}

impl SnmpClientV2c {
    pub async fn new(target: &str, community: &[u8]) -> Result<Self, SnmpError> {
        let session = AsyncSession::new_v2c(target, community, 2)
            .await
            .map_err(|e| open_error(target, e))?;

        Ok(Self { session })
    }

    /// Одна страница GETBULK, начиная после `start_oid`
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
