use crate::params::OpaqueParams;
use serde::{Deserialize, Deserializer, Serialize};
use std::num::NonZeroU32;

#[derive(Debug, Serialize, Clone, Copy)]
pub(crate) struct RequestTransaction {
    #[serde(rename = "ClientID")]
    pub(crate) client_id: u32,
    #[serde(rename = "ClientTransactionID")]
    pub(crate) client_transaction_id: NonZeroU32,
}

/// Full parameter set of one request: caller arguments plus transaction IDs.
#[derive(Debug, Serialize)]
pub(crate) struct RequestWithTransaction<'params> {
    #[serde(flatten)]
    pub(crate) params: &'params OpaqueParams,
    #[serde(flatten)]
    pub(crate) transaction: RequestTransaction,
}

/// Transaction IDs echoed by the server. Missing, `null` and `0` all mean "not set".
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub(crate) struct ResponseTransaction {
    #[serde(
        rename = "ClientTransactionID",
        default,
        deserialize_with = "deserialize_transaction_id"
    )]
    pub(crate) client_transaction_id: Option<NonZeroU32>,
    #[serde(
        rename = "ServerTransactionID",
        default,
        deserialize_with = "deserialize_transaction_id"
    )]
    pub(crate) server_transaction_id: Option<NonZeroU32>,
}

fn deserialize_transaction_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NonZeroU32>, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.and_then(NonZeroU32::new))
}

#[derive(Debug)]
pub(crate) struct ResponseWithTransaction<T> {
    pub(crate) transaction: ResponseTransaction,
    pub(crate) response: T,
}

#[cfg(test)]
mod tests {
    use super::ResponseTransaction;

    #[test]
    fn unset_transaction_ids() -> eyre::Result<()> {
        for json in [
            "{}",
            r#"{"ClientTransactionID":0,"ServerTransactionID":0}"#,
            r#"{"ClientTransactionID":null}"#,
        ] {
            let transaction: ResponseTransaction = serde_json::from_str(json)?;
            assert_eq!(transaction.client_transaction_id, None, "{json}");
            assert_eq!(transaction.server_transaction_id, None, "{json}");
        }

        let transaction: ResponseTransaction =
            serde_json::from_str(r#"{"ClientTransactionID":7,"ServerTransactionID":12}"#)?;
        assert_eq!(transaction.client_transaction_id.map(|id| id.get()), Some(7));
        assert_eq!(transaction.server_transaction_id.map(|id| id.get()), Some(12));
        Ok(())
    }
}
