use std::sync::Arc;
use std::time::Duration;

use ethers::types::{Block, Transaction, TransactionReceipt, H256, U64};
use serde_json::{json, Value};

use super::transport::{JsonRpcTransport, RpcError};

/// One-shot JSON-RPC calls over a `JsonRpcTransport`. Stateless beyond the
/// two timeouts; the provider manager owns one per endpoint.
pub struct RpcClient<T: JsonRpcTransport + ?Sized> {
    transport: Arc<T>,
    timeout_default: Duration,
    timeout_trace: Duration,
}

impl<T: JsonRpcTransport + ?Sized> RpcClient<T> {
    pub fn new(transport: Arc<T>, timeout_default: Duration, timeout_trace: Duration) -> Self {
        Self {
            transport,
            timeout_default,
            timeout_trace,
        }
    }

    pub async fn eth_block_number(&self) -> Result<U64, RpcError> {
        let value = self
            .transport
            .call("eth_blockNumber", json!([]), self.timeout_default)
            .await?;
        serde_json::from_value(value).map_err(|err| RpcError::Unknown(err.to_string()))
    }

    pub async fn eth_get_block_by_number(
        &self,
        number: U64,
    ) -> Result<Option<Block<Transaction>>, RpcError> {
        let params = json!([format!("0x{:x}", number), true]);
        let value = self
            .transport
            .call("eth_getBlockByNumber", params, self.timeout_default)
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|err| RpcError::Unknown(err.to_string()))
    }

    pub async fn eth_get_transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        let params = json!([hash]);
        let value = self
            .transport
            .call("eth_getTransactionReceipt", params, self.timeout_default)
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|err| RpcError::Unknown(err.to_string()))
    }

    pub async fn debug_trace_transaction(&self, hash: H256) -> Result<Value, RpcError> {
        let params = json!([hash, {"tracer": "callTracer"}]);
        self.transport
            .call("debug_traceTransaction", params, self.timeout_trace)
            .await
    }

    pub async fn eth_call(&self, tx: Value, block: Value) -> Result<Value, RpcError> {
        let params = json!([tx, block]);
        self.transport
            .call("eth_call", params, self.timeout_default)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::transport::fake::FakeTransport;
    use super::*;

    #[tokio::test]
    async fn eth_block_number_decodes_hex() {
        let fake = Arc::new(FakeTransport::new());
        fake.push("eth_blockNumber", Ok(json!("0x64")));
        let client = RpcClient::new(fake, Duration::from_secs(5), Duration::from_secs(10));
        let n = client.eth_block_number().await.unwrap();
        assert_eq!(n, U64::from(100));
    }

    #[tokio::test]
    async fn missing_block_is_none() {
        let fake = Arc::new(FakeTransport::new());
        fake.push("eth_getBlockByNumber", Ok(Value::Null));
        let client = RpcClient::new(fake, Duration::from_secs(5), Duration::from_secs(10));
        let block = client.eth_get_block_by_number(U64::from(1)).await.unwrap();
        assert!(block.is_none());
    }

    #[tokio::test]
    async fn protocol_error_is_propagated() {
        let fake = Arc::new(FakeTransport::new());
        fake.push(
            "eth_blockNumber",
            Err(RpcError::Protocol {
                code: -32000,
                message: "execution error".to_string(),
            }),
        );
        let client = RpcClient::new(fake, Duration::from_secs(5), Duration::from_secs(10));
        let err = client.eth_block_number().await.unwrap_err();
        assert!(matches!(err, RpcError::Protocol { code: -32000, .. }));
    }
}
