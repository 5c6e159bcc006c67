pub mod client;
pub mod provider_manager;
pub mod scoring;
pub mod transport;

pub use client::RpcClient;
pub use provider_manager::ProviderManager;
pub use scoring::{calculate_score, score_to_status};
pub use transport::{HttpTransport, JsonRpcTransport, RpcError};
