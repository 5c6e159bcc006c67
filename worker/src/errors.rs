//! Crate-wide error type. Every pipeline and collaborator returns `WorkerResult`;
//! nothing panics on expected failure modes (RPC errors, DB errors, bad config).

use derive_more::{Display, Error, From};

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Display, Error, From)]
pub enum WorkerError {
    Abi(ethers::abi::Error),
    Database(sea_orm::DbErr),
    #[display(fmt = "missing required config: {_0}")]
    #[error(ignore)]
    #[from(ignore)]
    Config(String),
    Io(std::io::Error),
    Reqwest(reqwest::Error),
    SerdeJson(serde_json::Error),
    #[display(fmt = "rpc error: {_0}")]
    #[error(ignore)]
    #[from(ignore)]
    Rpc(crate::rpc::RpcError),
    #[display(fmt = "no active rpc endpoint available")]
    #[error(ignore)]
    #[from(ignore)]
    NoProviderAvailable,
    JoinError(tokio::task::JoinError),
}
