use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// メタデータ生成・ミントで起こりうるエラー
///
/// どれもその操作を終わらせるだけで、自動リトライはしない。
#[derive(Debug, Error)]
pub enum Error {
    #[error("Helius API key is not set")]
    MissingCredential,

    #[error("network error: {0}")]
    Network(String),

    #[error("mint failed: {detail}")]
    RemoteMintFailure { detail: String },

    #[error("malformed response from mint endpoint: {0}")]
    MalformedResponse(String),

    #[error("failed to write {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("form document has no known path; cannot derive output directory")]
    MissingDocumentPath,

    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}
