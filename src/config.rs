use dotenv::dotenv;
use std::env;
use std::fmt;

pub const HELIUS_MAINNET_URL: &str = "https://mainnet.helius-rpc.com";

/// Helius の API キー
///
/// Debug 出力ではキーを伏せる。
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// 前後の空白は落として保持する
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("Credentials").field("api_key", &shown).finish()
    }
}

/// 環境変数（と .env）から読む設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub rpc_url: String,
}

impl AppConfig {
    /// `HELIUS_API_KEY` と `HELIUS_RPC_URL` を読む。未設定でもエラーにはしない
    pub fn from_env() -> Self {
        dotenv().ok();

        let credentials = Credentials::new(env::var("HELIUS_API_KEY").unwrap_or_default());
        let rpc_url = env::var("HELIUS_RPC_URL").unwrap_or_else(|_| HELIUS_MAINNET_URL.to_string());

        Self { credentials, rpc_url }
    }
}
