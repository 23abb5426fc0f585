use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::form::{Attribute, FormState, MetadataRecord, complete_attributes};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

pub const MINT_METHOD: &str = "mintCompressedNft";

/// JSON-RPC の POST を1回だけ行う経路
pub trait MintTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

/// reqwest のブロッキングクライアントによる実装
#[derive(Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl MintTransport for HttpTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        // URL に API キーが入るのでエラー文言からは外す
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| Error::Network(e.without_url().to_string()))?;

        let text = response
            .text()
            .map_err(|e| Error::Network(e.without_url().to_string()))?;

        decode_body(&text)
    }
}

/// レスポンス本文を JSON として読む。HTML のエラーページや空本文は MalformedResponse
pub fn decode_body(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::MalformedResponse(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MintRequest {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: MintParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintParams {
    pub name: String,
    pub symbol: String,
    pub owner: String,
    pub description: String,
    pub attributes: Vec<Attribute>,
    pub image_url: String,
    pub external_url: String,
    pub seller_fee_basis_points: u16,
}

impl MintRequest {
    /// リクエスト id にはセッション名として NFT 名を使う
    pub fn new(
        record: &MetadataRecord,
        attributes: &[Attribute],
        owner: &str,
        external_url: &str,
        fee_basis_points: u16,
    ) -> Self {
        MintRequest {
            jsonrpc: "2.0".to_string(),
            id: record.name.clone(),
            method: MINT_METHOD.to_string(),
            params: MintParams {
                name: record.name.clone(),
                symbol: record.symbol.clone(),
                owner: owner.to_string(),
                description: record.description.clone(),
                attributes: complete_attributes(attributes),
                image_url: record.image.clone(),
                external_url: external_url.to_string(),
                seller_fee_basis_points: fee_basis_points,
            },
        }
    }

    pub fn from_form(form: &FormState) -> Self {
        Self::new(
            &form.metadata,
            &form.attributes,
            &form.mint.owner,
            &form.metadata.external_url,
            form.mint.seller_fee_basis_points,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintResult {
    pub asset_id: String,
}

pub struct MintClient<T: MintTransport> {
    transport: T,
    rpc_url: String,
}

impl<T: MintTransport> MintClient<T> {
    pub fn new(transport: T, rpc_url: impl Into<String>) -> Self {
        Self {
            transport,
            rpc_url: rpc_url.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `<rpc_url>/?api-key=<key>`。キーはパーセントエンコードされる
    pub fn endpoint(&self, credentials: &Credentials) -> Result<Url> {
        let base = format!("{}/", self.rpc_url.trim_end_matches('/'));
        Url::parse_with_params(&base, &[("api-key", credentials.api_key())])
            .map_err(|e| Error::Network(format!("invalid mint endpoint {:?}: {}", self.rpc_url, e)))
    }

    pub fn mint(
        &self,
        credentials: &Credentials,
        record: &MetadataRecord,
        attributes: &[Attribute],
        owner: &str,
        external_url: &str,
        fee_basis_points: u16,
    ) -> Result<MintResult> {
        let request = MintRequest::new(record, attributes, owner, external_url, fee_basis_points);
        self.submit(credentials, &request)
    }

    pub fn submit(&self, credentials: &Credentials, request: &MintRequest) -> Result<MintResult> {
        if credentials.is_empty() {
            return Err(Error::MissingCredential);
        }

        let body = serde_json::to_value(request)?;
        log::info!("submitting {} for {:?}", request.method, request.id);

        let endpoint = self.endpoint(credentials)?;
        let response = self.transport.post_json(endpoint.as_str(), &body)?;
        parse_response(&response)
    }
}

/// `result.assetId` があれば成功。なければ中身をログに出して失敗扱い
pub fn parse_response(response: &Value) -> Result<MintResult> {
    let result = match response.get("result") {
        Some(result) if !result.is_null() => result,
        _ => {
            log::error!("mint failed, response: {}", response);
            return Err(Error::RemoteMintFailure {
                detail: "response has no result".to_string(),
            });
        }
    };

    match result.get("assetId").and_then(Value::as_str) {
        Some(asset_id) => Ok(MintResult {
            asset_id: asset_id.to_string(),
        }),
        None => {
            log::error!("mint result without assetId: {}", result);
            Err(Error::RemoteMintFailure {
                detail: "result has no assetId".to_string(),
            })
        }
    }
}
