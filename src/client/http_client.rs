//! HTTP client for the Tuya Web "skill" API
//!
//! Every call is a `POST` to `/homeassistant/skill` with a header naming the
//! operation and a payload carrying the access token and device id. The
//! response header's `code` is `SUCCESS` on success; anything else is a
//! remote failure whose `msg` is preserved in the error.

use super::{Ack, RemoteCommand, RemoteDeviceClient};
use crate::config::TuyaConfig;
use crate::device::DeviceState;
use crate::error::{BridgeError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

const SKILL_PATH: &str = "homeassistant/skill";
const SUCCESS: &str = "SUCCESS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    Query,
    Control,
}

impl Namespace {
    fn as_str(&self) -> &'static str {
        match self {
            Namespace::Query => "query",
            Namespace::Control => "control",
        }
    }

    fn failure(&self, msg: String) -> BridgeError {
        match self {
            Namespace::Query => BridgeError::RemoteFetch(msg),
            Namespace::Control => BridgeError::RemoteWrite(msg),
        }
    }
}

#[derive(Debug, Serialize)]
struct SkillRequest<'a> {
    header: RequestHeader<'a>,
    payload: RequestPayload<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestHeader<'a> {
    name: &'a str,
    namespace: &'static str,
    payload_version: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPayload<'a> {
    access_token: &'a str,
    dev_id: &'a str,
    #[serde(flatten)]
    command: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct SkillResponse {
    header: ResponseHeader,
    #[serde(default)]
    payload: Option<ResponsePayload>,
}

#[derive(Debug, Deserialize)]
struct ResponseHeader {
    code: String,
    #[serde(default)]
    msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponsePayload {
    #[serde(default)]
    data: Option<HashMap<String, Value>>,
}

/// Tuya Web API client
pub struct TuyaWebClient {
    client: Client,
    endpoint: Url,
    access_token: String,
}

impl TuyaWebClient {
    /// Create a new client; the access token is taken as-is from configuration
    pub fn new(config: &TuyaConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .user_agent(format!("tuya-hap-bridge/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BridgeError::config(format!("Failed to build HTTP client: {e}")))?;

        let endpoint = config
            .base_url
            .join(SKILL_PATH)
            .map_err(|e| BridgeError::config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            access_token: config.access_token.clone(),
        })
    }

    async fn call_skill(
        &self,
        name: &str,
        namespace: Namespace,
        device_id: &str,
        command: Option<&Value>,
    ) -> Result<SkillResponse> {
        let request = SkillRequest {
            header: RequestHeader {
                name,
                namespace: namespace.as_str(),
                payload_version: 1,
            },
            payload: RequestPayload {
                access_token: &self.access_token,
                dev_id: device_id,
                command,
            },
        };

        debug!("POST {} {name} for {device_id}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BridgeError::timeout(format!("{name} for {device_id}: {e}"))
                } else {
                    namespace.failure(format!("{name} for {device_id}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(namespace.failure(format!("{name} for {device_id}: HTTP {status}: {body}")));
        }

        let skill: SkillResponse = response.json().await?;
        if skill.header.code != SUCCESS {
            let msg = skill.header.msg.as_deref().unwrap_or("no message");
            warn!("{name} for {device_id} rejected: {} {msg}", skill.header.code);
            return Err(namespace.failure(format!(
                "{name} for {device_id}: {} ({msg})",
                skill.header.code
            )));
        }
        Ok(skill)
    }
}

#[async_trait]
impl RemoteDeviceClient for TuyaWebClient {
    async fn fetch_state(&self, device_id: &str) -> Result<DeviceState> {
        let response = self
            .call_skill("QueryDevice", Namespace::Query, device_id, None)
            .await?;
        response
            .payload
            .and_then(|payload| payload.data)
            .map(DeviceState::from)
            .ok_or_else(|| {
                BridgeError::remote_fetch(format!("QueryDevice for {device_id}: response has no data"))
            })
    }

    async fn apply_state(&self, device_id: &str, command: &RemoteCommand) -> Result<Ack> {
        if !command.payload.is_object() {
            return Err(BridgeError::malformed(format!(
                "{} payload must be an object, got {}",
                command.command_name, command.payload
            )));
        }
        let response = self
            .call_skill(
                &command.command_name,
                Namespace::Control,
                device_id,
                Some(&command.payload),
            )
            .await?;
        Ok(Ack {
            code: response.header.code,
        })
    }
}
