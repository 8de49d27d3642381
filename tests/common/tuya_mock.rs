//! WireMock-based Tuya Web API mocking infrastructure
//!
//! Simulates the `/homeassistant/skill` endpoint for testing the HTTP client
//! without a Tuya account.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::time::Duration;
use tuya_hap_bridge::config::TuyaConfig;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "EUheu1590000000abcdef";

/// Mock Tuya Web API for testing
pub struct MockTuyaServer {
    pub server: MockServer,
}

impl MockTuyaServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Client configuration pointing at this server
    pub fn config(&self) -> TuyaConfig {
        TuyaConfig {
            base_url: self.server.uri().parse().expect("Valid mock URL"),
            access_token: TEST_TOKEN.to_string(),
            timeout: Duration::from_secs(2),
        }
    }

    /// Answer QueryDevice for `device_id` with `data`
    pub async fn mock_query(&self, device_id: &str, data: Value) {
        Mock::given(method("POST"))
            .and(path("/homeassistant/skill"))
            .and(body_partial_json(json!({
                "header": { "name": "QueryDevice", "namespace": "query" },
                "payload": { "devId": device_id }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "header": { "code": "SUCCESS", "payloadVersion": 1 },
                "payload": { "data": data }
            })))
            .mount(&self.server)
            .await;
    }

    /// Acknowledge `command` for `device_id`, expecting exactly `times` calls
    pub async fn mock_control(&self, device_id: &str, command: &str, value: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path("/homeassistant/skill"))
            .and(body_partial_json(json!({
                "header": { "name": command, "namespace": "control", "payloadVersion": 1 },
                "payload": { "accessToken": TEST_TOKEN, "devId": device_id, "value": value }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "header": { "code": "SUCCESS", "payloadVersion": 1 }
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Reject every call with a Tuya error code
    pub async fn mock_rejection(&self, code: &str, msg: &str) {
        Mock::given(method("POST"))
            .and(path("/homeassistant/skill"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "header": { "code": code, "msg": msg, "payloadVersion": 1 }
            })))
            .mount(&self.server)
            .await;
    }

    /// Fail every call at the HTTP level
    pub async fn mock_http_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/homeassistant/skill"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Answer every call with a bare SUCCESS header after `delay`
    pub async fn mock_bare_success(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/homeassistant/skill"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "header": { "code": "SUCCESS" } }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }
}
