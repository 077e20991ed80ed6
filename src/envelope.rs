//! JSON codec for the voice platform's request and response envelopes.
//!
//! Only the fields the dispatcher reads are modelled; everything else in the
//! envelope is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;

use crate::error::EnvelopeError;
use crate::event::{
    ConnectionResponse, DirectiveName, Event, IntentRequest, PurchasePayload, PurchaseResult,
    RequestScope, Slot,
};
use crate::response::SpokenResponse;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    #[serde(default)]
    session: Option<RawSession>,
    #[serde(default)]
    context: Option<RawContext>,
    request: RawRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSession {
    session_id: Option<String>,
}

#[derive(Deserialize)]
struct RawContext {
    #[serde(rename = "System")]
    system: Option<RawSystem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSystem {
    api_endpoint: Option<String>,
    api_access_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    #[serde(rename = "type")]
    kind: String,
    request_id: Option<String>,
    locale: Option<String>,
    intent: Option<RawIntent>,
    name: Option<String>,
    status: Option<RawStatus>,
    #[serde(default)]
    payload: RawPayload,
}

#[derive(Deserialize)]
struct RawIntent {
    name: String,
    #[serde(default)]
    slots: HashMap<String, RawSlot>,
}

#[derive(Deserialize)]
struct RawSlot {
    value: Option<String>,
    resolutions: Option<RawResolutions>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResolutions {
    #[serde(default)]
    resolutions_per_authority: Vec<RawAuthority>,
}

#[derive(Deserialize)]
struct RawAuthority {
    #[serde(default)]
    values: Vec<RawValueEntry>,
}

#[derive(Deserialize)]
struct RawValueEntry {
    value: RawValue,
}

#[derive(Deserialize)]
struct RawValue {
    name: String,
}

#[derive(Deserialize)]
struct RawStatus {
    code: Value,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    product_id: Option<String>,
    purchase_result: Option<String>,
    message: Option<String>,
}

impl RawSlot {
    /// Only a single unambiguous candidate from some authority counts.
    fn resolved(&self) -> Option<String> {
        self.resolutions
            .as_ref()?
            .resolutions_per_authority
            .iter()
            .find(|a| a.values.len() == 1)
            .map(|a| a.values[0].value.name.clone())
    }
}

fn status_code(raw: &Value) -> Result<u16, EnvelopeError> {
    let parsed = match raw {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    };
    parsed.ok_or_else(|| EnvelopeError::StatusCode(raw.to_string()))
}

/// Decode an inbound envelope into its scope and [`Event`].
pub fn decode(text: &str) -> Result<(RequestScope, Event), EnvelopeError> {
    decode_value(serde_json::from_str(text)?)
}

pub fn decode_value(value: Value) -> Result<(RequestScope, Event), EnvelopeError> {
    let raw: RawEnvelope = serde_json::from_value(value)?;
    let system = raw.context.and_then(|c| c.system);
    let mut scope = RequestScope {
        session_id: raw.session.and_then(|s| s.session_id),
        request_id: raw.request.request_id.clone(),
        api_endpoint: system.as_ref().and_then(|s| s.api_endpoint.clone()),
        api_access_token: system.and_then(|s| s.api_access_token),
        ..RequestScope::default()
    };
    if let Some(locale) = raw.request.locale.clone() {
        scope.locale = locale;
    }
    let event = match raw.request.kind.as_str() {
        "LaunchRequest" => Event::Launch,
        "SessionEndedRequest" => Event::SessionEnded,
        "IntentRequest" => {
            let intent = raw.request.intent.ok_or(EnvelopeError::Missing("request.intent"))?;
            let slots = intent
                .slots
                .into_iter()
                .map(|(name, slot)| {
                    let resolved = slot.resolved();
                    let slot = Slot {
                        name: name.clone(),
                        resolved,
                        spoken: slot.value,
                    };
                    (name, slot)
                })
                .collect();
            Event::Intent(IntentRequest {
                name: intent.name,
                slots,
            })
        }
        "Connections.Response" => {
            let name = raw.request.name.ok_or(EnvelopeError::Missing("request.name"))?;
            let directive =
                DirectiveName::parse(&name).ok_or(EnvelopeError::UnknownDirective(name))?;
            let status = raw
                .request
                .status
                .ok_or(EnvelopeError::Missing("request.status"))?;
            Event::ConnectionResponse(ConnectionResponse {
                directive,
                status_code: status_code(&status.code)?,
                status_message: status.message.unwrap_or_default(),
                payload: PurchasePayload {
                    product_id: raw.request.payload.product_id,
                    purchase_result: raw
                        .request
                        .payload
                        .purchase_result
                        .as_deref()
                        .map(PurchaseResult::parse),
                    message: raw.request.payload.message,
                },
            })
        }
        other => return Err(EnvelopeError::UnsupportedRequest(other.to_string())),
    };
    Ok((scope, event))
}

/// Outbound envelope as sent back to the platform.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub version: &'static str,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub ssml: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

fn ssml(text: &str) -> OutputSpeech {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    OutputSpeech {
        kind: "SSML",
        ssml: format!("<speak>{escaped}</speak>"),
    }
}

/// Encode a [`SpokenResponse`] for the platform.
///
/// `shouldEndSession` is left out when a purchase directive is attached so the
/// host keeps control of the session while the purchase runs.
pub fn encode(response: &SpokenResponse) -> ResponseEnvelope {
    let directives: Vec<Value> = response
        .directive
        .iter()
        .map(|d| {
            let mut payload = json!({ "InSkillProduct": { "productId": d.product_id } });
            if let Some(msg) = &d.upsell_message {
                payload["upsellMessage"] = json!(msg);
            }
            json!({
                "type": "Connections.SendRequest",
                "name": d.name.as_str(),
                "payload": payload,
                "token": d.token,
            })
        })
        .collect();
    ResponseEnvelope {
        version: "1.0",
        response: ResponseBody {
            output_speech: (!response.speech.is_empty()).then(|| ssml(&response.speech)),
            reprompt: response.reprompt.as_deref().map(|r| Reprompt {
                output_speech: ssml(r),
            }),
            should_end_session: directives.is_empty().then_some(response.should_end_session),
            directives,
        },
    }
}
