use crate::error::PaymentError;
use crate::utils::money::resolve_amount;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;

pub const SUCCEEDED_STATUS: &str = "SUCCEEDED";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// Unit the request's `amount` is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountUnit {
    /// Whole currency units, e.g. dollars.
    Major,
    /// Smallest currency units, e.g. cents.
    Subunits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub description: String,
    pub amount: f64,
    pub card_holder: String,
    pub card_number: String,
    /// Card fields are sent exactly as given, string or number.
    #[serde(deserialize_with = "string_or_number")]
    pub cvv: Value,
    #[serde(deserialize_with = "string_or_number")]
    pub month: Value,
    #[serde(deserialize_with = "string_or_number")]
    pub year: Value,
    /// Explicit unit for `amount`. Never sent to the API.
    #[serde(default, skip_serializing)]
    pub amount_unit: Option<AmountUnit>,
    /// Additional fields, sent after the typed ones in insertion order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentRequest {
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn with_amount_unit(mut self, unit: AmountUnit) -> Self {
        self.amount_unit = Some(unit);
        self
    }

    /// Builds the JSON body for the transactions endpoint. The request itself
    /// is left untouched.
    pub fn to_payload(&self) -> Result<Map<String, Value>, PaymentError> {
        let amount = resolve_amount(self.amount, self.amount_unit)?;

        let mut payload = Map::new();
        payload.insert("clientName".into(), self.client_name.clone().into());
        payload.insert("clientEmail".into(), self.client_email.clone().into());
        payload.insert("clientPhone".into(), self.client_phone.clone().into());
        payload.insert("description".into(), self.description.clone().into());
        payload.insert("amount".into(), amount.into());
        payload.insert("cardHolder".into(), self.card_holder.clone().into());
        payload.insert("cardNumber".into(), self.card_number.clone().into());
        payload.insert("cvv".into(), self.cvv.clone());
        payload.insert("month".into(), self.month.clone());
        payload.insert("year".into(), self.year.clone());

        for (key, value) in &self.extra {
            payload.entry(key.clone()).or_insert_with(|| value.clone());
        }

        Ok(payload)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ (Value::String(_) | Value::Number(_)) => Ok(value),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number, found {other}"
        ))),
    }
}

/// What `pay` accepts: a request value or its JSON encoding.
#[derive(Debug, Clone, Copy)]
pub enum PaymentInput<'a> {
    Request(&'a PaymentRequest),
    Json(&'a str),
}

impl<'a> PaymentInput<'a> {
    pub fn decode(self) -> Result<Cow<'a, PaymentRequest>, PaymentError> {
        match self {
            PaymentInput::Request(request) => Ok(Cow::Borrowed(request)),
            PaymentInput::Json(raw) => serde_json::from_str(raw)
                .map(Cow::Owned)
                .map_err(|e| PaymentError::InvalidInputJson(e.to_string())),
        }
    }
}

impl<'a> From<&'a PaymentRequest> for PaymentInput<'a> {
    fn from(request: &'a PaymentRequest) -> Self {
        PaymentInput::Request(request)
    }
}

impl<'a> From<&'a str> for PaymentInput<'a> {
    fn from(raw: &'a str) -> Self {
        PaymentInput::Json(raw)
    }
}

impl<'a> From<&'a String> for PaymentInput<'a> {
    fn from(raw: &'a String) -> Self {
        PaymentInput::Json(raw)
    }
}

/// Response of a transactions call as seen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RawApiResponse {
    /// 2xx body, verbatim.
    Accepted(Value),
    Failed(PaymentError),
}

impl RawApiResponse {
    pub fn error_message(&self) -> Option<String> {
        match self {
            RawApiResponse::Failed(err) => Some(err.to_string()),
            RawApiResponse::Accepted(body) => body.get("error").filter(|v| is_truthy(v)).map(text),
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.field("status").and_then(Value::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            RawApiResponse::Accepted(body) => body.get(name),
            RawApiResponse::Failed(_) => None,
        }
    }

    fn text_field(&self, name: &str) -> Option<String> {
        self.field(name).filter(|v| !v.is_null()).map(text)
    }
}

impl Serialize for RawApiResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawApiResponse::Accepted(body) => body.serialize(serializer),
            RawApiResponse::Failed(err) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("error", &err.to_string())?;
                if let Some(details) = err.details() {
                    map.serialize_entry("details", details)?;
                }
                map.end()
            }
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Success or failure of a payment, independent of the raw response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResult {
    Success {
        reference_id: Option<String>,
        authorization_code: Option<String>,
        processed_at: Option<String>,
    },
    Failure {
        message: String,
    },
}

impl NormalizedResult {
    /// An error always wins over a `SUCCEEDED` status.
    pub fn from_response(response: &RawApiResponse) -> Self {
        if let Some(message) = response.error_message() {
            return NormalizedResult::Failure { message };
        }

        if response.status() == Some(SUCCEEDED_STATUS) {
            return NormalizedResult::Success {
                reference_id: response.text_field("referenceId"),
                authorization_code: response.text_field("authorizationCode"),
                processed_at: response.text_field("processedAt"),
            };
        }

        NormalizedResult::Failure {
            message: response
                .text_field("message")
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NormalizedResult::Success { .. })
    }
}

#[derive(Serialize)]
struct NormalizedWire<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authorization_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processed_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl Serialize for NormalizedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            NormalizedResult::Success {
                reference_id,
                authorization_code,
                processed_at,
            } => NormalizedWire {
                success: true,
                reference_id: reference_id.as_deref(),
                authorization_code: authorization_code.as_deref(),
                processed_at: processed_at.as_deref(),
                message: None,
            },
            NormalizedResult::Failure { message } => NormalizedWire {
                success: false,
                reference_id: None,
                authorization_code: None,
                processed_at: None,
                message: Some(message.as_str()),
            },
        };
        wire.serialize(serializer)
    }
}
