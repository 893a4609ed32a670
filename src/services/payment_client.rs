use crate::app::config::{Config, DEFAULT_BASE_URL, DEFAULT_PROBE_DELAY_MS};
use crate::error::PaymentError;
use crate::models::payment::{NormalizedResult, PaymentInput, RawApiResponse};
use crate::models::probe::ProbeOutcome;
use crate::services::pacing::{FixedDelay, ProbeDelay};
use crate::services::url_prober::run_probes;
use crate::utils::money::format_currency;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const TRANSACTIONS_PATH: &str = "/api/v1/transactions";
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct PaymentClient {
    client: Client,
    api_key: String,
    base_url: String,
    probe_delay: Duration,
}

impl PaymentClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            probe_delay: Duration::from_millis(DEFAULT_PROBE_DELAY_MS),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, PaymentError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PaymentError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            probe_delay: config.probe_delay(),
        })
    }

    /// Same key and connection pool, different host.
    pub fn for_base_url(&self, base_url: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: base_url.into(),
            probe_delay: self.probe_delay,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> Result<Url, PaymentError> {
        let base = self.base_url.trim_end_matches('/');
        Url::parse(&format!("{}{}", base, TRANSACTIONS_PATH))
            .map_err(|e| PaymentError::ConnectionError(format!("invalid base URL {:?}: {}", self.base_url, e)))
    }

    pub fn headers(&self) -> Result<HeaderMap, PaymentError> {
        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| PaymentError::ConnectionError(format!("API key is not a valid header value: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Submits one payment. Every failure comes back as
    /// [`RawApiResponse::Failed`]; nothing is returned as `Err`.
    pub async fn pay<'a>(&self, data: impl Into<PaymentInput<'a>>) -> RawApiResponse {
        match self.send_transaction(data.into()).await {
            Ok(body) => RawApiResponse::Accepted(body),
            Err(e) => {
                warn!("Payment against {} failed: {}", self.base_url, e);
                RawApiResponse::Failed(e)
            }
        }
    }

    pub fn handle_response(response: &RawApiResponse) -> NormalizedResult {
        NormalizedResult::from_response(response)
    }

    /// Sends the same payment to every URL in order, one second apart by
    /// default. See [`PaymentClient::probe_urls_with`].
    pub async fn test_multiple_urls<'a, S: AsRef<str>>(
        &self,
        data: impl Into<PaymentInput<'a>>,
        urls: &[S],
    ) -> Vec<ProbeOutcome> {
        let delay = FixedDelay::new(self.probe_delay);
        self.probe_urls_with(data, urls, &delay).await
    }

    pub async fn probe_urls_with<'a, S: AsRef<str>>(
        &self,
        data: impl Into<PaymentInput<'a>>,
        urls: &[S],
        delay: &dyn ProbeDelay,
    ) -> Vec<ProbeOutcome> {
        let input = data.into();
        run_probes(urls, delay, |url| {
            let client = self.for_base_url(url);
            async move {
                let response = client.pay(input).await;
                let result = Self::handle_response(&response);
                (response, result)
            }
        })
        .await
    }

    async fn send_transaction(&self, input: PaymentInput<'_>) -> Result<Value, PaymentError> {
        let request = input.decode()?;
        let payload = request.to_payload()?;
        let endpoint = self.endpoint()?;
        let headers = self.headers()?;

        debug!("POST {}", endpoint);
        debug!("Headers: {:?}", redacted_headers(&headers));
        debug!("Payload: {}", redacted_payload(&payload));
        // `to_payload` has already resolved the amount to subunits.
        if let Some(amount) = payload.get("amount").and_then(Value::as_i64) {
            info!("Submitting payment of {} to {}", format_currency(amount), self.base_url);
        }

        let response = self
            .client
            .post(endpoint)
            .headers(headers)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Transport error: {}", e);
                PaymentError::from_transport(&e)
            })?;

        let status = response.status();
        let body = read_body(response).await?;

        if status.is_success() {
            info!("Payment API answered {}", status);
            debug!("Response body: {}", body);
            Ok(body)
        } else {
            Err(PaymentError::ServerError {
                status: status.as_u16(),
                details: body,
            })
        }
    }
}

impl fmt::Debug for PaymentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentClient")
            .field("api_key", &mask(&self.api_key))
            .field("base_url", &self.base_url)
            .field("probe_delay", &self.probe_delay)
            .finish()
    }
}

/// JSON when the body parses, otherwise the raw text as a JSON string.
async fn read_body(response: Response) -> Result<Value, PaymentError> {
    let text = response.text().await.map_err(|e| {
        warn!("Failed to read response body: {}", e);
        PaymentError::NoResponse
    })?;

    if text.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn redacted_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or("<binary>");
            let shown = if name.as_str() == API_KEY_HEADER { mask(value) } else { value.to_string() };
            (name.to_string(), shown)
        })
        .collect()
}

fn redacted_payload(payload: &Map<String, Value>) -> Value {
    let mut copy = payload.clone();
    if let Some(Value::String(number)) = copy.get_mut("cardNumber") {
        *number = mask(number);
    }
    if let Some(cvv) = copy.get_mut("cvv") {
        *cvv = Value::String("***".to_string());
    }
    Value::Object(copy)
}
