#![allow(dead_code)]

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use paygate_client::PaymentRequest;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Payment API stand-in that answers every request with the same status and
/// body and records what it received.
pub struct MockApi {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockApi {
    pub async fn start(status: u16, reply: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock api");
        let addr = listener.local_addr().expect("mock api address");
        let status = StatusCode::from_u16(status).expect("valid status code");
        let reply = Bytes::from(reply.to_string());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let captured = requests.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let captured = captured.clone();
                let reply = reply.clone();

                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let captured = captured.clone();
                        let reply = reply.clone();
                        async move {
                            let method = req.method().to_string();
                            let path = req.uri().path().to_string();
                            let api_key = header(&req, "x-api-key");
                            let content_type = header(&req, "content-type");
                            let bytes = req.into_body().collect().await?.to_bytes();

                            captured.lock().unwrap().push(CapturedRequest {
                                method,
                                path,
                                api_key,
                                content_type,
                                body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
                            });

                            let response = Response::builder()
                                .status(status)
                                .header("content-type", "application/json")
                                .body(Full::new(reply))
                                .unwrap();
                            Ok::<_, hyper::Error>(response)
                        }
                    });

                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn header(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let addr = listener.local_addr().expect("probe port address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn sample_request(amount: f64) -> PaymentRequest {
    PaymentRequest {
        client_name: "Grace Hopper".to_string(),
        client_email: "grace@example.com".to_string(),
        client_phone: "+15550199".to_string(),
        description: "Compiler license".to_string(),
        amount,
        card_holder: "GRACE HOPPER".to_string(),
        card_number: "5555555555554444".to_string(),
        cvv: "321".into(),
        month: "07".into(),
        year: "2031".into(),
        amount_unit: None,
        extra: Map::new(),
    }
}

pub const SUCCEEDED_BODY: &str =
    r#"{"status":"SUCCEEDED","referenceId":"ref_001","authorizationCode":"AUTH42","processedAt":"2026-10-16T12:00:00Z"}"#;
