//! Client for a card-payment transactions API.
//!
//! [`PaymentClient::pay`] posts a payment to `{base_url}/api/v1/transactions`
//! and returns the API's answer as a [`RawApiResponse`];
//! [`PaymentClient::handle_response`] folds that into a [`NormalizedResult`].
//! [`PaymentClient::test_multiple_urls`] repeats the same payment against a
//! list of candidate hosts, one after the other.
//!
//! ```no_run
//! use paygate_client::PaymentClient;
//!
//! # async fn run() {
//! let client = PaymentClient::with_base_url("sk_test_key", "https://sandbox.example.com");
//! let payload = std::fs::read_to_string("payment.json").unwrap();
//! let raw = client.pay(&payload).await;
//! let result = PaymentClient::handle_response(&raw);
//! println!("{}", serde_json::to_string(&result).unwrap());
//! # }
//! ```

pub mod app;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use app::config::Config;
pub use error::{ConfigError, PaymentError};
pub use models::payment::{AmountUnit, NormalizedResult, PaymentInput, PaymentRequest, RawApiResponse};
pub use models::probe::{ProbeAttempt, ProbeOutcome};
pub use services::{FixedDelay, NoDelay, PaymentClient, ProbeDelay};
pub use utils::money::to_subunits;
