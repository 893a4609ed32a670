pub mod pacing;
pub mod payment_client;
pub mod url_prober;

pub use pacing::{FixedDelay, NoDelay, ProbeDelay};
pub use payment_client::PaymentClient;
