pub mod payment;
pub mod probe;
