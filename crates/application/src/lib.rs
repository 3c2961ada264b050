//! Strata DNS Application Layer
//!
//! The semantic message model, the handler-chain ports and the services that
//! route a query to the chain of the zone serving it.

pub mod message;
pub mod ports;
pub mod services;
pub mod use_cases;

pub use message::{DnsQuestion, DnsRequest, DnsResponse, EdnsInfo, CLASS_IN};
