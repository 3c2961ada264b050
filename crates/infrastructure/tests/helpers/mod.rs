#![allow(dead_code)]

mod harness;
mod mock_upstream;

pub use harness::{Harness, ZONE};
pub use mock_upstream::{soa_record, Behavior, MockUpstream};
