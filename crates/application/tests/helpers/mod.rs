#![allow(dead_code)]

mod mock_handlers;

pub use mock_handlers::{a_record, answer_for, MockHandler, RecordingHandler};
