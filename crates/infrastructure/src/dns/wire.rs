pub mod query_parser;
pub mod response_encoder;

pub use query_parser::{parse_query, ParsedQuery};
pub use response_encoder::{encode_error, encode_response, encode_with_limit};
