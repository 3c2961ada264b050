//! Strata DNS Infrastructure Layer
//!
//! The response cache link and its pieces, the in-memory zone handler, and
//! the DNS wire codec used by the UDP front end.

pub mod dns;
