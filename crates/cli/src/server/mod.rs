pub mod dns;
pub mod metrics;

pub use dns::start_dns_server;
pub use metrics::spawn_metrics_reporter;
