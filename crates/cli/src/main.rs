use clap::Parser;
use std::sync::Arc;
use strata_dns_domain::CliOverrides;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "strata-dns")]
#[command(version)]
#[command(about = "Strata DNS - plugin-chain DNS server with a tiered response cache")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Strata DNS Server v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config)?;
    info!(zones = ?dns_services.router.zones(), "Zones loaded");

    if config.server.metrics_log_interval > 0 {
        server::spawn_metrics_reporter(
            dns_services.metrics.clone(),
            config.server.metrics_log_interval,
        );
    }

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let handler = Arc::clone(&dns_services.handler_use_case);

    tokio::select! {
        result = server::start_dns_server(dns_addr, handler) => {
            if let Err(e) = result {
                error!(error = %e, "DNS server error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
