use clap::Parser;

#[derive(Parser)]
#[command(name = "alert-bridge")]
#[command(about = "TradingView to Bybit webhook bridge", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    config: String,

    /// Listen address override (host:port)
    #[arg(short, long, env = "BRIDGE_ADDR")]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run_bridge(&cli.config, cli.addr.as_deref()).await
}

async fn run_bridge(config_path: &str, addr_override: Option<&str>) -> anyhow::Result<()> {
    let config = alert_bridge_core::ConfigLoader::load_from(config_path)?;

    let addr = match addr_override {
        Some(addr) => addr.to_string(),
        None => format!("{}:{}", config.server.host, config.server.port),
    };

    tracing::info!("Starting alert bridge on {}", addr);
    tracing::info!("Forwarding orders to {}", config.bybit.base_url);

    // Credentials are resolved once here; requests observe the result.
    let client_config = alert_bridge_bybit::BybitClientConfig::default()
        .with_base_url(config.bybit.base_url.clone())
        .with_timeout_secs(config.bybit.timeout_secs);
    let client = std::sync::Arc::new(alert_bridge_bybit::BybitClient::from_env(client_config)?);

    let server = alert_bridge_web_api::ApiServer::new(client);
    server.serve(&addr).await?;

    Ok(())
}
