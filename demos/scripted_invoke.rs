use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wallet_txn_lifecycle::mock::{confirmation_script, MockWallet};
use wallet_txn_lifecycle::{
    BridgeError, ChannelSink, ConfigManager, ContractBinder, HostEnvironment, ProviderGateway,
    TxnLifecycleManager,
};

const COUNTER_ABI: &str = r#"[
    { "type": "function", "name": "increment", "inputs": [], "outputs": [], "stateMutability": "nonpayable" }
]"#;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Optional config file overriding the explorer url and notification titles
    #[clap(long, value_parser)]
    config: Option<String>,
    #[clap(long, value_parser, default_value = "0xabc")]
    hash: String,
    #[clap(long, value_parser, default_value_t = 5)]
    confirmations: u64,
    /// Simulate an on-chain revert
    #[clap(long)]
    revert: bool,
    #[clap(long, value_parser, default_value = "0x0f5ea0a652e851678ebf77b69484bfcd31f9459b")]
    contract: String,
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), BridgeError> {
    setup_logging();

    let cli = Cli::parse();
    let bridge_config = ConfigManager::new(cli.config).load_config()?;

    let wallet = MockWallet::new()
        .with_script(confirmation_script(
            &cli.hash,
            cli.confirmations,
            Some(!cli.revert),
        ))
        .with_event_delay(Duration::from_millis(200));

    let (sink, mut notifications) = ChannelSink::new();
    let sink = Arc::new(sink);
    tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            println!(
                "[{}] {} {}",
                notification.title,
                notification.meta.message,
                notification.meta.action_href.unwrap_or_default()
            );
        }
    });

    let mut gateway = ProviderGateway::new(
        HostEnvironment::with_modern(wallet),
        sink.clone(),
        bridge_config.clone(),
    );
    let connection = gateway.init_connection()?;
    let account = gateway.request_account().await?;

    let contract = ContractBinder::new(sink.clone(), bridge_config.clone())
        .bind_contract(Some(&connection), COUNTER_ABI, &cli.contract)
        .await?;

    let manager = TxnLifecycleManager::new(sink, bridge_config);
    let transaction = manager
        .invoke("increment", Some(&contract), Some(&account))?
        .wait()
        .await?;

    println!("Final status: {} hash: {:?}", transaction.status, transaction.hash);

    // let the printer drain
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
