use quote_relay::config::Config;
use quote_relay::providers::eastmoney::EastmoneyProvider;
use quote_relay::server;
use quote_relay::services::quote_service::QuoteService;
use quote_relay::services::snapshot::SnapshotService;

use clap::{App, Arg, SubCommand};
use log::error;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    let app = App::new("QuoteRelay")
        .version("0.1.0")
        .about("A-share realtime quote relay service")
        .subcommand(
            SubCommand::with_name("serve")
                .about("Run the HTTP quote API")
                .arg(
                    Arg::with_name("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Address to bind the HTTP server to")
                        .takes_value(true)
                        .default_value("0.0.0.0"),
                )
                .arg(
                    Arg::with_name("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Port to listen on")
                        .takes_value(true)
                        .default_value("5000"),
                )
                .arg(
                    Arg::with_name("timeout")
                        .long("timeout")
                        .value_name("SECONDS")
                        .help("Upstream request timeout in seconds")
                        .takes_value(true)
                        .default_value("30"),
                )
                .arg(
                    Arg::with_name("etf-limit")
                        .long("etf-limit")
                        .value_name("LIMIT")
                        .help("Maximum number of rows returned by /api/etf/all")
                        .takes_value(true)
                        .default_value("100"),
                ),
        )
        .subcommand(
            SubCommand::with_name("dump")
                .about("Fetch the watchlist once and write snapshot files")
                .arg(
                    Arg::with_name("text")
                        .long("text")
                        .value_name("FILE")
                        .help("Path of the hand-formatted text snapshot")
                        .takes_value(true)
                        .default_value("realtime_data.txt"),
                )
                .arg(
                    Arg::with_name("json")
                        .long("json")
                        .value_name("FILE")
                        .help("Path of the JSON snapshot")
                        .takes_value(true)
                        .default_value("realtime_data.json"),
                ),
        );

    let matches = app.get_matches();

    if let Some(matches) = matches.subcommand_matches("serve") {
        let host = matches.value_of("host").unwrap_or("0.0.0.0");
        let port = matches
            .value_of("port")
            .unwrap_or("5000")
            .parse::<u16>()
            .unwrap_or(5000);
        let timeout = matches
            .value_of("timeout")
            .unwrap_or("30")
            .parse::<u64>()
            .unwrap_or(30);
        let etf_limit = matches
            .value_of("etf-limit")
            .unwrap_or("100")
            .parse::<usize>()
            .unwrap_or(100);

        let config = Config::new()
            .with_host(host)
            .with_port(port)
            .with_request_timeout_secs(timeout)
            .with_etf_list_limit(etf_limit);

        let provider = Arc::new(EastmoneyProvider::new(&config)?);
        let service = Arc::new(QuoteService::new(config.clone(), provider));

        server::serve(&config, service).await?;
    } else if let Some(matches) = matches.subcommand_matches("dump") {
        let text_path = matches.value_of("text").unwrap_or("realtime_data.txt");
        let json_path = matches.value_of("json").unwrap_or("realtime_data.json");

        let config = Config::new();
        let provider = Arc::new(EastmoneyProvider::new(&config)?);
        let snapshot = SnapshotService::new(provider);

        snapshot
            .dump(Path::new(text_path), Path::new(json_path))
            .await?;
    } else {
        error!("No command specified. Use --help for usage information.");
    }

    Ok(())
}
