// srcpbridge -- bridges an FM-DX webserver's JSON tuner feed to legacy
// SRCP receiver-control clients over UDP.
//
// Usage:
//   srcpbridge 127.0.0.1:8080
//   srcpbridge radio.example.net:8080 --udp-port 8430 --profile xdr
//   srcpbridge 127.0.0.1:8080 --debug
//
// The webserver address is joined with /text to form the feed URL. SRCP
// queries are served on the UDP port; change-only tuner snapshots fan
// out to 127.0.0.1:<udp-port - 1>, the conventional StationList layout.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use srcpbridge_core::{ReceiverProfile, TranslationEngine};
use srcpbridge_transport::feed::feed_url;
use srcpbridge_transport::{FeedClient, SrcpEndpoint};

use crate::bridge::Bridge;

mod bridge;

/// srcpbridge -- FM-DX webserver to SRCP datagram bridge.
#[derive(Debug, Parser)]
#[command(name = "srcpbridge", version, about)]
struct Cli {
    /// Webserver address as host:port.
    webserver: String,

    /// UDP port to serve SRCP control clients on.
    #[arg(short = 'u', long, default_value_t = 8430,
          value_parser = clap::value_parser!(u16).range(2..))]
    udp_port: u16,

    /// Receiver profile behind the webserver: tef or xdr.
    #[arg(short = 'r', long, default_value = "tef")]
    profile: ReceiverProfile,

    /// Log protocol traffic at debug level.
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let url = feed_url(&cli.webserver);
    let snapshot_dest =
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), cli.udp_port - 1);

    info!(url = %url, profile = %cli.profile, udp_port = cli.udp_port, "Starting srcpbridge");

    let feed = FeedClient::connect(&url)
        .await
        .with_context(|| format!("cannot reach the webserver feed at {url}"))?;
    let endpoint = SrcpEndpoint::bind_port(cli.udp_port)
        .await
        .with_context(|| format!("cannot bind the SRCP control port {}", cli.udp_port))?;

    info!("Bridge running. Press CTRL+C to stop.");

    let engine = TranslationEngine::new(cli.profile);
    Bridge::new(engine, feed, endpoint, snapshot_dest)
        .run()
        .await?;

    info!("Feed connection closed, shutting down");
    Ok(())
}
