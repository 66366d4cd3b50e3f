//! NetSDR Client Binary
//!
//! Connects to a receiver, streams I/Q data to a file until Enter is pressed,
//! then stops streaming and disconnects.

use std::io::BufRead;
use std::net::SocketAddr;

use clap::Parser;
use netsdr::{Config, NetSdrClient, TcpTransport};
use tracing_subscriber::{fmt, EnvFilter};

/// NetSDR capture client
#[derive(Parser, Debug)]
#[command(name = "netsdr-client")]
#[command(about = "Control a NetSDR receiver and capture its I/Q stream")]
#[command(version)]
struct Args {
    /// Receiver IP address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Control channel TCP port
    #[arg(short, long, default_value = "50000")]
    port: u16,

    /// Local UDP address for the I/Q stream
    #[arg(short, long, default_value = "0.0.0.0:60000")]
    data_addr: SocketAddr,

    /// Output file for received datagrams
    #[arg(short, long, default_value = "udp_data.bin")]
    output: String,

    /// Target frequency in Hz
    #[arg(short, long, default_value = "14200000")]
    frequency: u64,

    /// Channel id for the frequency command (0xFF = all)
    #[arg(short, long, default_value = "255")]
    channel: u8,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,netsdr=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("NetSDR client v{}", netsdr::VERSION);

    let config = Config::builder()
        .control_port(args.port)
        .data_bind_addr(args.data_addr)
        .output_path(&args.output)
        .build();

    let transport = TcpTransport::new().with_nodelay(config.tcp_nodelay);
    let mut client = NetSdrClient::new(transport, config);

    if let Err(e) = run(&mut client, &args) {
        eprintln!("An error occurred: {}", e);
        tracing::error!("Session failed: {}", e);
        std::process::exit(1);
    }
}

fn run(client: &mut NetSdrClient<TcpTransport>, args: &Args) -> netsdr::Result<()> {
    tracing::info!("Connecting to {}:{}...", args.host, args.port);
    client.connect(&args.host, args.port)?;

    tracing::info!("Starting IQ transmission...");
    client.start_iq()?;

    tracing::info!("Setting frequency to {} Hz...", args.frequency);
    client.set_target_frequency(args.frequency, args.channel)?;

    println!("Press Enter to stop IQ transmission...");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    tracing::info!("Stopping IQ transmission...");
    client.stop_iq()?;
    if let Some(stats) = client.last_stats() {
        println!(
            "Captured {} datagrams ({} bytes) to {}",
            stats.datagrams_written, stats.bytes_written, args.output
        );
    }

    tracing::info!("Disconnecting...");
    client.disconnect()?;
    Ok(())
}
