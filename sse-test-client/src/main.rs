use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::{Duration, Instant};

mod sse_client;

use sse_client::Connection;

#[derive(Parser)]
#[command(name = "sse-test-client")]
#[command(about = "Subscribe to a linkcast server and print the links it broadcasts")]
struct Cli {
    /// Base URL of the server (e.g., http://localhost:3000)
    #[arg(long, default_value = "http://localhost:3000")]
    base_url: String,

    /// Number of concurrent subscribers to open
    #[arg(long, default_value_t = 1)]
    subscribers: usize,

    /// Exit successfully once every subscriber has received this many links.
    /// Without it the client prints links until interrupted.
    #[arg(long)]
    expect: Option<usize>,

    /// Seconds to wait for each expected link
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{} Establishing SSE connections...", "→".blue());
    let mut connections = (1..=cli.subscribers.max(1))
        .map(|n| Connection::establish(&cli.base_url, format!("Subscriber {n}")))
        .collect::<Result<Vec<_>>>()?;
    println!(
        "{} {} subscriber(s) connected to {}",
        "✓".green(),
        connections.len(),
        cli.base_url
    );

    let Some(expected) = cli.expect else {
        return print_forever(connections).await;
    };

    let started = Instant::now();
    let timeout = Duration::from_secs(cli.timeout_secs);
    let mut first: Option<Vec<String>> = None;
    let mut all_passed = true;

    for connection in connections.iter_mut() {
        let mut received = Vec::with_capacity(expected);
        for _ in 0..expected {
            match connection.next_link(timeout).await {
                Ok(link) => {
                    println!(
                        "{} {} received {} after {:?}",
                        "✓".green(),
                        connection.label,
                        link.url,
                        link.timestamp.duration_since(started)
                    );
                    received.push(link.url);
                }
                Err(e) => {
                    println!("{} {}: {}", "✗".red(), connection.label, e);
                    all_passed = false;
                    break;
                }
            }
        }

        // Every subscriber should see the same links in the same order.
        match &first {
            None => first = Some(received),
            Some(reference) if *reference != received => {
                println!(
                    "{} {} received a different sequence than the first subscriber",
                    "✗".red(),
                    connection.label
                );
                all_passed = false;
            }
            Some(_) => {}
        }
    }

    if all_passed {
        println!("\n{}", "All subscribers received every link! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some subscribers missed links! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}

async fn print_forever(mut connections: Vec<Connection>) -> Result<()> {
    // Only the first subscriber prints; the others just hold their connection open.
    let mut first = connections.remove(0);
    while let Some(link) = first.wait_for_link().await {
        println!("{} {}", "→".blue(), link.url);
    }
    println!("{} Stream ended", "✗".red());
    drop(connections);
    Ok(())
}
