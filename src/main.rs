use clap::Parser;
use dotenv::dotenv;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use syft_awake::cli::{split_peer_list, Cli, Command};
use syft_awake::models::{AwakeStatus, NetworkAwakenessSummary, Priority};
use syft_awake::{client, AwakeError, Config, HttpTransport, PeerDirectory};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize environment
    dotenv().ok();

    // Keep CLI output clean unless RUST_LOG asks for more
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AwakeError> {
    let config = Config::from_env()?;
    let directory = PeerDirectory::new(config.known_peers_path());
    // --timeout wins, REQUEST_TIMEOUT otherwise
    let timeout = cli.timeout(&config);

    match cli.command.clone() {
        Command::Ping {
            peer,
            message,
            priority,
        } => cmd_ping(&cli, &config, timeout, &peer, message.as_deref(), priority).await,
        Command::Scan { peers, message } => {
            cmd_scan(
                &cli,
                &config,
                timeout,
                &directory,
                peers.as_deref(),
                message.as_deref(),
            )
            .await
        }
        Command::Check { peers } => cmd_check(&config, timeout, &peers).await,
        Command::AddPeer { peer } => cmd_add_peer(&directory, &peer),
        Command::RemovePeer { peer } => cmd_remove_peer(&directory, &peer),
        Command::ListPeers => cmd_list_peers(&directory),
        Command::WhoAwake => cmd_who_awake(&config, timeout, &directory).await,
    }
}

fn status_emoji(status: AwakeStatus) -> &'static str {
    match status {
        AwakeStatus::Awake => "✅",
        AwakeStatus::Sleeping => "😴",
        AwakeStatus::Busy => "🔶",
        AwakeStatus::Unknown => "❓",
    }
}

/// Ping a specific peer and report its status
async fn cmd_ping(
    cli: &Cli,
    config: &Config,
    timeout: std::time::Duration,
    peer: &str,
    message: Option<&str>,
    priority: Priority,
) -> Result<ExitCode, AwakeError> {
    let requester = config.require_user_email()?;
    let transport = HttpTransport::new(&config.gateway_url, timeout)?;

    println!("📤 Pinging {}...", peer);

    let response = client::ping_peer(
        &transport,
        requester,
        peer,
        message.unwrap_or("ping"),
        priority,
        timeout,
    )
    .await;

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Ping failed: {}", e);
            println!("❌ No response from {}", peer);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "{} {}: {}",
        status_emoji(response.status),
        response.responder,
        response.status
    );
    println!("   Message: {}", response.message);
    println!("   Workload: {}", response.workload);
    if let Some(country) = &response.country {
        println!("   Country: {}", country);
    }
    if let Some(ms) = response.response_time_ms {
        println!("   Response time: {:.1}ms", ms);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(ExitCode::SUCCESS)
}

/// Scan the network and print the awakeness summary
async fn cmd_scan(
    cli: &Cli,
    config: &Config,
    timeout: std::time::Duration,
    directory: &PeerDirectory,
    peers: Option<&str>,
    message: Option<&str>,
) -> Result<ExitCode, AwakeError> {
    let requester = config.require_user_email()?;

    println!("🌐 Scanning network for awake members...");

    let peer_list = match peers {
        Some(raw) => split_peer_list(raw),
        None => directory.known_peers()?,
    };

    if peer_list.is_empty() {
        println!("No known network members found. Add some with 'syft-awake add-peer <email>'");
        return Ok(ExitCode::FAILURE);
    }

    let transport = HttpTransport::new(&config.gateway_url, timeout)?;
    let summary = client::ping_network(
        &transport,
        requester,
        &peer_list,
        message.unwrap_or("network scan"),
        timeout,
        config.max_concurrent_pings,
    )
    .await?;

    print_summary(&summary);

    if cli.json {
        println!("\n{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_summary(summary: &NetworkAwakenessSummary) {
    println!("\n📊 Network Awakeness Summary:");
    println!("   Total scanned: {}", summary.total_pinged);
    println!(
        "   Awake: {} ({:.1}%)",
        summary.awake_count,
        summary.awakeness_ratio() * 100.0
    );
    println!(
        "   Responsive: {} ({:.1}%)",
        summary.response_count,
        summary.response_ratio() * 100.0
    );
    println!("   Scan duration: {:.1}ms", summary.scan_duration_ms);

    if !summary.awake_users.is_empty() {
        println!("\n✅ Awake peers:");
        for peer in &summary.awake_users {
            println!("   • {}", peer);
        }
    }

    if !summary.sleeping_users.is_empty() {
        println!("\n😴 Sleeping peers:");
        for peer in &summary.sleeping_users {
            println!("   • {}", peer);
        }
    }

    if !summary.non_responsive.is_empty() {
        println!("\n❌ Non-responsive peers:");
        for peer in &summary.non_responsive {
            println!("   • {}", peer);
        }
    }

    if !summary.countries.is_empty() {
        println!("\n🌍 Countries:");
        let mut countries: Vec<_> = summary.countries.iter().collect();
        countries.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (code, count) in countries {
            println!("   • {}: {}", code, count);
        }
    }
}

/// Quick awake/not-responding check for a list of peers
async fn cmd_check(
    config: &Config,
    timeout: std::time::Duration,
    peers: &str,
) -> Result<ExitCode, AwakeError> {
    let requester = config.require_user_email()?;
    let peer_list = split_peer_list(peers);

    if peer_list.is_empty() {
        println!("Error: At least one peer email is required");
        return Ok(ExitCode::FAILURE);
    }

    let transport = HttpTransport::new(&config.gateway_url, timeout)?;

    for peer in &peer_list {
        print!("Checking {}... ", peer);
        std::io::stdout().flush().ok();
        if client::is_awake(&transport, requester, peer, timeout).await {
            println!("✅ AWAKE");
        } else {
            println!("❌ NOT RESPONDING");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn cmd_add_peer(directory: &PeerDirectory, peer: &str) -> Result<ExitCode, AwakeError> {
    if directory.add_peer(peer)? {
        println!("✅ Added {} to known peers", peer);
    } else {
        println!("{} is already a known peer", peer);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_remove_peer(directory: &PeerDirectory, peer: &str) -> Result<ExitCode, AwakeError> {
    if directory.remove_peer(peer)? {
        println!("➖ Removed {} from known peers", peer);
    } else {
        println!("{} was not a known peer", peer);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_list_peers(directory: &PeerDirectory) -> Result<ExitCode, AwakeError> {
    let peers = directory.known_peers()?;

    if peers.is_empty() {
        println!("No known peers. Add some with 'syft-awake add-peer <email>'");
        return Ok(ExitCode::SUCCESS);
    }

    println!("📋 Known network members ({}):", peers.len());
    for peer in peers {
        println!("   • {}", peer);
    }

    Ok(ExitCode::SUCCESS)
}

/// List which known peers are currently awake
async fn cmd_who_awake(
    config: &Config,
    timeout: std::time::Duration,
    directory: &PeerDirectory,
) -> Result<ExitCode, AwakeError> {
    let requester = config.require_user_email()?;

    println!("🔍 Checking who's awake in the network...");

    let transport = HttpTransport::new(&config.gateway_url, timeout)?;
    let awake = client::get_awake_users(
        &transport,
        requester,
        directory,
        timeout,
        config.max_concurrent_pings,
    )
    .await?;

    if awake.is_empty() {
        println!("😴 No peers are currently awake (or responding)");
        return Ok(ExitCode::SUCCESS);
    }

    println!("✅ Currently awake ({}):", awake.len());
    for peer in awake {
        println!("   • {}", peer);
    }

    Ok(ExitCode::SUCCESS)
}
