use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use clicker::client::{ClientEvent, RelayClient};
use clicker::model::Vocabulary;
use clicker::server::{DEFAULT_BIND, DEFAULT_PATH, RelayConfig, RelayServer};
use clicker::{Role, Token};
use colored::*;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "ws://127.0.0.1:3000/ws";
const REPLY_WAIT: Duration = Duration::from_secs(1);
const CLOSE_WAIT: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "clicker", version)]
#[command(about = "Pairing relay and remote for presentation clickers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay
    Serve {
        #[arg(long, env = "CLICKER_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,

        #[arg(long, env = "CLICKER_PATH", default_value = DEFAULT_PATH)]
        path: String,

        /// Seconds an empty room is kept; 0 keeps rooms forever
        #[arg(long, env = "CLICKER_IDLE_TTL", default_value_t = 600)]
        idle_ttl: u64,

        #[arg(long, env = "CLICKER_SWEEP_INTERVAL", default_value_t = 60)]
        sweep_interval: u64,

        /// Signal names to forward, replacing signal-1 and signal-2
        #[arg(long = "signal", value_name = "NAME")]
        signals: Vec<String>,

        /// Drop the permissive CORS layer
        #[arg(long)]
        same_origin: bool,
    },

    /// Send one signal as the controller and report what the relay said
    Send {
        #[arg(long, env = "CLICKER_URL", default_value = DEFAULT_URL)]
        url: String,

        #[arg(long, env = "CLICKER_TOKEN")]
        token: String,

        #[arg(long, default_value = "web")]
        role: Role,

        /// signal-1 (next), signal-2 (previous) or any name the relay accepts
        name: String,
    },

    /// Join as the receiver and print everything the relay delivers
    Listen {
        #[arg(long, env = "CLICKER_URL", default_value = DEFAULT_URL)]
        url: String,

        #[arg(long, env = "CLICKER_TOKEN")]
        token: String,

        #[arg(long, default_value = "desktop")]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            bind,
            path,
            idle_ttl,
            sweep_interval,
            signals,
            same_origin,
        } => {
            let mut config = RelayConfig {
                bind,
                path,
                room_idle_ttl: (idle_ttl > 0).then(|| Duration::from_secs(idle_ttl)),
                sweep_interval: Duration::from_secs(sweep_interval.max(1)),
                allow_any_origin: !same_origin,
                ..RelayConfig::default()
            };
            if !signals.is_empty() {
                config.vocabulary = Vocabulary::new(signals);
            }
            serve(config).await
        }
        Commands::Send {
            url,
            token,
            role,
            name,
        } => send(&url, parse_token(token)?, role, &name).await,
        Commands::Listen { url, token, role } => listen(&url, parse_token(token)?, role).await,
    }
}

fn parse_token(raw: String) -> Result<Token> {
    Token::new(raw).context("Token must not be empty")
}

async fn serve(config: RelayConfig) -> Result<()> {
    println!("{}", "📡 Starting clicker relay...".green().bold());
    println!("   🔌 Endpoint: ws://{}{}", config.bind, config.path);
    let names: Vec<&str> = config.vocabulary.names().collect();
    println!("   🎯 Signals:  {}", names.join(", "));
    match config.room_idle_ttl {
        Some(ttl) => println!("   🧹 Idle TTL: {}s", ttl.as_secs()),
        None => println!("   🧹 Idle TTL: {}", "off".yellow()),
    }

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    RelayServer::new(config)
        .serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .context("Relay server failed")
}

async fn send(url: &str, token: Token, role: Role, name: &str) -> Result<()> {
    let (client, mut events) = RelayClient::connect(url, token, role).await?;
    tokio::time::timeout(CLOSE_WAIT, client.wait_connected())
        .await
        .context("Relay did not confirm the connection")??;

    client.send_signal(name)?;
    let rejection = wait_for_rejection(&mut events).await;

    client.disconnect();
    wait_closed(&mut events).await;

    match rejection {
        Some(message) => bail!("Relay rejected '{}': {}", name, message),
        None => {
            println!("{} {}", "✨ Sent".green().bold(), name);
            Ok(())
        }
    }
}

/// The relay only answers a signal when it refuses it.
async fn wait_for_rejection(events: &mut UnboundedReceiver<ClientEvent>) -> Option<String> {
    let deadline = tokio::time::Instant::now() + REPLY_WAIT;
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(ClientEvent::RelayError(message))) => return Some(message),
            Ok(Some(ClientEvent::Closed { code, reason })) => {
                return Some(format!("connection closed ({:?}) {}", code, reason));
            }
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return None,
        }
    }
}

async fn wait_closed(events: &mut UnboundedReceiver<ClientEvent>) {
    let _ = tokio::time::timeout(CLOSE_WAIT, async {
        while let Some(event) = events.recv().await {
            if matches!(event, ClientEvent::Closed { .. }) {
                break;
            }
        }
    })
    .await;
}

async fn listen(url: &str, token: Token, role: Role) -> Result<()> {
    let (client, mut events) = RelayClient::connect(url, token, role).await?;
    println!("{}", "👂 Listening for signals, Ctrl+C to stop".cyan());

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ClientEvent::Connected { role, token }) => {
                    println!("{} room '{}' as {}", "✅ Joined".green(), token, role);
                }
                Some(ClientEvent::Status(presence)) => {
                    println!(
                        "   👥 desktop: {}  web: {}",
                        mark(presence.desktop),
                        mark(presence.web)
                    );
                }
                Some(ClientEvent::Signal(name)) => println!("{} {}", "➡️ ".bold(), name.bold()),
                Some(ClientEvent::RelayError(message)) => {
                    println!("{} {}", "⚠️  Relay error:".yellow(), message);
                }
                Some(ClientEvent::Pong) => {}
                Some(ClientEvent::Closed { code, reason }) => {
                    println!("{} {:?} {}", "🔌 Closed".red(), code, reason);
                    return Ok(());
                }
                None => return Ok(()),
            },
            _ = tokio::signal::ctrl_c() => {
                client.disconnect();
                wait_closed(&mut events).await;
                return Ok(());
            }
        }
    }
}

fn mark(present: bool) -> ColoredString {
    if present { "yes".green() } else { "no".dimmed() }
}
