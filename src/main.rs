use chrono::Utc;
use clap::{Parser, Subcommand};
use roomlink::{
    room::types::GameRecord, stub, ClientConfig, GameType, RoomClient, ToastBoard,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "roomlink",
    about = "Join Tic-Tac-Toe and Connect 4 rooms hosted by a spreadsheet backend"
)]
struct Cli {
    /// Backend endpoint URL (the deployed script's /exec URL)
    #[arg(long, env = "ROOMLINK_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Display name used when creating or claiming rooms
    #[arg(long, env = "ROOMLINK_PLAYER", global = true)]
    player: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List rooms waiting for a second player
    Rooms {
        #[arg(value_parser = parse_game_type)]
        game: GameType,
    },
    /// Show one room
    Room {
        #[arg(value_parser = parse_game_type)]
        game: GameType,
        room_id: String,
    },
    /// Join the first open room, or open a new one
    Join {
        #[arg(value_parser = parse_game_type)]
        game: GameType,
    },
    /// List quiz topics
    Topics,
    /// Room counts per game and topics, as loaded at start-up
    Dashboard,
    /// Save a finished game to the history sheet
    Record {
        #[arg(long, value_parser = parse_game_type)]
        game: GameType,
        #[arg(long)]
        room: String,
        #[arg(long)]
        player1: String,
        #[arg(long)]
        player2: String,
        #[arg(long)]
        winner: Option<String>,
    },
    /// Run the in-memory stub backend
    ServeStub {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

fn parse_game_type(raw: &str) -> Result<GameType, String> {
    GameType::from_str(raw).map_err(|_| format!("unknown game type '{}'", raw))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomlink=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Commands::ServeStub { addr } = cli.command {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        stub::serve(listener, stub::StubState::with_default_topics()).await?;
        return Ok(());
    }

    let mut config = ClientConfig::from_env();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(player) = cli.player {
        config.player_name = player;
    }
    info!(endpoint = %config.endpoint, player = %config.player_name, "Starting roomlink client");

    let (client, toasts) = roomlink::connect(config);
    run(&client, cli.command).await?;
    print_notices(&toasts).await;

    Ok(())
}

async fn run(client: &RoomClient, command: Commands) -> Result<(), serde_json::Error> {
    match command {
        Commands::Rooms { game } => print_json(&client.list_rooms(game).await),
        Commands::Room { game, room_id } => print_json(&client.get_room(game, &room_id).await),
        Commands::Join { game } => print_json(&client.join_game(game).await),
        Commands::Topics => print_json(&client.list_topics().await),
        Commands::Dashboard => print_json(&client.load_dashboard().await),
        Commands::Record {
            game,
            room,
            player1,
            player2,
            winner,
        } => {
            let record = GameRecord {
                game_type: game,
                room_id: room,
                player1,
                player2,
                winner,
                finished_at: Utc::now(),
            };
            print_json(&client.record_game_outcome(record).await)
        }
        Commands::ServeStub { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn print_notices(toasts: &ToastBoard) {
    for toast in toasts.take_all().await {
        eprintln!("{}", toast);
    }
}
