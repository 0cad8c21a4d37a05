use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use askama::Template;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use angels_server::cache::{CacheConfig, SnapshotCache};
use angels_server::feed::{
    FeedSource, FileSource, HttpSource, HttpSourceConfig, SnapshotSource, parse_stations,
};
use angels_server::ranking::{DEFAULT_AT_MOST, RankConfig, RankedSnapshot};
use angels_server::web::{AppState, OpportunitiesTemplate, create_router};

#[derive(Parser, Debug)]
#[command(name = "angels-server")]
#[command(about = "Find the best Bike Angels trips per mile ridden")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the ranked opportunities over HTTP
    Serve(ServeArgs),

    /// Rank a saved snapshot once and print the HTML page
    Rank {
        #[command(flatten)]
        input: InputArgs,

        /// Number of opportunities to show
        #[arg(long, default_value_t = DEFAULT_AT_MOST, env = "ANGELS_AT_MOST")]
        at_most: usize,
    },

    /// List the stations of a saved snapshot, most in need of bikes first
    Stations {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Station feed JSON file
    #[arg(long, env = "ANGELS_STATION_INFO")]
    station_info: PathBuf,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Station feed JSON file, used when --local is true
    #[arg(long, env = "ANGELS_STATION_INFO")]
    station_info: Option<PathBuf>,

    /// Read the station feed from --station-info instead of the live API
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "ANGELS_LOCAL")]
    local: bool,

    /// Live station feed URL
    #[arg(long, env = "ANGELS_FEED_URL")]
    feed_url: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 8001, env = "ANGELS_PORT")]
    port: u16,

    /// Number of opportunities shown by default
    #[arg(long, default_value_t = DEFAULT_AT_MOST, env = "ANGELS_AT_MOST")]
    at_most: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "angels_server=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Rank { input, at_most } => rank_once(&input, at_most).await,
        Command::Stations { input } => list_stations(&input).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn serve(args: ServeArgs) -> Result<(), BoxError> {
    let source = if args.local {
        let path = args
            .station_info
            .ok_or("--station-info is required when --local is true")?;
        FeedSource::from(FileSource::new(path))
    } else {
        let config = args
            .feed_url
            .map(HttpSourceConfig::new)
            .unwrap_or_default();
        FeedSource::from(HttpSource::new(config)?)
    };
    info!(source = %source.describe(), "using station feed");

    let cache = SnapshotCache::new(source, CacheConfig::default());
    let state = AppState::new(cache, args.at_most);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Bike Angels opportunities listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn load_snapshot(input: &InputArgs) -> Result<RankedSnapshot, BoxError> {
    let raw = FileSource::new(&input.station_info).fetch().await?;
    let stations = parse_stations(&raw)?;
    Ok(RankedSnapshot::new(stations, &RankConfig::default()))
}

async fn rank_once(input: &InputArgs, at_most: usize) -> Result<(), BoxError> {
    let snapshot = load_snapshot(input).await?;
    let html = OpportunitiesTemplate::from_snapshot(&snapshot, at_most, None).render()?;
    println!("{html}");
    Ok(())
}

async fn list_stations(input: &InputArgs) -> Result<(), BoxError> {
    let snapshot = load_snapshot(input).await?;
    for station in snapshot.stations_by_points() {
        println!("{station}");
    }
    Ok(())
}
