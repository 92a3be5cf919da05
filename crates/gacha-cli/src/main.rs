//! Operator CLI for the gacha draw engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "gacha",
    about = "Gacha banners: draw, redeem tickets, inspect config",
    version,
    propagate_version = true
)]
struct Cli {
    /// Configuration root holding gacha_settings.json and gacha_pools/
    #[arg(short, long, global = true, env = "GACHA_CONFIG", default_value = "kubejs/config")]
    config: PathBuf,

    /// RNG seed for reproducible draws
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded banners
    List,

    /// Draw from a banner
    Draw {
        /// Banner name (file name under gacha_pools/ without .json)
        banner: String,

        /// Number of draws: 1 or 10
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Player the draw is for
        #[arg(short, long, default_value = "console")]
        player: String,
    },

    /// Use a ticket by kind (kinds ending in _10 draw ten)
    Redeem {
        /// Ticket kind
        kind: String,

        /// Player redeeming the ticket
        #[arg(short, long, default_value = "console")]
        player: String,

        /// Redeem as an operator (shows delivery warnings)
        #[arg(long)]
        op: bool,
    },

    /// Reload settings and the declared active banners
    Reload,

    /// List ticket shop offers
    Shop,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gacha=debug" } else { "gacha=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context {
        config: cli.config,
        seed: cli.seed,
    };

    let result = match cli.command {
        Commands::List => commands::list::run(&ctx),
        Commands::Draw {
            banner,
            count,
            player,
        } => commands::draw::run(&ctx, &banner, count, &player),
        Commands::Redeem { kind, player, op } => commands::redeem::run(&ctx, &kind, &player, op),
        Commands::Reload => commands::reload::run(&ctx),
        Commands::Shop => commands::shop::run(&ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
