mod config;
mod terminal;

use std::io;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Backend, Cli, Command, Config, prepare_sqlite_file};
use services::{AppServices, Clock};
use terminal::{PlayExit, play, render_gallery};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn build_services(config: &Config) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::default();
    let services = match config.backend {
        Backend::Files => {
            AppServices::new_files(&config.data_dir, config.settings, &config.vocabulary, clock)?
        }
        Backend::Sqlite => {
            prepare_sqlite_file(&config.db_url)?;
            AppServices::new_sqlite(&config.db_url, config.settings, &config.vocabulary, clock)
                .await?
        }
    };
    Ok(services.with_seed(config.seed))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_args(&cli.global)?;
    info!(backend = ?config.backend, data_dir = %config.data_dir.display(), "starting");
    let services = build_services(&config).await?;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => {
            let mut game = services.start_game().await?;
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let exit = play(&mut game, stdin.lock(), &mut stdout);
            // Save before surfacing a loop error.
            game.save().await?;
            if exit? == PlayExit::Exhausted {
                info!("vocabulary exhausted");
            }
            Ok(())
        }
        Command::Gallery(args) => {
            let gallery = services.gallery().await?;
            let mut stdout = io::stdout();
            if args.json {
                let tiles = gallery.tiles();
                let expanded = args.expand.and_then(|index| gallery.entries(index));
                let doc = serde_json::json!({
                    "overview": gallery.overview(),
                    "tiles": tiles,
                    "entries": expanded,
                });
                serde_json::to_writer_pretty(&mut stdout, &doc)?;
                println!();
            } else {
                render_gallery(&gallery, args.expand, &mut stdout)?;
            }
            Ok(())
        }
        Command::Import(args) => {
            let report = services.import(&args.file, args.reset).await?;
            println!(
                "imported {} of {} entries from {}{}",
                report.kept,
                report.read,
                args.file.display(),
                if report.reset { " (progress reset)" } else { "" }
            );
            if report.withdrawn > 0 {
                println!("{} already played words stay out of new sessions", report.withdrawn);
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
