// src/main.rs — cardpress entry point

use clap::Parser;
use std::sync::Arc;

use cardpress::api::{self, ApiState};
use cardpress::cli::{submit, Cli, Commands};
use cardpress::core::protocol::Generator;
use cardpress::core::session::MemoryStore;
use cardpress::infra::config::Config;
use cardpress::infra::{jobs, logger};
use cardpress::provider::{OllamaProvider, TextProvider};
use cardpress::render::ChromiumRenderer;

#[tokio::main]
async fn main() {
    // Respects RUST_LOG
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Submit {
            topics,
            times,
            style,
            server,
        } => submit::run_submit(topics, times, submit::SubmitOptions { server, style }).await,
        Commands::Macro { file } => show_macro(&file),
    }
}

async fn serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(p) = port {
        config.server.port = p;
    }

    std::fs::create_dir_all(&config.output.dir)?;
    std::fs::create_dir_all(config.output.image_dir())?;

    let provider = Arc::new(OllamaProvider::new(&config.generator));
    match provider.probe().await {
        Ok(models) => {
            tracing::info!("text backend up ({} model(s) available)", models.len());
        }
        Err(e) => {
            // Startup proceeds; page-0 requests will fail with 503 until
            // the backend comes up.
            tracing::warn!("text backend not reachable yet: {e}");
        }
    }

    let renderer = Arc::new(ChromiumRenderer::new(
        &config.render,
        &config.card,
        &config.output,
    )?);
    let store = Arc::new(MemoryStore::new());

    tokio::spawn(jobs::run_background_jobs(
        store.clone(),
        config.output.dir.clone(),
        config.jobs.clone(),
    ));

    let config = Arc::new(config);
    let generator = Arc::new(Generator {
        store,
        provider,
        renderer,
        config: config.clone(),
    });

    api::start_server(&config.server, ApiState { generator }).await
}

fn show_macro(file: &std::path::Path) -> anyhow::Result<()> {
    let actions = cardpress::macros::load_macro(file)?;
    let schedule = cardpress::macros::replay_schedule(&actions);

    println!("{} action(s) in {}", actions.len(), file.display());
    for (action, wait) in actions.iter().zip(&schedule) {
        println!("  +{:>7.2}s  {action:?}", wait.as_secs_f64());
    }
    Ok(())
}
