//! LingoChat CLI and HTTP entry point.
//!
//! Binary name: `lingochat`
//!
//! Parses CLI arguments, initializes tracing, the database and services,
//! then dispatches to a command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use lingochat_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, WordsCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&TracingOptions {
        enable_otel: cli.otel,
        json: cli.log_json,
        default_directive: cli.log_directive().to_string(),
    })
    .map_err(|e| anyhow::anyhow!(e))?;

    let state = AppState::init().await?;
    let result = run(&cli, &state).await;

    state.shutdown().await;
    shutdown_tracing();
    result
}

async fn run(cli: &Cli, state: &AppState) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Serve { port, host } => {
            let host = host.clone().unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, data_dir = %state.data_dir.display(), "Conversation service listening");
            println!(
                "  {} LingoChat listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state.clone());

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Seed => {
            cli::seed::seed(state, cli.json).await?;
        }

        Commands::Send {
            session_id,
            text,
            user,
        } => {
            cli::chat::send(state, session_id, text, user.as_deref(), cli.json).await?;
        }

        Commands::Session { session_id } => {
            cli::chat::show_session(state, session_id, cli.json).await?;
        }

        Commands::Recent { user_id } => {
            cli::chat::recent(state, user_id, cli.json).await?;
        }

        Commands::Translate { word, from, to } => {
            cli::chat::translate(state, word, from, to, cli.json).await?;
        }

        Commands::Words { command } => match command {
            WordsCommand::Save {
                word,
                language,
                user,
            } => cli::vocabulary::save(state, user, word, language, cli.json).await?,
            WordsCommand::List { language, user } => {
                cli::vocabulary::list_words(state, user, language, cli.json).await?
            }
            WordsCommand::Dictionaries { user } => {
                cli::vocabulary::dictionaries(state, user, cli.json).await?
            }
            WordsCommand::Forget { id, user } => {
                cli::vocabulary::forget(state, user, id, cli.json).await?
            }
        },
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining notifications");
}
