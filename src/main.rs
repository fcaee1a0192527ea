use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use demolauncher::config::{self, Config};
use demolauncher::docker::{self, DockerCli, InMemoryRuntime};
use demolauncher::launcher::{self, Launcher, SharedLauncher};
use demolauncher::server::{self, AppState};
use demolauncher::{logging, tui};

#[derive(Parser)]
#[command(name = "demolauncher", version, about = "Run one containerized demo at a time")]
struct Cli {
    /// Config file (default: .demolauncher.yaml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Simulate containers in memory instead of calling docker
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Terminal UI (default)
    Tui,
    /// Web UI
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Stop all demos, then launch one
    Launch {
        /// Display name of the demo
        name: String,
    },
    /// Stop all demos
    Stop,
    /// List configured demos
    List {
        /// Print the demo table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;
    let command = cli.command.unwrap_or(Command::Tui);

    match &command {
        Command::Tui => logging::init_file(&cfg.log_file, cli.verbose)?,
        _ => logging::init_stderr(cli.verbose),
    }

    if let Command::List { json } = command {
        let registry = cfg.registry()?;
        if json {
            let demos: Vec<_> = registry.iter().collect();
            println!("{}", serde_json::to_string_pretty(&demos)?);
        } else {
            for demo in registry.iter() {
                println!("{}\t{}\t{}", demo.display_name, demo.service_id, demo.url);
            }
        }
        return Ok(());
    }

    let shared = build_launcher(&cfg, cli.dry_run)?;

    match command {
        Command::Tui => {
            clean_slate(&shared);
            tui::run(shared, &cfg.title)
        }
        Command::Serve { host, port } => {
            let mut server_cfg = cfg.server.clone();
            if let Some(host) = host {
                server_cfg.host = host;
            }
            if let Some(port) = port {
                server_cfg.port = port;
            }
            clean_slate(&shared);
            serve(shared, &cfg.title, &server_cfg.bind_addr())
        }
        Command::Launch { name } => {
            let outcome = launcher::lock(&shared).launch_demo(Some(&name));
            println!("{}", outcome.message());
            if !outcome.is_started() {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Stop => {
            let report = launcher::lock(&shared).stop_all_demos();
            for (service, error) in &report.failures {
                eprintln!("{service}: {error}");
            }
            println!("{}", report.message());
            Ok(())
        }
        Command::List { .. } => Ok(()),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let cfg = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => {
            let cwd = std::env::current_dir().context("cannot determine working directory")?;
            config::load(&cwd)?
        }
    };
    Ok(cfg)
}

fn build_launcher(cfg: &Config, dry_run: bool) -> Result<SharedLauncher> {
    let registry = cfg.registry()?;
    let launcher = if dry_run {
        info!("dry run: containers are simulated in memory");
        let mut runtime = InMemoryRuntime::new();
        for demo in registry.iter() {
            runtime = runtime.with_compose_deps(&demo.service_id, demo.dependents.iter().cloned());
        }
        Launcher::new(registry, runtime, cfg.release)
    } else {
        if let Err(e) = docker::ensure_available() {
            warn!(error = %e, "docker is not reachable; launches will fail until it is");
        }
        Launcher::new(registry, DockerCli::from_config(cfg), cfg.release)
    };
    Ok(launcher::shared(launcher))
}

/// Stop anything left over from a previous run before opening a UI.
fn clean_slate(shared: &SharedLauncher) {
    let report = launcher::lock(shared).stop_all_demos();
    if !report.stopped.is_empty() {
        info!(stopped = ?report.stopped, "cleaned up leftover demos");
    }
}

fn serve(shared: SharedLauncher, title: &str, addr: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let state = AppState::new(shared, title);
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        server::serve(listener, state).await
    })
}
