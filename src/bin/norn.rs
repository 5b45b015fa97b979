use clap::{Parser, Subcommand};
use norn::{config::NornConfig, persistence::ListStore, server, Environment, Error};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file
    #[arg(short, long, default_value = "norn.json", global = true)]
    config: PathBuf,

    /// Port of the line-oriented console service
    #[arg(long, env = "NORN_CONSOLE_PORT", global = true)]
    console_port: Option<u16>,

    /// Port of the HTTP service
    #[arg(long, env = "NORN_HTTP_PORT", global = true)]
    http_port: Option<u16>,

    /// Directory that !save and !load file names are resolved against
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// List files to load at startup, in order, relative to the data directory
    #[arg(short, long = "file", global = true)]
    files: Vec<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the console and HTTP transports (default)
    Serve,

    /// Read commands from stdin
    Repl,
}

fn load_config(cli: &Cli) -> Result<NornConfig, Error> {
    let mut config = if cli.config.exists() {
        NornConfig::from_file(&cli.config)?
    } else {
        NornConfig::default()
    };

    if let Some(port) = cli.console_port {
        config.console.port = port;
    }
    if let Some(port) = cli.http_port {
        config.http.port = port;
    }
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    config.preload.extend(cli.files.iter().cloned());

    Ok(config)
}

/// Loads every preload file; any failure aborts startup.
fn build_environment(config: &NornConfig) -> Result<Environment, Error> {
    let environment = Environment::with_store(ListStore::new(&config.storage.data_dir));
    for file in &config.preload {
        environment
            .load(file)
            .map_err(|e| Error::Config(format!("Failed to load {}: {}", file, e)))?;
        info!("preloaded {}", file);
    }
    Ok(environment)
}

fn repl(environment: &Environment) -> Result<(), Error> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        print!("> ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim_end_matches(['\r', '\n']);
        if command.is_empty() {
            break;
        }

        match environment.execute(command) {
            Ok(output) => println!("{}", output),
            Err(e) => println!("{}", e),
        }
    }
    Ok(())
}

async fn run(cli: &Cli) -> Result<(), Error> {
    let config = load_config(cli)?;
    debug!("config: {:?}", config);

    let environment = build_environment(&config)?;

    match cli.command.as_ref().unwrap_or(&Commands::Serve) {
        Commands::Serve => server::serve(&config, Arc::new(environment)).await,
        Commands::Repl => repl(&environment),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| cli.log_level.as_str().into()))
        .with(fmt::layer())
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
