use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use shellpane::config::SessionConfig;
use shellpane::core::error::ConfigError;
use shellpane::core::{SessionOptions, ShellSession, VirtualFs, load_seed};
use shellpane::utils::ansi;

#[derive(Parser)]
#[command(name = "shellpane")]
#[command(about = "In-process shell emulator driven from stdin")]
#[command(version)]
struct Cli {
    /// Session config file (TOML)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// JSON seed tree for the virtual filesystem
    #[arg(long = "seed")]
    seed: Option<PathBuf>,

    /// User name shown in the prompt
    #[arg(long = "user")]
    user: Option<String>,

    /// Host name shown in the prompt
    #[arg(long = "host")]
    host: Option<String>,

    /// Starting directory inside the virtual filesystem
    #[arg(long = "cwd")]
    cwd: Option<String>,

    /// Extra environment variable (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_var)]
    env: Vec<(String, String)>,

    /// Write plain text without ANSI colors
    #[arg(long = "no-color")]
    no_color: bool,

    /// Print the effective seed tree as JSON and exit
    #[arg(long = "dump-seed")]
    dump_seed: bool,
}

fn parse_env_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

/// Merge config file values with command-line overrides.
fn load_config(cli: &Cli) -> Result<SessionConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    if let Some(seed) = &cli.seed {
        config.seed = Some(seed.clone());
    }
    if let Some(user) = &cli.user {
        config.user = Some(user.clone());
    }
    if let Some(host) = &cli.host {
        config.host = Some(host.clone());
    }
    if let Some(cwd) = &cli.cwd {
        config.cwd = Some(cwd.clone());
    }
    if cli.no_color {
        config.color = Some(false);
    }
    config.env.extend(cli.env.iter().cloned());

    Ok(config)
}

fn run(cli: Cli) -> Result<(), ConfigError> {
    let config = load_config(&cli)?;

    if cli.dump_seed {
        let fs = match &config.seed {
            Some(path) => load_seed(path)?,
            None => VirtualFs::default(),
        };
        println!("{}", fs.to_json()?);
        return Ok(());
    }

    let color = config.color.unwrap_or(true);
    let mut session = ShellSession::new(SessionOptions::from_config(&config)?);
    log::info!("session started in {}", session.cwd());

    let mut stdout = std::io::stdout().lock();
    let mut stdin = std::io::stdin().lock();
    let mut buf = [0u8; 4096];

    let mut write = |text: String| {
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            log::warn!("failed to write output: {}", e);
        }
    };

    write(ansi::render(&session.start(), color));

    while !session.is_closed() {
        let n = match stdin.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("failed to read input: {}", e);
                break;
            }
        };
        let out = session.feed_bytes(&buf[..n]);
        write(ansi::render(&out, color));
    }

    if !session.is_closed() {
        write("\r\n".to_string());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
