use anyhow::Context;
use clap::{Parser, Subcommand};
use nwr_core::AppConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "nwr-audit", version, about = "NWR Audit Central")]
struct Cli {
    /// Configuration file. A missing file means built-in defaults.
    #[arg(
        long,
        global = true,
        env = "NWR_AUDIT_CONFIG",
        default_value = nwr_core::config::DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "nwr_auth=trace").
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web dashboard.
    Serve {
        /// Host to bind (overrides dashboard.host).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides dashboard.port).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Log in and store the session in the state directory.
    Login {
        username: String,

        /// Password. Prompting is not supported; pass it or set the env var.
        #[arg(long, env = "NWR_AUDIT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Remove the stored session.
    Logout,

    /// Show the identity of the stored session.
    Whoami,

    /// Generate a session signing key.
    Keygen {
        /// File to write the private key to. Printed to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print an Argon2 hash for `auth.users[].password_hash`.
    HashPassword { password: String },

    /// Load and validate the configuration.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid --log-level filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.cmd {
        Command::Serve { host, port } => {
            let config = load_config(&cli.config)?;
            commands::serve::run(config, host, port).await?
        }

        Command::Login { username, password } => {
            let config = load_config(&cli.config)?;
            let identity = commands::session::login(&config, &username, &password)?;
            println!("Logged in as {}", commands::session::describe(&identity));
        }

        Command::Logout => {
            let config = load_config(&cli.config)?;
            commands::session::logout(&config)?;
            println!("Logged out");
        }

        Command::Whoami => {
            let config = load_config(&cli.config)?;
            match commands::session::whoami(&config)? {
                Some(identity) => println!("{}", commands::session::describe(&identity)),
                None => println!("not logged in"),
            }
        }

        Command::Keygen { output } => commands::keys::generate(output)?,

        Command::HashPassword { password } => {
            println!("{}", commands::keys::hash_password(&password)?)
        }

        Command::CheckConfig => commands::check::run(&cli.config)?,
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    AppConfig::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}
