use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use gemsrack_console_lib::commands::{self, OutputFormat};
use gemsrack_console_lib::db;
use gemsrack_console_lib::error::ErrorResponse;
use gemsrack_console_lib::services::ApiService;
use gemsrack_console_lib::types::{EnabledFilter, TableSort};
use gemsrack_console_lib::AppState;

#[derive(Parser)]
#[command(
    name = "gemsrack-console",
    about = "Terminal console for a Gemsrack gem catalog",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Gemsrack API base URL (falls back to the stored setting, then
    /// http://127.0.0.1:8080)
    #[arg(long, global = true, env = "GEMSRACK_BASE_URL")]
    base_url: Option<String>,

    /// Team whose catalog and usage to read (falls back to the stored setting)
    #[arg(long, global = true, env = "GEMSRACK_TEAM_ID")]
    team_id: Option<String>,

    /// Directory for the settings database
    #[arg(long, global = true, env = "GEMSRACK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format: table or json
    #[arg(long, global = true)]
    format: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the public gem catalog.
    ///
    /// Examples:
    ///   gemsrack-console gems list
    ///   gemsrack-console gems list --query pdf
    ///   gemsrack-console gems show pdf-extract
    Gems {
        #[command(subcommand)]
        action: GemsAction,
    },
    /// Show the team-wide usage summary.
    ///
    /// Examples:
    ///   gemsrack-console usage
    ///   gemsrack-console usage --days 7
    Usage {
        /// Window size in days (clamped to 1..=365)
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Cap the number of gems scanned for the ranking
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Administer gems behind the password-gated admin session.
    ///
    /// Examples:
    ///   gemsrack-console admin login
    ///   gemsrack-console admin gems --sort errors
    ///   gemsrack-console admin disable pdf-extract
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage persisted console settings.
    ///
    /// Examples:
    ///   gemsrack-console config set team_id acme
    ///   gemsrack-console config show
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Check that the configured server is reachable.
    ///
    /// Exits 0 when the health endpoint answers, 1 otherwise.
    Health,
}

#[derive(Subcommand)]
enum GemsAction {
    /// List gems, optionally narrowed by a search query.
    List {
        /// Case-insensitive match against name and summary
        #[arg(long, short)]
        query: Option<String>,
        /// Cap the number of gems returned
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one gem in full, including its prompt bodies.
    Show {
        /// Gem name
        name: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Authenticate with the admin password.
    Login {
        /// Password (prompted interactively when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// End the admin session and drop all cached data.
    Logout,
    /// Report the current session state.
    Status,
    /// The gem dashboard: every gem joined with its usage window.
    Gems {
        /// Window size in days (clamped to 1..=365)
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Enabled-state filter: all, enabled, disabled
        #[arg(long, default_value = "all")]
        filter: String,
        /// Case-insensitive match against name and summary
        #[arg(long, short)]
        query: Option<String>,
        /// Sort order: runs, errors, name
        #[arg(long, default_value = "runs")]
        sort: String,
    },
    /// Allow a gem to run.
    Enable {
        /// Gem name
        name: String,
    },
    /// Stop a gem from running.
    Disable {
        /// Gem name
        name: String,
    },
    /// Show the admin usage window with the per-day breakdown.
    Usage {
        /// Window size in days (clamped to 1..=365)
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print every stored setting.
    Show,
    /// Store a setting (team_id or base_url).
    Set { key: String, value: String },
    /// Remove a setting.
    Unset { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging. Tables go to stdout, so diagnostics default to
    // warn; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let format = OutputFormat::from_str_opt(args.format.as_deref());

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("could not determine a data directory; pass --data-dir")?
            .join("gemsrack-console"),
    };
    tracing::debug!("Data directory: {:?}", data_dir);

    let pool = db::init_database(data_dir).context("failed to initialize settings database")?;

    let settings = db::SettingsRepository::new(pool.clone());
    let base_url = commands::resolve_base_url(args.base_url.as_deref(), &settings)?;
    let team_id = commands::resolve_team_id(args.team_id.as_deref(), &settings)?;
    let team = team_id.as_deref();

    let api_service = ApiService::new(&base_url)
        .with_context(|| format!("invalid base URL: {}", base_url))?;
    let state = AppState::new(pool, api_service);

    let result = match args.command {
        Command::Gems { action } => match action {
            GemsAction::List { query, limit } => {
                commands::run_gems_list(&state, team, limit, query.as_deref().unwrap_or(""), format)
                    .await
            }
            GemsAction::Show { name } => commands::run_gems_show(&state, &name, team, format).await,
        },
        Command::Usage { days, limit } => {
            commands::run_usage(&state, team, days, limit, format).await
        }
        Command::Admin { action } => match action {
            AdminAction::Login { password } => {
                commands::run_admin_login(&state, team, password.as_deref(), format).await
            }
            AdminAction::Logout => commands::run_admin_logout(&state, format).await,
            AdminAction::Status => commands::run_admin_status(&state, format).await,
            AdminAction::Gems {
                days,
                filter,
                query,
                sort,
            } => {
                commands::run_admin_gems(
                    &state,
                    team,
                    days,
                    EnabledFilter::from_str(&filter),
                    query.as_deref().unwrap_or(""),
                    TableSort::from_str(&sort),
                    format,
                )
                .await
            }
            AdminAction::Enable { name } => {
                commands::run_admin_toggle(&state, &name, true, team, format).await
            }
            AdminAction::Disable { name } => {
                commands::run_admin_toggle(&state, &name, false, team, format).await
            }
            AdminAction::Usage { days } => {
                commands::run_admin_usage(&state, team, days, format).await
            }
        },
        Command::Config { action } => match action {
            ConfigAction::Show => commands::run_config_show(state.settings.as_ref(), format),
            ConfigAction::Set { key, value } => {
                commands::run_config_set(state.settings.as_ref(), &key, &value)
            }
            ConfigAction::Unset { key } => commands::run_config_unset(state.settings.as_ref(), &key),
        },
        Command::Health => commands::run_health(&state, format).await,
    };

    if let Err(err) = result {
        match format {
            OutputFormat::Json => {
                let resp = ErrorResponse::from(err);
                match serde_json::to_string_pretty(&resp) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("{}", resp.message),
                }
            }
            OutputFormat::Table => eprintln!("{} {}", "error:".red().bold(), err),
        }
        std::process::exit(1);
    }

    Ok(())
}
