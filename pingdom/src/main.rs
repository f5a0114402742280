//! Pingdom CLI: list checks, probes, contacts, teams, maintenance windows, and integrations.

mod output;

use clap::{Parser, Subcommand, ValueEnum};
use output::{Column, OutputFormat};
use pingdom_lib::occurrences::ListOccurrenceQuery;
use pingdom_lib::{Client, ClientConfig, Params, SummaryPerformanceRequest};
use serde::Serialize;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pingdom")]
#[command(
    about = "Pingdom CLI - query uptime checks, probes, contacts, and maintenance",
    long_about = None
)]
struct Cli {
    /// Output format: plain (human-readable), json (structured).
    #[arg(short, long, default_value = "plain", value_enum)]
    output: OutputFormatArg,

    /// API base URL. Defaults to the public API, or my.pingdom.com for session logins.
    #[arg(long)]
    base_url: Option<String>,

    /// Login endpoint used for session logins.
    #[arg(long)]
    auth_url: Option<String>,

    /// Static API token.
    #[arg(long, env = "PINGDOM_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Account email for session login. The password is read from SOLARWINDS_PASSWD.
    #[arg(long, env = "SOLARWINDS_USER")]
    username: Option<String>,

    /// Organization id for session login.
    #[arg(long, env = "SOLARWINDS_ORG_ID")]
    org_id: Option<String>,

    /// Show timestamps in UTC. By default timestamps are shown in local timezone.
    #[arg(long)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List uptime checks
    Checks {
        /// Only checks carrying one of these tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Show one check
    Check { id: i64 },
    /// Response time and uptime summary for a check
    Summary {
        id: i64,
        /// Start of the interval (Unix seconds)
        #[arg(long)]
        from: Option<i64>,
        /// End of the interval (Unix seconds)
        #[arg(long)]
        to: Option<i64>,
        #[arg(long, value_parser = ["hour", "day", "week"])]
        resolution: Option<String>,
        #[arg(long)]
        include_uptime: bool,
    },
    /// List probe servers
    Probes {
        /// Only probes currently active
        #[arg(long)]
        only_active: bool,
    },
    /// List alerting contacts
    Contacts,
    /// List alerting teams
    Teams,
    /// List maintenance windows
    Maintenance,
    /// List maintenance occurrences
    Occurrences {
        #[arg(long)]
        maintenance_id: Option<i64>,
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// List alert integrations (session login)
    Integrations,
    /// Delete a check
    DeleteCheck { id: i64 },
    /// Show version
    Version,
}

const CHECK_COLUMNS: [Column; 6] = [
    Column::text("id"),
    Column::text("name"),
    Column::text("type"),
    Column::text("hostname"),
    Column::text("status"),
    Column::time("lasttesttime"),
];

const PROBE_COLUMNS: [Column; 5] = [
    Column::text("id"),
    Column::text("name"),
    Column::text("countryiso"),
    Column::text("ip"),
    Column::text("active"),
];

const CONTACT_COLUMNS: [Column; 5] = [
    Column::text("id"),
    Column::text("name"),
    Column::text("type"),
    Column::text("paused"),
    Column::text("teams"),
];

const TEAM_COLUMNS: [Column; 3] = [
    Column::text("id"),
    Column::text("name"),
    Column::text("members"),
];

const MAINTENANCE_COLUMNS: [Column; 5] = [
    Column::text("id"),
    Column::text("description"),
    Column::time("from"),
    Column::time("to"),
    Column::text("recurrencetype"),
];

const OCCURRENCE_COLUMNS: [Column; 4] = [
    Column::text("id"),
    Column::text("maintenanceid"),
    Column::time("from"),
    Column::time("to"),
];

const INTEGRATION_COLUMNS: [Column; 4] = [
    Column::text("number"),
    Column::text("provider_name"),
    Column::text("active"),
    Column::time("activated_at"),
];

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("PINGDOM_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if matches!(cli.command, Commands::Version) {
        println!("pingdom {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let format = match cli.output {
        OutputFormatArg::Plain => OutputFormat::Plain,
        OutputFormatArg::Json => OutputFormat::Json,
    };
    let printer = Printer {
        format,
        use_utc: cli.utc,
    };

    let client = match Client::new(client_config(&cli)).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command, &printer).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::new();
    if let Some(token) = &cli.api_token {
        config = config.with_api_token(token);
    }
    config.username = cli.username.clone();
    config.org_id = cli.org_id.clone();
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url);
    }
    if let Some(url) = &cli.auth_url {
        config = config.with_auth_url(url);
    }
    config
}

struct Printer {
    format: OutputFormat,
    use_utc: bool,
}

impl Printer {
    fn table<T: Serialize>(&self, rows: &T, columns: &[Column]) -> Result<(), String> {
        let value = serde_json::to_value(rows).map_err(|e| e.to_string())?;
        match self.format {
            OutputFormat::Plain => {
                print!("{}", output::format_table(&value, columns, self.use_utc))
            }
            OutputFormat::Json => self.json(&value)?,
        }
        Ok(())
    }

    fn value<T: Serialize>(&self, item: &T) -> Result<(), String> {
        let value = serde_json::to_value(item).map_err(|e| e.to_string())?;
        match self.format {
            OutputFormat::Plain => print!("{}", output::format_plain(&value)),
            OutputFormat::Json => self.json(&value)?,
        }
        Ok(())
    }

    fn json(&self, value: &serde_json::Value) -> Result<(), String> {
        let s = output::format_json(value).map_err(|e| e.to_string())?;
        println!("{}", s);
        Ok(())
    }
}

async fn run(client: &Client, cmd: Commands, printer: &Printer) -> Result<(), String> {
    match cmd {
        Commands::Checks {
            tags,
            limit,
            offset,
        } => {
            let mut params = Params::new();
            if let Some(tags) = tags {
                params.insert("tags".to_string(), tags);
            }
            if let Some(limit) = limit {
                params.insert("limit".to_string(), limit.to_string());
            }
            if let Some(offset) = offset {
                params.insert("offset".to_string(), offset.to_string());
            }
            let checks = client
                .checks()
                .list(Some(&params))
                .await
                .map_err(|e| e.to_string())?;
            let mut rows = serde_json::to_value(&checks).map_err(|e| e.to_string())?;
            flatten_check_types(&mut rows);
            printer.table(&rows, &CHECK_COLUMNS)?;
        }
        Commands::Check { id } => {
            let check = client.checks().read(id).await.map_err(|e| e.to_string())?;
            printer.value(&check)?;
        }
        Commands::Summary {
            id,
            from,
            to,
            resolution,
            include_uptime,
        } => {
            let request = SummaryPerformanceRequest {
                id,
                from,
                to,
                resolution: resolution.unwrap_or_default(),
                include_uptime,
                ..SummaryPerformanceRequest::default()
            };
            let summary = client
                .checks()
                .summary_performance(&request)
                .await
                .map_err(|e| e.to_string())?;
            printer.value(&summary)?;
        }
        Commands::Probes { only_active } => {
            let mut params = Params::new();
            if only_active {
                params.insert("onlyactive".to_string(), "true".to_string());
            }
            let probes = client
                .probes()
                .list(Some(&params))
                .await
                .map_err(|e| e.to_string())?;
            printer.table(&probes, &PROBE_COLUMNS)?;
        }
        Commands::Contacts => {
            let contacts = client.contacts().list().await.map_err(|e| e.to_string())?;
            // Contact serializes as a write payload, without its read-only fields.
            let rows: Vec<serde_json::Value> = contacts
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "id": c.id,
                        "name": c.name,
                        "type": c.contact_type,
                        "paused": c.paused,
                        "teams": c.teams.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            printer.table(&rows, &CONTACT_COLUMNS)?;
        }
        Commands::Teams => {
            let teams = client.teams().list().await.map_err(|e| e.to_string())?;
            printer.table(&teams, &TEAM_COLUMNS)?;
        }
        Commands::Maintenance => {
            let windows = client
                .maintenance()
                .list(None)
                .await
                .map_err(|e| e.to_string())?;
            printer.table(&windows, &MAINTENANCE_COLUMNS)?;
        }
        Commands::Occurrences {
            maintenance_id,
            from,
            to,
        } => {
            let query = ListOccurrenceQuery {
                from,
                to,
                maintenance_id,
            };
            let occurrences = client
                .occurrences()
                .list(&query)
                .await
                .map_err(|e| e.to_string())?;
            printer.table(&occurrences, &OCCURRENCE_COLUMNS)?;
        }
        Commands::Integrations => {
            let integrations = client
                .integrations()
                .list()
                .await
                .map_err(|e| e.to_string())?;
            printer.table(&integrations, &INTEGRATION_COLUMNS)?;
        }
        Commands::DeleteCheck { id } => {
            let res = client
                .checks()
                .delete(id)
                .await
                .map_err(|e| e.to_string())?;
            println!("{}", res.message);
        }
        Commands::Version => {}
    }
    Ok(())
}

/// Replace each check's serialized `type` object by its name for table display.
fn flatten_check_types(rows: &mut serde_json::Value) {
    if let Some(rows) = rows.as_array_mut() {
        for row in rows {
            let name = row
                .pointer("/type/name")
                .and_then(|n| n.as_str())
                .map(str::to_string);
            if let (Some(name), Some(obj)) = (name, row.as_object_mut()) {
                obj.insert("type".to_string(), serde_json::Value::String(name));
            }
        }
    }
}
