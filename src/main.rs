use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use redcrumbs::{config, logging};
use serde_json::json;
use time::format_description::well_known::Rfc3339;

#[derive(Parser)]
#[command(
    name = "redcrumbs",
    about = "Inspect the redcrumbs configuration loaded from the environment"
)]
struct Cli {
    /// Connection descriptor overriding `REDCRUMBS_CONNECTION`.
    #[arg(long, global = true)]
    connection: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved settings.
    Show,
    /// Print the storage key for a logical resource name.
    Key { name: String },
    /// Print the record class used for new crumbs.
    CrumbClass,
    /// Check that the configured Redis server answers.
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    config::init_config_with_connection(cli.connection.as_deref())
        .context("failed to load configuration")?;

    let output = match cli.command {
        Command::Show => {
            let config = config::get_config();
            let now = time::OffsetDateTime::now_utc();
            let expires_at = config
                .expires_at(now)
                .map(|at| at.format(&Rfc3339))
                .transpose()
                .context("failed to format expiry")?;
            json!({
                "settings": config.summary(),
                "crumb_expires_if_created_now": expires_at,
            })
        }
        Command::Key { name } => {
            let key = config::get_config()
                .storage_key(&name)
                .context("no adapter registered; set REDCRUMBS_CONNECTION or --connection")?;
            json!({ "name": name, "key": key })
        }
        Command::CrumbClass => {
            let config = config::get_config();
            let class = config.crumb_class().context("failed to resolve crumb class")?;
            json!(class)
        }
        Command::Ping => {
            let connection = config::get_config()
                .connection()
                .context("no connection configured")?
                .clone();
            let reply = connection
                .ping()
                .await
                .with_context(|| format!("redis in namespace {} did not answer", connection.namespace()))?;
            tracing::info!(namespace = %connection.namespace(), "Redis reachable");
            json!({ "namespace": connection.namespace(), "reply": reply })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
