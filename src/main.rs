use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use raspian_rs::raspian::config::{mcp_path, Config, ServerConfig};
use raspian_rs::raspian::registry::Dispatch;
use raspian_rs::raspian::server::create_server;
use raspian_rs::raspian::tools::blogpost::BLOGPOST_TOOL;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the tools over HTTP (REST and MCP)
    Serve {
        /// Listen host (overrides MCP_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides MCP_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// MCP endpoint path (overrides MCP_PATH)
        #[arg(long)]
        path: Option<String>,
    },
    /// Invoke a tool once and print the result
    Invoke {
        /// The topic to write about
        #[arg(short, long)]
        topic: String,

        /// The tool to invoke
        #[arg(long, default_value = BLOGPOST_TOOL)]
        tool: String,
    },
    /// Print the descriptors of every registered tool
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let log_level = ServerConfig::from_env()
        .map(|server| server.log_level)
        .unwrap_or_else(|_| ServerConfig::default().log_level);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let args = Args::parse();

    let mut config = Config::from_env().map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    let client = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;

    match args.command {
        Commands::Serve { host, port, path } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(path) = path {
                config.server.path = mcp_path("--path", &path)?;
            }

            let server = create_server(&config, client);
            server
                .serve(&config.server)
                .await
                .with_context(|| format!("server on {} failed", config.server.bind_address()))?;
        }
        Commands::Invoke { topic, tool } => {
            let server = create_server(&config, client);
            let dispatch = server
                .registry()
                .dispatch(&tool, json!({ "topic": topic }))
                .await;

            if let Dispatch::NotFound { tool, .. } = &dispatch {
                log::error!("No tool named '{}'", tool);
            }
            let result = dispatch.into_result();
            println!("{}", serde_json::to_string_pretty(&result)?);

            if !result.is_success() {
                anyhow::bail!("{}", result.description);
            }
        }
        Commands::Tools => {
            let server = create_server(&config, client);
            let descriptors = server.registry().descriptors();
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
        }
    }

    Ok(())
}
