use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderValue, HOST};
use serde::Serialize;
use url::Url;

use darbi_gateway::bootstrap::{ClientSession, SessionSnapshot};
use darbi_gateway::config::{load_config, ConfigError};
use darbi_gateway::http::X_APP_TYPE;
use darbi_gateway::routing::{is_subdomain_mode, resolve_server_app_type, RoutingContext, ServerApp};

#[derive(Parser)]
#[command(name = "darbi-cli")]
#[command(about = "Inspect how the Darbi gateway picks an application", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a host and path the way the server and the client would
    Resolve {
        #[arg(long)]
        host: String,

        #[arg(long, default_value = "/")]
        path: String,

        #[arg(long, default_value = "https://darbi.co")]
        canonical_root: Url,
    },
    /// Ask a running gateway which application it chose
    Probe {
        #[arg(short, long, default_value = "http://localhost:8080/health")]
        url: String,

        /// Host header to send instead of the URL's host
        #[arg(long)]
        host: Option<String>,
    },
    /// Validate a configuration file
    CheckConfig { path: PathBuf },
}

#[derive(Serialize)]
struct ResolveReport {
    host: String,
    path: String,
    server: ServerApp,
    subdomain_mode: bool,
    client: SessionSnapshot,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            host,
            path,
            canonical_root,
        } => {
            let session = ClientSession::load(&RoutingContext::new(&host, &path), &canonical_root);
            let report = ResolveReport {
                server: resolve_server_app_type(&host),
                subdomain_mode: is_subdomain_mode(&host),
                client: session.snapshot(),
                host,
                path,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Probe { url, host } => {
            let client = reqwest::Client::new();
            let mut request = client.get(&url);
            if let Some(host) = host {
                request = request.header(HOST, HeaderValue::from_str(&host)?);
            }
            let res = request.send().await?;
            if !print_app_type(res) {
                std::process::exit(1);
            }
        }
        Commands::CheckConfig { path } => match load_config(&path) {
            Ok(_) => println!("{}: ok", path.display()),
            Err(ConfigError::Validation(errors)) => {
                eprintln!("{}: {} problem(s)", path.display(), errors.len());
                for err in errors {
                    eprintln!("  - {}", err);
                }
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Print the application the gateway chose. Returns false when the
/// response carries no usable `X-App-Type`.
fn print_app_type(res: reqwest::Response) -> bool {
    let status = res.status();
    let app_type = res
        .headers()
        .get(X_APP_TYPE.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match app_type {
        Some(value) => match value.parse::<ServerApp>() {
            Ok(app) => {
                println!("{} {}", status, app);
                true
            }
            Err(e) => {
                eprintln!("{} {}", status, e);
                false
            }
        },
        None => {
            eprintln!("Error: response ({}) has no {} header", status, X_APP_TYPE);
            false
        }
    }
}
