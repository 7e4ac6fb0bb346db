use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booklist::client::{shell, ClientConfig, MutationOutcome, Tab};
use booklist::config;
use booklist::openlibrary::{BookSearch, OpenLibraryClient};
use booklist::server;

#[derive(Parser)]
#[command(name = "booklist", version, about = "Personal book catalog")]
struct Cli {
    /// Backend base URL (defaults to BOOKLIST_API_URL or http://localhost:8000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the catalog API
    Serve,
    /// Print the catalog
    List,
    /// Search Open Library
    Search { query: Vec<String> },
    /// Search and file the n-th result
    Add {
        query: Vec<String>,
        #[arg(long, default_value_t = 1)]
        pick: usize,
        #[arg(long, env = "BOOKLIST_PASSCODE", hide_env_values = true)]
        passcode: String,
    },
    /// Remove a catalog entry by id
    Remove {
        id: String,
        #[arg(long, env = "BOOKLIST_PASSCODE", hide_env_values = true)]
        passcode: String,
    },
    /// Interactive session on stdin
    Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booklist=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client_config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        client_config = client_config.with_api_url(api_url);
    }

    if let Err(e) = run(cli.command, client_config).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, client_config: ClientConfig) -> Result<(), String> {
    match command {
        Command::Serve => server::serve(config::Config::from_env()).await,
        Command::List => {
            let tab = Tab::from_config(&client_config);
            tab.catalog.mount().await;
            print!("{}", tab.catalog.render());
            Ok(())
        }
        Command::Search { query } => {
            let search = OpenLibraryClient::new(client_config.openlibrary_url.clone());
            let results = search
                .search(&query.join(" "), client_config.max_results)
                .await
                .map_err(|e| e.to_string())?;
            for (index, result) in results.iter().enumerate() {
                println!(
                    "{:>2}. {} by {} [{}]",
                    index + 1,
                    result.title,
                    result.primary_author().unwrap_or("Unknown author"),
                    result.key
                );
            }
            Ok(())
        }
        Command::Add {
            query,
            pick,
            passcode,
        } => {
            let tab = Tab::from_config(&client_config);
            unlock(&tab, &passcode).await?;

            let search = OpenLibraryClient::new(client_config.openlibrary_url.clone());
            let results = search
                .search(&query.join(" "), client_config.max_results)
                .await
                .map_err(|e| e.to_string())?;
            let result = pick
                .checked_sub(1)
                .and_then(|i| results.get(i))
                .ok_or_else(|| format!("No result #{} for that query", pick))?;

            match tab.add.file(result).await {
                MutationOutcome::Applied => {
                    println!("FILED {}", result.title);
                    Ok(())
                }
                _ => Err(tab
                    .add
                    .notice()
                    .current()
                    .unwrap_or_else(|| "Failed to catalog entry.".to_string())),
            }
        }
        Command::Remove { id, passcode } => {
            let tab = Tab::from_config(&client_config);
            unlock(&tab, &passcode).await?;
            tab.catalog.mount().await;

            match tab.catalog.delete(&id).await {
                MutationOutcome::Applied => {
                    print!("{}", tab.catalog.render());
                    Ok(())
                }
                _ => Err(tab
                    .catalog
                    .notice()
                    .current()
                    .unwrap_or_else(|| "Failed to remove entry.".to_string())),
            }
        }
        Command::Shell => {
            let tab = Tab::from_config(&client_config);
            shell::run(&tab, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await
                .map_err(|e| e.to_string())
        }
    }
}

async fn unlock(tab: &Tab, passcode: &str) -> Result<(), String> {
    if tab.add.authenticate(passcode).await {
        Ok(())
    } else {
        Err(tab
            .add
            .auth_error()
            .unwrap_or_else(|| "Access denied.".to_string()))
    }
}
