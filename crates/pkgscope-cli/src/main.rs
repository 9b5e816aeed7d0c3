use clap::Parser;
use pkgscope_core::{providers, Config};
use pkgscope_mcp::McpServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pkgscope")]
#[command(version, about = "Package intelligence for the npm ecosystem", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the MCP server on stdio
    Serve,
    /// Research a single package in depth
    Research {
        /// Package name
        package: String,
        /// Version currently in use, for update comparison
        #[arg(long)]
        current_version: Option<String>,
    },
    /// Compare 2-5 packages side-by-side
    Compare {
        /// Package names
        packages: Vec<String>,
    },
    /// Check a package for known security advisories
    Security {
        /// Package name
        package: String,
        /// Specific version to check
        #[arg(long)]
        version: Option<String>,
    },
    /// Rank a curated category's packages by current demand
    Trending {
        /// Category name (e.g. state-management, testing, validation)
        category: String,
        /// Framework context (react, vue, svelte, node)
        #[arg(long)]
        framework: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr; stdout belongs to the protocol (and to the
    // JSON the one-shot commands print).
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pkgscope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if config.github.token.is_none() {
        config.github.token = std::env::var("GITHUB_TOKEN").ok();
    }
    let sources = providers::live_sources(&config);

    match cli.command {
        Commands::Serve => {
            McpServer::new(sources).run().await?;
        }
        Commands::Research {
            package,
            current_version,
        } => {
            let report =
                pkgscope_core::research::research_package(&sources, &package, current_version.as_deref())
                    .await?;
            print_json(&report)?;
        }
        Commands::Compare { packages } => {
            let comparison = pkgscope_core::compare::compare_packages(&sources, &packages).await?;
            print_json(&comparison)?;
        }
        Commands::Security { package, version } => {
            let audit =
                pkgscope_core::security::check_security(&sources, &package, version.as_deref())
                    .await?;
            print_json(&audit)?;
        }
        Commands::Trending {
            category,
            framework,
        } => {
            let report =
                pkgscope_core::trending::get_trending(&sources, &category, framework.as_deref())
                    .await?;
            print_json(&report)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
