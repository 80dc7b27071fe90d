use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shelf_app::modules::{
    authors::stats::AuthorStats, books::stats::BookStats, categories::stats::CategoryStats,
};
use shelf_app::{utils, Services};
use shelf_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "shelf", version, about = "Book, author, and category catalogue service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve,
    /// Print statistics for one collection as JSON
    Stats {
        #[arg(value_enum)]
        resource: ResourceKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResourceKind {
    Books,
    Authors,
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("failed to load shelf settings")?;

    match cli.command {
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry);
            shelf_app::run(settings).await
        }
        Command::Stats { resource } => print_stats(&settings, resource).await,
    }
}

async fn print_stats(settings: &Settings, resource: ResourceKind) -> anyhow::Result<()> {
    let services = Services::open(&settings.storage);

    let document = match resource {
        ResourceKind::Books => {
            let books = services.books.list_all().await;
            serde_json::to_value(BookStats::from_books(&books, utils::current_year()))?
        }
        ResourceKind::Authors => {
            let authors = services.authors.list_all().await;
            serde_json::to_value(AuthorStats::from_authors(&authors))?
        }
        ResourceKind::Categories => {
            let categories = services.categories.list_all().await;
            serde_json::to_value(CategoryStats::from_categories(&categories))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
