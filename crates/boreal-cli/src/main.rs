use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use boreal_cli::{Command, Config, OutputFormat};
use boreal_client::DataverseClient;
use boreal_core::{
    CreateDataset, DatasetDetail, DatasetService, DbConfig, FacetQuery, HarvestConfig,
    HarvestService, ImportConfig, ImportCounts, ImportReport, SystemClock, TracingReporter,
    load_facet_catalog,
};
use boreal_db::{DatasetRepository, apply_schema};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Logs go to stderr so stdout carries results only
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default tracing subscriber")?;

    let config = Config::parse();

    info!("Connecting to database...");
    let db_config = DbConfig::default();
    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = DatasetRepository::new(pool.clone());

    match config.command {
        Command::Import {
            query,
            per_page,
            catalog_url,
            format,
        } => {
            let import_config = ImportConfig::default()
                .with_catalog_url(catalog_url)
                .with_page_size(per_page);
            let client = DataverseClient::new(&import_config.catalog_url)
                .context("Invalid catalog URL")?;
            let harvest_service =
                HarvestService::with_config(repo, client, SystemClock, import_config);
            import(&harvest_service, &query, format).await?;
        }
        Command::Datasets {
            facets,
            facets_config,
            format,
        } => {
            let catalog = load_facet_catalog(facets_config)?;
            let service = DatasetService::new(repo, catalog);
            list_datasets(&service, &FacetQuery::from(facets), format).await?;
        }
        Command::Show { id, format } => {
            let service = DatasetService::new(repo, Default::default());
            show_dataset(&service, id, format).await?;
        }
        Command::Create {
            name,
            identifier,
            url,
            description,
            keywords,
            subjects,
            authors,
        } => {
            let service = DatasetService::new(repo, Default::default());
            let detail = service
                .create_unique(CreateDataset {
                    name,
                    identifier,
                    url,
                    description,
                    keywords,
                    subjects,
                    authors,
                })
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Created dataset {} ({})", detail.dataset.name, detail.dataset.id);
        }
        Command::Delete { id } => {
            let service = DatasetService::new(repo, Default::default());
            service
                .delete(id)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Deleted dataset {}", id);
        }
        Command::Stats => {
            let service = DatasetService::new(repo, Default::default());
            let counts = service.stats().await?;
            print!("{}", format_counts(&counts));
        }
        Command::Configs => {
            let service = DatasetService::new(repo, Default::default());
            let configs = service.harvest_configs().await?;
            print_harvest_configs(&configs);
        }
        Command::Migrate => {
            apply_schema(&pool)
                .await
                .context("Failed to apply database schema")?;
            println!("Database schema is up to date");
        }
    }

    Ok(())
}

async fn import(
    harvest_service: &HarvestService<DatasetRepository, DataverseClient, SystemClock>,
    query: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = harvest_service
        .import_all_with_progress(query, &TracingReporter)
        .await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", format_import_report(&report)),
    }

    if let Some(err) = &report.fetch_error {
        anyhow::bail!("Catalog request failed: {}", err);
    }
    Ok(())
}

async fn list_datasets(
    service: &DatasetService<DatasetRepository>,
    query: &FacetQuery,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let details = service.filter(query).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
        OutputFormat::Text => {
            if details.is_empty() {
                println!("No datasets match these filters.");
                return Ok(());
            }
            println!("Found {} datasets:\n", details.len());
            for (i, detail) in details.iter().enumerate() {
                print!("{}", format_dataset_summary(i + 1, detail));
            }
        }
    }

    Ok(())
}

async fn show_dataset(
    service: &DatasetService<DatasetRepository>,
    id: Uuid,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let detail = service
        .get(id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&detail)?),
        OutputFormat::Text => {
            print!("{}", format_dataset_summary(1, &detail));
            for contact in &detail.contacts {
                match &contact.affiliation {
                    Some(aff) if !aff.is_empty() => {
                        println!("   contact: {} ({})", contact.name, aff)
                    }
                    _ => println!("   contact: {}", contact.name),
                }
            }
            for publication in &detail.publications {
                println!("   publication: {}", truncate_text(&publication.citation, 120));
            }
        }
    }

    Ok(())
}

fn format_import_report(report: &ImportReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Import complete: \"{}\"\n", report.query));
    out.push_str(&format!("  Fetched:   {}\n", report.fetched));
    out.push_str(&format!("  Imported:  {}\n", report.imported_count()));
    out.push_str(&format!("  Failed:    {}\n", report.failed_count()));

    if let Some(err) = &report.fetch_error {
        out.push_str(&format!("  Fetch error: {}\n", err));
    }
    for failure in &report.failures {
        out.push_str(&format!(
            "  - #{} {}: {}\n",
            failure.index, failure.name, failure.error
        ));
    }
    if let Some(totals) = &report.totals {
        out.push_str(&format_counts(totals));
    }
    out
}

fn format_counts(counts: &ImportCounts) -> String {
    format!(
        "  Datasets:      {}\n  Contacts:      {}\n  Publications:  {}\n  Date records:  {}\n",
        counts.datasets, counts.contacts, counts.publications, counts.date_infos
    )
}

fn format_dataset_summary(position: usize, detail: &DatasetDetail) -> String {
    let dataset = &detail.dataset;
    let mut out = format!("{}. {}\n   id: {}\n", position, dataset.name, dataset.id);
    if !dataset.url.is_empty() {
        out.push_str(&format!("   url: {}\n", dataset.url));
    }
    if let Some(published) = detail.published_at() {
        out.push_str(&format!("   published: {}\n", published.format("%Y-%m-%d")));
    }
    if let Some(desc) = dataset.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("   {}\n", truncate_text(desc, 120)));
    }
    out
}

fn print_harvest_configs(configs: &[HarvestConfig]) {
    if configs.is_empty() {
        println!("No harvest configurations.");
        return;
    }
    for config in configs {
        let state = if config.active { "active" } else { "inactive" };
        println!(
            "{}  {}  {}  [{}]  filters: {}",
            config.id,
            config.source_url,
            config.frequency,
            state,
            config.filters.as_deref().unwrap_or("-")
        );
    }
}

fn truncate_text(text: &str, max_len: usize) -> String {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.chars().count() <= max_len {
        cleaned
    } else {
        let truncated: String = cleaned.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}
