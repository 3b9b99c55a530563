//! Inkpress CLI entrypoint.

use anyhow::Context;
use clap::Parser;
use inkpress_cache::FileCache;
use inkpress_core::{AppConfig, PostStatus};
use inkpress_gen::{ArticleGenerator, GenerateRequest, LinkFetcher, LlmClient, LlmConfig};
use inkpress_wp::{PublishRequest, WpClient, WpConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(author, version, about = "Article generator and WordPress publisher", long_about = None)]
struct Cli {
    /// Article topic or headline.
    #[arg(long)]
    prompt: Option<String>,

    /// Manual list of reference URLs.
    #[arg(long, num_args = 0..)]
    links: Option<Vec<String>>,

    /// Fetch top reference URLs from the search API.
    #[arg(long)]
    fetch_links: bool,

    /// Max number of links to fetch (with --fetch-links).
    #[arg(long)]
    max_links: Option<usize>,

    /// Output file path.
    #[arg(long, default_value = "article.md")]
    output: PathBuf,

    /// Override the scaffold model.
    #[arg(long)]
    scaffold_model: Option<String>,

    /// Override the hydrate model.
    #[arg(long)]
    hydrate_model: Option<String>,

    /// Publish the article to WordPress.
    #[arg(long)]
    publish: bool,

    /// Verify WordPress credentials/connectivity and exit.
    #[arg(long)]
    check_wp: bool,

    /// Publish status when --publish is used.
    #[arg(long, default_value = "draft")]
    status: PostStatus,

    /// WordPress category IDs.
    #[arg(long, num_args = 0..)]
    categories: Vec<u64>,

    /// WordPress category names (resolved or created remotely).
    #[arg(long, num_args = 0..)]
    category_names: Vec<String>,

    /// WordPress tag IDs.
    #[arg(long, num_args = 0..)]
    tags: Vec<u64>,

    /// WordPress tag names (resolved or created remotely).
    #[arg(long, num_args = 0..)]
    tag_names: Vec<String>,

    /// Featured image URL or local path.
    #[arg(long)]
    featured_image: Option<String>,

    /// Run without calling external services (LLM/search/WordPress).
    #[arg(long)]
    dry_run: bool,

    /// Directory for the durable fingerprint cache.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Clear the in-process generation memos before running.
    #[arg(long)]
    clear_cache: bool,

    /// Disable the durable cache for scaffold/hydrate.
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    config.dry_run |= cli.dry_run;
    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(model) = &cli.scaffold_model {
        config.scaffold_model = model.clone();
    }
    if let Some(model) = &cli.hydrate_model {
        config.hydrate_model = model.clone();
    }

    if cli.check_wp {
        let client = WpClient::new(WpConfig::from(&config));
        let status = client.check_connection().await;
        println!("{}", serde_json::to_string_pretty(&status)?);
        if !status.ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let prompt = cli
        .prompt
        .clone()
        .context("--prompt is required unless --check-wp is provided")?;

    let links = match &cli.links {
        Some(links) => Some(links.clone()),
        None if cli.fetch_links => {
            let fetcher = LinkFetcher::new(&config)?;
            let max_links = cli.max_links.unwrap_or(config.max_links);
            Some(fetcher.fetch_links(&prompt, max_links).await?)
        }
        None => None,
    };

    let llm = LlmClient::new(LlmConfig::from(&config))?;
    let generator = ArticleGenerator::new(llm, FileCache::new(&config.cache_dir));
    if cli.clear_cache {
        generator.clear_memos();
        info!("cleared generation memos");
    }
    let article = generator
        .generate(&GenerateRequest {
            prompt: prompt.clone(),
            links,
            scaffold_model: config.scaffold_model.clone(),
            hydrate_model: config.hydrate_model.clone(),
            use_cache: !cli.no_cache,
        })
        .await?;

    if cli.publish {
        let client = WpClient::new(WpConfig::from(&config));
        let result = client
            .publish(&PublishRequest {
                title: prompt,
                content_html: article.clone(),
                status: cli.status,
                categories: cli.categories.clone(),
                category_names: cli.category_names.clone(),
                tags: cli.tags.clone(),
                tag_names: cli.tag_names.clone(),
                featured_image: cli.featured_image.clone(),
            })
            .await?;
        println!(
            "Published to WordPress with ID {} ({})",
            result.id, result.preview_link
        );
    }

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&cli.output, &article).await?;
    info!(path = %cli.output.display(), "wrote article");

    Ok(())
}
