//! Load pages and print the ordered list.

use anyhow::{Context, Result};
use clap::Args;
use pagesync_client::{
    ClientConfig, ClientError, Controller, FeedSnapshot, FetchOutcome, HttpFetcher, PageFetcher,
};
use pagesync_types::{ItemId, OrderPreset, OrderSpec};
use serde_json::Value;
use std::fmt::Write;
use tracing::warn;

use crate::sample;

/// Arguments of the `list` command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Sort key with optional direction, e.g. `rating:desc`
    #[arg(long, conflicts_with = "preset")]
    pub order: Option<OrderSpec>,

    /// Named ordering: newest, oldest, best or worst
    #[arg(long)]
    pub preset: Option<OrderPreset>,

    /// Maximum number of pages to load
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Items per page (overrides the config file)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Page endpoint URL (overrides the config file)
    #[arg(long)]
    pub url: Option<String>,

    /// Use built-in sample data instead of an HTTP endpoint
    #[arg(long)]
    pub mock: bool,

    /// Remove an item locally after loading (repeatable)
    #[arg(long = "delete", value_name = "ID")]
    pub delete: Vec<ItemId>,
}

impl ListArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(order) = &self.order {
            config = config.with_order(order.clone());
        }
        if let Some(preset) = self.preset {
            config = config.with_order(preset.spec());
        }
        if let Some(url) = &self.url {
            config = config.with_url(url);
        }
        match self.limit {
            Some(limit) => config.with_limit(limit),
            None if self.mock => config.with_limit(sample::PAGE_SIZE),
            None => config,
        }
    }
}

/// Run the list command.
pub async fn run(config: ClientConfig, args: ListArgs) -> Result<()> {
    let config = args.apply(config);
    config.validate().context("Invalid configuration")?;

    let output = if args.mock {
        let fetcher = sample::fetcher(&config.paging.order, config.page_limit()?);
        let controller = Controller::from_config(fetcher, &config)?;
        browse(&controller, &args).await?
    } else {
        let fetcher = HttpFetcher::from_config(&config).context("Failed to create HTTP client")?;
        let controller = Controller::from_config(fetcher, &config)?;
        browse(&controller, &args).await?
    };

    print!("{}", output.text);
    if let Some(error) = output.error {
        anyhow::bail!("Fetch failed: {error}");
    }
    Ok(())
}

/// Rendered result of a browse.
struct Output {
    text: String,
    error: Option<String>,
}

/// Load pages, apply deletes and render the final view.
async fn browse<F: PageFetcher>(controller: &Controller<F>, args: &ListArgs) -> Result<Output> {
    let pages = load_pages(controller, args.pages).await?;

    for id in &args.delete {
        if !controller.delete(id) {
            warn!(%id, "delete ignored, item not in list");
        }
    }

    let snapshot = controller.snapshot();
    Ok(Output {
        text: render(&snapshot, pages),
        error: snapshot.error,
    })
}

/// Load up to `max` pages. Returns how many were applied.
///
/// A failed fetch ends loading early; the failure stays on the controller.
async fn load_pages<F: PageFetcher>(controller: &Controller<F>, max: u32) -> Result<u32> {
    let mut loaded = 0;
    for n in 0..max {
        let outcome = if n == 0 {
            controller.start().await
        } else {
            controller.load_more().await
        };
        match outcome {
            Ok(FetchOutcome::Applied { .. }) => loaded += 1,
            Ok(FetchOutcome::Skipped) => break,
            Err(ClientError::Fetch(_)) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(loaded)
}

/// Format the view as a table plus a status line.
fn render(snapshot: &FeedSnapshot, pages: u32) -> String {
    let key = snapshot.order.key.as_str();
    let mut out = String::new();

    let _ = writeln!(out, "{:>6}  {:>24}  title", "id", key);
    for item in &snapshot.view {
        let value = item.field(key).map(display_value).unwrap_or_default();
        let title = item
            .field("title")
            .map(display_value)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "{:>6}  {:>24}  {}", item.id.to_string(), value, title);
    }

    let more = if snapshot.can_load_more {
        "more available"
    } else if snapshot.error.is_some() {
        "load-more disabled"
    } else {
        "end of list"
    };
    let _ = writeln!(
        out,
        "\n{} item(s), {} page(s), order {}, {}",
        snapshot.view.len(),
        pages,
        snapshot.order,
        more
    );
    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "error: {error}");
    }
    out
}

/// Strings print bare, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
