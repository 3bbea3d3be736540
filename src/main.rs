use clap::{Parser, Subcommand};
use seo_paths::config::{self, UrlPolicy};
use seo_paths::site::{Site, SiteError};
use seo_paths::sitemap::{SitemapRecord, build_sitemap};
use seo_paths::types::{Locale, NodeId, OutputFormat, PageParams};
use seo_paths::{UrlFactory, logging, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "seo-paths")]
#[command(about = "Readable URLs for pages and media of a content tree")]
#[command(long_about = "\
Readable URLs for pages and media of a content tree

Every node of the site contributes its display name in the requested locale
(falling back to the master locale, then to its uid), cleaned of URL-hostile
characters. Folder start pages become index files, pictures carry their
resolution, and path overrides can replace any branch of the tree.

  root/                    →  /
  ├── Products/            →  /Products/
  │   ├── Overview (start) →  /Products/index.html
  │   └── Shoes            →  /Products/Shoes.html
  └── Images/
      └── Logo [thumb]     →  /Images/Logo_thumb.jpg

Run 'seo-paths gen-config' to generate a documented settings file.")]
#[command(version)]
struct Cli {
    /// Site description (JSON)
    #[arg(long, default_value = "site.json", global = true)]
    site: PathBuf,

    /// URL settings (TOML); a missing file means stock settings
    #[arg(long, default_value = "seo-paths.toml", global = true)]
    config: PathBuf,

    /// Worker threads for the sitemap (default: all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the URL of a page
    Page {
        #[arg(long)]
        node: u64,
        #[arg(long)]
        locale: String,
        #[arg(long)]
        format: String,
        /// Zero-based page index of a multi-page node
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Suffix appended as `_<suffix>` on later pages
        #[arg(long, default_value = "")]
        suffix: String,
    },
    /// Print the URL of a media asset
    Asset {
        #[arg(long)]
        node: u64,
        #[arg(long)]
        locale: String,
        /// Picture resolution uid
        #[arg(long)]
        resolution: Option<String>,
    },
    /// Print every page and media URL of the site
    Sitemap {
        #[arg(long)]
        locale: String,
        #[arg(long)]
        format: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Validate the site and print a summary
    Check,
    /// Print a stock settings file with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Page {
            node,
            ref locale,
            ref format,
            index,
            ref suffix,
        } => {
            let site = Site::load(&cli.site)?;
            let factory = UrlFactory::with_policy(load_policy(&cli.config)?, site.overrides());
            let locale = find_locale(&site, locale)?;
            let format = find_format(&site, format)?;
            let params = PageParams::page(index, suffix);
            println!(
                "{}",
                factory.page_url(&site, NodeId(node), &format, &locale, &params)?
            );
        }
        Command::Asset {
            node,
            ref locale,
            ref resolution,
        } => {
            let site = Site::load(&cli.site)?;
            let factory = UrlFactory::with_policy(load_policy(&cli.config)?, site.overrides());
            let locale = find_locale(&site, locale)?;
            let resolution = resolution.as_deref().map(|uid| site.resolution(uid));
            println!(
                "{}",
                factory.media_url(&site, NodeId(node), &locale, resolution.as_ref())?
            );
        }
        Command::Sitemap {
            ref locale,
            ref format,
            json,
        } => {
            init_thread_pool(cli.threads);
            let site = Site::load(&cli.site)?;
            let factory = UrlFactory::with_policy(load_policy(&cli.config)?, site.overrides());
            let locale = find_locale(&site, locale)?;
            let format = find_format(&site, format)?;
            let entries = build_sitemap(&factory, &site, &locale, &format);
            if json {
                let records: Vec<SitemapRecord> = entries.iter().map(SitemapRecord::from).collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                output::print_sitemap(&entries);
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.site.display());
            let site = Site::load(&cli.site)?;
            load_policy(&cli.config)?;
            output::print_check(&site);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_policy(path: &std::path::Path) -> Result<UrlPolicy, config::ConfigError> {
    let settings = config::load_settings(path)?;
    Ok(UrlPolicy::from_settings(&settings))
}

fn find_locale(site: &Site, id: &str) -> Result<Locale, SiteError> {
    site.locale(id)
        .cloned()
        .ok_or_else(|| SiteError::UnknownLocale(id.to_string()))
}

fn find_format(site: &Site, id: &str) -> Result<OutputFormat, SiteError> {
    site.format(id)
        .cloned()
        .ok_or_else(|| SiteError::UnknownFormat(id.to_string()))
}

/// Size rayon's global pool. Capped at the number of available cores.
fn init_thread_pool(threads: Option<usize>) {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let threads = threads.map_or(cores, |t| t.clamp(1, cores));
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
