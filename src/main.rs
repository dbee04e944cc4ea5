use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::{Config, Layer},
    markdown::Converter,
    server::StaticServer,
    site::SiteBuilder,
    templates::{Templates, ROOT_TEMPLATE},
};

mod assets;
mod config;
mod error;
mod functions;
mod markdown;
mod page;
mod server;
mod site;
mod templates;

#[derive(Parser, Debug)]
#[command(name = "mdsite")]
#[command(author, version, about = "Builds a Markdown site and serves it", long_about = None)]
struct Args {
    /// Content directory [default: content]
    #[arg(long)]
    content: Option<PathBuf>,

    /// Templates directory [default: templates]
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Static assets directory [default: static]
    #[arg(long = "static")]
    static_dir: Option<PathBuf>,

    /// Output directory [default: public]
    #[arg(long)]
    out: Option<PathBuf>,

    /// Host to bind to [default: 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on [default: 8080]
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not list directories without an index.html
    #[arg(long)]
    no_listing: bool,

    /// Build the site and exit
    #[arg(long)]
    no_serve: bool,

    /// TOML file with the same keys as the flags above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn layer(&self) -> Layer {
        Layer {
            content: self.content.clone(),
            templates: self.templates.clone(),
            static_dir: self.static_dir.clone(),
            out: self.out.clone(),
            host: self.host.clone(),
            port: self.port,
            listing: self.no_listing.then_some(false),
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    tracing::debug!("running with {args:?}");

    let mut layer = args.layer();
    if let Some(path) = &args.config {
        layer = layer.or(Layer::from_file(path)?);
    }
    let config = Config::from(layer);

    let converter = Converter::new();
    let templates = Templates::load(&config.paths.templates, ROOT_TEMPLATE, converter)?;

    let report = SiteBuilder::new(config.paths.clone(), templates, converter).build()?;

    if args.no_serve {
        if !report.is_clean() {
            let paths = report
                .failures
                .iter()
                .map(|f| f.path.display().to_string())
                .collect::<Vec<_>>();
            anyhow::bail!("documents failed to build: {}", paths.join(", "));
        }
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(StaticServer::new(config.server).run())?;

    Ok(())
}
