use crate::binder::{explain, Binder};
use crate::config::{GeneratorOptions, Settings};
use crate::conventional::{load_conventional, ConventionalApi};
use crate::generator::DocumentGenerator;
use crate::host::{load_host, HostDescription};
use crate::hot_reload::watch_host;
use crate::logging::{init_logging_with_config, LogConfig, LogFormat};
use crate::paths::build_paths_for_model;
use crate::router::Router;
use crate::schema::SchemaRegistry;
use crate::swagger::Document;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use tracing::{info, warn};

/// Command-line interface for odata-swagger
#[derive(Parser, Debug)]
#[command(name = "odata-swagger")]
#[command(about = "Swagger 2.0 documentation for OData hosts", long_about = None)]
pub struct Cli {
    /// Log output format
    #[arg(long, value_enum, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Serialization of the generated document
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the merged Swagger document
    Generate {
        /// Host description file (YAML or JSON)
        #[arg(long)]
        host: PathBuf,

        /// Conventional API descriptions to merge with (YAML or JSON)
        #[arg(long)]
        conventional: Option<PathBuf>,

        /// Settings file (YAML)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Root URL the document describes
        #[arg(long, default_value = "http://localhost/")]
        root_url: String,

        /// API version to document
        #[arg(long, default_value = "v1")]
        api_version: String,

        /// Title used when the version is not in the settings file
        #[arg(long, default_value = "OData API")]
        title: String,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep navigation properties in definitions
        #[arg(long, default_value_t = false)]
        include_navigation: bool,

        /// Watch the host file and rewrite the output on change (requires --output)
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
    /// List OData path candidates and how each one resolves
    Inspect {
        /// Host description file (YAML or JSON)
        #[arg(long)]
        host: PathBuf,

        /// Only inspect the named OData route
        #[arg(long)]
        route: Option<String>,
    },
}

/// Parse the process arguments, set up logging and run.
///
/// # Errors
///
/// Any error of the executed command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = LogConfig {
        log_level: cli.log_level.clone(),
        format: cli.log_format,
        ..LogConfig::from_env()
    };
    init_logging_with_config(&config)?;
    run(cli)
}

/// Run a parsed command, writing to stdout.
///
/// # Errors
///
/// Fails when an input file cannot be loaded, generation fails, or the
/// output cannot be written.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &mut out)
}

pub(crate) fn execute(command: Commands, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            host,
            conventional,
            settings,
            root_url,
            api_version,
            title,
            format,
            output,
            include_navigation,
            watch,
        } => {
            let mut builder = GeneratorOptions::builder()
                .api_version(api_version.clone(), title)
                .with_env();
            if let Some(path) = &settings {
                builder = builder.settings(&Settings::load(path)?);
            }
            if include_navigation {
                builder = builder.include_navigation_properties(true);
            }
            let options = builder.build();

            let conventional_api = match &conventional {
                Some(path) => load_conventional(path)?,
                None => ConventionalApi::default(),
            };
            let host_description = load_host(&host)?;
            let generator = Arc::new(DocumentGenerator::new(
                options,
                host_description,
                Arc::new(conventional_api),
            ));

            let document = generator.get_document(&root_url, &api_version)?;
            let rendered = render(&document, format)?;
            match &output {
                Some(path) => write_file(path, &rendered)?,
                None => out.write_all(rendered.as_bytes())?,
            }

            if watch {
                let Some(path) = output else {
                    anyhow::bail!("--watch requires --output");
                };
                watch_and_regenerate(&host, generator, &root_url, &api_version, format, &path)?;
            }
            Ok(())
        }
        Commands::Inspect { host, route } => {
            let host = load_host(&host)?;
            inspect(&host, route.as_deref(), out)
        }
    }
}

fn render(document: &Document, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(document)?;
            s.push('\n');
            s
        }
        OutputFormat::Yaml => serde_yaml::to_string(document)?,
    })
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "Document written");
    Ok(())
}

fn watch_and_regenerate(
    host_path: &Path,
    generator: Arc<DocumentGenerator>,
    root_url: &str,
    api_version: &str,
    format: OutputFormat,
    output: &Path,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<()>();
    let _watcher = watch_host(host_path, Arc::clone(&generator), move |_| {
        tx.send(()).ok();
    })?;
    info!(host = %host_path.display(), "Watching host file for changes");

    for () in rx {
        let rendered = generator
            .get_document(root_url, api_version)
            .map_err(anyhow::Error::from)
            .and_then(|doc| render(&doc, format));
        match rendered {
            Ok(content) => write_file(output, &content)?,
            Err(e) => warn!(error = %e, "Regeneration failed; keeping previous output"),
        }
    }
    Ok(())
}

fn inspect(host: &HostDescription, only: Option<&str>, out: &mut dyn Write) -> anyhow::Result<()> {
    let router = Router::new(host);
    let mappings = crate::mapping::TypeMappings::new();
    for (index, route) in host.odata_routes() {
        if only.is_some_and(|name| name != route.name) {
            continue;
        }
        writeln!(out, "route {} (prefix '{}')", route.name, route.prefix)?;
        let mut registry = SchemaRegistry::new(&route.model, &mappings);
        let binder = Binder::new(host, &router, index, route, &mappings);
        for candidate in build_paths_for_model(&mut registry) {
            let method = candidate.method.clone();
            let template = candidate.template.clone();
            let path = route.route_path(&template);
            match binder.resolve(candidate) {
                Some(d) => writeln!(out, "  {method} {path} -> {}.{}", d.controller, d.action)?,
                None => {
                    let reason = match explain(host, route, method.clone(), &template) {
                        Err(e) => e.to_string(),
                        Ok(Some(_)) => "claimed by an earlier route".to_string(),
                        Ok(None) => "no controller action".to_string(),
                    };
                    writeln!(out, "  {method} {path} -- dropped: {reason}")?;
                }
            }
        }
    }
    Ok(())
}
