use apiref::config::ResolvedConfig;
use apiref::{ApiSpec, HtmlWriter, Renderer, generate, logging};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::eyre};
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "apiref", about = "API reference generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the API model into fragments and assemble index.html
    Build {
        /// Project directory (looks for .config/apiref.kdl here)
        #[arg()]
        path: Option<Utf8PathBuf>,

        /// Serialized API model (uses .config/apiref.kdl if not specified)
        #[arg(short, long)]
        spec: Option<Utf8PathBuf>,

        /// Staging directory for fragment files
        #[arg(long)]
        includes: Option<Utf8PathBuf>,

        /// Output directory for index.html
        #[arg(short, long)]
        build: Option<Utf8PathBuf>,

        /// Directory of templates overriding the built-in ones
        #[arg(long)]
        templates: Option<Utf8PathBuf>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// API version the model was generated from, e.g. v1.29.3
        #[arg(long)]
        spec_version: Option<String>,

        /// Only log warnings and errors
        #[arg(short, long)]
        quiet: bool,
    },
}

/// Resolved inputs for a build
struct BuildInputs {
    config: ResolvedConfig,
    spec_path: Utf8PathBuf,
}

/// Merge CLI flags over the discovered config file
#[allow(clippy::too_many_arguments)]
fn resolve_inputs(
    path: Option<Utf8PathBuf>,
    spec: Option<Utf8PathBuf>,
    includes: Option<Utf8PathBuf>,
    build: Option<Utf8PathBuf>,
    templates: Option<Utf8PathBuf>,
    title: Option<String>,
    spec_version: Option<String>,
) -> Result<BuildInputs> {
    let discovered = match &path {
        Some(project_path) => ResolvedConfig::discover_from(project_path)?,
        None => ResolvedConfig::discover()?,
    };

    let mut config = match discovered {
        Some(cfg) => cfg,
        None => {
            let (Some(title), Some(spec_version)) = (&title, &spec_version) else {
                return Err(eyre!(
                    "No .config/apiref.kdl found. Either create one or pass {} and {}",
                    "--title".yellow(),
                    "--spec-version".yellow()
                ));
            };
            let root = path.unwrap_or_else(|| Utf8PathBuf::from("."));
            ResolvedConfig::for_build_dir(title, spec_version, root.join("build"))
        }
    };

    if let Some(title) = title {
        config.title = title;
    }
    if let Some(spec_version) = spec_version {
        config.spec_version = spec_version;
    }
    if let Some(build) = build {
        config.build_dir = build;
    }
    if let Some(includes) = includes {
        config.includes_dir = includes;
    }
    if templates.is_some() {
        config.templates_dir = templates;
    }

    let spec_path = spec
        .or_else(|| config.spec_path.clone())
        .ok_or_else(|| eyre!("No API model given. Pass {} or set `spec` in the config", "--spec".yellow()))?;

    Ok(BuildInputs { config, spec_path })
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            path,
            spec,
            includes,
            build,
            templates,
            title,
            spec_version,
            quiet,
        } => {
            if quiet {
                logging::init_quiet_tracing();
            } else {
                logging::init_standard_tracing();
            }

            let inputs =
                resolve_inputs(path, spec, includes, build, templates, title, spec_version)?;
            let spec = ApiSpec::from_json_file(&inputs.spec_path)?;

            // Template problems are startup errors; nothing is written yet.
            let renderer = Renderer::with_overrides(inputs.config.templates_dir.as_deref())?;
            let mut writer = HtmlWriter::new(&inputs.config, &renderer)?;
            let summary = generate(&mut writer, &spec)?;

            println!(
                "{} {} ({} fragments)",
                "Wrote".green().bold(),
                summary.output.cyan(),
                summary.collected.len()
            );
            if !summary.missing.is_empty() {
                println!(
                    "{} {} fragment(s) missing from the assembled page",
                    "warning:".yellow().bold(),
                    summary.missing.len()
                );
            }
            if !summary.broken_anchors.is_empty() {
                println!(
                    "{} {} dangling in-page link(s)",
                    "warning:".yellow().bold(),
                    summary.broken_anchors.len()
                );
            }
        }
    }

    Ok(())
}
