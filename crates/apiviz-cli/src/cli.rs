//! Command-line interface for the apiviz utility
//!
//! Loads a documentation model and turns it into Graphviz diagrams.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::graphviz::DotRunner;
use apiviz::core::logging::init_logging;
use apiviz::plugins::{DiagramJob, GraphvizRenderer, Orchestrator};
use apiviz::{DiagramError, DocModel, DocumentationSource, FontConfig, RenderConfig};

/// APIviz - Class and package diagrams from API documentation
#[derive(Parser)]
#[command(name = "apiviz")]
#[command(about = "Generate UML-like class and package diagrams from an API documentation model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render every diagram of a model to PNG (and image map) files
    Generate {
        /// Documentation model in JSON (use - for stdin)
        #[arg(short, long)]
        model: PathBuf,

        /// Directory receiving the rendered files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Graphviz `dot` binary (defaults to $APIVIZ_DOT, then `dot`)
        #[arg(long)]
        dot: Option<PathBuf>,

        /// Skip the client-side image map
        #[arg(long)]
        no_map: bool,

        /// Font family for labels
        #[arg(long)]
        font: Option<String>,

        /// Font family for abstract class names
        #[arg(long)]
        italic_font: Option<String>,
    },

    /// Print the DOT text of one diagram
    Emit {
        /// Documentation model in JSON (use - for stdin)
        #[arg(short, long)]
        model: PathBuf,

        /// Summary diagram of this package
        #[arg(short, long, conflicts_with = "class")]
        package: Option<String>,

        /// Diagram of this class (qualified name)
        #[arg(short, long)]
        class: Option<String>,

        /// Output file for the DOT text (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Font family for labels
        #[arg(long)]
        font: Option<String>,

        /// Font family for abstract class names
        #[arg(long)]
        italic_font: Option<String>,
    },

    /// Build every diagram without rendering and report failures
    Validate {
        /// Documentation model in JSON (use - for stdin)
        #[arg(short, long)]
        model: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// One line of the validate report
#[derive(Debug, Serialize)]
struct DiagramStatus {
    name: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Main CLI application
pub struct ApivizApp {
    config: RenderConfig,
}

impl ApivizApp {
    /// Create a new application instance with fonts detected for this host
    pub fn new() -> Self {
        Self::with_config(RenderConfig::new(FontConfig::detect()))
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn apply_fonts(&mut self, font: Option<String>, italic_font: Option<String>) {
        if let Some(font) = font {
            self.config.font.normal = font;
        }
        if let Some(italic) = italic_font {
            self.config.font.italic = italic;
        }
    }

    fn renderer(&self) -> GraphvizRenderer {
        GraphvizRenderer::with_config(self.config.clone())
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flag defaults
        let log_level_str = std::env::var("APIVIZ_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("APIVIZ_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("APIviz v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                model,
                output_dir,
                dot,
                no_map,
                font,
                italic_font,
            } => {
                self.apply_fonts(font, italic_font);
                let runner = dot.map_or_else(DotRunner::from_env, |path| DotRunner::new(path));
                self.generate_command(&model, &output_dir, runner.with_map(!no_map), cli.verbose)
            }
            Commands::Emit {
                model,
                package,
                class,
                output,
                font,
                italic_font,
            } => {
                self.apply_fonts(font, italic_font);
                self.emit_command(&model, package, class, output, cli.verbose)
            }
            Commands::Validate { model, json } => self.validate_command(&model, json, cli.verbose),
        }
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        model: &Path,
        output_dir: &Path,
        runner: DotRunner,
        verbose: bool,
    ) -> Result<()> {
        let source = self.load_model(model)?;
        let orchestrator = Orchestrator::with_renderer(&source, self.renderer());
        let outputs = orchestrator.render_all();

        let total = outputs.len();
        let mut failed = 0;
        for output in outputs {
            let rendered = output
                .result
                .and_then(|dot| runner.render(&dot, output_dir, &output.name));
            match rendered {
                Ok(files) => {
                    if verbose {
                        eprintln!("Generated {}", files.png.display());
                    }
                }
                Err(e) => {
                    failed += 1;
                    eprintln!("Failed to generate {}: {}", output.name, e);
                }
            }
        }

        if failed > 0 {
            return Err(anyhow!("{} of {} diagrams failed", failed, total));
        }
        if verbose {
            eprintln!("Generated {} diagrams in {}", total, output_dir.display());
        }
        Ok(())
    }

    /// Handle the emit command
    fn emit_command(
        &self,
        model: &Path,
        package: Option<String>,
        class: Option<String>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let source = self.load_model(model)?;
        let job = Self::select_job(&source, package, class)?;

        if verbose {
            eprintln!("Emitting {}", job.name);
        }

        let dot = Orchestrator::with_renderer(&source, self.renderer()).render(&job)?;
        self.write_output(output, &dot)
    }

    /// Diagram chosen by the emit flags; the overview when none is given
    pub fn select_job<S: DocumentationSource>(
        source: &S,
        package: Option<String>,
        class: Option<String>,
    ) -> Result<DiagramJob> {
        match (package, class) {
            (Some(package), _) => Ok(DiagramJob::package_summary(package)),
            (None, Some(class)) => {
                let package = source
                    .package_of(&class)
                    .ok_or_else(|| DiagramError::unknown_entity(class.as_str()))?;
                Ok(DiagramJob::class(package.name.as_str(), class))
            }
            (None, None) => Ok(DiagramJob::overview()),
        }
    }

    /// Handle the validate command
    fn validate_command(&self, model: &Path, json: bool, verbose: bool) -> Result<()> {
        let source = self.load_model(model)?;

        if verbose {
            eprintln!(
                "Loaded {} packages, {} types",
                source.package_count(),
                source.type_count()
            );
        }

        let statuses: Vec<DiagramStatus> = Orchestrator::with_renderer(&source, self.renderer())
            .render_all()
            .into_iter()
            .map(|output| DiagramStatus {
                valid: output.is_ok(),
                error: output.result.err().map(|e| e.to_string()),
                name: output.name,
            })
            .collect();
        let failed = statuses.iter().filter(|status| !status.valid).count();

        if json {
            let report = serde_json::json!({
                "diagrams": statuses,
                "total": statuses.len(),
                "failed": failed,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for status in &statuses {
                match &status.error {
                    None if verbose => println!("✓ {}", status.name),
                    None => {}
                    Some(e) => println!("✗ {}: {}", status.name, e),
                }
            }
        }

        if failed > 0 {
            return Err(anyhow!("{} of {} diagrams are invalid", failed, statuses.len()));
        }
        if !json {
            println!("✓ {} diagrams valid", statuses.len());
        }
        Ok(())
    }

    /// Load a documentation model from a file or stdin
    pub fn load_model(&self, path: &Path) -> Result<DocModel> {
        if path.to_string_lossy() == "-" {
            Ok(DocModel::from_reader(io::stdin().lock())?)
        } else {
            // Model errors already name the file; io errors do not
            DocModel::load(path).map_err(|e| match e {
                DiagramError::IoError { .. } => anyhow::Error::new(e)
                    .context(format!("Failed to read model '{}'", path.display())),
                other => other.into(),
            })
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ApivizApp {
    fn default() -> Self {
        Self::new()
    }
}
