use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use imgsize::commands::config_cmd::ConfigOptions;
use imgsize::commands::{ReportOptions, execute_charts, execute_config, execute_html};
use imgsize::config::Config;
use imgsize::error::AppError;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Charts(args) => {
            execute_charts(&args.into_options()?)?;
        }
        Commands::Html(args) => {
            execute_html(&args.into_options()?)?;
        }
        Commands::All(args) => {
            let options = args.into_options()?;
            execute_charts(&options)?;
            println!();
            execute_html(&options)?;
        }
        Commands::Config(args) => {
            let options = ConfigOptions {
                show_path: args.path,
                edit: args.edit,
                repository: args.repository,
                runtime: args.runtime,
                output_dir: args.output_dir,
            };
            execute_config(options)?;
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "imgsize",
    version,
    about = "Compare container image sizes across build variants and render reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render PNG/SVG charts comparing image sizes.
    #[command(visible_alias = "ch")]
    Charts(ReportArgs),
    /// Render a standalone HTML dashboard.
    #[command(visible_alias = "ht")]
    Html(ReportArgs),
    /// Render both the charts and the HTML dashboard.
    All(ReportArgs),
    /// Manage imgsize configuration (repository, runtime, output directory).
    #[command(visible_alias = "cfg")]
    Config(ConfigArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Directory that receives the generated files (default: reports).
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Image repository whose variant tags are compared (default: bookshelf).
    #[arg(short = 'r', long = "repository", value_name = "NAME")]
    repository: Option<String>,

    /// Docker-compatible CLI used to inspect images (default: docker).
    #[arg(long = "runtime", value_name = "PROGRAM")]
    runtime: Option<String>,

    /// Print the size of every inspected image.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl ReportArgs {
    fn into_options(self) -> Result<ReportOptions, AppError> {
        let config =
            Config::load()?.with_overrides(self.repository, self.runtime, self.output_dir);
        config.validate()?;
        Ok(ReportOptions { config, verbose: self.verbose })
    }
}

#[derive(Args)]
struct ConfigArgs {
    /// Show the configuration file path.
    #[arg(long = "path", action = ArgAction::SetTrue)]
    path: bool,

    /// Open the configuration file in $EDITOR.
    #[arg(long = "edit", action = ArgAction::SetTrue)]
    edit: bool,

    /// Persist the image repository to compare.
    #[arg(long = "repository", value_name = "NAME")]
    repository: Option<String>,

    /// Persist the container runtime program.
    #[arg(long = "runtime", value_name = "PROGRAM")]
    runtime: Option<String>,

    /// Persist the output directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,
}
