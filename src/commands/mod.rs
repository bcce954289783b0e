use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::AppError;
use crate::inspect::RuntimeCli;

pub mod charts;
pub mod config_cmd;
pub mod html_report;

pub use charts::execute_charts;
pub use config_cmd::execute_config;
pub use html_report::execute_html;

/// Settings shared by the reporting commands.
pub struct ReportOptions {
    pub config: Config,
    pub verbose: bool,
}

impl ReportOptions {
    pub fn inspector(&self) -> RuntimeCli {
        RuntimeCli::new(self.config.runtime.clone())
    }
}

const RULE: &str = "==================================================";

fn print_banner(title: &str) {
    println!("{RULE}");
    println!("{title}");
    println!("{RULE}");
    println!();
}

fn print_footer(lines: &[String]) {
    println!();
    println!("{RULE}");
    for line in lines {
        println!("{line}");
    }
    println!("{RULE}");
}

/// Create the output directory; failure here is fatal.
fn prepare_output_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)?;
    Ok(())
}
