use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{Config, config_file_path, ensure_config_file};
use crate::error::AppError;
use crate::utils::display_path;

pub struct ConfigOptions {
    pub show_path: bool,
    pub edit: bool,
    pub repository: Option<String>,
    pub runtime: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl ConfigOptions {
    fn has_updates(&self) -> bool {
        self.repository.is_some() || self.runtime.is_some() || self.output_dir.is_some()
    }
}

pub fn execute_config(options: ConfigOptions) -> Result<(), AppError> {
    if options.show_path {
        let path = config_file_path()?;
        println!("Configuration file: {}", display_path(&path));
    }

    if options.has_updates() {
        let config = Config::load()?.with_overrides(
            options.repository.clone(),
            options.runtime.clone(),
            options.output_dir.clone(),
        );
        config.validate()?;
        config.save()?;
        println!(
            "Saved configuration: repository={}, runtime={}, output_dir={}",
            config.repository,
            config.runtime,
            config.output_dir.display()
        );
    }

    if options.edit {
        let path = ensure_config_file()?;
        open_editor(&path)?;
    }

    if !options.show_path && !options.has_updates() && !options.edit {
        let path = config_file_path()?;
        println!("Configuration file: {}", display_path(&path));
    }

    Ok(())
}

fn open_editor(path: &Path) -> Result<(), AppError> {
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|err| AppError::Editor(err.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Editor(format!("Editor exited with status {}", status)))
    }
}
