use std::path::{Path, PathBuf};

use quire::config::Settings;
use quire::error::Result;
use quire::rewrite::{OutputMode, RewriteSettings};

use crate::flags::Bindery;

#[derive(Debug)]
pub struct Config {
    pub rewrite: RewriteSettings,
    pub output: PathBuf,
    /// Rebuild pages whose outputs are up to date.
    pub full: bool,
}

impl Config {
    /// Reads the settings file, then applies command-line overrides.
    pub fn load(flags: &Bindery) -> Result<Self> {
        let mut settings = match &flags.config {
            Some(path) => Settings::read(path)?,
            None => {
                let dir = flags.inputs.first()
                    .and_then(|input| input.parent())
                    .unwrap_or(Path::new("."));

                Settings::discover(dir)?
            }
        };

        if let Some(page_dir) = &flags.page_dir {
            settings.page_dir = page_dir.clone();
        }

        if let Some(site_root) = &flags.site_root {
            settings.site_root = site_root.clone();
        }

        if flags.actions {
            settings.mode = OutputMode::Actions;
        }

        let release = flags.release || flags.full;
        Ok(Config {
            rewrite: settings.rewrite_settings(release),
            output: flags.output.clone(),
            full: flags.full,
        })
    }
}
