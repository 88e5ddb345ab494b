use std::path::Path;

use serde::Deserialize;

use crate::error::{Chainable, Result};
use crate::grammar::DEFAULT_CLASS_PREFIX;
use crate::rewrite::{OutputMode, RewriteSettings, UnknownGrammarPolicy};

/// Name of the settings file looked for next to the inputs.
pub const CONFIG_FILE: &str = "quire.toml";

/// Build settings, as read from a TOML file. Every field is optional.
///
/// ```toml
/// page_dir = "wiki/"
/// site_root = "../"
/// mode = "actions"
/// unknown_grammar = "warn"
/// class_prefix = "hljs-"
/// highlighted_class = "hljs"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub page_dir: String,
    pub site_root: String,
    pub mode: OutputMode,
    /// When unset, [`Fail`](UnknownGrammarPolicy::Fail) for release builds
    /// and [`Warn`](UnknownGrammarPolicy::Warn) otherwise.
    pub unknown_grammar: Option<UnknownGrammarPolicy>,
    pub class_prefix: String,
    pub highlighted_class: String,
}

impl Default for Settings {
    fn default() -> Self {
        let rewrite = RewriteSettings::default();
        Settings {
            page_dir: rewrite.page_dir,
            site_root: rewrite.site_root,
            mode: OutputMode::Standard,
            unknown_grammar: None,
            class_prefix: DEFAULT_CLASS_PREFIX.into(),
            highlighted_class: rewrite.highlighted_class,
        }
    }
}

impl Settings {
    pub fn parse(source: &str) -> Result<Settings> {
        Ok(toml::from_str(source)?)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();
        let string = std::fs::read_to_string(path)
            .chain_with(|| error!("failed to read settings", "path" => path.display()))?;

        Settings::parse(&string)
            .chain_with(|| error!("invalid settings", "path" => path.display()))
    }

    /// Reads `dir/quire.toml` if it exists, or returns the defaults.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Settings> {
        let path = dir.as_ref().join(CONFIG_FILE);
        match path.is_file() {
            true => Settings::read(path),
            false => Ok(Settings::default()),
        }
    }

    /// The rewriter settings for a release or development build.
    pub fn rewrite_settings(&self, release: bool) -> RewriteSettings {
        let fallback = match release {
            true => UnknownGrammarPolicy::Fail,
            false => UnknownGrammarPolicy::Warn,
        };

        RewriteSettings {
            page_dir: self.page_dir.clone(),
            site_root: self.site_root.clone(),
            mode: self.mode,
            unknown_grammar: self.unknown_grammar.unwrap_or(fallback),
            class_prefix: self.class_prefix.clone(),
            highlighted_class: self.highlighted_class.clone(),
        }
    }
}
