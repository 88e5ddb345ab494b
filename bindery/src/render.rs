use std::path::{Path, PathBuf};

use quire::error::{Chainable, Result};
use quire::grammar::Registry;
use quire::html::Document;
use quire::markdown::Markdown;
use quire::rayon::prelude::*;
use quire::rewrite::{RewriteStats, Rewriter};
use quire::{err, error};

use crate::config::Config;
use crate::util;

pub struct Bindery {
    registry: Registry,
    config: Config,
}

/// What happened to one input.
enum Outcome {
    Fresh,
    Written(RewriteStats),
}

impl Bindery {
    pub fn new(config: Config) -> Result<Self> {
        let registry = Registry::standard()?;
        quire::time!(registry.warm_up());
        Ok(Bindery { registry, config })
    }

    /// Rewrites every input into the output directory.
    pub fn render(&self, inputs: &[PathBuf]) -> Result<RewriteStats> {
        std::fs::create_dir_all(&self.config.output)
            .chain_with(|| error! {
                "failed to create output directory",
                "path" => self.config.output.display(),
            })?;

        let rewriter = Rewriter::new(&self.registry, self.config.rewrite.clone());
        let outcomes = inputs.par_iter()
            .map(|input| self.render_one(&rewriter, input))
            .collect::<Result<Vec<_>>>()?;

        let mut total = RewriteStats::default();
        let mut skipped = 0;
        for outcome in outcomes {
            match outcome {
                Outcome::Fresh => skipped += 1,
                Outcome::Written(stats) => total += stats,
            }
        }

        log::info!("wrote {} pages ({} up to date): {} references, {} blocks, \
            {} inline, {} syntax, {} unknown grammars",
            inputs.len() - skipped, skipped, total.references, total.blocks,
            total.inline, total.syntax, total.unknown);

        Ok(total)
    }

    fn render_one(&self, rewriter: &Rewriter<'_>, input: &Path) -> Result<Outcome> {
        let Some(stem) = input.file_stem() else {
            return err!("input has no file name", "path" => input.display());
        };

        let output = self.config.output.join(format!("{}.html", stem.to_string_lossy()));
        if !self.config.full && util::is_fresh(input, &output) {
            log::debug!("{} is up to date", output.display());
            return Ok(Outcome::Fresh);
        }

        let source = std::fs::read_to_string(input)
            .chain_with(|| error!("failed to read input", "path" => input.display()))?;

        let mut document = match input.extension().and_then(|e| e.to_str()) {
            Some("md" | "markdown" | "mdown") => {
                let rendered = Markdown::new(&source).render();
                util::page(&rendered.html, rendered.title.as_deref())
            }
            Some("html" | "htm") => Document::parse(&source),
            _ => return err! {
                "unsupported input type",
                "path" => input.display(),
                "expected one of" => "md, markdown, mdown, html, htm",
            },
        };

        let stats = rewriter.rewrite(&mut document)
            .chain_with(|| error!("failed to rewrite page", "path" => input.display()))?;

        std::fs::write(&output, document.to_html()?)
            .chain_with(|| error!("failed to write output", "path" => output.display()))?;

        Ok(Outcome::Written(stats))
    }
}
