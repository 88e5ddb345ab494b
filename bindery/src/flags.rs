use std::path::PathBuf;

xflags::xflags! {
    /// Rewrites references and highlights code in HTML and Markdown pages.
    cmd bindery {
        /// Directory the rewritten pages are written to.
        required output: PathBuf
        /// HTML or Markdown pages to rewrite.
        repeated inputs: PathBuf
        /// Build for release: unknown grammars fail the build.
        optional -r, --release
        /// Rebuild every page, even those with up-to-date outputs. Implies --release.
        optional --full
        /// Emit link targets without their `.html` extension.
        optional --actions
        /// Directory of the pages, relative to the site root.
        optional --page-dir page_dir: String
        /// Path from the pages to the site root.
        optional --site-root site_root: String
        /// Settings file. Defaults to `quire.toml` next to the first input.
        optional -c, --config config: PathBuf
    }
}
