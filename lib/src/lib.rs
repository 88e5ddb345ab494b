#![doc = svgbobdoc::transform!(
//! Syntax highlighting and link rewriting for statically generated pages.
//!
//! # Overview
//!
//! Quire post-processes the HTML of a static site. Pages, either HTML or
//! Markdown rendered to HTML, are parsed into a tree, their references are
//! rewritten to be root-relative, and their code is highlighted:
//!
//! ```svgbob
//!  +----------+      +----------+      +------------------------------+
//!  | Markdown |----->|   HTML   |----->|           Rewriter           |
//!  +----------+      +----+-----+      |                              |
//!                         ^            |  href/src/srcset  -> refs    |
//!                         |            |  <pre><code>      -> Grammar |
//!  +----------+           |            |  <code>, <syntax> -> inline  |
//!  |   HTML   |-----------+            +--------------+---------------+
//!  +----------+                                       |
//!                                                     v
//!  +----------------------------------+       +---------------+
//!  |             Registry             |<------|  HTML output  |
//!  |  +-------+  +--------+  +------+ |       +---------------+
//!  |  | Haxe  |  |  json  |  | text | |
//!  |  +-------+  +--------+  +------+ |
//!  +----------------------------------+
//! ```
//!
//! A [`Grammar`](grammar::Grammar) is an ordered table of rules. Scanning a
//! text with a grammar yields a [`Highlight`](grammar::Highlight): a flat,
//! balanced list of events that wrap runs of source text in classes such as
//! `keyword` or `title.class`. Grammars are looked up by name or alias in an
//! immutable [`Registry`](grammar::Registry) built once at startup and shared
//! by reference, across threads if need be.
//!
//! The [`Rewriter`](rewrite::Rewriter) applies a set of fix-ups to a parsed
//! [`Document`](html::Document):
//!
//!   * **References** in `href`, `src`, and `srcset` are made root-relative:
//!     `.md` becomes `.html`, `/x` is re-rooted under the page directory (or
//!     the site root for images), `root/x` is re-rooted under the site root,
//!     and a trailing `.force-md` is stripped.
//!   * **Code blocks** marked `language-X` are highlighted with grammar `X`.
//!   * **Inline code** is marked with `inline-code` unless it opts out with
//!     `no-inline`.
//!   * **`<syntax>`** elements become inline code, highlighted with the
//!     grammar named by their `lang` attribute.
//!
//! ```rust
//! use quire::grammar::Registry;
//! use quire::rewrite::{Rewriter, RewriteSettings};
//!
//! let registry = Registry::standard()?;
//! let settings = RewriteSettings { page_dir: "wiki/".into(), ..Default::default() };
//! let rewriter = Rewriter::new(&registry, settings);
//!
//! let html = rewriter.rewrite_html(r#"<a href="/intro.md">Intro</a>"#)?;
//! assert!(html.contains(r#"<a href="/wiki/intro.html">"#));
//! # Ok::<(), quire::error::Error>(())
//! ```
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod grammar;
pub mod html;
pub mod rewrite;
pub mod markdown;
pub mod config;

pub use rayon;
