//! `snippets_core` finds shortcode style snippet tags in free text and
//! replaces each one with the output of a named handler.
//!
//! ```text
//! [name key=value other=two words]body text[/name]
//! [name key=value/]
//! [[name key=value/]]   escaped, rendered as `[name key=value/]`
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! Text
//!   → Scanner (splits the text into literal spans and tag occurrences)
//!   → Argument parser (turns `key=value` tokens into ordered string arguments)
//!   → Renderer (escapes, reports unclosed tags, calls the resolver, splices output)
//!   → Resolver (a closure or a SnippetRegistry dispatching to views)
//! ```
//!
//! ## Modules
//!
//! - [`config`] — Loading `snippets.toml`, which declares template views and
//!   snippets, and building a registry from it.
//!
//! ## Key Types
//!
//! - [`TagOccurrence`] — A tag found by the scanner, with its name, raw
//!   arguments, content and escape brackets.
//! - [`Arguments`] — Ordered string arguments passed to a resolver, including
//!   the synthetic `body`.
//! - [`Resolver`] — Maps a tag name and its arguments to replacement text.
//! - [`TagDiagnostic`] — An unclosed or unregistered tag, rendered inline.
//! - [`SnippetRegistry`] — Snippets by name, each rendered by a
//!   [`SnippetView`].
//!
//! ## Quick Start
//!
//! ```rust
//! use snippets_core::RequestContext;
//! use snippets_core::SnippetRegistry;
//! use snippets_core::SnippetRequest;
//! use snippets_core::SnippetResult;
//! use snippets_core::render;
//!
//! let mut registry = SnippetRegistry::new();
//! registry.add_view("shout", |request: &SnippetRequest<'_>| -> SnippetResult<String> {
//! 	Ok(request.arguments.body().unwrap_or_default().to_uppercase())
//! });
//! registry
//! 	.register_snippet("shout", "Shout", "shout", None)
//! 	.unwrap();
//!
//! let context = RequestContext::default();
//! let output = render("Say [shout]hello[/shout]!", &mut registry.resolver(&context)).unwrap();
//! assert_eq!(output, "Say HELLO!");
//! ```

pub use arguments::*;
pub use error::*;
pub use registry::*;
pub use render::*;
pub use scanner::*;
pub use view::*;

mod arguments;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod registry;
mod render;
mod scanner;
mod view;

#[cfg(test)]
mod __fixtures;
