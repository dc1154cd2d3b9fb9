use std::fmt;

use tracing::debug;
use tracing::warn;

use crate::Arguments;
use crate::BODY_KEY;
use crate::Segment;
use crate::TagOccurrence;
use crate::parse_arguments;
use crate::scan;

/// Looks up the replacement text for a snippet tag.
///
/// `Ok(None)` means no snippet with this name exists, which the renderer
/// reports inline. An `Err` aborts the whole render.
pub trait Resolver {
	type Error;

	fn resolve(&mut self, name: &str, arguments: &Arguments) -> Result<Option<String>, Self::Error>;
}

impl<R: Resolver + ?Sized> Resolver for &mut R {
	type Error = R::Error;

	fn resolve(&mut self, name: &str, arguments: &Arguments) -> Result<Option<String>, Self::Error> {
		(**self).resolve(name, arguments)
	}
}

/// Adapts a closure into a [`Resolver`].
pub struct FnResolver<F>(pub F);

impl<F, E> Resolver for FnResolver<F>
where
	F: FnMut(&str, &Arguments) -> Result<Option<String>, E>,
{
	type Error = E;

	fn resolve(&mut self, name: &str, arguments: &Arguments) -> Result<Option<String>, E> {
		(self.0)(name, arguments)
	}
}

/// A problem with a single tag. The tag is replaced by an inline error
/// message and rendering carries on with the rest of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TagDiagnostic {
	/// The tag is neither self-closing nor followed by `[/name]`.
	UnclosedTag {
		name: String,
		line: usize,
		column: usize,
	},
	/// The resolver has no snippet with this name.
	UnregisteredTag {
		name: String,
		line: usize,
		column: usize,
	},
}

impl TagDiagnostic {
	pub fn name(&self) -> &str {
		match self {
			Self::UnclosedTag { name, .. } | Self::UnregisteredTag { name, .. } => name,
		}
	}

	/// Short machine readable label, `unclosed` or `unregistered`.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::UnclosedTag { .. } => "unclosed",
			Self::UnregisteredTag { .. } => "unregistered",
		}
	}

	/// 1-indexed line of the tag's opening bracket.
	pub fn line(&self) -> usize {
		match self {
			Self::UnclosedTag { line, .. } | Self::UnregisteredTag { line, .. } => *line,
		}
	}

	/// 1-indexed column of the tag's opening bracket.
	pub fn column(&self) -> usize {
		match self {
			Self::UnclosedTag { column, .. } | Self::UnregisteredTag { column, .. } => *column,
		}
	}

	/// The inline markup that replaces the tag in the output.
	pub fn markup(&self) -> String {
		error_markup(&self.to_string())
	}
}

impl fmt::Display for TagDiagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UnclosedTag { name, .. } => write!(f, "Snippet tag '{name}' not closed"),
			Self::UnregisteredTag { name, .. } => {
				write!(f, "No snippet with name '{name}' registered.")
			}
		}
	}
}

/// Wrap an error message in the block that is spliced into rendered output.
pub fn error_markup(message: &str) -> String {
	format!("<div class=\"alert alert-error\">{message}</div>")
}

/// The output of a render together with the problems found on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
	pub output: String,
	pub diagnostics: Vec<TagDiagnostic>,
}

impl Rendered {
	/// Returns true when every tag was either resolved or escaped.
	pub fn is_clean(&self) -> bool {
		self.diagnostics.is_empty()
	}
}

/// Replace every snippet tag in `text` with the output of `resolver`.
///
/// Escaped tags (`[[name/]]`) lose one layer of brackets and are never
/// resolved. Unclosed tags, escaped or not, and names the resolver does not
/// know are replaced with an inline error block. A replacement covers the
/// whole match, so a single escape bracket (`[[name/]`) is consumed with it.
/// Replacement text is not scanned again.
pub fn render<R>(text: &str, resolver: &mut R) -> Result<String, R::Error>
where
	R: Resolver + ?Sized,
{
	render_with_diagnostics(text, resolver).map(|rendered| rendered.output)
}

/// [`render`] with a closure as the resolver.
///
/// ```
/// use std::convert::Infallible;
///
/// let output = snippets_core::render_fn("Hi [name who=you/]!", |_, arguments| {
/// 	Ok::<_, Infallible>(arguments.get("who").map(str::to_uppercase))
/// });
/// assert_eq!(output, Ok("Hi YOU!".to_string()));
/// ```
pub fn render_fn<F, E>(text: &str, resolver: F) -> Result<String, E>
where
	F: FnMut(&str, &Arguments) -> Result<Option<String>, E>,
{
	render(text, &mut FnResolver(resolver))
}

/// Like [`render`], but also returns a [`TagDiagnostic`] for every unclosed
/// or unregistered tag.
#[tracing::instrument(level = "debug", skip_all, fields(length = text.len()))]
pub fn render_with_diagnostics<R>(text: &str, resolver: &mut R) -> Result<Rendered, R::Error>
where
	R: Resolver + ?Sized,
{
	let mut output = String::with_capacity(text.len());
	let mut diagnostics = Vec::new();
	let mut locator = Locator::new(text);

	for segment in scan(text) {
		let tag = match segment {
			Segment::Text(literal) => {
				output.push_str(literal);
				continue;
			}
			Segment::Tag(tag) => tag,
		};

		// An unclosed tag is reported even when it is wrapped in escape
		// brackets. Every other branch replaces the whole match, including a
		// lone escape bracket.
		if tag.is_unclosed() {
			let (line, column) = locator.locate(tag.offset);
			warn!(name = tag.name, line, column, "snippet tag not closed");
			let diagnostic = TagDiagnostic::UnclosedTag {
				name: tag.name.to_string(),
				line,
				column,
			};
			output.push_str(&diagnostic.markup());
			diagnostics.push(diagnostic);
			continue;
		}

		if tag.is_escaped() {
			output.push_str(tag.unescaped());
			continue;
		}

		let arguments = tag_arguments(&tag);
		debug!(name = tag.name, arguments = arguments.len(), "resolving snippet tag");

		if let Some(replacement) = resolver.resolve(tag.name, &arguments)? {
			output.push_str(&replacement);
		} else {
			let (line, column) = locator.locate(tag.offset);
			warn!(name = tag.name, line, column, "no snippet registered");
			let diagnostic = TagDiagnostic::UnregisteredTag {
				name: tag.name.to_string(),
				line,
				column,
			};
			output.push_str(&diagnostic.markup());
			diagnostics.push(diagnostic);
		}
	}

	Ok(Rendered {
		output,
		diagnostics,
	})
}

/// The arguments handed to a resolver for `tag`: the parsed raw arguments
/// plus `body`, which is the tag content or empty for self-closing tags.
pub fn tag_arguments(tag: &TagOccurrence<'_>) -> Arguments {
	let mut arguments = parse_arguments(tag.raw_arguments);
	arguments.insert(BODY_KEY, tag.content.unwrap_or_default());
	arguments
}

/// Tracks line and column while moving forward through the text, so
/// positions are computed in one pass.
struct Locator<'a> {
	text: &'a str,
	offset: usize,
	line: usize,
	column: usize,
}

impl<'a> Locator<'a> {
	fn new(text: &'a str) -> Self {
		Self {
			text,
			offset: 0,
			line: 1,
			column: 1,
		}
	}

	fn locate(&mut self, offset: usize) -> (usize, usize) {
		for character in self.text[self.offset..offset].chars() {
			if character == '\n' {
				self.line += 1;
				self.column = 1;
			} else {
				self.column += 1;
			}
		}
		self.offset = offset;

		(self.line, self.column)
	}
}
