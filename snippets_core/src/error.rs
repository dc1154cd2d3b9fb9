use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SnippetError {
	#[error(transparent)]
	#[diagnostic(code(snippets::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(snippets::config_parse),
		help("check that snippets.toml is valid TOML with [views] and [snippets] sections")
	)]
	ConfigParse(String),

	#[error("{0}")]
	#[diagnostic(code(snippets::configuration))]
	Configuration(String),

	#[error("snippet `{snippet}` refers to unknown view `{view}`")]
	#[diagnostic(
		code(snippets::unknown_view),
		help("declare the view under [views] before referencing it from a snippet")
	)]
	UnknownView { snippet: String, view: String },

	#[error("failed to load view file `{path}`: {reason}")]
	#[diagnostic(code(snippets::view_file))]
	ViewFile { path: String, reason: String },

	#[error("template rendering failed for view `{name}`: {reason}")]
	#[diagnostic(code(snippets::template_render))]
	TemplateRender { name: String, reason: String },

	#[error("snippet `{name}` failed to render: {reason}")]
	#[diagnostic(code(snippets::view))]
	View { name: String, reason: String },
}

pub type SnippetResult<T> = Result<T, SnippetError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
