use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::RequestContext;
use crate::SnippetError;
use crate::SnippetRegistry;
use crate::SnippetResult;
use crate::TemplateView;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"snippets.toml",
	".snippets.toml",
	".config/snippets.toml",
];

/// Source of a template view.
///
/// Plain strings are the template itself:
///
/// ```toml
/// [views]
/// alert = "<div class=\"alert\">{{ body }}</div>"
/// ```
///
/// Tables point to a template file relative to the project root:
///
/// ```toml
/// [views]
/// card = { path = "views/card.html" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ViewSource {
	Inline(String),
	File { path: PathBuf },
}

/// A `[snippets.<name>]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SnippetConfig {
	pub title: String,
	pub view: String,
	#[serde(default)]
	pub schema: Option<serde_json::Value>,
}

/// Configuration loaded from a `snippets.toml` file.
///
/// ```toml
/// [request]
/// path = "/docs/"
/// application_url = "http://example.com"
///
/// [views]
/// alert = "<div class=\"alert\">{{ body }}</div>"
/// card = { path = "views/card.html" }
///
/// [snippets.note]
/// title = "Note"
/// view = "alert"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SnippetsConfig {
	/// The request details handed to every view.
	#[serde(default)]
	pub request: RequestContext,
	/// View identifier to template source.
	#[serde(default)]
	pub views: BTreeMap<String, ViewSource>,
	/// Snippet name to its title, view and schema.
	#[serde(default)]
	pub snippets: BTreeMap<String, SnippetConfig>,
}

impl SnippetsConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> SnippetResult<Option<SnippetsConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_from(&config_path).map(Some)
	}

	/// Load the config from an explicit file.
	pub fn load_from(path: &Path) -> SnippetResult<SnippetsConfig> {
		let content = std::fs::read_to_string(path)?;
		tracing::debug!(path = %path.display(), "loading config");

		toml::from_str(&content).map_err(|e| SnippetError::ConfigParse(e.to_string()))
	}

	/// Build a registry with a [`TemplateView`] for every view and a snippet
	/// for every snippet entry. View files are read relative to `root`.
	pub fn build_registry(&self, root: &Path) -> SnippetResult<SnippetRegistry> {
		let mut registry = SnippetRegistry::new();

		for (id, source) in &self.views {
			let template = match source {
				ViewSource::Inline(template) => template.clone(),
				ViewSource::File { path } => {
					std::fs::read_to_string(root.join(path)).map_err(|e| {
						SnippetError::ViewFile {
							path: path.display().to_string(),
							reason: e.to_string(),
						}
					})?
				}
			};

			registry.add_view(id.clone(), TemplateView::parse(id.clone(), template)?);
		}

		for (name, snippet) in &self.snippets {
			registry.register_snippet(
				name.clone(),
				snippet.title.clone(),
				snippet.view.clone(),
				snippet.schema.clone(),
			)?;
		}

		Ok(registry)
	}

	/// The request context views receive.
	pub fn request_context(&self) -> &RequestContext {
		&self.request
	}
}
