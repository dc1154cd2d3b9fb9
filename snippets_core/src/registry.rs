use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::Arguments;
use crate::Resolver;
use crate::SnippetError;
use crate::SnippetRequest;
use crate::SnippetResult;
use crate::SnippetView;

/// A registered snippet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
	/// The tag name used in text, e.g. `note` for `[note]...[/note]`.
	pub name: String,
	/// Human readable title.
	pub title: String,
	/// Identifier of the view that renders this snippet.
	pub view: String,
	/// Optional schema describing the snippet arguments. It is stored as
	/// metadata and never interpreted by the renderer.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema: Option<serde_json::Value>,
}

/// Details of the page being rendered, passed on to every view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
	/// Path of the page; the snippet name is appended for each sub-request.
	#[serde(default = "default_path")]
	pub path: String,
	/// Base URL of the application.
	#[serde(default = "default_application_url")]
	pub application_url: String,
}

impl Default for RequestContext {
	fn default() -> Self {
		Self {
			path: default_path(),
			application_url: default_application_url(),
		}
	}
}

fn default_path() -> String {
	"/".to_string()
}

fn default_application_url() -> String {
	"http://localhost".to_string()
}

/// Snippets by name and the views that render them.
///
/// The registry is built once by the embedding application and then only
/// read, so it can be shared between threads.
#[derive(Default)]
pub struct SnippetRegistry {
	snippets: BTreeMap<String, Snippet>,
	views: HashMap<String, Arc<dyn SnippetView>>,
}

impl fmt::Debug for SnippetRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut views: Vec<_> = self.views.keys().collect();
		views.sort();

		f.debug_struct("SnippetRegistry")
			.field("snippets", &self.snippets)
			.field("views", &views)
			.finish()
	}
}

impl SnippetRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Make a view available under `id`. Adding a view with an existing id
	/// replaces it.
	pub fn add_view(&mut self, id: impl Into<String>, view: impl SnippetView + 'static) -> &mut Self {
		let id = id.into();
		tracing::debug!(view = %id, "added view");
		self.views.insert(id, Arc::new(view));
		self
	}

	pub fn has_view(&self, id: &str) -> bool {
		self.views.contains_key(id)
	}

	/// Register a snippet rendered by the view `view`.
	///
	/// The name, title and view must all be non-empty and the view must have
	/// been added with [`SnippetRegistry::add_view`]. Registering a name
	/// again replaces the earlier snippet.
	pub fn register_snippet(
		&mut self,
		name: impl Into<String>,
		title: impl Into<String>,
		view: impl Into<String>,
		schema: Option<serde_json::Value>,
	) -> SnippetResult<()> {
		let (name, title, view) = (name.into(), title.into(), view.into());

		if name.is_empty() || title.is_empty() || view.is_empty() {
			return Err(SnippetError::Configuration(
				"You have to provide the name, title and view.".to_string(),
			));
		}

		if !self.has_view(&view) {
			return Err(SnippetError::UnknownView {
				snippet: name,
				view,
			});
		}

		tracing::debug!(snippet = %name, view = %view, "registered snippet");
		self.snippets.insert(
			name.clone(),
			Snippet {
				name,
				title,
				view,
				schema,
			},
		);

		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&Snippet> {
		self.snippets.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.snippets.contains_key(name)
	}

	/// All registered snippets, sorted by name.
	pub fn snippets(&self) -> impl Iterator<Item = &Snippet> {
		self.snippets.values()
	}

	pub fn len(&self) -> usize {
		self.snippets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snippets.is_empty()
	}

	/// Render the snippet `name` through its view. Returns `Ok(None)` when no
	/// snippet with that name is registered.
	pub fn render_snippet(
		&self,
		context: &RequestContext,
		name: &str,
		arguments: &Arguments,
	) -> SnippetResult<Option<String>> {
		let Some(snippet) = self.snippets.get(name) else {
			return Ok(None);
		};

		let view = self
			.views
			.get(&snippet.view)
			.ok_or_else(|| SnippetError::UnknownView {
				snippet: snippet.name.clone(),
				view: snippet.view.clone(),
			})?;

		let request = SnippetRequest {
			name,
			path: format!("{}{name}", context.path),
			application_url: &context.application_url,
			arguments,
		};

		view.render(&request).map(Some)
	}

	/// A [`Resolver`] that renders tags through this registry.
	pub fn resolver<'a>(&'a self, context: &'a RequestContext) -> RegistryResolver<'a> {
		RegistryResolver {
			registry: self,
			context,
		}
	}
}

/// Resolves snippet tags against a [`SnippetRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryResolver<'a> {
	registry: &'a SnippetRegistry,
	context: &'a RequestContext,
}

impl Resolver for RegistryResolver<'_> {
	type Error = SnippetError;

	fn resolve(&mut self, name: &str, arguments: &Arguments) -> SnippetResult<Option<String>> {
		self.registry.render_snippet(self.context, name, arguments)
	}
}
