use serde_json::Value;
use serde_json::json;

use crate::Arguments;
use crate::SnippetError;
use crate::SnippetResult;

/// The sub-request a view receives for one snippet tag.
#[derive(Debug, Clone)]
pub struct SnippetRequest<'a> {
	/// Name of the snippet tag being rendered.
	pub name: &'a str,
	/// The request path of the page, followed by the snippet name.
	pub path: String,
	/// Base URL of the application the page is served from.
	pub application_url: &'a str,
	/// Tag arguments, including `body`.
	pub arguments: &'a Arguments,
}

/// A handler that produces the output for a snippet.
///
/// Closures with the signature
/// `Fn(&SnippetRequest<'_>) -> SnippetResult<String>` are views.
pub trait SnippetView: Send + Sync {
	fn render(&self, request: &SnippetRequest<'_>) -> SnippetResult<String>;
}

impl<F> SnippetView for F
where
	F: Fn(&SnippetRequest<'_>) -> SnippetResult<String> + Send + Sync,
{
	fn render(&self, request: &SnippetRequest<'_>) -> SnippetResult<String> {
		self(request)
	}
}

const TEMPLATE_NAME: &str = "__view__";

/// A view rendered from a minijinja template.
///
/// Every argument is available as a top-level variable (`{{ body }}`,
/// `{{ title }}`) and the request as `{{ request.name }}`,
/// `{{ request.path }}` and `{{ request.application_url }}`. Arguments win
/// over `request` when a tag passes an argument with that name.
#[derive(Debug, Clone)]
pub struct TemplateView {
	name: String,
	source: String,
}

impl TemplateView {
	/// Create a view, checking the template syntax up front.
	pub fn parse(name: impl Into<String>, source: impl Into<String>) -> SnippetResult<Self> {
		let view = Self {
			name: name.into(),
			source: source.into(),
		};

		{
			let mut env = minijinja::Environment::new();
			env.add_template(TEMPLATE_NAME, &view.source)
				.map_err(|e| view.render_error(&e))?;
		}

		Ok(view)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	fn render_error(&self, error: &minijinja::Error) -> SnippetError {
		SnippetError::TemplateRender {
			name: self.name.clone(),
			reason: error.to_string(),
		}
	}
}

impl SnippetView for TemplateView {
	fn render(&self, request: &SnippetRequest<'_>) -> SnippetResult<String> {
		let mut env = minijinja::Environment::new();
		env.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);
		env.add_template(TEMPLATE_NAME, &self.source)
			.map_err(|e| self.render_error(&e))?;

		let template = env
			.get_template(TEMPLATE_NAME)
			.map_err(|e| self.render_error(&e))?;

		let mut context = serde_json::Map::new();
		context.insert(
			"request".to_string(),
			json!({
				"name": request.name,
				"path": request.path,
				"application_url": request.application_url,
			}),
		);
		for (key, value) in request.arguments.iter() {
			context.insert(key.to_string(), Value::String(value.to_string()));
		}

		template
			.render(minijinja::Value::from_serialize(&context))
			.map_err(|e| self.render_error(&e))
	}
}
