use std::convert::Infallible;

use rstest::fixture;

use crate::*;

/// Render `text` with an infallible resolver.
pub(crate) fn render_with(
	text: &str,
	mut resolve: impl FnMut(&str, &Arguments) -> Option<String>,
) -> Rendered {
	let mut resolver = FnResolver(|name: &str, arguments: &Arguments| {
		Ok::<_, Infallible>(resolve(name, arguments))
	});
	let Ok(rendered) = render_with_diagnostics(text, &mut resolver);
	rendered
}

/// Replace every closed or self-closing tag with `matched<n>`, leaving
/// unclosed tags as they are. Returns the output and the replaced tags.
pub(crate) fn substitute_matches(text: &str) -> (String, Vec<TagOccurrence<'_>>) {
	let mut output = String::new();
	let mut matched = Vec::new();

	for segment in scan(text) {
		match segment {
			Segment::Tag(tag) if !tag.is_unclosed() => {
				matched.push(tag);
				output.push_str(&format!("matched{}", matched.len()));
			}
			other => output.push_str(other.as_str()),
		}
	}

	(output, matched)
}

/// The only tag in `text`.
pub(crate) fn single_tag(text: &str) -> TagOccurrence<'_> {
	let tags: Vec<_> = scan(text)
		.filter_map(|segment| {
			match segment {
				Segment::Tag(tag) => Some(tag),
				Segment::Text(_) => None,
			}
		})
		.collect();
	assert_eq!(tags.len(), 1, "expected exactly one tag in {text:?}");
	tags[0]
}

fn echo_view(request: &SnippetRequest<'_>) -> SnippetResult<String> {
	Ok(format!(
		"{} - {}",
		request.arguments.body().unwrap_or_default(),
		request.arguments.get("ham").unwrap_or_default()
	))
}

fn application_url_view(request: &SnippetRequest<'_>) -> SnippetResult<String> {
	Ok(request.application_url.to_string())
}

fn path_view(request: &SnippetRequest<'_>) -> SnippetResult<String> {
	Ok(request.path.clone())
}

fn failing_view(request: &SnippetRequest<'_>) -> SnippetResult<String> {
	Err(SnippetError::View {
		name: request.name.to_string(),
		reason: "database unavailable".to_string(),
	})
}

#[fixture]
pub(crate) fn registry() -> SnippetRegistry {
	let mut registry = SnippetRegistry::new();
	registry
		.add_view("echo", echo_view)
		.add_view("url", application_url_view)
		.add_view("path", path_view)
		.add_view("failing", failing_view);

	registry
		.register_snippet("foo", "Magick Garrery", "echo", None)
		.expect("foo registers");
	registry
		.register_snippet("baseurl", "Base URL", "url", None)
		.expect("baseurl registers");
	registry
		.register_snippet("here", "Current path", "path", None)
		.expect("here registers");
	registry
		.register_snippet("broken", "Broken", "failing", None)
		.expect("broken registers");

	registry
}

#[fixture]
pub(crate) fn context() -> RequestContext {
	RequestContext {
		path: "/page/".to_string(),
		application_url: "http://example.com".to_string(),
	}
}
