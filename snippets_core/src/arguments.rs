use serde::Serialize;
use serde::ser::SerializeMap;

/// The key under which a tag's inner content is passed to a resolver.
pub const BODY_KEY: &str = "body";

/// Ordered string arguments parsed from a snippet tag.
///
/// Keys keep the position of their first insertion. Assigning an existing key
/// again replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
	entries: Vec<(String, String)>,
}

impl Arguments {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set `key` to `value`, replacing any previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => *slot = value,
			None => self.entries.push((key, value)),
		}
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(existing, _)| existing == key)
			.map(|(_, value)| value.as_str())
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// The tag body, empty for self-closing tags.
	pub fn body(&self) -> Option<&str> {
		self.get(BODY_KEY)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.map(|(key, value)| (key.as_str(), value.as_str()))
	}

	fn append(&mut self, key: &str, token: &str) {
		if let Some((_, value)) = self.entries.iter_mut().find(|(existing, _)| existing == key) {
			value.push(' ');
			value.push_str(token);
		}
	}
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut arguments = Self::new();
		for (key, value) in iter {
			arguments.insert(key, value);
		}
		arguments
	}
}

impl Serialize for Arguments {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, value) in &self.entries {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

/// Parse the raw argument string of a tag into key/value pairs.
///
/// The string is split on single spaces. A token containing `=` starts a new
/// entry, split on its first `=` with both halves trimmed. A token without `=`
/// continues the value of the most recent key, joined by one space, which
/// restores unquoted values that contain spaces:
///
/// ```
/// use snippets_core::parse_arguments;
///
/// let arguments = parse_arguments(" title=Hello world size=2");
/// assert_eq!(arguments.get("title"), Some("Hello world"));
/// assert_eq!(arguments.get("size"), Some("2"));
/// ```
///
/// Tokens seen before any key are dropped. Repeated spaces produce empty
/// tokens which are appended like any other. Quotes carry no meaning, so a
/// quoted value containing `=` is split like an unquoted one.
pub fn parse_arguments(raw: &str) -> Arguments {
	let mut arguments = Arguments::new();
	let mut current_key: Option<String> = None;

	for token in raw.split(' ') {
		if let Some((key, value)) = token.split_once('=') {
			let key = key.trim();
			arguments.insert(key, value.trim());
			current_key = Some(key.to_string());
		} else if let Some(key) = &current_key {
			arguments.append(key, token);
		}
	}

	arguments
}
