/// A snippet tag found in the source text.
///
/// The fields mirror the parts of a tag in the order they appear:
///
/// ```text
/// [[name raw arguments/]]
/// ^ ^    ^            ^ ^
/// | |    |            | escape_close
/// | name raw_arguments self_closing
/// escape_open
/// ```
///
/// A tag is either self-closing, in which case it never has content, or it is
/// an open tag whose `content` is `Some` only when a closing tag with the
/// exact same name follows it. When neither holds the tag is unclosed and must
/// not be substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOccurrence<'a> {
	/// A second `[` directly before the name, e.g. `[[name]]`.
	pub escape_open: bool,
	/// The tag name, made of ASCII letters, digits, `_` and `-`.
	pub name: &'a str,
	/// Everything between the name and the closing `]` (or `/]`), including
	/// leading whitespace.
	pub raw_arguments: &'a str,
	/// Whether the tag ended with `/]`.
	pub self_closing: bool,
	/// The text between the open tag and `[/name]`.
	pub content: Option<&'a str>,
	/// A trailing `]` directly after the tag.
	pub escape_close: bool,
	/// The full matched source text, including any escape brackets.
	pub source: &'a str,
	/// Byte offset of `source` within the scanned text.
	pub offset: usize,
}

impl<'a> TagOccurrence<'a> {
	/// Byte offset directly after the match.
	pub fn end(&self) -> usize {
		self.offset + self.source.len()
	}

	/// Both escape brackets are present, so the tag is shown literally.
	pub fn is_escaped(&self) -> bool {
		self.escape_open && self.escape_close
	}

	/// Neither self-closing nor followed by a matching `[/name]`.
	pub fn is_unclosed(&self) -> bool {
		!self.self_closing && self.content.is_none()
	}

	/// The tag text with one layer of brackets removed. For `[[foo a=b/]]`
	/// this is `[foo a=b/]`.
	pub fn unescaped(&self) -> &'a str {
		&self.source[1..self.source.len() - 1]
	}
}

/// A piece of scanned text: either literal text or a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	Text(&'a str),
	Tag(TagOccurrence<'a>),
}

impl<'a> Segment<'a> {
	/// The source text this segment covers.
	pub fn as_str(&self) -> &'a str {
		match self {
			Self::Text(text) => text,
			Self::Tag(tag) => tag.source,
		}
	}
}

/// Lazily split `text` into literal text and tags, in source order.
///
/// Concatenating [`Segment::as_str`] for every segment reproduces `text`.
pub fn scan(text: &str) -> Scanner<'_> {
	Scanner {
		text,
		cursor: 0,
		pending: None,
	}
}

/// Iterator returned by [`scan`].
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
	text: &'a str,
	cursor: usize,
	pending: Option<TagOccurrence<'a>>,
}

impl<'a> Iterator for Scanner<'a> {
	type Item = Segment<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(tag) = self.pending.take() {
			self.cursor = tag.end();
			return Some(Segment::Tag(tag));
		}

		if self.cursor >= self.text.len() {
			return None;
		}

		let start = self.cursor;
		match find_tag(self.text, start) {
			Some(tag) if tag.offset == start => {
				self.cursor = tag.end();
				Some(Segment::Tag(tag))
			}
			Some(tag) => {
				self.cursor = tag.offset;
				self.pending = Some(tag);
				Some(Segment::Text(&self.text[start..tag.offset]))
			}
			None => {
				self.cursor = self.text.len();
				Some(Segment::Text(&self.text[start..]))
			}
		}
	}
}

/// Find the first tag in `text` starting at or after byte offset `from`.
///
/// Returns `None` when `from` is past the end of `text` or not on a character
/// boundary.
pub fn find_tag(text: &str, from: usize) -> Option<TagOccurrence<'_>> {
	if !text.is_char_boundary(from) {
		return None;
	}

	let mut position = from;

	while position < text.len() {
		let bracket = position + text[position..].find('[')?;
		if let Some(tag) = match_at(text, bracket) {
			tracing::trace!(name = tag.name, offset = tag.offset, "matched snippet tag");
			return Some(tag);
		}
		position = bracket + 1;
	}

	None
}

/// Try to match a tag starting at the `[` at byte offset `start`.
///
/// This is a two-phase scan. The open tag is located first, then the content
/// is bounded by a literal search for `[/name]` using the exact name that was
/// captured, so an unrelated closing tag never ends the content.
fn match_at(text: &str, start: usize) -> Option<TagOccurrence<'_>> {
	let bytes = text.as_bytes();
	if bytes.get(start) != Some(&b'[') {
		return None;
	}

	let mut cursor = start + 1;
	let escape_open = bytes.get(cursor) == Some(&b'[');
	if escape_open {
		cursor += 1;
	}

	let name_start = cursor;
	while bytes.get(cursor).copied().is_some_and(is_name_byte) {
		cursor += 1;
	}

	// The name must end on a word boundary. Every name byte except `-` is a
	// word character and the following byte is never a name byte, so giving
	// back trailing hyphens is enough.
	let mut name_end = cursor;
	while name_end > name_start && bytes[name_end - 1] == b'-' {
		name_end -= 1;
	}
	if name_end == name_start {
		return None;
	}
	let name = &text[name_start..name_end];

	// The argument region stops at the first `]`. A `/` right before it marks
	// the tag as self-closing, any other `/` is part of the arguments.
	let bracket = name_end + text[name_end..].find(']')?;
	let self_closing = bracket > name_end && bytes[bracket - 1] == b'/';
	let raw_arguments = if self_closing {
		&text[name_end..bracket - 1]
	} else {
		&text[name_end..bracket]
	};

	let mut end = bracket + 1;
	let mut content = None;
	if !self_closing {
		let closing = format!("[/{name}]");
		if let Some(length) = text[end..].find(&closing) {
			content = Some(&text[end..end + length]);
			end += length + closing.len();
		}
	}

	let escape_close = bytes.get(end) == Some(&b']');
	if escape_close {
		end += 1;
	}

	Some(TagOccurrence {
		escape_open,
		name,
		raw_arguments,
		self_closing,
		content,
		escape_close,
		source: &text[start..end],
		offset: start,
	})
}

fn is_name_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}
