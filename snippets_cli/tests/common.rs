use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const CONFIG: &str = r#"[request]
path = "/docs/"
application_url = "http://example.com"

[views]
alert = "<b>{{ level }}</b>: {{ body }}"
link = "<a href=\"{{ request.application_url }}{{ request.path }}\">{{ title }}</a>"

[snippets.note]
title = "Note"
view = "alert"

[snippets.home]
title = "Home link"
view = "link"
schema = { type = "object", required = ["title"] }
"#;

pub fn snippets_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("snippets"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("SNIPPETS_LOG");
	cmd
}

/// Write the shared `snippets.toml` into `root`.
pub fn write_config(root: &Path) -> std::io::Result<()> {
	std::fs::write(root.join("snippets.toml"), CONFIG)
}
