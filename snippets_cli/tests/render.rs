mod common;

use similar_asserts::assert_eq;
use snippets_core::AnyEmptyResult;

#[test]
fn render_file_to_stdout() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;
	std::fs::write(
		tmp.path().join("page.md"),
		"Intro: [note level=Tip]Read this[/note]\n[home title=Start/]\n",
	)?;

	let output = common::snippets_cmd()
		.arg("render")
		.arg(tmp.path().join("page.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	assert_eq!(
		String::from_utf8(output)?,
		"Intro: <b>Tip</b>: Read this\n<a href=\"http://example.com/docs/home\">Start</a>\n"
	);

	Ok(())
}

#[test]
fn render_reads_stdin() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	let output = common::snippets_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("[[note/]] and [note level=A]b[/note]")
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	assert_eq!(String::from_utf8(output)?, "[note/] and <b>A</b>: b");

	Ok(())
}

#[test]
fn render_dash_reads_stdin() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	common::snippets_cmd()
		.arg("render")
		.arg("-")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("[note level=Hi]there[/note]")
		.assert()
		.success()
		.stdout(predicates::str::contains("<b>Hi</b>: there"));

	Ok(())
}

#[test]
fn render_writes_output_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;
	std::fs::write(tmp.path().join("page.md"), "[home title=Docs/]")?;
	let out = tmp.path().join("page.html");

	common::snippets_cmd()
		.arg("render")
		.arg(tmp.path().join("page.md"))
		.arg("--output")
		.arg(&out)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::is_empty());

	assert_eq!(
		std::fs::read_to_string(&out)?,
		"<a href=\"http://example.com/docs/home\">Docs</a>"
	);

	Ok(())
}

#[test]
fn render_reports_problems_inline() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	common::snippets_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("[missing/] [note]")
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"<div class=\"alert alert-error\">No snippet with name 'missing' registered.</div>",
		))
		.stdout(predicates::str::contains(
			"<div class=\"alert alert-error\">Snippet tag 'note' not closed</div>",
		))
		.stderr(predicates::str::contains("no snippet registered"))
		.stderr(predicates::str::contains("snippet tag not closed"));

	Ok(())
}

#[test]
fn render_strict_fails_on_problems() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;
	std::fs::write(tmp.path().join("page.md"), "ok\n  [missing/]\n")?;

	common::snippets_cmd()
		.arg("render")
		.arg(tmp.path().join("page.md"))
		.arg("--strict")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("No snippet with name 'missing' registered."))
		.stderr(predicates::str::contains(
			"page.md:2:3: No snippet with name 'missing' registered.",
		));

	Ok(())
}

#[test]
fn render_strict_passes_when_clean() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	common::snippets_cmd()
		.arg("render")
		.arg("--strict")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("[note level=Ok]fine[/note]")
		.assert()
		.success();

	Ok(())
}

#[test]
fn render_without_config_registers_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::snippets_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("[note/]")
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"No snippet with name 'note' registered.",
		))
		.stderr(predicates::str::contains("no config file found"));

	Ok(())
}

#[test]
fn render_with_explicit_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("conf"))?;
	std::fs::write(
		tmp.path().join("conf/custom.toml"),
		"[views]\nhello = \"Hello {{ who }}!\"\n\n[snippets.hello]\ntitle = \"Hello\"\nview = \
		 \"hello\"\n",
	)?;

	common::snippets_cmd()
		.arg("render")
		.arg("--config")
		.arg(tmp.path().join("conf/custom.toml"))
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("[hello who=world/]")
		.assert()
		.success()
		.stdout("Hello world!");

	Ok(())
}

#[test]
fn render_with_view_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("views"))?;
	std::fs::write(tmp.path().join("views/card.html"), "<section>{{ body }}</section>")?;
	std::fs::write(
		tmp.path().join(".snippets.toml"),
		"[views]\ncard = { path = \"views/card.html\" }\n\n[snippets.card]\ntitle = \
		 \"Card\"\nview = \"card\"\n",
	)?;

	common::snippets_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("[card]inside[/card]")
		.assert()
		.success()
		.stdout("<section>inside</section>");

	Ok(())
}

#[test]
fn render_missing_config_file_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::snippets_cmd()
		.arg("render")
		.arg("--config")
		.arg(tmp.path().join("nope.toml"))
		.write_stdin("text")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("config file not found"));

	Ok(())
}

#[test]
fn render_invalid_config_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("snippets.toml"), "[snippets.note\n")?;

	common::snippets_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("text")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn render_unknown_view_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("snippets.toml"),
		"[snippets.note]\ntitle = \"Note\"\nview = \"alert\"\n",
	)?;

	common::snippets_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("text")
		.assert()
		.code(2)
		.stderr(predicates::str::contains(
			"snippet `note` refers to unknown view `alert`",
		));

	Ok(())
}

#[test]
fn render_missing_input_file_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	common::snippets_cmd()
		.arg("render")
		.arg(tmp.path().join("missing.md"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2);

	Ok(())
}

#[test]
fn render_verbose_logs_registry() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	common::snippets_cmd()
		.arg("render")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.write_stdin("plain text")
		.assert()
		.success()
		.stdout("plain text")
		.stderr(predicates::str::contains("built snippet registry"));

	Ok(())
}

#[test]
fn no_subcommand_prints_usage_hint() {
	common::snippets_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));
}
