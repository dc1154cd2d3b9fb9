use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render shortcode style snippet tags in text.",
	long_about = "snippets replaces tags such as `[note level=info]Mind the gap[/note]` or \
	              `[clock/]` with the output of the view registered for the snippet.\n\nSnippets \
	              and their views are declared in `snippets.toml`.\n\nQuick start:\n  snippets \
	              render page.md  Render a file to stdout\n  snippets check page.md   Report \
	              unclosed and unknown tags\n  snippets list            Show registered snippets"
)]
pub struct SnippetsCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Config discovery and view files
	/// are relative to it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Path to a config file, skipping discovery.
	#[arg(long, short, global = true)]
	pub config: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render every snippet tag in a file.
	///
	/// Reads the file (or stdin when no file or `-` is given), replaces each
	/// tag with the output of its view and prints the result. Unclosed tags
	/// and tags without a registered snippet are replaced with an inline
	/// error block.
	Render {
		/// The file to render. Reads stdin when omitted or `-`.
		file: Option<PathBuf>,

		/// Write the rendered text to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,

		/// Exit with a non-zero status code when any tag was unclosed or
		/// unregistered. The rendered output is still written.
		#[arg(long, default_value_t = false)]
		strict: bool,
	},
	/// Check files for unclosed and unregistered snippet tags.
	///
	/// No view is run, so this is safe to use in CI. Exits with a non-zero
	/// status code when problems are found.
	Check {
		/// Files to check. Reads stdin when none are given.
		files: Vec<PathBuf>,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations that appear inline on PRs.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the registered snippets with their titles and views.
	List {
		/// Output format for the list. `json` includes each snippet's schema.
		#[arg(long, value_enum, default_value_t = ListOutputFormat::Text)]
		format: ListOutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each problem includes the
	/// file, position, snippet name and message.
	Json,
	/// GitHub Actions annotation format. Emits `::error` annotations that
	/// appear inline on pull request diffs.
	Github,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListOutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
