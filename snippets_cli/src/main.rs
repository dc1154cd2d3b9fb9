use std::convert::Infallible;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use snippets_cli::Commands;
use snippets_cli::ListOutputFormat;
use snippets_cli::OutputFormat;
use snippets_cli::SnippetsCli;
use snippets_core::Arguments;
use snippets_core::FnResolver;
use snippets_core::RequestContext;
use snippets_core::SnippetError;
use snippets_core::SnippetRegistry;
use snippets_core::TagDiagnostic;
use snippets_core::config::SnippetsConfig;
use snippets_core::render_with_diagnostics;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "SNIPPETS_LOG";
const STDIN_LABEL: &str = "<stdin>";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SnippetsCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Render {
			file,
			output,
			strict,
		}) => run_render(&args, file.as_deref(), output.as_deref(), *strict),
		Some(Commands::Check { files, format }) => run_check(&args, files, *format),
		Some(Commands::List { format }) => run_list(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `snippets --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<SnippetError>() {
			Ok(snippet_err) => {
				let report: miette::Report = (*snippet_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `SNIPPETS_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let fallback = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(std::io::stderr)
				.with_ansi(use_color)
				.with_target(false),
		)
		.with(filter)
		.try_init()
		.ok();
}

fn resolve_root(args: &SnippetsCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Build the registry from the explicit or discovered config. Without a
/// config no snippet is registered.
fn load_registry(
	args: &SnippetsCli,
) -> Result<(SnippetRegistry, RequestContext), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	let config = match &args.config {
		Some(path) => {
			if !path.is_file() {
				return Err(format!("config file not found: {}", path.display()).into());
			}
			Some(SnippetsConfig::load_from(path)?)
		}
		None => SnippetsConfig::load(&root)?,
	};

	let Some(config) = config else {
		tracing::warn!(root = %root.display(), "no config file found, no snippets are registered");
		return Ok((SnippetRegistry::new(), RequestContext::default()));
	};

	let registry = config.build_registry(&root)?;
	tracing::debug!(snippets = registry.len(), "built snippet registry");

	Ok((registry, config.request))
}

/// Text read from a file or stdin, with a label for messages.
struct Input {
	label: String,
	text: String,
}

impl Input {
	fn read(file: Option<&Path>) -> std::io::Result<Self> {
		match file {
			Some(path) if path != Path::new("-") => {
				Ok(Self {
					label: path.display().to_string(),
					text: std::fs::read_to_string(path)?,
				})
			}
			_ => {
				Ok(Self {
					label: STDIN_LABEL.to_string(),
					text: std::io::read_to_string(std::io::stdin())?,
				})
			}
		}
	}
}

fn run_render(
	args: &SnippetsCli,
	file: Option<&Path>,
	output: Option<&Path>,
	strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let (registry, context) = load_registry(args)?;
	let input = Input::read(file)?;

	let rendered = render_with_diagnostics(&input.text, &mut registry.resolver(&context))?;

	if let Some(path) = output {
		std::fs::write(path, &rendered.output)?;
		tracing::debug!(path = %path.display(), "wrote rendered output");
	} else {
		let mut stdout = std::io::stdout().lock();
		stdout.write_all(rendered.output.as_bytes())?;
		stdout.flush()?;
	}

	if strict && !rendered.is_clean() {
		for diagnostic in &rendered.diagnostics {
			eprintln!(
				"{} {}:{}:{}: {diagnostic}",
				colored!("error:", red),
				input.label,
				diagnostic.line(),
				diagnostic.column()
			);
		}
		process::exit(1);
	}

	Ok(())
}

/// A tag problem in a checked file.
#[derive(Debug, Serialize)]
struct Problem {
	file: String,
	line: usize,
	column: usize,
	name: String,
	kind: &'static str,
	message: String,
}

impl Problem {
	fn new(file: &str, diagnostic: &TagDiagnostic) -> Self {
		Self {
			file: file.to_string(),
			line: diagnostic.line(),
			column: diagnostic.column(),
			name: diagnostic.name().to_string(),
			kind: diagnostic.kind(),
			message: diagnostic.to_string(),
		}
	}
}

fn run_check(
	args: &SnippetsCli,
	files: &[PathBuf],
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let (registry, _) = load_registry(args)?;

	let inputs = if files.is_empty() {
		vec![Input::read(None)?]
	} else {
		files
			.iter()
			.map(|file| Input::read(Some(file.as_path())))
			.collect::<std::io::Result<Vec<_>>>()?
	};

	// Only registration matters here, so no view is run.
	let mut resolver = FnResolver(|name: &str, _: &Arguments| {
		Ok::<_, Infallible>(registry.contains(name).then(String::new))
	});

	let mut problems = Vec::new();
	for input in &inputs {
		let Ok(rendered) = render_with_diagnostics(&input.text, &mut resolver);
		problems.extend(
			rendered
				.diagnostics
				.iter()
				.map(|diagnostic| Problem::new(&input.label, diagnostic)),
		);
	}

	if problems.is_empty() {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"problems\":[]}}");
			}
			OutputFormat::Github => {
				println!("All snippet tags are valid.");
			}
			OutputFormat::Text => {
				println!(
					"{}",
					colored!("Check passed: all snippet tags are valid.", green)
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let output = serde_json::json!({
				"ok": false,
				"problems": problems,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for problem in &problems {
				println!(
					"::error file={},line={},col={}::{}",
					problem.file, problem.line, problem.column, problem.message
				);
			}
			eprintln!("{}", check_summary(&problems, inputs.len()));
		}
		OutputFormat::Text => {
			eprintln!("{}", colored!("Check failed.", red));
			for problem in &problems {
				eprintln!(
					"  {}:{}:{}: {}",
					problem.file, problem.line, problem.column, problem.message
				);
			}
			eprintln!();
			eprintln!("{}", check_summary(&problems, inputs.len()));
		}
	}

	process::exit(1);
}

fn check_summary(problems: &[Problem], files: usize) -> String {
	let unclosed = problems
		.iter()
		.filter(|problem| problem.kind == "unclosed")
		.count();

	format!(
		"{} problem(s) in {files} file(s): {unclosed} unclosed, {} unregistered",
		problems.len(),
		problems.len() - unclosed
	)
}

fn run_list(
	args: &SnippetsCli,
	format: ListOutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let (registry, _) = load_registry(args)?;

	if let ListOutputFormat::Json = format {
		let snippets: Vec<_> = registry.snippets().collect();
		println!("{}", serde_json::to_string_pretty(&snippets)?);
		return Ok(());
	}

	if registry.is_empty() {
		println!("No snippets registered.");
		return Ok(());
	}

	println!("{}", colored!("Snippets:", bold));
	for snippet in registry.snippets() {
		println!(
			"  {} {:?} (view: {})",
			snippet.name, snippet.title, snippet.view
		);
	}
	println!("\n{} snippet(s)", registry.len());

	Ok(())
}
