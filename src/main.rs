//! Command line front end for keeping anchored sections of Markdown files up to date.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use markdown_toolkit::{from_file, AnchorStyle, MarkdownDocument, MarkdownInjector};
use tracing_subscriber::EnvFilter;

/// Inject generated content between `markdown-toolkit` anchor comments.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Expect `start:` and `end:` sentinels instead of two identical ones.
    #[arg(long, global = true)]
    start_end: bool,

    /// Enable debug logging. `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the anchors found in a document.
    Anchors {
        /// Markdown file to scan.
        file: PathBuf,
    },

    /// Replace the content of one anchor.
    Inject {
        /// Markdown file to update.
        file: PathBuf,

        /// Anchor name or its normalised key.
        #[arg(short, long)]
        anchor: String,

        /// File to read the content from. Reads stdin when omitted.
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Wrap the content in a fenced code block with this info string.
        #[arg(short, long)]
        language: Option<String>,

        /// First line of `--source` to include, 1-based.
        #[arg(long, default_value_t = 1)]
        start: usize,

        /// Last line of `--source` to include.
        #[arg(long)]
        end: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove the content of one anchor, keeping its sentinels.
    Clear {
        /// Markdown file to update.
        file: PathBuf,

        /// Anchor name or its normalised key.
        #[arg(short, long)]
        anchor: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Fail instead of writing when the file is out of date.
    #[arg(long, conflicts_with = "stdout")]
    check: bool,

    /// Print the result instead of writing it back.
    #[arg(long)]
    stdout: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load(file: &Path, style: AnchorStyle) -> Result<MarkdownInjector> {
    MarkdownInjector::from_path(file, style)
        .with_context(|| format!("Failed to parse anchors in {}", file.display()))
}

fn finish(injector: &MarkdownInjector, file: &Path, output: &OutputArgs) -> Result<()> {
    let updated = injector.output();
    if output.stdout {
        print!("{updated}");
        return Ok(());
    }

    let current = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if current == updated {
        tracing::info!(file = %file.display(), "already up to date");
        return Ok(());
    }
    if output.check {
        bail!("{} is out of date", file.display());
    }
    injector
        .write_file(file)
        .with_context(|| format!("Failed to write {}", file.display()))
}

fn content(
    source: Option<&Path>,
    start: usize,
    end: Option<usize>,
    language: Option<&str>,
) -> Result<String> {
    let raw = match source {
        Some(path) => from_file(path, start, end)?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read content from stdin")?;
            buf
        }
    };

    let Some(language) = language else {
        return Ok(raw);
    };
    let mut doc = MarkdownDocument::new();
    {
        let mut block = doc.codeblock(language);
        for line in raw.lines() {
            block.add(line);
        }
    }
    Ok(doc.render())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let style = if cli.start_end {
        AnchorStyle::StartEnd
    } else {
        AnchorStyle::Paired
    };

    match cli.command {
        Commands::Anchors { file } => {
            let injector = load(&file, style)?;
            for anchor in injector.anchors() {
                let region = injector.region(anchor.name())?;
                let (start, end) = region.line_numbers();
                println!("{}\t{}\t{start}-{end}", anchor.name(), anchor.key());
            }
        }
        Commands::Inject {
            file,
            anchor,
            source,
            language,
            start,
            end,
            output,
        } => {
            let mut injector = load(&file, style)?;
            let text = content(source.as_deref(), start, end, language.as_deref())?;
            injector
                .set_value(&anchor, &text)
                .with_context(|| format!("Failed to inject into `{anchor}`"))?;
            finish(&injector, &file, &output)?;
        }
        Commands::Clear {
            file,
            anchor,
            output,
        } => {
            let mut injector = load(&file, style)?;
            injector
                .clear(&anchor)
                .with_context(|| format!("Failed to clear `{anchor}`"))?;
            finish(&injector, &file, &output)?;
        }
    }

    Ok(())
}
