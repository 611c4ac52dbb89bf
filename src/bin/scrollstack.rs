use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

#[derive(Parser, Debug)]
#[command(name = "scrollstack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every card's transform at one scroll offset.
    Frame(FrameArgs),
    /// Replay a timed scroll trace and print per-frame writes as JSON lines.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct PageArgs {
    /// Stack configuration JSON (camelCase props). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page layout JSON (card heights, viewport). Nine 600px cards when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Scroll offset in pixels.
    #[arg(long, allow_negative_numbers = true)]
    scroll: f64,

    /// Print CSS `transform` / `filter` strings instead of raw values.
    #[arg(long)]
    css: bool,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Trace JSON: fps, frame count and timed input events.
    #[arg(long)]
    trace: PathBuf,

    /// Only print frames that wrote something or completed the stack.
    #[arg(long)]
    changes_only: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn load_page(args: &PageArgs) -> anyhow::Result<(scrollstack::StackConfig, scrollstack::sim::PageSpec)> {
    let config = match &args.config {
        Some(p) => read_json(p, "config")?,
        None => scrollstack::StackConfig::default(),
    };
    let page = match &args.layout {
        Some(p) => read_json(p, "layout")?,
        None => scrollstack::sim::PageSpec::default(),
    };
    Ok((config, page))
}

#[derive(serde::Serialize)]
struct CssRow {
    index: usize,
    visibility: &'static str,
    transform: String,
    filter: String,
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (config, page) = load_page(&args.page)?;
    let mut host = scrollstack::sim::PageLayout::new(page)?;
    let mut stack = scrollstack::ScrollStack::mount(config, &mut host)?;
    if !stack.is_active() {
        anyhow::bail!("stack did not mount (no cards or no scroll container)");
    }
    stack.scroll_to(args.scroll, true);
    stack.frame(&mut host, 0.0)?;

    let states = stack.desired_states(&host)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.css {
        let rows: Vec<CssRow> = states
            .iter()
            .enumerate()
            .map(|(index, s)| CssRow {
                index,
                visibility: s.visibility.as_css(),
                transform: s.transform_css(),
                filter: s.filter_css(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &rows)?;
    } else {
        serde_json::to_writer_pretty(&mut out, &states)?;
    }
    writeln!(out)?;
    out.flush()?;

    eprintln!(
        "scroll {} -> {} cards",
        host.scroll_top(),
        stack.card_count()
    );
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let (config, page) = load_page(&args.page)?;
    let trace: scrollstack::sim::ScrollTrace = read_json(&args.trace, "trace")?;
    let frames = scrollstack::sim::replay(config, page, &trace)?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut total_writes = 0usize;
    let mut completions = 0usize;
    for f in &frames {
        total_writes += f.writes.len();
        completions += usize::from(f.completed);
        if args.changes_only && f.writes.is_empty() && !f.completed {
            continue;
        }
        serde_json::to_writer(&mut out, f)?;
        writeln!(out)?;
    }
    out.flush()?;

    eprintln!(
        "replayed {} frames: {total_writes} writes, {completions} completions",
        frames.len()
    );
    Ok(())
}
