//! Dialog CLI - walk a guided conversation in the terminal.
//!
//! Options are picked by number; an option id can also be typed directly.
//! `b` steps back, `r` starts over and `q` quits.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::info;
use tracing_subscriber::EnvFilter;

use content_graph::{ContentGraph, BACK_ID};
use dialog_core::{EngineConfig, NavigationState, Navigator, RenderInstruction};

#[derive(Parser, Debug)]
#[command(name = "dialog", version, about = "Walk a guided conversation in the terminal")]
struct Cli {
    /// Content graph JSON; the bundled content is used when omitted
    #[arg(long)]
    content: Option<PathBuf>,

    /// Engine configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print each instruction as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Check that every option reference resolves, then exit
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let graph = match &cli.content {
        Some(path) => ContentGraph::load(path, &config.root_id)
            .with_context(|| format!("failed to load content {}", path.display()))?,
        None => ContentGraph::bundled().context("bundled content is malformed")?,
    };

    if cli.check {
        return check(&graph);
    }

    let navigator = Navigator::new(Arc::new(graph), config)?;
    run(&navigator, cli.json)
}

fn check(graph: &ContentGraph) -> Result<()> {
    println!(
        "{} nodes, {} reachable from '{}'",
        graph.len(),
        graph.reachable().len(),
        graph.root_id()
    );

    let dangling = graph.dangling_references();
    if dangling.is_empty() {
        println!("all option references resolve");
        return Ok(());
    }
    for reference in &dangling {
        println!("unresolved: {}", reference);
    }
    anyhow::bail!("{} unresolved option reference(s)", dangling.len())
}

fn run(navigator: &Navigator, json: bool) -> Result<()> {
    let mut state = NavigationState::new();
    info!(conversation = %state.id(), "conversation opened");

    let mut out = io::stdout().lock();
    let mut lines = io::stdin().lock().lines();

    let mut instruction = navigator.start(&mut state);
    show(&mut out, &instruction, json)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        let next = match input {
            "" => continue,
            "q" | "quit" => break,
            "r" | "reset" => navigator.reset(&mut state),
            "b" => {
                state.record_user_turn("Back");
                think(&mut out, navigator, json)?;
                navigator.handle_selection(&mut state, BACK_ID, &instruction.context)
            }
            _ => match input.parse::<usize>() {
                Ok(number) => {
                    let Some(option) = number
                        .checked_sub(1)
                        .and_then(|index| instruction.options.get(index))
                        .cloned()
                    else {
                        writeln!(
                            out,
                            "Pick a number between 1 and {}, or b, r, q.",
                            instruction.options.len()
                        )?;
                        continue;
                    };
                    think(&mut out, navigator, json)?;
                    navigator.choose(&mut state, &option, &instruction.context)
                }
                Err(_) => {
                    state.record_user_turn(input);
                    think(&mut out, navigator, json)?;
                    navigator.handle_selection(&mut state, input, &instruction.context)
                }
            },
        };

        instruction = next;
        show(&mut out, &instruction, json)?;
    }

    info!(
        conversation = %state.id(),
        turns = state.transcript().len(),
        "conversation closed"
    );
    Ok(())
}

/// Placeholder shown while the response is "composed".
fn think(out: &mut impl Write, navigator: &Navigator, json: bool) -> io::Result<()> {
    let delay = navigator.config().thinking_delay();
    if json || delay.is_zero() {
        return Ok(());
    }
    write!(out, "…")?;
    out.flush()?;
    thread::sleep(delay);
    write!(out, "\r \r")
}

fn show(out: &mut impl Write, instruction: &RenderInstruction, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(instruction)?)?;
        return Ok(());
    }

    writeln!(out)?;
    if let Some(notice) = &instruction.notice {
        writeln!(out, "{}\n", notice.plain_text())?;
    }
    if let Some(message) = &instruction.message {
        writeln!(out, "{}", message.plain_text())?;
    }
    writeln!(out)?;
    for (index, option) in instruction.options.iter().enumerate() {
        writeln!(out, "  {}. {}", index + 1, option.display_label())?;
    }
    Ok(())
}
