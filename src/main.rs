use anyhow::{bail, Context, Result};
use scribble_canvas::paint::settings::CanvasSettings;
use scribble_canvas::paint::{export, settings_store, NullBroadcast, PaintCanvas, Role};
use std::path::PathBuf;

struct Args {
    events: PathBuf,
    output: PathBuf,
    settings: Option<PathBuf>,
    debug: bool,
}

fn print_usage() {
    println!("Usage: scribble-replay [OPTIONS] <EVENTS.jsonl> <OUTPUT.png>");
    println!();
    println!("Replays a recorded paint event log onto a spectator canvas and");
    println!("writes the resulting bitmap as a PNG.");
    println!();
    println!("Options:");
    println!("  --settings PATH   Canvas settings file (default: next to the executable)");
    println!("  --debug           Enable debug logging");
    println!("  --help            Show this help message");
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut settings = None;
    let mut debug = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" => debug = true,
            "--settings" => {
                let path = args.next().context("--settings needs a path")?;
                settings = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next()) {
        (Some(events), Some(output), None) => Ok(Args {
            events,
            output,
            settings,
            debug,
        }),
        _ => {
            print_usage();
            bail!("expected an event log and an output path");
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<CanvasSettings> {
    match path {
        Some(path) => Ok(settings_store::load_from_path(path)?.unwrap_or_default()),
        None => settings_store::load(),
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let settings = load_settings(args.settings.as_ref())?;
    scribble_canvas::logging::init(args.debug || settings.debug_logging, None);

    let mut canvas = PaintCanvas::from_settings(&settings, Role::Spectator, NullBroadcast)?;

    let log = std::fs::read_to_string(&args.events)
        .with_context(|| format!("read event log {}", args.events.display()))?;
    let mut applied = 0usize;
    let mut skipped = 0usize;
    for (line_no, line) in log.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match canvas.apply_remote_json(line) {
            Ok(()) => applied += 1,
            Err(err) => {
                skipped += 1;
                tracing::warn!(line = line_no + 1, "skipping event: {err:#}");
            }
        }
    }

    export::save_png(canvas.surface(), &args.output)?;
    tracing::info!(
        applied,
        skipped,
        output = %args.output.display(),
        "replay finished"
    );
    Ok(())
}
