// ============================================================================
// paint-engine CLI - headless replay of drawing actions
// ============================================================================
//
// Usage examples:
//   paint-engine --width 640 --height 480 --script strokes.json --output out.png
//   paint-engine -i photo.png -s fill.json -o filled.png --settings airbrush.json
//   paint-engine -i photo.png -s picks.json -v            (summary only, no output)
//
// Everything runs synchronously on the current thread.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use paint_engine::logger;
use paint_engine::ops::script::{self, ReplaySummary};
use paint_engine::{DrawingEngine, EngineSettings};

/// paint-engine headless runner.
///
/// Loads (or creates) a canvas, replays a JSON action script against it and
/// optionally writes the resulting buffer to an image file.
#[derive(Parser, Debug)]
#[command(
    name = "paint-engine",
    about = "Replay brush, airbrush, eraser, fill and picker actions on a raster canvas",
    long_about = "Replay a JSON action script against an RGBA canvas without a GUI.\n\n\
                  Example:\n  \
                  paint-engine --width 320 --height 240 --script strokes.json --output out.png"
)]
pub struct CliArgs {
    /// Source image. When omitted a blank opaque-white canvas is created.
    #[arg(short, long, value_name = "IMAGE")]
    pub input: Option<PathBuf>,

    /// Width of the blank canvas (ignored with --input).
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Height of the blank canvas (ignored with --input).
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// JSON action script to replay.
    #[arg(short, long, value_name = "SCRIPT.json")]
    pub script: Option<PathBuf>,

    /// JSON engine settings (tool defaults, history limit, RNG seed).
    #[arg(long, value_name = "SETTINGS.json")]
    pub settings: Option<PathBuf>,

    /// Write the final canvas here; the format follows the extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Session log file (truncated on each run).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Debug-level logging and a replay summary on stdout.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    match run_inner(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            // The session logger mirrors errors to stderr once installed
            if logger::log_path().is_some() {
                log::error!("{}", msg);
            } else {
                eprintln!("error: {}", msg);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &CliArgs) -> Result<(), String> {
    let settings = match &args.settings {
        Some(path) => EngineSettings::load(path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => EngineSettings::default(),
    };

    let mut engine = match &args.input {
        Some(path) => {
            let img = image::open(path)
                .map_err(|e| format!("{}: {}", path.display(), e))?
                .to_rgba8();
            DrawingEngine::from_image(img, &settings).map_err(|e| e.to_string())?
        }
        None => DrawingEngine::with_settings(args.width, args.height, &settings).map_err(|e| e.to_string())?,
    };
    engine.on_resize(|w, h| log::info!("canvas is now {}x{}", w, h));

    let start = Instant::now();
    let summary = match &args.script {
        Some(path) => {
            let actions = script::load_script(path).map_err(|e| format!("{}: {}", path.display(), e))?;
            script::replay(&mut engine, &actions).map_err(|e| format!("{}: {}", path.display(), e))?
        }
        None => ReplaySummary::default(),
    };
    let elapsed = start.elapsed();

    if args.verbose {
        print_summary(&engine, &summary, elapsed.as_secs_f64() * 1000.0);
    }

    if let Some(out) = &args.output {
        engine
            .buffer()
            .as_image()
            .save(out)
            .map_err(|e| format!("{}: {}", out.display(), e))?;
        log::info!("wrote {}", out.display());
    }
    Ok(())
}

fn print_summary(engine: &DrawingEngine, summary: &ReplaySummary, millis: f64) {
    let c = engine.color();
    println!("canvas        {}x{}", engine.width(), engine.height());
    println!("steps         {} ({:.1} ms)", summary.steps, millis);
    println!("painted       {} px", summary.painted_pixels);
    println!("filled        {} px", summary.filled_pixels);
    println!("picks         {}", summary.picks);
    println!(
        "history       {} undo / {} redo ({} misses), {} entries held, {} bytes",
        summary.undos,
        summary.redos,
        summary.history_misses,
        engine.history().undo_count() + engine.history().redo_count(),
        engine.history().memory_usage()
    );
    println!("active color  rgba({}, {}, {}, {})", c[0], c[1], c[2], c[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_fails_without_logger() {
        let args = CliArgs::try_parse_from([
            "paint-engine",
            "--width",
            "4",
            "--height",
            "4",
            "--script",
            "/nonexistent/paint-engine/actions.json",
        ])
        .unwrap();
        assert!(logger::log_path().is_none());
        assert_eq!(format!("{:?}", run(args)), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn blank_canvas_without_script_succeeds() {
        let args = CliArgs::try_parse_from(["paint-engine", "--width", "2", "--height", "3"]).unwrap();
        assert!(run_inner(&args).is_ok());
    }
}
