#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

mod options;
pub use options::*;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use icy_bitsy::{
    BitsyFont, ConversionPhase, ConversionProgress, ConversionTask, ConvertError, GenerationRequest, VectorFont, font_name_from_path, load_font,
    preview::{render_preview, save_png},
};
use semver::Version;

lazy_static::lazy_static! {
    pub static ref VERSION: Version = Version::parse(env!("CARGO_PKG_VERSION")).unwrap();
}

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(version, about = "Converts TTF/OTF fonts into bitsyfont bitmap fonts", long_about = None)]
pub struct Args {
    /// TTF or OTF font to convert
    #[arg(value_name = "FONT")]
    font: PathBuf,

    /// Output file (default: <name>.bitsyfont)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Font name written to the FONT line (default: file name up to the first '.')
    #[arg(long)]
    name: Option<String>,

    /// Font size in pixels
    #[arg(short, long, value_name = "PX")]
    size: Option<u32>,

    /// Luminance above this becomes white
    #[arg(long, value_name = "0-254")]
    min_white: Option<u8>,

    /// Luminance below this becomes black
    #[arg(long, value_name = "0-254")]
    max_black: Option<u8>,

    /// Only convert the characters of TEXT
    #[arg(long, value_name = "TEXT")]
    restrict: Option<String>,

    /// Only convert the characters found in FILE
    #[arg(long, value_name = "FILE", conflicts_with = "restrict")]
    restrict_file: Option<PathBuf>,

    /// Convert every glyph of the font, ignoring a configured restriction
    #[arg(long, default_value_t = false, conflicts_with_all = ["restrict", "restrict_file"])]
    all: bool,

    /// Render the sample text with the current thresholds into a PNG
    #[arg(long, value_name = "PNG")]
    preview: Option<PathBuf>,

    /// Sample text for --preview
    #[arg(long, value_name = "TEXT")]
    sample_text: Option<String>,

    /// Options file to use instead of the default one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Store the effective settings as new defaults
    #[arg(long, default_value_t = false)]
    save_options: bool,

    /// Parse the generated font again before writing it
    #[arg(long, default_value_t = false)]
    verify: bool,

    /// Don't print progress
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

impl Args {
    /// Overlay the command line on the loaded options.
    fn apply_to(&self, options: &mut Options) -> anyhow::Result<()> {
        if let Some(size) = self.size {
            options.font_size = size;
        }
        if let Some(min_white) = self.min_white {
            options.min_white = min_white;
        }
        if let Some(max_black) = self.max_black {
            options.max_black = max_black;
        }
        if let Some(text) = &self.restrict {
            options.restrict_text = Some(text.clone());
        }
        if let Some(path) = &self.restrict_file {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            options.restrict_text = Some(text);
        }
        if self.all {
            options.restrict_text = None;
        }
        if let Some(text) = &self.sample_text {
            options.sample_text.clone_from(text);
        }
        Ok(())
    }
}

fn init_logging() -> Option<LoggerHandle> {
    let logger = if let Some(log_dir) = Options::get_log_dir() {
        Logger::try_with_env_or_str("info").ok()?.log_to_file(
            FileSpec::default().directory(&log_dir).basename("bitsyconv").suffix("log").suppress_timestamp(),
        )
        .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
        .create_symlink(log_dir.join("bitsyconv.log"))
        .duplicate_to_stderr(flexi_logger::Duplicate::Warn)
    } else {
        eprintln!("Failed to create log file");
        Logger::try_with_env_or_str("warn").ok()?.log_to_stderr()
    };
    match logger.start() {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _logger = init_logging();
    log::info!("Starting bitsyconv {}", *VERSION);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(args));
    log::info!("Shutting down.");
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.downcast_ref::<ConvertError>().is_some_and(ConvertError::is_cancelled) => {
            eprintln!("Cancelled");
            ExitCode::from(130)
        }
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut options = match &args.config {
        Some(path) => Options::load_from(path),
        None => Options::load_options(),
    };
    args.apply_to(&mut options)?;
    if args.save_options {
        options.store_options();
    }

    let font = Arc::new(load_font(&args.font).with_context(|| format!("loading {}", args.font.display()))?);
    let name = args.name.clone().unwrap_or_else(|| font_name_from_path(&args.font));

    let mut request = GenerationRequest::new(font.clone())
        .with_font_size(options.font_size)
        .with_clamped_thresholds(options.min_white, options.max_black);
    if (request.min_white, request.max_black) != (options.min_white, options.max_black) {
        log::warn!(
            "thresholds adjusted to min-white {} / max-black {}",
            request.min_white,
            request.max_black
        );
    }
    if let Some(text) = &options.restrict_text {
        request = request.with_restrict(text.as_str());
    }
    request.validate()?;

    if let Some(path) = &args.preview {
        write_preview(&*font, &options, request.min_white, request.max_black, path)?;
    }

    let task = ConversionTask::spawn(name.clone(), request);
    let cancel = task.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling conversion");
            cancel.cancel();
        }
    });
    let reporter = (!args.quiet).then(|| tokio::spawn(report_progress(task.shared_progress())));

    let result = task.join().await;
    ctrl_c.abort();
    if let Some(reporter) = reporter {
        reporter.abort();
        eprintln!();
    }
    let text = result?;

    if args.verify {
        let font = BitsyFont::parse(&text).context("generated font does not parse")?;
        let (width, height) = font.size();
        log::info!("verified {} glyphs of {width}x{height}", font.glyphs.len());
    }

    let output = args.output.clone().unwrap_or_else(|| options.output_path(&name));
    fs::write(&output, &text).with_context(|| format!("writing {}", output.display()))?;
    log::info!("Wrote {} ({} bytes)", output.display(), text.len());
    Ok(())
}

fn write_preview<F: VectorFont + ?Sized>(font: &F, options: &Options, min_white: u8, max_black: u8, path: &Path) -> anyhow::Result<()> {
    let image = render_preview(font, &options.sample_text, options.font_size, min_white, max_black);
    save_png(&image, path).with_context(|| format!("writing preview {}", path.display()))?;
    log::info!("Wrote preview {} ({}x{})", path.display(), image.width(), image.height());
    Ok(())
}

async fn report_progress(progress: Arc<ConversionProgress>) {
    let mut interval = tokio::time::interval(PROGRESS_INTERVAL);
    loop {
        interval.tick().await;
        let phase = progress.phase();
        eprint!(
            "\r{phase:<10} {:>6}/{:<6} {:>3.0}%",
            progress.processed(),
            progress.total(),
            progress.fraction() * 100.0
        );
        let _ = std::io::stderr().flush();
        if phase == ConversionPhase::Finished {
            break;
        }
    }
}
