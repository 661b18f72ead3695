//! Themer CLI - applies a theme pack to a console UI archive.
//!
//! This is the main entry point for the themer command-line application.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

use themer::layout::LayoutPatch;
use themer::sarc::SarcArchive;
use themer::{Error, PatchOptions, PatchTemplate, Reporter, Stage, ThemePatcher};

/// Themer - applies theme packs to console UI archives
#[derive(Parser)]
#[command(name = "themer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Theme pack (SZS holding image.dds and optionally layout.json)
    theme: PathBuf,

    /// Archive to patch
    target: PathBuf,

    /// Directory the patched archive is written to
    #[arg(short, long, env = "THEMER_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Yaz0 compression level
    #[arg(short, long, env = "THEMER_COMPRESSION_LEVEL", default_value_t = themer::DEFAULT_COMPRESSION_LEVEL,
          value_parser = clap::value_parser!(u8).range(0..=9))]
    level: u8,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                eprintln!("{e}");
            }
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::from(1);
    }

    let mut reporter = ConsoleReporter::default();
    match run(&cli, &mut reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.fail();
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    // Only initialize logging if verbose or RUST_LOG is set
    if verbose || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive(if verbose { "themer=debug".parse()? } else { "themer=warn".parse()? }),
            )
            .init();
    }
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

fn run(cli: &Cli, reporter: &mut ConsoleReporter) -> Result<(), Error> {
    let start = Instant::now();
    let theme = read(&cli.theme)?;
    let target = read(&cli.target)?;

    let patcher = ThemePatcher::new(PatchOptions {
        compression_level: cli.level,
    });
    let output = patcher.patch(&theme, &target, reporter)?;

    let path = cli.output_dir.join(output.file_name());
    write_atomic(&cli.output_dir, &path, &output.data)?;

    println!("Written {} ({} bytes) in {:?}", path.display(), output.data.len(), start.elapsed());
    println!("DONE !");
    Ok(())
}

/// Write through a temporary file in `dir`, then rename it over `path`.
///
/// A failed write leaves any existing file at `path` untouched.
fn write_atomic(dir: &Path, path: &Path, data: &[u8]) -> Result<(), Error> {
    let access = |source: io::Error| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(access)?;
    file.write_all(data).map_err(access)?;
    file.as_file().sync_all().map_err(access)?;
    file.persist(path).map_err(|e| access(e.error))?;
    Ok(())
}

/// Prints run progress to stdout.
#[derive(Default)]
struct ConsoleReporter {
    /// A progress line was started and awaits its outcome.
    open_line: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    fn begin(&mut self, text: &str) {
        print!("{text}");
        io::stdout().flush().ok();
        self.open_line = true;
    }

    fn end(&mut self, text: &str) {
        if self.open_line {
            println!("{text}");
            self.open_line = false;
        }
    }

    /// Close any pending progress after a failed run.
    fn fail(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.end("FAIL");
    }
}

impl Reporter for ConsoleReporter {
    fn archive_opened(&mut self, archive: &SarcArchive, decompressed_size: usize) {
        println!("Opened SARC:");
        println!("DecSize: {decompressed_size}");
        println!("Endianness: {:?}", archive.endian());
        println!("Hash only: {}", archive.is_hash_only());
        println!("Files:");
        for file in archive.iter() {
            println!("{} : {} Bytes", file.name, file.data.len());
        }
        println!();
    }

    fn template_found(&mut self, template: &PatchTemplate) {
        println!(
            "Found target: {} for {} [{}]",
            template.template_name, template.firmware_name, template.target_file_name
        );
    }

    fn stage_started(&mut self, stage: Stage) {
        match stage {
            Stage::BackgroundLayout => self.begin("Patching BG layout....."),
            Stage::Texture => self.begin("Injecting DDS......"),
            Stage::Overlay => println!("Patching layout"),
        }
    }

    fn stage_finished(&mut self, stage: Stage) {
        match stage {
            Stage::Overlay => println!("Patch applied"),
            _ => self.end("OK"),
        }
    }

    fn overlay_loaded(&mut self, patch: &LayoutPatch) {
        println!("Using patch {} by {}", patch.patch_name, patch.author_name);
        self.begin("Checking compatibility.....");
    }

    fn compatibility_checked(&mut self) {
        self.end("OK");
    }

    fn repacking(&mut self) {
        println!("Repacking sarc...");
    }

    fn compressing(&mut self) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
            spinner.set_style(style);
        }
        spinner.set_message("compressing...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn compressed(&mut self, size: usize) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("compressed to {size} bytes"));
        }
    }
}
