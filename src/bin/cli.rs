use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use audio_sniff::report::Reporter;

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[clap(about = "Detect audio container/codec and decode parameters")]
struct Opt {
    /// Files to probe
    #[clap(required = true)]
    files: Vec<PathBuf>,

    /// MIME type hint used when the content is not recognised
    #[clap(long)]
    mime: Option<String>,

    /// Log verbosity (RUST_LOG still applies per module)
    #[clap(long, value_enum, default_value = "warn")]
    loglevel: LogLevel,

    /// Single-line JSON instead of pretty-printed
    #[clap(long, default_value_t = false)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::from_default_env()
        .filter_level(opt.loglevel.to_level_filter())
        .format_timestamp_secs()
        .try_init()?;

    let mut reports = Vec::with_capacity(opt.files.len());
    for path in &opt.files {
        match Reporter::probe_file(path, opt.mime.as_deref()) {
            Ok(rep) => reports.push(rep),
            Err(e) => log::error!("{e:#}"),
        }
    }

    println!("{}", Reporter::to_json(&reports, !opt.compact)?);
    Ok(())
}
