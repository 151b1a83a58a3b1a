//! Command line helpers shared by the binaries.

use log::LevelFilter;
use std::{path::PathBuf, time::SystemTime};

/// Arguments common to all bsdfio binaries.
#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to a TOML file overriding the default export configuration.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Whether to print any information to stdout.
    #[clap(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Whether to show the elapsed time since launch in the log messages.
    #[clap(long, global = true, default_value_t = false)]
    pub log_timestamp: bool,

    #[clap(
        long,
        global = true,
        default_value_t = 1,
        help = "Setting logging verbosity level (higher for more\ndetails)\n  0 - error\n  1 - \
                warn + error\n  2 - info + warn + error\n  3 - debug + info + warn + error\n  4 \
                - trace + debug + info + warn + error\n\x08",
        hide_default_value = true
    )]
    pub log_level: u8,
}

impl CommonArgs {
    /// Returns the effective log level: `--verbose` raises it to at least info.
    pub fn effective_log_level(&self) -> u8 {
        if self.verbose {
            self.log_level.max(2)
        } else {
            self.log_level
        }
    }
}

/// Parses the arguments, returns the arguments and the launch time.
///
/// # Arguments
///
/// * `name` - The name of the program.
pub fn parse_args<T: clap::Parser>(name: &str) -> (T, SystemTime) {
    let args = T::parse();
    let launch_time = SystemTime::now();
    log::info!(
        "{} launched at {} on {}.",
        name,
        chrono::DateTime::<chrono::Utc>::from(launch_time),
        std::env::consts::OS
    );

    (args, launch_time)
}

/// A filter for the logger.
///
/// This is a tuple of a module name and a log level filter.
pub type LogFilter<'a> = (&'a str, LevelFilter);

/// Initialises logging settings.
///
/// # Arguments
///
/// * `timestamp` - Whether to print the timestamp in the log; This is the base
///   time for the timestamp.
/// * `log_level` - The log level to filter. This is the top level log level for
///   the program. See [`log_filter_from_level`] for more details.
/// * `filters` - The filters to apply to the logger.
pub fn setup_logging(timestamp: Option<SystemTime>, log_level: u8, filters: &[LogFilter]) {
    use std::io::Write;
    let mut builder = env_logger::builder();
    builder.format(move |buf, record| {
        let top_level_module = record
            .module_path()
            .and_then(|path| path.split("::").next())
            .unwrap_or("bsdfio");
        match timestamp.and_then(|t| t.elapsed().ok()) {
            Some(duration) => {
                let millis = duration.as_millis() % 1000;
                let seconds = duration.as_secs() % 60;
                let minutes = (duration.as_secs() / 60) % 60;
                let hours = (duration.as_secs() / 60) / 60;
                writeln!(
                    buf,
                    "{}:{}:{}.{:03} {:5} [{}]: {}",
                    hours,
                    minutes,
                    seconds,
                    millis,
                    record.level(),
                    top_level_module,
                    record.args()
                )
            }
            None => {
                writeln!(
                    buf,
                    "{:5} [{}]: {}",
                    record.level(),
                    top_level_module,
                    record.args()
                )
            }
        }
    });
    builder.filter_level(log_filter_from_level(log_level));
    for (module, level) in filters {
        builder.filter(Some(module), *level);
    }
    builder.init();
}

/// Converts a log level to a log filter.
pub fn log_filter_from_level(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
