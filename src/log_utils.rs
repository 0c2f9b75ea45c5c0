use std::path::*;
use flexi_logger::*;

pub struct TimeLogger {
    start_time: std::time::Instant,
}

impl TimeLogger {
    pub fn start() -> TimeLogger {
        TimeLogger { start_time: std::time::Instant::now() }
    }

    pub fn log(self, text: &str) {
        let time = self.start_time.elapsed().as_secs_f64();
        log::debug!("BENCH {} time = {:.6} s", text, time);
    }
}

fn line_format(
    w:      &mut dyn std::io::Write,
    now:    &mut DeferredNow,
    record: &Record
) -> Result<(), std::io::Error> {
    write!(
        w, "[{}] {:<5} {}",
        now.format(TS_DASHES_BLANK_COLONS_DOT_BLANK),
        record.level(),
        record.args()
    )
}

/// Starts file logging into `log_path`. A new file is started every day
/// and only the last `keep_days` files are kept. The returned handle must
/// live as long as logging is needed.
pub fn start_logger(
    log_path:  &Path,
    level:     &str,
    keep_days: usize,
) -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_path)
                .basename(env!("CARGO_PKG_NAME"))
        )
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(keep_days),
        )
        .format(line_format)
        .print_message()
        .start()?;

    Ok(handle)
}
