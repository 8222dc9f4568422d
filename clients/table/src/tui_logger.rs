use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record};

const CAPACITY: usize = 200;

pub type LogBuffer = Arc<Mutex<VecDeque<String>>>;

/// Routes log records into a buffer the log panel drains each frame.
pub struct TuiLogger {
    level: LevelFilter,
    buffer: LogBuffer,
}

impl TuiLogger {
    pub fn new(level: LevelFilter) -> (Self, LogBuffer) {
        let buffer: LogBuffer = Arc::new(Mutex::new(VecDeque::new()));
        (
            TuiLogger {
                level,
                buffer: buffer.clone(),
            },
            buffer,
        )
    }

    /// Install as the global logger.
    pub fn install(level: LevelFilter) -> Result<LogBuffer, log::SetLoggerError> {
        let (logger, buffer) = Self::new(level);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level);
        Ok(buffer)
    }
}

impl Log for TuiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = match record.level() {
            Level::Info => record.args().to_string(),
            level => format!("[{level}] {}", record.args()),
        };
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push_back(msg);
            if buffer.len() > CAPACITY {
                buffer.pop_front();
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<'a>(level: Level, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder().level(level).args(args).build()
    }

    #[test]
    fn test_filters_below_level() {
        let (logger, buffer) = TuiLogger::new(LevelFilter::Info);
        logger.log(&record(Level::Debug, format_args!("hidden")));
        logger.log(&record(Level::Info, format_args!("shown")));
        logger.log(&record(Level::Warn, format_args!("careful")));

        let lines: Vec<String> = buffer.lock().unwrap().iter().cloned().collect();
        assert_eq!(lines, vec!["shown".to_string(), "[WARN] careful".to_string()]);
    }

    #[test]
    fn test_buffer_is_bounded() {
        let (logger, buffer) = TuiLogger::new(LevelFilter::Info);
        for i in 0..CAPACITY + 10 {
            logger.log(&record(Level::Info, format_args!("line {i}")));
        }
        let buffer = buffer.lock().unwrap();
        assert_eq!(buffer.len(), CAPACITY);
        assert_eq!(buffer.front().map(String::as_str), Some("line 10"));
    }
}
