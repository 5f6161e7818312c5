//! Log sink that appends to a file

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use iot_telemetry::LogSink;
use parking_lot::Mutex;

/// Appends `<epoch ms> <line>` to a log file
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn write(&self, line: &str) {
        let now = chrono::Utc::now().timestamp_millis();
        let mut file = self.file.lock();
        // Nowhere left to report a failed log write
        let _ = writeln!(file, "{} {}", now, line);
    }
}
