//! CSV rendering of the event stream.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use super::sink::EventSink;
use crate::error::SimResult;
use crate::sims::record::{EventRecord, RunSummary};

/// Writes one CSV row per triggered event, header taken from the record
/// field names.
pub struct CsvEventWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl CsvEventWriter<File> {
    pub fn create(path: impl AsRef<Path>) -> SimResult<Self> {
        debug!("Opening event output {}", path.as_ref().display());
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> CsvEventWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            rows: 0,
        }
    }

    /// Number of rows written so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn flush(&mut self) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> SimResult<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> EventSink for CsvEventWriter<W> {
    fn record(&mut self, event: &EventRecord) -> SimResult<()> {
        self.writer.serialize(event)?;
        self.rows += 1;
        Ok(())
    }

    fn summary(&mut self, _summary: &RunSummary) -> SimResult<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sims::record::{MC_RUN_NUMBER, MC_STATUS_OK};

    fn record(event_number: u64, elapsed_time: f64, delta_time: f64) -> EventRecord {
        EventRecord {
            run_number: MC_RUN_NUMBER,
            event_number,
            status_code: MC_STATUS_OK,
            seconds: elapsed_time as u64,
            nanoseconds: 0,
            elapsed_time,
            delta_time,
            theta: 0.25,
            phi: 1.5,
            x_top: 1.0,
            y_top: -2.0,
            x_bottom: 3.0,
            y_bottom: -4.0,
            track_length: 82.5,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let mut writer = CsvEventWriter::new(Vec::new());
        writer.record(&record(3, 1.0, 0.0)).unwrap();
        writer.record(&record(9, 2.0, 1.0)).unwrap();
        assert_eq!(writer.rows(), 2);

        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("RunNumber,EventNumber,StatusCode,Seconds,Nanoseconds"));
        assert!(header.contains("DeltaTime"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_rows_read_back() {
        let mut writer = CsvEventWriter::new(Vec::new());
        let original = record(42, 5.0, 0.75);
        writer.record(&original).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let parsed: Vec<EventRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(parsed, vec![original]);
    }
}
