use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::error::FimtDdError;
use crate::streams::Stream;
use crate::streams::arff::parser::{is_comment_or_empty, parse_header, parse_instance_values};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Regression instances read from the data section of an ARFF file.
///
/// One parsed instance is held ahead of the caller, so `has_more_instances`
/// is exact. Rows that do not fit the header are logged and skipped while
/// looking ahead.
#[derive(Debug)]
pub struct ArffFileStream {
    path: PathBuf,
    header: Arc<InstanceHeader>,
    data_offset: u64,
    reader: BufReader<File>,
    lookahead: Option<DenseInstance>,
    skipped_rows: u64,
}

impl ArffFileStream {
    /// Opens `path` and reads its header. `target_index` defaults to the last
    /// attribute, which must be numeric.
    pub fn open(path: impl Into<PathBuf>, target_index: Option<usize>) -> Result<Self, FimtDdError> {
        let path = path.into();
        let mut reader = BufReader::new(File::open(&path)?);
        let (header, data_offset) =
            parse_header(&mut reader, target_index).map_err(|e| match e.kind() {
                ErrorKind::InvalidData => FimtDdError::Schema(e.to_string()),
                _ => FimtDdError::Io(e),
            })?;

        let mut stream = Self {
            path,
            header: Arc::new(header),
            data_offset,
            reader,
            lookahead: None,
            skipped_rows: 0,
        };
        stream.advance()?;
        Ok(stream)
    }

    /// Rows dropped since the last (re)start because they did not fit the header.
    pub fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }

    /// Reads rows until one parses or the data section ends.
    fn advance(&mut self) -> Result<(), Error> {
        self.lookahead = None;
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(());
            }
            if is_comment_or_empty(&line) {
                continue;
            }
            let row = line.trim();
            match parse_instance_values(&self.header, row) {
                Ok(values) => {
                    let header = Arc::clone(&self.header);
                    self.lookahead = Some(DenseInstance::new(header, values, 1.0));
                    return Ok(());
                }
                Err(e) => {
                    self.skipped_rows += 1;
                    warn!(path = %self.path.display(), row, error = %e, "skipping ARFF row");
                }
            }
        }
    }
}

impl Stream for ArffFileStream {
    fn header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    fn has_more_instances(&self) -> bool {
        self.lookahead.is_some()
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        let current = self.lookahead.take()?;
        if let Err(e) = self.advance() {
            warn!(path = %self.path.display(), error = %e, "ARFF stream stopped on read error");
        }
        Some(Box::new(current))
    }

    fn restart(&mut self) -> Result<(), Error> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        reader.seek(SeekFrom::Start(self.data_offset))?;
        self.reader = reader;
        self.skipped_rows = 0;
        self.advance()
    }
}
