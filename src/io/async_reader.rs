//! Asynchronous CSV reader for fixture rows
//!
//! Streams rows of any deserializable shape out of a CSV source.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - tokio files bridged through `tokio-util` compat
//! - Batch reading so large fixture files are not pulled in one call
//!
//! Unlike a best-effort import, a fixture row that fails to parse aborts the
//! read: fixtures describe the whole world a command runs against.

use crate::types::FixtureError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use serde::de::DeserializeOwned;

/// Default number of rows per batch in [`AsyncReader::read_all`]
const READ_BATCH_SIZE: usize = 1024;

/// Asynchronous CSV reader
///
/// Tracks the line of the last row read so parse errors point back into the
/// file. Line 1 is the header.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    file: String,
    line: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    /// * `file` - Name used in error messages
    pub fn new(reader: R, file: impl Into<String>) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            file: file.into(),
            line: 1,
        }
    }

    /// Read up to `batch_size` rows
    ///
    /// # Returns
    ///
    /// The rows read, empty at end of input, or the first parse error.
    pub async fn read_batch<T>(&mut self, batch_size: usize) -> Result<Vec<T>, FixtureError>
    where
        T: DeserializeOwned + 'static,
    {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<T>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(row)) => {
                    self.line += 1;
                    batch.push(row);
                }
                Some(Err(e)) => {
                    return Err(FixtureError::parse(
                        &self.file,
                        Some(self.line + 1),
                        e.to_string(),
                    ))
                }
                None => break,
            }
        }

        Ok(batch)
    }

    /// Read every remaining row
    pub async fn read_all<T>(&mut self) -> Result<Vec<T>, FixtureError>
    where
        T: DeserializeOwned + 'static,
    {
        let mut rows = Vec::new();
        loop {
            let batch = self.read_batch::<T>(READ_BATCH_SIZE).await?;
            if batch.is_empty() {
                return Ok(rows);
            }
            rows.extend(batch);
        }
    }
}
