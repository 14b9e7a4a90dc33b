//! Tab-separated results sink
//!
//! The sink is the only writer of the results destination. Each call to
//! [`ResultSink::write_records`] formats one page's records into a single
//! buffer and writes it while holding the writer lock, so batches from
//! different pages never interleave.

use crate::HarvestError;
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// First line of every results file
pub const HEADER: &str = "Source URL\tFound link\n";

/// Serialized writer for (source, link) records
#[derive(Debug)]
pub struct ResultSink<W> {
    writer: Mutex<W>,
}

impl ResultSink<File> {
    /// Creates (or truncates) the results file at `path` and writes the header
    pub async fn create(path: &Path) -> Result<Self, HarvestError> {
        let destination_error = |source: std::io::Error| HarvestError::Destination {
            path: path.display().to_string(),
            source,
        };

        let file = File::create(path).await.map_err(destination_error)?;
        Self::new(file).await.map_err(destination_error)
    }
}

impl<W: AsyncWrite + Unpin> ResultSink<W> {
    /// Wraps `writer` and writes the header line to it
    pub async fn new(mut writer: W) -> std::io::Result<Self> {
        writer.write_all(HEADER.as_bytes()).await?;
        writer.flush().await?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Appends one record per link for `source`
    ///
    /// An empty link set writes nothing. Returns the number of records written.
    pub async fn write_records(
        &self,
        source: &str,
        links: &BTreeSet<String>,
    ) -> std::io::Result<usize> {
        if links.is_empty() {
            return Ok(0);
        }

        let batch = format_records(source, links);

        let mut writer = self.writer.lock().await;
        writer.write_all(batch.as_bytes()).await?;
        writer.flush().await?;
        drop(writer);

        tracing::info!("{} Wrote {} links.", source, links.len());
        Ok(links.len())
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Formats the records for one page, one `source\tlink\n` line per link
pub fn format_records(source: &str, links: &BTreeSet<String>) -> String {
    let mut batch = String::with_capacity(links.iter().map(|l| source.len() + l.len() + 2).sum());
    for link in links {
        batch.push_str(source);
        batch.push('\t');
        batch.push_str(link);
        batch.push('\n');
    }
    batch
}
