use crate::utils::error::{InstallerError, Result};
use crate::utils::progress::Progress;
use flate2::read::GzDecoder;
use reqwest::{Client, StatusCode};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tar::Archive;
use tokio::sync::mpsc;

const CHUNK_BUFFER: usize = 32;

/// Downloads the release tarball and unpacks it while it streams in.
pub struct ReleaseFetcher {
    client: Client,
}

impl ReleaseFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch_and_extract(&self, url: &str, dest: &Path, progress: &Progress) -> Result<()> {
        progress.set_text("Looking for latest release...");
        tracing::debug!("Requesting release archive: {}", url);

        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Release response status: {}", status);

        if status != StatusCode::OK {
            return Err(InstallerError::RemoteNotFoundError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        progress.set_text("Install tarball found. Downloading...");

        let (tx, rx) = mpsc::channel::<io::Result<Vec<u8>>>(CHUNK_BUFFER);
        let target = dest.to_path_buf();
        let extractor =
            tokio::task::spawn_blocking(move || extract_tar_gz(ChunkReader::new(rx), &target));

        let mut stream_error = None;
        let mut received = 0usize;
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    received += chunk.len();
                    // 解壓端提早結束時，錯誤由 extractor 回報
                    if tx.send(Ok(chunk.to_vec())).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    let _ = tx.send(Err(io::Error::other(e.to_string()))).await;
                    stream_error = Some(e);
                    break;
                }
            }
        }
        drop(tx);

        let extracted = extractor
            .await
            .map_err(|e| InstallerError::ExtractionError {
                message: format!("extraction task failed: {}", e),
            })?;

        if let Some(e) = stream_error {
            return Err(InstallerError::HttpError(e));
        }
        let entries = extracted?;

        tracing::info!(
            "Extracted {} entries ({} bytes downloaded) into {}",
            entries,
            received,
            dest.display()
        );
        progress.set_text("Tarball extracted successfully.");
        Ok(())
    }
}

impl Default for ReleaseFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Unpacks a gzip-compressed tar stream into `dest`, returning the entry count.
pub fn extract_tar_gz<R: Read>(reader: R, dest: &Path) -> Result<usize> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut count = 0;

    let entries = archive
        .entries()
        .map_err(|e| extraction_error("failed to read tar entries", e))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| extraction_error("failed to read tar entry", e))?;
        // unpack_in 拒絕 ".." 之類跳出目錄的路徑
        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| extraction_error("failed to unpack entry", e))?;
        if unpacked {
            count += 1;
        } else {
            let path: PathBuf = entry.path().map(|p| p.into_owned()).unwrap_or_default();
            tracing::warn!("Skipped archive entry outside install dir: {}", path.display());
        }
    }

    Ok(count)
}

fn extraction_error(context: &str, e: io::Error) -> InstallerError {
    InstallerError::ExtractionError {
        message: format!("{}: {}", context, e),
    }
}

/// Blocking `Read` over chunks sent from the async download loop.
struct ChunkReader {
    rx: mpsc::Receiver<io::Result<Vec<u8>>>,
    current: Vec<u8>,
    pos: usize,
}

impl ChunkReader {
    fn new(rx: mpsc::Receiver<io::Result<Vec<u8>>>) -> Self {
        Self {
            rx,
            current: Vec::new(),
            pos: 0,
        }
    }
}

impl Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.current.len() {
            match self.rx.blocking_recv() {
                Some(Ok(chunk)) => {
                    self.current = chunk;
                    self.pos = 0;
                }
                Some(Err(e)) => return Err(e),
                None => return Ok(0),
            }
        }

        let n = buf.len().min(self.current.len() - self.pos);
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
