//! Multipart upload bodies with send-progress reporting

use crate::error::{ClientError, Result};
use futures_util::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

const CHUNK_SIZE: usize = 64 * 1024;

/// Progress callback, called with a whole percentage (0-100) of bytes sent
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// One file to upload
#[derive(Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: Option<String>,
    data: Arc<Vec<u8>>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            data: Arc::new(data),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, naming the part after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::InvalidRequest(format!("{}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Files sent as repeated parts under one form field
#[derive(Clone)]
pub struct MultipartUpload {
    pub field: String,
    pub files: Vec<UploadFile>,
    pub on_progress: Option<ProgressFn>,
}

impl fmt::Debug for MultipartUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartUpload")
            .field("field", &self.field)
            .field("files", &self.files)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl MultipartUpload {
    pub fn new(field: impl Into<String>, files: Vec<UploadFile>) -> Self {
        Self {
            field: field.into(),
            files,
            on_progress: None,
        }
    }

    pub fn with_progress(mut self, on_progress: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(on_progress));
        self
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.len() as u64).sum()
    }

    /// Build a fresh form. Each attempt gets its own so a retry can resend.
    pub(crate) fn to_form(&self) -> Result<Form> {
        let tracker = self
            .on_progress
            .as_ref()
            .map(|callback| Arc::new(ProgressTracker::new(self.total_bytes(), callback.clone())));

        let mut form = Form::new();
        for file in &self.files {
            let stream = chunk_stream(file.data.clone(), tracker.clone());
            let mut part = Part::stream_with_length(Body::wrap_stream(stream), file.len() as u64)
                .file_name(file.file_name.clone());
            if let Some(mime) = &file.mime {
                part = part.mime_str(mime).map_err(|e| {
                    ClientError::InvalidRequest(format!("bad mime type '{mime}': {e}"))
                })?;
            }
            form = form.part(self.field.clone(), part);
        }
        Ok(form)
    }
}

struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    last_reported: AtomicU8,
    callback: ProgressFn,
}

impl ProgressTracker {
    fn new(total: u64, callback: ProgressFn) -> Self {
        // 255 is never a valid percentage, so the first report always fires
        Self {
            total,
            sent: AtomicU64::new(0),
            last_reported: AtomicU8::new(u8::MAX),
            callback,
        }
    }

    fn advance(&self, bytes: usize) {
        let sent = self.sent.fetch_add(bytes as u64, Ordering::AcqRel) + bytes as u64;
        let percent = percent_of(sent, self.total);
        if self.last_reported.swap(percent, Ordering::AcqRel) != percent {
            (self.callback)(percent);
        }
    }
}

fn percent_of(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    (sent.min(total) * 100 / total) as u8
}

fn chunk_stream(
    data: Arc<Vec<u8>>,
    tracker: Option<Arc<ProgressTracker>>,
) -> impl Stream<Item = std::result::Result<Vec<u8>, std::io::Error>> + Send + Sync + 'static {
    let len = data.len();
    futures_util::stream::iter((0..len).step_by(CHUNK_SIZE)).map(move |start| {
        let end = (start + CHUNK_SIZE).min(len);
        if let Some(tracker) = &tracker {
            tracker.advance(end - start);
        }
        Ok(data[start..end].to_vec())
    })
}
