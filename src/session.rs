//! Per-tool session state.
//!
//! A [`ToolSession`] owns one source raster and at most one result. Every preview or result
//! blob is published through an [`ObjectUrlRegistry`] and released exactly once: when a newer
//! URL supersedes it, when a new source is loaded, or when the session is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::analysis::palette::{Palette, extract_palette};
use crate::codec::decode::decode_image_with_mime;
use crate::codec::encode::{OutputFormat, encode};
use crate::effects::text::TextRenderer;
use crate::foundation::core::Raster;
use crate::foundation::error::{RasterkitError, RasterkitResult};
use crate::ops::Operation;
use crate::units::format_file_size;

/// Handle to a published blob, e.g. `blob:rasterkit/3`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// The URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A published blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    /// MIME type.
    pub mime: String,
    /// Encoded bytes.
    pub bytes: Arc<[u8]>,
}

/// Creation and release counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ObjectUrlStats {
    /// URLs handed out.
    pub created: u64,
    /// URLs released.
    pub released: u64,
    /// URLs still live.
    pub live: usize,
    /// Bytes held by live URLs.
    pub live_bytes: usize,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_id: u64,
    blobs: HashMap<ObjectUrl, Blob>,
    stats: ObjectUrlStats,
}

/// Shared table of live object URLs. Clones refer to the same table.
#[derive(Clone, Debug, Default)]
pub struct ObjectUrlRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl ObjectUrlRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish `bytes` and return a fresh URL.
    pub fn create(&self, bytes: Vec<u8>, mime: &str) -> ObjectUrl {
        let mut st = self.lock();
        st.next_id += 1;
        let url = ObjectUrl(format!("blob:rasterkit/{}", st.next_id));
        st.stats.created += 1;
        st.stats.live += 1;
        st.stats.live_bytes += bytes.len();
        st.blobs.insert(
            url.clone(),
            Blob {
                mime: mime.to_string(),
                bytes: bytes.into(),
            },
        );
        tracing::debug!(%url, mime, "object url created");
        url
    }

    /// Look up a live URL.
    pub fn resolve(&self, url: &ObjectUrl) -> Option<Blob> {
        self.lock().blobs.get(url).cloned()
    }

    /// Release `url`. Returns `false` if it was not live.
    pub fn release(&self, url: &ObjectUrl) -> bool {
        let mut st = self.lock();
        let Some(blob) = st.blobs.remove(url) else {
            tracing::warn!(%url, "release of unknown object url");
            return false;
        };
        st.stats.released += 1;
        st.stats.live -= 1;
        st.stats.live_bytes -= blob.bytes.len();
        tracing::debug!(%url, "object url released");
        true
    }

    /// Current counters.
    pub fn stats(&self) -> ObjectUrlStats {
        self.lock().stats.clone()
    }
}

/// The latest successful output of a session.
#[derive(Clone, Debug)]
pub struct SessionResult {
    /// Processed pixels.
    pub raster: Raster,
    /// Encoded format.
    pub format: OutputFormat,
    /// URL of the encoded bytes.
    pub url: ObjectUrl,
    /// Encoded size.
    pub encoded_len: usize,
}

impl SessionResult {
    /// Human-readable encoded size, e.g. `"1.5 KB"`.
    pub fn size_label(&self) -> String {
        format_file_size(self.encoded_len as u64)
    }
}

/// State of one tool instance: source image, latest result, URLs, and the processing flag.
#[derive(Debug)]
pub struct ToolSession {
    urls: ObjectUrlRegistry,
    fonts: TextRenderer,
    format: OutputFormat,
    quality: Option<f32>,
    source: Option<Raster>,
    source_len: usize,
    preview_url: Option<ObjectUrl>,
    result: Option<SessionResult>,
    processing: bool,
    last_error: Option<String>,
}

impl ToolSession {
    /// New idle session publishing into `urls`.
    pub fn new(urls: ObjectUrlRegistry, fonts: TextRenderer) -> Self {
        Self {
            urls,
            fonts,
            format: OutputFormat::default(),
            quality: None,
            source: None,
            source_len: 0,
            preview_url: None,
            result: None,
            processing: false,
            last_error: None,
        }
    }

    /// Set the encoding used for results.
    pub fn with_output(mut self, format: OutputFormat, quality: Option<f32>) -> Self {
        self.format = format;
        self.quality = quality;
        self
    }

    /// Load a new source from file bytes.
    ///
    /// On success the previous source, preview URL and result are discarded. On failure the
    /// session is left as it was.
    #[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
    pub fn load_source(&mut self, bytes: &[u8]) -> RasterkitResult<()> {
        let (mime, raster) = match decode_image_with_mime(bytes) {
            Ok(v) => v,
            Err(err) => return Err(self.record(err)),
        };
        self.clear_result();
        if let Some(url) = self.preview_url.take() {
            self.urls.release(&url);
        }
        self.preview_url = Some(self.urls.create(bytes.to_vec(), mime.mime()));
        self.source = Some(raster);
        self.source_len = bytes.len();
        self.last_error = None;
        Ok(())
    }

    /// Apply `op` to the source and publish the encoded result.
    ///
    /// `processing` is reset on every outcome. A failure leaves the previous result in place.
    #[tracing::instrument(skip_all, fields(op = op.name()))]
    pub fn run(&mut self, op: &Operation) -> RasterkitResult<&SessionResult> {
        let Some(source) = self.source.as_ref() else {
            return Err(self.record(RasterkitError::validation("no image loaded")));
        };
        self.processing = true;
        let outcome = op.apply(source, &self.fonts).and_then(|raster| {
            let bytes = encode(&raster, self.format, self.quality)?;
            Ok((raster, bytes))
        });
        self.processing = false;

        let (raster, bytes) = match outcome {
            Ok(v) => v,
            Err(err) => return Err(self.record(err)),
        };
        self.clear_result();
        let encoded_len = bytes.len();
        let url = self.urls.create(bytes, self.format.mime());
        self.last_error = None;
        Ok(self.result.insert(SessionResult {
            raster,
            format: self.format,
            url,
            encoded_len,
        }))
    }

    /// Dominant colors of the current source.
    pub fn palette(&mut self, num_colors: usize) -> RasterkitResult<Palette> {
        let Some(source) = self.source.as_ref() else {
            return Err(self.record(RasterkitError::validation("no image loaded")));
        };
        extract_palette(source, num_colors).map_err(|err| self.record(err))
    }

    /// Drop source, result and all URLs.
    pub fn reset(&mut self) {
        self.clear_result();
        if let Some(url) = self.preview_url.take() {
            self.urls.release(&url);
        }
        self.source = None;
        self.source_len = 0;
        self.last_error = None;
    }

    fn clear_result(&mut self) {
        if let Some(prev) = self.result.take() {
            self.urls.release(&prev.url);
        }
    }

    fn record(&mut self, err: RasterkitError) -> RasterkitError {
        tracing::warn!(%err, "operation failed");
        self.last_error = Some(err.user_message());
        err
    }

    /// Current source, if any.
    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    /// Size of the loaded source file in bytes.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Preview URL of the loaded source.
    pub fn preview_url(&self) -> Option<&ObjectUrl> {
        self.preview_url.as_ref()
    }

    /// Latest result.
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// `true` only while an operation is executing.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// User-facing message of the last failure, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl Drop for ToolSession {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
