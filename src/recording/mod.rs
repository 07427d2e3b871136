/*!
 * Session Recording
 * Records framed channel data of one session into a storage container
 *
 * Layout: one container per session id, one file per channel. Each
 * recorded payload becomes a frame: 4-byte big-endian length, then the
 * payload bytes.
 */

use bytes::{Buf, BufMut, Bytes, BytesMut};
use miette::Diagnostic;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::storage::{
    Container, File, FileOptions, FileSystem, StorageContext, StorageError, StorageResult,
};

/// Size of the frame length prefix
pub const FRAME_HEADER_LEN: usize = 4;

/// Errors raised while decoding a recorded channel
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum RecordingError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(#[from] StorageError),

    #[error("Truncated frame in {channel} at offset {offset}")]
    #[diagnostic(
        code(recording::truncated_frame),
        help("The recording ended mid-frame, usually after a failed write was not retried.")
    )]
    TruncatedFrame { channel: String, offset: usize },

    #[error("Payload of {0} bytes does not fit a frame")]
    #[diagnostic(code(recording::payload_too_large))]
    PayloadTooLarge(usize),
}

/// Records the channels of a single session
///
/// Channel files are created lazily on first use. The recorder never
/// retries a failed write; the error is handed back so the caller can decide.
pub struct SessionRecorder {
    session_id: String,
    container: Arc<dyn Container>,
    ctx: StorageContext,
    options: FileOptions,
    channels: Mutex<BTreeMap<String, Arc<dyn File>>>,
}

impl SessionRecorder {
    /// Open the session's container, creating it if it does not exist yet
    pub fn start(
        fs: &dyn FileSystem,
        ctx: StorageContext,
        session_id: &str,
        options: FileOptions,
    ) -> StorageResult<Self> {
        let container = match fs.open_container(&ctx, session_id) {
            Ok(container) => container,
            Err(StorageError::NotFound(_)) => match fs.new_container(&ctx, session_id) {
                Ok(container) => container,
                // Lost a race with another recorder for the same session
                Err(StorageError::AlreadyExists(_)) => fs.open_container(&ctx, session_id)?,
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e),
        };

        info!(session = %session_id, trace_id = %ctx.trace_id(), "Session recording started");
        Ok(Self {
            session_id: session_id.to_string(),
            container,
            ctx,
            options,
            channels: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Channels recorded so far, sorted
    pub fn channels(&self) -> Vec<String> {
        self.channels.lock().keys().cloned().collect()
    }

    /// Append one frame to `channel`; returns the number of bytes written
    pub fn record(&self, channel: &str, payload: &[u8]) -> Result<usize, RecordingError> {
        let frame = encode_frame(payload)?;
        let file = self.channel_file(channel)?;

        file.write(&frame).map_err(|e| {
            warn!(session = %self.session_id, channel, error = %e, "Frame write failed");
            RecordingError::from(e)
        })
    }

    fn channel_file(&self, channel: &str) -> StorageResult<Arc<dyn File>> {
        let mut channels = self.channels.lock();
        if let Some(file) = channels.get(channel) {
            return Ok(file.clone());
        }

        let file = self
            .container
            .open_file(&self.ctx, channel, self.options.clone())?;
        channels.insert(channel.to_string(), file.clone());
        debug!(session = %self.session_id, channel, "Channel opened");
        Ok(file)
    }

    /// Close every channel file, then the session container
    ///
    /// All closes are attempted; the first failure is returned.
    pub fn finish(self) -> StorageResult<()> {
        let mut first_err = None;

        for (channel, file) in self.channels.into_inner() {
            if let Err(e) = file.close() {
                warn!(session = %self.session_id, channel = %channel, error = %e, "Channel close failed");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }

        if let Err(e) = self.container.close() {
            warn!(session = %self.session_id, error = %e, "Session container close failed");
            if first_err.is_none() {
                first_err = Some(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => {
                info!(session = %self.session_id, "Session recording finished");
                Ok(())
            }
        }
    }
}

/// Encode one payload as a length-prefixed frame
pub fn encode_frame(payload: &[u8]) -> Result<Bytes, RecordingError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| RecordingError::PayloadTooLarge(payload.len()))?;
    let mut frame = BytesMut::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.put_u32(len);
    frame.put_slice(payload);
    Ok(frame.freeze())
}

/// Drain the unread bytes of a channel file and decode its frames
pub fn read_frames(file: &dyn File) -> Result<Vec<Bytes>, RecordingError> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);
    }

    let total = raw.len();
    let mut buf = Bytes::from(raw);
    let mut frames = Vec::new();

    while buf.has_remaining() {
        let offset = total - buf.remaining();
        if buf.remaining() < FRAME_HEADER_LEN {
            return Err(RecordingError::TruncatedFrame {
                channel: file.name().to_string(),
                offset,
            });
        }
        let len = buf.get_u32() as usize;
        if buf.remaining() < len {
            return Err(RecordingError::TruncatedFrame {
                channel: file.name().to_string(),
                offset,
            });
        }
        frames.push(buf.split_to(len));
    }

    Ok(frames)
}
