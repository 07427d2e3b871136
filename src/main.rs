/*!
 * Storage Demo - Main Entry Point
 *
 * Records a short demo session into the in-memory backend and prints the
 * resulting channel metadata as JSON. Configuration comes from the
 * environment (see `StorageConfig::from_env`).
 */

use anyhow::Context as _;
use tracing::info;

use session_storage::{
    init_tracing, read_frames, File, FileOptions, MemFS, SessionRecorder, StorageConfig,
    StorageContext,
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StorageConfig::from_env();
    info!(?config, "Storage demo starting");

    let fs = MemFS::from_config(&config);
    let ctx = StorageContext::new();
    let session_id = format!("sess-{}", &ctx.trace_id()[..8]);

    let recorder = SessionRecorder::start(&fs, ctx, &session_id, FileOptions::from_config(&config))
        .context("failed to start session recording")?;

    for (channel, payload) in [
        ("chan-0", "SSH-2.0-demo"),
        ("chan-1", "ls -la"),
        ("chan-0", "exit"),
    ] {
        recorder
            .record(channel, payload.as_bytes())
            .with_context(|| format!("failed to record frame on {}", channel))?;
    }

    let container = fs
        .mem_container(&session_id)
        .context("session container missing from root")?;

    for channel in recorder.channels() {
        let file = container
            .mem_file(&channel)
            .with_context(|| format!("channel {} missing", channel))?;
        let info = file.stat()?;
        let frames = read_frames(&*file)?;
        println!("{}", serde_json::to_string(&info)?);
        info!(channel = %channel, frames = frames.len(), size = info.size, "Channel recorded");
    }

    recorder.finish().context("failed to finish session recording")?;
    info!(session = %session_id, "Storage demo complete");
    Ok(())
}
