use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use serde_json::json;
use tracing::{error, info, trace};

use crate::animation::{self, Animator, FrameRenderer, SvgFrameRenderer};
use crate::host::prelude::*;
use crate::render;

/// Title shown when the hand-off file cannot be read.
const ERROR_TITLE: &str = "Error";

/// Default location of the text the player-side writer maintains, relative
/// to the plugin's working directory.
const DISPLAY_FILE: &str = "data/display.txt";

/// Shows the contents of a hand-off text file (the "now playing" line) as
/// the title, plus a flip-book animation on the touch strip when the
/// instance sits on a dial.
pub struct NowPlayingAction {
    file_path: PathBuf,
    renderer: Arc<dyn FrameRenderer>,
    frame_delay: Duration,
    anim: Animator,
}

impl Default for NowPlayingAction {
    fn default() -> Self {
        Self::new(DISPLAY_FILE)
    }
}

impl NowPlayingAction {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            renderer: Arc::new(SvgFrameRenderer),
            frame_delay: animation::FRAME_DELAY,
            anim: Animator::default(),
        }
    }

    /// Substitute the frame renderer. Tests inject recording or failing ones.
    pub fn with_renderer(mut self, renderer: Arc<dyn FrameRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Substitute the pause between animation frames.
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Push the file contents (or the error marker) as the title. Read
    /// problems end up on the device instead of bubbling up.
    fn refresh_title(&self, cx: &Context, ctx_id: &str) {
        match read_display_file(&self.file_path) {
            Ok(content) => {
                info!(content = %content, "display file read");
                cx.sd().set_title(ctx_id, Some(content), None, None);
            }
            Err(err) => {
                error!(%err, "failed to read display file");
                cx.sd()
                    .set_title(ctx_id, Some(ERROR_TITLE.to_string()), None, None);
            }
        }
    }
}

impl ActionStatic for NowPlayingAction {
    const ID: &'static str = super::ids::NOW_PLAYING;
}

impl Action for NowPlayingAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn will_appear(&mut self, cx: &Context, ev: &incoming::WillAppear) {
        trace!(context = %ev.context, "will_appear");
        self.refresh_title(cx, &ev.context);

        // Dial slots get the touch-strip preview regardless of file state.
        if ev.is_encoder() {
            cx.sd()
                .set_feedback_layout(&ev.context, animation::CANVAS_LAYOUT);
            cx.sd().set_feedback(
                &ev.context,
                json!({ "title": "", "full-canvas": render::PREVIEW_FRAME }),
            );
        }
    }

    fn key_down(&mut self, cx: &Context, ev: &incoming::KeyDown) {
        trace!(context = %ev.context, "key_down");
        self.refresh_title(cx, &ev.context);
    }

    fn dial_rotate(&mut self, cx: &Context, ev: &incoming::DialRotate) {
        // Direction and tick count are ignored: any turn replays the fixed
        // sequence, and a turn mid-run restarts it.
        trace!(context = %ev.context, ticks = ev.ticks, "dial_rotate");
        self.anim
            .start(cx, &ev.context, Arc::clone(&self.renderer), self.frame_delay);
    }

    fn will_disappear(&mut self, _cx: &Context, ev: &incoming::WillDisappear) {
        trace!(context = %ev.context, "will_disappear");
        self.anim.cancel();
    }

    fn teardown(&mut self, _cx: &Context, _ctx_id: &str) {
        self.anim.cancel();
    }
}

// ── Display file ────────────────────────────────────────────────────────────

/// Read and trim the hand-off file.
///
/// The file belongs to an external writer; every call re-reads it, no
/// locking or caching.
pub fn read_display_file(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(content.trim().to_string())
}
