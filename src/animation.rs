use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing::{error, info, trace};

use crate::host::Context;
use crate::render;

/// Highest frame index; a run shows frames `0..=LAST_FRAME`.
pub const LAST_FRAME: u32 = 10;

/// Pause between consecutive frames in production.
pub const FRAME_DELAY: Duration = Duration::from_millis(100);

/// Touch-strip layout that accepts a full-canvas image.
pub const CANVAS_LAYOUT: &str = "$A0";

/// Feedback title pushed when a frame cannot be produced.
const RENDER_ERROR_TITLE: &str = "Error displaying image";

/// Descriptor for one frame of the flip-book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: u32,
    pub label: String,
}

/// The full sequence, in display order.
pub fn frames() -> impl Iterator<Item = Frame> {
    (0..=LAST_FRAME).map(|index| Frame {
        index,
        label: format!("Count: {index}"),
    })
}

/// Turns a frame descriptor into PNG bytes. A trait seam so tests can swap
/// in recording or failing renderers.
pub trait FrameRenderer: Send + Sync {
    fn render(&self, frame: &Frame) -> Result<Vec<u8>>;
}

/// Production renderer: label text rasterized onto a white canvas.
#[derive(Debug, Default)]
pub struct SvgFrameRenderer;

impl FrameRenderer for SvgFrameRenderer {
    fn render(&self, frame: &Frame) -> Result<Vec<u8>> {
        render::count_frame_png(&frame.label)
    }
}

/// Drives at most one animation run at a time on a background thread.
///
/// Starting a run displaces the previous one: bumping the epoch makes the
/// old thread fail its next token check and exit without touching the
/// display again.
pub struct Animator {
    cancel: Arc<AtomicBool>,
    epoch: Arc<AtomicU64>,
    epoch_seq: u64,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
            epoch: Arc::new(AtomicU64::new(0)),
            epoch_seq: 0,
        }
    }
}

impl Animator {
    /// Start a fresh run for `ctx_id`, displacing any run still in flight.
    pub fn start(
        &mut self,
        cx: &Context,
        ctx_id: &str,
        renderer: Arc<dyn FrameRenderer>,
        delay: Duration,
    ) {
        self.epoch_seq = self.epoch_seq.wrapping_add(1);
        self.epoch.store(self.epoch_seq, Ordering::Relaxed);
        self.cancel.store(false, Ordering::Relaxed);

        let run = RunToken {
            cancel: Arc::clone(&self.cancel),
            epoch: Arc::clone(&self.epoch),
            started_at: self.epoch_seq,
        };
        let cx = cx.clone();
        let ctx_id = ctx_id.to_string();

        std::thread::spawn(move || run_frames(&cx, &ctx_id, &*renderer, delay, &run));
    }

    /// Stop the running animation, if any, at its next token check.
    pub fn cancel(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.epoch_seq = self.epoch_seq.wrapping_add(1);
        self.epoch.store(self.epoch_seq, Ordering::Relaxed);
    }
}

/// Cancellation token carried by a run's thread.
struct RunToken {
    cancel: Arc<AtomicBool>,
    epoch: Arc<AtomicU64>,
    started_at: u64,
}

impl RunToken {
    fn is_live(&self) -> bool {
        !self.cancel.load(Ordering::Relaxed)
            && self.epoch.load(Ordering::Relaxed) == self.started_at
    }
}

/// The driving loop: check the token, push a frame, pause, repeat.
///
/// A render failure aborts the run after a single on-device error feedback;
/// frames already shown stay shown.
fn run_frames(
    cx: &Context,
    ctx_id: &str,
    renderer: &dyn FrameRenderer,
    delay: Duration,
    run: &RunToken,
) {
    for frame in frames() {
        if frame.index > 0 {
            std::thread::sleep(delay);
        }
        if !run.is_live() {
            trace!(frame = frame.index, "run displaced, stopping");
            return;
        }

        let png = match renderer.render(&frame) {
            Ok(png) => png,
            Err(err) => {
                error!(frame = frame.index, %err, "frame render failed, aborting run");
                cx.sd()
                    .set_feedback(ctx_id, json!({ "title": RENDER_ERROR_TITLE }));
                return;
            }
        };

        cx.sd().set_feedback_layout(ctx_id, CANVAS_LAYOUT);
        cx.sd().set_feedback(
            ctx_id,
            json!({ "title": "", "full-canvas": render::png_data_url(&png) }),
        );
        info!(frame = frame.index, "frame displayed");
    }
}
