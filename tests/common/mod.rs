#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use serde_json::{Map, Value};
use streamdeck_playground::animation::{Frame, FrameRenderer};
use streamdeck_playground::host::incoming::{
    Controller, DialRotate, DidReceiveSettings, Event, KeyDown, KeyUp, WillAppear, WillDisappear,
};
use streamdeck_playground::host::{Context, SdClient, Target};

/// One command the plugin sent to the host, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetTitle { context: String, title: Option<String> },
    SetImage { context: String, image: Option<String> },
    SetFeedback { context: String, payload: Value },
    SetFeedbackLayout { context: String, layout: String },
    SetSettings { context: String, settings: Map<String, Value> },
    GetSettings { context: String },
}

/// Recording stand-in for the Stream Deck application.
#[derive(Default)]
pub struct MockSd {
    commands: Mutex<Vec<Command>>,
}

impl MockSd {
    pub fn harness() -> (Arc<MockSd>, Context) {
        let sd = Arc::new(MockSd::default());
        let cx = Context::new(sd.clone());
        (sd, cx)
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn titles_for(&self, ctx: &str) -> Vec<Option<String>> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetTitle { context, title } if context == ctx => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn images_for(&self, ctx: &str) -> Vec<Option<String>> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetImage { context, image } if context == ctx => Some(image),
                _ => None,
            })
            .collect()
    }

    pub fn feedbacks_for(&self, ctx: &str) -> Vec<Value> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetFeedback { context, payload } if context == ctx => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn layouts_for(&self, ctx: &str) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetFeedbackLayout { context, layout } if context == ctx => Some(layout),
                _ => None,
            })
            .collect()
    }

    pub fn settings_writes_for(&self, ctx: &str) -> Vec<Map<String, Value>> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetSettings { context, settings } if context == ctx => Some(settings),
                _ => None,
            })
            .collect()
    }

    /// Poll until `pred` holds for the recorded command list. Animation runs
    /// on a background thread, so assertions on it need to wait.
    pub fn wait_until(&self, timeout: Duration, pred: impl Fn(&[Command]) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if pred(&self.commands.lock().unwrap()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Wait until the command list stops growing for `quiet`, then return it.
    pub fn settled_commands(&self, quiet: Duration, max: Duration) -> Vec<Command> {
        let deadline = Instant::now() + max;
        let mut last_len = self.commands.lock().unwrap().len();
        let mut last_change = Instant::now();
        loop {
            std::thread::sleep(Duration::from_millis(5));
            let len = self.commands.lock().unwrap().len();
            if len != last_len {
                last_len = len;
                last_change = Instant::now();
            }
            if last_change.elapsed() >= quiet || Instant::now() >= deadline {
                return self.commands();
            }
        }
    }
}

impl SdClient for MockSd {
    fn set_title(&self, ctx_id: &str, title: Option<String>, _: Option<Target>, _: Option<u8>) {
        self.commands
            .lock()
            .unwrap()
            .push(Command::SetTitle { context: ctx_id.into(), title });
    }

    fn set_image(&self, ctx_id: &str, image: Option<String>, _: Option<Target>, _: Option<u8>) {
        self.commands
            .lock()
            .unwrap()
            .push(Command::SetImage { context: ctx_id.into(), image });
    }

    fn set_feedback(&self, ctx_id: &str, payload: Value) {
        self.commands
            .lock()
            .unwrap()
            .push(Command::SetFeedback { context: ctx_id.into(), payload });
    }

    fn set_feedback_layout(&self, ctx_id: &str, layout: &str) {
        self.commands.lock().unwrap().push(Command::SetFeedbackLayout {
            context: ctx_id.into(),
            layout: layout.into(),
        });
    }

    fn set_settings(&self, ctx_id: &str, settings: Map<String, Value>) {
        self.commands
            .lock()
            .unwrap()
            .push(Command::SetSettings { context: ctx_id.into(), settings });
    }

    fn get_settings(&self, ctx_id: &str) {
        self.commands
            .lock()
            .unwrap()
            .push(Command::GetSettings { context: ctx_id.into() });
    }
}

// ── Event builders ──────────────────────────────────────────────────────────

fn as_map(settings: Value) -> Map<String, Value> {
    match settings {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn will_appear_on(action: &str, ctx: &str, controller: Controller, settings: Value) -> Event {
    Event::WillAppear(WillAppear {
        action: action.into(),
        context: ctx.into(),
        device: "dev-1".into(),
        settings: as_map(settings),
        controller,
    })
}

pub fn will_disappear_on(action: &str, ctx: &str) -> Event {
    Event::WillDisappear(WillDisappear {
        action: action.into(),
        context: ctx.into(),
        device: "dev-1".into(),
        settings: Map::new(),
    })
}

pub fn key_down_on(action: &str, ctx: &str, settings: Value) -> Event {
    Event::KeyDown(KeyDown {
        action: action.into(),
        context: ctx.into(),
        device: "dev-1".into(),
        settings: as_map(settings),
    })
}

pub fn key_up_on(action: &str, ctx: &str) -> Event {
    Event::KeyUp(KeyUp {
        action: action.into(),
        context: ctx.into(),
        device: "dev-1".into(),
        settings: Map::new(),
    })
}

pub fn dial_rotate_on(action: &str, ctx: &str, ticks: i32) -> Event {
    Event::DialRotate(DialRotate {
        action: action.into(),
        context: ctx.into(),
        device: "dev-1".into(),
        settings: Map::new(),
        ticks,
        pressed: false,
    })
}

pub fn did_receive_settings_on(action: &str, ctx: &str, settings: Value) -> Event {
    Event::DidReceiveSettings(DidReceiveSettings {
        action: action.into(),
        context: ctx.into(),
        device: "dev-1".into(),
        settings: as_map(settings),
    })
}

// ── Frame renderers ─────────────────────────────────────────────────────────

/// Records every label it is asked for and hands back stub PNG bytes.
#[derive(Default)]
pub struct RecordingRenderer {
    labels: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }
}

impl FrameRenderer for RecordingRenderer {
    fn render(&self, frame: &Frame) -> Result<Vec<u8>> {
        self.labels.lock().unwrap().push(frame.label.clone());
        Ok(b"\x89PNG-stub".to_vec())
    }
}

/// Fails at one fixed frame index, succeeds before it.
pub struct FailAtRenderer {
    pub fail_at: u32,
}

impl FrameRenderer for FailAtRenderer {
    fn render(&self, frame: &Frame) -> Result<Vec<u8>> {
        if frame.index >= self.fail_at {
            bail!("synthetic failure at frame {}", frame.index);
        }
        Ok(b"\x89PNG-stub".to_vec())
    }
}
