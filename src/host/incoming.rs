use serde::Deserialize;
use serde_json::{Map, Value};

/// Which kind of slot an action instance occupies on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Controller {
    #[default]
    Keypad,
    Encoder,
}

/// The action became visible (deck start, page/profile switch, …).
#[derive(Debug, Clone)]
pub struct WillAppear {
    pub action: String,
    pub context: String,
    pub device: String,
    pub settings: Map<String, Value>,
    pub controller: Controller,
}

impl WillAppear {
    /// True when the instance sits on a dial/touch-strip slot rather than a key.
    pub fn is_encoder(&self) -> bool {
        self.controller == Controller::Encoder
    }
}

/// The action is about to leave the visible page.
#[derive(Debug, Clone)]
pub struct WillDisappear {
    pub action: String,
    pub context: String,
    pub device: String,
    pub settings: Map<String, Value>,
}

/// A key was pressed.
#[derive(Debug, Clone)]
pub struct KeyDown {
    pub action: String,
    pub context: String,
    pub device: String,
    pub settings: Map<String, Value>,
}

/// A key was released. Delivered after every press; actions that only care
/// about the press ignore it.
#[derive(Debug, Clone)]
pub struct KeyUp {
    pub action: String,
    pub context: String,
    pub device: String,
    pub settings: Map<String, Value>,
}

/// A dial was rotated. `ticks` is signed: negative for counter-clockwise.
#[derive(Debug, Clone)]
pub struct DialRotate {
    pub action: String,
    pub context: String,
    pub device: String,
    pub settings: Map<String, Value>,
    pub ticks: i32,
    pub pressed: bool,
}

/// The host's reply to a `get_settings` request.
#[derive(Debug, Clone)]
pub struct DidReceiveSettings {
    pub action: String,
    pub context: String,
    pub device: String,
    pub settings: Map<String, Value>,
}

/// Everything the host can deliver to this plugin.
#[derive(Debug, Clone)]
pub enum Event {
    WillAppear(WillAppear),
    WillDisappear(WillDisappear),
    KeyDown(KeyDown),
    KeyUp(KeyUp),
    DialRotate(DialRotate),
    DidReceiveSettings(DidReceiveSettings),
    /// An event name this plugin has no handler for. Dispatch drops it.
    Unknown,
}

impl Event {
    /// Parse one host envelope.
    ///
    /// Unrecognised event names parse to [`Event::Unknown`] so a newer host
    /// never breaks an older plugin.
    pub fn from_json(raw: &str) -> serde_json::Result<Event> {
        serde_json::from_str::<WireEvent>(raw).map(Event::from)
    }
}

// ── Wire format ─────────────────────────────────────────────────────────────
//
// The host nests per-event data under `payload`; handlers want the flat
// shape above, so the wire mirror stays private.

#[derive(Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum WireEvent {
    WillAppear(WireAppearance),
    WillDisappear(WireAppearance),
    KeyDown(WireKey),
    KeyUp(WireKey),
    DialRotate(WireDial),
    DidReceiveSettings(WireKey),
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
struct WireAppearance {
    action: String,
    context: String,
    #[serde(default)]
    device: String,
    #[serde(default)]
    payload: WireAppearancePayload,
}

#[derive(Deserialize, Default)]
struct WireAppearancePayload {
    #[serde(default)]
    settings: Map<String, Value>,
    #[serde(default)]
    controller: Controller,
}

#[derive(Deserialize)]
struct WireKey {
    action: String,
    context: String,
    #[serde(default)]
    device: String,
    #[serde(default)]
    payload: WireKeyPayload,
}

#[derive(Deserialize, Default)]
struct WireKeyPayload {
    #[serde(default)]
    settings: Map<String, Value>,
}

#[derive(Deserialize)]
struct WireDial {
    action: String,
    context: String,
    #[serde(default)]
    device: String,
    #[serde(default)]
    payload: WireDialPayload,
}

#[derive(Deserialize, Default)]
struct WireDialPayload {
    #[serde(default)]
    settings: Map<String, Value>,
    #[serde(default)]
    ticks: i32,
    #[serde(default)]
    pressed: bool,
}

impl From<WireEvent> for Event {
    fn from(wire: WireEvent) -> Self {
        match wire {
            WireEvent::WillAppear(w) => Event::WillAppear(WillAppear {
                action: w.action,
                context: w.context,
                device: w.device,
                settings: w.payload.settings,
                controller: w.payload.controller,
            }),
            WireEvent::WillDisappear(w) => Event::WillDisappear(WillDisappear {
                action: w.action,
                context: w.context,
                device: w.device,
                settings: w.payload.settings,
            }),
            WireEvent::KeyDown(w) => Event::KeyDown(KeyDown {
                action: w.action,
                context: w.context,
                device: w.device,
                settings: w.payload.settings,
            }),
            WireEvent::KeyUp(w) => Event::KeyUp(KeyUp {
                action: w.action,
                context: w.context,
                device: w.device,
                settings: w.payload.settings,
            }),
            WireEvent::DialRotate(w) => Event::DialRotate(DialRotate {
                action: w.action,
                context: w.context,
                device: w.device,
                settings: w.payload.settings,
                ticks: w.payload.ticks,
                pressed: w.payload.pressed,
            }),
            WireEvent::DidReceiveSettings(w) => Event::DidReceiveSettings(DidReceiveSettings {
                action: w.action,
                context: w.context,
                device: w.device,
                settings: w.payload.settings,
            }),
            WireEvent::Unknown => Event::Unknown,
        }
    }
}
