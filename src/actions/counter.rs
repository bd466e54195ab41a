use serde_json::{Map, Value};

use crate::host::prelude::*;
use crate::render::{counter_badge_svg, svg_data_url};

/// Counts key presses. The running total lives in the host-persisted
/// settings for the key, so it survives restarts and profile switches.
#[derive(Default)]
pub struct CounterAction;

impl ActionStatic for CounterAction {
    const ID: &'static str = super::ids::INCREMENT;
}

impl Action for CounterAction {
    fn id(&self) -> &str {
        Self::ID
    }

    fn init(&mut self, cx: &Context, ctx_id: &str) {
        cx.sd().get_settings(ctx_id);
    }

    fn will_appear(&mut self, cx: &Context, ev: &incoming::WillAppear) {
        let settings = parse_settings(&ev.settings);
        cx.sd()
            .set_title(&ev.context, Some(settings.count.to_string()), None, None);
    }

    fn did_receive_settings(&mut self, cx: &Context, ev: &incoming::DidReceiveSettings) {
        let settings = parse_settings(&ev.settings);
        cx.sd()
            .set_title(&ev.context, Some(settings.count.to_string()), None, None);
    }

    fn key_down(&mut self, cx: &Context, ev: &incoming::KeyDown) {
        let settings = parse_settings(&ev.settings);

        // Badge color keyed to the pre-increment value: red even, blue odd.
        let svg = counter_badge_svg(settings.count);
        cx.sd()
            .set_image(&ev.context, Some(svg_data_url(&svg)), None, None);

        let next = settings.count.saturating_add(1);
        let mut out = Map::new();
        out.insert("count".to_string(), Value::from(next));
        cx.sd().set_settings(&ev.context, out);
    }
}

// ── Settings ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct CounterSettings {
    count: u64,
    // Declared by the property-inspector schema; presses always add 1.
    #[allow(dead_code)]
    increment_by: Option<i64>,
}

fn parse_settings(v: &Map<String, Value>) -> CounterSettings {
    CounterSettings {
        count: get_u64(v, "count").unwrap_or(0),
        increment_by: get_i64(v, "incrementBy"),
    }
}

fn get_i64(v: &Map<String, Value>, k: &str) -> Option<i64> {
    match v.get(k) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn get_u64(v: &Map<String, Value>, k: &str) -> Option<u64> {
    match v.get(k) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}
