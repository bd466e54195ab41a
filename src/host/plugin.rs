use std::collections::HashMap;

use tracing::{debug, warn};

use super::Context;
use super::incoming::{self, Event};

/// Compile-time identity of an action implementation: the UUID the manifest
/// declares for it.
pub trait ActionStatic {
    const ID: &'static str;
}

/// One action implementation.
///
/// The plugin routes host events here; every handler defaults to a no-op so
/// implementations override only the events they care about. `init` runs once
/// when the first event for a context arrives, `teardown` when the plugin
/// shuts down.
pub trait Action {
    fn id(&self) -> &str;

    fn init(&mut self, _cx: &Context, _ctx_id: &str) {}
    fn will_appear(&mut self, _cx: &Context, _ev: &incoming::WillAppear) {}
    fn will_disappear(&mut self, _cx: &Context, _ev: &incoming::WillDisappear) {}
    fn did_receive_settings(&mut self, _cx: &Context, _ev: &incoming::DidReceiveSettings) {}
    fn key_down(&mut self, _cx: &Context, _ev: &incoming::KeyDown) {}
    fn key_up(&mut self, _cx: &Context, _ev: &incoming::KeyUp) {}
    fn dial_rotate(&mut self, _cx: &Context, _ev: &incoming::DialRotate) {}
    fn teardown(&mut self, _cx: &Context, _ctx_id: &str) {}
}

type BoxedAction = Box<dyn Action + Send>;

/// Builds fresh action instances, one per visible context.
pub struct ActionFactory {
    id: &'static str,
    make: Box<dyn Fn() -> BoxedAction + Send + Sync>,
}

impl ActionFactory {
    /// Factory from an arbitrary constructor closure.
    pub fn new<A, F>(ctor: F) -> Self
    where
        A: Action + ActionStatic + Send + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        Self {
            id: A::ID,
            make: Box::new(move || Box::new(ctor())),
        }
    }

    /// Factory over `Default`, the common case.
    pub fn default_of<A>() -> Self
    where
        A: Action + ActionStatic + Default + Send + 'static,
    {
        Self::new(A::default)
    }
}

/// Routes host events to per-context action instances.
///
/// Instances are created lazily on the first event for a `(action, context)`
/// pair and kept across `will_disappear`, so in-memory state survives page
/// flips the same way host-persisted settings do.
pub struct Plugin {
    factories: HashMap<&'static str, ActionFactory>,
    instances: HashMap<(String, String), BoxedAction>,
}

impl Plugin {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            instances: HashMap::new(),
        }
    }

    pub fn add_action(mut self, factory: ActionFactory) -> Self {
        self.factories.insert(factory.id, factory);
        self
    }

    /// Route one event to the instance it addresses.
    pub fn dispatch(&mut self, cx: &Context, ev: &Event) {
        match ev {
            Event::WillAppear(e) => {
                if let Some(action) = self.instance(cx, &e.action, &e.context) {
                    action.will_appear(cx, e);
                }
            }
            Event::WillDisappear(e) => {
                if let Some(action) = self.instance(cx, &e.action, &e.context) {
                    action.will_disappear(cx, e);
                }
            }
            Event::KeyDown(e) => {
                if let Some(action) = self.instance(cx, &e.action, &e.context) {
                    action.key_down(cx, e);
                }
            }
            Event::KeyUp(e) => {
                if let Some(action) = self.instance(cx, &e.action, &e.context) {
                    action.key_up(cx, e);
                }
            }
            Event::DialRotate(e) => {
                if let Some(action) = self.instance(cx, &e.action, &e.context) {
                    action.dial_rotate(cx, e);
                }
            }
            Event::DidReceiveSettings(e) => {
                if let Some(action) = self.instance(cx, &e.action, &e.context) {
                    action.did_receive_settings(cx, e);
                }
            }
            Event::Unknown => debug!("ignoring unhandled event"),
        }
    }

    /// Tear down every live instance. Called once on shutdown.
    pub fn teardown(&mut self, cx: &Context) {
        for ((_, ctx_id), mut action) in self.instances.drain() {
            action.teardown(cx, &ctx_id);
        }
    }

    fn instance(&mut self, cx: &Context, action: &str, ctx_id: &str) -> Option<&mut BoxedAction> {
        let key = (action.to_string(), ctx_id.to_string());
        if !self.instances.contains_key(&key) {
            let Some(factory) = self.factories.get(action) else {
                warn!(action, "event for unregistered action");
                return None;
            };
            let mut fresh = (factory.make)();
            fresh.init(cx, ctx_id);
            self.instances.insert(key.clone(), fresh);
        }
        self.instances.get_mut(&key)
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}
