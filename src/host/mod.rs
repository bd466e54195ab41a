//! The seam between action code and the Stream Deck application: incoming
//! events, the outgoing command surface, and per-context dispatch.

pub mod incoming;
pub mod plugin;

/// The imports every action module wants.
pub mod prelude {
    pub use super::incoming::{self, Controller, Event};
    pub use super::plugin::{Action, ActionFactory, ActionStatic, Plugin};
    pub use super::{Context, SdClient, Target, init};
}

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Which display a visual command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Both,
    Hardware,
    Software,
}

/// Commands the plugin sends back to the host.
///
/// The wire transport implements this in production; tests substitute a
/// recording stub. Calls are fire-and-forget: delivery failures are the
/// transport's problem, action code never blocks on them.
pub trait SdClient: Send + Sync {
    fn set_title(
        &self,
        ctx_id: &str,
        title: Option<String>,
        target: Option<Target>,
        state: Option<u8>,
    );
    fn set_image(
        &self,
        ctx_id: &str,
        image: Option<String>,
        target: Option<Target>,
        state: Option<u8>,
    );
    fn set_feedback(&self, ctx_id: &str, payload: Value);
    fn set_feedback_layout(&self, ctx_id: &str, layout: &str);
    fn set_settings(&self, ctx_id: &str, settings: Map<String, Value>);
    fn get_settings(&self, ctx_id: &str);
}

/// Shared handle passed to every action callback. Cheap to clone; animation
/// threads carry their own copy.
#[derive(Clone)]
pub struct Context {
    sd: Arc<dyn SdClient>,
}

impl Context {
    pub fn new(sd: Arc<dyn SdClient>) -> Self {
        Self { sd }
    }

    /// The host command surface.
    pub fn sd(&self) -> &dyn SdClient {
        &*self.sd
    }
}

/// Set up file-backed logging for the plugin process.
///
/// The host swallows plugin stdio, so lines go to `logs/<plugin_id>.log`
/// next to the binary. This crate's spans default to TRACE and everything
/// else to INFO; `RUST_LOG` overrides both. Keep the returned guard alive
/// for the life of the process or buffered lines are lost on exit.
///
/// ```no_run
/// let _guard = streamdeck_playground::host::init(streamdeck_playground::PLUGIN_ID);
/// ```
pub fn init(plugin_id: &str) -> WorkerGuard {
    let _ = std::fs::create_dir_all("logs");
    let file = tracing_appender::rolling::never("logs", format!("{plugin_id}.log"));
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(concat!("info,", env!("CARGO_CRATE_NAME"), "=trace")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    guard
}
