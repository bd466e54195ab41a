//! Stream Deck playground plugin: an increment counter key and a
//! now-playing display with a touch-strip animation.
//!
//! The launcher binary calls [`host::init`] for logging, builds the action
//! registry with [`plugin`], and pumps host events into
//! [`host::plugin::Plugin::dispatch`]. Tests drive the registry the same
//! way through a stub host.

pub mod actions;
pub mod animation;
pub mod host;
pub mod render;

use host::prelude::*;

use actions::{counter::CounterAction, now_playing::NowPlayingAction};

pub const PLUGIN_ID: &str = "com.mincka.playground";

/// The action registry this plugin ships, matching the manifest.
pub fn plugin() -> Plugin {
    Plugin::new()
        .add_action(ActionFactory::default_of::<CounterAction>())
        .add_action(ActionFactory::default_of::<NowPlayingAction>())
}
