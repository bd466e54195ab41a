pub mod counter;
pub mod now_playing;

pub mod ids {
    use crate::PLUGIN_ID;

    pub const INCREMENT: &str = const_format::concatcp!(PLUGIN_ID, ".increment");
    pub const NOW_PLAYING: &str = const_format::concatcp!(PLUGIN_ID, ".now-playing");
}
