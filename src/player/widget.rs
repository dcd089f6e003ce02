//! The embedded video widget seen by the playback surface

/// Widget state codes, as reported through [`WidgetEvent::StateChange`]
pub const STATE_ENDED: i32 = 0;
pub const STATE_PLAYING: i32 = 1;
pub const STATE_PAUSED: i32 = 2;
pub const STATE_BUFFERING: i32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub enum WidgetEvent {
    Ready,
    StateChange(i32),
    Error(String),
}

/// Imperative API of a playback widget. Calls are fire-and-forget; the
/// outcome arrives later as a [`WidgetEvent`].
pub trait VideoWidget {
    fn load_video_by_id(&mut self, video_id: &str) -> anyhow::Result<()>;
    fn play_video(&mut self);
    fn pause_video(&mut self);
    fn stop_video(&mut self);
    fn set_volume(&mut self, volume: u8);
    fn un_mute(&mut self);
}
