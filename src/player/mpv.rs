//! Video widget backed by an mpv child process, driven over its JSON IPC
//! socket. mpv hands YouTube URLs to yt-dlp on its own.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::OwnedWriteHalf;
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::widget::{
    VideoWidget, WidgetEvent, STATE_BUFFERING, STATE_ENDED, STATE_PAUSED, STATE_PLAYING,
};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const CONNECT_ATTEMPTS: u32 = 60;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(100);
const OBSERVED_PROPERTIES: [&str; 2] = ["pause", "paused-for-cache"];

pub struct MpvWidget {
    commands: UnboundedSender<Value>,
    socket_path: PathBuf,
    _child: Child,
}

impl MpvWidget {
    /// Spawn mpv idle and start the IPC task. [`WidgetEvent::Ready`] is sent
    /// once the socket accepts the connection.
    pub fn launch(executable: &str, events: UnboundedSender<WidgetEvent>) -> Result<Self> {
        let socket_path =
            std::env::temp_dir().join(format!("wizbot-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        tracing::info!(executable, socket = %socket_path.display(), "Launching mpv");
        let child = Command::new(executable)
            .arg("--idle=yes")
            .arg("--no-video")
            .arg("--no-terminal")
            .arg("--ytdl=yes")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to launch {executable}. Is mpv installed and on PATH?"))?;

        let (commands, command_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_ipc(socket_path.clone(), command_rx, events));

        Ok(Self {
            commands,
            socket_path,
            _child: child,
        })
    }

    fn send(&self, command: Value) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("mpv IPC connection is closed"))
    }

    fn send_logged(&self, command: Value) {
        if let Err(e) = self.send(command) {
            tracing::warn!(error = %e, "Dropping mpv command");
        }
    }
}

impl VideoWidget for MpvWidget {
    fn load_video_by_id(&mut self, video_id: &str) -> Result<()> {
        if video_id.is_empty() {
            bail!("queue item has no video id");
        }
        self.send(json!({"command": ["set_property", "pause", false]}))?;
        self.send(json!({"command": ["loadfile", format!("{WATCH_URL}{video_id}"), "replace"]}))
    }

    fn play_video(&mut self) {
        self.send_logged(json!({"command": ["set_property", "pause", false]}));
    }

    fn pause_video(&mut self) {
        self.send_logged(json!({"command": ["set_property", "pause", true]}));
    }

    fn stop_video(&mut self) {
        self.send_logged(json!({"command": ["stop"]}));
    }

    fn set_volume(&mut self, volume: u8) {
        self.send_logged(json!({"command": ["set_property", "volume", volume]}));
    }

    fn un_mute(&mut self) {
        self.send_logged(json!({"command": ["set_property", "mute", false]}));
    }
}

impl Drop for MpvWidget {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn connect(path: &Path) -> Option<UnixStream> {
    for _ in 0..CONNECT_ATTEMPTS {
        tokio::time::sleep(CONNECT_RETRY_DELAY).await;
        if let Ok(stream) = UnixStream::connect(path).await {
            return Some(stream);
        }
    }
    None
}

async fn write_command(writer: &mut OwnedWriteHalf, command: &Value) -> std::io::Result<()> {
    let mut line = command.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

async fn run_ipc(
    socket_path: PathBuf,
    mut commands: UnboundedReceiver<Value>,
    events: UnboundedSender<WidgetEvent>,
) {
    let Some(stream) = connect(&socket_path).await else {
        tracing::error!(socket = %socket_path.display(), "Timed out connecting to mpv IPC");
        let _ = events.send(WidgetEvent::Error("mpv IPC socket never became available".into()));
        return;
    };
    tracing::debug!("mpv IPC connected");

    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    for (id, name) in OBSERVED_PROPERTIES.iter().enumerate() {
        let observe = json!({"command": ["observe_property", id + 1, name]});
        if let Err(e) = write_command(&mut writer, &observe).await {
            tracing::error!(error = %e, property = *name, "Failed to observe mpv property");
            return;
        }
    }

    if events.send(WidgetEvent::Ready).is_err() {
        return;
    }

    let mut translator = EventTranslator::default();
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => {
                    tracing::trace!(%command, "mpv command");
                    if let Err(e) = write_command(&mut writer, &command).await {
                        tracing::error!(error = %e, "mpv IPC write failed");
                        break;
                    }
                }
                None => {
                    let _ = write_command(&mut writer, &json!({"command": ["quit"]})).await;
                    break;
                }
            },
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let Ok(message) = serde_json::from_str::<Value>(&line) else {
                        tracing::trace!(line = %line, "Ignoring non-JSON mpv output");
                        continue;
                    };
                    if let Some(event) = translator.translate(&message) {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => {
                    tracing::warn!("mpv closed the IPC connection");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "mpv IPC read failed");
                    break;
                }
            },
        }
    }
}

/// Folds mpv's event and property stream into widget state codes
#[derive(Debug, Default)]
struct EventTranslator {
    loaded: bool,
    paused: bool,
}

impl EventTranslator {
    fn translate(&mut self, message: &Value) -> Option<WidgetEvent> {
        let event = message.get("event")?.as_str()?;
        match event {
            "start-file" => {
                self.loaded = true;
                Some(WidgetEvent::StateChange(STATE_BUFFERING))
            }
            "playback-restart" if self.loaded => Some(self.running_state()),
            "end-file" => {
                self.loaded = false;
                match message.get("reason").and_then(Value::as_str) {
                    Some("eof") => Some(WidgetEvent::StateChange(STATE_ENDED)),
                    Some("error") => {
                        let detail = message
                            .get("file_error")
                            .and_then(Value::as_str)
                            .unwrap_or("playback error");
                        Some(WidgetEvent::Error(detail.to_string()))
                    }
                    // stop, quit and redirect are our own doing
                    _ => None,
                }
            }
            "property-change" => {
                let name = message.get("name")?.as_str()?;
                let flag = message.get("data")?.as_bool()?;
                match name {
                    "pause" => {
                        self.paused = flag;
                        self.loaded.then(|| self.running_state())
                    }
                    "paused-for-cache" if self.loaded => {
                        if flag {
                            Some(WidgetEvent::StateChange(STATE_BUFFERING))
                        } else if !self.paused {
                            Some(WidgetEvent::StateChange(STATE_PLAYING))
                        } else {
                            None
                        }
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn running_state(&self) -> WidgetEvent {
        if self.paused {
            WidgetEvent::StateChange(STATE_PAUSED)
        } else {
            WidgetEvent::StateChange(STATE_PLAYING)
        }
    }
}
