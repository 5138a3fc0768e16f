//! Terminal host for the mixer
//!
//! A single task owns the controller. It waits on stdin, the next timer
//! tick deadline and Ctrl-C; every state change reaches the screen through
//! the controller's events.

use crate::commands::{Command, HELP};
use crate::config::AppConfig;
use crate::render::StatusView;
use anyhow::Result;
use noisy_audio_desktop::DesktopOutput;
use noisy_mixer::{MixerController, MixerEvent, NullPlayback, TrackCatalog};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// How long to wait for input when no countdown is running
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Whether the loop should keep going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    mixer: MixerController,
    view: StatusView,
    events: mpsc::UnboundedReceiver<MixerEvent>,

    /// Keeps the output device open; dropped after the mixer's handles
    _output: Option<DesktopOutput>,
}

impl App {
    /// Build the mixer and attach a playback handle to every track
    ///
    /// Falls back to silent handles when audio is disabled or no output
    /// device can be opened.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let catalog = config.catalog()?;
        let output = if config.audio.enabled {
            match DesktopOutput::open(
                tokio::runtime::Handle::current(),
                config.audio.media_root.clone(),
            ) {
                Ok(output) => Some(output),
                Err(e) => {
                    warn!(error = %e, "No audio output, running silent");
                    None
                }
            }
        } else {
            None
        };

        let mut mixer = MixerController::with_system_clock(catalog.clone(), config.mixer.clone())?;
        attach_handles(&mut mixer, &catalog, output.as_ref());

        let (tx, events) = mpsc::unbounded_channel();
        mixer.subscribe(move |event| {
            // Receiver outlives the mixer inside App
            let _ = tx.send(event.clone());
        });

        let view = StatusView::new(
            &catalog,
            mixer.volumes().clone(),
            mixer.timer(),
            config.mixer.timer_presets_minutes.clone(),
        );

        Ok(Self {
            mixer,
            view,
            events,
            _output: output,
        })
    }

    pub fn mixer(&self) -> &MixerController {
        &self.mixer
    }

    pub fn view(&self) -> &StatusView {
        &self.view
    }

    /// Run until `quit`, end of input or Ctrl-C
    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", self.view.render());

        loop {
            let wait = self.mixer.time_until_next_tick().unwrap_or(IDLE_WAIT);

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if self.handle_line(&line) == Flow::Quit {
                        break;
                    }
                }
                () = tokio::time::sleep(wait) => {
                    self.mixer.poll();
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }

            if self.drain_events() {
                println!("{}", self.view.render());
            }
        }

        self.mixer.shutdown();
        Ok(())
    }

    /// Parse and execute one input line
    pub fn handle_line(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(e) => {
                println!("{e}");
                Flow::Continue
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::Volume { track, volume } => {
                if let Err(e) = self.mixer.set_track_volume(&track, volume) {
                    warn!(track = %track, error = %e, "Rejected volume change");
                    println!("{e}");
                }
            }
            Command::Toggle => {
                self.mixer.toggle_master_play();
            }
            Command::Mute => self.mixer.mute_all(),
            Command::Timer(minutes) => self.mixer.toggle_timer_button(minutes),
            Command::TimerOff => {
                self.mixer.cancel_timer();
            }
            Command::Status => println!("{}", self.view.render()),
            Command::Tracks => {
                for track in self.mixer.catalog().iter() {
                    println!("{:<10} {:<14} {}", track.id, track.name, track.source);
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Fold pending events into the view; returns whether anything changed
    pub fn drain_events(&mut self) -> bool {
        let mut dirty = false;
        while let Ok(event) = self.events.try_recv() {
            if let MixerEvent::PlaybackFailed { track_id, message } = &event {
                println!("{track_id}: {message}");
            }
            dirty |= self.view.apply(&event);
        }
        dirty
    }
}

fn attach_handles(mixer: &mut MixerController, catalog: &TrackCatalog, output: Option<&DesktopOutput>) {
    for track in catalog.iter() {
        let id = track.id.as_str();
        let attached = match output.map(|output| output.playback_for(track)) {
            Some(Ok(playback)) => mixer.attach_playback(id, Box::new(playback)),
            Some(Err(e)) => {
                warn!(track = id, error = %e, "Track has no playable source");
                mixer.attach_playback(id, Box::new(NullPlayback::new()))
            }
            None => mixer.attach_playback(id, Box::new(NullPlayback::new())),
        };

        if let Err(e) = attached {
            warn!(track = id, error = %e, "Failed to attach playback");
        }
    }
}
