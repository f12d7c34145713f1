// src/sound.rs

use crate::constants::*;
use crate::errors::SoundError;
use crate::models::AmbientTrack;
use log::{debug, info};

/// Ambient audio as seen by a focus session.
///
/// Implementations own everything about playback. Switching tracks while
/// playing must crossfade rather than cut.
pub trait AmbientSound {
    fn initialize(&mut self) -> Result<(), SoundError>;
    fn dispose(&mut self);
    fn play(&mut self, track: AmbientTrack, volume: u8) -> Result<(), SoundError>;
    fn pause(&mut self);
    fn resume(&mut self) -> Result<(), SoundError>;
    fn stop(&mut self);
    fn set_volume(&mut self, percent: u8);
    fn is_playing(&self) -> bool;
    fn current_track(&self) -> Option<AmbientTrack>;
}

/// Audio stand-in for the terminal: tracks playback state and logs it.
#[derive(Debug)]
pub struct TerminalSound {
    initialized: bool,
    playing: bool,
    track: Option<AmbientTrack>,
    volume: u8,
}

impl Default for TerminalSound {
    fn default() -> Self {
        TerminalSound {
            initialized: false,
            playing: false,
            track: None,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl TerminalSound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}

impl AmbientSound for TerminalSound {
    fn initialize(&mut self) -> Result<(), SoundError> {
        if !self.initialized {
            debug!("[Sound] Initialized terminal sound");
            self.initialized = true;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.stop();
        self.initialized = false;
        debug!("[Sound] Disposed");
    }

    fn play(&mut self, track: AmbientTrack, volume: u8) -> Result<(), SoundError> {
        self.initialize()?;
        self.set_volume(volume);

        match self.track {
            Some(current) if self.playing && current == track => return Ok(()),
            Some(current) if self.playing => {
                info!(
                    "[Sound] Crossfading {} -> {} over {}ms",
                    current, track, CROSSFADE_MS
                );
            }
            _ => info!("[Sound] Playing {} at {}%", track, self.volume),
        }
        self.track = Some(track);
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            debug!("[Sound] Paused");
        }
    }

    fn resume(&mut self) -> Result<(), SoundError> {
        if !self.initialized {
            return Err(SoundError::NotInitialized);
        }
        if self.track.is_some() && !self.playing {
            self.playing = true;
            debug!("[Sound] Resumed");
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.track.take().is_some() {
            info!("[Sound] Stopped");
        }
        self.playing = false;
    }

    fn set_volume(&mut self, percent: u8) {
        self.volume = percent.min(MAX_VOLUME);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn current_track(&self) -> Option<AmbientTrack> {
        self.track
    }
}
