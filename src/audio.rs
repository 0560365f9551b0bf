//! The single tone the sound timer switches on and off.
//! The wave generator follows the example provided by the SDL2 crate.
//! Web-viewable documentation [here](https://docs.rs/sdl2/latest/sdl2/audio/index.html).

use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired, AudioStatus};
use sdl2::AudioSubsystem;

const SAMPLE_RATE: i32 = 44100;
const TONE_FREQUENCY: f32 = 440.0;
const VOLUME: f32 = 0.25;

/// Stores the information to produce a square wave.
pub struct SquareWave {
    pub phase_inc: f32,
    pub phase: f32,
    pub volume: f32
}

impl SquareWave {
    /// Returns a generator for `frequency` Hz at a playback rate of `sample_rate`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(frequency: f32, sample_rate: i32, volume: f32) -> SquareWave {
        SquareWave {
            phase_inc: frequency / sample_rate as f32,
            phase: 0.0,
            volume
        }
    }
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    /// Generates a square wave.
    fn callback(&mut self, out: &mut [f32]) {
        for x in out.iter_mut() {
            *x = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// A paused playback device that plays the tone while told to.
pub struct Beeper {
    device: AudioDevice<SquareWave>
}

impl Beeper {
    /// Opens a mono playback device on `audio_subsystem`.
    ///
    /// # Errors
    ///
    /// Returns an `Err` with SDL's message if the device cannot be opened.
    pub fn open(audio_subsystem: &AudioSubsystem) -> Result<Beeper, String> {
        let desired_spec = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),  // mono
            samples: None       // default sample size
        };
        let device = audio_subsystem.open_playback(None, &desired_spec, |spec| {
            SquareWave::new(TONE_FREQUENCY, spec.freq, VOLUME)
        })?;

        Ok(Beeper { device })
    }

    /// Starts or stops the tone to match `active`.
    pub fn update(&self, active: bool) {
        let playing = self.device.status() == AudioStatus::Playing;
        if active && !playing {
            self.device.resume();
        } else if !active && playing {
            self.device.pause();
        }
    }
}
