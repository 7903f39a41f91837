//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a short list of sine tones with an exponential pitch and
//! gain glide. The recipes are plain data so they can be inspected without
//! an audio backend.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player jumped
    Jump,
    /// Player ran into a villain
    Collision,
    /// Power-up collected
    PowerUp,
    /// Blaze special - roaring flames
    FireBlast,
    /// Volt special - double crack
    Thunder,
    /// Splash special - surge plus droplets
    HydroPump,
    /// Run ended
    GameOver,
}

/// One oscillator voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    /// Peak gain before the master volume is applied
    pub gain: f32,
    /// Offset from the trigger time (seconds, on the audio clock)
    pub delay: f64,
    pub duration: f64,
}

impl Tone {
    const fn glide(start_hz: f32, end_hz: f32, gain: f32, duration: f64) -> Self {
        Self {
            start_hz,
            end_hz,
            gain,
            delay: 0.0,
            duration,
        }
    }

    const fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Time at which the voice has fully finished
    pub fn end(&self) -> f64 {
        self.delay + self.duration
    }
}

impl SoundEffect {
    /// Voices that make up this effect
    pub fn tones(&self) -> Vec<Tone> {
        match self {
            SoundEffect::Jump => vec![Tone::glide(800.0, 400.0, 0.3, 0.1)],
            SoundEffect::Collision => vec![Tone::glide(200.0, 100.0, 0.4, 0.2)],
            SoundEffect::PowerUp => vec![Tone::glide(600.0, 1200.0, 0.3, 0.15)],
            SoundEffect::GameOver => vec![Tone::glide(400.0, 200.0, 0.4, 0.5)],
            SoundEffect::FireBlast => (0..3)
                .map(|i| {
                    let step = i as f32 * 100.0;
                    Tone::glide(200.0 + step, 400.0 + step, 0.2, 0.3).after(i as f64 * 0.1)
                })
                .collect(),
            SoundEffect::Thunder => vec![
                Tone::glide(800.0, 200.0, 0.4, 0.2),
                Tone::glide(600.0, 150.0, 0.3, 0.15).after(0.1),
            ],
            SoundEffect::HydroPump => {
                let mut tones = vec![Tone::glide(300.0, 600.0, 0.3, 0.4)];
                tones.extend((0..5).map(|i| {
                    let step = i as f32 * 50.0;
                    Tone::glide(400.0 + step, 200.0 + step, 0.1, 0.2).after(i as f64 * 0.05)
                }));
                tones
            }
        }
    }
}

/// Anything that can play effects. Must never fail or block.
pub trait SoundSink {
    fn play(&self, effect: SoundEffect);
}

/// Sink used when no audio backend exists
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&self, _effect: SoundEffect) {}
}

/// Master volume and mute state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    master: f32,
    muted: bool,
}

impl Default for Volume {
    fn default() -> Self {
        Self {
            master: 0.8,
            muted: false,
        }
    }
}

impl Volume {
    pub fn new(master: f32, muted: bool) -> Self {
        Self {
            master: master.clamp(0.0, 1.0),
            muted,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective(&self) -> f32 {
        if self.muted { 0.0 } else { self.master }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundSink, Tone, Volume};

    /// Gain floor for exponential ramps (which cannot reach zero)
    const SILENCE: f32 = 0.01;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: Cell<Volume>,
    }

    impl AudioManager {
        pub fn new(volume: Volume) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: Cell::new(volume),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn toggle_mute(&self) -> bool {
            let mut volume = self.volume.get();
            volume.set_muted(!volume.is_muted());
            self.volume.set(volume);
            volume.is_muted()
        }

        /// Create an oscillator with gain envelope
        fn create_osc(&self, ctx: &AudioContext, freq: f32) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, tone.start_hz) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;

            osc.frequency().set_value_at_time(tone.start_hz, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz, end)
                .ok();
            gain.gain().set_value_at_time(tone.gain * vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(SILENCE, end)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl SoundSink for AudioManager {
        fn play(&self, effect: SoundEffect) {
            let vol = self.volume.get().effective();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, &tone, vol);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SoundEffect; 7] = [
        SoundEffect::Jump,
        SoundEffect::Collision,
        SoundEffect::PowerUp,
        SoundEffect::FireBlast,
        SoundEffect::Thunder,
        SoundEffect::HydroPump,
        SoundEffect::GameOver,
    ];

    #[test]
    fn test_every_effect_is_short_and_audible() {
        for effect in ALL {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{effect:?} has no voices");
            for tone in &tones {
                assert!(tone.start_hz > 0.0 && tone.end_hz > 0.0);
                assert!(tone.gain > 0.0 && tone.gain <= 0.5);
                assert!(tone.end() <= 0.7, "{effect:?} runs too long");
            }
        }
    }

    #[test]
    fn test_jump_glides_down() {
        let tones = SoundEffect::Jump.tones();
        assert_eq!(tones, vec![Tone::glide(800.0, 400.0, 0.3, 0.1)]);
    }

    #[test]
    fn test_layered_specials() {
        let fire = SoundEffect::FireBlast.tones();
        assert_eq!(fire.len(), 3);
        assert!((fire[2].delay - 0.2).abs() < 1e-9);
        assert_eq!(fire[2].start_hz, 400.0);

        let thunder = SoundEffect::Thunder.tones();
        assert_eq!(thunder.len(), 2);
        assert!((thunder[1].delay - 0.1).abs() < 1e-9);

        let hydro = SoundEffect::HydroPump.tones();
        assert_eq!(hydro.len(), 6);
        assert!((hydro[5].delay - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_volume() {
        assert_eq!(Volume::new(1.5, false).effective(), 1.0);
        let mut volume = Volume::new(0.25, false);
        assert_eq!(volume.effective(), 0.25);
        volume.set_muted(true);
        assert_eq!(volume.effective(), 0.0);
    }

    #[test]
    fn test_silent_sink_accepts_everything() {
        for effect in ALL {
            Silent.play(effect);
        }
    }
}
