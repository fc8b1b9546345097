//! Audio feedback
//!
//! The simulation never talks to audio directly: the front end maps drained
//! [`GameEvent`]s to [`SoundEffect`]s and fires them. On wasm32 sounds are
//! procedurally generated with the Web Audio API - no external files needed.

use crate::sim::{ComboBreak, DropKind, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Water drop caught
    Catch,
    /// Golden drop caught
    GoldenCatch,
    /// Pollutant caught
    Pollutant,
    /// A running combo was lost
    ComboLost,
    /// Round started
    RoundStart,
    /// Round over
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Caught { kind, .. } => Some(match kind {
                DropKind::Water => SoundEffect::Catch,
                DropKind::Golden => SoundEffect::GoldenCatch,
                DropKind::Pollutant => SoundEffect::Pollutant,
            }),
            // The pollutant sound already covers its own combo break
            GameEvent::ComboBroken { reason } if *reason != ComboBreak::Pollutant => {
                Some(SoundEffect::ComboLost)
            }
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        /// Play a sound effect (fire-and-forget)
        pub fn play(&self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.volume;
            match effect {
                SoundEffect::Catch => self.play_catch(ctx, vol),
                SoundEffect::GoldenCatch => self.play_arpeggio(ctx, vol, &[880.0, 1109.0, 1319.0]),
                SoundEffect::Pollutant => self.play_pollutant(ctx, vol),
                SoundEffect::ComboLost => self.play_combo_lost(ctx, vol),
                SoundEffect::RoundStart => self.play_arpeggio(ctx, vol, &[440.0, 660.0]),
                SoundEffect::GameOver => self.play_game_over(ctx, vol),
                SoundEffect::HighScore => {
                    self.play_arpeggio(ctx, vol, &[523.0, 659.0, 784.0, 1047.0])
                }
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Water catch - bright blip
        fn play_catch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(660.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(990.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Pollutant - low buzz
        fn play_pollutant(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(140.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(70.0, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Combo lost - soft downward blip
        fn play_combo_lost(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(200.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Game over - descending tones
        fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [392.0, 330.0, 262.0].iter().enumerate() {
                let delay = i as f64 * 0.18;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.35).ok();
                }
            }
        }

        /// Rising notes, one after another
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32]) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_sounds() {
        let caught = |kind| GameEvent::Caught {
            id: 1,
            kind,
            delta: 1,
            combo: 1,
        };
        assert_eq!(SoundEffect::for_event(&caught(DropKind::Water)), Some(SoundEffect::Catch));
        assert_eq!(
            SoundEffect::for_event(&caught(DropKind::Golden)),
            Some(SoundEffect::GoldenCatch)
        );
        assert_eq!(
            SoundEffect::for_event(&caught(DropKind::Pollutant)),
            Some(SoundEffect::Pollutant)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ComboBroken {
                reason: ComboBreak::Missed
            }),
            Some(SoundEffect::ComboLost)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ComboBroken {
                reason: ComboBreak::Pollutant
            }),
            None
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::TimeUp), None);
    }
}
