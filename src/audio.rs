//! Battle sound effects
//!
//! Cues are picked from battle events on every platform; the browser build
//! synthesizes them with the Web Audio API, so no sound files ship.

use crate::battle::{BattleEvent, PowerUpKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Hero's attack connects
    Hit,
    /// Critical or double-damage attack
    HeavyHit,
    /// Wrong answer or question timeout
    Error,
    /// Power-up appears
    PowerUpSpawn,
    /// Power-up used
    PowerUpCollect,
    /// Monster defeated
    LevelClear,
    GameOver,
}

impl SoundEffect {
    /// Cue for a battle event, if it has one
    pub fn for_event(event: &BattleEvent) -> Option<Self> {
        match event {
            BattleEvent::Correct {
                critical,
                double_damage,
                ..
            } => Some(if *critical || *double_damage {
                SoundEffect::HeavyHit
            } else {
                SoundEffect::Hit
            }),
            BattleEvent::Incorrect { potion_used, .. } => {
                (!potion_used).then_some(SoundEffect::Error)
            }
            BattleEvent::TooSlow { .. } => Some(SoundEffect::Error),
            BattleEvent::PowerUpSpawned { .. } => Some(SoundEffect::PowerUpSpawn),
            // Double damage is already heard as a heavy hit
            BattleEvent::PowerUpCollected { power_up, .. } => {
                (*power_up != PowerUpKind::Damage).then_some(SoundEffect::PowerUpCollect)
            }
            BattleEvent::MonsterDefeated { .. } => Some(SoundEffect::LevelClear),
            BattleEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Base pitches for the three punch variants
    const HIT_PITCHES: [f32; 3] = [140.0, 165.0, 190.0];

    /// Plays synthesized cues
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(false)
        }
    }

    impl AudioManager {
        pub fn new(muted: bool) -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted,
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.muted {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let vol = self.volume;
            match effect {
                SoundEffect::Hit => {
                    let idx = (js_sys::Math::random() * HIT_PITCHES.len() as f64) as usize;
                    let pitch = HIT_PITCHES[idx.min(HIT_PITCHES.len() - 1)];
                    self.thump(ctx, pitch, vol * 0.6, 0.12);
                }
                SoundEffect::HeavyHit => {
                    self.thump(ctx, 110.0, vol * 0.8, 0.2);
                    self.tone(ctx, 880.0, OscillatorType::Square, vol * 0.15, 0.0, 0.08);
                }
                SoundEffect::Error => {
                    self.tone(ctx, 220.0, OscillatorType::Sawtooth, vol * 0.3, 0.0, 0.15);
                    self.tone(ctx, 160.0, OscillatorType::Sawtooth, vol * 0.3, 0.15, 0.2);
                }
                SoundEffect::PowerUpSpawn => {
                    self.tone(ctx, 660.0, OscillatorType::Triangle, vol * 0.3, 0.0, 0.12);
                    self.tone(ctx, 990.0, OscillatorType::Triangle, vol * 0.3, 0.1, 0.12);
                }
                SoundEffect::PowerUpCollect => {
                    for (i, freq) in [523.0, 659.0, 784.0, 1047.0].into_iter().enumerate() {
                        self.tone(ctx, freq, OscillatorType::Sine, vol * 0.35, i as f64 * 0.06, 0.1);
                    }
                }
                SoundEffect::LevelClear => {
                    for (i, freq) in [392.0, 523.0, 659.0, 784.0].into_iter().enumerate() {
                        self.tone(ctx, freq, OscillatorType::Square, vol * 0.2, i as f64 * 0.1, 0.15);
                    }
                }
                SoundEffect::GameOver => {
                    for (i, freq) in [392.0, 330.0, 262.0, 196.0].into_iter().enumerate() {
                        self.tone(ctx, freq, OscillatorType::Triangle, vol * 0.35, i as f64 * 0.2, 0.3);
                    }
                }
            }
        }

        /// Oscillator wired through its own gain node
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

        /// Falling-pitch punch
        fn thump(&self, ctx: &AudioContext, freq: f32, gain_level: f32, length: f64) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(gain_level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            osc.frequency().set_value_at_time(freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(freq * 0.4, t + length)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Decaying note starting `delay` seconds from now
        fn tone(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            gain_level: f32,
            delay: f64,
            length: f64,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
            gain.gain().set_value_at_time(gain_level, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }
    }
}
