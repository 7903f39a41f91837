//! Game context
//!
//! Owns one run's state plus everything around it: the RNG, pending input,
//! deferred tasks, the screen flash and the fixed-step accumulator. The
//! browser entry point and the headless binary both drive it through
//! `frame`, then read `hud` and `scene` to present the result.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::audio::{SoundEffect, SoundSink, Volume};
use crate::consts::{MAX_FRAME_DELTA_MS, MAX_SUBSTEPS, SIM_STEP_MS};
use crate::platform::input::TAP_WINDOW_MS;
use crate::platform::{Action, Deferred, InputState, Pulses, Scheduler, Scope};
use crate::renderer::Scene;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, autopilot, tick};

/// Flash holds full strength this long before fading
pub const FLASH_HOLD_MS: f64 = 100.0;
/// Fade-out duration
pub const FLASH_FADE_MS: f64 = 200.0;
/// The controls hint stays up this long
pub const MOBILE_GUIDE_MS: f64 = 5000.0;

/// Full-screen overlay raised by a special attack
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScreenFlash {
    started_ms: f64,
    fading: bool,
}

impl ScreenFlash {
    fn alpha_at(&self, now_ms: f64) -> f32 {
        if !self.fading {
            return 1.0;
        }
        let t = (now_ms - self.started_ms - FLASH_HOLD_MS) / FLASH_FADE_MS;
        (1.0 - t).clamp(0.0, 1.0) as f32
    }
}

/// What the presentation layer should react to after a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Events raised by every substep, in order
    pub events: Vec<GameEvent>,
    /// The controls hint timer ran out
    pub hide_mobile_guide: bool,
}

impl FrameOutcome {
    /// Final score if the run ended during this frame
    pub fn game_over(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            GameEvent::GameOver { final_score } => Some(*final_score),
            _ => None,
        })
    }
}

/// Counters shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub lives: u8,
    pub jumps_left: u8,
    pub special_charges: u8,
    /// False disables the special-attack button
    pub special_ready: bool,
    pub game_over: bool,
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    rng: Pcg32,
    input: InputState,
    timers: Scheduler,
    flash: Option<ScreenFlash>,
    /// Bumped on every restart; run-scoped timers from older runs are stale
    generation: u32,
    settings: Settings,
    accumulator: f64,
    last_time: Option<f64>,
    autopilot: bool,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Self {
        log::info!(
            "New run as {} (seed {})",
            settings.character.name(),
            seed
        );
        Self {
            state: GameState::new(settings.tuning.clone()),
            rng: Pcg32::seed_from_u64(seed),
            input: InputState::new(),
            timers: Scheduler::new(),
            flash: None,
            generation: 0,
            settings,
            accumulator: 0.0,
            last_time: None,
            autopilot: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn volume(&self) -> Volume {
        Volume::new(self.settings.master_volume, self.settings.muted)
    }

    /// Advance the game to `now_ms`, playing sounds for whatever happened
    pub fn frame(&mut self, now_ms: f64, audio: &impl SoundSink) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        for task in self.timers.drain_due(now_ms, self.generation) {
            match task {
                Deferred::ReleaseTouch { started_ms } => self.input.release_touch(started_ms),
                Deferred::FadeFlash => {
                    if let Some(flash) = &mut self.flash {
                        if now_ms >= flash.started_ms + FLASH_HOLD_MS {
                            flash.fading = true;
                        }
                    }
                }
                Deferred::ClearFlash => {
                    if self
                        .flash
                        .is_some_and(|f| now_ms >= f.started_ms + FLASH_HOLD_MS + FLASH_FADE_MS)
                    {
                        self.flash = None;
                    }
                }
                Deferred::HideMobileGuide => outcome.hide_mobile_guide = true,
            }
        }

        let dt = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => SIM_STEP_MS,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_STEP_MS && substeps < MAX_SUBSTEPS {
            // One-shot requests go to the first substep only
            let mut pulses = if substeps == 0 {
                self.input.take()
            } else {
                Pulses::default()
            };
            if self.autopilot {
                let choice = autopilot::choose(&self.state);
                pulses.jump |= choice.jump;
                pulses.special |= choice.special;
            }

            let input = TickInput {
                now_ms,
                jump: pulses.jump,
                special: pulses.special,
                accent_color: self.settings.character.effect_color(),
            };
            tick(&mut self.state, &input, &mut self.rng);
            self.accumulator -= SIM_STEP_MS;
            substeps += 1;

            for event in self.state.drain_events() {
                self.handle_event(event, now_ms, audio);
                outcome.events.push(event);
            }
        }

        // Drop time we could not simulate rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_STEP_MS);
        }

        outcome
    }

    fn handle_event(&mut self, event: GameEvent, now_ms: f64, audio: &impl SoundSink) {
        match event {
            GameEvent::Jumped { .. } => audio.play(SoundEffect::Jump),
            GameEvent::ObstacleHit { .. } => audio.play(SoundEffect::Collision),
            GameEvent::PowerUpCollected { .. } => audio.play(SoundEffect::PowerUp),
            GameEvent::SpecialAttack { .. } => audio.play(self.settings.character.special_sound()),
            GameEvent::ScreenFlash => self.start_flash(now_ms),
            GameEvent::GameOver { .. } => audio.play(SoundEffect::GameOver),
            GameEvent::ObstacleCleared | GameEvent::SpeedUp { .. } => {}
        }
    }

    fn start_flash(&mut self, now_ms: f64) {
        if !self.settings.effective_screen_flash() {
            return;
        }
        self.flash = Some(ScreenFlash {
            started_ms: now_ms,
            fading: false,
        });
        let generation = self.generation;
        self.timers
            .schedule(now_ms, FLASH_HOLD_MS, generation, Scope::Run, Deferred::FadeFlash);
        self.timers.schedule(
            now_ms,
            FLASH_HOLD_MS + FLASH_FADE_MS,
            generation,
            Scope::Run,
            Deferred::ClearFlash,
        );
    }

    /// Current flash overlay strength
    pub fn flash_alpha(&self, now_ms: f64) -> f32 {
        self.flash.map_or(0.0, |f| f.alpha_at(now_ms))
    }

    /// Start a fresh run. Pending run-scoped timers become stale.
    pub fn restart(&mut self, seed: u64) {
        self.state.reset();
        self.rng = Pcg32::seed_from_u64(seed);
        self.input.clear();
        self.flash = None;
        self.generation = self.generation.wrapping_add(1);
        self.accumulator = 0.0;
        self.last_time = None;
        log::info!("Restart (run {}, seed {})", self.generation, seed);
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.state.score,
            lives: self.state.lives,
            jumps_left: self.state.jumps.remaining(),
            special_charges: self.state.special_charges,
            special_ready: self.state.special_charges > 0,
            game_over: self.state.game_over,
        }
    }

    /// Read-only view for the renderer
    pub fn scene(&self, now_ms: f64) -> Scene<'_> {
        Scene {
            state: &self.state,
            character: self.settings.character,
            time_ms: now_ms,
            flash_alpha: self.flash_alpha(now_ms),
        }
    }

    // === Input ===

    /// Returns true if the key is bound
    pub fn key_down(&mut self, code: &str) -> bool {
        match Action::from_key_code(code) {
            Some(action) => {
                self.input.key_down(action);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match Action::from_key_code(code) {
            Some(action) => {
                self.input.key_up(action);
                true
            }
            None => false,
        }
    }

    pub fn press_special(&mut self) {
        self.input.press_special();
    }

    pub fn touch_start(&mut self, now_ms: f64) -> bool {
        let accepted = self.input.touch_start(now_ms);
        if accepted {
            self.timers.schedule(
                now_ms,
                TAP_WINDOW_MS,
                self.generation,
                Scope::Run,
                Deferred::ReleaseTouch { started_ms: now_ms },
            );
        }
        accepted
    }

    pub fn touch_end(&mut self, now_ms: f64) -> bool {
        self.input.touch_end(now_ms)
    }

    /// Show the controls hint; it is hidden again after a while, even across restarts
    pub fn show_mobile_guide(&mut self, now_ms: f64) {
        self.timers.schedule(
            now_ms,
            MOBILE_GUIDE_MS,
            self.generation,
            Scope::Session,
            Deferred::HideMobileGuide,
        );
    }

    // === Demo mode ===

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            log::info!("Autopilot {}", if on { "on" } else { "off" });
        }
        self.autopilot = on;
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.set_autopilot(!self.autopilot);
        self.autopilot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;
    use crate::sim::Villain;
    use glam::Vec2;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<SoundEffect>>);

    impl SoundSink for Recorder {
        fn play(&self, effect: SoundEffect) {
            self.0.borrow_mut().push(effect);
        }
    }

    impl Recorder {
        fn take(&self) -> Vec<SoundEffect> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    /// No random spawns within the first minute
    fn quiet(character: Character) -> Settings {
        let mut settings = Settings::default();
        settings.character = character;
        settings.tuning.power_up_chance = 0.0;
        settings.tuning.base_obstacle_interval_ms = 60_000.0;
        settings
    }

    fn villain_on_player(game: &Game) -> Villain {
        Villain {
            pos: Vec2::new(game.state.player.pos.x, 330.0),
            width: 40.0,
            height: 70.0,
            speed: 0.0,
            variant: 0,
        }
    }

    #[test]
    fn test_jump_plays_sound_once() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Blaze), 1);

        assert!(game.key_down("Space"));
        game.frame(0.0, &audio);
        assert_eq!(audio.take(), vec![SoundEffect::Jump]);
        assert_eq!(game.hud().jumps_left, 1);

        // Held key does not jump again
        game.key_down("Space");
        game.frame(SIM_STEP_MS, &audio);
        assert!(audio.take().is_empty());
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut game = Game::new(quiet(Character::Blaze), 1);
        assert!(!game.key_down("KeyQ"));
        assert!(!game.key_up("Escape"));
    }

    #[test]
    fn test_special_uses_character_sound_and_flashes() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Volt), 1);

        game.press_special();
        let outcome = game.frame(0.0, &audio);
        assert!(outcome.events.contains(&GameEvent::SpecialAttack { destroyed: 0 }));
        assert_eq!(audio.take(), vec![SoundEffect::Thunder]);
        assert_eq!(game.hud().special_charges, 2);

        assert_eq!(game.flash_alpha(0.0), 1.0);
        game.frame(100.0, &audio);
        assert!((game.flash_alpha(200.0) - 0.5).abs() < 1e-6);
        game.frame(300.0, &audio);
        assert_eq!(game.flash_alpha(300.0), 0.0);
        assert!(game.flash.is_none());
    }

    #[test]
    fn test_reduced_motion_suppresses_flash() {
        let mut settings = quiet(Character::Splash);
        settings.reduced_motion = true;
        let audio = Recorder::default();
        let mut game = Game::new(settings, 1);

        game.press_special();
        game.frame(0.0, &audio);
        assert_eq!(audio.take(), vec![SoundEffect::HydroPump]);
        assert_eq!(game.flash_alpha(0.0), 0.0);
    }

    #[test]
    fn test_special_button_disables_when_empty() {
        let mut game = Game::new(quiet(Character::Blaze), 1);
        for i in 0..4 {
            game.press_special();
            game.frame(i as f64 * 20.0, &crate::audio::Silent);
        }
        let hud = game.hud();
        assert_eq!(hud.special_charges, 0);
        assert!(!hud.special_ready);
    }

    #[test]
    fn test_game_over_outcome() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Blaze), 1);
        game.state.lives = 1;
        game.state.score = 420;
        let v = villain_on_player(&game);
        game.state.obstacles.push(v);

        let outcome = game.frame(0.0, &audio);
        assert_eq!(outcome.game_over(), Some(420));
        assert_eq!(audio.take(), vec![SoundEffect::Collision, SoundEffect::GameOver]);
        assert!(game.hud().game_over);

        // Frozen afterwards
        let frame = game.state.frame;
        let outcome = game.frame(SIM_STEP_MS, &audio);
        assert!(outcome.events.is_empty());
        assert_eq!(game.state.frame, frame);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut game = Game::new(quiet(Character::Blaze), 1);
        game.state.score = 999;
        game.state.lives = 0;
        game.state.game_over = true;
        game.set_autopilot(true);

        game.restart(2);
        assert_eq!(game.generation(), 1);
        assert_eq!(
            game.hud(),
            HudSnapshot {
                score: 0,
                lives: 2,
                jumps_left: 2,
                special_charges: 3,
                special_ready: true,
                game_over: false,
            }
        );
        // Demo mode is a session preference
        assert!(game.autopilot());
    }

    #[test]
    fn test_restart_cancels_run_timers_but_not_session_timers() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Blaze), 1);
        game.show_mobile_guide(0.0);
        game.press_special();
        game.frame(0.0, &audio);
        assert!(game.flash_alpha(0.0) > 0.0);

        game.restart(7);
        assert_eq!(game.flash_alpha(50.0), 0.0);

        // A new flash in the new run is not cut short by the old run's timers
        game.press_special();
        game.frame(250.0, &audio);
        let outcome = game.frame(300.0, &audio);
        assert!(!outcome.hide_mobile_guide);
        assert_eq!(game.flash_alpha(300.0), 1.0);

        let outcome = game.frame(5000.0, &audio);
        assert!(outcome.hide_mobile_guide);
    }

    #[test]
    fn test_fixed_step_at_high_refresh_rate() {
        let mut game = Game::new(quiet(Character::Blaze), 1);
        let step_120hz = 1000.0 / 120.0;
        for i in 0..=120 {
            game.frame(i as f64 * step_120hz, &crate::audio::Silent);
        }
        // One second of 120 Hz frames simulates about 60 frames
        assert!((59..=62).contains(&game.state.frame), "{}", game.state.frame);
    }

    #[test]
    fn test_long_pause_is_capped() {
        let mut game = Game::new(quiet(Character::Blaze), 1);
        game.frame(0.0, &crate::audio::Silent);
        game.frame(10_000.0, &crate::audio::Silent);
        assert!(game.state.frame <= 1 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_pulse_waits_for_a_substep() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Blaze), 1);
        game.frame(0.0, &audio);

        // Too soon for another substep; the jump stays pending
        game.key_down("ArrowUp");
        game.frame(1.0, &audio);
        assert!(audio.take().is_empty());
        game.frame(SIM_STEP_MS + 1.0, &audio);
        assert_eq!(audio.take(), vec![SoundEffect::Jump]);
    }

    #[test]
    fn test_touch_jumps_and_releases() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Blaze), 1);
        assert!(game.touch_start(0.0));
        game.frame(0.0, &audio);
        assert_eq!(audio.take(), vec![SoundEffect::Jump]);
        assert!(game.input.touch_active());

        // touchend never arrived; the tap window releases it
        game.frame(TAP_WINDOW_MS, &audio);
        assert!(!game.input.touch_active());
    }

    #[test]
    fn test_old_release_timer_keeps_newer_touch() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Blaze), 1);
        assert!(game.touch_start(0.0));
        game.frame(0.0, &audio);
        game.touch_end(50.0);

        assert!(game.touch_start(250.0));
        game.frame(250.0, &audio);
        assert_eq!(audio.take(), vec![SoundEffect::Jump, SoundEffect::Jump]);

        // First touch's timer comes due while the second finger is down
        game.frame(300.0, &audio);
        assert!(game.input.touch_active());
        assert!(!game.touch_start(460.0));

        // The second touch's own timer releases it
        game.frame(550.0, &audio);
        assert!(!game.input.touch_active());
    }

    #[test]
    fn test_autopilot_jumps_over_incoming_obstacle() {
        let audio = Recorder::default();
        let mut game = Game::new(quiet(Character::Blaze), 1);
        game.set_autopilot(true);
        let front = game.state.player.pos.x + game.state.player.width;
        game.state.obstacles.push(Villain {
            pos: Vec2::new(front + 20.0, 350.0),
            width: 40.0,
            height: 50.0,
            speed: 2.5,
            variant: 1,
        });

        game.frame(0.0, &audio);
        assert_eq!(audio.take(), vec![SoundEffect::Jump]);
    }

    #[test]
    fn test_scene_reflects_character_and_flash() {
        let mut game = Game::new(quiet(Character::Splash), 1);
        game.press_special();
        game.frame(0.0, &crate::audio::Silent);
        let scene = game.scene(0.0);
        assert_eq!(scene.character, Character::Splash);
        assert_eq!(scene.flash_alpha, 1.0);
        assert_eq!(scene.state.special_charges, 2);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut settings = Settings::default();
            settings.tuning.power_up_chance = 0.05;
            let mut game = Game::new(settings, seed);
            game.set_autopilot(true);
            for i in 0..600 {
                game.frame(i as f64 * SIM_STEP_MS, &crate::audio::Silent);
            }
            (game.state.score, game.state.obstacles.len(), game.state.lives)
        };
        assert_eq!(run(42), run(42));
    }
}
