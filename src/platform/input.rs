//! Edge-triggered input
//!
//! Browser events arrive asynchronously and only set flags. The next frame
//! takes the pending pulses, so each physical press yields at most one
//! request, and several presses between two frames coalesce into one.

/// Minimum gap between two accepted touches
pub const TOUCH_COOLDOWN_MS: f64 = 200.0;
/// A touch released within this window counts as a tap
pub const TAP_WINDOW_MS: f64 = 300.0;

/// Game actions a key can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Special,
}

impl Action {
    /// Map a `KeyboardEvent.code`
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "Space" | "KeyW" => Some(Action::Jump),
            "Enter" => Some(Action::Special),
            _ => None,
        }
    }
}

/// Requests taken by one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pulses {
    pub jump: bool,
    pub special: bool,
}

/// Accumulated input between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    jump_held: bool,
    special_held: bool,
    pending: Pulses,
    touch_started_ms: Option<f64>,
    last_touch_ms: Option<f64>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed (auto-repeat events are ignored)
    pub fn key_down(&mut self, action: Action) {
        match action {
            Action::Jump => {
                if !self.jump_held {
                    self.jump_held = true;
                    self.pending.jump = true;
                }
            }
            Action::Special => {
                if !self.special_held {
                    self.special_held = true;
                    self.pending.special = true;
                }
            }
        }
    }

    pub fn key_up(&mut self, action: Action) {
        match action {
            Action::Jump => self.jump_held = false,
            Action::Special => self.special_held = false,
        }
    }

    /// On-screen special button
    pub fn press_special(&mut self) {
        self.pending.special = true;
    }

    /// Finger down. Returns true if the touch was accepted as a jump.
    pub fn touch_start(&mut self, now_ms: f64) -> bool {
        if self.touch_started_ms.is_some() {
            return false;
        }
        if let Some(last) = self.last_touch_ms {
            if now_ms - last < TOUCH_COOLDOWN_MS {
                return false;
            }
        }
        self.touch_started_ms = Some(now_ms);
        self.last_touch_ms = Some(now_ms);
        self.pending.jump = true;
        true
    }

    /// Finger up. Returns true if the touch was a short tap.
    pub fn touch_end(&mut self, now_ms: f64) -> bool {
        let tap = self
            .touch_started_ms
            .take()
            .is_some_and(|start| now_ms - start <= TAP_WINDOW_MS);
        tap
    }

    /// Forget the touch that began at `started_ms` if its `touchend` never
    /// arrived. A newer touch is left alone.
    pub fn release_touch(&mut self, started_ms: f64) {
        if self.touch_started_ms == Some(started_ms) {
            self.touch_started_ms = None;
        }
    }

    pub fn touch_active(&self) -> bool {
        self.touch_started_ms.is_some()
    }

    /// Take pending requests for this frame
    pub fn take(&mut self) -> Pulses {
        std::mem::take(&mut self.pending)
    }

    /// Drop pending requests and held keys (restart)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
