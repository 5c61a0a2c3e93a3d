mod wheel;

use serde::{Deserialize, Serialize};

pub use wheel::{WheelBehavior, WheelGesture, WheelInput, resolve_wheel_gesture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    /// Pointer captured by the scrollbar thumb.
    DraggingThumb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    mode: InteractionMode,
    last_pointer_x: Option<f64>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            last_pointer_x: None,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn last_pointer_x(self) -> Option<f64> {
        self.last_pointer_x
    }

    pub fn on_thumb_drag_start(&mut self, pointer_x: f64) {
        self.mode = InteractionMode::DraggingThumb;
        self.last_pointer_x = Some(pointer_x);
    }

    pub fn on_thumb_drag_move(&mut self, pointer_x: f64) {
        if self.mode == InteractionMode::DraggingThumb {
            self.last_pointer_x = Some(pointer_x);
        }
    }

    pub fn on_thumb_drag_end(&mut self) {
        self.mode = InteractionMode::Idle;
        self.last_pointer_x = None;
    }
}
