use std::time::Duration;

use crate::Effect;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Transient notification. A new message overwrites the current one; every
/// scheduled hide still fires and any of them hides the toast.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Toast {
    message: String,
    visible: bool,
}

impl Toast {
    pub fn show(&mut self, message: impl Into<String>, duration: Duration) -> Effect {
        self.message = message.into();
        self.visible = true;
        Effect::ScheduleToastHide { after: duration }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn visible_message(&self) -> Option<&str> {
        self.visible.then_some(self.message.as_str())
    }
}
