use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-time status message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

/// Flash messages grouped by kind, as rendered into a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashes {
    pub success: Vec<String>,
    pub error: Vec<String>,
}

/// Everything remembered about a browser between requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub flash: Vec<FlashMessage>,
}

impl SessionState {
    pub fn login(&mut self, user: &User) {
        self.user_id = Some(user.id);
        self.email = Some(user.email.clone());
    }

    pub fn logout(&mut self) {
        self.user_id = None;
        self.email = None;
    }

    pub fn push_flash(&mut self, kind: FlashKind, message: impl Into<String>) {
        self.flash.push(FlashMessage {
            kind,
            message: message.into(),
        });
    }

    /// Drain the flash queue; messages are shown once
    pub fn take_flashes(&mut self) -> Flashes {
        let mut flashes = Flashes::default();
        for FlashMessage { kind, message } in self.flash.drain(..) {
            match kind {
                FlashKind::Success => flashes.success.push(message),
                FlashKind::Error => flashes.error.push(message),
            }
        }
        flashes
    }
}
