// Per-screen state machines. Each controller owns its screen-local state and
// is dropped when the screen unmounts; canonical cross-screen state lives in
// the shell.

pub mod dashboard;
pub mod interview;
pub mod mentor;
pub mod onboarding;
pub mod resume;
pub mod roadmap;

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Onboarding,
    Dashboard,
    Roadmap,
    MentorChat,
    Resume,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Onboarding => "onboarding",
            Screen::Dashboard => "dashboard",
            Screen::Roadmap => "roadmap",
            Screen::MentorChat => "mentor_chat",
            Screen::Resume => "resume",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the mount that started an async operation. A result is applied
/// only while its ticket is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub screen: Screen,
    pub epoch: u64,
}
