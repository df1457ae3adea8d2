pub mod career;
pub mod chat;
pub mod profile;
pub mod roadmap;

pub use career::CareerSuggestion;
pub use chat::{ChatMessage, ChatRole};
pub use profile::{Profile, Skill};
pub use roadmap::{Milestone, MilestoneKind, MilestoneStatus, Roadmap};
