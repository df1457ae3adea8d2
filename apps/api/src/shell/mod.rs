//! App shell: canonical cross-screen state and navigation.
//!
//! Holds the submitted profile, the selected target role and the cached
//! roadmap, plus the controller of the active screen. Every mount bumps the
//! epoch; async work started by a mount carries a `Ticket` and its result is
//! applied only while that ticket is current. Late results are discarded.

pub mod effects;
pub mod handlers;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::chat::ChatSession;
use crate::errors::AppError;
use crate::llm_client::{LlmBackend, LlmError};
use crate::models::{CareerSuggestion, MilestoneStatus, Profile, Roadmap};
use crate::roadmap::RoadmapError;
use crate::scoring::readiness_score;
use crate::screens::dashboard::{DashboardSnapshot, DashboardView};
use crate::screens::mentor::{MentorChat, MentorSnapshot};
use crate::screens::onboarding::{sample_profile, OnboardingForm};
use crate::screens::resume::{ResumeSnapshot, ResumeTab, ResumeView};
use crate::screens::roadmap::{RoadmapSnapshot, RoadmapView};
use crate::screens::{Screen, Ticket};

use effects::Effect;

/// Controller of the screen currently mounted.
pub enum ActiveView {
    Onboarding(OnboardingForm),
    Dashboard(DashboardView),
    Roadmap(RoadmapView),
    MentorChat(MentorChat),
    Resume(ResumeView),
}

impl ActiveView {
    pub fn screen(&self) -> Screen {
        match self {
            ActiveView::Onboarding(_) => Screen::Onboarding,
            ActiveView::Dashboard(_) => Screen::Dashboard,
            ActiveView::Roadmap(_) => Screen::Roadmap,
            ActiveView::MentorChat(_) => Screen::MentorChat,
            ActiveView::Resume(_) => Screen::Resume,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub screen: Screen,
    pub label: &'static str,
    pub enabled: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShellSnapshot {
    pub screen: Screen,
    pub nav: Vec<NavItem>,
    pub profile: Option<Profile>,
    pub target_role: Option<String>,
    pub readiness_score: Option<u32>,
}

/// A mentor turn handed to the driver: the session is out of the screen until it returns.
pub struct MentorTurn {
    pub ticket: Ticket,
    pub session: ChatSession,
    pub message: String,
}

pub struct InterviewTurn {
    pub ticket: Ticket,
    pub session: ChatSession,
    pub answer: String,
}

pub struct FeedbackRequest {
    pub ticket: Ticket,
    pub resume_text: String,
}

pub struct AppShell {
    llm: Arc<dyn LlmBackend>,
    profile: Option<Profile>,
    target_role: Option<String>,
    roadmap: Option<Roadmap>,
    epoch: u64,
    view: ActiveView,
}

const NAV_SCREENS: [(Screen, &str); 4] = [
    (Screen::Dashboard, "Dashboard"),
    (Screen::Roadmap, "My Roadmap"),
    (Screen::MentorChat, "AI Mentor"),
    (Screen::Resume, "Resume Prep"),
];

fn not_active(screen: Screen) -> AppError {
    AppError::Conflict(format!("{screen} screen is not active"))
}

impl AppShell {
    /// Starts on the onboarding screen with the sample draft profile.
    pub fn new(llm: Arc<dyn LlmBackend>) -> Self {
        Self {
            llm,
            profile: None,
            target_role: None,
            roadmap: None,
            epoch: 0,
            view: ActiveView::Onboarding(OnboardingForm::new(sample_profile())),
        }
    }

    pub fn screen(&self) -> Screen {
        self.view.screen()
    }

    pub fn ticket(&self) -> Ticket {
        Ticket {
            screen: self.screen(),
            epoch: self.epoch,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch && ticket.screen == self.screen()
    }

    fn check_ticket(&self, ticket: Ticket, what: &str) -> bool {
        let current = self.is_current(ticket);
        if !current {
            debug!(
                "Discarding stale {what} for {} (epoch {}, now {})",
                ticket.screen, ticket.epoch, self.epoch
            );
        }
        current
    }

    pub fn readiness_score(&self) -> Option<u32> {
        self.profile
            .as_ref()
            .map(|p| readiness_score(p, self.roadmap.as_ref()))
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        let current = self.screen();
        NAV_SCREENS
            .iter()
            .map(|&(screen, label)| NavItem {
                screen,
                label,
                enabled: self.check_guard(screen).is_ok(),
                active: screen == current,
            })
            .collect()
    }

    pub fn snapshot(&self) -> ShellSnapshot {
        ShellSnapshot {
            screen: self.screen(),
            nav: self.nav_items(),
            profile: self.profile.clone(),
            target_role: self.target_role.clone(),
            readiness_score: self.readiness_score(),
        }
    }

    // ── Navigation ─────────────────────────────────────────────────────────

    fn check_guard(&self, screen: Screen) -> Result<(), AppError> {
        match screen {
            Screen::Onboarding if self.profile.is_some() => Err(AppError::Validation(
                "profile already submitted".to_string(),
            )),
            Screen::Onboarding => Ok(()),
            _ if self.profile.is_none() => Err(AppError::Validation(
                "complete onboarding first".to_string(),
            )),
            Screen::Roadmap if self.target_role.is_none() => Err(AppError::Validation(
                "select a target role on the dashboard first".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Switches to `screen`. Navigating to the active screen does not remount it.
    pub fn navigate(&mut self, screen: Screen) -> Result<Vec<Effect>, AppError> {
        self.check_guard(screen)?;
        if screen == self.screen() {
            return Ok(Vec::new());
        }
        Ok(self.mount(screen))
    }

    /// Replaces the active view and returns the work the new screen starts.
    /// Callers have already checked the guard for `screen`.
    fn mount(&mut self, screen: Screen) -> Vec<Effect> {
        self.epoch += 1;
        info!("Mounting {screen} (epoch {})", self.epoch);
        let ticket = Ticket {
            screen,
            epoch: self.epoch,
        };

        let (view, effects) = match (screen, self.profile.clone()) {
            (Screen::Dashboard, Some(profile)) => (
                ActiveView::Dashboard(DashboardView::loading()),
                vec![Effect::FetchSuggestions { ticket, profile }],
            ),
            (Screen::Roadmap, Some(profile)) => {
                let target_role = self.target_role.clone().unwrap_or_default();
                let (view, generate) = RoadmapView::mount(&target_role, self.roadmap.as_ref());
                let effects = if generate {
                    vec![Effect::GenerateRoadmap {
                        ticket,
                        profile,
                        target_role,
                    }]
                } else {
                    Vec::new()
                };
                (ActiveView::Roadmap(view), effects)
            }
            (Screen::MentorChat, _) => (
                ActiveView::MentorChat(MentorChat::new(self.llm.clone())),
                Vec::new(),
            ),
            (Screen::Resume, profile) => {
                let interview_role = self.target_role.clone().or_else(|| {
                    profile
                        .as_ref()
                        .and_then(|p| p.primary_target_role().map(str::to_string))
                });
                (ActiveView::Resume(ResumeView::new(interview_role)), Vec::new())
            }
            (_, profile) => (
                ActiveView::Onboarding(OnboardingForm::new(profile.unwrap_or_else(sample_profile))),
                Vec::new(),
            ),
        };

        self.view = view;
        effects
    }

    // ── Onboarding ─────────────────────────────────────────────────────────

    pub fn onboarding(&self) -> Result<&OnboardingForm, AppError> {
        match &self.view {
            ActiveView::Onboarding(form) => Ok(form),
            _ => Err(not_active(Screen::Onboarding)),
        }
    }

    pub fn onboarding_mut(&mut self) -> Result<&mut OnboardingForm, AppError> {
        match &mut self.view {
            ActiveView::Onboarding(form) => Ok(form),
            _ => Err(not_active(Screen::Onboarding)),
        }
    }

    /// Stores the profile and moves to the dashboard.
    pub fn submit_profile(&mut self) -> Result<Vec<Effect>, AppError> {
        let profile = self.onboarding()?.submit();
        info!("Profile submitted for '{}'", profile.name);
        self.profile = Some(profile);
        Ok(self.mount(Screen::Dashboard))
    }

    // ── Dashboard ──────────────────────────────────────────────────────────

    pub fn dashboard(&self) -> Result<DashboardSnapshot, AppError> {
        match (&self.view, &self.profile) {
            (ActiveView::Dashboard(view), Some(profile)) => {
                Ok(view.snapshot(profile, self.roadmap.as_ref()))
            }
            _ => Err(not_active(Screen::Dashboard)),
        }
    }

    pub fn apply_suggestions(&mut self, ticket: Ticket, suggestions: Vec<CareerSuggestion>) -> bool {
        if !self.check_ticket(ticket, "career suggestions") {
            return false;
        }
        match &mut self.view {
            ActiveView::Dashboard(view) => {
                view.apply_suggestions(suggestions);
                true
            }
            _ => false,
        }
    }

    /// Chooses the role to plan for and opens its roadmap.
    pub fn select_target_role(&mut self, role: &str) -> Result<Vec<Effect>, AppError> {
        if self.screen() != Screen::Dashboard {
            return Err(not_active(Screen::Dashboard));
        }
        let role = role.trim();
        if role.is_empty() {
            return Err(AppError::Validation("target role cannot be empty".to_string()));
        }
        self.target_role = Some(role.to_string());
        Ok(self.mount(Screen::Roadmap))
    }

    // ── Roadmap ────────────────────────────────────────────────────────────

    pub fn roadmap_view(&self) -> Result<RoadmapSnapshot, AppError> {
        match &self.view {
            ActiveView::Roadmap(view) => Ok(view.snapshot(self.roadmap.as_ref())),
            _ => Err(not_active(Screen::Roadmap)),
        }
    }

    pub fn apply_roadmap(&mut self, ticket: Ticket, result: Result<Roadmap, RoadmapError>) -> bool {
        if !self.check_ticket(ticket, "roadmap") {
            return false;
        }
        match &mut self.view {
            ActiveView::Roadmap(view) => {
                view.apply_result(result, &mut self.roadmap);
                true
            }
            _ => false,
        }
    }

    pub fn toggle_milestone(&mut self, index: usize) -> Result<MilestoneStatus, AppError> {
        match &self.view {
            ActiveView::Roadmap(view) => view.toggle(index, &mut self.roadmap),
            _ => Err(not_active(Screen::Roadmap)),
        }
    }

    pub fn back_to_dashboard(&mut self) -> Result<Vec<Effect>, AppError> {
        if self.screen() != Screen::Roadmap {
            return Err(not_active(Screen::Roadmap));
        }
        Ok(self.mount(Screen::Dashboard))
    }

    // ── Mentor chat ────────────────────────────────────────────────────────

    fn mentor_mut(&mut self) -> Result<&mut MentorChat, AppError> {
        match &mut self.view {
            ActiveView::MentorChat(chat) => Ok(chat),
            _ => Err(not_active(Screen::MentorChat)),
        }
    }

    pub fn mentor(&self) -> Result<MentorSnapshot, AppError> {
        match &self.view {
            ActiveView::MentorChat(chat) => Ok(chat.snapshot()),
            _ => Err(not_active(Screen::MentorChat)),
        }
    }

    pub fn begin_mentor_turn(&mut self, message: &str) -> Result<MentorTurn, AppError> {
        let ticket = self.ticket();
        let session = self.mentor_mut()?.begin_turn(message)?;
        Ok(MentorTurn {
            ticket,
            session,
            message: message.to_string(),
        })
    }

    pub fn apply_mentor_fragment(&mut self, ticket: Ticket, text: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match self.mentor_mut() {
            Ok(chat) => {
                chat.apply_fragment(text);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns the session to the mentor screen. If the screen has unmounted,
    /// the session is dropped with the result.
    pub fn finish_mentor_turn(&mut self, ticket: Ticket, session: ChatSession, succeeded: bool) -> bool {
        if !self.check_ticket(ticket, "mentor reply") {
            return false;
        }
        match self.mentor_mut() {
            Ok(chat) => {
                chat.finish_turn(session, succeeded);
                true
            }
            Err(_) => false,
        }
    }

    // ── Resume & interview ─────────────────────────────────────────────────

    fn resume_mut(&mut self) -> Result<&mut ResumeView, AppError> {
        match &mut self.view {
            ActiveView::Resume(view) => Ok(view),
            _ => Err(not_active(Screen::Resume)),
        }
    }

    pub fn resume(&self) -> Result<ResumeSnapshot, AppError> {
        match &self.view {
            ActiveView::Resume(view) => Ok(view.snapshot()),
            _ => Err(not_active(Screen::Resume)),
        }
    }

    /// Switches the resume screen's tab. The tab content remounts, so it gets a new epoch.
    pub fn select_resume_tab(&mut self, tab: ResumeTab) -> Result<Vec<Effect>, AppError> {
        let llm = self.llm.clone();
        let view = self.resume_mut()?;
        if view.active_tab() == tab {
            return Ok(Vec::new());
        }
        let session = view.select_tab(tab, llm)?;
        self.epoch += 1;
        debug!("Resume tab {:?} mounted (epoch {})", tab, self.epoch);

        let ticket = self.ticket();
        Ok(session
            .map(|session| vec![Effect::OpenInterview { ticket, session }])
            .unwrap_or_default())
    }

    pub fn begin_feedback(&mut self, resume_text: &str) -> Result<FeedbackRequest, AppError> {
        let ticket = self.ticket();
        let resume_text = self.resume_mut()?.builder_mut()?.begin_feedback(resume_text)?;
        Ok(FeedbackRequest {
            ticket,
            resume_text,
        })
    }

    pub fn finish_feedback(&mut self, ticket: Ticket, result: Result<String, LlmError>) -> bool {
        if !self.check_ticket(ticket, "resume feedback") {
            return false;
        }
        match self.resume_mut().and_then(|view| view.builder_mut()) {
            Ok(builder) => {
                builder.finish_feedback(result);
                true
            }
            Err(_) => false,
        }
    }

    pub fn apply_interview_opening(
        &mut self,
        ticket: Ticket,
        session: ChatSession,
        result: Result<String, LlmError>,
    ) -> bool {
        if !self.check_ticket(ticket, "interview opening") {
            return false;
        }
        match self.resume_mut().and_then(|view| view.interview_mut()) {
            Ok(interview) => {
                interview.apply_opening(session, result);
                true
            }
            Err(_) => false,
        }
    }

    pub fn begin_interview_answer(&mut self, answer: &str) -> Result<InterviewTurn, AppError> {
        let ticket = self.ticket();
        let session = self.resume_mut()?.interview_mut()?.begin_answer(answer)?;
        Ok(InterviewTurn {
            ticket,
            session,
            answer: answer.to_string(),
        })
    }

    pub fn finish_interview_answer(
        &mut self,
        ticket: Ticket,
        session: ChatSession,
        result: Result<String, LlmError>,
    ) -> bool {
        if !self.check_ticket(ticket, "interview reply") {
            return false;
        }
        match self.resume_mut().and_then(|view| view.interview_mut()) {
            Ok(interview) => {
                interview.finish_answer(session, result);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::FakeLlm;
    use crate::screens::dashboard::SuggestionsState;

    fn shell() -> AppShell {
        AppShell::new(Arc::new(FakeLlm::new()))
    }

    fn submitted() -> AppShell {
        let mut shell = shell();
        shell.submit_profile().unwrap();
        shell
    }

    #[test]
    fn test_starts_on_onboarding() {
        let shell = shell();
        assert_eq!(shell.screen(), Screen::Onboarding);
        assert!(shell.profile.is_none());
        assert_eq!(shell.readiness_score(), None);
        assert!(shell.nav_items().iter().all(|item| !item.enabled));
    }

    #[test]
    fn test_screens_need_a_profile() {
        let mut shell = shell();
        for screen in [Screen::Dashboard, Screen::MentorChat, Screen::Resume, Screen::Roadmap] {
            assert!(matches!(shell.navigate(screen), Err(AppError::Validation(_))));
        }
        assert_eq!(shell.screen(), Screen::Onboarding);
    }

    #[test]
    fn test_submit_moves_to_dashboard_and_fetches() {
        let mut shell = shell();
        let effects = shell.submit_profile().unwrap();
        assert_eq!(shell.screen(), Screen::Dashboard);
        assert!(matches!(effects.as_slice(), [Effect::FetchSuggestions { .. }]));
        assert!(shell.dashboard().is_ok());
    }

    #[test]
    fn test_onboarding_closed_after_submit() {
        let mut shell = submitted();
        assert!(matches!(shell.navigate(Screen::Onboarding), Err(AppError::Validation(_))));
        assert!(matches!(shell.onboarding_mut(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_roadmap_needs_a_target_role() {
        let mut shell = submitted();
        assert!(matches!(shell.navigate(Screen::Roadmap), Err(AppError::Validation(_))));

        let roadmap_item = |shell: &AppShell| {
            shell
                .nav_items()
                .into_iter()
                .find(|item| item.screen == Screen::Roadmap)
                .map(|item| item.enabled)
        };
        assert_eq!(roadmap_item(&shell), Some(false));

        shell.select_target_role("Data Analyst").unwrap();
        assert_eq!(roadmap_item(&shell), Some(true));
        assert_eq!(shell.screen(), Screen::Roadmap);
    }

    #[test]
    fn test_blank_target_role_is_rejected() {
        let mut shell = submitted();
        assert!(matches!(shell.select_target_role("  "), Err(AppError::Validation(_))));
        assert_eq!(shell.target_role, None);
    }

    #[test]
    fn test_navigating_to_active_screen_does_not_remount() {
        let mut shell = submitted();
        let ticket = shell.ticket();
        assert!(shell.navigate(Screen::Dashboard).unwrap().is_empty());
        assert!(shell.is_current(ticket));
    }

    #[test]
    fn test_every_mount_invalidates_older_tickets() {
        let mut shell = submitted();
        let first = shell.ticket();
        shell.navigate(Screen::MentorChat).unwrap();
        let effects = shell.navigate(Screen::Dashboard).unwrap();
        assert_eq!(effects.len(), 1);

        // Same screen as `first`, later mount.
        assert_eq!(shell.screen(), first.screen);
        assert!(!shell.is_current(first));
        assert!(!shell.apply_suggestions(first, Vec::new()));
        assert!(matches!(
            shell.dashboard().unwrap().suggestions,
            SuggestionsState::Loading
        ));
    }

    #[test]
    fn test_interview_role_falls_back_to_profile() {
        let mut shell = submitted();
        shell.navigate(Screen::Resume).unwrap();
        let resume = shell.resume().unwrap();
        assert_eq!(resume.interview_role.as_deref(), Some("Data Analyst"));
        assert!(resume.interview_enabled);
    }

    #[test]
    fn test_interview_tab_disabled_without_any_role() {
        let mut shell = shell();
        shell.onboarding_mut().unwrap().set_target_roles("");
        shell.submit_profile().unwrap();
        shell.navigate(Screen::Resume).unwrap();

        assert!(!shell.resume().unwrap().interview_enabled);
        assert!(matches!(
            shell.select_resume_tab(ResumeTab::Interview),
            Err(AppError::Validation(_))
        ));
    }
}
