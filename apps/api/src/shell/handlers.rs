use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::errors::AppError;
use crate::models::Profile;
use crate::screens::dashboard::DashboardSnapshot;
use crate::screens::mentor::MentorSnapshot;
use crate::screens::resume::{ResumeSnapshot, ResumeTab};
use crate::screens::roadmap::RoadmapSnapshot;
use crate::screens::Screen;
use crate::state::AppState;

use super::effects::{run_feedback, run_interview_turn, run_mentor_turn, spawn_effects, Effect, MentorEvent};
use super::ShellSnapshot;

// ── Request bodies ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub screen: Screen,
}

/// Partial update of the onboarding draft. List fields take comma-separated text.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub education: Option<String>,
    pub major: Option<String>,
    pub interests: Option<String>,
    pub target_roles: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSkillRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSkillRequest {
    pub name: Option<String>,
    pub proficiency: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub target_role: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: ResumeTab,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequestBody {
    pub resume_text: String,
}

fn dispatch(state: &AppState, effects: Vec<Effect>) {
    if !effects.is_empty() {
        spawn_effects(state.shell.clone(), state.llm.clone(), effects);
    }
}

// ── Shell ──────────────────────────────────────────────────────────────────

/// GET /api/v1/shell
pub async fn handle_get_shell(State(state): State<AppState>) -> Json<ShellSnapshot> {
    Json(state.shell.lock().await.snapshot())
}

/// POST /api/v1/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<ShellSnapshot>, AppError> {
    let (effects, snapshot) = {
        let mut shell = state.shell.lock().await;
        let effects = shell.navigate(req.screen)?;
        (effects, shell.snapshot())
    };
    dispatch(&state, effects);
    Ok(Json(snapshot))
}

// ── Onboarding ─────────────────────────────────────────────────────────────

/// GET /api/v1/onboarding
pub async fn handle_get_onboarding(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    let shell = state.shell.lock().await;
    let draft = shell.onboarding()?.draft().clone();
    Ok(Json(draft))
}

/// PUT /api/v1/onboarding
pub async fn handle_update_onboarding(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let mut shell = state.shell.lock().await;
    let form = shell.onboarding_mut()?;
    if let Some(name) = &req.name {
        form.set_name(name);
    }
    if let Some(education) = &req.education {
        form.set_education(education);
    }
    if let Some(major) = &req.major {
        form.set_major(major);
    }
    if let Some(interests) = &req.interests {
        form.set_interests(interests);
    }
    if let Some(target_roles) = &req.target_roles {
        form.set_target_roles(target_roles);
    }
    Ok(Json(form.draft().clone()))
}

/// POST /api/v1/onboarding/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<AddSkillRequest>,
) -> Result<Json<Profile>, AppError> {
    let mut shell = state.shell.lock().await;
    let form = shell.onboarding_mut()?;
    form.add_skill(&req.name)?;
    Ok(Json(form.draft().clone()))
}

/// PATCH /api/v1/onboarding/skills/:index
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<UpdateSkillRequest>,
) -> Result<Json<Profile>, AppError> {
    let mut shell = state.shell.lock().await;
    let form = shell.onboarding_mut()?;
    if let Some(name) = &req.name {
        form.rename_skill(index, name)?;
    }
    if let Some(proficiency) = req.proficiency {
        form.set_skill_proficiency(index, proficiency)?;
    }
    Ok(Json(form.draft().clone()))
}

/// DELETE /api/v1/onboarding/skills/:index
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Profile>, AppError> {
    let mut shell = state.shell.lock().await;
    let form = shell.onboarding_mut()?;
    form.remove_skill(index)?;
    Ok(Json(form.draft().clone()))
}

/// POST /api/v1/onboarding/submit
pub async fn handle_submit_profile(State(state): State<AppState>) -> Result<Json<ShellSnapshot>, AppError> {
    let (effects, snapshot) = {
        let mut shell = state.shell.lock().await;
        let effects = shell.submit_profile()?;
        (effects, shell.snapshot())
    };
    dispatch(&state, effects);
    Ok(Json(snapshot))
}

// ── Dashboard & roadmap ────────────────────────────────────────────────────

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardSnapshot>, AppError> {
    Ok(Json(state.shell.lock().await.dashboard()?))
}

/// POST /api/v1/dashboard/roadmap
///
/// Selects the target role and opens its roadmap. Generation, if needed,
/// continues in the background; poll GET /api/v1/roadmap.
pub async fn handle_select_role(
    State(state): State<AppState>,
    Json(req): Json<SelectRoleRequest>,
) -> Result<Json<RoadmapSnapshot>, AppError> {
    let (effects, snapshot) = {
        let mut shell = state.shell.lock().await;
        let effects = shell.select_target_role(&req.target_role)?;
        (effects, shell.roadmap_view()?)
    };
    info!("Target role selected: '{}'", snapshot.target_role);
    dispatch(&state, effects);
    Ok(Json(snapshot))
}

/// GET /api/v1/roadmap
pub async fn handle_get_roadmap(State(state): State<AppState>) -> Result<Json<RoadmapSnapshot>, AppError> {
    Ok(Json(state.shell.lock().await.roadmap_view()?))
}

/// POST /api/v1/roadmap/milestones/:index/toggle
pub async fn handle_toggle_milestone(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<RoadmapSnapshot>, AppError> {
    let mut shell = state.shell.lock().await;
    shell.toggle_milestone(index)?;
    Ok(Json(shell.roadmap_view()?))
}

/// POST /api/v1/roadmap/back
pub async fn handle_roadmap_back(State(state): State<AppState>) -> Result<Json<ShellSnapshot>, AppError> {
    let (effects, snapshot) = {
        let mut shell = state.shell.lock().await;
        let effects = shell.back_to_dashboard()?;
        (effects, shell.snapshot())
    };
    dispatch(&state, effects);
    Ok(Json(snapshot))
}

// ── Mentor chat ────────────────────────────────────────────────────────────

/// GET /api/v1/mentor
pub async fn handle_get_mentor(State(state): State<AppState>) -> Result<Json<MentorSnapshot>, AppError> {
    Ok(Json(state.shell.lock().await.mentor()?))
}

fn sse_event(event: MentorEvent) -> Event {
    match event {
        MentorEvent::Fragment(text) => Event::default().event("fragment").data(text),
        MentorEvent::Done => Event::default().event("done").data(""),
        MentorEvent::Failed => Event::default().event("error").data(""),
    }
}

/// POST /api/v1/mentor/messages
///
/// Streams the reply as server-sent events: `fragment` events carry the text
/// received so far, followed by one `done` or `error` event.
pub async fn handle_mentor_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let turn = state.shell.lock().await.begin_mentor_turn(&req.message)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let shell = state.shell.clone();
    tokio::spawn(async move {
        run_mentor_turn(&shell, turn, &tx).await;
    });

    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok(sse_event(event)), rx))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

// ── Resume & interview ─────────────────────────────────────────────────────

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Result<Json<ResumeSnapshot>, AppError> {
    Ok(Json(state.shell.lock().await.resume()?))
}

/// POST /api/v1/resume/tab
pub async fn handle_select_tab(
    State(state): State<AppState>,
    Json(req): Json<TabRequest>,
) -> Result<Json<ResumeSnapshot>, AppError> {
    let (effects, snapshot) = {
        let mut shell = state.shell.lock().await;
        let effects = shell.select_resume_tab(req.tab)?;
        (effects, shell.resume()?)
    };
    dispatch(&state, effects);
    Ok(Json(snapshot))
}

/// POST /api/v1/resume/feedback
///
/// The review runs on its own task and completes even if the client disconnects.
pub async fn handle_resume_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequestBody>,
) -> Result<Json<ResumeSnapshot>, AppError> {
    let request = state.shell.lock().await.begin_feedback(&req.resume_text)?;

    let shell = state.shell.clone();
    let llm = state.llm.clone();
    tokio::spawn(async move { run_feedback(&shell, llm.as_ref(), request).await })
        .await
        .map_err(anyhow::Error::from)?;

    Ok(Json(state.shell.lock().await.resume()?))
}

/// POST /api/v1/resume/interview/messages
///
/// The turn runs on its own task and completes even if the client disconnects.
pub async fn handle_interview_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<ResumeSnapshot>, AppError> {
    let turn = state.shell.lock().await.begin_interview_answer(&req.message)?;

    let shell = state.shell.clone();
    tokio::spawn(async move { run_interview_turn(&shell, turn).await })
        .await
        .map_err(anyhow::Error::from)?;

    Ok(Json(state.shell.lock().await.resume()?))
}
