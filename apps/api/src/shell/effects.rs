//! Runs the async work screens start: mount effects and user-initiated turns.
//!
//! The shell lock is taken only to apply a result, never across an LLM call.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::careers::suggest_careers;
use crate::chat::prompts::INTERVIEW_OPENING;
use crate::chat::ChatSession;
use crate::llm_client::LlmBackend;
use crate::models::Profile;
use crate::resume::get_resume_feedback;
use crate::roadmap::generate_roadmap;
use crate::screens::Ticket;

use super::{AppShell, FeedbackRequest, InterviewTurn, MentorTurn};

/// Async work requested by a screen mount.
pub enum Effect {
    FetchSuggestions {
        ticket: Ticket,
        profile: Profile,
    },
    GenerateRoadmap {
        ticket: Ticket,
        profile: Profile,
        target_role: String,
    },
    OpenInterview {
        ticket: Ticket,
        session: ChatSession,
    },
}

/// Progress of a streamed mentor reply, as relayed to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentorEvent {
    /// Reply text received so far.
    Fragment(String),
    Done,
    Failed,
}

pub async fn run_effect(shell: &Mutex<AppShell>, llm: &dyn LlmBackend, effect: Effect) -> bool {
    match effect {
        Effect::FetchSuggestions { ticket, profile } => {
            let suggestions = suggest_careers(llm, &profile).await;
            shell.lock().await.apply_suggestions(ticket, suggestions)
        }
        Effect::GenerateRoadmap {
            ticket,
            profile,
            target_role,
        } => {
            let result = generate_roadmap(llm, &profile, &target_role).await;
            shell.lock().await.apply_roadmap(ticket, result)
        }
        Effect::OpenInterview {
            ticket,
            mut session,
        } => {
            let result = session.send(INTERVIEW_OPENING).await;
            shell
                .lock()
                .await
                .apply_interview_opening(ticket, session, result)
        }
    }
}

/// Runs each effect on its own task.
pub fn spawn_effects(shell: Arc<Mutex<AppShell>>, llm: Arc<dyn LlmBackend>, effects: Vec<Effect>) {
    for effect in effects {
        let shell = shell.clone();
        let llm = llm.clone();
        tokio::spawn(async move {
            run_effect(&shell, llm.as_ref(), effect).await;
        });
    }
}

/// Streams one mentor reply into the shell and relays its progress on `events`.
/// The session goes back to the mentor screen when the turn ends.
pub async fn run_mentor_turn(
    shell: &Mutex<AppShell>,
    turn: MentorTurn,
    events: &mpsc::UnboundedSender<MentorEvent>,
) -> bool {
    let MentorTurn {
        ticket,
        mut session,
        message,
    } = turn;

    let succeeded = stream_reply(shell, ticket, &mut session, &message, events).await;
    let applied = shell
        .lock()
        .await
        .finish_mentor_turn(ticket, session, succeeded);

    // The client may have disconnected.
    let _ = events.send(if succeeded {
        MentorEvent::Done
    } else {
        MentorEvent::Failed
    });
    applied
}

async fn stream_reply(
    shell: &Mutex<AppShell>,
    ticket: Ticket,
    session: &mut ChatSession,
    message: &str,
    events: &mpsc::UnboundedSender<MentorEvent>,
) -> bool {
    let mut reply = match session.send_stream(message).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Mentor reply failed to start: {e}");
            return false;
        }
    };

    while let Some(fragment) = reply.next_fragment().await {
        if let Err(e) = fragment {
            warn!("Mentor reply interrupted: {e}");
            return false;
        }
        let text = reply.text().to_string();
        if !shell.lock().await.apply_mentor_fragment(ticket, &text) {
            debug!("Mentor screen unmounted mid-reply");
        }
        let _ = events.send(MentorEvent::Fragment(text));
    }
    true
}

pub async fn run_interview_turn(shell: &Mutex<AppShell>, turn: InterviewTurn) -> bool {
    let InterviewTurn {
        ticket,
        mut session,
        answer,
    } = turn;
    let result = session.send(&answer).await;
    shell
        .lock()
        .await
        .finish_interview_answer(ticket, session, result)
}

pub async fn run_feedback(shell: &Mutex<AppShell>, llm: &dyn LlmBackend, request: FeedbackRequest) -> bool {
    let result = get_resume_feedback(llm, &request.resume_text).await;
    shell.lock().await.finish_feedback(request.ticket, result)
}
