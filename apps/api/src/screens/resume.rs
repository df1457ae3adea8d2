//! Resume screen: a resume-feedback tab and a mock-interview tab.
//!
//! Only the active tab's state exists: switching tabs drops the other one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chat::ChatSession;
use crate::errors::AppError;
use crate::llm_client::{LlmBackend, LlmError};
use crate::resume::prompts::RESUME_FEEDBACK_ERROR;
use crate::resume::render_markdown;
use crate::screens::interview::{InterviewSnapshot, MockInterview};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeTab {
    Resume,
    Interview,
}

#[derive(Debug, Clone, Default)]
pub struct ResumeBuilder {
    resume_text: String,
    feedback: Option<String>,
    loading: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeBuilderSnapshot {
    pub resume_text: String,
    pub loading: bool,
    pub feedback: Option<String>,
    pub feedback_html: Option<String>,
}

impl ResumeBuilder {
    /// Starts a review of `resume_text`. Returns the text to send.
    pub fn begin_feedback(&mut self, resume_text: &str) -> Result<String, AppError> {
        if self.loading {
            return Err(AppError::Conflict("feedback is already being prepared".to_string()));
        }
        if resume_text.trim().is_empty() {
            return Err(AppError::Validation("resume text cannot be empty".to_string()));
        }
        self.resume_text = resume_text.to_string();
        self.feedback = None;
        self.loading = true;
        Ok(self.resume_text.clone())
    }

    pub fn finish_feedback(&mut self, result: Result<String, LlmError>) {
        self.feedback = Some(match result {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!("Resume feedback failed: {e}");
                RESUME_FEEDBACK_ERROR.to_string()
            }
        });
        self.loading = false;
    }

    pub fn snapshot(&self) -> ResumeBuilderSnapshot {
        ResumeBuilderSnapshot {
            resume_text: self.resume_text.clone(),
            loading: self.loading,
            feedback: self.feedback.clone(),
            feedback_html: self.feedback.as_deref().map(render_markdown),
        }
    }
}

pub enum ResumeTabView {
    Builder(ResumeBuilder),
    Interview(MockInterview),
}

pub struct ResumeView {
    /// Role the mock interview targets; the interview tab is disabled without one.
    interview_role: Option<String>,
    tab: ResumeTabView,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeSnapshot {
    pub active_tab: ResumeTab,
    pub interview_role: Option<String>,
    pub interview_enabled: bool,
    pub builder: Option<ResumeBuilderSnapshot>,
    pub interview: Option<InterviewSnapshot>,
}

impl ResumeView {
    pub fn new(interview_role: Option<String>) -> Self {
        Self {
            interview_role,
            tab: ResumeTabView::Builder(ResumeBuilder::default()),
        }
    }

    pub fn active_tab(&self) -> ResumeTab {
        match self.tab {
            ResumeTabView::Builder(_) => ResumeTab::Resume,
            ResumeTabView::Interview(_) => ResumeTab::Interview,
        }
    }

    /// Switches tab. Opening the interview tab returns the session for the
    /// opening turn.
    pub fn select_tab(
        &mut self,
        tab: ResumeTab,
        llm: Arc<dyn LlmBackend>,
    ) -> Result<Option<ChatSession>, AppError> {
        match tab {
            ResumeTab::Resume => {
                self.tab = ResumeTabView::Builder(ResumeBuilder::default());
                Ok(None)
            }
            ResumeTab::Interview => {
                let role = self.interview_role.as_deref().ok_or_else(|| {
                    AppError::Validation(
                        "select a career on the dashboard to start a mock interview".to_string(),
                    )
                })?;
                let (interview, session) = MockInterview::mount(llm, role);
                self.tab = ResumeTabView::Interview(interview);
                Ok(Some(session))
            }
        }
    }

    pub fn builder_mut(&mut self) -> Result<&mut ResumeBuilder, AppError> {
        match &mut self.tab {
            ResumeTabView::Builder(builder) => Ok(builder),
            ResumeTabView::Interview(_) => {
                Err(AppError::Conflict("resume tab is not active".to_string()))
            }
        }
    }

    pub fn interview_mut(&mut self) -> Result<&mut MockInterview, AppError> {
        match &mut self.tab {
            ResumeTabView::Interview(interview) => Ok(interview),
            ResumeTabView::Builder(_) => {
                Err(AppError::Conflict("interview tab is not active".to_string()))
            }
        }
    }

    pub fn snapshot(&self) -> ResumeSnapshot {
        let (builder, interview) = match &self.tab {
            ResumeTabView::Builder(b) => (Some(b.snapshot()), None),
            ResumeTabView::Interview(i) => (None, Some(i.snapshot())),
        };
        ResumeSnapshot {
            active_tab: self.active_tab(),
            interview_role: self.interview_role.clone(),
            interview_enabled: self.interview_role.is_some(),
            builder,
            interview,
        }
    }
}
