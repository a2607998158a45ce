//! Presentation port for the upload controller and the view models it renders.

use std::sync::{Mutex, PoisonError};

use shared::protocol::AnalysisResponse;

pub const PREPARING_MESSAGE: &str = "Preparing upload...";

/// Where the controller draws its three regions.
///
/// `show_result` and `show_error` replace whatever was visible, including
/// the progress region. Implementations must not merge with prior content.
pub trait Presenter: Send + Sync {
    fn show_progress(&self, percent: u8, message: &str);
    fn show_result(&self, view: &ResultView);
    fn show_error(&self, view: &ErrorView);
    fn hide_result(&self);
    fn set_submit_enabled(&self, enabled: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub filename: String,
    /// e.g. `"1.00 MB"`.
    pub size: String,
    /// e.g. `"87/100"`.
    pub score: String,
    pub feedback: String,
    pub details: Vec<DetailLine>,
    /// Server order, never sorted.
    pub recommendations: Vec<String>,
}

impl ResultView {
    pub fn from_response(response: &AnalysisResponse) -> Self {
        let analysis = &response.analysis;
        Self {
            filename: response.filename.clone(),
            size: format!("{} MB", response.size_mib_display()),
            score: format!("{}/100", analysis.score),
            feedback: analysis.feedback.clone(),
            details: vec![
                DetailLine {
                    label: "Pitch accuracy",
                    value: analysis.details.pitch_accuracy.clone(),
                },
                DetailLine {
                    label: "Rhythm stability",
                    value: analysis.details.rhythm_stability.clone(),
                },
                DetailLine {
                    label: "Vocal range",
                    value: analysis.details.vocal_range.clone(),
                },
            ],
            recommendations: analysis.details.recommendations.clone(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Upload succeeded!\n");
        out.push_str(&format!("File name: {}\n", self.filename));
        out.push_str(&format!("File size: {}\n", self.size));
        out.push_str("\nAnalysis\n");
        out.push_str(&format!("Overall score: {}\n", self.score));
        out.push_str(&format!("Feedback: {}\n", self.feedback));
        out.push_str("\nDetails:\n");
        for line in &self.details {
            out.push_str(&format!("  - {}: {}\n", line.label, line.value));
        }
        out.push_str("\nRecommendations:\n");
        for recommendation in &self.recommendations {
            out.push_str(&format!("  - {recommendation}\n"));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
    /// Label of the action that clears the selection so a new file can be chosen.
    pub reset_label: &'static str,
}

impl ErrorView {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            reset_label: "Upload again",
        }
    }

    pub fn render_text(&self) -> String {
        format!("Upload failed\n{}\n[{}]\n", self.message, self.reset_label)
    }
}

/// The single region visible at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Progress {
        percent: u8,
        message: String,
    },
    Result(ResultView),
    Error(ErrorView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterCall {
    Progress { percent: u8, message: String },
    Result(ResultView),
    Error(ErrorView),
    HideResult,
    SubmitEnabled(bool),
}

#[derive(Debug)]
struct RecordedUi {
    state: UiState,
    submit_enabled: bool,
    calls: Vec<PresenterCall>,
}

/// In-memory presenter that keeps the visible region and a call log.
#[derive(Debug)]
pub struct RecordingPresenter {
    inner: Mutex<RecordedUi>,
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self {
            inner: Mutex::new(RecordedUi {
                state: UiState::Idle,
                submit_enabled: true,
                calls: Vec::new(),
            }),
        }
    }
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UiState {
        self.lock().state.clone()
    }

    pub fn submit_enabled(&self) -> bool {
        self.lock().submit_enabled
    }

    pub fn calls(&self) -> Vec<PresenterCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordedUi> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: PresenterCall, state: Option<UiState>) {
        let mut guard = self.lock();
        if let Some(state) = state {
            guard.state = state;
        }
        guard.calls.push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn show_progress(&self, percent: u8, message: &str) {
        self.record(
            PresenterCall::Progress {
                percent,
                message: message.to_string(),
            },
            Some(UiState::Progress {
                percent,
                message: message.to_string(),
            }),
        );
    }

    fn show_result(&self, view: &ResultView) {
        self.record(
            PresenterCall::Result(view.clone()),
            Some(UiState::Result(view.clone())),
        );
    }

    fn show_error(&self, view: &ErrorView) {
        self.record(
            PresenterCall::Error(view.clone()),
            Some(UiState::Error(view.clone())),
        );
    }

    fn hide_result(&self) {
        self.record(PresenterCall::HideResult, Some(UiState::Idle));
    }

    fn set_submit_enabled(&self, enabled: bool) {
        let mut guard = self.lock();
        guard.submit_enabled = enabled;
        guard.calls.push(PresenterCall::SubmitEnabled(enabled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::protocol::{Analysis, AnalysisDetails};

    fn sample_response() -> AnalysisResponse {
        AnalysisResponse {
            filename: "a.mp3".into(),
            size: 1_048_576,
            analysis: Analysis {
                score: 87,
                feedback: "nice".into(),
                details: AnalysisDetails {
                    pitch_accuracy: "92%".into(),
                    rhythm_stability: "88%".into(),
                    vocal_range: "2 octaves".into(),
                    recommendations: vec!["warm up".into(), "breathe more".into()],
                },
            },
        }
    }

    #[test]
    fn result_view_formats_size_and_score() {
        let view = ResultView::from_response(&sample_response());
        assert_eq!(view.size, "1.00 MB");
        assert_eq!(view.score, "87/100");
        assert_eq!(view.details[2].value, "2 octaves");
    }

    #[test]
    fn recommendations_keep_server_order() {
        let view = ResultView::from_response(&sample_response());
        assert_eq!(view.recommendations, vec!["warm up", "breathe more"]);

        let text = view.render_text();
        let warm = text.find("  - warm up").expect("warm up listed");
        let breathe = text.find("  - breathe more").expect("breathe listed");
        assert!(warm < breathe);
    }

    #[test]
    fn error_text_is_verbatim_with_reset_action() {
        let text = ErrorView::new("Server error: 500").render_text();
        assert!(text.contains("\nServer error: 500\n"));
        assert!(text.contains("[Upload again]"));
    }

    #[test]
    fn recording_presenter_keeps_one_visible_region() {
        let presenter = RecordingPresenter::new();
        assert_eq!(presenter.state(), UiState::Idle);

        presenter.show_progress(0, PREPARING_MESSAGE);
        assert!(matches!(presenter.state(), UiState::Progress { percent: 0, .. }));

        presenter.show_error(&ErrorView::new("boom"));
        assert!(matches!(presenter.state(), UiState::Error(_)));

        presenter.show_result(&ResultView::from_response(&sample_response()));
        assert!(matches!(presenter.state(), UiState::Result(_)));

        presenter.hide_result();
        assert_eq!(presenter.state(), UiState::Idle);
        assert_eq!(presenter.calls().len(), 4);
    }
}
