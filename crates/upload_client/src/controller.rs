use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use shared::protocol::AnalysisResponse;
use tracing::{debug, error, info, warn};

use crate::{
    error::{RejectionBody, TransportError, UploadError, ValidationError},
    presenter::{ErrorView, Presenter, ResultView, PREPARING_MESSAGE},
    selection::{validate_selection, SelectedFile},
    transport::{HttpReply, UploadTransport},
};

/// Result of one network attempt, consumed by rendering right away.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success(AnalysisResponse),
    Failure(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }

    /// Classifies a finished exchange.
    pub fn from_reply(reply: Result<HttpReply, TransportError>) -> Self {
        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => return UploadOutcome::Failure(UploadError::Transport(err)),
        };

        if reply.is_success() {
            return match serde_json::from_slice::<AnalysisResponse>(&reply.body) {
                Ok(response) => UploadOutcome::Success(response),
                Err(err) => UploadOutcome::Failure(UploadError::Transport(
                    TransportError::InvalidBody(err.to_string()),
                )),
            };
        }

        UploadOutcome::Failure(UploadError::ServerRejected {
            status: reply.status,
            body: RejectionBody::from_bytes(&reply.body),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// An upload is already running; the submit control is disabled.
    Busy,
    Rejected(ValidationError),
    Uploaded(UploadOutcome),
}

/// Disables the submit control for its lifetime.
struct SubmitControlGuard<'a> {
    presenter: &'a dyn Presenter,
}

impl<'a> SubmitControlGuard<'a> {
    fn disable(presenter: &'a dyn Presenter) -> Self {
        presenter.set_submit_enabled(false);
        Self { presenter }
    }
}

impl Drop for SubmitControlGuard<'_> {
    fn drop(&mut self) {
        self.presenter.set_submit_enabled(true);
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct UploadController {
    transport: Arc<dyn UploadTransport>,
    presenter: Arc<dyn Presenter>,
    selection: Mutex<Option<SelectedFile>>,
    in_flight: AtomicBool,
}

impl UploadController {
    pub fn new(transport: Arc<dyn UploadTransport>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            transport,
            presenter,
            selection: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn select(&self, file: SelectedFile) {
        debug!(filename = file.name(), size_bytes = file.size_bytes(), "upload: file selected");
        *self.lock_selection() = Some(file);
    }

    pub fn selection(&self) -> Option<SelectedFile> {
        self.lock_selection().clone()
    }

    /// Reset action of the error view: hides the result and clears the selection.
    /// The previous file is never retried.
    pub fn reset(&self) {
        self.presenter.hide_result();
        *self.lock_selection() = None;
        debug!("upload: selection cleared");
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validates the current selection and, if it passes, uploads it.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_in_flight) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("upload: submit ignored while an upload is running");
            return SubmitOutcome::Busy;
        };

        let selection = self.selection();
        let file = match validate_selection(selection.as_ref()) {
            Ok(file) => file,
            Err(err) => {
                warn!(error = %err, "upload: selection rejected");
                self.render_error(&err.to_string());
                return SubmitOutcome::Rejected(err);
            }
        };

        SubmitOutcome::Uploaded(self.upload(file).await)
    }

    /// One multipart POST of `file`, rendered on completion.
    ///
    /// The submit control is re-enabled after rendering on every path.
    pub async fn upload(&self, file: &SelectedFile) -> UploadOutcome {
        let _submit_control = SubmitControlGuard::disable(self.presenter.as_ref());
        self.presenter.show_progress(0, PREPARING_MESSAGE);
        info!(
            filename = file.name(),
            size_bytes = file.size_bytes(),
            mime_type = file.mime_type(),
            "upload: starting"
        );

        let outcome = UploadOutcome::from_reply(self.transport.send_file(file).await);
        match &outcome {
            UploadOutcome::Success(response) => {
                info!(
                    filename = %response.filename,
                    size_bytes = response.size,
                    score = response.analysis.score,
                    "upload: analysis received"
                );
                self.render_success(response);
            }
            UploadOutcome::Failure(err @ UploadError::ServerRejected { status, .. }) => {
                warn!(status, error = %err, "upload: rejected by server");
                self.render_error(&err.to_string());
            }
            UploadOutcome::Failure(err @ UploadError::Transport(_)) => {
                error!(error = %err, "upload: transport failure");
                self.render_error(&err.to_string());
            }
        }
        outcome
    }

    pub fn render_success(&self, response: &AnalysisResponse) {
        self.presenter
            .show_result(&ResultView::from_response(response));
    }

    pub fn render_error(&self, message: &str) {
        self.presenter.show_error(&ErrorView::new(message));
    }

    fn lock_selection(&self) -> std::sync::MutexGuard<'_, Option<SelectedFile>> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
