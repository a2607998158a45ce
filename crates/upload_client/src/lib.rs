//! Client-side audio upload: selection checks, one multipart POST, and
//! rendering of the analysis or error through a [`Presenter`].

pub mod controller;
pub mod error;
pub mod presenter;
pub mod selection;
pub mod transport;

pub use controller::{SubmitOutcome, UploadController, UploadOutcome};
pub use error::{RejectionBody, TransportError, UploadError, ValidationError};
pub use presenter::{ErrorView, Presenter, RecordingPresenter, ResultView, UiState};
pub use selection::{validate_selection, FileContents, SelectedFile};
pub use transport::{HttpReply, HttpUploadTransport, UploadTransport};
