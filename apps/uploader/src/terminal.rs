//! Terminal adapter for the upload presenter port.

use std::{
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use upload_client::{ErrorView, Presenter, ResultView};

pub struct TerminalPresenter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalPresenter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!(error = %err, "terminal: failed to write output");
        }
    }
}

impl Presenter for TerminalPresenter {
    fn show_progress(&self, percent: u8, message: &str) {
        self.write(&format!("[{percent:>3}%] {message}\n"));
    }

    fn show_result(&self, view: &ResultView) {
        self.write(&format!("\n{}", view.render_text()));
    }

    fn show_error(&self, view: &ErrorView) {
        self.write(&format!("\n{}", view.render_text()));
    }

    fn hide_result(&self) {
        self.write("\n");
    }

    fn set_submit_enabled(&self, enabled: bool) {
        tracing::debug!(enabled, "terminal: submit control toggled");
    }
}
