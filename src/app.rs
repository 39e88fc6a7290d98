use crate::chat::ChatState;
use crate::status_indicator::StatusIndicator;
use std::path::PathBuf;

pub struct App {
    pub chat: ChatState,
    pub status_indicator: StatusIndicator,
    /// Shown in the header so the user knows which backend answers.
    pub endpoint: String,
    pub transcript_dir: PathBuf,
    pub should_quit: bool,
}

impl App {
    pub fn new(endpoint: impl Into<String>, transcript_dir: PathBuf) -> App {
        App {
            chat: ChatState::new(),
            status_indicator: StatusIndicator::new(),
            endpoint: endpoint.into(),
            transcript_dir,
            should_quit: false,
        }
    }

    /// Keeps the spinner in step with the chat's loading flag.
    pub fn sync_status(&mut self) {
        self.status_indicator.set_thinking(self.chat.is_loading());
    }
}
