use crate::chat::PendingRequest;
use crate::conversation::save_transcript;
use crate::App;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const SCROLL_PAGE: u16 = 10;

/// Applies one key press to the app. Returns a request when the key started
/// a send; the caller is responsible for delivering it.
pub fn handle_chat_input(key: KeyEvent, app: &mut App) -> Option<PendingRequest> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let request = match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Enter => {
            app.status_indicator.clear_status();
            app.chat.begin_send()
        }
        KeyCode::PageUp => {
            app.chat.scroll_up(SCROLL_PAGE);
            None
        }
        KeyCode::PageDown => {
            app.chat.scroll_down(SCROLL_PAGE);
            None
        }
        KeyCode::Backspace => {
            app.chat.pop_char();
            None
        }
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => match c {
            'c' => {
                app.should_quit = true;
                None
            }
            'n' => {
                app.status_indicator.clear_status();
                app.chat.begin_new_conversation()
            }
            's' => {
                export_transcript(app);
                None
            }
            _ => None,
        },
        KeyCode::Char(c) => {
            app.chat.push_char(c);
            None
        }
        _ => None,
    };

    app.sync_status();
    request
}

fn export_transcript(app: &mut App) {
    if app.chat.messages().is_empty() {
        app.status_indicator.set_status("Nothing to export yet");
        return;
    }

    match save_transcript(app.chat.messages(), &app.transcript_dir) {
        Ok(path) => app
            .status_indicator
            .set_status(format!("Transcript saved to {}", path.display())),
        Err(e) => {
            log::error!("Failed to export transcript: {}", e);
            app.status_indicator
                .set_status(format!("Transcript export failed: {}", e));
        }
    }
}
