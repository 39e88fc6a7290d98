// src/ui.rs

use crate::{
    api::ChatClient,
    chat::RequestKind,
    chat_view::draw_chat,
    errors::DocentResult,
    key_handlers::handle_chat_input,
    App,
};
use crossterm::{
    event::{self, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc;

const INPUT_POLL: Duration = Duration::from_millis(100);
const TICK_RATE: Duration = Duration::from_millis(120);

/// Events the main loop reacts to.
enum Event {
    Input(CEvent),
    Reply(RequestKind, DocentResult<String>),
}

/// Runs the terminal UI until the user quits.
pub async fn run_ui(client: ChatClient, app: App) -> DocentResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, client, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    client: ChatClient,
    mut app: App,
) -> DocentResult<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Terminal reads block, so they get their own thread
    let input_tx = tx.clone();
    tokio::task::spawn_blocking(move || loop {
        match event::poll(INPUT_POLL) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if input_tx.blocking_send(Event::Input(event)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("Failed to read terminal event: {}", e);
                    return;
                }
            },
            Ok(false) => {
                if input_tx.is_closed() {
                    return;
                }
            }
            Err(e) => {
                log::error!("Failed to poll terminal events: {}", e);
                return;
            }
        }
    });

    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| draw_chat(f, &mut app))?;

        tokio::select! {
            Some(event) = rx.recv() => handle_event(event, &mut app, &client, &tx),
            _ = ticker.tick() => {}
        }

        if app.should_quit {
            break;
        }
    }

    log::info!("Exiting with {} messages in the conversation", app.chat.messages().len());
    Ok(())
}

fn handle_event(event: Event, app: &mut App, client: &ChatClient, tx: &mpsc::Sender<Event>) {
    match event {
        Event::Input(CEvent::Key(key)) => {
            if let Some(request) = handle_chat_input(key, app) {
                log::debug!("Sending {:?} request ({} chars)", request.kind, request.text.len());
                let client = client.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = client.send_message(&request.text).await;
                    // The loop may already be gone if the user quit mid-request
                    let _ = tx.send(Event::Reply(request.kind, result)).await;
                });
            }
        }
        Event::Input(_) => {}
        Event::Reply(kind, result) => {
            app.chat.finish_send(kind, result);
            app.sync_status();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::DocentError, message::Message};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;
    use std::path::PathBuf;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn press(code: KeyCode) -> Event {
        Event::Input(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[tokio::test]
    async fn test_reply_event_hides_spinner() {
        let client = ChatClient::new("http://127.0.0.1:9/chat/");
        let mut app = App::new(client.endpoint(), PathBuf::from("."));
        let (tx, _rx) = mpsc::channel(4);

        app.chat.set_input("Hello");
        let request = app.chat.begin_send().unwrap();
        app.sync_status();
        assert!(app.status_indicator.is_thinking());

        handle_event(
            Event::Reply(request.kind, Err(DocentError::api_error("down"))),
            &mut app,
            &client,
            &tx,
        );

        assert!(!app.status_indicator.is_thinking());
        assert!(!app.chat.is_loading());
        assert_eq!(app.chat.messages().len(), 2);
        assert_eq!(app.chat.input(), "");
    }

    #[tokio::test]
    async fn test_enter_sends_and_reply_is_applied() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/"))
            .and(body_json(json!({ "text": "Hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "Hi" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ChatClient::new(format!("{}/chat/", mock_server.uri()));
        let mut app = App::new(client.endpoint(), PathBuf::from("."));
        let (tx, mut rx) = mpsc::channel(4);

        for c in "Hello".chars() {
            handle_event(press(KeyCode::Char(c)), &mut app, &client, &tx);
        }
        handle_event(press(KeyCode::Enter), &mut app, &client, &tx);
        assert!(app.status_indicator.is_thinking());
        assert_eq!(app.chat.messages(), &[Message::user("Hello")]);

        let reply = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        handle_event(reply, &mut app, &client, &tx);

        assert_eq!(
            app.chat.messages(),
            &[Message::user("Hello"), Message::bot("Hi")]
        );
        assert!(!app.status_indicator.is_thinking());
    }
}
