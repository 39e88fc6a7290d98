use crate::{
    api::ChatClient,
    constants::{NEW_CONVERSATION_TEXT, SEND_ERROR_MESSAGE},
    errors::DocentResult,
    message::Message,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Message,
    NewConversation,
}

/// A request the caller must deliver to the backend, then hand the outcome
/// back through [`ChatState::finish_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub kind: RequestKind,
    pub text: String,
}

/// Conversation state behind the chat view.
///
/// At most one request is in flight: while loading, the input is frozen and
/// further sends are refused.
#[derive(Debug, Default)]
pub struct ChatState {
    messages: Vec<Message>,
    input: String,
    loading: bool,
    /// Lines scrolled up from the newest message. Zero follows the tail.
    scroll_offset: u16,
    /// Largest useful offset for the last drawn pane.
    max_scroll: u16,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn push_char(&mut self, c: char) {
        if !self.loading {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.loading {
            self.input.pop();
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        if !self.loading {
            self.input = text.into();
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(self.max_scroll);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Records the laid-out conversation height against the pane height and
    /// clamps the offset so it never points above the first line.
    pub fn set_viewport(&mut self, total_lines: u16, height: u16) {
        self.max_scroll = total_lines.saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll);
    }

    /// Starts sending the current input.
    ///
    /// Returns `None` for blank input or while another request is in flight.
    /// Otherwise the user message is appended immediately and the loading
    /// flag is raised.
    pub fn begin_send(&mut self) -> Option<PendingRequest> {
        if self.loading || self.input.trim().is_empty() {
            return None;
        }

        let text = self.input.clone();
        self.push_message(Message::user(text.clone()));
        self.loading = true;

        Some(PendingRequest {
            kind: RequestKind::Message,
            text,
        })
    }

    /// Asks the backend to drop its session. No user message is shown; the
    /// local history is cleared once the backend confirms.
    pub fn begin_new_conversation(&mut self) -> Option<PendingRequest> {
        if self.loading {
            return None;
        }

        self.loading = true;
        Some(PendingRequest {
            kind: RequestKind::NewConversation,
            text: NEW_CONVERSATION_TEXT.to_string(),
        })
    }

    /// Applies the outcome of a request started by `begin_*`.
    pub fn finish_send(&mut self, kind: RequestKind, result: DocentResult<String>) {
        match result {
            Ok(reply) => {
                if kind == RequestKind::NewConversation {
                    log::info!("Backend conversation reset, clearing {} messages", self.messages.len());
                    self.messages.clear();
                }
                self.push_message(Message::bot(reply));
            }
            Err(e) => {
                log::error!("Error sending message: {}", e);
                self.push_message(Message::bot(SEND_ERROR_MESSAGE));
            }
        }

        self.loading = false;
        self.input.clear();
    }

    /// Sends the current input and waits for the reply.
    pub async fn send(&mut self, client: &ChatClient) {
        if let Some(request) = self.begin_send() {
            let result = client.send_message(&request.text).await;
            self.finish_send(request.kind, result);
        }
    }

    fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::DocentError, message::Author};
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::new(format!("{}/chat/", server.uri()))
    }

    #[test]
    fn test_blank_input_is_a_no_op() {
        let mut state = ChatState::new();
        assert!(state.begin_send().is_none());

        state.set_input("   \t ");
        assert!(state.begin_send().is_none());
        assert!(state.messages().is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_begin_send_appends_user_message_immediately() {
        let mut state = ChatState::new();
        state.set_input("Hello");

        let request = state.begin_send().unwrap();
        assert_eq!(request.text, "Hello");
        assert_eq!(request.kind, RequestKind::Message);
        assert_eq!(state.messages(), &[Message::user("Hello")]);
        assert!(state.is_loading());
    }

    #[test]
    fn test_second_send_refused_while_loading() {
        let mut state = ChatState::new();
        state.set_input("first");
        state.begin_send().unwrap();

        state.push_char('x');
        state.pop_char();
        state.set_input("second");
        assert_eq!(state.input(), "first");
        assert!(state.begin_send().is_none());
        assert!(state.begin_new_conversation().is_none());
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_finish_send_success() {
        let mut state = ChatState::new();
        state.set_input("Hello");
        let request = state.begin_send().unwrap();

        state.finish_send(request.kind, Ok("**ok**".to_string()));

        assert_eq!(
            state.messages(),
            &[Message::user("Hello"), Message::bot("**ok**")]
        );
        assert!(!state.is_loading());
        assert_eq!(state.input(), "");
    }

    #[test]
    fn test_finish_send_failure_uses_fixed_text() {
        let mut state = ChatState::new();
        state.set_input("Hello");
        let request = state.begin_send().unwrap();

        state.finish_send(request.kind, Err(DocentError::api_error("boom")));

        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.messages()[1].author, Author::Bot);
        assert_eq!(state.messages()[1].content, SEND_ERROR_MESSAGE);
        assert!(!state.is_loading());
        assert_eq!(state.input(), "");
    }

    #[test]
    fn test_new_messages_snap_scroll_to_bottom() {
        let mut state = ChatState::new();
        state.set_viewport(40, 10);
        state.scroll_up(7);
        assert_eq!(state.scroll_offset(), 7);

        state.set_input("Hello");
        state.begin_send().unwrap();
        assert_eq!(state.scroll_offset(), 0);

        state.scroll_up(3);
        state.scroll_down(10);
        assert_eq!(state.scroll_offset(), 0);
    }

    #[test]
    fn test_scroll_up_stops_at_top() {
        let mut state = ChatState::new();
        state.scroll_up(5);
        assert_eq!(state.scroll_offset(), 0);

        state.set_viewport(100, 20);
        for _ in 0..50 {
            state.scroll_up(10);
        }
        assert_eq!(state.scroll_offset(), 80);

        state.scroll_down(10);
        assert_eq!(state.scroll_offset(), 70);
    }

    #[test]
    fn test_shrinking_viewport_clamps_offset() {
        let mut state = ChatState::new();
        state.set_viewport(100, 20);
        state.scroll_up(80);

        state.set_viewport(30, 20);
        assert_eq!(state.scroll_offset(), 10);
    }

    #[test]
    fn test_new_conversation_clears_history_on_success() {
        let mut state = ChatState::new();
        state.set_input("Hello");
        let request = state.begin_send().unwrap();
        state.finish_send(request.kind, Ok("Hi".to_string()));

        let reset = state.begin_new_conversation().unwrap();
        assert_eq!(reset.text, NEW_CONVERSATION_TEXT);
        assert_eq!(state.messages().len(), 2);

        state.finish_send(reset.kind, Ok("Conversation reset successfully.".to_string()));
        assert_eq!(
            state.messages(),
            &[Message::bot("Conversation reset successfully.")]
        );
        assert!(!state.is_loading());
    }

    #[test]
    fn test_new_conversation_keeps_history_on_failure() {
        let mut state = ChatState::new();
        state.set_input("Hello");
        let request = state.begin_send().unwrap();
        state.finish_send(request.kind, Ok("Hi".to_string()));

        let reset = state.begin_new_conversation().unwrap();
        state.finish_send(reset.kind, Err(DocentError::api_error("down")));

        assert_eq!(state.messages().len(), 3);
        assert_eq!(state.messages()[2].content, SEND_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_send_against_backend_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/"))
            .and(body_json(json!({ "text": "Hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "**ok**" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut state = ChatState::new();
        state.set_input("Hello");
        state.send(&client_for(&mock_server)).await;

        assert_eq!(
            state.messages(),
            &[Message::user("Hello"), Message::bot("**ok**")]
        );
        assert_eq!(state.input(), "");
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_send_against_backend_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut state = ChatState::new();
        state.set_input("Hello");
        state.send(&client_for(&mock_server)).await;

        assert_eq!(
            state.messages(),
            &[Message::user("Hello"), Message::bot(SEND_ERROR_MESSAGE)]
        );
        assert_eq!(state.input(), "");
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_blank_send_makes_no_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut state = ChatState::new();
        state.set_input("  ");
        state.send(&client_for(&mock_server)).await;

        assert!(state.messages().is_empty());
    }
}
