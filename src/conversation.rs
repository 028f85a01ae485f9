use crate::config::STATE_KEY;
use crate::config::prompt::{ PromptConfig, FALLBACK_REPLY };
use crate::history::SessionStore;
use crate::llm::chat::{ ChatClient, ChatError };
use crate::models::chat::{ ChatMessage, Role };
use crate::view::{ BubbleKind, ChatView };

use log::{ debug, error, info, warn };
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing happened.
    Ignored,
    Replied,
    /// The call failed and the fallback reply was appended instead.
    Fallback,
}

/// Returns the messages to send upstream: the history itself when it already
/// opens with a system message, otherwise a copy with one prepended.
pub fn with_system_prompt(history: &[ChatMessage], system_prompt: &str) -> Vec<ChatMessage> {
    match history.first() {
        Some(first) if first.role == Role::System => history.to_vec(),
        _ => {
            let mut messages = Vec::with_capacity(history.len() + 1);
            messages.push(ChatMessage::system(system_prompt));
            messages.extend_from_slice(history);
            messages
        }
    }
}

/// One chat session: the history, where it is persisted, how turns are sent,
/// and where they are drawn.
///
/// Turns take `&mut self`, so a second submission cannot start while one is
/// still waiting for its reply.
pub struct ConversationSession<V: ChatView> {
    history: Vec<ChatMessage>,
    store: Arc<dyn SessionStore>,
    client: Arc<dyn ChatClient>,
    view: V,
    prompts: PromptConfig,
}

impl<V: ChatView> ConversationSession<V> {
    /// Loads the stored history, seeding it with the system prompt and the
    /// greeting when there is none, then renders it.
    pub async fn open(
        store: Arc<dyn SessionStore>,
        client: Arc<dyn ChatClient>,
        view: V,
        prompts: PromptConfig
    ) -> Self {
        let mut session = Self {
            history: Vec::new(),
            store,
            client,
            view,
            prompts,
        };
        session.history = session.load_history().await;
        if session.history.is_empty() {
            session.history = vec![
                ChatMessage::system(session.prompts.system_prompt.clone()),
                ChatMessage::assistant(session.prompts.greeting.clone())
            ];
            session.save_history().await;
        } else {
            info!("Restored {} messages from session storage", session.history.len());
        }
        session.render_all();
        session
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Missing or unreadable history is an empty history.
    pub async fn load_history(&self) -> Vec<ChatMessage> {
        let raw = match self.store.get(STATE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return Vec::new();
            }
            Err(e) => {
                warn!("Could not read session history: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
            Ok(messages) => messages,
            Err(e) => {
                debug!("Discarding malformed session history: {}", e);
                Vec::new()
            }
        }
    }

    /// Best effort; a failed write only costs the history on the next load.
    pub async fn save_history(&self) {
        let json = match serde_json::to_string(&self.history) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not serialize session history: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(STATE_KEY, &json).await {
            warn!("Could not write session history: {}", e);
        }
    }

    pub async fn submit_turn(&mut self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        self.history.push(ChatMessage::user(text));
        self.save_history().await;

        self.view.append_bubble(text, BubbleKind::User);
        self.view.show_last_question(text);
        self.view.show_typing();

        let (reply, outcome) = match self.get_ai_response(&self.history).await {
            Ok(reply) => (reply, TurnOutcome::Replied),
            Err(e) => {
                error!("Chat turn failed: {}", e);
                (FALLBACK_REPLY.to_string(), TurnOutcome::Fallback)
            }
        };

        self.view.remove_typing();
        self.view.append_bubble(&reply, BubbleKind::Ai);
        self.history.push(ChatMessage::assistant(reply));
        self.save_history().await;
        outcome
    }

    /// Sends `history` (with the system prompt guaranteed first) and returns
    /// the reply text. `history` itself is left untouched.
    pub async fn get_ai_response(&self, history: &[ChatMessage]) -> Result<String, ChatError> {
        let messages = with_system_prompt(history, &self.prompts.system_prompt);
        debug!("Sending {} messages", messages.len());
        self.client.complete(&messages).await
    }

    /// Clears storage and starts over from the system prompt alone. Unlike
    /// `open`, the greeting is not re-added.
    pub async fn reset_conversation(&mut self) {
        if let Err(e) = self.store.remove(STATE_KEY).await {
            warn!("Could not clear session history: {}", e);
        }
        self.history = vec![ChatMessage::system(self.prompts.system_prompt.clone())];
        self.save_history().await;
        self.render_all();
    }

    fn is_visible(&self, message: &ChatMessage) -> bool {
        match message.role {
            Role::System => false,
            Role::Assistant => message.content != self.prompts.system_prompt,
            Role::User => true,
        }
    }

    pub fn render_all(&mut self) {
        self.view.clear();
        for message in &self.history {
            if !self.is_visible(message) {
                continue;
            }
            let kind = match message.role {
                Role::User => BubbleKind::User,
                _ => BubbleKind::Ai,
            };
            self.view.append_bubble(&message.content, kind);
        }
    }
}
