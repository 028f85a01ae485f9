use crate::cli::ChatArgs;
use crate::config::prompt::resolve_prompts;
use crate::conversation::{ ConversationSession, TurnOutcome };
use crate::history::create_session_store;
use crate::llm::LlmConfig;
use crate::llm::chat::new_client;
use crate::view::{ ChatView, TerminalView };

use log::info;
use std::error::Error;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, BufReader };

#[derive(Debug, PartialEq, Eq)]
enum ConsoleInput<'a> {
    Turn(&'a str),
    Reset,
    Quit,
}

fn parse_input(line: &str) -> ConsoleInput<'_> {
    match line.trim() {
        "/reset" => ConsoleInput::Reset,
        "/quit" | "/exit" => ConsoleInput::Quit,
        _ => ConsoleInput::Turn(line),
    }
}

pub async fn run_chat(args: ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let prompts = resolve_prompts(args.prompts_path.as_deref())?;
    let store = create_session_store(&args)?;
    let config = LlmConfig::from_parts(
        args.worker_url.clone(),
        args.openai_api_key.clone(),
        Some(args.upstream_url.clone())
    );
    info!("Chat endpoint: {}", config.endpoint);
    let client = new_client(&config)?;

    let session = ConversationSession::open(store, client, TerminalView::stdout(), prompts).await;
    let stdin = BufReader::new(tokio::io::stdin());
    drive(session, stdin).await?;
    Ok(())
}

/// Feeds input lines into the session until `/quit` or end of input.
async fn drive<V, R>(mut session: ConversationSession<V>, input: R) -> std::io::Result<ConversationSession<V>>
    where V: ChatView, R: AsyncBufRead + Unpin
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            ConsoleInput::Quit => {
                break;
            }
            ConsoleInput::Reset => {
                session.reset_conversation().await;
                info!("Conversation cleared");
            }
            ConsoleInput::Turn(text) => {
                if session.submit_turn(text).await == TurnOutcome::Fallback {
                    info!("Turn failed; resubmit to try again");
                }
            }
        }
    }
    Ok(session)
}
