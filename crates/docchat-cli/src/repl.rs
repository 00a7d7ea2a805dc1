use docchat_session::{ConversationEvent, ConversationManager, ScrollPosition};
use std::io::Write;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tracing::warn;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const DEFAULT_SCROLL_ROWS: usize = 5;

/// One line of user input in the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Ask(String),
    ScrollUp(usize),
    ScrollDown(usize),
    /// Resend the last question that did not get an answer.
    Retry,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse user input. Lines starting with `/` are commands; anything else
/// is a question.
pub fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplInput::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return ReplInput::Ask(trimmed.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let rows = parts
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(DEFAULT_SCROLL_ROWS);

    match name.as_str() {
        "quit" | "q" | "exit" => ReplInput::Quit,
        "up" => ReplInput::ScrollUp(rows),
        "down" => ReplInput::ScrollDown(rows),
        "retry" | "r" => ReplInput::Retry,
        _ => ReplInput::Unknown(trimmed.to_string()),
    }
}

/// Full screen for the chat view: header, visible transcript, prompt.
/// `retry` is the unanswered question kept in the draft, if any.
pub fn format_screen(
    document_id: &str,
    lines: &[String],
    position: ScrollPosition,
    pending: usize,
    retry: Option<&str>,
) -> String {
    let mut screen = String::from(CLEAR_SCREEN);
    screen.push_str(&format!("\x1b[1mChat with Document: {document_id}\x1b[0m\n"));
    screen.push_str(&"─".repeat(40));
    screen.push('\n');

    if position.visible {
        if position.offset > 0 {
            screen.push_str(&format!("  ↑ {} more line(s)\n", position.offset));
        }
        for line in lines {
            screen.push_str(line);
            screen.push('\n');
        }
        if !position.at_bottom() {
            screen.push_str(&format!("  ↓ {} more line(s)\n", position.max - position.offset));
        }
        screen.push_str(&"─".repeat(40));
        screen.push('\n');
    }

    if let Some(question) = retry {
        screen.push_str(&format!("Not answered: {question}  (/retry to resend)\n"));
    }
    if pending > 0 {
        screen.push_str(&format!("({pending} waiting) "));
    }
    screen.push_str("Ask a question... (/up /down /retry /quit)\n> ");
    screen
}

fn draw(manager: &ConversationManager) {
    let screen = format_screen(
        manager.document_id().as_str(),
        &manager.render(),
        manager.scroll_position(),
        manager.pending_count(),
        manager.retryable_draft().as_deref(),
    );
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(screen.as_bytes());
    let _ = out.flush();
}

/// Runs the chat view until the user quits or input ends.
///
/// Each question is submitted on its own task, so typing can continue while
/// answers are outstanding. The screen is redrawn on every transcript event.
/// At end of input the outstanding answers are awaited before leaving;
/// `/quit` leaves at once.
pub async fn run_chat<R>(manager: ConversationManager, lines: &mut Lines<R>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut events = manager.subscribe();
    let mut in_flight = JoinSet::new();
    let mut input_ended = false;
    draw(&manager);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    input_ended = true;
                    break;
                };
                match parse_input(&line) {
                    ReplInput::Quit => break,
                    ReplInput::Empty => draw(&manager),
                    ReplInput::ScrollUp(rows) => {
                        manager.scroll_up(rows);
                        draw(&manager);
                    }
                    ReplInput::ScrollDown(rows) => {
                        manager.scroll_down(rows);
                        draw(&manager);
                    }
                    ReplInput::Unknown(command) => {
                        draw(&manager);
                        eprintln!("Unknown command: {command}");
                    }
                    ReplInput::Retry => {
                        if manager.retryable_draft().is_some() {
                            let manager = manager.clone();
                            in_flight.spawn(async move { manager.submit_draft().await });
                        } else {
                            draw(&manager);
                            eprintln!("Nothing to retry");
                        }
                    }
                    ReplInput::Ask(question) => {
                        manager.set_draft(question.clone());
                        let manager = manager.clone();
                        in_flight.spawn(async move { manager.submit(question).await });
                    }
                }
            }
            // Failures are already logged and shown on the turn.
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            event = events.recv() => match event {
                Ok(ConversationEvent::Closed) | Err(RecvError::Closed) => break,
                Ok(_) => draw(&manager),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Chat view fell behind transcript events");
                    draw(&manager);
                }
            },
        }
    }

    if input_ended && !in_flight.is_empty() {
        while in_flight.join_next().await.is_some() {}
        draw(&manager);
    }

    manager.close();
    println!();
    Ok(())
}
