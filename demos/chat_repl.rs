//! Chat REPL: an interactive terminal chat against an echoing transport.
//!
//! Type a prompt and press Enter (Alt+Enter for a newline). The wheel, arrows
//! and Page Up/Down scroll the transcript; End jumps back to the newest
//! reply. Ctrl-C quits.

use crossbeam_channel::{bounded, select, unbounded};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use flywheel_chat::actor::{InputActor, RequestActor};
use flywheel_chat::error::TransportError;
use flywheel_chat::transport::{Prompt, Reply, Transport};
use flywheel_chat::{parse, to_plain_text, ChatSession, InputAction, InputEvent, Role, SessionConfig, SessionError};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

/// Rows kept for the prompt line and its spacer.
const PROMPT_ROWS: u16 = 2;

/// Answers with a small Markdown summary of the prompt.
struct EchoTransport;

impl Transport for EchoTransport {
    fn generate(&self, prompt: &Prompt) -> Result<Reply, TransportError> {
        std::thread::sleep(Duration::from_millis(400));
        let words = prompt.text.split_whitespace().count();
        let chars = prompt.text.chars().count();
        Ok(Reply::text(format!(
            "## You said\n\n{}\n\n| chars | words |\n|------:|------:|\n| {chars} | {words} |\n\n- *echoed* back\n",
            prompt.text
        )))
    }
}

fn render(session: &ChatSession, out: &mut impl Write, height: u16) -> io::Result<()> {
    let mut lines = Vec::new();
    for message in session.transcript().messages() {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "model",
        };
        lines.push(format!("[{who}]"));
        lines.extend(to_plain_text(&parse(&message.content)).lines().map(str::to_owned));
        lines.push(String::new());
    }

    let rows = usize::from(height.saturating_sub(PROMPT_ROWS));
    let end = lines.len().saturating_sub(usize::from(session.scroll_offset()));
    let start = end.saturating_sub(rows);

    queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    for line in &lines[start..end] {
        write!(out, "{line}\r\n")?;
    }
    let marker = if session.is_loading() { "…" } else { ">" };
    write!(out, "\r\n{marker} {}", session.query().replace('\n', "\r\n  "))?;
    out.flush()
}

fn run(out: &mut impl Write, mut height: u16) -> Result<(), Box<dyn std::error::Error>> {
    let transport: Arc<dyn Transport> = Arc::new(EchoTransport);
    let mut session = ChatSession::new(SessionConfig {
        page_rows: height.saturating_sub(PROMPT_ROWS),
        ..SessionConfig::default()
    });

    let (input_tx, input_rx) = bounded::<InputEvent>(64);
    let input = InputActor::spawn(input_tx, Duration::from_millis(10));
    let (chat_tx, chat_rx) = unbounded();
    let ticks = session.tick_receiver();
    let mut request: Option<RequestActor> = None;

    render(&session, out, height)?;
    loop {
        select! {
            recv(input_rx) -> event => {
                let Ok(event) = event else { break };
                if let InputEvent::Resize { height: rows, .. } = event {
                    height = rows;
                }
                match session.handle_input(&event) {
                    InputAction::Quit => break,
                    InputAction::Submit => match session.submit() {
                        Ok(Some(prompt)) => {
                            request = Some(RequestActor::spawn(Arc::clone(&transport), prompt, chat_tx.clone()));
                        }
                        Ok(None) | Err(SessionError::Busy) => {}
                        Err(err) => return Err(err.into()),
                    },
                    InputAction::Ignored | InputAction::Edited | InputAction::Scrolled => {}
                }
            }
            recv(chat_rx) -> event => {
                if let Ok(event) = event {
                    session.handle_event(event);
                }
                if let Some(done) = request.take() {
                    done.join();
                }
            }
            recv(ticks) -> tick => {
                if let Ok(tick) = tick {
                    session.handle_tick(tick)?;
                }
            }
        }
        render(&session, out, height)?;
    }

    input.join();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (_, height) = terminal::size()?;
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let result = run(&mut stdout, height);

    execute!(stdout, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}
