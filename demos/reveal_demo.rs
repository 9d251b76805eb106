//! Reveal Demo: a full chat turn against a canned transport.
//!
//! Submits a prompt, waits for the reply on the request thread, then reveals
//! it tick by tick and prints the render-ready blocks once it is complete.
//!
//! Set `RUST_LOG=flywheel_chat=debug` to see the session's logs.

use crossbeam_channel::{select, unbounded};
use flywheel_chat::actor::RequestActor;
use flywheel_chat::error::TransportError;
use flywheel_chat::transport::{Prompt, Reply, Transport};
use flywheel_chat::{to_plain_text, ChatSession, SessionConfig, Source};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sample reply (simulating an LLM response).
const SAMPLE_REPLY: &str = r#"## How the reveal works

The reply arrives **whole**, then shows up one character per tick.

| Stage | Runs on |
|:------|-------:|
| parse | session |
| tick | ticker thread |

- ticks carry the message id
- stale ticks are ignored

```rust
session.handle_tick(tick)?;
```"#;

/// Answers every prompt with the sample reply after a short delay.
struct CannedTransport {
    latency: Duration,
}

impl Transport for CannedTransport {
    fn generate(&self, prompt: &Prompt) -> Result<Reply, TransportError> {
        std::thread::sleep(self.latency);
        if prompt.text.is_empty() {
            return Err(TransportError::Failed("empty prompt".into()));
        }
        Ok(Reply {
            text: SAMPLE_REPLY.to_string(),
            sources: vec![Source {
                title: "Flywheel Chat".into(),
                url: "https://github.com/ccheshirecat/flywheel".into(),
                favicon: "https://github.com/favicon.ico".into(),
            }],
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("Flywheel Chat Reveal Demo");
    println!("=========================");

    let transport: Arc<dyn Transport> = Arc::new(CannedTransport {
        latency: Duration::from_millis(300),
    });
    let mut session = ChatSession::new(SessionConfig::default());
    let (chat_tx, chat_rx) = unbounded();
    let ticks = session.tick_receiver();

    session.set_query("How does the reveal work?");
    let Some(prompt) = session.submit()? else {
        return Ok(());
    };
    println!("> {}", prompt.text);
    let request = RequestActor::spawn(transport, prompt, chat_tx);

    let start = Instant::now();
    let mut frames = 0u32;
    let mut stdout = std::io::stdout();

    loop {
        select! {
            recv(chat_rx) -> event => {
                if let Ok(event) = event {
                    session.handle_event(event);
                    if session.revealing().is_none() {
                        break;
                    }
                }
            }
            recv(ticks) -> tick => {
                if let Ok(tick) = tick {
                    session.handle_tick(tick)?;
                }
                if session.take_scroll_request() {
                    frames += 1;
                    if frames % 20 == 0 {
                        print!(".");
                        stdout.flush()?;
                    }
                }
                if !session.is_loading() && session.revealing().is_none() {
                    break;
                }
            }
        }
    }
    request.join();

    println!();
    println!("Revealed in {:?} ({frames} frames)", start.elapsed());
    println!();

    if let Some(message) = session.transcript().last() {
        let blocks = session.message_blocks(message.id).unwrap_or_default();
        for block in &blocks {
            println!("{block:?}");
        }
        println!();
        println!("{}", to_plain_text(&blocks));
    }

    Ok(())
}
