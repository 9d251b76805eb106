//! Input Actor: Dedicated thread for polling terminal events.
//!
//! Keys, scroll wheel, resize and paste are forwarded to the session's
//! event loop as [`InputEvent`]s.

use super::messages::{InputEvent, KeyCode, KeyModifiers};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long a shutdown request can go unnoticed.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the input thread.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("flywheel-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })
            .expect("Failed to spawn input thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<InputEvent>, shutdown: &Arc<AtomicBool>, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if let Some(input_event) = convert_event(event) {
                            if sender.send(input_event).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read terminal event");
                        let _ = sender.send(InputEvent::Error(e.to_string()));
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    // No terminal to read from; polling again would spin.
                    tracing::warn!(error = %e, "failed to poll terminal events");
                    let _ = sender.send(InputEvent::Error(e.to_string()));
                    break;
                }
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Convert a crossterm event to our `InputEvent`.
fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key_event) => {
            // Only process key press events (not release or repeat)
            if key_event.kind != KeyEventKind::Press {
                return None;
            }

            let code = convert_key_code(key_event.code)?;
            let modifiers = convert_modifiers(key_event.modifiers);
            Some(InputEvent::Key { code, modifiers })
        }
        Event::Mouse(mouse) => match mouse.kind {
            event::MouseEventKind::ScrollUp => Some(InputEvent::Scroll { delta: 1 }),
            event::MouseEventKind::ScrollDown => Some(InputEvent::Scroll { delta: -1 }),
            _ => None,
        },
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::Paste(text) => Some(InputEvent::Paste(text)),
        Event::FocusGained | Event::FocusLost => None,
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};

    #[test]
    fn test_key_press_converted() {
        let event = Event::Key(KeyEvent::new(event::KeyCode::Char('a'), event::KeyModifiers::CONTROL));
        assert_eq!(
            convert_event(event),
            Some(InputEvent::Key {
                code: KeyCode::Char('a'),
                modifiers: KeyModifiers {
                    control: true,
                    ..KeyModifiers::NONE
                },
            })
        );
    }

    #[test]
    fn test_scroll_wheel() {
        let wheel = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 0,
                row: 0,
                modifiers: event::KeyModifiers::NONE,
            })
        };
        assert_eq!(
            convert_event(wheel(MouseEventKind::ScrollUp)),
            Some(InputEvent::Scroll { delta: 1 })
        );
        assert_eq!(
            convert_event(wheel(MouseEventKind::ScrollDown)),
            Some(InputEvent::Scroll { delta: -1 })
        );
        assert_eq!(convert_event(wheel(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_paste_and_resize() {
        assert_eq!(
            convert_event(Event::Paste("hi".into())),
            Some(InputEvent::Paste("hi".into()))
        );
        assert_eq!(
            convert_event(Event::Resize(80, 24)),
            Some(InputEvent::Resize {
                width: 80,
                height: 24
            })
        );
        assert_eq!(convert_event(Event::FocusLost), None);
    }

    #[test]
    fn test_unmapped_keys_dropped() {
        let press = |code| Event::Key(KeyEvent::new(code, event::KeyModifiers::NONE));
        assert_eq!(convert_event(press(event::KeyCode::Tab)), None);
        assert_eq!(convert_event(press(event::KeyCode::F(1))), None);
        assert_eq!(
            convert_event(press(event::KeyCode::PageUp)),
            Some(InputEvent::key(KeyCode::PageUp))
        );
    }

    #[test]
    fn test_spawn_and_join() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let actor = InputActor::spawn(tx, Duration::from_millis(5));
        actor.join();

        // Without a terminal the thread reports the poll error and exits.
        let last = rx.try_iter().last();
        assert!(
            matches!(last, Some(InputEvent::Shutdown | InputEvent::Error(_))),
            "unexpected last event {last:?}"
        );
    }
}
