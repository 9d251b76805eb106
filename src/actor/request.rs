//! Request Actor: one blocking transport call on its own thread.
//!
//! The call's outcome comes back as a single [`ChatEvent`]. The session
//! refuses new prompts until it has seen that event.

use super::messages::ChatEvent;
use crate::transport::{Prompt, Transport};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handle to an in-flight request.
pub struct RequestActor {
    handle: Option<JoinHandle<()>>,
}

impl RequestActor {
    /// Run `transport.generate(prompt)` on a new thread and send the result.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the request thread.
    pub fn spawn(transport: Arc<dyn Transport>, prompt: Prompt, sender: Sender<ChatEvent>) -> Self {
        let handle = thread::Builder::new()
            .name("flywheel-request".to_string())
            .spawn(move || {
                let result = transport.generate(&prompt);
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "request failed");
                }
                // The session may be gone; nobody is left to tell.
                let _ = sender.send(ChatEvent::from(result));
            })
            .expect("Failed to spawn request thread");

        Self { handle: Some(handle) }
    }

    /// Whether the call has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the call to return.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
