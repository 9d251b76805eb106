//! Chat Session: the coordinator.
//!
//! A [`ChatSession`] owns the transcript, the prompt being composed, the
//! running reveal and the viewport policy. Every mutation happens on the
//! thread that owns the session; helper threads only deliver [`ChatEvent`]s
//! and [`Tick`]s for it to apply.
//!
//! # Example
//!
//! ```rust
//! use flywheel_chat::actor::{ChatEvent, Tick};
//! use flywheel_chat::reveal::TickSource;
//! use flywheel_chat::session::{ChatSession, SessionConfig};
//! use flywheel_chat::transport::Reply;
//!
//! let mut session = ChatSession::new(SessionConfig {
//!     tick_source: TickSource::Manual,
//!     ..SessionConfig::default()
//! });
//!
//! session.set_query("hi");
//! let prompt = session.submit().unwrap().unwrap();
//! assert_eq!(prompt.text, "hi");
//!
//! session.handle_event(ChatEvent::ReplyArrived(Reply::text("Hey")));
//! let id = session.revealing().unwrap();
//! for frame in 0..3 {
//!     session.handle_tick(Tick::manual(id, frame)).unwrap();
//! }
//! assert_eq!(session.transcript().last().unwrap().content, "Hey");
//! ```

use crate::actor::{ChatEvent, InputEvent, KeyCode, Tick};
use crate::content::{self, ContentBlock};
use crate::error::{AttachmentError, CapabilityError, SessionError, TranscriptError};
use crate::reveal::{RevealController, RevealStep, RevealUnit, TickSource, Viewport, ViewportConfig, ViewportMetrics};
use crate::transcript::{MessageId, Transcript};
use crate::transport::{Clipboard, ImageAttachment, ImageCapture, Prompt, MAX_ATTACHMENT_BYTES};
use crossbeam_channel::Receiver;

/// Apology shown when a request fails.
pub const DEFAULT_ERROR_MESSAGE: &str =
    "I'm sorry, I encountered an error processing your request. Please try again.";

/// Prompt text sent with an image when the query is empty.
pub const DEFAULT_IMAGE_PROMPT: &str = "Describe this image in detail";

/// Viewport distance one terminal row stands for.
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Rows Page Up/Down move before the terminal reports its height.
pub const DEFAULT_PAGE_ROWS: u16 = 24;

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where reveal ticks come from.
    pub tick_source: TickSource,
    /// How much one tick reveals.
    pub reveal_unit: RevealUnit,
    /// Largest accepted image, in bytes.
    pub max_attachment_bytes: usize,
    /// Assistant message appended when a request fails.
    pub error_message: String,
    /// Prompt text for an image sent without a query.
    pub default_image_prompt: String,
    /// Auto-scroll policy.
    pub viewport: ViewportConfig,
    /// Viewport distance of one row scrolled with the wheel or keys.
    pub row_height: f64,
    /// Initial Page Up/Down step, replaced by the height of each resize.
    pub page_rows: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_source: TickSource::default(),
            reveal_unit: RevealUnit::default(),
            max_attachment_bytes: MAX_ATTACHMENT_BYTES,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            default_image_prompt: DEFAULT_IMAGE_PROMPT.to_string(),
            viewport: ViewportConfig::default(),
            row_height: DEFAULT_ROW_HEIGHT,
            page_rows: DEFAULT_PAGE_ROWS,
        }
    }
}

/// What the caller should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Nothing changed.
    Ignored,
    /// The prompt being composed changed.
    Edited,
    /// The transcript view moved.
    Scrolled,
    /// The user asked to send the prompt; call [`ChatSession::submit`].
    Submit,
    /// The user asked to leave.
    Quit,
}

/// One conversation and everything needed to show it.
pub struct ChatSession {
    config: SessionConfig,
    transcript: Transcript,
    reveal: RevealController,
    viewport: Viewport,
    /// Prompt being composed.
    query: String,
    /// Image attached to the next prompt.
    attachment: Option<ImageAttachment>,
    /// A request is in flight.
    loading: bool,
    /// Rows the transcript view sits above its bottom.
    scroll_offset: u16,
    page_rows: u16,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl ChatSession {
    /// Create an empty session.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            reveal: RevealController::new(config.tick_source, config.reveal_unit),
            viewport: Viewport::new(config.viewport),
            transcript: Transcript::new(),
            query: String::new(),
            attachment: None,
            loading: false,
            scroll_offset: 0,
            page_rows: config.page_rows,
            config,
        }
    }

    /// The configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The conversation so far.
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The prompt being composed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the prompt being composed.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The image attached to the next prompt.
    pub const fn attachment(&self) -> Option<&ImageAttachment> {
        self.attachment.as_ref()
    }

    /// Attach an image given as a data URI.
    ///
    /// A rejected image leaves the current attachment in place.
    pub fn attach_image(&mut self, data_uri: impl Into<String>) -> Result<(), SessionError> {
        let attachment = ImageAttachment::from_data_uri(data_uri, self.config.max_attachment_bytes)
            .inspect_err(|err| tracing::debug!(error = %err, "attachment rejected"))?;
        self.attachment = Some(attachment);
        Ok(())
    }

    /// Attach an image from a capture device.
    pub fn capture_image(&mut self, capture: &mut impl ImageCapture) -> Result<(), SessionError> {
        let attachment = capture.capture()?;
        if attachment.size() > self.config.max_attachment_bytes {
            return Err(AttachmentError::TooLarge {
                size: attachment.size(),
                limit: self.config.max_attachment_bytes,
            }
            .into());
        }
        self.attachment = Some(attachment);
        Ok(())
    }

    /// Drop the attached image.
    pub fn remove_image(&mut self) {
        self.attachment = None;
    }

    /// Whether a request is in flight.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Turn the composed prompt into a user message and a [`Prompt`] to send.
    ///
    /// Returns `Ok(None)` when there is nothing to send: no text and no image.
    /// A reveal still running is fast-forwarded so its message is complete
    /// before the new turn starts.
    ///
    /// # Errors
    ///
    /// [`SessionError::Busy`] while a request is in flight.
    pub fn submit(&mut self) -> Result<Option<Prompt>, SessionError> {
        if self.loading {
            return Err(SessionError::Busy);
        }
        if self.query.trim().is_empty() && self.attachment.is_none() {
            return Ok(None);
        }

        self.settle_reveal()?;

        let query = std::mem::take(&mut self.query);
        let attachment = self.attachment.take();

        let text = if query.is_empty() {
            self.config.default_image_prompt.clone()
        } else {
            query.clone()
        };
        let prompt = Prompt {
            text,
            image: attachment.as_ref().map(|a| a.payload().clone()),
        };

        let id = self
            .transcript
            .push_user(query, attachment.map(|a| a.data_uri().to_owned()));
        tracing::debug!(
            message = %id,
            chars = prompt.text.chars().count(),
            has_image = prompt.image.is_some(),
            "prompt submitted"
        );

        self.loading = true;
        self.scroll_offset = 0;
        self.viewport.pin_to_bottom();
        Ok(Some(prompt))
    }

    /// Apply the outcome of a request.
    pub fn handle_event(&mut self, event: ChatEvent) {
        self.loading = false;
        match event {
            ChatEvent::ReplyArrived(reply) => {
                self.settle_reveal_or_log();
                let id = self.transcript.open_assistant(reply.sources);
                if !self.reveal.start(id, reply.text) {
                    self.transcript.close(id);
                }
            }
            ChatEvent::RequestFailed(err) => {
                tracing::warn!(error = %err, "request failed, showing apology");
                self.settle_reveal_or_log();
                self.transcript.push_error(self.config.error_message.clone());
            }
        }
    }

    /// Apply one reveal tick.
    ///
    /// Returns whether the transcript changed. Stale ticks change nothing.
    pub fn handle_tick(&mut self, tick: Tick) -> Result<bool, SessionError> {
        let Some(step) = self.reveal.on_tick(tick) else {
            return Ok(false);
        };
        self.commit(&step)?;
        self.viewport.request_scroll_to_bottom();
        Ok(true)
    }

    /// Apply every tick waiting in the tick channel.
    ///
    /// Returns whether the transcript changed.
    pub fn pump_ticks(&mut self) -> Result<bool, SessionError> {
        let rx = self.reveal.receiver().clone();
        let mut changed = false;
        while let Ok(tick) = rx.try_recv() {
            changed |= self.handle_tick(tick)?;
        }
        Ok(changed)
    }

    /// Fast-forward a running reveal so its message is complete and closed.
    fn settle_reveal(&mut self) -> Result<(), SessionError> {
        match self.reveal.finish_now() {
            Some(step) => self.commit(&step),
            None => Ok(()),
        }
    }

    fn settle_reveal_or_log(&mut self) {
        if let Err(err) = self.settle_reveal() {
            tracing::warn!(error = %err, "could not complete previous reveal");
        }
    }

    fn commit(&mut self, step: &RevealStep) -> Result<(), SessionError> {
        self.transcript.extend_content(step.message, &step.content)?;
        if step.finished {
            self.transcript.close(step.message);
        }
        Ok(())
    }

    /// Apply a terminal input event.
    ///
    /// Keys and pastes edit the prompt. The wheel, arrows and Page Up/Down
    /// move the transcript view by rows and feed the new distance to the
    /// auto-scroll policy; End jumps back to the newest content.
    pub fn handle_input(&mut self, event: &InputEvent) -> InputAction {
        match event {
            InputEvent::Key { code, modifiers } => match code {
                KeyCode::Char('c' | 'd') if modifiers.control => InputAction::Quit,
                KeyCode::Char(c) if !modifiers.control && !modifiers.alt => {
                    self.query.push(*c);
                    InputAction::Edited
                }
                KeyCode::Backspace => {
                    if self.query.pop().is_some() {
                        InputAction::Edited
                    } else {
                        InputAction::Ignored
                    }
                }
                KeyCode::Enter if modifiers.any() => {
                    self.query.push('\n');
                    InputAction::Edited
                }
                KeyCode::Enter => InputAction::Submit,
                KeyCode::Esc if self.attachment.is_some() => {
                    self.remove_image();
                    InputAction::Edited
                }
                KeyCode::Up => self.scroll_by(1),
                KeyCode::Down => self.scroll_by(-1),
                KeyCode::PageUp => self.scroll_by(self.page_step()),
                KeyCode::PageDown => self.scroll_by(-self.page_step()),
                KeyCode::End => self.scroll_to_bottom(),
                _ => InputAction::Ignored,
            },
            InputEvent::Scroll { delta } => self.scroll_by(*delta),
            InputEvent::Resize { height, .. } => {
                self.page_rows = (*height).max(1);
                InputAction::Ignored
            }
            InputEvent::Paste(text) => {
                self.query.push_str(text);
                InputAction::Edited
            }
            InputEvent::Shutdown => InputAction::Quit,
            InputEvent::Error(_) => InputAction::Ignored,
        }
    }

    /// Rows the transcript view sits above its bottom.
    pub const fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    fn page_step(&self) -> i16 {
        i16::try_from(self.page_rows).unwrap_or(i16::MAX)
    }

    /// Move the view `rows` up (negative: down) and re-evaluate auto-scroll.
    fn scroll_by(&mut self, rows: i16) -> InputAction {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(rows);
        let distance = f64::from(self.scroll_offset) * self.config.row_height;
        self.viewport.observe_distance(distance);
        InputAction::Scrolled
    }

    fn scroll_to_bottom(&mut self) -> InputAction {
        self.scroll_offset = 0;
        self.viewport.observe_distance(0.0);
        self.viewport.request_scroll_to_bottom();
        InputAction::Scrolled
    }

    /// Record the viewport's scroll position. Returns the auto-scroll state.
    pub fn observe_viewport(&mut self, metrics: ViewportMetrics) -> bool {
        self.viewport.observe(metrics)
    }

    /// Record the distance from the bottom. Returns the auto-scroll state.
    pub fn observe_distance(&mut self, distance: f64) -> bool {
        self.viewport.observe_distance(distance)
    }

    /// Drain the coalesced scroll request for the frame being rendered.
    pub fn take_scroll_request(&mut self) -> bool {
        self.viewport.take_scroll_request()
    }

    /// Whether new content scrolls into view.
    pub const fn auto_scroll(&self) -> bool {
        self.viewport.auto_scroll()
    }

    /// The message being revealed.
    pub fn revealing(&self) -> Option<MessageId> {
        self.reveal.current()
    }

    /// Channel carrying reveal ticks, for `select!` loops.
    pub fn tick_receiver(&self) -> Receiver<Tick> {
        self.reveal.receiver().clone()
    }

    /// A message's content as render-ready blocks.
    pub fn message_blocks(&self, id: MessageId) -> Option<Vec<ContentBlock>> {
        self.transcript.get(id).map(|m| content::parse(&m.content))
    }

    /// Copy a message's text to the clipboard.
    pub fn copy_message(&self, id: MessageId, clipboard: &mut impl Clipboard) -> Result<(), SessionError> {
        let message = self
            .transcript
            .get(id)
            .ok_or(TranscriptError::UnknownMessage(id))?;
        if message.content.is_empty() {
            return Err(CapabilityError::Empty.into());
        }
        clipboard.write_text(&message.content)?;
        Ok(())
    }

    /// Copy the code of the `index`-th block of a message to the clipboard.
    pub fn copy_code(&self, id: MessageId, index: usize, clipboard: &mut impl Clipboard) -> Result<(), SessionError> {
        let blocks = self
            .message_blocks(id)
            .ok_or(TranscriptError::UnknownMessage(id))?;
        let code = blocks
            .get(index)
            .and_then(ContentBlock::copy_text)
            .ok_or(CapabilityError::Empty)?;
        clipboard.write_text(code)?;
        Ok(())
    }
}
