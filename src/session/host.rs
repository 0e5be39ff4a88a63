//! Host collaborators: confirmation, text prompts and thumbnails
//!
//! In the browser these are `confirm()`, `prompt()` and a canvas snapshot.
//! A `false`/`None` answer means the player cancelled; the session then
//! leaves all state untouched.

use std::collections::VecDeque;

pub trait Host {
    fn confirm(&mut self, message: &str) -> bool;
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
    /// Small encoded preview of the source image, if the host can render one
    fn thumbnail(&mut self) -> Option<String>;
}

/// Host that answers from pre-loaded queues and records what it was asked.
///
/// Unscripted confirms answer `true`; unscripted prompts accept the default.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    pub confirms: VecDeque<bool>,
    pub prompts: VecDeque<Option<String>>,
    pub thumb: Option<String>,
    /// Every message shown, in order
    pub asked: Vec<String>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_confirm(&mut self, answer: bool) {
        self.confirms.push_back(answer);
    }

    pub fn push_prompt(&mut self, answer: Option<&str>) {
        self.prompts.push_back(answer.map(str::to_string));
    }
}

impl Host for ScriptedHost {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.confirms.pop_front().unwrap_or(true)
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        self.asked.push(message.to_string());
        self.prompts
            .pop_front()
            .unwrap_or_else(|| Some(default.to_string()))
    }

    fn thumbnail(&mut self) -> Option<String> {
        self.thumb.clone()
    }
}
