//! Text clipboard backed by `arboard`.
//!
//! The system clipboard may be missing (headless sessions, CI) or fail on
//! any single call. Failures are logged at debug level and the operation is
//! served from an in-process scratch buffer instead, so copy and paste keep
//! working inside the application.

use tracing::debug;
use weft_core::logging::targets;

/// Text clipboard with an in-process fallback.
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
    scratch: String,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard {
    /// Connect to the system clipboard, falling back to the scratch buffer.
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                debug!(target: targets::PLATFORM, error = %err, "system clipboard unavailable");
                None
            }
        };
        Self {
            system,
            scratch: String::new(),
        }
    }

    /// A clipboard that never touches the system one.
    pub fn detached() -> Self {
        Self {
            system: None,
            scratch: String::new(),
        }
    }

    /// Whether the system clipboard is connected.
    #[inline]
    pub fn is_system(&self) -> bool {
        self.system.is_some()
    }

    /// Current clipboard text. Empty if nothing was copied.
    pub fn get_text(&mut self) -> String {
        if let Some(system) = self.system.as_mut() {
            match system.get_text() {
                Ok(text) => return text,
                Err(err) => {
                    debug!(target: targets::PLATFORM, error = %err, "clipboard read failed, using scratch buffer");
                }
            }
        }
        self.scratch.clone()
    }

    /// Replace the clipboard text.
    pub fn set_text(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        self.scratch.clear();
        self.scratch.push_str(text);
        if let Some(system) = self.system.as_mut() {
            if let Err(err) = system.set_text(text) {
                debug!(target: targets::PLATFORM, error = %err, "clipboard write failed, kept in scratch buffer");
            }
        }
    }
}

impl std::fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clipboard")
            .field("system", &self.system.is_some())
            .field("scratch_len", &self.scratch.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_round_trip() {
        let mut clipboard = Clipboard::detached();
        assert!(!clipboard.is_system());
        assert_eq!(clipboard.get_text(), "");

        clipboard.set_text("hello");
        assert_eq!(clipboard.get_text(), "hello");

        clipboard.set_text(String::from("again"));
        assert_eq!(clipboard.get_text(), "again");
    }
}
