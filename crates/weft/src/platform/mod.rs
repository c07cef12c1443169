//! Platform services.
//!
//! ```ignore
//! use weft::platform::Clipboard;
//!
//! let mut clipboard = Clipboard::new();
//! clipboard.set_text("Copied text");
//! assert_eq!(clipboard.get_text(), "Copied text");
//! ```

mod clipboard;

pub use clipboard::Clipboard;
