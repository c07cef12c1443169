//! Monospace font metrics and a small rich-text markup.
//!
//! Markup commands:
//!
//! | Command          | Effect                         |
//! |------------------|--------------------------------|
//! | `/c[name]`       | switch to a named color        |
//! | `/c[#rrggbb]`    | switch to a hex color          |
//! | `/cd`            | restore the default color      |
//! | `/n`             | line break                     |
//! | `//`             | literal slash                  |
//!
//! A raw `'\n'` also breaks the line.

use crate::error::{RenderError, RenderResult};
use crate::types::{Color, Size};

/// Fixed-advance font metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Horizontal advance of every glyph.
    pub glyph_width: f32,
    /// Distance between baselines.
    pub line_height: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            glyph_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl Font {
    /// Create a font with the given metrics.
    pub const fn new(glyph_width: f32, line_height: f32) -> Self {
        Self {
            glyph_width,
            line_height,
        }
    }

    /// Width of a single line of text.
    #[inline]
    pub fn advance(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.glyph_width
    }

    /// Size of plain, possibly multi-line text.
    pub fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let mut width: f32 = 0.0;
        let mut lines = 0;
        for line in text.split('\n') {
            width = width.max(self.advance(line));
            lines += 1;
        }
        Size::new(width, lines as f32 * self.line_height)
    }
}

/// A span of text sharing one color.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// `None` means "use the caller's default color".
    pub color: Option<Color>,
}

/// Parsed rich text: lines of colored runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichText {
    lines: Vec<Vec<TextRun>>,
}

impl RichText {
    /// Wrap plain text without interpreting markup.
    pub fn plain(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let lines = text
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    Vec::new()
                } else {
                    vec![TextRun {
                        text: line.to_string(),
                        color: None,
                    }]
                }
            })
            .collect();
        Self { lines }
    }

    /// Parse markup into lines of runs.
    pub fn parse(markup: &str) -> RenderResult<Self> {
        let mut parser = Parser::new(markup);
        parser.run()?;
        Ok(Self {
            lines: parser.lines,
        })
    }

    /// Lines of runs, top to bottom.
    #[inline]
    pub fn lines(&self) -> &[Vec<TextRun>] {
        &self.lines
    }

    /// The text with all markup removed, lines joined by `'\n'`.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|run| run.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Size of the text laid out with `font`.
    pub fn measure(&self, font: &Font) -> Size {
        let width = self
            .lines
            .iter()
            .map(|line| line.iter().map(|run| font.advance(&run.text)).sum::<f32>())
            .fold(0.0, f32::max);
        Size::new(width, self.lines.len() as f32 * font.line_height)
    }
}

struct Parser<'s> {
    source: &'s str,
    pos: usize,
    color: Option<Color>,
    pending: String,
    lines: Vec<Vec<TextRun>>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            pos: 0,
            color: None,
            pending: String::new(),
            lines: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> RenderError {
        RenderError::Markup {
            offset,
            message: message.into(),
        }
    }

    fn flush_run(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        if let Some(line) = self.lines.last_mut() {
            line.push(TextRun {
                text,
                color: self.color,
            });
        }
    }

    fn break_line(&mut self) {
        self.flush_run();
        self.lines.push(Vec::new());
    }

    fn run(&mut self) -> RenderResult<()> {
        while let Some(c) = self.bump() {
            match c {
                '\n' => self.break_line(),
                '/' => self.command(self.pos - 1)?,
                other => self.pending.push(other),
            }
        }
        if !self.source.is_empty() {
            self.flush_run();
        }
        Ok(())
    }

    fn command(&mut self, start: usize) -> RenderResult<()> {
        match self.bump() {
            Some('/') => self.pending.push('/'),
            Some('n') => self.break_line(),
            Some('c') => match self.bump() {
                Some('d') => {
                    self.flush_run();
                    self.color = None;
                }
                Some('[') => {
                    let name_start = self.pos;
                    let Some(len) = self.source[name_start..].find(']') else {
                        return Err(self.error(start, "unterminated color command"));
                    };
                    let name = &self.source[name_start..name_start + len];
                    self.pos = name_start + len + 1;
                    let color = Color::from_name(name).ok_or_else(|| RenderError::UnknownColor {
                        offset: start,
                        name: name.to_string(),
                    })?;
                    self.flush_run();
                    self.color = Some(color);
                }
                _ => return Err(self.error(start, "expected '[' or 'd' after '/c'")),
            },
            Some(other) => {
                return Err(self.error(start, format!("unknown command '/{other}'")));
            }
            None => return Err(self.error(start, "dangling '/' at end of text")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_measure() {
        let font = Font::default();
        assert_eq!(font.measure(""), Size::ZERO);
        assert_eq!(font.measure("abc"), Size::new(24.0, 16.0));
        assert_eq!(font.measure("ab\nabcd"), Size::new(32.0, 32.0));
    }

    #[test]
    fn test_parse_colors_and_lines() {
        let text = RichText::parse("a/c[red]bc/cd/nd//e").unwrap();
        assert_eq!(text.lines().len(), 2);
        assert_eq!(text.lines()[0][0].text, "a");
        assert_eq!(text.lines()[0][0].color, None);
        assert_eq!(text.lines()[0][1].text, "bc");
        assert_eq!(text.lines()[0][1].color, Some(Color::RED));
        assert_eq!(text.plain_text(), "abc\nd/e");
        assert_eq!(text.measure(&Font::default()), Size::new(24.0, 32.0));
    }

    #[test]
    fn test_parse_hex_color() {
        let text = RichText::parse("/c[#00FF00]x").unwrap();
        assert_eq!(text.lines()[0][0].color, Some(Color::GREEN));
    }

    #[test]
    fn test_parse_errors_report_offset() {
        let err = RichText::parse("ab/q").unwrap_err();
        assert_eq!(
            err,
            RenderError::Markup {
                offset: 2,
                message: "unknown command '/q'".into()
            }
        );

        assert!(matches!(
            RichText::parse("x/c[red"),
            Err(RenderError::Markup { offset: 1, .. })
        ));
        assert!(matches!(
            RichText::parse("/c[nope]"),
            Err(RenderError::UnknownColor { offset: 0, .. })
        ));
        assert!(RichText::parse("end/").is_err());
    }

    #[test]
    fn test_plain_does_not_interpret_markup() {
        let text = RichText::plain("/n");
        assert_eq!(text.plain_text(), "/n");
        assert_eq!(RichText::plain("").lines().len(), 0);
    }
}
