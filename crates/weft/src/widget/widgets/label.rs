//! Text label with color markup.

use tracing::warn;
use weft_core::logging::targets;
use weft_render::{Color, Font, RenderError, RichText, Size};

use crate::widget::{LayoutContext, PaintContext, Widget};

/// A leaf widget displaying rich text.
///
/// Markup errors do not fail [`set_text`](Label::set_text): the label shows
/// the error message in red instead, so a broken string is visible on screen.
#[derive(Debug, Clone)]
pub struct Label {
    text: String,
    font: Font,
    text_color: Color,
    parsed: Result<RichText, RenderError>,
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        let mut label = Self {
            text: String::new(),
            font: Font::default(),
            text_color: Color::WHITE,
            parsed: Ok(RichText::default()),
        };
        label.set_text(text);
        label
    }

    /// The raw markup.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the markup and reparse it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.parsed = RichText::parse(&self.text);
        if let Err(err) = &self.parsed {
            warn!(target: targets::RENDER, text = %self.text, error = %err, "label markup rejected");
        }
    }

    /// The markup error, if the current text failed to parse.
    pub fn error(&self) -> Option<&RenderError> {
        self.parsed.as_ref().err()
    }

    #[inline]
    pub fn font(&self) -> Font {
        self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    #[inline]
    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn error_text(err: &RenderError) -> String {
        format!("Error: {err}")
    }
}

impl Widget for Label {
    fn type_name(&self) -> &'static str {
        "Label"
    }

    fn measure(&mut self, _ctx: &mut LayoutContext<'_>, _available: Size) -> Size {
        match &self.parsed {
            Ok(text) => text.measure(&self.font),
            Err(err) => self.font.measure(&Self::error_text(err)),
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_, '_>) {
        let origin = ctx.base().actual_bounds().origin;
        match &self.parsed {
            Ok(text) => ctx
                .render()
                .draw_rich_text(text, origin, &self.font, self.text_color),
            Err(err) => ctx
                .render()
                .draw_text(&Self::error_text(err), origin, &self.font, Color::RED),
        }
    }
}
