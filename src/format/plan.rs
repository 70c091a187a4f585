//! The fixed-width bar segment.

use super::Format;
use crate::bar::Snapshot;

use console::{Color, Style};

/// Renders a fixed-width bar such as `[■■■■■     ]`.
///
/// The filled part cycles through the `style` glyphs and the rest cycles
/// through the `padding` glyphs, both indexed by column, so multi-glyph styles
/// render as repeating patterns.
///
/// ```rust
/// use linebar::format::Plan;
///
/// let plan = Plan::default().width(10).style("=").padding(".");
/// assert_eq!(plan.render_rate(0.5), "[=====.....]");
/// ```
#[derive(Debug, Clone)]
pub struct Plan {
    prefix: String,
    suffix: String,
    style: String,
    padding: String,
    color: Option<Color>,
    width: usize,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            prefix: "[".into(),
            suffix: "]".into(),
            style: Self::DEFAULT_STYLE.into(),
            padding: Self::DEFAULT_PADDING.into(),
            color: None,
            width: 50,
        }
    }
}

impl Plan {
    /// Glyph used when the style is empty.
    pub const DEFAULT_STYLE: &'static str = "■";
    /// Glyph used when the padding is empty.
    pub const DEFAULT_PADDING: &'static str = " ";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Glyphs of the filled part.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Glyphs of the unfilled part.
    pub fn padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Number of glyph columns between prefix and suffix.
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Colours the whole bar, prefix and suffix included.
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Number of filled columns for `rate`, which is clamped into `[0, 1]`.
    pub fn filled(&self, rate: f64) -> usize {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        ((self.width as f64 * rate).floor() as usize).min(self.width)
    }

    /// Renders the bar for a completion ratio.
    pub fn render_rate(&self, rate: f64) -> String {
        let filled = self.filled(rate);
        let style = glyphs(&self.style, Self::DEFAULT_STYLE);
        let padding = glyphs(&self.padding, Self::DEFAULT_PADDING);

        let mut bar = String::with_capacity(self.prefix.len() + self.width * 4 + self.suffix.len());
        bar.push_str(&self.prefix);
        bar.extend((0..filled).map(|i| style[i % style.len()]));
        bar.extend((filled..self.width).map(|i| padding[i % padding.len()]));
        bar.push_str(&self.suffix);

        match self.color {
            Some(color) => Style::new().fg(color).apply_to(bar).to_string(),
            None => bar,
        }
    }
}

fn glyphs(text: &str, fallback: &str) -> Vec<char> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        fallback.chars().collect()
    } else {
        chars
    }
}

impl Format for Plan {
    fn render(&self, snapshot: &Snapshot) -> String {
        if snapshot.total() <= 0 {
            return self.render_rate(0.0);
        }
        self.render_rate(snapshot.rate())
    }
}
