//! Text measurement: the one capability layout needs from a rendering target.
//!
//! Layout never looks at glyphs directly. It asks a [`TextMeasure`] how wide a run of
//! text is and how tall a line is, and the default [`TextMeasure::measure`] turns that
//! into wrapped lines. Implementations must be deterministic: the same text, width and
//! style always wrap the same way.

use crate::error::DocError;
use crate::units::Pt;

const TABSIZE: usize = 4;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Times-like text face used for the document itself
    #[default]
    Serif,
    /// Helvetica-like face used for the slogan, seal and authentication box
    Sans,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FontStyle {
    pub family: FontFamily,
    pub weight: FontWeight,
    pub size: Pt,
}

impl FontStyle {
    pub fn serif(size: Pt) -> FontStyle {
        FontStyle {
            family: FontFamily::Serif,
            weight: FontWeight::Regular,
            size,
        }
    }

    pub fn sans(size: Pt) -> FontStyle {
        FontStyle {
            family: FontFamily::Sans,
            weight: FontWeight::Regular,
            size,
        }
    }

    pub fn bold(mut self) -> FontStyle {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn bold_if(self, bold: bool) -> FontStyle {
        if bold {
            self.bold()
        } else {
            self
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

pub trait TextMeasure {
    /// Width of `text` set on a single line in `style`
    fn text_width(&self, text: &str, style: &FontStyle) -> Result<Pt, DocError>;

    /// Vertical distance between consecutive baselines in `style`
    fn line_height(&self, style: &FontStyle) -> Pt;

    /// Wrap `text` into lines no wider than `max_width`.
    ///
    /// Lines break at whitespace; a word wider than the whole line is broken between
    /// characters. `\n` forces a break, tabs count as four spaces, and runs of
    /// whitespace collapse to one space. Empty text yields a single empty line.
    fn measure(&self, text: &str, max_width: Pt, style: &FontStyle) -> Result<Vec<String>, DocError> {
        wrap_greedy(self, text, max_width, style)
    }
}

fn wrap_greedy<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    max_width: Pt,
    style: &FontStyle,
) -> Result<Vec<String>, DocError> {
    if !max_width.0.is_finite() || max_width.0 <= 0.0 {
        return Err(DocError::MeasurementFailure(format!(
            "cannot wrap text to a width of {max_width}"
        )));
    }

    // replace tabs with spaces and normalize newlines
    let text = text
        .replace('\t', &" ".repeat(TABSIZE))
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for hard_line in text.split('\n') {
        let mut current = String::new();
        for word in hard_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if measure.text_width(&candidate, style)? <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure.text_width(word, style)? <= max_width {
                current = word.to_string();
            } else {
                // no break point - force character breaks
                for ch in word.chars() {
                    let mut candidate = current.clone();
                    candidate.push(ch);
                    if !current.is_empty() && measure.text_width(&candidate, style)? > max_width {
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    } else {
                        current = candidate;
                    }
                }
            }
        }
        lines.push(current);
    }

    Ok(lines)
}

/// A fixed-advance adapter: every character is `advance_em` of the font size wide.
/// Useful where no real fonts are available, such as plain-text previews and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub advance_em: f32,
    pub line_spacing: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        MonospaceMeasure {
            advance_em: 0.5,
            line_spacing: 1.2,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str, style: &FontStyle) -> Result<Pt, DocError> {
        Ok(style.size * (self.advance_em * text.chars().count() as f32))
    }

    fn line_height(&self, style: &FontStyle) -> Pt {
        style.size * self.line_spacing
    }
}
