//! Shared content rendering logic for pages and form XObjects.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{PageContents, RectLayout, SpanFont, SpanLayout};
use crate::DocError;
use id_arena::Arena;
use std::io::Write;

/// Renders page contents to a PDF content stream.
///
/// Used by both pages and form XObjects to turn laid out items into low-level PDF
/// operators.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &Arena<Font>,
) -> Result<Vec<u8>, DocError> {
    if contents.is_empty() {
        return Ok(Vec::default());
    }

    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Text(spans) => {
                render_text_spans(&mut content, spans, fonts)?;
            }
            PageContents::Image(image) => {
                write!(&mut content, "q\n")?;
                write!(
                    &mut content,
                    "{} 0 0 {} {} {} cm\n",
                    image.position.width().0,
                    image.position.height().0,
                    image.position.x1.0,
                    image.position.y1.0
                )?;
                write!(&mut content, "/I{} Do\n", image.image_id.index())?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Rect(rect) => {
                render_rect(&mut content, rect)?;
            }
            PageContents::FormXObject(layout) => {
                write!(&mut content, "q\n")?;
                write!(&mut content, "/X{} Do\n", layout.xobj_id.index())?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &Arena<Font>,
) -> Result<(), DocError> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;
    let mut current_colour: Colour = first.colour;

    write!(
        content,
        "/F{} {} Tf\n",
        current_font.id.index(),
        current_font.size.0
    )?;
    write_colour(content, current_colour)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(
                content,
                "/F{} {} Tf\n",
                current_font.id.index(),
                current_font.size.0
            )?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            write_colour(content, current_colour)?;
        }

        let font = fonts.get(current_font.id).ok_or_else(|| {
            DocError::MeasurementFailure(format!("font F{} is not registered", current_font.id.index()))
        })?;

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0 .0, span.coords.1 .0)?;
        write!(content, "<")?;
        for byte in font.encode(&span.text) {
            write!(content, "{byte:02x}")?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn render_rect(content: &mut Vec<u8>, rect: &RectLayout) -> Result<(), DocError> {
    if rect.stroke.is_none() && rect.fill.is_none() {
        return Ok(());
    }

    write!(content, "q\n")?;
    if let Some(fill) = rect.fill {
        write_colour(content, fill)?;
    }
    if let Some((stroke, width)) = rect.stroke {
        write_stroke_colour(content, stroke)?;
        write!(content, "{} w\n", width.0)?;
    }
    write!(
        content,
        "{} {} {} {} re\n",
        rect.rect.x1.0,
        rect.rect.y1.0,
        rect.rect.width().0,
        rect.rect.height().0
    )?;
    let op = match (rect.fill.is_some(), rect.stroke.is_some()) {
        (true, true) => "B",
        (true, false) => "f",
        _ => "S",
    };
    write!(content, "{op}\n")?;
    write!(content, "Q\n")?;
    Ok(())
}

#[allow(clippy::write_with_newline)]
fn write_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::CMYK { c, m, y, k } => write!(content, "{c} {m} {y} {k} k\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[allow(clippy::write_with_newline)]
fn write_stroke_colour(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} RG\n"),
        Colour::CMYK { c, m, y, k } => write!(content, "{c} {m} {y} {k} K\n"),
        Colour::Grey { g } => write!(content, "{g} G\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::font::StandardFont;
    use crate::rect::Rect;
    use crate::units::Pt;

    #[test]
    fn text_is_hex_encoded_per_font() {
        let mut fonts = Arena::new();
        let id = fonts.alloc(Font::standard(StandardFont::TimesRoman));
        let contents = vec![PageContents::Text(vec![SpanLayout {
            text: "Perú".to_string(),
            font: SpanFont { id, size: Pt(11.0) },
            colour: colours::BLACK,
            coords: (Pt(10.0), Pt(20.0)),
        }])];
        let rendered = String::from_utf8(render_contents(&contents, &fonts).unwrap()).unwrap();
        assert!(rendered.contains("/F0 11 Tf"));
        assert!(rendered.contains("10 20 Td"));
        assert!(rendered.contains("<506572fa> Tj"));
    }

    #[test]
    fn rects_pick_their_paint_operator() {
        let fonts = Arena::new();
        let rect = Rect {
            x1: Pt(0.0),
            y1: Pt(0.0),
            x2: Pt(10.0),
            y2: Pt(5.0),
        };
        let contents = vec![
            PageContents::Rect(RectLayout {
                rect,
                stroke: Some((colours::SEAL_RED, Pt(1.0))),
                fill: None,
            }),
            PageContents::Rect(RectLayout {
                rect,
                stroke: None,
                fill: Some(colours::LIGHT_GREY),
            }),
        ];
        let rendered = String::from_utf8(render_contents(&contents, &fonts).unwrap()).unwrap();
        assert!(rendered.contains("0 0 10 5 re\nS\n"));
        assert!(rendered.contains("0 0 10 5 re\nf\n"));
        assert!(rendered.contains(" RG\n1 w\n"));
    }
}
