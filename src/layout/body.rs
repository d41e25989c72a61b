use super::{Align, Block, LayoutContext, Section, TextRun, UnitKind};
use crate::colour::colours;
use crate::error::DocError;
use crate::measure::{FontStyle, TextMeasure};
use crate::record::DocumentRecord;
use crate::units::Pt;
use crate::variant::{classify, ParagraphKind, VariantRule};

/// Lay out the body paragraphs in order. Each paragraph is its own atomic unit: one
/// that does not fit in what is left of a page moves whole to the next page. A heading
/// is never left at the bottom of a page without the paragraph that follows it.
pub(crate) fn render<M: TextMeasure + ?Sized>(
    ctx: &mut LayoutContext<'_, M>,
    record: &DocumentRecord,
    rule: &VariantRule,
) -> Result<(), DocError> {
    let config = ctx.config();
    let width = ctx.content_width();

    let mut blocks: Vec<(ParagraphKind, Block)> = Vec::new();
    for (index, paragraph) in record.body_paragraphs().iter().enumerate() {
        let kind = classify(paragraph, rule);
        let style = FontStyle::serif(config.body_size).bold_if(kind.is_bold());
        let indent = if kind.is_indented() {
            config.indent
        } else {
            Pt(0.0)
        };

        let lines = ctx.wrap(paragraph, width - indent, &style)?;
        let mut block = Block::new(format!("body paragraph {}", index + 1), Section::Body);
        block.lines(
            TextRun {
                kind: UnitKind::Paragraph(kind),
                text: paragraph.clone(),
                style,
                colour: colours::BLACK,
                x: indent,
                width: width - indent,
                align: Align::Justify,
            },
            lines,
            ctx.line_height(&style),
        );
        blocks.push((kind, block));
    }

    let mut blocks = blocks.into_iter().peekable();
    while let Some((kind, block)) = blocks.next() {
        if kind.has_extra_spacing() {
            ctx.skip(config.heading_spacing);
        }
        if kind.keeps_with_next() {
            if let Some((_, next)) = blocks.peek() {
                ctx.keep_together(&block.label, block.height + config.paragraph_gap + next.height);
            }
        }

        ctx.place(block)?;
        ctx.skip(config.paragraph_gap);
    }

    Ok(())
}
