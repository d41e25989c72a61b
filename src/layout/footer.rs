use super::{Align, Block, LayoutContext, PlacedItem, Section, Target, TextRun, UnitKind};
use crate::colour::colours;
use crate::error::DocError;
use crate::measure::{FontStyle, TextMeasure};
use crate::record::DocumentRecord;
use crate::units::{Mm, Pt};

/// Between the initials and the seal
const SEAL_GAP: Mm = Mm(1.0);
/// Horizontal padding of the seal text inside its border
const SEAL_PADDING: Mm = Mm(2.0);

/// Put the footer on every finished page: redactor initials over the seal on the left,
/// then the postal address on the right. On a continuous surface the footer follows the
/// content instead of sitting at the page bottom.
pub(crate) fn finalize<M: TextMeasure + ?Sized>(
    ctx: &mut LayoutContext<'_, M>,
    record: &DocumentRecord,
) -> Result<(), DocError> {
    let block = footer_block(ctx, record)?;

    let origin = match ctx.target {
        Target::Paginated => {
            let config = ctx.config();
            config.page_size.1 - config.footer_offset
        }
        Target::Continuous => {
            ctx.skip(ctx.config().signature_gap);
            let top = ctx.cursor.position();
            ctx.cursor.skip(block.height);
            top
        }
    };

    log::debug!("stamping footer on {} page(s)", ctx.cursor.page_index() + 1);
    ctx.stamp_every_page(block, origin);
    Ok(())
}

fn footer_block<M: TextMeasure + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    record: &DocumentRecord,
) -> Result<Block, DocError> {
    let config = ctx.config();
    let constants = ctx.constants();
    let width = ctx.content_width();
    let style = FontStyle::serif(config.footer_size);
    let line_height = ctx.line_height(&style);
    let mut block = Block::new("footer", Section::Footer);

    let initials = record
        .footer_initials()
        .unwrap_or(constants.placeholder_initials.as_str());
    let mut left_height = block.lines_at(
        TextRun {
            kind: UnitKind::Initials,
            text: initials.to_string(),
            style,
            colour: colours::MID_GREY,
            x: Pt(0.0),
            width,
            align: Align::Left,
        },
        Pt(0.0),
        vec![initials.to_string()],
        line_height,
    );
    left_height += Pt::from(SEAL_GAP);

    // seal: at least its configured size, wider if the text needs it
    let seal_style = FontStyle::sans(config.footer_size).bold();
    let padding: Pt = SEAL_PADDING.into();
    let text_width = ctx.measure().text_width(&constants.seal_text, &seal_style)?;
    let seal_width = config.seal_width.max(text_width + padding * 2.0).min(width);
    let seal_lines = ctx.wrap(&constants.seal_text, seal_width - padding * 2.0, &seal_style)?;
    let seal_line_height = ctx.line_height(&seal_style);
    let text_height = seal_line_height * seal_lines.len() as f32;
    let seal_height = config.seal_height.max(text_height + padding);
    let seal_top = left_height;

    block.decorate(PlacedItem::Frame {
        x: Pt(0.0),
        y: seal_top,
        width: seal_width,
        height: seal_height,
        stroke: Some((colours::SEAL_RED, config.seal_border)),
        fill: None,
    });
    block.lines_at(
        TextRun {
            kind: UnitKind::Seal,
            text: constants.seal_text.clone(),
            style: seal_style,
            colour: colours::SEAL_RED,
            x: padding,
            width: seal_width - padding * 2.0,
            align: Align::Left,
        },
        seal_top + (seal_height - text_height) / 2.0,
        seal_lines,
        seal_line_height,
    );
    left_height += seal_height;

    // address below the seal, flush right
    let mut address_bottom = left_height + Pt::from(SEAL_GAP);
    for line in constants.address_lines.iter() {
        let height = block.lines_at(
            TextRun {
                kind: UnitKind::AddressLine,
                text: line.clone(),
                style,
                colour: colours::MID_GREY,
                x: Pt(0.0),
                width,
                align: Align::Right,
            },
            address_bottom,
            vec![line.clone()],
            line_height,
        );
        address_bottom += height;
    }

    block.height = left_height.max(address_bottom);
    Ok(block)
}
