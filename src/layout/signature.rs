use super::{Align, Block, LayoutContext, PlacedItem, Section, TextRun, UnitKind};
use crate::colour::{colours, Colour};
use crate::error::DocError;
use crate::measure::{FontStyle, TextMeasure};
use crate::record::DocumentRecord;
use crate::units::{Mm, Pt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const AUTH_NOTE: &str = "Firmado con certificado digital oficial";

/// Between the signature rule and the signer's name
const NAME_GAP: Mm = Mm(2.0);
/// Between the signer's entity and the authentication box
const BOX_GAP: Mm = Mm(6.0);
/// Inset of the mark area and of the first text line inside the box
const BOX_INSET: Mm = Mm(2.0);
const MARK_SQUARE: Mm = Mm(1.5);

/// The signature block: rule, signer lines and the authentication box, kept together
/// on one page
pub(crate) fn render<M: TextMeasure + ?Sized>(
    ctx: &mut LayoutContext<'_, M>,
    record: &DocumentRecord,
) -> Result<(), DocError> {
    ctx.skip(ctx.config().signature_gap);
    let block = signature_block(ctx, record)?;
    ctx.place(block)?;
    Ok(())
}

fn signature_block<M: TextMeasure + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    record: &DocumentRecord,
) -> Result<Block, DocError> {
    let config = ctx.config();
    let width = ctx.content_width();
    let mut block = Block::new("signature block", Section::Signature);

    let rule_width = config.signature_rule_width.min(width);
    block.overlay(
        UnitKind::SignatureRule,
        PlacedItem::Rule {
            x: (width - rule_width) / 2.0,
            y: Pt(0.0),
            width: rule_width,
            thickness: config.rule_thickness,
            colour: colours::BLACK,
        },
        Pt(0.0),
        config.rule_thickness,
    );
    block.gap(config.rule_thickness);
    block.gap(NAME_GAP.into());

    let name_style = FontStyle::serif(config.signer_name_size).bold();
    let detail_style = FontStyle::serif(config.signer_detail_size);
    let signer = [
        (record.sender_name().to_uppercase(), name_style),
        (record.sender_title().to_uppercase(), detail_style),
        (record.sender_entity().to_string(), detail_style),
    ];
    for (text, style) in signer {
        if text.trim().is_empty() {
            continue;
        }
        let lines = ctx.wrap(&text, width, &style)?;
        block.lines(
            TextRun {
                kind: UnitKind::SignatureLine,
                text,
                style,
                colour: colours::BLACK,
                x: Pt(0.0),
                width,
                align: Align::Center,
            },
            lines,
            ctx.line_height(&style),
        );
    }

    block.gap(BOX_GAP.into());
    authentication_box(ctx, record, &mut block)?;

    Ok(block)
}

/// The simulated digital-signature stamp: a bordered box holding a mark pattern and the
/// signature details. Its size is fixed, so the random mark never affects layout.
fn authentication_box<M: TextMeasure + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    record: &DocumentRecord,
    block: &mut Block,
) -> Result<(), DocError> {
    let config = ctx.config();
    let width = ctx.content_width();
    let box_width = config.auth_box_width.min(width);
    let x = (width - box_width) / 2.0;
    let y = block.height;
    let inset: Pt = BOX_INSET.into();

    block.overlay(
        UnitKind::AuthenticationBox,
        PlacedItem::Frame {
            x,
            y,
            width: box_width,
            height: config.auth_box_height,
            stroke: Some((colours::MID_GREY, Pt(0.3))),
            fill: None,
        },
        y,
        config.auth_box_height,
    );

    // mark pattern
    block.decorate(PlacedItem::Frame {
        x: x + inset,
        y: y + inset,
        width: config.auth_mark_size,
        height: config.auth_mark_size,
        stroke: None,
        fill: Some(colours::LIGHT_GREY),
    });
    let square: Pt = MARK_SQUARE.into();
    let spread = (config.auth_mark_size - inset * 3.0).max(Pt(0.0));
    let mut rng = match ctx.stamp.mark_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    for _ in 0..config.auth_mark_count {
        let dx = spread * rng.random_range(0.0..=1.0f32);
        let dy = spread * rng.random_range(0.0..=1.0f32);
        block.decorate(PlacedItem::Frame {
            x: x + inset * 2.0 + dx,
            y: y + inset * 2.0 + dy,
            width: square,
            height: square,
            stroke: None,
            fill: Some(colours::BLACK),
        });
    }

    let text_x = x + config.auth_text_offset;
    let text_width = (box_width - config.auth_text_offset - inset).max(Pt(1.0));
    let style = FontStyle::sans(config.auth_text_size);
    let note_style = FontStyle::sans(config.auth_text_size * 0.85);
    let lines: [(String, FontStyle, Colour); 5] = [
        ("FIRMADO DIGITALMENTE".to_string(), style.bold(), colours::BLACK),
        (
            format!("POR: {}", record.sender_name().to_uppercase()),
            style,
            colours::BLACK,
        ),
        (
            format!("ENTIDAD: {}", ctx.constants().entity_name),
            style,
            colours::BLACK,
        ),
        (
            format!("FECHA: {}", ctx.stamp.date_label()),
            style,
            colours::BLACK,
        ),
        (AUTH_NOTE.to_string(), note_style, colours::DARK_GREY),
    ];

    let mut line_top = y + inset * 1.5;
    for (text, style, colour) in lines {
        let line_height = ctx.line_height(&style);
        let height = block.lines_at(
            TextRun {
                kind: UnitKind::AuthenticationLine,
                text: text.clone(),
                style,
                colour,
                x: text_x,
                width: text_width,
                align: Align::Left,
            },
            line_top,
            vec![text],
            line_height,
        );
        line_top += height;
    }

    block.gap(config.auth_box_height);
    Ok(())
}
