use super::{Align, Block, LayoutContext, PlacedItem, Section, TextRun, UnitKind};
use crate::colour::colours;
use crate::error::DocError;
use crate::measure::{FontStyle, TextMeasure};
use crate::record::DocumentRecord;
use crate::units::{Mm, Pt};
use crate::variant::{TitleAlignment, VariantRule};

/// Gap between the title's last line and its underline
const UNDERLINE_OFFSET: Mm = Mm(1.0);

/// Letterhead band (mark and year slogan) followed by the title block
pub(crate) fn render<M: TextMeasure + ?Sized>(
    ctx: &mut LayoutContext<'_, M>,
    record: &DocumentRecord,
    rule: &VariantRule,
) -> Result<(), DocError> {
    let band = letterhead_band(ctx)?;
    ctx.place(band)?;

    let config = ctx.config();
    let after = match rule.title_alignment {
        TitleAlignment::LeftBlock => config.left_block_after,
        TitleAlignment::CenteredUnderlined => config.centered_after,
    };
    let title = title_block(ctx, record, rule)?;
    ctx.place(title)?;
    ctx.skip(after);

    Ok(())
}

fn letterhead_band<M: TextMeasure + ?Sized>(ctx: &LayoutContext<'_, M>) -> Result<Block, DocError> {
    let config = ctx.config();
    let width = ctx.content_width();
    let mut band = Block::new("letterhead", Section::Header);

    band.overlay(
        UnitKind::Letterhead,
        PlacedItem::Letterhead {
            x: Pt(0.0),
            y: Pt(0.0),
            width: config.letterhead_width,
            height: config.letterhead_height,
            fallback: ctx.constants().letterhead_fallback.clone(),
        },
        Pt(0.0),
        config.letterhead_height,
    );

    // printed from the constants, never from the record
    let slogan = format!("\"{}\"", ctx.constants().year_name);
    let style = FontStyle::sans(config.slogan_size).bold();
    let slogan_width = config.slogan_width.min(width);
    let lines = ctx.wrap(&slogan, slogan_width, &style)?;
    let slogan_height = band.lines_at(
        TextRun {
            kind: UnitKind::Slogan,
            text: slogan,
            style,
            colour: colours::SLOGAN_RED,
            x: width - slogan_width,
            width: slogan_width,
            align: Align::Right,
        },
        Pt(0.0),
        lines,
        ctx.line_height(&style),
    );

    band.height = config
        .header_height
        .max(config.letterhead_height)
        .max(slogan_height);
    Ok(band)
}

fn title_block<M: TextMeasure + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    record: &DocumentRecord,
    rule: &VariantRule,
) -> Result<Block, DocError> {
    let config = ctx.config();
    let width = ctx.content_width();
    let mut block = Block::new("title block", Section::Header);

    let title_style = FontStyle::serif(config.title_size).bold();
    let title_lines = ctx.wrap(record.document_number(), width, &title_style)?;
    let title_align = match rule.title_alignment {
        TitleAlignment::LeftBlock => Align::Left,
        TitleAlignment::CenteredUnderlined => Align::Center,
    };
    block.lines(
        TextRun {
            kind: UnitKind::Title,
            text: record.document_number().to_string(),
            style: title_style,
            colour: colours::BLACK,
            x: Pt(0.0),
            width,
            align: title_align,
        },
        title_lines,
        ctx.line_height(&title_style),
    );

    match rule.title_alignment {
        TitleAlignment::LeftBlock => block.gap(config.left_block_title_gap),
        TitleAlignment::CenteredUnderlined => {
            block.gap(UNDERLINE_OFFSET.into());
            let top = block.height;
            let rule_width = config.title_rule_width.min(width);
            block.overlay(
                UnitKind::TitleRule,
                PlacedItem::Rule {
                    x: (width - rule_width) / 2.0,
                    y: top,
                    width: rule_width,
                    thickness: config.rule_thickness,
                    colour: colours::BLACK,
                },
                top,
                config.rule_thickness,
            );
            block.gap(config.rule_thickness);
            block.gap(config.centered_title_gap);
        }
    }

    let date_style = FontStyle::serif(config.date_size);
    let date_lines = ctx.wrap(record.city_and_date(), width, &date_style)?;
    block.lines(
        TextRun {
            kind: UnitKind::DateLine,
            text: record.city_and_date().to_string(),
            style: date_style,
            colour: colours::BLACK,
            x: Pt(0.0),
            width,
            align: Align::Right,
        },
        date_lines,
        ctx.line_height(&date_style),
    );

    Ok(block)
}
