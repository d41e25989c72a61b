use super::{Align, Block, LayoutContext, PlacedItem, Section, TextItem, TextRun, UnitKind};
use crate::colour::colours;
use crate::error::DocError;
use crate::measure::{FontStyle, TextMeasure};
use crate::record::DocumentRecord;
use crate::units::Pt;
use crate::variant::{MetadataStyle, VariantRule};

/// The recipient/metadata block, laid out according to the variant's metadata style.
/// The whole block is a single unit: it is never split across pages.
pub(crate) fn render<M: TextMeasure + ?Sized>(
    ctx: &mut LayoutContext<'_, M>,
    record: &DocumentRecord,
    rule: &VariantRule,
) -> Result<(), DocError> {
    let block = match rule.metadata_style {
        MetadataStyle::None => return Ok(()),
        MetadataStyle::TabularHeaderFields => tabular(ctx, record)?,
        MetadataStyle::SalutationLetter => salutation(ctx, record)?,
    };

    ctx.place(block)?;
    ctx.skip(ctx.config().divider_after);
    Ok(())
}

/// The label/value rows of the tabular style, in order. REF. only appears when the
/// record has a reference.
pub fn tabular_rows(record: &DocumentRecord) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        (
            "A",
            join_present(&[record.recipient_name(), record.recipient_title()]),
        ),
        (
            "DE",
            join_present(&[Some(record.sender_name()), Some(record.sender_title())]),
        ),
        ("ASUNTO", record.subject().to_string()),
        ("FECHA", record.city_and_date().to_string()),
    ];
    if let Some(reference) = record.reference() {
        rows.push(("REF.", reference.to_string()));
    }
    rows
}

fn join_present(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

fn tabular<M: TextMeasure + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    record: &DocumentRecord,
) -> Result<Block, DocError> {
    let config = ctx.config();
    let width = ctx.content_width();
    let value_width = width - config.label_width;
    let style = FontStyle::serif(config.metadata_size);
    let label_style = style.bold();
    let line_height = ctx.line_height(&style);

    let mut block = Block::new("metadata block", Section::Metadata);
    for (label, value) in tabular_rows(record) {
        block.decorate(PlacedItem::Text(TextItem {
            text: label.to_string(),
            style: label_style,
            colour: colours::BLACK,
            x: Pt(0.0),
            y: block.height,
            width: config.label_width,
            align: Align::Left,
        }));

        // rows grow with the wrapped value, ASUNTO in particular
        let lines = ctx.wrap(&format!(": {value}"), value_width, &style)?;
        block.lines(
            TextRun {
                kind: UnitKind::MetadataRow {
                    label: label.to_string(),
                },
                text: value,
                style,
                colour: colours::BLACK,
                x: config.label_width,
                width: value_width,
                align: Align::Left,
            },
            lines,
            line_height,
        );
        block.gap(config.row_gap);
    }

    divider(ctx, &mut block);
    Ok(block)
}

fn salutation<M: TextMeasure + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    record: &DocumentRecord,
) -> Result<Block, DocError> {
    let config = ctx.config();
    let width = ctx.content_width();
    let style = FontStyle::serif(config.metadata_size);
    let line_height = ctx.line_height(&style);

    let recipient_name = record.recipient_name().map(str::to_uppercase);
    let address: Vec<(String, FontStyle)> = [
        (Some("Señor(a):".to_string()), style.bold()),
        (recipient_name, style.bold()),
        (record.recipient_title().map(str::to_string), style),
        (record.recipient_entity().map(str::to_string), style),
        (Some("Presente.-".to_string()), style),
    ]
    .into_iter()
    .filter_map(|(text, style)| text.map(|text| (text, style)))
    .collect();

    let mut block = Block::new("metadata block", Section::Metadata);
    for (text, style) in address {
        let lines = ctx.wrap(&text, width, &style)?;
        block.lines(
            TextRun {
                kind: UnitKind::SalutationLine,
                text,
                style,
                colour: colours::BLACK,
                x: Pt(0.0),
                width,
                align: Align::Left,
            },
            lines,
            line_height,
        );
    }

    block.gap(config.salutation_gap);
    labelled(ctx, &mut block, "Asunto:", record.subject())?;
    if let Some(reference) = record.reference() {
        block.gap(config.row_gap);
        labelled(ctx, &mut block, "Ref.:", reference)?;
    }
    block.gap(config.row_gap);

    divider(ctx, &mut block);
    Ok(block)
}

/// A bold label in the label column with justified text wrapped beside it
fn labelled<M: TextMeasure + ?Sized>(
    ctx: &LayoutContext<'_, M>,
    block: &mut Block,
    label: &str,
    text: &str,
) -> Result<(), DocError> {
    let config = ctx.config();
    let value_width = ctx.content_width() - config.label_width;
    let style = FontStyle::serif(config.metadata_size);

    block.decorate(PlacedItem::Text(TextItem {
        text: label.to_string(),
        style: style.bold(),
        colour: colours::BLACK,
        x: Pt(0.0),
        y: block.height,
        width: config.label_width,
        align: Align::Left,
    }));

    let lines = ctx.wrap(text, value_width, &style)?;
    block.lines(
        TextRun {
            kind: UnitKind::LabelledParagraph {
                label: label.to_string(),
            },
            text: text.to_string(),
            style,
            colour: colours::BLACK,
            x: config.label_width,
            width: value_width,
            align: Align::Justify,
        },
        lines,
        ctx.line_height(&style),
    );
    Ok(())
}

fn divider<M: TextMeasure + ?Sized>(ctx: &LayoutContext<'_, M>, block: &mut Block) {
    let config = ctx.config();
    let top = block.height;
    block.overlay(
        UnitKind::Divider,
        PlacedItem::Rule {
            x: Pt(0.0),
            y: top,
            width: ctx.content_width(),
            thickness: config.rule_thickness,
            colour: colours::BLACK,
        },
        top,
        config.rule_thickness,
    );
    block.gap(config.rule_thickness);
}
