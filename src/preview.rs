//! The reflowable preview of a document, rendered from a continuous layout.
//!
//! The HTML form keeps the unbroken paragraph text so a browser can reflow it; the
//! plain text form prints the lines exactly as the measurement adapter wrapped them.
//! Both are driven by the same layout units as the PDF, so sections, paragraph kinds
//! and line counts agree between targets.

use crate::colour::colours;
use crate::layout::{Align, LaidOutDocument, LayoutUnit, Section, Target, UnitKind};
use crate::settings::Settings;
use crate::units::Pt;
use crate::variant::ParagraphKind;
use std::fmt::{self, Write as _};

/// Width of a rule in the plain text preview, in characters
const TEXT_RULE_WIDTH: usize = 30;

pub struct Preview {
    layout: LaidOutDocument,
    letterhead_source: String,
    letterhead_fallback: String,
    entity_name: String,
    /// Width, height and mark size of the authentication box
    auth_box: (Pt, Pt, Pt),
}

impl Preview {
    pub fn new(layout: LaidOutDocument, settings: &Settings) -> Preview {
        let constants = &settings.constants;
        let config = &settings.layout;
        if layout.target != Target::Continuous {
            log::debug!("previewing a paginated layout; page breaks are ignored");
        }
        Preview {
            layout,
            letterhead_source: constants.letterhead_source.clone(),
            letterhead_fallback: constants.letterhead_fallback.clone(),
            entity_name: constants.entity_name.clone(),
            auth_box: (
                config.auth_box_width,
                config.auth_box_height,
                config.auth_mark_size,
            ),
        }
    }

    pub fn layout(&self) -> &LaidOutDocument {
        &self.layout
    }

    /// A standalone HTML page showing the document as one continuous sheet
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let width = self.layout.page_size.0;

        html.push_str("<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", escape(&self.title()));
        let _ = writeln!(html, "<style>{}</style>", stylesheet(width));
        html.push_str("</head>\n<body>\n<div class=\"sheet\">\n");
        let _ = writeln!(
            html,
            "<div class=\"watermark\" aria-hidden=\"true\">{}</div>",
            escape(&self.entity_name)
        );

        let mut current: Option<Section> = None;
        let mut in_auth_box = false;
        for unit in self.layout.units.iter() {
            let section_changes = current != Some(unit.section);
            if in_auth_box && (section_changes || unit.kind != UnitKind::AuthenticationLine) {
                html.push_str("</div>\n</div>\n");
                in_auth_box = false;
            }
            if section_changes {
                if current.is_some() {
                    html.push_str("</section>\n");
                }
                let _ = writeln!(html, "<section class=\"{}\">", section_class(unit.section));
                current = Some(unit.section);
            }
            self.unit_html(&mut html, unit);
            in_auth_box |= unit.kind == UnitKind::AuthenticationBox;
        }
        if in_auth_box {
            html.push_str("</div>\n</div>\n");
        }
        if current.is_some() {
            html.push_str("</section>\n");
        }

        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    fn title(&self) -> String {
        self.layout
            .units
            .iter()
            .find(|u| u.kind == UnitKind::Title)
            .map(|u| u.text.clone())
            .unwrap_or_default()
    }

    fn unit_html(&self, html: &mut String, unit: &LayoutUnit) {
        let text = escape(&unit.text);
        let bold = if unit.style.is_bold() { " bold" } else { "" };
        let indent = if unit.indent > Pt(0.0) && matches!(unit.kind, UnitKind::Paragraph(_)) {
            format!(" style=\"margin-left:{:.1}pt\"", unit.indent.0)
        } else {
            String::new()
        };

        let _ = match &unit.kind {
            UnitKind::Letterhead => writeln!(
                html,
                "<img class=\"letterhead\" src=\"{}\" alt=\"{}\">",
                escape(&self.letterhead_source),
                escape(&self.letterhead_fallback)
            ),
            UnitKind::Slogan => writeln!(html, "<p class=\"slogan\">{text}</p>"),
            UnitKind::Title => writeln!(html, "<h1 class=\"{}\">{text}</h1>", align_class(unit.align)),
            UnitKind::TitleRule => writeln!(html, "<hr class=\"title-rule\">"),
            UnitKind::DateLine => writeln!(html, "<p class=\"date right\">{text}</p>"),
            UnitKind::MetadataRow { label } => writeln!(
                html,
                "<div class=\"row\"><span class=\"label bold\">{}</span><span class=\"value\">: {text}</span></div>",
                escape(label)
            ),
            UnitKind::SalutationLine => writeln!(html, "<p class=\"salutation{bold}\">{text}</p>"),
            UnitKind::LabelledParagraph { label } => writeln!(
                html,
                "<div class=\"row\"><span class=\"label bold\">{}</span><span class=\"value justify\">{text}</span></div>",
                escape(label)
            ),
            UnitKind::Divider => writeln!(html, "<hr class=\"divider\">"),
            UnitKind::Paragraph(kind) => writeln!(
                html,
                "<p class=\"{} justify{bold}\"{indent}>{text}</p>",
                paragraph_class(*kind)
            ),
            UnitKind::SignatureRule => writeln!(html, "<hr class=\"signature-rule\">"),
            UnitKind::SignatureLine => writeln!(html, "<p class=\"signer center{bold}\">{text}</p>"),
            // the signature lines that follow are written inside the box
            UnitKind::AuthenticationBox => {
                let (width, height, mark) = self.auth_box;
                writeln!(
                    html,
                    "<div class=\"auth-box\" style=\"width:{:.1}pt;height:{:.1}pt\">\n\
                     <div class=\"auth-mark\" style=\"width:{:.1}pt;height:{:.1}pt\"></div>\n\
                     <div class=\"auth-details\">",
                    width.0, height.0, mark.0, mark.0
                )
            }
            UnitKind::AuthenticationLine => writeln!(html, "<p class=\"auth{bold}\">{text}</p>"),
            UnitKind::Initials => writeln!(html, "<p class=\"initials\">{text}</p>"),
            UnitKind::Seal => writeln!(html, "<div class=\"seal\">{text}</div>"),
            UnitKind::AddressLine => writeln!(html, "<p class=\"address right\">{text}</p>"),
        };
    }
}

/// Plain text: the wrapped lines in layout order, set in a fixed number of columns
impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self
            .layout
            .units
            .iter()
            .flat_map(|u| u.lines.iter())
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(TEXT_RULE_WIDTH);

        let mut previous: Option<Section> = None;
        for unit in self.layout.units.iter() {
            if previous.is_some() && previous != Some(unit.section) {
                writeln!(f)?;
            }
            previous = Some(unit.section);

            match unit.kind {
                UnitKind::Letterhead => writeln!(f, "[{}]", self.letterhead_fallback)?,
                UnitKind::Divider => writeln!(f, "{}", "-".repeat(columns))?,
                UnitKind::TitleRule | UnitKind::SignatureRule => {
                    writeln!(f, "{}", pad("_".repeat(TEXT_RULE_WIDTH), Align::Center, columns))?
                }
                UnitKind::AuthenticationBox => {}
                _ => {
                    let prefix = match &unit.kind {
                        UnitKind::MetadataRow { label } | UnitKind::LabelledParagraph { label } => {
                            Some(label.as_str())
                        }
                        _ => None,
                    };
                    for (i, line) in unit.lines.iter().enumerate() {
                        let line = match (prefix, i) {
                            (Some(label), 0) => format!("{label:<8}{line}"),
                            (Some(_), _) => format!("{:<8}{line}", ""),
                            _ => line.clone(),
                        };
                        writeln!(f, "{}", pad(line, unit.align, columns))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn pad(line: String, align: Align, columns: usize) -> String {
    let len = line.chars().count();
    let spare = columns.saturating_sub(len);
    match align {
        Align::Right => format!("{}{line}", " ".repeat(spare)),
        Align::Center => format!("{}{line}", " ".repeat(spare / 2)),
        Align::Left | Align::Justify => line,
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn section_class(section: Section) -> &'static str {
    match section {
        Section::Header => "header",
        Section::Metadata => "metadata",
        Section::Body => "body",
        Section::Signature => "signature",
        Section::Footer => "footer",
    }
}

fn paragraph_class(kind: ParagraphKind) -> &'static str {
    match kind {
        ParagraphKind::Heading => "heading",
        ParagraphKind::Article => "article",
        ParagraphKind::Indented => "indented",
        ParagraphKind::Plain => "plain",
    }
}

fn align_class(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Right => "right",
        Align::Center => "center",
        Align::Justify => "justify",
    }
}

fn stylesheet(width: Pt) -> String {
    let slogan = colours::SLOGAN_RED.css();
    let seal = colours::SEAL_RED.css();
    let grey = colours::MID_GREY.css();
    let dark = colours::DARK_GREY.css();
    let mark = colours::LIGHT_GREY.css();
    let ink = colours::BLACK.css();
    format!(
        "body{{background:#e5e5e5;margin:0;padding:24px 0}}\
         .sheet{{position:relative;background:#fff;width:{width:.0}pt;margin:0 auto;padding:20mm 25mm;box-sizing:border-box;font-family:'Times New Roman',serif;font-size:11pt;color:{ink}}}\
         .watermark{{position:absolute;top:45%;left:0;right:0;text-align:center;font-size:28pt;opacity:.05;transform:rotate(-30deg);pointer-events:none}}\
         .letterhead{{height:12mm}}\
         .slogan{{float:right;width:80mm;text-align:right;font:bold 7pt sans-serif;color:{slogan};margin:0}}\
         h1{{font-size:14pt;margin:8mm 0 4mm}}\
         .title-rule{{width:60mm;border:0;border-top:1px solid {ink}}}\
         .divider{{border:0;border-top:1px solid {ink};margin:0 0 10mm}}\
         .signature-rule{{width:60mm;border:0;border-top:1px solid {ink};margin-top:15mm}}\
         .row{{display:flex}} .label{{flex:0 0 25mm}} .value{{flex:1}}\
         p{{margin:0 0 3mm}} .salutation,.signer,.auth,.initials,.address{{margin:0}}\
         .heading{{margin-top:4mm}} .indented,.article{{margin-left:10mm}}\
         .auth-box{{display:flex;gap:3mm;margin:6mm auto 0;padding:1.5mm;box-sizing:border-box;border:1px solid {grey};overflow:hidden}}\
         .auth-mark{{flex:none;background:{mark}}}\
         .auth{{font:6pt sans-serif}} .auth:last-child{{color:{dark}}}\
         .seal{{display:inline-block;border:1px solid {seal};color:{seal};font:bold 7pt sans-serif;padding:1mm 2mm}}\
         .initials,.address{{font-size:7pt;color:{grey}}}\
         .bold{{font-weight:bold}} .justify{{text-align:justify}} .center{{text-align:center}} .right{{text-align:right}} .left{{text-align:left}}",
        width = width.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Orchestrator, Target};
    use crate::measure::MonospaceMeasure;
    use crate::record::{DocumentRecord, DocumentType};
    use crate::settings::{RenderStamp, Settings};

    fn preview(record: &DocumentRecord) -> Preview {
        let settings = Settings::default();
        let layout = Orchestrator::new(&settings, &MonospaceMeasure::default(), Target::Continuous)
            .with_stamp(RenderStamp::now().with_seed(1))
            .render(record)
            .expect("can lay out");
        Preview::new(layout, &settings)
    }

    fn memorandum() -> DocumentRecord {
        DocumentRecord::builder(DocumentType::Memorandum)
            .document_number("MEMORÁNDUM N.° 12-2025-MRE/OGA")
            .city_and_date("Lima, 5 de marzo de 2025")
            .recipient("Ana Torres", "Jefa de Logística", "")
            .sender("Luis Paredes", "Director General", "Ministerio de Relaciones Exteriores")
            .subject("Inventario <anual> & cierre")
            .paragraph("Se solicita remitir el inventario de bienes.")
            .build()
            .expect("valid record")
    }

    #[test]
    fn html_is_escaped_and_sectioned() {
        let html = preview(&memorandum()).to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Inventario &lt;anual&gt; &amp; cierre"));
        assert!(html.contains("<section class=\"metadata\">"));
        assert!(html.contains("<section class=\"footer\">"));
        assert!(html.contains("alt=\"REPÚBLICA DEL PERÚ\""));
        assert_eq!(html.matches("<section").count(), 5);
    }

    #[test]
    fn text_preview_keeps_wrapped_lines() {
        let preview = preview(&memorandum());
        let text = preview.to_string();
        assert!(text.contains("[REPÚBLICA DEL PERÚ]"));
        assert!(text.contains("ASUNTO"));
        assert!(text.contains("Se solicita remitir el inventario de bienes."));
        assert!(text.contains(crate::constants::PLACEHOLDER_INITIALS));
    }

    #[test]
    fn authentication_box_has_its_configured_size() {
        let html = preview(&memorandum()).to_html();
        let config = Settings::default().layout;
        let open = format!(
            "<div class=\"auth-box\" style=\"width:{:.1}pt;height:{:.1}pt\">",
            config.auth_box_width.0, config.auth_box_height.0
        );
        let start = html.find(&open).expect("sized authentication box");
        let inside = &html[start..];
        let mark = inside.find("class=\"auth-mark\"").expect("mark area");
        let signed = inside.find("FIRMADO DIGITALMENTE").expect("signature details");
        let initials = inside
            .find(crate::constants::PLACEHOLDER_INITIALS)
            .expect("footer initials");
        assert!(mark < signed);
        // the box closes before the footer begins
        let closed = inside.find("</div>\n</div>").expect("box closed");
        assert!(signed < closed && closed < initials);
        assert!(html.contains(&colours::LIGHT_GREY.css()));
        assert!(html.contains(&colours::SLOGAN_RED.css()));
    }

    #[test]
    fn html_escape() {
        assert_eq!(escape("a<b>\"c\"&'d'"), "a&lt;b&gt;&quot;c&quot;&amp;&#39;d&#39;");
    }
}
