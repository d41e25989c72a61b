use crate::constants::OfficialConstants;
use crate::error::DocError;
use crate::layout::Margins;
use crate::pagesize::{self, PageSize};
use crate::units::{Mm, Pt};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn mm(value: f32) -> Pt {
    Mm(value).into()
}

/// Geometry and typography for every section of a document. All lengths are in
/// points; the defaults reproduce ministry stationery on A4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_size: PageSize,
    pub margins: Margins,

    /// Height of the letterhead band at the top of the first page, measured from the
    /// top margin
    pub header_height: Pt,
    pub letterhead_width: Pt,
    pub letterhead_height: Pt,
    pub slogan_width: Pt,
    pub slogan_size: Pt,

    pub title_size: Pt,
    pub date_size: Pt,
    pub title_rule_width: Pt,
    pub left_block_title_gap: Pt,
    pub left_block_after: Pt,
    pub centered_title_gap: Pt,
    pub centered_after: Pt,

    pub metadata_size: Pt,
    pub label_width: Pt,
    pub row_gap: Pt,
    pub salutation_gap: Pt,
    /// Space left between the metadata divider and the first body paragraph
    pub divider_after: Pt,

    pub body_size: Pt,
    pub paragraph_gap: Pt,
    pub heading_spacing: Pt,
    pub indent: Pt,

    pub signature_gap: Pt,
    pub signature_rule_width: Pt,
    pub signer_name_size: Pt,
    pub signer_detail_size: Pt,
    pub auth_box_width: Pt,
    pub auth_box_height: Pt,
    pub auth_mark_size: Pt,
    pub auth_mark_count: usize,
    pub auth_text_offset: Pt,
    pub auth_text_size: Pt,

    pub footer_size: Pt,
    /// Distance from the bottom edge of the page to the top of the footer
    pub footer_offset: Pt,
    pub seal_width: Pt,
    pub seal_height: Pt,
    pub seal_border: Pt,
    pub rule_thickness: Pt,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            page_size: pagesize::A4,
            margins: Margins::official(),

            header_height: mm(30.0),
            letterhead_width: mm(50.0),
            letterhead_height: mm(12.0),
            slogan_width: mm(80.0),
            slogan_size: Pt(7.0),

            title_size: Pt(14.0),
            date_size: Pt(11.0),
            title_rule_width: mm(60.0),
            left_block_title_gap: mm(4.0),
            left_block_after: mm(8.0),
            centered_title_gap: mm(10.0),
            centered_after: mm(12.0),

            metadata_size: Pt(11.0),
            label_width: mm(25.0),
            row_gap: mm(1.5),
            salutation_gap: mm(8.0),
            divider_after: mm(10.0),

            body_size: Pt(11.0),
            paragraph_gap: mm(3.0),
            heading_spacing: mm(4.0),
            indent: mm(10.0),

            signature_gap: mm(15.0),
            signature_rule_width: mm(60.0),
            signer_name_size: Pt(10.0),
            signer_detail_size: Pt(9.0),
            auth_box_width: mm(90.0),
            auth_box_height: mm(25.0),
            auth_mark_size: mm(21.0),
            auth_mark_count: 15,
            auth_text_offset: mm(26.0),
            auth_text_size: Pt(6.0),

            footer_size: Pt(7.0),
            footer_offset: mm(32.0),
            seal_width: mm(120.0),
            seal_height: mm(8.0),
            seal_border: mm(0.5),
            rule_thickness: mm(0.3),
        }
    }
}

impl LayoutConfig {
    /// Width available to flowing content between the side margins
    pub fn content_width(&self) -> Pt {
        self.page_size.0 - self.margins.left - self.margins.right
    }

    /// Height available to flowing content between the top and bottom margins
    pub fn usable_height(&self) -> Pt {
        self.page_size.1 - self.margins.top - self.margins.bottom
    }
}

/// Everything a render is configured with
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub constants: OfficialConstants,
}

impl Settings {
    /// Load settings from a JSON file. Missing keys take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings, DocError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Per-render values that do not come from the record: the timestamp printed in the
/// authentication box and the seed of its decorative mark. Neither affects layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStamp {
    pub timestamp: DateTime<Local>,
    pub mark_seed: Option<u64>,
}

impl RenderStamp {
    pub fn now() -> RenderStamp {
        RenderStamp {
            timestamp: Local::now(),
            mark_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> RenderStamp {
        self.mark_seed = Some(seed);
        self
    }

    /// The date as printed after "FECHA:" in the authentication box
    pub fn date_label(&self) -> String {
        self.timestamp.format("%d/%m/%Y %H:%M").to_string()
    }
}

impl Default for RenderStamp {
    fn default() -> Self {
        RenderStamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_is_a4() {
        let config = LayoutConfig::default();
        assert!((*Mm::from(config.content_width()) - 160.0).abs() < 0.01);
        assert!((*Mm::from(config.usable_height()) - 237.0).abs() < 0.01);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"layout": {"bodySize": 12.0}, "constants": {"placeholderInitials": "XX/yy"}}"#)
                .expect("valid settings");
        assert_eq!(settings.layout.body_size, Pt(12.0));
        assert_eq!(settings.layout.margins, Margins::official());
        assert_eq!(settings.constants.placeholder_initials, "XX/yy");
        assert_eq!(
            settings.constants.year_name,
            crate::constants::OFFICIAL_YEAR_NAME
        );
    }

    #[test]
    fn settings_load_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"layout": {"indent": 20.0}}"#).expect("write settings");
        let settings = Settings::load(&path).expect("load settings");
        assert_eq!(settings.layout.indent, Pt(20.0));
    }
}
