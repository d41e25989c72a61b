//! Per-type structural rules, shared by every output target.
//!
//! Both the fixed-page export and the reflowable preview consult [`VariantRule`] and
//! [`classify`]; neither re-derives formatting decisions from the document type.

use crate::record::DocumentType;

/// How the recipient/metadata block is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataStyle {
    /// No recipient block at all
    None,
    /// Label/value rows: A, DE, ASUNTO, FECHA and optionally REF.
    TabularHeaderFields,
    /// A letter opening: "Señor(a):", recipient lines, "Presente.-", then Asunto and Ref.
    SalutationLetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleAlignment {
    /// Title flush left, date line right-aligned just below it
    LeftBlock,
    /// Title centered over a rule, date line right-aligned further below
    CenteredUnderlined,
}

/// The structural template of a document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantRule {
    pub has_salutation_block: bool,
    pub metadata_style: MetadataStyle,
    pub body_paragraph_styling_enabled: bool,
    pub title_alignment: TitleAlignment,
}

impl DocumentType {
    /// The rule for this type. Total over the enum: a new type does not compile until
    /// it has a rule here.
    pub fn rule(&self) -> VariantRule {
        match self {
            DocumentType::Oficio | DocumentType::CartaDiplomatica => VariantRule {
                has_salutation_block: true,
                metadata_style: MetadataStyle::SalutationLetter,
                body_paragraph_styling_enabled: false,
                title_alignment: TitleAlignment::LeftBlock,
            },
            DocumentType::Memorandum | DocumentType::InformeTecnico => VariantRule {
                has_salutation_block: false,
                metadata_style: MetadataStyle::TabularHeaderFields,
                body_paragraph_styling_enabled: false,
                title_alignment: TitleAlignment::LeftBlock,
            },
            DocumentType::ResolucionMinisterial => VariantRule {
                has_salutation_block: false,
                metadata_style: MetadataStyle::None,
                body_paragraph_styling_enabled: true,
                title_alignment: TitleAlignment::CenteredUnderlined,
            },
        }
    }
}

/// How one body paragraph is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParagraphKind {
    /// "SE RESUELVE", "Vistos", "CONSIDERANDO": bold, extra space above, no indent
    Heading,
    /// "Artículo ...": bold and indented
    Article,
    /// Any other paragraph of a styled body: regular weight, indented
    Indented,
    /// Body styling disabled: regular weight, no indent
    Plain,
}

impl ParagraphKind {
    pub fn is_bold(&self) -> bool {
        matches!(self, ParagraphKind::Heading | ParagraphKind::Article)
    }

    pub fn is_indented(&self) -> bool {
        matches!(self, ParagraphKind::Article | ParagraphKind::Indented)
    }

    pub fn has_extra_spacing(&self) -> bool {
        matches!(self, ParagraphKind::Heading)
    }

    /// Headings stay on the same page as the paragraph that follows them
    pub fn keeps_with_next(&self) -> bool {
        matches!(self, ParagraphKind::Heading)
    }
}

const HEADING_PREFIXES: [&str; 3] = ["SE RESUELVE", "Vistos", "CONSIDERANDO"];
const ARTICLE_PREFIX: &str = "Artículo";

/// Classify a body paragraph by its literal prefix. Headings are checked before
/// articles; without body styling every paragraph is [`ParagraphKind::Plain`] no
/// matter what it says.
pub fn classify(paragraph: &str, rule: &VariantRule) -> ParagraphKind {
    if !rule.body_paragraph_styling_enabled {
        return ParagraphKind::Plain;
    }

    if HEADING_PREFIXES.iter().any(|p| paragraph.starts_with(p)) {
        ParagraphKind::Heading
    } else if paragraph.starts_with(ARTICLE_PREFIX) {
        ParagraphKind::Article
    } else {
        ParagraphKind::Indented
    }
}
