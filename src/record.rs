//! The semantic description of one official document, free of any layout concerns.
//!
//! Records are produced either with [`DocumentRecord::builder`] or from the JSON a
//! content provider returns ([`DocumentRecord::from_provider_json`]). Both paths
//! validate the structural fields layout depends on, so a [`DocumentRecord`] in hand
//! is always renderable.

use crate::constants::OfficialConstants;
use crate::error::DocError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The five structural templates a document can follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Oficio,
    Memorandum,
    CartaDiplomatica,
    InformeTecnico,
    ResolucionMinisterial,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Oficio,
        DocumentType::Memorandum,
        DocumentType::CartaDiplomatica,
        DocumentType::InformeTecnico,
        DocumentType::ResolucionMinisterial,
    ];

    /// The label content providers use for this type
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Oficio => "Oficio",
            DocumentType::Memorandum => "Memorándum",
            DocumentType::CartaDiplomatica => "Carta Diplomática",
            DocumentType::InformeTecnico => "Informe Técnico",
            DocumentType::ResolucionMinisterial => "Resolución Ministerial",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive, and tolerant of missing accents ("Memorandum", "resolucion ministerial")
impl FromStr for DocumentType {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_label(s);
        DocumentType::ALL
            .into_iter()
            .find(|t| fold_label(t.label()) == wanted)
            .ok_or_else(|| DocError::UnrecognizedDocumentType(Some(s.to_string())))
    }
}

fn fold_label(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    #[default]
    Normal,
    Urgente,
    MuyUrgente,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Normal => "Normal",
            Urgency::Urgente => "Urgente",
            Urgency::MuyUrgente => "Muy Urgente",
        }
    }

    /// Lenient parse: anything unrecognised is treated as [`Urgency::Normal`]
    fn parse_lenient(s: &str) -> Urgency {
        match s.trim().to_lowercase().as_str() {
            "normal" => Urgency::Normal,
            "urgente" => Urgency::Urgente,
            "muy urgente" => Urgency::MuyUrgente,
            other => {
                log::warn!("unknown urgency {other:?}, treating it as Normal");
                Urgency::Normal
            }
        }
    }
}

/// One document instance. Immutable once built: there are no setters, and the
/// document type is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    document_type: DocumentType,
    document_number: String,
    year_name: String,
    city_and_date: String,
    urgency: Urgency,
    recipient_name: Option<String>,
    recipient_title: Option<String>,
    recipient_entity: Option<String>,
    sender_name: String,
    sender_title: String,
    sender_entity: String,
    subject: String,
    body_paragraphs: Vec<String>,
    reference: Option<String>,
    footer_initials: Option<String>,
}

impl DocumentRecord {
    pub fn builder(document_type: DocumentType) -> DocumentRecordBuilder {
        DocumentRecordBuilder::new(document_type)
    }

    /// Parse the JSON a content provider returned. When the payload carries no
    /// `documentType`, the `requested` type (the one the provider was asked for) is
    /// used; with neither, parsing fails with [`DocError::UnrecognizedDocumentType`].
    ///
    /// Whatever year name the payload carries is replaced by the official one.
    pub fn from_provider_json(
        json: &str,
        requested: Option<DocumentType>,
        constants: &OfficialConstants,
    ) -> Result<DocumentRecord, DocError> {
        let payload: RecordPayload = serde_json::from_str(json)?;

        let document_type = match payload.document_type.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.parse()?,
            _ => requested.ok_or(DocError::UnrecognizedDocumentType(None))?,
        };

        let mut builder = DocumentRecord::builder(document_type)
            .document_number(payload.document_number.unwrap_or_default())
            .city_and_date(payload.city_and_date.unwrap_or_default())
            .urgency(
                payload
                    .urgency
                    .as_deref()
                    .map(Urgency::parse_lenient)
                    .unwrap_or_default(),
            )
            .sender(
                payload.sender_name.unwrap_or_default(),
                payload.sender_title.unwrap_or_default(),
                payload.sender_entity.unwrap_or_default(),
            )
            .subject(payload.subject.unwrap_or_default())
            .body(payload.body_paragraphs);

        builder.recipient_name = non_blank(payload.recipient_name);
        builder.recipient_title = non_blank(payload.recipient_title);
        builder.recipient_entity = non_blank(payload.recipient_entity);
        builder.reference = non_blank(payload.reference);
        builder.footer_initials = non_blank(payload.footer_initials);
        if let Some(year_name) = payload.year_name {
            builder = builder.year_name(year_name);
        }

        Ok(builder.build()?.canonicalize(constants))
    }

    /// Same as [`from_provider_json`](DocumentRecord::from_provider_json) with no
    /// requested-type fallback
    pub fn from_json(json: &str, constants: &OfficialConstants) -> Result<DocumentRecord, DocError> {
        DocumentRecord::from_provider_json(json, None, constants)
    }

    /// Overwrite the process-wide fields with their official values
    pub fn canonicalize(mut self, constants: &OfficialConstants) -> DocumentRecord {
        if self.year_name != constants.year_name {
            log::debug!("replacing supplied year name with the official one");
            self.year_name = constants.year_name.clone();
        }
        self
    }

    /// Check the structural fields layout relies on
    pub fn validate(&self) -> Result<(), DocError> {
        if self.body_paragraphs.iter().all(|p| p.trim().is_empty()) {
            return Err(DocError::EmptyBodyContent);
        }
        if self.sender_name.trim().is_empty() {
            return Err(DocError::MissingSender);
        }
        Ok(())
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn document_number(&self) -> &str {
        &self.document_number
    }

    pub fn year_name(&self) -> &str {
        &self.year_name
    }

    pub fn city_and_date(&self) -> &str {
        &self.city_and_date
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn recipient_name(&self) -> Option<&str> {
        self.recipient_name.as_deref()
    }

    pub fn recipient_title(&self) -> Option<&str> {
        self.recipient_title.as_deref()
    }

    pub fn recipient_entity(&self) -> Option<&str> {
        self.recipient_entity.as_deref()
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn sender_title(&self) -> &str {
        &self.sender_title
    }

    pub fn sender_entity(&self) -> &str {
        &self.sender_entity
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body_paragraphs(&self) -> &[String] {
        &self.body_paragraphs
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn footer_initials(&self) -> Option<&str> {
        self.footer_initials.as_deref()
    }
}

/// Builds a [`DocumentRecord`]; [`build`](DocumentRecordBuilder::build) validates it
#[derive(Debug, Clone)]
pub struct DocumentRecordBuilder {
    document_type: DocumentType,
    document_number: String,
    year_name: String,
    city_and_date: String,
    urgency: Urgency,
    recipient_name: Option<String>,
    recipient_title: Option<String>,
    recipient_entity: Option<String>,
    sender_name: String,
    sender_title: String,
    sender_entity: String,
    subject: String,
    body_paragraphs: Vec<String>,
    reference: Option<String>,
    footer_initials: Option<String>,
}

impl DocumentRecordBuilder {
    fn new(document_type: DocumentType) -> DocumentRecordBuilder {
        DocumentRecordBuilder {
            document_type,
            document_number: String::new(),
            year_name: crate::constants::OFFICIAL_YEAR_NAME.to_string(),
            city_and_date: String::new(),
            urgency: Urgency::Normal,
            recipient_name: None,
            recipient_title: None,
            recipient_entity: None,
            sender_name: String::new(),
            sender_title: String::new(),
            sender_entity: String::new(),
            subject: String::new(),
            body_paragraphs: Vec::new(),
            reference: None,
            footer_initials: None,
        }
    }

    pub fn document_number<S: ToString>(mut self, number: S) -> Self {
        self.document_number = number.to_string();
        self
    }

    pub fn year_name<S: ToString>(mut self, year_name: S) -> Self {
        self.year_name = year_name.to_string();
        self
    }

    pub fn city_and_date<S: ToString>(mut self, city_and_date: S) -> Self {
        self.city_and_date = city_and_date.to_string();
        self
    }

    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn recipient<N: ToString, T: ToString, E: ToString>(
        mut self,
        name: N,
        title: T,
        entity: E,
    ) -> Self {
        self.recipient_name = non_blank(Some(name.to_string()));
        self.recipient_title = non_blank(Some(title.to_string()));
        self.recipient_entity = non_blank(Some(entity.to_string()));
        self
    }

    pub fn sender<N: ToString, T: ToString, E: ToString>(
        mut self,
        name: N,
        title: T,
        entity: E,
    ) -> Self {
        self.sender_name = name.to_string();
        self.sender_title = title.to_string();
        self.sender_entity = entity.to_string();
        self
    }

    pub fn subject<S: ToString>(mut self, subject: S) -> Self {
        self.subject = subject.to_string();
        self
    }

    /// Append one body paragraph
    pub fn paragraph<S: ToString>(mut self, paragraph: S) -> Self {
        self.body_paragraphs.push(paragraph.to_string());
        self
    }

    /// Append body paragraphs, keeping their order
    pub fn body<I, S>(mut self, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.body_paragraphs
            .extend(paragraphs.into_iter().map(|p| p.to_string()));
        self
    }

    pub fn reference<S: ToString>(mut self, reference: S) -> Self {
        self.reference = non_blank(Some(reference.to_string()));
        self
    }

    pub fn footer_initials<S: ToString>(mut self, initials: S) -> Self {
        self.footer_initials = non_blank(Some(initials.to_string()));
        self
    }

    pub fn build(self) -> Result<DocumentRecord, DocError> {
        let record = DocumentRecord {
            document_type: self.document_type,
            document_number: self.document_number,
            year_name: self.year_name,
            city_and_date: self.city_and_date,
            urgency: self.urgency,
            recipient_name: self.recipient_name,
            recipient_title: self.recipient_title,
            recipient_entity: self.recipient_entity,
            sender_name: self.sender_name,
            sender_title: self.sender_title,
            sender_entity: self.sender_entity,
            subject: self.subject,
            body_paragraphs: self.body_paragraphs,
            reference: self.reference,
            footer_initials: self.footer_initials,
        };
        record.validate()?;
        Ok(record)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Wire shape of a content provider's response
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordPayload {
    document_type: Option<String>,
    document_number: Option<String>,
    year_name: Option<String>,
    city_and_date: Option<String>,
    urgency: Option<String>,
    recipient_name: Option<String>,
    recipient_title: Option<String>,
    recipient_entity: Option<String>,
    sender_name: Option<String>,
    sender_title: Option<String>,
    sender_entity: Option<String>,
    subject: Option<String>,
    #[serde(default)]
    body_paragraphs: Vec<String>,
    reference: Option<String>,
    footer_initials: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMO_JSON: &str = r#"{
        "documentType": "Memorándum",
        "documentNumber": "MEMORÁNDUM N.° 112-2025-MRE/DGA",
        "yearName": "Año de algo distinto",
        "cityAndDate": "Lima, 10 de octubre de 2025",
        "urgency": "Muy Urgente",
        "recipientName": "Ana Torres",
        "recipientTitle": "Directora de Logística",
        "recipientEntity": "",
        "senderName": "Luis Paredes",
        "senderTitle": "Director General de Administración",
        "senderEntity": "Ministerio de Relaciones Exteriores",
        "subject": "Compra de papel bond",
        "bodyParagraphs": ["Primero.", "Segundo."],
        "footerInitials": "LP/at"
    }"#;

    #[test]
    fn parses_provider_payload() {
        let record = DocumentRecord::from_json(MEMO_JSON, &OfficialConstants::default())
            .expect("valid memo");
        assert_eq!(record.document_type(), DocumentType::Memorandum);
        assert_eq!(record.urgency(), Urgency::MuyUrgente);
        assert_eq!(record.recipient_entity(), None);
        assert_eq!(record.body_paragraphs(), ["Primero.", "Segundo."]);
        assert_eq!(record.footer_initials(), Some("LP/at"));
    }

    #[test]
    fn year_name_is_always_official() {
        let record = DocumentRecord::from_json(MEMO_JSON, &OfficialConstants::default())
            .expect("valid memo");
        assert_eq!(record.year_name(), crate::constants::OFFICIAL_YEAR_NAME);
    }

    #[test]
    fn labels_parse_without_accents() {
        assert_eq!(
            "resolucion ministerial".parse::<DocumentType>().unwrap(),
            DocumentType::ResolucionMinisterial
        );
        assert_eq!(
            " MEMORANDUM ".parse::<DocumentType>().unwrap(),
            DocumentType::Memorandum
        );
        for t in DocumentType::ALL {
            assert_eq!(t.label().parse::<DocumentType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{"documentType": "Circular", "senderName": "X", "bodyParagraphs": ["a"]}"#;
        let err = DocumentRecord::from_json(json, &OfficialConstants::default()).unwrap_err();
        assert!(matches!(err, DocError::UnrecognizedDocumentType(Some(ref t)) if t == "Circular"));
    }

    #[test]
    fn missing_type_uses_requested_fallback() {
        let json = r#"{"senderName": "X", "bodyParagraphs": ["a"]}"#;
        let constants = OfficialConstants::default();
        let err = DocumentRecord::from_json(json, &constants).unwrap_err();
        assert!(matches!(err, DocError::UnrecognizedDocumentType(None)));

        let record =
            DocumentRecord::from_provider_json(json, Some(DocumentType::Oficio), &constants)
                .expect("fallback type applies");
        assert_eq!(record.document_type(), DocumentType::Oficio);
    }

    #[test]
    fn structural_fields_are_validated() {
        let empty = DocumentRecord::builder(DocumentType::Oficio)
            .sender("Luis Paredes", "Director", "MRE")
            .paragraph("   ")
            .build();
        assert!(matches!(empty, Err(DocError::EmptyBodyContent)));

        let unsigned = DocumentRecord::builder(DocumentType::Oficio)
            .paragraph("Tengo el agrado de dirigirme a usted.")
            .build();
        assert!(matches!(unsigned, Err(DocError::MissingSender)));
    }

    #[test]
    fn unknown_urgency_falls_back_to_normal() {
        let json = r#"{"documentType": "Oficio", "urgency": "Inmediata", "senderName": "X", "bodyParagraphs": ["a"]}"#;
        let record = DocumentRecord::from_json(json, &OfficialConstants::default()).unwrap();
        assert_eq!(record.urgency(), Urgency::Normal);
    }
}
