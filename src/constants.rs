use serde::{Deserialize, Serialize};

/// Official name of the current year, printed on every document
pub const OFFICIAL_YEAR_NAME: &str =
    "Año de la recuperación y consolidación de la economía peruana";

pub const OFFICIAL_ENTITY_NAME: &str = "MINISTERIO DE RELACIONES EXTERIORES";

pub const SEAL_TEXT: &str =
    "[SELLO: MINISTERIO DE RELACIONES EXTERIORES – SECRETARÍA GENERAL – ORIGINAL]";

pub const PLACEHOLDER_INITIALS: &str = "MRE/sg";

pub const LETTERHEAD_SOURCE: &str =
    "https://upload.wikimedia.org/wikipedia/commons/1/1e/Ministerio_de_Relaciones_Exteriores_del_Peru.png";

pub const LETTERHEAD_FALLBACK: &str = "REPÚBLICA DEL PERÚ";

pub const POSTAL_ADDRESS: [&str; 3] = [
    "Jr. Lampa 545, Lima 1, Perú",
    "Central Telefónica: (511) 204-2400",
    "www.gob.pe/rree",
];

/// Process-wide values stamped onto every document. These are never read from a
/// [`DocumentRecord`](crate::DocumentRecord); whatever a content provider supplies
/// for them is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfficialConstants {
    pub year_name: String,
    pub entity_name: String,
    pub seal_text: String,
    pub placeholder_initials: String,
    pub address_lines: Vec<String>,
    /// Where the letterhead mark is loaded from. The engine only references it; fetching
    /// the image is up to the caller.
    pub letterhead_source: String,
    /// Printed in the letterhead slot when no letterhead image is available
    pub letterhead_fallback: String,
}

impl Default for OfficialConstants {
    fn default() -> Self {
        OfficialConstants {
            year_name: OFFICIAL_YEAR_NAME.to_string(),
            entity_name: OFFICIAL_ENTITY_NAME.to_string(),
            seal_text: SEAL_TEXT.to_string(),
            placeholder_initials: PLACEHOLDER_INITIALS.to_string(),
            address_lines: POSTAL_ADDRESS.iter().map(|s| s.to_string()).collect(),
            letterhead_source: LETTERHEAD_SOURCE.to_string(),
            letterhead_fallback: LETTERHEAD_FALLBACK.to_string(),
        }
    }
}
