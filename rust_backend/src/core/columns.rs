//! Column names accepted in the source table.
//!
//! Each field lists the canonical header first, followed by the shorter or
//! English aliases seen in hand-edited exports.

/// Candidate headers for the continent column
pub const CONTINENT_KEYS: &[&str] = &["Continente", "Continent"];

/// Candidate headers for the broad region column
pub const REGION_KEYS: &[&str] = &[
    "Gran Región / Subcontinente",
    "Gran Región",
    "Región",
    "Region",
    "Subcontinent",
];

/// Candidate headers for the specific area column
pub const AREA_KEYS: &[&str] = &[
    "Región Específica / Área Cultural",
    "Área Cultural",
    "Region Específica",
    "Area",
    "Cultural Area",
];

/// Candidate headers for the culture/entity name
pub const CULTURE_KEYS: &[&str] = &["Cultura / Sociedad", "Cultura", "Sociedad", "Culture", "Name"];

/// Candidate headers for the free-text chronology
pub const CHRONOLOGY_KEYS: &[&str] = &[
    "Cronología Aprox. (10k aC - 750 dC)",
    "Cronología Aprox.",
    "Cronología",
    "Chronology",
    "Dates",
];

pub const SUBSISTENCE_KEYS: &[&str] = &["Subsistencia Principal", "Subsistencia", "Subsistence"];

pub const SETTLEMENT_KEYS: &[&str] = &["Patrón Asentamiento", "Asentamiento", "Settlement"];

pub const ARCHITECTURE_KEYS: &[&str] = &["Arquitectura Notable", "Arquitectura", "Architecture"];

pub const TECHNOLOGY_KEYS: &[&str] = &["Tecnologías Clave", "Tecnologías", "Technology"];

pub const HIERARCHY_KEYS: &[&str] = &[
    "Evidencia Jerarquía Social",
    "Jerarquía Social",
    "Jerarquía",
    "Hierarchy",
];

pub const EXCHANGE_KEYS: &[&str] = &[
    "Redes Intercambio (Alcance)",
    "Redes Intercambio",
    "Intercambio",
    "Exchange",
];

pub const WRITING_KEYS: &[&str] = &[
    "Sistemas Registro / Escritura",
    "Escritura",
    "Writing",
];

/// Find the first header in `headers` matching one of `candidates`.
///
/// Matching ignores surrounding whitespace, a leading byte-order mark and
/// ASCII case.
pub fn resolve<'a>(headers: &'a [String], candidates: &[&str]) -> Option<&'a str> {
    candidates.iter().find_map(|candidate| {
        headers
            .iter()
            .find(|header| normalize(header).eq_ignore_ascii_case(candidate))
            .map(|header| header.as_str())
    })
}

fn normalize(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_canonical_header() {
        let headers = vec!["Cultura".to_string(), "Cultura / Sociedad".to_string()];
        assert_eq!(resolve(&headers, CULTURE_KEYS), Some("Cultura / Sociedad"));
    }

    #[test]
    fn test_resolve_strips_bom_and_case() {
        let headers = vec!["\u{feff}continente ".to_string()];
        assert_eq!(resolve(&headers, CONTINENT_KEYS), Some("\u{feff}continente "));
    }

    #[test]
    fn test_resolve_missing() {
        let headers = vec!["Foo".to_string()];
        assert_eq!(resolve(&headers, WRITING_KEYS), None);
    }
}
