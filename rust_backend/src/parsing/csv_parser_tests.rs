#[cfg(test)]
mod tests {
    use crate::parsing::csv_parser::{
        parse_records_csv, parse_records_csv_str, parse_table_csv, RecordTable,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_HEADER: &str = "Continente,Gran Región / Subcontinente,Región Específica / Área Cultural,Cultura / Sociedad,Cronología Aprox. (10k aC - 750 dC),Subsistencia Principal,Patrón Asentamiento,Arquitectura Notable,Tecnologías Clave,Evidencia Jerarquía Social,Redes Intercambio (Alcance),Sistemas Registro / Escritura";

    /// Helper to create a temp CSV file
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    /// Test parsing a table with every known column
    #[test]
    fn test_parse_full_table() {
        let csv_content = format!(
            "{}\nAsia,Asia Occidental,Mesopotamia,Sumeria,3500-2000 a.C.,Agricultura irrigada,Ciudades-estado,Zigurats monumentales de adobe,Bronce; rueda; arado,Monarquía y templo,Larga distancia,Cuneiforme\n",
            FULL_HEADER
        );
        let temp_file = create_temp_csv(&csv_content);
        let table = parse_records_csv(temp_file.path()).unwrap();

        assert_eq!(table.discarded, 0);
        assert_eq!(table.records.len(), 1);
        let record = &table.records[0];
        assert_eq!(record.continent, "Asia");
        assert_eq!(record.region.as_deref(), Some("Asia Occidental"));
        assert_eq!(record.area.as_deref(), Some("Mesopotamia"));
        assert_eq!(record.culture, "Sumeria");
        assert_eq!(record.chronology, "3500-2000 a.C.");
        assert_eq!(record.writing.as_deref(), Some("Cuneiforme"));
    }

    /// Test year-like cells are kept as text
    #[test]
    fn test_numeric_looking_cells_stay_text() {
        let temp_file = create_temp_csv("Continente,Cultura,Cronología\nEuropa,Vinca,5500\n");
        let df = parse_table_csv(temp_file.path()).unwrap();
        assert_eq!(df.height(), 1);
        let table = parse_records_csv(temp_file.path()).unwrap();
        assert_eq!(table.records[0].chronology, "5500");
    }

    /// Test the short header aliases
    #[test]
    fn test_parse_with_short_headers() {
        let table =
            parse_records_csv_str("Continente,Cultura,Cronología\nAsia,X,3500-2000 a.C.\n").unwrap();
        assert_eq!(table.records.len(), 1);
        assert!(table.records[0].region.is_none());
        assert_eq!(table.records[0].chronology, "3500-2000 a.C.");
    }

    /// Test rows without continent or culture are discarded
    #[test]
    fn test_rows_missing_required_fields_are_discarded() {
        let csv_content = "Continente,Cultura,Cronología\n,Huérfana,1000 a.C.\nÁfrica,,1000 a.C.\nÁfrica,Nok,1000-300 a.C.\n   ,Blanca,500\n";
        let table = parse_records_csv_str(csv_content).unwrap();
        assert_eq!(table.discarded, 3);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].culture, "Nok");
    }

    /// Test missing chronology becomes empty text
    #[test]
    fn test_missing_chronology_is_empty() {
        let table = parse_records_csv_str("Continente,Cultura\nOceanía,Lapita\n").unwrap();
        assert_eq!(table.records[0].chronology, "");
    }

    /// Test quoted cells with commas and surrounding whitespace
    #[test]
    fn test_quoted_cells_are_trimmed() {
        let csv_content =
            "Continente,Cultura,Cronología,Tecnologías\nAmérica del Sur,\" Chavín \",\"900-200 a.C.\",\"Metalurgia de oro, textiles\"\n";
        let table = parse_records_csv_str(csv_content).unwrap();
        let record = &table.records[0];
        assert_eq!(record.culture, "Chavín");
        assert_eq!(record.technology.as_deref(), Some("Metalurgia de oro, textiles"));
    }

    /// Test a header-only table
    #[test]
    fn test_header_only_table() {
        let table = parse_records_csv_str("Continente,Cultura,Cronología\n").unwrap();
        assert_eq!(table, RecordTable::default());
    }

    /// Test missing required column is an error
    #[test]
    fn test_missing_culture_column() {
        let result = parse_records_csv_str("Continente,Cronología\nAsia,3000 a.C.\n");
        assert!(result.is_err());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("culture"), "unexpected error: {}", message);
    }

    /// Test nonexistent file
    #[test]
    fn test_nonexistent_file() {
        let result = parse_records_csv(std::path::Path::new("/nonexistent/matriz.csv"));
        assert!(result.is_err());
    }
}
