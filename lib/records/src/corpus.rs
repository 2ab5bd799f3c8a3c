//! Search documents built from aggregated records

use crate::medication::AggregatedMedication;

/// Separator between labeled segments of the full search text
pub const FIELD_SEPARATOR: &str = " | ";

/// Separator inside list-valued fields
pub const LIST_SEPARATOR: &str = "; ";

/// Full labeled document for one record. Absent fields keep their label.
pub fn search_text(record: &AggregatedMedication) -> String {
    [
        format!("Medicamento: {}", record.display_name),
        format!("Principio Ativo: {}", record.source_ingredient),
        format!(
            "Classe Terapeutica: {}",
            record.therapeutic_class.as_deref().unwrap_or_default()
        ),
        format!("Categoria: {}", record.category),
        format!(
            "Produtos Comerciais: {}",
            record.example_products.join(LIST_SEPARATOR)
        ),
        format!("Total de Produtos: {}", record.product_count),
    ]
    .join(FIELD_SEPARATOR)
}

/// Short `"{display_name} - {category}"` form for listings
pub fn summary_text(record: &AggregatedMedication) -> String {
    format!("{} - {}", record.display_name, record.category)
}

/// Full search text of every record, in record order
pub fn build_corpus(records: &[AggregatedMedication]) -> Vec<String> {
    records.iter().map(search_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::medication::Tier;

    fn record(class: Option<&str>, products: &[&str]) -> AggregatedMedication {
        AggregatedMedication {
            ingredient_key: "PARACETAMOL".into(),
            display_name: "Paracetamol".into(),
            source_ingredient: "PARACETAMOL".into(),
            therapeutic_class: class.map(String::from),
            category: Category::Analgesic,
            product_count: 7,
            example_products: products.iter().map(|p| p.to_string()).collect(),
            example_companies: vec![],
            popularity_tier: Tier::Medium,
            formulation_diversity: Tier::Low,
            search_text: String::new(),
            summary_text: String::new(),
        }
    }

    #[test]
    fn test_search_text_layout() {
        let text = search_text(&record(Some("ANALGESICOS"), &["TYLENOL", "DORIL"]));
        assert_eq!(
            text,
            "Medicamento: Paracetamol | Principio Ativo: PARACETAMOL | \
             Classe Terapeutica: ANALGESICOS | Categoria: Analgesico | \
             Produtos Comerciais: TYLENOL; DORIL | Total de Produtos: 7"
        );
    }

    #[test]
    fn test_absent_fields_keep_labels() {
        let text = search_text(&record(None, &[]));
        assert!(text.contains("Classe Terapeutica:  | "));
        assert!(text.contains("Produtos Comerciais:  | "));
        assert_eq!(text.split(FIELD_SEPARATOR).count(), 6);
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(summary_text(&record(None, &[])), "Paracetamol - Analgesico");
    }

    #[test]
    fn test_build_corpus_preserves_order() {
        let mut second = record(None, &[]);
        second.display_name = "Ibuprofeno".into();
        let records = vec![record(None, &[]), second];

        let corpus = build_corpus(&records);
        assert_eq!(corpus.len(), 2);
        assert!(corpus[0].starts_with("Medicamento: Paracetamol"));
        assert!(corpus[1].starts_with("Medicamento: Ibuprofeno"));
    }
}
