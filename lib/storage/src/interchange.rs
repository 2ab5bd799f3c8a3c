//! Aggregated corpus file
//!
//! UTF-8, comma-separated, one row per aggregated record. Column names are
//! shared with the ingestion and serving layers and must not change.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use medindex_core::{Error, Result};
use medindex_records::corpus::LIST_SEPARATOR;
use medindex_records::{ingredient_key, AggregatedMedication, Category, Tier};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct CorpusRow {
    #[serde(rename = "principio_ativo_limpo")]
    display_name: String,
    #[serde(rename = "categoria_terapeutica")]
    category: Category,
    #[serde(rename = "total_produtos_registrados")]
    product_count: usize,
    #[serde(rename = "produtos_principais")]
    example_products: String,
    #[serde(rename = "empresas_principais")]
    example_companies: String,
    #[serde(rename = "popularidade_mercado")]
    popularity_tier: Tier,
    #[serde(rename = "diversidade_formulacoes")]
    formulation_diversity: Tier,
    #[serde(rename = "texto_completo_busca")]
    search_text: String,
    #[serde(rename = "texto_resumo_busca")]
    summary_text: String,
}

impl From<&AggregatedMedication> for CorpusRow {
    fn from(record: &AggregatedMedication) -> Self {
        Self {
            display_name: record.display_name.clone(),
            category: record.category,
            product_count: record.product_count,
            example_products: record.example_products.join(LIST_SEPARATOR),
            example_companies: record.example_companies.join(LIST_SEPARATOR),
            popularity_tier: record.popularity_tier,
            formulation_diversity: record.formulation_diversity,
            search_text: record.search_text.clone(),
            summary_text: record.summary_text.clone(),
        }
    }
}

impl CorpusRow {
    fn into_record(self) -> AggregatedMedication {
        AggregatedMedication {
            ingredient_key: ingredient_key(&self.display_name),
            source_ingredient: self.display_name.clone(),
            display_name: self.display_name,
            therapeutic_class: None,
            category: self.category,
            product_count: self.product_count,
            example_products: split_list(&self.example_products),
            example_companies: split_list(&self.example_companies),
            popularity_tier: self.popularity_tier,
            formulation_diversity: self.formulation_diversity,
            search_text: self.search_text,
            summary_text: self.summary_text,
        }
    }
}

fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Serialize records into any writer
pub fn write_corpus_to<W: Write>(writer: W, records: &[AggregatedMedication]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer
            .serialize(CorpusRow::from(record))
            .map_err(|e| Error::Csv(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the corpus file, replacing `path` atomically.
pub fn write_corpus<P: AsRef<Path>>(path: P, records: &[AggregatedMedication]) -> Result<()> {
    let path = path.as_ref();
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| write_corpus_to(file, records))
        .map_err(|e| match e {
            atomicwrites::Error::Internal(io) => Error::Io(io),
            atomicwrites::Error::User(inner) => inner,
        })?;

    info!(path = %path.display(), records = records.len(), "wrote corpus file");
    Ok(())
}

/// Parse records from any reader, in file order. Repeated display names are
/// kept; lookups by name resolve to the first one.
pub fn read_corpus_from<R: Read>(reader: R) -> Result<Vec<AggregatedMedication>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<CorpusRow>()
        .map(|row| {
            row.map(CorpusRow::into_record)
                .map_err(|e| Error::Ingestion(format!("corrupt corpus row: {e}")))
        })
        .collect()
}

/// Load a corpus file written by [`write_corpus`].
pub fn read_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<AggregatedMedication>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Ingestion(format!("cannot open {}: {e}", path.display())))?;

    let records = read_corpus_from(std::io::BufReader::new(file))?;
    info!(path = %path.display(), records = records.len(), "loaded corpus file");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medindex_records::{aggregate, RawRecord};

    fn sample_records() -> Vec<AggregatedMedication> {
        let row = |ingredient: &str, class: Option<&str>, product: &str, company: &str| RawRecord {
            active_ingredient: Some(ingredient.to_string()),
            therapeutic_class: class.map(String::from),
            product_name: Some(product.to_string()),
            company: Some(company.to_string()),
            registration_status: Some("VÁLIDO".to_string()),
            registration_number: None,
        };

        aggregate(&[
            row("PARACETAMOL", Some("ANALGESICOS"), "TYLENOL", "JANSSEN"),
            row("PARACETAMOL", Some("ANALGESICOS"), "DORIL, GOTAS", "HYPERA"),
            row("AMOXICILINA", Some("ANTIBIOTICOS"), "AMOXIL", "GSK"),
            row("SORO", None, "SORO \"FISIOLOGICO\"", "BAXTER"),
        ])
    }

    #[test]
    fn test_header_matches_interchange_schema() {
        let mut buf = Vec::new();
        write_corpus_to(&mut buf, &sample_records()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text.lines().next().unwrap(),
            "principio_ativo_limpo,categoria_terapeutica,total_produtos_registrados,\
             produtos_principais,empresas_principais,popularidade_mercado,\
             diversidade_formulacoes,texto_completo_busca,texto_resumo_busca"
        );
        assert!(text.contains("Paracetamol,Analgesico,2,\"TYLENOL; DORIL, GOTAS\",JANSSEN; HYPERA,baixa,baixa,"));
        assert!(text.contains("Soro,Não Classificado,1,"));
    }

    #[test]
    fn test_round_trip_keeps_display_fields() {
        let records = sample_records();
        let mut buf = Vec::new();
        write_corpus_to(&mut buf, &records).unwrap();
        let loaded = read_corpus_from(buf.as_slice()).unwrap();

        assert_eq!(loaded.len(), records.len());
        for (original, restored) in records.iter().zip(&loaded) {
            assert_eq!(original.view(), restored.view());
            assert_eq!(restored.ingredient_key, original.display_name);
        }
    }

    #[test]
    fn test_file_round_trip_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anvisa_medicamentos.csv");

        write_corpus(&path, &sample_records()[..1]).unwrap();
        write_corpus(&path, &sample_records()).unwrap();

        let loaded = read_corpus(&path).unwrap();
        assert_eq!(loaded.len(), 3);
    }

    #[test]
    fn test_corrupt_row_is_fatal() {
        let text = "principio_ativo_limpo,categoria_terapeutica,total_produtos_registrados,\
                    produtos_principais,empresas_principais,popularidade_mercado,\
                    diversidade_formulacoes,texto_completo_busca,texto_resumo_busca\n\
                    Paracetamol,Analgesico,muitos,,,alta,alta,x,y\n";
        let err = read_corpus_from(text.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Ingestion(_)));
    }

    #[test]
    fn test_repeated_display_names_load_in_order() {
        let text = "principio_ativo_limpo,categoria_terapeutica,total_produtos_registrados,\
                    produtos_principais,empresas_principais,popularidade_mercado,\
                    diversidade_formulacoes,texto_completo_busca,texto_resumo_busca\n\
                    Dipirona Sodica,Analgesico,3,NOVALGINA,SANOFI,baixa,baixa,a,b\n\
                    Dipirona Sodica,Analgesico,7,LISADOR,FARMASA,media,baixa,c,d\n";

        let loaded = read_corpus_from(text.as_bytes()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].product_count, 3);
        assert_eq!(loaded[1].product_count, 7);
        assert_eq!(loaded[1].example_companies, vec!["FARMASA"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_corpus("/nonexistent/corpus.csv"),
            Err(Error::Ingestion(_))
        ));
    }
}
