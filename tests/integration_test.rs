// End-to-end tests: raw dataset file -> corpus file -> retrieval service
use medindex::prelude::*;
use std::io::Write;
use std::sync::Arc;

const HEADER: &str = "TIPO_PRODUTO;NOME_PRODUTO;DATA_FINALIZACAO_PROCESSO;CATEGORIA_REGULATORIA;\
NUMERO_REGISTRO_PRODUTO;DATA_VENCIMENTO_REGISTRO;NUMERO_PROCESSO;CLASSE_TERAPEUTICA;\
EMPRESA_DETENTORA_REGISTRO;SITUACAO_REGISTRO;PRINCIPIO_ATIVO";

fn line(product: &str, class: &str, company: &str, status: &str, ingredient: &str) -> String {
    format!("MEDICAMENTO;{product};01/01/2020;GENERICO;1{product};01/01/2030;25351;{class};{company};{status};{ingredient}")
}

/// Raw dataset encoded as Latin-1, the way the regulator publishes it
fn write_raw_dataset(dir: &std::path::Path) -> std::path::PathBuf {
    let mut lines = vec![HEADER.to_string()];
    for i in 0..12 {
        lines.push(line(&format!("PARACETAMOL {i}"), "ANALGESICOS", "EMS", "VÁLIDO", "PARACETAMOL"));
    }
    for i in 0..6 {
        lines.push(line(&format!("AMOXIL {}", i % 3), "ANTIBIOTICOS", "GSK", "VÁLIDO", "AMOXICILINA"));
    }
    lines.push(line("LOSARTANA A", "ANTI-HIPERTENSIVOS hipertensao", "MEDLEY", "VÁLIDO", "LOSARTANA POTÁSSICA"));
    lines.push(line("LOSARTANA B", "", "EUROFARMA", "VÁLIDO", "LOSARTANA  POTASSICA"));
    lines.push(line("CANCELADO", "ANALGESICOS", "X", "CANCELADO", "DIPIRONA"));
    lines.push(line("SEM PRINCIPIO", "ANALGESICOS", "X", "VÁLIDO", ""));
    lines.push("MEDICAMENTO;QUEBRADO;a;b;c;d;e;f;g;h;i;j;k;l".to_string());

    let text = lines.join("\n") + "\n";
    let latin1: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();

    let path = dir.join("DADOS_ABERTOS_MEDICAMENTOS.csv");
    std::fs::File::create(&path).unwrap().write_all(&latin1).unwrap();
    path
}

fn build_service(dir: &std::path::Path) -> RetrievalService {
    let raw = write_raw_dataset(dir);
    let rows = read_raw_records(&raw, &IngestConfig::default()).unwrap();
    let corpus = dir.join("anvisa_medicamentos.csv");
    write_corpus(&corpus, &aggregate(&rows)).unwrap();

    let service = RetrievalService::new(Arc::new(HashEmbedder::default()), ServiceConfig::default());
    service.load_corpus(&corpus).unwrap();
    service
}

#[test]
fn test_ingest_and_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw_dataset(dir.path());
    let rows = read_raw_records(&raw, &IngestConfig::default()).unwrap();

    // malformed line skipped at parse time
    assert_eq!(rows.len(), 22);

    let records = aggregate(&rows);
    let names: Vec<&str> = records.iter().map(|r| r.display_name.as_str()).collect();
    assert_eq!(names, vec!["Paracetamol", "Amoxicilina", "Losartana Potassica"]);

    let total: usize = records.iter().map(|r| r.product_count).sum();
    assert_eq!(total, 20);

    assert_eq!(records[0].popularity_tier, Tier::High);
    assert_eq!(records[0].formulation_diversity, Tier::High);
    assert_eq!(records[1].popularity_tier, Tier::Medium);
    assert_eq!(records[1].formulation_diversity, Tier::Medium);
    assert_eq!(records[2].popularity_tier, Tier::Low);
    assert_eq!(records[2].category, Category::Cardiovascular);
    assert_eq!(records[2].example_companies, vec!["MEDLEY", "EUROFARMA"]);
}

#[test]
fn test_wrong_encoding_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_raw_dataset(dir.path());
    let config = IngestConfig {
        encoding: SourceEncoding::Utf8,
        ..IngestConfig::default()
    };
    assert!(matches!(read_raw_records(&raw, &config), Err(Error::Ingestion(_))));
}

#[test]
fn test_search_over_built_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let service = build_service(dir.path());

    let results = service.search_medications("antibiotico para infeccao", 2).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].medication.display_name, "Amoxicilina");
    assert!(results[0].distance <= results[1].distance);
    assert!(results[0].similarity > 0.0 && results[0].similarity <= 1.0);
}

#[test]
fn test_details_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let service = build_service(dir.path());

    let details = service.get_details("paracet").unwrap().unwrap();
    assert_eq!(details.display_name, "Paracetamol");
    assert_eq!(details.product_count, 12);
    assert_eq!(details.summary_text, "Paracetamol - Analgesico");

    assert!(service.get_details("dipirona").unwrap().is_none());
}

#[test]
fn test_rebuild_is_deterministic() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let a = build_service(dir_a.path());
    let b = build_service(dir_b.path());

    assert_eq!(a.status().fingerprint, b.status().fingerprint);
    for query in ["dor de cabeca", "pressao alta", "infeccao bacteriana"] {
        assert_eq!(
            a.search_medications(query, 3).unwrap(),
            b.search_medications(query, 3).unwrap()
        );
    }
}

#[test]
fn test_concurrent_queries_during_swap() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(build_service(dir.path()));
    let records = service.snapshot().unwrap().records().to_vec();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let hits = service.search_medications("analgesico para dor", 3).unwrap();
                    assert_eq!(hits.len(), 3);
                }
            })
        })
        .collect();

    for _ in 0..10 {
        service.rebuild(records.clone()).unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(service.status().records, 3);
}
