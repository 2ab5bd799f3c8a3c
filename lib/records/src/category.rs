//! Therapeutic categories
//!
//! A raw therapeutic class is mapped to a [`Category`] by lower-casing it and
//! testing it against an ordered keyword table. The first category with any
//! keyword contained in the class wins, so a class matching two rows always
//! resolves to the earlier one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Antibiotico")]
    Antibiotic,
    #[serde(rename = "Analgesico")]
    Analgesic,
    #[serde(rename = "Cardiovascular")]
    Cardiovascular,
    #[serde(rename = "Sistema Nervoso")]
    NervousSystem,
    #[serde(rename = "Gastrointestinal")]
    Gastrointestinal,
    #[serde(rename = "Respiratorio")]
    Respiratory,
    #[serde(rename = "Endocrino")]
    Endocrine,
    #[serde(rename = "Dermatologico")]
    Dermatologic,
    #[serde(rename = "Oftalmico")]
    Ophthalmic,
    #[serde(rename = "Vitaminas")]
    Vitamins,
    #[serde(rename = "Outros")]
    Other,
    #[serde(rename = "Não Classificado")]
    Unclassified,
}

/// Keyword table in match order. Order is significant.
const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (Category::Antibiotic, &["antibiotico", "antimicrobiano", "bactericida"]),
    (Category::Analgesic, &["analgesico", "dor", "anti-inflamatorio"]),
    (Category::Cardiovascular, &["cardiovascular", "cardiaco", "hipertensao", "pressao"]),
    (Category::NervousSystem, &["neurologico", "psiquiatrico", "antidepressivo", "ansiedade"]),
    (Category::Gastrointestinal, &["gastrico", "digestivo", "estomago", "intestinal"]),
    (Category::Respiratory, &["respiratorio", "pulmonar", "bronco", "asma"]),
    (Category::Endocrine, &["hormonio", "diabetes", "tiroide", "endocrino"]),
    (Category::Dermatologic, &["dermatologico", "pele", "topico"]),
    (Category::Ophthalmic, &["oftalmico", "ocular", "olho"]),
    (Category::Vitamins, &["vitamina", "suplemento", "mineral"]),
];

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Antibiotic,
        Category::Analgesic,
        Category::Cardiovascular,
        Category::NervousSystem,
        Category::Gastrointestinal,
        Category::Respiratory,
        Category::Endocrine,
        Category::Dermatologic,
        Category::Ophthalmic,
        Category::Vitamins,
        Category::Other,
        Category::Unclassified,
    ];

    /// Label used in the corpus file and in search text
    pub fn label(self) -> &'static str {
        match self {
            Category::Antibiotic => "Antibiotico",
            Category::Analgesic => "Analgesico",
            Category::Cardiovascular => "Cardiovascular",
            Category::NervousSystem => "Sistema Nervoso",
            Category::Gastrointestinal => "Gastrointestinal",
            Category::Respiratory => "Respiratorio",
            Category::Endocrine => "Endocrino",
            Category::Dermatologic => "Dermatologico",
            Category::Ophthalmic => "Oftalmico",
            Category::Vitamins => "Vitaminas",
            Category::Other => "Outros",
            Category::Unclassified => "Não Classificado",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown therapeutic category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Parses a label, case-insensitively. `Nao Classificado` is accepted for
    /// files that lost the accent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .or_else(|| wanted.eq_ignore_ascii_case("Nao Classificado").then_some(Category::Unclassified))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Resolve a raw therapeutic class to its category.
pub fn categorize(raw_class: Option<&str>) -> Category {
    let class = match raw_class.map(str::trim) {
        Some(class) if !class.is_empty() => class.to_lowercase(),
        _ => return Category::Unclassified,
    };

    KEYWORD_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| class.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}
