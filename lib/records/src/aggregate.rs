//! Grouping of raw filing rows into one record per active ingredient

use crate::category::{categorize, Category};
use crate::corpus;
use crate::medication::{AggregatedMedication, RawRecord, Tier, EXAMPLE_LIMIT};
use crate::normalize::{normalize, title_case};
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// Status fragments marking a registration as in force. Matched against the
/// accent-stripped, lower-cased status.
pub const ACTIVE_STATUS_MARKERS: &[&str] = &["valid", "active", "ativo"];

/// Whether a row takes part in aggregation. The ingredient must survive
/// normalization, so rows like `"***"` are filtered here.
pub fn is_active_registration(row: &RawRecord) -> bool {
    let has_ingredient = row
        .active_ingredient
        .as_deref()
        .is_some_and(|s| !ingredient_key(s).is_empty());

    let status = normalize(row.registration_status.as_deref().unwrap_or_default()).to_lowercase();

    has_ingredient && ACTIVE_STATUS_MARKERS.iter().any(|m| status.contains(m))
}

/// Grouping key for a raw ingredient name. Case is preserved, so
/// `"PARACETAMOL"` and `"paracetamol"` form separate groups.
pub fn ingredient_key(raw: &str) -> String {
    normalize(raw)
}

/// Distinct values in first-seen order
#[derive(Default)]
struct FirstSeen {
    seen: AHashSet<String>,
    values: Vec<String>,
}

impl FirstSeen {
    fn push(&mut self, value: Option<&str>) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        if self.seen.insert(value.to_string()) {
            self.values.push(value.to_string());
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn head(&self) -> Vec<String> {
        self.values.iter().take(EXAMPLE_LIMIT).cloned().collect()
    }
}

struct Group {
    key: String,
    source_ingredient: String,
    therapeutic_class: Option<String>,
    category: Category,
    rows: usize,
    products: FirstSeen,
    companies: FirstSeen,
}

impl Group {
    fn into_record(self) -> AggregatedMedication {
        let mut record = AggregatedMedication {
            display_name: title_case(&normalize(&self.source_ingredient)),
            ingredient_key: self.key,
            source_ingredient: self.source_ingredient,
            therapeutic_class: self.therapeutic_class,
            category: self.category,
            product_count: self.rows,
            example_products: self.products.head(),
            example_companies: self.companies.head(),
            popularity_tier: Tier::popularity(self.rows),
            formulation_diversity: Tier::diversity(self.products.len()),
            search_text: String::new(),
            summary_text: String::new(),
        };
        record.search_text = corpus::search_text(&record);
        record.summary_text = corpus::summary_text(&record);
        record
    }
}

/// Aggregate raw rows into one record per normalized active ingredient.
///
/// Rows failing [`is_active_registration`] are dropped. Groups come out in the
/// order their first row appeared, and the class of that first row decides
/// the group's category.
pub fn aggregate<'a, I>(rows: I) -> Vec<AggregatedMedication>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut positions: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut total = 0usize;
    let mut kept = 0usize;

    for row in rows {
        total += 1;
        if !is_active_registration(row) {
            continue;
        }

        let raw_ingredient = row.active_ingredient.as_deref().unwrap_or_default();
        let key = ingredient_key(raw_ingredient);
        kept += 1;

        let position = *positions.entry(key.clone()).or_insert_with(|| {
            let class = row
                .therapeutic_class
                .clone()
                .filter(|c| !c.trim().is_empty());
            groups.push(Group {
                category: categorize(class.as_deref()),
                key,
                source_ingredient: raw_ingredient.trim().to_string(),
                therapeutic_class: class,
                rows: 0,
                products: FirstSeen::default(),
                companies: FirstSeen::default(),
            });
            groups.len() - 1
        });

        let group = &mut groups[position];
        group.rows += 1;
        group.products.push(row.product_name.as_deref());
        group.companies.push(row.company.as_deref());
    }

    debug!(
        total,
        kept,
        dropped = total - kept,
        groups = groups.len(),
        "aggregated raw rows"
    );

    groups.into_iter().map(Group::into_record).collect()
}
