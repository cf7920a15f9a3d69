use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::FaqError;
use crate::search::{self, SearchResult};

/// A single question/answer pair (e.g. "Is there an RSS feed available?").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    /// Unique identifier, e.g. "technical-2"
    pub id: String,
    pub question: String,
    pub answer: String,
    /// Category tag shared by every record of a category, e.g. "technical"
    pub category: String,
}

/// An ordered group of FAQ records under a display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display title, e.g. "Content & Episodes"
    pub title: String,
    pub items: Vec<FaqRecord>,
}

impl Category {
    /// Category tag of the records in this group, taken from the first record.
    pub fn key(&self) -> Option<&str> {
        self.items.first().map(|item| item.category.as_str())
    }
}

/// A validated, immutable FAQ dataset.
///
/// Category and record order is preserved exactly as given; search results are
/// reported in that order.
#[derive(Debug, Clone)]
pub struct FaqCollection {
    categories: Vec<Category>,
    fingerprint: String,
}

impl FaqCollection {
    /// Validate `categories` and take ownership of them.
    ///
    /// Rejects empty category titles, empty record ids/questions/answers and ids
    /// that appear more than once anywhere in the dataset.
    pub fn new(categories: Vec<Category>) -> Result<Self, FaqError> {
        let mut seen: HashSet<&str> = HashSet::new();

        for (position, category) in categories.iter().enumerate() {
            if category.title.trim().is_empty() {
                return Err(FaqError::EmptyCategoryTitle { position });
            }

            for item in &category.items {
                let fields = [
                    ("id", &item.id),
                    ("question", &item.question),
                    ("answer", &item.answer),
                ];
                if let Some(&(field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
                    return Err(FaqError::EmptyField {
                        category: category.title.clone(),
                        id: item.id.clone(),
                        field,
                    });
                }
                if !seen.insert(item.id.as_str()) {
                    return Err(FaqError::DuplicateId(item.id.clone()));
                }
            }
        }

        let fingerprint = fingerprint(&categories)?;
        Ok(Self {
            categories,
            fingerprint,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Hex SHA-256 of the dataset's canonical JSON. Changes whenever any record does.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Total number of records across all categories.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record paired with its category, in dataset order.
    pub fn records(&self) -> impl Iterator<Item = (&Category, &FaqRecord)> {
        self.categories
            .iter()
            .flat_map(|category| category.items.iter().map(move |item| (category, item)))
    }

    /// Look up a record by id, ignoring ASCII case.
    pub fn get(&self, id: &str) -> Option<(&Category, &FaqRecord)> {
        self.records().find(|(_, item)| item.id.eq_ignore_ascii_case(id))
    }

    /// Look up a category by display title or record category tag, ignoring ASCII case.
    pub fn find_category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| {
            category.title.eq_ignore_ascii_case(name)
                || category.key().is_some_and(|key| key.eq_ignore_ascii_case(name))
        })
    }

    /// Search every record of this collection. See [`search::search`].
    pub fn search(&self, query: &str) -> Vec<SearchResult<'_>> {
        let results = search::search(query, &self.categories);
        debug!(query, results = results.len(), "faq search");
        results
    }
}

fn fingerprint(categories: &[Category]) -> Result<String, FaqError> {
    let canonical = serde_json::to_vec(categories)?;
    let hash = Sha256::digest(&canonical);
    Ok(format!("{:x}", hash))
}
