/// FAQ dataset parsing and the built-in podcast FAQ.
///
/// Dataset JSON is an array of `{ "title", "items": [{ "id", "question", "answer", "category" }] }`.
use crate::error::FaqError;
use crate::model::{Category, FaqCollection};

const DEFAULT_DATASET: &str = include_str!("../data/faq.json");

/// Parse dataset JSON into categories without validating them.
pub fn parse_categories(json: &str) -> Result<Vec<Category>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse and validate dataset JSON.
pub fn parse_collection(json: &str) -> Result<FaqCollection, FaqError> {
    FaqCollection::new(parse_categories(json)?)
}

/// The podcast FAQ compiled into the binary.
pub fn default_collection() -> FaqCollection {
    parse_collection(DEFAULT_DATASET).expect("embedded faq dataset is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_is_valid() {
        let collection = default_collection();
        assert_eq!(collection.categories().len(), 4);
        assert_eq!(collection.len(), 11);

        let titles: Vec<&str> = collection.categories().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["General", "Content & Episodes", "Participation", "Technical"]);
        for category in collection.categories() {
            let key = category.key().expect("non-empty category");
            assert!(category.items.iter().all(|item| item.category == key));
        }
    }

    #[test]
    fn embedded_dataset_answers_spec_scenarios() {
        let collection = default_collection();

        let results = collection.search("  rss feed ");
        let rss = results
            .iter()
            .find(|r| r.item.id == "technical-2")
            .expect("rss faq found");
        assert_eq!(rss.matches.len(), 2);
        assert_eq!(
            rss.matches[1].snippet.to_html(),
            "Yes, we provide an <mark>RSS</mark> <mark>feed</mark> for our podcast. You can find \
             the link in the footer of our website or in the podcast directory listings."
        );

        assert!(collection.search("xyznotfound").is_empty());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = parse_collection(r#"[{"title": "General", "items": [{"id": "x"}]}]"#).unwrap_err();
        assert!(matches!(err, FaqError::Json(_)));
    }
}
