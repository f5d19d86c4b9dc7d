//! Category and free-text filtering over an immutable snapshot of events

use peek_domain::constants::ALL_CATEGORIES;
use peek_domain::EventRecord;

/// Category plus search text, as chosen on the listing screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    /// `"All"` (exact, case-sensitive) or a category compared case-insensitively
    pub category: String,
    /// Matched case-insensitively against title, description and location
    pub search_text: String,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self { category: ALL_CATEGORIES.to_string(), search_text: String::new() }
    }
}

impl EventFilter {
    /// Filter on `category` and `search_text` as entered.
    pub fn new(category: impl Into<String>, search_text: impl Into<String>) -> Self {
        Self { category: category.into(), search_text: search_text.into() }
    }

    /// Whether `record` passes both the category and the search predicate.
    pub fn matches(&self, record: &EventRecord) -> bool {
        self.matches_query(record, &self.query())
    }

    /// Records passing the filter, in input order.
    pub fn apply(&self, records: &[EventRecord]) -> Vec<EventRecord> {
        let query = self.query();
        records.iter().filter(|record| self.matches_query(record, &query)).cloned().collect()
    }

    fn query(&self) -> String {
        self.search_text.trim().to_lowercase()
    }

    fn matches_query(&self, record: &EventRecord, query: &str) -> bool {
        self.matches_category(record) && matches_text(record, query)
    }

    fn matches_category(&self, record: &EventRecord) -> bool {
        self.category == ALL_CATEGORIES
            || record.category.to_lowercase() == self.category.to_lowercase()
    }
}

fn matches_text(record: &EventRecord, query: &str) -> bool {
    query.is_empty()
        || [&record.title, &record.description, &record.location]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
}

/// Filter `records` by `category` and `search_text`; see [`EventFilter`].
pub fn filter_events(records: &[EventRecord], category: &str, search_text: &str) -> Vec<EventRecord> {
    EventFilter::new(category, search_text).apply(records)
}
