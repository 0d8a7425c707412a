// src/health/collection.rs
use serde::{Deserialize, Serialize};

use super::{Health, Status};

/// Ordered, append-only collection of health check outcomes for one
/// evaluation pass.
///
/// `append` consumes the receiver and returns the grown collection; entries
/// keep insertion order and are never reordered or removed. The JSON
/// projection is a plain array of `{title, message, status}` objects,
/// shared by the CLI subprocess pipe and the web endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthCollection {
    entries: Vec<Health>,
}

impl HealthCollection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn append(mut self, health: Health) -> Self {
        self.entries.push(health);
        self
    }

    /// True iff any entry carries `Status::Error`. WARNING, UNKNOWN and
    /// NOT_RUN never count as errors.
    pub fn has_error(&self) -> bool {
        self.entries
            .iter()
            .any(|health| health.status == Status::Error)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Health> {
        self.entries.iter()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a HealthCollection {
    type Item = &'a Health;
    type IntoIter = std::slice::Iter<'a, Health>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Health> for HealthCollection {
    fn from_iter<T: IntoIterator<Item = Health>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_collection_has_no_error() {
        assert!(!HealthCollection::empty().has_error());
    }

    #[test]
    fn only_error_status_counts_as_error() {
        let benign = HealthCollection::empty()
            .append(Health::new("a", "", Status::Ok))
            .append(Health::new("b", "", Status::Warning))
            .append(Health::new("c", "", Status::Unknown))
            .append(Health::new("d", "", Status::NotRun));
        assert!(!benign.has_error());

        let failing = benign.append(Health::new("e", "", Status::Error));
        assert!(failing.has_error());
    }

    #[test]
    fn append_preserves_insertion_order() {
        let collection = HealthCollection::empty()
            .append(Health::new("first", "", Status::Ok))
            .append(Health::new("second", "", Status::Warning))
            .append(Health::new("third", "", Status::Ok));

        let titles: Vec<&str> = collection.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn append_leaves_snapshots_untouched() {
        let snapshot = HealthCollection::empty().append(Health::new("a", "", Status::Ok));
        let grown = snapshot.clone().append(Health::new("b", "", Status::Error));

        assert_eq!(snapshot.len(), 1);
        assert!(!snapshot.has_error());
        assert_eq!(grown.len(), 2);
        assert!(grown.has_error());
    }

    #[test]
    fn json_serialization_is_an_ordered_array() {
        let collection = HealthCollection::empty()
            .append(Health::new("Database", "Connection up.", Status::Ok))
            .append(Health::new("Migrations", "", Status::NotRun));

        assert_eq!(
            collection.to_json().unwrap(),
            r#"[{"title":"Database","message":"Connection up.","status":"OK"},{"title":"Migrations","message":"","status":"NOT_RUN"}]"#
        );
    }

    #[test]
    fn json_round_trip_preserves_entries() {
        let collection = HealthCollection::empty()
            .append(Health::new("a", "all good", Status::Ok))
            .append(Health::new("b", "could not connect", Status::Error))
            .append(Health::new("c", "", Status::NotRun));

        let parsed = HealthCollection::from_json_str(&collection.to_json().unwrap()).unwrap();
        assert_eq!(parsed, collection);
    }

    fn arb_status() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::Ok),
            Just(Status::Error),
            Just(Status::Warning),
            Just(Status::Unknown),
            Just(Status::NotRun),
        ]
    }

    proptest! {
        #[test]
        fn has_error_iff_some_entry_is_error(statuses in prop::collection::vec(arb_status(), 0..16)) {
            let collection: HealthCollection = statuses
                .iter()
                .enumerate()
                .map(|(i, status)| Health::new(format!("check-{i}"), "", *status))
                .collect();

            prop_assert_eq!(
                collection.has_error(),
                statuses.contains(&Status::Error)
            );
        }

        #[test]
        fn round_trip_keeps_order_and_tuples(statuses in prop::collection::vec(arb_status(), 0..16)) {
            let collection: HealthCollection = statuses
                .iter()
                .enumerate()
                .map(|(i, status)| Health::new(format!("t{i}"), format!("m{i}"), *status))
                .collect();

            let parsed = HealthCollection::from_json_str(&collection.to_json().unwrap()).unwrap();
            prop_assert_eq!(parsed, collection);
        }
    }
}
