//! Stable single-key ordering of records.

use crate::{record::Record, value::FieldValue};
use derive_more::Display;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;

/// Sort direction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, Deserialize, Serialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ascending")]
    #[display("asc")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    #[display("desc")]
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Field to order by plus direction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct SortKey {
    pub field: SmolStr,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<SmolStr>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<SmolStr>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<SmolStr>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Compare two records under this key.
    ///
    /// Records without a sortable value for the field lead in either direction;
    /// the direction only reverses the comparison between present values.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (self.value(a), self.value(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.direction.apply(a.sort_cmp(b)),
        }
    }

    fn value<'a>(&self, record: &'a Record) -> Option<&'a FieldValue> {
        record
            .get(&self.field)
            .filter(|value| value.is_sortable())
    }
}

/// Stable sort: records with equal keys keep their input order.
pub fn sort<'a, I>(records: I, key: &SortKey) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .sorted_by(|a, b| key.compare(a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_direction_serde() {
        let key: SortKey = serde_json::from_str(r#"{"field":"ev","direction":"desc"}"#).unwrap();
        assert_eq!(key, SortKey::descending("ev"));

        let key: SortKey = serde_json::from_str(r#"{"field":"ev"}"#).unwrap();
        assert_eq!(key.direction, SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.to_string(), "desc");
    }

    #[test]
    fn test_equal_keys_keep_input_order_in_both_directions() {
        let records = vec![
            Record::new("a").with("roi", 1.0),
            Record::new("b").with("roi", 2.0),
            Record::new("c").with("roi", 1.0),
            Record::new("d").with("roi", 2.0),
        ];

        let asc = sort(&records, &SortKey::ascending("roi"));
        assert_eq!(ids(&asc), vec!["a", "c", "b", "d"]);

        let desc = sort(&records, &SortKey::descending("roi"));
        assert_eq!(ids(&desc), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_signed_zeros_are_equal_keys() {
        let records = vec![
            Record::new("neg").with("ev", -0.0),
            Record::new("pos").with("ev", 0.0),
            Record::new("up").with("ev", 0.5),
        ];

        let desc = sort(&records, &SortKey::descending("ev"));
        assert_eq!(ids(&desc), vec!["up", "neg", "pos"]);

        let asc = sort(&records, &SortKey::ascending("ev"));
        assert_eq!(ids(&asc), vec!["neg", "pos", "up"]);
    }

    #[test]
    fn test_missing_values_lead() {
        let records = vec![
            Record::new("a").with("roi", 5.0),
            Record::new("b"),
            Record::new("c").with("roi", f64::NAN),
            Record::new("d").with("roi", 1.0),
        ];

        let asc = sort(&records, &SortKey::ascending("roi"));
        assert_eq!(ids(&asc), vec!["b", "c", "d", "a"]);

        let desc = sort(&records, &SortKey::descending("roi"));
        assert_eq!(ids(&desc), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_lexical_sort() {
        let records = vec![
            Record::new("1").with("sport", "nba"),
            Record::new("2").with("sport", "MLB"),
            Record::new("3").with("sport", "NFL"),
        ];

        let asc = sort(&records, &SortKey::ascending("sport"));
        assert_eq!(ids(&asc), vec!["2", "1", "3"]);
    }
}
