//! Summaries computed over a filtered record set.

use crate::{record::Record, value::FieldValue};
use std::mem::Discriminant;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Count, sum and maximum of a numeric field.
///
/// An empty set, or a set with no numeric values for the field, reports
/// `sum = 0` and `max = 0` rather than `NaN` or negative infinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    /// Number of records in the set
    pub count: usize,
    /// Sum of the numeric values of the summary field
    pub sum: f64,
    /// Largest numeric value of the summary field
    pub max: f64,
}

/// Summarise `records`. Without a `field`, only `count` is populated.
///
/// Records whose field is missing or non-numeric are counted but contribute
/// nothing to `sum` or `max`.
pub fn summarize<'a, I>(records: I, field: Option<&str>) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut count = 0;
    let mut sum = 0.0;
    let mut max: Option<f64> = None;

    for record in records {
        count += 1;
        if let Some(value) = field.and_then(|field| record.number(field)) {
            sum += value;
            max = Some(max.map_or(value, |current| current.max(value)));
        }
    }

    Summary {
        count,
        sum,
        max: max.unwrap_or(0.0),
    }
}

/// Descriptive statistics of a numeric field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    /// Number of distinct values
    pub unique: usize,
}

/// Statistics over the numeric values of `field`, or `None` if there are none.
///
/// Percentiles take the value at index `floor(n * q)` of the sorted values.
pub fn field_statistics<'a, I>(records: I, field: &str) -> Option<FieldStatistics>
where
    I: IntoIterator<Item = &'a Record>,
{
    let values: Vec<f64> = records
        .into_iter()
        .filter_map(|record| record.number(field))
        .sorted_by(f64::total_cmp)
        .collect();

    let count = values.len();
    let (&min, &max) = (values.first()?, values.last()?);

    let percentile = |q: f64| values[((count as f64 * q) as usize).min(count - 1)];
    let median = if count % 2 == 1 {
        values[count / 2]
    } else {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    };

    Some(FieldStatistics {
        count,
        min,
        max,
        mean: values.iter().sum::<f64>() / count as f64,
        median,
        p25: percentile(0.25),
        p75: percentile(0.75),
        p90: percentile(0.90),
        p95: percentile(0.95),
        unique: values.iter().dedup().count(),
    })
}

/// Occurrence counts of a field's values.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Facet {
    pub field: SmolStr,
    /// Most frequent first; ties keep first appearance
    pub counts: Vec<FacetCount>,
}

/// One distinct value of a faceted field and how often it occurs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FacetCount {
    pub value: FieldValue,
    pub count: usize,
}

impl Facet {
    /// Occurrences of `value`. The number `1` and the text `"1"` are distinct values.
    pub fn count_of(&self, value: impl Into<FieldValue>) -> usize {
        let value = value.into();
        self.counts
            .iter()
            .find(|bucket| bucket.value.matches(&value))
            .map_or(0, |bucket| bucket.count)
    }
}

/// Count the values of `field` across `records`. Missing values are not counted.
///
/// Values are grouped by type as well as display form, so a numeric `1` and a
/// textual `"1"` land in separate buckets.
pub fn facet<'a, I>(records: I, field: impl Into<SmolStr>) -> Facet
where
    I: IntoIterator<Item = &'a Record>,
{
    let field = field.into();
    let mut buckets: IndexMap<(Discriminant<FieldValue>, String), FacetCount> = IndexMap::new();

    for value in records.into_iter().filter_map(|record| record.get(&field)) {
        buckets
            .entry(facet_key(value))
            .or_insert_with(|| FacetCount {
                value: value.clone(),
                count: 0,
            })
            .count += 1;
    }

    let counts = buckets
        .into_values()
        .sorted_by(|a, b| b.count.cmp(&a.count))
        .collect();

    Facet { field, counts }
}

fn facet_key(value: &FieldValue) -> (Discriminant<FieldValue>, String) {
    let display = match value {
        // -0.0 and 0.0 are the same value
        FieldValue::Number(number) if *number == 0.0 => "0".to_string(),
        other => other.to_string(),
    };
    (std::mem::discriminant(value), display)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roi(values: &[f64]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Record::new(i.to_string()).with("roi", *v))
            .collect()
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = summarize(&Vec::new(), Some("roi"));
        assert_eq!(summary, Summary { count: 0, sum: 0.0, max: 0.0 });
    }

    #[test]
    fn test_summary_skips_malformed() {
        let mut records = roi(&[1.0, 2.0]);
        records.push(Record::new("x").with("roi", "n/a"));
        records.push(Record::new("y"));

        let summary = summarize(&records, Some("roi"));
        assert_eq!(summary, Summary { count: 4, sum: 3.0, max: 2.0 });
    }

    #[test]
    fn test_summary_max_of_negatives() {
        let summary = summarize(&roi(&[-3.0, -1.5]), Some("roi"));
        assert_eq!(summary.max, -1.5);
        assert_eq!(summary.sum, -4.5);
    }

    #[test]
    fn test_summary_without_field() {
        let summary = summarize(&roi(&[4.0, 5.0]), None);
        assert_eq!(summary, Summary { count: 2, sum: 0.0, max: 0.0 });
    }

    #[test]
    fn test_field_statistics() {
        let stats = field_statistics(&roi(&[4.0, 1.0, 3.0, 2.0, 2.0]), "roi").unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.4);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.p25, 2.0);
        assert_eq!(stats.p95, 4.0);
        assert_eq!(stats.unique, 4);

        let even = field_statistics(&roi(&[1.0, 2.0, 3.0, 4.0]), "roi").unwrap();
        assert_eq!(even.median, 2.5);

        assert!(field_statistics(&Vec::new(), "roi").is_none());
    }

    #[test]
    fn test_facet_counts() {
        let records: Vec<Record> = ["MLB", "NFL", "NBA", "NFL", "MLB", "NHL"]
            .iter()
            .enumerate()
            .map(|(i, sport)| Record::new(i.to_string()).with("sport", *sport))
            .chain(std::iter::once(Record::new("no-sport")))
            .collect();

        let facet = facet(&records, "sport");
        assert_eq!(
            facet
                .counts
                .iter()
                .map(|bucket| (bucket.value.to_string(), bucket.count))
                .collect::<Vec<_>>(),
            vec![
                ("MLB".to_string(), 2),
                ("NFL".to_string(), 2),
                ("NBA".to_string(), 1),
                ("NHL".to_string(), 1)
            ]
        );
        assert_eq!(facet.count_of("NFL"), 2);
        assert_eq!(facet.count_of("EPL"), 0);
    }

    #[test]
    fn test_facet_keeps_types_apart() {
        let records = vec![
            Record::new("a").with("line", 1.0),
            Record::new("b").with("line", "1"),
            Record::new("c").with("line", 1.0),
            Record::new("d").with("line", true),
            Record::new("e").with("line", "true"),
            Record::new("f").with("line", -0.0),
            Record::new("g").with("line", 0.0),
        ];

        let facet = facet(&records, "line");
        assert_eq!(facet.counts.len(), 5);
        assert_eq!(facet.count_of(1.0), 2);
        assert_eq!(facet.count_of("1"), 1);
        assert_eq!(facet.count_of(true), 1);
        assert_eq!(facet.count_of("true"), 1);
        assert_eq!(facet.count_of(0.0), 2);
        assert_eq!(facet.counts[0].value, FieldValue::Number(1.0));
    }
}
