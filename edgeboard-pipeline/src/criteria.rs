//! Filter criteria: per-field bounds, set membership and free-text search.

use crate::{error::PipelineError, record::Record, value::FieldValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::trace;

/// Constraint applied to a single record field.
///
/// Every present part must hold; there is no OR between parts or fields.
/// `min`/`max` are closed, so `min: 2.0` keeps a value of exactly `2.0`, while
/// `gt`/`lt` are open and drop it. A record that lacks the field fails the
/// constraint, and so does a non-numeric value tested against a bound.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConstraint {
    /// Inclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Exclusive lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    /// Exclusive upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    /// Acceptable values; an empty set accepts nothing
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<FieldValue>>,
    /// Rejected values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_in: Option<Vec<FieldValue>>,
    /// Case-insensitive substring of the value's display form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    /// Case-insensitive prefix of the value's display form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    /// Case-insensitive suffix of the value's display form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_with: Option<String>,
}

impl FieldConstraint {
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            ..Default::default()
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            max: Some(max),
            ..Default::default()
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Default::default()
        }
    }

    pub fn above(gt: f64) -> Self {
        Self {
            gt: Some(gt),
            ..Default::default()
        }
    }

    pub fn below(lt: f64) -> Self {
        Self {
            lt: Some(lt),
            ..Default::default()
        }
    }

    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self {
            one_of: Some(values.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn none_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self {
            not_in: Some(values.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn containing(needle: impl Into<String>) -> Self {
        Self {
            contains: Some(needle.into()),
            ..Default::default()
        }
    }

    pub fn starting_with(prefix: impl Into<String>) -> Self {
        Self {
            starts_with: Some(prefix.into()),
            ..Default::default()
        }
    }

    pub fn ending_with(suffix: impl Into<String>) -> Self {
        Self {
            ends_with: Some(suffix.into()),
            ..Default::default()
        }
    }

    fn has_bound(&self) -> bool {
        self.min.is_some() || self.max.is_some() || self.gt.is_some() || self.lt.is_some()
    }

    /// Check a field value against this constraint.
    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        let Some(value) = value else {
            return false;
        };

        if self.has_bound() {
            let Some(number) = value.as_number() else {
                trace!(%value, "Non-numeric value excluded by bound");
                return false;
            };
            if self.min.is_some_and(|min| number < min) {
                return false;
            }
            if self.max.is_some_and(|max| number > max) {
                return false;
            }
            if self.gt.is_some_and(|gt| number <= gt) {
                return false;
            }
            if self.lt.is_some_and(|lt| number >= lt) {
                return false;
            }
        }

        if let Some(accepted) = &self.one_of {
            if !accepted.iter().any(|candidate| value.matches(candidate)) {
                return false;
            }
        }

        if let Some(rejected) = &self.not_in {
            if rejected.iter().any(|candidate| value.matches(candidate)) {
                return false;
            }
        }

        if let Some(needle) = &self.contains {
            if !contains_ignore_case(&value.to_string(), needle) {
                return false;
            }
        }

        if let Some(prefix) = &self.starts_with {
            if !value.to_string().to_lowercase().starts_with(&prefix.to_lowercase()) {
                return false;
            }
        }

        if let Some(suffix) = &self.ends_with {
            if !value.to_string().to_lowercase().ends_with(&suffix.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Tightest lower and upper bound, each paired with whether it is exclusive.
    fn effective_range(&self) -> (Option<(f64, bool)>, Option<(f64, bool)>) {
        let lower = tighter(self.min.map(|v| (v, false)), self.gt.map(|v| (v, true)), |a, b| a > b);
        let upper = tighter(self.max.map(|v| (v, false)), self.lt.map(|v| (v, true)), |a, b| a < b);
        (lower, upper)
    }

    fn validate(&self, field: &SmolStr) -> Result<(), PipelineError> {
        if [self.min, self.max, self.gt, self.lt]
            .into_iter()
            .flatten()
            .any(f64::is_nan)
        {
            return Err(PipelineError::NanBound(field.clone()));
        }
        match self.effective_range() {
            (Some((min, min_open)), Some((max, max_open)))
                if min > max || (min == max && (min_open || max_open)) =>
            {
                Err(PipelineError::InvalidBounds {
                    field: field.clone(),
                    min,
                    max,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Field name to constraint mapping. Fields absent from the map are unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Criteria(IndexMap<SmolStr, FieldConstraint>);

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style constraint insertion. Replaces any existing constraint on `field`.
    pub fn with(mut self, field: impl Into<SmolStr>, constraint: FieldConstraint) -> Self {
        self.insert(field, constraint);
        self
    }

    pub fn insert(&mut self, field: impl Into<SmolStr>, constraint: FieldConstraint) {
        self.0.insert(field.into(), constraint);
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldConstraint> {
        self.0.shift_remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldConstraint> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &FieldConstraint)> {
        self.0.iter()
    }

    /// Logical AND of every constraint against `record`.
    pub fn matches(&self, record: &Record) -> bool {
        self.0
            .iter()
            .all(|(field, constraint)| constraint.matches(record.get(field)))
    }

    /// Reject empty field names, `NaN` bounds and inverted ranges.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.0.iter().try_for_each(|(field, constraint)| {
            if field.is_empty() {
                return Err(PipelineError::EmptyField("criteria"));
            }
            constraint.validate(field)
        })
    }
}

impl<K> FromIterator<(K, FieldConstraint)> for Criteria
where
    K: Into<SmolStr>,
{
    fn from_iter<T: IntoIterator<Item = (K, FieldConstraint)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Case-insensitive free-text search across record fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TextSearch {
    /// Text to look for
    pub text: String,
    /// Fields to search; empty means every field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SmolStr>,
}

impl TextSearch {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: Vec::new(),
        }
    }

    pub fn in_fields<I, F>(text: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SmolStr>,
    {
        Self {
            text: text.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty search text matches every record.
    pub fn matches(&self, record: &Record) -> bool {
        if self.text.is_empty() {
            return true;
        }

        if self.fields.is_empty() {
            return record
                .fields()
                .any(|(_, value)| contains_ignore_case(&value.to_string(), &self.text));
        }

        self.fields.iter().any(|field| {
            record
                .get(field)
                .is_some_and(|value| contains_ignore_case(&value.to_string(), &self.text))
        })
    }
}

/// Pick the stricter of two bounds. On a tie the exclusive one wins.
fn tighter(
    inclusive: Option<(f64, bool)>,
    exclusive: Option<(f64, bool)>,
    stricter: impl Fn(f64, f64) -> bool,
) -> Option<(f64, bool)> {
    match (inclusive, exclusive) {
        (Some(a), Some(b)) => Some(if stricter(a.0, b.0) { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opportunity(roi: f64, sport: &str) -> Record {
        Record::new(format!("{sport}-{roi}"))
            .with("roi", roi)
            .with("sport", sport)
    }

    #[test]
    fn test_bounds_are_closed() {
        let constraint = FieldConstraint::between(2.0, 3.0);
        assert!(constraint.matches(Some(&FieldValue::from(2.0))));
        assert!(constraint.matches(Some(&FieldValue::from(3.0))));
        assert!(!constraint.matches(Some(&FieldValue::from(1.999))));
        assert!(!constraint.matches(Some(&FieldValue::from(3.001))));
    }

    #[test]
    fn test_exclusive_bounds_drop_the_boundary() {
        let roi = |records: &[f64], constraint: &FieldConstraint| -> Vec<f64> {
            records
                .iter()
                .copied()
                .filter(|roi| constraint.matches(Some(&FieldValue::from(*roi))))
                .collect()
        };
        let values = [1.0, 2.0, 3.0];

        assert_eq!(roi(&values[..], &FieldConstraint::above(2.0)), vec![3.0]);
        assert_eq!(roi(&values[..], &FieldConstraint::at_least(2.0)), vec![2.0, 3.0]);
        assert_eq!(roi(&values[..], &FieldConstraint::below(2.0)), vec![1.0]);
        assert_eq!(roi(&values[..], &FieldConstraint::at_most(2.0)), vec![1.0, 2.0]);

        let open = FieldConstraint {
            gt: Some(1.0),
            lt: Some(3.0),
            ..Default::default()
        };
        assert_eq!(roi(&values[..], &open), vec![2.0]);
        assert!(!FieldConstraint::above(0.0).matches(Some(&FieldValue::from("high"))));
    }

    #[test]
    fn test_prefix_and_suffix_ignore_case() {
        let event = FieldValue::from("Yankees @ Red Sox");
        assert!(FieldConstraint::starting_with("yank").matches(Some(&event)));
        assert!(FieldConstraint::ending_with("RED SOX").matches(Some(&event)));
        assert!(!FieldConstraint::starting_with("red").matches(Some(&event)));
        assert!(!FieldConstraint::ending_with("yankees").matches(Some(&event)));
        assert!(FieldConstraint::starting_with("").matches(Some(&event)));
        assert!(FieldConstraint::starting_with("1.").matches(Some(&FieldValue::from(1.5))));
    }

    #[test]
    fn test_missing_field_fails_every_constraint() {
        assert!(!FieldConstraint::default().matches(None));
        assert!(!FieldConstraint::none_of(["NFL"]).matches(None));
        assert!(!FieldConstraint::at_least(0.0).matches(None));
    }

    #[test]
    fn test_non_numeric_value_fails_bound() {
        assert!(!FieldConstraint::at_least(0.0).matches(Some(&FieldValue::from("high"))));
        assert!(!FieldConstraint::at_most(10.0).matches(Some(&FieldValue::Number(f64::NAN))));
    }

    #[test]
    fn test_empty_set_accepts_nothing() {
        let constraint = FieldConstraint::one_of(Vec::<FieldValue>::new());
        assert!(!constraint.matches(Some(&FieldValue::from("MLB"))));
    }

    #[test]
    fn test_not_in_and_contains() {
        let constraint = FieldConstraint {
            not_in: Some(vec![FieldValue::from("NFL")]),
            contains: Some("b".into()),
            ..Default::default()
        };
        assert!(constraint.matches(Some(&FieldValue::from("MLB"))));
        assert!(constraint.matches(Some(&FieldValue::from("NBA"))));
        assert!(!constraint.matches(Some(&FieldValue::from("NFL"))));
        assert!(!constraint.matches(Some(&FieldValue::from("NHL"))));
    }

    #[test]
    fn test_criteria_is_logical_and() {
        let criteria = Criteria::new()
            .with("roi", FieldConstraint::at_least(2.0))
            .with("sport", FieldConstraint::one_of(["MLB"]));

        assert!(criteria.matches(&opportunity(2.0, "MLB")));
        assert!(!criteria.matches(&opportunity(2.0, "NFL")));
        assert!(!criteria.matches(&opportunity(1.0, "MLB")));
        assert!(Criteria::new().matches(&opportunity(-5.0, "NHL")));
    }

    #[test]
    fn test_criteria_json_shape() {
        let criteria: Criteria =
            serde_json::from_str(r#"{"roi":{"min":2},"sport":{"in":["MLB","NBA"]}}"#).unwrap();

        assert_eq!(criteria.get("roi"), Some(&FieldConstraint::at_least(2.0)));
        assert_eq!(criteria.get("sport"), Some(&FieldConstraint::one_of(["MLB", "NBA"])));
        assert!(serde_json::from_str::<Criteria>(r#"{"roi":{"minimum":2}}"#).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Criteria::new().with("roi", FieldConstraint::between(1.0, 2.0)).validate().is_ok());
        assert!(matches!(
            Criteria::new().with("roi", FieldConstraint::between(3.0, 2.0)).validate(),
            Err(PipelineError::InvalidBounds { .. })
        ));
        assert!(matches!(
            Criteria::new().with("roi", FieldConstraint::at_least(f64::NAN)).validate(),
            Err(PipelineError::NanBound(_))
        ));
        assert!(matches!(
            Criteria::new().with("roi", FieldConstraint::below(f64::NAN)).validate(),
            Err(PipelineError::NanBound(_))
        ));
        assert!(matches!(
            Criteria::new().with("", FieldConstraint::at_least(1.0)).validate(),
            Err(PipelineError::EmptyField(_))
        ));
    }

    #[test]
    fn test_validate_exclusive_ranges() {
        let range = |min, max, gt, lt| FieldConstraint {
            min,
            max,
            gt,
            lt,
            ..Default::default()
        };
        let check = |constraint| Criteria::new().with("roi", constraint).validate();

        // [2, 2] holds exactly one value; (2, 2], [2, 2) and (2, 2) hold none
        assert!(check(range(Some(2.0), Some(2.0), None, None)).is_ok());
        assert!(check(range(None, Some(2.0), Some(2.0), None)).is_err());
        assert!(check(range(Some(2.0), None, None, Some(2.0))).is_err());
        assert!(check(range(None, None, Some(2.0), Some(2.0))).is_err());
        assert!(check(range(None, None, Some(1.0), Some(3.0))).is_ok());

        // The tighter of min and gt decides
        assert!(matches!(
            check(range(Some(1.0), Some(4.0), Some(5.0), None)),
            Err(PipelineError::InvalidBounds { min, max, .. }) if min == 5.0 && max == 4.0
        ));
    }

    #[test]
    fn test_operator_json_shape() {
        let criteria: Criteria = serde_json::from_str(
            r#"{"roi":{"gt":1,"lt":5},"event":{"starts_with":"yan","ends_with":"sox"}}"#,
        )
        .unwrap();

        let roi = criteria.get("roi").unwrap();
        assert_eq!((roi.gt, roi.lt), (Some(1.0), Some(5.0)));
        let event = criteria.get("event").unwrap();
        assert_eq!(event.starts_with.as_deref(), Some("yan"));
        assert_eq!(event.ends_with.as_deref(), Some("sox"));
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_text_search() {
        let record = Record::new("p1")
            .with("player_name", "Shohei Ohtani")
            .with("team", "LAD")
            .with("line", 1.5);

        assert!(TextSearch::new("ohtani").matches(&record));
        assert!(TextSearch::new("1.5").matches(&record));
        assert!(TextSearch::in_fields("lad", ["team"]).matches(&record));
        assert!(!TextSearch::in_fields("lad", ["player_name"]).matches(&record));
        assert!(TextSearch::new("").matches(&record));
    }
}
