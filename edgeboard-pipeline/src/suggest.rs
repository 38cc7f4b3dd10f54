//! Autocomplete suggestions drawn from a field's values.

use crate::record::Record;
use itertools::Itertools;

/// Autocomplete suggestions for a text field.
///
/// Returns up to `max` distinct text values of `field` containing `partial`
/// case-insensitively. Values that start with `partial` come first, then
/// shorter values, then alphabetical order.
pub fn suggest_completions<'a, I>(records: I, field: &str, partial: &str, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
{
    let partial = partial.to_lowercase();

    records
        .into_iter()
        .filter_map(|record| record.text(field))
        .filter(|value| value.to_lowercase().contains(&partial))
        .unique()
        .map(|value| (!value.to_lowercase().starts_with(&partial), value.len(), value.to_lowercase(), value))
        .sorted()
        .take(max)
        .map(|(_, _, _, value)| value.to_string())
        .collect()
}
