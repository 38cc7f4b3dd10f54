//! The filter → sort → aggregate → page pipeline.

use crate::{
    aggregate::{Facet, Summary, facet, summarize},
    criteria::{Criteria, FieldConstraint, TextSearch},
    error::PipelineError,
    page::{Page, PageRequest},
    record::Record,
    sort::{SortKey, sort},
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::debug;

/// A complete widget query.
///
/// Running a query is a pure function of its inputs: the same records and
/// query always produce the same output, and the input slice is only borrowed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Query {
    /// Per-field constraints, combined with logical AND
    pub criteria: Criteria,
    /// Optional free-text search, applied alongside `criteria`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<TextSearch>,
    /// Ordering; `None` keeps input order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
    /// Numeric field summed and maximised in the [`Summary`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_field: Option<SmolStr>,
    /// Fields to facet over the filtered set
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<SmolStr>,
    /// Slice of the ordered result to return
    pub page: PageRequest,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a query from its JSON configuration form and validate it.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let query: Query = serde_json::from_str(json)?;
        query.validate()?;
        Ok(query)
    }

    pub fn filter(mut self, field: impl Into<SmolStr>, constraint: FieldConstraint) -> Self {
        self.criteria.insert(field, constraint);
        self
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn search(mut self, search: TextSearch) -> Self {
        self.search = Some(search);
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    pub fn summarize(mut self, field: impl Into<SmolStr>) -> Self {
        self.summary_field = Some(field.into());
        self
    }

    pub fn facet(mut self, field: impl Into<SmolStr>) -> Self {
        self.facets.push(field.into());
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    /// Check the query configuration. [`Query::run`] does not require this, but
    /// a query that fails validation can never match what its author intended.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.criteria.validate()?;

        if self.sort.as_ref().is_some_and(|key| key.field.is_empty()) {
            return Err(PipelineError::EmptyField("sort"));
        }
        if self.summary_field.as_ref().is_some_and(SmolStr::is_empty) {
            return Err(PipelineError::EmptyField("summary"));
        }
        if self.facets.iter().any(SmolStr::is_empty) {
            return Err(PipelineError::EmptyField("facets"));
        }
        if self.page.limit == Some(0) {
            return Err(PipelineError::ZeroLimit);
        }
        Ok(())
    }

    /// Whether a single record passes the search and every criterion.
    pub fn matches(&self, record: &Record) -> bool {
        self.search.as_ref().is_none_or(|search| search.matches(record))
            && self.criteria.matches(record)
    }

    /// Run the pipeline over `records`.
    ///
    /// Summary and facets cover the whole filtered set; only `records` in the
    /// output is paged.
    pub fn run<'a>(&self, records: &'a [Record]) -> QueryOutput<'a> {
        let filtered: Vec<&'a Record> = records.iter().filter(|r| self.matches(r)).collect();
        let filtered_count = filtered.len();

        let ordered = match &self.sort {
            Some(key) => sort(filtered, key),
            None => filtered,
        };

        let summary = summarize(ordered.iter().copied(), self.summary_field.as_deref());
        let facets = self
            .facets
            .iter()
            .map(|field| facet(ordered.iter().copied(), field.clone()))
            .collect();

        let (records_out, page) = self.page.apply(ordered);

        debug!(
            total = records.len(),
            filtered = filtered_count,
            returned = records_out.len(),
            sum = summary.sum,
            "Query evaluated"
        );

        QueryOutput {
            records: records_out,
            summary,
            facets,
            total_count: records.len(),
            filtered_count,
            page,
        }
    }
}

/// Result of [`Query::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutput<'a> {
    /// Filtered, ordered and paged records, borrowed from the input
    pub records: Vec<&'a Record>,
    /// Summary over the whole filtered set
    pub summary: Summary,
    pub facets: Vec<Facet>,
    /// Length of the input
    pub total_count: usize,
    /// Records passing the filter, before paging
    pub filtered_count: usize,
    pub page: Page,
}

impl QueryOutput<'_> {
    /// Owned copies of the returned records.
    pub fn to_owned_records(&self) -> Vec<Record> {
        self.records.iter().map(|record| (*record).clone()).collect()
    }

    /// Ids of the returned records, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.id.as_str()).collect()
    }
}

/// Filter stage on its own: records satisfying every constraint, in input order.
pub fn filter<'a>(records: &'a [Record], criteria: &Criteria) -> Vec<&'a Record> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}
