//! Attribute-based query filters.
//!
//! A filter appends, onto a caller-supplied query builder and value join
//! alias, an equality predicate on the attribute code plus a comparison
//! on the attribute type's storage column. Placeholders come from the
//! builder's positional bind counter, so repeated filters in one query
//! never collide. Comparison policies are pluggable through
//! [`FilterStrategy`].
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use facet_schema::{parse_datetime, Attribute, DateInput, ValueKind};

use crate::errors::FilterError;

/// A comparison policy turning a user-supplied criteria value into a
/// predicate on one attribute.
pub trait FilterStrategy: Send + Sync {
    /// Appends the predicate when `input` is non-empty.
    ///
    /// Returns `Ok(false)` without touching the query for empty input.
    /// The query must already have an open `WHERE` clause, the predicate
    /// is appended as an `AND (...)` conjunct.
    fn apply<'args>(
        &self,
        query: &mut QueryBuilder<'args, Postgres>,
        alias: &str,
        attribute: &Attribute,
        input: &str,
    ) -> Result<bool, FilterError>;
}

fn push_attribute_match<'args>(
    query: &mut QueryBuilder<'args, Postgres>,
    alias: &str,
    attribute: &Attribute,
) {
    query
        .push(" AND (")
        .push(alias)
        .push(".attribute_code = ")
        .push_bind(attribute.code().to_owned())
        .push(" AND ")
        .push(alias)
        .push(".")
        .push(attribute.attribute_type().storage_column());
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-sensitive prefix match, `column LIKE 'input%'`. The default
/// policy for string-kinded attributes.
pub struct PrefixMatch;

impl FilterStrategy for PrefixMatch {
    fn apply<'args>(
        &self,
        query: &mut QueryBuilder<'args, Postgres>,
        alias: &str,
        attribute: &Attribute,
        input: &str,
    ) -> Result<bool, FilterError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(false);
        }
        let kind = attribute.attribute_type().kind();
        if kind != ValueKind::String {
            return Err(FilterError::UnsupportedKind {
                strategy: "prefix",
                attribute: attribute.code().to_owned(),
                kind,
            });
        }

        push_attribute_match(query, alias, attribute);
        query
            .push(" LIKE ")
            .push_bind(format!("{}%", escape_like(input)))
            .push(")");
        Ok(true)
    }
}

/// Exact match on the typed storage column. The input is parsed per the
/// attribute type's kind, unparseable input is an error rather than an
/// empty result.
pub struct ExactMatch;

impl FilterStrategy for ExactMatch {
    fn apply<'args>(
        &self,
        query: &mut QueryBuilder<'args, Postgres>,
        alias: &str,
        attribute: &Attribute,
        input: &str,
    ) -> Result<bool, FilterError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(false);
        }

        // Parse before touching the builder so a bad input never leaves
        // a dangling predicate behind.
        let kind = attribute.attribute_type().kind();
        match kind {
            ValueKind::String => {
                push_attribute_match(query, alias, attribute);
                query.push(" = ").push_bind(input.to_owned());
            }
            ValueKind::Integer => {
                let value = parse_input::<i64>(attribute, kind, input)?;
                push_attribute_match(query, alias, attribute);
                query.push(" = ").push_bind(value);
            }
            ValueKind::Decimal => {
                let value = parse_input::<f64>(attribute, kind, input)?;
                push_attribute_match(query, alias, attribute);
                query.push(" = ").push_bind(value);
            }
            ValueKind::Boolean => {
                let value = parse_input::<bool>(attribute, kind, input)?;
                push_attribute_match(query, alias, attribute);
                query.push(" = ").push_bind(value);
            }
            ValueKind::DateTime => {
                let value = parse_datetime_input(attribute, input)?;
                push_attribute_match(query, alias, attribute);
                query.push(" = ").push_bind(value);
            }
        }
        query.push(")");
        Ok(true)
    }
}

/// Inclusive range match, `column BETWEEN lo AND hi`, with the bounds
/// supplied as `lo..hi`. Supported on integer, decimal and datetime
/// attributes.
pub struct RangeMatch;

impl FilterStrategy for RangeMatch {
    fn apply<'args>(
        &self,
        query: &mut QueryBuilder<'args, Postgres>,
        alias: &str,
        attribute: &Attribute,
        input: &str,
    ) -> Result<bool, FilterError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(false);
        }

        let kind = attribute.attribute_type().kind();
        let (low, high) = input.split_once("..").ok_or_else(|| FilterError::InvalidInput {
            attribute: attribute.code().to_owned(),
            kind,
            input: input.to_owned(),
        })?;

        match kind {
            ValueKind::Integer => {
                let lo = parse_input::<i64>(attribute, kind, low)?;
                let hi = parse_input::<i64>(attribute, kind, high)?;
                push_attribute_match(query, alias, attribute);
                query
                    .push(" BETWEEN ")
                    .push_bind(lo)
                    .push(" AND ")
                    .push_bind(hi);
            }
            ValueKind::Decimal => {
                let lo = parse_input::<f64>(attribute, kind, low)?;
                let hi = parse_input::<f64>(attribute, kind, high)?;
                push_attribute_match(query, alias, attribute);
                query
                    .push(" BETWEEN ")
                    .push_bind(lo)
                    .push(" AND ")
                    .push_bind(hi);
            }
            ValueKind::DateTime => {
                let lo = parse_datetime_input(attribute, low)?;
                let hi = parse_datetime_input(attribute, high)?;
                push_attribute_match(query, alias, attribute);
                query
                    .push(" BETWEEN ")
                    .push_bind(lo)
                    .push(" AND ")
                    .push_bind(hi);
            }
            ValueKind::String | ValueKind::Boolean => {
                return Err(FilterError::UnsupportedKind {
                    strategy: "range",
                    attribute: attribute.code().to_owned(),
                    kind,
                });
            }
        }
        query.push(")");
        Ok(true)
    }
}

fn parse_input<T: std::str::FromStr>(
    attribute: &Attribute,
    kind: ValueKind,
    input: &str,
) -> Result<T, FilterError> {
    input.trim().parse().map_err(|_| FilterError::InvalidInput {
        attribute: attribute.code().to_owned(),
        kind,
        input: input.to_owned(),
    })
}

fn parse_datetime_input(attribute: &Attribute, input: &str) -> Result<DateTime<Utc>, FilterError> {
    // allow_null = false, a blank input is an error here too
    parse_datetime(Some(&DateInput::from(input.trim())), false)
        .ok()
        .flatten()
        .ok_or_else(|| FilterError::InvalidInput {
            attribute: attribute.code().to_owned(),
            kind: ValueKind::DateTime,
            input: input.to_owned(),
        })
}

/// The default policy per storage kind: prefix match for strings, exact
/// match for everything else.
pub fn default_strategy(kind: ValueKind) -> Arc<dyn FilterStrategy> {
    match kind {
        ValueKind::String => Arc::new(PrefixMatch),
        _ => Arc::new(ExactMatch),
    }
}

/// One configured filter: an attribute, the user-supplied criteria value
/// and the comparison policy to apply.
#[derive(Clone)]
pub struct AppliedFilter {
    attribute: Arc<Attribute>,
    input: String,
    strategy: Arc<dyn FilterStrategy>,
}

impl AppliedFilter {
    /// Builds a filter with the default policy for the attribute's kind.
    pub fn new(attribute: Arc<Attribute>, input: impl Into<String>) -> Self {
        let strategy = default_strategy(attribute.attribute_type().kind());
        AppliedFilter {
            attribute,
            input: input.into(),
            strategy,
        }
    }

    pub fn with_strategy(
        attribute: Arc<Attribute>,
        input: impl Into<String>,
        strategy: Arc<dyn FilterStrategy>,
    ) -> Self {
        AppliedFilter {
            attribute,
            input: input.into(),
            strategy,
        }
    }

    pub fn attribute(&self) -> &Arc<Attribute> {
        &self.attribute
    }

    /// Whether this filter would emit nothing.
    pub fn is_noop(&self) -> bool {
        self.input.trim().is_empty()
    }

    pub fn apply<'args>(
        &self,
        query: &mut QueryBuilder<'args, Postgres>,
        alias: &str,
    ) -> Result<bool, FilterError> {
        self.strategy.apply(query, alias, &self.attribute, &self.input)
    }
}
