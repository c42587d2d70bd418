//! Tenant-scoped metadata filters.
//!
//! A [`FilterSet`] is an ordered list of equality clauses joined by AND. The
//! first clause is always `project_id = <tenant>`; caller clauses follow in
//! insertion order. There is no OR and no dedup: a caller clause repeating
//! `project_id` with another value simply yields an empty result.

use qdrant_client::qdrant::{
    Condition, FieldCondition, Filter, IsEmptyCondition, Match, condition::ConditionOneOf,
    r#match::MatchValue,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::RagError;

/// Metadata key carrying the tenant/project identifier.
pub const PROJECT_KEY: &str = "project_id";

/// Single `key = value` equality clause.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterClause {
    pub key: String,
    pub value: Value,
}

impl FilterClause {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Evaluates the clause against one metadata value.
    ///
    /// Only string, integer and bool clauses can match, mirroring what the
    /// Qdrant conversion supports.
    fn matches_value(&self, actual: Option<&Value>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match &self.value {
            Value::String(_) | Value::Bool(_) => &self.value == actual,
            Value::Number(n) => match (n.as_i64(), actual.as_i64()) {
                (Some(want), Some(got)) => want == got,
                _ => false,
            },
            _ => false,
        }
    }
}

/// ANDed equality clauses, tenant clause first.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    /// Builds the filter set for `project_id` plus `extra` clauses.
    ///
    /// # Errors
    /// [`RagError::InvalidArgument`] if `project_id` is empty or whitespace.
    pub fn build(project_id: &str, extra: &Map<String, Value>) -> Result<Self, RagError> {
        if project_id.trim().is_empty() {
            return Err(RagError::InvalidArgument("project_id must not be empty".into()));
        }

        let mut clauses = Vec::with_capacity(extra.len() + 1);
        clauses.push(FilterClause::new(PROJECT_KEY, project_id));
        clauses.extend(
            extra
                .iter()
                .map(|(k, v)| FilterClause::new(k.clone(), v.clone())),
        );

        debug!(clauses = clauses.len(), "filters::build");
        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// True when every clause holds for `metadata`.
    pub fn matches(&self, metadata: &Map<String, Value>) -> bool {
        self.clauses
            .iter()
            .all(|c| c.matches_value(metadata.get(&c.key)))
    }
}

/// Converts a [`FilterSet`] to a Qdrant [`Filter`].
///
/// Every clause goes to `must`:
/// - `String` → `Keyword`
/// - integer `Number` → `Integer`
/// - `Bool`   → `Boolean`
///
/// Other JSON kinds become `is_empty(key)` in both `must` and `must_not`,
/// which no point satisfies.
pub fn to_qdrant_filter(f: &FilterSet) -> Filter {
    debug!("filters::to_qdrant_filter clauses={}", f.clauses.len());

    let mut must: Vec<Condition> = Vec::with_capacity(f.clauses.len());
    let mut must_not: Vec<Condition> = Vec::new();

    for clause in &f.clauses {
        let match_value = match &clause.value {
            Value::String(s) => Some(MatchValue::Keyword(s.clone())),
            Value::Number(n) => n.as_i64().map(MatchValue::Integer),
            Value::Bool(b) => Some(MatchValue::Boolean(*b)),
            _ => None,
        };

        match match_value {
            Some(m) => must.push(field_match(&clause.key, m)),
            None => {
                must.push(is_empty(&clause.key));
                must_not.push(is_empty(&clause.key));
            }
        }
    }

    Filter {
        must,
        must_not,
        ..Default::default()
    }
}

fn field_match(key: &str, m: MatchValue) -> Condition {
    Condition {
        condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
            key: key.to_string(),
            r#match: Some(Match {
                match_value: Some(m),
            }),
            ..Default::default()
        })),
    }
}

fn is_empty(key: &str) -> Condition {
    Condition {
        condition_one_of: Some(ConditionOneOf::IsEmpty(IsEmptyCondition {
            key: key.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extra(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn tenant_clause_is_first() {
        let set = FilterSet::build("proj_1", &extra(json!({"source": "journal", "git_branch": "main"})))
            .unwrap();
        let keys: Vec<&str> = set.clauses().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["project_id", "source", "git_branch"]);
        assert_eq!(set.clauses()[0], FilterClause::new("project_id", "proj_1"));
    }

    #[test]
    fn empty_tenant_is_rejected() {
        assert!(matches!(
            FilterSet::build("", &Map::new()),
            Err(RagError::InvalidArgument(_))
        ));
        assert!(matches!(
            FilterSet::build("   ", &extra(json!({"source": "journal"}))),
            Err(RagError::InvalidArgument(_))
        ));
    }

    #[test]
    fn duplicate_tenant_key_is_kept() {
        let set = FilterSet::build("proj_1", &extra(json!({"project_id": "proj_2"}))).unwrap();
        assert_eq!(set.clauses().len(), 2);
        let meta = extra(json!({"project_id": "proj_1"}));
        assert!(!set.matches(&meta));
    }

    #[test]
    fn matches_scalars_and_rejects_unsupported() {
        let set = FilterSet::build("p", &extra(json!({"n": 3, "flag": true}))).unwrap();
        assert!(set.matches(&extra(json!({"project_id": "p", "n": 3, "flag": true}))));
        assert!(!set.matches(&extra(json!({"project_id": "p", "n": 4, "flag": true}))));
        assert!(!set.matches(&extra(json!({"project_id": "p", "flag": true}))));

        let odd = FilterSet::build("p", &extra(json!({"tags": ["a"]}))).unwrap();
        assert!(!odd.matches(&extra(json!({"project_id": "p", "tags": ["a"]}))));
    }

    #[test]
    fn qdrant_filter_uses_must() {
        let set = FilterSet::build("p", &extra(json!({"source": "code_file", "score": 1.5}))).unwrap();
        let f = to_qdrant_filter(&set);
        assert!(f.should.is_empty());
        assert_eq!(f.must.len(), 3);
        assert_eq!(f.must_not.len(), 1);
    }
}
