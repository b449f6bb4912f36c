use std::collections::BTreeSet;

use crate::error::CompileError;

/// Default `size`. Large on purpose: the remote service caps the returned
/// document count, and request-length limits usually hit first.
pub const DEFAULT_LIMIT: usize = 100_000;

pub const PARAM_TEXT: &str = "q";
pub const PARAM_BOOLEAN_QUERY: &str = "bq";
pub const PARAM_RANK: &str = "rank";
pub const PARAM_SIZE: &str = "size";
pub const PARAM_START: &str = "start";
pub const PARAM_RETURN_FIELDS: &str = "return-fields";

/// A compiled search, ready to be sent to a search endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchRequest {
    pub free_text: Option<String>,
    pub boolean_query: Option<String>,
    pub rank: Option<String>,
    pub limit: usize,
    pub offset: Option<usize>,
    pub return_fields: BTreeSet<String>,
}

impl SearchRequest {
    /// Build a request from free text and rendered clauses.
    ///
    /// Fails with [`CompileError::NoClauses`] when both are empty.
    pub fn from_parts(free_text: Option<&str>, clauses: &[String]) -> Result<Self, CompileError> {
        let free_text = free_text.filter(|t| !t.is_empty());
        if free_text.is_none() && clauses.is_empty() {
            return Err(CompileError::NoClauses);
        }

        Ok(Self {
            free_text: free_text.map(str::to_string),
            boolean_query: compile_boolean_query(clauses),
            rank: None,
            limit: DEFAULT_LIMIT,
            offset: None,
            return_fields: BTreeSet::new(),
        })
    }

    /// Query-string parameters for the search endpoint. Unset values are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = &self.free_text {
            params.push((PARAM_TEXT, q.clone()));
        }
        if let Some(bq) = &self.boolean_query {
            params.push((PARAM_BOOLEAN_QUERY, bq.clone()));
        }
        if let Some(rank) = &self.rank {
            params.push((PARAM_RANK, rank.clone()));
        }
        params.push((PARAM_SIZE, self.limit.to_string()));
        if let Some(offset) = self.offset {
            params.push((PARAM_START, offset.to_string()));
        }
        if !self.return_fields.is_empty() {
            let fields: Vec<&str> = self.return_fields.iter().map(String::as_str).collect();
            params.push((PARAM_RETURN_FIELDS, fields.join(",")));
        }
        params
    }
}

/// Combine clauses: none → `None`, one → verbatim, more → `(and c1 c2 ...)`
pub fn compile_boolean_query(clauses: &[String]) -> Option<String> {
    match clauses {
        [] => None,
        [only] => Some(only.clone()),
        many => Some(format!("(and {})", many.join(" "))),
    }
}
