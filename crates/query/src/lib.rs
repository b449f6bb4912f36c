//! Grammar compiler for the remote index's structured (`bq`) query language.
//!
//! This crate is pure: it turns typed clauses into clause text and assembles
//! the request parameters. Field validation and execution live in
//! `search-core`.

pub mod clause;
pub mod error;
pub mod field_type;
pub mod request;

pub use clause::{ClauseValue, Operator, render_clause};
pub use error::{CompileError, UnknownFieldType};
pub use field_type::FieldType;
pub use request::{DEFAULT_LIMIT, SearchRequest, compile_boolean_query};
