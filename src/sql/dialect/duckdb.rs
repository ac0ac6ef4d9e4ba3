//! DuckDB: spelled like PostgreSQL for everything translation joins need.

use super::helpers::{quote_double, word_bool};
use super::{Postgres, SqlDialect};

#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        word_bool(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        Postgres.remap_function(name)
    }
}
