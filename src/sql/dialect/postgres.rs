//! PostgreSQL: ANSI quoting, `true`/`false`, `||`.

use super::helpers::{quote_double, word_bool};
use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        word_bool(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        match name.to_ascii_uppercase().as_str() {
            "NVL" | "IFNULL" | "ISNULL" => Some("COALESCE"),
            _ => None,
        }
    }
}
