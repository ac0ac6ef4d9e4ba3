//! T-SQL (SQL Server, Azure SQL): bracket quoting, `1`/`0` booleans and `+`
//! concatenation. Translated values are often non-ASCII, and those need the
//! `N'...'` form to survive a non-Unicode collation.

use super::helpers::{numeric_bool, quote_bracket, quote_single};
use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "tsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        let quoted = quote_single(s);
        if s.is_ascii() {
            quoted
        } else {
            format!("N{}", quoted)
        }
    }

    fn format_bool(&self, b: bool) -> &'static str {
        numeric_bool(b)
    }

    fn concat_operator(&self) -> &'static str {
        "+"
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        match name.to_ascii_uppercase().as_str() {
            "LENGTH" => Some("LEN"),
            "SUBSTR" => Some("SUBSTRING"),
            "NVL" | "IFNULL" => Some("ISNULL"),
            _ => None,
        }
    }
}
