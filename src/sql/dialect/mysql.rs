//! MySQL: backtick quoting and `1`/`0` booleans. `||` means OR unless
//! `PIPES_AS_CONCAT` is set, so concatenation goes through `CONCAT()`.

use super::helpers::{numeric_bool, quote_backtick};
use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_backtick(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        numeric_bool(b)
    }

    fn supports_concat_operator(&self) -> bool {
        false
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        match name.to_ascii_uppercase().as_str() {
            "NVL" | "ISNULL" => Some("IFNULL"),
            "SUBSTR" => Some("SUBSTRING"),
            // LENGTH counts bytes.
            "LENGTH" => Some("CHAR_LENGTH"),
            _ => None,
        }
    }
}
