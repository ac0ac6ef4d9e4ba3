//! Dialect-specific spelling of the SQL the translation layer emits.
//!
//! Join and filter structure is the same everywhere; what varies is how
//! names and values are written:
//!
//! | | identifiers | booleans | non-ASCII strings | concat |
//! |---|---|---|---|---|
//! | PostgreSQL, DuckDB | `"name"` | `true` | `'été'` | `\|\|` |
//! | MySQL | `` `name` `` | `1` | `'été'` | `CONCAT()` |
//! | T-SQL | `[name]` | `1` | `N'été'` | `+` |
//!
//! ```ignore
//! use translayer::sql::dialect::{Dialect, SqlDialect};
//!
//! let quoted = Dialect::TSql.quote_identifier("post_translations"); // [post_translations]
//! ```

mod duckdb;
mod helpers;
mod mysql;
mod postgres;
mod tsql;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;
pub use tsql::TSql;

/// How one dialect renders identifiers, literals and functions.
pub trait SqlDialect: std::fmt::Debug {
    /// Lowercase name, as accepted on the command line.
    fn name(&self) -> &'static str;

    fn quote_identifier(&self, ident: &str) -> String;

    /// Single-quoted with `''` escaping unless overridden.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_single(s)
    }

    fn format_bool(&self, b: bool) -> &'static str;

    fn format_null(&self) -> &'static str {
        "NULL"
    }

    fn concat_operator(&self) -> &'static str {
        "||"
    }

    /// `false` renders concatenation as `CONCAT(a, b)`.
    fn supports_concat_operator(&self) -> bool {
        true
    }

    /// Dialect spelling of a function, matched case-insensitively.
    /// `None` keeps the name as written.
    fn remap_function(&self, _name: &str) -> Option<&'static str> {
        None
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    DuckDb,
    Postgres,
    MySql,
    TSql,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::DuckDb,
        Dialect::Postgres,
        Dialect::MySql,
        Dialect::TSql,
    ];

    /// The implementation behind this variant.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::DuckDb => &DuckDb,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
            Dialect::TSql => &TSql,
        }
    }
}

impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn concat_operator(&self) -> &'static str {
        self.dialect().concat_operator()
    }

    fn supports_concat_operator(&self) -> bool {
        self.dialect().supports_concat_operator()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
