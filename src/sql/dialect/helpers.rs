//! Quoting and literal primitives the dialects share.

/// `"name"`, used by PostgreSQL and DuckDB.
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `` `name` ``, used by MySQL.
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// `[name]`, used by T-SQL.
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// `'value'` with embedded quotes doubled.
pub fn quote_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

pub fn word_bool(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

pub fn numeric_bool(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}
