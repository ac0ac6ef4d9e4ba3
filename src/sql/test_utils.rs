//! Checks that rendered queries parse back in the dialect they target.

use sqlparser::dialect::{DuckDbDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parsed = match dialect {
        Dialect::Postgres => Parser::parse_sql(&PostgreSqlDialect {}, sql),
        Dialect::DuckDb => Parser::parse_sql(&DuckDbDialect {}, sql),
        Dialect::MySql => Parser::parse_sql(&MySqlDialect {}, sql),
        Dialect::TSql => Parser::parse_sql(&MsSqlDialect {}, sql),
    };
    parsed
        .map(drop)
        .map_err(|e| format!("{} rejected the query: {}\n{}", dialect, e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_quoting_is_tsql_only() {
        let sql = "SELECT [posts].* FROM [posts]";
        assert!(validate_sql(sql, Dialect::TSql).is_ok());
        assert!(validate_sql(sql, Dialect::MySql).is_err());
    }

    #[test]
    fn test_malformed_join_rejected() {
        let sql = "SELECT * FROM posts LEFT OUTER JOIN t ON";
        assert!(validate_sql(sql, Dialect::Postgres).is_err());
    }
}
