//! The relation translation joins and filters extend.
//!
//! A [`Query`] is a `SELECT` over one base table with a list of joins and an
//! optional filter. Builder methods consume `self`, so a relation is never
//! modified behind a caller's back.

use super::dialect::Dialect;
use super::expr::{Expr, ExprExt};
use super::token::{Keyword, Token, TokenStream};

/// A table in `FROM` or `JOIN`, optionally aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// How other clauses refer to this table: the alias when there is one.
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }

    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.table.clone()));
        if let Some(alias) = &self.alias {
            ts.space()
                .keyword(Keyword::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Expr,
}

impl Join {
    /// Identity of the joined target. Two joins of the same table under
    /// different aliases are different targets.
    pub fn target(&self) -> &str {
        self.table.reference_name()
    }

    fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        match self.join_type {
            JoinType::Inner => ts.keyword(Keyword::Inner),
            JoinType::Left => ts.keyword(Keyword::Left).space().keyword(Keyword::Outer),
        };
        ts.space().keyword(Keyword::Join).space();
        ts.append(&self.table.to_tokens());
        ts.space().keyword(Keyword::On).space();
        ts.append(&self.on.to_tokens_for_dialect(dialect));
        ts
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "a Query does nothing until rendered with to_sql()"]
pub struct Query {
    pub select: Vec<Expr>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, exprs: Vec<Expr>) -> Self {
        self.select = exprs;
        self
    }

    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Append a join. Existing joins on the same target are left alone.
    pub fn join(mut self, join_type: JoinType, table: TableRef, on: Expr) -> Self {
        self.joins.push(Join {
            join_type,
            table,
            on,
        });
        self
    }

    pub fn find_join(&self, target: &str) -> Option<&Join> {
        self.joins.iter().find(|join| join.target() == target)
    }

    /// Drop every join on `target`.
    pub fn remove_join(mut self, target: &str) -> Self {
        self.joins.retain(|join| join.target() != target);
        self
    }

    /// AND `condition` onto the existing filter.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.keyword(Keyword::Select);
        for (i, expr) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.newline().indent(1);
            ts.append(&expr.to_tokens_for_dialect(dialect));
        }

        if let Some(from) = &self.from {
            ts.newline().keyword(Keyword::From).space();
            ts.append(&from.to_tokens());
        }

        for join in &self.joins {
            ts.newline();
            ts.append(&join.to_tokens(dialect));
        }

        if let Some(filter) = &self.where_clause {
            ts.newline().keyword(Keyword::Where).space();
            ts.append(&filter.to_tokens_for_dialect(dialect));
        }

        ts
    }

    pub fn to_sql(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

impl std::fmt::Display for Query {
    /// Renders for [`Dialect::default`].
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sql(Dialect::default()))
    }
}
