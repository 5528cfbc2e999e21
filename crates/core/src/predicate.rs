//! Boolean filter predicates over named columns.
//!
//! A [`Predicate`] is a small AST mirroring the usual query-builder verbs
//! (`where`, `or_where`, `where_null`, `where_not_null`). The `db` crate
//! renders it into SQL; [`Predicate::evaluate`] runs it against an in-memory
//! row so scope semantics can be checked without a database.

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
    Bool(bool),
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A filter expression. Column names may be table-qualified (`table.column`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    IsNull(String),
    IsNotNull(String),
    Eq(String, Value),
    /// Conjunction. Empty means "always true".
    And(Vec<Predicate>),
    /// Disjunction. Empty means "always false".
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn is_null(column: impl Into<String>) -> Self {
        Predicate::IsNull(column.into())
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Predicate::IsNotNull(column.into())
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(column.into(), value.into())
    }

    /// The predicate that matches every row.
    pub fn always() -> Self {
        Predicate::And(Vec::new())
    }

    /// Conjoin with `other`, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), right) => {
                left.push(right);
                Predicate::And(left)
            }
            (left, Predicate::And(mut right)) => {
                right.insert(0, left);
                Predicate::And(right)
            }
            (left, right) => Predicate::And(vec![left, right]),
        }
    }

    /// Disjoin with `other`, flattening nested disjunctions.
    pub fn or(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::Or(mut left), Predicate::Or(right)) => {
                left.extend(right);
                Predicate::Or(left)
            }
            (Predicate::Or(mut left), right) => {
                left.push(right);
                Predicate::Or(left)
            }
            (left, Predicate::Or(mut right)) => {
                right.insert(0, left);
                Predicate::Or(right)
            }
            (left, right) => Predicate::Or(vec![left, right]),
        }
    }

    /// Every column referenced by this predicate, in first-seen order.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Predicate::IsNull(c) | Predicate::IsNotNull(c) | Predicate::Eq(c, _) => {
                if !out.contains(&c.as_str()) {
                    out.push(c);
                }
            }
            Predicate::And(parts) | Predicate::Or(parts) => {
                for p in parts {
                    p.collect_columns(out);
                }
            }
        }
    }

    /// Evaluate against a row, where `row(column)` yields the column's value
    /// or `None` for SQL NULL. Comparisons with NULL are false.
    pub fn evaluate<F>(&self, row: &F) -> bool
    where
        F: Fn(&str) -> Option<Value>,
    {
        match self {
            Predicate::IsNull(c) => row(c).is_none(),
            Predicate::IsNotNull(c) => row(c).is_some(),
            Predicate::Eq(c, expected) => row(c).as_ref() == Some(expected),
            Predicate::And(parts) => parts.iter().all(|p| p.evaluate(row)),
            Predicate::Or(parts) => parts.iter().any(|p| p.evaluate(row)),
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
