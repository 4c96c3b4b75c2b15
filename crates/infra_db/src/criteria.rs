//! Query specifications for criteria queries
//!
//! A criteria query is described by plain values instead of SQL strings: a
//! [`Root`] naming the table, a [`Predicate`] tree for the `WHERE` clause and
//! an [`OrderBy`] for the sort order. The generic repository renders them into
//! parameterized SQL with `sqlx::QueryBuilder`, so every value is bound and
//! never spliced into the statement text.
//!
//! # Example
//!
//! ```rust
//! use infra_db::criteria::{Predicate, Root};
//!
//! let root = Root::new("pets", "id");
//! let predicate = Predicate::all([
//!     Some(root.get("name_search").contains_ignore_case("RE")),
//!     None,
//!     Some(root.get("species").eq("dog")),
//! ]);
//! let order = root.get("name").asc().then(root.get("id").asc());
//! # let _ = (predicate, order);
//! ```

use chrono::NaiveDate;
use core_kernel::EntityId;
use sqlx::sqlite::Sqlite;
use sqlx::QueryBuilder;
use std::fmt;

/// Escape character used in every `LIKE` pattern
pub const LIKE_ESCAPE: char = '\\';

/// Case folding applied to searchable text before it is stored or matched
///
/// SQLite only folds ASCII letters, so searchable columns keep a copy of the
/// text folded here and patterns are folded the same way.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Builds the pattern for a case-insensitive "contains" match
///
/// The input is folded with [`fold_case`], its `%`, `_` and escape characters
/// are escaped so they match literally, and the result is wrapped in `%`
/// wildcards.
///
/// ```rust
/// use infra_db::criteria::to_like_parameter;
///
/// assert_eq!(to_like_parameter("ReX"), "%rex%");
/// assert_eq!(to_like_parameter("ÉLO"), "%élo%");
/// assert_eq!(to_like_parameter("50%"), "%50\\%%");
/// ```
pub fn to_like_parameter(parameter: &str) -> String {
    let folded = fold_case(parameter);
    let mut pattern = String::with_capacity(folded.len() + 2);
    pattern.push('%');
    for c in folded.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// A value bound into a query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<EntityId> for SqlValue {
    fn from(value: EntityId) -> Self {
        SqlValue::Integer(value.get())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// The table a criteria query selects from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Root {
    table: &'static str,
    id_column: &'static str,
}

impl Root {
    pub fn new(table: &'static str, id_column: &'static str) -> Self {
        Self { table, id_column }
    }

    /// Returns a column of this table
    pub fn get(&self, column: &'static str) -> Column {
        Column {
            table: self.table,
            name: column,
        }
    }

    /// Returns the identifier column
    pub fn id(&self) -> Column {
        self.get(self.id_column)
    }

    pub fn table(&self) -> &'static str {
        self.table
    }
}

/// A table-qualified column reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    table: &'static str,
    name: &'static str,
}

impl Column {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Equality; comparing with `SqlValue::Null` becomes `IS NULL`
    pub fn eq(self, value: impl Into<SqlValue>) -> Predicate {
        let value = value.into();
        if value.is_null() {
            Predicate::IsNull(self)
        } else {
            Predicate::compare(self, CompareOp::Eq, value)
        }
    }

    /// Inequality; comparing with `SqlValue::Null` becomes `IS NOT NULL`
    pub fn ne(self, value: impl Into<SqlValue>) -> Predicate {
        let value = value.into();
        if value.is_null() {
            Predicate::IsNotNull(self)
        } else {
            Predicate::compare(self, CompareOp::Ne, value)
        }
    }

    pub fn lt(self, value: impl Into<SqlValue>) -> Predicate {
        Predicate::compare(self, CompareOp::Lt, value.into())
    }

    pub fn le(self, value: impl Into<SqlValue>) -> Predicate {
        Predicate::compare(self, CompareOp::Le, value.into())
    }

    pub fn gt(self, value: impl Into<SqlValue>) -> Predicate {
        Predicate::compare(self, CompareOp::Gt, value.into())
    }

    pub fn ge(self, value: impl Into<SqlValue>) -> Predicate {
        Predicate::compare(self, CompareOp::Ge, value.into())
    }

    /// Case-insensitive substring match
    ///
    /// The column must hold text folded with [`fold_case`]. Wildcards in
    /// `fragment` match literally.
    pub fn contains_ignore_case(self, fragment: &str) -> Predicate {
        self.like_ignore_case(to_like_parameter(fragment))
    }

    /// `column LIKE pattern` with [`LIKE_ESCAPE`] as the escape character
    ///
    /// The pattern is used as given. Only ASCII letters compare
    /// case-insensitively, so other text must already be folded on both sides.
    pub fn like_ignore_case(self, pattern: impl Into<String>) -> Predicate {
        Predicate::LikeIgnoreCase {
            column: self,
            pattern: pattern.into(),
        }
    }

    pub fn is_null(self) -> Predicate {
        Predicate::IsNull(self)
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate::IsNotNull(self)
    }

    pub fn in_list<I, V>(self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Predicate::In {
            column: self,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn asc(self) -> OrderBy {
        OrderBy::from(Order::new(self, Direction::Asc))
    }

    pub fn desc(self) -> OrderBy {
        OrderBy::from(Order::new(self, Direction::Desc))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// A boolean filter expression
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        column: Column,
        op: CompareOp,
        value: SqlValue,
    },
    LikeIgnoreCase {
        column: Column,
        pattern: String,
    },
    IsNull(Column),
    IsNotNull(Column),
    In {
        column: Column,
        values: Vec<SqlValue>,
    },
    /// Conjunction; empty means "match everything"
    And(Vec<Predicate>),
    /// Disjunction; empty means "match nothing"
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    fn compare(column: Column, op: CompareOp, value: SqlValue) -> Self {
        Predicate::Compare { column, op, value }
    }

    /// A predicate every row satisfies
    pub fn always() -> Self {
        Predicate::And(Vec::new())
    }

    /// Combines optional clauses with AND, skipping the absent ones
    ///
    /// Search options usually map each set field to one clause, so an empty
    /// options value yields [`Predicate::always`].
    pub fn all<I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = Option<Predicate>>,
    {
        Predicate::And(clauses.into_iter().flatten().collect())
    }

    /// Combines clauses with OR
    pub fn any<I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        Predicate::Or(clauses.into_iter().collect())
    }

    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::And(mut clauses) => {
                clauses.push(other);
                Predicate::And(clauses)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Or(mut clauses) => {
                clauses.push(other);
                Predicate::Or(clauses)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    /// Returns true if the predicate cannot exclude any row
    pub fn is_always(&self) -> bool {
        match self {
            Predicate::And(clauses) => clauses.iter().all(Predicate::is_always),
            _ => false,
        }
    }

    /// Appends the predicate as SQL, binding every value
    pub fn push_sql<'args>(&self, qb: &mut QueryBuilder<'args, Sqlite>) {
        match self {
            Predicate::Compare { column, op, value } => {
                qb.push(column).push(" ").push(op.as_sql()).push(" ");
                push_value(qb, value.clone());
            }
            Predicate::LikeIgnoreCase { column, pattern } => {
                qb.push(column).push(" LIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" ESCAPE '").push(LIKE_ESCAPE).push("'");
            }
            Predicate::IsNull(column) => {
                qb.push(column).push(" IS NULL");
            }
            Predicate::IsNotNull(column) => {
                qb.push(column).push(" IS NOT NULL");
            }
            Predicate::In { values, .. } if values.is_empty() => {
                qb.push("1 = 0");
            }
            Predicate::In { column, values } => {
                qb.push(column).push(" IN (");
                push_values(qb, values);
                qb.push(")");
            }
            Predicate::And(clauses) => push_group(qb, clauses, " AND ", "1 = 1"),
            Predicate::Or(clauses) => push_group(qb, clauses, " OR ", "1 = 0"),
            Predicate::Not(inner) => {
                qb.push("NOT (");
                inner.push_sql(qb);
                qb.push(")");
            }
        }
    }
}

fn push_group<'args>(
    qb: &mut QueryBuilder<'args, Sqlite>,
    clauses: &[Predicate],
    separator: &str,
    empty: &str,
) {
    match clauses {
        [] => {
            qb.push(empty);
        }
        [single] => single.push_sql(qb),
        _ => {
            qb.push("(");
            for (i, clause) in clauses.iter().enumerate() {
                if i > 0 {
                    qb.push(separator);
                }
                clause.push_sql(qb);
            }
            qb.push(")");
        }
    }
}

/// Binds a single value
pub(crate) fn push_value<'args>(qb: &mut QueryBuilder<'args, Sqlite>, value: SqlValue) {
    match value {
        SqlValue::Null => qb.push_bind(None::<i64>),
        SqlValue::Integer(v) => qb.push_bind(v),
        SqlValue::Real(v) => qb.push_bind(v),
        SqlValue::Text(v) => qb.push_bind(v),
        SqlValue::Bool(v) => qb.push_bind(v),
        SqlValue::Date(v) => qb.push_bind(v),
    };
}

/// Binds values separated by commas
pub(crate) fn push_values<'args>(qb: &mut QueryBuilder<'args, Sqlite>, values: &[SqlValue]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_value(qb, value.clone());
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: Column,
    pub direction: Direction,
}

impl Order {
    pub fn new(column: Column, direction: Direction) -> Self {
        Self { column, direction }
    }
}

/// An ordered list of sort keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBy(Vec<Order>);

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the keys of `next` as lower-priority sort keys
    pub fn then(mut self, next: OrderBy) -> Self {
        self.0.extend(next.0);
        self
    }

    pub fn keys(&self) -> &[Order] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any key sorts on `column`
    pub fn mentions(&self, column: Column) -> bool {
        self.0.iter().any(|order| order.column == column)
    }

    /// Appends `column` ascending unless it is already a sort key
    ///
    /// Used with the identifier column to make the order total.
    pub fn with_tiebreaker(self, column: Column) -> Self {
        if self.mentions(column) {
            self
        } else {
            self.then(column.asc())
        }
    }

    /// Appends the `ORDER BY` clause; nothing when there are no keys
    pub fn push_sql<'args>(&self, qb: &mut QueryBuilder<'args, Sqlite>) {
        if self.0.is_empty() {
            return;
        }
        qb.push(" ORDER BY ");
        for (i, order) in self.0.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(order.column);
            qb.push(match order.direction {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
        }
    }
}

impl From<Order> for OrderBy {
    fn from(order: Order) -> Self {
        OrderBy(vec![order])
    }
}
