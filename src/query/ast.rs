//! Typed query representation
//!
//! Produced by the validator from the raw JSON document. Every field
//! reference is already resolved to a [`Field`], every IS pattern is already
//! parsed, so evaluation never inspects strings to find out what to do.

use crate::dataset::{DatasetKind, Field};

/// Wildcard string pattern used by IS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `text`
    Exact(String),
    /// `text*`
    Prefix(String),
    /// `*text`
    Suffix(String),
    /// `*text*`
    Contains(String),
}

impl Pattern {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(s) => value == s,
            Pattern::Prefix(s) => value.starts_with(s.as_str()),
            Pattern::Suffix(s) => value.ends_with(s.as_str()),
            Pattern::Contains(s) => value.contains(s.as_str()),
        }
    }
}

/// WHERE predicate tree. Exactly one variant is active per node.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Empty WHERE object: matches every record
    All,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Lt(Field, f64),
    Gt(Field, f64),
    Eq(Field, f64),
    Is(Field, Pattern),
}

impl Filter {
    /// Operator name as it appears on the wire
    pub fn op_name(&self) -> &'static str {
        match self {
            Filter::All => "ALL",
            Filter::And(_) => "AND",
            Filter::Or(_) => "OR",
            Filter::Not(_) => "NOT",
            Filter::Lt(..) => "LT",
            Filter::Gt(..) => "GT",
            Filter::Eq(..) => "EQ",
            Filter::Is(..) => "IS",
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }
}

/// A COLUMNS / ORDER / GROUP entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// A dataset field, output under its prefixed name
    Field(Field),
    /// An APPLY-generated column, output under its bare name
    Apply(String),
}

impl ColumnKey {
    /// Output key of this column
    pub fn output_name(&self, dataset_id: &str) -> String {
        match self {
            ColumnKey::Field(field) => field.qualified(dataset_id),
            ColumnKey::Apply(name) => name.clone(),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Up,
    Down,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Up => "UP",
            SortDirection::Down => "DOWN",
        }
    }
}

/// ORDER specification. Keys always appear in COLUMNS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub direction: SortDirection,
    pub keys: Vec<ColumnKey>,
}

impl Order {
    /// Single-key ascending order (`"ORDER": "sections_avg"`)
    pub fn single(key: ColumnKey) -> Self {
        Self {
            direction: SortDirection::Up,
            keys: vec![key],
        }
    }
}

/// Aggregation operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOp {
    Max,
    Min,
    Avg,
    Count,
    Sum,
}

impl ApplyOp {
    pub fn parse(token: &str) -> Option<ApplyOp> {
        match token {
            "MAX" => Some(ApplyOp::Max),
            "MIN" => Some(ApplyOp::Min),
            "AVG" => Some(ApplyOp::Avg),
            "COUNT" => Some(ApplyOp::Count),
            "SUM" => Some(ApplyOp::Sum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyOp::Max => "MAX",
            ApplyOp::Min => "MIN",
            ApplyOp::Avg => "AVG",
            ApplyOp::Count => "COUNT",
            ApplyOp::Sum => "SUM",
        }
    }

    /// COUNT accepts any field; every other operator needs a numeric one
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, ApplyOp::Count)
    }
}

/// One APPLY rule: `{ "<key>": { "<OP>": "<field>" } }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRule {
    pub key: String,
    pub op: ApplyOp,
    pub field: Field,
}

/// TRANSFORMATIONS block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformations {
    pub group: Vec<Field>,
    pub apply: Vec<ApplyRule>,
}

impl Transformations {
    pub fn group_index(&self, field: Field) -> Option<usize> {
        self.group.iter().position(|f| *f == field)
    }

    pub fn apply_index(&self, key: &str) -> Option<usize> {
        self.apply.iter().position(|rule| rule.key == key)
    }
}

/// A validated query bound to one dataset id and kind
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub dataset_id: String,
    pub kind: DatasetKind,
    pub filter: Filter,
    pub columns: Vec<ColumnKey>,
    pub order: Option<Order>,
    pub transformations: Option<Transformations>,
}

impl Query {
    pub fn is_transformed(&self) -> bool {
        self.transformations.is_some()
    }

    /// Output names of COLUMNS, in order
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.output_name(&self.dataset_id))
            .collect()
    }
}
