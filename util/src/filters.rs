//! Column filter vocabulary shared by the repository layer and its callers.
//!
//! A filter is a list of `FilterParam`s that are AND-ed together. Values are
//! stored untyped so callers can build filters without depending on the ORM.

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Int(i64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterParam {
    pub column: String,
    pub operator: CompareOp,
    pub value: FilterValue,
}

pub trait IntoFilterValue {
    fn into_filter_value(self) -> FilterValue;
}

impl IntoFilterValue for String {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(self)
    }
}

impl IntoFilterValue for &str {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(self.to_string())
    }
}

impl IntoFilterValue for &String {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::String(self.clone())
    }
}

impl IntoFilterValue for i64 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(self)
    }
}

impl IntoFilterValue for i32 {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Int(i64::from(self))
    }
}

impl IntoFilterValue for bool {
    fn into_filter_value(self) -> FilterValue {
        FilterValue::Bool(self)
    }
}

impl<T: IntoFilterValue> IntoFilterValue for Option<T> {
    fn into_filter_value(self) -> FilterValue {
        match self {
            Some(v) => v.into_filter_value(),
            None => FilterValue::Null,
        }
    }
}

impl FilterParam {
    fn new(column: &str, operator: CompareOp, value: impl IntoFilterValue) -> Self {
        Self {
            column: column.to_string(),
            operator,
            value: value.into_filter_value(),
        }
    }

    /// Exact match. `FilterParam::eq("x", None::<String>)` matches `IS NULL`.
    pub fn eq(column: &str, value: impl IntoFilterValue) -> Self {
        Self::new(column, CompareOp::Eq, value)
    }

    pub fn ne(column: &str, value: impl IntoFilterValue) -> Self {
        Self::new(column, CompareOp::Ne, value)
    }

    pub fn gt(column: &str, value: impl IntoFilterValue) -> Self {
        Self::new(column, CompareOp::Gt, value)
    }

    pub fn gte(column: &str, value: impl IntoFilterValue) -> Self {
        Self::new(column, CompareOp::Gte, value)
    }

    pub fn lt(column: &str, value: impl IntoFilterValue) -> Self {
        Self::new(column, CompareOp::Lt, value)
    }

    pub fn lte(column: &str, value: impl IntoFilterValue) -> Self {
        Self::new(column, CompareOp::Lte, value)
    }
}
