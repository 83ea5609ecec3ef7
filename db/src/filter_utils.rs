use sea_orm::sea_query::{Condition, Order};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Select, Value};
use util::filters::{CompareOp, FilterParam, FilterValue};

pub struct FilterUtils;

impl FilterUtils {
    /// Apply a single filter parameter to a condition using any SeaORM column.
    pub fn apply_filter<C>(
        condition: Condition,
        column: C,
        filter_param: &FilterParam,
    ) -> Result<Condition, DbErr>
    where
        C: ColumnTrait,
    {
        let value: Value = match &filter_param.value {
            FilterValue::Null => {
                return match filter_param.operator {
                    CompareOp::Eq => Ok(condition.add(column.is_null())),
                    CompareOp::Ne => Ok(condition.add(column.is_not_null())),
                    op => Err(DbErr::Custom(format!(
                        "Invalid operator {op:?} for NULL on '{}'",
                        filter_param.column
                    ))),
                };
            }
            FilterValue::Bool(b) => {
                if !matches!(filter_param.operator, CompareOp::Eq | CompareOp::Ne) {
                    return Err(DbErr::Custom(format!(
                        "Invalid operator {:?} for boolean value",
                        filter_param.operator
                    )));
                }
                (*b).into()
            }
            FilterValue::String(s) => s.clone().into(),
            FilterValue::Int(i) => (*i).into(),
        };

        let expr = match filter_param.operator {
            CompareOp::Eq => column.eq(value),
            CompareOp::Ne => column.ne(value),
            CompareOp::Gt => column.gt(value),
            CompareOp::Gte => column.gte(value),
            CompareOp::Lt => column.lt(value),
            CompareOp::Lte => column.lte(value),
        };
        Ok(condition.add(expr))
    }

    /// AND-s every filter together, resolving column names through `column_resolver`.
    pub fn apply_all_filters<C>(
        filter_params: &[FilterParam],
        column_resolver: impl Fn(&str) -> Result<C, DbErr>,
    ) -> Result<Condition, DbErr>
    where
        C: ColumnTrait,
    {
        let mut condition = Condition::all();
        for filter_param in filter_params {
            let column = column_resolver(&filter_param.column)?;
            condition = Self::apply_filter(condition, column, filter_param)?;
        }
        Ok(condition)
    }
}

pub struct SortUtils;

impl SortUtils {
    /// Comma-separated column list; a leading `-` sorts that column descending.
    pub fn apply_sorting<E, C>(
        mut query: Select<E>,
        sort_by: Option<&str>,
        column_resolver: impl Fn(&str) -> Result<C, DbErr>,
    ) -> Result<Select<E>, DbErr>
    where
        E: EntityTrait,
        C: ColumnTrait,
    {
        let Some(spec) = sort_by else {
            return Ok(query);
        };
        for field in spec.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let (name, order) = match field.strip_prefix('-') {
                Some(rest) => (rest, Order::Desc),
                None => (field, Order::Asc),
            };
            let column = column_resolver(name)?;
            query = query.order_by(column, order);
        }
        Ok(query)
    }
}
