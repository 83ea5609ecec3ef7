use crate::filter_utils::{FilterUtils, SortUtils};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, Select,
};
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;
use util::filters::FilterParam;

/// Generic CRUD repository over any SeaORM entity, addressed by column filters.
///
/// Every method takes the connection explicitly so callers can run against a
/// pooled connection or an open transaction alike.
pub struct Repository<E, C>
where
    E: EntityTrait,
    C: ColumnTrait + FromStr,
{
    _phantom: PhantomData<(E, C)>,
}

impl<E, C> Repository<E, C>
where
    E: EntityTrait,
    E::Model: Sync + Send + IntoActiveModel<E::ActiveModel> + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ColumnTrait + FromStr + 'static,
    C::Err: Display,
{
    fn resolve(column_name: &str) -> Result<C, DbErr> {
        C::from_str(column_name)
            .map_err(|e| DbErr::Custom(format!("Invalid column name '{}': {}", column_name, e)))
    }

    fn select(filter_params: &[FilterParam], sort_by: Option<&str>) -> Result<Select<E>, DbErr> {
        let condition = FilterUtils::apply_all_filters(filter_params, Self::resolve)?;
        SortUtils::apply_sorting(E::find().filter(condition), sort_by, Self::resolve)
    }

    pub async fn find_one<Db: ConnectionTrait>(
        db: &Db,
        filter_params: &[FilterParam],
        sort_by: Option<&str>,
    ) -> Result<Option<E::Model>, DbErr> {
        Self::select(filter_params, sort_by)?.one(db).await
    }

    pub async fn find_all<Db: ConnectionTrait>(
        db: &Db,
        filter_params: &[FilterParam],
        sort_by: Option<&str>,
    ) -> Result<Vec<E::Model>, DbErr> {
        Self::select(filter_params, sort_by)?.all(db).await
    }

    pub async fn count<Db: ConnectionTrait>(
        db: &Db,
        filter_params: &[FilterParam],
    ) -> Result<u64, DbErr> {
        Self::select(filter_params, None)?.count(db).await
    }

    pub async fn create<Db: ConnectionTrait>(
        db: &Db,
        active_model: E::ActiveModel,
    ) -> Result<E::Model, DbErr> {
        active_model.insert(db).await
    }

    /// Inserts every record in one statement and returns how many rows landed.
    pub async fn create_many<Db: ConnectionTrait>(
        db: &Db,
        active_models: Vec<E::ActiveModel>,
    ) -> Result<u64, DbErr> {
        if active_models.is_empty() {
            return Ok(0);
        }
        E::insert_many(active_models)
            .exec_without_returning(db)
            .await
    }

    /// Applies the `Set` fields of `patch` to every row matching the filter.
    pub async fn update<Db: ConnectionTrait>(
        db: &Db,
        filter_params: &[FilterParam],
        patch: E::ActiveModel,
    ) -> Result<u64, DbErr> {
        let condition = FilterUtils::apply_all_filters(filter_params, Self::resolve)?;
        let res = E::update_many()
            .set(patch)
            .filter(condition)
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Deletes matching rows. An empty filter is refused; use [`Self::delete_all`].
    pub async fn delete<Db: ConnectionTrait>(
        db: &Db,
        filter_params: &[FilterParam],
    ) -> Result<u64, DbErr> {
        if filter_params.is_empty() {
            return Err(DbErr::Custom(
                "Refusing to delete without filters. Provide at least one filter param."
                    .to_string(),
            ));
        }
        let condition = FilterUtils::apply_all_filters(filter_params, Self::resolve)?;
        let res = E::delete_many().filter(condition).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_all<Db: ConnectionTrait>(db: &Db) -> Result<u64, DbErr> {
        let res = E::delete_many().exec(db).await?;
        Ok(res.rows_affected)
    }
}
