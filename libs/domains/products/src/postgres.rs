use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::entity::{product, product_option};
use crate::error::ProductResult;
use crate::models::{Product, ProductOption};
use crate::repository::ProductRepository;

/// [`ProductRepository`] backed by the `products` and `product_options`
/// tables.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `%needle%` with LIKE wildcards in the needle escaped, lowercased.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list_products(&self) -> ProductResult<Vec<Product>> {
        let models = product::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn search_products_by_name(&self, needle: &str) -> ProductResult<Vec<Product>> {
        let lowered_name = Expr::expr(Func::lower(Expr::col(product::Column::Name)));

        let models = product::Entity::find()
            .filter(product::Column::Name.is_not_null())
            .filter(lowered_name.like(LikeExpr::new(contains_pattern(needle)).escape('\\')))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = product::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn product_exists(&self, id: Uuid) -> ProductResult<bool> {
        let count = product::Entity::find()
            .filter(product::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert_product(&self, product: Product) -> ProductResult<Product> {
        let active_model: product::ActiveModel = product.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn update_product(&self, product: Product) -> ProductResult<u64> {
        let id = product.id;
        let active_model: product::ActiveModel = product.into();

        let result = product::Entity::update_many()
            .set(active_model)
            .filter(product::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        tracing::info!(product_id = %id, rows = result.rows_affected, "Updated product");
        Ok(result.rows_affected)
    }

    async fn delete_product(&self, id: Uuid) -> ProductResult<u64> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;

        tracing::info!(product_id = %id, rows = result.rows_affected, "Deleted product");
        Ok(result.rows_affected)
    }

    async fn list_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>> {
        let models = product_option::Entity::find()
            .filter(product_option::Column::ProductId.eq(product_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ProductOption::from).collect())
    }

    async fn find_option(&self, id: Uuid) -> ProductResult<Option<ProductOption>> {
        let model = product_option::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(ProductOption::from))
    }

    async fn option_exists_for_product(&self, product_id: Uuid, id: Uuid) -> ProductResult<bool> {
        let count = product_option::Entity::find()
            .filter(product_option::Column::Id.eq(id))
            .filter(product_option::Column::ProductId.eq(product_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn insert_option(&self, option: ProductOption) -> ProductResult<ProductOption> {
        let active_model: product_option::ActiveModel = option.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(option_id = %model.id, product_id = %model.product_id, "Created product option");
        Ok(model.into())
    }

    async fn update_option(&self, option: ProductOption) -> ProductResult<u64> {
        let id = option.id;
        let active_model: product_option::ActiveModel = option.into();

        let result = product_option::Entity::update_many()
            .set(active_model)
            .filter(product_option::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        tracing::info!(option_id = %id, rows = result.rows_affected, "Updated product option");
        Ok(result.rows_affected)
    }

    async fn delete_option(&self, id: Uuid) -> ProductResult<u64> {
        let result = product_option::Entity::delete_by_id(id).exec(&self.db).await?;

        tracing::info!(option_id = %id, rows = result.rows_affected, "Deleted product option");
        Ok(result.rows_affected)
    }
}
