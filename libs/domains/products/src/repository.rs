use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductOption};

/// Persistence for products and their options.
///
/// Update and delete return the number of affected rows; the service turns
/// anything other than one into an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_products(&self) -> ProductResult<Vec<Product>>;

    /// Products whose non-null name contains `needle`, ignoring case.
    async fn search_products_by_name(&self, needle: &str) -> ProductResult<Vec<Product>>;

    async fn find_product(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn product_exists(&self, id: Uuid) -> ProductResult<bool>;

    async fn insert_product(&self, product: Product) -> ProductResult<Product>;

    /// Replace every column of the row with `product.id`.
    async fn update_product(&self, product: Product) -> ProductResult<u64>;

    /// Delete the product; its options go with it.
    async fn delete_product(&self, id: Uuid) -> ProductResult<u64>;

    async fn list_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>>;

    async fn find_option(&self, id: Uuid) -> ProductResult<Option<ProductOption>>;

    async fn option_exists_for_product(&self, product_id: Uuid, id: Uuid) -> ProductResult<bool>;

    async fn insert_option(&self, option: ProductOption) -> ProductResult<ProductOption>;

    /// Replace every column of the row with `option.id`.
    async fn update_option(&self, option: ProductOption) -> ProductResult<u64>;

    async fn delete_option(&self, id: Uuid) -> ProductResult<u64>;
}

#[derive(Debug, Default)]
struct Store {
    products: HashMap<Uuid, Product>,
    options: HashMap<Uuid, ProductOption>,
}

/// In-memory store for tests and local runs.
///
/// Enforces the same keys as the schema: unique ids, options must reference
/// an existing product, and deleting a product cascades to its options.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_products(&self) -> ProductResult<Vec<Product>> {
        let store = self.store.read().await;
        Ok(store.products.values().cloned().collect())
    }

    async fn search_products_by_name(&self, needle: &str) -> ProductResult<Vec<Product>> {
        let needle = needle.to_lowercase();
        let store = self.store.read().await;

        Ok(store
            .products
            .values()
            .filter(|p| {
                p.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn find_product(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn product_exists(&self, id: Uuid) -> ProductResult<bool> {
        let store = self.store.read().await;
        Ok(store.products.contains_key(&id))
    }

    async fn insert_product(&self, product: Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;

        if store.products.contains_key(&product.id) {
            return Err(ProductError::Internal(format!(
                "duplicate key: product {} already exists",
                product.id
            )));
        }

        store.products.insert(product.id, product.clone());
        tracing::info!(product_id = %product.id, "Inserted product");
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> ProductResult<u64> {
        let mut store = self.store.write().await;

        match store.products.get_mut(&product.id) {
            Some(existing) => {
                tracing::info!(product_id = %product.id, "Updated product");
                *existing = product;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_product(&self, id: Uuid) -> ProductResult<u64> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_none() {
            return Ok(0);
        }
        store.options.retain(|_, o| o.product_id != id);

        tracing::info!(product_id = %id, "Deleted product and its options");
        Ok(1)
    }

    async fn list_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>> {
        let store = self.store.read().await;
        Ok(store
            .options
            .values()
            .filter(|o| o.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn find_option(&self, id: Uuid) -> ProductResult<Option<ProductOption>> {
        let store = self.store.read().await;
        Ok(store.options.get(&id).cloned())
    }

    async fn option_exists_for_product(&self, product_id: Uuid, id: Uuid) -> ProductResult<bool> {
        let store = self.store.read().await;
        Ok(store
            .options
            .get(&id)
            .is_some_and(|o| o.product_id == product_id))
    }

    async fn insert_option(&self, option: ProductOption) -> ProductResult<ProductOption> {
        let mut store = self.store.write().await;

        if !store.products.contains_key(&option.product_id) {
            return Err(ProductError::Internal(format!(
                "foreign key violation: product {} does not exist",
                option.product_id
            )));
        }
        if store.options.contains_key(&option.id) {
            return Err(ProductError::Internal(format!(
                "duplicate key: product option {} already exists",
                option.id
            )));
        }

        store.options.insert(option.id, option.clone());
        tracing::info!(product_id = %option.product_id, option_id = %option.id, "Inserted product option");
        Ok(option)
    }

    async fn update_option(&self, option: ProductOption) -> ProductResult<u64> {
        let mut store = self.store.write().await;

        if !store.products.contains_key(&option.product_id) {
            return Err(ProductError::Internal(format!(
                "foreign key violation: product {} does not exist",
                option.product_id
            )));
        }

        match store.options.get_mut(&option.id) {
            Some(existing) => {
                tracing::info!(option_id = %option.id, "Updated product option");
                *existing = option;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_option(&self, id: Uuid) -> ProductResult<u64> {
        let mut store = self.store.write().await;

        match store.options.remove(&id) {
            Some(_) => {
                tracing::info!(option_id = %id, "Deleted product option");
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: Option<&str>) -> Product {
        Product {
            id: Uuid::now_v7(),
            name: name.map(str::to_string),
            description: None,
            price: Decimal::new(10000, 2),
            delivery_price: Decimal::new(500, 2),
        }
    }

    fn option_for(product_id: Uuid, name: &str) -> ProductOption {
        ProductOption {
            id: Uuid::now_v7(),
            product_id,
            name: Some(name.to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_product() {
        let repo = InMemoryProductRepository::new();
        let computer = product(Some("Computer"));

        repo.insert_product(computer.clone()).await.unwrap();

        assert_eq!(repo.find_product(computer.id).await.unwrap(), Some(computer.clone()));
        assert!(repo.product_exists(computer.id).await.unwrap());
        assert!(repo.insert_product(computer).await.is_err());
    }

    #[tokio::test]
    async fn test_search_ignores_case_and_null_names() {
        let repo = InMemoryProductRepository::new();
        repo.insert_product(product(Some("Gaming Computer"))).await.unwrap();
        repo.insert_product(product(Some("Monitor"))).await.unwrap();
        repo.insert_product(product(None)).await.unwrap();

        let found = repo.search_products_by_name("COMPUTER").await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_deref(), Some("Gaming Computer"));
        assert_eq!(repo.search_products_by_name("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_product_affects_nothing() {
        let repo = InMemoryProductRepository::new();
        assert_eq!(repo.update_product(product(Some("Ghost"))).await.unwrap(), 0);
        assert!(repo.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_product_cascades_to_options() {
        let repo = InMemoryProductRepository::new();
        let keep = product(Some("Keep"));
        let drop = product(Some("Drop"));
        repo.insert_product(keep.clone()).await.unwrap();
        repo.insert_product(drop.clone()).await.unwrap();
        let kept_option = repo.insert_option(option_for(keep.id, "Black")).await.unwrap();
        let dropped_option = repo.insert_option(option_for(drop.id, "White")).await.unwrap();

        assert_eq!(repo.delete_product(drop.id).await.unwrap(), 1);

        assert!(repo.find_option(dropped_option.id).await.unwrap().is_none());
        assert_eq!(repo.find_option(kept_option.id).await.unwrap(), Some(kept_option));
        assert_eq!(repo.delete_product(drop.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_options_are_scoped_to_product() {
        let repo = InMemoryProductRepository::new();
        let first = product(Some("First"));
        let second = product(Some("Second"));
        repo.insert_product(first.clone()).await.unwrap();
        repo.insert_product(second.clone()).await.unwrap();
        let x = repo.insert_option(option_for(first.id, "X")).await.unwrap();
        repo.insert_option(option_for(second.id, "Y")).await.unwrap();

        assert_eq!(repo.list_options(first.id).await.unwrap(), vec![x.clone()]);
        assert!(repo.option_exists_for_product(first.id, x.id).await.unwrap());
        assert!(!repo.option_exists_for_product(second.id, x.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_option_requires_parent() {
        let repo = InMemoryProductRepository::new();
        let orphan = option_for(Uuid::now_v7(), "Orphan");

        assert!(matches!(
            repo.insert_option(orphan).await,
            Err(ProductError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_option_report_rows() {
        let repo = InMemoryProductRepository::new();
        let parent = product(Some("Parent"));
        repo.insert_product(parent.clone()).await.unwrap();
        let mut option = repo.insert_option(option_for(parent.id, "Old")).await.unwrap();

        option.name = Some("New".into());
        assert_eq!(repo.update_option(option.clone()).await.unwrap(), 1);
        assert_eq!(repo.find_option(option.id).await.unwrap(), Some(option.clone()));

        assert_eq!(repo.delete_option(option.id).await.unwrap(), 1);
        assert_eq!(repo.delete_option(option.id).await.unwrap(), 0);
        assert_eq!(repo.update_option(option).await.unwrap(), 0);
    }
}
