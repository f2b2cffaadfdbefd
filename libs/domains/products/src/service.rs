use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{ProductDto, ProductOptionDto, ProductOptionPayload, ProductPayload};
use crate::repository::ProductRepository;

/// Product and option use cases on top of a [`ProductRepository`].
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_products(&self) -> ProductResult<Vec<ProductDto>> {
        let products = self.repository.list_products().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// An absent or empty name matches nothing and skips the store entirely.
    pub async fn search_products_by_name(
        &self,
        name: Option<&str>,
    ) -> ProductResult<Vec<ProductDto>> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(Vec::new());
        };

        let products = self.repository.search_products_by_name(name).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn get_product(&self, id: Uuid) -> ProductResult<ProductDto> {
        self.repository
            .find_product(id)
            .await?
            .map(ProductDto::from)
            .ok_or(ProductError::ProductNotFound(id))
    }

    /// Inserts as given; a duplicate id surfaces as a storage error.
    pub async fn create_product(&self, input: ProductPayload) -> ProductResult<ProductDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let id = input.id.unwrap_or_else(Uuid::now_v7);
        let product = self.repository.insert_product(input.into_product(id)).await?;
        Ok(product.into())
    }

    /// Full replace of an existing product. The path id wins; a differing
    /// body id is rejected.
    pub async fn update_product(&self, id: Uuid, input: ProductPayload) -> ProductResult<ProductDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;
        ensure_same_id(id, input.id)?;

        if !self.repository.product_exists(id).await? {
            return Err(ProductError::ProductNotFound(id));
        }

        let product = input.into_product(id);
        let affected = self.repository.update_product(product.clone()).await?;
        if affected != 1 {
            return Err(ProductError::NoRecordsUpdated);
        }

        Ok(product.into())
    }

    /// Options are removed by the storage cascade.
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.product_exists(id).await? {
            return Err(ProductError::ProductNotFound(id));
        }

        self.repository.delete_product(id).await?;
        Ok(())
    }

    pub async fn list_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOptionDto>> {
        let options = self.repository.list_options(product_id).await?;
        Ok(options.into_iter().map(ProductOptionDto::from).collect())
    }

    /// Looks the option up by its own id; `_product_id` does not scope the
    /// lookup.
    pub async fn get_option(&self, _product_id: Uuid, id: Uuid) -> ProductResult<ProductOptionDto> {
        self.repository
            .find_option(id)
            .await?
            .map(ProductOptionDto::from)
            .ok_or(ProductError::OptionNotFound(id))
    }

    /// A `null` payload is reported as not found, as is a missing parent.
    pub async fn create_option(
        &self,
        product_id: Uuid,
        input: Option<ProductOptionPayload>,
    ) -> ProductResult<ProductOptionDto> {
        let input = input.ok_or(ProductError::MissingOptionPayload)?;
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        if !self.repository.product_exists(product_id).await? {
            return Err(ProductError::ProductNotFound(product_id));
        }

        let id = input.id.unwrap_or_else(Uuid::now_v7);
        if self
            .repository
            .option_exists_for_product(product_id, id)
            .await?
        {
            return Err(ProductError::DuplicateOption(id));
        }

        let option = self
            .repository
            .insert_option(input.into_option(id, product_id))
            .await?;
        Ok(option.into())
    }

    /// Full replace with no existence pre-check; zero affected rows is an
    /// error.
    pub async fn update_option(
        &self,
        product_id: Uuid,
        id: Uuid,
        input: ProductOptionPayload,
    ) -> ProductResult<ProductOptionDto> {
        input
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;
        ensure_same_id(id, input.id)?;

        let option = input.into_option(id, product_id);
        let affected = self.repository.update_option(option.clone()).await?;
        if affected != 1 {
            return Err(ProductError::NoRecordsUpdated);
        }

        Ok(option.into())
    }

    pub async fn delete_option(&self, id: Uuid) -> ProductResult<()> {
        if self.repository.find_option(id).await?.is_none() {
            return Err(ProductError::OptionNotFound(id));
        }

        let affected = self.repository.delete_option(id).await?;
        if affected != 1 {
            return Err(ProductError::NoRecordsUpdated);
        }

        Ok(())
    }
}

fn ensure_same_id(path: Uuid, body: Option<Uuid>) -> ProductResult<()> {
    match body {
        Some(body) if body != path => Err(ProductError::IdMismatch { path, body }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, ProductOption};
    use crate::repository::MockProductRepository;
    use mockall::predicate;
    use rust_decimal::Decimal;

    fn product(id: Uuid, name: &str) -> Product {
        Product {
            id,
            name: Some(name.to_string()),
            description: Some(format!("{name} description")),
            price: Decimal::new(129_999, 2),
            delivery_price: Decimal::new(1_500, 2),
        }
    }

    fn payload(name: &str) -> ProductPayload {
        ProductPayload {
            name: Some(name.to_string()),
            price: Decimal::new(129_999, 2),
            delivery_price: Decimal::new(1_500, 2),
            ..Default::default()
        }
    }

    fn option_payload(id: Option<Uuid>, name: &str) -> ProductOptionPayload {
        ProductOptionPayload {
            id,
            name: Some(name.to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_search_without_name_skips_repository() {
        let mock_repo = MockProductRepository::new();
        let service = ProductService::new(mock_repo);

        assert!(service.search_products_by_name(None).await.unwrap().is_empty());
        assert!(service.search_products_by_name(Some("")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_name_through() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_search_products_by_name()
            .with(predicate::function(|needle: &str| needle == "computer"))
            .times(1)
            .returning(move |_| Ok(vec![product(id, "Computer")]));

        let service = ProductService::new(mock_repo);
        let found = service.search_products_by_name(Some("computer")).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_deref(), Some("Computer"));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_find_product()
            .with(predicate::eq(id))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);

        assert!(matches!(
            service.get_product(id).await,
            Err(ProductError::ProductNotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_create_product_keeps_caller_id() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_insert_product()
            .withf(move |p| p.id == id && p.name.as_deref() == Some("Computer"))
            .returning(Ok);

        let service = ProductService::new(mock_repo);
        let created = service
            .create_product(ProductPayload {
                id: Some(id),
                ..payload("Computer")
            })
            .await
            .unwrap();

        assert_eq!(created.id, id);
        assert_eq!(created.price, Decimal::new(129_999, 2));
    }

    #[tokio::test]
    async fn test_create_product_generates_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_insert_product()
            .withf(|p| !p.id.is_nil())
            .returning(Ok);

        let service = ProductService::new(mock_repo);
        assert!(service.create_product(payload("Monitor")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_product_validation_error() {
        let mock_repo = MockProductRepository::new();
        let service = ProductService::new(mock_repo);

        let result = service
            .create_product(payload(&"x".repeat(101)))
            .await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_product_does_not_write() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_product_exists()
            .with(predicate::eq(id))
            .returning(|_| Ok(false));
        mock_repo.expect_update_product().never();

        let service = ProductService::new(mock_repo);

        assert!(matches!(
            service.update_product(id, payload("Ghost")).await,
            Err(ProductError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_requires_exactly_one_row() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo.expect_product_exists().returning(|_| Ok(true));
        mock_repo
            .expect_update_product()
            .withf(move |p| p.id == id)
            .returning(|_| Ok(0));

        let service = ProductService::new(mock_repo);

        assert!(matches!(
            service.update_product(id, payload("Computer")).await,
            Err(ProductError::NoRecordsUpdated)
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_body_id() {
        let mock_repo = MockProductRepository::new();
        let service = ProductService::new(mock_repo);
        let path = Uuid::now_v7();

        let result = service
            .update_product(
                path,
                ProductPayload {
                    id: Some(Uuid::now_v7()),
                    ..payload("Computer")
                },
            )
            .await;

        assert!(matches!(result, Err(ProductError::IdMismatch { .. })));
    }

    #[tokio::test]
    async fn test_update_product_success() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();

        mock_repo.expect_product_exists().returning(|_| Ok(true));
        mock_repo.expect_update_product().times(1).returning(|_| Ok(1));

        let service = ProductService::new(mock_repo);
        let updated = service
            .update_product(
                id,
                ProductPayload {
                    id: Some(id),
                    ..payload("Renamed")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_product_exists().returning(|_| Ok(false));
        mock_repo.expect_delete_product().never();

        let service = ProductService::new(mock_repo);

        assert!(matches!(
            service.delete_product(Uuid::now_v7()).await,
            Err(ProductError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_option_ignores_product_segment() {
        let mut mock_repo = MockProductRepository::new();
        let owner = Uuid::now_v7();
        let option_id = Uuid::now_v7();

        mock_repo
            .expect_find_option()
            .with(predicate::eq(option_id))
            .returning(move |id| {
                Ok(Some(ProductOption {
                    id,
                    product_id: owner,
                    name: Some("Black".into()),
                    description: None,
                }))
            });

        let service = ProductService::new(mock_repo);
        let unrelated_product = Uuid::now_v7();
        let option = service.get_option(unrelated_product, option_id).await.unwrap();

        assert_eq!(option.id, option_id);
    }

    #[tokio::test]
    async fn test_create_option_null_payload_is_not_found() {
        let mock_repo = MockProductRepository::new();
        let service = ProductService::new(mock_repo);

        assert!(matches!(
            service.create_option(Uuid::now_v7(), None).await,
            Err(ProductError::MissingOptionPayload)
        ));
    }

    #[tokio::test]
    async fn test_create_option_missing_parent_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_product_exists().returning(|_| Ok(false));
        mock_repo.expect_insert_option().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .create_option(Uuid::now_v7(), Some(option_payload(None, "Black")))
            .await;

        assert!(matches!(result, Err(ProductError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_option_duplicate_is_conflict() {
        let mut mock_repo = MockProductRepository::new();
        let product_id = Uuid::now_v7();
        let option_id = Uuid::now_v7();

        mock_repo.expect_product_exists().returning(|_| Ok(true));
        mock_repo
            .expect_option_exists_for_product()
            .with(predicate::eq(product_id), predicate::eq(option_id))
            .returning(|_, _| Ok(true));
        mock_repo.expect_insert_option().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .create_option(product_id, Some(option_payload(Some(option_id), "Black")))
            .await;

        assert!(matches!(result, Err(ProductError::DuplicateOption(id)) if id == option_id));
    }

    #[tokio::test]
    async fn test_create_option_attaches_to_product() {
        let mut mock_repo = MockProductRepository::new();
        let product_id = Uuid::now_v7();

        mock_repo.expect_product_exists().returning(|_| Ok(true));
        mock_repo
            .expect_option_exists_for_product()
            .returning(|_, _| Ok(false));
        mock_repo
            .expect_insert_option()
            .withf(move |o| o.product_id == product_id)
            .returning(Ok);

        let service = ProductService::new(mock_repo);
        let created = service
            .create_option(product_id, Some(option_payload(None, "Black")))
            .await
            .unwrap();

        assert_eq!(created.name.as_deref(), Some("Black"));
    }

    #[tokio::test]
    async fn test_update_option_without_row_fails() {
        let mut mock_repo = MockProductRepository::new();
        let product_id = Uuid::now_v7();
        let option_id = Uuid::now_v7();

        mock_repo
            .expect_update_option()
            .withf(move |o| o.id == option_id && o.product_id == product_id)
            .returning(|_| Ok(0));

        let service = ProductService::new(mock_repo);
        let result = service
            .update_option(product_id, option_id, option_payload(None, "Black"))
            .await;

        assert!(matches!(result, Err(ProductError::NoRecordsUpdated)));
    }

    #[tokio::test]
    async fn test_delete_missing_option_does_not_write() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_find_option().returning(|_| Ok(None));
        mock_repo.expect_delete_option().never();

        let service = ProductService::new(mock_repo);

        assert!(matches!(
            service.delete_option(Uuid::now_v7()).await,
            Err(ProductError::OptionNotFound(_))
        ));
    }
}
