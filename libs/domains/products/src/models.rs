use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const NAME_MAX_LEN: u64 = 100;
pub const DESCRIPTION_MAX_LEN: u64 = 2000;

/// A persisted product. Its options live in their own table and are
/// removed with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub delivery_price: Decimal,
}

/// A persisted option, owned by the product `product_id` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Wire shape of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String, example = "1299.99")]
    pub price: Decimal,
    #[schema(value_type = String, example = "15.00")]
    pub delivery_price: Decimal,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            delivery_price: product.delivery_price,
        }
    }
}

/// Wire shape of an option; the owning product is implied by the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<ProductOption> for ProductOptionDto {
    fn from(option: ProductOption) -> Self {
        Self {
            id: option.id,
            name: option.name,
            description: option.description,
        }
    }
}

/// Body of product create and update requests.
///
/// `id` may be omitted; one is generated on create and the path id is used
/// on update. Omitted prices are zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(max = NAME_MAX_LEN))]
    pub name: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = String, example = "1299.99")]
    pub price: Decimal,
    #[serde(default)]
    #[schema(value_type = String, example = "15.00")]
    pub delivery_price: Decimal,
}

impl ProductPayload {
    pub fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            delivery_price: self.delivery_price,
        }
    }
}

/// Body of option create and update requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(max = NAME_MAX_LEN))]
    pub name: Option<String>,
    #[validate(length(max = DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,
}

impl ProductOptionPayload {
    pub fn into_option(self, id: Uuid, product_id: Uuid) -> ProductOption {
        ProductOption {
            id,
            product_id,
            name: self.name,
            description: self.description,
        }
    }
}

/// Query string of `SearchByName`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchByName {
    /// Case-insensitive substring of the product name. Absent or empty
    /// matches nothing.
    pub name: Option<String>,
}
