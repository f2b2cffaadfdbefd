//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, NestedUuidPath, UuidPath, ValidatedJson, ValidatedOptionalJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{
    ProductDto, ProductOptionDto, ProductOptionPayload, ProductPayload, SearchByName,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        search_products_by_name,
        create_product,
        get_product,
        update_product,
        delete_product,
        list_options,
        create_option,
        get_option,
        update_option,
        delete_option,
    ),
    components(
        schemas(ProductDto, ProductPayload, ProductOptionDto, ProductOptionPayload),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Products and their options")
    )
)]
pub struct ApiDoc;

/// Product and option routes, relative to the mount point.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/GetAll", get(list_products))
        .route("/SearchByName", get(search_products_by_name))
        .route("/Create", post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/options", get(list_options).post(create_option))
        .route(
            "/{id}/options/{option_id}",
            get(get_option).put(update_option).delete(delete_option),
        )
        .with_state(shared_service)
}

fn audit<T>(
    headers: &HeaderMap,
    action: &str,
    resource: String,
    result: &ProductResult<T>,
) {
    let event = match result {
        Ok(_) => AuditEvent::new(action, resource, AuditOutcome::Success),
        Err(e) => AuditEvent::new(action, resource, AuditOutcome::Failure)
            .with_details(serde_json::json!({ "error": e.to_string() })),
    };
    event.with_client(headers).log();
}

/// List every product
#[utoipa::path(
    get,
    path = "/GetAll",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<ProductDto>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<ProductDto>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Case-insensitive substring search on product name
#[utoipa::path(
    get,
    path = "/SearchByName",
    tag = "Products",
    params(SearchByName),
    responses(
        (status = 200, description = "Matching products, empty when no name is given", body = Vec<ProductDto>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products_by_name<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<SearchByName>,
) -> ProductResult<Json<Vec<ProductDto>>> {
    let products = service.search_products_by_name(query.name.as_deref()).await?;
    Ok(Json(products))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/Create",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product created"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<ProductPayload>,
) -> ProductResult<StatusCode> {
    let result = service.create_product(input).await;
    let resource = match &result {
        Ok(product) => format!("product:{}", product.id),
        Err(_) => "product".to_string(),
    };
    audit(&headers, "product.create", resource, &result);

    result?;
    Ok(StatusCode::OK)
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductDto>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<ProductPayload>,
) -> ProductResult<StatusCode> {
    let result = service.update_product(id, input).await;
    audit(&headers, "product.update", format!("product:{id}"), &result);

    result?;
    Ok(StatusCode::OK)
}

/// Delete a product and its options
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    headers: HeaderMap,
) -> ProductResult<StatusCode> {
    let result = service.delete_product(id).await;
    audit(&headers, "product.delete", format!("product:{id}"), &result);

    result?;
    Ok(StatusCode::OK)
}

/// List the options of a product
#[utoipa::path(
    get,
    path = "/{id}/options",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Options of the product, empty when it has none", body = Vec<ProductOptionDto>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_options<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(product_id): UuidPath,
) -> ProductResult<Json<Vec<ProductOptionDto>>> {
    let options = service.list_options(product_id).await?;
    Ok(Json(options))
}

/// Add an option to a product
#[utoipa::path(
    post,
    path = "/{id}/options",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductOptionPayload,
    responses(
        (status = 200, description = "Option created"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_option<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(product_id): UuidPath,
    headers: HeaderMap,
    ValidatedOptionalJson(input): ValidatedOptionalJson<ProductOptionPayload>,
) -> ProductResult<StatusCode> {
    let result = service.create_option(product_id, input).await;
    let resource = match &result {
        Ok(option) => format!("product:{product_id}/option:{}", option.id),
        Err(_) => format!("product:{product_id}/option"),
    };
    audit(&headers, "product_option.create", resource, &result);

    result?;
    Ok(StatusCode::OK)
}

/// Get an option by id
#[utoipa::path(
    get,
    path = "/{id}/options/{option_id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID, not used to scope the lookup"),
        ("option_id" = Uuid, Path, description = "Option ID")
    ),
    responses(
        (status = 200, description = "Option found", body = ProductOptionDto),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_option<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    NestedUuidPath(product_id, option_id): NestedUuidPath,
) -> ProductResult<Json<ProductOptionDto>> {
    let option = service.get_option(product_id, option_id).await?;
    Ok(Json(option))
}

/// Replace an option
#[utoipa::path(
    put,
    path = "/{id}/options/{option_id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("option_id" = Uuid, Path, description = "Option ID")
    ),
    request_body = ProductOptionPayload,
    responses(
        (status = 200, description = "Option updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_option<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    NestedUuidPath(product_id, option_id): NestedUuidPath,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<ProductOptionPayload>,
) -> ProductResult<StatusCode> {
    let result = service.update_option(product_id, option_id, input).await;
    audit(
        &headers,
        "product_option.update",
        option_resource(product_id, option_id),
        &result,
    );

    result?;
    Ok(StatusCode::OK)
}

/// Delete an option
#[utoipa::path(
    delete,
    path = "/{id}/options/{option_id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("option_id" = Uuid, Path, description = "Option ID")
    ),
    responses(
        (status = 200, description = "Option deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_option<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    NestedUuidPath(product_id, option_id): NestedUuidPath,
    headers: HeaderMap,
) -> ProductResult<StatusCode> {
    let result = service.delete_option(option_id).await;
    audit(
        &headers,
        "product_option.delete",
        option_resource(product_id, option_id),
        &result,
    );

    result?;
    Ok(StatusCode::OK)
}

fn option_resource(product_id: Uuid, option_id: Uuid) -> String {
    format!("product:{product_id}/option:{option_id}")
}
