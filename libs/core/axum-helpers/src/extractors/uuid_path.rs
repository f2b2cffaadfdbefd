//! UUID path parameters with JSON 400 rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

fn parse_uuid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidUuid(raw.to_string()))
}

/// A single UUID path segment, e.g. `/{id}`.
///
/// ```ignore
/// async fn get_product(UuidPath(id): UuidPath) -> String {
///     format!("Product {id}")
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        parse_uuid(&raw).map(UuidPath)
    }
}

/// Parent and child UUIDs, in route order, e.g. `/{id}/options/{option_id}`.
#[derive(Debug, Clone, Copy)]
pub struct NestedUuidPath(pub Uuid, pub Uuid);

impl<S> FromRequestParts<S> for NestedUuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((parent, child)) = Path::<(String, String)>::from_request_parts(parts, state).await?;
        Ok(NestedUuidPath(parse_uuid(&parent)?, parse_uuid(&child)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/{id}", get(|UuidPath(id): UuidPath| async move { id.to_string() }))
            .route(
                "/{id}/children/{child_id}",
                get(|NestedUuidPath(parent, child): NestedUuidPath| async move {
                    format!("{parent}/{child}")
                }),
            )
    }

    async fn status_of(uri: &str) -> StatusCode {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_valid_uuids_are_extracted() {
        let id = Uuid::now_v7();
        assert_eq!(status_of(&format!("/{id}")).await, StatusCode::OK);
        assert_eq!(
            status_of(&format!("/{id}/children/{}", Uuid::new_v4())).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_invalid_uuid_is_bad_request() {
        assert_eq!(status_of("/not-a-uuid").await, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(&format!("/{}/children/nope", Uuid::new_v4())).await,
            StatusCode::BAD_REQUEST
        );
    }
}
