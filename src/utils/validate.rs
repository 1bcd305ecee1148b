//! Request extractors whose rejections are `AppError`s.
//!
//! Rejections from the wrapped axum extractors are converted with the
//! `From` impls in `api::middleware::error_handler`, so malformed input
//! always produces the standard error body.

use crate::error::{AppError, AppResult};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that must also pass `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// JSON body validated later by the service layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Query string that must also pass `validator` rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::from(e))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

/// Path parameters with an `AppError` rejection.
#[derive(Debug, Clone, Copy)]
pub struct PathParam<T>(pub T);

impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| AppError::from(e))?;
        Ok(PathParam(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct SignupBody {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
        #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
        password: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct PageQuery {
        #[validate(range(min = 1, message = "Page must be at least 1"))]
        page: Option<u32>,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let request = json_request(
            r#"{"name":"Jane","email":"jane@example.com","password":"secret1"}"#,
        );

        let ValidatedJson(body) = ValidatedJson::<SignupBody>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(body.name, "Jane");
        assert_eq!(body.email, "jane@example.com");
        assert_eq!(body.password, "secret1");
    }

    #[tokio::test]
    async fn test_validation_errors_cover_every_field() {
        let request = json_request(r#"{"name":"","email":"nope","password":"123"}"#);

        let error = ValidatedJson::<SignupBody>::from_request(request, &())
            .await
            .unwrap_err();
        match error {
            AppError::ValidationErrors { errors } => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "name", "password"]);
                assert_eq!(errors[1].message, "Name is required");
            }
            _ => panic!("Expected ValidationErrors error, got {:?}", error),
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let request = json_request(r#"{"name":"Jane","email":"jane@example.com"}"#);

        let error = ValidatedJson::<SignupBody>::from_request(request, &())
            .await
            .unwrap_err();
        match error {
            AppError::BadRequest { message } => assert!(!message.is_empty()),
            _ => panic!("Expected BadRequest error, got {:?}", error),
        }
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("name=Jane"))
            .unwrap();

        let error = JsonBody::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_json_body_skips_validation() {
        let request = json_request(r#"{"name":"","email":"nope","password":"1"}"#);

        let JsonBody(body) = JsonBody::<SignupBody>::from_request(request, &())
            .await
            .unwrap();
        assert!(body.name.is_empty());
    }

    #[tokio::test]
    async fn test_validated_query() {
        let (mut parts, _) = Request::builder()
            .uri("/api/meetups?page=2")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let ValidatedQuery(query) = ValidatedQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query.page, Some(2));

        let (mut parts, _) = Request::builder()
            .uri("/api/meetups?page=0")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let error = ValidatedQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::ValidationErrors { .. }));

        let (mut parts, _) = Request::builder()
            .uri("/api/meetups?page=abc")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let error = ValidatedQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::BadRequest { .. }));
    }
}
