/// Request extractors
///
/// [`ValidatedJson`] deserializes a JSON body and runs its `validator` rules,
/// so handlers receive input that already passed field validation. Both
/// malformed JSON and failed rules become `400 Bad Request` in the standard
/// error shape. [`Path`] and [`Query`] wrap axum's extractors so their
/// rejections use that shape too.
///
/// # Example
///
/// ```no_run
/// use serde::Deserialize;
/// use taskboard_api::extract::ValidatedJson;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct NewLabel {
///     #[validate(length(min = 3, max = 1000))]
///     name: String,
/// }
///
/// async fn create(ValidatedJson(label): ValidatedJson<NewLabel>) -> String {
///     label.name
/// }
/// ```

use async_trait::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

/// JSON body that has passed validation
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Convert body rejections (bad JSON, wrong content type) to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Upper bound for `VARCHAR(255)` columns
pub const MAX_TEXT_LENGTH: usize = 255;

/// URL path parameters with [`ApiError`] rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Query string parameters with [`ApiError`] rejections
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Builds a `ValidationError` carrying a human-readable message
pub fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Collects errors from hand-written `Validate` impls
///
/// ```
/// use taskboard_api::extract::{field_error, ValidationCollector};
///
/// let mut collector = ValidationCollector::default();
/// collector.check("name", "ok".len() >= 3, || field_error("length", "too short"));
/// assert!(collector.finish().is_err());
/// ```
#[derive(Debug, Default)]
pub struct ValidationCollector {
    errors: ValidationErrors,
}

impl ValidationCollector {
    /// Records `error()` against `field` unless `valid` holds
    pub fn check<F>(&mut self, field: &'static str, valid: bool, error: F)
    where
        F: FnOnce() -> ValidationError,
    {
        if !valid {
            self.errors.add(field, error());
        }
    }

    /// Records the outcome of a rule function such as [`not_blank`]
    pub fn record(&mut self, field: &'static str, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.errors.add(field, error);
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.errors().is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Character-count check matching the `length` derive rule
pub fn length_between(value: &str, min: usize, max: Option<usize>) -> bool {
    let len = value.chars().count();
    len >= min && max.map_or(true, |max| len <= max)
}

/// Rejects empty and whitespace-only strings
///
/// Usable both as `#[validate(custom(function = "not_blank"))]` and through
/// [`ValidationCollector::record`].
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(field_error("blank", "must not be blank"))
    } else {
        Ok(())
    }
}
