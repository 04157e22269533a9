//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::Deserialize;

use super::error::ApiError;
use crate::models::{Customer, CustomerId, ValidationError};

/// Extract and validate a customer from a JSON body
pub struct ValidCustomer(pub Customer);

impl<S> FromRequest<S> for ValidCustomer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(customer) = Json::<Customer>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: rejection.body_text(),
                })
            })?;

        customer.validate()?;
        Ok(Self(customer))
    }
}

#[derive(Deserialize)]
struct CustomerIdParams {
    customer_id: String,
}

/// Extract and validate `?customer_id=` from the query string
pub struct CustomerIdQuery(pub CustomerId);

impl<S> FromRequestParts<S> for CustomerIdQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<CustomerIdParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::Malformed {
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(CustomerId::new(&params.customer_id)?))
    }
}
