//! Customer endpoints
//!
//! | Method | Path                        | Response                 |
//! |--------|-----------------------------|--------------------------|
//! | POST   | /customers                  | stored row               |
//! | GET    | /customers?customer_id=ID   | row or 404               |
//! | GET    | /allcustomers               | array of rows            |
//! | PUT    | /customers                  | updated row or 404       |
//! | DELETE | /customers?customer_id=ID   | acknowledgement          |

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::CustomerRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{CustomerIdQuery, ValidCustomer};
use crate::models::Customer;
use crate::state::AppState;

/// Delete acknowledgement
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub customer_id: String,
    pub status: &'static str,
}

/// POST /customers - insert, then return the stored row
async fn create_customer(
    State(state): State<AppState>,
    ValidCustomer(customer): ValidCustomer,
) -> Result<Json<Customer>, ApiError> {
    let created = CustomerRepo::new(state.executor()).create(&customer).await?;
    tracing::info!(customer_id = %created.customer_id, "customer created");
    Ok(Json(created))
}

/// GET /customers?customer_id=ID
async fn get_customer(
    State(state): State<AppState>,
    CustomerIdQuery(id): CustomerIdQuery,
) -> Result<Json<Customer>, ApiError> {
    let customer = CustomerRepo::new(state.executor()).get(id.as_str()).await?;
    Ok(Json(customer))
}

/// GET /allcustomers - empty table yields `[]`
async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = CustomerRepo::new(state.executor()).list().await?;
    Ok(Json(customers))
}

/// PUT /customers - overwrite name/age/gender of an existing id
async fn update_customer(
    State(state): State<AppState>,
    ValidCustomer(customer): ValidCustomer,
) -> Result<Json<Customer>, ApiError> {
    let updated = CustomerRepo::new(state.executor()).update(&customer).await?;
    tracing::info!(customer_id = %updated.customer_id, "customer updated");
    Ok(Json(updated))
}

/// DELETE /customers?customer_id=ID - acknowledged even if absent
async fn delete_customer(
    State(state): State<AppState>,
    CustomerIdQuery(id): CustomerIdQuery,
) -> Result<Json<DeleteResponse>, ApiError> {
    CustomerRepo::new(state.executor()).delete(id.as_str()).await?;
    tracing::info!(customer_id = %id.as_str(), "customer deleted");

    Ok(Json(DeleteResponse {
        customer_id: id.into_string(),
        status: "deleted",
    }))
}

/// Customer routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            get(get_customer)
                .post(create_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
        .route("/allcustomers", get(list_customers))
}
