//! Write-mostly forms: business inquiries, contributions and newsletter signups.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use super::{json_body, AppState};
use crate::error::AppError;
use crate::metrics;
use crate::models::marketplace::{
    BusinessInquiry, Contribution, NewBusinessInquiry, NewContribution, NewNewsletterSubscriber,
    NewsletterSubscriber,
};

fn require_email(field: &str, email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Validation(format!(
            "{}: Please enter a valid email address",
            field
        ))),
    }
}

/// Handle POST /api/business-inquiries
pub async fn create_inquiry(
    State(state): State<AppState>,
    payload: Result<Json<NewBusinessInquiry>, JsonRejection>,
) -> Result<(StatusCode, Json<BusinessInquiry>), AppError> {
    let inquiry = json_body(payload)?;
    require_email("email", &inquiry.email)?;
    if inquiry.company_name.trim().is_empty() {
        return Err(AppError::Validation(
            "companyName: Company name is required".to_string(),
        ));
    }

    let inquiry = state.storage.create_inquiry(inquiry);
    metrics::record_created("business_inquiry");
    Ok((StatusCode::CREATED, Json(inquiry)))
}

/// Handle GET /api/business-inquiries
pub async fn list_inquiries(State(state): State<AppState>) -> Json<Vec<BusinessInquiry>> {
    Json(state.storage.list_inquiries())
}

/// Handle POST /api/contributions
pub async fn create_contribution(
    State(state): State<AppState>,
    payload: Result<Json<NewContribution>, JsonRejection>,
) -> Result<(StatusCode, Json<Contribution>), AppError> {
    let contribution = json_body(payload)?;
    require_email("contactEmail", &contribution.contact_email)?;

    let contribution = state.storage.create_contribution(contribution);
    metrics::record_created("contribution");
    Ok((StatusCode::CREATED, Json(contribution)))
}

/// Handle GET /api/contributions
pub async fn list_contributions(State(state): State<AppState>) -> Json<Vec<Contribution>> {
    Json(state.storage.list_contributions())
}

/// Handle POST /api/newsletter
pub async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<NewNewsletterSubscriber>, JsonRejection>,
) -> Result<Json<NewsletterSubscriber>, AppError> {
    let subscriber = json_body(payload)?;
    require_email("email", &subscriber.email)?;

    let subscriber = state.storage.subscribe(subscriber);
    metrics::record_created("newsletter_subscriber");
    Ok(Json(subscriber))
}
