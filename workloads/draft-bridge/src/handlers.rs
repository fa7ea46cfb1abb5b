//! Route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use draft_commerce::discount::build_legacy_draft;
use draft_commerce::draft::{DraftConfirmation, DraftOrderBody};
use draft_commerce::quote::{QuoteMetadata, QuoteNormalizer};
use draft_observability::{Alert, RequestId, RequestLogger, REQUEST_ID_HEADER};

use crate::error::ApiError;
use crate::payload::{CheckoutResponse, LegacyPayload, QuotePayload};
use crate::state::AppState;

pub const ROUTE_PING: &str = "/ping";
pub const ROUTE_CREATE_DRAFT: &str = "/create-draft";
pub const ROUTE_CREATE_DRAFT_FROM_METHOD: &str = "/create-draft-from-method";

/// `GET /ping`
pub async fn ping() -> &'static str {
    "pong"
}

/// `POST /create-draft`: cart lines priced by their product's percentage tag.
pub async fn create_draft(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<LegacyPayload>, JsonRejection>,
) -> Response {
    let logger = request_logger(&headers, ROUTE_CREATE_DRAFT);

    let result = async {
        let Json(payload) = payload?;
        logger.info(&format!("received {} cart items", payload.items.len()));
        let body = build_legacy_draft(state.catalog.as_ref(), &payload.items).await?;
        submit(&state, &logger, &body).await
    }
    .await;

    respond(&state, &logger, result)
}

/// `POST /create-draft-from-method`: quote rows normalized by SKU.
pub async fn create_draft_from_method(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QuotePayload>, JsonRejection>,
) -> Response {
    let logger = request_logger(&headers, ROUTE_CREATE_DRAFT_FROM_METHOD);

    let result = async {
        let Json(payload) = payload?;
        let metadata = QuoteMetadata::from_entries(&payload.quote_info);
        logger.info(&format!(
            "received {} quote rows (quote {})",
            payload.product_list.len(),
            metadata.quote_number.as_deref().unwrap_or("-")
        ));

        let quote = QuoteNormalizer::new(state.catalog.as_ref())
            .normalize(&payload.product_list, &metadata)
            .await?;
        logger.debug(&format!(
            "normalized into {} line items, tax_exempt={}",
            quote.line_items.len(),
            quote.tax_exempt
        ));

        let body = quote.into_draft_order(state.quote_note.clone());
        submit(&state, &logger, &body).await
    }
    .await;

    respond(&state, &logger, result)
}

fn request_logger(headers: &HeaderMap, route: &'static str) -> RequestLogger {
    let supplied = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    RequestLogger::new(RequestId::from_header(supplied), route)
}

async fn submit(
    state: &AppState,
    logger: &RequestLogger,
    body: &DraftOrderBody,
) -> Result<DraftConfirmation, ApiError> {
    let confirmation = state.orders.submit(body).await?;
    logger.info(&format!(
        "draft order {} created",
        confirmation
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    Ok(confirmation)
}

/// Turn the outcome into a response, raising one alert for shop-side and
/// internal failures.
fn respond(
    state: &AppState,
    logger: &RequestLogger,
    result: Result<DraftConfirmation, ApiError>,
) -> Response {
    let mut response = match result {
        Ok(confirmation) => Json(CheckoutResponse {
            checkout_url: confirmation.invoice_url,
        })
        .into_response(),
        Err(error) => {
            if error.should_alert() {
                logger.error(&error.to_string());
                let alert = Alert::new(
                    "Draft order creation failed",
                    format!(
                        "route: {}\nrequest: {}\nerror: {}",
                        logger.route(),
                        logger.request_id(),
                        error
                    ),
                )
                .with_request_id(logger.request_id());
                state.alerts.fire(alert);
            } else {
                logger.warn(&error.to_string());
            }
            error.into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(logger.request_id().as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
