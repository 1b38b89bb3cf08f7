use std::sync::Arc;

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use utoipa::OpenApi;

use crate::api::problem::{Problem, ValidationViolation};
use crate::api::rest::dto::{
    AddressDto, CreateCustomerReq, CreateInvoiceItemReq, CreateInvoiceReq, CustomerDto,
    InvoiceDetailDto, InvoiceDto, InvoiceItemDto, ProductDto,
};
use crate::api::rest::handlers;
use crate::domain::service::InvoicingService;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Invoicing API",
        description = "Customers, their addresses and their invoice archive"
    ),
    paths(
        handlers::list_customers,
        handlers::create_customer,
        handlers::list_customer_addresses,
        handlers::list_customer_invoices,
        handlers::get_invoice,
        handlers::create_invoice,
    ),
    components(schemas(
        CustomerDto,
        CreateCustomerReq,
        AddressDto,
        InvoiceDto,
        InvoiceDetailDto,
        InvoiceItemDto,
        ProductDto,
        CreateInvoiceReq,
        CreateInvoiceItemReq,
        Problem,
        ValidationViolation,
    )),
    tags(
        (name = "customers", description = "Customer registry"),
        (name = "invoices", description = "Invoice archive")
    )
)]
struct ApiDoc;

/// Assemble the module router with the service injected as an extension.
#[must_use]
pub fn router(service: Arc<InvoicingService>) -> Router {
    // Build once, serve as static JSON (no per-request rebuilding)
    let openapi_doc = Arc::new(ApiDoc::openapi());

    Router::new()
        .route(
            "/customer",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customer/{id}/addresses",
            get(handlers::list_customer_addresses),
        )
        .route(
            "/customer/{id}/invoices",
            get(handlers::list_customer_invoices),
        )
        .route("/invoice", post(handlers::create_invoice))
        .route("/invoice/{id}", get(handlers::get_invoice))
        .route(
            "/api-docs/openapi.json",
            get({
                let doc = openapi_doc;
                move || async move {
                    ([(header::CACHE_CONTROL, "no-store")], Json(doc.as_ref())).into_response()
                }
            }),
        )
        .layer(Extension(service))
}
