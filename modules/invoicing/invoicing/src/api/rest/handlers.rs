use std::sync::Arc;

use axum::extract::Path;
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use invoicing_sdk::{NewCustomer, NewInvoice};
use tracing::info;

use crate::api::problem::Problem;
use crate::api::rest::dto::{
    AddressDto, CreateCustomerReq, CreateInvoiceReq, CustomerDto, InvoiceDetailDto, InvoiceDto,
    InvoiceItemDto,
};
use crate::api::rest::error::domain_error_to_problem;
use crate::domain::service::InvoicingService;

fn created_location(uri: &Uri, new_id: i32) -> String {
    let path = uri.path().trim_end_matches('/');
    format!("{path}/{new_id}")
}

/// List all customers
#[utoipa::path(
    get,
    path = "/customer",
    tag = "customers",
    responses(
        (status = 200, description = "All customers", body = Vec<CustomerDto>),
        (status = 500, description = "Storage failure", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, uri))]
pub async fn list_customers(
    uri: Uri,
    Extension(svc): Extension<Arc<InvoicingService>>,
) -> Result<Json<Vec<CustomerDto>>, Problem> {
    info!("Listing customers");

    let customers = svc
        .list_customers()
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    Ok(Json(customers.into_iter().map(CustomerDto::from).collect()))
}

/// Create a new customer
#[utoipa::path(
    post,
    path = "/customer",
    tag = "customers",
    request_body = CreateCustomerReq,
    responses(
        (status = 201, description = "Customer created", body = CustomerDto,
         headers(("Location" = String, description = "URI of the created customer"))),
        (status = 400, description = "Validation failed", body = Problem),
        (status = 409, description = "Email already in use", body = Problem)
    )
)]
#[tracing::instrument(skip(svc, uri, req_body), fields(customer.email = %req_body.email))]
pub async fn create_customer(
    uri: Uri,
    Extension(svc): Extension<Arc<InvoicingService>>,
    Json(req_body): Json<CreateCustomerReq>,
) -> Result<impl IntoResponse, Problem> {
    info!(email = %req_body.email, "Creating new customer");

    let created = svc
        .create_customer(NewCustomer::from(req_body))
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    let location = created_location(&uri, created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CustomerDto::from(created)),
    ))
}

/// List the addresses of one customer
#[utoipa::path(
    get,
    path = "/customer/{id}/addresses",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200,
         description = "Addresses of the customer; empty when the customer is unknown",
         body = Vec<AddressDto>)
    )
)]
#[tracing::instrument(skip(svc, uri), fields(customer.id = id))]
pub async fn list_customer_addresses(
    uri: Uri,
    Extension(svc): Extension<Arc<InvoicingService>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<AddressDto>>, Problem> {
    info!(customer_id = id, "Listing customer addresses");

    let addresses = svc
        .list_addresses(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    Ok(Json(addresses.into_iter().map(AddressDto::from).collect()))
}

/// List the invoices of one customer (archive view)
#[utoipa::path(
    get,
    path = "/customer/{id}/invoices",
    tag = "invoices",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200,
         description = "Invoices of the customer; empty when the customer is unknown",
         body = Vec<InvoiceDto>)
    )
)]
#[tracing::instrument(skip(svc, uri), fields(customer.id = id))]
pub async fn list_customer_invoices(
    uri: Uri,
    Extension(svc): Extension<Arc<InvoicingService>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<InvoiceDto>>, Problem> {
    info!(customer_id = id, "Listing customer invoices");

    let invoices = svc
        .list_invoices(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    Ok(Json(invoices.into_iter().map(InvoiceDto::from).collect()))
}

/// Item lines of one invoice, joined with current product data
#[utoipa::path(
    get,
    path = "/invoice/{id}",
    tag = "invoices",
    params(("id" = i32, Path, description = "Invoice id")),
    responses(
        (status = 200,
         description = "Invoice detail; empty item list when the invoice is unknown",
         body = InvoiceDetailDto)
    )
)]
#[tracing::instrument(skip(svc, uri), fields(invoice.id = id))]
pub async fn get_invoice(
    uri: Uri,
    Extension(svc): Extension<Arc<InvoicingService>>,
    Path(id): Path<i32>,
) -> Result<Json<InvoiceDetailDto>, Problem> {
    info!(invoice_id = id, "Getting invoice items");

    let items = svc
        .invoice_items(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    Ok(Json(InvoiceDetailDto {
        items: items.into_iter().map(InvoiceItemDto::from).collect(),
    }))
}

/// Post a new invoice with its lines
#[utoipa::path(
    post,
    path = "/invoice",
    tag = "invoices",
    request_body = CreateInvoiceReq,
    responses(
        (status = 201, description = "Invoice created",
         headers(("Location" = String, description = "URI of the created invoice"))),
        (status = 400, description = "Validation failed", body = Problem),
        (status = 409, description = "Unknown customer", body = Problem)
    )
)]
#[tracing::instrument(
    skip(svc, uri, req_body),
    fields(
        customer.id = req_body.customer_id,
        line_count = req_body.invoice_item_list.len()
    )
)]
pub async fn create_invoice(
    uri: Uri,
    Extension(svc): Extension<Arc<InvoicingService>>,
    Json(req_body): Json<CreateInvoiceReq>,
) -> Result<impl IntoResponse, Problem> {
    info!(
        customer_id = req_body.customer_id,
        line_count = req_body.invoice_item_list.len(),
        "Creating new invoice"
    );

    let new_invoice =
        NewInvoice::try_from(req_body).map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    let invoice_id = svc
        .create_invoice(new_invoice)
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;

    let location = created_location(&uri, invoice_id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::NaiveDate;
    use invoicing_sdk::{
        Address, Customer, InvoiceItem, InvoiceSummary, NewCustomer, NewInvoice, Product,
    };
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::rest::routes;
    use crate::domain::error::DomainError;
    use crate::domain::repo::{
        AddressesRepository, CustomersRepository, InvoicesRepository, Repositories,
    };
    use crate::domain::service::InvoicingService;

    struct Stub {
        conflict: bool,
    }

    #[async_trait]
    impl CustomersRepository for Stub {
        async fn list_all(&self) -> Result<Vec<Customer>, DomainError> {
            Ok(vec![Customer {
                id: 1,
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                email: "ada@example.com".to_owned(),
            }])
        }

        async fn create(&self, new_customer: NewCustomer) -> Result<Customer, DomainError> {
            if self.conflict {
                return Err(DomainError::email_taken(new_customer.email));
            }
            Ok(Customer {
                id: 7,
                first_name: new_customer.first_name,
                last_name: new_customer.last_name,
                email: new_customer.email,
            })
        }
    }

    #[async_trait]
    impl AddressesRepository for Stub {
        async fn list_by_customer(&self, customer_id: i32) -> Result<Vec<Address>, DomainError> {
            if customer_id == 1 {
                Ok(vec![Address {
                    street: "12 Main St".to_owned(),
                    city: "Lyon".to_owned(),
                    country: "France".to_owned(),
                }])
            } else {
                Ok(Vec::new())
            }
        }
    }

    #[async_trait]
    impl InvoicesRepository for Stub {
        async fn list_by_customer(
            &self,
            customer_id: i32,
        ) -> Result<Vec<InvoiceSummary>, DomainError> {
            if customer_id == 1 {
                Ok(vec![InvoiceSummary {
                    id: 9,
                    invoice_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
                    total_amount: Some(Decimal::new(2575, 2)),
                }])
            } else {
                Ok(Vec::new())
            }
        }

        async fn list_items(&self, invoice_id: i32) -> Result<Vec<InvoiceItem>, DomainError> {
            if invoice_id == 9 {
                Ok(vec![InvoiceItem {
                    quantity: 2,
                    product: Product {
                        name: "Pencil".to_owned(),
                        price: Decimal::new(125, 1),
                    },
                }])
            } else {
                Ok(Vec::new())
            }
        }

        async fn create_invoice(&self, new_invoice: NewInvoice) -> Result<i32, DomainError> {
            if self.conflict {
                return Err(DomainError::unknown_customer(new_invoice.customer_id));
            }
            Ok(42)
        }
    }

    fn app(conflict: bool) -> axum::Router {
        let repos = Repositories {
            customers: Arc::new(Stub { conflict }),
            addresses: Arc::new(Stub { conflict }),
            invoices: Arc::new(Stub { conflict }),
        };
        routes::router(Arc::new(InvoicingService::new(repos)))
    }

    fn json_post(path: &str, body: Value) -> Request<Body> {
        Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn lists_customers_in_camel_case() {
        let resp = app(false)
            .oneshot(Request::get("/customer").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(
            body,
            json!([{
                "id": 1,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
            }])
        );
    }

    #[tokio::test]
    async fn create_customer_returns_created_record_and_location() {
        let req = json_post(
            "/customer",
            json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "grace@example.com",
            }),
        );
        let resp = app(false).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[header::LOCATION], "/customer/7");
        let body = body_json(resp).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["firstName"], "Grace");
        assert_eq!(body["email"], "grace@example.com");
    }

    #[tokio::test]
    async fn create_customer_rejects_blank_first_name() {
        let req = json_post(
            "/customer",
            json!({
                "firstName": "   ",
                "lastName": "Hopper",
                "email": "grace@example.com",
            }),
        );
        let resp = app(false).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()[header::CONTENT_TYPE],
            "application/problem+json"
        );
        let body = body_json(resp).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["instance"], "/customer");
        assert_eq!(body["errors"][0]["field"], "firstName");
    }

    #[tokio::test]
    async fn create_customer_conflicts_on_taken_email() {
        let req = json_post(
            "/customer",
            json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "grace@example.com",
            }),
        );
        let resp = app(true).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn unknown_customer_reads_return_empty_lists() {
        let resp = app(false)
            .oneshot(
                Request::get("/customer/5/addresses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!([]));

        let resp = app(false)
            .oneshot(
                Request::get("/customer/5/invoices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!([]));
    }

    #[tokio::test]
    async fn lists_invoices_with_archive_view() {
        let resp = app(false)
            .oneshot(
                Request::get("/customer/1/invoices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(
            body,
            json!([{
                "id": 9,
                "timestamp": "2024-03-07T00:00:00Z",
                "totalAmount": 25,
            }])
        );
    }

    #[tokio::test]
    async fn invoice_detail_joins_product() {
        let resp = app(false)
            .oneshot(Request::get("/invoice/9").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "items": [
                    {"quantity": 2, "product": {"name": "Pencil", "price": 12.5}}
                ]
            })
        );
    }

    #[tokio::test]
    async fn create_invoice_returns_location_without_body() {
        let req = json_post(
            "/invoice",
            json!({
                "customerId": 1,
                "timestamp": "2024-03-07T14:23:05Z",
                "invoiceItemList": [
                    {"productName": "Pencil", "price": 12.5, "quantity": 2}
                ],
            }),
        );
        let resp = app(false).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[header::LOCATION], "/invoice/42");
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn create_invoice_rejects_empty_item_list() {
        let req = json_post(
            "/invoice",
            json!({
                "customerId": 1,
                "timestamp": "2024-03-07T14:23:05Z",
                "invoiceItemList": [],
            }),
        );
        let resp = app(false).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["errors"][0]["field"], "invoiceItemList");
    }

    #[tokio::test]
    async fn create_invoice_conflicts_on_unknown_customer() {
        let req = json_post(
            "/invoice",
            json!({
                "customerId": 999,
                "timestamp": "2024-03-07T14:23:05Z",
                "invoiceItemList": [
                    {"productName": "Pencil", "price": 12.5, "quantity": 2}
                ],
            }),
        );
        let resp = app(true).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "UNKNOWN_CUSTOMER");
        assert_eq!(body["instance"], "/invoice");
    }

    #[tokio::test]
    async fn serves_openapi_document_without_caching() {
        let resp = app(false)
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-store");
        let body = body_json(resp).await;
        assert!(body["paths"]["/customer"].is_object());
        assert!(body["paths"]["/invoice/{id}"].is_object());
    }
}
