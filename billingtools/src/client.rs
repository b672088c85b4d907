use anyhow::{anyhow, Result};
use billing_common::Secret;
use billing_engine::{
    db_types::{NewOrderItem, NewProduct, Payment, Product},
    order_objects::{ConfirmationSummary, NewOrderRequest, OrderDetails},
    payment_objects::{PaymentRequest, PaymentStatusUpdate, PaymentsResult},
};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    RequestBuilder,
    StatusCode,
};
use serde::de::DeserializeOwned;

pub struct BillingClient {
    client: Client,
    server: String,
    admin_token: Option<Secret<String>>,
}

impl BillingClient {
    pub fn new(server: &str, admin_token: Option<Secret<String>>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("Billing Server Client")
            .default_headers(headers)
            .build()
            .map_err(|e| anyhow!("Failed to create the http client. {e}"))?;
        let server = server.trim_end_matches('/').to_string();
        Ok(Self { client, server, admin_token })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server)
    }

    pub async fn health(&self) -> Result<String> {
        let res = self.client.get(self.url("/health")).send().await?;
        Ok(res.text().await?)
    }

    pub async fn products(&self) -> Result<Vec<Product>> {
        send_request(self.client.get(self.url("/products")), "/products").await
    }

    pub async fn add_product(&self, product: &NewProduct) -> Result<Product> {
        let req = self.admin(self.client.post(self.url("/api/products")))?.json(product);
        send_request(req, "/api/products").await
    }

    pub async fn create_order(&self, items: Vec<NewOrderItem>) -> Result<OrderDetails> {
        let req = self.client.post(self.url("/orders")).json(&NewOrderRequest { items });
        send_request(req, "/orders").await
    }

    pub async fn order(&self, id: i64) -> Result<OrderDetails> {
        let path = format!("/orders/{id}");
        send_request(self.client.get(self.url(&path)), &path).await
    }

    pub async fn orders(&self) -> Result<Vec<OrderDetails>> {
        let req = self.admin(self.client.get(self.url("/api/orders")))?;
        send_request(req, "/api/orders").await
    }

    pub async fn pay(&self, request: &PaymentRequest) -> Result<Payment> {
        let req = self.client.post(self.url("/payments")).json(request);
        send_request(req, "/payments").await
    }

    pub async fn payments_for_order(&self, order_id: i64) -> Result<PaymentsResult> {
        let path = format!("/api/orders/{order_id}/payments");
        let req = self.admin(self.client.get(self.url(&path)))?;
        send_request(req, &path).await
    }

    pub async fn set_payment_status(&self, payment_id: i64, status: &str) -> Result<Payment> {
        let path = format!("/api/payments/{payment_id}/status");
        let update = PaymentStatusUpdate { status: status.to_string() };
        let req = self.admin(self.client.patch(self.url(&path)))?.json(&update);
        send_request(req, &path).await
    }

    /// Runs the confirmation workflow. A rejection is not an error, so it is returned as a summary like any other
    /// outcome.
    pub async fn confirm(&self, order_id: i64) -> Result<ConfirmationSummary> {
        let path = format!("/api/orders/{order_id}/confirm");
        let res = self.admin(self.client.post(self.url(&path)))?.send().await?;
        match res.status() {
            StatusCode::OK | StatusCode::CONFLICT => Ok(res.json().await?),
            code => {
                let msg = res.text().await?;
                Err(anyhow!("Error calling {path}: {code}, {msg}"))
            },
        }
    }

    pub async fn complete(&self, order_id: i64) -> Result<billing_engine::db_types::Order> {
        let path = format!("/api/orders/{order_id}/complete");
        let req = self.admin(self.client.post(self.url(&path)))?;
        send_request(req, &path).await
    }

    fn admin(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .admin_token
            .as_ref()
            .ok_or_else(|| anyhow!("This command needs the admin token. Set BILLING_ADMIN_TOKEN or pass --token."))?;
        Ok(req.header(AUTHORIZATION, format!("Bearer {}", token.reveal())))
    }
}

async fn send_request<T: DeserializeOwned>(req: RequestBuilder, path: &str) -> Result<T> {
    let res = req.send().await?;
    debug!("{path} responded with {}", res.status());
    if res.status().is_success() {
        Ok(res.json().await?)
    } else {
        let code = res.status();
        let msg = res.text().await?;
        Err(anyhow!("Error calling {path}: {code}, {msg}"))
    }
}
