//! Client for the external payment gateway.
//!
//! The gateway opens a hosted checkout page for an order and later
//! answers verification queries about it. All calls carry the store
//! credentials as basic auth and are bounded by a request timeout.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Gateway connection settings.
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub base_url: String,
    pub store_id: String,
    pub store_secret: String,
    /// Where the gateway sends the customer back after checkout.
    pub return_url: String,
    pub timeout: Duration,
}

/// What the gateway needs to open a checkout session.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentPayload {
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    /// Forwarded so the gateway can deduplicate retried initiations.
    pub idempotency_key: Option<String>,
}

#[derive(Serialize)]
struct CheckoutRequest<'a> {
    #[serde(flatten)]
    payload: &'a PaymentPayload,
    return_url: &'a str,
}

/// Gateway response to a checkout initiation.
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentResponse {
    pub transaction_id: String,
    pub checkout_url: String,
}

/// One verification record for an order. The gateway may return several;
/// the first one carries the verdict.
#[derive(Clone, Debug, Deserialize)]
pub struct VerificationResponse {
    pub transaction_id: String,
    pub status: String,
    pub amount_minor: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct PaymentClient {
    client: reqwest::Client,
    config: PaymentConfig,
}

impl PaymentClient {
    pub fn new(config: PaymentConfig) -> ResultEngine<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| EngineError::Gateway(err.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> ResultEngine<Url> {
        Url::parse(&self.config.base_url)
            .and_then(|base| base.join(path))
            .map_err(|err| EngineError::Gateway(format!("invalid gateway url: {err}")))
    }

    /// Opens a checkout session for an order.
    pub async fn make_payment(&self, payload: &PaymentPayload) -> ResultEngine<PaymentResponse> {
        let body = CheckoutRequest {
            payload,
            return_url: &self.config.return_url,
        };
        let res = self
            .client
            .post(self.url("payments")?)
            .basic_auth(&self.config.store_id, Some(&self.config.store_secret))
            .json(&body)
            .send()
            .await
            .map_err(gateway_err)?;

        if res.status().is_success() {
            return res.json::<PaymentResponse>().await.map_err(gateway_err);
        }
        Err(decode_error(res).await)
    }

    /// Asks the gateway for the verification records of an order.
    pub async fn verify_payment(&self, order_id: &str) -> ResultEngine<Vec<VerificationResponse>> {
        let res = self
            .client
            .get(self.url(&format!("payments/{order_id}"))?)
            .basic_auth(&self.config.store_id, Some(&self.config.store_secret))
            .send()
            .await
            .map_err(gateway_err)?;

        if res.status().is_success() {
            return res
                .json::<Vec<VerificationResponse>>()
                .await
                .map_err(gateway_err);
        }
        Err(decode_error(res).await)
    }
}

fn gateway_err(err: reqwest::Error) -> EngineError {
    if err.is_timeout() {
        return EngineError::Gateway("payment gateway timed out".to_string());
    }
    EngineError::Gateway(err.to_string())
}

async fn decode_error(res: reqwest::Response) -> EngineError {
    let status = res.status();
    let message = res
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| format!("unexpected gateway status {status}"));
    EngineError::Gateway(message)
}
