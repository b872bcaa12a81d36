//! Client for the remote pricing service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use seur_commerce::{CartSnapshot, EstimateMethod, ShippingAddress, ShippingEstimate};
use tracing::{debug, info};

use crate::error::EstimateError;

/// Request body sent to the pricing service.
#[derive(Debug, Serialize)]
pub struct QuoteRequest<'a> {
    pub cart_items: Vec<QuoteItem<'a>>,
    pub shipping_address: &'a ShippingAddress,
    pub order_total: f64,
}

/// One cart line in a [`QuoteRequest`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem<'a> {
    pub product_id: &'a str,
    pub sku: &'a str,
    pub name: &'a str,
    pub quantity: u32,
    pub price: f64,
}

impl<'a> QuoteRequest<'a> {
    /// Build a request for `cart` shipped to `address`.
    pub fn new(cart: &'a CartSnapshot, address: &'a ShippingAddress) -> Self {
        let cart_items = cart
            .items()
            .iter()
            .map(|item| QuoteItem {
                product_id: item.product_id.as_str(),
                sku: item.sku.as_str(),
                name: &item.name,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Self {
            cart_items,
            shipping_address: address,
            order_total: cart.total(),
        }
    }
}

/// Response body returned by the pricing service.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteResponse {
    pub success: bool,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub shipping_payment_required: Option<bool>,
    #[serde(default)]
    pub shipping_message: String,
    #[serde(default)]
    pub calculation_method: String,
    #[serde(default)]
    pub total_weight: f64,
    #[serde(default)]
    pub parcels_count: u32,
    /// Error text some deployments send alongside `success: false`.
    #[serde(default)]
    pub message: Option<String>,
}

impl QuoteResponse {
    /// Convert a successful response into an estimate.
    ///
    /// `remaining_for_free` is computed by the caller, which knows the
    /// configured threshold.
    pub fn into_estimate(self, remaining_for_free: f64) -> ShippingEstimate {
        let cost = self.shipping_cost.max(0.0);
        let is_free = match self.shipping_payment_required {
            Some(required) => !required,
            None => cost == 0.0,
        };

        ShippingEstimate {
            cost: if is_free { 0.0 } else { cost },
            is_free_shipping: is_free,
            message: self.shipping_message,
            total_weight: self.total_weight,
            parcel_count: self.parcels_count.max(1),
            method: EstimateMethod::Remote,
            calculation_method: self.calculation_method,
            remaining_for_free: if is_free { 0.0 } else { remaining_for_free },
        }
    }
}

/// HTTP client for the pricing endpoint.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl RemoteClient {
    /// Create a client that aborts requests after `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, EstimateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request a quote.
    ///
    /// Non-success statuses, `success: false` payloads and timeouts are all
    /// errors.
    pub async fn quote(
        &self,
        cart: &CartSnapshot,
        address: &ShippingAddress,
    ) -> Result<QuoteResponse, EstimateError> {
        let request = QuoteRequest::new(cart, address);

        debug!(endpoint = %self.endpoint, items = request.cart_items.len(), "requesting shipping quote");
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            return Err(EstimateError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let quote: QuoteResponse = serde_json::from_str(&body)?;
        if !quote.success {
            let reason = quote
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| quote.shipping_message.clone());
            return Err(EstimateError::Rejected(reason));
        }

        info!(
            cost = quote.shipping_cost,
            method = %quote.calculation_method,
            "received shipping quote"
        );
        Ok(quote)
    }

    fn classify(&self, error: reqwest::Error) -> EstimateError {
        if error.is_timeout() {
            EstimateError::Timeout(self.timeout)
        } else {
            EstimateError::Http(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seur_commerce::CartItem;

    #[test]
    fn test_request_shape() {
        let cart = CartSnapshot::from_items(vec![CartItem::new("Gorra", 8.0, 2, "CAP", "p-1")])
            .unwrap();
        let address = ShippingAddress::default();
        let value = serde_json::to_value(QuoteRequest::new(&cart, &address)).unwrap();

        assert_eq!(value["order_total"], 16.0);
        assert_eq!(value["cart_items"][0]["productId"], "p-1");
        assert_eq!(value["cart_items"][0]["quantity"], 2);
        assert_eq!(value["shipping_address"]["countryCode"], "ES");
        assert_eq!(value["shipping_address"]["postalCode"], "");
    }

    #[test]
    fn test_response_into_estimate() {
        let response: QuoteResponse = serde_json::from_str(
            r#"{
                "success": true,
                "shipping_cost": 6.9,
                "shipping_payment_required": true,
                "shipping_message": "Envío estándar",
                "calculation_method": "seur_api",
                "total_weight": 2.4,
                "parcels_count": 2
            }"#,
        )
        .unwrap();
        let estimate = response.into_estimate(12.0);

        assert_eq!(estimate.method, EstimateMethod::Remote);
        assert_eq!(estimate.cost, 6.9);
        assert!(!estimate.is_free_shipping);
        assert_eq!(estimate.parcel_count, 2);
        assert_eq!(estimate.calculation_method, "seur_api");
        assert_eq!(estimate.remaining_for_free, 12.0);
    }

    #[test]
    fn test_response_free_and_defaults() {
        let response: QuoteResponse =
            serde_json::from_str(r#"{"success": true, "shipping_cost": 0}"#).unwrap();
        let estimate = response.into_estimate(5.0);

        assert!(estimate.is_free_shipping);
        assert_eq!(estimate.parcel_count, 1);
        assert_eq!(estimate.remaining_for_free, 0.0);
    }
}
