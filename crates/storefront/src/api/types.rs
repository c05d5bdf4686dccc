//! Wire types for the Web Larek API.

use serde::{Deserialize, Serialize};
use web_larek_core::{Email, OrderId, PaymentMethod, Phone, Price, Product, ProductId};

/// `GET /product` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    pub total: usize,
    pub items: Vec<Product>,
}

/// `POST /order` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub payment: PaymentMethod,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
    pub total: Price,
    pub items: Vec<ProductId>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: OrderId,
    pub total: Price,
}

/// Error body returned by the API alongside a non-success status, and
/// sometimes with 200 for rejected orders.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Either outcome of `POST /order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrderResponse {
    Placed(OrderResult),
    Rejected(ErrorBody),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            payment: PaymentMethod::Online,
            email: Email::parse("test@test.ru").unwrap(),
            phone: Phone::parse("+71234567890").unwrap(),
            address: "Spb Vosstania 1".to_string(),
            total: Price::new(2200),
            items: vec![
                ProductId::new("854cef69-976d-4c2a-a18c-2aa45046c390"),
                ProductId::new("c101ab44-ed99-4a54-990d-47aa2bb4e7d9"),
            ],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "payment": "online",
                "email": "test@test.ru",
                "phone": "+71234567890",
                "address": "Spb Vosstania 1",
                "total": 2200,
                "items": [
                    "854cef69-976d-4c2a-a18c-2aa45046c390",
                    "c101ab44-ed99-4a54-990d-47aa2bb4e7d9"
                ]
            })
        );
    }

    #[test]
    fn test_order_response_variants() {
        let placed: OrderResponse =
            serde_json::from_value(json!({"id": "28c57cb4", "total": 2200})).unwrap();
        assert!(matches!(placed, OrderResponse::Placed(r) if r.total == Price::new(2200)));

        let rejected: OrderResponse =
            serde_json::from_value(json!({"error": "Неверная сумма заказа"})).unwrap();
        assert!(matches!(rejected, OrderResponse::Rejected(e) if e.error == "Неверная сумма заказа"));
    }
}
