use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Order, PaymentMethod};

/// Checkout payload from the untrusted public caller. Everything here is
/// validated before any transaction is opened.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    #[validate(email, length(max = 100))]
    pub customer_email: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub customer_phone: String,
    #[validate(length(min = 1, max = 255))]
    pub customer_address: String,
    pub payment_method: PaymentMethod,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    pub menu_item_id: Uuid,
    #[validate(range(min = 1, max = 99))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceOrderResponse {
    pub order_code: String,
    pub whatsapp_url: String,
}

/// One order line as displayed to customers and admins. `menu_name` degrades
/// to a placeholder when the catalog item has since been deleted.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemView {
    pub id: Uuid,
    pub menu_item_id: Option<Uuid>,
    pub menu_name: String,
    pub quantity: i32,
    pub price: i64,
    pub subtotal: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemView>,
    pub whatsapp_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStats {
    pub total_revenue: i64,
    pub total_count: i64,
    pub completed_count: i64,
    pub cancelled_count: i64,
    /// Everything not yet terminal: total − completed − cancelled.
    pub processing_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminOrderList {
    pub orders: Vec<AdminOrder>,
    pub stats: OrderStats,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;

    fn valid_request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            customer_name: "Budi".into(),
            customer_email: Some("budi@example.com".into()),
            customer_phone: "0812345678".into(),
            customer_address: "Jl. Melati 1".into(),
            payment_method: PaymentMethod::Gopay,
            items: vec![OrderLineRequest {
                menu_item_id: Uuid::new_v4(),
                quantity: 2,
            }],
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_empty_items() {
        let mut request = valid_request();
        request.items.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn empty_items_error_serializes_with_the_offending_field() {
        let mut request = valid_request();
        request.items.clear();
        let errors = request.validate().unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert!(json.get("items").is_some());
    }

    #[test]
    fn rejects_quantity_outside_1_to_99() {
        let mut request = valid_request();
        request.items[0].quantity = 0;
        assert!(request.validate().is_err());
        request.items[0].quantity = 100;
        assert!(request.validate().is_err());
        request.items[0].quantity = 99;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn rejects_missing_contact_fields() {
        let mut request = valid_request();
        request.customer_name = String::new();
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.customer_phone = "x".repeat(21);
        assert!(request.validate().is_err());
    }

    #[test]
    fn email_is_optional_but_validated_when_present() {
        let mut request = valid_request();
        request.customer_email = None;
        assert!(request.validate().is_ok());

        request.customer_email = Some("not-an-email".into());
        assert!(request.validate().is_err());
    }

    #[test]
    fn payment_method_rejects_unknown_wallets() {
        let body = serde_json::json!({
            "customer_name": "Budi",
            "customer_phone": "0812345678",
            "customer_address": "Jl. Melati 1",
            "payment_method": "paypal",
            "items": [{ "menu_item_id": Uuid::new_v4(), "quantity": 1 }],
        });
        assert!(serde_json::from_value::<PlaceOrderRequest>(body).is_err());
    }
}
