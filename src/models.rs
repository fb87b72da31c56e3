use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in whole rupiah. Currency is never stored as floating point.
    pub price: i64,
    pub stock: i32,
    pub is_available: bool,
    /// Relative path into the upload directory, when an image is attached.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_code: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub customer_address: String,
    pub payment_method: String,
    pub status: String,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Weak reference: NULL once the catalog item has been deleted.
    pub menu_item_id: Option<Uuid>,
    pub quantity: i32,
    /// Unit price snapshotted at purchase time.
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Order lifecycle: pending → confirmed → preparing → on_delivery → completed,
/// with cancelled reachable from any non-terminal state. Admin status updates
/// validate membership only; transition legality is deliberately not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OnDelivery,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::OnDelivery,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OnDelivery => "on_delivery",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// The fixed set of e-wallets the storefront accepts. Payment is method
/// selection only; money moves out-of-band over WhatsApp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Dana,
    Gopay,
    Ovo,
    Shopeepay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Dana => "dana",
            PaymentMethod::Gopay => "gopay",
            PaymentMethod::Ovo => "ovo",
            PaymentMethod::Shopeepay => "shopeepay",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dana" => Ok(PaymentMethod::Dana),
            "gopay" => Ok(PaymentMethod::Gopay),
            "ovo" => Ok(PaymentMethod::Ovo),
            "shopeepay" => Ok(PaymentMethod::Shopeepay),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn on_delivery_uses_snake_case() {
        assert_eq!(OrderStatus::OnDelivery.as_str(), "on_delivery");
        assert_eq!(
            "on_delivery".parse::<OrderStatus>().unwrap(),
            OrderStatus::OnDelivery
        );
    }

    #[test]
    fn rejects_unknown_status_and_method() {
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!("cash".parse::<PaymentMethod>().is_err());
    }
}
