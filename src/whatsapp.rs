//! Confirmation messages and wa.me deep links. Delivery of this link is the
//! storefront's sole payment/confirmation channel; no server-side payment
//! capture happens.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// One purchased line as rendered into the confirmation message.
#[derive(Debug, Clone)]
pub struct SummaryLine {
    pub name: String,
    pub quantity: i32,
    pub subtotal: i64,
}

#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub payment_method: String,
    pub lines: Vec<SummaryLine>,
    pub shipping_fee: i64,
    pub total: i64,
}

/// Multi-line message sent to the admin right after checkout.
pub fn confirmation_message(summary: &OrderSummary) -> String {
    let mut message = String::new();
    message.push_str("Hello Admin!\n");
    message.push_str("I would like to order:\n\n");
    message.push_str(&format!("Name: {}\n", summary.customer_name));
    message.push_str(&format!("Phone: {}\n", summary.customer_phone));
    message.push_str(&format!("Address: {}\n\n", summary.customer_address));
    message.push_str("Payment method:\n");
    message.push_str(&format!("- {}\n\n", summary.payment_method.to_uppercase()));
    message.push_str("Items:\n");
    for line in &summary.lines {
        message.push_str(&format!(
            "- {} x{} = Rp {}\n",
            line.name,
            line.quantity,
            format_rupiah(line.subtotal)
        ));
    }
    message.push_str(&format!(
        "\nShipping: Rp {}",
        format_rupiah(summary.shipping_fee)
    ));
    message.push_str(&format!("\nTotal: Rp {}\n\n", format_rupiah(summary.total)));
    message.push_str("Thank you!");
    message
}

/// Shorter message regenerated for the public order-status page.
pub fn status_message(order_code: &str, customer_name: &str, total: i64) -> String {
    format!(
        "Hello Admin!\nI would like to confirm my order:\n\n\
         Code: {order_code}\nName: {customer_name}\nTotal: Rp {}\n\nThank you!",
        format_rupiah(total)
    )
}

/// Deep link that opens a chat with the admin contact, pre-filled with `text`.
pub fn deep_link(admin_contact: &str, text: &str) -> String {
    let encoded = utf8_percent_encode(text, NON_ALPHANUMERIC);
    format!("https://wa.me/{admin_contact}?text={encoded}")
}

/// Thousands-separated rupiah amount, e.g. 65000 → "65,000".
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupiah_groups_thousands() {
        assert_eq!(format_rupiah(0), "0");
        assert_eq!(format_rupiah(950), "950");
        assert_eq!(format_rupiah(15_000), "15,000");
        assert_eq!(format_rupiah(65_000), "65,000");
        assert_eq!(format_rupiah(1_234_567), "1,234,567");
    }

    fn sample_summary() -> OrderSummary {
        OrderSummary {
            customer_name: "Budi".into(),
            customer_phone: "0812345678".into(),
            customer_address: "Jl. Melati 1".into(),
            payment_method: "gopay".into(),
            lines: vec![
                SummaryLine {
                    name: "Banana Chips".into(),
                    quantity: 2,
                    subtotal: 30_000,
                },
                SummaryLine {
                    name: "Cassava Crackers".into(),
                    quantity: 1,
                    subtotal: 20_000,
                },
            ],
            shipping_fee: 15_000,
            total: 65_000,
        }
    }

    #[test]
    fn confirmation_lists_every_line_and_the_totals() {
        let message = confirmation_message(&sample_summary());
        assert!(message.contains("- Banana Chips x2 = Rp 30,000"));
        assert!(message.contains("- Cassava Crackers x1 = Rp 20,000"));
        assert!(message.contains("Shipping: Rp 15,000"));
        assert!(message.contains("Total: Rp 65,000"));
        assert!(message.contains("- GOPAY"));
        assert!(message.contains("Name: Budi"));
    }

    #[test]
    fn deep_link_encodes_the_message() {
        let link = deep_link("6282327009116", "Hello Admin!\nTotal: Rp 65,000");
        assert!(link.starts_with("https://wa.me/6282327009116?text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
        assert!(link.contains("%0A"));
    }

    #[test]
    fn status_message_carries_the_order_code() {
        let message = status_message("ORD-AB12CD34", "Budi", 65_000);
        assert!(message.contains("Code: ORD-AB12CD34"));
        assert!(message.contains("Total: Rp 65,000"));
    }
}
