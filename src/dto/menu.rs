use serde::Serialize;
use utoipa::ToSchema;

use crate::models::MenuItem;

/// Parsed multipart form for menu create/update. The route layer assembles
/// this from the raw multipart stream; field-level checks live in `validate`.
#[derive(Debug, Default)]
pub struct MenuItemForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub is_available: bool,
    pub image: Option<ImageUpload>,
}

#[derive(Debug)]
pub struct ImageUpload {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// Form fields after validation.
#[derive(Debug)]
pub struct MenuItemAttrs {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub is_available: bool,
    pub image: Option<ImageUpload>,
}

impl MenuItemForm {
    pub fn validate(self) -> Result<MenuItemAttrs, String> {
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err("name is required".into()),
        };
        let price = match self.price {
            Some(price) if price >= 0 => price,
            Some(_) => return Err("price must be a non-negative integer".into()),
            None => return Err("price is required".into()),
        };
        let stock = match self.stock {
            Some(stock) if stock >= 0 => stock,
            Some(_) => return Err("stock must be a non-negative integer".into()),
            None => return Err("stock is required".into()),
        };
        Ok(MenuItemAttrs {
            name,
            description: self.description,
            price,
            stock,
            is_available: self.is_available,
            image: self.image,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuList {
    pub items: Vec<MenuItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> MenuItemForm {
        MenuItemForm {
            name: Some("Banana Chips".into()),
            description: None,
            price: Some(15_000),
            stock: Some(5),
            is_available: true,
            image: None,
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let attrs = form().validate().unwrap();
        assert_eq!(attrs.name, "Banana Chips");
        assert_eq!(attrs.price, 15_000);
        assert_eq!(attrs.stock, 5);
    }

    #[test]
    fn rejects_missing_or_blank_name() {
        let mut f = form();
        f.name = None;
        assert!(f.validate().is_err());

        let mut f = form();
        f.name = Some("   ".into());
        assert!(f.validate().is_err());
    }

    #[test]
    fn rejects_negative_price_and_stock() {
        let mut f = form();
        f.price = Some(-1);
        assert!(f.validate().is_err());

        let mut f = form();
        f.stock = Some(-1);
        assert!(f.validate().is_err());
    }
}
