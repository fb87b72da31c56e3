use std::env;

/// Runtime configuration. The admin WhatsApp contact and the flat shipping
/// fee are configuration, not embedded literals, so a deployment can change
/// them without a rebuild.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// WhatsApp destination number for confirmation deep links.
    pub admin_contact: String,
    /// Flat fee in rupiah added to every order total.
    pub shipping_fee: i64,
    /// Root directory for stored menu images.
    pub upload_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_contact =
            env::var("ADMIN_CONTACT").unwrap_or_else(|_| "6282327009116".to_string());
        let shipping_fee = env::var("SHIPPING_FEE")
            .ok()
            .and_then(|fee| fee.parse::<i64>().ok())
            .unwrap_or(15_000);
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        Ok(Self {
            database_url,
            host,
            port,
            admin_contact,
            shipping_fee,
            upload_dir,
        })
    }
}
