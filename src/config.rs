use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub db_name: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mongo_uri =
            env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = env::var("DB_NAME").unwrap_or_else(|_| "ecommerce_db".to_string());
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            mongo_uri,
            db_name,
            jwt_secret,
            host,
            port,
        })
    }
}
