use crate::core::{AppError, Currency, Result};
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub mod server;

pub use server::ServerConfig;

use crate::modules::pricing::services::PricingPolicy;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub pricing: PricingConfig,
    pub documents: DocumentConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub tax_rate_percent: Decimal,
    pub max_discount_percent: Decimal,
    pub currency: Currency,
}

#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub company_name: String,
    pub logo_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

fn decimal_var(name: &str, default: &str) -> Result<Decimal> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    Decimal::from_str(raw.trim())
        .map_err(|_| AppError::Configuration(format!("Invalid {}", name)))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            server: ServerConfig::from_env()?,
            pricing: PricingConfig {
                tax_rate_percent: decimal_var("TAX_RATE_PERCENT", "10")?,
                max_discount_percent: decimal_var("MAX_DISCOUNT_PERCENT", "50")?,
                currency: env::var("CURRENCY")
                    .unwrap_or_else(|_| "AUD".to_string())
                    .parse()
                    .map_err(AppError::Configuration)?,
            },
            documents: DocumentConfig {
                company_name: env::var("COMPANY_NAME")
                    .unwrap_or_else(|_| "Social Garden".to_string()),
                logo_path: env::var("LOGO_PATH")
                    .ok()
                    .filter(|path| !path.trim().is_empty())
                    .map(PathBuf::from),
                output_dir: env::var("OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp/pdfs")),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        if self.documents.company_name.trim().is_empty() {
            return Err(AppError::Configuration(
                "Company name cannot be empty".to_string(),
            ));
        }

        self.pricing_policy().map(|_| ())
    }

    /// Pricing rules derived from configuration
    pub fn pricing_policy(&self) -> Result<PricingPolicy> {
        PricingPolicy::new(
            self.pricing.tax_rate_percent,
            self.pricing.max_discount_percent,
            self.pricing.currency,
        )
    }
}
