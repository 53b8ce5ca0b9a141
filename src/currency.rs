//! Currency conversion over the exchange-rate API.

use std::collections::HashMap;

use reqwest_middleware::ClientWithMiddleware;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::prelude::*;

const BASE_URL: &str = "https://api.exchangerateapi.net";

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("exchange-rate API key is not configured")]
    MissingApiKey,

    #[error("rate not found for {0}")]
    UnknownCurrency(String),

    #[error("request error: {0:#}")]
    Request(#[from] reqwest::Error),

    #[error("request error: {0:#}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error(transparent)]
    Anyhow(#[from] Error),
}

#[must_use]
#[derive(Clone, Deserialize)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

#[must_use]
#[derive(Debug, Serialize)]
pub struct Conversion {
    /// The upstream rate, passed through as a JSON number.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub rate: Decimal,

    /// The converted amount with exactly two fraction digits.
    pub converted: String,

    pub from: String,

    pub to: String,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
}

impl Conversion {
    /// Apply the rate to the request. The converted amount is rendered with
    /// exactly two fraction digits.
    pub fn from_rate(request: ConversionRequest, rate: Decimal) -> Self {
        Self {
            rate,
            converted: format!("{:.2}", request.amount * rate),
            from: request.from,
            to: request.to,
            amount: request.amount,
        }
    }
}

/// Latest rates for one base currency.
#[must_use]
#[derive(Deserialize)]
pub struct Rates {
    rates: HashMap<String, Decimal>,
}

impl Rates {
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }
}

#[must_use]
#[derive(Clone)]
pub struct CurrencyClient {
    client: ClientWithMiddleware,
    api_key: Option<SecretString>,
}

impl CurrencyClient {
    pub const fn new(client: ClientWithMiddleware, api_key: Option<SecretString>) -> Self {
        Self { client, api_key }
    }

    /// Fetch the latest rates for the base currency.
    #[instrument(skip_all, fields(base))]
    pub async fn latest_rates(&self, base: &str) -> Result<Rates, CurrencyError> {
        let api_key = self.api_key.as_ref().ok_or(CurrencyError::MissingApiKey)?;
        let mut url = Url::parse(BASE_URL).context("failed to parse the base URL")?;
        url.set_path("/v1/latest");
        url.query_pairs_mut().append_pair("base", base);
        info!(base, "💱 Fetching the latest rates…");
        Ok(self
            .client
            .get(url)
            .header("apikey", api_key.expose_secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// Convert the amount, fetching the base currency's rate sheet first.
    pub async fn convert(&self, request: ConversionRequest) -> Result<Conversion, CurrencyError> {
        let rates = self.latest_rates(&request.from).await?;
        let rate = rates
            .get(&request.to)
            .ok_or_else(|| CurrencyError::UnknownCurrency(request.to.clone()))?;
        Ok(Conversion::from_rate(request, rate))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn conversion_renders_two_fraction_digits() {
        let request = ConversionRequest {
            from: "USD".to_string(),
            to: "NPR".to_string(),
            amount: dec!(10),
        };
        let conversion = Conversion::from_rate(request, dec!(132.5));
        assert_eq!(conversion.rate, dec!(132.5));
        assert_eq!(conversion.converted, "1325.00");
    }

    #[test]
    fn serialize_conversion_ok() -> Result {
        let request = ConversionRequest {
            from: "USD".to_string(),
            to: "NPR".to_string(),
            amount: dec!(10),
        };
        let conversion = Conversion::from_rate(request, dec!(132.5));
        assert_eq!(
            serde_json::to_string(&conversion)?,
            r#"{"rate":132.5,"converted":"1325.00","from":"USD","to":"NPR","amount":10.0}"#,
        );
        Ok(())
    }

    #[test]
    fn deserialize_rates_ok() -> Result {
        let rates: Rates =
            serde_json::from_str(r#"{"base": "USD", "rates": {"NPR": 132.5, "EUR": 0.92}}"#)?;
        assert_eq!(rates.get("NPR"), Some(dec!(132.5)));
        assert_eq!(rates.get("CHF"), None);
        Ok(())
    }
}
