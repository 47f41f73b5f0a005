use async_trait::async_trait;

use crate::error::ServiceError;

/// Source of commodity market rates.
#[async_trait]
pub trait MarketRates: Send + Sync {
    async fn rate(&self, product: &str) -> Result<String, ServiceError>;
}

/// Fixed placeholder quote; there is no market-data integration yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRates;

#[async_trait]
impl MarketRates for PlaceholderRates {
    async fn rate(&self, product: &str) -> Result<String, ServiceError> {
        Ok(format!(
            "The current market rate of {product} is ₹5000 per quintal."
        ))
    }
}

/// Renders a market-rate outcome as the reply shown to the user.
pub fn render_rate(result: Result<String, ServiceError>) -> String {
    match result {
        Ok(rate) => rate,
        Err(e) => format!("Error fetching market rate: {e}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_rate() {
        let rate = PlaceholderRates.rate("Soybean").await.unwrap();
        assert_eq!(rate, "The current market rate of Soybean is ₹5000 per quintal.");
    }

    #[test]
    fn test_render_rate_error() {
        let err = ServiceError::Api("exchange closed".to_string());
        assert_eq!(
            render_rate(Err(err)),
            "Error fetching market rate: exchange closed"
        );
    }
}
