use crate::domain::config::Config;
use crate::error::{HarnessError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fixed amount used by every probe that moves money.
pub const TEST_AMOUNT: Amount = Amount(dec!(10.00));
pub const TEST_CURRENCY: &str = "USD";

/// A strictly positive monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(HarnessError::InvalidAmount(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = HarnessError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Parameters for `create_payment_intent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentParams {
    pub amount: Amount,
    pub currency: String,
    pub business_id: String,
}

impl IntentParams {
    /// The fixed test intent for the given business.
    pub fn test_intent(config: &Config) -> Self {
        Self {
            amount: TEST_AMOUNT,
            currency: TEST_CURRENCY.to_string(),
            business_id: config.business_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: Amount,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData {
    pub name: String,
    pub email: String,
}

impl Default for CustomerData {
    fn default() -> Self {
        Self {
            name: "Test Customer".to_string(),
            email: "test.customer@example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetStyle {
    pub theme: Option<String>,
    pub font_family: Option<String>,
}

/// Parameters for both widget mounts. `selector` names the target surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormParams {
    pub selector: String,
    pub amount: Amount,
    pub currency: String,
    pub business_id: String,
    pub customer_data: CustomerData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<WidgetStyle>,
}

impl FormParams {
    pub fn test_form(config: &Config, selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            amount: TEST_AMOUNT,
            currency: TEST_CURRENCY.to_string(),
            business_id: config.business_id.clone(),
            customer_data: CustomerData::default(),
            style: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(HarnessError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(HarnessError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_fixed_test_intent() {
        let params = IntentParams::test_intent(&Config::new("pk_1", "b1"));
        assert_eq!(params.amount.value(), dec!(10.00));
        assert_eq!(params.currency, "USD");
        assert_eq!(params.business_id, "b1");
    }

    #[test]
    fn test_form_params_target_selector() {
        let params = FormParams::test_form(&Config::new("pk_1", "b1"), "card-element");
        assert_eq!(params.selector, "card-element");
        assert!(params.style.is_none());
    }
}
