use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::credentials::OAuthCredentials;
use crate::errors::{Error, Result};
use crate::utils::constants::{PAYPAL_API_URL, PAYPAL_API_URL_SANDBOX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentIntent {
    #[default]
    Sale,
    Authorize,
    Order,
}

impl PaymentIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentIntent::Sale => "sale",
            PaymentIntent::Authorize => "authorize",
            PaymentIntent::Order => "order",
        }
    }
}

impl FromStr for PaymentIntent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sale" => Ok(PaymentIntent::Sale),
            "authorize" => Ok(PaymentIntent::Authorize),
            "order" => Ok(PaymentIntent::Order),
            other => Err(format!(
                "unknown payment intent '{}', expected one of sale, authorize, order",
                other
            )),
        }
    }
}

impl fmt::Display for PaymentIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PayPal checkout page shown first to the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LandingPage {
    #[default]
    Login,
    Billing,
}

impl LandingPage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandingPage::Login => "Login",
            LandingPage::Billing => "Billing",
        }
    }
}

impl FromStr for LandingPage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Login" => Ok(LandingPage::Login),
            "Billing" => Ok(LandingPage::Billing),
            other => Err(format!(
                "unknown landing page '{}', expected Login or Billing",
                other
            )),
        }
    }
}

impl fmt::Display for LandingPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of recognized settings fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingField {
    ClientId,
    ClientSecret,
    Sandbox,
    Intent,
    SubmitCart,
    WebhookId,
    WebhookExecuteToken,
    BrandName,
    LandingPage,
    SendOrderNumber,
    OrderNumberPrefix,
}

impl SettingField {
    pub const ALL: [SettingField; 11] = [
        SettingField::ClientId,
        SettingField::ClientSecret,
        SettingField::Sandbox,
        SettingField::Intent,
        SettingField::SubmitCart,
        SettingField::WebhookId,
        SettingField::WebhookExecuteToken,
        SettingField::BrandName,
        SettingField::LandingPage,
        SettingField::SendOrderNumber,
        SettingField::OrderNumberPrefix,
    ];

    /// Field name as used in store keys and update requests.
    pub fn name(&self) -> &'static str {
        match self {
            SettingField::ClientId => "clientId",
            SettingField::ClientSecret => "clientSecret",
            SettingField::Sandbox => "sandbox",
            SettingField::Intent => "intent",
            SettingField::SubmitCart => "submitCart",
            SettingField::WebhookId => "webhookId",
            SettingField::WebhookExecuteToken => "webhookExecuteToken",
            SettingField::BrandName => "brandName",
            SettingField::LandingPage => "landingPage",
            SettingField::SendOrderNumber => "sendOrderNumber",
            SettingField::OrderNumberPrefix => "orderNumberPrefix",
        }
    }

    pub fn from_name(name: &str) -> Option<SettingField> {
        SettingField::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Store key of this field, e.g. `SwagPayPal.settings.clientId`.
    pub fn key(&self, namespace: &str) -> String {
        format!("{}.{}", namespace, self.name())
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed plugin settings. Built whole by the settings service, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    client_id: String,
    client_secret: String,
    sandbox: bool,
    intent: PaymentIntent,
    submit_cart: bool,
    webhook_id: Option<String>,
    webhook_execute_token: Option<String>,
    brand_name: String,
    landing_page: LandingPage,
    send_order_number: bool,
    order_number_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            sandbox: false,
            intent: PaymentIntent::Sale,
            submit_cart: true,
            webhook_id: None,
            webhook_execute_token: None,
            brand_name: String::new(),
            landing_page: LandingPage::Login,
            send_order_number: true,
            order_number_prefix: String::new(),
        }
    }
}

impl Settings {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn intent(&self) -> PaymentIntent {
        self.intent
    }

    pub fn submit_cart(&self) -> bool {
        self.submit_cart
    }

    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id.as_deref()
    }

    pub fn webhook_execute_token(&self) -> Option<&str> {
        self.webhook_execute_token.as_deref()
    }

    pub fn brand_name(&self) -> &str {
        &self.brand_name
    }

    pub fn landing_page(&self) -> LandingPage {
        self.landing_page
    }

    pub fn send_order_number(&self) -> bool {
        self.send_order_number
    }

    pub fn order_number_prefix(&self) -> &str {
        &self.order_number_prefix
    }

    pub fn credentials(&self) -> OAuthCredentials {
        OAuthCredentials::new(self.client_id.clone(), self.client_secret.clone())
    }

    /// Sandbox or live REST API root, depending on the sandbox flag.
    pub fn api_base_url(&self) -> &'static str {
        if self.sandbox {
            PAYPAL_API_URL_SANDBOX
        } else {
            PAYPAL_API_URL
        }
    }

    /// Current value of `field` in its store representation.
    pub fn value_of(&self, field: SettingField) -> Value {
        match field {
            SettingField::ClientId => Value::from(self.client_id.as_str()),
            SettingField::ClientSecret => Value::from(self.client_secret.as_str()),
            SettingField::Sandbox => Value::Bool(self.sandbox),
            SettingField::Intent => Value::from(self.intent.as_str()),
            SettingField::SubmitCart => Value::Bool(self.submit_cart),
            SettingField::WebhookId => optional_value(&self.webhook_id),
            SettingField::WebhookExecuteToken => optional_value(&self.webhook_execute_token),
            SettingField::BrandName => Value::from(self.brand_name.as_str()),
            SettingField::LandingPage => Value::from(self.landing_page.as_str()),
            SettingField::SendOrderNumber => Value::Bool(self.send_order_number),
            SettingField::OrderNumberPrefix => Value::from(self.order_number_prefix.as_str()),
        }
    }

    /// Apply one stored value; type mismatches leave `self` untouched.
    pub(crate) fn apply(&mut self, field: SettingField, value: &Value) -> Result<()> {
        match field {
            SettingField::ClientId => self.client_id = expect_string(field, value)?,
            SettingField::ClientSecret => self.client_secret = expect_string(field, value)?,
            SettingField::Sandbox => self.sandbox = expect_bool(field, value)?,
            SettingField::Intent => self.intent = expect_parsed(field, value)?,
            SettingField::SubmitCart => self.submit_cart = expect_bool(field, value)?,
            SettingField::WebhookId => self.webhook_id = expect_optional_string(field, value)?,
            SettingField::WebhookExecuteToken => {
                self.webhook_execute_token = expect_optional_string(field, value)?
            }
            SettingField::BrandName => self.brand_name = expect_string(field, value)?,
            SettingField::LandingPage => self.landing_page = expect_parsed(field, value)?,
            SettingField::SendOrderNumber => self.send_order_number = expect_bool(field, value)?,
            SettingField::OrderNumberPrefix => {
                self.order_number_prefix = expect_string(field, value)?
            }
        }
        Ok(())
    }
}

fn optional_value(value: &Option<String>) -> Value {
    value
        .as_deref()
        .map(Value::from)
        .unwrap_or(Value::Null)
}

fn invalid(field: SettingField, reason: String) -> Error {
    Error::InvalidSettingValue {
        field: field.name(),
        reason,
    }
}

fn expect_string(field: SettingField, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| invalid(field, format!("expected a string, got {}", value)))
}

fn expect_optional_string(field: SettingField, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        _ => expect_string(field, value).map(Some),
    }
}

fn expect_bool(field: SettingField, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(field, format!("expected a boolean, got {}", value)))
}

fn expect_parsed<T: FromStr<Err = String>>(field: SettingField, value: &Value) -> Result<T> {
    expect_string(field, value)?
        .parse()
        .map_err(|reason| invalid(field, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_names_round_trip() {
        for field in SettingField::ALL {
            assert_eq!(SettingField::from_name(field.name()), Some(field));
        }
        assert_eq!(SettingField::from_name("ClientId"), None);
        assert_eq!(SettingField::from_name("unknown"), None);
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(
            SettingField::ClientId.key("SwagPayPal.settings"),
            "SwagPayPal.settings.clientId"
        );
        assert_eq!(
            SettingField::WebhookExecuteToken.key("SwagPayPal.settings"),
            "SwagPayPal.settings.webhookExecuteToken"
        );
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.client_id(), "");
        assert_eq!(settings.client_secret(), "");
        assert!(!settings.sandbox());
        assert_eq!(settings.intent(), PaymentIntent::Sale);
        assert!(settings.submit_cart());
        assert_eq!(settings.webhook_id(), None);
        assert_eq!(settings.webhook_execute_token(), None);
        assert_eq!(settings.brand_name(), "");
        assert_eq!(settings.landing_page(), LandingPage::Login);
        assert!(settings.send_order_number());
        assert_eq!(settings.order_number_prefix(), "");
    }

    #[test]
    fn enum_spellings_follow_paypal() {
        assert_eq!("authorize".parse::<PaymentIntent>(), Ok(PaymentIntent::Authorize));
        assert_eq!("Billing".parse::<LandingPage>(), Ok(LandingPage::Billing));
        assert!("SALE".parse::<PaymentIntent>().is_err());
        assert!("billing".parse::<LandingPage>().is_err());
        assert_eq!(serde_json::to_value(LandingPage::Login).unwrap(), json!("Login"));
        assert_eq!(serde_json::to_value(PaymentIntent::Order).unwrap(), json!("order"));
    }

    #[test]
    fn apply_rejects_wrong_types_without_mutation() {
        let mut settings = Settings::default();

        let err = settings.apply(SettingField::Sandbox, &json!("yes")).unwrap_err();
        assert!(matches!(err, Error::InvalidSettingValue { field: "sandbox", .. }));

        let err = settings.apply(SettingField::Intent, &json!("capture")).unwrap_err();
        assert!(matches!(err, Error::InvalidSettingValue { field: "intent", .. }));

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn apply_then_value_of_is_identity() {
        let samples = [
            (SettingField::ClientId, json!("testClientId")),
            (SettingField::Sandbox, json!(true)),
            (SettingField::Intent, json!("authorize")),
            (SettingField::WebhookId, json!("testWebhookId")),
            (SettingField::WebhookId, Value::Null),
            (SettingField::LandingPage, json!("Billing")),
            (SettingField::SendOrderNumber, json!(false)),
        ];
        for (field, value) in samples {
            let mut settings = Settings::default();
            settings.apply(field, &value).unwrap();
            assert_eq!(settings.value_of(field), value, "field {}", field);
        }
    }

    #[test]
    fn api_base_url_follows_sandbox_flag() {
        let mut settings = Settings::default();
        assert_eq!(settings.api_base_url(), "https://api.paypal.com/v1");
        settings.apply(SettingField::Sandbox, &json!(true)).unwrap();
        assert_eq!(settings.api_base_url(), "https://api.sandbox.paypal.com/v1");
    }

    #[test]
    fn credentials_come_from_client_fields() {
        let mut settings = Settings::default();
        settings.apply(SettingField::ClientId, &json!("id")).unwrap();
        settings.apply(SettingField::ClientSecret, &json!("secret")).unwrap();
        let credentials = settings.credentials();
        assert_eq!(credentials.client_id(), "id");
        assert_eq!(credentials.client_secret(), "secret");
    }
}
