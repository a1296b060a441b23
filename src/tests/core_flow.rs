#[cfg(test)]
mod test {
    use std::io::Write;

    use serde_json::json;

    use crate::bootstrap::PayPalCore;
    use crate::config::loader::parse_config;
    use crate::settings::model::PaymentIntent;
    use crate::settings::service::SettingsUpdate;
    use crate::settings::store::SettingsStoreKind;

    #[tokio::test]
    async fn settings_survive_restart_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("paypal-settings.yaml");
        let yaml = format!(
            "settings:\n  store_path: {}\ntoken:\n  safety_margin_seconds: 30\n",
            store_path.display()
        );

        let core = PayPalCore::from_config(parse_config(&yaml).unwrap()).await.unwrap();
        assert!(matches!(core.settings.store(), SettingsStoreKind::File(_)));
        assert_eq!(core.tokens.safety_margin_seconds(), 30);

        core.settings
            .update_settings(&SettingsUpdate::from([
                ("clientId".to_owned(), json!("testClientId")),
                ("clientSecret".to_owned(), json!("testClientSecret")),
                ("sandbox".to_owned(), json!(true)),
                ("intent".to_owned(), json!("order")),
            ]))
            .await
            .unwrap();

        let restarted = PayPalCore::from_config(parse_config(&yaml).unwrap()).await.unwrap();
        let settings = restarted.settings.get_settings().await.unwrap();
        assert_eq!(settings.client_id(), "testClientId");
        assert!(settings.sandbox());
        assert_eq!(settings.intent(), PaymentIntent::Order);
        assert_eq!(settings.api_base_url(), "https://api.sandbox.paypal.com/v1");
    }

    #[tokio::test]
    async fn unconfigured_core_reports_missing_settings_before_any_request() {
        let core = PayPalCore::from_config(parse_config("{}").unwrap()).await.unwrap();
        assert!(matches!(core.settings.store(), SettingsStoreKind::Memory(_)));

        assert!(core.current_token().await.unwrap_err().is_settings_not_found());
        assert!(core
            .test_current_credentials()
            .await
            .unwrap_err()
            .is_settings_not_found());
    }

    #[tokio::test]
    async fn load_reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "settings:\n  namespace: ShopB.paypal\nlogging:\n  level: warn").unwrap();

        let core = PayPalCore::load(file.path()).await.unwrap();
        assert_eq!(core.settings.namespace(), "ShopB.paypal");
        assert_eq!(core.config.logging.level, "warn");
    }
}
