//! 설정 직렬화 회귀 테스트.
use airtight_test_recorder::config::{Config, DeliverySettings};
use airtight_test_recorder::delivery::WebhookSettings;
use airtight_test_recorder::judgement::TolerancePolicy;

#[test]
fn default_config_roundtrips_through_toml() {
    let cfg = Config::default();
    let text = toml::to_string_pretty(&cfg).expect("serialize");
    assert!(text.contains("Relative"));
    let parsed: Config = toml::from_str(&text).expect("parse");
    assert_eq!(parsed.tolerance_policy, TolerancePolicy::Relative);
    assert_eq!(parsed.language, "ja");
    assert_eq!(parsed.template_path, "気密試験記録.xlsx");
    assert!(parsed.delivery.webhook.is_none());
    assert!(parsed.delivery.mail.is_none());
}

#[test]
fn delivery_settings_roundtrip_and_clear() {
    let mut cfg = Config {
        tolerance_policy: TolerancePolicy::Absolute,
        delivery: DeliverySettings {
            webhook: Some(WebhookSettings {
                url: "https://example.invalid/hook".to_string(),
            }),
            mail: None,
        },
        ..Config::default()
    };
    let text = toml::to_string_pretty(&cfg).expect("serialize");
    let parsed: Config = toml::from_str(&text).expect("parse");
    assert_eq!(parsed.tolerance_policy, TolerancePolicy::Absolute);
    assert_eq!(
        parsed.delivery.webhook.as_ref().map(|w| w.url.as_str()),
        Some("https://example.invalid/hook")
    );

    cfg.clear_webhook();
    assert!(cfg.delivery.webhook.is_none());
}
