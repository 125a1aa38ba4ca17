//! Integration tests for mock metrics, advice, and the demo login.

use healthbuddy_core::{
    advise, AuthError, Authenticator, Concern, Config, Credentials, DemoAuthenticator,
    MetricsGenerator,
};

#[test]
fn test_advice_matches_rules_across_many_days() {
    let mut generator = MetricsGenerator::with_seed(77);

    for _ in 0..500 {
        let metrics = generator.refresh();
        let advice = advise(&metrics);
        let expected = if metrics.steps < 5_000 {
            "Vitamin D"
        } else if metrics.sleep_hours < 6.0 {
            "Magnesium"
        } else if metrics.water_ml < 1_000 {
            "Electrolytes"
        } else {
            "Multivitamin"
        };
        assert_eq!(advice.supplement, expected, "{metrics:?}");
    }
}

#[test]
fn test_every_concern_reachable() {
    let mut generator = MetricsGenerator::with_seed(3);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..2_000 {
        seen.insert(format!("{:?}", advise(&generator.refresh()).concern));
    }
    for concern in [
        Concern::LowActivity,
        Concern::ShortSleep,
        Concern::LowHydration,
        Concern::None,
    ] {
        assert!(seen.contains(&format!("{concern:?}")), "{concern:?} never produced");
    }
}

#[test]
fn test_login_uses_configured_account() {
    let mut cfg = Config::default();
    cfg.set("demo_account.email", "ops@buddy.com").unwrap();
    let auth = DemoAuthenticator::new(cfg.demo_credentials());

    assert!(auth
        .authenticate(&Credentials::new("ops@buddy.com", "123456"))
        .is_ok());
    assert_eq!(
        auth.authenticate(&Credentials::new("test@buddy.com", "123456"))
            .unwrap_err(),
        AuthError::InvalidCredentials
    );
}
