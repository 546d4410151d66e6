//! Uniqueness, ordering and binding rules of the registration pipeline

use std::time::Duration;
use warden_core::{
    ConnectionIdentity, ConnectionLookup, HealthCheckBinder, HealthCheckFactory, HealthProbe,
    HealthReport, ServiceLocator,
};
use warden_testing::prelude::*;

fn host() -> TestHost {
    TestHost::new()
        .with_connection("main", "redis://host:6379")
        .with_connection("replica", "redis://replica:6379")
}

#[test]
fn duplicate_key_fails_before_second_registration() {
    let mut host = host();
    let provider = TestProvider::redis();
    let calls = provider.calls();
    let registrar = InstanceRegistrar::new(provider, RegistrationContext::new());
    let settings = ProviderSettings::new()
        .with_instance("primary", InstanceSettings::new("main"))
        .with_instance("primary", InstanceSettings::new("replica"));

    let result = registrar.register_all(&settings, &mut host.capabilities());

    match &result {
        Err(RegistrationError::DuplicateRegistrationKey {
            registration_key,
            existing_instance,
        }) => {
            assert_eq!(registration_key, "Cache.Redis:primary");
            assert_eq!(existing_instance, "main");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(calls.added_keys(), vec!["primary"]);
    assert_eq!(calls.parsed_connections(), vec!["redis://host:6379"]);
}

#[test]
fn same_key_in_another_category_is_independent() {
    let mut host = host();
    let context = RegistrationContext::new();
    let cache = InstanceRegistrar::new(TestProvider::redis(), context.clone());
    let queue = InstanceRegistrar::new(
        TestProvider::new(ProviderCategory::Queue, "Redis"),
        context.clone(),
    );

    cache
        .register_all(
            &ProviderSettings::new().with_instance("primary", InstanceSettings::new("main")),
            &mut host.capabilities(),
        )
        .expect("cache registers");
    // Same endpoint is allowed across categories
    queue
        .register_all(
            &ProviderSettings::new().with_instance("primary", InstanceSettings::new("main")),
            &mut host.capabilities(),
        )
        .expect("queue registers");

    assert_eq!(context.ledger().key_count(), 2);
    assert_eq!(context.ledger().connection_count(), 2);
}

#[test]
fn custom_category_named_like_builtin_shares_keys() {
    let mut host = host();
    let context = RegistrationContext::new();
    let builtin = InstanceRegistrar::new(TestProvider::redis(), context.clone());
    let custom = InstanceRegistrar::new(
        TestProvider::new(ProviderCategory::Custom("Cache".to_string()), "Redis"),
        context.clone(),
    );
    let settings = |name: &str| {
        ProviderSettings::new().with_instance(
            "primary",
            InstanceSettings::new(name).with_health_checks(HealthOptions::default()),
        )
    };

    builtin
        .register_all(&settings("main"), &mut host.capabilities())
        .expect("built-in registers");
    let result = custom.register_all(&settings("replica"), &mut host.capabilities());

    TestAssertions::assert_error_kind(&result, RegistrationErrorKind::DuplicateRegistrationKey)
        .expect("same registration key");
    assert_eq!(host.health.names(), vec!["Cache.Redis:primary"]);
}

#[test]
fn blank_name_fails_before_parse() {
    let mut host = host();
    let provider = TestProvider::redis();
    let calls = provider.calls();
    let registrar = InstanceRegistrar::new(provider, RegistrationContext::new());
    let settings = ProviderSettings::new().with_instance(
        "primary",
        InstanceSettings::new("   ").with_connection_string("redis://host:6379"),
    );

    let result = registrar.register_all(&settings, &mut host.capabilities());

    TestAssertions::assert_error_kind(&result, RegistrationErrorKind::MissingName)
        .expect("missing name");
    assert!(calls.parsed_connections().is_empty());
    assert!(calls.added_keys().is_empty());
}

#[test]
fn null_instance_reports_missing_settings() {
    let mut host = host();
    let registrar = InstanceRegistrar::new(TestProvider::redis(), RegistrationContext::new());
    let settings = ProviderSettings::from_yaml_str("instances:\n  primary: ~\n")
        .expect("valid yaml");

    let result = registrar.register_all(&settings, &mut host.capabilities());

    TestAssertions::assert_error_kind(&result, RegistrationErrorKind::MissingSettings)
        .expect("missing settings");
}

#[test]
fn undeclared_settings_report_missing_settings() {
    let mut host = host();
    let provider = TestProvider::redis();
    let calls = provider.calls();
    let registrar = InstanceRegistrar::new(provider, RegistrationContext::new());
    let settings = ProviderSettings::new()
        .with_instance("primary", InstanceSettings::new("main"))
        .with_missing_instance("secondary");

    let result = registrar.register_all(&settings, &mut host.capabilities());

    match result {
        Err(RegistrationError::MissingSettings { provider, key }) => {
            assert_eq!(provider, "Cache.Redis");
            assert_eq!(key, "secondary");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(calls.added_keys(), vec!["primary"]);
}

#[test]
fn named_connection_wins_over_inline_value() {
    let mut host = host();
    let provider = TestProvider::redis();
    let calls = provider.calls();
    let registrar = InstanceRegistrar::new(provider, RegistrationContext::new());
    let settings = ProviderSettings::new().with_instance(
        "primary",
        InstanceSettings::new("main").with_connection_string("redis://inline:6379"),
    );

    registrar
        .register_all(&settings, &mut host.capabilities())
        .expect("registration succeeds");

    assert_eq!(calls.parsed_connections(), vec!["redis://host:6379"]);
}

#[test]
fn inline_connection_used_when_no_named_entry() {
    let mut host = TestHost::new();
    let provider = TestProvider::redis();
    let calls = provider.calls();
    let registrar = InstanceRegistrar::new(provider, RegistrationContext::new());
    let settings = ProviderSettings::new().with_instance(
        "primary",
        InstanceSettings::new("orders").with_connection_string("  redis://orders:6379 "),
    );

    let summary = registrar
        .register_all(&settings, &mut host.capabilities())
        .expect("registration succeeds");

    // Parse hook sees the raw value and normalizes it before hashing
    assert_eq!(calls.parsed_connections(), vec!["  redis://orders:6379 "]);
    assert_eq!(
        summary.instances[0].connection,
        ConnectionIdentity::compute("redis://orders:6379", "")
    );
}

#[test]
fn missing_connection_string_reported() {
    let mut host = TestHost::new();
    let registrar = InstanceRegistrar::new(TestProvider::redis(), RegistrationContext::new());
    let settings = ProviderSettings::new().with_instance(
        "primary",
        InstanceSettings::new("orders").with_connection_string("   "),
    );

    let result = registrar.register_all(&settings, &mut host.capabilities());

    match result {
        Err(RegistrationError::MissingConnectionString { provider, instance }) => {
            assert_eq!(provider, "Cache.Redis");
            assert_eq!(instance, "orders");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn discriminator_separates_shared_endpoint() {
    let mut host = TestHost::new()
        .with_connection("db0", "redis://host:6379")
        .with_connection("db1", "redis://host:6379");
    let provider = TestProvider::redis()
        .with_discriminator("db0", "0")
        .with_discriminator("db1", "1");
    let registrar = InstanceRegistrar::new(provider, RegistrationContext::new());
    let settings = ProviderSettings::new()
        .with_instance("first", InstanceSettings::new("db0"))
        .with_instance("second", InstanceSettings::new("db1"));

    let summary = registrar
        .register_all(&settings, &mut host.capabilities())
        .expect("distinct discriminators register");

    assert_eq!(summary.instance_keys(), vec!["first", "second"]);
    assert_ne!(summary.instances[0].connection, summary.instances[1].connection);
}

#[test]
fn discriminator_cannot_shift_into_connection_string() {
    let mut host = TestHost::new()
        .with_connection("short", "redis://h:637")
        .with_connection("long", "redis://h:6379");
    let registrar = InstanceRegistrar::new(
        TestProvider::redis().with_discriminator("short", "9"),
        RegistrationContext::new(),
    );
    let settings = ProviderSettings::new()
        .with_instance("first", InstanceSettings::new("short"))
        .with_instance("second", InstanceSettings::new("long"));

    let summary = registrar
        .register_all(&settings, &mut host.capabilities())
        .expect("distinct endpoints register");

    assert_eq!(summary.instance_keys(), vec!["first", "second"]);
}

#[test]
fn identity_is_deterministic() {
    let a = ConnectionIdentity::compute("redis://host:6379", "0");
    let b = ConnectionIdentity::compute("redis://host:6379", "0");

    assert_eq!(a, b);
    assert_eq!(a.as_str().len(), 64);
    assert_ne!(a, ConnectionIdentity::compute("redis://host:6379", "1"));
}

#[test]
fn provider_validation_failure_wraps_source() {
    let mut host = host();
    let provider = TestProvider::redis().rejecting("replica");
    let calls = provider.calls();
    let registrar = InstanceRegistrar::new(provider, RegistrationContext::new());
    let settings = ProviderSettings::new()
        .with_instance("primary", InstanceSettings::new("main"))
        .with_instance("secondary", InstanceSettings::new("replica"));

    let result = registrar.register_all(&settings, &mut host.capabilities());

    let error = result.expect_err("validation fails");
    assert!(error.is_provider_failure());
    assert_eq!(error.kind(), RegistrationErrorKind::ProviderValidationFailure);
    assert!(std::error::Error::source(&error).is_some());
    assert_eq!(calls.validated(), vec!["main", "replica"]);
    assert_eq!(calls.added_keys(), vec!["primary"]);
}

#[test]
fn parse_failure_reported_for_blank_named_connection() {
    let mut host = TestHost::new();
    let lookup = |name: &str| (name == "main").then(|| "   ".to_string());
    let mut services = warden_core::KeyedServiceRegistry::new();
    let registrar = InstanceRegistrar::new(TestProvider::redis(), RegistrationContext::new());
    let settings = ProviderSettings::new().with_instance("primary", InstanceSettings::new("main"));
    let mut capabilities = warden_core::Capabilities::new(
        &mut services,
        &lookup,
        &mut host.health,
        &mut host.tracing,
    );

    let result = registrar.register_all(&settings, &mut capabilities);

    TestAssertions::assert_error_kind(&result, RegistrationErrorKind::ConnectionParseFailure)
        .expect("parse failure");
}

#[test]
fn service_registration_failure_reported() {
    let mut host = host();
    let registrar = InstanceRegistrar::new(
        TestProvider::redis().failing_registration("primary"),
        RegistrationContext::new(),
    );
    let settings = ProviderSettings::new().with_instance("primary", InstanceSettings::new("main"));

    let result = registrar.register_all(&settings, &mut host.capabilities());

    TestAssertions::assert_error_kind(&result, RegistrationErrorKind::ServiceRegistrationFailed)
        .expect("registration failure");
    assert!(host.health.is_empty());
}

#[test]
fn health_binding_requires_flag_and_options() {
    let mut host = host();
    let registrar = InstanceRegistrar::new(TestProvider::redis(), RegistrationContext::new());
    let mut flagged_without_options = InstanceSettings::new("replica");
    flagged_without_options.health_checks_enabled = true;
    let mut options_without_flag = InstanceSettings::new("main");
    options_without_flag.health_options = Some(HealthOptions::default());
    let settings = ProviderSettings::new()
        .with_instance("primary", options_without_flag)
        .with_instance("secondary", flagged_without_options);

    let summary = registrar
        .register_all(&settings, &mut host.capabilities())
        .expect("registration succeeds");

    assert_eq!(summary.health_checks_bound(), 0);
    assert!(host.health.is_empty());
}

#[test]
fn health_tags_without_readiness() {
    let mut host = host();
    let registrar = InstanceRegistrar::new(TestProvider::redis(), RegistrationContext::new());
    let options = HealthOptions::builder()
        .timeout_duration(Duration::from_secs(5))
        .build_options();
    let settings = ProviderSettings::new()
        .with_instance("primary", InstanceSettings::new("main").with_health_checks(options));

    registrar
        .register_all(&settings, &mut host.capabilities())
        .expect("registration succeeds");

    let registration = host.health.get("Cache.Redis:primary").expect("bound");
    TestAssertions::assert_tags(registration, &["cache", "redis"]).expect("tags");
    TestAssertions::assert_timeout(registration, Some(Duration::from_secs(5))).expect("timeout");
}

struct AlwaysHealthy;

#[async_trait::async_trait]
impl HealthProbe for AlwaysHealthy {
    async fn check(&self) -> HealthReport {
        HealthReport::healthy()
    }
}

#[test]
fn binding_same_name_twice_registers_once() {
    let mut registry = RecordingHealthRegistry::new();
    let binder = HealthCheckBinder::new();
    let factory: HealthCheckFactory =
        std::sync::Arc::new(|_: &dyn ServiceLocator| -> Box<dyn HealthProbe> { Box::new(AlwaysHealthy) });

    let first = binder.bind_health_check(
        &mut registry,
        "Cache.Redis:primary",
        factory.clone(),
        HealthStatus::Unhealthy,
        vec!["cache".to_string()],
        None,
    );
    let second = binder.bind_health_check(
        &mut registry,
        "Cache.Redis:primary",
        factory,
        HealthStatus::Degraded,
        vec!["cache".to_string()],
        None,
    );

    assert!(first);
    assert!(!second);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.registrations()[0].failure_status, HealthStatus::Unhealthy);
}

#[test]
fn tracing_sources_bound_once_per_provider() {
    let mut host = host();
    let context = RegistrationContext::new();
    let first = InstanceRegistrar::new(TestProvider::redis(), context.clone());
    let second = InstanceRegistrar::new(TestProvider::redis(), context.clone());

    first
        .register_all(
            &ProviderSettings::new()
                .with_tracing(true)
                .with_instance("primary", InstanceSettings::new("main")),
            &mut host.capabilities(),
        )
        .expect("first run");
    let summary = second
        .register_all(
            &ProviderSettings::new()
                .with_tracing(true)
                .with_instance("secondary", InstanceSettings::new("replica")),
            &mut host.capabilities(),
        )
        .expect("second run");

    assert_eq!(host.tracing.call_count(), 1);
    assert!(summary.tracing_sources.is_empty());
}

#[test]
fn closures_act_as_connection_lookup() {
    let lookup = |name: &str| (name == "main").then(|| "redis://host:6379".to_string());

    assert_eq!(lookup.lookup("main").as_deref(), Some("redis://host:6379"));
    assert_eq!(lookup.lookup("other"), None);
}
