use strata_dns_domain::{CacheConfig, CacheTier, ConfigError, NegativeTtlSource};

#[test]
fn test_cache_config_default_values() {
    let config = CacheConfig::default();

    assert_eq!(config.success_capacity, 9984);
    assert_eq!(config.denial_capacity, 9984);
    assert_eq!(config.min_ttl, 5);
    assert_eq!(config.max_ttl, 3600);
    assert_eq!(config.negative_min_ttl, 5);
    assert_eq!(config.negative_ttl, 1800);
    assert_eq!(config.negative_ttl_source, NegativeTtlSource::SoaMinimum);
    assert_eq!(config.servfail_ttl, 0);
    assert!(!config.allow_zero_ttl);
    assert!((config.prefetch_threshold - 0.1).abs() < f64::EPSILON);
    assert_eq!(config.prefetch_min_hits, 1);
    assert_eq!(config.cacheable_classes, vec!["IN".to_string()]);
    assert!(!config.serve_stale);
    assert_eq!(config.stale_max_age, 3600);
    assert!(config.zones.is_empty());
}

#[test]
fn test_cache_config_empty_table_uses_defaults() {
    let config: CacheConfig = toml::from_str("").unwrap();
    assert_eq!(config.success_capacity, 9984);
    assert_eq!(config.negative_ttl_source, NegativeTtlSource::SoaMinimum);
    assert!(config.validate().is_ok());
}

#[test]
fn test_cache_config_deserialization_with_all_fields() {
    let toml_str = r#"
        success_capacity = 100
        denial_capacity = 50
        min_ttl = 1
        max_ttl = 600
        negative_min_ttl = 2
        negative_ttl = 300
        negative_ttl_source = "fixed"
        servfail_ttl = 10
        allow_zero_ttl = true
        prefetch_threshold = 0.25
        prefetch_min_hits = 3
        cacheable_classes = ["IN", "CH"]
        serve_stale = true
        stale_max_age = 60
        zones = ["example.org."]
    "#;

    let config: CacheConfig = toml::from_str(toml_str).unwrap();

    assert_eq!(config.success_capacity, 100);
    assert_eq!(config.denial_capacity, 50);
    assert_eq!(config.negative_ttl_source, NegativeTtlSource::Fixed);
    assert_eq!(config.servfail_ttl, 10);
    assert!(config.allow_zero_ttl);
    assert_eq!(config.prefetch_min_hits, 3);
    assert_eq!(config.cacheable_class_codes(), vec![1, 3]);
    assert!(config.serve_stale);
    assert_eq!(config.zones, vec!["example.org.".to_string()]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_cache_config_rejects_inverted_ttl_bounds() {
    let config = CacheConfig {
        min_ttl: 100,
        max_ttl: 10,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    let config = CacheConfig {
        negative_min_ttl: 100,
        negative_ttl: 10,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_cache_config_rejects_prefetch_threshold_out_of_range() {
    for threshold in [1.0, 1.5, -0.1] {
        let config = CacheConfig {
            prefetch_threshold: threshold,
            ..Default::default()
        };
        assert!(
            config.validate().is_err(),
            "threshold {} should be rejected",
            threshold
        );
    }

    let disabled = CacheConfig {
        prefetch_threshold: 0.0,
        ..Default::default()
    };
    assert!(disabled.validate().is_ok());
}

#[test]
fn test_cache_config_rejects_unknown_class() {
    let config = CacheConfig {
        cacheable_classes: vec!["XX".to_string()],
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_cache_tier_names() {
    assert_eq!(CacheTier::Success.as_str(), "success");
    assert_eq!(CacheTier::Denial.to_string(), "denial");
    assert_eq!(CacheTier::Success.other(), CacheTier::Denial);
    assert_eq!(CacheTier::ALL.len(), 2);
}
