use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{PillarDefinition, RatioDefinition, Registry};

/// Loads the pillar registry from the `pillars.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// registry file, deserializes it into our strongly-typed `Registry` struct,
/// validates it, and returns it.
pub fn load_registry() -> Result<Registry, ConfigError> {
    load_registry_from("pillars")
}

/// Loads and validates a pillar registry from an arbitrary file stem.
pub fn load_registry_from(name: &str) -> Result<Registry, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `<name>.toml`
        .add_source(config::File::with_name(name))
        .build()?;

    // Attempt to deserialize the entire registry into our `Registry` struct
    let registry = builder.try_deserialize::<Registry>()?;
    registry.validate()?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY_TOML: &str = r#"
        [[pillars]]
        key = "reach"
        label = "REACH"
        metric = "subs_per_month"
        aggregate = "total_views"

        [[pillars]]
        key = "engagement"
        label = "ENGAGEMENT"
        metric = "comments_per_minute"
        aggregate = "likes"

        [[ratios]]
        name = "engagement_ratio"
        numerators = ["likes", "comments"]
        denominator = "total_views"
    "#;

    fn parse(toml: &str) -> Result<Registry, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let registry = builder.try_deserialize::<Registry>()?;
        registry.validate()?;
        Ok(registry)
    }

    #[test]
    fn registry_deserializes_from_toml() {
        let registry = parse(REGISTRY_TOML).unwrap();

        assert_eq!(registry.pillars.len(), 2);
        assert_eq!(registry.pillars[0].key, "reach");
        assert_eq!(registry.pillars[1].aggregate, "likes");
        assert_eq!(registry.ratios[0].numerators, vec!["likes", "comments"]);
    }

    #[test]
    fn ratios_section_is_optional() {
        let registry = parse(
            r#"
            [[pillars]]
            key = "reach"
            label = "REACH"
            metric = "subs_per_month"
            aggregate = "total_views"
        "#,
        )
        .unwrap();

        assert!(registry.ratios.is_empty());
    }

    #[test]
    fn invalid_registry_fails_to_load() {
        // Duplicate pillar keys pass parsing but fail validation.
        let result = parse(
            r#"
            [[pillars]]
            key = "reach"
            label = "REACH"
            metric = "subs_per_month"
            aggregate = "total_views"

            [[pillars]]
            key = "reach"
            label = "REACH AGAIN"
            metric = "subs_per_minute"
            aggregate = "total_minutes"
        "#,
        );

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
