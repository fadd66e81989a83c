use std::collections::HashMap;

use crate::model::ServiceDescriptor;

use super::error::ValidatorError;

/// The set of services (and their accepted categories) that may receive
/// payloads.
///
/// A service with an empty category list accepts any category.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Vec<String>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(services: HashMap<String, Vec<String>>) -> Self {
        Self { services }
    }

    /// Register a service, optionally restricted to `categories`.
    pub fn with_service<I, S>(mut self, service: impl Into<String>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services.insert(
            service.into(),
            categories.into_iter().map(Into::into).collect(),
        );
        self
    }

    pub fn check(&self, descriptor: &ServiceDescriptor) -> Result<(), ValidatorError> {
        let categories = self
            .services
            .get(&descriptor.service)
            .ok_or_else(|| ValidatorError::UnknownService(descriptor.service.clone()))?;

        if categories.is_empty() || categories.iter().any(|c| c == &descriptor.category) {
            Ok(())
        } else {
            Err(ValidatorError::UnsupportedCategory {
                service: descriptor.service.clone(),
                category: descriptor.category.clone(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service() {
        let registry = ServiceRegistry::new().with_service("advisor", Vec::<String>::new());
        let result = registry.check(&ServiceDescriptor::new("failed", "any"));

        assert_eq!(result, Err(ValidatorError::UnknownService("failed".to_string())));
    }

    #[test]
    fn test_unrestricted_service_accepts_any_category() {
        let registry = ServiceRegistry::new().with_service("advisor", Vec::<String>::new());

        assert!(registry.check(&ServiceDescriptor::new("advisor", "x")).is_ok());
        assert!(registry.check(&ServiceDescriptor::new("advisor", "y")).is_ok());
    }

    #[test]
    fn test_restricted_service() {
        let registry = ServiceRegistry::new().with_service("compliance", ["openscap"]);

        assert!(registry
            .check(&ServiceDescriptor::new("compliance", "openscap"))
            .is_ok());
        assert!(matches!(
            registry.check(&ServiceDescriptor::new("compliance", "tarball")),
            Err(ValidatorError::UnsupportedCategory { .. })
        ));
    }
}
