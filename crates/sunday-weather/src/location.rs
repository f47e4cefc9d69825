//! Where the user is, for "weather by location".

use async_trait::async_trait;

use crate::types::{Location, LocationError};

/// Source of the user's position.
///
/// Implementations answer `Unsupported` when no positioning exists at all,
/// and one of the other errors when it exists but fails or is refused.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_location(&self) -> Result<Location, LocationError>;
}

/// Answers with a fixed position, typically taken from config or flags
#[derive(Debug, Clone, Default)]
pub struct StaticGeolocator {
    location: Option<Location>,
}

impl StaticGeolocator {
    pub fn new(location: Option<Location>) -> Self {
        Self { location }
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(Some(Location::new(latitude, longitude)))
    }
}

#[async_trait]
impl Geolocator for StaticGeolocator {
    async fn current_location(&self) -> Result<Location, LocationError> {
        self.location.clone().ok_or(LocationError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[tokio::test]
    async fn test_static_location() {
        let loc = StaticGeolocator::at(47.6062, -122.3321)
            .current_location()
            .await
            .unwrap();
        assert_eq!(loc.latitude, 47.6062);
        assert_eq!(loc.longitude, -122.3321);
        assert!(loc.city_name.is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_is_unsupported() {
        let err = StaticGeolocator::default()
            .current_location()
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    struct RefusingGeolocator;

    #[async_trait]
    impl Geolocator for RefusingGeolocator {
        async fn current_location(&self) -> Result<Location, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn test_geolocators_behind_shared_trait_object() {
        let sources: Vec<std::sync::Arc<dyn Geolocator>> = vec![
            std::sync::Arc::new(StaticGeolocator::at(59.91, 10.75)),
            std::sync::Arc::new(RefusingGeolocator),
        ];

        let found = sources[0].current_location().await.unwrap();
        assert_eq!(found.latitude, 59.91);

        let refused = sources[1].current_location().await.unwrap_err();
        assert!(matches!(refused, LocationError::PermissionDenied));
        assert!(!refused.is_unsupported());
    }
}
