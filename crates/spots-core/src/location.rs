//! Location provider port.

use std::future::Future;

use crate::models::{AccuracyTier, Position};
use crate::util::is_valid_coordinate;
use crate::{Error, Result};

/// Source of position fixes.
pub trait LocationProvider: Send + Sync {
    /// Ask for location access; `true` when granted
    fn request_permission(&self) -> impl Future<Output = bool> + Send;

    /// Obtain a fix at the requested accuracy.
    ///
    /// Fails with `PermissionDenied` or `PositionUnavailable`.
    fn get_position(&self, tier: AccuracyTier) -> impl Future<Output = Result<Position>> + Send;
}

/// Provider that hands out a fix supplied by the host, e.g. typed on the
/// command line.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLocationProvider {
    position: Option<Position>,
    granted: bool,
}

impl FixedLocationProvider {
    /// Provider that always reports the given fix
    pub fn new(lat: f64, lng: f64, accuracy: Option<f64>) -> Self {
        Self {
            position: Some(Position::now(lat, lng, accuracy)),
            granted: true,
        }
    }

    /// Provider with permission but no fix
    pub const fn unavailable() -> Self {
        Self {
            position: None,
            granted: true,
        }
    }

    /// Provider whose permission request is refused
    pub const fn denied() -> Self {
        Self {
            position: None,
            granted: false,
        }
    }
}

impl LocationProvider for FixedLocationProvider {
    async fn request_permission(&self) -> bool {
        self.granted
    }

    async fn get_position(&self, tier: AccuracyTier) -> Result<Position> {
        if !self.granted {
            return Err(Error::PermissionDenied);
        }
        let position = self
            .position
            .ok_or_else(|| Error::PositionUnavailable("no position fix supplied".into()))?;

        if !is_valid_coordinate(position.lat, position.lng) {
            return Err(Error::PositionUnavailable(format!(
                "invalid coordinates: {}, {}",
                position.lat, position.lng
            )));
        }

        tracing::debug!(?tier, lat = position.lat, lng = position.lng, "Using fixed position");
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fixed_provider_returns_fix() {
        let provider = FixedLocationProvider::new(45.0, 9.0, Some(20.0));
        assert!(provider.request_permission().await);

        let position = provider.get_position(AccuracyTier::High).await.unwrap();
        assert_eq!(position.lat, 45.0);
        assert_eq!(position.lng, 9.0);
        assert_eq!(position.accuracy, Some(20.0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_denied_provider() {
        let provider = FixedLocationProvider::denied();
        assert!(!provider.request_permission().await);
        assert!(matches!(
            provider.get_position(AccuracyTier::Balanced).await,
            Err(Error::PermissionDenied)
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unavailable_and_invalid_fixes() {
        let provider = FixedLocationProvider::unavailable();
        assert!(matches!(
            provider.get_position(AccuracyTier::Balanced).await,
            Err(Error::PositionUnavailable(_))
        ));

        let provider = FixedLocationProvider::new(120.0, 9.0, None);
        assert!(matches!(
            provider.get_position(AccuracyTier::Balanced).await,
            Err(Error::PositionUnavailable(_))
        ));
    }
}
