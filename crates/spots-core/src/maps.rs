//! Map deep links and the map launcher port.

use std::future::Future;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::models::Spot;
use crate::util::is_http_url;
use crate::{Error, Result};

/// Mapping application to open a spot in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MapApp {
    /// Google Maps app, via its URI scheme
    GoogleMaps,
    /// Apple Maps
    AppleMaps,
    /// Any app registered for `geo:` URIs
    Geo,
    /// Google Maps in the browser
    #[default]
    Browser,
}

/// Every link flavour for one coordinate pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLinks {
    pub web: String,
    pub apple: String,
    pub google_app: String,
    pub geo: String,
}

impl MapLinks {
    /// Build links for a coordinate pair
    pub fn new(lat: f64, lng: f64) -> Self {
        let query = urlencoding::encode(&format!("{lat},{lng}")).into_owned();
        Self {
            web: format!("https://www.google.com/maps/search/?api=1&query={query}"),
            apple: format!("http://maps.apple.com/?q={query}"),
            google_app: format!("comgooglemaps://?q={query}"),
            geo: format!("geo:{lat},{lng}?q={query}"),
        }
    }

    /// Build links for a spot
    pub fn for_spot(spot: &Spot) -> Self {
        Self::new(spot.lat, spot.lng)
    }

    /// Native link for an app, `None` for the browser
    pub fn native(&self, app: MapApp) -> Option<&str> {
        match app {
            MapApp::GoogleMaps => Some(self.google_app.as_str()),
            MapApp::AppleMaps => Some(self.apple.as_str()),
            MapApp::Geo => Some(self.geo.as_str()),
            MapApp::Browser => None,
        }
    }
}

/// Opens URIs in external applications.
pub trait MapLauncher: Send + Sync {
    /// Whether something is registered to handle the URI
    fn can_open(&self, url: &str) -> impl Future<Output = bool> + Send;

    /// Hand the URI to its handler
    fn open(&self, url: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Open a spot in the chosen map app, falling back to the web map.
///
/// Returns the URI that was opened.
pub async fn open_in_maps<L: MapLauncher>(launcher: &L, spot: &Spot, app: MapApp) -> Result<String> {
    let links = MapLinks::for_spot(spot);

    if let Some(native) = links.native(app) {
        if launcher.can_open(native).await {
            match launcher.open(native).await {
                Ok(()) => return Ok(native.to_string()),
                Err(error) => {
                    tracing::warn!("Opening {app:?} failed, using web map instead: {error}");
                }
            }
        } else {
            tracing::debug!("No handler for {native}, using web map instead");
        }
    }

    launcher
        .open(&links.web)
        .await
        .map_err(|error| Error::MapLaunchFailed(format!("{}: {error}", links.web)))?;
    Ok(links.web)
}

/// Text shared for a spot: the title on its own line when set, then the web link
pub fn share_message(spot: &Spot) -> String {
    let url = MapLinks::for_spot(spot).web;
    match spot.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => format!("{title}\n{url}"),
        _ => url,
    }
}

/// Launcher that hands URIs to the desktop's default opener.
///
/// Only `http(s)` URIs are reported as openable; custom schemes cannot be
/// probed from a desktop shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMapLauncher;

impl SystemMapLauncher {
    fn opener_command(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(url);
            command
        } else if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", "", url]);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(url);
            command
        }
    }
}

impl MapLauncher for SystemMapLauncher {
    async fn can_open(&self, url: &str) -> bool {
        is_http_url(url)
    }

    async fn open(&self, url: &str) -> Result<()> {
        let mut command = Self::opener_command(url);
        let status = tokio::task::spawn_blocking(move || command.status())
            .await
            .map_err(|error| Error::MapLaunchFailed(error.to_string()))??;

        if status.success() {
            Ok(())
        } else {
            Err(Error::MapLaunchFailed(format!(
                "opener exited with status {status}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        reachable: HashSet<&'static str>,
        broken: HashSet<&'static str>,
        opened: Mutex<Vec<String>>,
    }

    impl RecordingLauncher {
        fn with_schemes(reachable: &[&'static str], broken: &[&'static str]) -> Self {
            Self {
                reachable: reachable.iter().copied().collect(),
                broken: broken.iter().copied().collect(),
                opened: Mutex::default(),
            }
        }

        fn scheme(url: &str) -> &str {
            url.split(':').next().unwrap_or_default()
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl MapLauncher for RecordingLauncher {
        async fn can_open(&self, url: &str) -> bool {
            self.reachable.contains(Self::scheme(url))
        }

        async fn open(&self, url: &str) -> Result<()> {
            if self.broken.contains(Self::scheme(url)) {
                return Err(Error::MapLaunchFailed("broken handler".into()));
            }
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn spot() -> Spot {
        let mut spot = Spot::new(45.5, 9.25);
        spot.title = Some("Bar Centrale".to_string());
        spot
    }

    #[test]
    fn links_encode_coordinates() {
        let links = MapLinks::new(45.5, 9.25);
        assert_eq!(
            links.web,
            "https://www.google.com/maps/search/?api=1&query=45.5%2C9.25"
        );
        assert_eq!(links.apple, "http://maps.apple.com/?q=45.5%2C9.25");
        assert_eq!(links.google_app, "comgooglemaps://?q=45.5%2C9.25");
        assert_eq!(links.geo, "geo:45.5,9.25?q=45.5%2C9.25");
    }

    #[test]
    fn links_print_whole_degrees_without_fraction() {
        let links = MapLinks::new(45.0, -9.0);
        assert_eq!(links.geo, "geo:45,-9?q=45%2C-9");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn opens_native_app_when_reachable() {
        let launcher = RecordingLauncher::with_schemes(&["comgooglemaps"], &[]);
        let opened = open_in_maps(&launcher, &spot(), MapApp::GoogleMaps)
            .await
            .unwrap();
        assert_eq!(opened, "comgooglemaps://?q=45.5%2C9.25");
        assert_eq!(launcher.opened(), vec![opened]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn falls_back_to_web_when_app_missing() {
        let launcher = RecordingLauncher::with_schemes(&[], &[]);
        let opened = open_in_maps(&launcher, &spot(), MapApp::Geo).await.unwrap();
        assert!(opened.starts_with("https://www.google.com/maps/search/"));
        assert_eq!(launcher.opened().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn falls_back_to_web_when_app_fails() {
        let launcher = RecordingLauncher::with_schemes(&["geo"], &["geo"]);
        let opened = open_in_maps(&launcher, &spot(), MapApp::Geo).await.unwrap();
        assert!(opened.starts_with("https://"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reports_failure_when_fallback_fails() {
        let launcher = RecordingLauncher::with_schemes(&[], &["https"]);
        let error = open_in_maps(&launcher, &spot(), MapApp::Browser)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::MapLaunchFailed(_)));
        assert!(launcher.opened().is_empty());
    }

    #[test]
    fn share_message_includes_title_when_set() {
        let mut spot = spot();
        assert_eq!(
            share_message(&spot),
            "Bar Centrale\nhttps://www.google.com/maps/search/?api=1&query=45.5%2C9.25"
        );

        spot.title = Some("  ".to_string());
        assert_eq!(
            share_message(&spot),
            "https://www.google.com/maps/search/?api=1&query=45.5%2C9.25"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn system_launcher_only_probes_web_links() {
        assert!(SystemMapLauncher.can_open("https://example.com").await);
        assert!(!SystemMapLauncher.can_open("comgooglemaps://?q=1,2").await);
    }
}
