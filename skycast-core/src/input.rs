//! Turns the three triggers (typed text, device position, voice transcript) into a [`Query`].
//!
//! Position and speech are external capabilities reached through the traits below; each one
//! yields a single result or error.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::{GeoError, SpeechError, WeatherError},
    model::{Coordinates, Query},
};

/// Which kind of trigger started an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Text,
    Geolocation,
    Voice,
}

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeoError>;
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync + Debug {
    /// Listen once and return what was said.
    async fn listen(&self) -> Result<String, SpeechError>;
}

/// A device without positioning hardware: answers with configured coordinates, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedGeolocator {
    position: Option<Coordinates>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        self.position.ok_or(GeoError::PositionUnavailable)
    }
}

pub fn resolve_text(text: &str) -> Result<Query, WeatherError> {
    Query::parse(text)
}

pub async fn resolve_position(geolocator: &dyn Geolocator) -> Result<Query, WeatherError> {
    let coords = geolocator.current_position().await?;
    Ok(Query::from(coords))
}

/// Fails with `UnsupportedCapability` when there is no recognizer at all.
pub async fn capture_transcript(
    recognizer: Option<&dyn SpeechRecognizer>,
) -> Result<String, WeatherError> {
    let recognizer = recognizer.ok_or(WeatherError::UnsupportedCapability("Voice input"))?;
    Ok(recognizer.listen().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Debug)]
    struct DeniedGeolocator;

    #[async_trait]
    impl Geolocator for DeniedGeolocator {
        async fn current_position(&self) -> Result<Coordinates, GeoError> {
            Err(GeoError::PermissionDenied)
        }
    }

    #[derive(Debug)]
    struct Scripted(Result<String, SpeechError>);

    #[async_trait]
    impl SpeechRecognizer for Scripted {
        async fn listen(&self) -> Result<String, SpeechError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn position_becomes_lat_lon_query() {
        let geo = FixedGeolocator::new(Some(Coordinates { latitude: 51.5, longitude: -0.12 }));
        let query = resolve_position(&geo).await.expect("position configured");
        assert_eq!(query.as_str(), "51.5,-0.12");
    }

    #[tokio::test]
    async fn missing_position_is_location_unavailable() {
        let err = resolve_position(&FixedGeolocator::default()).await.unwrap_err();
        assert_eq!(err, WeatherError::LocationUnavailable(GeoError::PositionUnavailable));

        let err = resolve_position(&DeniedGeolocator).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LocationUnavailable);
    }

    #[tokio::test]
    async fn absent_recognizer_is_unsupported() {
        let err = capture_transcript(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedCapability);
    }

    #[tokio::test]
    async fn recognizer_result_is_passed_through() {
        let ok = Scripted(Ok("Tokyo".into()));
        let transcript = capture_transcript(Some(&ok as &dyn SpeechRecognizer)).await;
        assert_eq!(transcript, Ok("Tokyo".to_string()));

        let failing = Scripted(Err(SpeechError::NoSpeech));
        let err = capture_transcript(Some(&failing as &dyn SpeechRecognizer)).await.unwrap_err();
        assert_eq!(err, WeatherError::SpeechRecognition(SpeechError::NoSpeech));
    }

    #[test]
    fn text_is_trimmed_or_rejected() {
        assert_eq!(resolve_text(" 10001 ").map(|q| q.to_string()), Ok("10001".to_string()));
        assert_eq!(resolve_text("  "), Err(WeatherError::EmptyQuery));
    }
}
