use thiserror::Error;

/// Reasons the geolocation capability can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("location permission was denied")]
    PermissionDenied,
    #[error("position is unavailable")]
    PositionUnavailable,
    #[error("timed out waiting for a position")]
    Timeout,
}

/// Reasons the speech-to-text capability can fail once it has started listening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("no speech was detected")]
    NoSpeech,
    #[error("listening was aborted")]
    Aborted,
    #[error("{0}")]
    Other(String),
}

/// Every way a lookup attempt can end without a new forecast.
///
/// The `Display` text is the notice shown to the user, so it is written for them rather
/// than for a log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeatherError {
    #[error("Please enter a location.")]
    EmptyQuery,

    #[error("Unable to get your location ({0}). Please enter a location manually.")]
    LocationUnavailable(GeoError),

    #[error("{0} is not supported here.")]
    UnsupportedCapability(&'static str),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Failed to reach the weather service: {0}")]
    TransportError(String),

    #[error("The weather service sent an unexpected response: {0}")]
    MalformedResponse(String),

    #[error("Voice input failed: {0}")]
    SpeechRecognition(SpeechError),
}

/// Field-less discriminant of [`WeatherError`], handy for matching and structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyQuery,
    LocationUnavailable,
    UnsupportedCapability,
    LocationNotFound,
    TransportError,
    MalformedResponse,
    SpeechRecognition,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::EmptyQuery => ErrorKind::EmptyQuery,
            WeatherError::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
            WeatherError::UnsupportedCapability(_) => ErrorKind::UnsupportedCapability,
            WeatherError::LocationNotFound(_) => ErrorKind::LocationNotFound,
            WeatherError::TransportError(_) => ErrorKind::TransportError,
            WeatherError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            WeatherError::SpeechRecognition(_) => ErrorKind::SpeechRecognition,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::TransportError(err.to_string())
    }
}

impl From<GeoError> for WeatherError {
    fn from(err: GeoError) -> Self {
        WeatherError::LocationUnavailable(err)
    }
}

impl From<SpeechError> for WeatherError {
    fn from(err: SpeechError) -> Self {
        WeatherError::SpeechRecognition(err)
    }
}
