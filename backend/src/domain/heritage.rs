//! Heritage point records and coordinate normalisation.

use std::fmt;

use crate::domain::geo::LatLon;
use crate::domain::user::{DisplayName, UserId};

/// Validation errors returned by the heritage point constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum HeritageValidationError {
    EmptyName,
    NameTooLong { max: usize },
    LatitudeNotNumeric { input: String },
    LongitudeNotNumeric { input: String },
    LatitudeOutOfRange { value: f64 },
    LongitudeOutOfRange { value: f64 },
}

impl fmt::Display for HeritageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "point name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "point name must be at most {max} characters")
            }
            Self::LatitudeNotNumeric { input } => {
                write!(f, "latitude {input:?} is not a decimal number")
            }
            Self::LongitudeNotNumeric { input } => {
                write!(f, "longitude {input:?} is not a decimal number")
            }
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
        }
    }
}

impl std::error::Error for HeritageValidationError {}

/// Maximum allowed length for a point name.
pub const POINT_NAME_MAX: usize = 100;

/// Name of a heritage point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointName(String);

impl PointName {
    /// Validate and construct a [`PointName`].
    pub fn new(name: impl Into<String>) -> Result<Self, HeritageValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(HeritageValidationError::EmptyName);
        }
        if trimmed.chars().count() > POINT_NAME_MAX {
            return Err(HeritageValidationError::NameTooLong {
                max: POINT_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PointName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A coordinate pair normalised to decimal strings with 6 fractional digits.
///
/// The store's uniqueness constraint compares these strings textually, so the
/// normalisation here is what makes `12.3456780` collide with `12.345678`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    latitude: String,
    longitude: String,
    location: NormalizedLatLon,
}

// Keep the parsed values alongside the strings so map rendering never
// re-parses. Wrapped so equality stays defined by the strings alone.
#[derive(Debug, Clone, Copy)]
struct NormalizedLatLon(LatLon);

impl PartialEq for NormalizedLatLon {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for NormalizedLatLon {}

impl Coordinates {
    /// Parse and normalise raw latitude/longitude form inputs.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, HeritageValidationError> {
        let lat: f64 = latitude.trim().parse().map_err(|_| {
            HeritageValidationError::LatitudeNotNumeric {
                input: latitude.to_owned(),
            }
        })?;
        let lon: f64 = longitude.trim().parse().map_err(|_| {
            HeritageValidationError::LongitudeNotNumeric {
                input: longitude.to_owned(),
            }
        })?;
        Self::from_values(lat, lon)
    }

    /// Normalise already-numeric latitude/longitude values.
    pub fn from_values(lat: f64, lon: f64) -> Result<Self, HeritageValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(HeritageValidationError::LatitudeOutOfRange { value: lat });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(HeritageValidationError::LongitudeOutOfRange { value: lon });
        }
        let latitude = format!("{lat:.6}");
        let longitude = format!("{lon:.6}");
        // Re-parse the rounded strings so the carried values match the text.
        let location = NormalizedLatLon(LatLon::new(
            latitude.parse().unwrap_or(lat),
            longitude.parse().unwrap_or(lon),
        ));
        Ok(Self {
            latitude,
            longitude,
            location,
        })
    }

    /// Reconstruct from strings previously normalised by this type.
    ///
    /// Used when reading rows back from the store; inputs that fail to parse
    /// are rejected rather than silently coerced.
    pub fn from_stored(latitude: &str, longitude: &str) -> Result<Self, HeritageValidationError> {
        Self::parse(latitude, longitude)
    }

    /// Normalised latitude string (6 fractional digits).
    pub fn latitude(&self) -> &str {
        self.latitude.as_str()
    }

    /// Normalised longitude string (6 fractional digits).
    pub fn longitude(&self) -> &str {
        self.longitude.as_str()
    }

    /// Numeric location for map rendering.
    pub fn location(&self) -> LatLon {
        self.location.0
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// A heritage point about to be inserted for its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHeritagePoint {
    name: PointName,
    coordinates: Coordinates,
    owner: UserId,
}

impl NewHeritagePoint {
    /// Assemble a new point from validated components.
    pub fn new(name: PointName, coordinates: Coordinates, owner: UserId) -> Self {
        Self {
            name,
            coordinates,
            owner,
        }
    }

    /// Point name.
    pub fn name(&self) -> &PointName {
        &self.name
    }

    /// Normalised coordinates.
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Owning user.
    pub fn owner(&self) -> UserId {
        self.owner
    }
}

/// A heritage point joined with its owner's display name, as listed on the
/// map view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedHeritagePoint {
    name: PointName,
    coordinates: Coordinates,
    owner_name: DisplayName,
}

impl OwnedHeritagePoint {
    /// Assemble a listed point from validated components.
    pub fn new(name: PointName, coordinates: Coordinates, owner_name: DisplayName) -> Self {
        Self {
            name,
            coordinates,
            owner_name,
        }
    }

    /// Point name.
    pub fn name(&self) -> &PointName {
        &self.name
    }

    /// Normalised coordinates.
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Display name of the owning user.
    pub fn owner_name(&self) -> &DisplayName {
        &self.owner_name
    }
}
