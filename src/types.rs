use {
    crate::{ChartError, Result},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

// One captured snapshot file: every result shares the batch's capture instant
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeBatch {
    pub date: DateTime<Utc>,
    pub results: Vec<RawProbeResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProbeResult {
    pub source: ProbeSource,
    #[serde(default)]
    pub response: Option<ProbeResponse>,
    #[serde(default)]
    pub error: Option<serde_json::Value>, // carried through, never aggregated
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSource {
    pub booking_source: BookingSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingSource {
    pub vaccination: String,
    pub insurance: Insurance,
    pub site: Site,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub doctolib: DoctolibSite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctolibSite {
    pub practice_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeResponse {
    #[serde(default)]
    pub next: Option<String>,
    pub data: AvailabilityData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityData {
    #[serde(default)]
    pub availabilities: Vec<Availability>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub slots: Vec<serde_json::Value>, // only the count matters
}

// Upstream may add insurance classes at any time; unknown ones are kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Insurance {
    Public,
    Private,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    Arena,
    Messe,
    Tegel,
    Tempelhof,
    Velodrom,
    ErikaHess,
}

impl Location {
    /// Resolves a Doctolib practice identifier. Unknown sites are an error,
    /// never a default, since a misfiled record would skew every aggregate.
    pub fn from_practice_id(id: &str) -> Result<Self> {
        match id {
            "158431" => Ok(Self::Arena),
            "158434" => Ok(Self::Messe),
            "158436" => Ok(Self::Tegel),
            "158433" => Ok(Self::Tempelhof),
            "158435" => Ok(Self::Velodrom),
            "158437" => Ok(Self::ErikaHess),
            _ => Err(ChartError::UnknownSite(id.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaccinationType {
    BiontechPfizer,
    Moderna,
    Astrazeneca,
}

impl VaccinationType {
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "BIONTECH_PFIZER" => Ok(Self::BiontechPfizer),
            "MODERNA" => Ok(Self::Moderna),
            "ASTRAZENECA" => Ok(Self::Astrazeneca),
            _ => Err(ChartError::UnknownVaccine(code.to_string())),
        }
    }
}
