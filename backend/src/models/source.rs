use serde::{Deserialize, Serialize};

/// Upstream Google product a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    /// Google Analytics 4 property (traffic metrics).
    #[serde(rename = "GA4")]
    Ga4,
    /// Search Console site (keyword rows, impressions, clicks).
    #[serde(rename = "GSC")]
    Gsc,
    /// Business Profile location (views, actions).
    #[serde(rename = "GBP")]
    Gbp,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Ga4 => "GA4",
            Provider::Gsc => "GSC",
            Provider::Gbp => "GBP",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GA4" | "GA" => Ok(Self::Ga4),
            "GSC" => Ok(Self::Gsc),
            "GBP" => Ok(Self::Gbp),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// A selected upstream resource: GA4 property id, GSC site URL or GBP location id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub provider: Provider,
    pub id: String,
}

impl SourceRef {
    pub fn new(provider: Provider, id: impl Into<String>) -> Self {
        Self {
            provider,
            id: id.into(),
        }
    }

    pub fn ga4(property_id: impl Into<String>) -> Self {
        Self::new(Provider::Ga4, property_id)
    }

    pub fn gsc(site_url: impl Into<String>) -> Self {
        Self::new(Provider::Gsc, site_url)
    }

    pub fn gbp(location_id: impl Into<String>) -> Self {
        Self::new(Provider::Gbp, location_id)
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.provider.as_str(), self.id)
    }
}
