use std::fmt::Display;
use std::path::Path;

const ENRICHMENT: &str = "enrichment";
const API: &str = "api";

/// Identifies one of the two services owned by the supervisor.
///
/// The lowercase name is used to tag relayed output lines, as a structured log field and as
/// the folder name for per-service log files.
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub enum ServiceName {
    Enrichment,
    Api,
}

impl ServiceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::Enrichment => ENRICHMENT,
            ServiceName::Api => API,
        }
    }
}

impl AsRef<Path> for ServiceName {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
