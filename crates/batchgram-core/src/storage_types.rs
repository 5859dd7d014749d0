use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Metadata store backend types
///
/// It's defined in core because it's used in configuration and by the storage crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataBackend {
    /// Records live in process memory and are lost on restart.
    Memory,
    /// Records are written as files under a local directory.
    Local,
    /// No store: files are relayed but nothing is recorded.
    None,
}

impl FromStr for MetadataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(MetadataBackend::Memory),
            "local" => Ok(MetadataBackend::Local),
            "none" | "disabled" => Ok(MetadataBackend::None),
            _ => Err(anyhow::anyhow!("Invalid metadata backend: {}", s)),
        }
    }
}

impl Display for MetadataBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataBackend::Memory => write!(f, "memory"),
            MetadataBackend::Local => write!(f, "local"),
            MetadataBackend::None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("memory".parse::<MetadataBackend>().unwrap(), MetadataBackend::Memory);
        assert_eq!("LOCAL".parse::<MetadataBackend>().unwrap(), MetadataBackend::Local);
        assert_eq!("disabled".parse::<MetadataBackend>().unwrap(), MetadataBackend::None);
        assert!("s3".parse::<MetadataBackend>().is_err());
    }
}
