use std::fmt;

use serde::{Deserialize, Serialize};

/// Simples Nacional annex a month of revenue is taxed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Annex {
    /// Anexo I: commerce.
    #[default]
    #[serde(rename = "I", alias = "AnnexI", alias = "anexo1")]
    AnnexI,
    /// Anexo II: industry.
    #[serde(rename = "II", alias = "AnnexII", alias = "anexo2")]
    AnnexII,
}

impl Annex {
    pub fn all() -> &'static [Annex] {
        &[Annex::AnnexI, Annex::AnnexII]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AnnexI => "Anexo I",
            Self::AnnexII => "Anexo II",
        }
    }

    /// Accepts `I`/`II`, `1`/`2`, `AnnexI`/`AnnexII` and `anexo1`/`anexo2`,
    /// ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" | "1" | "annexi" | "anexo1" | "anexo i" => Some(Self::AnnexI),
            "ii" | "2" | "annexii" | "anexo2" | "anexo ii" => Some(Self::AnnexII),
            _ => None,
        }
    }
}

impl fmt::Display for Annex {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
