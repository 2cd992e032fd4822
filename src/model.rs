use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating records or building glyph geometry.
///
/// Layout is pure and deterministic, so every error is raised synchronously
/// at the call that detects it and retrying cannot change the outcome.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("point x={x} lies outside flip bounds [{left}, {right}]")]
    InvalidBounds { x: f64, left: f64, right: f64 },
    #[error("invalid cluster record: {reason}")]
    InvalidCluster { reason: String },
}

/// DNA strand of an ORF. Encoded as `1` / `-1` / `0` in cluster JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Strand {
    Forward,
    Reverse,
    /// No reading direction; rendered as a blunt rectangle.
    Blunt,
}

impl Strand {
    pub fn is_directed(self) -> bool {
        !matches!(self, Strand::Blunt)
    }
}

impl TryFrom<i64> for Strand {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Strand::Forward),
            -1 => Ok(Strand::Reverse),
            0 => Ok(Strand::Blunt),
            other => Err(format!("invalid strand value {other}, expected 1, -1 or 0")),
        }
    }
}

impl From<Strand> for i64 {
    fn from(strand: Strand) -> i64 {
        match strand {
            Strand::Forward => 1,
            Strand::Reverse => -1,
            Strand::Blunt => 0,
        }
    }
}

/// A functional domain inside an ORF's protein product.
///
/// Coordinates are amino acids local to the owning ORF; the layout converts
/// them to nucleotide units (`* 3`) before scaling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Domain {
    pub code: String,
    pub start: i64,
    pub end: i64,
    pub bitscore: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An open reading frame within a cluster, in genomic coordinates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Orf {
    pub id: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<Domain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Orf {
    pub fn len_bp(&self) -> i64 {
        self.end - self.start
    }
}

/// A gene cluster record: the outermost input to the layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cluster {
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub orfs: Vec<Orf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Cluster {
    /// Check every record invariant before any geometry is built.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.end < self.start {
            return Err(LayoutError::InvalidCluster {
                reason: format!("cluster end {} precedes start {}", self.end, self.start),
            });
        }
        for orf in &self.orfs {
            validate_orf(orf, self)?;
            for domain in &orf.domains {
                validate_domain(domain, orf)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_orf(orf: &Orf, cluster: &Cluster) -> Result<(), LayoutError> {
    if orf.end < orf.start {
        return Err(LayoutError::InvalidCluster {
            reason: format!("ORF {} end {} precedes start {}", orf.id, orf.end, orf.start),
        });
    }
    if orf.start < cluster.start || orf.end > cluster.end {
        return Err(LayoutError::InvalidCluster {
            reason: format!(
                "ORF {} spans {}..{}, outside cluster {}..{}",
                orf.id, orf.start, orf.end, cluster.start, cluster.end
            ),
        });
    }
    Ok(())
}

pub(crate) fn validate_domain(domain: &Domain, orf: &Orf) -> Result<(), LayoutError> {
    if domain.start < 0 || domain.end < domain.start {
        return Err(LayoutError::InvalidCluster {
            reason: format!(
                "domain {} has invalid span {}..{}",
                domain.code, domain.start, domain.end
            ),
        });
    }
    if domain.end * 3 > orf.len_bp() {
        return Err(LayoutError::InvalidCluster {
            reason: format!(
                "domain {} ends at amino acid {}, past ORF {} ({} bp)",
                domain.code,
                domain.end,
                orf.id,
                orf.len_bp()
            ),
        });
    }
    Ok(())
}
