use terrain::TerrainError;

/// Error type for analysis requests.
///
/// Every failure is terminal for the request: nothing is retried, and no
/// partial result is produced.
#[derive(Debug)]
pub enum AnalysisError {
    /// Another analysis of the same kind is already in flight. Reported
    /// synchronously; nothing is mutated and the sampler is never called.
    Busy { analyzer: &'static str },
    /// The terrain sampler rejected the request.
    Terrain(TerrainError),
    /// The terrain sampler returned a result not positionally aligned with
    /// the request.
    Misaligned { requested: usize, returned: usize },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Busy { analyzer } => {
                write!(f, "{analyzer} is already processing.")
            }
            AnalysisError::Terrain(err) => write!(f, "{err}"),
            AnalysisError::Misaligned {
                requested,
                returned,
            } => {
                write!(
                    f,
                    "terrain sampler returned {returned} heights for {requested} points"
                )
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Terrain(err) => Some(err),
            _ => None,
        }
    }
}
