pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Provider failure kinds.
///
/// `MissingCredential` is a permanent, expected condition; callers route
/// around the provider. Everything else distinguishes "upstream down" from
/// "upstream answered garbage" for observability, while callers degrade the
/// same way in both cases.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider credential is not configured.")]
	MissingCredential,
	#[error(transparent)]
	Transport(#[from] reqwest::Error),
	#[error("Provider responded with status {status}.")]
	Status { status: u16 },
	#[error("Provider stayed unavailable after {attempts} attempts.")]
	Unavailable { attempts: u32 },
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
}
impl Error {
	/// True when the failure is the expected "no credential configured" case
	/// rather than an upstream outage.
	pub fn is_missing_credential(&self) -> bool {
		matches!(self, Self::MissingCredential)
	}
}
