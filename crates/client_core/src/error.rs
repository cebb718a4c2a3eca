use reqwest::StatusCode;
use shared::domain::RowNumber;
use thiserror::Error;

/// Every way a call to the registrant endpoint can fail.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to registrant endpoint failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("registrant endpoint returned status {0}")]
    Status(StatusCode),
    #[error("registrant endpoint returned an undecodable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A controller action refused because of the current state. State is left
/// untouched whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("no registrant with row {0}")]
    UnknownRow(RowNumber),
    #[error("registrant at row {0} is already accredited")]
    AlreadyAccredited(RowNumber),
    #[error("accreditation for row {0} is already in progress")]
    InFlight(RowNumber),
    #[error("no accreditation is awaiting confirmation")]
    NothingPending,
}
