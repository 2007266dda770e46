use std::fmt;

use super::camera::{Camera, ScannerSession};
use crate::domain::{ClientError, LoanSource};
use crate::models::{Loan, LoanStatus};
use crate::modules::qr::{decode_image, parse_scanned, ScannedLoan};
use crate::services::notifications::Notifier;

/// Why a scanned code does not match a loan that may be handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    MalformedPayload,
    NotFound,
    WrongStatus(LoanStatus),
    AlreadyReturned,
}

impl InvalidReason {
    /// Operator-facing explanation for a given scanned loan id
    pub fn message(&self, loan_id: Option<i64>) -> String {
        match self {
            InvalidReason::MalformedPayload => "QR code does not contain valid loan data.".to_string(),
            InvalidReason::NotFound => match loan_id {
                Some(id) => format!("Loan with ID {} not found in the system.", id),
                None => "Loan not found in the system.".to_string(),
            },
            InvalidReason::WrongStatus(status) => format!(
                "This loan's status is \"{}\", not \"approved\". It cannot be picked up.",
                status
            ),
            InvalidReason::AlreadyReturned => "This book has already been returned.".to_string(),
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::MalformedPayload => write!(f, "malformed payload"),
            InvalidReason::NotFound => write!(f, "not found"),
            InvalidReason::WrongStatus(status) => write!(f, "wrong status ({})", status),
            InvalidReason::AlreadyReturned => write!(f, "already returned"),
        }
    }
}

pub const VALID_MESSAGE: &str = "Loan details are valid. You can hand over the book to the student.";

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationState {
    Idle,
    /// Camera is live
    Scanning,
    /// Code decoded, camera released, loan lookup in flight
    Loading,
    Valid { scan: ScannedLoan, message: String },
    Invalid { reason: InvalidReason, message: String },
}

/// Cross-check a well-formed scan against the loan list.
pub fn check_scan(scan: &ScannedLoan, loans: &[Loan]) -> Result<(), InvalidReason> {
    let loan = loans
        .iter()
        .find(|l| l.id == scan.loan_id)
        .ok_or(InvalidReason::NotFound)?;

    if loan.return_date.is_some() || loan.status == LoanStatus::Returned {
        return Err(InvalidReason::AlreadyReturned);
    }
    if loan.status != LoanStatus::Approved {
        return Err(InvalidReason::WrongStatus(loan.status));
    }
    Ok(())
}

/// Front-desk pickup validator.
///
/// One scanner session at most; every way out of `Scanning` (decode,
/// cancel, feed failure, dropping the validator) releases the camera once.
pub struct LoanValidator<C, S> {
    camera: C,
    loans: S,
    notifier: Option<Notifier>,
    state: ValidationState,
    session: Option<ScannerSession>,
}

impl<C: Camera, S: LoanSource> LoanValidator<C, S> {
    pub fn new(camera: C, loans: S) -> Self {
        Self {
            camera,
            loans,
            notifier: None,
            state: ValidationState::Idle,
            session: None,
        }
    }

    /// Report invalid codes and failures as error toasts
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    pub fn is_camera_live(&self) -> bool {
        self.session.as_ref().is_some_and(ScannerSession::is_open)
    }

    pub async fn start_scan(&mut self) -> Result<(), ClientError> {
        if self.state != ValidationState::Idle {
            return Err(ClientError::Validation(
                "A scan is already in progress.".to_string(),
            ));
        }

        match ScannerSession::open(&self.camera).await {
            Ok(session) => {
                self.session = Some(session);
                self.state = ValidationState::Scanning;
                tracing::info!("Pickup scan started");
                Ok(())
            }
            Err(e) => {
                tracing::error!("Could not open camera: {}", e);
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Pull frames until one holds a readable code, then validate it.
    pub async fn run_scan(&mut self) -> Result<&ValidationState, ClientError> {
        if self.state != ValidationState::Scanning {
            return Ok(&self.state);
        }

        loop {
            let frame = match self.session.as_mut() {
                Some(session) => session.next_frame().await,
                None => Ok(None),
            };

            match frame {
                Ok(Some(frame)) => {
                    if let Some(text) = decode_image(&frame) {
                        return self.submit_decoded(&text).await;
                    }
                }
                Ok(None) => {
                    self.stop_scanning();
                    let err = ClientError::Scanner(
                        "Camera feed ended before a code was read.".to_string(),
                    );
                    self.report(&err);
                    return Err(err);
                }
                Err(e) => {
                    tracing::error!("Camera feed failed: {}", e);
                    self.stop_scanning();
                    self.report(&e);
                    return Err(e);
                }
            }
        }
    }

    /// Feed decoded text from a host-side scanner.
    ///
    /// Only the first decode of a session counts: the camera is released
    /// before the lookup, and later decodes are ignored.
    pub async fn submit_decoded(&mut self, text: &str) -> Result<&ValidationState, ClientError> {
        if self.state != ValidationState::Scanning {
            tracing::debug!("Ignoring decode outside of an active scan");
            return Ok(&self.state);
        }

        self.close_session();
        self.state = ValidationState::Loading;

        let scan = match parse_scanned(text) {
            Ok(scan) => scan,
            Err(reason) => {
                self.reject(reason, None);
                return Ok(&self.state);
            }
        };

        let loans = match self.loans.fetch_loans().await {
            Ok(loans) => loans,
            Err(e) => {
                tracing::warn!("Loan lookup failed during validation: {}", e);
                self.state = ValidationState::Idle;
                self.report(&e);
                return Err(e);
            }
        };

        match check_scan(&scan, &loans) {
            Ok(()) => {
                tracing::info!("Loan {} validated for pickup", scan.loan_id);
                self.state = ValidationState::Valid {
                    scan,
                    message: VALID_MESSAGE.to_string(),
                };
            }
            Err(reason) => self.reject(reason, Some(scan.loan_id)),
        }
        Ok(&self.state)
    }

    /// Stop scanning without a result. Also clears a `Loading` state left
    /// behind when the host dropped an unfinished `submit_decoded`/`run_scan`.
    pub fn cancel(&mut self) {
        if matches!(
            self.state,
            ValidationState::Scanning | ValidationState::Loading
        ) {
            tracing::debug!("Pickup scan cancelled");
            self.stop_scanning();
        }
    }

    /// Back to idle after a result has been shown
    pub fn scan_another(&mut self) {
        if matches!(
            self.state,
            ValidationState::Valid { .. } | ValidationState::Invalid { .. }
        ) {
            self.state = ValidationState::Idle;
        }
    }

    fn reject(&mut self, reason: InvalidReason, loan_id: Option<i64>) {
        let message = reason.message(loan_id);
        tracing::info!("Pickup code rejected: {}", reason);
        if let Some(notifier) = &self.notifier {
            notifier.error(message.clone());
        }
        self.state = ValidationState::Invalid { reason, message };
    }

    fn report(&self, err: &ClientError) {
        if let Some(notifier) = &self.notifier {
            notifier.report_error(err);
        }
    }

    fn stop_scanning(&mut self) {
        self.close_session();
        self.state = ValidationState::Idle;
    }

    fn close_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
    }
}
