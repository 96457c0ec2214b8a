//! Mapping from driven-port failures to domain errors.
//!
//! Connection failures surface as `service_unavailable`; query failures as
//! `internal`, which the HTTP adapter redacts.

use super::Error;
use super::ports::{
    AccountRepositoryError, TokenStoreError, VisitRepositoryError, WorkerRepositoryError,
};

pub(crate) fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { email } => {
            Error::invalid_request(format!("an account already exists for {email}"))
                .with_reason("duplicate_email")
        }
    }
}

pub(crate) fn map_token_error(error: TokenStoreError) -> Error {
    match error {
        TokenStoreError::Connection { message } => {
            Error::service_unavailable(format!("token store unavailable: {message}"))
        }
        TokenStoreError::Query { message } => {
            Error::internal(format!("token store error: {message}"))
        }
    }
}

pub(crate) fn map_worker_error(error: WorkerRepositoryError) -> Error {
    match error {
        WorkerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("worker repository unavailable: {message}"))
        }
        WorkerRepositoryError::Query { message } => {
            Error::internal(format!("worker repository error: {message}"))
        }
        WorkerRepositoryError::DuplicateIdentifier { identifier } => {
            Error::conflict(format!("worker identifier {identifier} already issued"))
        }
    }
}

pub(crate) fn map_visit_error(error: VisitRepositoryError) -> Error {
    match error {
        VisitRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("visit repository unavailable: {message}"))
        }
        VisitRepositoryError::Query { message } => {
            Error::internal(format!("visit repository error: {message}"))
        }
        VisitRepositoryError::MissingWorker { .. } => worker_not_found(),
    }
}

/// The error returned whenever an identifier does not resolve to a worker.
pub(crate) fn worker_not_found() -> Error {
    Error::not_found("Worker not found").with_reason("worker_not_found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(WorkerRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(WorkerRepositoryError::query("bad sql"), ErrorCode::InternalError)]
    #[case(WorkerRepositoryError::duplicate_identifier("WKR-000001"), ErrorCode::Conflict)]
    fn worker_errors_map_to_codes(#[case] error: WorkerRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_worker_error(error).code(), code);
    }

    #[rstest]
    fn missing_worker_on_insert_is_not_found() {
        let error = map_visit_error(VisitRepositoryError::missing_worker("fk"));
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Worker not found");
    }

    #[rstest]
    fn duplicate_email_is_invalid_request() {
        let error = map_account_error(AccountRepositoryError::duplicate_email("a@b.org"));
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
