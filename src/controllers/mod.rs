pub mod attachments;
pub mod health;
pub mod notes;

use actix_web::HttpResponse;

use crate::error::JournalError;

/// Map a core error to its HTTP shape. Remote sync errors never reach here:
/// they are logged inside the sync subsystem and retried on the next cycle.
pub(crate) fn error_response(err: JournalError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        JournalError::InvalidId(_) => HttpResponse::BadRequest().json(body),
        JournalError::AttachmentOutOfRange { .. } => HttpResponse::NotFound().json(body),
        JournalError::StorageUnavailable(_)
        | JournalError::StorageWrite(_)
        | JournalError::SyncStage(_)
        | JournalError::SyncRemote(_) => HttpResponse::InternalServerError().json(body),
    }
}
