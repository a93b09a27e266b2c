use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::controllers::error_response;
use crate::notes::id::NoteId;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct AttachmentQuery {
    name: String,
    index: usize,
}

/// Redirect to the stored asset rather than streaming it: the notes tree is
/// mounted read-only under `/db`, so the static file service does the actual
/// byte pushing.
async fn get_attachment(
    data: web::Data<AppState>,
    query: web::Query<AttachmentQuery>,
) -> impl Responder {
    let id = match NoteId::parse(&query.name) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match data.journal.attachment_location(&id, query.index).await {
        Ok(location) => HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish(),
        Err(e) => error_response(e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/getattachment", web::get().to(get_attachment));
}
