use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::controllers::error_response;
use crate::notes::id::NoteId;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexEntry {
    file_name: String,
    preview: String,
    attachment_count: usize,
}

#[derive(Debug, Serialize)]
struct IndexResponse {
    files: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    q: Option<String>,
}

/// List notes, most recent first; a non-empty `q` switches to ranked search.
async fn get_index(data: web::Data<AppState>, query: web::Query<IndexQuery>) -> impl Responder {
    let files = data
        .journal
        .list(query.q.as_deref().unwrap_or(""))
        .into_iter()
        .map(|summary| IndexEntry {
            file_name: summary.id.to_string(),
            preview: summary.preview,
            attachment_count: summary.attachment_count,
        })
        .collect();

    HttpResponse::Ok().json(IndexResponse { files })
}

#[derive(Debug, Deserialize)]
struct FileQuery {
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileResponse {
    file_name: String,
    content: String,
    attachment_count: usize,
}

/// Fetch one note from the cache. A note that is not cached reads as empty
/// rather than missing.
async fn get_file(data: web::Data<AppState>, query: web::Query<FileQuery>) -> impl Responder {
    let id = match resolve_id(query.name.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let (content, attachment_count) = match data.journal.get(&id) {
        Some(note) => (note.content, note.attachment_count),
        None => (String::new(), 0),
    };

    HttpResponse::Ok().json(FileResponse {
        file_name: id.to_string(),
        content,
        attachment_count,
    })
}

#[derive(Debug, Deserialize)]
struct SaveRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct SaveResponse {
    status: &'static str,
}

async fn save(
    data: web::Data<AppState>,
    query: web::Query<FileQuery>,
    body: web::Json<SaveRequest>,
) -> impl Responder {
    let id = match resolve_id(query.name.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.journal.save(&id, body.into_inner().text).await {
        Ok(()) => HttpResponse::Ok().json(SaveResponse {
            status: "save scheduled",
        }),
        Err(e) => {
            log::error!("save for {} failed: {}", id, e);
            error_response(e)
        }
    }
}

/// An explicit `name` must be a valid identifier; no name means today.
fn resolve_id(name: Option<&str>) -> Result<NoteId, HttpResponse> {
    match name {
        Some(raw) => NoteId::parse(raw).map_err(error_response),
        None => Ok(NoteId::today()),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/getindex", web::get().to(get_index))
        .route("/getfile", web::get().to(get_file))
        .route("/save", web::post().to(save));
}
