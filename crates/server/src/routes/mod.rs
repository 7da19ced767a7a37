use actix_web::web;
use docbrief_common::DocBriefError;

use crate::error::HttpError;

pub mod process;
pub mod system;
pub mod upload;

/// Request bodies carry whole documents; allow well past the upload ceiling
pub const MAX_JSON_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Register every route and the JSON extractor config
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_PAYLOAD_BYTES)
            .error_handler(|err, _req| {
                HttpError(DocBriefError::validation(format!("Invalid request body: {}", err))).into()
            }),
    )
    .service(upload::upload_pdf)
    .service(process::summarize)
    .service(process::ask_question)
    .service(system::health);
}
