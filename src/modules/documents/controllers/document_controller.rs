use std::sync::Arc;

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::core::error::AppError;
use crate::modules::documents::models::{FreeformDocument, StructuredDocument};
use crate::modules::documents::services::{DocumentService, GeneratedFile};

fn attachment(file: GeneratedFile) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.download_name)],
        })
        .body(file.bytes)
}

/// Render free-form editor content
/// POST /generate-pdf
pub async fn generate_pdf(
    service: web::Data<Arc<DocumentService>>,
    request: web::Json<FreeformDocument>,
) -> Result<HttpResponse, AppError> {
    let file = service
        .generate_freeform(&request, Utc::now().date_naive())
        .await?;

    Ok(attachment(file))
}

/// Render a multi-scope document with reconciled pricing
/// POST /generate-professional-pdf
pub async fn generate_professional_pdf(
    service: web::Data<Arc<DocumentService>>,
    request: web::Json<StructuredDocument>,
) -> Result<HttpResponse, AppError> {
    let file = service
        .generate_structured(&request, Utc::now().date_naive())
        .await?;

    Ok(attachment(file))
}

/// Export a multi-scope document as a workbook
/// POST /export-excel
pub async fn export_excel(
    service: web::Data<Arc<DocumentService>>,
    request: web::Json<StructuredDocument>,
) -> Result<HttpResponse, AppError> {
    let file = service
        .export_workbook(&request, Utc::now().date_naive())
        .await?;

    Ok(attachment(file))
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/generate-pdf", web::post().to(generate_pdf))
        .route(
            "/generate-professional-pdf",
            web::post().to(generate_professional_pdf),
        )
        .route("/export-excel", web::post().to(export_excel));
}
