use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;

use crate::core::error::AppError;
use crate::modules::pricing::models::{parse_authoritative_total, DiscountSpec, LineItem, Scope};
use crate::modules::pricing::services::PricingReconciler;

/// Body for a standalone reconciliation. Items may be given flat, per scope,
/// or both.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub scopes: Vec<Scope>,
    #[serde(default)]
    pub discount: DiscountSpec,
    /// Text or number. Unparseable values count as absent.
    #[serde(default)]
    pub authoritative_total: Option<Value>,
}

/// Reconcile pricing without producing a document
/// POST /pricing/reconcile
pub async fn reconcile(
    reconciler: web::Data<PricingReconciler>,
    request: web::Json<ReconcileRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();

    request.items.iter().try_for_each(LineItem::validate)?;
    request.scopes.iter().try_for_each(Scope::validate)?;

    let items = request
        .scopes
        .iter()
        .flat_map(|scope| scope.items.iter())
        .chain(request.items.iter());
    let authoritative_total = request
        .authoritative_total
        .as_ref()
        .and_then(parse_authoritative_total);
    let breakdown = reconciler.reconcile(items, &request.discount, authoritative_total);

    Ok(HttpResponse::Ok().json(breakdown))
}

/// Configure pricing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/pricing").route("/reconcile", web::post().to(reconcile)));
}
