use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::{DateTime, Days, Utc};

use crate::analytics::{AnalyticsStore, EventData, PageViewData};
use crate::rate_limit::client_key;

const DEFAULT_WINDOW_DAYS: u64 = 7;

#[derive(serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum AnalyticsPayload {
    Pageview(PageViewData),
    Event(EventData),
}

#[derive(serde::Serialize)]
struct IngestResponse {
    success: bool,
}

#[tracing::instrument(name = "Recording an analytics payload", skip(request, payload, store))]
pub async fn record_analytics(
    request: HttpRequest,
    payload: web::Json<AnalyticsPayload>,
    store: web::Data<AnalyticsStore>,
) -> impl Responder {
    match payload.0 {
        AnalyticsPayload::Pageview(data) => {
            store.record_page_view(client_key(&request), data);
        }
        AnalyticsPayload::Event(data) => {
            store.record_event(data);
        }
    }

    HttpResponse::Ok().json(IngestResponse { success: true })
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

#[tracing::instrument(name = "Summarizing analytics", skip(query, store))]
pub async fn analytics_summary(
    query: web::Query<SummaryQuery>,
    store: web::Data<AnalyticsStore>,
) -> impl Responder {
    let end = query.end_date.unwrap_or_else(Utc::now);
    let start = query
        .start_date
        .unwrap_or_else(|| end - Days::new(DEFAULT_WINDOW_DAYS));

    HttpResponse::Ok().json(store.summarize(start, end))
}
