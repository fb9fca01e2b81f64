use actix_web::{web, HttpResponse};

use crate::domain::package::{TrackingCode, TrackingError};
use crate::dto::CreateEventRequest;
use crate::metrics::Metrics;
use crate::services::EventService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::get().to(list_events))
        .service(
            web::resource("/events/package/{tracking_code}")
                .route(web::get().to(list_package_events))
                .route(web::post().to(create_event)),
        )
        .route("/events/{event_id}", web::delete().to(delete_event));
}

async fn list_events(
    service: web::Data<EventService>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, TrackingError> {
    let events = service
        .list_all()
        .await
        .inspect_err(|e| metrics.record_error(e))?;
    Ok(HttpResponse::Ok().json(events))
}

async fn list_package_events(
    service: web::Data<EventService>,
    metrics: web::Data<Metrics>,
    path: web::Path<String>,
) -> Result<HttpResponse, TrackingError> {
    let tracking_code = TrackingCode::new(path.into_inner());
    let events = service
        .list_by_tracking_code(&tracking_code)
        .await
        .inspect_err(|e| metrics.record_error(e))?;
    Ok(HttpResponse::Ok().json(events))
}

async fn create_event(
    service: web::Data<EventService>,
    metrics: web::Data<Metrics>,
    path: web::Path<String>,
    body: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, TrackingError> {
    let tracking_code = TrackingCode::new(path.into_inner());
    let result = match body.into_inner().into_command() {
        Ok(command) => service.create(&tracking_code, command).await,
        Err(e) => Err(e),
    };
    let event = result.inspect_err(|e| metrics.record_error(e))?;

    metrics.record_event(event.status);
    Ok(HttpResponse::Created().json(event))
}

async fn delete_event(
    service: web::Data<EventService>,
    metrics: web::Data<Metrics>,
    path: web::Path<i64>,
) -> Result<HttpResponse, TrackingError> {
    service
        .delete(path.into_inner())
        .await
        .inspect_err(|e| metrics.record_error(e))?;
    metrics.events_deleted.inc();
    Ok(HttpResponse::NoContent().finish())
}
