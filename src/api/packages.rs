use actix_web::{web, HttpResponse};

use crate::domain::package::{TrackingCode, TrackingError};
use crate::dto::CreatePackageRequest;
use crate::metrics::Metrics;
use crate::services::PackageService;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/packages")
            .route(web::get().to(list_packages))
            .route(web::post().to(create_package)),
    )
    .service(
        web::resource("/packages/{tracking_code}")
            .route(web::get().to(get_package))
            .route(web::delete().to(delete_package)),
    );
}

async fn list_packages(
    service: web::Data<PackageService>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, TrackingError> {
    let packages = service
        .list_all()
        .await
        .inspect_err(|e| metrics.record_error(e))?;
    Ok(HttpResponse::Ok().json(packages))
}

async fn get_package(
    service: web::Data<PackageService>,
    metrics: web::Data<Metrics>,
    path: web::Path<String>,
) -> Result<HttpResponse, TrackingError> {
    let tracking_code = TrackingCode::new(path.into_inner());
    let package = service
        .get_by_tracking_code(&tracking_code)
        .await
        .inspect_err(|e| metrics.record_error(e))?;
    Ok(HttpResponse::Ok().json(package))
}

async fn create_package(
    service: web::Data<PackageService>,
    metrics: web::Data<Metrics>,
    body: web::Json<CreatePackageRequest>,
) -> Result<HttpResponse, TrackingError> {
    let package = service
        .create(body.into_inner().into())
        .await
        .inspect_err(|e| metrics.record_error(e))?;
    metrics.packages_created.inc();
    Ok(HttpResponse::Created().json(package))
}

async fn delete_package(
    service: web::Data<PackageService>,
    metrics: web::Data<Metrics>,
    path: web::Path<String>,
) -> Result<HttpResponse, TrackingError> {
    let tracking_code = TrackingCode::new(path.into_inner());
    service
        .delete(&tracking_code)
        .await
        .inspect_err(|e| metrics.record_error(e))?;
    metrics.packages_deleted.inc();
    Ok(HttpResponse::NoContent().finish())
}
