pub mod actas;
pub mod health;
pub mod proyectos;

use actix_web::web;

use crate::store::DataStore;

pub fn configure<D: DataStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::resource("/actas/eliminar")
                .route(web::get().to(actas::delete_acta::<D>))
                .route(web::post().to(actas::delete_acta::<D>)),
        )
        .route("/proyectos/{id}/duracion", web::post().to(proyectos::recompute_duration));
}
