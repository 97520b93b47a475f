use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::Row;

use crate::{db::Db, duration, errors::ApiError};

#[derive(Serialize)]
pub struct DurationResp {
    project_id: i64,
    years: u32,
    months: u32,
    days: u32,
    total_days: i64,
    text: String,
    /// False when the stored dates could not be parsed.
    available: bool,
    saved: bool,
}

/// Recomputes a project's duration from its stored dates and writes it back.
pub async fn recompute_duration(
    db: web::Data<Db>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let row = sqlx::query("SELECT fecha_inicio, fecha_fin FROM proyectos WHERE id_pro = ?")
        .bind(id)
        .fetch_optional(&db.0)
        .await?;
    let row = row.ok_or(ApiError::NotFound)?;
    let start: Option<String> = row.get("fecha_inicio");
    let end: Option<String> = row.get("fecha_fin");

    let outcome = duration::compute_duration(
        start.as_deref().unwrap_or_default(),
        end.as_deref().unwrap_or_default(),
    );
    let text = outcome.text();
    let d = outcome.or_zero();
    let saved = duration::save_duration(&db, id, &d).await;

    Ok(HttpResponse::Ok().json(DurationResp {
        project_id: id,
        years: d.years,
        months: d.months,
        days: d.days,
        total_days: d.total_days,
        text,
        available: !outcome.is_fallback(),
        saved,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    macro_rules! app_with {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db))
                    .route("/proyectos/{id}/duracion", web::post().to(recompute_duration)),
            )
            .await
        };
    }

    async fn seeded() -> Db {
        let db = Db::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO proyectos(id_pro, anio_pro, nombre, fecha_inicio, fecha_fin) VALUES
             (1, 2020, 'Acueducto', '2020-01-01', '2021-03-15'),
             (2, 2020, 'Escuela', 'sin fecha', '2021-03-15')",
        )
        .execute(&db.0)
        .await
        .unwrap();
        db
    }

    #[actix_web::test]
    async fn computes_and_persists() {
        let db = seeded().await;
        let app = app_with!(db.clone());
        let req = test::TestRequest::post().uri("/proyectos/1/duracion").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["text"], "1 año, 2 meses, 14 días");
        assert_eq!(body["total_days"], 439);
        assert_eq!(body["saved"], true);

        let stored: i64 = sqlx::query_scalar("SELECT duracion_meses FROM proyectos WHERE id_pro = 1")
            .fetch_one(&db.0)
            .await
            .unwrap();
        assert_eq!(stored, 2);
    }

    #[actix_web::test]
    async fn unparseable_dates_store_zeros() {
        let app = app_with!(seeded().await);
        let req = test::TestRequest::post().uri("/proyectos/2/duracion").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["text"], "No disponible");
        assert_eq!(body["years"], 0);
        assert_eq!(body["available"], false);
        assert_eq!(body["saved"], true);
    }

    #[actix_web::test]
    async fn unknown_project_is_404() {
        let app = app_with!(seeded().await);
        let req = test::TestRequest::post().uri("/proyectos/77/duracion").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
