//! Two-step deletion of an acta.
//!
//! `GET ?proyecto_id&acta_id` shows a warning, the same URL with `confirmar=1`
//! shows the final form, and only a POST of that form (with `eliminar` set)
//! deletes. The stage travels in the request, never in server state, so
//! re-submitting after a successful delete lands on "acta no encontrada".

use actix_web::http::{Method, header};
use actix_web::{HttpRequest, HttpResponse, http::header::ContentType, web};
use askama::Template;
use serde::Deserialize;

use crate::config::Config;
use crate::errors::PageError;
use crate::models::acta::type_description;
use crate::models::{Acta, Project};
use crate::store::{ActaRepository, DataStore, StoreError};

#[derive(Deserialize, Default)]
pub struct DeleteActaQuery {
    pub proyecto_id: Option<String>,
    pub acta_id: Option<String>,
    pub confirmar: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteActaForm {
    pub eliminar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStage {
    AwaitingConfirmation,
    AwaitingFinalSubmit,
    Submitted,
}

impl DeleteStage {
    pub fn from_request(confirmed: bool, submitted: bool) -> Self {
        match (confirmed, submitted) {
            (false, _) => DeleteStage::AwaitingConfirmation,
            (true, false) => DeleteStage::AwaitingFinalSubmit,
            (true, true) => DeleteStage::Submitted,
        }
    }
}

pub enum DeleteView {
    Warning,
    /// Carries the delete error of a failed attempt, if any.
    FinalForm(Option<String>),
    /// Redirect target and delay in seconds.
    Completed(String, u32),
}

#[derive(Template)]
#[template(path = "actas/delete.html")]
struct DeleteActaPage<'a> {
    project: &'a Project,
    acta: &'a Acta,
    tipo: &'a str,
    observaciones: &'a str,
    file_name: &'a str,
    file_url: Option<String>,
    confirm_url: String,
    cancel_url: String,
    view: DeleteView,
}

fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim).and_then(|s| s.parse::<i64>().ok())
}

pub async fn delete_acta<D: DataStore + 'static>(
    req: HttpRequest,
    cfg: web::Data<Config>,
    query: Option<web::Query<DeleteActaQuery>>,
    form: Option<web::Form<DeleteActaForm>>,
) -> Result<HttpResponse, PageError> {
    let query = query.map(|q| q.into_inner()).unwrap_or_default();
    let (Some(project_id), Some(acta_id)) = (
        parse_id(query.proyecto_id.as_deref()),
        parse_id(query.acta_id.as_deref()),
    ) else {
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, cfg.project_list_url.as_str()))
            .finish());
    };

    let submitted = req.method() == Method::POST
        && form.is_some_and(|f| f.eliminar.as_deref().is_some_and(|v| !v.is_empty()));
    let stage = DeleteStage::from_request(query.confirmar.as_deref() == Some("1"), submitted);

    let store = req.app_data::<web::Data<D>>().ok_or_else(|| {
        log::error!("no data store registered for acta deletion");
        PageError::StoreUnavailable
    })?;
    let mut repo = store.open().await.map_err(|e| {
        log::error!("cannot open data store session: {e:?}");
        PageError::StoreUnavailable
    })?;

    let project = repo
        .project_detail(project_id)
        .await?
        .ok_or(PageError::ProjectNotFound)?;
    let acta = repo
        .acta_detail(project.anio_pro, project.id_pro, acta_id)
        .await?
        .ok_or(PageError::ActaNotFound)?;
    let types = repo.acta_types().await.unwrap_or_else(|e| {
        log::warn!("acta types unavailable: {e:?}");
        Vec::new()
    });

    let detail_url = cfg.project_detail_url(project.id_pro, project.anio_pro);
    let view = match stage {
        DeleteStage::AwaitingConfirmation => DeleteView::Warning,
        DeleteStage::AwaitingFinalSubmit => DeleteView::FinalForm(None),
        DeleteStage::Submitted => {
            match repo
                .delete_project_acta(project.anio_pro, project.id_pro, acta.id_acta)
                .await
            {
                Ok(()) => DeleteView::Completed(detail_url.clone(), cfg.redirect_delay_secs),
                Err(StoreError::ActaNotFound) => return Err(PageError::ActaNotFound),
                Err(e) => {
                    log::warn!("delete of acta {} failed: {e}", acta.id_acta);
                    DeleteView::FinalForm(Some(e.to_string()))
                }
            }
        }
    };
    drop(repo);

    let file_name = if acta.has_file() { acta.archivo.as_deref().unwrap_or_default() } else { "" };
    let redirect = match &view {
        DeleteView::Completed(url, delay) => Some(format!("{delay}; url={url}")),
        _ => None,
    };
    let page = DeleteActaPage {
        project: &project,
        acta: &acta,
        tipo: type_description(&types, &acta.tipo),
        observaciones: acta.observaciones.as_deref().filter(|o| !o.trim().is_empty()).unwrap_or("-"),
        file_name,
        file_url: acta.has_file().then(|| cfg.file_url(file_name)),
        confirm_url: format!(
            "{}?proyecto_id={}&acta_id={}&confirmar=1",
            req.path(),
            project.id_pro,
            acta.id_acta
        ),
        cancel_url: detail_url,
        view,
    };
    let body = page.render()?;

    let mut resp = HttpResponse::Ok();
    resp.content_type(ContentType::html());
    if let Some(refresh) = redirect {
        resp.insert_header((header::REFRESH, refresh));
    }
    Ok(resp.body(body))
}
