//! Data access for projects and actas.
//!
//! A [`DataStore`] hands out one [`ActaRepository`] session per request. The
//! SQLite session owns a pooled connection, which goes back to the pool when
//! the session is dropped.

use sanitize_filename::sanitize;
use sqlx::pool::PoolConnection;
use sqlx::{Connection, Sqlite};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::Db;
use crate::models::{Acta, ActaType, Project};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Acta no encontrada")]
    ActaNotFound,
    #[error("{0}")]
    Rejected(String),
    #[error("Error de base de datos: {0}")]
    Database(#[from] sqlx::Error),
}

pub trait DataStore {
    type Repo: ActaRepository;

    async fn open(&self) -> Result<Self::Repo, StoreError>;
}

pub trait ActaRepository {
    async fn project_detail(&mut self, id: i64) -> Result<Option<Project>, StoreError>;

    async fn acta_detail(
        &mut self,
        anio: i32,
        project_id: i64,
        acta_id: i64,
    ) -> Result<Option<Acta>, StoreError>;

    /// Removes the acta row and its attached file.
    async fn delete_project_acta(
        &mut self,
        anio: i32,
        project_id: i64,
        acta_id: i64,
    ) -> Result<(), StoreError>;

    async fn acta_types(&mut self) -> Result<Vec<ActaType>, StoreError>;
}

#[derive(Clone)]
pub struct SqlStore {
    db: Db,
    uploads_dir: PathBuf,
}

impl SqlStore {
    pub fn new(db: Db, uploads_dir: impl Into<PathBuf>) -> Self {
        Self { db, uploads_dir: uploads_dir.into() }
    }
}

impl DataStore for SqlStore {
    type Repo = SqlSession;

    async fn open(&self) -> Result<SqlSession, StoreError> {
        let conn = self.db.0.acquire().await?;
        Ok(SqlSession { conn, uploads_dir: self.uploads_dir.clone() })
    }
}

pub struct SqlSession {
    conn: PoolConnection<Sqlite>,
    uploads_dir: PathBuf,
}

impl ActaRepository for SqlSession {
    async fn project_detail(&mut self, id: i64) -> Result<Option<Project>, StoreError> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id_pro, anio_pro, nombre, fecha_inicio, fecha_fin, duracion_anios, duracion_meses, duracion_dias
             FROM proyectos WHERE id_pro = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(project)
    }

    async fn acta_detail(
        &mut self,
        anio: i32,
        project_id: i64,
        acta_id: i64,
    ) -> Result<Option<Acta>, StoreError> {
        let acta = sqlx::query_as::<_, Acta>(
            "SELECT id_acta, id_pro, anio_pro, numero, tipo, fecha, observaciones, archivo
             FROM actas WHERE anio_pro = ? AND id_pro = ? AND id_acta = ?",
        )
        .bind(anio)
        .bind(project_id)
        .bind(acta_id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(acta)
    }

    async fn delete_project_acta(
        &mut self,
        anio: i32,
        project_id: i64,
        acta_id: i64,
    ) -> Result<(), StoreError> {
        let mut tx = self.conn.begin().await?;

        let archivo: Option<Option<String>> = sqlx::query_scalar(
            "SELECT archivo FROM actas WHERE anio_pro = ? AND id_pro = ? AND id_acta = ?",
        )
        .bind(anio)
        .bind(project_id)
        .bind(acta_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(archivo) = archivo else {
            return Err(StoreError::ActaNotFound);
        };

        let res = sqlx::query("DELETE FROM actas WHERE anio_pro = ? AND id_pro = ? AND id_acta = ?")
            .bind(anio)
            .bind(project_id)
            .bind(acta_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) => StoreError::Rejected(db_err.message().to_string()),
                e => e.into(),
            })?;
        if res.rows_affected() == 0 {
            return Err(StoreError::ActaNotFound);
        }
        tx.commit().await?;

        log::info!("deleted acta {acta_id} of project {project_id}/{anio}");
        if let Some(name) = archivo.filter(|a| !a.trim().is_empty()) {
            remove_attachment(&self.uploads_dir, &name);
        }
        Ok(())
    }

    async fn acta_types(&mut self) -> Result<Vec<ActaType>, StoreError> {
        let types = sqlx::query_as::<_, ActaType>(
            "SELECT codigo, descripcion FROM tipos_acta ORDER BY descripcion ASC",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(types)
    }
}

/// Best effort: the row is already gone, so a missing file only gets logged.
fn remove_attachment(uploads_dir: &Path, name: &str) {
    let path = uploads_dir.join(sanitize(name));
    match std::fs::remove_file(&path) {
        Ok(()) => log::info!("removed attachment {}", path.display()),
        Err(e) => log::warn!("could not remove attachment {}: {e}", path.display()),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory store recording every delete call.

    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct FakeStore {
        pub projects: Vec<Project>,
        pub actas: Arc<Mutex<Vec<Acta>>>,
        pub types: Vec<ActaType>,
        pub deletes: Arc<Mutex<Vec<(i32, i64, i64)>>>,
        pub fail_delete: Option<String>,
        /// Lookups still see the acta, but the delete matches no row.
        pub delete_finds_nothing: bool,
        pub unavailable: bool,
    }

    impl FakeStore {
        pub fn delete_calls(&self) -> Vec<(i32, i64, i64)> {
            self.deletes.lock().unwrap().clone()
        }
    }

    impl DataStore for FakeStore {
        type Repo = FakeStore;

        async fn open(&self) -> Result<FakeStore, StoreError> {
            if self.unavailable {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            Ok(self.clone())
        }
    }

    impl ActaRepository for FakeStore {
        async fn project_detail(&mut self, id: i64) -> Result<Option<Project>, StoreError> {
            Ok(self.projects.iter().find(|p| p.id_pro == id).cloned())
        }

        async fn acta_detail(
            &mut self,
            anio: i32,
            project_id: i64,
            acta_id: i64,
        ) -> Result<Option<Acta>, StoreError> {
            let actas = self.actas.lock().unwrap();
            Ok(actas
                .iter()
                .find(|a| a.anio_pro == anio && a.id_pro == project_id && a.id_acta == acta_id)
                .cloned())
        }

        async fn delete_project_acta(
            &mut self,
            anio: i32,
            project_id: i64,
            acta_id: i64,
        ) -> Result<(), StoreError> {
            self.deletes.lock().unwrap().push((anio, project_id, acta_id));
            if let Some(msg) = &self.fail_delete {
                return Err(StoreError::Rejected(msg.clone()));
            }
            if self.delete_finds_nothing {
                return Err(StoreError::ActaNotFound);
            }
            let mut actas = self.actas.lock().unwrap();
            let before = actas.len();
            actas.retain(|a| !(a.anio_pro == anio && a.id_pro == project_id && a.id_acta == acta_id));
            if actas.len() == before {
                return Err(StoreError::ActaNotFound);
            }
            Ok(())
        }

        async fn acta_types(&mut self) -> Result<Vec<ActaType>, StoreError> {
            Ok(self.types.clone())
        }
    }
}
