use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Project {
    pub id_pro: i64,
    pub anio_pro: i32,
    pub nombre: String,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub duracion_anios: i64,
    pub duracion_meses: i64,
    pub duracion_dias: i64,
}
