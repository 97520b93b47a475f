use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Acta {
    pub id_acta: i64,
    pub id_pro: i64,
    pub anio_pro: i32,
    pub numero: i64,
    pub tipo: String,
    pub fecha: String,
    pub observaciones: Option<String>,
    pub archivo: Option<String>,
}

impl Acta {
    pub fn has_file(&self) -> bool {
        self.archivo.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct ActaType {
    pub codigo: String,
    pub descripcion: String,
}

/// Description for `code`, or the code itself when the type is unknown.
pub fn type_description<'a>(types: &'a [ActaType], code: &'a str) -> &'a str {
    types
        .iter()
        .find(|t| t.codigo == code)
        .map(|t| t.descripcion.as_str())
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_falls_back_to_code() {
        let types = vec![ActaType { codigo: "INI".into(), descripcion: "Acta de inicio".into() }];
        assert_eq!(type_description(&types, "INI"), "Acta de inicio");
        assert_eq!(type_description(&types, "XYZ"), "XYZ");
    }
}
