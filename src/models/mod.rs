pub mod acta;
pub mod project;

pub use acta::{Acta, ActaType};
pub use project::Project;
