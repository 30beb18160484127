//! The clinical scoring modules, each owning one immutable feature schema
//! and one set of fitted artifacts.

pub mod cervical;
pub mod endometrial;
pub mod molecular;

use serde::{Deserialize, Serialize};

/// Static descriptive metadata surfaced by the model-info endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    pub model_type: String,
    pub version: String,
    pub limitations: Vec<String>,
}

/// Default human rendering of an encoded column name.
pub(crate) fn humanize(column: &str) -> String {
    column.replace('_', " ")
}
