pub mod gemini;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::BackendBox;
use crate::domain::models::BackendName;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(name: &str) -> Result<BackendBox> {
        if BackendName::parse(name) == Some(BackendName::Gemini) {
            return Ok(Box::<gemini::Gemini>::default());
        }

        bail!(format!("No backend implemented for {name}"))
    }
}
