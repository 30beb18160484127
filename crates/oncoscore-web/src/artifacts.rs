//! Process-wide artifact bundle.
//!
//! Loaded once at startup, validated, then shared read-only behind an Arc.
//! The enabled-module list comes from configuration: every enabled module
//! must load or the process never reaches a serving state.

use std::path::Path;

use tracing::info;

use oncoscore_common::{PredictError, Result};
use oncoscore_config::{ArtifactConfig, ModuleId};
use oncoscore_cytology::CytologyModel;
use oncoscore_rules::ClinicalThresholds;
use oncoscore_tabular::modules::cervical::CervicalModule;
use oncoscore_tabular::modules::endometrial::EndometrialModule;
use oncoscore_tabular::modules::molecular::MolecularModule;

pub struct ArtifactBundle {
    enabled: Vec<ModuleId>,
    endometrial: Option<EndometrialModule>,
    molecular: Option<MolecularModule>,
    cervical: Option<CervicalModule>,
    cytology: Option<CytologyModel>,
    thresholds: ClinicalThresholds,
}

impl ArtifactBundle {
    /// Load every enabled module from the artifact directory. Any failure
    /// is returned as-is; the caller treats it as fatal.
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        let mut bundle = Self {
            enabled: config.modules.clone(),
            endometrial: None,
            molecular: None,
            cervical: None,
            cytology: None,
            thresholds: load_thresholds(&config.dir)?,
        };

        for module in &config.modules {
            let dir = config.dir.join(module.dir_name());
            match module {
                ModuleId::Endometrial => {
                    bundle.endometrial = Some(EndometrialModule::load(&dir)?)
                }
                ModuleId::Molecular => bundle.molecular = Some(MolecularModule::load(&dir)?),
                ModuleId::Cervical => bundle.cervical = Some(CervicalModule::load(&dir)?),
                ModuleId::Cytology => bundle.cytology = Some(CytologyModel::load(&dir)?),
            }
        }

        info!(modules = config.modules.len(), "artifact bundle loaded");
        Ok(bundle)
    }

    fn unavailable(module: ModuleId) -> PredictError {
        PredictError::ModelUnavailable(format!(
            "module '{}' is not enabled on this deployment",
            module.dir_name()
        ))
    }

    pub fn endometrial(&self) -> Result<&EndometrialModule> {
        self.endometrial
            .as_ref()
            .ok_or_else(|| Self::unavailable(ModuleId::Endometrial))
    }

    pub fn molecular(&self) -> Result<&MolecularModule> {
        self.molecular
            .as_ref()
            .ok_or_else(|| Self::unavailable(ModuleId::Molecular))
    }

    pub fn cervical(&self) -> Result<&CervicalModule> {
        self.cervical
            .as_ref()
            .ok_or_else(|| Self::unavailable(ModuleId::Cervical))
    }

    pub fn cytology(&self) -> Result<&CytologyModel> {
        self.cytology
            .as_ref()
            .ok_or_else(|| Self::unavailable(ModuleId::Cytology))
    }

    pub fn clinical_thresholds(&self) -> &ClinicalThresholds {
        &self.thresholds
    }

    fn loaded(&self, module: ModuleId) -> bool {
        match module {
            ModuleId::Endometrial => self.endometrial.is_some(),
            ModuleId::Molecular => self.molecular.is_some(),
            ModuleId::Cervical => self.cervical.is_some(),
            ModuleId::Cytology => self.cytology.is_some(),
        }
    }

    /// Ready means every enabled module actually loaded.
    pub fn is_ready(&self) -> bool {
        self.enabled.iter().all(|m| self.loaded(*m))
    }

    /// (module name, loaded) pairs for the health probe.
    pub fn module_status(&self) -> Vec<(&'static str, bool)> {
        self.enabled
            .iter()
            .map(|m| (m.dir_name(), self.loaded(*m)))
            .collect()
    }
}

/// Clinical rule thresholds may be overridden next to the artifacts;
/// defaults apply otherwise.
fn load_thresholds(dir: &Path) -> Result<ClinicalThresholds> {
    let path = dir.join("clinical_thresholds.json");
    if !path.exists() {
        return Ok(ClinicalThresholds::default());
    }
    let bytes = std::fs::read(&path)
        .map_err(|e| PredictError::ModelUnavailable(format!("{}: {}", path.display(), e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| PredictError::ModelUnavailable(format!("{}: {}", path.display(), e)))
}
