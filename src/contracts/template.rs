//! The template collaborator: clone, whole-document token substitution,
//! and PDF export.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use super::ContractError;

/// The tokens replaced document-wide in every clone. Empty fields
/// substitute as empty strings.
pub mod tokens {
    pub const DATE: &str = "{{Date}}";
    pub const NAME: &str = "{{Name}}";
    pub const ADDRESS: &str = "{{Address}}";
    pub const ADDRESS2: &str = "{{Address2}}";
    pub const PHONE: &str = "{{Phone}}";
    pub const EMAIL: &str = "{{Email}}";
    pub const PET_NAME: &str = "{{PetName}}";
    pub const SPECIES_BREED: &str = "{{Species_Breed}}";
    pub const AGE_SEX_COLOR: &str = "{{AgeSexColor}}";
    pub const APPT_TYPE: &str = "{{ApptType}}";
}

/// A clone of the template living in the temporary workspace.
#[derive(Debug, Clone)]
pub struct TemplateClone {
    pub name: String,
    pub path: PathBuf,
}

pub trait TemplateEngine: Send + Sync {
    /// Copy the template into the temporary workspace under `clone_name`.
    fn clone_template(&self, clone_name: &str) -> Result<TemplateClone, ContractError>;

    /// Replace every occurrence of `token` across the clone with `value`.
    /// The returned `Ok` is the durability acknowledgment the export step
    /// relies on.
    fn substitute(&self, clone: &TemplateClone, token: &str, value: &str)
        -> Result<(), ContractError>;

    /// Render the substituted clone to PDF bytes.
    fn export_pdf(&self, clone: &TemplateClone) -> Result<Vec<u8>, ContractError>;

    /// Remove the clone from the temporary workspace.
    fn discard(&self, clone: &TemplateClone) -> Result<(), ContractError>;
}

/// Engine backed by a Typst template file: clones are `.typ` copies in a
/// temp directory, substitution is a text replace on the clone, and
/// export shells out to the `typst` CLI.
pub struct TypstTemplateEngine {
    template_path: PathBuf,
    temp_dir: PathBuf,
}

impl TypstTemplateEngine {
    pub fn new(
        template_path: impl Into<PathBuf>,
        temp_dir: impl Into<PathBuf>,
    ) -> std::io::Result<Self> {
        let template_path = template_path.into();
        if !template_path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("contract template not found: {}", template_path.display()),
            ));
        }
        let temp_dir = temp_dir.into();
        fs::create_dir_all(&temp_dir)?;
        Ok(Self {
            template_path,
            temp_dir,
        })
    }
}

impl TemplateEngine for TypstTemplateEngine {
    fn clone_template(&self, clone_name: &str) -> Result<TemplateClone, ContractError> {
        let path = self.temp_dir.join(format!("{clone_name}.typ"));
        fs::copy(&self.template_path, &path).map_err(ContractError::CloneIo)?;
        Ok(TemplateClone {
            name: clone_name.to_string(),
            path,
        })
    }

    fn substitute(
        &self,
        clone: &TemplateClone,
        token: &str,
        value: &str,
    ) -> Result<(), ContractError> {
        let source = fs::read_to_string(&clone.path).map_err(ContractError::SubstituteIo)?;
        let replaced = source.replace(token, &escape_typst_string(value));
        fs::write(&clone.path, replaced).map_err(ContractError::SubstituteIo)
    }

    fn export_pdf(&self, clone: &TemplateClone) -> Result<Vec<u8>, ContractError> {
        let out_dir = tempfile::tempdir().map_err(ContractError::RenderIo)?;
        let output_path = out_dir.path().join(format!("{}.pdf", clone.name));

        let status = Command::new("typst")
            .arg("compile")
            .arg(&clone.path)
            .arg(&output_path)
            .current_dir(&self.temp_dir)
            .status()
            .map_err(ContractError::RenderIo)?;

        if !status.success() {
            return Err(ContractError::RenderExit(status.code().unwrap_or(-1)));
        }

        fs::read(&output_path).map_err(ContractError::ReadPdf)
    }

    fn discard(&self, clone: &TemplateClone) -> Result<(), ContractError> {
        fs::remove_file(&clone.path).map_err(ContractError::CloneIo)
    }
}

/// Escape a substituted value for the Typst string context the tokens
/// sit in.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}
