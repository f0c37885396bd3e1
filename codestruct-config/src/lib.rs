//! Settings for the CodeStruct passes.
//!
//! `defaults/codestruct.default.toml` is embedded into every binary so that the documented
//! defaults and runtime behavior stay in sync. A [`Loader`] layers `codestruct.toml` files
//! over those defaults and [`Loader::load`] turns the result into [`Settings`]: one
//! validated option struct per pass. Bad values (an unknown indent, an unknown diagnostic
//! code, a pattern that does not compile, a misspelt key) are rejected here, before any
//! file is processed.

use codestruct_parser::codestruct::formatting::{FormatConfig, FormatConfigError, IndentStyle};
use codestruct_parser::codestruct::linting::{
    DiagnosticCode, LintConfig, LintConfigError, Linter, UnknownCode,
};
use codestruct_parser::codestruct::minifying::MinifyConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../defaults/codestruct.default.toml");

/// Looked up in the working directory when no file is named explicitly
pub const LOCAL_FILE: &str = "codestruct.toml";

/// Validated options for each pass
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub format: FormatConfig,
    pub minify: MinifyConfig,
    pub lint: LintConfig,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot load settings: {0}")]
    Read(#[from] ConfigError),
    #[error("formatting: {0}")]
    Format(#[from] FormatConfigError),
    #[error("lint.disabled: {0}")]
    Code(#[from] UnknownCode),
    #[error("lint: {0}")]
    Pattern(#[from] LintConfigError),
    #[error("lint.min_name_length must be at least 1")]
    MinNameLength,
}

// The file layout, as written in TOML

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    formatting: FormattingSection,
    minify: MinifySection,
    lint: LintSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FormattingSection {
    /// "2", "4" or "tab"
    indent: String,
    placeholder_docs: bool,
    fix_attribute_keys: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MinifySection {
    legend: bool,
    drop_docs: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LintSection {
    min_name_length: usize,
    documented_keywords: Vec<String>,
    hash_id_pattern: String,
    attribute_key_pattern: String,
    /// Diagnostic codes such as "CS201"
    disabled: Vec<String>,
}

impl FileSettings {
    fn validate(self) -> Result<Settings, SettingsError> {
        let indent: IndentStyle = self.formatting.indent.parse()?;
        let format = FormatConfig {
            indent,
            placeholder_docs: self.formatting.placeholder_docs,
            fix_attribute_keys: self.formatting.fix_attribute_keys,
            range: None,
        };

        let minify = MinifyConfig {
            legend: self.minify.legend,
            drop_docs: self.minify.drop_docs,
        };

        let section = self.lint;
        if section.min_name_length == 0 {
            return Err(SettingsError::MinNameLength);
        }
        let disabled = section
            .disabled
            .iter()
            .map(|code| code.parse::<DiagnosticCode>())
            .collect::<Result<Vec<_>, _>>()?;
        let lint = LintConfig {
            min_name_length: section.min_name_length,
            documented_keywords: section.documented_keywords,
            hash_id_pattern: section.hash_id_pattern,
            attribute_key_pattern: section.attribute_key_pattern,
            disabled,
        };
        // Compiles both patterns
        Linter::new(&lint)?;

        Ok(Settings {
            format,
            minify,
            lint,
        })
    }
}

/// Layers `codestruct.toml` files over the embedded defaults
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
    files: Vec<PathBuf>,
}

impl Loader {
    /// Defaults only
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self {
            builder,
            files: Vec::new(),
        }
    }

    /// The file named on the command line, which must exist, or else [`LOCAL_FILE`] in
    /// `dir` when there is one
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Self {
        match explicit {
            Some(path) => Self::new().layer(path, true),
            None => Self::new().layer(dir.join(LOCAL_FILE), false),
        }
    }

    /// Layer a TOML file; later layers win key by key
    pub fn layer(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        let path = path.as_ref();
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self.files.push(path.to_path_buf());
        self
    }

    pub fn load(self) -> Result<Settings, SettingsError> {
        log::debug!("loading settings from defaults and {:?}", self.files);
        let file: FileSettings = self.builder.build()?.try_deserialize()?;
        file.validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
