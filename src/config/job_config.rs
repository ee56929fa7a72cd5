use crate::core::ConfigProvider;
use crate::utils::error::{DestructorError, Result};
use crate::utils::validation::{
    validate_identifier, validate_non_empty_string, validate_optional_identifier, validate_path,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub job: Option<JobInfo>,
    pub input: InputConfig,
    pub target: TargetConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub mapping: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub header: String,
    pub view_file: String,
    pub init_file: String,
    pub mapping_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    #[serde(rename = "struct")]
    pub struct_name: String,
    pub view: String,
    pub output_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub specifier: Option<String>,
    pub default_value: Option<String>,
}

impl JobConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DestructorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DestructorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HEADER_DIR})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn name(&self) -> &str {
        self.job.as_ref().map(|j| j.name.as_str()).unwrap_or("unnamed")
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("input.header", &self.input.header)?;
        validate_path("input.view_file", &self.input.view_file)?;
        validate_path("input.init_file", &self.input.init_file)?;
        if let Some(mapping_file) = &self.input.mapping_file {
            validate_path("input.mapping_file", mapping_file)?;
        }
        if let Some(output) = &self.output.path {
            validate_path("output.path", output)?;
        }

        validate_identifier("target.struct", &self.target.struct_name)?;
        validate_identifier("target.view", &self.target.view)?;
        validate_optional_identifier("target.output_type", self.target.output_type.as_deref())?;
        validate_optional_identifier("output.specifier", self.output.specifier.as_deref())?;

        // 空白預設值會產生空的初始化欄位
        if let Some(default_value) = &self.output.default_value {
            validate_non_empty_string("output.default_value", default_value)?;
        }

        Ok(())
    }
}

impl ConfigProvider for JobConfig {
    fn header_file(&self) -> &str {
        &self.input.header
    }

    fn view_file(&self) -> &str {
        &self.input.view_file
    }

    fn init_file(&self) -> &str {
        &self.input.init_file
    }

    fn mapping_file(&self) -> Option<&str> {
        self.input.mapping_file.as_deref()
    }

    fn target_struct(&self) -> &str {
        &self.target.struct_name
    }

    fn target_view(&self) -> &str {
        &self.target.view
    }

    fn output_type(&self) -> &str {
        self.target
            .output_type
            .as_deref()
            .unwrap_or(&self.target.struct_name)
    }

    fn specifier(&self) -> Option<&str> {
        self.output.specifier.as_deref()
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }

    fn default_value(&self) -> &str {
        self.output.default_value.as_deref().unwrap_or("0")
    }

    fn inline_mapping(&self) -> Option<&BTreeMap<String, String>> {
        self.mapping.as_ref()
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[job]
name = "units"

[input]
header = "complex_full.h"
view_file = "complex_view.h"
init_file = "units_init.c"

[target]
struct = "unit"
view = "unitView"

[output]
path = "units_view.h"
specifier = "PROGMEM"

[mapping]
"mainFull" = "main"
"#;

    #[test]
    fn test_parse_basic_job() {
        let config = JobConfig::from_toml_str(BASIC).unwrap();
        assert_eq!(config.name(), "units");
        assert_eq!(config.target_struct(), "unit");
        assert_eq!(config.output_type(), "unit");
        assert_eq!(config.specifier(), Some("PROGMEM"));
        assert_eq!(config.default_value(), "0");
        assert_eq!(config.inline_mapping().unwrap().get("mainFull").unwrap(), "main");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_section_is_optional() {
        let toml = r#"
[input]
header = "a.h"
view_file = "b.h"
init_file = "c.c"

[target]
struct = "unit"
view = "unitView"
output_type = "unitView"
"#;
        let config = JobConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.name(), "unnamed");
        assert_eq!(config.output_path(), None);
        assert_eq!(config.output_type(), "unitView");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("C_DESTRUCTOR_TEST_DIR", "/tmp/headers");
        let toml = BASIC.replace("complex_full.h", "${C_DESTRUCTOR_TEST_DIR}/complex_full.h");

        let config = JobConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.header_file(), "/tmp/headers/complex_full.h");

        std::env::remove_var("C_DESTRUCTOR_TEST_DIR");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let toml = BASIC.replace("units_init.c", "${C_DESTRUCTOR_UNSET_VAR}/init.c");
        let config = JobConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.init_file(), "${C_DESTRUCTOR_UNSET_VAR}/init.c");
    }

    #[test]
    fn test_invalid_identifier_fails_validation() {
        let toml = BASIC.replace("view = \"unitView\"", "view = \"unit view\"");
        let config = JobConfig::from_toml_str(&toml).unwrap();
        assert!(matches!(
            config.validate(),
            Err(DestructorError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_blank_default_value_fails_validation() {
        let toml = BASIC.replace("specifier = \"PROGMEM\"", "specifier = \"PROGMEM\"\ndefault_value = \"  \"");
        let config = JobConfig::from_toml_str(&toml).unwrap();
        assert_eq!(config.default_value(), "  ");
        assert!(matches!(
            config.validate(),
            Err(DestructorError::InvalidConfigValueError { field, .. }) if field == "output.default_value"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = JobConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.view_file(), "complex_view.h");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            JobConfig::from_toml_str("[input\nheader ="),
            Err(DestructorError::ConfigValidationError { .. })
        ));
    }
}
