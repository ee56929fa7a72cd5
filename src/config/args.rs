use crate::config::job_config::{InputConfig, JobConfig, OutputConfig, TargetConfig};
use crate::utils::error::{DestructorError, Result};
use crate::utils::validation::validate_required_field;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "c-destructor")]
#[command(about = "Reshape C struct initializers from a full struct layout to a view layout")]
pub struct CliConfig {
    /// Header with the full `typedef struct` definitions
    #[arg(long)]
    pub header: Option<String>,

    /// Header with the view struct definitions
    #[arg(long)]
    pub view_file: Option<String>,

    /// C source containing the initialization declarations
    #[arg(long)]
    pub init_file: Option<String>,

    /// Name of the full struct (e.g. unit)
    #[arg(long = "struct")]
    pub struct_name: Option<String>,

    /// Name of the view struct to reshape into
    #[arg(long)]
    pub target_view: Option<String>,

    /// `key: value` file renaming nested fields
    #[arg(long)]
    pub mapping_file: Option<String>,

    /// Attribute written after the variable (e.g. PROGMEM)
    #[arg(long)]
    pub specifier: Option<String>,

    /// Type name for the emitted declaration (defaults to --struct)
    #[arg(long)]
    pub output_type: Option<String>,

    /// Output header to create or update
    #[arg(long)]
    pub output: Option<String>,

    /// Rename the emitted variable
    #[arg(long)]
    pub var_name: Option<String>,

    /// Value for view fields without a source field
    #[arg(long)]
    pub default_value: Option<String>,

    /// TOML job file; command line arguments override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Show what would be processed without writing anything
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<String>,
}

impl CliConfig {
    /// Merges the job file (if any) with command line overrides.
    pub fn to_job_config(&self) -> Result<JobConfig> {
        let mut job = match &self.config {
            Some(path) => JobConfig::from_file(path)?,
            None => JobConfig {
                job: None,
                input: InputConfig {
                    header: validate_required_field("--header", &self.header)?.clone(),
                    view_file: validate_required_field("--view-file", &self.view_file)?.clone(),
                    init_file: validate_required_field("--init-file", &self.init_file)?.clone(),
                    mapping_file: None,
                },
                target: TargetConfig {
                    struct_name: validate_required_field("--struct", &self.struct_name)?.clone(),
                    view: validate_required_field("--target-view", &self.target_view)?.clone(),
                    output_type: None,
                },
                output: OutputConfig::default(),
                mapping: None,
            },
        };

        let overrides = [
            (&self.header, &mut job.input.header),
            (&self.view_file, &mut job.input.view_file),
            (&self.init_file, &mut job.input.init_file),
            (&self.struct_name, &mut job.target.struct_name),
            (&self.target_view, &mut job.target.view),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }

        let optional_overrides = [
            (&self.mapping_file, &mut job.input.mapping_file),
            (&self.output_type, &mut job.target.output_type),
            (&self.output, &mut job.output.path),
            (&self.specifier, &mut job.output.specifier),
            (&self.default_value, &mut job.output.default_value),
        ];
        for (value, slot) in optional_overrides {
            if value.is_some() {
                *slot = value.clone();
            }
        }

        Ok(job)
    }

    /// `mass-process` 專用：必須有輸出檔，且不接受只適用單一宣告的 --var-name
    pub fn to_batch_job_config(&self) -> Result<JobConfig> {
        if let Some(var_name) = &self.var_name {
            return Err(DestructorError::ConfigError {
                message: format!(
                    "--var-name '{}' renames a single declaration; batch mode keeps every variable name",
                    var_name
                ),
            });
        }

        let job = self.to_job_config()?;
        if job.output.path.is_none() {
            return Err(DestructorError::MissingConfigError {
                field: "--output".to_string(),
            });
        }
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_arguments_build_job() {
        let cli = CliConfig::parse_from([
            "c-destructor",
            "--header",
            "full.h",
            "--view-file",
            "view.h",
            "--init-file",
            "init.c",
            "--struct",
            "unit",
            "--target-view",
            "unitView",
            "--specifier",
            "PROGMEM",
        ]);
        let job = cli.to_job_config().unwrap();
        assert_eq!(job.header_file(), "full.h");
        assert_eq!(job.target_struct(), "unit");
        assert_eq!(job.specifier(), Some("PROGMEM"));
        assert_eq!(job.mapping_file(), None);
    }

    #[test]
    fn test_missing_argument_without_job_file() {
        let cli = CliConfig::parse_from(["c-destructor", "--header", "full.h"]);
        assert!(matches!(
            cli.to_job_config(),
            Err(DestructorError::MissingConfigError { field }) if field == "--view-file"
        ));
    }

    #[test]
    fn test_cli_overrides_job_file() {
        let mut job_file = NamedTempFile::new().unwrap();
        job_file
            .write_all(
                br#"
[input]
header = "full.h"
view_file = "view.h"
init_file = "init.c"

[target]
struct = "unit"
view = "unitView"

[output]
path = "from_file.h"
"#,
            )
            .unwrap();

        let path = job_file.path().to_str().unwrap().to_string();
        let cli = CliConfig::parse_from([
            "c-destructor",
            "--config",
            path.as_str(),
            "--output",
            "override.h",
            "--init-file",
            "other.c",
        ]);
        let job = cli.to_job_config().unwrap();
        assert_eq!(job.output_path(), Some("override.h"));
        assert_eq!(job.init_file(), "other.c");
        assert_eq!(job.view_file(), "view.h");
    }

    const REQUIRED: [&str; 11] = [
        "mass-process",
        "--header",
        "full.h",
        "--view-file",
        "view.h",
        "--init-file",
        "init.c",
        "--struct",
        "unit",
        "--target-view",
        "unitView",
    ];

    #[test]
    fn test_batch_job_requires_output() {
        let cli = CliConfig::parse_from(REQUIRED);
        assert!(matches!(
            cli.to_batch_job_config(),
            Err(DestructorError::MissingConfigError { field }) if field == "--output"
        ));

        let cli = CliConfig::parse_from(REQUIRED.iter().copied().chain(["--output", "out.h"]));
        assert_eq!(cli.to_batch_job_config().unwrap().output_path(), Some("out.h"));
    }

    #[test]
    fn test_batch_job_rejects_var_name() {
        let cli = CliConfig::parse_from(
            REQUIRED
                .iter()
                .copied()
                .chain(["--output", "out.h", "--var-name", "renamed"]),
        );
        let err = cli.to_batch_job_config().unwrap_err();
        assert!(matches!(err, DestructorError::ConfigError { .. }));
        assert!(err.to_string().contains("--var-name 'renamed'"));
    }
}
