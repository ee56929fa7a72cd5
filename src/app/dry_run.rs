use crate::app::pipelines::{destructor_for, extract_sources};
use crate::core::declaration::find_declarations;
use crate::core::initializer::parse_initializer;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{Declaration, InitValue, ViewNode};
use crate::utils::error::Result;
use std::fmt;

/// Describes what a run would do without reshaping or writing anything.
pub async fn dry_run_report<S: Storage, C: ConfigProvider>(storage: &S, config: &C) -> Result<String> {
    let bundle = extract_sources(storage, config).await?;
    let destructor = destructor_for(&bundle, config)?;
    let declarations = find_declarations(&bundle.init_text, config.target_struct())?;

    let report = DryRunReport {
        config,
        expected_len: destructor.expected_len(),
        view_leaves: leaf_count(&bundle.view_tree),
        mapping_entries: bundle.mapping.len(),
        declarations: &declarations,
    };
    Ok(report.to_string())
}

struct DryRunReport<'a, C> {
    config: &'a C,
    expected_len: usize,
    view_leaves: usize,
    mapping_entries: usize,
    declarations: &'a [Declaration],
}

impl<C: ConfigProvider> fmt::Display for DryRunReport<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🔍 Dry Run Analysis:")?;
        writeln!(f)?;
        writeln!(f, "📐 Structures:")?;
        writeln!(
            f,
            "  Full: {} ({} values per initializer)",
            self.config.target_struct(),
            self.expected_len
        )?;
        writeln!(
            f,
            "  View: {} ({} leaf fields)",
            self.config.target_view(),
            self.view_leaves
        )?;
        writeln!(f, "  Output type: {}", self.config.output_type())?;
        if self.mapping_entries > 0 {
            writeln!(f, "  Mapping entries: {}", self.mapping_entries)?;
        }

        writeln!(f)?;
        writeln!(f, "📋 Declarations ({}):", self.declarations.len())?;
        for decl in self.declarations {
            let size = decl
                .array_size
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            let status = match parse_initializer(&decl.init_block) {
                Ok(value) => describe(&value, decl.is_array(), self.expected_len),
                Err(e) => format!("❌ {}", e),
            };
            writeln!(f, "  {}{}: {}", decl.var_name, size, status)?;
        }

        writeln!(f)?;
        writeln!(f, "💾 Output: {}", self.config.output_path().unwrap_or("stdout"))
    }
}

fn describe(value: &InitValue, is_array: bool, expected: usize) -> String {
    let fits = |v: &InitValue| v.flatten().len() >= expected;
    if is_array {
        let elements = value.as_list().unwrap_or_default();
        let ok = elements.iter().filter(|e| fits(*e)).count();
        format!("{} of {} elements match", ok, elements.len())
    } else if fits(value) {
        "✅ matches".to_string()
    } else {
        format!("⚠️ {} of {} values", value.flatten().len(), expected)
    }
}

fn leaf_count(node: &ViewNode) -> usize {
    match node {
        ViewNode::Scalar(_) => 1,
        ViewNode::Struct(children) => children.iter().map(|(_, c)| leaf_count(c)).sum(),
        ViewNode::Array { len, element } => len * leaf_count(element),
    }
}
