use crate::domain::mapping::FieldMapping;
use crate::domain::model::{FlatField, StructSet};
use crate::utils::error::{DestructorError, Result};

/// Flattens `struct_name` into its scalar leaves, in declaration order.
///
/// Output names join the field chain with `_`, array elements append `_i`
/// (`_i_j` for nested dimensions). A mapped name replaces the whole prefix
/// accumulated so far.
pub fn flatten_struct(
    structs: &StructSet,
    struct_name: &str,
    mapping: &FieldMapping,
) -> Result<Vec<FlatField>> {
    if !structs.contains(struct_name) {
        return Err(DestructorError::UnknownStructError {
            name: struct_name.to_string(),
        });
    }
    let mut out = Vec::new();
    let mut stack = Vec::new();
    flatten_into(structs, struct_name, "", "", mapping, &mut stack, &mut out)?;
    Ok(out)
}

fn flatten_into<'a>(
    structs: &'a StructSet,
    struct_name: &str,
    source_prefix: &str,
    output_prefix: &str,
    mapping: &FieldMapping,
    stack: &mut Vec<&'a str>,
    out: &mut Vec<FlatField>,
) -> Result<()> {
    let Some(def) = structs.get(struct_name) else {
        return Ok(());
    };
    // 結構以值包含自己時無法展開
    if stack.contains(&def.name.as_str()) {
        return Err(DestructorError::parse(
            stack.first().copied().unwrap_or(struct_name),
            format!("recursive struct '{}'", def.name),
        ));
    }
    stack.push(def.name.as_str());

    for field in &def.fields {
        let source_path = if source_prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", source_prefix, field.name)
        };

        let output = match mapping.resolve(&source_path, &field.name) {
            Some(mapped) => mapped.to_string(),
            None if output_prefix.is_empty() => field.name.clone(),
            None => format!("{}_{}", output_prefix, field.name),
        };

        let nested = structs.contains(&field.ty);
        for index in element_indices(&field.dims) {
            let (source, name) = match &index {
                Some(idx) => (
                    format!(
                        "{}{}",
                        source_path,
                        idx.iter().map(|i| format!("[{}]", i)).collect::<String>()
                    ),
                    format!(
                        "{}_{}",
                        output,
                        idx.iter().map(usize::to_string).collect::<Vec<_>>().join("_")
                    ),
                ),
                None => (source_path.clone(), output.clone()),
            };

            if nested {
                flatten_into(structs, &field.ty, &source, &name, mapping, stack, out)?;
            } else {
                out.push(FlatField {
                    source_path: source,
                    output_name: name,
                });
            }
        }
    }

    stack.pop();
    Ok(())
}

/// Row-major index tuples for `dims`; a single `None` for scalars.
fn element_indices(dims: &[usize]) -> Vec<Option<Vec<usize>>> {
    if dims.is_empty() {
        return vec![None];
    }
    let mut indices: Vec<Vec<usize>> = vec![Vec::new()];
    for &dim in dims {
        indices = indices
            .into_iter()
            .flat_map(|prefix| {
                (0..dim).map(move |i| {
                    let mut next = prefix.clone();
                    next.push(i);
                    next
                })
            })
            .collect();
    }
    indices.into_iter().map(Some).collect()
}
