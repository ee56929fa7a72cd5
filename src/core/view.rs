use crate::domain::model::{FlatField, StructSet, ViewNode};
use crate::utils::error::{DestructorError, Result};
use std::collections::HashMap;

/// Builds the nested shape of view struct `name`.
pub fn build_view_tree(view_structs: &StructSet, name: &str) -> Result<ViewNode> {
    if !view_structs.contains(name) {
        return Err(DestructorError::UnknownStructError {
            name: name.to_string(),
        });
    }
    node_for(view_structs, name, &mut Vec::new())
}

fn node_for<'a>(view_structs: &'a StructSet, ty: &str, stack: &mut Vec<&'a str>) -> Result<ViewNode> {
    let Some(def) = view_structs.get(ty) else {
        return Ok(ViewNode::Scalar(ty.to_string()));
    };
    if stack.contains(&def.name.as_str()) {
        return Err(DestructorError::parse(
            stack.first().copied().unwrap_or(ty),
            format!("recursive struct '{}'", def.name),
        ));
    }
    stack.push(def.name.as_str());

    let mut children = Vec::with_capacity(def.fields.len());
    for field in &def.fields {
        let element = node_for(view_structs, &field.ty, stack)?;
        let node = field.dims.iter().rev().fold(element, |inner, &len| ViewNode::Array {
            len,
            element: Box::new(inner),
        });
        children.push((field.name.clone(), node));
    }

    stack.pop();
    Ok(ViewNode::Struct(children))
}

/// Pairs flattened output names with initializer values, in order.
/// Extra names or extra values are dropped.
pub fn field_map<'a>(fields: &'a [FlatField], values: &[&'a str]) -> HashMap<&'a str, &'a str> {
    fields
        .iter()
        .zip(values.iter())
        .map(|(field, value)| (field.output_name.as_str(), *value))
        .collect()
}

/// Renders the view initializer. A view member is looked up by its
/// `parent_child` key (array elements `key_i`); missing members get `default`.
pub fn generate_initializer(
    tree: &ViewNode,
    values: &HashMap<&str, &str>,
    default: &str,
) -> String {
    render(tree, values, "", default)
}

fn render(node: &ViewNode, values: &HashMap<&str, &str>, key: &str, default: &str) -> String {
    match node {
        ViewNode::Scalar(_) => match values.get(key) {
            Some(value) => (*value).to_string(),
            None => {
                tracing::debug!("No source value for view field '{}', using {}", key, default);
                default.to_string()
            }
        },
        ViewNode::Struct(children) => {
            let parts: Vec<String> = children
                .iter()
                .map(|(name, child)| {
                    let child_key = if key.is_empty() {
                        name.clone()
                    } else {
                        format!("{}_{}", key, name)
                    };
                    render(child, values, &child_key, default)
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        ViewNode::Array { len, element } => {
            let parts: Vec<String> = (0..*len)
                .map(|i| render(element, values, &format!("{}_{}", key, i), default))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::header::parse_typedef_structs;

    const VIEW_H: &str = r#"
        typedef struct {
            float capacity[2];
            int mass;
        } paramView;

        typedef struct {
            int id;
            paramView mainFull;
            paramView otherFull[2];
            int flags;
        } unitView;
    "#;

    fn flat(names: &[&str]) -> Vec<FlatField> {
        names
            .iter()
            .map(|n| FlatField {
                source_path: n.to_string(),
                output_name: n.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_build_view_tree() {
        let views = parse_typedef_structs("view.h", VIEW_H).unwrap();
        let tree = build_view_tree(&views, "unitView").unwrap();

        let ViewNode::Struct(children) = &tree else {
            panic!("expected struct node");
        };
        assert_eq!(children.len(), 4);
        assert_eq!(children[0], ("id".to_string(), ViewNode::Scalar("int".to_string())));
        assert!(matches!(&children[2].1, ViewNode::Array { len: 2, .. }));
    }

    #[test]
    fn test_build_view_tree_rejects_recursive_struct() {
        let views = parse_typedef_structs(
            "view.h",
            "typedef struct { int id; ring next[2]; } ring;",
        )
        .unwrap();
        let err = build_view_tree(&views, "ring").unwrap_err();
        assert!(matches!(err, DestructorError::ParseError { .. }));
        assert!(err.to_string().contains("recursive struct 'ring'"));
    }

    #[test]
    fn test_generate_reorders_and_fills_defaults() {
        let views = parse_typedef_structs("view.h", VIEW_H).unwrap();
        let tree = build_view_tree(&views, "unitView").unwrap();

        let fields = flat(&[
            "id",
            "mainFull_mass",
            "mainFull_capacity_0",
            "mainFull_capacity_1",
            "otherFull_1_mass",
        ]);
        let values = ["7", "10", "1.5", "3.0", "99"];
        let map = field_map(&fields, &values);

        assert_eq!(
            generate_initializer(&tree, &map, "0"),
            "{7, {{1.5, 3.0}, 10}, {{{0, 0}, 0}, {{0, 0}, 99}}, 0}"
        );
    }

    #[test]
    fn test_field_map_stops_at_shorter_side() {
        let fields = flat(&["a", "b", "c"]);
        let map = field_map(&fields, &["1", "2"]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("b"), Some(&"2"));
        assert!(map.get("c").is_none());
    }

    #[test]
    fn test_multi_dimensional_view_array() {
        let views =
            parse_typedef_structs("view.h", "typedef struct { int g[2][2]; } gridView;").unwrap();
        let tree = build_view_tree(&views, "gridView").unwrap();
        let fields = flat(&["g_0_0", "g_0_1", "g_1_0", "g_1_1"]);
        let map = field_map(&fields, &["1", "2", "3", "4"]);
        assert_eq!(generate_initializer(&tree, &map, "0"), "{{{1, 2}, {3, 4}}}");
    }

    #[test]
    fn test_unknown_view() {
        assert!(build_view_tree(&StructSet::new(), "unitView").is_err());
    }
}
