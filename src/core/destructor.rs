use crate::core::declaration::{ensure_const, find_declarations, render_declaration};
use crate::core::flatten::flatten_struct;
use crate::core::initializer::parse_initializer;
use crate::domain::mapping::FieldMapping;
use crate::core::view::{build_view_tree, field_map, generate_initializer};
use crate::domain::model::{Declaration, FlatField, InitValue, RenderedDeclaration, StructSet, ViewNode};
use crate::utils::error::{DestructorError, Result};

/// How a reshaped declaration is written back out.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Type name in front of the variable; the full struct name when `None`.
    pub output_type: Option<String>,
    /// Replaces the input's trailing attributes (e.g. `PROGMEM`) when set.
    pub specifier: Option<String>,
    pub force_const: bool,
    pub rename_to: Option<String>,
}

/// Reshapes initializers of one full struct into one view struct.
#[derive(Debug, Clone)]
pub struct Destructor {
    target_struct: String,
    flat_fields: Vec<FlatField>,
    view_tree: ViewNode,
    default_value: String,
}

impl Destructor {
    pub fn new(
        full_structs: &StructSet,
        view_structs: &StructSet,
        target_struct: &str,
        target_view: &str,
        mapping: &FieldMapping,
    ) -> Result<Self> {
        let flat_fields = flatten_struct(full_structs, target_struct, mapping)?;
        let view_tree = build_view_tree(view_structs, target_view)?;
        tracing::debug!(
            "'{}' flattens to {} fields: {:?}",
            target_struct,
            flat_fields.len(),
            flat_fields.iter().map(|f| &f.output_name).collect::<Vec<_>>()
        );
        tracing::debug!("View tree for '{}': {:?}", target_view, view_tree);

        Ok(Self::from_parts(target_struct, flat_fields, view_tree))
    }

    pub fn from_parts(target_struct: &str, flat_fields: Vec<FlatField>, view_tree: ViewNode) -> Self {
        Self {
            target_struct: target_struct.to_string(),
            flat_fields,
            view_tree,
            default_value: "0".to_string(),
        }
    }

    pub fn with_default_value(mut self, default_value: &str) -> Self {
        self.default_value = default_value.to_string();
        self
    }

    pub fn target_struct(&self) -> &str {
        &self.target_struct
    }

    /// Number of scalar values a full initializer must supply.
    pub fn expected_len(&self) -> usize {
        self.flat_fields.len()
    }

    pub fn check_structure(&self, values: &[&str]) -> Result<()> {
        let expected = self.expected_len();
        if values.len() < expected {
            return Err(DestructorError::ShapeMismatchError {
                struct_name: self.target_struct.clone(),
                expected,
                found: values.len(),
            });
        }
        if values.len() > expected {
            tracing::debug!(
                "Ignoring {} surplus initializer values",
                values.len() - expected
            );
        }
        Ok(())
    }

    /// Reshapes one struct initializer.
    pub fn reshape_struct(&self, value: &InitValue) -> Result<String> {
        let values = value.flatten();
        self.check_structure(&values)?;
        let map = field_map(&self.flat_fields, &values);
        Ok(generate_initializer(&self.view_tree, &map, &self.default_value))
    }

    /// Reshapes each element of an array initializer; elements that do not
    /// fit the full struct are skipped.
    pub fn reshape_array(&self, value: &InitValue) -> Result<String> {
        let elements = match value {
            InitValue::List(items) => items.as_slice(),
            InitValue::Scalar(s) => {
                return Err(DestructorError::parse(
                    "initializer",
                    format!("expected an array initializer, found '{}'", s),
                ))
            }
        };

        let mut items = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match self.reshape_struct(element) {
                Ok(item) => items.push(item),
                Err(e @ DestructorError::ShapeMismatchError { .. }) => {
                    tracing::warn!("⚠️ Skipping array element {}: {}", index, e);
                }
                Err(e) => return Err(e),
            }
        }
        if items.is_empty() && !elements.is_empty() {
            tracing::warn!("⚠️ No element of the array matched '{}'", self.target_struct);
        }

        Ok(format!("{{\n{}\n}}", items.join(",\n")))
    }

    /// Processes a raw initializer block. `is_array` comes from the
    /// declaration; without it, a block whose first element is itself a
    /// list is taken to be an array.
    pub fn process_structure(&self, init_block: &str, is_array: Option<bool>) -> Result<String> {
        let parsed = parse_initializer(init_block)?;
        let is_array = is_array.unwrap_or_else(|| {
            matches!(parsed.as_list(), Some([InitValue::List(_), ..]))
        });

        if is_array {
            self.reshape_array(&parsed)
        } else {
            self.reshape_struct(&parsed)
        }
    }

    pub fn process_declaration(
        &self,
        decl: &Declaration,
        options: &RenderOptions,
    ) -> Result<RenderedDeclaration> {
        let init = self.process_structure(&decl.init_block, Some(decl.is_array()))?;

        let specifiers = if options.force_const {
            ensure_const(&decl.specifiers)
        } else {
            decl.specifiers.clone()
        };
        let postfix = match options.specifier.as_deref() {
            Some(spec) if !spec.is_empty() => vec![spec.to_string()],
            Some(_) => Vec::new(),
            None => decl.attributes.clone(),
        };
        let var_name = options
            .rename_to
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| decl.var_name.clone());
        let type_name = options.output_type.as_deref().unwrap_or(&self.target_struct);

        Ok(RenderedDeclaration {
            text: render_declaration(
                &specifiers,
                type_name,
                &var_name,
                decl.array_size.as_ref(),
                &postfix,
                &init,
            ),
            var_name,
        })
    }

    /// Reshapes the first declaration of the full struct found in `init_text`.
    pub fn run(&self, init_text: &str, options: &RenderOptions) -> Result<RenderedDeclaration> {
        let declarations = find_declarations(init_text, &self.target_struct)?;
        let decl = declarations.first().ok_or_else(|| {
            DestructorError::DeclarationNotFoundError {
                struct_name: self.target_struct.clone(),
            }
        })?;
        tracing::debug!("Processing declaration of '{}'", decl.var_name);
        self.process_declaration(decl, options)
    }
}
