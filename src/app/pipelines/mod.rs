pub mod batch_pipeline;
pub mod single_pipeline;

use crate::core::destructor::{Destructor, RenderOptions};
use crate::core::flatten::flatten_struct;
use crate::core::header::parse_typedef_structs;
use crate::domain::mapping::FieldMapping;
use crate::core::view::build_view_tree;
use crate::core::{ConfigProvider, SourceBundle, Storage};
use crate::utils::error::Result;

/// 讀取兩份標頭、映射與初始化檔案，兩種 pipeline 共用
pub(crate) async fn extract_sources<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
) -> Result<SourceBundle> {
    tracing::debug!("Reading full structs from: {}", config.header_file());
    let header_text = storage.read_to_string(config.header_file()).await?;
    let full_structs = parse_typedef_structs(config.header_file(), &header_text)?;
    tracing::debug!("Full structs: {:?}", full_structs.names().collect::<Vec<_>>());

    tracing::debug!("Reading view structs from: {}", config.view_file());
    let view_text = storage.read_to_string(config.view_file()).await?;
    let view_structs = parse_typedef_structs(config.view_file(), &view_text)?;
    let view_tree = build_view_tree(&view_structs, config.target_view())?;
    tracing::debug!(
        "View tree for '{}': {}",
        config.target_view(),
        serde_json::to_string(&view_tree)?
    );

    let mut mapping = match config.mapping_file() {
        Some(path) => FieldMapping::parse(&storage.read_to_string(path).await?),
        None => FieldMapping::new(),
    };
    if let Some(inline) = config.inline_mapping() {
        mapping.merge(inline);
    }
    tracing::debug!("Explicit mapping: {:?}", mapping);

    let init_text = storage.read_to_string(config.init_file()).await?;

    Ok(SourceBundle {
        full_structs,
        view_structs,
        view_tree,
        mapping,
        init_text,
    })
}

pub(crate) fn destructor_for<C: ConfigProvider>(
    bundle: &SourceBundle,
    config: &C,
) -> Result<Destructor> {
    let flat_fields = flatten_struct(&bundle.full_structs, config.target_struct(), &bundle.mapping)?;
    Ok(
        Destructor::from_parts(config.target_struct(), flat_fields, bundle.view_tree.clone())
            .with_default_value(config.default_value()),
    )
}

pub(crate) fn render_options<C: ConfigProvider>(config: &C, force_const: bool) -> RenderOptions {
    RenderOptions {
        output_type: Some(config.output_type().to_string()),
        specifier: config.specifier().map(str::to_string),
        force_const,
        rename_to: None,
    }
}
