use anyhow::Result;
use c_destructor::core::Storage;
use c_destructor::domain::records::complex_full_header;
use c_destructor::{
    BatchPipeline, CRecord, DestructorEngine, DestructorError, JobConfig, LocalStorage,
    ParameterGroup, SinglePipeline, Unit,
};
use tempfile::TempDir;

const VIEW_H: &str = r#"
// reduced layout flashed to the device
typedef struct {
    float capacity[2];
    int mass;
} paramView;

typedef struct {
    int id;
    paramView main;
    paramView extra[2];
    unsigned char flags;
} unitView;
"#;

const MAPPING: &str = "# full path: view name\nmainFull: main\notherFull: extra\n";

fn sample_units() -> [Unit; 2] {
    let p = |m: i32| ParameterGroup::new(m, m + 1, m as f32 / 2.0, [m as f32, m as f32 + 0.5]);
    [
        Unit::new(1, 42.0, p(10), p(20), [p(30), p(40)]),
        Unit::new(2, 7.5, p(11), p(21), [p(31), p(41)]),
    ]
}

async fn write_inputs(storage: &LocalStorage) -> Result<()> {
    let [a, b] = sample_units();
    let init = format!(
        "#include \"complex_full.h\"\n\n\
         static const unit units[2] = {{\n    {},\n    {}\n}};\n\n\
         /* single record */\nunit spare PROGMEM = {};\n",
        a.to_init_value(),
        b.to_init_value(),
        b.to_init_value()
    );

    storage.write_file("complex_full.h", complex_full_header().as_bytes()).await?;
    storage.write_file("complex_view.h", VIEW_H.as_bytes()).await?;
    storage.write_file("mapping.txt", MAPPING.as_bytes()).await?;
    storage.write_file("units_init.c", init.as_bytes()).await?;
    Ok(())
}

fn job(dir: &str, output: &str) -> Result<JobConfig> {
    let toml = format!(
        r#"
[job]
name = "units"

[input]
header = "{dir}/complex_full.h"
view_file = "{dir}/complex_view.h"
init_file = "{dir}/units_init.c"
mapping_file = "{dir}/mapping.txt"

[target]
struct = "unit"
view = "unitView"

[output]
path = "{dir}/{output}"
specifier = "PROGMEM"
"#,
        dir = dir,
        output = output
    );
    Ok(JobConfig::from_toml_str(&toml)?)
}

/// 批次處理全部宣告並寫入輸出標頭
#[tokio::test]
async fn test_end_to_end_batch_reshape() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let storage = LocalStorage::new(temp_dir.path());
    write_inputs(&storage).await?;

    let config = job(&dir, "units_view.h")?;
    let engine = DestructorEngine::new(BatchPipeline::new(LocalStorage::new("."), config));
    let output_path = engine.run().await?;
    assert!(output_path.ends_with("units_view.h"));

    let written = storage.read_to_string("units_view.h").await?;
    assert_eq!(
        written,
        "\nstatic const unit units[2] PROGMEM = {\n\
         {1, {{10.0, 10.5}, 10}, {{{30.0, 30.5}, 30}, {{40.0, 40.5}, 40}}, 0},\n\
         {2, {{11.0, 11.5}, 11}, {{{31.0, 31.5}, 31}, {{41.0, 41.5}, 41}}, 0}\n\
         };\n\
         \nconst unit spare PROGMEM = \
         {2, {{11.0, 11.5}, 11}, {{{31.0, 31.5}, 31}, {{41.0, 41.5}, 41}}, 0};\n"
    );
    Ok(())
}

/// 重複執行不會產生重複宣告，且保留檔案中的其他內容
#[tokio::test]
async fn test_batch_rerun_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let storage = LocalStorage::new(temp_dir.path());
    write_inputs(&storage).await?;
    storage
        .write_file("units_view.h", b"#pragma once\n#include \"complex_view.h\"\n")
        .await?;

    for _ in 0..2 {
        let config = job(&dir, "units_view.h")?;
        DestructorEngine::new(BatchPipeline::new(LocalStorage::new("."), config))
            .run()
            .await?;
    }

    let written = storage.read_to_string("units_view.h").await?;
    assert!(written.starts_with("#pragma once\n#include \"complex_view.h\"\n"));
    assert_eq!(written.matches("units[2]").count(), 1);
    assert_eq!(written.matches("const unit spare").count(), 1);
    Ok(())
}

/// 單一宣告模式只處理第一個宣告
#[tokio::test]
async fn test_single_pipeline_uses_first_declaration() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let storage = LocalStorage::new(temp_dir.path());
    write_inputs(&storage).await?;

    let mut config = job(&dir, "single.h")?;
    config.target.output_type = Some("unitView".to_string());
    let pipeline = SinglePipeline::new(LocalStorage::new("."), config)
        .with_var_name(Some("view_array".to_string()));
    DestructorEngine::new(pipeline).run().await?;

    let written = storage.read_to_string("single.h").await?;
    assert!(written.contains("static const unitView view_array[2] PROGMEM = {\n{1, "));
    assert!(!written.contains("spare"));
    Ok(())
}

/// 初始化值不足時，單一宣告模式回報錯誤
#[tokio::test]
async fn test_single_pipeline_reports_short_initializer() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let storage = LocalStorage::new(temp_dir.path());
    write_inputs(&storage).await?;
    storage
        .write_file("units_init.c", b"const unit broken = {1, 2.0, {3}};\n")
        .await?;

    let config = job(&dir, "single.h")?;
    let result = DestructorEngine::new(SinglePipeline::new(LocalStorage::new("."), config))
        .run()
        .await;

    match result {
        Err(e @ DestructorError::ShapeMismatchError { .. }) => {
            assert_eq!(e.exit_code(), 2);
        }
        other => panic!("expected shape mismatch, got {:?}", other),
    }
    assert!(!storage.exists("single.h").await);
    Ok(())
}
