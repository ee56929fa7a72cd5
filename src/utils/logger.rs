use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("c_destructor=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("c_destructor=info"))
    }
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 將日誌寫入檔案（每次執行覆蓋），輸出不含 ANSI 色碼
pub fn init_file_logger<P: AsRef<Path>>(path: P, verbose: bool) -> std::io::Result<()> {
    let file = File::create(path)?;

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(false),
        )
        .init();

    Ok(())
}

/// 有 `--log-file` 時寫檔，否則輸出到 stderr
pub fn init(log_file: Option<&str>, verbose: bool) -> std::io::Result<()> {
    match log_file {
        Some(path) => init_file_logger(path, verbose),
        None => {
            init_cli_logger(verbose);
            Ok(())
        }
    }
}
