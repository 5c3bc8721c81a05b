//! ロギングサービス本体
//!
//! `init` でプロセス開始時に一度だけ作成し、`Logger` を各コンポーネントへ渡す。
//! 内部では専用の `tracing::Dispatch` を持ち、グローバル状態には依存しない。

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::{EnvFilter, Targets};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt};

use super::fields::{Level, LogFields};
use super::json_array::{JsonArrayWriter, RotationPolicy};
use super::layer::{ConsoleFormat, JsonArrayLayer, SharedWriter};

/// `for_module` を呼ばない場合のモジュール名
pub const DEFAULT_MODULE: &str = "app";

/// ログ出力先の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// ログディレクトリ（無ければ作成）
    pub dir: PathBuf,
    /// ファイル名の接頭辞。`<prefix>_<YYYYMMDD_HHMMSS>.json` になる
    pub file_prefix: String,
    pub rotation: RotationPolicy,
    /// コンソール（stderr）出力の有無
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file_prefix: "openai_app".to_string(),
            rotation: RotationPolicy::default(),
            console: true,
        }
    }
}

impl LogSettings {
    /// 起動時刻からログファイルのパスを決める
    pub fn file_path(&self, started: DateTime<Local>) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.json",
            self.file_prefix,
            started.format("%Y%m%d_%H%M%S")
        ))
    }
}

/// ロギングサービスを構築する
///
/// 戻り値の `LogGuard` は保持し続けること。drop 時にファイルの JSON 配列を閉じる。
pub fn init(settings: &LogSettings) -> io::Result<(Logger, LogGuard)> {
    let path = settings.file_path(Local::now());
    let writer = JsonArrayWriter::open(&path, settings.rotation)?;
    let shared: SharedWriter = Arc::new(Mutex::new(Some(writer)));

    // 依存クレートの低レベルなデバッグ出力はファイルに入れない
    let file_filter = Targets::new()
        .with_default(LevelFilter::DEBUG)
        .with_target("hyper", LevelFilter::WARN)
        .with_target("hyper_util", LevelFilter::WARN)
        .with_target("reqwest", LevelFilter::WARN)
        .with_target("h2", LevelFilter::WARN)
        .with_target("rustls", LevelFilter::WARN);
    let file_layer = JsonArrayLayer::new(Arc::clone(&shared)).with_filter(file_filter);

    let console_layer = settings.console.then(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt::layer()
            .event_format(ConsoleFormat)
            .with_writer(io::stderr)
            .with_filter(filter)
    });

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer);

    let logger = Logger {
        dispatch: Dispatch::new(subscriber),
        module: DEFAULT_MODULE,
    };
    Ok((logger, LogGuard { writer: shared, path }))
}

/// ログ呼び出しの窓口。clone は安価で、同じ出力先を共有する。
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    module: &'static str,
}

impl Logger {
    /// 何も出力しないロガー
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
            module: DEFAULT_MODULE,
        }
    }

    /// レコードの `module` を差し替えたハンドルを返す
    pub fn for_module(&self, module: &'static str) -> Self {
        Self {
            dispatch: self.dispatch.clone(),
            module,
        }
    }

    pub fn module(&self) -> &'static str {
        self.module
    }

    /// 内部の Dispatch（グローバルデフォルトとして登録する場合に使う）
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn log(&self, level: Level, message: impl AsRef<str>, fields: LogFields) {
        let message = message.as_ref();
        let module = self.module;
        let prompt = fields.prompt.as_deref();
        let response = fields.response.as_deref();

        tracing::dispatcher::with_default(&self.dispatch, || match level {
            Level::Debug => tracing::debug!(module, prompt, response, "{message}"),
            Level::Info => tracing::info!(module, prompt, response, "{message}"),
            Level::Warning => tracing::warn!(module, prompt, response, "{message}"),
            Level::Error => tracing::error!(module, prompt, response, "{message}"),
            Level::Critical => {
                tracing::error!(module, prompt, response, critical = true, "{message}")
            }
        });
    }

    pub fn debug(&self, message: impl AsRef<str>, fields: LogFields) {
        self.log(Level::Debug, message, fields);
    }

    pub fn info(&self, message: impl AsRef<str>, fields: LogFields) {
        self.log(Level::Info, message, fields);
    }

    pub fn warning(&self, message: impl AsRef<str>, fields: LogFields) {
        self.log(Level::Warning, message, fields);
    }

    pub fn error(&self, message: impl AsRef<str>, fields: LogFields) {
        self.log(Level::Error, message, fields);
    }

    pub fn critical(&self, message: impl AsRef<str>, fields: LogFields) {
        self.log(Level::Critical, message, fields);
    }
}

/// JSON ログファイルの寿命を握るガード
#[must_use = "dropping the guard closes the JSON log file immediately"]
pub struct LogGuard {
    writer: SharedWriter,
    path: PathBuf,
}

impl LogGuard {
    /// 現在書き込み中のファイル（バックアップは `<path>.1` 以降）
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 閉じ括弧を書いてファイルを閉じる。以降のレコードは捨てられる。
    pub fn close(self) -> io::Result<()> {
        self.close_writer()
    }

    fn close_writer(&self) -> io::Result<()> {
        let mut guard = match self.writer.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.take() {
            Some(mut writer) => writer.close(),
            None => Ok(()),
        }
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Err(e) = self.close_writer() {
            eprintln!("json log: failed to close {}: {e}", self.path.display());
        }
    }
}
