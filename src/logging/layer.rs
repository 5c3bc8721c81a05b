//! tracing-subscriber のレイヤー群（JSONファイル出力とコンソール整形）

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use super::json_array::JsonArrayWriter;
use super::record::RecordVisitor;

/// ファイルシンクとガードで共有する書き込み先。`None` はクローズ済み。
pub type SharedWriter = Arc<Mutex<Option<JsonArrayWriter>>>;

/// イベントを `LogRecord` に変換して JSON 配列ファイルへ追記するレイヤー
pub struct JsonArrayLayer {
    writer: SharedWriter,
}

impl JsonArrayLayer {
    pub fn new(writer: SharedWriter) -> Self {
        Self { writer }
    }
}

impl<S: Subscriber> Layer<S> for JsonArrayLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let record = visitor.into_record(event.metadata());

        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("json log: failed to serialize record: {e}");
                return;
            }
        };

        // ロガー自身には書けないので stderr に出して捨てる
        let mut guard = match self.writer.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(writer) = guard.as_mut()
            && let Err(e) = writer.append(&line)
        {
            eprintln!("json log: failed to write {}: {e}", writer.path().display());
        }
    }
}

/// コンソール用フォーマット: `LEVEL: message`
pub struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let level = visitor.level(event.metadata().level());
        writeln!(writer, "{}: {}", level, visitor.message)
    }
}
