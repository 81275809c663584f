//! In-memory event capture for logging assertions
//!
//! Store operations are identified by `op` and `table`, so the capture pulls
//! those fields (plus the SQL echo and timing fields) out of every event into
//! typed slots. Anything else stays available by name.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use feedstore_core_types::schema::{
    EVENT_SQL, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_EVENT, FIELD_OP, FIELD_PARAM_COUNT,
    FIELD_ROW_COUNT, FIELD_SQL, FIELD_TABLE,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One captured event
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub op: Option<String>,
    pub event: Option<String>,
    pub table: Option<String>,
    pub sql: Option<String>,
    pub param_count: Option<u64>,
    pub row_count: Option<u64>,
    pub duration_ms: Option<u64>,
    pub err_code: Option<String>,
    /// Every field, rendered as text, including the typed ones above
    pub fields: BTreeMap<&'static str, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, target: &str, fields: BTreeMap<&'static str, String>) -> Self {
        let text = |name: &str| fields.get(name).cloned();
        let number = |name: &str| fields.get(name).and_then(|v| v.parse::<u64>().ok());
        Self {
            level,
            target: target.to_string(),
            op: text(FIELD_OP),
            event: text(FIELD_EVENT),
            table: text(FIELD_TABLE),
            sql: text(FIELD_SQL),
            param_count: number(FIELD_PARAM_COUNT),
            row_count: number(FIELD_ROW_COUNT),
            duration_ms: number(FIELD_DURATION_MS),
            err_code: text(FIELD_ERR_CODE),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is(&self, op: &str, table: &str) -> bool {
        self.op.as_deref() == Some(op) && self.table.as_deref() == Some(table)
    }
}

#[derive(Default)]
struct FieldText(BTreeMap<&'static str, String>);

impl Visit for FieldText {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name(), value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name(), value.to_string());
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer(Buffer);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut text = FieldText::default();
        event.record(&mut text);
        let meta = event.metadata();
        let captured = CapturedEvent::from_fields(*meta.level(), meta.target(), text.0);
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(captured);
    }
}

/// Read side of the capture buffer
#[derive(Clone, Default)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn matching(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| predicate(e)).collect()
    }

    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.op.as_deref() == Some(op))
    }

    /// Event names logged for `op` on `table`, in emission order
    pub fn boundary_sequence(&self, op: &str, table: &str) -> Vec<String> {
        self.matching(|e| e.is(op, table))
            .into_iter()
            .filter_map(|e| e.event)
            .collect()
    }

    /// Echoed statements that mention `table`
    pub fn echoed_sql(&self, table: &str) -> Vec<String> {
        self.matching(|e| e.event.as_deref() == Some(EVENT_SQL))
            .into_iter()
            .filter_map(|e| e.sql)
            .filter(|sql| sql.contains(table))
            .collect()
    }

    /// # Panics
    ///
    /// When `op` on `table` did not log exactly `expected`, in order.
    pub fn assert_boundary(&self, op: &str, table: &str, expected: &[&str]) {
        let seen = self.boundary_sequence(op, table);
        assert_eq!(seen, expected, "boundary events for {} on {}", op, table);
    }

    #[cfg(test)]
    fn push(&self, event: CapturedEvent) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber and return its handle
///
/// Every test in a binary shares one buffer; tell operations apart by table
/// name or a unique op.
///
/// ```
/// use feedstore_core::logging_facility::test_capture::init_test_capture;
/// use feedstore_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("feed_create", "doc_feeds");
/// capture.assert_boundary("feed_create", "doc_feeds", &["start"]);
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            // A subscriber installed elsewhere wins; the handle then stays empty.
            let _ = tracing_subscriber::registry()
                .with(CaptureLayer(capture.buffer.clone()))
                .try_init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(op: &str, table: &str, name: &str) -> CapturedEvent {
        let fields = BTreeMap::from([
            (FIELD_OP, op.to_string()),
            (FIELD_TABLE, table.to_string()),
            (FIELD_EVENT, name.to_string()),
            (FIELD_DURATION_MS, "12".to_string()),
        ]);
        CapturedEvent::from_fields(Level::INFO, "feedstore_store::store", fields)
    }

    #[test]
    fn test_typed_fields_are_extracted() {
        let e = event("feed_list", "feeds", "end");
        assert_eq!(e.op.as_deref(), Some("feed_list"));
        assert_eq!(e.table.as_deref(), Some("feeds"));
        assert_eq!(e.duration_ms, Some(12));
        assert_eq!(e.row_count, None);
        assert_eq!(e.field(FIELD_EVENT), Some("end"));
    }

    #[test]
    fn test_boundary_sequence_is_scoped_to_table() {
        let capture = TestCapture::default();
        capture.push(event("feed_create", "feeds", "start"));
        capture.push(event("feed_create", "other", "start"));
        capture.push(event("feed_create", "feeds", "end"));

        capture.assert_boundary("feed_create", "feeds", &["start", "end"]);
        assert_eq!(capture.boundary_sequence("feed_create", "other"), vec!["start"]);
        assert_eq!(capture.events_for_op("feed_create").len(), 3);
    }

    #[test]
    fn test_echoed_sql_filters_by_table() {
        let capture = TestCapture::default();
        let fields = BTreeMap::from([
            (FIELD_EVENT, EVENT_SQL.to_string()),
            (FIELD_SQL, "SELECT * FROM \"feeds\"".to_string()),
        ]);
        capture.push(CapturedEvent::from_fields(Level::INFO, "t", fields));

        assert_eq!(capture.echoed_sql("\"feeds\"").len(), 1);
        assert!(capture.echoed_sql("\"links\"").is_empty());
    }
}
