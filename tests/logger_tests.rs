use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use taglog::sink::{Sink, WriterSink};
use taglog::tagset::TAG_NONE;
use taglog::{format, Level, Logger, Tag};

/// Sink collecting every record into one shared byte vector.
struct CollectingSink {
    data: Arc<Mutex<Vec<u8>>>,
}

impl CollectingSink {
    fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let data = Arc::new(Mutex::new(Vec::new()));
        (Self { data: data.clone() }, data)
    }
}

impl Sink for CollectingSink {
    fn write(&self, record: &[u8]) -> io::Result<usize> {
        self.data.lock().unwrap().extend_from_slice(record);
        Ok(record.len())
    }
}

/// Sink counting records without keeping their bytes.
struct CountingSink {
    records: Arc<AtomicUsize>,
}

impl Sink for CountingSink {
    fn write(&self, record: &[u8]) -> io::Result<usize> {
        self.records.fetch_add(1, Ordering::SeqCst);
        Ok(record.len())
    }
}

/// Sink that fails every write.
struct FailingSink;

impl Sink for FailingSink {
    fn write(&self, _record: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink down"))
    }
}

fn collected_string(data: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(data.lock().unwrap().clone()).unwrap()
}

#[test]
fn test_plain_message_record() {
    let (sink, data) = CollectingSink::new();
    let log = Logger::new(sink);

    log.info(TAG_NONE).write("hello");

    assert_eq!(
        collected_string(&data),
        "{\"lv\":\"info\",\"tag\":[],\"msg\":\"hello\"}\n"
    );
}

#[test]
fn test_tagged_record_with_fields() {
    let (sink, data) = CollectingSink::new();
    let log = Logger::new(sink);
    let io_tag = log.new_tag("io");
    let net_tag = log.new_tag("net");

    log.info(io_tag | net_tag).str("k", "v").int("n", 3).write("");

    assert_eq!(
        collected_string(&data),
        "{\"lv\":\"info\",\"tag\":[\"io\",\"net\"],\"k\":\"v\",\"n\":3}\n"
    );
}

#[test]
fn test_filtered_call_produces_no_bytes() {
    let (sink, data) = CollectingSink::new();
    let log = Logger::new(sink);
    log.set_filter(Some(Level::Warn), 0);

    let entry = log.info(TAG_NONE);
    assert!(!entry.enabled(), "rejected call must yield a no-op entry");
    entry.str("x", "y").write("m");

    assert!(data.lock().unwrap().is_empty(), "rejected call must not reach the sink");
}

#[test]
fn test_absent_error_renders_null() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(format::LEVEL);

    log.error(TAG_NONE).err(None).write("done");

    assert_eq!(
        collected_string(&data),
        "{\"lv\":\"error\",\"msg\":\"done\",\"err\":null}\n"
    );
}

#[test]
fn test_present_error_renders_message() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(format::LEVEL);

    let cause = io::Error::new(io::ErrorKind::NotFound, "no such file");
    log.error(TAG_NONE).err(Some(&cause)).writes();

    assert_eq!(
        collected_string(&data),
        "{\"lv\":\"error\",\"err\":\"no such file\"}\n"
    );
}

#[test]
fn test_string_escaping() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(format::LEVEL);

    log.info(TAG_NONE).str("s", "a\"b\nc").write("");

    assert_eq!(
        collected_string(&data),
        "{\"lv\":\"info\",\"s\":\"a\\\"b\\nc\"}\n"
    );
}

#[test]
fn test_escaping_round_trips_through_json_parser() {
    let (sink, data) = CollectingSink::new();
    let log = Logger::new(sink);

    let nasty = "quote\" slash\\ newline\n tab\t return\r héllo";
    log.info(TAG_NONE).str("s", nasty).write("msg with \"quotes\"");

    let line = collected_string(&data);
    let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(parsed["s"], nasty);
    assert_eq!(parsed["msg"], "msg with \"quotes\"");
    assert_eq!(parsed["lv"], "info");
}

#[test]
fn test_empty_record_is_bare_object() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(0);

    log.info(TAG_NONE).writes();

    assert_eq!(collected_string(&data), "{}\n");
}

#[test]
fn test_duplicate_keys_preserved_in_order() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(0);

    log.info(TAG_NONE).int("n", 1).int("n", 2).writes();

    assert_eq!(collected_string(&data), "{\"n\":1,\"n\":2}\n");
}

#[test]
fn test_typed_setters_render_per_type() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(0);

    log.info(TAG_NONE)
        .int("i", -5)
        .uint("u", 7)
        .float("f", 4.2)
        .bool("b", true)
        .null("none")
        .writes();

    assert_eq!(
        collected_string(&data),
        "{\"i\":-5,\"u\":7,\"f\":4.20,\"b\":true,\"none\":null}\n"
    );
}

#[test]
fn test_tag_mask_filter() {
    let (sink, data) = CollectingSink::new();
    let log = Logger::new(sink);
    let io_tag = log.new_tag("io");
    let net_tag = log.new_tag("net");
    log.set_filter(None, io_tag);

    log.info(net_tag).write("dropped");
    log.info(io_tag | net_tag).write("kept");

    let out = collected_string(&data);
    assert!(!out.contains("dropped"));
    assert!(out.contains("kept"));
}

#[test]
fn test_predicate_overrides_threshold() {
    let (sink, data) = CollectingSink::new();
    let log = Logger::new(sink);
    log.set_filter(Some(Level::Fatal), 0);
    log.set_predicate(Some(Box::new(|level, _| level >= Level::Debug)));

    log.debug(TAG_NONE).write("through the predicate");
    log.set_predicate(None);
    log.debug(TAG_NONE).write("blocked again");

    let out = collected_string(&data);
    assert!(out.contains("through the predicate"));
    assert!(!out.contains("blocked again"));
}

#[test]
fn test_prefix_flag() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_prefix("audit:");
    log.set_format_flags(format::PREFIX | format::LEVEL);

    log.warn(TAG_NONE).write("x");

    assert_eq!(collected_string(&data), "audit:{\"lv\":\"warn\",\"msg\":\"x\"}\n");
}

#[test]
fn test_unix_ms_timestamp_field() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(format::LEVEL | format::TIME_UNIX_MS);

    log.info(TAG_NONE).write("stamped");

    let line = collected_string(&data);
    let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    let ts = parsed["ts"].as_i64().expect("ts must be an integer");
    // Sanity window: after 2020, before 2100.
    assert!(ts > 1_577_836_800_000, "ts should be unix milliseconds: {}", ts);
    assert!(ts < 4_102_444_800_000);
}

#[test]
fn test_text_formatter_record() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_formatter(taglog::TextFormatter::new());
    let io_tag = log.new_tag("io");
    let net_tag = log.new_tag("net");

    log.info(io_tag | net_tag)
        .int("status", 200)
        .float("ms", 4.2)
        .write("request ok");

    assert_eq!(
        collected_string(&data),
        "INF [io,net] request ok // status=200, ms=4.20\n"
    );
}

#[test]
fn test_text_formatter_multiline_values_stay_single_line() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_formatter(taglog::TextFormatter::new());

    log.info(TAG_NONE).str("out", "line1\r\nline2").write("two\nlines");

    let out = collected_string(&data);
    assert_eq!(out.matches('\n').count(), 1, "record must stay on one line");
    assert_eq!(out, "INF [] two;lines // out=line1;line2\n");
}

#[test]
fn test_sink_errors_are_swallowed() {
    let mut log = Logger::new(FailingSink);
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_hook = seen.clone();
    log.set_error_hook(Some(Box::new(move |_err| {
        seen_hook.fetch_add(1, Ordering::SeqCst);
    })));

    // Must not panic, block or propagate anything.
    log.info(TAG_NONE).str("k", "v").write("lost");
    log.error(TAG_NONE).write("also lost");

    assert_eq!(seen.load(Ordering::SeqCst), 2, "hook sees every swallowed error");
}

#[test]
fn test_write_tagged_receives_routing_info() {
    struct RoutingSink {
        seen: Arc<Mutex<Vec<(Level, Tag, String, String)>>>,
    }

    impl Sink for RoutingSink {
        fn write(&self, record: &[u8]) -> io::Result<usize> {
            Ok(record.len())
        }

        fn write_tagged(
            &self,
            level: Level,
            tags: Tag,
            record: &[u8],
            header_len: usize,
        ) -> io::Result<usize> {
            let header = String::from_utf8(record[..header_len].to_vec()).unwrap();
            let body = String::from_utf8(record[header_len..].to_vec()).unwrap();
            self.seen.lock().unwrap().push((level, tags, header, body));
            Ok(record.len())
        }
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Logger::new(RoutingSink { seen: seen.clone() });
    let io_tag = log.new_tag("io");

    log.warn(io_tag).int("n", 1).write("routed");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (level, tags, header, body) = &seen[0];
    assert_eq!(*level, Level::Warn);
    assert_eq!(*tags, io_tag);
    assert_eq!(header, "{\"lv\":\"warn\",\"tag\":[\"io\"],");
    assert_eq!(body, "\"msg\":\"routed\",\"n\":1}\n");
}

#[test]
fn test_abandoned_entry_emits_nothing() {
    let (sink, data) = CollectingSink::new();
    let log = Logger::new(sink);

    let entry = log.info(TAG_NONE).str("k", "v");
    drop(entry);

    assert!(data.lock().unwrap().is_empty());
    // The recycled scratch must not leak into the next record.
    log.info(TAG_NONE).writes();
    assert_eq!(collected_string(&data), "{\"lv\":\"info\",\"tag\":[]}\n");
}

#[test]
fn test_extension_shapes_entry() {
    let (sink, data) = CollectingSink::new();
    let mut log = Logger::new(sink);
    log.set_format_flags(0);

    fn request_fields<'a>(entry: taglog::Entry<'a>) -> taglog::Entry<'a> {
        entry.str("method", "GET").int("status", 200)
    }

    log.info(TAG_NONE).ext(request_fields).float("ms", 1.5).writes();

    assert_eq!(
        collected_string(&data),
        "{\"method\":\"GET\",\"status\":200,\"ms\":1.50}\n"
    );
}

#[test]
fn test_file_sink_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.log");
    let file = std::fs::File::create(&path).unwrap();

    let log = Logger::new(WriterSink::new(file));
    log.info(TAG_NONE).int("n", 1).write("to disk");
    log.close().unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "{\"lv\":\"info\",\"tag\":[],\"msg\":\"to disk\",\"n\":1}\n");
}

#[test]
fn test_concurrent_records_are_atomic_and_ordered_per_thread() {
    const THREADS: usize = 8;
    const RECORDS: usize = 2_000;

    let (sink, data) = CollectingSink::new();
    let log = Arc::new(Logger::new(sink));

    let mut handles = Vec::new();
    for thread_id in 0..THREADS {
        let log = log.clone();
        handles.push(thread::spawn(move || {
            for seq in 0..RECORDS {
                log.info(TAG_NONE)
                    .int("thread", thread_id as i64)
                    .int("seq", seq as i64)
                    .write("tick");
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let out = collected_string(&data);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), THREADS * RECORDS, "every record arrives exactly once");

    // Each line is one complete JSON object, and each thread's sequence
    // numbers appear in issue order.
    let mut next_seq = vec![0i64; THREADS];
    for line in lines {
        let parsed: serde_json::Value =
            serde_json::from_str(line).expect("no partial or interleaved records");
        let thread_id = parsed["thread"].as_i64().unwrap() as usize;
        let seq = parsed["seq"].as_i64().unwrap();
        assert_eq!(seq, next_seq[thread_id], "per-thread order must match program order");
        next_seq[thread_id] += 1;
    }
}

#[test]
fn test_counting_sink_sees_every_admitted_record() {
    let records = Arc::new(AtomicUsize::new(0));
    let log = Logger::new(CountingSink {
        records: records.clone(),
    });
    log.set_filter(Some(Level::Info), 0);

    for _ in 0..100 {
        log.debug(TAG_NONE).write("rejected");
        log.info(TAG_NONE).write("admitted");
    }

    assert_eq!(records.load(Ordering::SeqCst), 100);
}
