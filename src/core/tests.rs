use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time;

use crate::{
    AdmissionError, AsyncError, ErrorHandler, HandledError, Logger, Phase, RecoveredPanic,
};

const WAIT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct Recorder {
    errs: Mutex<Vec<HandledError>>,
}

impl Recorder {
    fn len(&self) -> usize {
        self.errs.lock().len()
    }

    fn messages(&self) -> Vec<String> {
        self.errs
            .lock()
            .iter()
            .map(|e| e.original().to_string())
            .collect()
    }
}

#[async_trait]
impl ErrorHandler for Recorder {
    async fn handle_error(&self, err: HandledError) {
        self.errs.lock().push(err);
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

#[derive(Default)]
struct RecordingLogger {
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn info(&self, msg: &str) {
        self.infos.lock().push(msg.to_string());
    }

    fn error(&self, err: &(dyn Error + 'static), msg: &str) {
        self.errors.lock().push(format!("{msg}: {err}"));
    }
}

struct Panicking;

#[async_trait]
impl ErrorHandler for Panicking {
    async fn handle_error(&self, _err: HandledError) {
        panic!("handler exploded");
    }
}

#[derive(Debug, thiserror::Error)]
#[error("[test base]")]
struct TestBase;

#[derive(Debug, thiserror::Error)]
#[error("original {0}")]
struct TestOriginal(u32);

fn with_recorder(capacity: usize) -> (Arc<AsyncError>, Arc<Recorder>) {
    let rec = Arc::new(Recorder::default());
    let aerr = AsyncError::builder()
        .with_handler(rec.clone())
        .with_queue_capacity(capacity)
        .build();
    (aerr, rec)
}

async fn eventually(cond: impl Fn() -> bool) {
    time::timeout(WAIT, async {
        while !cond() {
            time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

async fn explode() {
    panic!("test panic in go wrapper")
}

#[tokio::test]
async fn test_add_is_handled_in_order_before_close_returns() {
    let (aerr, rec) = with_recorder(10);
    aerr.start_handle().unwrap();

    for i in 0..5 {
        aerr.add(format!("err {i}")).await.unwrap();
    }
    time::timeout(WAIT, aerr.close()).await.unwrap();

    assert_eq!(
        rec.messages(),
        vec!["err 0", "err 1", "err 2", "err 3", "err 4"]
    );
    assert_eq!(aerr.pending(), 0);
}

#[tokio::test]
async fn test_closed_rejects_admission() {
    let (aerr, rec) = with_recorder(10);
    aerr.start_handle().unwrap();
    aerr.add("before close").await.unwrap();
    aerr.close().await;
    assert_eq!(rec.len(), 1);

    assert_eq!(aerr.add("late").await, Err(AdmissionError::AddClosed));
    assert_eq!(aerr.add_async("late"), Err(AdmissionError::AddAsyncClosed));
    assert_eq!(aerr.start_handle(), Err(AdmissionError::StartClosed));

    time::sleep(Duration::from_millis(10)).await;
    assert_eq!(rec.len(), 1);
    assert_eq!(aerr.pending(), 0);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let logger = Arc::new(RecordingLogger::default());
    let aerr = AsyncError::builder().with_logger(logger.clone()).build();
    aerr.start_handle().unwrap();

    aerr.close().await;
    aerr.close().await;

    assert!(aerr.is_closed());
    assert!(!aerr.is_running());
    assert_eq!(aerr.phase(), Phase::Closed);
    let closes = logger
        .infos
        .lock()
        .iter()
        .filter(|m| m.as_str() == "aerrors: closed")
        .count();
    assert_eq!(closes, 1);
}

#[tokio::test]
async fn test_double_start_spawns_one_loop() {
    let logger = Arc::new(RecordingLogger::default());
    let rec = Arc::new(Recorder::default());
    let aerr = AsyncError::builder()
        .with_handler(rec.clone())
        .with_logger(logger.clone())
        .build();

    aerr.start_handle().unwrap();
    aerr.start_handle().unwrap();
    aerr.add("single").await.unwrap();
    aerr.close().await;

    assert_eq!(rec.len(), 1);
    let starts = logger
        .infos
        .lock()
        .iter()
        .filter(|m| m.as_str() == "aerrors: start")
        .count();
    assert_eq!(starts, 1);
}

#[tokio::test]
async fn test_go_panic_becomes_one_handled_error() {
    let (aerr, rec) = with_recorder(10);
    aerr.start_handle().unwrap();

    aerr.go(explode()).await.unwrap();
    aerr.go(async {}).await.unwrap();
    aerr.close().await;

    assert_eq!(rec.len(), 1);
    let errs = rec.errs.lock();
    let recovered = errs[0].find::<RecoveredPanic>().expect("recovered panic");
    assert_eq!(recovered.payload, "test panic in go wrapper");
    assert!(errs[0].to_string().contains("test panic in go wrapper"));
}

#[tokio::test]
async fn test_go_blocking_panic_is_queued() {
    let (aerr, rec) = with_recorder(10);
    aerr.start_handle().unwrap();

    aerr.go_blocking(|| panic!("blocking boom")).await.unwrap();
    eventually(|| rec.len() == 1).await;
    aerr.close().await;

    assert!(rec.messages()[0].contains("blocking boom"));
}

#[tokio::test]
async fn test_recover_on_closed_instance_is_dropped() {
    let (aerr, rec) = with_recorder(10);
    aerr.close().await;

    aerr.recover(Box::new("too late"));

    assert_eq!(aerr.pending(), 0);
    assert_eq!(rec.len(), 0);
}

#[tokio::test]
async fn test_base_error_chain() {
    let rec = Arc::new(Recorder::default());
    let aerr = AsyncError::builder()
        .with_handler(rec.clone())
        .with_base_error(TestBase)
        .build();
    aerr.start_handle().unwrap();

    aerr.add(TestOriginal(7)).await.unwrap();
    aerr.close().await;

    let errs = rec.errs.lock();
    assert_eq!(errs.len(), 1);
    assert!(errs[0].is::<TestBase>());
    assert_eq!(errs[0].find::<TestOriginal>().map(|o| o.0), Some(7));

    let original = errs[0].source().expect("original link");
    assert_eq!(original.downcast_ref::<TestOriginal>().map(|o| o.0), Some(7));
    assert!(errs[0].base().is_some());
    assert_eq!(errs[0].to_string(), "handle error: [test base]: original 7");
}

#[tokio::test]
async fn test_add_suspends_on_full_queue_until_start() {
    let (aerr, rec) = with_recorder(1);
    aerr.add("first").await.unwrap();

    let blocked = tokio::spawn({
        let aerr = Arc::clone(&aerr);
        async move { aerr.add("second").await }
    });
    time::sleep(Duration::from_millis(20)).await;
    assert!(!blocked.is_finished());
    assert_eq!(aerr.queued(), 1);
    assert_eq!(aerr.pending(), 2);

    aerr.start_handle().unwrap();
    time::timeout(WAIT, blocked).await.unwrap().unwrap().unwrap();
    time::timeout(WAIT, aerr.close()).await.unwrap();

    assert_eq!(rec.messages(), vec!["first", "second"]);
}

#[tokio::test]
async fn test_cancelled_add_withdraws_admission() {
    let (aerr, rec) = with_recorder(1);
    aerr.add("kept").await.unwrap();

    let res = time::timeout(Duration::from_millis(10), aerr.add("abandoned")).await;
    assert!(res.is_err());
    assert_eq!(aerr.pending(), 1);

    aerr.start_handle().unwrap();
    time::timeout(WAIT, aerr.close()).await.unwrap();

    assert_eq!(rec.messages(), vec!["kept"]);
    assert_eq!(aerr.pending(), 0);
}

#[tokio::test]
async fn test_each_producer_is_handled_in_add_order() {
    let (aerr, rec) = with_recorder(2);
    aerr.start_handle().unwrap();

    let mut producers = Vec::new();
    for p in 0..4u32 {
        let aerr = Arc::clone(&aerr);
        producers.push(tokio::spawn(async move {
            for i in 0..20 {
                aerr.add(TestOriginal(p * 100 + i)).await.unwrap();
            }
        }));
    }
    for h in producers {
        h.await.unwrap();
    }
    time::timeout(WAIT, aerr.close()).await.unwrap();

    let values: Vec<u32> = rec
        .errs
        .lock()
        .iter()
        .filter_map(|e| e.find::<TestOriginal>().map(|o| o.0))
        .collect();
    assert_eq!(values.len(), 80);
    for p in 0..4u32 {
        let own: Vec<u32> = values.iter().copied().filter(|v| v / 100 == p).collect();
        let expected: Vec<u32> = (0..20).map(|i| p * 100 + i).collect();
        assert_eq!(own, expected, "producer {p} out of order");
    }
}

#[tokio::test]
async fn test_overflow_with_async_adds() {
    let (aerr, rec) = with_recorder(2);

    aerr.add("1").await.unwrap();
    aerr.add("2").await.unwrap();
    aerr.add_async("3").unwrap();
    aerr.add_async("4").unwrap();
    aerr.add_async("5").unwrap();

    time::sleep(Duration::from_millis(5)).await;
    assert_eq!(aerr.queued(), 2);
    assert_eq!(aerr.pending(), 5);
    assert_eq!(rec.len(), 0);

    aerr.start_handle().unwrap();
    eventually(|| rec.len() == 5).await;

    let mut msgs = rec.messages();
    msgs.sort();
    assert_eq!(msgs, vec!["1", "2", "3", "4", "5"]);
    aerr.close().await;
}

#[tokio::test]
async fn test_close_while_running_drains_admitted() {
    let (aerr, rec) = with_recorder(2);

    aerr.add("1").await.unwrap();
    aerr.add("2").await.unwrap();
    aerr.add_async("3").unwrap();
    aerr.add_async("4").unwrap();

    aerr.start_handle().unwrap();
    time::timeout(WAIT, aerr.close()).await.unwrap();

    assert_eq!(rec.len(), 4);
    assert!(!aerr.is_running());
    assert!(aerr.is_closed());
}

#[tokio::test]
async fn test_stop_leaves_errors_queued_until_restart() {
    let (aerr, rec) = with_recorder(10);
    aerr.start_handle().unwrap();
    aerr.stop();
    assert_eq!(aerr.phase(), Phase::Stopped);

    aerr.add("a").await.unwrap();
    aerr.add("b").await.unwrap();
    time::sleep(Duration::from_millis(10)).await;
    assert_eq!(rec.len(), 0);
    assert_eq!(aerr.queued(), 2);

    aerr.start_handle().unwrap();
    eventually(|| rec.len() == 2).await;
    assert_eq!(rec.messages(), vec!["a", "b"]);
    aerr.close().await;
}

#[tokio::test]
async fn test_stop_when_idle_is_noop() {
    let (aerr, _rec) = with_recorder(10);
    aerr.stop();
    assert_eq!(aerr.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_close_without_start_drops_buffered() {
    let (aerr, rec) = with_recorder(1);

    aerr.add("buffered").await.unwrap();
    aerr.add_async("parked").unwrap();

    time::timeout(WAIT, aerr.close()).await.unwrap();
    time::sleep(Duration::from_millis(5)).await;

    assert_eq!(rec.len(), 0);
    assert_eq!(aerr.queued(), 0);
}

#[tokio::test]
async fn test_fallback_to_logger_without_handler() {
    let logger = Arc::new(RecordingLogger::default());
    let aerr = AsyncError::builder()
        .with_logger(logger.clone())
        .with_base_error(TestBase)
        .build();
    aerr.start_handle().unwrap();

    aerr.add("no handler").await.unwrap();
    aerr.close().await;

    let errors = logger.errors.lock();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0],
        "aerrors: handled error: handle error: [test base]: no handler"
    );
    assert!(logger.infos.lock().contains(&"aerrors: stop".to_string()));
}

#[tokio::test]
async fn test_handler_panic_is_logged_and_drained() {
    let logger = Arc::new(RecordingLogger::default());
    let aerr = AsyncError::builder()
        .with_handler(Arc::new(Panicking))
        .with_logger(logger.clone())
        .build();
    aerr.start_handle().unwrap();

    aerr.add("x").await.unwrap();
    time::timeout(WAIT, aerr.close()).await.unwrap();

    let errors = logger.errors.lock();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("handler exploded"));
    assert_eq!(aerr.pending(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_all_handled() {
    let (aerr, rec) = with_recorder(4);
    aerr.start_handle().unwrap();

    let mut producers = Vec::new();
    for p in 0..8 {
        let aerr = Arc::clone(&aerr);
        producers.push(tokio::spawn(async move {
            for i in 0..25 {
                aerr.add(TestOriginal(p * 100 + i)).await.unwrap();
            }
        }));
    }
    for h in producers {
        h.await.unwrap();
    }
    time::timeout(WAIT, aerr.close()).await.unwrap();

    assert_eq!(rec.len(), 200);
}

#[tokio::test]
async fn test_capacity_is_clamped() {
    let aerr = AsyncError::builder().with_queue_capacity(0).build();
    assert_eq!(aerr.capacity(), 1);
    assert_eq!(AsyncError::new().capacity(), 10);
}
