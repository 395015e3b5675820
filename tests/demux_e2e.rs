mod support;

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::bounded;

use icinga_events::{
    Category, ConfigError, Demux, DemuxConfig, FeedError, ProtocolError, State, StateChange,
    Termination, TransportError, UsageError,
};

use support::{drain, feed, line, pipe};

#[test]
fn interleaved_feed_splits_per_category_in_order() {
    let lines = vec![
        line("StateChange", 1),
        line("StateChange", 2),
        line("CheckResult", 1),
        line("StateChange", 3),
        line("CheckResult", 2),
    ];
    let demux = Demux::new(feed(&lines), [Category::StateChange, Category::CheckResult]).unwrap();

    let states = drain(demux.reader(Category::StateChange).unwrap());
    let checks = drain(demux.reader(Category::CheckResult).unwrap());
    let states = states.join().unwrap();
    let checks = checks.join().unwrap();

    assert_eq!(
        states.lines(),
        vec![lines[0].clone(), lines[1].clone(), lines[3].clone()]
    );
    assert_eq!(checks.lines(), vec![lines[2].clone(), lines[4].clone()]);
    assert!(states.end.is_ok());
    assert!(checks.end.is_ok());
    assert_eq!(demux.termination(), Some(Termination::EndOfFeed));
}

#[test]
fn every_category_receives_exact_subsequence() {
    // Deterministic pseudo-random interleaving over all ten categories.
    let mut seed: u64 = 0x5eed_1234;
    let mut lines = Vec::new();
    let mut expected: Vec<Vec<String>> = vec![Vec::new(); Category::COUNT];
    for n in 0..300 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
        let category = Category::ALL[usize::try_from(seed >> 33).unwrap() % Category::COUNT];
        let l = line(category.as_str(), n);
        expected[category.index()].push(l.clone());
        lines.push(l);
    }

    let demux = Demux::new(feed(&lines), Category::ALL).unwrap();
    let handles: Vec<_> = Category::ALL
        .iter()
        .map(|c| drain(demux.reader(*c).unwrap()))
        .collect();

    for handle in handles {
        let drained = handle.join().unwrap();
        assert!(drained.end.is_ok());
        assert!(drained.records.iter().all(|r| r.category() == drained.category));
        assert_eq!(drained.lines(), expected[drained.category.index()]);
    }
}

#[test]
fn unsubscribed_category_fails_every_reader_identically() {
    let lines = vec![
        line("StateChange", 1),
        line("Notification", 2),
        line("StateChange", 3),
    ];
    let demux = Demux::new(feed(&lines), [Category::StateChange, Category::CheckResult]).unwrap();

    let states = drain(demux.reader(Category::StateChange).unwrap()).join().unwrap();
    let checks = drain(demux.reader(Category::CheckResult).unwrap()).join().unwrap();

    let expected = FeedError::from(ProtocolError::UnregisteredCategory {
        name: "Notification".to_string(),
    });
    assert_eq!(states.lines(), vec![lines[0].clone()]);
    assert_eq!(states.end, Err(expected.clone()));
    assert!(checks.records.is_empty());
    assert_eq!(checks.end, Err(expected.clone()));
    assert_eq!(demux.termination(), Some(Termination::Failed(expected)));
}

#[test]
fn unknown_type_name_fails_every_reader() {
    let lines = vec!["{\"type\":\"ObjectModified\"}\n".to_string()];
    let demux = Demux::new(feed(&lines), Category::ALL).unwrap();

    let ends: Vec<_> = Category::ALL
        .iter()
        .map(|c| drain(demux.reader(*c).unwrap()))
        .map(|h| h.join().unwrap().end)
        .collect();

    let expected = FeedError::from(ProtocolError::UnregisteredCategory {
        name: "ObjectModified".to_string(),
    });
    assert!(ends.iter().all(|end| *end == Err(expected.clone())));
}

#[test]
fn malformed_line_fails_every_reader() {
    for bad in ["this is not json\n", "{\"host\":\"no type\"}\n", "{\"type\":\"CheckRes"] {
        let lines = vec![line("CheckResult", 1), bad.to_string()];
        let demux =
            Demux::new(feed(&lines), [Category::CheckResult, Category::DowntimeAdded]).unwrap();

        let checks = drain(demux.reader(Category::CheckResult).unwrap()).join().unwrap();
        let downtimes = drain(demux.reader(Category::DowntimeAdded).unwrap()).join().unwrap();

        assert_eq!(checks.records.len(), 1, "{bad}");
        let err = checks.end.unwrap_err();
        assert!(
            matches!(err, FeedError::Protocol(ProtocolError::MalformedRecord { .. })),
            "{bad}: {err}"
        );
        assert_eq!(downtimes.end, Err(err));
    }
}

#[test]
fn source_read_error_fails_every_reader() {
    let (tx, source) = pipe();
    let demux = Demux::new(source, [Category::StateChange, Category::CheckResult]).unwrap();
    let states = drain(demux.reader(Category::StateChange).unwrap());
    let checks = drain(demux.reader(Category::CheckResult).unwrap());

    tx.send(Ok(line("StateChange", 1).into_bytes())).unwrap();
    tx.send(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")))
        .unwrap();

    let states = states.join().unwrap();
    let checks = checks.join().unwrap();
    assert_eq!(states.records.len(), 1);

    let err = states.end.unwrap_err();
    assert!(matches!(
        err,
        FeedError::Transport(TransportError::Read {
            kind: io::ErrorKind::ConnectionReset,
            ..
        })
    ));
    assert_eq!(checks.end, Err(err));
}

#[test]
fn close_ends_every_reader_cleanly_while_upstream_open() {
    let (tx, source) = pipe();
    let demux = Demux::new(source, [Category::StateChange, Category::CheckResult]).unwrap();
    let mut states = demux.reader(Category::StateChange).unwrap();
    let mut checks = demux.reader(Category::CheckResult).unwrap();

    tx.send(Ok(line("StateChange", 1).into_bytes())).unwrap();
    assert!(states.recv().unwrap().is_some());

    assert!(demux.close());
    assert_eq!(states.recv(), Ok(None));
    assert_eq!(checks.recv(), Ok(None));
    assert_eq!(demux.termination(), Some(Termination::Closed));

    // Upstream is still open; ending it lets the router exit.
    drop(tx);
    demux.join().unwrap();
}

#[test]
fn close_is_idempotent() {
    let (_tx, source) = pipe();
    let demux = Demux::new(source, [Category::CommentAdded]).unwrap();
    assert!(demux.close());
    assert!(!demux.close());
    assert!(demux.is_closed());
    assert_eq!(demux.termination(), Some(Termination::Closed));
}

#[test]
fn concurrent_close_and_failure_agree() {
    for _ in 0..20 {
        let lines = vec![line("StateChange", 1), "garbage\n".to_string()];
        let demux = Arc::new(
            Demux::new(feed(&lines), [Category::StateChange, Category::CheckResult]).unwrap(),
        );
        let states = drain(demux.reader(Category::StateChange).unwrap());
        let checks = drain(demux.reader(Category::CheckResult).unwrap());

        let closers: Vec<_> = (0..4)
            .map(|_| {
                let demux = Arc::clone(&demux);
                thread::spawn(move || demux.close())
            })
            .collect();
        let winners = closers
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert!(winners <= 1);

        let states = states.join().unwrap();
        let checks = checks.join().unwrap();
        assert_eq!(states.end, checks.end);

        let termination = demux.termination().unwrap();
        assert_eq!(states.end.err(), termination.error().cloned());
    }
}

#[test]
fn reader_for_unrequested_category_is_usage_error() {
    let (tx, source) = pipe();
    let demux = Demux::new(source, [Category::StateChange]).unwrap();

    let expected = FeedError::from(UsageError::UnregisteredCategory {
        category: Category::Notification,
    });
    assert_eq!(demux.reader(Category::Notification).unwrap_err(), expected);

    // Local failure: the requested stream keeps working.
    let mut states = demux.reader(Category::StateChange).unwrap();
    tx.send(Ok(line("StateChange", 7).into_bytes())).unwrap();
    assert!(states.recv().unwrap().is_some());

    demux.close();
    assert_eq!(demux.reader(Category::Notification).unwrap_err(), expected);
}

#[test]
fn reader_after_termination_observes_outcome() {
    let lines = vec!["{\"type\":\"Bogus\"}\n".to_string()];
    let demux = Demux::new(feed(&lines), [Category::StateChange]).unwrap();
    let first = drain(demux.reader(Category::StateChange).unwrap()).join().unwrap();
    assert!(first.end.is_err());

    let mut late = demux.reader(Category::StateChange).unwrap();
    assert_eq!(late.recv().map(|r| r.is_none()), Err(first.end.clone().unwrap_err()));
    assert_eq!(late.recv(), Ok(None));

    let clean = Demux::new(feed(&[]), [Category::StateChange]).unwrap();
    drain(clean.reader(Category::StateChange).unwrap()).join().unwrap();
    assert_eq!(clean.reader(Category::StateChange).unwrap().recv(), Ok(None));
}

#[test]
fn idle_reader_stalls_other_categories() {
    let lines = vec![line("CheckResult", 1), line("StateChange", 2)];
    let demux = Demux::new(feed(&lines), [Category::StateChange, Category::CheckResult]).unwrap();
    let mut checks = demux.reader(Category::CheckResult).unwrap();
    let mut states = demux.reader(Category::StateChange).unwrap();

    let (got_tx, got_rx) = bounded(1);
    let state_reader = thread::spawn(move || {
        let record = states.recv().unwrap();
        got_tx.send(record.is_some()).unwrap();
    });

    // The router is parked on the CheckResult handoff.
    assert!(got_rx.recv_timeout(Duration::from_millis(150)).is_err());

    assert!(checks.recv().unwrap().is_some());
    assert_eq!(got_rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    state_reader.join().unwrap();
}

#[test]
fn readers_work_with_serde_stream_decoding() {
    let lines = vec![
        "{\"type\":\"StateChange\",\"timestamp\":1.0,\"host\":\"a\",\"state\":2.0,\"state_type\":1.0}\n"
            .to_string(),
        line("CheckResult", 1),
        "{\"type\":\"StateChange\",\"timestamp\":2.0,\"host\":\"b\",\"state\":0.0,\"state_type\":1.0}\n"
            .to_string(),
    ];
    let demux = Demux::new(feed(&lines), [Category::StateChange, Category::CheckResult]).unwrap();
    let checks = drain(demux.reader(Category::CheckResult).unwrap());
    let states = demux.reader(Category::StateChange).unwrap();

    let decoded: Vec<StateChange> = serde_json::Deserializer::from_reader(states)
        .into_iter::<StateChange>()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].host, "a");
    assert_eq!(decoded[0].state, State::Critical);
    assert_eq!(decoded[1].state, State::Ok);
    assert_eq!(checks.join().unwrap().records.len(), 1);
}

#[test]
fn construction_returns_without_feed_activity() {
    let (_tx, source) = pipe();
    let demux = Demux::new(source, [Category::DowntimeTriggered]).unwrap();
    assert!(!demux.is_closed());
    assert_eq!(demux.categories(), vec![Category::DowntimeTriggered]);
}

#[test]
fn invalid_construction_is_config_error() {
    let err = Demux::new(feed(&[]), Vec::<Category>::new()).unwrap_err();
    assert_eq!(err, FeedError::Config(ConfigError::NoCategories));

    let err = Demux::with_config(
        feed(&[]),
        [Category::CheckResult],
        DemuxConfig {
            max_record_bytes: 0,
            ..DemuxConfig::default()
        },
    )
    .unwrap_err();
    assert_eq!(err, FeedError::Config(ConfigError::ZeroRecordLimit));
}

#[test]
fn oversized_record_fails_every_reader() {
    let lines = vec![
        line("CheckResult", 1),
        format!("{{\"type\":\"CheckResult\",\"pad\":\"{}\"}}\n", "x".repeat(512)),
    ];
    let demux = Demux::with_config(
        feed(&lines),
        [Category::CheckResult, Category::StateChange],
        DemuxConfig {
            max_record_bytes: 256,
            ..DemuxConfig::default()
        },
    )
    .unwrap();

    let checks = drain(demux.reader(Category::CheckResult).unwrap()).join().unwrap();
    let states = drain(demux.reader(Category::StateChange).unwrap()).join().unwrap();
    let expected = FeedError::from(ProtocolError::RecordTooLong { limit: 256 });
    assert_eq!(checks.records.len(), 1);
    assert_eq!(checks.end, Err(expected.clone()));
    assert_eq!(states.end, Err(expected));
}
