use std::time::{Duration, Instant};

use memkv::{CommandError, EngineConfig, Missing, Reply};
use tokio::time::sleep;

use crate::test_utils::{TestEnv, TestUtils};

async fn add_order(env: &TestEnv, item: &str) -> String {
    let Ok(Reply::BulkString(id)) = env.exec("XADD", &["orders", "*", "item", item]).await else {
        panic!("XADD did not return an ID");
    };

    id
}

fn parse_id(id: &str) -> (u64, u64) {
    let (ms, seq) = id.split_once('-').unwrap();
    (ms.parse().unwrap(), seq.parse().unwrap())
}

#[tokio::test]
async fn test_auto_generated_ids_are_strictly_increasing() {
    let env = TestEnv::new();
    let mut previous: Option<(u64, u64)> = None;

    for i in 0..10 {
        if i == 5 {
            env.advance(3);
        }

        let id = parse_id(&add_order(&env, &format!("item-{}", i)).await);
        if let Some(previous) = previous {
            assert!(id > previous, "{:?} should follow {:?}", id, previous);
        }
        previous = Some(id);
    }

    env.exec_ok("XLEN", &["orders"], TestUtils::integer(10)).await;
    env.exec_ok("TYPE", &["orders"], Reply::SimpleString("stream".to_string()))
        .await;
}

#[tokio::test]
async fn test_handle_xadd_and_xrange_commands() {
    let env = TestEnv::new();

    for (id, item) in [("1-1", "book"), ("1-2", "pen"), ("2-*", "ink")] {
        env.exec("XADD", &["orders", id, "item", item]).await.unwrap();
    }

    let test_cases = vec![
        (
            ("-", "+"),
            vec![
                TestUtils::stream_entry("1-1", &["item", "book"]),
                TestUtils::stream_entry("1-2", &["item", "pen"]),
                TestUtils::stream_entry("2-0", &["item", "ink"]),
            ],
        ),
        (
            ("1-2", "2"),
            vec![
                TestUtils::stream_entry("1-2", &["item", "pen"]),
                TestUtils::stream_entry("2-0", &["item", "ink"]),
            ],
        ),
        (("3", "+"), vec![]),
    ];

    for ((start, end), expected) in test_cases {
        env.exec_ok("XRANGE", &["orders", start, end], Reply::Array(expected))
            .await;
    }

    env.exec_ok(
        "XRANGE",
        &["orders", "-", "+", "COUNT", "1"],
        Reply::Array(vec![TestUtils::stream_entry("1-1", &["item", "book"])]),
    )
    .await;

    let Err(CommandError::InvalidArgument(reason)) =
        env.exec("XADD", &["orders", "1-5", "item", "late"]).await
    else {
        panic!("expected an invalid ID error");
    };
    assert!(reason.contains("equal or smaller"), "unexpected reason: {}", reason);

    env.exec_err(
        "XADD",
        &["orders", "0-0", "item", "zero"],
        CommandError::invalid_argument("The ID specified in XADD must be greater than 0-0"),
    )
    .await;
    env.exec_ok("XLEN", &["orders"], TestUtils::integer(3)).await;
}

#[tokio::test]
async fn test_handle_xread_command() {
    let env = TestEnv::new();

    env.exec("XADD", &["orders", "1-1", "item", "book"]).await.unwrap();
    env.exec("XADD", &["orders", "1-2", "item", "pen"]).await.unwrap();
    env.exec("XADD", &["refunds", "5-0", "item", "mug"]).await.unwrap();

    env.exec_ok(
        "XREAD",
        &["STREAMS", "orders", "refunds", "1-1", "0"],
        Reply::Array(vec![
            Reply::Array(vec![
                TestUtils::bulk("orders"),
                Reply::Array(vec![TestUtils::stream_entry("1-2", &["item", "pen"])]),
            ]),
            Reply::Array(vec![
                TestUtils::bulk("refunds"),
                Reply::Array(vec![TestUtils::stream_entry("5-0", &["item", "mug"])]),
            ]),
        ]),
    )
    .await;

    env.exec_ok("XREAD", &["STREAMS", "orders", "1-2"], Reply::Null)
        .await;
    env.exec_ok("XREAD", &["STREAMS", "orders", "$"], Reply::Null)
        .await;
    env.exec_ok(
        "XREAD",
        &["COUNT", "1", "STREAMS", "orders", "0"],
        TestUtils::stream_read(
            "orders",
            vec![TestUtils::stream_entry("1-1", &["item", "book"])],
        ),
    )
    .await;
}

#[tokio::test]
async fn test_consumer_group_delivery() {
    let env = TestEnv::new();

    let first = add_order(&env, "book").await;
    let second = add_order(&env, "pen").await;
    let third = add_order(&env, "ink").await;

    env.exec_ok("XGROUP", &["CREATE", "orders", "shipping", "0"], Reply::Ok)
        .await;
    env.exec_err(
        "XGROUP",
        &["CREATE", "orders", "shipping", "0"],
        CommandError::GroupAlreadyExists,
    )
    .await;

    env.exec_ok(
        "XREADGROUP",
        &["GROUP", "shipping", "alice", "COUNT", "2", "STREAMS", "orders", ">"],
        TestUtils::stream_read(
            "orders",
            vec![
                TestUtils::stream_entry(&first, &["item", "book"]),
                TestUtils::stream_entry(&second, &["item", "pen"]),
            ],
        ),
    )
    .await;

    // Entries already claimed by alice are not handed to bob.
    env.exec_ok(
        "XREADGROUP",
        &["GROUP", "shipping", "bob", "STREAMS", "orders", ">"],
        TestUtils::stream_read("orders", vec![TestUtils::stream_entry(&third, &["item", "ink"])]),
    )
    .await;
    env.exec_ok(
        "XREADGROUP",
        &["GROUP", "shipping", "alice", "STREAMS", "orders", ">"],
        Reply::Null,
    )
    .await;

    env.exec_ok(
        "XPENDING",
        &["orders", "shipping"],
        Reply::Array(vec![
            TestUtils::integer(3),
            TestUtils::bulk(&first),
            TestUtils::bulk(&third),
            Reply::Array(vec![
                TestUtils::bulk_array(&["alice", "2"]),
                TestUtils::bulk_array(&["bob", "1"]),
            ]),
        ]),
    )
    .await;

    env.exec_ok(
        "XACK",
        &["orders", "shipping", first.as_str(), "9-9"],
        TestUtils::integer(1),
    )
    .await;

    // An explicit ID re-reads the consumer's own pending history.
    env.exec_ok(
        "XREADGROUP",
        &["GROUP", "shipping", "alice", "STREAMS", "orders", "0"],
        TestUtils::stream_read("orders", vec![TestUtils::stream_entry(&second, &["item", "pen"])]),
    )
    .await;

    env.exec_ok(
        "XACK",
        &["orders", "shipping", second.as_str(), third.as_str()],
        TestUtils::integer(2),
    )
    .await;
    env.exec_ok(
        "XPENDING",
        &["orders", "shipping"],
        Reply::Array(vec![
            TestUtils::integer(0),
            Reply::Null,
            Reply::Null,
            Reply::Null,
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_consumer_group_errors() {
    let env = TestEnv::new();

    let Err(CommandError::KeyNotFound(Missing::Key(reason))) =
        env.exec("XGROUP", &["CREATE", "orders", "shipping", "$"]).await
    else {
        panic!("expected a missing key error");
    };
    assert!(reason.contains("MKSTREAM"));

    env.exec_ok(
        "XGROUP",
        &["CREATE", "orders", "shipping", "$", "MKSTREAM"],
        Reply::Ok,
    )
    .await;
    env.exec_ok("XLEN", &["orders"], TestUtils::integer(0)).await;

    let Err(error) = env
        .exec(
            "XREADGROUP",
            &["GROUP", "billing", "alice", "STREAMS", "orders", ">"],
        )
        .await
    else {
        panic!("expected a missing group error");
    };
    assert!(error.as_string().starts_with("NOGROUP"), "{}", error.as_string());

    env.exec_err(
        "XGROUP",
        &["DELCONSUMER", "orders", "billing", "alice"],
        CommandError::no_such_group("orders", "billing", "XGROUP DELCONSUMER"),
    )
    .await;

    env.exec_ok(
        "XGROUP",
        &["CREATECONSUMER", "orders", "shipping", "alice"],
        TestUtils::integer(1),
    )
    .await;
    env.exec_ok(
        "XGROUP",
        &["DESTROY", "orders", "shipping"],
        TestUtils::integer(1),
    )
    .await;
    env.exec_ok("XACK", &["orders", "shipping", "1-1"], TestUtils::integer(0))
        .await;
}

#[tokio::test]
async fn test_failed_xreadgroup_delivers_nothing() {
    let env = TestEnv::new();

    env.exec("XADD", &["invoices", "1-0", "item", "book"]).await.unwrap();
    env.exec("XADD", &["refunds", "1-0", "item", "mug"]).await.unwrap();
    env.exec_ok("XGROUP", &["CREATE", "invoices", "billing", "0"], Reply::Ok)
        .await;

    // The second key either lacks the group or does not exist at all.
    for second_key in ["refunds", "missing"] {
        env.exec_err(
            "XREADGROUP",
            &["GROUP", "billing", "alice", "STREAMS", "invoices", second_key, ">", ">"],
            CommandError::no_such_group(second_key, "billing", "XREADGROUP with GROUP option"),
        )
        .await;
    }

    // Nothing was claimed, so the entry is still waiting for the group.
    env.exec_ok(
        "XPENDING",
        &["invoices", "billing"],
        Reply::Array(vec![
            TestUtils::integer(0),
            Reply::Null,
            Reply::Null,
            Reply::Null,
        ]),
    )
    .await;
    env.exec_ok(
        "XREADGROUP",
        &["GROUP", "billing", "alice", "STREAMS", "invoices", ">"],
        TestUtils::stream_read("invoices", vec![TestUtils::stream_entry("1-0", &["item", "book"])]),
    )
    .await;
}

#[tokio::test]
async fn test_blocking_xread_wakes_on_xadd() {
    let env = TestEnv::new();
    env.exec("XADD", &["orders", "1-1", "item", "book"]).await.unwrap();

    let reader = {
        let engine = env.engine.clone();
        tokio::spawn(async move {
            engine
                .execute("XREAD", ["BLOCK", "5000", "STREAMS", "orders", "1-1"])
                .await
        })
    };

    sleep(Duration::from_millis(50)).await;
    env.exec("XADD", &["orders", "1-2", "item", "pen"]).await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(2), reader)
        .await
        .expect("blocked reader was not woken")
        .unwrap();

    assert_eq!(
        result,
        Ok(TestUtils::stream_read(
            "orders",
            vec![TestUtils::stream_entry("1-2", &["item", "pen"])]
        ))
    );
}

#[tokio::test]
async fn test_blocking_xreadgroup_wakes_on_xadd() {
    let env = TestEnv::new();
    env.exec("XGROUP", &["CREATE", "orders", "shipping", "$", "MKSTREAM"])
        .await
        .unwrap();

    let reader = {
        let engine = env.engine.clone();
        tokio::spawn(async move {
            engine
                .execute(
                    "XREADGROUP",
                    [
                        "GROUP", "shipping", "alice", "BLOCK", "5000", "STREAMS", "orders", ">",
                    ],
                )
                .await
        })
    };

    sleep(Duration::from_millis(50)).await;
    env.exec("XADD", &["orders", "7-0", "item", "pen"]).await.unwrap();

    let result = tokio::time::timeout(Duration::from_secs(2), reader)
        .await
        .expect("blocked reader was not woken")
        .unwrap();

    assert_eq!(
        result,
        Ok(TestUtils::stream_read(
            "orders",
            vec![TestUtils::stream_entry("7-0", &["item", "pen"])]
        ))
    );
}

#[tokio::test]
async fn test_blocking_reads_time_out_with_null() {
    let env = TestEnv::with_config(EngineConfig {
        expiry_interval_ms: 0,
        max_block_ms: 150,
        ..EngineConfig::default()
    });

    let test_cases = vec![("100", 100), ("0", 150), ("60000", 150)];

    for (block_ms, expected_ms) in test_cases {
        let started = Instant::now();

        env.exec_ok(
            "XREAD",
            &["BLOCK", block_ms, "STREAMS", "orders", "$"],
            Reply::Null,
        )
        .await;

        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_millis(expected_ms - 10),
            "BLOCK {} returned after {:?}",
            block_ms,
            elapsed
        );
        assert!(elapsed < Duration::from_secs(5), "BLOCK {} took {:?}", block_ms, elapsed);
    }
}
