use std::time::Duration;

use memkv::{CommandError, Reply};
use tokio::time::sleep;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_pipeline_keys_expire_independently() {
    let env = TestEnv::new();

    let results = env
        .engine
        .pipeline(vec![
            TestUtils::command("SETEX", &["short", "1", "a"]),
            TestUtils::command("SETEX", &["long", "3", "b"]),
            TestUtils::command("GET", &["short"]),
        ])
        .await;

    assert_eq!(
        results,
        vec![Ok(Reply::Ok), Ok(Reply::Ok), Ok(TestUtils::bulk("a"))]
    );

    env.exec_ok("GET", &["long"], TestUtils::bulk("b")).await;

    env.advance(1_000);
    env.exec_ok("GET", &["short"], Reply::Null).await;
    env.exec_ok("GET", &["long"], TestUtils::bulk("b")).await;

    env.advance(2_000);
    env.exec_ok("GET", &["long"], Reply::Null).await;
}

#[tokio::test]
async fn test_pipeline_isolates_failures() {
    let env = TestEnv::new();

    let results = env
        .engine
        .pipeline(vec![
            TestUtils::command("RPUSH", &["queue", "a"]),
            TestUtils::command("LPOP", &["empty"]),
            TestUtils::command("NOPE", &[]),
            TestUtils::command("LPOP", &["queue"]),
            TestUtils::command("XREAD", &["BLOCK", "1000", "STREAMS", "orders", "0"]),
        ])
        .await;

    assert_eq!(
        results,
        vec![
            Ok(TestUtils::integer(1)),
            Err(CommandError::EmptyCollection),
            Err(CommandError::UnknownCommand("NOPE".to_string())),
            Ok(TestUtils::bulk("a")),
            Ok(Reply::Null),
        ]
    );
}

#[tokio::test]
async fn test_transaction_keys_expire_independently() {
    let env = TestEnv::new();

    let results = env
        .engine
        .transaction(vec![
            TestUtils::command("SETEX", &["short", "1", "a"]),
            TestUtils::command("SETEX", &["long", "3", "b"]),
        ])
        .await
        .unwrap();

    assert_eq!(results, vec![Ok(Reply::Ok), Ok(Reply::Ok)]);

    env.exec_ok("GET", &["short"], TestUtils::bulk("a")).await;
    env.exec_ok("GET", &["long"], TestUtils::bulk("b")).await;

    env.advance(1_500);
    env.exec_ok("GET", &["short"], Reply::Null).await;
    env.exec_ok("GET", &["long"], TestUtils::bulk("b")).await;

    env.advance(1_500);
    env.exec_ok("GET", &["long"], Reply::Null).await;
}

#[tokio::test]
async fn test_transaction_validation_aborts_everything() {
    let env = TestEnv::new();

    let result = env
        .engine
        .transaction(vec![
            TestUtils::command("SET", &["name", "Ican"]),
            TestUtils::command("GET", &[]),
        ])
        .await;

    assert_eq!(result, Err(CommandError::TransactionAborted));
    env.exec_ok("GET", &["name"], Reply::Null).await;
}

#[tokio::test]
async fn test_transaction_reports_runtime_errors_per_command() {
    let env = TestEnv::new();

    let results = env
        .engine
        .transaction(vec![
            TestUtils::command("SET", &["name", "Ican"]),
            TestUtils::command("LPOP", &["name"]),
            TestUtils::command("GET", &["name"]),
        ])
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![
            Ok(Reply::Ok),
            Err(CommandError::EmptyCollection),
            Ok(TestUtils::bulk("Ican")),
        ]
    );
}

#[tokio::test]
async fn test_session_multi_exec() {
    let env = TestEnv::new();
    let session = env.engine.session();

    let test_cases: Vec<(&str, &[&str], Result<Reply, CommandError>)> = vec![
        ("MULTI", &[], Ok(Reply::Ok)),
        ("MULTI", &[], Err(CommandError::NestedMulti)),
        (
            "SET",
            &["name", "Ican"],
            Ok(Reply::SimpleString("QUEUED".to_string())),
        ),
        (
            "RPUSH",
            &["name", "a"],
            Ok(Reply::SimpleString("QUEUED".to_string())),
        ),
        (
            "GET",
            &["name"],
            Ok(Reply::SimpleString("QUEUED".to_string())),
        ),
    ];

    for (name, arguments, expected) in test_cases {
        assert_eq!(
            session.execute(name, arguments.iter().copied()).await,
            expected,
            "executing {} {:?}",
            name,
            arguments
        );
    }

    // Nothing runs before EXEC.
    env.exec_ok("GET", &["name"], Reply::Null).await;

    assert_eq!(
        session.execute("EXEC", Vec::<String>::new()).await,
        Ok(Reply::Array(vec![
            Reply::Ok,
            TestUtils::integer(1),
            Reply::Null,
        ]))
    );

    assert_eq!(
        session.execute("EXEC", Vec::<String>::new()).await,
        Err(CommandError::ExecWithoutMulti)
    );
    assert_eq!(
        session.execute("GET", ["missing"]).await,
        Ok(Reply::Null)
    );
}

#[tokio::test]
async fn test_session_exec_renders_runtime_errors() {
    let env = TestEnv::new_strict();
    let session = env.engine.session();

    session.execute("MULTI", Vec::<String>::new()).await.unwrap();
    session.execute("SET", ["name", "Ican"]).await.unwrap();
    session.execute("LLEN", ["name"]).await.unwrap();

    assert_eq!(
        session.execute("EXEC", Vec::<String>::new()).await,
        Ok(Reply::Array(vec![
            Reply::Ok,
            Reply::Error(
                "WRONGTYPE operation against a key holding the wrong kind of value".to_string()
            ),
        ]))
    );
}

#[tokio::test]
async fn test_session_queue_error_aborts_exec() {
    let env = TestEnv::new();
    let session = env.engine.session();

    session.execute("MULTI", Vec::<String>::new()).await.unwrap();
    session.execute("SET", ["name", "Ican"]).await.unwrap();

    assert_eq!(
        session.execute("SET", ["name"]).await,
        Err(CommandError::WrongNumberOfArguments("set".to_string()))
    );
    assert_eq!(
        session.execute("EXEC", Vec::<String>::new()).await,
        Err(CommandError::TransactionAborted)
    );

    env.exec_ok("GET", &["name"], Reply::Null).await;
}

#[tokio::test]
async fn test_session_discard() {
    let env = TestEnv::new();
    let session = env.engine.session();
    let other = env.engine.session();

    assert_eq!(
        session.execute("DISCARD", Vec::<String>::new()).await,
        Err(CommandError::DiscardWithoutMulti)
    );

    session.execute("MULTI", Vec::<String>::new()).await.unwrap();
    session.execute("SET", ["name", "Ican"]).await.unwrap();

    // Another session is not affected by the open transaction.
    assert_eq!(other.execute("SET", ["name", "Budi"]).await, Ok(Reply::Ok));

    assert_eq!(
        session.execute("DISCARD", Vec::<String>::new()).await,
        Ok(Reply::Ok)
    );
    env.exec_ok("GET", &["name"], TestUtils::bulk("Budi")).await;

    env.exec_err(
        "MULTI",
        &[],
        CommandError::invalid_argument("MULTI is only available inside a session"),
    )
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_transaction_is_not_interleaved_with_other_writers() {
    let env = TestEnv::new();

    let writer = {
        let engine = env.engine.clone();
        tokio::spawn(async move {
            for i in 0..200 {
                engine
                    .execute("RPUSH", ["events", format!("outside-{}", i).as_str()])
                    .await
                    .unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    sleep(Duration::from_millis(1)).await;

    let commands = (0..100)
        .map(|i| TestUtils::command("RPUSH", &["events", format!("inside-{}", i).as_str()]))
        .collect::<Vec<_>>();
    let results = env.engine.transaction(commands).await.unwrap();
    assert!(results.iter().all(|result| result.is_ok()));

    writer.await.unwrap();

    let Ok(events) = env.exec("LRANGE", &["events", "0", "-1"]).await else {
        panic!("expected the list to exist");
    };
    let events = events.into_strings();
    assert_eq!(events.len(), 300);

    let first = events
        .iter()
        .position(|event| event.starts_with("inside-"))
        .unwrap();
    let expected = (0..100).map(|i| format!("inside-{}", i)).collect::<Vec<_>>();

    assert_eq!(
        events[first..first + 100],
        expected[..],
        "transaction elements were interleaved"
    );
}
