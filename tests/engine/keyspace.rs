use memkv::{CommandError, Reply};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_ping_and_echo_commands() {
    let env = TestEnv::new();

    env.exec_ok("PING", &[], Reply::SimpleString("PONG".to_string()))
        .await;
    env.exec_ok("ping", &["hello"], TestUtils::bulk("hello")).await;
    env.exec_ok("ECHO", &["hey there"], TestUtils::bulk("hey there"))
        .await;
    env.exec_err(
        "ECHO",
        &[],
        CommandError::WrongNumberOfArguments("echo".to_string()),
    )
    .await;
}

#[tokio::test]
async fn test_handle_set_and_get_commands() {
    let env = TestEnv::new();

    env.exec_ok("SET", &["name", "Ican"], Reply::Ok).await;
    env.exec_ok("GET", &["name"], TestUtils::bulk("Ican")).await;
    env.exec_ok("SET", &["name", "Budi"], Reply::Ok).await;
    env.exec_ok("GET", &["name"], TestUtils::bulk("Budi")).await;
    env.exec_ok("GET", &["missing"], Reply::Null).await;
}

#[tokio::test]
async fn test_key_is_visible_until_its_ttl_elapses() {
    let test_cases = vec![
        (0, Some("Ican")),
        (1, Some("Ican")),
        (1_499, Some("Ican")),
        (1_500, None),
        (10_000, None),
    ];

    for (elapsed, expected) in test_cases {
        let env = TestEnv::new();
        env.exec_ok("SET", &["name", "Ican", "PX", "1500"], Reply::Ok)
            .await;

        env.advance(elapsed);

        assert_eq!(
            env.exec("GET", &["name"]).await,
            Ok(Reply::from_optional(expected.map(|v| v.to_string()))),
            "reading after {} ms",
            elapsed
        );
    }
}

#[tokio::test]
async fn test_handle_expiry_commands() {
    let env = TestEnv::new();

    env.exec_ok("SETEX", &["session", "10", "abc"], Reply::Ok)
        .await;
    env.exec_ok("TTL", &["session"], TestUtils::integer(10)).await;
    env.exec_ok("PTTL", &["session"], TestUtils::integer(10_000))
        .await;

    env.advance(2_500);
    env.exec_ok("PTTL", &["session"], TestUtils::integer(7_500))
        .await;
    env.exec_ok("TTL", &["session"], TestUtils::integer(8)).await;

    env.exec_ok("PERSIST", &["session"], TestUtils::integer(1))
        .await;
    env.exec_ok("PERSIST", &["session"], TestUtils::integer(0))
        .await;
    env.exec_ok("TTL", &["session"], TestUtils::integer(-1)).await;

    env.exec_ok("EXPIRE", &["session", "1"], TestUtils::integer(1))
        .await;
    env.exec_ok("EXPIRE", &["missing", "1"], TestUtils::integer(0))
        .await;

    env.advance(1_000);
    env.exec_ok("TTL", &["session"], TestUtils::integer(-2)).await;
    env.exec_ok("GET", &["session"], Reply::Null).await;

    env.exec_ok("SET", &["name", "Ican", "EX", "5"], Reply::Ok)
        .await;
    env.exec_ok("SET", &["name", "Budi"], Reply::Ok).await;
    env.exec_ok("TTL", &["name"], TestUtils::integer(-1)).await;

    env.exec_err(
        "SET",
        &["name", "Ican", "PX", "0"],
        CommandError::invalid_argument("invalid expire time in 'set' command"),
    )
    .await;
}

#[tokio::test]
async fn test_huge_ttls_never_report_negative() {
    let env = TestEnv::new();
    env.exec_ok("SET", &["name", "Ican"], Reply::Ok).await;

    env.exec_err(
        "EXPIRE",
        &["name", "18000000000000000"],
        CommandError::invalid_argument("invalid expire time in 'expire' command"),
    )
    .await;
    env.exec_ok("TTL", &["name"], TestUtils::integer(-1)).await;

    env.exec_ok("SET", &["name", "Ican", "PX", "9223372036854775807"], Reply::Ok)
        .await;
    env.exec_ok("PTTL", &["name"], TestUtils::integer(i64::MAX))
        .await;
    env.exec_ok("TTL", &["name"], TestUtils::integer(i64::MAX / 1000 + 1))
        .await;
}

#[tokio::test]
async fn test_handle_keyspace_commands() {
    let env = TestEnv::new();

    env.exec_ok("SET", &["name", "Ican"], Reply::Ok).await;
    env.exec_ok("RPUSH", &["fruits", "mango"], TestUtils::integer(1))
        .await;
    env.exec_ok("SETEX", &["session", "1", "abc"], Reply::Ok).await;

    env.exec_ok("DBSIZE", &[], TestUtils::integer(3)).await;
    env.exec_ok(
        "EXISTS",
        &["name", "fruits", "missing", "name"],
        TestUtils::integer(3),
    )
    .await;

    env.advance(1_000);
    env.exec_ok("DBSIZE", &[], TestUtils::integer(2)).await;

    let test_cases = vec![
        ("name", "string"),
        ("fruits", "list"),
        ("session", "none"),
        ("missing", "none"),
    ];

    for (key, expected) in test_cases {
        env.exec_ok("TYPE", &[key], Reply::SimpleString(expected.to_string()))
            .await;
    }

    env.exec_ok("DEL", &["name", "missing"], TestUtils::integer(1))
        .await;
    env.exec_ok("FLUSHALL", &[], Reply::Ok).await;
    env.exec_ok("DBSIZE", &[], TestUtils::integer(0)).await;
}

#[tokio::test]
async fn test_command_errors() {
    let env = TestEnv::new();

    let test_cases: Vec<(&str, &[&str], CommandError)> = vec![
        (
            "FLUSHDB",
            &[],
            CommandError::UnknownCommand("FLUSHDB".to_string()),
        ),
        (
            "GET",
            &[],
            CommandError::WrongNumberOfArguments("get".to_string()),
        ),
        (
            "set",
            &["name"],
            CommandError::WrongNumberOfArguments("set".to_string()),
        ),
        ("EXPIRE", &["name", "soon"], CommandError::not_an_integer()),
    ];

    for (name, arguments, expected) in test_cases {
        env.exec_err(name, arguments, expected).await;
    }
}

#[tokio::test]
async fn test_type_mismatch_handling() {
    let lenient = TestEnv::new();
    lenient.exec_ok("SET", &["name", "Ican"], Reply::Ok).await;
    lenient
        .exec_ok("LLEN", &["name"], TestUtils::integer(0))
        .await;
    lenient
        .exec_ok("RPUSH", &["name", "a"], TestUtils::integer(1))
        .await;
    lenient
        .exec_ok("TYPE", &["name"], Reply::SimpleString("list".to_string()))
        .await;

    let strict = TestEnv::new_strict();
    strict.exec_ok("SET", &["name", "Ican"], Reply::Ok).await;
    strict
        .exec_err("RPUSH", &["name", "a"], CommandError::WrongTypeForKey)
        .await;
    strict
        .exec_err("LLEN", &["name"], CommandError::WrongTypeForKey)
        .await;
    strict.exec_ok("GET", &["name"], TestUtils::bulk("Ican")).await;
    assert_eq!(
        CommandError::WrongTypeForKey.as_string(),
        "WRONGTYPE operation against a key holding the wrong kind of value"
    );
}
