use memkv::{CommandError, Reply};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_list_round_trip() {
    let env = TestEnv::new();

    for (index, value) in ["a", "b", "c"].into_iter().enumerate() {
        env.exec_ok("RPUSH", &["letters", value], TestUtils::integer(index as i64 + 1))
            .await;
    }

    for expected in ["a", "b", "c"] {
        env.exec_ok("LPOP", &["letters"], TestUtils::bulk(expected))
            .await;
    }

    env.exec_err("LPOP", &["letters"], CommandError::EmptyCollection)
        .await;
    env.exec_ok("TYPE", &["letters"], Reply::SimpleString("none".to_string()))
        .await;
}

#[tokio::test]
async fn test_handle_list_commands() {
    let env = TestEnv::new();

    env.exec_ok(
        "RPUSH",
        &["fruits", "grape", "apple", "pineapple"],
        TestUtils::integer(3),
    )
    .await;
    env.exec_ok("LPUSH", &["fruits", "mango", "raspberry"], TestUtils::integer(5))
        .await;
    env.exec_ok("LLEN", &["fruits"], TestUtils::integer(5)).await;

    let test_cases = vec![
        (
            ("0", "-1"),
            TestUtils::bulk_array(&["raspberry", "mango", "grape", "apple", "pineapple"]),
        ),
        (("1", "2"), TestUtils::bulk_array(&["mango", "grape"])),
        (("-2", "-1"), TestUtils::bulk_array(&["apple", "pineapple"])),
        (("2", "99"), TestUtils::bulk_array(&["grape", "apple", "pineapple"])),
        (("3", "1"), Reply::empty_array()),
        (("7", "9"), Reply::empty_array()),
    ];

    for ((start, stop), expected) in test_cases {
        env.exec_ok("LRANGE", &["fruits", start, stop], expected).await;
    }

    env.exec_ok(
        "LPOP",
        &["fruits", "2"],
        TestUtils::bulk_array(&["raspberry", "mango"]),
    )
    .await;
    env.exec_ok(
        "LPOP",
        &["fruits", "10"],
        TestUtils::bulk_array(&["grape", "apple", "pineapple"]),
    )
    .await;
    env.exec_ok("LLEN", &["fruits"], TestUtils::integer(0)).await;
    env.exec_ok("LRANGE", &["missing", "0", "-1"], Reply::empty_array())
        .await;
}

#[tokio::test]
async fn test_set_idempotence() {
    let env = TestEnv::new();

    env.exec_ok("SADD", &["tags", "rust"], TestUtils::integer(1)).await;
    env.exec_ok("SADD", &["tags", "rust"], TestUtils::integer(0)).await;
    env.exec_ok("SMEMBERS", &["tags"], TestUtils::bulk_array(&["rust"]))
        .await;

    env.exec_ok("SADD", &["tags", "tokio", "serde", "tokio"], TestUtils::integer(2))
        .await;
    env.exec_ok("SCARD", &["tags"], TestUtils::integer(3)).await;
    env.exec_ok(
        "SMEMBERS",
        &["tags"],
        TestUtils::bulk_array(&["rust", "tokio", "serde"]),
    )
    .await;

    let test_cases = vec![("rust", 1), ("go", 0)];
    for (member, expected) in test_cases {
        env.exec_ok("SISMEMBER", &["tags", member], TestUtils::integer(expected))
            .await;
    }

    env.exec_ok("SREM", &["tags", "rust", "go"], TestUtils::integer(1))
        .await;
    env.exec_ok(
        "SMEMBERS",
        &["tags"],
        TestUtils::bulk_array(&["tokio", "serde"]),
    )
    .await;
}

#[tokio::test]
async fn test_sorted_set_ordering() {
    let env = TestEnv::new();

    for _ in 0..2 {
        for (score, member) in [("100", "Ican"), ("85", "Budi"), ("95", "Siti")] {
            env.exec("ZADD", &["scores", score, member]).await.unwrap();
        }
    }

    env.exec_ok("ZCARD", &["scores"], TestUtils::integer(3)).await;
    env.exec_ok(
        "ZRANGE",
        &["scores", "0", "-1"],
        TestUtils::bulk_array(&["Budi", "Siti", "Ican"]),
    )
    .await;
    env.exec_ok(
        "ZRANGE",
        &["scores", "0", "1", "WITHSCORES"],
        TestUtils::bulk_array(&["Budi", "85", "Siti", "95"]),
    )
    .await;
    env.exec_ok("ZSCORE", &["scores", "Siti"], TestUtils::bulk("95"))
        .await;
    env.exec_ok("ZSCORE", &["scores", "Joko"], Reply::Null).await;

    env.exec_ok("ZADD", &["scores", "80", "Ican"], TestUtils::integer(0))
        .await;
    env.exec_ok(
        "ZRANGE",
        &["scores", "0", "-1"],
        TestUtils::bulk_array(&["Ican", "Budi", "Siti"]),
    )
    .await;

    env.exec_ok("ZREM", &["scores", "Budi", "Joko"], TestUtils::integer(1))
        .await;
    env.exec_ok("ZCARD", &["scores"], TestUtils::integer(2)).await;
    env.exec_err(
        "ZADD",
        &["scores", "high", "Joko"],
        CommandError::not_a_float(),
    )
    .await;
}

#[tokio::test]
async fn test_hash_stringification() {
    let env = TestEnv::new();

    env.exec_ok(
        "HSET",
        &["user", "name", "Ican", "age", "20"],
        TestUtils::integer(2),
    )
    .await;
    env.exec_ok("HSET", &["user", "age", "21"], TestUtils::integer(0))
        .await;
    env.exec_ok("HGET", &["user", "age"], TestUtils::bulk("21")).await;
    env.exec_ok("HGET", &["user", "email"], Reply::Null).await;

    let Ok(Reply::Map(pairs)) = env.exec("HGETALL", &["user"]).await else {
        panic!("expected a map reply");
    };
    assert_eq!(
        pairs,
        vec![
            ("name".to_string(), "Ican".to_string()),
            ("age".to_string(), "21".to_string()),
        ]
    );

    env.exec_ok("HDEL", &["user", "name", "email"], TestUtils::integer(1))
        .await;
    env.exec_ok("HDEL", &["user", "age"], TestUtils::integer(1)).await;
    env.exec_ok("HGETALL", &["user"], Reply::Map(Vec::new())).await;
    env.exec_err(
        "HSET",
        &["user", "name"],
        CommandError::WrongNumberOfArguments("hset".to_string()),
    )
    .await;
}
