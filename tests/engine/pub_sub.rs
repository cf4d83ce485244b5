use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use memkv::{Message, Reply};
use tokio::time::sleep;

use crate::test_utils::{TestEnv, TestUtils};

async fn wait_for_subscribers(env: &TestEnv, channel: &str, expected: usize) {
    for _ in 0..100 {
        if env.engine.pub_sub().subscriber_count(channel).await == expected {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }

    panic!("channel {} never reached {} subscribers", channel, expected);
}

#[tokio::test]
async fn test_publish_without_subscribers() {
    let env = TestEnv::new();

    assert_eq!(env.engine.publish("news", "hello").await, 0);
    env.exec_ok("PUBLISH", &["news", "hello"], TestUtils::integer(0))
        .await;
}

#[tokio::test]
async fn test_subscriber_handler_runs_once_per_message_and_channel() {
    let env = TestEnv::new();
    let received: Arc<Mutex<Vec<Message>>> = Arc::new(Mutex::new(Vec::new()));

    let listener = {
        let engine = env.engine.clone();
        let received = Arc::clone(&received);

        tokio::spawn(async move {
            engine
                .subscribe(&TestUtils::strings(&["news", "sport"]), move |message| {
                    received.lock().unwrap().push(message)
                })
                .await;
        })
    };

    wait_for_subscribers(&env, "news", 1).await;
    wait_for_subscribers(&env, "sport", 1).await;

    env.exec_ok("PUBLISH", &["news", "first"], TestUtils::integer(1))
        .await;
    assert_eq!(env.engine.publish("sport", "second").await, 1);
    assert_eq!(env.engine.publish("weather", "ignored").await, 0);

    for _ in 0..100 {
        if received.lock().unwrap().len() >= 2 {
            break;
        }
        sleep(Duration::from_millis(5)).await;
    }

    env.engine.shutdown();
    listener.await.unwrap();

    assert_eq!(
        *received.lock().unwrap(),
        vec![
            Message {
                channel: "news".to_string(),
                payload: "first".to_string(),
            },
            Message {
                channel: "sport".to_string(),
                payload: "second".to_string(),
            },
        ]
    );

    // The listener unregistered itself on shutdown.
    assert_eq!(env.engine.pub_sub().subscriber_count("news").await, 0);
    assert_eq!(env.engine.publish("news", "late").await, 0);
}

#[tokio::test]
async fn test_publish_reaches_every_subscriber() {
    let env = TestEnv::new();

    let mut first = env
        .engine
        .pub_sub()
        .subscribe(&TestUtils::strings(&["news"]))
        .await;
    let mut second = env
        .engine
        .pub_sub()
        .subscribe(&TestUtils::strings(&["news", "news"]))
        .await;

    assert_eq!(second.channels(), ["news".to_string()]);
    env.exec_ok("PUBLISH", &["news", "hello"], TestUtils::integer(2))
        .await;

    for subscription in [&mut first, &mut second] {
        assert_eq!(
            subscription.next_message().await,
            Some(Message {
                channel: "news".to_string(),
                payload: "hello".to_string(),
            })
        );
    }

    drop(first);
    assert_eq!(
        env.exec("PUBLISH", &["news", "again"]).await,
        Ok(Reply::Integer(1))
    );
}
