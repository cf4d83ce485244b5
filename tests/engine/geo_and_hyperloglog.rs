use memkv::{CommandError, Reply};

use crate::test_utils::{TestEnv, TestUtils};

async fn add_sellers(env: &TestEnv) {
    env.exec_ok(
        "GEOADD",
        &[
            "sellers",
            "106.820990",
            "-6.174704",
            "Toko A",
            "106.822696",
            "-6.176870",
            "Toko B",
        ],
        TestUtils::integer(2),
    )
    .await;
}

#[tokio::test]
async fn test_geo_distance_between_sellers() {
    let env = TestEnv::new();
    add_sellers(&env).await;

    env.exec_ok(
        "GEODIST",
        &["sellers", "Toko A", "Toko B", "km"],
        TestUtils::bulk("0.3061"),
    )
    .await;
    env.exec_ok("GEODIST", &["sellers", "Toko A", "Toko C"], Reply::Null)
        .await;
    env.exec_ok("TYPE", &["sellers"], Reply::SimpleString("zset".to_string()))
        .await;
}

#[tokio::test]
async fn test_geo_search_returns_nearest_first() {
    let env = TestEnv::new();
    add_sellers(&env).await;
    env.exec_ok(
        "GEOADD",
        &["sellers", "110.0", "-7.0", "Toko Far"],
        TestUtils::integer(1),
    )
    .await;

    let test_cases: Vec<(&[&str], Reply)> = vec![
        (
            &[],
            TestUtils::bulk_array(&["Toko A", "Toko B"]),
        ),
        (&["DESC"], TestUtils::bulk_array(&["Toko B", "Toko A"])),
        (&["COUNT", "1"], TestUtils::bulk_array(&["Toko A"])),
    ];

    for (options, expected) in test_cases {
        let mut arguments = vec![
            "sellers",
            "FROMLONLAT",
            "106.821666",
            "-6.175494",
            "BYRADIUS",
            "5",
            "km",
        ];
        arguments.extend_from_slice(options);

        env.exec_ok("GEOSEARCH", &arguments, expected).await;
    }

    let Ok(Reply::Array(found)) = env
        .exec(
            "GEOSEARCH",
            &["sellers", "FROMMEMBER", "Toko A", "BYRADIUS", "1", "km", "WITHDIST"],
        )
        .await
    else {
        panic!("expected an array reply");
    };
    assert_eq!(
        found,
        vec![
            Reply::Array(vec![TestUtils::bulk("Toko A"), TestUtils::bulk("0.0000")]),
            Reply::Array(vec![TestUtils::bulk("Toko B"), TestUtils::bulk("0.3061")]),
        ]
    );

    env.exec_err(
        "GEOADD",
        &["sellers", "181", "0", "Nowhere"],
        CommandError::invalid_argument("invalid longitude,latitude pair 181.000000,0.000000"),
    )
    .await;
}

#[tokio::test]
async fn test_geo_positions() {
    let env = TestEnv::new();
    add_sellers(&env).await;

    let Ok(Reply::Array(positions)) = env.exec("GEOPOS", &["sellers", "Toko A", "Toko C"]).await
    else {
        panic!("expected an array reply");
    };

    assert_eq!(positions.len(), 2);
    assert_eq!(positions[1], Reply::Null);

    let coordinates = positions[0].clone().into_strings();
    let longitude: f64 = coordinates[0].parse().unwrap();
    let latitude: f64 = coordinates[1].parse().unwrap();
    assert!((longitude - 106.820990).abs() < 0.0001);
    assert!((latitude + 6.174704).abs() < 0.0001);
}

#[tokio::test]
async fn test_hyperloglog_counts_distinct_names() {
    let env = TestEnv::new();

    env.exec_ok(
        "PFADD",
        &["visitors", "Ican", "Budi", "Siti", "Joko"],
        TestUtils::integer(1),
    )
    .await;
    env.exec_ok("PFADD", &["visitors", "Ican", "Budi"], TestUtils::integer(0))
        .await;
    env.exec("PFADD", &["visitors", "Siti", "Eko", "Dewi"])
        .await
        .unwrap();

    env.exec_ok("PFCOUNT", &["visitors"], TestUtils::integer(6)).await;

    env.exec_ok("PFADD", &["others", "Eko", "Rina"], TestUtils::integer(1))
        .await;
    env.exec_ok(
        "PFCOUNT",
        &["visitors", "others", "missing"],
        TestUtils::integer(7),
    )
    .await;
    env.exec_ok("PFADD", &["empty"], TestUtils::integer(1)).await;
    env.exec_ok("PFCOUNT", &["empty"], TestUtils::integer(0)).await;
}
