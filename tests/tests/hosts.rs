use pretty_assertions::assert_eq;
use tabula::{Db, Leaf, Node, ParentMapper, Record, Transaction, Value};
use tabula_driver_sqlite::Sqlite;
use tests::{value, LoggingDriver};

#[tokio::test]
async fn fields_can_live_on_another_host() {
    let main = LoggingDriver::new(Sqlite::in_memory().unwrap());
    let archive = LoggingDriver::new(Sqlite::in_memory().unwrap());
    let (main_log, archive_log) = (main.exec_log(), archive.exec_log());

    let db = Db::builder()
        .driver("_", main)
        .driver("archive", archive)
        .build()
        .unwrap();

    let history = Node::list(Leaf::string(16)).with_override(
        "sqlite",
        serde_json::json!({"host": "archive", "name": "history"}),
    );
    let schema = Record::new()
        .field("name", Leaf::string(32))
        .field("history", history);

    let mapper = ParentMapper::root(&db, "people", &schema).unwrap();
    let hosts: Vec<_> = mapper
        .tables()
        .iter()
        .map(|t| (t.name().to_string(), t.host().to_string()))
        .collect();
    assert_eq!(
        hosts,
        [
            ("people".to_string(), "_".to_string()),
            ("history".to_string(), "archive".to_string()),
        ]
    );

    mapper.install().await.unwrap();
    let id = Value::from("p1");
    let record = value!({"name": "ana", "history": ["joined", "left"]});
    let mut batch = Transaction::new();
    mapper.set(&id, &record, &mut batch).await.unwrap();
    batch.execute(&db).await.unwrap();

    assert_eq!(mapper.get(&id).await.unwrap(), record);
    assert!(main_log.statements().iter().all(|sql| !sql.contains("history")));
    assert!(archive_log
        .statements()
        .iter()
        .any(|sql| sql.starts_with("INSERT INTO \"history\"")));
}

#[tokio::test]
async fn unknown_host_is_rejected_at_compile_time() {
    let db = Db::builder()
        .driver("_", Sqlite::in_memory().unwrap())
        .build()
        .unwrap();
    let schema = Record::new()
        .field("name", Leaf::string(8))
        .with_override("sqlite", serde_json::json!({"host": "nowhere"}));

    let err = ParentMapper::root(&db, "people", &schema).unwrap_err();
    assert!(err.is_unknown_host());
}
