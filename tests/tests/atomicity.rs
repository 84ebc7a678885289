use pretty_assertions::assert_eq;
use tabula::{Leaf, Node, ParentMapper, Record, Row, Storage, Transaction, Value};
use tests::{setup, value};

fn schema() -> Record {
    Record::new()
        .field("name", Leaf::string(32))
        .field("tags", Node::list(Leaf::string(8)))
}

#[tokio::test]
async fn failed_batch_applies_nothing() {
    let (db, log) = setup();
    let mapper = ParentMapper::root(&db, "people", &schema()).unwrap();
    mapper.install().await.unwrap();

    let id = Value::from("p1");
    let original = value!({"name": "ana", "tags": ["x", "y"]});
    let mut batch = Transaction::new();
    mapper.set(&id, &original, &mut batch).await.unwrap();
    batch.execute(&db).await.unwrap();

    log.fail_statements_containing("INSERT INTO \"people_tags\"");

    let mut batch = Transaction::new();
    mapper
        .update(&id, &value!({"name": "bob", "tags": ["z"]}), &mut batch)
        .await
        .unwrap();
    // the root update and the tag delete run before the failing insert
    assert_eq!(batch.len(), 3);

    let err = batch.execute(&db).await.unwrap_err();
    assert!(err.is_driver());
    assert_eq!(log.failures(), 1);

    log.stop_failing();
    assert_eq!(mapper.get(&id).await.unwrap(), original);
}

#[tokio::test]
async fn revision_row_fails_with_its_write() {
    let (db, log) = setup();
    let schema = schema().with_override("sqlite", serde_json::json!({"revisions": true}));
    let storage = Storage::new(&db, "people", &schema).unwrap();
    storage.install().await.unwrap();

    let id = storage
        .add(
            value!({"name": "ana", "tags": ["x"]}).into_map().unwrap(),
            &Row::new(),
        )
        .await
        .unwrap();

    log.fail_statements_containing("INSERT INTO \"people_revisions\"");
    let changes = value!({"name": "bob"}).into_map().unwrap();
    assert!(storage
        .save(&id, &changes, false, &Row::new())
        .await
        .unwrap_err()
        .is_driver());

    log.stop_failing();
    let stored = storage.fetch(&id).await.unwrap().unwrap();
    assert_eq!(stored["name"], Value::from("ana"));
}

#[tokio::test]
async fn earlier_batches_survive_a_failure() {
    let (db, log) = setup();
    let mapper = ParentMapper::root(&db, "people", &schema()).unwrap();
    mapper.install().await.unwrap();

    let mut batch = Transaction::new();
    mapper
        .set(&Value::from("p1"), &value!({"name": "ana"}), &mut batch)
        .await
        .unwrap();
    batch.execute(&db).await.unwrap();

    log.fail_statements_containing("'bob'");
    let mut batch = Transaction::new();
    mapper
        .set(&Value::from("p2"), &value!({"name": "bob", "tags": ["q"]}), &mut batch)
        .await
        .unwrap();
    assert!(batch.execute(&db).await.is_err());
    log.stop_failing();

    assert_eq!(
        mapper.get(&Value::from("p1")).await.unwrap(),
        value!({"name": "ana"})
    );
    assert_eq!(mapper.get(&Value::from("p2")).await.unwrap(), Value::Null);
    assert!(mapper
        .filter(&value!({"tags": "q"}))
        .await
        .unwrap()
        .is_empty());
}
