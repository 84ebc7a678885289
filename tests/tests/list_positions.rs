use pretty_assertions::assert_eq;
use tabula::{Kind, Leaf, Node, ParentMapper, Record, Transaction, Value};
use tests::{setup, strip_ids, value, ExecLog};

fn schema() -> Record {
    Record::new()
        .field("tags", Node::list(Leaf::string(8)))
        .field(
            "items",
            Node::list(
                Record::new()
                    .field("sku", Leaf::string(8))
                    .field("qty", Leaf::new(Kind::Uint)),
            ),
        )
}

async fn write(mapper: &ParentMapper, db: &tabula::Db, value: Value, replace: bool) {
    let id = Value::from("o1");
    let mut batch = Transaction::new();
    if replace {
        mapper.set(&id, &value, &mut batch).await.unwrap();
    } else {
        mapper.update(&id, &value, &mut batch).await.unwrap();
    }
    batch.execute(db).await.unwrap();
}

async fn items(mapper: &ParentMapper) -> Vec<serde_json::Value> {
    let stored = mapper.get(&Value::from("o1")).await.unwrap().to_json();
    stored["items"].as_array().cloned().unwrap_or_default()
}

fn settled(log: &ExecLog) -> bool {
    log.statements().iter().any(|sql| sql.contains("CASE WHEN"))
}

#[tokio::test]
async fn swap_two_leaf_elements() {
    let (db, log) = setup();
    let mapper = ParentMapper::root(&db, "orders", &schema()).unwrap();
    mapper.install().await.unwrap();

    write(&mapper, &db, value!({"tags": ["x", "y"]}), false).await;
    write(&mapper, &db, value!({"tags": ["y", "x"]}), false).await;

    assert_eq!(
        mapper.get(&Value::from("o1")).await.unwrap(),
        value!({"tags": ["y", "x"]})
    );
    assert_eq!(log.failures(), 0);
}

#[tokio::test]
async fn swap_two_record_elements() {
    let (db, log) = setup();
    let mapper = ParentMapper::root(&db, "orders", &schema()).unwrap();
    mapper.install().await.unwrap();

    write(
        &mapper,
        &db,
        value!({"items": [{"sku": "a", "qty": 1}, {"sku": "b", "qty": 2}]}),
        false,
    )
    .await;
    let before = items(&mapper).await;

    let swapped = serde_json::json!({"items": [before[1].clone(), before[0].clone()]});
    write(&mapper, &db, Value::from(swapped), false).await;

    let after = items(&mapper).await;
    assert_eq!(after, vec![before[1].clone(), before[0].clone()]);
    assert!(settled(&log));
    assert_eq!(log.failures(), 0);
}

#[tokio::test]
async fn rotate_and_insert_in_front() {
    let (db, log) = setup();
    let mapper = ParentMapper::root(&db, "orders", &schema()).unwrap();
    mapper.install().await.unwrap();

    write(
        &mapper,
        &db,
        value!({"items": [
            {"sku": "a", "qty": 1},
            {"sku": "b", "qty": 2},
            {"sku": "c", "qty": 3}
        ]}),
        false,
    )
    .await;
    let before = items(&mapper).await;

    let rotated = serde_json::json!({"items": [
        {"sku": "new", "qty": 0},
        before[2].clone(),
        before[0].clone(),
        before[1].clone()
    ]});
    write(&mapper, &db, Value::from(rotated), true).await;

    let after = items(&mapper).await;
    assert_eq!(after.len(), 4);
    assert_eq!(
        after[1..].to_vec(),
        vec![before[2].clone(), before[0].clone(), before[1].clone()]
    );
    assert_eq!(
        strip_ids(Value::from(after[0].clone())),
        value!({"sku": "new", "qty": 0})
    );
    assert_eq!(log.failures(), 0);
}

#[tokio::test]
async fn moved_element_keeps_its_changes() {
    let (db, _log) = setup();
    let mapper = ParentMapper::root(&db, "orders", &schema()).unwrap();
    mapper.install().await.unwrap();

    write(
        &mapper,
        &db,
        value!({"items": [{"sku": "a", "qty": 1}, {"sku": "b", "qty": 2}]}),
        false,
    )
    .await;
    let before = items(&mapper).await;

    let mut moved = before[0].clone();
    moved["qty"] = serde_json::json!(9);
    write(
        &mapper,
        &db,
        Value::from(serde_json::json!({"items": [before[1].clone(), moved.clone()]})),
        false,
    )
    .await;

    assert_eq!(items(&mapper).await, vec![before[1].clone(), moved]);
}
