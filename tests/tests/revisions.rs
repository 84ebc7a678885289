use pretty_assertions::assert_eq;
use tabula::{Kind, Leaf, Node, ParentMapper, Record, Revision, Row, Storage, Transaction, Value};
use tests::{setup, value};

fn person() -> Record {
    Record::new()
        .field("name", Leaf::string(32))
        .field("age", Leaf::new(Kind::Uint))
        .field("email", Leaf::string(64))
        .field("address", Record::new().field("city", Leaf::string(32)))
}

async fn set(mapper: &ParentMapper, db: &tabula::Db, value: Value) -> Option<Revision> {
    let mut batch = Transaction::new();
    let revision = mapper
        .set(&Value::from("p1"), &value, &mut batch)
        .await
        .unwrap();
    batch.execute(db).await.unwrap();
    revision
}

#[tokio::test]
async fn whole_record_change_collapses() {
    let (db, _log) = setup();
    let mapper = ParentMapper::root(&db, "people", &person()).unwrap();
    mapper.install().await.unwrap();

    set(&mapper, &db, value!({"name": "a", "age": 1, "email": "a@x"})).await;

    let revision = set(
        &mapper,
        &db,
        value!({"name": "b", "age": 2, "email": "b@x", "address": {"city": "Oslo"}}),
    )
    .await
    .unwrap();

    assert_eq!(
        revision,
        Revision::changed(
            value!({"name": "a", "age": 1, "email": "a@x"}),
            value!({"name": "b", "age": 2, "email": "b@x", "address": {"city": "Oslo"}}),
        )
    );
}

#[tokio::test]
async fn single_field_change_stays_per_field() {
    let (db, _log) = setup();
    let mapper = ParentMapper::root(&db, "people", &person()).unwrap();
    mapper.install().await.unwrap();

    let record = value!({"name": "a", "age": 1, "email": "a@x", "address": {"city": "Oslo"}});
    set(&mapper, &db, record).await;

    let revision = set(
        &mapper,
        &db,
        value!({"name": "c", "age": 1, "email": "a@x", "address": {"city": "Oslo"}}),
    )
    .await
    .unwrap();
    assert_eq!(
        revision.to_value(),
        value!({"name": {"old": "a", "new": "c"}})
    );

    let unchanged = set(
        &mapper,
        &db,
        value!({"name": "c", "age": 1, "email": "a@x", "address": {"city": "Oslo"}}),
    )
    .await;
    assert_eq!(unchanged, None);
}

#[tokio::test]
async fn first_write_is_a_creation() {
    let (db, _log) = setup();
    let mapper = ParentMapper::root(&db, "people", &person()).unwrap();
    mapper.install().await.unwrap();

    let record = value!({"name": "a", "age": 1, "email": "a@x"});
    let revision = set(&mapper, &db, record.clone()).await.unwrap();
    assert_eq!(revision, Revision::changed(Value::Null, record));
}

#[tokio::test]
async fn nested_element_change_is_reported_under_its_field() {
    let (db, _log) = setup();
    let schema = Record::new().field(
        "items",
        Node::list(
            Record::new()
                .field("sku", Leaf::string(8))
                .field("qty", Leaf::new(Kind::Uint)),
        ),
    );
    let mapper = ParentMapper::root(&db, "orders", &schema).unwrap();
    mapper.install().await.unwrap();

    let id = Value::from("o1");
    let mut batch = Transaction::new();
    mapper
        .set(&id, &value!({"items": [{"sku": "a", "qty": 1}]}), &mut batch)
        .await
        .unwrap();
    batch.execute(&db).await.unwrap();

    let mut items = mapper.get(&id).await.unwrap().to_json()["items"].clone();
    items[0]["qty"] = serde_json::json!(5);

    let mut batch = Transaction::new();
    let revision = mapper
        .update(&id, &value!({"items": items}), &mut batch)
        .await
        .unwrap()
        .unwrap();
    batch.execute(&db).await.unwrap();

    let changes = revision.to_value().to_json();
    let elements = changes["items"].as_object().unwrap();
    assert_eq!(elements.len(), 1);
    let (_, element) = elements.iter().next().unwrap();
    assert_eq!(element, &serde_json::json!({"qty": {"old": 1, "new": 5}}));
}

#[tokio::test]
async fn revisions_disabled_is_reported() {
    let (db, _log) = setup();
    let storage = Storage::new(&db, "people", &person()).unwrap();
    storage.install().await.unwrap();

    let err = storage
        .revision_add("p1", &value!({"note": "x"}).into_map().unwrap())
        .await
        .unwrap_err();
    assert!(err.is_revisions_disabled());
}

#[tokio::test]
async fn storage_records_each_write() {
    let (db, _log) = setup();
    let schema = person().with_override("sqlite", serde_json::json!({"revisions": true}));
    let storage = Storage::new(&db, "people", &schema).unwrap();
    storage.install().await.unwrap();

    let info = Row::new();
    let id = storage
        .add(
            value!({"name": "a", "age": 1, "email": "a@x"}).into_map().unwrap(),
            &info,
        )
        .await
        .unwrap();
    storage
        .save(&id, &value!({"age": 2}).into_map().unwrap(), false, &info)
        .await
        .unwrap();
    storage
        .revision_add(&id, &value!({"note": "manual"}).into_map().unwrap())
        .await
        .unwrap();
    storage.remove(&id, &info).await.unwrap();

    let rows = db
        .query(
            "SELECT \"_id\", \"items\" FROM \"people_revisions\" ORDER BY rowid;",
            "_",
        )
        .await
        .unwrap();
    let items: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            assert_eq!(row["_id"], Value::from(&id));
            serde_json::from_str(row["items"].as_str().unwrap()).unwrap()
        })
        .collect();

    assert_eq!(
        items,
        vec![
            serde_json::json!({"old": null, "new": {"name": "a", "age": 1, "email": "a@x"}}),
            serde_json::json!({"age": {"old": 1, "new": 2}}),
            serde_json::json!({"note": "manual"}),
            serde_json::json!({"old": {"name": "a", "age": 2, "email": "a@x"}, "new": null}),
        ]
    );
}
