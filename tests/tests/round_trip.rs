use pretty_assertions::assert_eq;
use tabula::{Kind, Leaf, Node, ParentMapper, Record, Transaction, Value};
use tests::{setup, strip_ids, value};

async fn round_trip(field: impl Into<Node>, value: Value) {
    let (db, _log) = setup();
    let schema = Record::new()
        .field("label", Leaf::string(16))
        .field("field", field);
    let mapper = ParentMapper::root(&db, "docs", &schema).unwrap();
    mapper.install().await.unwrap();

    let id = Value::from("d1");
    let record = value!({ "label": "x", "field": value.to_json() });

    let mut batch = Transaction::new();
    mapper.set(&id, &record, &mut batch).await.unwrap();
    batch.execute(&db).await.unwrap();

    assert_eq!(strip_ids(mapper.get(&id).await.unwrap()), record);
}

#[tokio::test]
async fn list_of_leaves() {
    round_trip(Node::list(Leaf::string(8)), value!(["b", "a", "b"])).await;
}

#[tokio::test]
async fn map_of_leaves() {
    round_trip(
        Node::map(Leaf::string(8), Leaf::new(Kind::Int)),
        value!({"one": 1, "minus": -1}),
    )
    .await;
}

#[tokio::test]
async fn list_of_lists() {
    round_trip(
        Node::list(Node::list(Leaf::new(Kind::Int))),
        value!([[3, 1], [2], [5, 5, 5]]),
    )
    .await;
}

#[tokio::test]
async fn map_of_lists_of_maps() {
    round_trip(
        Node::map(
            Leaf::string(8),
            Node::list(Node::map(Leaf::string(8), Leaf::new(Kind::Bool))),
        ),
        value!({
            "a": [{"x": true}, {"x": false, "y": true}],
            "b": [{"z": false}]
        }),
    )
    .await;
}

#[tokio::test]
async fn list_of_records() {
    let item = Record::new()
        .field("sku", Leaf::string(8))
        .field("qty", Leaf::new(Kind::Uint).optional());

    round_trip(
        Node::list(item),
        value!([{"sku": "a", "qty": 2}, {"sku": "b"}]),
    )
    .await;
}

#[tokio::test]
async fn map_of_records_with_nested_lists() {
    let item = Record::new()
        .field("title", Leaf::string(16))
        .field("tags", Node::list(Leaf::string(8)));

    round_trip(
        Node::map(Leaf::string(8), item),
        value!({
            "en": {"title": "hello", "tags": ["greeting", "short"]},
            "fr": {"title": "bonjour", "tags": ["greeting"]}
        }),
    )
    .await;
}

#[tokio::test]
async fn records_carry_row_identifiers() {
    let (db, _log) = setup();
    let schema = Record::new().field(
        "items",
        Node::list(Record::new().field("sku", Leaf::string(8))),
    );
    let mapper = ParentMapper::root(&db, "orders", &schema).unwrap();
    mapper.install().await.unwrap();

    let id = Value::from("o1");
    let mut batch = Transaction::new();
    mapper
        .set(&id, &value!({"items": [{"sku": "a"}, {"sku": "b"}]}), &mut batch)
        .await
        .unwrap();
    batch.execute(&db).await.unwrap();

    let stored = mapper.get(&id).await.unwrap().to_json();
    let items = stored["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["_id"].is_string()));
    assert_ne!(items[0]["_id"], items[1]["_id"]);
}
