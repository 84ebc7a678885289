use pretty_assertions::assert_eq;
use tabula::{Kind, Leaf, Node, ParentMapper, Record, Transaction, Value};
use tests::{setup, value};

fn schema() -> Record {
    let line = Record::new()
        .field("product", Leaf::string(16))
        .field("qty", Leaf::new(Kind::Int));
    let order = Record::new()
        .field("sku", Leaf::string(8))
        .field("lines", Node::list(line));

    Record::new()
        .field("name", Leaf::string(32))
        .field("tags", Node::list(Leaf::string(8)))
        .field("orders", Node::list(order))
}

async fn seeded() -> ParentMapper {
    let (db, _log) = setup();
    let mapper = ParentMapper::root(&db, "people", &schema()).unwrap();
    mapper.install().await.unwrap();

    let records = [
        (
            "p1",
            value!({
                "name": "ana",
                "tags": ["x", "y"],
                "orders": [
                    {"sku": "s1", "lines": [
                        {"product": "apple", "qty": 1},
                        {"product": "apple", "qty": 2}
                    ]},
                    {"sku": "s2", "lines": [{"product": "apple", "qty": 3}]}
                ]
            }),
        ),
        (
            "p2",
            value!({
                "name": "bob",
                "tags": ["y"],
                "orders": [{"sku": "s1", "lines": [{"product": "pear", "qty": 1}]}]
            }),
        ),
        ("p3", value!({"name": "ana"})),
    ];

    let mut batch = Transaction::new();
    for (id, record) in records {
        mapper.set(&Value::from(id), &record, &mut batch).await.unwrap();
    }
    batch.execute(&db).await.unwrap();
    mapper
}

async fn ids(mapper: &ParentMapper, criteria: Value) -> Vec<String> {
    let mut ids: Vec<_> = mapper
        .filter(&criteria)
        .await
        .unwrap()
        .iter()
        .filter_map(Value::key_string)
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
async fn three_levels_deep_without_duplicates() {
    let mapper = seeded().await;

    assert_eq!(
        ids(&mapper, value!({"orders": {"lines": {"product": "apple"}}})).await,
        ["p1"]
    );
    assert_eq!(
        ids(&mapper, value!({"orders": {"lines": {"qty": 1}}})).await,
        ["p1", "p2"]
    );
    assert_eq!(
        ids(&mapper, value!({"orders": {"lines": {"qty": {"gte": 3}}}})).await,
        ["p1"]
    );
    assert!(ids(&mapper, value!({"orders": {"lines": {"product": "kiwi"}}}))
        .await
        .is_empty());
}

#[tokio::test]
async fn criteria_intersect_across_fields() {
    let mapper = seeded().await;

    assert_eq!(ids(&mapper, value!({"orders": {"sku": "s1"}})).await, ["p1", "p2"]);
    assert_eq!(ids(&mapper, value!({"name": "ana"})).await, ["p1", "p3"]);
    assert_eq!(
        ids(&mapper, value!({"name": "ana", "orders": {"sku": "s1"}})).await,
        ["p1"]
    );
    assert_eq!(
        ids(&mapper, value!({"tags": "y", "orders": {"lines": {"product": "pear"}}})).await,
        ["p2"]
    );
}

#[tokio::test]
async fn operators_on_leaf_elements() {
    let mapper = seeded().await;

    assert_eq!(ids(&mapper, value!({"tags": ["x", "q"]})).await, ["p1"]);
    assert_eq!(ids(&mapper, value!({"tags": {"neq": "x"}})).await, ["p1", "p2"]);
    assert_eq!(ids(&mapper, value!({"name": {"like": "b%"}})).await, ["p2"]);
    assert_eq!(
        ids(&mapper, value!({"name": {"between": ["a", "az"]}})).await,
        ["p1", "p3"]
    );
}

#[tokio::test]
async fn unknown_criteria_are_rejected() {
    let mapper = seeded().await;

    let err = mapper
        .filter(&value!({"orders": {"colour": "red"}}))
        .await
        .unwrap_err();
    assert!(err.is_invalid_filter_key());

    let err = mapper
        .filter(&value!({"name": {"near": "ana"}}))
        .await
        .unwrap_err();
    assert!(err.is_invalid_filter_key());
}
