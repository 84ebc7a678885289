use pretty_assertions::assert_eq;
use tabula::{Kind, Leaf, Node, ParentMapper, Record, Transaction, Value};
use tests::{setup, value};

fn schema() -> Record {
    Record::new()
        .field("name", Leaf::string(32))
        .field("address", Record::new().field("city", Leaf::string(32)))
        .field("scores", Node::map(Leaf::string(8), Node::list(Leaf::new(Kind::Int))))
        .with_override("sqlite", serde_json::json!({"revisions": true}))
}

#[tokio::test]
async fn install_twice_keeps_tables_and_data() {
    let (db, log) = setup();
    let mapper = ParentMapper::root(&db, "people", &schema()).unwrap();

    mapper.install().await.unwrap();
    let created = creates(&log.statements()).len();
    assert!(created > 0);

    let id = Value::from("p1");
    let record = value!({
        "name": "ana",
        "address": {"city": "Oslo"},
        "scores": {"math": [1, 2]}
    });
    let mut batch = Transaction::new();
    mapper.set(&id, &record, &mut batch).await.unwrap();
    batch.execute(&db).await.unwrap();

    mapper.install().await.unwrap();
    assert_eq!(log.failures(), 0);
    assert_eq!(mapper.get(&id).await.unwrap(), record);

    // Every create statement is guarded, so repeating them is harmless.
    let statements = log.statements();
    let creates = creates(&statements);
    assert_eq!(creates.len(), 2 * created);
    assert!(creates.iter().all(|sql| sql.contains("IF NOT EXISTS")));
}

fn creates(statements: &[String]) -> Vec<&String> {
    statements
        .iter()
        .filter(|sql| sql.starts_with("CREATE"))
        .collect()
}

#[tokio::test]
async fn tables_are_named_by_field_path() {
    let (db, log) = setup();
    let mapper = ParentMapper::root(&db, "people", &schema()).unwrap();
    mapper.install().await.unwrap();

    let tables: Vec<_> = mapper.tables().iter().map(|t| t.name().to_string()).collect();
    assert_eq!(tables, ["people", "people_address", "people_scores"]);

    let statements = log.statements();
    assert!(statements
        .iter()
        .any(|sql| sql.starts_with("CREATE TABLE IF NOT EXISTS \"people_revisions\"")));
}

#[tokio::test]
async fn uninstall_drops_everything() {
    let (db, _log) = setup();
    let mapper = ParentMapper::root(&db, "people", &schema()).unwrap();
    mapper.install().await.unwrap();

    let id = Value::from("p1");
    let mut batch = Transaction::new();
    mapper
        .set(&id, &value!({"name": "ana", "scores": {"x": [1]}}), &mut batch)
        .await
        .unwrap();
    batch.execute(&db).await.unwrap();

    mapper.uninstall().await.unwrap();
    assert!(mapper.get(&id).await.is_err());

    mapper.install().await.unwrap();
    assert_eq!(mapper.get(&id).await.unwrap(), Value::Null);
}
