use pretty_assertions::assert_eq;
use tabula::{Leaf, Node, ParentMapper, Record, Row, Storage, Transaction, Value};
use tests::{setup, value};

fn schema() -> Record {
    Record::new()
        .field("name", Leaf::string(32))
        .field("tags", Node::list(Leaf::string(8)))
}

#[tokio::test]
async fn mapper_lifecycle() {
    let (db, _log) = setup();
    let mapper = ParentMapper::root(&db, "people", &schema()).unwrap();
    mapper.install().await.unwrap();
    let id1 = Value::from("id1");

    let mut batch = Transaction::new();
    mapper
        .set(&id1, &value!({"name": "a", "tags": ["x", "y"]}), &mut batch)
        .await
        .unwrap();
    batch.execute(&db).await.unwrap();
    assert_eq!(
        mapper.get(&id1).await.unwrap(),
        value!({"name": "a", "tags": ["x", "y"]})
    );

    let mut batch = Transaction::new();
    mapper
        .update(&id1, &value!({"tags": ["y", "x"]}), &mut batch)
        .await
        .unwrap();
    batch.execute(&db).await.unwrap();
    assert_eq!(
        mapper.get(&id1).await.unwrap(),
        value!({"name": "a", "tags": ["y", "x"]})
    );

    assert_eq!(
        mapper.filter(&value!({"name": "a"})).await.unwrap(),
        vec![id1.clone()]
    );

    let mut batch = Transaction::new();
    mapper.delete(&id1, &mut batch).await.unwrap();
    batch.execute(&db).await.unwrap();
    assert_eq!(mapper.get(&id1).await.unwrap(), Value::Null);
    assert!(mapper.filter(&value!({"name": "a"})).await.unwrap().is_empty());
}

#[tokio::test]
async fn storage_lifecycle() {
    let (db, log) = setup();
    let storage = Storage::new(&db, "people", &schema()).unwrap();
    storage.install().await.unwrap();
    let info = Row::new();

    let id = storage
        .add(
            value!({"name": "a", "tags": ["x", "y"]}).into_map().unwrap(),
            &info,
        )
        .await
        .unwrap();
    // identifiers come from the backend
    assert!(log.any(|op| matches!(op, tabula_core::driver::Operation::NewIdentifier)));
    assert_eq!(id.len(), 36);

    storage
        .save(&id, &value!({"tags": ["y", "x"]}).into_map().unwrap(), false, &info)
        .await
        .unwrap();
    assert_eq!(
        storage.fetch(&id).await.unwrap().map(Value::Map),
        Some(value!({"name": "a", "tags": ["y", "x"]}))
    );
    assert_eq!(storage.filter(&value!({"name": "a"}).into_map().unwrap()).await.unwrap(), [id.clone()]);

    // replace overwrites the nested list as a whole
    storage
        .save(&id, &value!({"name": "b", "tags": ["z"]}).into_map().unwrap(), true, &info)
        .await
        .unwrap();
    assert_eq!(
        storage.fetch_many(&[id.clone()]).await.unwrap(),
        vec![value!({"name": "b", "tags": ["z"]}).into_map()]
    );

    storage.remove(&id, &info).await.unwrap();
    assert!(!storage.exists(&id).await.unwrap());
    assert_eq!(storage.fetch(&id).await.unwrap(), None);

    storage.uninstall().await.unwrap();
}
