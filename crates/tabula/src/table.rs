//! The Table Gateway: one relational table, its columns and its statements.

mod filter;

mod query;
pub use query::Query;

use crate::{db::Db, err, Error, Result, Row, Value};

use tabula_core::{
    driver::{Flavor, Operation},
    schema::db::{AutoKey, Column, Index, IndexKind, Revisions, TableSpec, Type},
};
use tabula_sql::{
    codec,
    stmt::{
        BinaryOp, ColumnDef, CreateIndex, CreateTable, Delete, Expr, Insert, Name, OnConflict,
        Select, Statement, Update,
    },
    Serializer,
};

use indexmap::IndexMap;

/// Session variable holding the key generated by an expression auto-key.
///
/// A [`Literal`](crate::Literal) with this text may appear in insert values
/// to embed the generated key in more than one column.
pub const AUTO_PRIMARY: &str = "@_AUTO_PRIMARY";

/// What an insert does when it collides with an existing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Conflict {
    /// Let the backend raise.
    #[default]
    Error,

    /// Keep the existing row.
    Ignore,

    /// Overwrite every inserted column of the existing row.
    Replace,

    /// Overwrite only the named columns.
    Update(Vec<String>),
}

#[derive(Debug)]
pub struct Table {
    spec: TableSpec,
    columns: IndexMap<String, Column>,
    db: Db,
    serializer: Serializer,
}

impl Table {
    /// Bind a resolved spec and its columns to the host the spec names.
    pub fn new(db: &Db, spec: TableSpec, columns: Vec<Column>) -> Result<Table> {
        let flavor = db.flavor(&spec.host)?;
        let columns: IndexMap<_, _> = columns
            .into_iter()
            .map(|column| (column.name.clone(), column))
            .collect();

        match &spec.key {
            Some(key) if !columns.contains_key(key) => {
                return Err(Error::invalid_schema(format!(
                    "table `{}` has no key column `{key}`",
                    spec.name
                )))
            }
            None if spec.revisions_enabled() => {
                return Err(Error::invalid_schema(format!(
                    "table `{}` needs a key column to keep revisions",
                    spec.name
                )))
            }
            _ => {}
        }

        for index in &spec.indexes {
            if let Some(column) = index
                .columns
                .iter()
                .find(|column| !columns.contains_key(&column.name))
            {
                return Err(Error::invalid_schema(format!(
                    "index `{}` of table `{}` names unknown column `{}`",
                    index.name, spec.name, column.name
                )));
            }
        }

        Ok(Table {
            spec,
            columns,
            db: db.clone(),
            serializer: Serializer::new(flavor),
        })
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn host(&self) -> &str {
        &self.spec.host
    }

    /// The primary key column, if rows have one.
    pub fn key(&self) -> Option<&str> {
        self.spec.key.as_deref()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn flavor(&self) -> Flavor {
        self.serializer.flavor()
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    /// Shape a value the way it reads back from this column, so values from
    /// callers and from the backend compare equal.
    pub fn normalize(&self, column: &str, value: &Value) -> Value {
        match self.columns.get(column) {
            Some(column) => codec::decode(&column.leaf, value.clone()),
            None => value.clone(),
        }
    }

    /// `CREATE TABLE` and `CREATE INDEX` statements for this table and, when
    /// revisions are enabled, its revisions table.
    pub fn create_statements(&self) -> Vec<String> {
        let mut ret = vec![];

        let mut columns = vec![];
        if let Some(key) = self.key().and_then(|key| self.columns.get(key)) {
            let mut def = ColumnDef::from_column(key);
            def.primary_key = true;
            def.auto_increment = self.spec.auto_key == AutoKey::Increment;
            columns.push(def);
        }
        columns.extend(
            self.columns
                .values()
                .filter(|column| Some(column.name.as_str()) != self.key())
                .map(ColumnDef::from_column),
        );

        self.push_create(
            &mut ret,
            CreateTable {
                name: self.qualified(),
                columns,
                primary_key: self.spec.key.clone(),
                indexes: self.spec.indexes.clone(),
                engine: self.spec.engine.clone(),
                charset: self.spec.charset.clone(),
                collate: self.spec.collate.clone(),
            },
        );

        if let Some(key) = self.revision_key() {
            let mut key_def = ColumnDef::from_column(key);
            key_def.nullable = false;
            key_def.opts = None;

            let created = ColumnDef {
                name: "created".into(),
                ty: Type::Timestamp,
                nullable: false,
                opts: Some("NOT NULL DEFAULT CURRENT_TIMESTAMP".into()),
                primary_key: false,
                auto_increment: false,
            };
            let items = ColumnDef {
                name: "items".into(),
                ty: Type::Text,
                nullable: false,
                opts: None,
                primary_key: false,
                auto_increment: false,
            };

            self.push_create(
                &mut ret,
                CreateTable {
                    name: self.revisions_name(),
                    columns: vec![key_def, created, items],
                    primary_key: None,
                    indexes: vec![Index::new(
                        &key.name,
                        IndexKind::Plain,
                        [key.name.as_str()],
                    )],
                    engine: self.spec.engine.clone(),
                    charset: self.spec.charset.clone(),
                    collate: self.spec.collate.clone(),
                },
            );
        }

        ret
    }

    fn push_create(&self, ret: &mut Vec<String>, create: CreateTable) {
        // SQLite declares only unique indexes inline
        let separate: Vec<_> = match self.flavor() {
            Flavor::Sqlite => create
                .indexes
                .iter()
                .filter(|index| index.kind != IndexKind::Unique)
                .map(|index| CreateIndex {
                    name: format!("{}_{}", create.name.table(), index.name),
                    on: create.name.clone(),
                    columns: index.columns.clone(),
                    unique: false,
                })
                .collect(),
            Flavor::Mysql => vec![],
        };

        ret.push(self.serializer.serialize(&create.into()));
        ret.extend(
            separate
                .into_iter()
                .map(|index| self.serializer.serialize(&index.into())),
        );
    }

    /// Create the table if it does not exist yet.
    pub async fn create(&self) -> Result<()> {
        for sql in self.create_statements() {
            self.db.execute(sql, self.host()).await?;
        }
        Ok(())
    }

    pub fn drop_statements(&self) -> Vec<String> {
        let mut names = vec![];
        if self.spec.revisions_enabled() {
            names.push(self.revisions_name());
        }
        names.push(self.qualified());

        names
            .into_iter()
            .map(|name| {
                self.serializer
                    .serialize(&Statement::drop_table_if_exists(name))
            })
            .collect()
    }

    /// Drop the table, and its revisions table, if they exist.
    pub async fn drop_table(&self) -> Result<()> {
        for sql in self.drop_statements() {
            self.db.execute(sql, self.host()).await?;
        }
        Ok(())
    }

    pub fn insert_statement(&self, values: &Row, conflict: &Conflict) -> Result<String> {
        let (columns, exprs) = self.encode_row(values)?;

        let on_conflict = match conflict {
            Conflict::Error => OnConflict::Error,
            Conflict::Ignore => OnConflict::Ignore,
            Conflict::Replace => {
                let fields: Vec<_> = columns
                    .iter()
                    .filter(|column| Some(column.as_str()) != self.key())
                    .cloned()
                    .collect();
                if fields.is_empty() {
                    OnConflict::Ignore
                } else {
                    OnConflict::Update(fields)
                }
            }
            Conflict::Update(fields) if fields.is_empty() => OnConflict::Ignore,
            Conflict::Update(fields) => {
                self.check_columns(fields)?;
                OnConflict::Update(fields.clone())
            }
        };

        Ok(self.serializer.serialize(
            &Insert {
                into: self.qualified(),
                columns,
                values: exprs,
                on_conflict,
            }
            .into(),
        ))
    }

    /// Insert one row.
    ///
    /// Returns the generated key when the table generates keys, `None` when
    /// the caller supplies them.
    pub async fn insert(&self, values: &Row, conflict: &Conflict) -> Result<Option<Value>> {
        let supplied = self
            .key()
            .and_then(|key| values.get(key))
            .filter(|key| !key.is_null())
            .cloned();

        match (&self.spec.auto_key, supplied) {
            (AutoKey::None, _) => {
                let sql = self.insert_statement(values, conflict)?;
                self.db.execute(sql, self.host()).await?;
                Ok(None)
            }
            (_, Some(key)) => {
                let sql = self.insert_statement(values, conflict)?;
                self.db.execute(sql, self.host()).await?;
                Ok(Some(key))
            }
            (AutoKey::Increment, None) => {
                let sql = self.insert_statement(values, conflict)?;
                Ok(Some(self.db.insert(sql, self.host()).await?))
            }
            (AutoKey::Expression(expr), None) => {
                self.insert_with_expression(values, conflict, expr)
                    .await
                    .map(Some)
            }
        }
    }

    async fn insert_with_expression(
        &self,
        values: &Row,
        conflict: &Conflict,
        expr: &str,
    ) -> Result<Value> {
        let Some(key) = self.key() else {
            return Err(Error::invalid_schema(format!(
                "table `{}` generates keys but has no key column",
                self.name()
            )));
        };

        match self.flavor() {
            Flavor::Mysql => {
                let mut values = values.clone();
                values.insert(key.to_string(), crate::Literal::new(AUTO_PRIMARY).into());

                let statements = vec![
                    format!("SET {AUTO_PRIMARY} = {expr}"),
                    self.insert_statement(&values, conflict)?,
                    format!("SELECT {AUTO_PRIMARY}"),
                ];
                let rows = self
                    .db
                    .exec(self.host(), Operation::Session(statements))
                    .await?
                    .into_values()?;

                first_value(rows)
            }
            Flavor::Sqlite => {
                let rows = self
                    .db
                    .query(format!("SELECT {expr}"), self.host())
                    .await?;
                let generated = first_value(rows)?;

                // SQLite has no session variables; substitute the key itself
                let mut values: Row = values
                    .iter()
                    .map(|(name, value)| {
                        let value = match value {
                            Value::Literal(lit) if lit.as_str() == AUTO_PRIMARY => {
                                generated.clone()
                            }
                            value => value.clone(),
                        };
                        (name.clone(), value)
                    })
                    .collect();
                values.insert(key.to_string(), generated.clone());

                let sql = self.insert_statement(&values, conflict)?;
                self.db.execute(sql, self.host()).await?;
                Ok(generated)
            }
        }
    }

    pub fn update_statement(&self, values: &Row, filter: &Row) -> Result<String> {
        if values.is_empty() {
            return Err(err!("update of table `{}` sets no columns", self.name()));
        }

        let (columns, exprs) = self.encode_row(values)?;
        Ok(self.serializer.serialize(
            &Update {
                table: self.qualified(),
                assignments: columns.into_iter().zip(exprs).collect(),
                filter: filter::to_expr(self, filter)?,
            }
            .into(),
        ))
    }

    /// Update the rows matching `filter`, returning how many changed.
    pub async fn update(&self, values: &Row, filter: &Row) -> Result<u64> {
        if values.is_empty() {
            return Ok(0);
        }
        let sql = self.update_statement(values, filter)?;
        self.db.execute(sql, self.host()).await
    }

    pub fn delete_statement(&self, filter: &Row) -> Result<String> {
        Ok(self.serializer.serialize(
            &Delete {
                from: self.qualified(),
                filter: filter::to_expr(self, filter)?,
            }
            .into(),
        ))
    }

    /// Delete the rows matching `filter`, returning how many went away.
    pub async fn delete(&self, filter: &Row) -> Result<u64> {
        let sql = self.delete_statement(filter)?;
        self.db.execute(sql, self.host()).await
    }

    pub fn select_statement(&self, query: &Query) -> Result<String> {
        self.check_columns(&query.fields)?;
        self.check_columns(&query.group_by)?;
        for (column, _) in &query.order_by {
            self.check_column(column)?;
        }

        let mut select = Select::new(self.qualified());
        select.distinct = query.distinct;
        select.fields = query.fields.clone();
        select.filter = filter::to_expr(self, &query.filter)?;
        select.group_by = query.group_by.clone();
        select.order_by = query.order_by.clone();
        select.limit = query.limit;

        Ok(self.serializer.serialize(&select.into()))
    }

    /// Run a select, returning rows decoded by column.
    pub async fn select(&self, query: &Query) -> Result<Vec<Row>> {
        let sql = self.select_statement(query)?;
        let rows = self.db.query(sql, self.host()).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(name, raw)| {
                        let value = match self.columns.get(&name) {
                            Some(column) => codec::decode(&column.leaf, raw),
                            None => raw,
                        };
                        (name, value)
                    })
                    .collect()
            })
            .collect())
    }

    /// The insert recording one revision of the row keyed by `key`.
    pub fn revision_statement(&self, key: &Value, items: &Row) -> Result<String> {
        let Some(key_column) = self.revision_key() else {
            return Err(Error::revisions_disabled(self.name()));
        };

        if let Revisions::Required(fields) = &self.spec.revisions {
            if let Some(field) = fields.iter().find(|field| !items.contains_key(*field)) {
                return Err(Error::missing_revision_field(self.name(), field));
            }
        }

        let flavor = self.flavor();
        let items = Value::Map(items.clone()).to_json().to_string();

        Ok(self.serializer.serialize(
            &Insert {
                into: self.revisions_name(),
                columns: vec![key_column.name.clone(), "items".into()],
                values: vec![
                    Expr::value(codec::encode(key_column, key, flavor)?),
                    Expr::value(codec::quote(flavor, &items)),
                ],
                on_conflict: OnConflict::Error,
            }
            .into(),
        ))
    }

    /// Append a revision for the row keyed by `key`.
    pub async fn add_revision(&self, key: &Value, items: &Row) -> Result<()> {
        let sql = self.revision_statement(key, items)?;
        self.db.execute(sql, self.host()).await?;
        Ok(())
    }

    /// A fresh identifier from this table's host.
    pub async fn new_identifier(&self) -> Result<String> {
        self.db.new_identifier(self.host()).await
    }

    /// Move rows parked at `position + offset` back to `position`.
    ///
    /// Rows whose position columns are below `offset` keep their value.
    pub(crate) fn settle_positions_statement(
        &self,
        columns: &[String],
        offset: i64,
        ids: &[Value],
    ) -> Result<String> {
        self.check_columns(columns)?;

        let offset = Expr::value(offset.to_string());
        let assignments = columns
            .iter()
            .map(|column| {
                let col = || Expr::column(column);
                let expr = Expr::Case {
                    when: Box::new(Expr::binary_op(col(), BinaryOp::Ge, offset.clone())),
                    then: Box::new(Expr::binary_op(col(), BinaryOp::Sub, offset.clone())),
                    otherwise: Box::new(col()),
                };
                (column.clone(), expr)
            })
            .collect();

        let mut filter = Row::new();
        filter.insert(self.key().unwrap_or("_id").to_string(), ids.to_vec().into());

        Ok(self.serializer.serialize(
            &Update {
                table: self.qualified(),
                assignments,
                filter: filter::to_expr(self, &filter)?,
            }
            .into(),
        ))
    }

    fn encode_row(&self, values: &Row) -> Result<(Vec<String>, Vec<Expr>)> {
        let flavor = self.flavor();
        let mut columns = Vec::with_capacity(values.len());
        let mut exprs = Vec::with_capacity(values.len());

        for (name, value) in values {
            let column = self.check_column(name)?;
            columns.push(name.clone());
            exprs.push(Expr::value(codec::encode(column, value, flavor)?));
        }

        Ok((columns, exprs))
    }

    fn check_column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| err!("table `{}` has no column `{name}`", self.name()))
    }

    fn check_columns(&self, names: &[String]) -> Result<()> {
        for name in names {
            self.check_column(name)?;
        }
        Ok(())
    }

    fn revision_key(&self) -> Option<&Column> {
        if !self.spec.revisions_enabled() {
            return None;
        }
        self.key().and_then(|key| self.columns.get(key))
    }

    fn qualified(&self) -> Name {
        Name::qualified(&self.spec.db, &self.spec.name)
    }

    fn revisions_name(&self) -> Name {
        Name::qualified(&self.spec.db, format!("{}_revisions", self.spec.name))
    }
}

fn first_value(rows: Vec<Row>) -> Result<Value> {
    rows.into_iter()
        .next()
        .and_then(|row| row.into_iter().next())
        .map(|(_, value)| value)
        .ok_or_else(|| Error::invalid_result("key expression returned no value"))
}
