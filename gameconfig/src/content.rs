//! Live view over one table's records.
//!
//! [`TableContent::open`] decodes every stored record of the table's active
//! kind against its schema. Decoding is all-or-nothing: one bad record fails
//! the whole open. Edits made through forms mutate the live records, and
//! [`TableContent::commit`] writes them back into the table's storage.

use crate::{
    data::{MapEntry, Record, RecordHandle, Table, TableKind, record::DecodeError},
    error::{GameConfigError, Result},
    form::RecordForm,
    schema::{MemberDescriptor, SchemaRef, SchemaRegistry},
};

/// A displayed record: its map key (map tables only) and its live instance.
#[derive(Debug, Clone)]
pub struct Row {
    pub key: Option<String>,
    /// `None` until first bound when the stored record was `null`.
    pub record: Option<RecordHandle>,
}

/// Decoded records of one table, ready for forms.
#[derive(Debug)]
pub struct TableContent {
    table: String,
    schema: SchemaRef,
    kind: TableKind,
    members: Vec<MemberDescriptor>,
    rows: Vec<Row>,
}

impl TableContent {
    /// Resolve the table's schema and decode the records of its active kind.
    pub fn open(table: &Table, registry: &SchemaRegistry) -> Result<Self> {
        let schema = table
            .schema
            .clone()
            .ok_or_else(|| GameConfigError::NoSchema {
                table: table.name.clone(),
            })?;
        let members = registry.introspect(&schema)?;

        let parse_error = |record: String, e: DecodeError| GameConfigError::ParseError {
            table: table.name.clone(),
            record,
            reason: e.to_string(),
        };

        let rows = match table.kind {
            TableKind::List => table
                .list
                .iter()
                .enumerate()
                .map(|(index, text)| -> Result<Row> {
                    let record = Record::decode(text, &members)
                        .map_err(|e| parse_error(format!("#{index}"), e))?;
                    Ok(Row {
                        key: None,
                        record: record.map(Record::into_handle),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            TableKind::Map => table
                .map
                .iter()
                .map(|entry| -> Result<Row> {
                    let record = Record::decode(&entry.value, &members)
                        .map_err(|e| parse_error(format!("{:?}", entry.key), e))?;
                    Ok(Row {
                        key: Some(entry.key.clone()),
                        record: record.map(Record::into_handle),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        };

        debug!(
            "opened table `{}` ({:?}, schema `{schema}`): {} records",
            table.name,
            table.kind,
            rows.len()
        );
        Ok(Self {
            table: table.name.clone(),
            schema,
            kind: table.kind,
            members,
            rows,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Kind the content was opened with.
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Live record of a row, if it has been constructed.
    pub fn record(&self, index: usize) -> Result<Option<RecordHandle>> {
        Ok(self.row(index)?.record.clone())
    }

    /// Append a default record to a list table and return its index.
    pub fn append_default(&mut self) -> usize {
        self.push(None)
    }

    /// Append a default record under `key` and return its index.
    ///
    /// The key is not checked against existing entries.
    pub fn append_entry(&mut self, key: impl Into<String>) -> usize {
        self.push(Some(key.into()))
    }

    fn push(&mut self, key: Option<String>) -> usize {
        let record = Record::with_defaults(&self.members).into_handle();
        self.rows.push(Row {
            key,
            record: Some(record),
        });
        self.rows.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Row> {
        self.row(index)?;
        Ok(self.rows.remove(index))
    }

    /// Build a form for a row and bind it to the row's record.
    ///
    /// Forms for the same row share one record instance. A member type
    /// mismatch is logged; the form is still returned with that field disabled.
    pub fn form(&mut self, index: usize) -> Result<RecordForm> {
        let mut form = RecordForm::new(&self.members);
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(GameConfigError::out_of_range("record", index, len))?;

        form.set_title(match &row.key {
            Some(key) => key.clone(),
            None => format!("Item {index}"),
        });
        match form.bind_slot(&mut row.record) {
            Ok(()) => {}
            Err(e @ GameConfigError::MemberTypeMismatch { .. }) => {
                warn!("{}: {e}", form.title());
            }
            Err(e) => return Err(e),
        }
        Ok(form)
    }

    /// Serialize every row back into the table storage of the opened kind.
    ///
    /// Rows never bound to a record are written as `null`. The other kind's
    /// storage is left untouched.
    pub fn commit(&self, table: &mut Table) -> Result<()> {
        let encode = |row: &Row| match &row.record {
            Some(record) => record.borrow().to_json_string(),
            None => "null".to_string(),
        };

        match self.kind {
            TableKind::List => {
                table.list = self.rows.iter().map(encode).collect();
            }
            TableKind::Map => {
                table.map = self
                    .rows
                    .iter()
                    .map(|row| MapEntry {
                        key: row.key.clone().unwrap_or_default(),
                        value: encode(row),
                    })
                    .collect();
            }
        }
        debug!("committed {} records to `{}`", self.rows.len(), table.name);
        Ok(())
    }

    fn row(&self, index: usize) -> Result<&Row> {
        self.rows
            .get(index)
            .ok_or(GameConfigError::out_of_range("record", index, self.rows.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use schemars::JsonSchema;

    use super::*;
    use crate::schema::MemberValue;

    #[allow(dead_code, non_snake_case)]
    #[derive(JsonSchema)]
    struct Weapon {
        Id: i32,
        Name: String,
        Score: f32,
    }

    fn setup() -> (SchemaRegistry, Table) {
        let mut registry = SchemaRegistry::new();
        let schema = registry.register::<Weapon>().unwrap();
        let mut table = Table::list("Weapons");
        table.schema = Some(schema);
        (registry, table)
    }

    #[test]
    fn test_open_requires_schema() {
        let registry = SchemaRegistry::new();
        let table = Table::list("Loose");
        assert!(matches!(
            TableContent::open(&table, &registry),
            Err(GameConfigError::NoSchema { .. })
        ));

        let mut table = table;
        table.schema = Some("Ghost".into());
        assert!(matches!(
            TableContent::open(&table, &registry),
            Err(GameConfigError::SchemaUnresolvable { .. })
        ));
    }

    #[test]
    fn test_forms_share_record() {
        let (registry, mut table) = setup();
        table.list.push(r#"{"Id":1,"Name":"Sword","Score":3.5}"#.into());
        let mut content = TableContent::open(&table, &registry).unwrap();

        let mut a = content.form(0).unwrap();
        let b = content.form(0).unwrap();
        assert_eq!(a.title(), "Item 0");
        assert!(Rc::ptr_eq(a.record().unwrap(), b.record().unwrap()));

        a.edit("Id", MemberValue::Int32(9)).unwrap();
        let fresh = content.form(0).unwrap();
        assert_eq!(fresh.field("Id").unwrap().value(), &MemberValue::Int32(9));
    }

    #[test]
    fn test_append_and_commit() {
        let (registry, mut table) = setup();
        table.list.push("null".into());
        let mut content = TableContent::open(&table, &registry).unwrap();
        assert!(content.record(0).unwrap().is_none());

        let index = content.append_default();
        assert_eq!(index, 1);
        content.commit(&mut table).unwrap();
        assert_eq!(
            table.list,
            vec![
                "null".to_string(),
                r#"{"Id":0,"Name":"","Score":0.0}"#.to_string()
            ]
        );

        content.form(0).unwrap();
        content.remove(1).unwrap();
        content.commit(&mut table).unwrap();
        assert_eq!(table.list, vec![r#"{"Id":0,"Name":"","Score":0.0}"#.to_string()]);
    }

    #[test]
    fn test_map_rows_use_keys() {
        let (registry, mut table) = setup();
        table.kind = TableKind::Map;
        table.map.push(MapEntry {
            key: "sword".into(),
            value: r#"{"Id":1}"#.into(),
        });
        let mut content = TableContent::open(&table, &registry).unwrap();
        content.append_entry("axe");

        let form = content.form(1).unwrap();
        assert_eq!(form.title(), "axe");

        content.commit(&mut table).unwrap();
        assert_eq!(table.map[0].key, "sword");
        assert_eq!(table.map[0].value, r#"{"Id":1,"Name":"","Score":0.0}"#);
        assert_eq!(table.map[1].key, "axe");
        assert!(table.list.is_empty());
    }

    #[test]
    fn test_form_out_of_range() {
        let (registry, table) = setup();
        let mut content = TableContent::open(&table, &registry).unwrap();
        assert!(matches!(
            content.form(0),
            Err(GameConfigError::IndexOutOfRange { what: "record", .. })
        ));
    }
}
