use gameconfig::{
    GameConfigError, MemberKind, MemberValue, SchemaRegistry, TableContent,
    data::{MapEntry, Table, TableKind},
};
use schemars::JsonSchema;

#[allow(dead_code, non_snake_case)]
#[derive(JsonSchema)]
struct Weapon {
    Id: i32,
    Name: String,
    Score: f32,
}

#[allow(dead_code, non_snake_case)]
#[derive(JsonSchema)]
struct Monster {
    Level: i64,
    Boss: bool,
    Speed: f64,
    Drops: Vec<String>,
}

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register::<Weapon>().unwrap();
    registry.register::<Monster>().unwrap();
    registry
}

fn weapon_table(records: &[&str]) -> Table {
    let mut table = Table::list("Weapons");
    table.schema = Some("Weapon".into());
    table.list = records.iter().map(|s| s.to_string()).collect();
    table
}

#[test]
fn test_introspection_counts_supported_members_only() {
    let registry = registry();
    let weapon = registry.introspect(&"Weapon".into()).unwrap();
    let kinds: Vec<_> = weapon.iter().map(|m| (m.name.as_str(), m.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            ("Id", MemberKind::Int32),
            ("Name", MemberKind::String),
            ("Score", MemberKind::Float32),
        ]
    );

    let monster = registry.introspect(&"Monster".into()).unwrap();
    assert_eq!(monster.len(), 3);
    assert_eq!(monster, registry.introspect(&"Monster".into()).unwrap());
}

#[test]
fn test_bind_then_edit_score() {
    let registry = registry();
    let mut table = weapon_table(&[r#"{"Id":1,"Name":"Sword","Score":3.5}"#]);
    let mut content = TableContent::open(&table, &registry).unwrap();
    let mut form = content.form(0).unwrap();

    assert_eq!(form.field("Id").unwrap().value(), &MemberValue::Int32(1));
    assert_eq!(
        form.field("Name").unwrap().value(),
        &MemberValue::String("Sword".into())
    );
    assert_eq!(form.field("Score").unwrap().value(), &MemberValue::Float32(3.5));

    form.edit("Score", MemberValue::Float32(4.0)).unwrap();
    let record = content.record(0).unwrap().unwrap();
    {
        let record = record.borrow();
        let members = registry.introspect(&"Weapon".into()).unwrap();
        assert_eq!(members[2].read(&record).unwrap(), MemberValue::Float32(4.0));
        assert_eq!(members[0].read(&record).unwrap(), MemberValue::Int32(1));
        assert_eq!(
            members[1].read(&record).unwrap(),
            MemberValue::String("Sword".into())
        );
    }

    content.commit(&mut table).unwrap();
    assert_eq!(table.list[0], r#"{"Id":1,"Name":"Sword","Score":4.0}"#);
}

#[test]
fn test_stored_values_survive_bind_and_save() {
    let registry = registry();
    let stored = r#"{"Id":-2147483648,"Name":"ünïcødé","Score":0.1}"#;
    let mut table = weapon_table(&[stored]);
    let mut content = TableContent::open(&table, &registry).unwrap();
    content.form(0).unwrap();
    content.commit(&mut table).unwrap();
    assert_eq!(table.list[0], stored);
}

#[test]
fn test_switching_kind_hides_then_restores_list() {
    let registry = registry();
    let mut table = weapon_table(&[r#"{"Id":1,"Name":"Sword","Score":3.5}"#]);
    let original = table.list.clone();

    table.kind = TableKind::Map;
    let content = TableContent::open(&table, &registry).unwrap();
    assert!(content.is_empty());
    assert_eq!(table.list, original);

    table.kind = TableKind::List;
    let content = TableContent::open(&table, &registry).unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(table.list, original);
}

#[test]
fn test_one_bad_record_fails_whole_table() {
    let registry = registry();
    let table = weapon_table(&[
        r#"{"Id":1,"Name":"Sword","Score":3.5}"#,
        r#"{"Id":2,"Name":"Axe""#,
        r#"{"Id":3,"Name":"Bow","Score":1.0}"#,
    ]);
    match TableContent::open(&table, &registry) {
        Err(GameConfigError::ParseError { table, record, .. }) => {
            assert_eq!(table, "Weapons");
            assert_eq!(record, "#1");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_schema_mismatch_in_storage_is_parse_error() {
    let registry = registry();
    let table = weapon_table(&[r#"{"Id":"one"}"#]);
    assert!(matches!(
        TableContent::open(&table, &registry),
        Err(GameConfigError::ParseError { .. })
    ));
}

#[test]
fn test_tables_bind_their_own_schema() {
    let registry = registry();
    let weapons = weapon_table(&[r#"{"Id":1,"Name":"Sword","Score":3.5}"#]);
    let mut monsters = Table::map("Monsters");
    monsters.schema = Some("Monster".into());
    monsters.map.push(MapEntry {
        key: "slime".into(),
        value: r#"{"Level":3,"Boss":false,"Speed":1.25,"Drops":["gel"]}"#.into(),
    });

    let mut weapon_content = TableContent::open(&weapons, &registry).unwrap();
    let mut monster_content = TableContent::open(&monsters, &registry).unwrap();
    let weapon_form = weapon_content.form(0).unwrap();
    let mut monster_form = monster_content.form(0).unwrap();

    let labels = |form: &gameconfig::RecordForm| {
        form.fields()
            .iter()
            .map(|f| (f.label().to_string(), f.kind()))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        labels(&weapon_form),
        vec![
            ("Id".to_string(), MemberKind::Int32),
            ("Name".to_string(), MemberKind::String),
            ("Score".to_string(), MemberKind::Float32),
        ]
    );
    assert_eq!(
        labels(&monster_form),
        vec![
            ("Level".to_string(), MemberKind::Int64),
            ("Boss".to_string(), MemberKind::Bool),
            ("Speed".to_string(), MemberKind::Float64),
        ]
    );
    assert_eq!(monster_form.title(), "slime");

    monster_form.edit_text("Boss", "true").unwrap();
    let mut out = monsters.clone();
    monster_content.commit(&mut out).unwrap();
    assert_eq!(
        out.map[0].value,
        r#"{"Level":3,"Boss":true,"Speed":1.25,"Drops":["gel"]}"#
    );
}
