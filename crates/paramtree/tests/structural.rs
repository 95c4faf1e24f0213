mod common;

use paramtree::TreeError;
use paramtree_path::PathStep;
use paramtree_schema::{instantiate, ErrorCode, FieldType, RecordSchema, Value};

use common::{bind, car, schemas, snapshot, vehicles};

#[test]
fn test_insert_list_element_shifts_addressing() {
    let s = schemas();
    let record = car(&s);
    let mut binding = bind(&record);
    let keycodes = binding.tree().find("/keycodes").unwrap();
    let old_second = binding.tree().find("/keycodes/1").unwrap();

    let inserted = binding
        .insert_element(keycodes, PathStep::Index(0), Value::Int(7))
        .unwrap()
        .unwrap();
    assert_eq!(
        record.borrow().get("keycodes"),
        Some(&Value::list([7.0, 1.0, 2.0, 3.0]))
    );
    assert_eq!(binding.tree().leaf(inserted).unwrap().value, Value::Float(7.0));
    assert_eq!(binding.tree().node(old_second).unwrap().name, "keycodes[2]");
    assert_eq!(
        binding.tree().path_of(old_second).unwrap().to_pointer(),
        "/keycodes/2"
    );

    // The node that displayed 2.0 still edits 2.0, now at index 2.
    binding.edit(old_second, "20").unwrap();
    assert_eq!(
        record.borrow().get("keycodes"),
        Some(&Value::list([7.0, 1.0, 20.0, 3.0]))
    );
}

#[test]
fn test_remove_list_element_shifts_addressing() {
    let s = schemas();
    let record = car(&s);
    let mut binding = bind(&record);
    let first = binding.tree().find("/keycodes/0").unwrap();
    let last = binding.tree().find("/keycodes/2").unwrap();

    let removed = binding.remove_element(first).unwrap();
    assert_eq!(removed, Value::Float(1.0));
    assert_eq!(record.borrow().get("keycodes"), Some(&Value::list([2.0, 3.0])));

    let err = binding.tree().node(first).unwrap_err();
    assert!(matches!(err, TreeError::StructuralLookup(_)));

    binding.edit(last, "30").unwrap();
    assert_eq!(record.borrow().get("keycodes"), Some(&Value::list([2.0, 30.0])));
    assert_eq!(binding.tree().node(last).unwrap().name, "keycodes[1]");

    // Removed ids stay dead after later inserts.
    let keycodes = binding.tree().find("/keycodes").unwrap();
    let fresh = binding
        .insert_element(keycodes, PathStep::Index(0), Value::Float(1.0))
        .unwrap()
        .unwrap();
    assert_ne!(fresh, first);
    assert!(binding.tree().node(first).is_err());
}

#[test]
fn test_insert_dict_entry() {
    let s = schemas();
    let record = car(&s);
    let mut binding = bind(&record);
    let properties = binding.tree().find("/properties").unwrap();

    let doors = binding
        .insert_element(properties, PathStep::Key("doors".into()), Value::Float(5.0))
        .unwrap()
        .unwrap();
    assert_eq!(binding.tree().node(doors).unwrap().name, "properties[doors]");
    assert_eq!(binding.tree().find("/properties/doors").unwrap(), doors);

    let err = binding
        .insert_element(properties, PathStep::Key("doors".into()), Value::Float(1.0))
        .unwrap_err();
    assert_eq!(err, TreeError::KeyExists("doors".into()));

    let seats = binding.tree().find("/properties/seats").unwrap();
    binding.remove_element(seats).unwrap();
    binding.edit(doors, "4").unwrap();
    assert_eq!(
        record.borrow().get("properties"),
        Some(&Value::dict([("sunroof", 1.0), ("doors", 4.0)]))
    );
}

#[test]
fn test_rejected_insert_changes_nothing() {
    let s = schemas();
    let record = car(&s);
    let mut binding = bind(&record);
    let keycodes = binding.tree().find("/keycodes").unwrap();
    let nodes = binding.tree().len();
    let before = snapshot(&record);

    let err = binding
        .insert_element(keycodes, PathStep::Index(1), Value::from("seven"))
        .unwrap_err();
    assert_eq!(err.validation_error().unwrap().code, ErrorCode::Num);
    assert_eq!(snapshot(&record), before);
    assert_eq!(binding.tree().len(), nodes);
    assert_eq!(binding.tree().node(keycodes).unwrap().children.len(), 3);
}

#[test]
fn test_bounded_list_rejects_removal() {
    let schema = RecordSchema::builder("Pair")
        .field(
            "xy",
            FieldType::List {
                item: Box::new(FieldType::float()),
                min: Some(2),
                max: Some(2),
            },
            Value::list([0.0, 0.0]),
        )
        .build();
    let record = instantiate(&schema, Vec::<(String, Value)>::new()).unwrap();
    let mut binding = bind(&record);
    let x = binding.tree().find("/xy/0").unwrap();

    let err = binding.remove_element(x).unwrap_err();
    assert_eq!(err.validation_error().unwrap().code, ErrorCode::ArrLen);
    assert!(binding.tree().node(x).is_ok());
    assert_eq!(record.borrow().get("xy"), Some(&Value::list([0.0, 0.0])));
}

#[test]
fn test_insert_record_into_list() {
    let s = schemas();
    let record = vehicles(&s);
    let mut binding = bind(&record);
    let extras = binding.tree().find("/cars/1/extras").unwrap();
    let ac = instantiate(&s.ac, Vec::<(String, Value)>::new()).unwrap();

    let node = binding
        .insert_element(extras, PathStep::Index(0), Value::Record(ac.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(binding.tree().node(node).unwrap().typehint, "Model[AC]");

    let name = binding.tree().find("/cars/1/extras/0/name").unwrap();
    binding.edit(name, "climate control").unwrap();
    assert_eq!(ac.borrow().get("name"), Some(&Value::from("climate control")));

    let engine = instantiate(&s.engine, Vec::<(String, Value)>::new()).unwrap();
    let err = binding
        .insert_element(extras, PathStep::Index(0), Value::Record(engine))
        .unwrap_err();
    assert_eq!(err.validation_error().unwrap().code, ErrorCode::Record);
}

#[test]
fn test_structural_edit_on_wrong_node() {
    let s = schemas();
    let record = car(&s);
    let mut binding = bind(&record);
    let price = binding.tree().find("/price").unwrap();
    let keycodes = binding.tree().find("/keycodes").unwrap();

    assert!(matches!(
        binding.insert_element(price, PathStep::Index(0), Value::Float(1.0)),
        Err(TreeError::NotAContainer(_))
    ));
    assert!(matches!(
        binding.remove_element(price),
        Err(TreeError::NotAContainer(_))
    ));
    assert!(matches!(
        binding.insert_element(keycodes, PathStep::Key("a".into()), Value::Float(1.0)),
        Err(TreeError::StructuralLookup(_))
    ));
    assert!(matches!(
        binding.insert_element(keycodes, PathStep::Index(9), Value::Float(1.0)),
        Err(TreeError::StructuralLookup(_))
    ));
}

#[test]
fn test_schemaless_root_list() {
    let mut binding = paramtree::Binding::new(
        paramtree::TreeBuilder::new(),
        Value::list([1.0, 2.0]),
    )
    .unwrap();
    let root = binding.tree().root();
    assert!(binding.tree().nearest_boundary(root).is_none());

    binding
        .insert_element(root, PathStep::Index(2), Value::from("three"))
        .unwrap();
    let third = binding.tree().find("/2").unwrap();
    assert_eq!(binding.tree().node(third).unwrap().name, "Root[2]");
    binding.edit(third, "drei").unwrap();
    assert_eq!(
        binding.value(),
        Value::List(vec![Value::Float(1.0), Value::Float(2.0), Value::from("drei")])
    );
}
