#![allow(dead_code)]

use paramtree::{Binding, TreeBuilder};
use paramtree_schema::{
    instantiate, FieldDescriptor, FieldType, NumSchema, RecordRef, RecordSchema, SchemaRef, Value,
};

pub struct Schemas {
    pub engine: SchemaRef,
    pub extra: SchemaRef,
    pub ac: SchemaRef,
    pub cruise: SchemaRef,
    pub car: SchemaRef,
    pub vehicles: SchemaRef,
}

pub fn schemas() -> Schemas {
    let engine = RecordSchema::builder("Engine")
        .field("hp", FieldType::float(), Value::Float(100.0))
        .build();
    let extra = RecordSchema::builder("Extra")
        .field("name", FieldType::str(), None)
        .build();
    let ac = RecordSchema::builder("AC")
        .extends(&extra)
        .default("name", "air conditioner")
        .build();
    let cruise = RecordSchema::builder("CruiseControl")
        .extends(&extra)
        .default("name", "cruise control")
        .build();
    let car = RecordSchema::builder("Car")
        .descriptor(
            FieldDescriptor::new("brand", FieldType::str())
                .alias("bla")
                .description("the brand of the car")
                .default("Honda"),
        )
        .descriptor(
            FieldDescriptor::new("keycodes", FieldType::list(FieldType::float()))
                .description("this list has secret key floats")
                .default(Value::list([1.0, 2.0, 3.0])),
        )
        .field("available", FieldType::bool(), Value::Bool(true))
        .field(
            "properties",
            FieldType::dict(FieldType::float()),
            Value::dict([("seats", 1.0), ("sunroof", 1.0)]),
        )
        .field(
            "varproperties",
            FieldType::dict(FieldType::list(FieldType::float())),
            Value::dict([
                ("volume", Value::list([400.0, 450.0])),
                ("height", Value::list([1.0, 1.2])),
            ]),
        )
        .descriptor(
            FieldDescriptor::new("extras", FieldType::list(FieldType::record(&extra)))
                .description("List of the extra options in the car")
                .default(Value::List(vec![])),
        )
        .field("max_speed", FieldType::float(), Value::Float(0.0))
        .field("engine", FieldType::record(&engine), None)
        .descriptor(
            FieldDescriptor::new(
                "price",
                FieldType::Float(NumSchema::new().gt(0.0).lt(100000.0)),
            )
            .description("this field reflects the price of the car in US dollars")
            .default(3000.1),
        )
        .descriptor(
            FieldDescriptor::new("mpg", FieldType::float())
                .description("EPA mileage")
                .default(3000.0),
        )
        .descriptor(
            FieldDescriptor::new("model", FieldType::str())
                .description("test")
                .default("Civic"),
        )
        .build();
    let vehicles = RecordSchema::builder("Vehicles")
        .field("cars", FieldType::list(FieldType::record(&car)), Value::List(vec![]))
        .build();
    Schemas {
        engine,
        extra,
        ac,
        cruise,
        car,
        vehicles,
    }
}

fn defaults(schema: &SchemaRef) -> RecordRef {
    instantiate(schema, Vec::<(String, Value)>::new()).unwrap()
}

/// A car with default fields and a fresh engine.
pub fn car(s: &Schemas) -> RecordRef {
    let engine = defaults(&s.engine);
    instantiate(&s.car, [("engine", Value::Record(engine))]).unwrap()
}

/// Two cars, the first with two extras.
pub fn vehicles(s: &Schemas) -> RecordRef {
    let first = instantiate(
        &s.car,
        [
            ("engine", Value::Record(defaults(&s.engine))),
            (
                "extras",
                Value::List(vec![
                    Value::Record(defaults(&s.ac)),
                    Value::Record(defaults(&s.cruise)),
                ]),
            ),
            ("max_speed", Value::Float(66.0)),
        ],
    )
    .unwrap();
    let second = instantiate(
        &s.car,
        [
            ("engine", Value::Record(defaults(&s.engine))),
            ("bla", Value::from("Ford")),
            ("model", Value::from("Focus")),
            ("keycodes", Value::list([1.0, 2.0])),
            ("max_speed", Value::Int(33)),
            ("available", Value::Bool(false)),
        ],
    )
    .unwrap();
    instantiate(
        &s.vehicles,
        [(
            "cars",
            Value::List(vec![Value::Record(first), Value::Record(second)]),
        )],
    )
    .unwrap()
}

pub fn bind(record: &RecordRef) -> Binding {
    Binding::new(TreeBuilder::new(), Value::Record(record.clone())).unwrap()
}

/// Serialized state of a record, for before/after comparisons.
pub fn snapshot(record: &RecordRef) -> String {
    Value::Record(record.clone()).to_json().to_string()
}
