mod support;
use support::StubConnection;

use quarry::{
    Direction, DynamicParameters, Field, Mapped, Mapper, ParamOptions, Parameter, Result,
    Statement, TypeHandler, Value, WireType,
};

use pretty_assertions::assert_eq;
use std::collections::HashMap;

#[derive(Debug, Default, Mapped)]
struct NewOrder {
    customer_id: i64,

    #[column("note", size = 200)]
    comment: Option<String>,

    #[column(type = i64)]
    quantity: u8,

    #[direction(output)]
    order_id: i64,

    #[skip]
    cache_key: String,
}

#[derive(Debug, Default, Mapped)]
struct Lookup {
    name: String,
    active: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Celsius(f64);

impl Field for Celsius {}

struct CelsiusHandler;

impl TypeHandler<Celsius> for CelsiusHandler {
    fn set_value(&self, parameter: &mut Parameter, value: &Celsius) -> Result<()> {
        parameter.value = Value::String(format!("{}C", value.0));
        parameter.wire_type = Some(WireType::String);
        Ok(())
    }

    fn parse(&self, value: Value) -> Result<Celsius> {
        let text = String::from_value(value)?;
        match text.trim_end_matches('C').parse() {
            Ok(degrees) => Ok(Celsius(degrees)),
            Err(err) => Err(quarry::err!("invalid temperature `{text}`: {err}")),
        }
    }
}

#[derive(Debug, Default, Mapped)]
struct Reading {
    sensor: String,
    temperature: Celsius,

    #[direction(input_output)]
    peak: Option<Celsius>,
}

fn mapper() -> Mapper {
    Mapper::builder()
        .register::<NewOrder>()
        .register::<Lookup>()
        .register::<Reading>()
        .type_handler(CelsiusHandler)
        .build()
}

#[tokio::test]
async fn mapped_object_becomes_parameters() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new().affected(1);
    let log = conn.log();

    let mut order = NewOrder {
        customer_id: 5,
        comment: None,
        quantity: 3,
        order_id: 0,
        cache_key: "unused".into(),
    };

    let stmt = Statement::procedure("create_order").bind(&mut order);
    assert_eq!(mapper.execute(&mut conn, stmt).await?, 1);

    let command = log.last_command();
    let names: Vec<_> = command.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["CustomerId", "note", "Quantity", "OrderId"]);

    let note = command.parameter("note").unwrap();
    assert_eq!(note.value, Value::Null);
    assert_eq!(note.size, Some(200));
    assert_eq!(note.wire_type, Some(WireType::String));

    let quantity = command.parameter("Quantity").unwrap();
    assert_eq!(quantity.value, Value::U8(3));
    assert_eq!(quantity.wire_type, Some(WireType::I64));

    let order_id = command.parameter("OrderId").unwrap();
    assert_eq!(order_id.direction, Direction::Output);
    assert_eq!(order_id.value, Value::Null);
    Ok(())
}

#[tokio::test]
async fn output_properties_are_written_back() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new()
        .affected(1)
        .output("OrderId", 981i64)
        .output("CustomerId", 0i64);

    let mut order = NewOrder {
        customer_id: 5,
        ..Default::default()
    };

    mapper
        .execute(&mut conn, Statement::procedure("create_order").bind(&mut order))
        .await?;

    assert_eq!(order.order_id, 981);
    assert_eq!(order.customer_id, 5);
    Ok(())
}

#[tokio::test]
async fn post_process_only_with_output_properties() -> Result<()> {
    let mapper = mapper();

    assert!(mapper.parameter_builder::<NewOrder>()?.has_post_process());
    assert!(!mapper.parameter_builder::<Lookup>()?.has_post_process());
    assert!(mapper.parameter_builder::<DynamicParameters>()?.has_post_process());
    assert!(!mapper
        .parameter_builder::<HashMap<String, Value>>()?
        .has_post_process());

    assert_eq!(mapper.stats().parameter_builders, 4);
    Ok(())
}

#[tokio::test]
async fn dynamic_parameters_round_trip_outputs() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new().output("total", 42i64);
    let log = conn.log();

    let mut params = DynamicParameters::new();
    params
        .add("@region", "emea")
        .add_with(
            "limit",
            10i32,
            ParamOptions {
                size: Some(4),
                ..Default::default()
            },
        )
        .output("total", WireType::I64);

    mapper
        .execute(&mut conn, Statement::procedure("count_orders").bind(&mut params))
        .await?;

    assert_eq!(params.get::<i64>("total")?, 42);
    assert_eq!(params.get::<String>("region")?, "emea");

    let command = log.last_command();
    assert_eq!(command.parameters.len(), 3);
    assert_eq!(command.parameter("limit").unwrap().size, Some(4));
    Ok(())
}

#[tokio::test]
async fn map_parameters() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new();
    let log = conn.log();

    let mut params = HashMap::from([
        ("id".to_string(), Value::I64(4)),
        ("name".to_string(), Value::from("four")),
    ]);

    mapper
        .execute(
            &mut conn,
            Statement::new("update t set name = @name where id = @id").bind(&mut params),
        )
        .await?;

    let command = log.last_command();
    assert_eq!(command.parameter("id").unwrap().value, Value::I64(4));
    assert_eq!(command.parameter("name").unwrap().value, Value::from("four"));
    Ok(())
}

#[tokio::test]
async fn type_handler_binds_and_reads_back() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new().output("Peak", "31.5C");
    let log = conn.log();

    let mut reading = Reading {
        sensor: "roof".into(),
        temperature: Celsius(21.0),
        peak: None,
    };

    mapper
        .execute(&mut conn, Statement::procedure("record").bind(&mut reading))
        .await?;

    let command = log.last_command();
    assert_eq!(
        command.parameter("Temperature").unwrap().value,
        Value::from("21C")
    );
    assert_eq!(reading.peak, Some(Celsius(31.5)));
    Ok(())
}

#[tokio::test]
async fn unregistered_parameter_type_fails() {
    #[derive(Debug, Default)]
    struct Opaque;

    let mapper = mapper();
    let mut conn = StubConnection::new();
    let log = conn.log();
    let mut params = Opaque;

    let err = mapper
        .execute(&mut conn, Statement::new("select 1").bind(&mut params))
        .await
        .unwrap_err();

    assert!(err.is_unsupported_parameter_type());
    assert_eq!(log.opens(), log.closes());
}

#[tokio::test]
async fn unbindable_property_names_the_property() {
    #[derive(Debug, Default)]
    struct Point;
    impl Field for Point {}

    #[derive(Debug, Default, Mapped)]
    struct Shape {
        origin: Point,
    }

    let mapper = Mapper::builder().register::<Shape>().build();
    let err = mapper.parameter_builder::<Shape>().unwrap_err();

    assert!(err.is_unsupported_parameter_type());
    assert!(err.to_string().starts_with("property `Origin` of `"));
}

#[tokio::test]
async fn execute_many_runs_once_per_element() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new().affected(1).output("OrderId", 7i64);
    let log = conn.log();

    let mut orders: Vec<NewOrder> = (1..=3)
        .map(|customer_id| NewOrder {
            customer_id,
            ..Default::default()
        })
        .collect();

    let total = mapper
        .execute_many(&mut conn, Statement::procedure("create_order"), &mut orders)
        .await?;

    assert_eq!(total, 3);
    assert_eq!(log.opens(), 1);
    assert_eq!(log.closes(), 1);

    let customers: Vec<_> = log
        .commands()
        .iter()
        .map(|command| command.parameter("CustomerId").unwrap().value.clone())
        .collect();
    assert_eq!(customers, [Value::I64(1), Value::I64(2), Value::I64(3)]);
    assert!(orders.iter().all(|order| order.order_id == 7));
    Ok(())
}
