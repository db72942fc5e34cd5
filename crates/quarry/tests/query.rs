mod support;
use support::StubConnection;

use quarry::{Field, Mapped, Mapper, Result, Value, WireType};

use pretty_assertions::assert_eq;
use tokio_stream::StreamExt;

#[derive(Debug, Default, PartialEq, Mapped)]
struct User {
    user_id: i64,

    name: String,

    #[column("email_address")]
    email: Option<String>,

    #[skip]
    display: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Field)]
#[repr(i16)]
enum Status {
    #[default]
    Active = 1,
    Suspended = 2,
}

#[derive(Debug, Default, PartialEq, Mapped)]
struct Account {
    id: i32,
    status: Status,
    balance: Option<f64>,
}

fn mapper() -> Mapper {
    Mapper::builder()
        .register::<User>()
        .register::<Account>()
        .register_field::<Status>()
        .build()
}

fn users() -> StubConnection {
    StubConnection::new()
        .columns(&[
            ("UserId", WireType::I64),
            ("Name", WireType::String),
            ("email_address", WireType::String),
        ])
        .row(vec![Value::I64(1), Value::from("ann"), Value::from("ann@example.com")])
        .row(vec![Value::I64(2), Value::from("bob"), Value::Null])
        .row(vec![Value::I64(3), Value::from("cy"), Value::from("cy@example.com")])
}

#[tokio::test]
async fn query_list_maps_rows_in_order() -> Result<()> {
    let mapper = mapper();
    let mut conn = users();
    let log = conn.log();

    let users: Vec<User> = mapper.query_list(&mut conn, "select * from users").await?;

    assert_eq!(
        users,
        [
            User {
                user_id: 1,
                name: "ann".into(),
                email: Some("ann@example.com".into()),
                display: String::new(),
            },
            User {
                user_id: 2,
                name: "bob".into(),
                email: None,
                display: String::new(),
            },
            User {
                user_id: 3,
                name: "cy".into(),
                email: Some("cy@example.com".into()),
                display: String::new(),
            },
        ]
    );

    assert_eq!(log.opens(), 1);
    assert_eq!(log.closes(), 1);
    assert_eq!(mapper.stats().binders, 1);
    Ok(())
}

#[tokio::test]
async fn zero_rows_builds_no_binder() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new().columns(&[("UserId", WireType::I64)]);
    let log = conn.log();

    let users: Vec<User> = mapper.query_list(&mut conn, "select * from users").await?;

    assert!(users.is_empty());
    assert_eq!(mapper.stats().binders, 0);
    assert_eq!(log.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn binder_is_reused_for_the_same_shape() -> Result<()> {
    let mapper = mapper();

    for _ in 0..3 {
        let _: Vec<User> = mapper.query_list(&mut users(), "select * from users").await?;
    }
    assert_eq!(mapper.stats().binders, 1);

    let mut narrower = StubConnection::new()
        .columns(&[("UserId", WireType::I64)])
        .row(vec![Value::I64(9)]);
    let _: Vec<User> = mapper.query_list(&mut narrower, "select id from users").await?;
    assert_eq!(mapper.stats().binders, 2);
    Ok(())
}

#[tokio::test]
async fn columns_select_properties_loosely() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new()
        .columns(&[
            ("user_id", WireType::I32),
            ("EMAIL_ADDRESS", WireType::String),
            ("last_login", WireType::Timestamp),
            ("display", WireType::String),
        ])
        .row(vec![
            Value::I32(7),
            Value::from("neo@example.com"),
            Value::Null,
            Value::from("ignored"),
        ]);

    let user: User = mapper.query_first(&mut conn, "select ...").await?;

    assert_eq!(user.user_id, 7);
    assert_eq!(user.email.as_deref(), Some("neo@example.com"));
    assert_eq!(user.display, "");
    Ok(())
}

#[tokio::test]
async fn enum_and_nullable_columns() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new()
        .columns(&[
            ("id", WireType::I64),
            ("status", WireType::I64),
            ("balance", WireType::F64),
        ])
        .row(vec![Value::I64(1), Value::I64(2), Value::F64(10.5)])
        .row(vec![Value::I64(2), Value::from("active"), Value::Null])
        .row(vec![Value::I64(3), Value::Null, Value::Null]);

    let accounts: Vec<Account> = mapper.query_list(&mut conn, "select * from accounts").await?;

    assert_eq!(
        accounts,
        [
            Account {
                id: 1,
                status: Status::Suspended,
                balance: Some(10.5),
            },
            Account {
                id: 2,
                status: Status::Active,
                balance: None,
            },
            Account {
                id: 3,
                status: Status::Active,
                balance: None,
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn null_scalars_become_defaults() -> Result<()> {
    let mapper = mapper();

    macro_rules! check {
        ($ty:ty, $wire:ident) => {{
            let mut conn = StubConnection::new()
                .columns(&[("value", WireType::$wire)])
                .row(vec![Value::Null]);
            let values: Vec<$ty> = mapper.query_list(&mut conn, "select null").await?;
            assert_eq!(values, [<$ty>::default()], "{}", stringify!($ty));
        }};
    }

    check!(bool, Bool);
    check!(i8, I8);
    check!(i16, I16);
    check!(i32, I32);
    check!(i64, I64);
    check!(u8, U8);
    check!(u16, U16);
    check!(u32, U32);
    check!(u64, U64);
    check!(f32, F32);
    check!(f64, F64);
    check!(String, String);
    check!(Vec<u8>, Bytes);
    check!(uuid::Uuid, Uuid);
    check!(chrono::NaiveDate, Date);
    check!(chrono::NaiveDateTime, Timestamp);
    check!(Option<i64>, I64);
    check!(Status, I16);
    Ok(())
}

#[tokio::test]
async fn scalar_columns_are_converted() -> Result<()> {
    let mapper = mapper();
    let mut conn = StubConnection::new()
        .columns(&[("n", WireType::I64)])
        .row(vec![Value::I64(1)])
        .row(vec![Value::I64(2)]);

    let values: Vec<u8> = mapper.query_list(&mut conn, "select n").await?;
    assert_eq!(values, [1, 2]);

    let mut conn = StubConnection::new()
        .columns(&[("n", WireType::String)])
        .row(vec![Value::from("abc")]);
    let err = mapper
        .query_list::<i64>(&mut conn, "select n")
        .await
        .unwrap_err();
    assert!(err.is_unsupported_conversion());
    Ok(())
}

#[tokio::test]
async fn conversion_errors_name_the_property() {
    let mapper = mapper();
    let mut conn = StubConnection::new()
        .columns(&[("UserId", WireType::String)])
        .row(vec![Value::from("not a number")]);
    let log = conn.log();

    let err = mapper
        .query_list::<User>(&mut conn, "select * from users")
        .await
        .unwrap_err();

    assert!(err.is_unsupported_conversion());
    assert!(err
        .to_string()
        .starts_with("column `UserId` -> property `UserId`: "));
    assert_eq!(log.closes(), 1);
}

#[tokio::test]
async fn execute_scalar_defaults_when_empty() -> Result<()> {
    let mapper = mapper();

    let count: i64 = mapper
        .execute_scalar(&mut StubConnection::new(), "select count(*)")
        .await?;
    assert_eq!(count, 0);

    let mut conn = StubConnection::new()
        .columns(&[("count", WireType::I64)])
        .row(vec![Value::I64(42)]);
    let count: i32 = mapper.execute_scalar(&mut conn, "select count(*)").await?;
    assert_eq!(count, 42);
    Ok(())
}

#[tokio::test]
async fn first_and_single() -> Result<()> {
    let mapper = mapper();

    let first: User = mapper.query_first(&mut users(), "select * from users").await?;
    assert_eq!(first.user_id, 1);

    let err = mapper
        .query_first::<User>(&mut StubConnection::new(), "select * from users")
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());

    let none: Option<User> = mapper
        .query_first_optional(&mut StubConnection::new(), "select * from users")
        .await?;
    assert!(none.is_none());

    let err = mapper
        .query_single::<User>(&mut users(), "select * from users")
        .await
        .unwrap_err();
    assert!(err.is_too_many_records());

    let err = mapper
        .query_single::<User>(&mut StubConnection::new(), "select * from users")
        .await
        .unwrap_err();
    assert!(err.is_record_not_found());
    Ok(())
}

#[tokio::test]
async fn first_requests_single_row_when_configured() -> Result<()> {
    let mapper = Mapper::builder()
        .register::<User>()
        .settings(quarry::Settings {
            single_row_for_first: true,
            ..Default::default()
        })
        .build();

    let mut conn = users();
    let log = conn.log();

    let _: User = mapper.query_first(&mut conn, "select * from users").await?;
    let _: Vec<User> = mapper.query_list(&mut conn, "select * from users").await?;

    let behaviors = log.behaviors();
    assert!(behaviors[0].single_row);
    assert!(!behaviors[1].single_row);
    Ok(())
}

#[tokio::test]
async fn unregistered_result_type_fails() {
    #[derive(Debug, Default)]
    struct Unknown;

    let mapper = mapper();
    let mut conn = users();
    let log = conn.log();

    let err = mapper
        .query_list::<Unknown>(&mut conn, "select * from users")
        .await
        .unwrap_err();

    assert!(err.is_unsupported_result_type());
    assert_eq!(log.closes(), 1);
}

#[tokio::test]
async fn query_streams_rows() -> Result<()> {
    let mapper = mapper();
    let mut conn = users();
    let log = conn.log();

    let names: Vec<String> = mapper
        .query::<User>(&mut conn, "select * from users")
        .map(|user| user.map(|user| user.name))
        .collect::<Result<_>>()
        .await?;

    assert_eq!(names, ["ann", "bob", "cy"]);
    assert_eq!(log.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn dropping_a_stream_early_closes_the_connection() -> Result<()> {
    let mapper = mapper();
    let mut conn = users();
    let log = conn.log();

    {
        let rows = mapper.query::<User>(&mut conn, "select * from users");
        tokio::pin!(rows);

        let first = rows.next().await.transpose()?;
        assert_eq!(first.map(|user| user.user_id), Some(1));
        assert_eq!(log.closes(), 0);
    }

    assert_eq!(log.opens(), 1);
    assert_eq!(log.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn cursor_reads_columns_and_maps_rows() -> Result<()> {
    let mapper = mapper();
    let mut conn = users();
    let log = conn.log();

    {
        let mut cursor = mapper.execute_reader(&mut conn, "select * from users").await?;

        assert_eq!(cursor.columns().len(), 3);
        assert!(cursor.read().await?);
        assert_eq!(cursor.get::<i64>(0)?, 1);
        assert_eq!(cursor.get::<Option<String>>(2)?.as_deref(), Some("ann@example.com"));

        let second: Option<User> = cursor.next_as().await?;
        assert_eq!(second.map(|user| user.name).as_deref(), Some("bob"));
        assert_eq!(cursor.get::<String>(2)?, "");
    }

    assert!(log.behaviors()[0].close_connection);
    assert_eq!(log.closes(), 1);
    Ok(())
}

#[tokio::test]
async fn cursor_leaves_caller_opened_connection_open() -> Result<()> {
    let mapper = mapper();
    let mut conn = users().opened();
    let log = conn.log();

    let cursor = mapper.execute_reader(&mut conn, "select * from users").await?;
    drop(cursor);

    assert!(!log.behaviors()[0].close_connection);
    assert_eq!(log.closes(), 0);
    Ok(())
}
