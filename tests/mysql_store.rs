//! Runs against a live MySQL configured through the usual DB_* variables:
//! `cargo test --test mysql_store -- --ignored`

use time::OffsetDateTime;
use useradmin::{
    config::DbConfig,
    db::Database,
    users::{
        repo_types::{NewUser, UserChanges},
        MySqlUserStore, UserStore,
    },
};

async fn store() -> (Database, MySqlUserStore) {
    dotenvy::dotenv().ok();
    let db = Database::open(&DbConfig::from_env())
        .await
        .expect("MySQL reachable via DB_* settings");
    db.migrate().await.expect("migrations apply");
    (db.clone(), MySqlUserStore::new(db))
}

fn unique_email(tag: &str) -> String {
    format!(
        "{tag}-{}-{}@example.com",
        std::process::id(),
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    )
}

fn changes(name: &str, email: &str) -> UserChanges {
    UserChanges {
        name: Some(name.into()),
        email: Some(email.into()),
        age: Some(30),
        updated_at: OffsetDateTime::now_utc(),
    }
}

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn update_and_delete_report_affected_rows() {
    let (db, store) = store().await;
    let email = unique_email("affected");
    let id = store
        .insert(&NewUser {
            name: "Ada".into(),
            email: email.clone(),
            age: None,
        })
        .await
        .expect("insert");

    assert_eq!(store.update(id, &changes("Ada L", &email)).await.unwrap(), 1);
    // same values again still counts thanks to the microsecond updated_at
    assert_eq!(store.update(id, &changes("Ada L", &email)).await.unwrap(), 1);

    let row = store.find(id).await.unwrap().expect("row exists");
    assert_eq!(row.name, "Ada L");
    assert_eq!(row.age, Some(30));
    assert!(row.created_at.is_some());

    assert_eq!(store.delete(id).await.unwrap(), 1);
    assert_eq!(store.delete(id).await.unwrap(), 0);
    assert_eq!(store.update(id, &changes("Gone", &email)).await.unwrap(), 0);
    assert!(store.find(id).await.unwrap().is_none());

    db.close().await;
}

#[tokio::test]
#[ignore = "needs a MySQL server"]
async fn constraint_violations_surface_as_errors() {
    let (db, store) = store().await;
    let email = unique_email("dup");
    let new_user = NewUser {
        name: "Ada".into(),
        email: email.clone(),
        age: None,
    };
    let id = store.insert(&new_user).await.expect("insert");

    assert!(store.insert(&new_user).await.is_err());

    let null_name = UserChanges {
        name: None,
        ..changes("", &email)
    };
    assert!(store.update(id, &null_name).await.is_err());

    store.delete(id).await.unwrap();
    db.close().await;
}
