use crate::app_env::test::TEST_DB_URL;
use crate::db;
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use tokio::runtime::Runtime;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A throwaway database cloned from the server's "postgres" database
struct TestDatabase {
    db_name: String,
}

impl TestDatabase {
    async fn create(conn: &mut PgConnection) -> Result<Self, sqlx::Error> {
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("test_db_{db_id}");

        sqlx::query("ALTER DATABASE postgres WITH is_template TRUE")
            .execute(&mut *conn)
            .await?;
        sqlx::query(&format!("CREATE DATABASE {db_name} TEMPLATE postgres"))
            .execute(&mut *conn)
            .await?;

        Ok(Self { db_name })
    }

    async fn drop_database(self, conn: &mut PgConnection) {
        let result = sqlx::query(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.db_name))
            .execute(conn)
            .await;
        if let Err(error) = result {
            println!(
                "Warning: failed to drop test database {}, remove it manually. Error: {error}",
                self.db_name
            );
        }
    }
}

/// Runs `test_fn` against a freshly migrated temporary database, then drops the database.
///
/// Expects that the TEST_DB_URL environment variable holds a postgres URL without a database name
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()>,
    F: FnOnce(PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let base_url = env::var(TEST_DB_URL).unwrap_or_else(|_| {
            panic!("{TEST_DB_URL} must hold the base postgres connection string")
        });
        let mut admin_conn = PgConnection::connect(&base_url)
            .await
            .expect("Could not create initial connection to provision the test database");
        let test_db = TestDatabase::create(&mut admin_conn)
            .await
            .expect("Failed to create the test database");

        let pool = db::connect_sqlx(&format!("{base_url}/{}", test_db.db_name))
            .await
            .expect("Failed to connect to the test database");
        db::migrate(&pool)
            .await
            .expect("Failed to migrate the test database");

        test_fn(pool.clone()).await;

        pool.close().await;
        test_db.drop_database(&mut admin_conn).await;
        let _ = admin_conn.close().await;
    });
}
