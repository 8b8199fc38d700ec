use magazine_subscriptions::{
    authentication::hash_password,
    configuration::{get_configuration, DatabaseSettings},
    startup::{get_connection_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::SocketAddr;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber).expect("Failed to init subscriber");
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber).expect("Failed to init subscriber");
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";
static FAILED_TO_READ_BODY: &str = "Failed to read response body";

pub struct TestApp {
    pub address: SocketAddr,
    pub db_pool: PgPool,
    pub test_user: TestUser,
    client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Failed to read configuration");
        config.database.database_name = Uuid::new_v4().to_string();
        config.application.port = 0;

        let db_pool = configure_database(&config.database).await;

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = app.local_addr();

        tokio::spawn(app.run_until_stopped());

        let mut test_user = TestUser::generate();
        test_user.store(&db_pool).await;

        Self {
            address,
            db_pool,
            test_user,
            client: Client::new(),
        }
    }

    pub async fn get_health_check(&self) -> Response {
        send(self.client.get(self.url("/health_check"))).await
    }

    pub async fn post_register<Body: Serialize>(&self, body: &Body) -> Response {
        send(self.client.post(self.url("/users/register")).json(body)).await
    }

    pub async fn post_login<Body: Serialize>(&self, body: &Body) -> Response {
        send(self.client.post(self.url("/users/login")).json(body)).await
    }

    pub async fn post_refresh(&self, token: &str) -> Response {
        send(
            self.client
                .post(self.url("/users/token/refresh"))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn get_profile(&self, token: &str) -> Response {
        send(self.client.get(self.url("/users/me")).bearer_auth(token)).await
    }

    pub async fn put_password<Body: Serialize>(&self, token: &str, body: &Body) -> Response {
        send(
            self.client
                .put(self.url("/users/me/password"))
                .bearer_auth(token)
                .json(body),
        )
        .await
    }

    pub async fn delete_user(&self, token: &str, username: &str) -> Response {
        send(
            self.client
                .delete(self.url(&format!("/users/deactivate/{username}")))
                .bearer_auth(token),
        )
        .await
    }

    /// Logs the test user in and returns the token pair.
    pub async fn login_test_user(&self) -> Value {
        let response = self
            .post_login(&json!({
                "username": &self.test_user.username,
                "password": self.test_user.password.expose_secret(),
            }))
            .await;
        assert_eq!(response.status().as_u16(), 200);

        response.json().await.expect(FAILED_TO_READ_BODY)
    }

    pub async fn access_token(&self) -> String {
        let tokens = self.login_test_user().await;
        tokens["access_token"]
            .as_str()
            .expect("Access token missing")
            .to_string()
    }

    pub async fn post_magazine<Body: Serialize>(&self, body: &Body) -> Response {
        send(self.client.post(self.url("/magazines")).json(body)).await
    }

    pub async fn post_plan<Body: Serialize>(&self, body: &Body) -> Response {
        send(self.client.post(self.url("/plans")).json(body)).await
    }

    pub async fn get(&self, path: &str) -> Response {
        send(self.client.get(self.url(path))).await
    }

    pub async fn put<Body: Serialize>(&self, path: &str, body: &Body) -> Response {
        send(self.client.put(self.url(path)).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Response {
        send(self.client.delete(self.url(path))).await
    }

    pub async fn post_subscription<Body: Serialize>(&self, body: &Body) -> Response {
        send(self.client.post(self.url("/subscriptions")).json(body)).await
    }

    pub async fn get_subscriptions(&self, token: &str, query: &str) -> Response {
        send(
            self.client
                .get(self.url(&format!("/subscriptions{query}")))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn get_subscription(&self, token: &str, id: i64) -> Response {
        send(
            self.client
                .get(self.url(&format!("/subscriptions/{id}")))
                .bearer_auth(token),
        )
        .await
    }

    pub async fn put_subscription<Body: Serialize>(
        &self,
        token: &str,
        id: i64,
        body: &Body,
    ) -> Response {
        send(
            self.client
                .put(self.url(&format!("/subscriptions/{id}")))
                .bearer_auth(token)
                .json(body),
        )
        .await
    }

    pub async fn delete_subscription(&self, token: &str, id: i64) -> Response {
        send(
            self.client
                .delete(self.url(&format!("/subscriptions/{id}")))
                .bearer_auth(token),
        )
        .await
    }

    /// Creates a magazine priced at `base_price` and returns its id.
    pub async fn create_magazine(&self, base_price: f64) -> i64 {
        let response = self
            .post_magazine(&json!({
                "name": format!("Magazine {}", Uuid::new_v4()),
                "description": "Monthly",
                "base_price": base_price,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);

        id_of(response).await
    }

    /// Creates a plan and returns its id.
    pub async fn create_plan(&self, renewal_period: i32, discount: f64) -> i64 {
        let response = self
            .post_plan(&json!({
                "title": format!("Plan {}", Uuid::new_v4()),
                "description": "Standard",
                "renewal_period": renewal_period,
                "tier": 1,
                "discount": discount,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);

        id_of(response).await
    }

    /// Subscribes the test user and returns the response body.
    pub async fn subscribe_test_user(&self, magazine_id: i64, plan_id: i64) -> Value {
        let response = self
            .post_subscription(&json!({
                "user_id": self.test_user.user_id,
                "magazine_id": magazine_id,
                "plan_id": plan_id,
                "renewal_date": "2030-01-01",
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);

        response.json().await.expect(FAILED_TO_READ_BODY)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

pub struct TestUser {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
}

impl TestUser {
    pub fn generate() -> Self {
        let username = Uuid::new_v4().to_string();
        Self {
            user_id: 0,
            email: format!("{username}@example.com"),
            username,
            password: Secret::new(Uuid::new_v4().to_string()),
        }
    }

    /// Inserts the user and records its id.
    pub async fn store(&mut self, db_pool: &PgPool) {
        let password_hash = hash_password(self.password.clone())
            .await
            .expect("Failed to hash password");

        let (user_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&self.username)
        .bind(&self.email)
        .bind(password_hash.expose_secret())
        .fetch_one(db_pool)
        .await
        .expect("Failed to store test user");

        self.user_id = user_id;
    }
}

pub async fn id_of(response: Response) -> i64 {
    let body: Value = response.json().await.expect(FAILED_TO_READ_BODY);
    body["id"].as_i64().expect("Response body has no id")
}

pub async fn detail_of(response: Response) -> String {
    let body: Value = response.json().await.expect(FAILED_TO_READ_BODY);
    body["detail"]
        .as_str()
        .expect("Response body has no detail")
        .to_string()
}

async fn send(request: RequestBuilder) -> Response {
    request.send().await.expect(FAILED_TO_EXECUTE_REQUEST)
}

async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect_with(&config.without_db())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database");

    let db_pool = get_connection_pool(config);

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to migrate database");

    db_pool
}
