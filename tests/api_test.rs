use spotter::accounts::{self, NewUser};
use spotter::config::Config;
use spotter::db;
use spotter::db::models::{Sport, Tag, TagsSports, User};
use spotter::routes;
use spotter::state::AppState;
use spotter::store::EntityStore;
use tempfile::TempDir;

async fn spawn_app() -> (String, EntityStore, TempDir) {
    let tmp = TempDir::new().unwrap();
    let pool = db::create_pool(&tmp.path().join("test.db")).unwrap();
    db::run_migrations(&pool).unwrap();
    let store = EntityStore::new(pool);

    let state = AppState {
        store: store.clone(),
        config: Config::default(),
    };
    let app = routes::router().with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), store, tmp)
}

fn seed_user(store: &EntityStore, email: &str, first_name: &str) -> User {
    accounts::create_user(
        store,
        NewUser {
            email: email.to_string(),
            password: "pw".to_string(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            ..NewUser::default()
        },
    )
    .unwrap()
}

#[tokio::test]
async fn listing_returns_all_users_with_expected_fields() {
    let (base, store, _tmp) = spawn_app().await;
    let jane = seed_user(&store, "jane@example.com", "Jane");
    let john = seed_user(&store, "john@example.com", "John");
    store.set_active::<User>(&john.id, false).unwrap();

    let body: Vec<serde_json::Value> = reqwest::get(format!("{}/api/users", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Inactive users are listed too
    assert_eq!(body.len(), 2);

    let first = body.iter().find(|u| u["id"] == jane.id.as_str()).unwrap();
    let mut fields: Vec<&str> = first.as_object().unwrap().keys().map(String::as_str).collect();
    fields.sort_unstable();
    assert_eq!(
        fields,
        vec![
            "created_at",
            "email",
            "first_name",
            "id",
            "is_active",
            "is_trainer",
            "last_name",
            "username"
        ]
    );
    assert_eq!(first["username"], "jane");
    assert_eq!(first["is_active"], true);

    let second = body.iter().find(|u| u["id"] == john.id.as_str()).unwrap();
    assert_eq!(second["is_active"], false);
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let (base, store, _tmp) = spawn_app().await;
    for i in 0..3 {
        seed_user(&store, &format!("user{}@example.com", i), "User");
    }
    let inactive = seed_user(&store, "gone@example.com", "Gone");
    store.set_active::<User>(&inactive.id, false).unwrap();

    let active: Vec<serde_json::Value> =
        reqwest::get(format!("{}/api/users?is_active=true", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert_eq!(active.len(), 3);

    let page: Vec<serde_json::Value> =
        reqwest::get(format!("{}/api/users?limit=2&offset=2", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert_eq!(page.len(), 2);
}

#[tokio::test]
async fn admin_lists_and_toggles_entities() {
    let (base, store, _tmp) = spawn_app().await;
    let user = seed_user(&store, "owner@example.com", "Owner");

    let sport = Sport::new("Cycling");
    store.create(&sport).unwrap();
    let tag = Tag::new("cycling", &user.id);
    store.create(&tag).unwrap();
    let link = TagsSports::new(&sport.id, &tag.id);
    store.create(&link).unwrap();

    let client = reqwest::Client::new();

    let rows: Vec<serde_json::Value> = client
        .get(format!("{}/admin/sports", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Cycling");

    // Deactivate through the admin surface: the cascade applies
    let resp = client
        .post(format!("{}/admin/sports/{}/deactivate", base, sport.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let row: serde_json::Value = client
        .get(format!("{}/admin/tags/{}", base, tag.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(row["is_active"], false);

    let inactive: Vec<serde_json::Value> = client
        .get(format!("{}/admin/tags_sports?is_active=false", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0]["id"], link.id.as_str());
}

#[tokio::test]
async fn admin_delete_is_always_denied() {
    let (base, store, _tmp) = spawn_app().await;

    let sport = Sport::new("Rowing");
    store.create(&sport).unwrap();

    let client = reqwest::Client::new();
    let resp = client
        .delete(format!("{}/admin/sports/{}", base, sport.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Row is untouched
    assert!(store.get::<Sport>(&sport.id).unwrap().is_some());
}

#[tokio::test]
async fn admin_unknown_entity_is_not_found() {
    let (base, _store, _tmp) = spawn_app().await;

    let resp = reqwest::get(format!("{}/admin/sessions", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}
