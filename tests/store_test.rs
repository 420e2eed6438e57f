use spotter::db;
use spotter::db::models::{
    Certification, CertificationDifficulty, Comment, Experience, Like, Post, Sport, User,
};
use spotter::store::{EntityStore, ListQuery, StoreError};
use tempfile::TempDir;

fn test_store() -> (EntityStore, TempDir) {
    let tmp = TempDir::new().unwrap();
    let pool = db::create_pool(&tmp.path().join("test.db")).unwrap();
    db::run_migrations(&pool).unwrap();
    (EntityStore::new(pool), tmp)
}

fn seed_user(store: &EntityStore, email: &str, username: &str) -> User {
    let ts = spotter::db::models::now();
    let user = User {
        id: spotter::db::models::new_id(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: "x".to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        state: Some("CA".to_string()),
        city: Some("Oakland".to_string()),
        latitude: Some(37.804363),
        longitude: Some(-122.271111),
        experience_id: None,
        is_staff: false,
        is_superuser: false,
        is_trainer: true,
        is_active: true,
        created_at: ts.clone(),
        updated_at: ts,
    };
    store.create(&user).unwrap();
    user
}

#[test]
fn user_round_trips_with_location_fields() {
    let (store, _tmp) = test_store();
    let user = seed_user(&store, "trainer@example.com", "trainer");

    let loaded: User = store.get(&user.id).unwrap().unwrap();
    assert_eq!(loaded, user);
}

#[test]
fn user_experience_reference_must_exist() {
    let (store, _tmp) = test_store();
    let mut user = seed_user(&store, "x@example.com", "x");

    user.experience_id = Some("no-such-experience".to_string());
    let err = store.update(&mut user).unwrap_err();
    assert!(matches!(err, StoreError::MissingReference(_)));

    let experience = Experience::new("Intermediate");
    store.create(&experience).unwrap();
    user.experience_id = Some(experience.id.clone());
    store.update(&mut user).unwrap();

    let loaded: User = store.get(&user.id).unwrap().unwrap();
    assert_eq!(loaded.experience_id, Some(experience.id));
}

#[test]
fn threaded_entities_round_trip_with_self_references() {
    let (store, _tmp) = test_store();
    let user = seed_user(&store, "author@example.com", "author");

    let root = Post::new("first ride of the season", &user.id);
    store.create(&root).unwrap();
    let repost = Post::new("so jealous", &user.id).reply_to(&root.id);
    store.create(&repost).unwrap();

    let comment = Comment::new("looks great", &root.id, &user.id);
    store.create(&comment).unwrap();
    let threaded = Comment::new("agreed", &root.id, &user.id).reply_to(&comment.id);
    store.create(&threaded).unwrap();

    let like = Like::new(&user.id, &root.id);
    store.create(&like).unwrap();
    let like_of_like = Like::new(&user.id, &root.id).of_like(&like.id);
    store.create(&like_of_like).unwrap();

    assert_eq!(store.get::<Post>(&repost.id).unwrap().unwrap(), repost);
    assert_eq!(store.get::<Comment>(&threaded.id).unwrap().unwrap(), threaded);
    assert_eq!(store.get::<Like>(&like_of_like.id).unwrap().unwrap(), like_of_like);
}

#[test]
fn self_reference_must_point_at_existing_row() {
    let (store, _tmp) = test_store();
    let user = seed_user(&store, "author@example.com", "author");

    let orphan = Post::new("reply to nothing", &user.id).reply_to("missing-post");
    let err = store.create(&orphan).unwrap_err();
    assert!(matches!(err, StoreError::MissingReference(_)));
}

#[test]
fn unique_names_enforced_across_catalog_entities() {
    let (store, _tmp) = test_store();

    store.create(&Sport::new("Cycling")).unwrap();
    assert!(matches!(
        store.create(&Sport::new("Cycling")).unwrap_err(),
        StoreError::Conflict { .. }
    ));

    let difficulty = CertificationDifficulty::new("Expert");
    store.create(&difficulty).unwrap();
    assert!(matches!(
        store
            .create(&CertificationDifficulty::new("Expert"))
            .unwrap_err(),
        StoreError::Conflict { .. }
    ));

    store
        .create(&Certification::new("Coach L2", &difficulty.id))
        .unwrap();
    assert!(matches!(
        store
            .create(&Certification::new("Coach L2", &difficulty.id))
            .unwrap_err(),
        StoreError::Conflict { .. }
    ));
}

#[test]
fn deactivation_is_the_removal_path_for_referenced_rows() {
    let (store, _tmp) = test_store();
    let user = seed_user(&store, "author@example.com", "author");
    let post = Post::new("hello", &user.id);
    store.create(&post).unwrap();

    // The author is referenced and cannot be hard-deleted
    let err = store.delete::<User>(&user.id).unwrap_err();
    assert!(matches!(err, StoreError::InUse(_)));

    // Deactivation always works and leaves the row queryable
    store.set_active::<User>(&user.id, false).unwrap();
    let loaded: User = store.get(&user.id).unwrap().unwrap();
    assert!(!loaded.is_active);

    let all: Vec<User> = store.list(&ListQuery::default()).unwrap();
    assert_eq!(all.len(), 1);
}
