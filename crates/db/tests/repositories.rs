//! Integration tests for the repository layer against a real database.
//!
//! - Profile upsert overwrites names
//! - Model lifecycle (create, attach tune, status updates, listing)
//! - Images and samples cascade with their model
//! - `user_tunes` upsert keeps the original `created_at`

use headshots_core::training::{LedgerStatus, ModelStatus};
use headshots_db::models::image::CreateImage;
use headshots_db::models::model::CreateModel;
use headshots_db::models::profile::UpsertProfile;
use headshots_db::models::user_headshot::CreateUserHeadshot;
use headshots_db::models::user_tune::UpsertUserTune;
use headshots_db::repositories::{
    CreditRepo, ImageRepo, ModelRepo, ProfileRepo, SampleRepo, UserHeadshotRepo, UserTuneRepo,
};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_model(user_id: Uuid, name: &str) -> CreateModel {
    CreateModel {
        user_id,
        name: name.to_string(),
        model_type: "person".to_string(),
        status: None,
    }
}

fn new_tune(user_id: Uuid, tune_id: &str) -> UpsertUserTune {
    UpsertUserTune {
        user_id,
        tune_id: tune_id.to_string(),
        status: LedgerStatus::Training,
        is_simulated: false,
        notify_email: Some("owner@example.com".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_upsert_inserts_then_overwrites(pool: PgPool) {
    let user = Uuid::new_v4();
    assert!(ProfileRepo::find_by_id(&pool, user).await.unwrap().is_none());

    let first = ProfileRepo::upsert(
        &pool,
        user,
        &UpsertProfile {
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(first.first_name.as_deref(), Some("Ada"));

    let second = ProfileRepo::upsert(
        &pool,
        user,
        &UpsertProfile {
            first_name: Some("Augusta".into()),
            last_name: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(second.id, user);
    assert_eq!(second.first_name.as_deref(), Some("Augusta"));
    assert!(second.last_name.is_none());
    assert!(second.updated_at >= first.updated_at);
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn model_defaults_to_pending_and_tracks_tune(pool: PgPool) {
    let user = Uuid::new_v4();
    let model = ModelRepo::create(&pool, &new_model(user, "Me")).await.unwrap();
    assert_eq!(model.status(), ModelStatus::Pending);
    assert!(model.tune_id.is_none());
    assert!(model.is_owned_by(user));
    assert!(!model.is_owned_by(Uuid::new_v4()));

    let model = ModelRepo::set_tune(&pool, model.id, "tune-1700000000000", true, ModelStatus::Training)
        .await
        .unwrap()
        .expect("model exists");
    assert_eq!(model.tune_id.as_deref(), Some("tune-1700000000000"));
    assert!(model.is_simulated);
    assert_eq!(model.status(), ModelStatus::Training);

    let in_flight = ModelRepo::list_by_statuses(&pool, &[ModelStatus::Training, ModelStatus::Processing])
        .await
        .unwrap();
    assert_eq!(in_flight.len(), 1);

    let done = ModelRepo::update_status(&pool, model.id, ModelStatus::Training, ModelStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status(), ModelStatus::Completed);
    // Already moved on: a second transition from `training` is a no-op.
    assert!(ModelRepo::update_status(&pool, model.id, ModelStatus::Training, ModelStatus::Failed)
        .await
        .unwrap()
        .is_none());
    assert!(ModelRepo::update_status(&pool, 999_999, ModelStatus::Training, ModelStatus::Failed)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_by_user_only_returns_own_models(pool: PgPool) {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    ModelRepo::create(&pool, &new_model(alice, "a1")).await.unwrap();
    ModelRepo::create(&pool, &new_model(alice, "a2")).await.unwrap();
    ModelRepo::create(&pool, &new_model(bob, "b1")).await.unwrap();

    let models = ModelRepo::list_by_user(&pool, alice).await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "a2");
    assert!(models.iter().all(|m| m.user_id == alice));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn images_and_samples_belong_to_model(pool: PgPool) {
    let model = ModelRepo::create(&pool, &new_model(Uuid::new_v4(), "Me"))
        .await
        .unwrap();

    for i in 0..3 {
        SampleRepo::create(&pool, model.id, &format!("img-{i}")).await.unwrap();
    }
    ImageRepo::create(
        &pool,
        &CreateImage {
            model_id: model.id,
            uri: "https://cdn.example.com/1.png".into(),
            is_simulated: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(SampleRepo::list_by_model(&pool, model.id).await.unwrap().len(), 3);
    let images = ImageRepo::list_by_model(&pool, model.id).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].model_id, model.id);

    let orphan = ImageRepo::create(
        &pool,
        &CreateImage {
            model_id: 424_242,
            uri: "https://cdn.example.com/x.png".into(),
            is_simulated: true,
        },
    )
    .await;
    assert!(orphan.is_err(), "images must reference an existing model");
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_tune_upsert_keeps_created_at(pool: PgPool) {
    let user = Uuid::new_v4();
    let first = UserTuneRepo::upsert(&pool, &new_tune(user, "1504944")).await.unwrap();

    let mut again = new_tune(user, "1504944");
    again.notify_email = None;
    again.status = LedgerStatus::Complete;
    let second = UserTuneRepo::upsert(&pool, &again).await.unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.status(), LedgerStatus::Complete);
    assert_eq!(second.notify_email.as_deref(), Some("owner@example.com"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn latest_for_user_and_status_updates(pool: PgPool) {
    let user = Uuid::new_v4();
    UserTuneRepo::upsert(&pool, &new_tune(user, "older")).await.unwrap();
    UserTuneRepo::set_created_at(&pool, user, "older", chrono::Utc::now() - chrono::Duration::hours(1))
        .await
        .unwrap();
    UserTuneRepo::upsert(&pool, &new_tune(user, "newer")).await.unwrap();

    let latest = UserTuneRepo::latest_for_user(&pool, user).await.unwrap().unwrap();
    assert_eq!(latest.tune_id, "newer");

    assert!(UserTuneRepo::update_status(&pool, user, "older", LedgerStatus::Training, LedgerStatus::Error)
        .await
        .unwrap());
    assert!(!UserTuneRepo::update_status(&pool, user, "older", LedgerStatus::Training, LedgerStatus::Complete)
        .await
        .unwrap());
    assert!(!UserTuneRepo::update_status(&pool, user, "missing", LedgerStatus::Training, LedgerStatus::Error)
        .await
        .unwrap());

    let training = UserTuneRepo::list_by_status(&pool, LedgerStatus::Training)
        .await
        .unwrap();
    assert_eq!(training.len(), 1);
    assert_eq!(training[0].tune_id, "newer");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn headshots_and_credits_are_per_user(pool: PgPool) {
    let user = Uuid::new_v4();
    UserHeadshotRepo::create(
        &pool,
        &CreateUserHeadshot {
            user_id: user,
            image_url: "https://cdn.example.com/h.png".into(),
            prompt_id: Some("77".into()),
            style_type: "casual".into(),
            is_simulated: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(UserHeadshotRepo::list_by_user(&pool, user).await.unwrap().len(), 1);
    assert!(UserHeadshotRepo::list_by_user(&pool, Uuid::new_v4())
        .await
        .unwrap()
        .is_empty());

    sqlx::query("INSERT INTO credits (user_id, credits) VALUES ($1, 5)")
        .bind(user)
        .execute(&pool)
        .await
        .unwrap();
    let credits = CreditRepo::list_by_user(&pool, user).await.unwrap();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].credits, 5);
}
