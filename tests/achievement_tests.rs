//! Achievement flows driven through the HTTP API.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{award_names, spawn_app};
use serde_json::json;
use snowtricks::achievements::{AchievementLedger, DEFAULT_ACHIEVEMENTS};
use snowtricks::db::NewAchievement;
use snowtricks::domain::AchievementKind;
use std::collections::HashSet;

#[tokio::test]
async fn first_trick_awards_first_steps_and_fifth_awards_newcomer() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (rider, key) = app.register("rider").await;

    let mut tricks = Vec::new();
    for i in 1..=5 {
        tricks.push(app.create_trick(&admin, &format!("Basic {i}"), "basics").await);
    }

    let first = app.mark_learned(&key, rider, tricks[0]).await;
    assert_eq!(first["newly_learned"], true);
    assert_eq!(award_names(&first, "new_achievements"), vec!["First Steps"]);
    assert_eq!(first["new_achievements"][0]["points"], 10);

    for trick in &tricks[1..4] {
        let data = app.mark_learned(&key, rider, *trick).await;
        assert!(award_names(&data, "new_achievements").is_empty());
    }

    let fifth = app.mark_learned(&key, rider, tricks[4]).await;
    assert_eq!(award_names(&fifth, "new_achievements"), vec!["Newcomer"]);

    let (status, summary) = app
        .get(&format!("/api/users/{rider}/achievements"), Some(&key))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["data"]["total_points"], 60);
    assert_eq!(summary["data"]["achievements_count"], 2);
    assert_eq!(
        summary["data"]["achievements"][0]["achievement"]["name"],
        "Newcomer"
    );
}

#[tokio::test]
async fn marking_twice_awards_nothing_and_keeps_one_row() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (rider, key) = app.register("repeat").await;
    let trick = app.create_trick(&admin, "Ollie", "basics").await;

    let first = app.mark_learned(&key, rider, trick).await;
    assert_eq!(award_names(&first, "new_achievements").len(), 1);

    let second = app.mark_learned(&key, rider, trick).await;
    assert_eq!(second["newly_learned"], false);
    assert!(award_names(&second, "new_achievements").is_empty());

    let (_, progress) = app
        .get(&format!("/api/users/{rider}/progress"), None)
        .await;
    assert_eq!(progress["data"].as_array().unwrap().len(), 1);

    let (_, summary) = app
        .get(&format!("/api/users/{rider}/achievements"), Some(&key))
        .await;
    assert_eq!(summary["data"]["achievements_count"], 1);
}

#[tokio::test]
async fn category_mastery_needs_every_trick() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (rider, key) = app.register("spinner").await;

    let spin_a = app.create_trick(&admin, "Frontside 180", "spins").await;
    let spin_b = app.create_trick(&admin, "Backside 360", "spins").await;

    let data = app.mark_learned(&key, rider, spin_a).await;
    assert!(!award_names(&data, "new_achievements").contains(&"Spinner".to_string()));

    let data = app.mark_learned(&key, rider, spin_b).await;
    assert!(award_names(&data, "new_achievements").contains(&"Spinner".to_string()));

    // A fresh account has not mastered the empty "flips" category.
    let (fresh_id, fresh_key) = app.register("fresh").await;
    let (status, awarded) = app
        .request(
            "POST",
            &format!("/api/users/{fresh_id}/check-achievements"),
            Some(&fresh_key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(awarded["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn leaderboard_ranks_by_points() {
    let app = spawn_app().await;
    let store = app.state.store();

    let (a, _) = app.register("alpha").await;
    let (b, _) = app.register("bravo").await;
    let (c, _) = app.register("charlie").await;

    let mut ids = Vec::new();
    for (name, points) in [("Gold", 300), ("Silver", 150)] {
        let created = store
            .create_achievement(NewAchievement {
                name: name.to_string(),
                description: name.to_string(),
                icon: None,
                kind: AchievementKind::Special,
                condition_type: "manual".to_string(),
                condition_value: None,
                condition_data: None,
                points,
                badge_color: "#000000".to_string(),
                is_active: true,
            })
            .await
            .unwrap()
            .unwrap();
        ids.push(created.id);
    }

    store.record_awards(b, &[ids[0]], Utc::now()).await.unwrap();
    store.record_awards(a, &[ids[1]], Utc::now()).await.unwrap();

    let (status, body) = app.get("/api/leaderboard?limit=100", None).await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["data"].as_array().unwrap();
    let rank_of = |user: i32| {
        rows.iter()
            .find(|r| r["user_id"] == user)
            .map(|r| (r["rank"].as_i64().unwrap(), r["total_points"].as_i64().unwrap()))
            .unwrap()
    };

    assert_eq!(rank_of(b), (1, 300));
    assert_eq!(rank_of(a), (2, 150));
    let (c_rank, c_points) = rank_of(c);
    assert!(c_rank > 2);
    assert_eq!(c_points, 0);

    let (_, limited) = app.get("/api/leaderboard?limit=1", None).await;
    assert_eq!(limited["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/leaderboard?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let app = spawn_app().await;
    let store = app.state.store();

    let expected = DEFAULT_ACHIEVEMENTS.len() as u64;
    assert_eq!(store.count_achievement_definitions().await.unwrap(), expected);

    app.state.shared.bootstrap().await.unwrap();
    let inserted = app.state.achievement_service().seed_defaults().await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(store.count_achievement_definitions().await.unwrap(), expected);

    let (_, body) = app.get("/api/achievements", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), DEFAULT_ACHIEVEMENTS.len());
}

#[tokio::test]
async fn concurrent_checks_never_double_award() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (rider, _) = app.register("racer").await;
    let store = app.state.store().clone();

    for i in 1..=5 {
        let trick = app.create_trick(&admin, &format!("Trick {i}"), "basics").await;
        store.record_learned(rider, trick, Utc::now()).await.unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = app.state.achievement_service().clone();
        handles.push(tokio::spawn(async move { service.check(rider).await }));
    }

    let mut awarded = Vec::new();
    for handle in handles {
        awarded.extend(handle.await.unwrap().unwrap().into_iter().map(|a| a.name));
    }

    let unique: HashSet<_> = awarded.iter().cloned().collect();
    assert_eq!(awarded.len(), unique.len(), "reported twice: {awarded:?}");
    assert_eq!(
        unique,
        HashSet::from(["First Steps".to_string(), "Newcomer".to_string()])
    );

    assert_eq!(store.earned_achievement_ids(rider).await.unwrap().len(), 2);
}

#[tokio::test]
async fn three_consecutive_days_award_motivated() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (rider, _) = app.register("regular").await;
    let store = app.state.store().clone();
    let now = Utc::now();

    for day in 0..3 {
        let trick = app.create_trick(&admin, &format!("Day {day}"), "basics").await;
        let learned_at = now - Duration::days(day);
        assert!(store.record_learned(rider, trick, learned_at).await.unwrap());
    }

    let dates = store.distinct_learned_dates(rider).await.unwrap();
    assert_eq!(dates.len(), 3);
    assert_eq!(dates[0], now.date_naive());

    let awarded: Vec<String> = app
        .state
        .achievement_service()
        .check(rider)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert!(awarded.contains(&"Motivated".to_string()), "{awarded:?}");
    assert!(!awarded.contains(&"Consistency".to_string()));
}

#[tokio::test]
async fn a_gap_in_the_days_breaks_the_streak() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (rider, _) = app.register("sporadic").await;
    let store = app.state.store().clone();
    let now = Utc::now();

    for day in [0, 1, 3] {
        let trick = app.create_trick(&admin, &format!("Gap {day}"), "basics").await;
        store
            .record_learned(rider, trick, now - Duration::days(day))
            .await
            .unwrap();
    }

    let awarded = app.state.achievement_service().check(rider).await.unwrap();
    assert!(awarded.iter().all(|a| a.name != "Motivated"));
}

#[tokio::test]
async fn check_for_unknown_user_is_empty() {
    let app = spawn_app().await;
    let awarded = app.state.achievement_service().check(9999).await.unwrap();
    assert!(awarded.is_empty());
}

#[tokio::test]
async fn admin_creates_achievements_with_unique_names() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (_, user_key) = app.register("plain").await;

    let definition = json!({
        "name": "Park Rat",
        "description": "Learn 2 tricks",
        "type": "learning",
        "condition_type": "tricks_learned",
        "condition_value": 2,
        "points": 20
    });

    let (status, _) = app
        .post("/api/admin/achievements", Some(&user_key), definition.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/api/admin/achievements", Some(&admin), definition.clone())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Park Rat");
    assert_eq!(body["data"]["type"], "learning");
    assert!(body["data"].get("kind").is_none());
    assert_eq!(body["data"]["badge_color"], "#667eea");
    assert_eq!(body["data"]["is_active"], true);

    let (_, listed) = app.get("/api/achievements", None).await;
    let park_rat = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "Park Rat")
        .unwrap();
    assert_eq!(park_rat["type"], "learning");

    let (status, _) = app
        .post("/api/admin/achievements", Some(&admin), definition)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn progress_endpoints_enforce_ownership() {
    let app = spawn_app().await;
    let admin = app.admin_key().await;
    let (owner, _) = app.register("owner").await;
    let (_, other_key) = app.register("other").await;
    let trick = app.create_trick(&admin, "Nose Press", "jibbing").await;

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/users/{owner}/progress/{trick}"),
            Some(&other_key),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/users/{owner}/progress/{trick}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Staff may act for others.
    let data = app.mark_learned(&admin, owner, trick).await;
    assert_eq!(data["newly_learned"], true);

    let (status, _) = app
        .request(
            "POST",
            &format!("/api/users/{owner}/progress/99999"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, stats) = app.get(&format!("/api/users/{owner}/stats"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["data"]["learned_tricks"], 1);
    assert_eq!(stats["data"]["categories"]["jibbing"]["percentage"], 100.0);

    let (_, learned) = app
        .get(&format!("/api/users/{owner}/learned-tricks"), None)
        .await;
    assert_eq!(learned["data"][0]["trick"]["name"], "Nose Press");
}
