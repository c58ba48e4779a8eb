// tests/players_api.rs

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use common::{bearer, player_body};
use serde_json::json;

#[actix_rt::test]
async fn create_then_get_returns_the_same_record() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");

    let input = player_body("Pedri", "Barcelona", 22);
    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/players")
            .insert_header(bearer(&admin))
            .set_json(&input)
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Player created successfully");
    let created = body["player"].clone();
    for key in ["name", "position", "team", "age", "nationality", "stats", "marketValue"] {
        assert_eq!(created[key], input[key], "field {key}");
    }
    assert!(created["id"].as_str().is_some());
    assert!(created["createdAt"].as_str().is_some());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send!(
        app,
        TestRequest::get()
            .uri(&format!("/api/players/{id}"))
            .insert_header(bearer(&admin))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[actix_rt::test]
async fn defaults_fill_missing_stats_and_market_value() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/players")
            .insert_header(bearer(&admin))
            .set_json(json!({
                "name": "Gavi", "position": "Midfielder", "team": "Barcelona",
                "age": 20, "nationality": "Spain"
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["player"]["stats"],
        json!({ "goals": 0, "assists": 0, "matches": 0, "yellowCards": 0, "redCards": 0 })
    );
    assert_eq!(body["player"]["marketValue"], 0.0);
}

#[actix_rt::test]
async fn out_of_range_age_is_rejected_and_nothing_stored() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");

    for age in [15, 51, 0, 120] {
        let (status, body) = send!(
            app,
            TestRequest::post()
                .uri("/api/players")
                .insert_header(bearer(&admin))
                .set_json(player_body("Pedri", "Barcelona", age))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "age");
    }
    assert!(state.players.list_all().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn non_admin_cannot_write() {
    let state = common::state();
    let app = app!(state);
    let (user, _) = register!(app, "Fan", "fan@x.com", "user");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/players")
            .insert_header(bearer(&user))
            .set_json(player_body("Pedri", "Barcelona", 22))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. Admin role required.");
    assert!(state.players.list_all().await.unwrap().is_empty());

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/players")
            .set_json(player_body("Pedri", "Barcelona", 22))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn readers_see_newest_first() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");
    let (user, _) = register!(app, "Fan", "fan@x.com", "user");

    for (name, team) in [("Pedri", "Barcelona"), ("Rodri", "Manchester City"), ("Bellingham", "Real Madrid")] {
        let (status, _) = send!(
            app,
            TestRequest::post()
                .uri("/api/players")
                .insert_header(bearer(&admin))
                .set_json(player_body(name, team, 25))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send!(
        app,
        TestRequest::get().uri("/api/players").insert_header(bearer(&user))
    );
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Bellingham", "Rodri", "Pedri"]);

    let (status, _) = send!(app, TestRequest::get().uri("/api/players"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn search_by_team_returns_exactly_that_player() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");

    for (name, team) in [("Pedri", "Barcelona"), ("Rodri", "Manchester City")] {
        send!(
            app,
            TestRequest::post()
                .uri("/api/players")
                .insert_header(bearer(&admin))
                .set_json(player_body(name, team, 25))
        );
    }

    let (status, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/players/search/manchester")
            .insert_header(bearer(&admin))
    );
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Rodri");

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/players/search/MIDFIELD")
            .insert_header(bearer(&admin))
    );
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send!(
        app,
        TestRequest::get()
            .uri("/api/players/search/juventus")
            .insert_header(bearer(&admin))
    );
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn partial_update_merges_and_refreshes_timestamp() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");

    let (_, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/players")
            .insert_header(bearer(&admin))
            .set_json(player_body("Pedri", "Barcelona", 22))
    );
    let original = body["player"].clone();
    let id = original["id"].as_str().unwrap().to_owned();

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/players/{id}"))
            .insert_header(bearer(&admin))
            .set_json(json!({ "age": 23, "stats": { "goals": 11 } }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Player updated successfully");
    let updated = &body["player"];
    assert_eq!(updated["age"], 23);
    assert_eq!(updated["stats"]["goals"], 11);
    assert_eq!(updated["stats"]["assists"], original["stats"]["assists"]);
    assert_eq!(updated["team"], "Barcelona");
    assert_eq!(updated["createdAt"], original["createdAt"]);

    let before = chrono::DateTime::parse_from_rfc3339(original["updatedAt"].as_str().unwrap()).unwrap();
    let after = chrono::DateTime::parse_from_rfc3339(updated["updatedAt"].as_str().unwrap()).unwrap();
    assert!(after >= before);

    let (status, body) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/players/{id}"))
            .insert_header(bearer(&admin))
            .set_json(json!({ "position": "Libero" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "position");
}

#[actix_rt::test]
async fn missing_players_are_not_found() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");
    let ghost = uuid::Uuid::new_v4();

    for req in [
        TestRequest::get().uri(&format!("/api/players/{ghost}")),
        TestRequest::get().uri("/api/players/not-a-uuid"),
        TestRequest::put()
            .uri(&format!("/api/players/{ghost}"))
            .set_json(json!({ "age": 30 })),
        TestRequest::delete().uri(&format!("/api/players/{ghost}")),
    ] {
        let (status, body) = send!(app, req.insert_header(bearer(&admin)));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Player not found");
    }
}

#[actix_rt::test]
async fn delete_removes_the_record() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");
    let (user, _) = register!(app, "Fan", "fan@x.com", "user");

    let (_, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/players")
            .insert_header(bearer(&admin))
            .set_json(player_body("Pedri", "Barcelona", 22))
    );
    let id = body["player"]["id"].as_str().unwrap().to_owned();

    let (status, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/api/players/{id}"))
            .insert_header(bearer(&user))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/api/players/{id}"))
            .insert_header(bearer(&admin))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Player deleted successfully");
    assert!(state.players.list_all().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn integral_float_age_is_accepted() {
    let state = common::state();
    let app = app!(state);
    let (admin, _) = register!(app, "Admin", "admin@x.com", "admin");

    let mut input = player_body("Pedri", "Barcelona", 22);
    input["age"] = json!(30.0);
    input["stats"]["goals"] = json!(12.0);
    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/players")
            .insert_header(bearer(&admin))
            .set_json(&input)
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["player"]["age"], 30);
    assert_eq!(body["player"]["stats"]["goals"], 12);
}
