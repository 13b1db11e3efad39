mod common;

use common::{days_ago, spawn, spawn_with, today};
use mains_leaderboard::config::Config;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn entries_feed_the_leaderboard() {
    let app = spawn().await;

    for (pokemon, date) in [
        ("Pikachu", days_ago(3)),
        ("gengar", days_ago(2)),
        ("Pikachu", days_ago(1)),
    ] {
        let response = app.add_entry(pokemon, "Viridian Forest", &date).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json::<serde_json::Value>().await.unwrap(), json!({ "success": true }));
    }

    let board = app.json("/leaderboard").await;
    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["Pokemon"], "Pikachu");
    assert_eq!(board[0]["Count"], 2);
    assert_eq!(board[0]["BST"], 320);
    assert_eq!(board[0]["Runs Since Last Ran"], "0");
    // stored under the species table's spelling
    assert_eq!(board[1]["Pokemon"], "Gengar");
    assert_eq!(board[1]["Runs Since Last Ran"], "1");

    assert_eq!(app.json("/total_pokemon").await, json!({ "total_pokemon": 3 }));
    assert_eq!(app.json("/unique_pokemon").await, json!({ "unique_pokemon": 2 }));
    assert_eq!(app.json("/average_bst").await, json!({ "average_bst": 380 }));
    assert_eq!(app.json("/lowest_bst").await, json!({ "lowest_bst": 320 }));
    assert_eq!(app.json("/current_streak").await, json!({ "current_streak": 3 }));
    assert_eq!(app.json("/play_streak").await, json!({ "play_streak": 3 }));
    assert_eq!(app.json("/longest_streak").await["longest_streak"], 3);
    assert_eq!(app.json("/max_runs_per_day").await["max_runs"], 1);

    let locations = app.json("/location_percentages").await;
    assert_eq!(locations, json!([{ "Location": "Viridian Forest", "Percentage": 100.0 }]));

    let recent = app.json("/last10").await;
    assert_eq!(recent[0]["Pokemon"], "Pikachu");
    assert_eq!(recent[0]["Runs Since Last Ran"], "2");
    assert_eq!(recent[2]["Time Since Last Ran"], "Never");
}

#[tokio::test]
async fn invalid_entries_are_rejected_without_writing() {
    let app = spawn().await;

    let cases = [
        ("", "Route 1", today(), "Please enter a Pokemon."),
        ("Agumon", "Route 1", today(), "Invalid Pokemon Entered"),
        ("Pikachu", "  ", today(), "Please enter a location."),
        ("Pikachu", "Route 1", "yesterday".to_string(), "Please enter a valid date."),
    ];

    for (pokemon, location, date, error) in cases {
        let response = app.add_entry(pokemon, location, &date).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>().await.unwrap(),
            json!({ "success": false, "error": error })
        );
    }

    assert_eq!(app.json("/total_pokemon").await, json!({ "total_pokemon": 0 }));
}

#[tokio::test]
async fn empty_log_answers_with_zeroes() {
    let app = spawn().await;

    assert_eq!(app.json("/leaderboard").await, json!([]));
    assert_eq!(app.json("/average_bst").await, json!({ "average_bst": 0 }));
    assert_eq!(app.json("/lowest_bst").await, json!({ "lowest_bst": 0 }));
    assert_eq!(
        app.json("/longest_streak").await,
        json!({ "longest_streak": 0, "start_date": null, "end_date": null })
    );
    assert_eq!(
        app.json("/max_runs_per_day").await,
        json!({ "max_runs": 0, "dates": [] })
    );
}

#[tokio::test]
async fn pokemon_entries_take_encoded_names() {
    let app = spawn().await;
    app.add_entry("Mr. Mime", "Route 2", "2024-03-01").await;
    app.add_entry("Mr. Mime", "Route 2", "2024-03-02").await;
    app.add_entry("Farfetch'd", "Vermilion City", "2024-03-02").await;

    let details = app
        .json(&format!("/pokemon_entries/{}", urlencoding::encode("mr. mime")))
        .await;
    assert_eq!(details["total_entries"], 2);
    assert_eq!(details["entries"][0]["Date"], "3/2/2024");
    assert_eq!(details["location_percentages"][0]["count"], 2);

    let details = app
        .json(&format!("/pokemon_entries/{}", urlencoding::encode("Farfetch'd")))
        .await;
    assert_eq!(details["total_entries"], 1);
}

#[tokio::test]
async fn config_reports_shiny_folder() {
    let app = spawn().await;
    let config = app.json("/config").await;
    assert_eq!(config["shiny_odds"], 8192);
    assert_eq!(config["game"], "crystal");
    assert_eq!(config["shiny_gifs_exists"], false);

    let app = spawn_with(Config::default(), true).await;
    assert_eq!(app.json("/config").await["shiny_gifs_exists"], true);
}

#[tokio::test]
async fn config_reports_clamped_odds() {
    let config = Config {
        shiny_odds: 0,
        ..Config::default()
    };
    let app = spawn_with(config, true).await;
    assert_eq!(app.json("/config").await["shiny_odds"], 1);
}

#[tokio::test]
async fn species_table_is_served() {
    let app = spawn().await;
    let species = app.json("/bst").await;
    let species = species.as_array().unwrap();
    assert_eq!(species.len(), 251);
    assert!(species.contains(&json!({ "Pokemon": "Pikachu", "BST": 320 })));
}

#[tokio::test]
async fn last_pokemon_serves_its_gif() {
    let app = spawn().await;
    let response = app.client.get(app.url("/last_pokemon")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.add_entry("Abra", "Route 24", "2024-01-02").await;
    app.add_entry("Mr. Mime", "Route 2", "2024-01-01").await;
    app.write_gif("gifs", "abra");

    let response = app.client.get(app.url("/last_pokemon")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/gif");
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"GIF89a");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = spawn().await;
    let response = app.client.get(app.url("/nope")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
