#![allow(dead_code)]

use mains_leaderboard::{config::Config, model, AppState};
use sqlx::sqlite::SqlitePoolOptions;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub static_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Loads the dashboard and returns its page id.
    pub async fn open_page(&self) -> String {
        let html = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        page_id(&html)
    }

    pub async fn widget(&self, page: &str, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("X-Dashboard-Session", page)
            .send()
            .await
            .unwrap()
    }

    pub async fn widget_post(&self, page: &str, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("X-Dashboard-Session", page)
            .send()
            .await
            .unwrap()
    }

    pub async fn add_entry(&self, pokemon: &str, location: &str, date: &str) -> reqwest::Response {
        let form = reqwest::multipart::Form::new()
            .text("pokemon", pokemon.to_string())
            .text("location", location.to_string())
            .text("date", date.to_string())
            .text("notes", "");

        self.client
            .post(self.url("/add_entry"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn json(&self, path: &str) -> serde_json::Value {
        self.client
            .get(self.url(path))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub fn write_gif(&self, folder: &str, name: &str) {
        let dir = self.static_dir.path().join(folder).join("crystal");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.gif")), b"GIF89a").unwrap();
    }
}

pub async fn spawn() -> TestApp {
    spawn_with(Config::default(), false).await
}

/// Starts the app on an ephemeral port with an in-memory store. With
/// `shiny_gifs` the shiny folder for the configured game exists.
pub async fn spawn_with(mut config: Config, shiny_gifs: bool) -> TestApp {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(static_dir.path().join("gifs").join(&config.game)).unwrap();
    if shiny_gifs {
        std::fs::create_dir_all(static_dir.path().join("shiny_gifs").join(&config.game)).unwrap();
    }
    config.static_dir = static_dir.path().to_path_buf();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    model::encounter::prepare(&pool, None).await.unwrap();

    let species = model::species::Species::builtin().unwrap();
    let app = mains_leaderboard::router(&config.static_dir)
        .with_state(&*Box::leak(Box::new(AppState::new(pool, config, species))));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    TestApp {
        address,
        client: reqwest::Client::new(),
        static_dir,
    }
}

pub fn page_id(html: &str) -> String {
    let marker = r#"name="dashboard-session" content=""#;
    let start = html.find(marker).expect("page has no session id") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_string()
}

/// Pokemon names in the order their rows appear.
pub fn row_order(html: &str) -> Vec<String> {
    html.split(r#"data-pokemon=""#)
        .skip(1)
        .map(|rest| rest[..rest.find('"').unwrap()].to_string())
        .collect()
}

pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn days_ago(days: i64) -> String {
    (chrono::Local::now().date_naive() - chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
