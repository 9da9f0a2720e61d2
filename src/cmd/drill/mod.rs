// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


mod get;
mod post;
pub mod server;
mod state;
mod template;

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::path::Path;

    use chrono::Local;
    use kasus_core::store::KeyValueStore;
    use kasus_core::store::ProgressStore;
    use portpicker::pick_unused_port;
    use reqwest::StatusCode;
    use tokio::spawn;

    use crate::cmd::drill::server::ServerConfig;
    use crate::cmd::drill::server::start_server;
    use crate::collection::DATABASE_FILE;
    use crate::db::Database;
    use crate::helper::HELPERS_CSV;
    use crate::helper::SENTENCES_CSV;
    use crate::helper::VERBS_CSV;
    use crate::helper::create_collection;
    use crate::utils::wait_for_server;

    type TestResult = Result<(), Box<dyn Error>>;

    const TEST_HOST: &str = "127.0.0.1";

    fn config(directory: &Path, port: u16, dataset: Option<&str>) -> ServerConfig {
        ServerConfig {
            directory: Some(directory.display().to_string()),
            host: TEST_HOST.to_string(),
            port,
            dataset: dataset.map(str::to_string),
            session_started_at: Local::now(),
            seed: Some(0),
        }
    }

    async fn post(port: u16, form: &[(&str, &str)]) -> Result<(StatusCode, String), Box<dyn Error>> {
        let response = reqwest::Client::new()
            .post(format!("http://{TEST_HOST}:{port}/"))
            .form(form)
            .send()
            .await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }

    #[tokio::test]
    async fn test_start_server_on_non_existent_directory() -> TestResult {
        let port = pick_unused_port().unwrap();
        let config = ServerConfig {
            directory: Some("./derpherp".to_string()),
            ..config(Path::new("."), port, None)
        };
        let result = start_server(config).await;
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_no_datasets() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[])?;
        start_server(config(&dir, port, None)).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_unknown_dataset() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("verbs.csv", VERBS_CSV)])?;
        let err = start_server(config(&dir, port, Some("gone.csv")))
            .await
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "error: no dataset named 'gone.csv' in the collection."
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_start_server_with_empty_dataset() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("verbs.csv", "Verb,Preposition,Case\n")])?;
        let err = start_server(config(&dir, port, None)).await.err().unwrap();
        assert_eq!(err.to_string(), "error: dataset 'verbs.csv' is empty.");
        Ok(())
    }

    #[tokio::test]
    async fn test_e2e() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("verbs.csv", VERBS_CSV)])?;
        let config = config(&dir, port, None);
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // Hit the not found endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // Hit the root endpoint.
        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("denken"));
        assert!(html.contains("(to think of)"));
        assert!(html.contains("über"));
        assert!(html.contains("Learned: 0 / 1"));

        // Picking the case alone does not submit in the default mode.
        let (status, html) = post(port, &[("action", "Case"), ("value", "Akk")]).await?;
        assert!(status.is_success());
        assert!(!html.contains("class=\"verdict"));

        // Three correct answers in a row.
        for round in 0..3 {
            if round > 0 {
                post(port, &[("action", "Case"), ("value", "Akk")]).await?;
            }
            let (_, html) = post(port, &[("action", "Preposition"), ("value", "an")]).await?;
            assert!(html.contains("class=\"verdict correct\""));
            assert!(html.contains("Ich denke an dich."));
            assert!(html.contains("I am thinking of you."));
            assert_eq!(html.contains("Learned!"), round == 2);
            post(port, &[("action", "Continue")]).await?;
        }

        let response = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?;
        let html = response.text().await?;
        assert!(html.contains("All verbs learned!"));
        assert!(html.contains("Score: 1"));

        // The progress is in the database.
        let store = ProgressStore::new(Database::new(&dir.join(DATABASE_FILE))?);
        assert_eq!(store.load("verbs.csv").score(), 1);

        // Start over.
        let (_, html) = post(port, &[("action", "Reset")]).await?;
        assert!(html.contains("denken"));
        assert!(html.contains("Score: 0"));

        // Shut down.
        let (status, html) = post(port, &[("action", "Shutdown")]).await?;
        assert!(status.is_success());
        assert!(html.contains("Session Ended"));

        Ok(())
    }

    #[tokio::test]
    async fn test_give_up() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("verbs.csv", VERBS_CSV)])?;
        let config = config(&dir, port, None);
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        let (_, html) = post(port, &[("action", "GiveUp")]).await?;
        assert!(!html.contains("class=\"verdict"));
        assert!(html.contains("Ich denke an dich."));

        let store = ProgressStore::new(Database::new(&dir.join(DATABASE_FILE))?);
        assert!(store.load("verbs.csv").attempts().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_text_input_and_dataset_switch() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("a.csv", VERBS_CSV), ("b.csv", HELPERS_CSV)])?;
        let config = config(&dir, port, Some("a.csv"));
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        let (_, html) = post(port, &[("action", "Level"), ("value", "2")]).await?;
        assert!(html.contains("type=\"text\" name=\"preposition\""));
        assert!(html.contains("type=\"radio\" name=\"case\" value=\"Akk\""));
        assert!(html.contains("type=\"radio\" name=\"case\" value=\"Dat\""));
        assert!(!html.contains("type=\"text\" name=\"case\""));

        let (_, html) = post(
            port,
            &[("action", "Guess"), ("preposition", " AN "), ("case", "akk")],
        )
        .await?;
        assert!(html.contains("class=\"verdict correct\""));

        let (_, html) = post(port, &[("action", "Dataset"), ("value", "b.csv")]).await?;
        assert!(html.contains("helfen"));
        assert!(html.contains("Score: 0"));

        let (_, html) = post(port, &[("action", "Language"), ("value", "fr")]).await?;
        assert!(html.contains("Appris"));

        let (status, _) = post(port, &[("action", "Mode"), ("value", "everything")]).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(port, &[("action", "Dataset"), ("value", "c.csv")]).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let db = Database::new(&dir.join(DATABASE_FILE))?;
        assert_eq!(db.get("settings", "dataset")?.as_deref(), Some("b.csv"));
        assert_eq!(db.get("settings", "level")?.as_deref(), Some("2"));
        let store = ProgressStore::new(db);
        assert_eq!(store.load("a.csv").attempts().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_dataset_broken_while_running() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("a.csv", VERBS_CSV), ("b.csv", HELPERS_CSV)])?;
        let config = config(&dir, port, Some("a.csv"));
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        std::fs::remove_file(dir.join("b.csv"))?;
        let (status, html) = post(port, &[("action", "Dataset"), ("value", "b.csv")]).await?;
        assert!(status.is_success());
        assert!(html.contains("not found."));
        assert!(html.contains("class=\"error\""));

        let (_, html) = post(port, &[("action", "Dataset"), ("value", "a.csv")]).await?;
        assert!(html.contains("denken"));
        Ok(())
    }

    #[tokio::test]
    async fn test_case_only_item_in_default_mode() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("sentences.csv", SENTENCES_CSV)])?;
        let config = config(&dir, port, None);
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        let html = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?.text().await?;
        assert!(html.contains("Mit dem neu__ Auto"));
        assert!(!html.contains("value=\"Preposition\""));

        for round in 0..3 {
            let (_, html) = post(port, &[("action", "Case"), ("value", "Dat")]).await?;
            assert!(html.contains("class=\"verdict correct\""));
            assert_eq!(html.contains("Learned!"), round == 2);
            post(port, &[("action", "Continue")]).await?;
        }

        let html = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?.text().await?;
        assert!(html.contains("All verbs learned!"));
        let store = ProgressStore::new(Database::new(&dir.join(DATABASE_FILE))?);
        assert_eq!(store.load("sentences.csv").score(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_view_and_reset_mid_session() -> TestResult {
        let port = pick_unused_port().unwrap();
        let dir = create_collection(&[("verbs.csv", VERBS_CSV)])?;
        let config = config(&dir, port, None);
        spawn(async move { start_server(config).await });
        wait_for_server(TEST_HOST, port).await?;

        let html = reqwest::get(format!("http://{TEST_HOST}:{port}/")).await?.text().await?;
        assert!(html.contains("Progress (0 / 1)"));
        assert!(html.contains("<td class=\"streak\">0</td>"));

        post(port, &[("action", "Case"), ("value", "Akk")]).await?;
        post(port, &[("action", "Preposition"), ("value", "an")]).await?;
        let (_, html) = post(port, &[("action", "Continue")]).await?;
        assert!(html.contains("<td class=\"streak\">1</td>"));
        assert!(!html.contains("learned-row"));
        assert!(html.contains("value=\"Reset\""));

        // Reset while an item is being asked.
        let (status, html) = post(port, &[("action", "Reset")]).await?;
        assert!(status.is_success());
        assert!(html.contains("<td class=\"streak\">0</td>"));
        assert!(html.contains("value=\"Preposition\""));

        let store = ProgressStore::new(Database::new(&dir.join(DATABASE_FILE))?);
        assert!(store.load("verbs.csv").attempts().is_empty());
        Ok(())
    }
}
