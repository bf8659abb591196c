use chrono::{Duration, Utc};
use std::fs;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const API_KEY: &str = "integration-key";

    pub async fn create_mock_server(base: &str, mock_response: &str, calls: u64) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v6/{API_KEY}/latest/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Writes a config file and a dotenv file pointing at the mock server.
    pub fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
        let env_path = dir.join(".env");
        std::fs::write(&env_path, format!("FXCONV_IT_API_KEY={API_KEY}\n"))
            .expect("Failed to write env file");

        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
provider:
  base_url: {}
  timeout_secs: 5
credentials:
  env_file: "{}"
  api_key_var: "FXCONV_IT_API_KEY"
"#,
            base_url,
            env_path.display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

fn success_body() -> String {
    let next_update = (Utc::now() + Duration::days(1)).to_rfc2822();
    format!(
        r#"{{
            "result": "success",
            "base_code": "USD",
            "time_next_update_utc": "{next_update}",
            "conversion_rates": {{"USD": 1, "EUR": 0.9, "GBP": 0.8}}
        }}"#
    )
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("USD", &success_body(), 1).await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            amount: 100.0,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_rates_command_with_mock() {
    let mock_server = test_utils::create_mock_server("USD", &success_body(), 1).await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Rates {
            base: "usd".to_string(),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_repeated_conversions_issue_one_request() {
    // The mock verifies on drop that exactly one request was made
    let mock_server = test_utils::create_mock_server("USD", &success_body(), 1).await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let config = fxconv::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let converter = fxconv::build_converter(&config).unwrap();

    let first = converter.convert("USD", "EUR", 100.0).await.unwrap();
    let second = converter.convert("usd", "GBP", 50.0).await.unwrap();
    info!(%first, %second, "Converted twice");

    assert_eq!(first.to_string(), "100.00 USD = 90.00 EUR");
    assert_eq!(second.to_string(), "50.00 USD = 40.00 GBP");
}

#[test_log::test(tokio::test)]
async fn test_upstream_error_surfaces_to_caller() {
    let body = r#"{"result": "error", "error-type": "invalid-key"}"#;
    let mock_server = test_utils::create_mock_server("USD", body, 1).await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            amount: 1.0,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Expected upstream error");
    let rate_err = err
        .downcast_ref::<fxconv::core::RateError>()
        .expect("Expected a RateError");
    assert_eq!(
        rate_err,
        &fxconv::core::RateError::UpstreamApi("invalid-key".to_string())
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_api_key_fails_before_request() {
    let mock_server = test_utils::create_mock_server("USD", &success_body(), 0).await;
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(temp_dir.path(), &mock_server.uri());
    fs::write(temp_dir.path().join(".env"), "SOMETHING_ELSE=1\n").unwrap();

    let config = fxconv::core::config::AppConfig::load_from_path(&config_path).unwrap();
    let converter = fxconv::build_converter(&config).unwrap();

    let err = converter.convert("USD", "EUR", 1.0).await.unwrap_err();
    assert!(matches!(err, fxconv::core::RateError::InvalidCredential(_)));
}
