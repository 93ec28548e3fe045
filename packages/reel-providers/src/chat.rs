use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Runs one bounded chat completion and returns the raw assistant content.
///
/// No retries: discovery is best-effort and the caller degrades to an empty
/// candidate list on any failure.
pub async fn complete(
	cfg: &reel_config::DiscoveryProviderConfig,
	messages: &[Value],
) -> Result<String> {
	let Some(api_key) = cfg.api_key.as_deref() else {
		return Err(Error::MissingCredential);
	};

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let status = res.status();

	if !status.is_success() {
		return Err(Error::Status { status: status.as_u16() });
	}

	let json: Value = res.json().await?;

	parse_completion_content(json)
}

fn parse_completion_content(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(|content| content.to_string())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing message content.".to_string(),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "[\"Akira\"]" } }
			]
		});
		let content = parse_completion_content(json).expect("parse failed");

		assert_eq!(content, "[\"Akira\"]");
	}

	#[test]
	fn rejects_missing_content() {
		let json = serde_json::json!({ "choices": [] });

		assert!(parse_completion_content(json).is_err());
	}
}
