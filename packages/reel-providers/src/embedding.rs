use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{Error, Result};

/// Embeds a single text.
///
/// Sends a single-element batch and unwraps the first vector. HTTP 503 means
/// the model is still warming up and is the only status worth retrying; the
/// attempt budget and delay come from config. Any other status or a transport
/// error aborts immediately.
pub async fn embed(cfg: &reel_config::EmbeddingProviderConfig, text: &str) -> Result<Vec<f32>> {
	let Some(api_key) = cfg.api_key.as_deref() else {
		return Err(Error::MissingCredential);
	};

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": [text],
		"dimensions": cfg.dimensions,
	});

	for attempt in 1..=cfg.retry_attempts {
		let res = client
			.post(&url)
			.headers(crate::auth_headers(api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let status = res.status();

		if status == StatusCode::SERVICE_UNAVAILABLE {
			// No point waiting when there is no attempt left to spend.
			if attempt < cfg.retry_attempts {
				tokio::time::sleep(Duration::from_millis(cfg.retry_delay_ms)).await;
			}

			continue;
		}
		if !status.is_success() {
			return Err(Error::Status { status: status.as_u16() });
		}

		let json: Value = res.json().await?;

		return parse_embedding_response(json);
	}

	Err(Error::Unavailable { attempts: cfg.retry_attempts })
}

/// Accepts an OpenAI-style data envelope, a batch-of-one, or a bare vector.
fn parse_embedding_response(json: Value) -> Result<Vec<f32>> {
	if let Some(data) = json.get("data").and_then(|v| v.as_array()) {
		let embedding = data
			.first()
			.and_then(|item| item.get("embedding"))
			.and_then(|v| v.as_array())
			.ok_or_else(|| Error::InvalidResponse {
				message: "Embedding response data is missing an embedding array.".to_string(),
			})?;

		return collect_vector(embedding);
	}

	let Some(outer) = json.as_array() else {
		return Err(Error::InvalidResponse {
			message: "Embedding response is neither an envelope nor an array.".to_string(),
		});
	};

	match outer.first() {
		Some(Value::Array(inner)) => collect_vector(inner),
		Some(_) => collect_vector(outer),
		None => Err(Error::InvalidResponse {
			message: "Embedding response array is empty.".to_string(),
		}),
	}
}

fn collect_vector(values: &[Value]) -> Result<Vec<f32>> {
	let mut vec = Vec::with_capacity(values.len());

	for value in values {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vec.push(number as f32);
	}

	Ok(vec)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_envelope_response() {
		let json = serde_json::json!({
			"data": [
				{ "index": 0, "embedding": [0.5, 1.5] }
			]
		});
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![0.5, 1.5]);
	}

	#[test]
	fn parses_batch_of_one() {
		let json = serde_json::json!([[0.25, 0.75, -1.0]]);
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![0.25, 0.75, -1.0]);
	}

	#[test]
	fn parses_bare_vector() {
		let json = serde_json::json!([0.25, 0.75]);
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![0.25, 0.75]);
	}

	#[test]
	fn rejects_non_numeric_values() {
		let json = serde_json::json!(["a", "b"]);

		assert!(parse_embedding_response(json).is_err());
	}
}
