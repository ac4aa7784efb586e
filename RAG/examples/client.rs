use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = std::env::var("FAQ_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5005".to_string());

    println!("Health Check:");
    let health_response = client.get(format!("{}/health", base_url)).send().await?;
    println!("Status: {}", health_response.status());
    let health_json: serde_json::Value = health_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&health_json)?);

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "How do I reset my password?".to_string());

    println!("\nQuestion: {}", question);
    let answer_response = client
        .post(format!("{}/get-answer", base_url))
        .json(&json!({ "question": question }))
        .send()
        .await?;

    println!("Status: {}", answer_response.status());
    let answer_json: serde_json::Value = answer_response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&answer_json)?);

    Ok(())
}
