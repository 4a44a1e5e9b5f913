use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_hostname: String,
    pub api_key: String,
    pub model: String,
    pub system_message: String,
    pub page_api_url: String,
    pub storage_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("WEBPILOT_STORAGE_PATH").unwrap_or("./".to_string());
        let api_hostname = env::var("WEBPILOT_API_HOSTNAME")
            .unwrap_or_else(|_| "https://genai-gateway.flava-cloud.com".to_string());
        // Empty means not yet authenticated; the stored credential,
        // when present, takes precedence over this
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| String::new());
        let model = env::var("WEBPILOT_MODEL").unwrap_or_else(|_| "gpt-5-mini".to_string());
        let system_message = env::var("WEBPILOT_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| "You are a helpful assistant.".to_string());
        let page_api_url = env::var("WEBPILOT_PAGE_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8787".to_string());

        Self {
            api_hostname,
            api_key,
            model,
            system_message,
            page_api_url,
            storage_path,
        }
    }
}
