use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub store_url: String,
    pub api_token: String,
    pub page_limit: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_url = env::var("MEDIFLOW_STORE_URL")?;
        // The token is the "signed in" gate; the identity provider that
        // issues it is external to this application.
        let api_token = env::var("MEDIFLOW_API_TOKEN")
            .map_err(|_| anyhow::anyhow!("MEDIFLOW_API_TOKEN is not set; sign in first"))?;
        let page_limit = env::var("MEDIFLOW_PAGE_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(20);

        Ok(Self {
            store_url,
            api_token,
            page_limit,
        })
    }
}
