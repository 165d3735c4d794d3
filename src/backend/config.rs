/// Backend endpoint configuration. Only the project URL and the public
/// anon key are involved; row access is enforced server-side by RLS.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    /// Resolution order: runtime environment, then build-time environment.
    pub fn from_env() -> Self {
        let url = std::env::var("BRAINMAP_SUPABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| option_env!("BRAINMAP_SUPABASE_URL").map(str::to_owned))
            .unwrap_or_else(|| "https://qqbyxydxxcuklakvjlfr.supabase.co".to_owned());

        let anon_key = std::env::var("BRAINMAP_SUPABASE_ANON_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| option_env!("BRAINMAP_SUPABASE_ANON_KEY").map(str::to_owned))
            .unwrap_or_default();

        if anon_key.is_empty() {
            log::warn!("BRAINMAP_SUPABASE_ANON_KEY is not set; requests will be rejected");
        }

        Self {
            url: url.trim_end_matches('/').to_owned(),
            anon_key,
        }
    }
}
