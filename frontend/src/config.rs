#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3000"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

pub const VIMEO_SCRIPT_URL: &str = "https://player.vimeo.com/api/player.js";
pub const VIMEO_PLAYER_BASE: &str = "https://player.vimeo.com/video";
pub const CALENDLY_SCRIPT_URL: &str = "https://assets.calendly.com/assets/external/widget.js";

/// Shown in error states so visitors can still reach the team.
pub const CONTACT_EMAIL: &str = "hello@creadorventures.com";

/// Baked in at build time; analytics stay in mock mode when unset.
pub fn ga_measurement_id() -> Option<&'static str> {
    option_env!("GA_MEASUREMENT_ID").filter(|id| !id.is_empty())
}
