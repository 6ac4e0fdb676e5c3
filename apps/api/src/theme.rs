use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

/// Cookie holding the visitor's theme across sessions.
pub const THEME_COOKIE: &str = "fibro-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// The stored preference; unknown or missing values fall back to light.
    pub fn from_jar(jar: &CookieJar) -> Self {
        jar.get(THEME_COOKIE)
            .and_then(|cookie| Theme::parse(cookie.value()))
            .unwrap_or_default()
    }

    fn cookie(self) -> Cookie<'static> {
        Cookie::build((THEME_COOKIE, self.as_str()))
            .path("/")
            .same_site(SameSite::Lax)
            .permanent()
            .build()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

/// GET /api/v1/theme
pub async fn handle_get_theme(jar: CookieJar) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: Theme::from_jar(&jar),
    })
}

/// POST /api/v1/theme/toggle
pub async fn handle_toggle_theme(jar: CookieJar) -> (CookieJar, Json<ThemeResponse>) {
    let theme = Theme::from_jar(&jar).toggled();
    (jar.add(theme.cookie()), Json(ThemeResponse { theme }))
}
