use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::CookieJar;

use crate::errors::DEGRADED_NOTICE;
use crate::state::AppState;
use crate::theme::Theme;

pub const APP_TITLE: &str = "Fibro Connect";
pub const APP_TAGLINE: &str = "A supportive community for sharing experiences and tracking wellness";

/// Document shell the browser bundle mounts into. Carries the theme on the
/// root element and, in degraded mode, a banner explaining why nothing loads.
pub fn render_document(theme: Theme, degraded: bool) -> String {
    let banner = if degraded {
        format!("    <div class=\"notice notice-degraded\" role=\"alert\">{DEGRADED_NOTICE}</div>\n")
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\" data-theme=\"{theme}\" class=\"{theme}\">\n\
         <head>\n    <meta charset=\"utf-8\">\n    <title>{APP_TITLE}</title>\n</head>\n\
         <body data-backend=\"{backend}\">\n\
         <header>\n    <h1>{APP_TITLE}</h1>\n    <p>{APP_TAGLINE}</p>\n</header>\n\
         {banner}\
         <main id=\"app\"></main>\n\
         </body>\n\
         </html>\n",
        theme = theme.as_str(),
        backend = if degraded { "unavailable" } else { "ready" },
    )
}

/// GET /
pub async fn index_handler(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    Html(render_document(Theme::from_jar(&jar), state.is_degraded()))
}
