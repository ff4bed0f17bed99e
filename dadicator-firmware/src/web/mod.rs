// Web-Modul für den HTTP Server
// Router und Handler-Services für das Panel

pub mod handlers;

pub use handlers::make_app;

/// Content-Type der Panel-Seite
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Content-Type von /status und /json_led/*
pub const CONTENT_TYPE_JSON: &str = "application/json";
