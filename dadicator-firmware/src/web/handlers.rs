// HTTP Handler-Services für das Panel
//
// Jeder Endpunkt ist ein eigenes Service-Objekt mit einer expliziten
// Referenz auf den geteilten Controller (keine Closures mit Captures).
// Ablauf pro Request: Controller sperren → optional Mutation + Sync →
// Zustand kopieren → Sperre lösen → rendern → senden.

use alloc::string::String;
use core::fmt::Write as _;

use dadicator_core::{LightPanel, Notice, render_html};
use defmt::{error, info, warn};
use picoserve::io::embedded_io_async;
use picoserve::request::Request;
use picoserve::response::{Connection, IntoResponse, Response, ResponseWriter, StatusCode};
use picoserve::routing::{PathRouter, RequestHandlerService, get_service, parse_path_segment};
use picoserve::{ResponseSent, Router};

use crate::SharedPanel;
use crate::config::{AP_PORTAL_URL, HTML_BUFFER_SIZE, JSON_API_ENABLED, JSON_STATUS_BUFFER_SIZE};
use crate::web::{CONTENT_TYPE_HTML, CONTENT_TYPE_JSON};

/// Baut den Router mit allen Panel-Endpunkten
///
/// | Pfad                          | Effekt        | Antwort |
/// |-------------------------------|---------------|---------|
/// | `/`                           | keiner        | HTML    |
/// | `/status`                     | keiner        | JSON    |
/// | `/led/{color}/{action}`       | Mutation+Sync | HTML    |
/// | `/json_led/{color}/{action}`  | Mutation+Sync | JSON    |
///
/// Die Pfad-Segmente werden ungeprüft als Text übernommen, die Validierung
/// macht der Mutator in dadicator-core.
pub fn make_app(panel: &'static SharedPanel) -> Router<impl PathRouter> {
    Router::new()
        .route("/", get_service(PanelView::new(panel, BodyFormat::Html)))
        .route("/status", get_service(PanelView::new(panel, BodyFormat::Json)))
        .route(
            (
                "/led",
                parse_path_segment::<String>(),
                parse_path_segment::<String>(),
            ),
            get_service(PanelCommand::new(panel, BodyFormat::Html)),
        )
        .route(
            (
                "/json_led",
                parse_path_segment::<String>(),
                parse_path_segment::<String>(),
            ),
            get_service(PanelCommand::new(panel, BodyFormat::Json)),
        )
        // Captive Portal Probes (Android, iOS/macOS, Windows)
        .route("/generate_204", get_service(CaptiveRedirect))
        .route("/gen_204", get_service(CaptiveRedirect))
        .route("/hotspot-detect.html", get_service(CaptiveRedirect))
        .route("/connecttest.txt", get_service(CaptiveRedirect))
        .route("/ncsi.txt", get_service(CaptiveRedirect))
}

/// Ausgabeformat eines Endpunkts
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum BodyFormat {
    Html,
    Json,
}

impl BodyFormat {
    /// JSON-Endpunkte sind optional (Cargo-Feature `json-api`)
    fn enabled(self) -> bool {
        self == BodyFormat::Html || JSON_API_ENABLED
    }
}

/// Fehler beim Rendern in die festen Buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum RenderError {
    /// HTML passt nicht in HTML_BUFFER_SIZE
    HtmlOverflow,
    /// serde-json-core konnte nicht serialisieren
    JsonFailed,
}

/// Antwort eines Panel-Endpunkts
enum PanelResponse {
    Html(heapless::String<HTML_BUFFER_SIZE>),
    Json(heapless::String<JSON_STATUS_BUFFER_SIZE>),
    NotFound,
    RenderFailed,
}

impl PanelResponse {
    /// Rendert den (kopierten) Zustand im gewünschten Format
    fn render(format: BodyFormat, panel: &LightPanel, notice: &Notice<'_>) -> Self {
        let rendered = match format {
            BodyFormat::Html => render_page(panel, notice).map(PanelResponse::Html),
            BodyFormat::Json => render_status(panel).map(PanelResponse::Json),
        };
        rendered.unwrap_or_else(|e| {
            error!("HTTP: Render failed: {}", e);
            PanelResponse::RenderFailed
        })
    }
}

impl IntoResponse for PanelResponse {
    async fn write_to<R: embedded_io_async::Read, W: ResponseWriter<Error = R::Error>>(
        self,
        connection: Connection<'_, R>,
        response_writer: W,
    ) -> Result<ResponseSent, W::Error> {
        match self {
            PanelResponse::Html(body) => {
                Response::new(StatusCode::OK, body.as_str())
                    .with_header("Content-Type", CONTENT_TYPE_HTML)
                    .write_to(connection, response_writer)
                    .await
            }
            PanelResponse::Json(body) => {
                Response::new(StatusCode::OK, body.as_str())
                    .with_header("Content-Type", CONTENT_TYPE_JSON)
                    .with_header("Cache-Control", "no-store")
                    .write_to(connection, response_writer)
                    .await
            }
            PanelResponse::NotFound => {
                Response::new(StatusCode::new(404), "Not Found")
                    .write_to(connection, response_writer)
                    .await
            }
            PanelResponse::RenderFailed => {
                Response::new(StatusCode::new(500), "Internal Server Error")
                    .write_to(connection, response_writer)
                    .await
            }
        }
    }
}

fn render_page(
    panel: &LightPanel,
    notice: &Notice<'_>,
) -> Result<heapless::String<HTML_BUFFER_SIZE>, RenderError> {
    let mut body = heapless::String::new();
    render_html(&mut body, panel, notice).map_err(|_| RenderError::HtmlOverflow)?;
    Ok(body)
}

fn render_status(
    panel: &LightPanel,
) -> Result<heapless::String<JSON_STATUS_BUFFER_SIZE>, RenderError> {
    let mut buffer = [0u8; JSON_STATUS_BUFFER_SIZE];
    let n = serde_json_core::to_slice(&panel.status(), &mut buffer)
        .map_err(|_| RenderError::JsonFailed)?;
    let json = core::str::from_utf8(&buffer[..n]).map_err(|_| RenderError::JsonFailed)?;

    let mut body = heapless::String::new();
    body.write_str(json).map_err(|_| RenderError::JsonFailed)?;
    Ok(body)
}

// ============================================================================
// GET / und GET /status
// ============================================================================

/// Zeigt den aktuellen Zustand ohne Mutation
pub struct PanelView {
    panel: &'static SharedPanel,
    format: BodyFormat,
}

impl PanelView {
    pub fn new(panel: &'static SharedPanel, format: BodyFormat) -> Self {
        Self { panel, format }
    }
}

impl RequestHandlerService<()> for PanelView {
    async fn call_request_handler_service<
        R: embedded_io_async::Read,
        W: ResponseWriter<Error = R::Error>,
    >(
        &self,
        _state: &(),
        _path_parameters: (),
        request: Request<'_, R>,
        response_writer: W,
    ) -> Result<ResponseSent, W::Error> {
        let response = if self.format.enabled() {
            let panel = self.panel.lock(|controller| controller.borrow().panel());
            PanelResponse::render(self.format, &panel, &Notice::Welcome)
        } else {
            PanelResponse::NotFound
        };

        response
            .write_to(request.body_connection.finalize().await?, response_writer)
            .await
    }
}

// ============================================================================
// GET /led/{color}/{action} und GET /json_led/{color}/{action}
// ============================================================================

/// Führt Mutation + Sync aus und zeigt danach den Zustand
///
/// Ungültige Tokens ändern nichts, die Antwort ist trotzdem 200 mit dem
/// unveränderten Zustand.
pub struct PanelCommand {
    panel: &'static SharedPanel,
    format: BodyFormat,
}

impl PanelCommand {
    pub fn new(panel: &'static SharedPanel, format: BodyFormat) -> Self {
        Self { panel, format }
    }
}

impl RequestHandlerService<(), (String, String)> for PanelCommand {
    async fn call_request_handler_service<
        R: embedded_io_async::Read,
        W: ResponseWriter<Error = R::Error>,
    >(
        &self,
        _state: &(),
        (color, action): (String, String),
        request: Request<'_, R>,
        response_writer: W,
    ) -> Result<ResponseSent, W::Error> {
        if !self.format.enabled() {
            return PanelResponse::NotFound
                .write_to(request.body_connection.finalize().await?, response_writer)
                .await;
        }

        let (panel, notice, synced) = self.panel.lock(|controller| {
            let mut controller = controller.borrow_mut();
            let (notice, synced) = controller.handle(&color, &action);
            (controller.panel(), notice, synced)
        });

        match notice {
            Notice::Applied(command) => info!("HTTP: {} -> {}", command.light, command.switch),
            Notice::Rejected(rejected) => info!("HTTP: Ignoring request: {}", rejected),
            Notice::Welcome => {}
        }
        if let Err(e) = synced {
            warn!("HTTP: Lamp sync failed: {}", e);
        }

        PanelResponse::render(self.format, &panel, &notice)
            .write_to(request.body_connection.finalize().await?, response_writer)
            .await
    }
}

// ============================================================================
// Captive Portal Probes
// ============================================================================

/// Leitet Connectivity-Checks auf die Panel-Seite um
///
/// Im Station-Modus kommen diese Pfade nicht an, weil die Geräte ihre
/// Checks dort gegen das echte Internet fahren.
pub struct CaptiveRedirect;

impl RequestHandlerService<()> for CaptiveRedirect {
    async fn call_request_handler_service<
        R: embedded_io_async::Read,
        W: ResponseWriter<Error = R::Error>,
    >(
        &self,
        _state: &(),
        _path_parameters: (),
        request: Request<'_, R>,
        response_writer: W,
    ) -> Result<ResponseSent, W::Error> {
        info!("HTTP: Captive portal probe, redirecting to {}", AP_PORTAL_URL);
        Response::new(StatusCode::new(302), "Redirecting to the panel")
            .with_header("Location", AP_PORTAL_URL)
            .write_to(request.body_connection.finalize().await?, response_writer)
            .await
    }
}
