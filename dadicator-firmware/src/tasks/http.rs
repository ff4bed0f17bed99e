// HTTP Server Task - Serviert das Panel (HTML, JSON, Captive Redirects)
use defmt::{info, warn};
use embassy_net::Stack;
use embassy_time::Duration;

use crate::SharedPanel;
use crate::config::{HTTP_BUFFER_SIZE, HTTP_PORT, TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE};
use crate::web::make_app;

/// HTTP Server Task
///
/// Genau eine Instanz: Requests werden nacheinander abgearbeitet, jeder
/// Request sieht die Effekte des vorherigen. Keine Keep-Alive-Verbindungen,
/// damit ein hängender Browser das Panel nicht blockiert.
#[embassy_executor::task]
pub async fn http_server_task(stack: &'static Stack<'static>, panel: &'static SharedPanel) {
    info!("HTTP: Server starting on port {}...", HTTP_PORT);

    let app = make_app(panel);

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(1)),
    });

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    // listen_and_serve kehrt nur bei einem Accept-Fehler zurück
    let _ = server
        .listen_and_serve(0, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    warn!("HTTP: Server ended");
}
