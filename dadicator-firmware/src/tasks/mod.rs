// Task-Modul: Enthält alle Embassy Tasks
//
// Station-Modus: connection_task, net_task, dhcp_task, mdns_responder_task
// Access-Point-Modus: access_point_task, net_task, dhcp_server_task, dns_server_task
// In beiden Modi: http_server_task

pub mod http;
pub mod mdns;
pub mod portal;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use http::http_server_task;
pub use mdns::mdns_responder_task;
pub use portal::{dhcp_server_task, dns_server_task};
pub use wifi::{access_point_task, connection_task, dhcp_task, net_task};
