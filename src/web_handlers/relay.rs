//! Local subscription relay
//!
//! Republishes the assembled document on a loopback HTTP endpoint so a Clash
//! client can subscribe to it by URL. The served state is a snapshot taken
//! at startup; reconversion means restarting the process.

use actix_web::{web, App, HttpResponse, HttpServer};
use log::info;

use crate::utils::http::USER_INFO_HEADER;

/// State the relay serves for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct RelaySnapshot {
    /// Serialized Clash document.
    pub document: String,
    /// Usage metadata echoed back to the client, if any.
    pub user_info: Option<String>,
}

/// Answers any GET with the full document as a downloadable subscription.
async fn subscription_handler(snapshot: web::Data<RelaySnapshot>) -> HttpResponse {
    let mut resp = HttpResponse::Ok();
    resp.content_type("text/yaml; charset=utf-8");
    resp.insert_header((
        "Content-Disposition",
        "attachment; filename=\"config.yaml\"",
    ));
    if let Some(user_info) = &snapshot.user_info {
        resp.insert_header((USER_INFO_HEADER, user_info.as_str()));
    }
    resp.body(snapshot.document.clone())
}

/// Configure the web service routes: every GET path serves the document.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::get().to(subscription_handler));
}

/// Serves the snapshot on the loopback interface until the process is
/// terminated.
pub async fn serve(snapshot: RelaySnapshot, port: u16) -> std::io::Result<()> {
    let data = web::Data::new(snapshot);

    info!("local subscription server started");
    info!("subscription url: http://127.0.0.1:{}", port);
    info!("press Ctrl+C to stop");

    HttpServer::new(move || App::new().app_data(data.clone()).configure(config))
        .workers(1)
        .bind(("127.0.0.1", port))?
        .run()
        .await
}
