use crate::routes;
use actix_web::web;

pub fn webhook_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/newsletter", web::post().to(routes::receive_newsletter));
}
