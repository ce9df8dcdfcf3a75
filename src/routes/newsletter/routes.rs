use crate::routes;
use actix_web::web;

pub fn newsletter_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/preview", web::post().to(routes::preview_newsletter));
}
