use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Method};
use rocket::response::status::NoContent;
use rocket::{options, Request, Response};

const ALLOWED_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// Opens every route to browsers on any origin.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-origin headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        if req.method() == Method::Options {
            res.set_header(Header::new("Access-Control-Allow-Methods", ALLOWED_METHODS));
            let requested = req
                .headers()
                .get_one("Access-Control-Request-Headers")
                .unwrap_or("Content-Type")
                .to_string();
            res.set_header(Header::new("Access-Control-Allow-Headers", requested));
            res.set_header(Header::new("Vary", "Access-Control-Request-Headers"));
        }
    }
}

/// Preflight for any path; the headers come from the fairing.
#[options("/<_..>")]
pub fn preflight() -> NoContent {
    NoContent
}
