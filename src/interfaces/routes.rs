use actix_web::web;

use crate::handlers::{auth, projects, system, uploads};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(system::health_check)
            .service(
                web::scope("/auth")
                    .service(auth::login)
                    .service(auth::logout)
                    .service(auth::status)
                    .service(auth::change_password),
            )
            .service(
                web::scope("/projects")
                    .service(projects::list_projects)
                    .service(projects::create_project)
                    .service(projects::delete_project_image)
                    .service(projects::get_project)
                    .service(projects::update_project)
                    .service(projects::delete_project),
            ),
    );

    cfg.service(uploads::serve_upload);
}
