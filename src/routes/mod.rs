pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::{AuthMiddleware, SessionManager};
use crate::store::TaskStore;

/// Shared handles every worker gets a clone of.
#[derive(Clone)]
pub struct AppState {
    pub sessions: web::Data<SessionManager>,
    pub tasks: web::Data<TaskStore>,
}

impl AppState {
    pub fn new(sessions: SessionManager, tasks: TaskStore) -> Self {
        Self {
            sessions: web::Data::new(sessions),
            tasks: web::Data::new(tasks),
        }
    }
}

/// Registers the route table. `/protected` and `/tasks` sit behind
/// `AuthMiddleware`; everything else is public.
pub fn config(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let require_auth = AuthMiddleware::new(state.sessions.clone());

        cfg.app_data(state.sessions.clone())
            .app_data(state.tasks.clone())
            .service(health::root)
            .service(health::health)
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh)
            .service(
                web::resource("/protected")
                    .wrap(require_auth.clone())
                    .route(web::get().to(auth::protected)),
            )
            .service(
                web::scope("/tasks")
                    .wrap(require_auth)
                    // The collection answers with and without a trailing slash.
                    .service(
                        web::resource(["", "/"])
                            .route(web::get().to(tasks::get_tasks))
                            .route(web::post().to(tasks::create_task)),
                    )
                    .service(tasks::get_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task),
            );
    }
}
