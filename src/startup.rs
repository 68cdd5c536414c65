use std::{net::TcpListener, sync::Arc};

use actix_files::Files;
use actix_web::{
    dev::Server,
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};

use crate::{
    routes::{dashboard_route, default_route, export_route, sheet_route, upload_route},
    services::{CompletionProvider, SheetStore, WebSearcher},
};

pub use dashboard_route::DashboardConfig;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(default_route::default).service(
        web::scope("/app")
            .service(dashboard_route::dashboard)
            .service(dashboard_route::run_dashboard)
            .service(upload_route::upload_csv)
            .service(export_route::export_csv)
            .service(sheet_route::update_sheet),
    );
}

pub fn run(
    listener: TcpListener,
    searcher: Arc<dyn WebSearcher>,
    completer: Arc<dyn CompletionProvider>,
    sheets: Arc<dyn SheetStore>,
    dashboard_config: DashboardConfig,
) -> Result<Server, std::io::Error> {
    let searcher: Data<dyn WebSearcher> = Data::from(searcher);
    let completer: Data<dyn CompletionProvider> = Data::from(completer);
    let sheets: Data<dyn SheetStore> = Data::from(sheets);
    let dashboard_config = Data::new(dashboard_config);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(Files::new("/static", "./templates/static").prefer_utf8(true))
            .configure(routes)
            .app_data(searcher.clone())
            .app_data(completer.clone())
            .app_data(sheets.clone())
            .app_data(dashboard_config.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
