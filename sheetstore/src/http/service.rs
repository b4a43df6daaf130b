// SPDX-License-Identifier: AGPL-3.0-or-later

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Result;
use axum::extract::Extension;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use log::debug;
use tower_http::cors::{Any, CorsLayer};

use crate::context::Context;
use crate::http::api::{
    handle_create_sheet, handle_delete_sheet, handle_get_sheet, handle_list_sheets,
    handle_sheet_raw, handle_update_sheet,
};
use crate::http::context::HttpServiceContext;

/// Route to the sheet record collection.
const SHEETS_ROUTE: &str = "/sheets";

/// Build HTTP server with the sheet record API.
pub fn build_server(http_context: HttpServiceContext) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false)
        .allow_origin(Any);

    Router::new()
        // Add sheet record routes
        .route(
            SHEETS_ROUTE,
            get(handle_list_sheets).post(handle_create_sheet),
        )
        .route(
            "/sheets/:id",
            get(handle_get_sheet)
                .patch(handle_update_sheet)
                .delete(handle_delete_sheet),
        )
        // Derived workbook bytes, computed from `data` per request
        .route("/sheets/:id/raw", get(handle_sheet_raw))
        // Add middlewares
        .layer(cors)
        // Add shared context
        .layer(Extension(http_context))
}

/// Start HTTP server, serving the API until the shutdown signal triggers.
pub async fn http_service(context: Context, signal: triggered::Listener) -> Result<()> {
    let http_port = context.config.http_port;
    let http_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), http_port);

    // Introduce a new context for all HTTP routes
    let http_context = HttpServiceContext::new(
        context.store.clone(),
        context.config.default_locale.clone(),
    );

    axum::Server::try_bind(&http_address)?
        .serve(build_server(http_context).into_make_service())
        .with_graceful_shutdown(async {
            debug!("HTTP service is ready");
            signal.await;
        })
        .await?;

    Ok(())
}
