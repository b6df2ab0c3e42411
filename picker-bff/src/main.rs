//! Picker BFF: HTTP backend for the DAM asset picker widget.
//!
//! Serves search, collection browsing and asset detail to the picker front
//! end and forwards each call to the upstream DAM function API as a signed
//! request, using the API key the caller sends as a bearer token.
//!
//! # Configuration
//! Loaded from `.env` (if present) and `PICKER__*` environment variables.
//!
//! | Env var                              | Default             |
//! |--------------------------------------|---------------------|
//! | `PICKER__BIND_ADDR`                  | `0.0.0.0:8080`      |
//! | `PICKER__REQUEST_TIMEOUT_SECS`       | `60`                |
//! | `PICKER__UPSTREAM__BASE_URL`         | `http://localhost`  |
//! | `PICKER__UPSTREAM__USER`             | `admin`             |
//! | `PICKER__UPSTREAM__TIMEOUT_SECS`     | `30`                |
//! | `PICKER__PAGING__DEFAULT_PAGE_SIZE`  | `20`                |
//! | `PICKER__PAGING__MAX_PAGE_SIZE`      | `100`               |

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use dam_client::{Gateway, GatewayOptions, Picker, ReqwestTransport};
use picker_bff::{config::Settings, router, AppState};
use tracing::info;

// ------------------------------------------------------------------ //
//  Entry point                                                        //
// ------------------------------------------------------------------ //

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("picker_bff=info".parse()?)
                .add_directive("dam_client=info".parse()?),
        )
        .json()
        .init();

    let settings = Settings::load()?;
    info!(
        upstream = %settings.upstream.base_url,
        user = %settings.upstream.user,
        "configured upstream DAM"
    );

    let transport = ReqwestTransport::new(Duration::from_secs(settings.upstream.timeout_secs))?;
    let gateway = Gateway::new(
        Arc::new(transport),
        GatewayOptions {
            base_url: settings.upstream.base_url.clone(),
            user: settings.upstream.user.clone(),
        },
    );

    let state = Arc::new(AppState {
        picker: Picker::new(gateway),
        paging: settings.paging,
    });

    let app = router(state, Duration::from_secs(settings.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!(addr = %settings.bind_addr, "picker-bff listening");

    axum::serve(listener, app).await?;

    Ok(())
}
