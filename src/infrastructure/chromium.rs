//! Browser driver backed by a headless Chromium process.
//!
//! Each launch spawns one dedicated process plus an event loop task that
//! drains devtools messages until the connection closes. Nothing is pooled;
//! the session manager closes the browser after a single audit.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::{CookieParam, CookieSameSite, TimeSinceEpoch};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use crate::domain::audit::{CookieSpec, SameSite};
use crate::domain::engine::{
    BrowserDriver, BrowserHandle, EngineEndpoint, EngineFailure, LaunchPlan, PageHandle,
};

fn cdp(error: CdpError) -> EngineFailure {
    EngineFailure::Protocol(error.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct ChromiumDriver;

impl ChromiumDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn launch(&self, plan: &LaunchPlan) -> Result<Box<dyn BrowserHandle>, EngineFailure> {
        let mut builder = BrowserConfig::builder().args(plan.args.clone());
        if let Some(executable) = &plan.executable {
            builder = builder.chrome_executable(executable);
        }
        if !plan.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(EngineFailure::Protocol)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(cdp)?;
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let endpoint = endpoint_from_ws(browser.websocket_address());
        debug!(port = ?endpoint.devtools_port, "browser launched");
        Ok(Box::new(ChromiumBrowser {
            browser,
            events,
            endpoint,
        }))
    }
}

struct ChromiumBrowser {
    browser: Browser,
    events: JoinHandle<()>,
    endpoint: EngineEndpoint,
}

#[async_trait]
impl BrowserHandle for ChromiumBrowser {
    async fn open_page(&self) -> Result<Box<dyn PageHandle>, EngineFailure> {
        let page = self.browser.new_page("about:blank").await.map_err(cdp)?;
        Ok(Box::new(ChromiumPage { page }))
    }

    fn endpoint(&self) -> EngineEndpoint {
        self.endpoint.clone()
    }

    async fn close(&mut self) -> Result<(), EngineFailure> {
        self.browser.close().await.map_err(cdp)?;
        if let Err(error) = self.browser.wait().await {
            debug!(%error, "browser process wait failed");
        }
        // The event loop ends once the devtools connection is gone.
        let _ = (&mut self.events).await;
        Ok(())
    }
}

struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn seed_cookies(&self, cookies: &[CookieSpec]) -> Result<(), EngineFailure> {
        self.page
            .set_cookies(cookie_params(cookies)?)
            .await
            .map_err(cdp)?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), EngineFailure> {
        self.page.close().await.map_err(cdp)
    }
}

fn cookie_params(cookies: &[CookieSpec]) -> Result<Vec<CookieParam>, EngineFailure> {
    cookies
        .iter()
        .map(|cookie| {
            CookieParam::builder()
                .name(cookie.name.as_str())
                .value(cookie.value.as_str())
                .domain(cookie.domain.as_str())
                .path(cookie.path.as_str())
                .secure(cookie.secure)
                .http_only(cookie.http_only)
                .same_site(same_site(cookie.same_site))
                .expires(TimeSinceEpoch::new(cookie.expires_at as f64))
                .build()
                .map_err(EngineFailure::Protocol)
        })
        .collect()
}

fn same_site(value: SameSite) -> CookieSameSite {
    match value {
        SameSite::Strict => CookieSameSite::Strict,
        SameSite::Lax => CookieSameSite::Lax,
        SameSite::None => CookieSameSite::None,
    }
}

/// An attaching engine dials the devtools port baked into the browser's
/// websocket address.
fn endpoint_from_ws(ws: &str) -> EngineEndpoint {
    let devtools_port = Url::parse(ws).ok().and_then(|u| u.port());
    EngineEndpoint {
        devtools_port,
        websocket_url: Some(ws.to_string()),
    }
}
