use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Function, Reflect};

use crate::config;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyticsEvent {
    CtaClick,
    FundingApplySubmit,
    CalendlyOpen,
    ReportDownload,
    EventVideoOpen,
    EventVideoPlayInline,
    EventVideoError,
    VideoPlayClick,
    VideoRetryAttempt,
    VideoLoadingError,
    TeamSocialClick,
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::CtaClick => "cta_click",
            AnalyticsEvent::FundingApplySubmit => "funding_apply_submit",
            AnalyticsEvent::CalendlyOpen => "calendly_open",
            AnalyticsEvent::ReportDownload => "report_download",
            AnalyticsEvent::EventVideoOpen => "event_video_open",
            AnalyticsEvent::EventVideoPlayInline => "event_video_play_inline",
            AnalyticsEvent::EventVideoError => "event_video_error",
            AnalyticsEvent::VideoPlayClick => "video_play_click",
            AnalyticsEvent::VideoRetryAttempt => "video_retry_attempt",
            AnalyticsEvent::VideoLoadingError => "video_loading_error",
            AnalyticsEvent::TeamSocialClick => "team_social_click",
        }
    }
}

/// Fire-and-forget. Tracking problems are logged and never reach the caller.
pub fn track_event(event: AnalyticsEvent, params: Value) {
    match send(event, &params) {
        Ok(true) => log::debug!("GA4 event tracked: {}", event.name()),
        Ok(false) => log::debug!("[GA4 mock] {} {}", event.name(), params),
        Err(e) => log::warn!("Failed to track {}: {:?}", event.name(), e),
    }
}

fn send(event: AnalyticsEvent, params: &Value) -> Result<bool, JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(false);
    };
    let gtag = Reflect::get(&window, &JsValue::from_str("gtag"))?;
    let Some(gtag) = gtag.dyn_ref::<Function>() else {
        return Ok(false);
    };
    let params = params
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)?;
    gtag.call3(&JsValue::NULL, &JsValue::from_str("event"), &JsValue::from_str(event.name()), &params)?;
    Ok(true)
}

/// Injects the gtag loader and defines `window.gtag` when a measurement id
/// was configured at build time.
pub fn init_ga4() {
    let Some(measurement_id) = config::ga_measurement_id() else {
        log::info!("GA4 initialization skipped (no measurement ID)");
        return;
    };
    if let Err(e) = install_gtag(measurement_id) {
        log::warn!("GA4 initialization failed: {:?}", e);
    }
}

fn install_gtag(measurement_id: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let script = document.create_element("script")?;
    script.set_attribute("async", "")?;
    script.set_attribute(
        "src",
        &format!("https://www.googletagmanager.com/gtag/js?id={}", measurement_id),
    )?;
    document
        .head()
        .ok_or_else(|| JsValue::from_str("no head"))?
        .append_child(&script)?;

    let bootstrap = Function::new_no_args(
        "window.dataLayer = window.dataLayer || [];\
         window.gtag = function () { window.dataLayer.push(arguments); };",
    );
    bootstrap.call0(&JsValue::NULL)?;

    let gtag: Function = Reflect::get(&window, &JsValue::from_str("gtag"))?.dyn_into()?;
    gtag.call2(&JsValue::NULL, &JsValue::from_str("js"), &web_sys::js_sys::Date::new_0())?;
    let path = window.location().pathname().unwrap_or_default();
    let config = serde_json::json!({ "page_path": path })
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)?;
    gtag.call3(&JsValue::NULL, &JsValue::from_str("config"), &JsValue::from_str(measurement_id), &config)?;
    log::info!("GA4 initialized with {}", measurement_id);
    Ok(())
}
