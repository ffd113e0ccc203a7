use std::rc::Rc;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use serde_json::json;
use web_sys::HtmlElement;
use yew::context::ContextHandle;
use yew::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::calendly::{self, Generation, SchedulerDialog, SchedulerState};
use crate::media::script_loader::ScriptResult;
use crate::media::services::PageServices;

#[derive(Properties, PartialEq)]
pub struct CalendlyModalProps {
    pub is_open: bool,
    pub on_close: Callback<()>,
    pub calendly_url: String,
    pub fallback_email: String,
    pub title: String,
}

pub enum CalendlyModalMsg {
    Close,
    ScriptSettled(Generation, ScriptResult),
    InitWidget(Generation),
}

pub struct CalendlyModal {
    dialog: SchedulerDialog,
    container: NodeRef,
    init_timer: Option<Timeout>,
    services: PageServices,
    _services_handle: Option<ContextHandle<PageServices>>,
}

impl CalendlyModal {
    fn open(&mut self, ctx: &Context<Self>) {
        let generation = self.dialog.open();
        let props = ctx.props();
        track_event(
            AnalyticsEvent::CalendlyOpen,
            json!({
                "title": props.title,
                "meeting_type": calendly::meeting_type(&props.calendly_url),
            }),
        );

        let load = self.services.calendly.load();
        ctx.link().send_future(async move {
            let result = load.await;
            if result.is_ok() {
                TimeoutFuture::new(200).await;
            }
            CalendlyModalMsg::ScriptSettled(generation, result)
        });
    }

    fn teardown(&mut self) {
        self.init_timer = None;
        if let Some(container) = self.container.cast::<HtmlElement>() {
            container.set_inner_html("");
        }
        self.dialog.close();
    }
}

impl Component for CalendlyModal {
    type Message = CalendlyModalMsg;
    type Properties = CalendlyModalProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (services, handle) = match ctx.link().context::<PageServices>(Callback::noop()) {
            Some((services, handle)) => (services, Some(handle)),
            None => (PageServices::browser(), None),
        };
        let link = ctx.link().clone();
        let dialog = SchedulerDialog::new(
            services.page.clone(),
            Rc::new(move || link.send_message(CalendlyModalMsg::Close)),
        );

        let mut modal = Self {
            dialog,
            container: NodeRef::default(),
            init_timer: None,
            services,
            _services_handle: handle,
        };
        if ctx.props().is_open {
            modal.open(ctx);
        }
        modal
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            CalendlyModalMsg::Close => {
                self.teardown();
                ctx.props().on_close.emit(());
                true
            }
            CalendlyModalMsg::ScriptSettled(generation, result) => self.dialog.script_settled(generation, result),
            CalendlyModalMsg::InitWidget(generation) => {
                let result = match self.container.cast::<HtmlElement>() {
                    Some(container) => calendly::init_inline_widget(&ctx.props().calendly_url, &container)
                        .map_err(|e| format!("{:?}", e)),
                    None => Err("scheduler container is not mounted".to_string()),
                };
                self.dialog.widget_initialized(generation, result)
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        match (old_props.is_open, props.is_open) {
            (false, true) => self.open(ctx),
            (true, false) => self.teardown(),
            (true, true) if old_props.calendly_url != props.calendly_url => {
                self.teardown();
                self.open(ctx);
            }
            _ => {}
        }
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if self.dialog.state() == SchedulerState::Closed {
            return;
        }
        self.dialog.focus_dialog();

        if self.dialog.state() == SchedulerState::Initializing && self.init_timer.is_none() {
            if let Some(generation) = self.dialog.generation() {
                let link = ctx.link().clone();
                self.init_timer = Some(Timeout::new(100, move || {
                    link.send_message(CalendlyModalMsg::InitWidget(generation));
                }));
            }
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.teardown();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let state = self.dialog.state();
        if state == SchedulerState::Closed {
            return html! {};
        }

        let close = ctx.link().callback(|_: MouseEvent| CalendlyModalMsg::Close);
        let stop = Callback::from(|e: MouseEvent| e.stop_propagation());
        let showing_widget = matches!(state, SchedulerState::Initializing | SchedulerState::Ready);

        html! {
            <div class="calendly-modal-overlay" onclick={close.clone()}>
                <div
                    class="calendly-modal-content"
                    role="dialog"
                    aria-modal="true"
                    aria-labelledby="calendly-modal-title"
                    onclick={stop}
                >
                    <button class="calendly-modal-close" aria-label="Close modal" onclick={close}>
                        {"×"}
                    </button>
                    <h2 id="calendly-modal-title">{ &props.title }</h2>

                    if matches!(state, SchedulerState::Loading | SchedulerState::Initializing) {
                        <div class="calendly-modal-status">
                            <p>{"Loading scheduler..."}</p>
                        </div>
                    }

                    if let SchedulerState::Error(message) = &state {
                        <div class="calendly-modal-status">
                            <p>{ message }</p>
                            <div class="calendly-modal-fallback">
                                <p>{"Please contact us directly at:"}</p>
                                <a href={format!("mailto:{}", props.fallback_email)}>
                                    <span class="calendly-modal-arrow">{"→"}</span>
                                    { &props.fallback_email }
                                </a>
                            </div>
                        </div>
                    }

                    <div
                        ref={self.container.clone()}
                        class="calendly-inline-widget"
                        data-url={props.calendly_url.clone()}
                        style={if showing_widget { "min-height: 700px; width: 100%;" } else { "display: none;" }}
                    />
                </div>
                <style>
                    {r#"
                        .calendly-modal-overlay {
                            position: fixed;
                            inset: 0;
                            z-index: 100;
                            display: flex;
                            align-items: center;
                            justify-content: center;
                            padding: 16px;
                            background: rgba(0, 0, 0, 0.85);
                        }
                        .calendly-modal-content {
                            position: relative;
                            width: 100%;
                            max-width: 800px;
                            max-height: 90vh;
                            overflow-y: auto;
                            padding: 32px;
                            border-radius: 4px;
                            background: #fff;
                            color: #111;
                        }
                        .calendly-modal-close {
                            position: absolute;
                            top: 16px;
                            right: 16px;
                            width: 40px;
                            height: 40px;
                            border: none;
                            border-radius: 50%;
                            background: none;
                            font-size: 24px;
                            cursor: pointer;
                        }
                        #calendly-modal-title {
                            font-size: 32px;
                            font-weight: 300;
                            margin-bottom: 24px;
                        }
                        .calendly-modal-status {
                            text-align: center;
                            padding: 40px 0;
                        }
                        .calendly-modal-fallback {
                            margin-top: 32px;
                        }
                        .calendly-modal-fallback a {
                            display: inline-flex;
                            align-items: center;
                            margin-top: 8px;
                            font-size: 18px;
                            font-weight: 500;
                            color: inherit;
                            text-decoration: none;
                        }
                        .calendly-modal-arrow {
                            margin-right: 8px;
                        }
                    "#}
                </style>
            </div>
        }
    }
}
