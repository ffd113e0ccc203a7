use std::collections::HashMap;
use std::rc::Rc;

use serde_json::json;
use yew::context::ContextHandle;
use yew::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::components::media_modal::MediaModal;
use crate::media::dom::apply_preview_command;
use crate::media::gallery::{build_gallery, EventRecord, GalleryItem, PreviewKind};
use crate::media::modal::{ModalState, PlaybackCommand, PlaybackController, SessionToken};
use crate::media::script_loader::ScriptResult;
use crate::media::services::PageServices;

#[derive(Clone, Debug, PartialEq)]
pub struct SponsorCta {
    pub title: String,
    pub description: String,
    pub calendly_url: String,
    pub fallback_email: String,
}

#[derive(Properties, PartialEq)]
pub struct EventsArchiveProps {
    pub events: Vec<EventRecord>,
    pub sponsor: SponsorCta,
    pub on_open_calendly: Callback<SponsorCta>,
}

pub enum EventsArchiveMsg {
    Select(String),
    Close,
    Retry,
    ScriptSettled(SessionToken, ScriptResult),
    ModalMediaError(SessionToken),
    PreviewFailed(String),
    PreviewEnded(String),
}

pub struct EventsArchive {
    items: Vec<GalleryItem>,
    video_refs: HashMap<String, NodeRef>,
    playback: PlaybackController,
    services: PageServices,
    _services_handle: Option<ContextHandle<PageServices>>,
}

fn preview_refs(items: &[GalleryItem]) -> HashMap<String, NodeRef> {
    items
        .iter()
        .filter(|item| item.preview_video.is_some())
        .map(|item| (item.id.clone(), NodeRef::default()))
        .collect()
}

impl EventsArchive {
    fn run(&self, ctx: &Context<Self>, commands: Vec<PlaybackCommand>) {
        for command in commands {
            match command {
                PlaybackCommand::Preview(preview) => {
                    apply_preview_command(
                        &self.video_refs,
                        &preview,
                        ctx.link().callback(EventsArchiveMsg::PreviewFailed),
                    );
                }
                PlaybackCommand::LoadScript(token) => {
                    let load = self.services.vimeo.load();
                    ctx.link().send_future(async move {
                        EventsArchiveMsg::ScriptSettled(token, load.await)
                    });
                }
            }
        }
    }

    fn item(&self, id: &str) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn view_tile(&self, ctx: &Context<Self>, item: &GalleryItem) -> Html {
        let interactive = item.is_interactive();
        let onclick = {
            let id = item.id.clone();
            ctx.link().batch_callback(move |_: MouseEvent| {
                interactive.then(|| EventsArchiveMsg::Select(id.clone()))
            })
        };
        let cursor = if interactive { "cursor: pointer;" } else { "cursor: default;" };

        let media = match (&item.preview_video, self.video_refs.get(&item.id)) {
            (Some(src), Some(node_ref)) => {
                let ended_id = item.id.clone();
                let failed_id = item.id.clone();
                html! {
                    <video
                        ref={node_ref.clone()}
                        src={src.clone()}
                        poster={item.preview_image.clone()}
                        muted=true
                        loop=true
                        playsinline=true
                        preload="metadata"
                        class="event-tile-media"
                        onended={ctx.link().callback(move |_: Event| EventsArchiveMsg::PreviewEnded(ended_id.clone()))}
                        onerror={ctx.link().callback(move |_: Event| EventsArchiveMsg::PreviewFailed(failed_id.clone()))}
                    />
                }
            }
            _ => html! {
                <img
                    src={item.preview_image.clone().unwrap_or_default()}
                    alt={item.title.clone()}
                    class="event-tile-media"
                    loading="lazy"
                />
            },
        };

        let badge = match item.kind {
            PreviewKind::Image if item.preview_video.is_some() => {
                if self.playback.previews().is_playing(&item.id) { "❚❚" } else { "▶" }
            }
            PreviewKind::Image => "",
            _ => "▶",
        };

        html! {
            <div key={item.id.clone()} class="event-tile">
                <div class="event-tile-frame" style={cursor} onclick={onclick}>
                    { media }
                    if !badge.is_empty() {
                        <span class="event-tile-badge" aria-hidden="true">{ badge }</span>
                    }
                </div>
                <div class="event-tile-caption">
                    <p class="event-tile-date">{ &item.date }</p>
                    <h3>{ &item.title }</h3>
                </div>
            </div>
        }
    }
}

impl Component for EventsArchive {
    type Message = EventsArchiveMsg;
    type Properties = EventsArchiveProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (services, handle) = match ctx
            .link()
            .context::<PageServices>(Callback::noop())
        {
            Some((services, handle)) => (services, Some(handle)),
            None => {
                log::warn!("No PageServices in context, using browser defaults");
                (PageServices::browser(), None)
            }
        };

        let link = ctx.link().clone();
        let playback = PlaybackController::new(
            services.page.clone(),
            Rc::new(move || link.send_message(EventsArchiveMsg::Close)),
        );
        let items = build_gallery(&ctx.props().events);
        let video_refs = preview_refs(&items);

        Self {
            items,
            video_refs,
            playback,
            services,
            _services_handle: handle,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            EventsArchiveMsg::Select(id) => {
                let Some(item) = self.item(&id).cloned() else {
                    return false;
                };
                if item.opens_modal() {
                    track_event(
                        AnalyticsEvent::EventVideoOpen,
                        json!({ "event_title": item.title, "event_id": item.id }),
                    );
                } else if let Some(src) = &item.preview_video {
                    track_event(
                        AnalyticsEvent::EventVideoPlayInline,
                        json!({ "event_title": item.title, "video_src": src }),
                    );
                }
                let commands = self.playback.select_card(&item);
                self.run(ctx, commands);
                true
            }
            EventsArchiveMsg::Close => {
                self.playback.close();
                true
            }
            EventsArchiveMsg::Retry => {
                if let Some(item) = self.playback.modal().current() {
                    track_event(
                        AnalyticsEvent::VideoRetryAttempt,
                        json!({ "event_title": item.title, "event_id": item.id }),
                    );
                }
                let commands = self.playback.retry();
                self.run(ctx, commands);
                true
            }
            EventsArchiveMsg::ScriptSettled(token, result) => {
                let failed = result.is_err();
                let changed = self.playback.script_settled(token, result);
                if changed && failed {
                    if let Some(item) = self.playback.modal().current() {
                        track_event(
                            AnalyticsEvent::EventVideoError,
                            json!({ "event_title": item.title, "reason": "script_load" }),
                        );
                    }
                }
                changed
            }
            EventsArchiveMsg::ModalMediaError(token) => {
                let changed = self.playback.report_error(token);
                if changed {
                    if let Some(item) = self.playback.modal().current() {
                        track_event(
                            AnalyticsEvent::EventVideoError,
                            json!({ "event_title": item.title, "reason": "media" }),
                        );
                    }
                }
                changed
            }
            EventsArchiveMsg::PreviewFailed(id) => {
                self.playback.preview_failed(&id);
                true
            }
            EventsArchiveMsg::PreviewEnded(id) => {
                self.playback.preview_ended(&id);
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().events != old_props.events {
            self.playback.close();
            self.items = build_gallery(&ctx.props().events);
            self.video_refs = preview_refs(&self.items);
        }
        true
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if self.playback.modal().state() != ModalState::Closed {
            self.playback.focus_dialog();
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.playback.close();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let sponsor = ctx.props().sponsor.clone();
        let open_calendly = {
            let on_open_calendly = ctx.props().on_open_calendly.clone();
            let sponsor = sponsor.clone();
            Callback::from(move |_: MouseEvent| on_open_calendly.emit(sponsor.clone()))
        };

        let modal = self.playback.modal();
        let overlay = match (modal.current(), modal.token()) {
            (Some(item), Some(token)) => html! {
                <MediaModal
                    item={item.clone()}
                    state={modal.state()}
                    error={modal.error().map(str::to_string)}
                    on_close={ctx.link().callback(|_| EventsArchiveMsg::Close)}
                    on_retry={ctx.link().callback(|_| EventsArchiveMsg::Retry)}
                    on_media_error={ctx.link().callback(move |_| EventsArchiveMsg::ModalMediaError(token))}
                />
            },
            _ => html! {},
        };

        html! {
            <section id="past-events" class="events-archive">
                <div class="events-archive-inner">
                    <div class="events-archive-header">
                        <h2>{"Past Events"}</h2>
                        <p>{"Explore recordings from our archive of thought-provoking events and discussions."}</p>
                    </div>

                    if self.items.is_empty() {
                        <p class="events-archive-empty">{"No recordings yet. Check back soon."}</p>
                    } else {
                        <div class="events-archive-grid">
                            { for self.items.iter().map(|item| self.view_tile(ctx, item)) }
                        </div>
                    }

                    <div class="events-archive-sponsor">
                        <div class="events-archive-sponsor-copy">
                            <h3>{ &sponsor.title }</h3>
                            <p>{ &sponsor.description }</p>
                        </div>
                        <button class="events-archive-sponsor-button" onclick={open_calendly}>
                            {"Schedule a Call"}
                        </button>
                    </div>
                </div>

                { overlay }

                <style>
                    {r#"
                        .events-archive {
                            background: #000;
                            color: #fff;
                            padding: 4rem 1.5rem;
                        }
                        .events-archive-inner {
                            max-width: 1440px;
                            margin: 0 auto;
                        }
                        .events-archive-header {
                            margin-bottom: 4rem;
                            padding-bottom: 1rem;
                            border-bottom: 2px solid #fff;
                        }
                        .events-archive-grid {
                            display: grid;
                            grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
                            gap: 2rem;
                        }
                        .event-tile {
                            display: flex;
                            flex-direction: column;
                            border: 2px solid #fff;
                        }
                        .event-tile-frame {
                            position: relative;
                            aspect-ratio: 16 / 9;
                            overflow: hidden;
                            background: #000;
                        }
                        .event-tile-media {
                            width: 100%;
                            height: 100%;
                            object-fit: cover;
                        }
                        .event-tile-badge {
                            position: absolute;
                            bottom: 1rem;
                            left: 1rem;
                            padding: 0.25rem 0.75rem;
                            border: 2px solid #fff;
                            background: #000;
                        }
                        .event-tile-caption {
                            padding: 1.5rem;
                        }
                        .event-tile-date {
                            color: #9ca3af;
                            margin-bottom: 0.5rem;
                        }
                        .events-archive-sponsor {
                            display: flex;
                            flex-wrap: wrap;
                            align-items: center;
                            gap: 2rem;
                            margin-top: 4rem;
                            padding-top: 4rem;
                            border-top: 2px solid #fff;
                        }
                        .events-archive-sponsor-copy {
                            flex: 1;
                        }
                        .events-archive-sponsor-button {
                            padding: 0.75rem 2rem;
                            font-size: 1.1rem;
                            color: #fff;
                            background: #000;
                            border: 2px solid #fff;
                            cursor: pointer;
                        }
                        .events-archive-sponsor-button:hover {
                            color: #000;
                            background: #fff;
                        }
                    "#}
                </style>
            </section>
        }
    }
}
