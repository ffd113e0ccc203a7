use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{json, Value};
use yew::context::ContextHandle;
use yew::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::components::media_modal::MediaModal;
use crate::media::dom::apply_preview_command;
use crate::media::gallery::{EventRecord, GalleryItem};
use crate::media::modal::{ModalState, PlaybackCommand, PlaybackController, SessionToken};
use crate::media::script_loader::ScriptResult;
use crate::media::services::PageServices;

const HERO_ID: &str = "hero-reel";

#[derive(Properties, PartialEq)]
pub struct VideoHeroProps {
    pub preview_video_src: String,
    pub vimeo_id: String,
    #[prop_or_default]
    pub poster_src: Option<String>,
    #[prop_or_else(|| "Our Reel".to_string())]
    pub title: String,
}

pub enum VideoHeroMsg {
    PlayClick,
    Close,
    Retry,
    ScriptSettled(SessionToken, ScriptResult),
    ModalMediaError(SessionToken),
    PreviewFailed(String),
}

/// Homepage reel: a silent looping clip with a play button that opens the
/// full video in the shared modal.
pub struct VideoHero {
    item: Option<GalleryItem>,
    preview_ref: NodeRef,
    playback: PlaybackController,
    services: PageServices,
    _services_handle: Option<ContextHandle<PageServices>>,
}

fn hero_item(props: &VideoHeroProps) -> Option<GalleryItem> {
    let record = EventRecord {
        id: HERO_ID.to_string(),
        title: props.title.clone(),
        preview_image: props.poster_src.clone(),
        preview_video_src: Some(props.preview_video_src.clone()),
        vimeo_id: Some(props.vimeo_id.clone()),
        width: 16,
        height: 9,
        ..Default::default()
    };
    match GalleryItem::new(record) {
        Ok(item) => Some(item),
        Err(e) => {
            log::error!("Video hero misconfigured: {}", e);
            None
        }
    }
}

/// Params for a `video_loading_error` event when the last transition put the
/// modal into its error state.
fn loading_error(playback: &PlaybackController, changed: bool, vimeo_id: &str, reason: &str) -> Option<Value> {
    (changed && playback.modal().state() == ModalState::Error)
        .then(|| json!({ "vimeo_id": vimeo_id, "reason": reason }))
}

impl VideoHero {
    fn run(&self, ctx: &Context<Self>, commands: Vec<PlaybackCommand>) {
        let refs = HashMap::from([(HERO_ID.to_string(), self.preview_ref.clone())]);
        for command in commands {
            match command {
                PlaybackCommand::Preview(preview) => {
                    apply_preview_command(&refs, &preview, ctx.link().callback(VideoHeroMsg::PreviewFailed));
                }
                PlaybackCommand::LoadScript(token) => {
                    let load = self.services.vimeo.load();
                    ctx.link()
                        .send_future(async move { VideoHeroMsg::ScriptSettled(token, load.await) });
                }
            }
        }
    }

    fn resume_preview(&mut self, ctx: &Context<Self>) {
        let Some(item) = self.item.clone() else {
            return;
        };
        if !self.playback.previews().is_playing(&item.id) {
            let commands = self.playback.toggle_preview(&item);
            self.run(ctx, commands);
        }
    }
}

impl Component for VideoHero {
    type Message = VideoHeroMsg;
    type Properties = VideoHeroProps;

    fn create(ctx: &Context<Self>) -> Self {
        let (services, handle) = match ctx.link().context::<PageServices>(Callback::noop()) {
            Some((services, handle)) => (services, Some(handle)),
            None => (PageServices::browser(), None),
        };
        let link = ctx.link().clone();
        let playback = PlaybackController::new(
            services.page.clone(),
            Rc::new(move || link.send_message(VideoHeroMsg::Close)),
        );

        Self {
            item: hero_item(ctx.props()),
            preview_ref: NodeRef::default(),
            playback,
            services,
            _services_handle: handle,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            VideoHeroMsg::PlayClick => {
                let Some(item) = self.item.clone() else {
                    return false;
                };
                track_event(AnalyticsEvent::VideoPlayClick, json!({ "vimeo_id": ctx.props().vimeo_id }));
                let commands = self.playback.open(&item);
                self.run(ctx, commands);
                true
            }
            VideoHeroMsg::Close => {
                self.playback.close();
                self.resume_preview(ctx);
                true
            }
            VideoHeroMsg::Retry => {
                track_event(AnalyticsEvent::VideoRetryAttempt, json!({ "vimeo_id": ctx.props().vimeo_id }));
                let commands = self.playback.retry();
                self.run(ctx, commands);
                true
            }
            VideoHeroMsg::ScriptSettled(token, result) => {
                let changed = self.playback.script_settled(token, result);
                if let Some(params) = loading_error(&self.playback, changed, &ctx.props().vimeo_id, "script_load") {
                    track_event(AnalyticsEvent::VideoLoadingError, params);
                }
                changed
            }
            VideoHeroMsg::ModalMediaError(token) => {
                let changed = self.playback.report_error(token);
                if let Some(params) = loading_error(&self.playback, changed, &ctx.props().vimeo_id, "media") {
                    track_event(AnalyticsEvent::VideoLoadingError, params);
                }
                changed
            }
            VideoHeroMsg::PreviewFailed(id) => {
                // Autoplay restrictions land here too. The poster stays visible.
                self.playback.preview_failed(&id);
                false
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props() != old_props {
            self.playback.close();
            self.item = hero_item(ctx.props());
        }
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.resume_preview(ctx);
        }
        if self.playback.modal().state() != ModalState::Closed {
            self.playback.focus_dialog();
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.playback.close();
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(item) = &self.item else {
            return html! {};
        };
        let props = ctx.props();
        let modal = self.playback.modal();

        let overlay = match (modal.current(), modal.token()) {
            (Some(current), Some(token)) => html! {
                <MediaModal
                    item={current.clone()}
                    state={modal.state()}
                    error={modal.error().map(str::to_string)}
                    on_close={ctx.link().callback(|_| VideoHeroMsg::Close)}
                    on_retry={ctx.link().callback(|_| VideoHeroMsg::Retry)}
                    on_media_error={ctx.link().callback(move |_| VideoHeroMsg::ModalMediaError(token))}
                />
            },
            _ => html! {},
        };

        html! {
            <section id="video-hero" class="video-hero">
                <video
                    ref={self.preview_ref.clone()}
                    class="video-hero-preview"
                    src={props.preview_video_src.clone()}
                    poster={item.preview_image.clone()}
                    muted=true
                    loop=true
                    playsinline=true
                    aria-hidden="true"
                />
                <div class="video-hero-overlay">
                    <button
                        class="video-hero-play"
                        aria-label={format!("Play {}", item.title)}
                        disabled={modal.is_loading()}
                        onclick={ctx.link().callback(|_: MouseEvent| VideoHeroMsg::PlayClick)}
                    >
                        if modal.is_loading() {
                            {"Loading…"}
                        } else {
                            {"▶ Play reel"}
                        }
                    </button>
                </div>
                { overlay }
                <style>
                    {r#"
                        .video-hero {
                            position: relative;
                            width: 100%;
                            height: 80vh;
                            overflow: hidden;
                            background: #000;
                        }
                        .video-hero-preview {
                            width: 100%;
                            height: 100%;
                            object-fit: cover;
                        }
                        .video-hero-overlay {
                            position: absolute;
                            inset: 0;
                            display: flex;
                            align-items: center;
                            justify-content: center;
                            background: rgba(0, 0, 0, 0.3);
                        }
                        .video-hero-play {
                            padding: 1rem 2.5rem;
                            font-size: 1.25rem;
                            color: #fff;
                            background: transparent;
                            border: 2px solid #fff;
                            cursor: pointer;
                        }
                        .video-hero-play:hover {
                            color: #000;
                            background: #fff;
                        }
                    "#}
                </style>
            </section>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::guard::testing::FakePage;
    use crate::media::script_loader::ScriptError;

    fn props() -> VideoHeroProps {
        VideoHeroProps {
            preview_video_src: "/videos/reel-preview.mp4".to_string(),
            vimeo_id: "76979871".to_string(),
            poster_src: None,
            title: "Our Reel".to_string(),
        }
    }

    #[test]
    fn failed_player_script_is_reported_once() {
        let item = hero_item(&props()).unwrap();
        let mut playback = PlaybackController::new(FakePage::new("", 2), Rc::new(|| {}));
        playback.open(&item);
        let token = playback.modal().token().unwrap();

        let changed = playback.script_settled(token, Err(ScriptError::LoadFailed("player.js".into())));
        assert_eq!(
            loading_error(&playback, changed, "76979871", "script_load"),
            Some(json!({ "vimeo_id": "76979871", "reason": "script_load" }))
        );

        // A repeated or stale result leaves the state alone and is not reported again.
        let changed = playback.script_settled(token, Err(ScriptError::Abandoned));
        assert_eq!(loading_error(&playback, changed, "76979871", "script_load"), None);
    }

    #[test]
    fn successful_load_is_not_reported() {
        let item = hero_item(&props()).unwrap();
        let mut playback = PlaybackController::new(FakePage::new("", 2), Rc::new(|| {}));
        playback.open(&item);
        let token = playback.modal().token().unwrap();

        let changed = playback.script_settled(token, Ok(()));
        assert!(changed);
        assert_eq!(loading_error(&playback, changed, "76979871", "script_load"), None);

        let changed = playback.report_error(token);
        assert!(loading_error(&playback, changed, "76979871", "media").is_some());
    }
}
