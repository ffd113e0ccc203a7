use yew::prelude::*;

use crate::components::video_error::VideoError;
use crate::config;
use crate::media::gallery::{GalleryItem, PreviewKind};
use crate::media::modal::ModalState;

#[derive(Properties, PartialEq)]
pub struct MediaModalProps {
    pub item: GalleryItem,
    pub state: ModalState,
    #[prop_or_default]
    pub error: Option<String>,
    pub on_close: Callback<()>,
    pub on_retry: Callback<()>,
    pub on_media_error: Callback<()>,
}

/// Overlay markup only. Open/close state and the dialog guard belong to the
/// `PlaybackController` of whoever renders this.
#[function_component(MediaModal)]
pub fn media_modal(props: &MediaModalProps) -> Html {
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let stop = Callback::from(|e: MouseEvent| e.stop_propagation());
    let media_error = {
        let on_media_error = props.on_media_error.clone();
        Callback::from(move |_: Event| on_media_error.emit(()))
    };

    let item = &props.item;
    let frame_style = format!("position: relative; padding-bottom: {:.2}%;", item.aspect.padding_percent());

    let body = match props.state {
        ModalState::Error => html! {
            <div class="media-modal-error">
                <VideoError
                    message={props.error.clone().unwrap_or_else(|| "Sorry, the video cannot be played.".to_string())}
                    on_retry={props.on_retry.clone()}
                />
                <p class="media-modal-fallback">
                    {"Still not working? Write to us at "}
                    <a href={format!("mailto:{}", config::CONTACT_EMAIL)}>{config::CONTACT_EMAIL}</a>
                </p>
                <button class="media-modal-secondary" onclick={close.clone()}>{"Close"}</button>
            </div>
        },
        ModalState::Playing => match &item.kind {
            PreviewKind::ExternalVideo { id } => html! {
                <div style={frame_style}>
                    <iframe
                        src={id.player_url()}
                        frameborder="0"
                        allow="autoplay; fullscreen; picture-in-picture; clipboard-write; encrypted-media"
                        style="position: absolute; top: 0; left: 0; width: 100%; height: 100%;"
                        title={item.title.clone()}
                        onerror={media_error}
                    />
                </div>
            },
            PreviewKind::LocalVideo { src } => html! {
                <div style={frame_style}>
                    <video
                        src={src.clone()}
                        poster={item.preview_image.clone()}
                        controls=true
                        autoplay=true
                        playsinline=true
                        style="position: absolute; top: 0; left: 0; width: 100%; height: 100%;"
                        onerror={media_error}
                    />
                </div>
            },
            PreviewKind::Image => html! {},
        },
        ModalState::Opening => html! {
            <div style={frame_style}>
                <div class="media-modal-spinner"><div class="spinner"></div></div>
            </div>
        },
        ModalState::Closed => html! {},
    };

    html! {
        <div class="media-modal-backdrop" onclick={close.clone()}>
            <div
                class="media-modal"
                role="dialog"
                aria-modal="true"
                aria-label={item.title.clone()}
                onclick={stop}
            >
                <button class="media-modal-close" aria-label="Close video" onclick={close}>
                    {"×"}
                </button>
                { body }
                <div class="media-modal-caption">
                    <p class="media-modal-date">{ &item.date }</p>
                    <h3>{ &item.title }</h3>
                </div>
            </div>
            <style>
                {r#"
                    .media-modal-backdrop {
                        position: fixed;
                        inset: 0;
                        z-index: 50;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        padding: 1rem;
                        background: rgba(0, 0, 0, 0.9);
                    }
                    .media-modal {
                        position: relative;
                        width: 100%;
                        max-width: 72rem;
                        border: 2px solid #fff;
                        background: #000;
                        color: #fff;
                    }
                    .media-modal-close {
                        position: absolute;
                        top: 1rem;
                        right: 1rem;
                        z-index: 60;
                        width: 3rem;
                        height: 3rem;
                        font-size: 1.8rem;
                        color: #fff;
                        background: #000;
                        border: 2px solid #fff;
                        cursor: pointer;
                    }
                    .media-modal-spinner {
                        position: absolute;
                        inset: 0;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                    }
                    .spinner {
                        width: 3rem;
                        height: 3rem;
                        border-top: 2px solid #fff;
                        border-radius: 50%;
                        animation: spin 1s linear infinite;
                    }
                    @keyframes spin {
                        from { transform: rotate(0deg); }
                        to { transform: rotate(360deg); }
                    }
                    .media-modal-error {
                        position: relative;
                        min-height: 20rem;
                        padding: 4rem;
                        text-align: center;
                    }
                    .media-modal-caption {
                        padding: 2rem;
                    }
                    .media-modal-date {
                        color: #9ca3af;
                        margin-bottom: 0.5rem;
                    }
                "#}
            </style>
        </div>
    }
}
