use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct VideoErrorProps {
    #[prop_or_else(|| "Sorry, there was an error playing the video.".to_string())]
    pub message: String,
    pub on_retry: Callback<()>,
}

#[function_component(VideoError)]
pub fn video_error(props: &VideoErrorProps) -> Html {
    let on_retry = {
        let on_retry = props.on_retry.clone();
        Callback::from(move |_: MouseEvent| on_retry.emit(()))
    };

    html! {
        <div class="video-error">
            <p class="video-error-message">{ &props.message }</p>
            <button class="video-error-retry" onclick={on_retry}>
                {"Try Again"}
            </button>
        </div>
    }
}
