use yew::prelude::*;

use crate::components::calendly_modal::CalendlyModal;
use crate::components::events_archive::{EventsArchive, SponsorCta};
use crate::media::gallery::EventRecord;

fn sample_events() -> Vec<EventRecord> {
    vec![
        EventRecord {
            id: "event-1".into(),
            title: "AI Ethics Summit".into(),
            date: "November 15, 2023".into(),
            preview_image: Some("https://picsum.photos/seed/event1/800/450".into()),
            vimeo_id: Some("76979871".into()),
            preview_video_src: Some("/videos/previews/ai-ethics-summit.mp4".into()),
            width: 16,
            height: 9,
            ..Default::default()
        },
        EventRecord {
            id: "event-2".into(),
            title: "Startup Funding Workshop".into(),
            date: "October 20, 2023".into(),
            preview_image: Some("https://picsum.photos/seed/event2/800/450".into()),
            video_url: Some("https://sample-videos.com/video123/mp4/720/big_buck_bunny_720p_1mb.mp4".into()),
            width: 16,
            height: 9,
            ..Default::default()
        },
        EventRecord {
            id: "event-3".into(),
            title: "Tech Talent Meetup".into(),
            date: "September 5, 2023".into(),
            preview_image: Some("https://picsum.photos/seed/event3/800/450".into()),
            preview_video_src: Some("/videos/previews/tech-talent-meetup.mp4".into()),
            width: 4,
            height: 3,
            ..Default::default()
        },
    ]
}

fn sponsor_cta() -> SponsorCta {
    SponsorCta {
        title: "Become a Sponsor".into(),
        description: "Support our events and connect with the most promising entrepreneurs in Latin America.".into(),
        calendly_url: "https://calendly.com/creador/sponsor".into(),
        fallback_email: "sponsors@creadorventures.com".into(),
    }
}

#[function_component(Events)]
pub fn events() -> Html {
    let events = use_memo(|_| sample_events(), ());
    let calendly = use_state(|| None::<SponsorCta>);

    let open_calendly = {
        let calendly = calendly.clone();
        Callback::from(move |cta: SponsorCta| calendly.set(Some(cta)))
    };
    let close_calendly = {
        let calendly = calendly.clone();
        Callback::from(move |_| calendly.set(None))
    };
    let cta = (*calendly).clone().unwrap_or_else(sponsor_cta);

    html! {
        <main>
            <EventsArchive
                events={(*events).clone()}
                sponsor={sponsor_cta()}
                on_open_calendly={open_calendly}
            />
            <CalendlyModal
                is_open={calendly.is_some()}
                on_close={close_calendly}
                calendly_url={cta.calendly_url}
                fallback_email={cta.fallback_email}
                title={cta.title}
            />
        </main>
    }
}
