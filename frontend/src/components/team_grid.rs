use serde_json::{json, Value};
use yew::prelude::*;

use crate::analytics::{track_event, AnalyticsEvent};
use crate::content::{sort_team, SocialLink, TeamMember};

#[derive(Properties, PartialEq)]
pub struct TeamGridProps {
    pub members: Vec<TeamMember>,
    #[prop_or_else(|| "Our Team".to_string())]
    pub title: String,
    #[prop_or_default]
    pub description: Option<String>,
}

fn social_click_params(member: &TeamMember, link: &SocialLink) -> Value {
    json!({
        "team_member": member.name,
        "platform": link.platform.name(),
    })
}

fn social_link(member: &TeamMember, link: &SocialLink) -> Html {
    let onclick = {
        let params = social_click_params(member, link);
        Callback::from(move |_: MouseEvent| track_event(AnalyticsEvent::TeamSocialClick, params.clone()))
    };
    html! {
        <a
            key={format!("{}-{}", member.id, link.platform.name())}
            href={link.url.clone()}
            target="_blank"
            rel="noopener noreferrer"
            class="team-social"
            onclick={onclick}
        >
            <span class="team-social-icon">{ link.platform.icon() }</span>
            <span>{ link.platform.name() }</span>
        </a>
    }
}

#[function_component(TeamGrid)]
pub fn team_grid(props: &TeamGridProps) -> Html {
    let members = use_memo(|members| sort_team(members), props.members.clone());

    html! {
        <section class="team-grid">
            <h2>{ props.title.clone() }</h2>
            { props.description.as_ref().map(|description| html! {
                <p class="team-grid-description">{ description.clone() }</p>
            }).unwrap_or_default() }
            <div class="team-grid-cards">
                { for members.iter().map(|member| html! {
                    <div key={member.id.clone()} class="team-card">
                        <div class="team-card-photo">
                            <img src={member.photo.clone()} alt={format!("{} photo", member.name)} />
                        </div>
                        <div class="team-card-body">
                            <h3>{ member.name.clone() }</h3>
                            <p class="team-card-role">{ member.role.clone() }</p>
                            { member.bio.as_ref().map(|bio| html! {
                                <p class="team-card-bio">{ bio.clone() }</p>
                            }).unwrap_or_default() }
                            if !member.social_links.is_empty() {
                                <div class="team-card-social">
                                    { for member.social_links.iter().map(|link| social_link(member, link)) }
                                </div>
                            }
                        </div>
                    </div>
                }) }
            </div>
            <style>
                {r#"
                    .team-grid {
                        max-width: 1440px;
                        margin: 0 auto;
                        padding: 5rem 1.5rem;
                        color: #fff;
                        background: #111;
                    }
                    .team-grid h2 {
                        font-size: 48px;
                        font-weight: 300;
                        margin-bottom: 2rem;
                    }
                    .team-grid-description {
                        max-width: 800px;
                        font-size: 18px;
                        line-height: 28px;
                        margin-bottom: 4rem;
                    }
                    .team-grid-cards {
                        display: grid;
                        grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
                        gap: 2rem;
                    }
                    .team-card {
                        border: 2px solid #fff;
                        transition: transform 0.2s;
                    }
                    .team-card:hover {
                        transform: translateY(-8px);
                    }
                    .team-card-photo img {
                        width: 100%;
                        aspect-ratio: 1 / 1;
                        object-fit: cover;
                    }
                    .team-card-body {
                        padding: 1.5rem;
                    }
                    .team-card-role {
                        color: #999;
                        margin-bottom: 1rem;
                    }
                    .team-card-social {
                        display: flex;
                        flex-wrap: wrap;
                        gap: 1rem;
                    }
                    .team-social {
                        color: inherit;
                    }
                    .team-social-icon {
                        margin-right: 0.25rem;
                    }
                "#}
            </style>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SocialPlatform;

    #[test]
    fn social_click_names_member_and_platform() {
        let member = TeamMember {
            id: "sophia".to_string(),
            name: "Sophia Kim".to_string(),
            role: "Operations Manager".to_string(),
            photo: "/images/team/sophia.jpg".to_string(),
            bio: None,
            social_links: Vec::new(),
        };
        let link = SocialLink {
            platform: SocialPlatform::Linkedin,
            url: "https://linkedin.com/".to_string(),
        };
        assert_eq!(
            social_click_params(&member, &link),
            json!({ "team_member": "Sophia Kim", "platform": "linkedin" })
        );
    }
}
