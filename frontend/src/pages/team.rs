use yew::prelude::*;

use crate::components::team_grid::TeamGrid;
use crate::content::{SocialLink, SocialPlatform, TeamMember};

fn link(platform: SocialPlatform, url: &str) -> SocialLink {
    SocialLink {
        platform,
        url: url.to_string(),
    }
}

fn member(id: &str, name: &str, role: &str, bio: Option<&str>, social_links: Vec<SocialLink>) -> TeamMember {
    TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        photo: format!("https://picsum.photos/seed/{}/400/400", id),
        bio: bio.map(str::to_string),
        social_links,
    }
}

pub fn team_members() -> Vec<TeamMember> {
    vec![
        member(
            "jane",
            "Jane Doe",
            "CEO & Founder",
            Some("Experienced entrepreneur with background in AI and venture capital."),
            vec![
                link(SocialPlatform::Twitter, "https://twitter.com/"),
                link(SocialPlatform::Linkedin, "https://linkedin.com/"),
            ],
        ),
        member(
            "john",
            "John Smith",
            "CTO",
            None,
            vec![
                link(SocialPlatform::Github, "https://github.com/"),
                link(SocialPlatform::Linkedin, "https://linkedin.com/"),
            ],
        ),
        member(
            "alex",
            "Alex Johnson",
            "Design Lead",
            Some("Award-winning designer focused on user experience and digital products."),
            vec![link(SocialPlatform::Email, "mailto:alex@creadorventures.com")],
        ),
        member(
            "maria",
            "Maria Garcia",
            "Investment Partner",
            Some("Former VC with expertise in fintech and marketplace startups."),
            vec![
                link(SocialPlatform::Twitter, "https://twitter.com/"),
                link(SocialPlatform::Linkedin, "https://linkedin.com/"),
            ],
        ),
        member(
            "david",
            "David Lee",
            "Lead Developer",
            None,
            vec![link(SocialPlatform::Github, "https://github.com/")],
        ),
        member(
            "sophia",
            "Sophia Kim",
            "Operations Manager",
            Some("Operational expert with a background in scaling startups across LATAM."),
            vec![
                link(SocialPlatform::Linkedin, "https://linkedin.com/"),
                link(SocialPlatform::Email, "mailto:sophia@creadorventures.com"),
            ],
        ),
    ]
}

#[function_component(Team)]
pub fn team() -> Html {
    html! {
        <main class="team-page">
            <TeamGrid
                members={team_members()}
                description={Some("Meet the people behind Creador Ventures. Our diverse team brings together expertise in technology, investment, and entrepreneurship.".to_string())}
            />
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn roster_ids_are_unique() {
        let members = team_members();
        let ids: HashSet<&str> = members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), members.len());
        assert!(members.iter().all(|m| !m.social_links.is_empty()));
    }
}
