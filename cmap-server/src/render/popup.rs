//! Marker popup content

use cmap_common::{GeocodeStatus, Member};

/// Separator between website and LinkedIn links
const LINK_SEPARATOR: &str = " | ";

/// Build the popup HTML for one member
///
/// Thumbnail, name, title, location, then the website/LinkedIn links that
/// are actually set. All member text is escaped.
pub fn popup_html(member: &Member) -> String {
    let links: Vec<String> = [
        member.website_link().map(|url| link("Website", url)),
        member.linkedin_link().map(|url| link("LinkedIn", url)),
    ]
    .into_iter()
    .flatten()
    .collect();

    let unresolved_note = if member.geocode == GeocodeStatus::Unresolved {
        "<div class='unresolved-note'>Location could not be resolved</div>"
    } else {
        ""
    };

    format!(
        "<div style='text-align:center;'>\
         <img src='{image}' style='width:100px;height:100px;border-radius:50%;margin-bottom:8px;'><br>\
         <strong style='font-size:16px;'>{name}</strong><br>\
         <span style='color:#666;'>{title}</span><br>\
         <span style='color:#666;'>{location}</span><br>\
         {unresolved_note}\
         <div style='margin-top:8px;'>{links}</div>\
         </div>",
        image = escape_html(&member.image),
        name = escape_html(&member.name),
        title = escape_html(&member.title),
        location = escape_html(&member.location),
        links = links.join(LINK_SEPARATOR),
    )
}

fn link(label: &str, url: &str) -> String {
    format!(
        "<a href='{}' target='_blank' rel='noopener'>{}</a>",
        escape_html(url),
        label
    )
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmap_common::member::LINKEDIN_PLACEHOLDER;

    fn member(website: &str, linkedin: &str) -> Member {
        Member {
            name: "Alice".to_string(),
            location: "Paris, France".to_string(),
            image: "http://x/a.png".to_string(),
            title: "Engineer".to_string(),
            latitude: Some(48.85),
            longitude: Some(2.35),
            linkedin: linkedin.to_string(),
            website: website.to_string(),
            updated_at: None,
            geocode: GeocodeStatus::Provided,
        }
    }

    #[test]
    fn test_both_links_joined() {
        let html = popup_html(&member("https://alice.dev", "https://linkedin.com/in/alice"));
        assert!(html.contains(
            "<a href='https://alice.dev' target='_blank' rel='noopener'>Website</a> | \
             <a href='https://linkedin.com/in/alice' target='_blank' rel='noopener'>LinkedIn</a>"
        ));
    }

    #[test]
    fn test_single_link_has_no_separator() {
        let html = popup_html(&member("https://alice.dev", LINKEDIN_PLACEHOLDER));
        assert!(html.contains(">Website</a>"));
        assert!(!html.contains("LinkedIn"));
        assert!(!html.contains(" | "));
    }

    #[test]
    fn test_no_links() {
        let html = popup_html(&member("", LINKEDIN_PLACEHOLDER));
        assert!(html.contains("<div style='margin-top:8px;'></div>"));
    }

    #[test]
    fn test_member_text_is_escaped() {
        let mut m = member("", LINKEDIN_PLACEHOLDER);
        m.name = "<script>alert('x')</script>".to_string();
        let html = popup_html(&m);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_unresolved_note() {
        let mut m = member("", LINKEDIN_PLACEHOLDER);
        assert!(!popup_html(&m).contains("could not be resolved"));
        m.geocode = GeocodeStatus::Unresolved;
        assert!(popup_html(&m).contains("Location could not be resolved"));
    }
}
