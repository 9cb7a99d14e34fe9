//! Plain text rendering of views

use std::fmt::Write;

use club_client::{Event, Identity, Member, ProfileCard};

pub fn member_line(member: &Member) -> String {
    let mut line = format!(
        "{:>6}  {:<28} {}",
        member.id,
        member.full_name(),
        member.classification
    );
    if let Some(officer) = &member.officer {
        let _ = write!(line, " ({officer})");
    }
    line
}

pub fn profile(card: &ProfileCard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", card.name);
    if let Some(officer) = &card.officer {
        let _ = writeln!(out, "  Officer:        {officer}");
    }
    let _ = writeln!(out, "  Classification: {}", card.classification);
    let _ = writeln!(out, "  Relationship:   {}", card.relationship_status);
    if let Some(email) = &card.email {
        let _ = writeln!(out, "  Email:          {email}");
    }
    if let Some(phone) = &card.phone {
        let _ = writeln!(out, "  Phone:          {phone}");
    }
    let _ = write!(out, "  Photo:          {}", card.image_url);
    out
}

pub fn event(event: &Event) -> String {
    let mut out = format!("{} {}  {}", event.date, event.time, event.title);
    if !event.club.is_empty() {
        let _ = write!(out, " [{}]", event.club);
    }
    if !event.location.is_empty() {
        let _ = write!(out, "\n    at {}", event.location);
    }
    if !event.description.is_empty() {
        let _ = write!(out, "\n    {}", event.description);
    }
    out
}

pub fn whoami(identity: &Identity, member: Option<&Member>) -> String {
    let mut out = format!("{} <{}>", identity.name, identity.email);
    match member {
        Some(member) => {
            let _ = write!(out, "\n  Member #{} of {}", member.id, member.club);
        }
        None => out.push_str("\n  No member profile yet"),
    }
    out
}
