use crate::github::rest_types::RestRelease;

fn parts(release: &RestRelease) -> (&str, &str, &str) {
    (
        release.name.as_deref().unwrap_or_default(),
        release.tag_name.as_str(),
        release.body.as_deref().unwrap_or_default(),
    )
}

pub fn latest_release_report(release: &RestRelease) -> String {
    let (name, tag, body) = parts(release);
    format!("Latest title: {} tag: {} body: {}", name, tag, body)
}

pub fn release_report(release: &RestRelease) -> String {
    let (name, tag, body) = parts(release);
    format!("Release: {} tag: {} body: {}", name, tag, body)
}

pub fn releases_report(releases: &[RestRelease]) -> String {
    if releases.is_empty() {
        return "No releases found.".to_string();
    }

    let mut lines = vec![format!("Top {} results:", releases.len())];
    lines.extend(releases.iter().map(|release| {
        let (name, tag, body) = parts(release);
        format!("Title: {}, Tag: {}, Body: {}", name, tag, body)
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(name: Option<&str>, tag: &str) -> RestRelease {
        RestRelease {
            name: name.map(str::to_string),
            tag_name: tag.to_string(),
            body: Some("notes".to_string()),
        }
    }

    #[test]
    fn test_release_reports() {
        assert_eq!(
            latest_release_report(&release(Some("v1.2"), "v1.2.0")),
            "Latest title: v1.2 tag: v1.2.0 body: notes"
        );
        assert_eq!(
            release_report(&release(None, "v0.1.0")),
            "Release:  tag: v0.1.0 body: notes"
        );
        assert_eq!(releases_report(&[]), "No releases found.");
        assert_eq!(
            releases_report(&[release(Some("a"), "t1"), release(Some("b"), "t2")]),
            "Top 2 results:\nTitle: a, Tag: t1, Body: notes\nTitle: b, Tag: t2, Body: notes"
        );
    }
}
