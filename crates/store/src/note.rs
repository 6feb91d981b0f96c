use chrono::{DateTime, Local};

/// Inputs for the initial content of a freshly created note.
#[derive(Clone, Debug)]
pub(crate) struct NoteTemplate<'a> {
    pub(crate) title: &'a str,
    pub(crate) tags: &'a [String],
    pub(crate) created: DateTime<Local>,
}

/// Markdown header written into a new note: title, optional tag line, creation stamp.
pub(crate) fn render_note(template: &NoteTemplate<'_>) -> String {
    let mut content = format!("# {}\n\n", template.title);
    if !template.tags.is_empty() {
        content.push_str(&format!("**tags:** {}\n\n", template.tags.join(", ")));
    }
    content.push_str(&format!(
        "_created: {}_\n\n",
        template.created.format("%Y-%m-%dT%H:%M:%S%.6f")
    ));
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn created() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap()
    }

    #[test]
    fn renders_title_and_timestamp() {
        let content = render_note(&NoteTemplate {
            title: "Weekly Sync",
            tags: &[],
            created: created(),
        });
        assert_eq!(
            content,
            "# Weekly Sync\n\n_created: 2024-03-05T09:30:00.000000_\n\n"
        );
    }

    #[test]
    fn renders_tag_line_when_tags_present() {
        let tags = vec!["product".to_string(), "people".to_string()];
        let content = render_note(&NoteTemplate {
            title: "Hiring",
            tags: &tags,
            created: created(),
        });
        assert!(content.starts_with("# Hiring\n\n**tags:** product, people\n\n_created: "));
    }
}
