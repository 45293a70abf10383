/// The two labels this bot reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedLabelKind {
    TemplateNotUsed,
    DoesntFollowTemplate,
}

impl TrackedLabelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TemplateNotUsed => "template-not-used",
            Self::DoesntFollowTemplate => "doesnt-follow-template",
        }
    }

    /// Whether the comment for this label lists the repository issue templates.
    pub fn includes_templates(self) -> bool {
        matches!(self, Self::TemplateNotUsed)
    }
}

/// A configured label paired with the comment body posted when it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLabel {
    pub kind: TrackedLabelKind,
    pub name: String,
    pub comment_body: String,
}

/// Lookup table from label name to its comment rule.
///
/// Entries are consulted in declaration order, so when both labels are
/// configured with the same name the "template not used" rule wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedLabels {
    entries: [TrackedLabel; 2],
}

impl TrackedLabels {
    pub fn new(
        template_not_used_label: String,
        template_not_used_comment_body: String,
        doesnt_follow_template_label: String,
        doesnt_follow_template_comment_body: String,
    ) -> Self {
        Self {
            entries: [
                TrackedLabel {
                    kind: TrackedLabelKind::TemplateNotUsed,
                    name: template_not_used_label,
                    comment_body: template_not_used_comment_body,
                },
                TrackedLabel {
                    kind: TrackedLabelKind::DoesntFollowTemplate,
                    name: doesnt_follow_template_label,
                    comment_body: doesnt_follow_template_comment_body,
                },
            ],
        }
    }

    pub fn lookup(&self, label_name: &str) -> Option<&TrackedLabel> {
        if label_name.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| entry.name == label_name)
    }

    pub fn get(&self, kind: TrackedLabelKind) -> &TrackedLabel {
        match kind {
            TrackedLabelKind::TemplateNotUsed => &self.entries[0],
            TrackedLabelKind::DoesntFollowTemplate => &self.entries[1],
        }
    }

    /// Order in which close mode sweeps the labels.
    pub fn sweep_order(&self) -> [&TrackedLabel; 2] {
        [
            self.get(TrackedLabelKind::DoesntFollowTemplate),
            self.get(TrackedLabelKind::TemplateNotUsed),
        ]
    }
}
