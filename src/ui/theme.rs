use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for bibliography output
#[derive(Debug, Clone)]
pub struct Theme {
    pub heading: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    /// Field names in entry details and `info` lines
    pub label: Style,
    /// Paths, counts and other secondary text
    pub faint: Style,
    pub cite_key: Style,
    pub title: Style,
}

impl Theme {
    /// Honors `NO_COLOR`/`CLICOLOR` and plain pipes via console's detection
    pub fn detect() -> Self {
        if console::colors_enabled() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            heading: Style::new().bold().underline(),
            success: Style::new().green(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow(),
            label: Style::new().cyan(),
            faint: Style::new().dimmed(),
            cite_key: Style::new().magenta().bold(),
            title: Style::new().italic(),
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            label: Style::new(),
            faint: Style::new(),
            cite_key: Style::new(),
            title: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
